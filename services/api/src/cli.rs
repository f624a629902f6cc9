use crate::report::{run_dashboard_report, run_workflow, ReportArgs, WorkflowArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use hiring_pulse::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Hiring Pulse",
    about = "Recruiting analytics over the iCIMS API: serve the dashboard or print reports",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Build recruiting dashboard reports
    Dashboard {
        #[command(subcommand)]
        command: DashboardCommand,
    },
    /// List the hiring workflow steps configured for one job
    Workflow(WorkflowArgs),
}

#[derive(Subcommand, Debug)]
enum DashboardCommand {
    /// Refresh jobs and candidates and print the dashboard metrics
    Report(ReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    // Reports block on the recruiting API, which must not happen on a runtime worker.
    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Dashboard {
            command: DashboardCommand::Report(args),
        } => tokio::task::spawn_blocking(move || run_dashboard_report(args)).await?,
        Command::Workflow(args) => tokio::task::spawn_blocking(move || run_workflow(args)).await?,
    }
}
