use chrono::NaiveDate;
use clap::Args;
use hiring_pulse::config::AppConfig;
use hiring_pulse::dashboard::{
    resolve_as_of, CredentialOverrides, DashboardReport, DashboardService, IcimsConnector,
    WorkflowStep, DEFAULT_TABLE_ROWS,
};
use hiring_pulse::error::AppError;
use hiring_pulse::sources::CsvExportSource;
use hiring_pulse::telemetry::{self, LogSink};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct CredentialArgs {
    /// Recruiting API base URL (overrides RECRUITING_BASE_URL)
    #[arg(long)]
    pub(crate) base_url: Option<String>,
    /// API username (overrides RECRUITING_USERNAME)
    #[arg(long)]
    pub(crate) username: Option<String>,
    /// API password (overrides RECRUITING_PASSWORD)
    #[arg(long)]
    pub(crate) password: Option<String>,
    /// Customer identifier (overrides RECRUITING_CUSTOMER_ID)
    #[arg(long)]
    pub(crate) customer_id: Option<String>,
}

impl CredentialArgs {
    fn into_overrides(self) -> CredentialOverrides {
        CredentialOverrides {
            base_url: self.base_url,
            username: self.username,
            password: self.password,
            customer_id: self.customer_id,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    #[command(flatten)]
    pub(crate) credentials: CredentialArgs,
    /// Jobs CSV export to report on instead of the live API
    #[arg(long)]
    pub(crate) jobs_csv: Option<PathBuf>,
    /// Candidates CSV export to report on instead of the live API
    #[arg(long)]
    pub(crate) candidates_csv: Option<PathBuf>,
    /// Only include jobs with this status (e.g. open)
    #[arg(long)]
    pub(crate) job_status: Option<String>,
    /// Reporting date (YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) now: Option<NaiveDate>,
    /// Rows to show from the job and candidate tables
    #[arg(long, default_value_t = DEFAULT_TABLE_ROWS)]
    pub(crate) rows: usize,
    /// Print the report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct WorkflowArgs {
    /// Job whose workflow steps should be listed
    #[arg(long)]
    pub(crate) job_id: String,
    #[command(flatten)]
    pub(crate) credentials: CredentialArgs,
    /// Print the steps as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

fn cli_service() -> Result<DashboardService<IcimsConnector>, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, LogSink::Stderr)?;
    Ok(DashboardService::new(IcimsConnector, config.recruiting))
}

pub(crate) fn run_dashboard_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        credentials,
        jobs_csv,
        candidates_csv,
        job_status,
        now,
        rows,
        json,
    } = args;

    let service = cli_service()?;
    let as_of = resolve_as_of(now);

    let snapshot = if jobs_csv.is_some() || candidates_csv.is_some() {
        let source = CsvExportSource::from_paths(jobs_csv.as_deref(), candidates_csv.as_deref())?;
        service.refresh_from_source(&source, job_status, as_of)
    } else {
        service.refresh(&credentials.into_overrides(), job_status, as_of)?
    };

    let report = snapshot.report(rows);
    let mut out = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &report).map_err(io::Error::from)?;
        writeln!(out)?;
    } else {
        render_report(&report, &mut out)?;
    }
    Ok(())
}

pub(crate) fn run_workflow(args: WorkflowArgs) -> Result<(), AppError> {
    let WorkflowArgs {
        job_id,
        credentials,
        json,
    } = args;

    let service = cli_service()?;
    let steps = service.workflow_steps(&credentials.into_overrides(), &job_id)?;

    let mut out = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &steps).map_err(io::Error::from)?;
        writeln!(out)?;
    } else {
        render_workflow(&job_id, &steps, &mut out)?;
    }
    Ok(())
}

pub(crate) fn render_report(report: &DashboardReport, out: &mut impl Write) -> io::Result<()> {
    let summary = &report.summary;
    writeln!(
        out,
        "Recruiting dashboard (as of {})",
        report.as_of.format("%Y-%m-%d %H:%M")
    )?;

    writeln!(out, "\nSummary")?;
    writeln!(
        out,
        "- Jobs: {} total | {} open | {} closed",
        summary.total_jobs, summary.open_jobs, summary.closed_jobs
    )?;
    writeln!(
        out,
        "- Average time to fill: {:.1} days",
        summary.avg_time_to_fill
    )?;
    writeln!(
        out,
        "- Candidates: {} total | {} in the last 30 days",
        summary.total_candidates, summary.candidates_this_month
    )?;
    writeln!(out, "- Top source: {}", summary.top_source)?;

    if report.positions.is_empty() {
        writeln!(out, "\nPositions: none")?;
    } else {
        writeln!(out, "\nPositions")?;
        for position in &report.positions {
            let fill = position
                .avg_days_to_fill
                .map(|days| format!("{days:.1} days to fill"))
                .unwrap_or_else(|| "no fills yet".to_string());
            writeln!(
                out,
                "- {}: {} jobs, {} open, {}",
                position.position, position.total_jobs, position.open_jobs, fill
            )?;
        }
    }

    if report.recruiters.is_empty() {
        writeln!(out, "\nRecruiters: none")?;
    } else {
        writeln!(out, "\nRecruiters")?;
        for recruiter in &report.recruiters {
            writeln!(
                out,
                "- {}: {} jobs, {} candidates, {:.1} days to fill, efficiency {:.2}",
                recruiter.recruiter,
                recruiter.total_jobs,
                recruiter.total_candidates,
                recruiter.avg_days_to_fill,
                recruiter.efficiency
            )?;
        }
    }

    writeln!(out, "\nCandidates per week")?;
    for point in &report.weekly_candidates {
        writeln!(out, "- {}: {}", point.period, point.candidates)?;
    }

    writeln!(out, "\nCandidates per month")?;
    for point in &report.monthly_candidates {
        writeln!(out, "- {}: {}", point.period, point.candidates)?;
    }

    if !report.sources.is_empty() {
        writeln!(out, "\nSources")?;
        for source in &report.sources {
            writeln!(
                out,
                "- {}: {} ({:.0}%)",
                source.source,
                source.candidates,
                source.share * 100.0
            )?;
        }
    }

    writeln!(out, "\nRecent jobs")?;
    for job in &report.recent_jobs {
        writeln!(
            out,
            "- [{}] {} ({}), recruiter {}",
            job.status.as_str(),
            job.title.as_deref().unwrap_or("untitled"),
            job.id.as_deref().unwrap_or("no id"),
            job.recruiter.as_deref().unwrap_or("unassigned")
        )?;
    }

    writeln!(out, "\nRecent candidates")?;
    for candidate in &report.recent_candidates {
        let added = candidate
            .date_added
            .map(|added| added.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown date".to_string());
        writeln!(
            out,
            "- {} via {}, added {}",
            candidate.full_name().as_deref().unwrap_or("unnamed"),
            candidate.source.as_deref().unwrap_or("unknown source"),
            added
        )?;
    }

    let stats = &report.normalization;
    if stats.unparsed_dates > 0 || stats.candidates_without_date > 0 {
        writeln!(
            out,
            "\nData quality: {} unparsed dates, {} candidates without an added date",
            stats.unparsed_dates, stats.candidates_without_date
        )?;
    }

    if !report.issues.is_empty() {
        writeln!(out, "\nIssues")?;
        for issue in &report.issues {
            writeln!(
                out,
                "- [{}] {}: {}",
                issue.kind.label(),
                issue.dataset.label(),
                issue.message
            )?;
        }
    }

    Ok(())
}

fn render_workflow(job_id: &str, steps: &[WorkflowStep], out: &mut impl Write) -> io::Result<()> {
    if steps.is_empty() {
        return writeln!(out, "Job {job_id} has no workflow steps");
    }

    writeln!(out, "Workflow for job {job_id}")?;
    for step in steps {
        let position = step
            .sequence
            .map(|sequence| format!("{sequence}."))
            .unwrap_or_else(|| "-".to_string());
        write!(
            out,
            "{} {} [{}]",
            position,
            step.name.as_deref().unwrap_or("unnamed step"),
            step.status.as_deref().unwrap_or("unknown")
        )?;
        match step.completed_on {
            Some(done) => writeln!(out, " completed {}", done.format("%Y-%m-%d"))?,
            None => writeln!(out)?,
        }
    }
    Ok(())
}
