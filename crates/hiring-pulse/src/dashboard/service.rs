use super::domain::WorkflowStep;
use super::normalize::normalize_workflow_steps;
use super::report::DashboardReport;
use super::snapshot::{DashboardSnapshot, RefreshOptions, DEFAULT_TABLE_ROWS};
use crate::config::{ConfigError, RecruitingConfig};
use crate::sources::{
    Credentials, CsvExportError, CsvExportSource, IcimsClient, RecruitingSource, SourceError,
};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use std::io::Cursor;
use std::time::Duration;

/// Builds a live source from credentials. Swapped out in tests.
pub trait SourceConnector: Send + Sync {
    fn connect(
        &self,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Box<dyn RecruitingSource>, SourceError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct IcimsConnector;

impl SourceConnector for IcimsConnector {
    fn connect(
        &self,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Box<dyn RecruitingSource>, SourceError> {
        Ok(Box::new(IcimsClient::new(credentials, timeout)?))
    }
}

/// Credential fields supplied at runtime, layered over configured defaults.
#[derive(Clone, Default, Deserialize)]
pub struct CredentialOverrides {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
}

impl CredentialOverrides {
    pub fn apply(&self, config: &RecruitingConfig) -> RecruitingConfig {
        let pick = |value: &Option<String>, fallback: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .or_else(|| fallback.clone())
        };

        RecruitingConfig {
            base_url: pick(&self.base_url, &config.base_url),
            username: pick(&self.username, &config.username),
            password: pick(&self.password, &config.password),
            customer_id: pick(&self.customer_id, &config.customer_id),
            ..config.clone()
        }
    }
}

impl std::fmt::Debug for CredentialOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialOverrides")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("customer_id", &self.customer_id)
            .finish()
    }
}

/// Body of a dashboard refresh. Inline CSV exports take precedence over the
/// live API when either is present.
#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    #[serde(flatten)]
    pub credentials: CredentialOverrides,
    #[serde(default)]
    pub jobs_csv: Option<String>,
    #[serde(default)]
    pub candidates_csv: Option<String>,
    #[serde(default)]
    pub now: Option<NaiveDate>,
    #[serde(default)]
    pub job_status: Option<String>,
    #[serde(default)]
    pub rows: Option<usize>,
}

impl RefreshRequest {
    fn uses_exports(&self) -> bool {
        self.jobs_csv.is_some() || self.candidates_csv.is_some()
    }
}

#[derive(Debug, Deserialize)]
pub struct WorkflowRequest {
    #[serde(flatten)]
    pub credentials: CredentialOverrides,
    pub job_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardServiceError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Import(#[from] CsvExportError),
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Runs refreshes against configured defaults and a connector.
///
/// The service holds no dataset between calls; every refresh returns a fresh
/// snapshot.
pub struct DashboardService<C> {
    connector: C,
    config: RecruitingConfig,
}

impl<C: SourceConnector> DashboardService<C> {
    pub fn new(connector: C, config: RecruitingConfig) -> Self {
        Self { connector, config }
    }

    pub fn refresh_options(&self, job_status: Option<String>) -> RefreshOptions {
        let mut jobs = self.config.job_query();
        if job_status.is_some() {
            jobs.status = job_status;
        }
        RefreshOptions {
            jobs,
            candidates: self.config.candidate_query(),
        }
    }

    pub fn refresh(
        &self,
        overrides: &CredentialOverrides,
        job_status: Option<String>,
        as_of: NaiveDateTime,
    ) -> Result<DashboardSnapshot, DashboardServiceError> {
        let config = overrides.apply(&self.config);
        let credentials = config.credentials()?;
        let options = self.refresh_options(job_status);

        let snapshot = match self.connector.connect(credentials, config.timeout()) {
            Ok(source) => DashboardSnapshot::refresh(source.as_ref(), &options, as_of),
            Err(err) => DashboardSnapshot::unavailable(&err, as_of),
        };
        Ok(snapshot)
    }

    pub fn refresh_from_source(
        &self,
        source: &dyn RecruitingSource,
        job_status: Option<String>,
        as_of: NaiveDateTime,
    ) -> DashboardSnapshot {
        DashboardSnapshot::refresh(source, &self.refresh_options(job_status), as_of)
    }

    pub fn refresh_report(
        &self,
        request: RefreshRequest,
    ) -> Result<DashboardReport, DashboardServiceError> {
        let as_of = resolve_as_of(request.now);
        let rows = request.rows.unwrap_or(DEFAULT_TABLE_ROWS);

        let snapshot = if request.uses_exports() {
            let mut source = CsvExportSource::default();
            if let Some(jobs) = request.jobs_csv {
                source = source.with_jobs(Cursor::new(jobs.into_bytes()))?;
            }
            if let Some(candidates) = request.candidates_csv {
                source = source.with_candidates(Cursor::new(candidates.into_bytes()))?;
            }
            self.refresh_from_source(&source, request.job_status, as_of)
        } else {
            self.refresh(&request.credentials, request.job_status, as_of)?
        };

        Ok(snapshot.report(rows))
    }

    pub fn workflow_steps(
        &self,
        overrides: &CredentialOverrides,
        job_id: &str,
    ) -> Result<Vec<WorkflowStep>, DashboardServiceError> {
        let config = overrides.apply(&self.config);
        let credentials = config.credentials()?;
        let source = self.connector.connect(credentials, config.timeout())?;
        let raw = source.fetch_workflow_steps(job_id)?;
        Ok(normalize_workflow_steps(&raw))
    }
}

/// Reporting instant: midnight of the given day, or the current UTC time.
pub fn resolve_as_of(day: Option<NaiveDate>) -> NaiveDateTime {
    day.and_then(|day| day.and_hms_opt(0, 0, 0))
        .unwrap_or_else(|| Utc::now().naive_utc())
}
