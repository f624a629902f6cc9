//! Data source adapters returning raw recruiting records.
//!
//! Adapters hand back loosely-typed JSON mappings; turning them into typed
//! jobs and candidates is the dashboard's job.

pub mod csv_export;
pub mod icims;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use csv_export::{CsvExportError, CsvExportSource};
pub use icims::IcimsClient;

/// A single record as delivered by the upstream API.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Connection details for the recruiting API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    base_url: String,
    username: String,
    password: String,
    customer_id: String,
}

impl Credentials {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        customer_id: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            customer_id: customer_id.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("customer_id", &self.customer_id)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobQuery {
    /// Upstream status filter; `None` pulls every status.
    pub status: Option<String>,
    pub limit: u32,
}

impl Default for JobQuery {
    fn default() -> Self {
        Self {
            status: None,
            limit: crate::config::DEFAULT_JOB_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateQuery {
    pub job_id: Option<String>,
    pub limit: u32,
}

impl Default for CandidateQuery {
    fn default() -> Self {
        Self {
            job_id: None,
            limit: crate::config::DEFAULT_CANDIDATE_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceErrorKind {
    Auth,
    Fetch,
    Decode,
}

impl SourceErrorKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Auth => "Authentication",
            Self::Fetch => "Fetch",
            Self::Decode => "Malformed response",
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("request failed: {0}")]
    Fetch(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl SourceError {
    pub const fn kind(&self) -> SourceErrorKind {
        match self {
            Self::Auth(_) => SourceErrorKind::Auth,
            Self::Fetch(_) => SourceErrorKind::Fetch,
            Self::Decode(_) => SourceErrorKind::Decode,
        }
    }
}

/// Anything that can hand the dashboard raw jobs, candidates and workflow steps.
pub trait RecruitingSource: fmt::Debug {
    fn fetch_jobs(&self, query: &JobQuery) -> Result<Vec<RawRecord>, SourceError>;
    fn fetch_candidates(&self, query: &CandidateQuery) -> Result<Vec<RawRecord>, SourceError>;
    fn fetch_workflow_steps(&self, job_id: &str) -> Result<Vec<RawRecord>, SourceError>;
}
