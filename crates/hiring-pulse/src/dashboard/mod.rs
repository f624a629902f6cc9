//! Metrics engine for the recruiting dashboard.
//!
//! Raw records are normalized into [`domain`] types, captured in an immutable
//! [`DashboardSnapshot`], and aggregated by the functions in [`report`].

pub mod domain;
pub mod normalize;
pub mod report;
pub mod router;
pub mod service;
pub mod snapshot;

pub use domain::{Candidate, Job, JobStatus, MonthBucket, WeekBucket, WorkflowStep};
pub use normalize::{normalize, parse_date, DateParseError, NormalizationStats};
pub use report::DashboardReport;
pub use router::dashboard_router;
pub use service::{
    resolve_as_of, CredentialOverrides, DashboardService, DashboardServiceError, IcimsConnector,
    RefreshRequest, SourceConnector, WorkflowRequest,
};
pub use snapshot::{DashboardSnapshot, Dataset, RefreshOptions, SourceIssue, DEFAULT_TABLE_ROWS};
