use super::domain::{Candidate, Job};
use super::normalize::{normalize, NormalizationStats};
use super::report::{
    group_by_position, group_by_recruiter, monthly_candidate_counts, source_breakdown,
    summary_metrics, weekly_candidate_counts, DashboardReport, PositionMetrics,
    RecruiterMetrics, SourceShare, SummaryMetrics, TimelinePoint,
};
use crate::sources::{
    CandidateQuery, JobQuery, RawRecord, RecruitingSource, SourceError, SourceErrorKind,
};
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{info, warn};

pub const DEFAULT_TABLE_ROWS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    Jobs,
    Candidates,
}

impl Dataset {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Jobs => "Jobs",
            Self::Candidates => "Candidates",
        }
    }
}

/// A fetch failure that was degraded to an empty dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceIssue {
    pub dataset: Dataset,
    pub kind: SourceErrorKind,
    pub message: String,
}

impl SourceIssue {
    pub fn new(dataset: Dataset, error: &SourceError) -> Self {
        Self {
            dataset,
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshOptions {
    pub jobs: JobQuery,
    pub candidates: CandidateQuery,
}

/// Immutable result of one fetch-then-normalize pass.
///
/// Everything the dashboard shows is computed from a snapshot; a refresh
/// builds a new one rather than mutating the last.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    as_of: NaiveDateTime,
    jobs: Vec<Job>,
    candidates: Vec<Candidate>,
    stats: NormalizationStats,
    issues: Vec<SourceIssue>,
}

impl DashboardSnapshot {
    /// Fetches both datasets and normalizes them. Fetch failures never abort
    /// the refresh: the dataset is left empty and the failure recorded.
    pub fn refresh(
        source: &dyn RecruitingSource,
        options: &RefreshOptions,
        as_of: NaiveDateTime,
    ) -> Self {
        let mut issues = Vec::new();

        info!(limit = options.jobs.limit, "extracting jobs");
        let jobs = collect(source.fetch_jobs(&options.jobs), Dataset::Jobs, &mut issues);

        info!(limit = options.candidates.limit, "extracting candidates");
        let candidates = collect(
            source.fetch_candidates(&options.candidates),
            Dataset::Candidates,
            &mut issues,
        );

        let mut snapshot = Self::from_records(&jobs, &candidates, as_of);
        snapshot.issues = issues;
        info!(
            jobs = snapshot.jobs.len(),
            candidates = snapshot.candidates.len(),
            issues = snapshot.issues.len(),
            "dashboard snapshot ready"
        );
        snapshot
    }

    pub fn from_records(jobs: &[RawRecord], candidates: &[RawRecord], as_of: NaiveDateTime) -> Self {
        let normalized = normalize(jobs, candidates);
        Self {
            as_of,
            jobs: normalized.jobs,
            candidates: normalized.candidates,
            stats: normalized.stats,
            issues: Vec::new(),
        }
    }

    /// Snapshot for a source that could not even be reached.
    pub fn unavailable(error: &SourceError, as_of: NaiveDateTime) -> Self {
        warn!(error = %error, "recruiting source unavailable");
        Self {
            as_of,
            jobs: Vec::new(),
            candidates: Vec::new(),
            stats: NormalizationStats::default(),
            issues: vec![
                SourceIssue::new(Dataset::Jobs, error),
                SourceIssue::new(Dataset::Candidates, error),
            ],
        }
    }

    pub fn as_of(&self) -> NaiveDateTime {
        self.as_of
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn stats(&self) -> NormalizationStats {
        self.stats
    }

    pub fn issues(&self) -> &[SourceIssue] {
        &self.issues
    }

    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn summary(&self) -> SummaryMetrics {
        summary_metrics(&self.jobs, &self.candidates, self.as_of)
    }

    pub fn positions(&self) -> Vec<PositionMetrics> {
        group_by_position(&self.jobs)
    }

    pub fn recruiters(&self) -> Vec<RecruiterMetrics> {
        group_by_recruiter(&self.jobs, &self.candidates)
    }

    pub fn weekly_timeline(&self) -> Vec<TimelinePoint> {
        weekly_candidate_counts(&self.candidates)
            .into_iter()
            .map(|(week, candidates)| TimelinePoint {
                period: week.to_string(),
                candidates,
            })
            .collect()
    }

    pub fn monthly_timeline(&self) -> Vec<TimelinePoint> {
        monthly_candidate_counts(&self.candidates)
            .into_iter()
            .map(|(month, candidates)| TimelinePoint {
                period: month.to_string(),
                candidates,
            })
            .collect()
    }

    pub fn sources(&self) -> Vec<SourceShare> {
        source_breakdown(&self.candidates)
    }

    /// Every computed table plus the first `rows` records of each dataset.
    pub fn report(&self, rows: usize) -> DashboardReport {
        DashboardReport {
            as_of: self.as_of,
            summary: self.summary(),
            positions: self.positions(),
            recruiters: self.recruiters(),
            weekly_candidates: self.weekly_timeline(),
            monthly_candidates: self.monthly_timeline(),
            sources: self.sources(),
            recent_jobs: self.jobs.iter().take(rows).cloned().collect(),
            recent_candidates: self.candidates.iter().take(rows).cloned().collect(),
            normalization: self.stats,
            issues: self.issues.clone(),
        }
    }
}

fn collect(
    result: Result<Vec<RawRecord>, SourceError>,
    dataset: Dataset,
    issues: &mut Vec<SourceIssue>,
) -> Vec<RawRecord> {
    match result {
        Ok(records) => records,
        Err(err) => {
            warn!(dataset = dataset.label(), error = %err, "degrading to empty dataset");
            issues.push(SourceIssue::new(dataset, &err));
            Vec::new()
        }
    }
}
