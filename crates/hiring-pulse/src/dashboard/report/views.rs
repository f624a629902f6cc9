use super::super::domain::{Candidate, Job};
use super::super::normalize::NormalizationStats;
use super::super::snapshot::SourceIssue;
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total_jobs: usize,
    pub open_jobs: usize,
    pub closed_jobs: usize,
    pub avg_time_to_fill: f64,
    pub total_candidates: usize,
    pub candidates_this_month: usize,
    pub top_source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionMetrics {
    pub position: String,
    pub total_jobs: usize,
    pub avg_days_to_fill: Option<f64>,
    pub open_jobs: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecruiterMetrics {
    pub recruiter: String,
    pub total_jobs: usize,
    pub total_candidates: usize,
    pub avg_days_to_fill: f64,
    pub efficiency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceShare {
    pub source: String,
    pub candidates: usize,
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
    pub period: String,
    pub candidates: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub as_of: NaiveDateTime,
    pub summary: SummaryMetrics,
    pub positions: Vec<PositionMetrics>,
    pub recruiters: Vec<RecruiterMetrics>,
    pub weekly_candidates: Vec<TimelinePoint>,
    pub monthly_candidates: Vec<TimelinePoint>,
    pub sources: Vec<SourceShare>,
    pub recent_jobs: Vec<Job>,
    pub recent_candidates: Vec<Candidate>,
    pub normalization: NormalizationStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<SourceIssue>,
}
