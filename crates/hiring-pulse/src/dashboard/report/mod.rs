mod groups;
mod summary;
pub mod views;

#[cfg(test)]
mod tests;

pub use groups::{
    efficiency, group_by_position, group_by_recruiter, monthly_candidate_counts,
    source_breakdown, weekly_candidate_counts, POSITION_LIMIT, RECRUITER_LIMIT,
};
pub use summary::{summary_metrics, top_source, NO_SOURCE, RECENT_WINDOW_DAYS};
pub use views::{
    DashboardReport, PositionMetrics, RecruiterMetrics, SourceShare, SummaryMetrics,
    TimelinePoint,
};
