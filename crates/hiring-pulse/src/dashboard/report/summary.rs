use super::super::domain::{Candidate, Job};
use super::views::SummaryMetrics;
use chrono::{Duration, NaiveDateTime};
use std::collections::HashMap;

pub const NO_SOURCE: &str = "N/A";
pub const RECENT_WINDOW_DAYS: i64 = 30;

pub fn summary_metrics(jobs: &[Job], candidates: &[Candidate], now: NaiveDateTime) -> SummaryMetrics {
    let window_start = now - Duration::days(RECENT_WINDOW_DAYS);

    SummaryMetrics {
        total_jobs: jobs.len(),
        open_jobs: jobs.iter().filter(|job| job.is_open()).count(),
        closed_jobs: jobs.iter().filter(|job| job.is_closed()).count(),
        avg_time_to_fill: mean(jobs.iter().filter_map(|job| job.days_to_fill)).unwrap_or(0.0),
        total_candidates: candidates.len(),
        candidates_this_month: candidates
            .iter()
            .filter_map(|candidate| candidate.date_added)
            .filter(|added| *added >= window_start)
            .count(),
        top_source: top_source(candidates).unwrap_or_else(|| NO_SOURCE.to_string()),
    }
}

/// Most frequent candidate source. Ties go to the source seen first.
pub fn top_source(candidates: &[Candidate]) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for source in candidates.iter().filter_map(|candidate| candidate.source.as_deref()) {
        match index.get(source) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(source, counts.len());
                counts.push((source, 1));
            }
        }
    }

    counts
        .into_iter()
        .fold(None::<(&str, usize)>, |best, (source, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((source, count)),
        })
        .map(|(source, _)| source.to_string())
}

pub(crate) fn mean(values: impl Iterator<Item = i64>) -> Option<f64> {
    let (sum, count) = values.fold((0i64, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum as f64 / count as f64)
}
