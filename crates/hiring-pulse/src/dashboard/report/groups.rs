use super::super::domain::{Candidate, Job, MonthBucket, WeekBucket};
use super::summary::mean;
use super::views::{PositionMetrics, RecruiterMetrics, SourceShare};
use std::collections::{BTreeMap, HashMap};

pub const POSITION_LIMIT: usize = 15;
pub const RECRUITER_LIMIT: usize = 10;

#[derive(Debug, Default)]
struct JobTally {
    total: usize,
    open: usize,
    days_to_fill: Vec<i64>,
}

impl JobTally {
    fn add(&mut self, job: &Job) {
        self.total += 1;
        if job.is_open() {
            self.open += 1;
        }
        if let Some(days) = job.days_to_fill {
            self.days_to_fill.push(days);
        }
    }

    fn avg_days_to_fill(&self) -> Option<f64> {
        mean(self.days_to_fill.iter().copied())
    }
}

/// Per-title job counts in first-appearance order, limited to the
/// [`POSITION_LIMIT`] busiest titles. Jobs without a title are skipped.
pub fn group_by_position(jobs: &[Job]) -> Vec<PositionMetrics> {
    let mut order: Vec<(&str, JobTally)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for job in jobs {
        let Some(title) = job.title.as_deref() else {
            continue;
        };
        let slot = *index.entry(title).or_insert_with(|| {
            order.push((title, JobTally::default()));
            order.len() - 1
        });
        order[slot].1.add(job);
    }

    let groups = order
        .into_iter()
        .map(|(title, tally)| PositionMetrics {
            position: title.to_string(),
            total_jobs: tally.total,
            avg_days_to_fill: tally.avg_days_to_fill(),
            open_jobs: tally.open,
        })
        .collect();

    keep_busiest(groups, POSITION_LIMIT, |group| (group.total_jobs, 0))
}

/// Full outer join of per-recruiter job aggregates and candidate counts.
///
/// Recruiters appear in name order. A recruiter missing from one side gets
/// zeros for that side, and the [`RECRUITER_LIMIT`] busiest are kept.
pub fn group_by_recruiter(jobs: &[Job], candidates: &[Candidate]) -> Vec<RecruiterMetrics> {
    let mut job_side: BTreeMap<&str, JobTally> = BTreeMap::new();
    for job in jobs {
        if let Some(recruiter) = job.recruiter.as_deref() {
            job_side.entry(recruiter).or_default().add(job);
        }
    }

    let mut candidate_side: BTreeMap<&str, usize> = BTreeMap::new();
    for recruiter in candidates
        .iter()
        .filter_map(|candidate| candidate.recruiter.as_deref())
    {
        *candidate_side.entry(recruiter).or_default() += 1;
    }

    let mut merged: BTreeMap<&str, (Option<JobTally>, usize)> = BTreeMap::new();
    for (recruiter, tally) in job_side {
        merged.entry(recruiter).or_default().0 = Some(tally);
    }
    for (recruiter, count) in candidate_side {
        merged.entry(recruiter).or_default().1 = count;
    }

    let groups = merged
        .into_iter()
        .map(|(recruiter, (tally, total_candidates))| {
            let total_jobs = tally.as_ref().map_or(0, |tally| tally.total);
            RecruiterMetrics {
                recruiter: recruiter.to_string(),
                total_jobs,
                total_candidates,
                avg_days_to_fill: tally
                    .as_ref()
                    .and_then(JobTally::avg_days_to_fill)
                    .unwrap_or(0.0),
                efficiency: efficiency(total_candidates, total_jobs),
            }
        })
        .collect();

    keep_busiest(groups, RECRUITER_LIMIT, |group| {
        (group.total_jobs, group.total_candidates)
    })
}

/// Candidates attracted per job, smoothed so recruiters without jobs still score.
pub fn efficiency(total_candidates: usize, total_jobs: usize) -> f64 {
    total_candidates as f64 / (total_jobs as f64 + 1.0)
}

pub fn weekly_candidate_counts(candidates: &[Candidate]) -> Vec<(WeekBucket, usize)> {
    bucket_counts(candidates.iter().filter_map(|candidate| candidate.week))
}

pub fn monthly_candidate_counts(candidates: &[Candidate]) -> Vec<(MonthBucket, usize)> {
    bucket_counts(candidates.iter().filter_map(|candidate| candidate.month))
}

/// Candidate volume per source, most frequent first; ties keep first-seen order.
pub fn source_breakdown(candidates: &[Candidate]) -> Vec<SourceShare> {
    let mut order: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for source in candidates
        .iter()
        .filter_map(|candidate| candidate.source.as_deref())
    {
        let slot = *index.entry(source).or_insert_with(|| {
            order.push((source, 0));
            order.len() - 1
        });
        order[slot].1 += 1;
    }

    let total = candidates.len();
    // Stable sort keeps first-seen order among equal counts.
    order.sort_by(|left, right| right.1.cmp(&left.1));
    order
        .into_iter()
        .map(|(source, count)| SourceShare {
            source: source.to_string(),
            candidates: count,
            share: count as f64 / total as f64,
        })
        .collect()
}

fn bucket_counts<B: Ord>(buckets: impl Iterator<Item = B>) -> Vec<(B, usize)> {
    let mut counts: BTreeMap<B, usize> = BTreeMap::new();
    for bucket in buckets {
        *counts.entry(bucket).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// Keeps the `limit` groups with the largest `weight`, preserving input order.
fn keep_busiest<T>(groups: Vec<T>, limit: usize, weight: impl Fn(&T) -> (usize, usize)) -> Vec<T> {
    if groups.len() <= limit {
        return groups;
    }

    let mut ranked: Vec<(usize, T)> = groups.into_iter().enumerate().collect();
    ranked.sort_by(|(left_pos, left), (right_pos, right)| {
        weight(right)
            .cmp(&weight(left))
            .then(left_pos.cmp(right_pos))
    });
    ranked.truncate(limit);
    ranked.sort_by_key(|(position, _)| *position);
    ranked.into_iter().map(|(_, group)| group).collect()
}
