use super::domain::{
    days_between, Candidate, Job, JobStatus, MonthBucket, WeekBucket, WorkflowStep,
};
use crate::sources::RawRecord;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized date '{0}'")]
pub struct DateParseError(String);

/// Parses the date formats the recruiting API and its exports emit.
///
/// Offsets are honored and the result is expressed in UTC.
pub fn parse_date(value: &str) -> Result<NaiveDateTime, DateParseError> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| DateParseError(trimmed.to_string()))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizationStats {
    /// Date values that were present but could not be parsed.
    pub unparsed_dates: usize,
    pub jobs_with_days_to_fill: usize,
    pub candidates_without_date: usize,
}

#[derive(Debug, Clone, Default)]
pub struct NormalizedRecords {
    pub jobs: Vec<Job>,
    pub candidates: Vec<Candidate>,
    pub stats: NormalizationStats,
}

pub fn normalize(jobs: &[RawRecord], candidates: &[RawRecord]) -> NormalizedRecords {
    let mut stats = NormalizationStats::default();
    let jobs: Vec<Job> = jobs
        .iter()
        .map(|record| normalize_job(record, &mut stats))
        .collect();
    let candidates: Vec<Candidate> = candidates
        .iter()
        .map(|record| normalize_candidate(record, &mut stats))
        .collect();

    stats.jobs_with_days_to_fill = jobs.iter().filter(|job| job.days_to_fill.is_some()).count();
    stats.candidates_without_date = candidates
        .iter()
        .filter(|candidate| candidate.date_added.is_none())
        .count();

    NormalizedRecords {
        jobs,
        candidates,
        stats,
    }
}

pub fn normalize_workflow_steps(steps: &[RawRecord]) -> Vec<WorkflowStep> {
    let mut stats = NormalizationStats::default();
    steps
        .iter()
        .map(|record| WorkflowStep {
            id: text(record, "id"),
            name: text(record, "name"),
            status: text(record, "status"),
            sequence: integer(record, "sequence").or_else(|| integer(record, "order")),
            completed_on: date(record, "datecompleted", &mut stats),
        })
        .collect()
}

fn normalize_job(record: &RawRecord, stats: &mut NormalizationStats) -> Job {
    let date_posted = date(record, "dateposted", stats);
    let date_closed = date(record, "dateclosed", stats);
    let days_to_fill = match (date_posted, date_closed) {
        (Some(posted), Some(closed)) => Some(days_between(posted, closed)),
        _ => None,
    };

    Job {
        id: text(record, "id"),
        title: text(record, "title"),
        department: text(record, "department"),
        location: text(record, "location"),
        status: JobStatus::parse(text(record, "status").as_deref()),
        date_posted,
        date_closed,
        recruiter: text(record, "recruiter"),
        days_to_fill,
    }
}

fn normalize_candidate(record: &RawRecord, stats: &mut NormalizationStats) -> Candidate {
    let date_added = date(record, "dateadded", stats);
    let day = date_added.map(|dt| dt.date());

    Candidate {
        id: text(record, "id"),
        first_name: text(record, "firstname"),
        last_name: text(record, "lastname"),
        email: text(record, "email"),
        phone: text(record, "phone"),
        status: text(record, "status"),
        source: text(record, "source"),
        date_added,
        job_id: text(record, "jobid"),
        recruiter: text(record, "recruiter"),
        week: day.map(WeekBucket::containing),
        month: day.map(MonthBucket::containing),
    }
}

/// Scalar field as trimmed text; numbers and booleans are stringified.
fn text(record: &RawRecord, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(value) => {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(value) => Some(value.to_string()),
        Value::Bool(value) => Some(value.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn integer(record: &RawRecord, key: &str) -> Option<i64> {
    match record.get(key)? {
        Value::Number(value) => value.as_i64(),
        Value::String(value) => value.trim().parse().ok(),
        _ => None,
    }
}

fn date(record: &RawRecord, key: &str, stats: &mut NormalizationStats) -> Option<NaiveDateTime> {
    let raw = text(record, key)?;
    match parse_date(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(field = key, error = %err, "treating date as missing");
            stats.unparsed_dates += 1;
            None
        }
    }
}
