use chrono::{NaiveDate, NaiveDateTime};

use crate::dashboard::domain::{
    days_between, Candidate, Job, JobStatus, MonthBucket, WeekBucket,
};

pub(super) fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid date")
}

pub(super) fn job(title: &str, status: &str, recruiter: &str) -> Job {
    Job {
        id: None,
        title: Some(title.to_string()),
        department: None,
        location: None,
        status: JobStatus::parse(Some(status)),
        date_posted: None,
        date_closed: None,
        recruiter: Some(recruiter.to_string()),
        days_to_fill: None,
    }
}

pub(super) fn filled_job(title: &str, recruiter: &str, days: i64) -> Job {
    let posted = day(2024, 1, 1);
    let closed = posted + chrono::Duration::days(days);
    Job {
        date_posted: Some(posted),
        date_closed: Some(closed),
        days_to_fill: Some(days_between(posted, closed)),
        ..job(title, "closed", recruiter)
    }
}

pub(super) fn candidate(source: Option<&str>, recruiter: Option<&str>) -> Candidate {
    Candidate {
        id: None,
        first_name: None,
        last_name: None,
        email: None,
        phone: None,
        status: None,
        source: source.map(str::to_string),
        date_added: None,
        job_id: None,
        recruiter: recruiter.map(str::to_string),
        week: None,
        month: None,
    }
}

pub(super) fn added_on(added: NaiveDateTime) -> Candidate {
    Candidate {
        date_added: Some(added),
        week: Some(WeekBucket::containing(added.date())),
        month: Some(MonthBucket::containing(added.date())),
        ..candidate(Some("LinkedIn"), None)
    }
}
