use std::io::Cursor;

use chrono::{NaiveDate, NaiveDateTime};
use hiring_pulse::dashboard::{DashboardSnapshot, Dataset, RefreshOptions};
use hiring_pulse::sources::{
    CandidateQuery, CsvExportSource, JobQuery, RawRecord, RecruitingSource, SourceError,
    SourceErrorKind,
};

const JOBS_CSV: &str = "\
id,title,department,status,dateposted,dateclosed,recruiter
1,Backend Engineer,Engineering,Open,2024-01-02,,Avery
2,Backend Engineer,Engineering,Closed,2024-01-02,2024-01-22,Avery
3,Designer,Product,Closed,01/05/2024,2024-02-04T12:00:00Z,Blake
4,Analyst,Finance,On Hold,not-a-date,,
";

const CANDIDATES_CSV: &str = "\
id,firstname,lastname,source,dateadded,jobid,recruiter
10,Robin,Reyes,Referral,2024-03-20,1,Avery
11,Sam,Lee,LinkedIn,2024-03-02,1,Avery
12,Kai,Park,Referral,2024-02-10,3,Blake
13,Noa,Kim,Indeed,,2,Casey
";

fn as_of() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 31)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .expect("valid as-of date")
}

fn export_source() -> CsvExportSource {
    CsvExportSource::default()
        .with_jobs(Cursor::new(JOBS_CSV))
        .and_then(|source| source.with_candidates(Cursor::new(CANDIDATES_CSV)))
        .expect("fixtures parse")
}

#[derive(Debug)]
struct FailingSource {
    jobs: Option<SourceError>,
    candidates: Option<SourceError>,
}

impl RecruitingSource for FailingSource {
    fn fetch_jobs(&self, _query: &JobQuery) -> Result<Vec<RawRecord>, SourceError> {
        match &self.jobs {
            Some(err) => Err(err.clone()),
            None => export_source().fetch_jobs(&JobQuery::default()),
        }
    }

    fn fetch_candidates(&self, _query: &CandidateQuery) -> Result<Vec<RawRecord>, SourceError> {
        match &self.candidates {
            Some(err) => Err(err.clone()),
            None => export_source().fetch_candidates(&CandidateQuery::default()),
        }
    }

    fn fetch_workflow_steps(&self, _job_id: &str) -> Result<Vec<RawRecord>, SourceError> {
        Ok(Vec::new())
    }
}

#[test]
fn exports_flow_through_every_metric() {
    let snapshot = DashboardSnapshot::refresh(&export_source(), &RefreshOptions::default(), as_of());

    assert!(snapshot.is_complete());
    let stats = snapshot.stats();
    assert_eq!(stats.unparsed_dates, 1);
    assert_eq!(stats.jobs_with_days_to_fill, 2);
    assert_eq!(stats.candidates_without_date, 1);

    let summary = snapshot.summary();
    assert_eq!(summary.total_jobs, 4);
    assert_eq!(summary.open_jobs, 1);
    assert_eq!(summary.closed_jobs, 2);
    // 20 days for the engineer, 30.5 floored to 30 for the designer.
    assert_eq!(summary.avg_time_to_fill, 25.0);
    assert_eq!(summary.total_candidates, 4);
    assert_eq!(summary.candidates_this_month, 2);
    assert_eq!(summary.top_source, "Referral");

    let positions = snapshot.positions();
    let titles: Vec<&str> = positions.iter().map(|p| p.position.as_str()).collect();
    assert_eq!(titles, vec!["Backend Engineer", "Designer", "Analyst"]);
    assert_eq!(positions[0].open_jobs, 1);
    assert_eq!(positions[2].avg_days_to_fill, None);

    let recruiters = snapshot.recruiters();
    let names: Vec<&str> = recruiters.iter().map(|r| r.recruiter.as_str()).collect();
    assert_eq!(names, vec!["Avery", "Blake", "Casey"]);
    assert!((recruiters[0].efficiency - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(recruiters[1].avg_days_to_fill, 30.0);
    assert_eq!(recruiters[2].total_jobs, 0);
    assert_eq!(recruiters[2].efficiency, 1.0);

    let weekly: Vec<String> = snapshot
        .weekly_timeline()
        .into_iter()
        .map(|point| point.period)
        .collect();
    assert_eq!(
        weekly,
        vec![
            "2024-02-05/2024-02-11",
            "2024-02-26/2024-03-03",
            "2024-03-18/2024-03-24",
        ]
    );

    let monthly = snapshot.monthly_timeline();
    assert_eq!(monthly.len(), 2);
    assert_eq!((monthly[1].period.as_str(), monthly[1].candidates), ("2024-03", 2));
}

#[test]
fn status_filter_narrows_exported_jobs() {
    let options = RefreshOptions {
        jobs: JobQuery {
            status: Some("CLOSED".into()),
            limit: 10,
        },
        candidates: CandidateQuery::default(),
    };

    let snapshot = DashboardSnapshot::refresh(&export_source(), &options, as_of());

    assert_eq!(snapshot.jobs().len(), 2);
    assert!(snapshot.jobs().iter().all(|job| job.is_closed()));
}

#[test]
fn failed_fetches_degrade_to_empty_datasets() {
    let source = FailingSource {
        jobs: Some(SourceError::Fetch("connection reset".into())),
        candidates: Some(SourceError::Auth("token expired".into())),
    };

    let snapshot = DashboardSnapshot::refresh(&source, &RefreshOptions::default(), as_of());

    assert!(snapshot.jobs().is_empty());
    assert!(snapshot.candidates().is_empty());
    let issues = snapshot.issues();
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].dataset, Dataset::Jobs);
    assert_eq!(issues[0].kind, SourceErrorKind::Fetch);
    assert_eq!(issues[1].kind, SourceErrorKind::Auth);

    let summary = snapshot.summary();
    assert_eq!(summary.total_jobs, 0);
    assert_eq!(summary.avg_time_to_fill, 0.0);
    assert_eq!(summary.top_source, "N/A");
    assert!(snapshot.positions().is_empty());
    assert!(snapshot.recruiters().is_empty());
    assert!(snapshot.weekly_timeline().is_empty());
}

#[test]
fn one_failed_dataset_keeps_the_other() {
    let source = FailingSource {
        jobs: None,
        candidates: Some(SourceError::Decode("truncated body".into())),
    };

    let snapshot = DashboardSnapshot::refresh(&source, &RefreshOptions::default(), as_of());

    assert_eq!(snapshot.jobs().len(), 4);
    assert!(snapshot.candidates().is_empty());
    assert_eq!(snapshot.issues().len(), 1);
    assert_eq!(snapshot.issues()[0].dataset, Dataset::Candidates);

    let recruiters = snapshot.recruiters();
    assert!(recruiters.iter().all(|r| r.total_candidates == 0));
}

#[test]
fn unavailable_source_reports_both_datasets() {
    let error = SourceError::Auth("invalid_grant".into());
    let snapshot = DashboardSnapshot::unavailable(&error, as_of());

    assert!(!snapshot.is_complete());
    let report = snapshot.report(5);
    assert_eq!(report.issues.len(), 2);
    assert!(report.recent_jobs.is_empty());
    assert_eq!(report.summary.candidates_this_month, 0);
}

#[test]
fn report_limits_recent_rows() {
    let snapshot = DashboardSnapshot::refresh(&export_source(), &RefreshOptions::default(), as_of());

    let report = snapshot.report(2);
    assert_eq!(report.recent_jobs.len(), 2);
    assert_eq!(report.recent_candidates.len(), 2);
    assert_eq!(report.recent_candidates[0].full_name().as_deref(), Some("Robin Reyes"));

    let payload = serde_json::to_value(&report).expect("report serializes");
    assert!(payload.get("issues").is_none());
    assert_eq!(payload["recent_jobs"][0]["status"], "open");
}
