mod support;

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::time::Duration;

use serde_json::json;

use hiring_pulse::sources::{
    CandidateQuery, Credentials, IcimsClient, JobQuery, RecruitingSource, SourceError,
};

use support::{spawn_upstream, CUSTOMER, PASSWORD};

fn client(addr: SocketAddr, password: &str) -> IcimsClient {
    let credentials = Credentials::new(format!("http://{addr}/"), "svc-dashboard", password, CUSTOMER);
    IcimsClient::new(credentials, Duration::from_secs(5)).expect("client builds")
}

#[test]
fn token_is_fetched_once_and_reused() {
    let (addr, upstream) = spawn_upstream();
    let client = client(addr, PASSWORD);

    let jobs = client
        .fetch_jobs(&JobQuery {
            status: Some("open".into()),
            limit: 5,
        })
        .expect("jobs fetched");
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].get("title"), Some(&json!("Backend Engineer")));

    let query = upstream.last_query().unwrap_or_default();
    assert!(query.contains("limit=5"), "query was {query}");
    assert!(query.contains("status=open"), "query was {query}");
    assert!(query.contains("fields=id%2Ctitle"), "query was {query}");

    let candidates = client
        .fetch_candidates(&CandidateQuery::default())
        .expect("candidates fetched");
    assert_eq!(candidates.len(), 1);
    assert_eq!(upstream.authorizations.load(Ordering::SeqCst), 1);
}

#[test]
fn rejected_token_is_dropped_and_reissued() {
    let (addr, upstream) = spawn_upstream();
    let client = client(addr, PASSWORD);
    client.authenticate().expect("authenticated");

    upstream.reject_next.store(true, Ordering::SeqCst);
    let error = client
        .fetch_jobs(&JobQuery::default())
        .expect_err("token rejected");
    assert!(matches!(error, SourceError::Auth(_)), "got {error:?}");

    client
        .fetch_jobs(&JobQuery::default())
        .expect("second attempt re-authenticates");
    assert_eq!(upstream.authorizations.load(Ordering::SeqCst), 2);
}

#[test]
fn bad_credentials_are_authentication_errors() {
    let (addr, upstream) = spawn_upstream();
    let client = client(addr, "wrong");

    assert!(matches!(client.authenticate(), Err(SourceError::Auth(_))));
    assert!(matches!(
        client.fetch_candidates(&CandidateQuery::default()),
        Err(SourceError::Auth(_))
    ));
    assert_eq!(upstream.authorizations.load(Ordering::SeqCst), 0);
}

#[test]
fn server_errors_are_fetch_errors() {
    let (addr, _upstream) = spawn_upstream();
    let client = client(addr, PASSWORD);

    let error = client
        .fetch_candidates(&CandidateQuery {
            job_id: Some("explode".into()),
            limit: 10,
        })
        .expect_err("upstream failed");
    assert!(matches!(error, SourceError::Fetch(_)), "got {error:?}");
    assert!(error.to_string().contains("500"));
}

#[test]
fn workflow_steps_are_fetched_per_job() {
    let (addr, _upstream) = spawn_upstream();
    let client = client(addr, PASSWORD);

    let steps = client.fetch_workflow_steps(" 42 ").expect("steps fetched");
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[1].get("name"), Some(&json!("Onsite")));

    assert!(matches!(
        client.fetch_workflow_steps("broken"),
        Err(SourceError::Decode(_))
    ));
}

#[test]
fn job_ids_stay_inside_the_workflow_path() {
    let (addr, upstream) = spawn_upstream();
    let client = client(addr, PASSWORD);
    let hostile = "1/../../candidates?jobid=7#";

    let steps = client
        .fetch_workflow_steps(hostile)
        .expect("escaped id reaches the workflow endpoint");

    assert_eq!(steps.len(), 2);
    assert_eq!(upstream.workflow_jobs(), vec![hostile.to_string()]);
    assert!(upstream.last_query().is_none(), "candidates endpoint was hit");
}

#[test]
fn dot_segments_are_not_job_ids() {
    let (addr, upstream) = spawn_upstream();
    let client = client(addr, PASSWORD);

    for job_id in ["", " ", ".", ".."] {
        assert!(matches!(
            client.fetch_workflow_steps(job_id),
            Err(SourceError::Fetch(_))
        ));
    }
    assert!(upstream.workflow_jobs().is_empty());
}

#[test]
fn malformed_base_url_is_an_authentication_error() {
    let credentials = Credentials::new("acme.example.com", "svc-dashboard", PASSWORD, CUSTOMER);
    let client = IcimsClient::new(credentials, Duration::from_secs(5)).expect("client builds");

    assert!(matches!(client.authenticate(), Err(SourceError::Auth(_))));
}
