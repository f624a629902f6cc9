mod wire;

use super::{CandidateQuery, Credentials, JobQuery, RawRecord, RecruitingSource, SourceError};
use reqwest::{StatusCode, Url};
use std::sync::Mutex;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

use wire::{AuthorizeRequest, AuthorizeResponse};

/// Blocking client for the iCIMS `connect` API.
///
/// The source trait is synchronous, so the client owns a small runtime and
/// blocks on the async reqwest calls. Authentication happens on the first
/// fetch; the bearer token is reused until the API rejects it.
pub struct IcimsClient {
    http: reqwest::Client,
    runtime: Runtime,
    credentials: Credentials,
    token: Mutex<Option<String>>,
}

impl IcimsClient {
    pub fn new(credentials: Credentials, timeout: Duration) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| SourceError::Fetch(format!("unable to build HTTP client: {err}")))?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| SourceError::Fetch(format!("HTTP runtime unavailable: {err}")))?;

        Ok(Self {
            http,
            runtime,
            credentials,
            token: Mutex::new(None),
        })
    }

    /// Exchanges the configured credentials for a bearer token and caches it.
    pub fn authenticate(&self) -> Result<(), SourceError> {
        let token = self.request_token()?;
        *self.token_slot() = Some(token);
        Ok(())
    }

    /// `{base}/connect/{segments...}` with every segment percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, SourceError> {
        let base = self.credentials.base_url();
        let mut url = Url::parse(base)
            .map_err(|err| SourceError::Auth(format!("invalid API base URL '{base}': {err}")))?;
        url.path_segments_mut()
            .map_err(|_| SourceError::Auth(format!("API base URL '{base}' cannot carry a path")))?
            .pop_if_empty()
            .push("connect")
            .extend(segments);
        Ok(url)
    }

    fn token_slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn bearer_token(&self) -> Result<String, SourceError> {
        if let Some(token) = self.token_slot().as_ref() {
            return Ok(token.clone());
        }

        let token = self.request_token()?;
        *self.token_slot() = Some(token.clone());
        Ok(token)
    }

    fn request_token(&self) -> Result<String, SourceError> {
        let url = self.url(&["authorize"])?;
        let body = AuthorizeRequest {
            username: self.credentials.username(),
            password: self.credentials.password(),
            customer_id: self.credentials.customer_id(),
        };

        debug!(%url, username = self.credentials.username(), "authenticating");
        let result = self.runtime.block_on(async {
            let response = self.http.post(url.clone()).json(&body).send().await?;
            response
                .error_for_status()?
                .json::<AuthorizeResponse>()
                .await
        });

        let token = result
            .map_err(|err| SourceError::Auth(err.to_string()))?
            .into_token()?;
        info!(customer_id = self.credentials.customer_id(), "authenticated with recruiting API");
        Ok(token)
    }

    fn fetch_list(
        &self,
        segments: &[&str],
        params: &[(&str, String)],
        key: &str,
    ) -> Result<Vec<RawRecord>, SourceError> {
        let url = self.url(segments)?;
        let token = self.bearer_token()?;

        let result = self.runtime.block_on(async {
            let response = self
                .http
                .get(url.clone())
                .bearer_auth(&token)
                .query(params)
                .send()
                .await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, body))
        });

        let (status, body) = result.map_err(|err| SourceError::Fetch(err.to_string()))?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            *self.token_slot() = None;
            return Err(SourceError::Auth(format!("{url} rejected the token ({status})")));
        }
        if !status.is_success() {
            return Err(SourceError::Fetch(format!("{url} returned {status}")));
        }

        let records = wire::extract_records(&body, key)?;
        debug!(%url, count = records.len(), "fetched records");
        Ok(records)
    }
}

impl std::fmt::Debug for IcimsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IcimsClient")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl RecruitingSource for IcimsClient {
    fn fetch_jobs(&self, query: &JobQuery) -> Result<Vec<RawRecord>, SourceError> {
        let mut params = vec![
            ("limit", query.limit.to_string()),
            ("fields", wire::JOB_FIELDS.to_string()),
        ];
        if let Some(status) = &query.status {
            params.push(("status", status.clone()));
        }

        self.fetch_list(&["jobs"], &params, wire::JOBS_KEY)
            .inspect_err(|err| warn!(error = %err, "error fetching jobs"))
    }

    fn fetch_candidates(&self, query: &CandidateQuery) -> Result<Vec<RawRecord>, SourceError> {
        let mut params = vec![
            ("limit", query.limit.to_string()),
            ("fields", wire::CANDIDATE_FIELDS.to_string()),
        ];
        if let Some(job_id) = &query.job_id {
            params.push(("jobid", job_id.clone()));
        }

        self.fetch_list(&["candidates"], &params, wire::CANDIDATES_KEY)
            .inspect_err(|err| warn!(error = %err, "error fetching candidates"))
    }

    fn fetch_workflow_steps(&self, job_id: &str) -> Result<Vec<RawRecord>, SourceError> {
        let job_id = job_id.trim();
        if matches!(job_id, "" | "." | "..") {
            return Err(SourceError::Fetch(format!("'{job_id}' is not a job id")));
        }
        self.fetch_list(&["jobs", job_id, "workflow"], &[], wire::STEPS_KEY)
            .inspect_err(|err| warn!(job_id, error = %err, "error fetching workflow steps"))
    }
}
