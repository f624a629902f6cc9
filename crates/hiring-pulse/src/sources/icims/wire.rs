use super::super::{RawRecord, SourceError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub(crate) const JOB_FIELDS: &str =
    "id,title,department,location,status,dateposted,dateclosed,recruiter";
pub(crate) const CANDIDATE_FIELDS: &str =
    "id,firstname,lastname,email,phone,status,source,dateadded,jobid,recruiter";

pub(crate) const JOBS_KEY: &str = "jobs";
pub(crate) const CANDIDATES_KEY: &str = "candidates";
pub(crate) const STEPS_KEY: &str = "steps";

#[derive(Debug, Serialize)]
pub(crate) struct AuthorizeRequest<'a> {
    pub(crate) username: &'a str,
    pub(crate) password: &'a str,
    #[serde(rename = "customerid")]
    pub(crate) customer_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthorizeResponse {
    #[serde(default)]
    access_token: Option<String>,
}

impl AuthorizeResponse {
    pub(crate) fn into_token(self) -> Result<String, SourceError> {
        self.access_token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| SourceError::Auth("response did not include an access token".into()))
    }
}

/// Pulls the record list stored under `key` out of a response envelope.
///
/// A missing or null key is an empty list. Entries that are not JSON objects
/// are dropped.
pub(crate) fn extract_records(body: &[u8], key: &str) -> Result<Vec<RawRecord>, SourceError> {
    let envelope: Value = serde_json::from_slice(body)
        .map_err(|err| SourceError::Decode(format!("response is not valid JSON: {err}")))?;

    let Value::Object(mut envelope) = envelope else {
        return Err(SourceError::Decode(
            "response body is not a JSON object".into(),
        ));
    };

    match envelope.remove(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => {
            let total = items.len();
            let records: Vec<RawRecord> = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(record) => Some(record),
                    _ => None,
                })
                .collect();

            if records.len() < total {
                tracing::warn!(
                    key,
                    dropped = total - records.len(),
                    "ignoring non-object entries in response"
                );
            }

            Ok(records)
        }
        Some(other) => Err(SourceError::Decode(format!(
            "expected '{key}' to be an array, found {}",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
