use super::{CandidateQuery, JobQuery, RawRecord, RecruitingSource, SourceError};
use serde_json::Value;
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum CsvExportError {
    #[error("failed to read export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV export: {0}")]
    Csv(#[from] csv::Error),
}

/// Offline source backed by CSV exports of the jobs and candidates tables.
///
/// Headers are the upstream field names (`dateposted`, `jobid`, ...). Both
/// files are read eagerly; filters from the queries are applied per fetch.
#[derive(Debug, Default, Clone)]
pub struct CsvExportSource {
    jobs: Vec<RawRecord>,
    candidates: Vec<RawRecord>,
}

impl CsvExportSource {
    pub fn from_paths(
        jobs: Option<&Path>,
        candidates: Option<&Path>,
    ) -> Result<Self, CsvExportError> {
        let mut source = Self::default();
        if let Some(path) = jobs {
            source = source.with_jobs(std::fs::File::open(path)?)?;
        }
        if let Some(path) = candidates {
            source = source.with_candidates(std::fs::File::open(path)?)?;
        }
        Ok(source)
    }

    pub fn with_jobs<R: Read>(mut self, reader: R) -> Result<Self, CsvExportError> {
        self.jobs = read_records(reader)?;
        Ok(self)
    }

    pub fn with_candidates<R: Read>(mut self, reader: R) -> Result<Self, CsvExportError> {
        self.candidates = read_records(reader)?;
        Ok(self)
    }
}

impl RecruitingSource for CsvExportSource {
    fn fetch_jobs(&self, query: &JobQuery) -> Result<Vec<RawRecord>, SourceError> {
        let wanted = query.status.as_deref().map(str::trim);
        Ok(self
            .jobs
            .iter()
            .filter(|record| match wanted {
                Some(status) => cell(record, "status")
                    .map(|value| value.eq_ignore_ascii_case(status))
                    .unwrap_or(false),
                None => true,
            })
            .take(query.limit as usize)
            .cloned()
            .collect())
    }

    fn fetch_candidates(&self, query: &CandidateQuery) -> Result<Vec<RawRecord>, SourceError> {
        let wanted = query.job_id.as_deref().map(str::trim);
        Ok(self
            .candidates
            .iter()
            .filter(|record| match wanted {
                Some(job_id) => cell(record, "jobid") == Some(job_id),
                None => true,
            })
            .take(query.limit as usize)
            .cloned()
            .collect())
    }

    fn fetch_workflow_steps(&self, _job_id: &str) -> Result<Vec<RawRecord>, SourceError> {
        Ok(Vec::new())
    }
}

fn cell<'a>(record: &'a RawRecord, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

fn read_records<R: Read>(reader: R) -> Result<Vec<RawRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let record: RawRecord = headers
            .iter()
            .zip(row.iter())
            .filter(|(header, value)| !header.is_empty() && !value.is_empty())
            .map(|(header, value)| (header.clone(), Value::String(value.to_string())))
            .collect();
        records.push(record);
    }

    Ok(records)
}

fn normalize_header(value: &str) -> String {
    value
        .replace(['\u{feff}', '\u{200b}'], "")
        .split_whitespace()
        .collect::<String>()
        .to_ascii_lowercase()
}
