use std::time::Duration;

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::model::AttendanceRecord;

/// Where attendance records come from. The service only ever reads the whole set.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// `authorization` is the caller's `Authorization` header, forwarded as-is.
    async fn fetch_records(&self, authorization: Option<&str>)
    -> anyhow::Result<Vec<AttendanceRecord>>;
}

/// REST backend that owns the attendance collection.
pub struct BackendClient {
    http: reqwest::Client,
    records_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, records_path: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build backend HTTP client")?;

        Ok(Self {
            http,
            records_url: format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                records_path.trim_start_matches('/')
            ),
        })
    }

    pub fn records_url(&self) -> &str {
        &self.records_url
    }
}

#[async_trait]
impl RecordSource for BackendClient {
    async fn fetch_records(
        &self,
        authorization: Option<&str>,
    ) -> anyhow::Result<Vec<AttendanceRecord>> {
        let mut request = self.http.get(&self.records_url);
        if let Some(value) = authorization {
            request = request.header(reqwest::header::AUTHORIZATION, value);
        }

        debug!(url = %self.records_url, "Fetching attendance records");
        let response = request
            .send()
            .await
            .context("Failed to reach attendance backend")?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Attendance backend responded with {}",
                response.status()
            ));
        }

        let body: Value = response
            .json()
            .await
            .context("Attendance backend returned invalid JSON")?;

        parse_records(body)
    }
}

/// Accepts a bare array or `{ "data": [...] }`. Records that cannot be read are
/// skipped so one bad row does not empty the view.
pub fn parse_records(body: Value) -> anyhow::Result<Vec<AttendanceRecord>> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => return Err(anyhow!("Malformed response: no record array under `data`")),
        },
        other => return Err(anyhow!("Malformed response: expected an array, got {other}")),
    };

    let total = items.len();
    let records: Vec<AttendanceRecord> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index, error = %e, "Skipping unreadable attendance record");
                None
            }
        })
        .collect();

    debug!(total, kept = records.len(), "Parsed attendance records");
    Ok(records)
}
