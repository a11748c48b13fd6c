//! Tempo holiday-scheme adapter.
//!
//! `GET  {base}/holiday-schemes/{scheme}/holidays?year=Y`
//! `POST {base}/holiday-schemes/{scheme}/holidays`
//!
//! Both carry `Authorization: Bearer <token>` and `Content-Type: application/json`.
//! The token is never logged; `Debug` redacts it.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::debug;

use crate::{HolidayListResponse, HolidayStore, NewHoliday, RemoteHoliday, StoreError, WriteOutcome};

pub const DEFAULT_BASE_URL: &str = "https://api.tempo.io/4";

#[derive(Clone)]
pub struct TempoHolidayStore {
    token: String,
    scheme_id: String,
    base_url: String,
    http: Client,
}

impl std::fmt::Debug for TempoHolidayStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TempoHolidayStore")
            .field("token", &"<REDACTED>")
            .field("scheme_id", &self.scheme_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl TempoHolidayStore {
    /// Adapter against the public Tempo API with the transport's default timeout.
    pub fn new(token: impl Into<String>, scheme_id: impl Into<String>) -> Result<Self, StoreError> {
        Self::builder(token, scheme_id).build()
    }

    pub fn builder(token: impl Into<String>, scheme_id: impl Into<String>) -> TempoHolidayStoreBuilder {
        TempoHolidayStoreBuilder {
            token: token.into(),
            scheme_id: scheme_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    fn holidays_url(&self) -> String {
        format!(
            "{}/holiday-schemes/{}/holidays",
            self.base_url.trim_end_matches('/'),
            self.scheme_id
        )
    }
}

#[derive(Debug, Clone)]
pub struct TempoHolidayStoreBuilder {
    token: String,
    scheme_id: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl TempoHolidayStoreBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<TempoHolidayStore, StoreError> {
        if self.token.trim().is_empty() {
            return Err(StoreError::Config("api token is empty".to_string()));
        }
        let scheme_id = self.scheme_id.trim().to_string();
        if scheme_id.is_empty() {
            return Err(StoreError::Config("holiday scheme id is empty".to_string()));
        }
        if self.base_url.trim().is_empty() {
            return Err(StoreError::Config("base url is empty".to_string()));
        }

        let mut builder = Client::builder();
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let http = builder
            .build()
            .map_err(|e| StoreError::Config(format!("http client build failed: {e}")))?;

        Ok(TempoHolidayStore {
            token: self.token,
            scheme_id,
            base_url: self.base_url.trim().to_string(),
            http,
        })
    }
}

impl HolidayStore for TempoHolidayStore {
    fn name(&self) -> &'static str {
        "tempo"
    }

    fn fetch_year(&self, year: i32) -> Result<Vec<RemoteHoliday>, StoreError> {
        let resp = self
            .http
            .get(self.holidays_url())
            .query(&[("year", year.to_string())])
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .map_err(|e| StoreError::Transport(format!("holiday list request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| StoreError::Transport(format!("holiday list body read failed: {e}")))?;

        if !status.is_success() {
            return Err(StoreError::Api {
                code: Some(status.as_u16()),
                message: error_message(&body),
            });
        }

        let parsed: HolidayListResponse = serde_json::from_str(&body)
            .map_err(|e| StoreError::Decode(format!("holiday list for {year}: {e}")))?;

        debug!(
            scheme = %self.scheme_id,
            year,
            count = parsed.results.len(),
            "fetched remote holidays"
        );
        Ok(parsed.results)
    }

    fn create(&self, holiday: &NewHoliday) -> Result<WriteOutcome, StoreError> {
        // `.json()` sets Content-Type: application/json.
        let resp = self
            .http
            .post(self.holidays_url())
            .bearer_auth(&self.token)
            .json(holiday)
            .send()
            .map_err(|e| StoreError::Transport(format!("holiday create request failed: {e}")))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(WriteOutcome::Created);
        }

        // A body we cannot read still leaves a usable status.
        let body = resp.text().unwrap_or_default();
        Ok(WriteOutcome::Rejected {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

/// Tempo reports failures as `{"errors":[{"message":".."}]}`; fall back to the raw body.
#[derive(Debug, Deserialize)]
struct TempoErrorBody {
    #[serde(default)]
    errors: Vec<TempoErrorItem>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TempoErrorItem {
    message: String,
}

fn error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<TempoErrorBody>(body) {
        let msgs: Vec<String> = parsed.errors.into_iter().map(|e| e.message).collect();
        if !msgs.is_empty() {
            return msgs.join("; ");
        }
        if let Some(m) = parsed.message {
            return m;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "unknown".to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}
