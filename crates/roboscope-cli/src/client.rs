//! Blocking HTTP client for the telemetry query service.
//!
//! One thin wrapper per endpoint; responses deserialize straight into the
//! core wire types. Errors keep the upstream `detail` message when the
//! service sends one.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use roboscope_core::protocol::{
    Message, SeekRequest, Session, SessionListResponse, TopicSummary,
};

#[derive(Debug)]
pub enum ClientError {
    /// Transport-level failure: connection refused, timeout, bad URL.
    Http(reqwest::Error),
    /// The service answered with a non-success status.
    Api { status: u16, detail: String },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "{e}"),
            Self::Api { status, detail } => write!(f, "server returned {status}: {detail}"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

/// Error body in the upstream service's shape.
#[derive(Deserialize)]
struct ErrorDetail {
    detail: String,
}

pub struct Client {
    base: String,
    http: reqwest::blocking::Client,
}

impl Client {
    pub fn new(server: &str) -> Self {
        Self {
            base: server.trim_end_matches('/').to_string(),
            http: reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn check<T: DeserializeOwned>(
        &self,
        response: reqwest::blocking::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorDetail>()
                .map(|e| e.detail)
                .unwrap_or_else(|_| status.to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(response.json::<T>()?)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        log::debug!("GET {}{path}", self.base);
        let response = self.http.get(format!("{}{path}", self.base)).send()?;
        self.check(response)
    }

    pub fn list_sessions(&self, source: Option<&str>) -> Result<SessionListResponse, ClientError> {
        let path = match source {
            Some(s) => format!("/sessions?source={s}"),
            None => "/sessions".to_string(),
        };
        self.get_json(&path)
    }

    pub fn get_session(&self, session_id: &str) -> Result<Session, ClientError> {
        self.get_json(&format!("/sessions/{session_id}"))
    }

    pub fn topics(&self, session_id: &str) -> Result<Vec<TopicSummary>, ClientError> {
        self.get_json(&format!("/sessions/{session_id}/topics"))
    }

    pub fn seek(&self, session_id: &str, req: &SeekRequest) -> Result<Vec<Message>, ClientError> {
        log::debug!(
            "POST {}/sessions/{session_id}/seek [{:.2}, {:.2}]",
            self.base,
            req.start_time,
            req.end_time
        );
        let response = self
            .http
            .post(format!("{}/sessions/{session_id}/seek", self.base))
            .json(req)
            .send()?;
        self.check(response)
    }

    /// Full session archive as raw JSON text, ready to write to disk.
    pub fn export_raw(&self, session_id: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .get(format!("{}/sessions/{session_id}/export", self.base))
            .send()?;
        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorDetail>()
                .map(|e| e.detail)
                .unwrap_or_else(|_| status.to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(response.text()?)
    }
}
