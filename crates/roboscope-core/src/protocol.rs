//! Wire types shared with the telemetry query service.
//!
//! Field names and shapes follow the upstream catalog exactly; the viewer
//! only ever consumes these, it never defines its own storage format.

use serde::{Deserialize, Serialize};

/// Default number of samples a seek returns when the request doesn't say.
pub const DEFAULT_SEEK_LIMIT: usize = 1000;

/// Hard cap on samples per seek; the service may truncate silently at this.
pub const MAX_SEEK_LIMIT: usize = 10_000;

/// Lifecycle state of a recorded session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Recording,
    Completed,
    Disconnected,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Recording => write!(f, "recording"),
            Self::Completed => write!(f, "completed"),
            Self::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// How a session entered the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionSource {
    #[serde(rename = "live")]
    Live,
    #[serde(rename = "import")]
    Import,
}

impl std::fmt::Display for SessionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Import => write!(f, "import"),
        }
    }
}

/// Task outcome label, when the recording carries one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionOutcome {
    Success,
    Failure,
}

/// One recording in the session catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub source: SessionSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub robot_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    pub start_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
    #[serde(default)]
    pub total_frames: u64,
    pub status: SessionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<SessionOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_reward: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Session {
    /// Total recorded length in seconds. Sessions still recording (or with a
    /// corrupt end marker) report 0 — the viewer treats that as "nothing to
    /// scrub yet" rather than guessing.
    pub fn duration(&self) -> f64 {
        match self.end_time {
            Some(end) if end > self.start_time => end - self.start_time,
            _ => 0.0,
        }
    }
}

/// Catalog listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionListResponse {
    pub sessions: Vec<Session>,
    pub total: usize,
}

/// One raw timestamped record on a topic, as the service returns it.
///
/// `data` stays a raw JSON value here; decoding into numbers is the sample
/// parser's job and unparsable payloads are expected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub session_id: String,
    pub timestamp: f64,
    pub topic: String,
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_index: Option<i64>,
}

/// Data-kind classification of a topic.
///
/// Only numeric topics reach the buffering/rendering engine; image topics
/// are filtered out at the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicKind {
    Numeric,
    Image,
}

impl TopicKind {
    /// Classify an upstream `data_type` tag (`"float32[]"`, `"image_ref"`, ...).
    pub fn from_data_type(data_type: &str) -> Self {
        if data_type == "image_ref" {
            Self::Image
        } else {
            Self::Numeric
        }
    }
}

/// Per-topic catalog entry for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicSummary {
    pub session_id: String,
    pub topic: String,
    pub message_count: u64,
    pub first_time: f64,
    pub last_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_frequency: Option<f64>,
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl TopicSummary {
    pub fn kind(&self) -> TopicKind {
        TopicKind::from_data_type(&self.data_type)
    }
}

/// Time-range query against one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeekRequest {
    pub start_time: f64,
    pub end_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
    #[serde(default = "default_seek_limit")]
    pub limit: usize,
}

fn default_seek_limit() -> usize {
    DEFAULT_SEEK_LIMIT
}

impl SeekRequest {
    pub fn new(start_time: f64, end_time: f64) -> Self {
        Self {
            start_time,
            end_time,
            topics: None,
            limit: DEFAULT_SEEK_LIMIT,
        }
    }

    /// Effective sample cap: requests outside `[1, MAX_SEEK_LIMIT]` clamp.
    pub fn clamped_limit(&self) -> usize {
        self.limit.clamp(1, MAX_SEEK_LIMIT)
    }

    /// A seek over an empty or inverted range can never return anything.
    pub fn is_valid(&self) -> bool {
        self.start_time >= 0.0 && self.end_time > self.start_time
    }
}
