//! Error types
//!
//! Nothing here is fatal to a running game: callers at the storage boundary
//! log these and fall back to defaults.

use thiserror::Error;

/// Failure reading or writing a persisted blob
#[derive(Error, Debug)]
pub enum StorageError {
    /// No storage backend is reachable (private browsing, no window, ...)
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// Backend rejected the operation (quota exceeded, permission denied)
    #[error("storage write for key {key} failed: {reason}")]
    Write { key: String, reason: String },
    /// Filesystem error on the native backend
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    /// Payload was present but not valid JSON for the expected type
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Invalid balance configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning has no obstacle categories")]
    NoCategories,
    #[error("category {kind} spans {lanes} lanes, must be 1..={max}")]
    LaneSpan { kind: String, lanes: u32, max: u32 },
    #[error("category {kind}: {field} min {min} exceeds max {max}")]
    Range {
        kind: String,
        field: &'static str,
        min: f32,
        max: f32,
    },
    #[error("ramp window must be positive, got {0}")]
    RampWindow(f32),
    /// A single value outside its allowed interval, NaN included
    #[error("{scope}: {field} = {value} is outside {min}..{max}")]
    OutOfBounds {
        scope: String,
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("category {0} is listed more than once")]
    DuplicateKind(String),
}

/// Score submission rejected by the session
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    #[error("run is still in progress")]
    NotOver,
    #[error("score already submitted for this run")]
    AlreadySubmitted,
}
