use crate::catalog::TrackId;
use thiserror::Error;

/// Failure reported by an audio backend for a single transport request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AudioError {
    #[error("track `{0}` has no audio source")]
    UnknownTrack(TrackId),
    #[error("playback of `{track}` was rejected: {reason}")]
    Rejected { track: TrackId, reason: String },
    #[error("audio output is not available: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{field}` = {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("unknown track `{0}` in config")]
    UnknownTrack(String),
}

impl ConfigError {
    pub(crate) fn check_range(
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    ) -> Result<(), ConfigError> {
        if value.is_finite() && value >= min && value <= max {
            Ok(())
        } else {
            Err(ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            })
        }
    }
}
