//! Error types for the wubba assistant

use thiserror::Error;

/// Result type alias for wubba operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the wubba assistant
///
/// Handlers recover from every variant locally by speaking a message;
/// only a missing recognition model at startup is fatal.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Character does not exist (HTTP 404)
    #[error("character {id} not found")]
    NotFound { id: u32 },

    /// Non-404 HTTP failure from the character API
    #[error("API error: status {status}")]
    Api { status: reqwest::StatusCode },

    /// Connection or timeout failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Image decode failure
    #[error("image error: {0}")]
    Image(String),

    /// Audio device or stream error
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech recognition error
    #[error("recognition error: {0}")]
    Recognition(String),

    /// Listening aborted by a manual interrupt
    #[error("listening interrupted")]
    Interrupted,

    /// Speech synthesis error
    #[error("TTS error: {0}")]
    Tts(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
