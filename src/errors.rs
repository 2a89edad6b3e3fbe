use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::implementations::config::ConfigError;

/// Custom error types for the video pipeline
#[derive(Debug, Error)]
pub enum VideoError {
    #[error("Scene generation failed: {0}")]
    GenerationFailed(String),

    #[error("No Scene class found in generated code: {excerpt}")]
    NoSceneFound { excerpt: String },

    #[error("Rendering failed (exit code {exit_code:?}): {stderr}")]
    RenderFailed { exit_code: Option<i32>, stderr: String },

    #[error("Renderer reported success but no video was found (searched: {searched:?})")]
    RenderSucceededButFileMissing { scene_path: PathBuf, searched: Vec<PathBuf> },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type specific to pipeline operations
pub type VideoResult<T> = Result<T, VideoError>;

/// Stable tag for caller-facing error reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    GenerationFailed,
    NoSceneFound,
    RenderFailed,
    RenderSucceededButFileMissing,
    InvalidRequest,
    Config,
    Io,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            ErrorKind::GenerationFailed => "generation_failed",
            ErrorKind::NoSceneFound => "no_scene_found",
            ErrorKind::RenderFailed => "render_failed",
            ErrorKind::RenderSucceededButFileMissing => "render_succeeded_but_file_missing",
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::Config => "config",
            ErrorKind::Io => "io",
        };
        write!(f, "{}", tag)
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorSeverity {
    Fatal,
    Error,
    Warning,
}

/// Structured error as handed to a caller (CLI output, JSON report)
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub severity: ErrorSeverity,
    pub message: String,
    pub suggestion: Option<String>,
}

impl VideoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VideoError::GenerationFailed(_) => ErrorKind::GenerationFailed,
            VideoError::NoSceneFound { .. } => ErrorKind::NoSceneFound,
            VideoError::RenderFailed { .. } => ErrorKind::RenderFailed,
            VideoError::RenderSucceededButFileMissing { .. } => {
                ErrorKind::RenderSucceededButFileMissing
            }
            VideoError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            VideoError::Config(_) => ErrorKind::Config,
            VideoError::Io(_) => ErrorKind::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            VideoError::RenderSucceededButFileMissing { .. } => ErrorSeverity::Warning,
            VideoError::Config(_) | VideoError::InvalidRequest(_) => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Error,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            severity: self.severity(),
            message: self.to_string(),
            suggestion: self.recovery_strategy(),
        }
    }
}

/// Recoverable vs. non-recoverable errors
pub trait RecoverableError {
    fn is_recoverable(&self) -> bool;
    fn recovery_strategy(&self) -> Option<String>;
}

impl RecoverableError for VideoError {
    /// Whether the user may simply submit the same request again
    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            VideoError::GenerationFailed(_)
                | VideoError::NoSceneFound { .. }
                | VideoError::RenderFailed { .. }
        )
    }

    fn recovery_strategy(&self) -> Option<String> {
        match self {
            VideoError::GenerationFailed(_) =>
                Some("Check your API token and network connection, then try again.".to_string()),
            VideoError::NoSceneFound { .. } =>
                Some("The model did not return a Scene class; try rephrasing the prompt.".to_string()),
            VideoError::RenderFailed { .. } =>
                Some("Inspect the renderer output above; the generated code may contain errors.".to_string()),
            VideoError::RenderSucceededButFileMissing { scene_path, .. } =>
                Some(format!(
                    "The renderer finished but its output was not found; check the media folder or re-render {}",
                    scene_path.display()
                )),
            VideoError::Config(_) =>
                Some("Set GITHUB_TOKEN (or another provider key) in your environment or .env file.".to_string()),
            VideoError::InvalidRequest(_) | VideoError::Io(_) => None,
        }
    }
}

/// Truncate text for diagnostics without splitting a character
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
