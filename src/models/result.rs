use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Successful or degraded outcome of a `produce` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RenderResult {
    /// Rendering produced a video file
    Video { video_path: PathBuf, scene_path: PathBuf },
    /// Code was generated and saved, but the renderer (or its codec) is not installed
    PartialSuccess { scene_path: PathBuf, reason: String },
}

impl RenderResult {
    pub fn scene_path(&self) -> &PathBuf {
        match self {
            RenderResult::Video { scene_path, .. } => scene_path,
            RenderResult::PartialSuccess { scene_path, .. } => scene_path,
        }
    }

    pub fn video_path(&self) -> Option<&PathBuf> {
        match self {
            RenderResult::Video { video_path, .. } => Some(video_path),
            RenderResult::PartialSuccess { .. } => None,
        }
    }
}

/// Progress events emitted while a request moves through the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineStage {
    Requested,
    Generated { chars: usize },
    Sanitized { scene_identifier: String, base_name: String },
    Persisted { scene_path: PathBuf },
    Rendering,
    Locating,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStage::Requested => write!(f, "Generating scene code..."),
            PipelineStage::Generated { chars } =>
                write!(f, "Received {} characters of generated code", chars),
            PipelineStage::Sanitized { scene_identifier, .. } =>
                write!(f, "Found scene class {}", scene_identifier),
            PipelineStage::Persisted { scene_path } =>
                write!(f, "Scene saved to {}", scene_path.display()),
            PipelineStage::Rendering => write!(f, "Rendering video (this may take a few minutes)..."),
            PipelineStage::Locating => write!(f, "Locating rendered video..."),
        }
    }
}
