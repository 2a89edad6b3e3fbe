use std::path::PathBuf;

use serde::Serialize;

use crate::models::request::QualityPreset;

/// Raw text returned by the generation service
#[derive(Debug, Clone)]
pub struct GeneratedArtifact {
    pub raw_text: String,
    pub model: Option<String>,
}

/// Generated code after fence stripping and header injection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedScene {
    pub code: String,
    pub scene_identifier: String,
}

/// Everything the renderer needs for a single invocation
#[derive(Debug, Clone, Serialize)]
pub struct RenderJob {
    pub base_name: String,
    pub scene_path: PathBuf,
    pub scene_identifier: String,
    pub preset: QualityPreset,
    /// Base name passed to the renderer for the produced file (no extension)
    pub output_file: String,
}

impl RenderJob {
    pub fn new(
        base_name: String,
        scene_path: PathBuf,
        scene_identifier: String,
        preset: QualityPreset
    ) -> Self {
        let output_file = format!("{}_video", base_name);
        Self {
            base_name,
            scene_path,
            scene_identifier,
            preset,
            output_file,
        }
    }

    /// File stem of the scene source, which the renderer uses as its media subfolder
    pub fn scene_file_stem(&self) -> String {
        self.scene_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| format!("{}_scene", self.base_name))
    }
}
