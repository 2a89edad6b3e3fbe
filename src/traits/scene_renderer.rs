use std::path::Path;
use async_trait::async_trait;

use crate::errors::VideoResult;
use crate::models::RenderJob;

/// Captured result of a renderer process that ran to completion
#[derive(Debug, Clone, Default)]
pub struct RenderOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// What happened when the renderer was invoked
#[derive(Debug, Clone)]
pub enum RenderInvocation {
    /// The renderer ran; inspect `success` for the exit status
    Completed(RenderOutput),
    /// The renderer, or a tool it depends on, is not installed
    ToolUnavailable { tool: String, detail: String },
}

/// Turns a persisted scene file into a video
#[async_trait]
pub trait SceneRenderer: Send + Sync {
    /// Run the renderer for `job`, blocking until it exits.
    /// Media is written under `output_dir`.
    async fn render(&self, job: &RenderJob, output_dir: &Path) -> VideoResult<RenderInvocation>;
}
