use std::path::{ Path, PathBuf };

use async_trait::async_trait;
use log::{ debug, error, info, warn };
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::UnboundedSender;

use crate::errors::{ VideoError, VideoResult };
use crate::implementations::output_locator::locate_video;
use crate::implementations::sanitizer::{ derive_base_name, sanitize_scene };
use crate::models::{ GenerationRequest, PipelineStage, RenderJob, RenderResult };
use crate::traits::scene_generator::SceneCodeGenerator;
use crate::traits::scene_renderer::{ RenderInvocation, SceneRenderer };
use crate::traits::video_orchestrator::VideoOrchestrator;

/// Runs generate → sanitize → persist → render → locate for one request.
///
/// Concurrent calls whose prompts derive the same base name write to the same
/// scene file; the last writer wins.
pub struct MathVideoOrchestrator<G, R> {
    generator: G,
    renderer: R,
    output_dir: PathBuf,
    scene_extension: String,
    progress: Option<UnboundedSender<PipelineStage>>,
}

impl<G, R> MathVideoOrchestrator<G, R>
    where G: SceneCodeGenerator, R: SceneRenderer
{
    pub fn new(generator: G, renderer: R, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            generator,
            renderer,
            output_dir: output_dir.into(),
            scene_extension: "py".to_string(),
            progress: None,
        }
    }

    pub fn with_scene_extension(mut self, extension: impl Into<String>) -> Self {
        self.scene_extension = extension.into();
        self
    }

    /// Send stage updates to `sender` while `produce` runs
    pub fn with_progress(mut self, sender: UnboundedSender<PipelineStage>) -> Self {
        self.progress = Some(sender);
        self
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// `<output_dir>/<base_name>_scene.<ext>`
    pub fn scene_path_for(&self, base_name: &str) -> PathBuf {
        self.output_dir.join(format!("{}_scene.{}", base_name, self.scene_extension))
    }

    fn report(&self, stage: PipelineStage) {
        debug!("Pipeline stage: {:?}", stage);
        if let Some(sender) = &self.progress {
            // A dropped receiver only means nobody is watching
            let _ = sender.send(stage);
        }
    }

    /// Write the scene source and flush it before the renderer reads it
    async fn persist_scene(&self, path: &Path, code: &str) -> VideoResult<()> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let mut file = tokio::fs::File::create(path).await?;
        file.write_all(code.as_bytes()).await?;
        file.flush().await?;
        file.sync_all().await?;
        info!("Scene code saved to: {}", path.display());
        Ok(())
    }
}

#[async_trait]
impl<G, R> VideoOrchestrator for MathVideoOrchestrator<G, R>
    where G: SceneCodeGenerator, R: SceneRenderer
{
    async fn produce(&self, request: GenerationRequest) -> VideoResult<RenderResult> {
        info!(
            "Producing video for '{}' ({}, {}s, {} quality)",
            request.prompt(),
            request.difficulty(),
            request.duration_secs(),
            request.quality()
        );
        self.report(PipelineStage::Requested);

        let artifact = self.generator.generate(&request).await.map_err(|e| {
            error!("Generation failed: {}", e);
            e
        })?;
        if artifact.raw_text.trim().is_empty() {
            return Err(VideoError::GenerationFailed("Empty response from model".to_string()));
        }
        self.report(PipelineStage::Generated { chars: artifact.raw_text.len() });

        let scene = sanitize_scene(&artifact.raw_text).map_err(|e| {
            error!("{}", e);
            e
        })?;
        let base_name = derive_base_name(request.prompt());
        self.report(PipelineStage::Sanitized {
            scene_identifier: scene.scene_identifier.clone(),
            base_name: base_name.clone(),
        });

        let scene_path = self.scene_path_for(&base_name);
        self.persist_scene(&scene_path, &scene.code).await?;
        self.report(PipelineStage::Persisted { scene_path: scene_path.clone() });

        let job = RenderJob::new(
            base_name,
            scene_path.clone(),
            scene.scene_identifier,
            request.quality().preset()
        );

        self.report(PipelineStage::Rendering);
        let output = match self.renderer.render(&job, &self.output_dir).await? {
            RenderInvocation::Completed(output) => output,
            RenderInvocation::ToolUnavailable { tool, detail } => {
                warn!("{} is not available: {}", tool, detail);
                info!("Scene file kept at {}", scene_path.display());
                return Ok(RenderResult::PartialSuccess {
                    scene_path,
                    reason: format!(
                        "Scene code was generated, but no video was rendered because {} is not installed",
                        tool
                    ),
                });
            }
        };

        if !output.success {
            error!("Rendering failed with exit code {:?}", output.exit_code);
            debug!("Renderer stdout: {}", output.stdout);
            return Err(VideoError::RenderFailed {
                exit_code: output.exit_code,
                stderr: output.stderr,
            });
        }

        self.report(PipelineStage::Locating);
        let located = locate_video(&self.output_dir, &job).await?;
        match located.video {
            Some(video_path) => {
                info!("Video saved to: {}", video_path.display());
                Ok(RenderResult::Video { video_path, scene_path })
            }
            None => {
                warn!("Video file not found in expected location");
                Err(VideoError::RenderSucceededButFileMissing {
                    scene_path,
                    searched: located.searched,
                })
            }
        }
    }
}
