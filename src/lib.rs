pub mod models;
pub mod traits;
pub mod errors;
pub mod config;
pub mod implementations;
#[cfg(test)]
pub mod tests;

// Re-export core components
pub use config::VideoConfig;
pub use errors::{ ErrorKind, ErrorReport, ErrorSeverity, RecoverableError, VideoError, VideoResult };
pub use implementations::llm_generator::LLMSceneGenerator;
pub use implementations::orchestrator::MathVideoOrchestrator;
pub use implementations::renderer::ProcessRenderer;
pub use models::{
    request::{ Difficulty, GenerationRequest, Quality, QualityPreset },
    artifact::{ GeneratedArtifact, RenderJob, SanitizedScene },
    result::{ PipelineStage, RenderResult },
};
pub use traits::{ RenderInvocation, RenderOutput, SceneCodeGenerator, SceneRenderer, VideoOrchestrator };

/// Orchestrator wired to the real LLM client and renderer process
pub type DefaultOrchestrator = MathVideoOrchestrator<LLMSceneGenerator, ProcessRenderer>;

/// Build the default orchestrator from a loaded configuration
pub fn build_orchestrator(config: &VideoConfig) -> VideoResult<DefaultOrchestrator> {
    let generator = LLMSceneGenerator::new(config.generator.clone())?;
    let renderer = ProcessRenderer::new(config.renderer.clone());
    Ok(
        MathVideoOrchestrator::new(generator, renderer, config.output_dir.clone())
            .with_scene_extension(config.renderer.scene_extension.clone())
    )
}
