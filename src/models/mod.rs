pub mod request;
pub mod artifact;
pub mod result;

// Re-export common model types
pub use request::{ Difficulty, GenerationRequest, Quality, QualityPreset };
pub use artifact::{ GeneratedArtifact, RenderJob, SanitizedScene };
pub use result::{ PipelineStage, RenderResult };
