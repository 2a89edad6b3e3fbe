pub mod scene_generator;
pub mod scene_renderer;
pub mod video_orchestrator;

// Re-export traits
pub use scene_generator::SceneCodeGenerator;
pub use scene_renderer::{ RenderInvocation, RenderOutput, SceneRenderer };
pub use video_orchestrator::VideoOrchestrator;
