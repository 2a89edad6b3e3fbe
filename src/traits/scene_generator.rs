use async_trait::async_trait;

use crate::errors::VideoResult;
use crate::models::{ GeneratedArtifact, GenerationRequest };

/// Produces scene-definition source text for a request
#[async_trait]
pub trait SceneCodeGenerator: Send + Sync {
    /// Make exactly one attempt at generating scene code.
    /// Network, auth and empty-answer failures are all `GenerationFailed`.
    async fn generate(&self, request: &GenerationRequest) -> VideoResult<GeneratedArtifact>;
}
