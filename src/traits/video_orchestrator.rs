use async_trait::async_trait;

use crate::errors::VideoResult;
use crate::models::{ GenerationRequest, RenderResult };

/// Main trait that ties generation and rendering together
#[async_trait]
pub trait VideoOrchestrator: Send + Sync {
    /// Turn one request into a video (or a saved scene file when the renderer
    /// is unavailable). Every call is a single attempt; nothing is retried.
    async fn produce(&self, request: GenerationRequest) -> VideoResult<RenderResult>;
}
