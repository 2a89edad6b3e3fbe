//! Fake collaborators shared by the pipeline tests.

use std::path::Path;
use std::sync::atomic::{ AtomicUsize, Ordering };
use std::sync::Mutex;

use async_trait::async_trait;
use log::info;

use crate::errors::{ VideoError, VideoResult };
use crate::implementations::output_locator::expected_video_dir;
use crate::models::{ GeneratedArtifact, GenerationRequest, RenderJob };
use crate::traits::{ RenderInvocation, RenderOutput, SceneCodeGenerator, SceneRenderer };

pub const PYTHAGORAS_SCENE: &str = r#"```python
from manim import *

class PythagoreanTheorem(Scene):
    def construct(self):
        title = Text("a^2 + b^2 = c^2")
        self.play(Write(title))
        self.wait(2)
```"#;

pub fn setup() {
    if env_logger::builder().is_test(true).try_init().is_ok() {
        info!("Logger initialized");
    }
}

/// Returns a fixed answer and counts calls
pub struct FakeGenerator {
    answer: Result<String, String>,
    pub calls: AtomicUsize,
}

impl FakeGenerator {
    pub fn answering(text: &str) -> Self {
        Self { answer: Ok(text.to_string()), calls: AtomicUsize::new(0) }
    }

    pub fn failing(message: &str) -> Self {
        Self { answer: Err(message.to_string()), calls: AtomicUsize::new(0) }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SceneCodeGenerator for FakeGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> VideoResult<GeneratedArtifact> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            Ok(text) => Ok(GeneratedArtifact { raw_text: text.clone(), model: None }),
            Err(message) => Err(VideoError::GenerationFailed(message.clone())),
        }
    }
}

/// How the fake renderer behaves
#[derive(Debug, Clone)]
pub enum RenderBehavior {
    /// Exit 0 and write the video where the renderer normally puts it
    WriteExpectedVideo,
    /// Exit 0 and drop a video directly into the output directory
    WriteTopLevelVideo,
    /// Exit 0 without producing anything
    NoFile,
    /// Exit with the given code and stderr
    Exit(i32, String),
    /// The renderer is not installed
    Missing,
}

pub struct FakeRenderer {
    behavior: RenderBehavior,
    pub jobs: Mutex<Vec<RenderJob>>,
}

impl FakeRenderer {
    pub fn new(behavior: RenderBehavior) -> Self {
        Self { behavior, jobs: Mutex::new(Vec::new()) }
    }

    pub fn recorded_jobs(&self) -> Vec<RenderJob> {
        self.jobs.lock().unwrap().clone()
    }
}

fn success() -> RenderOutput {
    RenderOutput { success: true, exit_code: Some(0), ..RenderOutput::default() }
}

#[async_trait]
impl SceneRenderer for FakeRenderer {
    async fn render(&self, job: &RenderJob, output_dir: &Path) -> VideoResult<RenderInvocation> {
        self.jobs.lock().unwrap().push(job.clone());
        assert!(job.scene_path.exists(), "scene file must exist before rendering starts");

        match &self.behavior {
            RenderBehavior::WriteExpectedVideo => {
                let dir = expected_video_dir(output_dir, job);
                std::fs::create_dir_all(&dir)?;
                std::fs::write(dir.join(format!("{}.mp4", job.output_file)), b"video")?;
                Ok(RenderInvocation::Completed(success()))
            }
            RenderBehavior::WriteTopLevelVideo => {
                std::fs::write(output_dir.join("stray.mp4"), b"video")?;
                Ok(RenderInvocation::Completed(success()))
            }
            RenderBehavior::NoFile => Ok(RenderInvocation::Completed(success())),
            RenderBehavior::Exit(code, stderr) =>
                Ok(
                    RenderInvocation::Completed(RenderOutput {
                        success: false,
                        exit_code: Some(*code),
                        stdout: String::new(),
                        stderr: stderr.clone(),
                    })
                ),
            RenderBehavior::Missing =>
                Ok(RenderInvocation::ToolUnavailable {
                    tool: "manim".to_string(),
                    detail: "No such file or directory (os error 2)".to_string(),
                }),
        }
    }
}
