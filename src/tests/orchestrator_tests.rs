#[cfg(test)]
mod tests {
    use log::info;
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    use crate::errors::VideoError;
    use crate::implementations::config::RendererConfig;
    use crate::implementations::orchestrator::MathVideoOrchestrator;
    use crate::implementations::renderer::ProcessRenderer;
    use crate::implementations::sanitizer::SCENE_HEADER;
    use crate::models::{ Difficulty, GenerationRequest, PipelineStage, Quality, RenderResult };
    use crate::tests::support::{
        setup,
        FakeGenerator,
        FakeRenderer,
        RenderBehavior,
        PYTHAGORAS_SCENE,
    };
    use crate::traits::VideoOrchestrator;

    fn pythagoras_request() -> GenerationRequest {
        GenerationRequest::new(
            "Explain the Pythagorean theorem",
            Difficulty::Beginner,
            20,
            Quality::Low
        ).unwrap()
    }

    fn renderer_running(program: &str, base_args: &[&str]) -> ProcessRenderer {
        ProcessRenderer::new(RendererConfig {
            program: program.to_string(),
            base_args: base_args.iter().map(|a| a.to_string()).collect(),
            extra_path_dirs: vec![],
            ..RendererConfig::default()
        })
    }

    #[tokio::test]
    async fn test_produces_video_in_expected_folder() {
        setup();
        let out = TempDir::new().unwrap();
        let orchestrator = MathVideoOrchestrator::new(
            FakeGenerator::answering(PYTHAGORAS_SCENE),
            FakeRenderer::new(RenderBehavior::WriteExpectedVideo),
            out.path()
        );

        let result = orchestrator.produce(pythagoras_request()).await.unwrap();
        info!("Result: {:?}", result);

        let scene_path = out.path().join("Explain_the_Pythagorean_theorem_scene.py");
        let expected_video = out
            .path()
            .join("videos")
            .join("Explain_the_Pythagorean_theorem_scene")
            .join("480p15")
            .join("Explain_the_Pythagorean_theorem_video.mp4");
        assert_eq!(result, RenderResult::Video {
            video_path: expected_video,
            scene_path: scene_path.clone(),
        });

        assert_eq!(orchestrator.generator().call_count(), 1);

        let code = std::fs::read_to_string(&scene_path).unwrap();
        assert!(code.starts_with(SCENE_HEADER));
        assert!(!code.contains("```"));

        let jobs = orchestrator.renderer().recorded_jobs();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].preset.flag, "l");
        assert_eq!(jobs[0].scene_identifier, "PythagoreanTheorem");
        assert_eq!(jobs[0].base_name, "Explain_the_Pythagorean_theorem");
    }

    #[tokio::test]
    async fn test_falls_back_to_top_level_video() {
        setup();
        let out = TempDir::new().unwrap();
        let orchestrator = MathVideoOrchestrator::new(
            FakeGenerator::answering(PYTHAGORAS_SCENE),
            FakeRenderer::new(RenderBehavior::WriteTopLevelVideo),
            out.path()
        );

        let result = orchestrator.produce(pythagoras_request()).await.unwrap();
        assert_eq!(result.video_path(), Some(&out.path().join("stray.mp4")));
    }

    #[tokio::test]
    async fn test_empty_generation_fails_without_rendering() {
        setup();
        let out = TempDir::new().unwrap();
        let orchestrator = MathVideoOrchestrator::new(
            FakeGenerator::answering("   \n  "),
            FakeRenderer::new(RenderBehavior::WriteExpectedVideo),
            out.path()
        );

        let err = orchestrator.produce(pythagoras_request()).await.unwrap_err();
        assert!(matches!(err, VideoError::GenerationFailed(_)));
        assert!(orchestrator.renderer().recorded_jobs().is_empty());
    }

    #[tokio::test]
    async fn test_generator_error_is_not_retried() {
        setup();
        let out = TempDir::new().unwrap();
        let orchestrator = MathVideoOrchestrator::new(
            FakeGenerator::failing("HTTP error: 401 - bad credentials"),
            FakeRenderer::new(RenderBehavior::WriteExpectedVideo),
            out.path()
        );

        let err = orchestrator.produce(pythagoras_request()).await.unwrap_err();
        assert!(matches!(err, VideoError::GenerationFailed(ref m) if m.contains("401")));
        assert_eq!(orchestrator.generator().call_count(), 1);
        assert!(orchestrator.renderer().recorded_jobs().is_empty());
    }

    #[tokio::test]
    async fn test_code_without_scene_is_rejected_before_writing() {
        setup();
        let out = TempDir::new().unwrap();
        let orchestrator = MathVideoOrchestrator::new(
            FakeGenerator::answering("Sorry, I cannot help with that."),
            FakeRenderer::new(RenderBehavior::WriteExpectedVideo),
            out.path()
        );

        let err = orchestrator.produce(pythagoras_request()).await.unwrap_err();
        assert!(matches!(err, VideoError::NoSceneFound { .. }));
        assert!(orchestrator.renderer().recorded_jobs().is_empty());
        assert!(!out.path().join("Explain_the_Pythagorean_theorem_scene.py").exists());
    }

    #[tokio::test]
    async fn test_missing_renderer_returns_scene_file() {
        setup();
        let out = TempDir::new().unwrap();
        let orchestrator = MathVideoOrchestrator::new(
            FakeGenerator::answering(PYTHAGORAS_SCENE),
            FakeRenderer::new(RenderBehavior::Missing),
            out.path()
        );

        match orchestrator.produce(pythagoras_request()).await.unwrap() {
            RenderResult::PartialSuccess { scene_path, reason } => {
                assert!(scene_path.exists());
                assert!(reason.contains("manim"));
            }
            other => panic!("expected partial success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_uninstalled_renderer_executable_is_partial_success() {
        setup();
        let out = TempDir::new().unwrap();
        let orchestrator = MathVideoOrchestrator::new(
            FakeGenerator::answering(PYTHAGORAS_SCENE),
            renderer_running("mathreel-renderer-that-does-not-exist", &["render"]),
            out.path()
        );

        let result = orchestrator.produce(pythagoras_request()).await.unwrap();
        assert_eq!(result.video_path(), None);
        assert_eq!(
            result.scene_path(),
            &out.path().join("Explain_the_Pythagorean_theorem_scene.py")
        );
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_render_failed() {
        setup();
        let out = TempDir::new().unwrap();
        let orchestrator = MathVideoOrchestrator::new(
            FakeGenerator::answering(PYTHAGORAS_SCENE),
            FakeRenderer::new(RenderBehavior::Exit(1, "NameError: name 'Wrte' is not defined".into())),
            out.path()
        );

        match orchestrator.produce(pythagoras_request()).await.unwrap_err() {
            VideoError::RenderFailed { exit_code, stderr } => {
                assert_eq!(exit_code, Some(1));
                assert!(stderr.contains("NameError"));
            }
            other => panic!("expected RenderFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_success_without_file_is_distinct_from_failure() {
        setup();
        let out = TempDir::new().unwrap();
        let orchestrator = MathVideoOrchestrator::new(
            FakeGenerator::answering(PYTHAGORAS_SCENE),
            FakeRenderer::new(RenderBehavior::NoFile),
            out.path()
        );

        match orchestrator.produce(pythagoras_request()).await.unwrap_err() {
            VideoError::RenderSucceededButFileMissing { scene_path, searched } => {
                assert!(scene_path.exists());
                assert_eq!(searched.len(), 2);
                assert!(searched[0].ends_with("Explain_the_Pythagorean_theorem_scene/480p15"));
                assert_eq!(searched[1], out.path());
            }
            other => panic!("expected RenderSucceededButFileMissing, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_progress_reports_each_stage_in_order() {
        setup();
        let out = TempDir::new().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let orchestrator = MathVideoOrchestrator::new(
            FakeGenerator::answering(PYTHAGORAS_SCENE),
            FakeRenderer::new(RenderBehavior::WriteExpectedVideo),
            out.path()
        ).with_progress(tx);

        orchestrator.produce(pythagoras_request()).await.unwrap();
        drop(orchestrator);

        let mut stages = Vec::new();
        while let Some(stage) = rx.recv().await {
            stages.push(stage);
        }

        assert_eq!(stages.len(), 6);
        assert_eq!(stages[0], PipelineStage::Requested);
        assert!(matches!(stages[1], PipelineStage::Generated { .. }));
        assert!(
            matches!(stages[2], PipelineStage::Sanitized { ref scene_identifier, .. } if scene_identifier == "PythagoreanTheorem")
        );
        assert!(matches!(stages[3], PipelineStage::Persisted { .. }));
        assert_eq!(stages[4], PipelineStage::Rendering);
        assert_eq!(stages[5], PipelineStage::Locating);
    }

    #[tokio::test]
    async fn test_failed_write_reports_no_persisted_stage() {
        setup();
        let dir = TempDir::new().unwrap();
        let blocked = dir.path().join("not_a_dir");
        std::fs::write(&blocked, "plain file").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let renderer = FakeRenderer::new(RenderBehavior::WriteExpectedVideo);
        let orchestrator = MathVideoOrchestrator::new(
            FakeGenerator::answering(PYTHAGORAS_SCENE),
            renderer,
            blocked.clone()
        ).with_progress(tx);

        let err = orchestrator.produce(pythagoras_request()).await.unwrap_err();
        assert!(matches!(err, VideoError::Io(_)));
        assert!(orchestrator.renderer().recorded_jobs().is_empty());
        drop(orchestrator);

        let mut stages = Vec::new();
        while let Some(stage) = rx.recv().await {
            stages.push(stage);
        }
        info!("Stages before the failed write: {:?}", stages);
        assert!(!stages.iter().any(|s| matches!(s, PipelineStage::Persisted { .. })));
        assert!(!stages.contains(&PipelineStage::Rendering));
    }

    #[tokio::test]
    async fn test_same_prompt_overwrites_scene_file() {
        setup();
        let out = TempDir::new().unwrap();
        let first = MathVideoOrchestrator::new(
            FakeGenerator::answering("class First(Scene):\n    pass"),
            FakeRenderer::new(RenderBehavior::Missing),
            out.path()
        );
        let second = MathVideoOrchestrator::new(
            FakeGenerator::answering("class Second(Scene):\n    pass"),
            FakeRenderer::new(RenderBehavior::Missing),
            out.path()
        );

        let a = first.produce(pythagoras_request()).await.unwrap();
        let b = second.produce(pythagoras_request()).await.unwrap();
        assert_eq!(a.scene_path(), b.scene_path());

        let code = std::fs::read_to_string(b.scene_path()).unwrap();
        assert!(code.contains("class Second(Scene)"));
        assert!(!code.contains("class First(Scene)"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_real_process_success_without_output() {
        setup();
        let out = TempDir::new().unwrap();
        let orchestrator = MathVideoOrchestrator::new(
            FakeGenerator::answering(PYTHAGORAS_SCENE),
            renderer_running("true", &[]),
            out.path()
        );

        let err = orchestrator.produce(pythagoras_request()).await.unwrap_err();
        assert!(matches!(err, VideoError::RenderSucceededButFileMissing { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_real_process_failure() {
        setup();
        let out = TempDir::new().unwrap();
        let orchestrator = MathVideoOrchestrator::new(
            FakeGenerator::answering(PYTHAGORAS_SCENE),
            renderer_running("false", &[]),
            out.path()
        );

        let err = orchestrator.produce(pythagoras_request()).await.unwrap_err();
        assert!(matches!(err, VideoError::RenderFailed { exit_code: Some(1), .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_missing_codec_is_partial_success() {
        setup();
        let out = TempDir::new().unwrap();
        let orchestrator = MathVideoOrchestrator::new(
            FakeGenerator::answering(PYTHAGORAS_SCENE),
            renderer_running("sh", &["-c", "echo 'ffmpeg: command not found' >&2; exit 127", "sh"]),
            out.path()
        );

        match orchestrator.produce(pythagoras_request()).await.unwrap() {
            RenderResult::PartialSuccess { reason, .. } => assert!(reason.contains("ffmpeg")),
            other => panic!("expected partial success, got {:?}", other),
        }
    }
}
