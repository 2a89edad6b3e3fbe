use std::time::Duration;

use anyhow::{ anyhow, Result };
use log::{ debug, warn };
use serde::Serialize;
use tokio::sync::mpsc;

use mathreel::errors::ErrorReport;
use mathreel::implementations::sanitizer::derive_base_name;
use mathreel::{ build_orchestrator, GenerationRequest, PipelineStage, RenderResult, VideoConfig, VideoError, VideoOrchestrator };

use crate::cli::ui;

pub mod batch;
pub mod check;
pub mod generate;
pub mod interactive;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(anyhow!("Unsupported output format: {}", other)),
        }
    }
}

/// JSON shape of one finished request
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Done(RenderResult),
    Failed {
        status: &'static str,
        error: ErrorReport,
    },
}

impl Outcome {
    pub fn from_result(result: &Result<RenderResult, VideoError>) -> Self {
        match result {
            Ok(done) => Outcome::Done(done.clone()),
            Err(e) =>
                Outcome::Failed {
                    status: "error",
                    error: e.report(),
                },
        }
    }
}

/// Options that only affect how a single request is driven from the CLI
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub timeout: Option<Duration>,
    pub show_code: bool,
    pub quiet: bool,
}

/// Run one request with a spinner fed by the orchestrator's progress channel.
///
/// The outer error is for CLI-level failures (setup, timeout); the inner result
/// is the pipeline's own outcome.
pub async fn run_request(
    config: &VideoConfig,
    request: GenerationRequest,
    options: RunOptions
) -> Result<Result<RenderResult, VideoError>> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let orchestrator = build_orchestrator(config)?.with_progress(tx);
    let scene_path = orchestrator.scene_path_for(&derive_base_name(request.prompt()));

    let spinner = if options.quiet {
        indicatif::ProgressBar::hidden()
    } else {
        ui::spinner_with_message("Starting...")
    };
    let listener = {
        let spinner = spinner.clone();
        tokio::spawn(async move {
            let mut persisted = false;
            while let Some(stage) = rx.recv().await {
                persisted |= matches!(stage, PipelineStage::Persisted { .. });
                spinner.set_message(stage.to_string());
            }
            persisted
        })
    };

    let produced = match options.timeout {
        Some(limit) =>
            match tokio::time::timeout(limit, orchestrator.produce(request)).await {
                Ok(result) => Some(result),
                Err(_) => None,
            }
        None => Some(orchestrator.produce(request).await),
    };

    // Dropping the orchestrator closes the progress channel
    drop(orchestrator);
    // Only this run's scene file is worth previewing
    let wrote_scene = match listener.await {
        Ok(persisted) => persisted,
        Err(e) => {
            debug!("Progress listener ended abnormally: {}", e);
            false
        }
    };
    spinner.finish_and_clear();

    let result = produced.ok_or_else(|| {
        warn!("Timed out; the renderer process was terminated");
        anyhow!("Timed out after {}s; the render was cancelled", options.timeout.unwrap_or_default().as_secs())
    })?;

    if !options.quiet && wrote_scene {
        if let Ok(code) = tokio::fs::read_to_string(&scene_path).await {
            ui::print_code_preview(&code, options.show_code);
        }
    }

    Ok(result)
}
