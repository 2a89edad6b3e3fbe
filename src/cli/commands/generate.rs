use anyhow::{ anyhow, Result };
use std::fs;
use std::path::Path;
use std::time::Duration;

use mathreel::{ GenerationRequest, VideoConfig };

use crate::cli::commands::{ run_request, Outcome, OutputFormat, RunOptions };
use crate::cli::ui;

/// Single-video generation command
pub async fn execute(
    config: &VideoConfig,
    prompt: Option<&str>,
    prompt_file: Option<&Path>,
    difficulty_str: &str,
    duration: u32,
    quality_str: &str,
    timeout_secs: Option<u64>,
    show_code: bool,
    format: OutputFormat
) -> Result<()> {
    let prompt = match (prompt, prompt_file) {
        (Some(p), _) => p.to_string(),
        (None, Some(path)) =>
            fs
                ::read_to_string(path)
                .map_err(|e| anyhow!("Failed to read prompt file {}: {}", path.display(), e))?,
        (None, None) => {
            return Err(anyhow!("Provide a prompt with --prompt or --prompt-file"));
        }
    };

    let request = GenerationRequest::new(
        prompt,
        difficulty_str.parse()?,
        duration,
        quality_str.parse()?
    )?;

    let text = format == OutputFormat::Text;
    if text {
        ui::print_header("Generating Math Video");
        ui::print_result("Topic", request.prompt());
        ui::print_result("Difficulty", &request.difficulty().to_string());
        ui::print_result("Duration", &format!("{} seconds", request.duration_secs()));
        ui::print_result("Quality", &request.quality().to_string());
        ui::print_info("This may take a few minutes...");
    }

    let options = RunOptions {
        timeout: timeout_secs.map(Duration::from_secs),
        show_code,
        quiet: !text,
    };
    let result = run_request(config, request, options).await?;

    if !text {
        println!("{}", serde_json::to_string_pretty(&Outcome::from_result(&result))?);
        return result.map(|_| ()).map_err(|e| anyhow!("{}", e.kind()));
    }

    match result {
        Ok(done) => {
            ui::print_render_result(&done);
            Ok(())
        }
        Err(e) => {
            ui::print_video_error(&e);
            Err(anyhow!("Video generation failed"))
        }
    }
}
