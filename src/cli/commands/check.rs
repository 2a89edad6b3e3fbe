use anyhow::{ anyhow, Result };
use std::path::Path;

use chrono::{ DateTime, Utc };
use serde::Serialize;

use mathreel::implementations::renderer::ToolStatus;
use mathreel::{ LLMSceneGenerator, ProcessRenderer, VideoConfig };

use crate::cli::commands::OutputFormat;
use crate::cli::ui;

#[derive(Debug, Serialize)]
struct CheckReport {
    checked_at: DateTime<Utc>,
    provider: Option<String>,
    api_key: Option<String>,
    api_key_error: Option<String>,
    tools: Vec<ToolStatus>,
    output_dir: String,
    output_dir_writable: bool,
    ping: Option<Result<String, String>>,
}

impl CheckReport {
    fn ready(&self) -> bool {
        self.api_key.is_some()
            && self.tools.iter().all(|t| t.available)
            && self.output_dir_writable
            && !matches!(self.ping, Some(Err(_)))
    }
}

/// Setup check command
pub async fn execute(config: &VideoConfig, ping: bool, format: OutputFormat) -> Result<()> {
    let (provider, api_key, api_key_error) = match config.generator.get_api_key() {
        Ok((provider, key)) => (Some(provider), Some(mask_key(&key)), None),
        Err(e) => (None, None, Some(e.to_string())),
    };

    let renderer = ProcessRenderer::new(config.renderer.clone());
    let tools = renderer.probe().await;
    let output_dir_writable = check_writable(&config.output_dir).await;

    let ping = if ping && api_key.is_some() {
        let generator = LLMSceneGenerator::new(config.generator.clone())?;
        Some(generator.ping().await.map_err(|e| e.to_string()))
    } else {
        None
    };

    let report = CheckReport {
        checked_at: Utc::now(),
        provider,
        api_key,
        api_key_error,
        tools,
        output_dir: config.output_dir.display().to_string(),
        output_dir_writable,
        ping,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report(&report),
    }

    if report.ready() {
        Ok(())
    } else {
        Err(anyhow!("Setup incomplete"))
    }
}

fn print_report(report: &CheckReport) {
    ui::print_header("Setup Check");

    match (&report.provider, &report.api_key, &report.api_key_error) {
        (Some(provider), Some(key), _) => {
            ui::print_success(&format!("API key found for {}: {}", provider, key));
        }
        (_, _, Some(err)) => {
            ui::print_error(err);
            ui::print_info("Create a .env file with: GITHUB_TOKEN=your_token_here");
        }
        _ => {}
    }

    for tool in &report.tools {
        if tool.available {
            let version = tool.version.as_deref().unwrap_or("unknown version");
            ui::print_success(&format!("{} available ({})", tool.name, version));
        } else {
            let detail = tool.detail.as_deref().unwrap_or("not available");
            ui::print_warning(&format!("{} not usable: {}", tool.name, detail));
        }
    }

    if report.output_dir_writable {
        ui::print_success(&format!("Output directory is writable: {}", report.output_dir));
    } else {
        ui::print_error(&format!("Cannot write to output directory: {}", report.output_dir));
    }

    match &report.ping {
        Some(Ok(answer)) => ui::print_success(&format!("AI response: {}", answer.trim())),
        Some(Err(e)) => ui::print_error(&format!("LLM request failed: {}", e)),
        None => {}
    }

    if report.ready() {
        ui::print_success("Setup complete! You're ready to generate math videos.");
    } else {
        ui::print_warning("Setup incomplete. Please fix the issues above.");
    }
}

/// Show only the first few characters of a secret
pub fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    format!("{}...", visible)
}

async fn check_writable(dir: &Path) -> bool {
    if tokio::fs::create_dir_all(dir).await.is_err() {
        return false;
    }
    let probe = dir.join(".mathreel_write_check");
    let writable = tokio::fs::write(&probe, b"ok").await.is_ok();
    let _ = tokio::fs::remove_file(&probe).await;
    writable
}
