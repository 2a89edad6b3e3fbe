use anyhow::{ anyhow, Result };
use std::fs;
use std::path::Path;

use chrono::{ DateTime, Utc };
use serde::Serialize;

use mathreel::{ Difficulty, GenerationRequest, Quality, VideoConfig };

use crate::cli::commands::{ run_request, Outcome, OutputFormat, RunOptions };
use crate::cli::ui;

/// Topics used when no topics file is given
pub const DEFAULT_TOPICS: [&str; 4] = [
    "Pythagorean Theorem",
    "Quadratic Functions and Parabolas",
    "Derivatives and Rates of Change",
    "The Unit Circle and Trigonometry",
];

#[derive(Debug, Serialize)]
pub struct BatchEntry {
    pub topic: String,
    pub success: bool,
    pub finished_at: DateTime<Utc>,
    pub outcome: Outcome,
}

/// Batch generation command
pub async fn execute(
    config: &VideoConfig,
    topics_file: Option<&Path>,
    difficulty_str: &str,
    duration: u32,
    quality_str: &str,
    format: OutputFormat
) -> Result<()> {
    let topics = match topics_file {
        Some(path) => load_topics(path)?,
        None => DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect(),
    };
    if topics.is_empty() {
        return Err(anyhow!("No topics to process"));
    }

    let entries = run_topics(
        config,
        &topics,
        difficulty_str.parse()?,
        duration,
        quality_str.parse()?,
        format
    ).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Text => print_summary(&entries),
    }

    if entries.iter().all(|e| e.success) {
        Ok(())
    } else {
        Err(anyhow!("{} of {} videos failed", entries.iter().filter(|e| !e.success).count(), entries.len()))
    }
}

/// Produce one video per topic, sequentially
pub async fn run_topics(
    config: &VideoConfig,
    topics: &[String],
    difficulty: Difficulty,
    duration: u32,
    quality: Quality,
    format: OutputFormat
) -> Result<Vec<BatchEntry>> {
    let text = format == OutputFormat::Text;
    let mut entries = Vec::with_capacity(topics.len());

    for (i, topic) in topics.iter().enumerate() {
        if text {
            ui::print_header(&format!("[{}/{}] {}", i + 1, topics.len(), topic));
        }

        let request = GenerationRequest::new(topic.as_str(), difficulty, duration, quality)?;
        let options = RunOptions { quiet: !text, ..RunOptions::default() };
        let result = run_request(config, request, options).await?;

        if text {
            match &result {
                Ok(done) => ui::print_render_result(done),
                Err(e) => ui::print_video_error(e),
            }
        }

        entries.push(BatchEntry {
            topic: topic.clone(),
            success: result.is_ok(),
            finished_at: Utc::now(),
            outcome: Outcome::from_result(&result),
        });
    }

    Ok(entries)
}

/// One topic per non-empty line; lines starting with '#' are skipped
pub fn load_topics(path: &Path) -> Result<Vec<String>> {
    let content = fs
        ::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read topics file: {}", e))?;
    Ok(
        content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect()
    )
}

pub fn print_summary(entries: &[BatchEntry]) {
    ui::print_header("Summary");
    for entry in entries {
        let status = if entry.success { "✅ Success" } else { "❌ Failed" };
        println!("{}: {}", status, entry.topic);
        match &entry.outcome {
            Outcome::Done(done) => {
                let path = done.video_path().unwrap_or_else(|| done.scene_path());
                println!("   Path: {}", path.display());
            }
            Outcome::Failed { error, .. } => println!("   {}: {}", error.kind, error.message),
        }
    }
}
