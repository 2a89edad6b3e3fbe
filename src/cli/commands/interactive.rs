use anyhow::Result;
use std::path::PathBuf;

use mathreel::{ GenerationRequest, RenderResult, VideoConfig };

use crate::cli::commands::batch::{ print_summary, run_topics, DEFAULT_TOPICS };
use crate::cli::commands::{ run_request, Outcome, OutputFormat, RunOptions };
use crate::cli::ui;

const MENU: [&str; 4] = [
    "Generate single video",
    "Generate videos for predefined topics",
    "List videos from this session",
    "Exit",
];

/// Menu-driven session; the list of produced files lives only as long as the loop
pub async fn execute(config: &VideoConfig) -> Result<()> {
    ui::print_header("Math Video Generator");
    let mut session_videos: Vec<PathBuf> = Vec::new();

    loop {
        match ui::select_menu(&MENU)? {
            0 => {
                let topic = ui::input_text("Enter math topic to visualize")?;
                if topic.trim().is_empty() {
                    ui::print_warning("No topic provided");
                    continue;
                }
                let difficulty = ui::select_difficulty()?;
                let duration = ui::input_duration(30)?;
                let quality = ui::select_quality()?;

                let request = GenerationRequest::new(topic, difficulty, duration, quality)?;
                match run_request(config, request, RunOptions::default()).await {
                    Ok(Ok(done)) => {
                        ui::print_render_result(&done);
                        session_videos.push(session_path(&done));
                    }
                    Ok(Err(e)) => ui::print_video_error(&e),
                    Err(e) => ui::print_error(&e.to_string()),
                }
            }
            1 => {
                let difficulty = ui::select_difficulty()?;
                let topics: Vec<String> = DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect();
                let entries = run_topics(
                    config,
                    &topics,
                    difficulty,
                    30,
                    Default::default(),
                    OutputFormat::Text
                ).await?;
                print_summary(&entries);
                for entry in &entries {
                    if let Outcome::Done(done) = &entry.outcome {
                        session_videos.push(session_path(done));
                    }
                }
            }
            2 => {
                if session_videos.is_empty() {
                    ui::print_info("No videos generated yet in this session.");
                }
                for (i, path) in session_videos.iter().enumerate() {
                    println!("{}. {}", i + 1, path.display());
                }
            }
            _ => {
                println!("Goodbye!");
                return Ok(());
            }
        }
    }
}

fn session_path(done: &RenderResult) -> PathBuf {
    done.video_path().unwrap_or_else(|| done.scene_path()).clone()
}
