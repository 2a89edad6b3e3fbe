use colored::*;
use console::Term;
use dialoguer::{ theme::ColorfulTheme, Input, Select };
use indicatif::{ ProgressBar, ProgressStyle };
use std::time::Duration;
use textwrap::wrap;

use mathreel::errors::{ excerpt, VideoError };
use mathreel::models::{ Difficulty, Quality, RenderResult };

/// Characters of generated code shown in the preview
pub const CODE_PREVIEW_CHARS: usize = 500;

/// UI theme for consistent appearance
pub fn get_theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

/// Print a section header
pub fn print_header(title: &str) {
    let title = format!(" {} ", title);
    println!("\n{}\n", title.bold().white().on_blue());
}

/// Print text with proper wrapping
pub fn print_text(text: &str) {
    let width = Term::stdout().size().1 as usize;
    for line in text.lines() {
        for wrapped_line in wrap(line, width.saturating_sub(10).max(20)) {
            println!("{}", wrapped_line);
        }
    }
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "ERROR:".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "WARNING:".yellow().bold(), message);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "SUCCESS:".green().bold(), message);
}

/// Print information
pub fn print_info(message: &str) {
    println!("{} {}", "INFO:".blue().bold(), message);
}

/// Print a formatted result
pub fn print_result(label: &str, value: &str) {
    println!("{}: {}", label.bold(), value);
}

/// Show the start of the generated scene code
pub fn print_code_preview(code: &str, full: bool) {
    let rule = "-".repeat(50);
    println!("Generated code preview:");
    println!("{}", rule.dimmed());
    if full {
        println!("{}", code);
    } else {
        println!("{}", excerpt(code, CODE_PREVIEW_CHARS));
    }
    println!("{}", rule.dimmed());
}

/// Print the outcome of a single `produce` call
pub fn print_render_result(result: &RenderResult) {
    match result {
        RenderResult::Video { video_path, scene_path } => {
            print_success(&format!("Video created at: {}", video_path.display()));
            print_result("Scene code", &scene_path.display().to_string());
        }
        RenderResult::PartialSuccess { scene_path, reason } => {
            print_warning(reason);
            print_info("Your content was processed, but your video wasn't produced yet.");
            print_result("Scene file", &scene_path.display().to_string());
            print_info("To render the video manually:");
            println!("   1. Install FFmpeg (e.g. winget install Gyan.FFmpeg or apt install ffmpeg)");
            println!("   2. Run: manim render {} --quality m", scene_path.display());
        }
    }
}

/// Print a pipeline error with its kind and any guidance
pub fn print_video_error(err: &VideoError) {
    let report = err.report();
    match err {
        VideoError::RenderSucceededButFileMissing { .. } => print_warning(&report.message),
        VideoError::RenderFailed { stderr, .. } => {
            print_error(&format!("[{}] Rendering failed", report.kind));
            if !stderr.trim().is_empty() {
                println!("{}", "Renderer output:".bold());
                print_text(stderr.trim());
            }
        }
        _ => print_error(&format!("[{}] {}", report.kind, report.message)),
    }
    if let Some(suggestion) = report.suggestion {
        print_info(&suggestion);
    }
}

/// Display a spinner while waiting for an operation to complete
pub fn spinner_with_message(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Interactive selection of a difficulty
pub fn select_difficulty() -> std::io::Result<Difficulty> {
    let levels = vec!["Beginner", "Intermediate", "Advanced"];

    let selection = Select::with_theme(&get_theme())
        .with_prompt("Select difficulty")
        .items(&levels)
        .default(1)
        .interact()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    Ok(match selection {
        0 => Difficulty::Beginner,
        2 => Difficulty::Advanced,
        _ => Difficulty::Intermediate,
    })
}

/// Interactive selection of a quality tier
pub fn select_quality() -> std::io::Result<Quality> {
    let tiers = vec!["Low (480p15)", "Medium (720p30)", "High (1080p60)"];

    let selection = Select::with_theme(&get_theme())
        .with_prompt("Select quality")
        .items(&tiers)
        .default(1)
        .interact()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    Ok(match selection {
        0 => Quality::Low,
        2 => Quality::High,
        _ => Quality::Medium,
    })
}

/// Ask for a free-text value
pub fn input_text(prompt: &str) -> std::io::Result<String> {
    Input::with_theme(&get_theme())
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}

/// Ask for a duration in seconds
pub fn input_duration(default: u32) -> std::io::Result<u32> {
    Input::with_theme(&get_theme())
        .with_prompt("Target duration in seconds")
        .default(default)
        .validate_with(|value: &u32| if *value > 0 { Ok(()) } else { Err("must be positive") })
        .interact_text()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}

/// Top-level menu choice
pub fn select_menu(items: &[&str]) -> std::io::Result<usize> {
    Select::with_theme(&get_theme())
        .with_prompt("What would you like to do?")
        .items(items)
        .default(0)
        .interact()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}
