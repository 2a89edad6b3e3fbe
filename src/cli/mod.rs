use clap::{ Parser, Subcommand };
use std::path::PathBuf;

pub mod commands;
pub mod ui;

#[derive(Parser)]
#[command(
    name = "mathreel",
    about = "Turns a math prompt into an animated explainer video",
    version,
    author,
    long_about = None
)]
pub struct MathreelCli {
    /// Sets the log level (error, warn, info, debug, trace)
    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    /// Path to YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    pub output_format: String,

    /// Directory for generated scenes and rendered media (overrides config)
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a single video from a prompt
    Generate {
        /// Mathematical topic or text to visualize
        #[arg(short, long, conflicts_with = "prompt_file")]
        prompt: Option<String>,

        /// Read the prompt from a file instead
        #[arg(long)]
        prompt_file: Option<PathBuf>,

        /// Difficulty level (beginner, intermediate, advanced)
        #[arg(short, long, default_value = "intermediate")]
        difficulty: String,

        /// Target duration in seconds
        #[arg(short = 't', long, default_value = "30")]
        duration: u32,

        /// Video quality (low, medium, high)
        #[arg(short, long, default_value = "medium")]
        quality: String,

        /// Stop waiting (and kill the renderer) after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Print the full generated scene code
        #[arg(long, default_value = "false")]
        show_code: bool,
    },

    /// Generate one video per topic
    Batch {
        /// File with one topic per line (defaults to the built-in topics)
        #[arg(short = 'f', long)]
        topics_file: Option<PathBuf>,

        /// Difficulty level for every video
        #[arg(short, long, default_value = "intermediate")]
        difficulty: String,

        /// Target duration in seconds
        #[arg(short = 't', long, default_value = "30")]
        duration: u32,

        /// Video quality (low, medium, high)
        #[arg(short, long, default_value = "medium")]
        quality: String,
    },

    /// Check API credentials and renderer installation
    Check {
        /// Also send a tiny request to the LLM endpoint
        #[arg(long, default_value = "false")]
        ping: bool,
    },

    /// Menu-driven session
    Interactive,
}
