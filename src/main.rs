use anyhow::Result;
use clap::Parser;
use log::{ debug, info };

use mathreel::VideoConfig;

mod cli;
use cli::commands::OutputFormat;
use cli::{ Commands, MathreelCli };

#[tokio::main]
async fn main() -> Result<()> {
    // Parse the command line arguments
    let cli = MathreelCli::parse();

    // Setup logging
    setup_logging(&cli.log_level);

    // Environment variables from .env, if present
    match dotenv::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) => debug!("No .env file loaded: {}", e),
    }

    let mut config = VideoConfig::load(cli.config.as_deref())?;
    if let Some(output_dir) = &cli.output_dir {
        config.output_dir = output_dir.clone();
    }
    let format = OutputFormat::parse(&cli.output_format)?;

    if format == OutputFormat::Text {
        println!("Mathreel - Math Video Generator");
    }

    match &cli.command {
        Commands::Generate {
            prompt,
            prompt_file,
            difficulty,
            duration,
            quality,
            timeout,
            show_code,
        } => {
            cli::commands::generate::execute(
                &config,
                prompt.as_deref(),
                prompt_file.as_deref(),
                difficulty,
                *duration,
                quality,
                *timeout,
                *show_code,
                format
            ).await?;
        }

        Commands::Batch { topics_file, difficulty, duration, quality } => {
            cli::commands::batch::execute(
                &config,
                topics_file.as_deref(),
                difficulty,
                *duration,
                quality,
                format
            ).await?;
        }

        Commands::Check { ping } => {
            cli::commands::check::execute(&config, *ping, format).await?;
        }

        Commands::Interactive => {
            cli::commands::interactive::execute(&config).await?;
        }
    }

    Ok(())
}

fn setup_logging(log_level: &str) {
    // Set up the logger based on the log level
    let level = match log_level.to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };

    env_logger::Builder::new().filter_level(level).init();

    info!("Logger initialized with level: {}", log_level);
}
