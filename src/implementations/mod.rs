pub mod config;
pub mod llm_generator;
pub mod orchestrator;
pub mod output_locator;
pub mod renderer;
pub mod sanitizer;
