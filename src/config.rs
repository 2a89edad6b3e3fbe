use std::fs;
use std::path::{ Path, PathBuf };

use serde::{ Deserialize, Serialize };

use crate::implementations::config::{ ConfigError, GeneratorConfig, RendererConfig };

/// Configuration for the whole prompt-to-video pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub generator: GeneratorConfig,
    pub renderer: RendererConfig,
    /// Holds generated scene files and the renderer's media tree
    pub output_dir: PathBuf,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            renderer: RendererConfig::default(),
            output_dir: PathBuf::from("math_videos"),
        }
    }
}

impl VideoConfig {
    /// Load configuration from a YAML file; missing sections keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: VideoConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise use defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}
