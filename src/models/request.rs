use std::fmt;
use std::str::FromStr;

use serde::{ Deserialize, Serialize };

use crate::errors::{ VideoError, VideoResult };

/// Target audience level of the generated explanation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "beginner"),
            Difficulty::Intermediate => write!(f, "intermediate"),
            Difficulty::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = VideoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(VideoError::InvalidRequest(format!("Unknown difficulty: {}", other))),
        }
    }
}

/// Output quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    #[default]
    Medium,
    High,
}

/// Renderer flag and the resolution/frame-rate folder it renders into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QualityPreset {
    pub flag: &'static str,
    pub folder: &'static str,
}

impl Quality {
    pub fn preset(self) -> QualityPreset {
        match self {
            Quality::Low => QualityPreset { flag: "l", folder: "480p15" },
            Quality::Medium => QualityPreset { flag: "m", folder: "720p30" },
            Quality::High => QualityPreset { flag: "h", folder: "1080p60" },
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Low => write!(f, "low"),
            Quality::Medium => write!(f, "medium"),
            Quality::High => write!(f, "high"),
        }
    }
}

impl FromStr for Quality {
    type Err = VideoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "low_quality" | "l" => Ok(Quality::Low),
            "medium" | "medium_quality" | "m" => Ok(Quality::Medium),
            "high" | "high_quality" | "h" => Ok(Quality::High),
            other => Err(VideoError::InvalidRequest(format!("Unknown quality: {}", other))),
        }
    }
}

/// One request to turn a prompt into a video. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    prompt: String,
    difficulty: Difficulty,
    duration_secs: u32,
    quality: Quality,
}

impl GenerationRequest {
    pub fn new(
        prompt: impl Into<String>,
        difficulty: Difficulty,
        duration_secs: u32,
        quality: Quality
    ) -> VideoResult<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(VideoError::InvalidRequest("Prompt must not be empty".to_string()));
        }
        if duration_secs == 0 {
            return Err(VideoError::InvalidRequest("Duration must be positive".to_string()));
        }

        Ok(Self {
            prompt: prompt.trim().to_string(),
            difficulty,
            duration_secs,
            quality,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }
}
