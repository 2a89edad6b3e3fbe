//! Cleanup of generated scene code and derivation of safe file names.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{ excerpt, VideoError, VideoResult };
use crate::models::SanitizedScene;

/// Import line every scene file must start with
pub const SCENE_HEADER: &str = "from manim import *";

/// Base type a class must extend to be picked up as the scene
pub const SCENE_BASE_TYPE: &str = "Scene";

/// Upper bound on derived base names, keeps `<out>/videos/<stem>/<folder>/<file>` short
pub const MAX_BASE_NAME_CHARS: usize = 50;

/// Base name used when nothing usable survives filename sanitization
pub const FALLBACK_BASE_NAME: &str = "scene";

const NO_SCENE_EXCERPT_CHARS: usize = 200;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```[A-Za-z0-9_+-]*[ \t]*\r?\n?").expect("code fence pattern is valid")
});

// `\w` would also keep combining marks, joiners and connector punctuation
static UNSAFE_FILENAME_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\p{Alphabetic}\p{Nd}_\s-]").expect("filename pattern is valid")
});

static SEPARATOR_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[-\s]+").expect("separator pattern is valid")
});

static SCENE_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"class\s+(\w+)\s*\(\s*{}\s*\)", SCENE_BASE_TYPE)).expect(
        "scene class pattern is valid"
    )
});

/// Remove markdown code fences (with or without a language tag)
pub fn strip_code_fences(code: &str) -> String {
    CODE_FENCE.replace_all(code, "").trim().to_string()
}

/// Prepend the import header unless it is already present
pub fn ensure_header(code: &str) -> String {
    if code.contains(SCENE_HEADER) {
        code.to_string()
    } else {
        format!("{}\n\n{}", SCENE_HEADER, code)
    }
}

/// Turn free text into a filesystem-safe name of letters, digits and underscores
pub fn sanitize_filename(text: &str) -> String {
    let kept = UNSAFE_FILENAME_CHARS.replace_all(text, "");
    let collapsed = SEPARATOR_RUN.replace_all(kept.trim(), "_");

    match collapsed.char_indices().nth(MAX_BASE_NAME_CHARS) {
        Some((idx, _)) => collapsed[..idx].to_string(),
        None => collapsed.into_owned(),
    }
}

/// Base name for a prompt's files; never empty
pub fn derive_base_name(prompt: &str) -> String {
    let name = sanitize_filename(prompt);
    if name.is_empty() {
        FALLBACK_BASE_NAME.to_string()
    } else {
        name
    }
}

/// Name of the first class that extends the scene base type.
///
/// When several match, the first declaration in the text wins.
pub fn extract_scene_identifier(code: &str) -> VideoResult<String> {
    SCENE_CLASS.captures(code)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| VideoError::NoSceneFound {
            excerpt: excerpt(code, NO_SCENE_EXCERPT_CHARS),
        })
}

/// Strip fences, ensure the header and find the scene class
pub fn sanitize_scene(raw: &str) -> VideoResult<SanitizedScene> {
    let code = ensure_header(&strip_code_fences(raw));
    let scene_identifier = extract_scene_identifier(&code)?;

    Ok(SanitizedScene {
        code,
        scene_identifier,
    })
}
