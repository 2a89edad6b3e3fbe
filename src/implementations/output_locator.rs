use std::path::{ Path, PathBuf };
use std::time::SystemTime;

use log::{ debug, info };

use crate::models::RenderJob;

/// Extension of the videos the renderer produces
pub const VIDEO_EXTENSION: &str = "mp4";

/// Outcome of searching for a rendered video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocateOutcome {
    pub video: Option<PathBuf>,
    /// Directories that were searched, in order
    pub searched: Vec<PathBuf>,
}

/// `<output_dir>/videos/<scene_file_stem>/<resolution_folder>`
pub fn expected_video_dir(output_dir: &Path, job: &RenderJob) -> PathBuf {
    output_dir.join("videos").join(job.scene_file_stem()).join(job.preset.folder)
}

/// Find the video produced for `job`.
///
/// The renderer's quality-specific folder is searched first, preferring the file
/// named after `job.output_file`. Otherwise the newest video directly under
/// `output_dir` is used.
pub async fn locate_video(output_dir: &Path, job: &RenderJob) -> std::io::Result<LocateOutcome> {
    let expected_dir = expected_video_dir(output_dir, job);
    let mut searched = vec![expected_dir.clone()];

    if tokio::fs::metadata(&expected_dir).await.map(|m| m.is_dir()).unwrap_or(false) {
        let named = expected_dir.join(format!("{}.{}", job.output_file, VIDEO_EXTENSION));
        if tokio::fs::metadata(&named).await.map(|m| m.is_file()).unwrap_or(false) {
            info!("Video found at expected path: {}", named.display());
            return Ok(LocateOutcome { video: Some(named), searched });
        }

        if let Some(video) = newest_video_in(&expected_dir).await? {
            info!("Video found in expected folder: {}", video.display());
            return Ok(LocateOutcome { video: Some(video), searched });
        }
    } else {
        debug!("Expected media folder {} does not exist", expected_dir.display());
    }

    searched.push(output_dir.to_path_buf());
    let video = newest_video_in(output_dir).await?;
    match &video {
        Some(path) => info!("Video found in output directory: {}", path.display()),
        None => debug!("No video found in {}", output_dir.display()),
    }

    Ok(LocateOutcome { video, searched })
}

/// Most recently modified video file directly inside `dir`
pub async fn newest_video_in(dir: &Path) -> std::io::Result<Option<PathBuf>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_video = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case(VIDEO_EXTENSION))
            .unwrap_or(false);
        if !is_video {
            continue;
        }

        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        let is_newer = match &newest {
            Some((best, best_path)) => modified > *best || (modified == *best && path > *best_path),
            None => true,
        };
        if is_newer {
            newest = Some((modified, path));
        }
    }

    Ok(newest.map(|(_, path)| path))
}
