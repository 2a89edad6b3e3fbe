use std::ffi::OsString;
use std::path::{ Path, PathBuf };
use std::process::Stdio;

use async_trait::async_trait;
use log::{ debug, info, warn };
use serde::Serialize;
use tokio::process::Command;

use crate::errors::VideoResult;
use crate::implementations::config::RendererConfig;
use crate::models::RenderJob;
use crate::traits::scene_renderer::{ RenderInvocation, RenderOutput, SceneRenderer };

/// Stderr phrases that mean a required tool could not be found
const MISSING_TOOL_MARKERS: [&str; 4] = [
    "not found",
    "no such file",
    "is not recognized",
    "could not find",
];

/// Availability of an external tool, as reported by `probe`
#[derive(Debug, Clone, Serialize)]
pub struct ToolStatus {
    pub name: String,
    pub available: bool,
    pub version: Option<String>,
    pub detail: Option<String>,
}

/// Kills the renderer's process group unless disarmed once the renderer has exited.
///
/// `kill_on_drop` only reaches the direct child; the codec processes it starts
/// share its group.
struct ProcessGroupGuard {
    pgid: Option<u32>,
}

impl ProcessGroupGuard {
    fn new(pgid: Option<u32>) -> Self {
        Self { pgid }
    }

    fn disarm(mut self) {
        self.pgid = None;
    }
}

impl Drop for ProcessGroupGuard {
    fn drop(&mut self) {
        if let Some(pgid) = self.pgid.take() {
            debug!("Render abandoned, killing process group {}", pgid);
            kill_process_group(pgid);
        }
    }
}

#[cfg(unix)]
fn kill_process_group(pgid: u32) {
    // Safety: killpg only sends a signal to the group created for this render.
    let ret = unsafe { libc::killpg(pgid as libc::pid_t, libc::SIGKILL) };
    if ret != 0 {
        debug!("killpg({}) failed: {}", pgid, std::io::Error::last_os_error());
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pgid: u32) {}

/// Renders scenes by running the renderer executable as a subprocess
#[derive(Debug, Clone)]
pub struct ProcessRenderer {
    config: RendererConfig,
}

impl ProcessRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Arguments for one render: `<base_args> <scene> <Scene> --quality <q> --output_file <name> --media_dir <out>`
    pub fn build_args(&self, job: &RenderJob, output_dir: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.config.base_args.iter().map(OsString::from).collect();
        args.push(job.scene_path.clone().into_os_string());
        args.push(OsString::from(&job.scene_identifier));
        args.push(OsString::from("--quality"));
        args.push(OsString::from(job.preset.flag));
        args.push(OsString::from("--output_file"));
        args.push(OsString::from(&job.output_file));
        args.push(OsString::from("--media_dir"));
        args.push(output_dir.as_os_str().to_os_string());
        args
    }

    /// PATH for the child with any existing `extra_path_dirs` in front
    fn child_path(&self) -> Option<OsString> {
        let extra: Vec<PathBuf> = self.config.extra_path_dirs
            .iter()
            .filter(|dir| dir.is_dir())
            .cloned()
            .collect();
        if extra.is_empty() {
            return None;
        }

        for dir in &extra {
            debug!("Adding {} to renderer PATH", dir.display());
        }

        let current = std::env::var_os("PATH").unwrap_or_default();
        let paths = extra.into_iter().chain(std::env::split_paths(&current));
        match std::env::join_paths(paths) {
            Ok(joined) => Some(joined),
            Err(e) => {
                warn!("Could not extend PATH for renderer: {}", e);
                None
            }
        }
    }

    fn command(&self, program: &str) -> Command {
        let mut cmd = Command::new(program);
        cmd.stdin(Stdio::null()).kill_on_drop(true);
        if let Some(path) = self.child_path() {
            cmd.env("PATH", path);
        }
        cmd
    }

    /// True when `stderr` says the codec tool is missing
    fn reports_missing_codec(&self, stderr: &str) -> bool {
        let codec = self.config.codec_tool.to_lowercase();
        stderr
            .lines()
            .map(str::to_lowercase)
            .any(|line| {
                line.contains(&codec) && MISSING_TOOL_MARKERS.iter().any(|m| line.contains(m))
            })
    }

    /// Check that the renderer and its codec tool can be launched
    pub async fn probe(&self) -> Vec<ToolStatus> {
        vec![
            self.probe_tool(&self.config.program, "--version").await,
            self.probe_tool(&self.config.codec_tool, "-version").await
        ]
    }

    async fn probe_tool(&self, program: &str, version_flag: &str) -> ToolStatus {
        match self.command(program).arg(version_flag).output().await {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let version = stdout
                    .lines()
                    .map(str::trim)
                    .find(|l| !l.is_empty())
                    .map(str::to_string);
                ToolStatus {
                    name: program.to_string(),
                    available: output.status.success(),
                    version,
                    detail: if output.status.success() {
                        None
                    } else {
                        Some(String::from_utf8_lossy(&output.stderr).trim().to_string())
                    },
                }
            }
            Err(e) =>
                ToolStatus {
                    name: program.to_string(),
                    available: false,
                    version: None,
                    detail: Some(e.to_string()),
                },
        }
    }
}

#[async_trait]
impl SceneRenderer for ProcessRenderer {
    async fn render(&self, job: &RenderJob, output_dir: &Path) -> VideoResult<RenderInvocation> {
        let args = self.build_args(job, output_dir);
        info!(
            "Rendering {} from {} with {} (quality {})",
            job.scene_identifier,
            job.scene_path.display(),
            self.config.program,
            job.preset.flag
        );
        debug!("Renderer arguments: {:?}", args);

        let mut cmd = self.command(&self.config.program);
        cmd.args(&args).stdout(Stdio::piped()).stderr(Stdio::piped());
        #[cfg(unix)]
        cmd.process_group(0);

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!("Could not launch renderer {}: {}", self.config.program, e);
                return Ok(RenderInvocation::ToolUnavailable {
                    tool: self.config.program.clone(),
                    detail: e.to_string(),
                });
            }
        };

        // Dropping this future before the renderer exits takes its helpers down too
        let group = ProcessGroupGuard::new(child.id());
        let output = child.wait_with_output().await?;
        group.disarm();

        let result = RenderOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        debug!("Renderer exited with {:?}", result.exit_code);

        if !result.success && self.reports_missing_codec(&result.stderr) {
            warn!("Renderer could not find {}", self.config.codec_tool);
            return Ok(RenderInvocation::ToolUnavailable {
                tool: self.config.codec_tool.clone(),
                detail: result.stderr,
            });
        }

        Ok(RenderInvocation::Completed(result))
    }
}
