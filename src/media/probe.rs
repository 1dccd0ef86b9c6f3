// FFprobe metadata extraction with typed JSON payloads.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use which::which;

use super::format::{format_bitrate, format_duration, format_resolution, format_size};
use crate::engine::hidden_command;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("ffprobe was not found. Install FFmpeg and make sure it is on PATH.")]
    ToolUnavailable,
    #[error("Failed to probe {path}: {reason}")]
    Failed { path: String, reason: String },
}

#[derive(Debug, Deserialize)]
struct FfprobePayload {
    format: Option<FormatSection>,
    #[serde(default)]
    streams: Vec<StreamSection>,
}

#[derive(Debug, Deserialize)]
struct FormatSection {
    duration: Option<String>,
    size: Option<String>,
    bit_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamSection {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

/// Metadata for one probed file. Every field is optional; the display
/// helpers render the gaps as `N/A`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInfo {
    pub duration_seconds: Option<f64>,
    pub size_bytes: Option<u64>,
    pub bit_rate: Option<f64>,
    pub codec: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl MediaInfo {
    pub fn duration_display(&self) -> String {
        format_duration(self.duration_seconds)
    }

    pub fn size_display(&self) -> String {
        match self.size_bytes {
            Some(size) => format_size(size),
            None => "N/A".to_string(),
        }
    }

    pub fn bitrate_display(&self) -> String {
        format_bitrate(self.bit_rate)
    }

    pub fn resolution_display(&self) -> String {
        format_resolution(self.width, self.height)
    }

    pub fn codec_display(&self) -> String {
        self.codec.clone().unwrap_or_else(|| "N/A".to_string())
    }
}

fn media_info_from_json(raw: &[u8]) -> Result<MediaInfo, serde_json::Error> {
    let payload: FfprobePayload = serde_json::from_slice(raw)?;
    let video = payload
        .streams
        .iter()
        .find(|stream| stream.codec_type.as_deref() == Some("video"));
    let format = payload.format.as_ref();
    Ok(MediaInfo {
        duration_seconds: format
            .and_then(|section| section.duration.as_deref())
            .and_then(|value| value.trim().parse().ok()),
        size_bytes: format
            .and_then(|section| section.size.as_deref())
            .and_then(|value| value.trim().parse().ok()),
        // Container-level bitrate; per-stream rates are often absent.
        bit_rate: format
            .and_then(|section| section.bit_rate.as_deref())
            .and_then(|value| value.trim().parse().ok()),
        codec: video.and_then(|stream| stream.codec_name.clone()),
        width: video.and_then(|stream| stream.width),
        height: video.and_then(|stream| stream.height),
    })
}

#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub info: MediaInfo,
}

/// Wraps a resolved ffprobe binary. Construction resolves the tool once, so
/// a whole batch of probes pays the PATH lookup a single time.
pub struct Prober {
    ffprobe: PathBuf,
}

impl Prober {
    pub fn new() -> Result<Self, ProbeError> {
        let ffprobe = which("ffprobe").map_err(|_| ProbeError::ToolUnavailable)?;
        Ok(Self { ffprobe })
    }

    pub fn with_binary(ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe: ffprobe.into(),
        }
    }

    pub fn probe(&self, path: &Path) -> Result<MediaInfo, ProbeError> {
        let output = hidden_command(&self.ffprobe)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .map_err(|error| ProbeError::Failed {
                path: path.display().to_string(),
                reason: format!("Failed to run ffprobe: {error}"),
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .last()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .unwrap_or("ffprobe exited with an error")
                .to_string();
            return Err(ProbeError::Failed {
                path: path.display().to_string(),
                reason,
            });
        }
        media_info_from_json(&output.stdout).map_err(|error| ProbeError::Failed {
            path: path.display().to_string(),
            reason: format!("Failed to parse ffprobe output: {error}"),
        })
    }

    /// Probes every path, logging one progress line per file. Files that fail
    /// to probe are logged and skipped; the rest still load.
    pub fn probe_all(&self, paths: &[PathBuf], on_line: &mut dyn FnMut(&str)) -> Vec<LoadedFile> {
        let total = paths.len();
        let mut loaded = Vec::with_capacity(total);
        for (index, path) in paths.iter().enumerate() {
            match self.probe(path) {
                Ok(info) => {
                    on_line(&format!("{}/{} - {}", index + 1, total, path.display()));
                    loaded.push(LoadedFile {
                        path: path.clone(),
                        info,
                    });
                }
                Err(error) => on_line(&error.to_string()),
            }
        }
        loaded
    }
}
