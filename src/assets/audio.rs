use std::path::Path;

use crate::foundation::error::{VineError, VineResult};

/// Extensions accepted as audio without probing the file.
pub const AUDIO_EXTENSIONS: [&str; 6] = ["mp3", "wav", "aac", "m4a", "ogg", "flac"];

/// The deeper check consulted for paths the extension allow-list does not cover.
///
/// Implementations must not error: any failure, including a missing file, is `false`.
pub trait AssetValidator {
    fn is_valid_audio(&self, path: &str) -> bool;
}

/// Accepts nothing beyond the extension allow-list. Never touches the filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct RejectingValidator;

impl AssetValidator for RejectingValidator {
    fn is_valid_audio(&self, _path: &str) -> bool {
        false
    }
}

/// Probes with the system `ffprobe` binary and accepts any file with an audio stream.
#[derive(Clone, Copy, Debug, Default)]
pub struct FfprobeValidator;

impl AssetValidator for FfprobeValidator {
    fn is_valid_audio(&self, path: &str) -> bool {
        match probe_has_audio(Path::new(path)) {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!(path, error = %e, "audio probe failed");
                false
            }
        }
    }
}

pub fn has_audio_extension(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            AUDIO_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

/// Accept `path` if its extension is allow-listed, otherwise defer to `validator`.
pub fn check_audio(validator: &dyn AssetValidator, path: &str) -> VineResult<()> {
    if has_audio_extension(path) || validator.is_valid_audio(path) {
        return Ok(());
    }
    tracing::warn!(path, "rejecting audio asset");
    Err(VineError::asset_rejected(format!(
        "invalid audio file: '{path}'"
    )))
}

#[cfg(feature = "media-ffmpeg")]
fn probe_has_audio(source_path: &Path) -> VineResult<bool> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
    }

    #[derive(serde::Deserialize)]
    struct ProbeOut {
        #[serde(default)]
        streams: Vec<ProbeStream>,
    }

    if !source_path.is_file() {
        return Ok(false);
    }

    let out = std::process::Command::new("ffprobe")
        .args(["-v", "error", "-print_format", "json", "-show_streams"])
        .arg(source_path)
        .output()
        .map_err(|e| VineError::asset_rejected(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(VineError::asset_rejected(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| VineError::serde(format!("ffprobe json parse failed: {e}")))?;
    Ok(parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio")))
}

#[cfg(not(feature = "media-ffmpeg"))]
fn probe_has_audio(_source_path: &Path) -> VineResult<bool> {
    Err(VineError::asset_rejected(
        "audio probing requires the 'media-ffmpeg' feature",
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/audio.rs"]
mod tests;
