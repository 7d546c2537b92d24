use std::path::Path;

use anyhow::Context as _;

use crate::{
    composition::{
        clip::{Clip, MusicConfig, VoiceConfig},
        spec::Specification,
        transition::Transition,
    },
    foundation::{
        error::{VineError, VineResult},
        kind::TrackKind,
    },
    render::renderer::{ExportOptions, Renderer, ensure_parent_dir},
};

/// One drawable clip in back-to-front order.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VisualLayer {
    pub kind: TrackKind,
    pub track: String,
    pub z_order: i32,
    pub clip: Clip,
}

/// One audible clip with its lane gain folded in.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioSegment {
    pub kind: TrackKind,
    pub track: String,
    pub path: String,
    pub start_time: f64,
    /// `None` plays to the end of the source.
    pub end_time: Option<f64>,
    /// Clip volume times track volume.
    pub gain: f64,
    pub fade_in: f64,
    pub fade_out: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<VoiceConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music: Option<MusicConfig>,
}

/// Renderer-ready flattening of a [`Specification`].
///
/// Visual layers list video lanes before text lanes, each in z-order, skipping invisible lanes.
/// Muted audio lanes are left out.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderManifest {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub background_color: String,
    pub duration: f64,
    pub layers: Vec<VisualLayer>,
    pub audio: Vec<AudioSegment>,
    pub transitions: Vec<Transition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<String>,
}

impl RenderManifest {
    pub fn from_spec(spec: &Specification) -> Self {
        let mut layers = Vec::new();
        for kind in [TrackKind::Video, TrackKind::Text] {
            for track in spec.tracks(kind).iter().filter(|t| t.visible) {
                layers.extend(track.clips.iter().map(|clip| VisualLayer {
                    kind,
                    track: track.name.clone(),
                    z_order: track.z_order,
                    clip: clip.clone(),
                }));
            }
        }

        let mut audio = Vec::new();
        for kind in TrackKind::ALL.into_iter().filter(|k| k.is_audio()) {
            for track in spec.tracks(kind).iter().filter(|t| !t.muted) {
                for clip in &track.clips {
                    let Clip::Audio(a) = clip else { continue };
                    audio.push(AudioSegment {
                        kind,
                        track: track.name.clone(),
                        path: a.path.clone(),
                        start_time: a.timing.start_time,
                        end_time: a.timing.end_time(),
                        gain: a.props.volume * track.volume,
                        fade_in: a.props.fade_in,
                        fade_out: a.props.fade_out,
                        voice: a.props.voice_config,
                        music: a.props.music_config,
                    });
                }
            }
        }

        Self {
            title: spec.title.clone(),
            width: spec.width(),
            height: spec.height(),
            fps: spec.fps(),
            background_color: spec.background_color().to_string(),
            duration: spec
                .duration_override()
                .unwrap_or_else(|| spec.total_duration()),
            layers,
            audio,
            transitions: spec.transitions().to_vec(),
            codec: None,
            bitrate: None,
        }
    }

    /// Layers active at `time`, back to front.
    pub fn layers_at(&self, time: f64) -> impl Iterator<Item = &VisualLayer> {
        self.layers.iter().filter(move |l| l.clip.is_active_at(time))
    }
}

/// Renders to a [`RenderManifest`] and exports it as pretty JSON.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManifestRenderer;

impl Renderer for ManifestRenderer {
    type Output = RenderManifest;

    fn render(&mut self, spec: &Specification) -> VineResult<RenderManifest> {
        Ok(RenderManifest::from_spec(spec))
    }

    #[tracing::instrument(skip(self, spec, opts))]
    fn export(
        &mut self,
        spec: &Specification,
        path: &Path,
        opts: &ExportOptions,
    ) -> VineResult<()> {
        if !opts.overwrite && path.exists() {
            return Err(VineError::validation(format!(
                "refusing to overwrite '{}'",
                path.display()
            )));
        }
        let mut manifest = self.render(spec)?;
        manifest.codec = opts.codec.clone();
        manifest.bitrate = opts.bitrate.clone();

        let json = serde_json::to_string_pretty(&manifest)
            .map_err(|e| VineError::serde(format!("render manifest: {e}")))?;
        ensure_parent_dir(path)?;
        std::fs::write(path, json)
            .with_context(|| format!("write render manifest '{}'", path.display()))?;
        tracing::debug!(
            layers = manifest.layers.len(),
            audio = manifest.audio.len(),
            "render manifest written"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/manifest.rs"]
mod tests;
