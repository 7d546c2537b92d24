use std::{path::Path, str::FromStr};

use anyhow::Context as _;

use crate::{
    composition::{
        clip::{Clip, validate_hex_color},
        track::Track,
        transition::Transition,
    },
    foundation::{
        error::{VineError, VineResult, ensure_non_negative},
        kind::{KindMap, TrackKind},
    },
};

/// Largest accepted canvas edge, in pixels (8K UHD).
pub const MAX_DIMENSION: u32 = 7680;
pub const MAX_FPS: f64 = 120.0;

/// Track lists for every kind.
pub type Lanes = KindMap<Vec<Track>>;

/// Clips active at one instant, grouped by kind.
pub type ActiveClips<'a> = KindMap<Vec<&'a Clip>>;

/// One empty lane per kind, named `<kind>_0`.
pub fn default_lanes() -> Lanes {
    KindMap::from_fn(|kind| vec![Track::new(kind.lane_name(0))])
}

/// Latest finite end time across every clip and transition; `0.0` when nothing ends.
pub(crate) fn max_end_time(lanes: &Lanes, transitions: &[Transition]) -> f64 {
    let clips = lanes
        .iter()
        .flat_map(|(_, tracks)| tracks.iter())
        .map(Track::max_end_time);
    let transitions = transitions.iter().map(Transition::end_time);
    clips.chain(transitions).fold(0.0, f64::max)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Mp4,
    Avi,
    Mov,
    Mkv,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Avi => "avi",
            Self::Mov => "mov",
            Self::Mkv => "mkv",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = VineError;

    fn from_str(s: &str) -> VineResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp4" => Ok(Self::Mp4),
            "avi" => Ok(Self::Avi),
            "mov" => Ok(Self::Mov),
            "mkv" => Ok(Self::Mkv),
            other => Err(VineError::unknown_value(format!(
                "unknown output format '{other}'"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    Medium,
    #[default]
    High,
    Ultra,
}

impl FromStr for Quality {
    type Err = VineError;

    fn from_str(s: &str) -> VineResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "ultra" => Ok(Self::Ultra),
            other => Err(VineError::unknown_value(format!(
                "unknown quality '{other}'"
            ))),
        }
    }
}

fn default_background() -> String {
    "#000000".to_string()
}

/// The finished composition: lanes, transitions and output metadata.
///
/// A specification is independent of the builder that produced it. Editing it never touches
/// sequential cursors; it is plain track and transition bookkeeping. Lanes of every kind are
/// kept in ascending `z_order`, ties in insertion order.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Specification {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    width: u32,
    height: u32,
    fps: f64,
    /// Explicit length override for the renderer; queries never consult it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration: Option<f64>,
    tracks: Lanes,
    #[serde(default)]
    transitions: Vec<Transition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    #[serde(default)]
    output_format: OutputFormat,
    #[serde(default)]
    quality: Quality,
    #[serde(default = "default_background")]
    background_color: String,
}

impl Specification {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            author: None,
            width: 1920,
            height: 1080,
            fps: 30.0,
            duration: None,
            tracks: default_lanes(),
            transitions: Vec::new(),
            output_path: None,
            output_format: OutputFormat::default(),
            quality: Quality::default(),
            background_color: default_background(),
        }
    }

    pub(crate) fn from_parts(
        title: String,
        (width, height, fps): (u32, u32, f64),
        tracks: Lanes,
        transitions: Vec<Transition>,
    ) -> VineResult<Self> {
        let mut spec = Self {
            width,
            height,
            fps,
            tracks,
            transitions,
            ..Self::new(title)
        };
        spec.sort_lanes();
        spec.validate()?;
        Ok(spec)
    }

    pub fn from_json(s: &str) -> VineResult<Self> {
        let mut spec: Self = serde_json::from_str(s)
            .map_err(|e| VineError::serde(format!("specification json: {e}")))?;
        spec.sort_lanes();
        spec.validate()?;
        Ok(spec)
    }

    pub fn from_path(path: &Path) -> VineResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read specification '{}'", path.display()))?;
        Self::from_json(&s)
    }

    pub fn to_json_pretty(&self) -> VineResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| VineError::serde(e.to_string()))
    }

    // ---- canvas and output metadata ----

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn set_canvas(&mut self, width: u32, height: u32, fps: f64) -> VineResult<()> {
        validate_canvas(width, height, fps)?;
        self.width = width;
        self.height = height;
        self.fps = fps;
        Ok(())
    }

    pub fn duration_override(&self) -> Option<f64> {
        self.duration
    }

    pub fn set_duration_override(&mut self, duration: Option<f64>) -> VineResult<()> {
        if let Some(d) = duration {
            ensure_non_negative(d, "duration")?;
        }
        self.duration = duration;
        Ok(())
    }

    pub fn background_color(&self) -> &str {
        &self.background_color
    }

    pub fn set_background_color(&mut self, color: impl Into<String>) -> VineResult<()> {
        let color = color.into();
        validate_hex_color(&color, "background_color")?;
        self.background_color = color;
        Ok(())
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.output_format = format;
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn set_quality(&mut self, quality: Quality) {
        self.quality = quality;
    }

    // ---- tracks ----

    pub fn tracks(&self, kind: TrackKind) -> &[Track] {
        &self.tracks[kind]
    }

    pub fn lanes(&self) -> &Lanes {
        &self.tracks
    }

    /// Append a lane and restore z-order. Duplicate names are allowed.
    ///
    /// The lane and every clip on it are validated first; nothing is added on error.
    pub fn add_track(&mut self, track: Track, kind: TrackKind) -> VineResult<()> {
        track.validate()?;
        if let Some(clip) = track.clips.iter().find(|c| !c.fits(kind)) {
            return Err(VineError::validation(format!(
                "track '{}' holds {clip}, which cannot live on a {kind} lane",
                track.name
            )));
        }
        let lanes = &mut self.tracks[kind];
        lanes.push(track);
        lanes.sort_by_key(|t| t.z_order);
        Ok(())
    }

    /// First lane of `kind` named `name`.
    pub fn track_by_name(&self, name: &str, kind: TrackKind) -> Option<&Track> {
        self.tracks[kind].iter().find(|t| t.name == name)
    }

    /// Mutable access for clip and mix edits. Reorder lanes with [`Self::set_z_order`];
    /// [`Self::validate`] rejects lanes left out of z-order.
    pub fn track_by_name_mut(&mut self, name: &str, kind: TrackKind) -> Option<&mut Track> {
        self.tracks[kind].iter_mut().find(|t| t.name == name)
    }

    /// Move the first lane of `kind` named `name` to `z_order`, restoring lane order.
    pub fn set_z_order(&mut self, name: &str, kind: TrackKind, z_order: i32) -> bool {
        let lanes = &mut self.tracks[kind];
        let Some(track) = lanes.iter_mut().find(|t| t.name == name) else {
            return false;
        };
        track.z_order = z_order;
        lanes.sort_by_key(|t| t.z_order);
        true
    }

    /// Remove the first lane of `kind` named `name`, default lanes included.
    pub fn remove_track(&mut self, name: &str, kind: TrackKind) -> bool {
        let lanes = &mut self.tracks[kind];
        match lanes.iter().position(|t| t.name == name) {
            Some(i) => {
                lanes.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn track_count(&self) -> KindMap<usize> {
        self.tracks.map(|_, tracks| tracks.len())
    }

    pub fn clip_count(&self) -> KindMap<usize> {
        self.tracks
            .map(|_, tracks| tracks.iter().map(|t| t.clips.len()).sum())
    }

    // ---- transitions ----

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn add_transition(&mut self, transition: Transition) -> VineResult<()> {
        transition.validate()?;
        self.transitions.push(transition);
        Ok(())
    }

    pub fn remove_transition(&mut self, index: usize) -> bool {
        if index < self.transitions.len() {
            self.transitions.remove(index);
            true
        } else {
            false
        }
    }

    // ---- time queries ----

    /// Every clip whose window contains `time`, grouped by kind in lane order.
    pub fn active_clips_at(&self, time: f64) -> ActiveClips<'_> {
        self.tracks.map(|_, tracks| {
            tracks
                .iter()
                .flat_map(|t| t.active_clips_at(time))
                .collect()
        })
    }

    pub fn transitions_at(&self, time: f64) -> Vec<&Transition> {
        self.transitions
            .iter()
            .filter(|t| t.is_active_at(time))
            .collect()
    }

    /// Latest finite end across lanes and transitions. Open-ended clips do not extend it.
    pub fn total_duration(&self) -> f64 {
        max_end_time(&self.tracks, &self.transitions)
    }

    // ---- invariants ----

    fn sort_lanes(&mut self) {
        for kind in TrackKind::ALL {
            self.tracks[kind].sort_by_key(|t| t.z_order);
        }
    }

    pub fn validate(&self) -> VineResult<()> {
        validate_canvas(self.width, self.height, self.fps)?;
        validate_hex_color(&self.background_color, "background_color")?;
        if let Some(d) = self.duration {
            ensure_non_negative(d, "duration")?;
        }
        for (kind, tracks) in self.tracks.iter() {
            if tracks.windows(2).any(|w| w[0].z_order > w[1].z_order) {
                return Err(VineError::validation(format!(
                    "{kind} lanes are out of z-order"
                )));
            }
            for track in tracks {
                track.validate()?;
                if let Some(clip) = track.clips.iter().find(|c| !c.fits(kind)) {
                    return Err(VineError::validation(format!(
                        "{kind} track '{}' holds mismatched {clip}",
                        track.name
                    )));
                }
            }
        }
        for (i, t) in self.transitions.iter().enumerate() {
            t.validate().map_err(|e| e.prefixed(format!("transition {i}")))?;
        }
        Ok(())
    }
}

fn validate_canvas(width: u32, height: u32, fps: f64) -> VineResult<()> {
    if !(1..=MAX_DIMENSION).contains(&width) || !(1..=MAX_DIMENSION).contains(&height) {
        return Err(VineError::range(format!(
            "canvas must be within 1..={MAX_DIMENSION} px on each edge (got {width}x{height})"
        )));
    }
    if !fps.is_finite() || !(1.0..=MAX_FPS).contains(&fps) {
        return Err(VineError::range(format!(
            "fps must be within [1, {MAX_FPS}] (got {fps})"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/composition/spec.rs"]
mod tests;
