use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use crate::foundation::error::{VineError, VineResult};

/// One of the five parallel track families of a timeline.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    /// Image lanes.
    Video,
    /// Background music lanes.
    Music,
    /// Narration lanes.
    Voice,
    /// Sound-effect lanes.
    Sfx,
    /// Text overlay lanes.
    Text,
}

impl TrackKind {
    /// Every kind, in canonical order.
    pub const ALL: [TrackKind; 5] = [
        TrackKind::Video,
        TrackKind::Music,
        TrackKind::Voice,
        TrackKind::Sfx,
        TrackKind::Text,
    ];

    /// Lowercase name, also used as the lane-name prefix (`video_0`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Music => "music",
            Self::Voice => "voice",
            Self::Sfx => "sfx",
            Self::Text => "text",
        }
    }

    /// Whether lanes of this kind carry audio clips.
    pub fn is_audio(self) -> bool {
        matches!(self, Self::Music | Self::Voice | Self::Sfx)
    }

    /// Name of the `index`-th lane of this kind.
    pub fn lane_name(self, index: usize) -> String {
        format!("{}_{index}", self.as_str())
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackKind {
    type Err = VineError;

    fn from_str(s: &str) -> VineResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(Self::Video),
            "music" => Ok(Self::Music),
            "voice" => Ok(Self::Voice),
            "sfx" => Ok(Self::Sfx),
            "text" => Ok(Self::Text),
            other => Err(VineError::unknown_value(format!(
                "unknown track kind '{other}'"
            ))),
        }
    }
}

/// The audio subset of [`TrackKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioKind {
    /// Narration.
    Voice,
    /// Background music.
    Music,
    /// Sound effects.
    Sfx,
}

impl From<AudioKind> for TrackKind {
    fn from(kind: AudioKind) -> Self {
        match kind {
            AudioKind::Voice => TrackKind::Voice,
            AudioKind::Music => TrackKind::Music,
            AudioKind::Sfx => TrackKind::Sfx,
        }
    }
}

impl fmt::Display for AudioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        TrackKind::from(*self).fmt(f)
    }
}

/// One value per [`TrackKind`].
///
/// Serialized as a map keyed by kind name so specification JSON reads
/// `{"video": [...], "music": [...], ...}`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KindMap<T> {
    pub video: T,
    pub music: T,
    pub voice: T,
    pub sfx: T,
    pub text: T,
}

impl<T> KindMap<T> {
    /// Build a map by calling `f` once per kind, in canonical order.
    pub fn from_fn(mut f: impl FnMut(TrackKind) -> T) -> Self {
        Self {
            video: f(TrackKind::Video),
            music: f(TrackKind::Music),
            voice: f(TrackKind::Voice),
            sfx: f(TrackKind::Sfx),
            text: f(TrackKind::Text),
        }
    }

    /// Iterate `(kind, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (TrackKind, &T)> {
        TrackKind::ALL.into_iter().map(move |k| (k, &self[k]))
    }

    /// Transform every value, keeping the kind association.
    pub fn map<'a, U>(&'a self, mut f: impl FnMut(TrackKind, &'a T) -> U) -> KindMap<U> {
        KindMap::from_fn(|k| f(k, &self[k]))
    }
}

impl<T> Index<TrackKind> for KindMap<T> {
    type Output = T;

    fn index(&self, kind: TrackKind) -> &T {
        match kind {
            TrackKind::Video => &self.video,
            TrackKind::Music => &self.music,
            TrackKind::Voice => &self.voice,
            TrackKind::Sfx => &self.sfx,
            TrackKind::Text => &self.text,
        }
    }
}

impl<T> IndexMut<TrackKind> for KindMap<T> {
    fn index_mut(&mut self, kind: TrackKind) -> &mut T {
        match kind {
            TrackKind::Video => &mut self.video,
            TrackKind::Music => &mut self.music,
            TrackKind::Voice => &mut self.voice,
            TrackKind::Sfx => &mut self.sfx,
            TrackKind::Text => &mut self.text,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/kind.rs"]
mod tests;
