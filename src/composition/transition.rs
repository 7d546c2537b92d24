use std::{fmt, str::FromStr};

use crate::{
    composition::{clip::Metadata, ease::Easing},
    foundation::error::{VineError, VineResult, ensure_finite, ensure_non_negative, ensure_within},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionType {
    Fade,
    Crossfade,
    Slide,
    Wipe,
    Dissolve,
}

impl TransitionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fade => "fade",
            Self::Crossfade => "crossfade",
            Self::Slide => "slide",
            Self::Wipe => "wipe",
            Self::Dissolve => "dissolve",
        }
    }
}

impl fmt::Display for TransitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransitionType {
    type Err = VineError;

    fn from_str(s: &str) -> VineResult<Self> {
        let kind = s.trim().to_ascii_lowercase();
        if kind.is_empty() {
            return Err(VineError::unknown_value("transition type must be non-empty"));
        }
        match kind.as_str() {
            "fade" => Ok(Self::Fade),
            "crossfade" => Ok(Self::Crossfade),
            "slide" => Ok(Self::Slide),
            "wipe" => Ok(Self::Wipe),
            "dissolve" => Ok(Self::Dissolve),
            _ => Err(VineError::unknown_value(format!(
                "unknown transition type '{kind}'"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionDirection {
    Left,
    Right,
    Up,
    Down,
    #[default]
    In,
    Out,
}

impl FromStr for TransitionDirection {
    type Err = VineError;

    fn from_str(s: &str) -> VineResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "in" => Ok(Self::In),
            "out" => Ok(Self::Out),
            other => Err(VineError::unknown_value(format!(
                "unknown transition direction '{other}'"
            ))),
        }
    }
}

/// A timed effect on the overall timeline. Not owned by any track.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transition {
    pub transition_type: TransitionType,
    pub start_time: f64,
    pub duration: f64,
    /// Names of the lanes the effect leads out of; empty means "whatever is showing".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from_tracks: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_tracks: Vec<String>,
    #[serde(default)]
    pub direction: TransitionDirection,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl Transition {
    pub fn new(transition_type: TransitionType, start_time: f64, duration: f64) -> VineResult<Self> {
        let t = Self {
            transition_type,
            start_time,
            duration,
            from_tracks: Vec::new(),
            to_tracks: Vec::new(),
            direction: TransitionDirection::default(),
            easing: Easing::default(),
            metadata: Metadata::new(),
        };
        t.validate()?;
        Ok(t)
    }

    pub fn with_direction(mut self, direction: TransitionDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn between(mut self, from: Vec<String>, to: Vec<String>) -> Self {
        self.from_tracks = from;
        self.to_tracks = to;
        self
    }

    pub fn validate(&self) -> VineResult<()> {
        ensure_non_negative(self.start_time, "transition start_time")?;
        ensure_non_negative(self.duration, "transition duration")?;
        ensure_finite(self.end_time(), "transition end_time")
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Active on `[start, end)`, the same window clips use.
    pub fn is_active_at(&self, time: f64) -> bool {
        self.start_time <= time && time < self.end_time()
    }

    /// Linear progress: 0 before the start, 1 from the end onward.
    pub fn progress_at(&self, time: f64) -> f64 {
        if time < self.start_time {
            return 0.0;
        }
        if self.duration == 0.0 || time >= self.end_time() {
            return 1.0;
        }
        ((time - self.start_time) / self.duration).min(1.0)
    }

    pub fn eased_progress_at(&self, time: f64) -> f64 {
        self.easing.apply(self.progress_at(time))
    }
}

/// Shortest and longest accepted clip-edge transition, in seconds.
pub const EDGE_DURATION_RANGE: (f64, f64) = (0.1, 10.0);

fn edge_duration() -> f64 {
    1.0
}

fn edge_easing() -> Easing {
    Easing::EaseInOut
}

/// Transition attached to one edge of a clip: played as the clip enters or leaves.
///
/// Timing comes from the clip itself, so only the length is stored.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EdgeTransition {
    pub transition_type: TransitionType,
    #[serde(default = "edge_duration")]
    pub duration: f64,
    #[serde(default = "edge_easing")]
    pub easing: Easing,
}

impl EdgeTransition {
    pub fn new(transition_type: TransitionType, duration: f64) -> VineResult<Self> {
        let t = Self {
            transition_type,
            duration,
            easing: edge_easing(),
        };
        t.validate()?;
        Ok(t)
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn validate(&self) -> VineResult<()> {
        let (lo, hi) = EDGE_DURATION_RANGE;
        ensure_within(self.duration, lo, hi, "edge transition duration")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/transition.rs"]
mod tests;
