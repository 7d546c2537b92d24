use crate::{
    composition::ease::Easing,
    foundation::error::{VineResult, ensure_finite, ensure_non_negative, ensure_within},
};

fn ease_in_out() -> Easing {
    Easing::EaseInOut
}

/// Slow zoom with an optional drift, for stills.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct KenBurns {
    /// Scale reached at the end of the animation, in `[1, 3]`.
    pub zoom_factor: f64,
    /// Horizontal drift as a fraction of the frame, in `[-1, 1]`.
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for KenBurns {
    fn default() -> Self {
        Self {
            zoom_factor: 1.2,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideDirection {
    #[default]
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Slide {
    pub direction: SlideDirection,
    /// Travel in pixels.
    pub distance: f64,
}

impl Default for Slide {
    fn default() -> Self {
        Self {
            direction: SlideDirection::Left,
            distance: 100.0,
        }
    }
}

/// What an animation does to its clip.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    KenBurns(KenBurns),
    Slide(Slide),
    Static,
}

impl Effect {
    pub fn name(&self) -> &'static str {
        match self {
            Self::KenBurns(_) => "ken_burns",
            Self::Slide(_) => "slide",
            Self::Static => "static",
        }
    }

    pub fn validate(&self) -> VineResult<()> {
        match self {
            Self::KenBurns(k) => {
                ensure_within(k.zoom_factor, 1.0, 3.0, "zoom_factor")?;
                ensure_within(k.pan_x, -1.0, 1.0, "pan_x")?;
                ensure_within(k.pan_y, -1.0, 1.0, "pan_y")
            }
            Self::Slide(s) => ensure_non_negative(s.distance, "slide distance"),
            Self::Static => Ok(()),
        }
    }
}

/// An effect scheduled on a visual clip.
///
/// Times are seconds from the clip's start. `duration == None` runs the effect until the clip
/// ends.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Animation {
    pub effect: Effect,
    #[serde(default)]
    pub start_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default = "ease_in_out")]
    pub easing: Easing,
}

impl Animation {
    pub fn new(effect: Effect) -> Self {
        Self {
            effect,
            start_time: 0.0,
            duration: None,
            easing: ease_in_out(),
        }
    }

    pub fn starting_at(mut self, start_time: f64) -> Self {
        self.start_time = start_time;
        self
    }

    pub fn for_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn end_time(&self) -> Option<f64> {
        self.duration.map(|d| self.start_time + d)
    }

    /// Same rule as clips: only finite windows can overlap, and touching ends do not.
    pub fn overlaps(&self, other: &Animation) -> bool {
        match (self.end_time(), other.end_time()) {
            (Some(a_end), Some(b_end)) => self.start_time.max(other.start_time) < a_end.min(b_end),
            _ => false,
        }
    }

    /// Eased progress in `[0, 1]` at `time` seconds into the clip. Open-ended animations hold at
    /// 0 until they start and 1 afterwards.
    pub fn progress_at(&self, time: f64) -> f64 {
        if time < self.start_time {
            return 0.0;
        }
        let linear = match self.duration {
            Some(d) if d > 0.0 => ((time - self.start_time) / d).min(1.0),
            _ => 1.0,
        };
        self.easing.apply(linear)
    }

    pub fn validate(&self) -> VineResult<()> {
        ensure_non_negative(self.start_time, "animation start_time")?;
        if let Some(d) = self.duration {
            ensure_non_negative(d, "animation duration")?;
        }
        if let Some(end) = self.end_time() {
            ensure_finite(end, "animation end_time")?;
        }
        self.effect
            .validate()
            .map_err(|e| e.prefixed(format!("{} effect", self.effect.name())))
    }
}

pub(crate) fn validate_animations(animations: &[Animation]) -> VineResult<()> {
    for (i, a) in animations.iter().enumerate() {
        a.validate().map_err(|e| e.prefixed(format!("animation {i}")))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/composition/animation.rs"]
mod tests;
