use std::{collections::BTreeMap, fmt, str::FromStr};

use kurbo::Point;

use crate::{
    composition::{
        animation::{Animation, validate_animations},
        transition::EdgeTransition,
    },
    foundation::{
        error::{VineError, VineResult, ensure_finite, ensure_non_negative, ensure_within},
        kind::TrackKind,
    },
};

/// Free-form per-element annotations carried through to the renderer untouched.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Placement of an element on the timeline, in seconds.
///
/// `duration == None` marks an open-ended element: it has no end, never counts toward total
/// duration or lane overlap, and stays active from `start_time` onward.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timing {
    pub start_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl Timing {
    pub fn new(start_time: f64, duration: Option<f64>) -> VineResult<Self> {
        let timing = Self {
            start_time,
            duration,
        };
        timing.validate()?;
        Ok(timing)
    }

    pub fn open_ended(start_time: f64) -> VineResult<Self> {
        Self::new(start_time, None)
    }

    /// Resolve explicit-mode arguments where the caller may give a duration or an end time.
    ///
    /// Giving both is a conflict even when they agree. `end_time == start_time` yields a
    /// zero-length element.
    pub fn from_bounds(
        start_time: f64,
        duration: Option<f64>,
        end_time: Option<f64>,
    ) -> VineResult<Self> {
        match (duration, end_time) {
            (Some(_), Some(_)) => Err(VineError::conflict(
                "cannot specify both duration and end_time",
            )),
            (None, Some(end)) => {
                ensure_non_negative(start_time, "start_time")?;
                ensure_finite(end, "end_time")?;
                if end < start_time {
                    return Err(VineError::ordering(format!(
                        "end_time {end} precedes start_time {start_time}"
                    )));
                }
                Self::new(start_time, Some(end - start_time))
            }
            (duration, None) => Self::new(start_time, duration),
        }
    }

    pub fn validate(&self) -> VineResult<()> {
        ensure_non_negative(self.start_time, "start_time")?;
        if let Some(d) = self.duration {
            ensure_non_negative(d, "duration")?;
        }
        if let Some(end) = self.end_time() {
            ensure_finite(end, "end_time")?;
        }
        Ok(())
    }

    pub fn end_time(&self) -> Option<f64> {
        self.duration.map(|d| self.start_time + d)
    }

    /// `[start, end)` for finite elements, `[start, ∞)` for open-ended ones.
    pub fn is_active_at(&self, time: f64) -> bool {
        if time < self.start_time {
            return false;
        }
        match self.end_time() {
            Some(end) => time < end,
            None => true,
        }
    }

    /// Whether the half-open intervals share an instant. Open-ended timings never overlap
    /// anything, and neither do zero-length ones.
    pub fn overlaps(&self, other: &Timing) -> bool {
        match (self.end_time(), other.end_time()) {
            (Some(a_end), Some(b_end)) => self.start_time.max(other.start_time) < a_end.min(b_end),
            _ => false,
        }
    }
}

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl FromStr for TextAlign {
    type Err = VineError;

    fn from_str(s: &str) -> VineResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" | "centre" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(VineError::unknown_value(format!(
                "unknown text alignment '{other}'"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ImageProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub position: Point,
    pub opacity: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub animations: Vec<Animation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_in: Option<EdgeTransition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_out: Option<EdgeTransition>,
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl Default for ImageProps {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            position: Point::ORIGIN,
            opacity: 1.0,
            animations: Vec::new(),
            transition_in: None,
            transition_out: None,
            metadata: Metadata::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub font_size: u32,
    pub font_color: String,
    pub font_family: String,
    pub font_weight: String,
    pub alignment: TextAlign,
    pub position: Point,
    pub opacity: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub animations: Vec<Animation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_in: Option<EdgeTransition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_out: Option<EdgeTransition>,
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 48,
            font_color: "#FFFFFF".to_string(),
            font_family: "Arial".to_string(),
            font_weight: "normal".to_string(),
            alignment: TextAlign::Center,
            position: Point::ORIGIN,
            opacity: 1.0,
            animations: Vec::new(),
            transition_in: None,
            transition_out: None,
            metadata: Metadata::new(),
        }
    }
}

/// Playback adjustments for narration.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Playback rate, in `[0.5, 2]`.
    pub speed: f64,
    /// Pitch multiplier, in `[0.5, 2]`.
    pub pitch: f64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            pitch: 1.0,
        }
    }
}

impl VoiceConfig {
    pub fn validate(&self) -> VineResult<()> {
        ensure_within(self.speed, 0.5, 2.0, "voice speed")?;
        ensure_within(self.pitch, 0.5, 2.0, "voice pitch")
    }
}

/// Background-music behaviour.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MusicConfig {
    /// Repeat the source to fill the clip.
    #[serde(rename = "loop")]
    pub looped: bool,
    /// Lower the music while voice clips play.
    pub duck_voice: bool,
    /// Gain applied while ducked, in `[0, 1]`.
    pub duck_level: f64,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            looped: false,
            duck_voice: true,
            duck_level: 0.3,
        }
    }
}

impl MusicConfig {
    pub fn validate(&self) -> VineResult<()> {
        ensure_within(self.duck_level, 0.0, 1.0, "duck_level")
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AudioProps {
    pub volume: f64,
    pub fade_in: f64,
    pub fade_out: f64,
    pub crossfade_duration: f64,
    pub auto_crossfade: bool,
    pub normalize: bool,
    /// `(time, volume)` envelope points, relative to the clip start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_curve: Option<Vec<(f64, f64)>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_config: Option<VoiceConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music_config: Option<MusicConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_in: Option<EdgeTransition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_out: Option<EdgeTransition>,
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl Default for AudioProps {
    fn default() -> Self {
        Self {
            volume: 1.0,
            fade_in: 0.0,
            fade_out: 0.0,
            crossfade_duration: 0.5,
            auto_crossfade: true,
            normalize: false,
            volume_curve: None,
            voice_config: None,
            music_config: None,
            transition_in: None,
            transition_out: None,
            metadata: Metadata::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImageClip {
    pub path: String,
    pub timing: Timing,
    #[serde(default)]
    pub props: ImageProps,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextClip {
    /// Rendered verbatim; empty and whitespace-only content is allowed.
    pub content: String,
    pub timing: Timing,
    #[serde(default)]
    pub style: TextStyle,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioClip {
    pub path: String,
    pub timing: Timing,
    #[serde(default)]
    pub props: AudioProps,
}

impl ImageClip {
    pub fn new(path: impl Into<String>, timing: Timing, props: ImageProps) -> VineResult<Self> {
        let clip = Self {
            path: path.into(),
            timing,
            props,
        };
        clip.validate()?;
        Ok(clip)
    }

    pub fn validate(&self) -> VineResult<()> {
        self.timing.validate()?;
        if self.props.width == Some(0) {
            return Err(VineError::range("image width must be >= 1"));
        }
        if self.props.height == Some(0) {
            return Err(VineError::range("image height must be >= 1"));
        }
        validate_position(self.props.position)?;
        ensure_within(self.props.opacity, 0.0, 1.0, "opacity")?;
        validate_animations(&self.props.animations)?;
        validate_edges(self.props.transition_in.as_ref(), self.props.transition_out.as_ref())
    }
}

impl TextClip {
    pub fn new(content: impl Into<String>, timing: Timing, style: TextStyle) -> VineResult<Self> {
        let clip = Self {
            content: content.into(),
            timing,
            style,
        };
        clip.validate()?;
        Ok(clip)
    }

    pub fn validate(&self) -> VineResult<()> {
        self.timing.validate()?;
        if self.style.font_size == 0 {
            return Err(VineError::range("font_size must be >= 1"));
        }
        validate_hex_color(&self.style.font_color, "font_color")?;
        validate_position(self.style.position)?;
        ensure_within(self.style.opacity, 0.0, 1.0, "opacity")?;
        validate_animations(&self.style.animations)?;
        validate_edges(self.style.transition_in.as_ref(), self.style.transition_out.as_ref())
    }
}

impl AudioClip {
    pub fn new(path: impl Into<String>, timing: Timing, props: AudioProps) -> VineResult<Self> {
        let clip = Self {
            path: path.into(),
            timing,
            props,
        };
        clip.validate()?;
        Ok(clip)
    }

    pub fn validate(&self) -> VineResult<()> {
        self.timing.validate()?;
        let p = &self.props;
        ensure_within(p.volume, 0.0, 2.0, "volume")?;
        ensure_non_negative(p.fade_in, "fade_in")?;
        ensure_non_negative(p.fade_out, "fade_out")?;
        ensure_non_negative(p.crossfade_duration, "crossfade_duration")?;
        if let Some(curve) = &p.volume_curve {
            for &(t, v) in curve {
                ensure_non_negative(t, "volume_curve time")?;
                ensure_within(v, 0.0, 2.0, "volume_curve volume")?;
            }
        }
        if let Some(voice) = &p.voice_config {
            voice.validate()?;
        }
        if let Some(music) = &p.music_config {
            music.validate()?;
        }
        validate_edges(p.transition_in.as_ref(), p.transition_out.as_ref())
    }
}

/// A timed piece of content owned by exactly one track.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Clip {
    Image(ImageClip),
    Text(TextClip),
    Audio(AudioClip),
}

impl Clip {
    pub fn timing(&self) -> &Timing {
        match self {
            Self::Image(c) => &c.timing,
            Self::Text(c) => &c.timing,
            Self::Audio(c) => &c.timing,
        }
    }

    pub fn start_time(&self) -> f64 {
        self.timing().start_time
    }

    pub fn duration(&self) -> Option<f64> {
        self.timing().duration
    }

    pub fn end_time(&self) -> Option<f64> {
        self.timing().end_time()
    }

    pub fn is_active_at(&self, time: f64) -> bool {
        self.timing().is_active_at(time)
    }

    /// Whether this clip may live on a lane of `kind`.
    pub fn fits(&self, kind: TrackKind) -> bool {
        match self {
            Self::Image(_) => kind == TrackKind::Video,
            Self::Text(_) => kind == TrackKind::Text,
            Self::Audio(_) => kind.is_audio(),
        }
    }

    /// Scheduled effects; audio clips carry none.
    pub fn animations(&self) -> &[Animation] {
        match self {
            Self::Image(c) => &c.props.animations,
            Self::Text(c) => &c.style.animations,
            Self::Audio(_) => &[],
        }
    }

    pub fn transition_in(&self) -> Option<&EdgeTransition> {
        match self {
            Self::Image(c) => c.props.transition_in.as_ref(),
            Self::Text(c) => c.style.transition_in.as_ref(),
            Self::Audio(c) => c.props.transition_in.as_ref(),
        }
    }

    pub fn transition_out(&self) -> Option<&EdgeTransition> {
        match self {
            Self::Image(c) => c.props.transition_out.as_ref(),
            Self::Text(c) => c.style.transition_out.as_ref(),
            Self::Audio(c) => c.props.transition_out.as_ref(),
        }
    }

    /// Source path or text content, for diagnostics.
    pub fn label(&self) -> &str {
        match self {
            Self::Image(c) => &c.path,
            Self::Text(c) => &c.content,
            Self::Audio(c) => &c.path,
        }
    }

    pub fn validate(&self) -> VineResult<()> {
        match self {
            Self::Image(c) => c.validate(),
            Self::Text(c) => c.validate(),
            Self::Audio(c) => c.validate(),
        }
    }
}

impl fmt::Display for Clip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Image(_) => "image",
            Self::Text(_) => "text",
            Self::Audio(_) => "audio",
        };
        match self.end_time() {
            Some(end) => write!(
                f,
                "{kind} '{}' [{:.3}, {:.3})",
                self.label(),
                self.start_time(),
                end
            ),
            None => write!(f, "{kind} '{}' [{:.3}, open)", self.label(), self.start_time()),
        }
    }
}

impl From<ImageClip> for Clip {
    fn from(c: ImageClip) -> Self {
        Self::Image(c)
    }
}

impl From<TextClip> for Clip {
    fn from(c: TextClip) -> Self {
        Self::Text(c)
    }
}

impl From<AudioClip> for Clip {
    fn from(c: AudioClip) -> Self {
        Self::Audio(c)
    }
}

/// `#RRGGBB`, case-insensitive.
pub fn is_hex_color(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 7 && bytes[0] == b'#' && bytes[1..].iter().all(u8::is_ascii_hexdigit)
}

pub(crate) fn validate_hex_color(value: &str, field: &str) -> VineResult<()> {
    if !is_hex_color(value) {
        return Err(VineError::validation(format!(
            "{field} must match #RRGGBB (got '{value}')"
        )));
    }
    Ok(())
}

fn validate_edges(
    transition_in: Option<&EdgeTransition>,
    transition_out: Option<&EdgeTransition>,
) -> VineResult<()> {
    if let Some(t) = transition_in {
        t.validate().map_err(|e| e.prefixed("transition_in"))?;
    }
    if let Some(t) = transition_out {
        t.validate().map_err(|e| e.prefixed("transition_out"))?;
    }
    Ok(())
}

fn validate_position(p: Point) -> VineResult<()> {
    ensure_finite(p.x, "x_position")?;
    ensure_finite(p.y, "y_position")
}

#[cfg(test)]
#[path = "../../tests/unit/composition/clip.rs"]
mod tests;
