//! JSON timeline scripts.
//!
//! A script is the batch form of a builder session: a canvas, an optional title and an ordered
//! list of steps, each naming one builder call.
//!
//! ```json
//! {
//!   "canvas": { "width": 1280, "height": 720, "fps": 24 },
//!   "title": "Intro",
//!   "steps": [
//!     { "op": "set_duration", "duration": 3 },
//!     { "op": "image", "path": "intro.png" },
//!     { "op": "voice_at", "path": "hello.mp3", "start_time": 0.5, "end_time": 2.5 },
//!     { "op": "transition", "transition_type": "crossfade", "duration": 1 }
//!   ]
//! }
//! ```
use std::path::Path;

use anyhow::Context as _;

use crate::{
    builder::{
        options::{AudioOptions, ImageOptions, Placement, TextOptions},
        timeline::{DEFAULT_TITLE, TimelineBuilder},
    },
    composition::{
        ease::Easing,
        spec::Specification,
        transition::{Transition, TransitionDirection, TransitionType},
    },
    foundation::error::{VineError, VineResult},
};

fn default_width() -> u32 {
    1920
}

fn default_height() -> u32 {
    1080
}

fn default_fps() -> f64 {
    30.0
}

fn default_transition_type() -> String {
    "fade".to_string()
}

fn default_transition_duration() -> f64 {
    1.0
}

/// Construction-time canvas for a [`TimelineBuilder`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CanvasConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_fps")]
    pub fps: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
        }
    }
}

impl CanvasConfig {
    pub fn builder(&self) -> TimelineBuilder {
        TimelineBuilder::new(self.width, self.height, self.fps)
    }
}

/// One builder call.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Image {
        path: String,
        #[serde(default)]
        duration: Option<f64>,
        #[serde(default)]
        options: ImageOptions,
    },
    ImageAt {
        path: String,
        start_time: f64,
        #[serde(default)]
        duration: Option<f64>,
        #[serde(default)]
        end_time: Option<f64>,
        #[serde(default)]
        options: ImageOptions,
    },
    Text {
        content: String,
        #[serde(default)]
        duration: Option<f64>,
        #[serde(default)]
        options: TextOptions,
    },
    TextAt {
        content: String,
        start_time: f64,
        #[serde(default)]
        duration: Option<f64>,
        #[serde(default)]
        end_time: Option<f64>,
        #[serde(default)]
        options: TextOptions,
    },
    Voice {
        path: String,
        #[serde(default)]
        duration: Option<f64>,
        #[serde(default)]
        options: AudioOptions,
    },
    VoiceAt {
        path: String,
        start_time: f64,
        #[serde(default)]
        duration: Option<f64>,
        #[serde(default)]
        end_time: Option<f64>,
        #[serde(default)]
        options: AudioOptions,
    },
    Music {
        path: String,
        #[serde(default)]
        duration: Option<f64>,
        #[serde(default)]
        options: AudioOptions,
    },
    MusicAt {
        path: String,
        start_time: f64,
        #[serde(default)]
        duration: Option<f64>,
        #[serde(default)]
        end_time: Option<f64>,
        #[serde(default)]
        options: AudioOptions,
    },
    Sfx {
        path: String,
        #[serde(default)]
        duration: Option<f64>,
        #[serde(default)]
        options: AudioOptions,
    },
    SfxAt {
        path: String,
        start_time: f64,
        #[serde(default)]
        duration: Option<f64>,
        #[serde(default)]
        end_time: Option<f64>,
        #[serde(default)]
        options: AudioOptions,
    },
    /// Names are parsed at apply time so an unknown type reports as such.
    Transition {
        #[serde(default = "default_transition_type")]
        transition_type: String,
        #[serde(default = "default_transition_duration")]
        duration: f64,
    },
    TransitionAt {
        transition_type: String,
        start_time: f64,
        duration: f64,
        #[serde(default)]
        direction: Option<String>,
        #[serde(default)]
        easing: Option<String>,
    },
    SetDuration {
        duration: f64,
    },
    ClearDuration,
}

fn placement(start_time: f64, duration: Option<f64>, end_time: Option<f64>) -> Placement {
    Placement {
        start_time,
        duration,
        end_time,
    }
}

impl Step {
    pub fn apply(&self, b: &mut TimelineBuilder) -> VineResult<()> {
        match self.clone() {
            Step::Image {
                path,
                duration,
                options,
            } => b.add_image(path, duration, options),
            Step::ImageAt {
                path,
                start_time,
                duration,
                end_time,
                options,
            } => b.add_image_at(path, placement(start_time, duration, end_time), options),
            Step::Text {
                content,
                duration,
                options,
            } => b.add_text(content, duration, options),
            Step::TextAt {
                content,
                start_time,
                duration,
                end_time,
                options,
            } => b.add_text_at(content, placement(start_time, duration, end_time), options),
            Step::Voice {
                path,
                duration,
                options,
            } => b.add_voice(path, duration, options),
            Step::VoiceAt {
                path,
                start_time,
                duration,
                end_time,
                options,
            } => b.add_voice_at(path, placement(start_time, duration, end_time), options),
            Step::Music {
                path,
                duration,
                options,
            } => b.add_music(path, duration, options),
            Step::MusicAt {
                path,
                start_time,
                duration,
                end_time,
                options,
            } => b.add_music_at(path, placement(start_time, duration, end_time), options),
            Step::Sfx {
                path,
                duration,
                options,
            } => b.add_sfx(path, duration, options),
            Step::SfxAt {
                path,
                start_time,
                duration,
                end_time,
                options,
            } => b.add_sfx_at(path, placement(start_time, duration, end_time), options),
            Step::Transition {
                transition_type,
                duration,
            } => b.add_transition(transition_type.parse()?, duration),
            Step::TransitionAt {
                transition_type,
                start_time,
                duration,
                direction,
                easing,
            } => {
                let kind: TransitionType = transition_type.parse()?;
                let mut t = Transition::new(kind, start_time, duration)?;
                if let Some(d) = direction {
                    t = t.with_direction(d.parse::<TransitionDirection>()?);
                }
                if let Some(e) = easing {
                    t = t.with_easing(e.parse::<Easing>()?);
                }
                b.push_transition(t)
            }
            Step::SetDuration { duration } => b.set_duration(duration),
            Step::ClearDuration => Ok(b.clear_duration()),
        }
        .map(|_| ())
    }
}

/// A canvas plus an ordered list of builder calls.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Script {
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(s: &str) -> VineResult<Self> {
        serde_json::from_str(s).map_err(|e| VineError::serde(format!("timeline script: {e}")))
    }

    pub fn from_path(path: &Path) -> VineResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read timeline script '{}'", path.display()))?;
        Self::from_json(&s)
    }

    /// Run every step in order, stopping at the first failure.
    ///
    /// Steps before the failing one stay applied; the failing step itself changes nothing.
    pub fn apply(&self, b: &mut TimelineBuilder) -> VineResult<()> {
        for (i, step) in self.steps.iter().enumerate() {
            step.apply(b).map_err(|e| e.prefixed(format!("step {i}")))?;
        }
        Ok(())
    }

    /// Fresh builder on this script's canvas, every step applied, then built.
    #[tracing::instrument(skip(self), fields(steps = self.steps.len()))]
    pub fn run(&self) -> VineResult<Specification> {
        let mut b = self.canvas.builder();
        self.apply(&mut b)?;
        b.build_titled(self.title.as_deref().unwrap_or(DEFAULT_TITLE))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/script.rs"]
mod tests;
