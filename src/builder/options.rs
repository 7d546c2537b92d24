use crate::{
    composition::{
        clip::{AudioProps, ImageProps, Metadata, MusicConfig, TextStyle, Timing, VoiceConfig},
        transition::EdgeTransition,
    },
    foundation::error::VineResult,
};

/// Image properties for builder adds.
pub type ImageOptions = ImageProps;

/// Text styling for builder adds.
pub type TextOptions = TextStyle;

/// Where an explicit-mode element goes.
///
/// At most one of `duration` and `end_time` may be set; both is a conflict even when they agree.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    pub start_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
}

impl Placement {
    /// Open-ended placement starting at `start_time`.
    pub fn at(start_time: f64) -> Self {
        Self {
            start_time,
            duration: None,
            end_time: None,
        }
    }

    pub fn for_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn until(mut self, end_time: f64) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn timing(&self) -> VineResult<Timing> {
        Timing::from_bounds(self.start_time, self.duration, self.end_time)
    }
}

/// Audio properties for builder adds.
///
/// `volume: None` asks the defaults provider for the kind's level.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AudioOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    pub fade_in: f64,
    pub fade_out: f64,
    pub crossfade_duration: f64,
    pub auto_crossfade: bool,
    pub normalize: bool,
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

impl Default for AudioOptions {
    fn default() -> Self {
        let props = AudioProps::default();
        Self {
            volume: None,
            fade_in: props.fade_in,
            fade_out: props.fade_out,
            crossfade_duration: props.crossfade_duration,
            auto_crossfade: props.auto_crossfade,
            normalize: props.normalize,
            volume_curve: props.volume_curve,
            voice_config: props.voice_config,
            music_config: props.music_config,
            transition_in: props.transition_in,
            transition_out: props.transition_out,
            metadata: props.metadata,
        }
    }
}

impl AudioOptions {
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub(crate) fn into_props(self, default_volume: impl FnOnce() -> f64) -> AudioProps {
        AudioProps {
            volume: self.volume.unwrap_or_else(default_volume),
            fade_in: self.fade_in,
            fade_out: self.fade_out,
            crossfade_duration: self.crossfade_duration,
            auto_crossfade: self.auto_crossfade,
            normalize: self.normalize,
            volume_curve: self.volume_curve,
            voice_config: self.voice_config,
            music_config: self.music_config,
            transition_in: self.transition_in,
            transition_out: self.transition_out,
            metadata: self.metadata,
        }
    }
}
