use crate::{
    composition::clip::{Clip, Timing},
    foundation::error::{VineResult, ensure_within},
};

fn default_true() -> bool {
    true
}

fn default_volume() -> f64 {
    1.0
}

/// An ordered lane of clips of one media kind.
///
/// Names are unique only by convention; lookups take the first match.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Track {
    pub name: String,
    /// Stacking order among lanes of the same kind; ascending = bottom-most first.
    #[serde(default)]
    pub z_order: i32,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub muted: bool,
    /// Lane gain, applied on top of each clip's own volume.
    #[serde(default = "default_volume")]
    pub volume: f64,
    #[serde(default)]
    pub clips: Vec<Clip>,
}

impl Track {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            z_order: 0,
            visible: true,
            muted: false,
            volume: 1.0,
            clips: Vec::new(),
        }
    }

    pub fn with_z_order(mut self, z_order: i32) -> Self {
        self.z_order = z_order;
        self
    }

    pub fn with_clip(mut self, clip: impl Into<Clip>) -> Self {
        self.clips.push(clip.into());
        self
    }

    pub fn push_clip(&mut self, clip: impl Into<Clip>) {
        self.clips.push(clip.into());
    }

    pub fn remove_clip_at(&mut self, index: usize) -> Option<Clip> {
        if index < self.clips.len() {
            Some(self.clips.remove(index))
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn active_clips_at(&self, time: f64) -> impl Iterator<Item = &Clip> {
        self.clips.iter().filter(move |c| c.is_active_at(time))
    }

    /// True iff two finite clips on this lane share any instant.
    ///
    /// Open-ended clips never count.
    pub fn has_overlapping_clips(&self) -> bool {
        self.clips.iter().enumerate().any(|(i, a)| {
            self.clips[i + 1..]
                .iter()
                .any(|b| a.timing().overlaps(b.timing()))
        })
    }

    /// Whether placing a clip with `timing` here would collide with an existing clip.
    pub fn would_overlap(&self, timing: &Timing) -> bool {
        self.clips.iter().any(|c| c.timing().overlaps(timing))
    }

    /// Latest finite end time on this lane; `0.0` when nothing on it ends.
    pub fn max_end_time(&self) -> f64 {
        self.clips
            .iter()
            .filter_map(Clip::end_time)
            .fold(0.0, f64::max)
    }

    pub fn validate(&self) -> VineResult<()> {
        ensure_within(self.volume, 0.0, 2.0, "track volume")?;
        for (i, clip) in self.clips.iter().enumerate() {
            clip.validate()
                .map_err(|e| e.prefixed(format!("track '{}' clip {i}", self.name)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/track.rs"]
mod tests;
