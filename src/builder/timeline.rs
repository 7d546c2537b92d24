use std::{fmt, path::Path};

use crate::{
    assets::audio::{AssetValidator, RejectingValidator, check_audio},
    builder::{
        cursors::Cursors,
        options::{AudioOptions, ImageOptions, Placement, TextOptions},
    },
    composition::{
        clip::{AudioClip, Clip, ImageClip, TextClip, Timing},
        spec::{Lanes, Specification, default_lanes, max_end_time},
        track::Track,
        transition::{Transition, TransitionType},
    },
    defaults::{DefaultsManager, DefaultsProvider},
    foundation::{
        error::VineResult,
        kind::{AudioKind, KindMap, TrackKind},
    },
    render::renderer::{ExportOptions, Renderer},
};

/// Title given to specifications built without one.
pub const DEFAULT_TITLE: &str = "Generated Video";

/// Stateful timeline assembly with sequential and explicit timing.
///
/// Sequential adds (`add_image`, `add_voice`, ...) start at their kind's cursor and push it
/// forward by the resolved duration. Explicit adds (`add_image_at`, ...) take a [`Placement`]
/// and only ever move the cursor forward. Every add picks the first lane of its kind that the
/// clip fits on without overlap, opening `<kind>_<n>` when none does.
///
/// A failed add leaves the builder exactly as it was.
pub struct TimelineBuilder {
    width: u32,
    height: u32,
    fps: f64,
    lanes: Lanes,
    transitions: Vec<Transition>,
    cursors: Cursors,
    defaults: Box<dyn DefaultsProvider>,
    validator: Box<dyn AssetValidator>,
}

impl Default for TimelineBuilder {
    fn default() -> Self {
        Self::new(1920, 1080, 30.0)
    }
}

impl fmt::Debug for TimelineBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimelineBuilder")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("fps", &self.fps)
            .field("lanes", &self.lanes)
            .field("transitions", &self.transitions)
            .field("cursors", &self.cursors)
            .finish_non_exhaustive()
    }
}

impl TimelineBuilder {
    /// Canvas parameters are stored as given; [`TimelineBuilder::build`] checks them.
    pub fn new(width: u32, height: u32, fps: f64) -> Self {
        Self {
            width,
            height,
            fps,
            lanes: default_lanes(),
            transitions: Vec::new(),
            cursors: Cursors::new(),
            defaults: Box::new(DefaultsManager::new()),
            validator: Box::new(RejectingValidator),
        }
    }

    pub fn with_defaults(mut self, provider: impl DefaultsProvider + 'static) -> Self {
        self.defaults = Box::new(provider);
        self
    }

    pub fn with_validator(mut self, validator: impl AssetValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    // ---- sequential mode ----

    pub fn add_image(
        &mut self,
        path: impl Into<String>,
        duration: Option<f64>,
        opts: ImageOptions,
    ) -> VineResult<&mut Self> {
        let path = path.into();
        self.append(TrackKind::Video, duration, |_, timing| {
            Ok(ImageClip::new(path, timing, opts)?.into())
        })
    }

    pub fn add_text(
        &mut self,
        content: impl Into<String>,
        duration: Option<f64>,
        opts: TextOptions,
    ) -> VineResult<&mut Self> {
        let content = content.into();
        self.append(TrackKind::Text, duration, |_, timing| {
            Ok(TextClip::new(content, timing, opts)?.into())
        })
    }

    pub fn add_voice(
        &mut self,
        path: impl Into<String>,
        duration: Option<f64>,
        opts: AudioOptions,
    ) -> VineResult<&mut Self> {
        self.append_audio(AudioKind::Voice, path.into(), duration, opts)
    }

    pub fn add_music(
        &mut self,
        path: impl Into<String>,
        duration: Option<f64>,
        opts: AudioOptions,
    ) -> VineResult<&mut Self> {
        self.append_audio(AudioKind::Music, path.into(), duration, opts)
    }

    pub fn add_sfx(
        &mut self,
        path: impl Into<String>,
        duration: Option<f64>,
        opts: AudioOptions,
    ) -> VineResult<&mut Self> {
        self.append_audio(AudioKind::Sfx, path.into(), duration, opts)
    }

    /// Place a transition over the tail of everything added so far.
    ///
    /// Starts at the furthest cursor minus `duration`; a start before zero is a range error.
    pub fn add_transition(
        &mut self,
        transition_type: TransitionType,
        duration: f64,
    ) -> VineResult<&mut Self> {
        let start_time = self.cursors.latest() - duration;
        self.add_transition_at(transition_type, start_time, duration)
    }

    // ---- explicit mode ----

    pub fn add_image_at(
        &mut self,
        path: impl Into<String>,
        placement: Placement,
        opts: ImageOptions,
    ) -> VineResult<&mut Self> {
        let clip = ImageClip::new(path, placement.timing()?, opts)?;
        self.place(TrackKind::Video, clip.into());
        Ok(self)
    }

    pub fn add_text_at(
        &mut self,
        content: impl Into<String>,
        placement: Placement,
        opts: TextOptions,
    ) -> VineResult<&mut Self> {
        let clip = TextClip::new(content, placement.timing()?, opts)?;
        self.place(TrackKind::Text, clip.into());
        Ok(self)
    }

    pub fn add_voice_at(
        &mut self,
        path: impl Into<String>,
        placement: Placement,
        opts: AudioOptions,
    ) -> VineResult<&mut Self> {
        self.place_audio(AudioKind::Voice, path.into(), placement, opts)
    }

    pub fn add_music_at(
        &mut self,
        path: impl Into<String>,
        placement: Placement,
        opts: AudioOptions,
    ) -> VineResult<&mut Self> {
        self.place_audio(AudioKind::Music, path.into(), placement, opts)
    }

    pub fn add_sfx_at(
        &mut self,
        path: impl Into<String>,
        placement: Placement,
        opts: AudioOptions,
    ) -> VineResult<&mut Self> {
        self.place_audio(AudioKind::Sfx, path.into(), placement, opts)
    }

    /// No cursor bookkeeping.
    pub fn add_transition_at(
        &mut self,
        transition_type: TransitionType,
        start_time: f64,
        duration: f64,
    ) -> VineResult<&mut Self> {
        let transition = Transition::new(transition_type, start_time, duration)?;
        self.push_transition(transition)
    }

    /// Add a fully configured transition (direction, easing, track scope).
    pub fn push_transition(&mut self, transition: Transition) -> VineResult<&mut Self> {
        transition.validate()?;
        tracing::debug!(
            kind = %transition.transition_type,
            start = transition.start_time,
            duration = transition.duration,
            "transition added"
        );
        self.transitions.push(transition);
        Ok(self)
    }

    // ---- registers ----

    /// Sticky duration for sequential adds that omit one.
    pub fn set_duration(&mut self, duration: f64) -> VineResult<&mut Self> {
        self.cursors.set_next_duration(duration)?;
        Ok(self)
    }

    pub fn clear_duration(&mut self) -> &mut Self {
        self.cursors.clear_next_duration();
        self
    }

    pub fn set_fps(&mut self, fps: f64) -> &mut Self {
        self.fps = fps;
        self
    }

    /// Drop every lane, clip, transition and register. Canvas parameters and collaborators stay.
    pub fn clear(&mut self) -> &mut Self {
        self.lanes = default_lanes();
        self.transitions.clear();
        self.cursors.reset();
        self
    }

    // ---- queries ----

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn cursor(&self, kind: TrackKind) -> f64 {
        self.cursors.get(kind)
    }

    pub fn next_duration(&self) -> Option<f64> {
        self.cursors.next_duration()
    }

    pub fn tracks(&self, kind: TrackKind) -> &[Track] {
        &self.lanes[kind]
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Latest finite end across every clip and transition; `0.0` for an empty timeline.
    pub fn duration(&self) -> f64 {
        max_end_time(&self.lanes, &self.transitions)
    }

    pub fn track_count(&self) -> KindMap<usize> {
        self.lanes.map(|_, tracks| tracks.len())
    }

    pub fn clip_count(&self) -> KindMap<usize> {
        self.lanes
            .map(|_, tracks| tracks.iter().map(|t| t.clips.len()).sum())
    }

    // ---- output ----

    pub fn build(&self) -> VineResult<Specification> {
        self.build_titled(DEFAULT_TITLE)
    }

    /// Snapshot the current state into a validated [`Specification`]. The builder is unchanged.
    #[tracing::instrument(skip(self, title))]
    pub fn build_titled(&self, title: impl Into<String>) -> VineResult<Specification> {
        Specification::from_parts(
            title.into(),
            (self.width, self.height, self.fps),
            self.lanes.clone(),
            self.transitions.clone(),
        )
    }

    pub fn render<R: Renderer>(&self, renderer: &mut R) -> VineResult<R::Output> {
        let spec = self.build()?;
        renderer.render(&spec)
    }

    #[tracing::instrument(skip(self, renderer, opts))]
    pub fn export<R: Renderer>(
        &self,
        renderer: &mut R,
        path: &Path,
        opts: &ExportOptions,
    ) -> VineResult<()> {
        let spec = self.build()?;
        renderer.export(&spec, path, opts)
    }

    // ---- internals ----

    fn append(
        &mut self,
        kind: TrackKind,
        duration: Option<f64>,
        make: impl FnOnce(&Self, Timing) -> VineResult<Clip>,
    ) -> VineResult<&mut Self> {
        let duration = self.cursors.resolve(duration);
        let start_time = self.cursors.get(kind);
        let clip = make(&*self, Timing::new(start_time, duration)?)?;
        self.place(kind, clip);
        if let Some(d) = duration {
            self.cursors.advance_sequential(kind, start_time, d);
        }
        Ok(self)
    }

    fn append_audio(
        &mut self,
        kind: AudioKind,
        path: String,
        duration: Option<f64>,
        opts: AudioOptions,
    ) -> VineResult<&mut Self> {
        self.append(kind.into(), duration, |b, timing| {
            b.audio_clip(kind, path, timing, opts)
        })
    }

    fn place_audio(
        &mut self,
        kind: AudioKind,
        path: String,
        placement: Placement,
        opts: AudioOptions,
    ) -> VineResult<&mut Self> {
        let clip = self.audio_clip(kind, path, placement.timing()?, opts)?;
        self.place(kind.into(), clip);
        Ok(self)
    }

    fn audio_clip(
        &self,
        kind: AudioKind,
        path: String,
        timing: Timing,
        opts: AudioOptions,
    ) -> VineResult<Clip> {
        check_audio(self.validator.as_ref(), &path)?;
        let props = opts.into_props(|| self.defaults.default_volume(kind));
        Ok(AudioClip::new(path, timing, props)?.into())
    }

    /// First lane of `kind` that stays overlap-free with `timing` added.
    fn lane_for(&self, kind: TrackKind, timing: &Timing) -> Option<usize> {
        let lanes = &self.lanes[kind];
        if kind == TrackKind::Video && lanes.len() == 1 && lanes[0].is_empty() {
            return Some(0);
        }
        lanes
            .iter()
            .position(|t| !t.has_overlapping_clips() && !t.would_overlap(timing))
    }

    /// Infallible: every check has already passed.
    fn place(&mut self, kind: TrackKind, clip: Clip) {
        let timing = *clip.timing();
        let index = match self.lane_for(kind, &timing) {
            Some(i) => i,
            None => {
                let lanes = &mut self.lanes[kind];
                let name = kind.lane_name(lanes.len());
                tracing::debug!(%kind, lane = %name, "opening lane");
                lanes.push(Track::new(name));
                lanes.len() - 1
            }
        };
        let lane = &mut self.lanes[kind][index];
        tracing::debug!(%kind, lane = %lane.name, %clip, "clip added");
        lane.push_clip(clip);
        self.cursors
            .advance_explicit(kind, timing.start_time, timing.duration);
    }
}
