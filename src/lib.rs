//! Vine is a multi-track timeline model for assembling videos from timed elements.
//!
//! Images, text, voice, music, sound effects and transitions are added to a
//! [`TimelineBuilder`], either sequentially (appended after the last element of the same kind)
//! or at an explicit time. The builder assigns every clip to a lane of its kind that it does not
//! overlap, opening new lanes as needed, and compiles the result into a [`Specification`]: a
//! standalone, editable aggregate that answers duration and "what is active at `t`" queries.
//!
//! # Pipeline overview
//!
//! 1. **Build**: builder calls (or a JSON [`Script`]) mutate per-kind lanes and cursors
//! 2. **Snapshot**: [`TimelineBuilder::build`] validates and copies state into a [`Specification`]
//! 3. **Hand off**: a [`Renderer`] consumes the specification; [`ManifestRenderer`] flattens it
//!    into a [`RenderManifest`] for downstream encoders
//!
//! Decoding, compositing and encoding are out of scope. So is any file I/O beyond optional
//! `ffprobe` audio probing (feature `media-ffmpeg`) and the JSON read/write helpers.
#![forbid(unsafe_code)]

pub mod assets;
pub mod builder;
pub mod composition;
pub mod defaults;
pub mod foundation;
pub mod render;
pub mod script;

pub use assets::audio::{
    AUDIO_EXTENSIONS, AssetValidator, FfprobeValidator, RejectingValidator, check_audio,
    has_audio_extension,
};
pub use builder::cursors::{Cursors, explicit_advance, sequential_advance};
pub use builder::options::{AudioOptions, ImageOptions, Placement, TextOptions};
pub use builder::timeline::{DEFAULT_TITLE, TimelineBuilder};
pub use composition::animation::{Animation, Effect, KenBurns, Slide, SlideDirection};
pub use composition::clip::{
    AudioClip, AudioProps, Clip, ImageClip, ImageProps, Metadata, MusicConfig, TextAlign,
    TextClip, TextStyle, Timing, VoiceConfig, is_hex_color,
};
pub use composition::ease::Easing;
pub use composition::spec::{
    ActiveClips, Lanes, MAX_DIMENSION, MAX_FPS, OutputFormat, Quality, Specification,
    default_lanes,
};
pub use composition::track::Track;
pub use composition::transition::{
    EDGE_DURATION_RANGE, EdgeTransition, Transition, TransitionDirection, TransitionType,
};
pub use defaults::{DefaultsManager, DefaultsProvider, builtin_volume};
pub use foundation::error::{VineError, VineResult};
pub use foundation::kind::{AudioKind, KindMap, TrackKind};
pub use render::manifest::{AudioSegment, ManifestRenderer, RenderManifest, VisualLayer};
pub use render::renderer::{ExportOptions, Renderer, ensure_parent_dir};
pub use script::{CanvasConfig, Script, Step};

pub use kurbo::Point;
