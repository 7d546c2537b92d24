use super::{
    options::{AudioOptions, ImageOptions, Placement, TextOptions},
    timeline::TimelineBuilder,
};
use crate::{
    assets::audio::AssetValidator,
    composition::{clip::Clip, transition::TransitionType},
    defaults::DefaultsManager,
    foundation::{error::VineError, kind::TrackKind},
};

struct AcceptAll;

impl AssetValidator for AcceptAll {
    fn is_valid_audio(&self, _path: &str) -> bool {
        true
    }
}

fn lane_names(b: &TimelineBuilder, kind: TrackKind) -> Vec<String> {
    b.tracks(kind).iter().map(|t| t.name.clone()).collect()
}

fn audio_volume(clip: &Clip) -> f64 {
    match clip {
        Clip::Audio(a) => a.props.volume,
        other => panic!("expected audio, got {other}"),
    }
}

#[test]
fn fresh_builder_has_one_lane_per_kind_and_zero_duration() {
    let b = TimelineBuilder::default();
    for kind in TrackKind::ALL {
        assert_eq!(lane_names(&b, kind), [kind.lane_name(0)]);
        assert_eq!(b.cursor(kind), 0.0);
    }
    assert_eq!(b.duration(), 0.0);
    assert_eq!((b.width(), b.height(), b.fps()), (1920, 1080, 30.0));
}

#[test]
fn open_ended_clips_do_not_extend_duration() {
    let mut b = TimelineBuilder::default();
    b.add_image_at("a.png", Placement::at(40.0), ImageOptions::default())
        .unwrap();
    b.add_text("forever", None, TextOptions::default()).unwrap();
    assert_eq!(b.duration(), 0.0);

    b.add_image_at(
        "b.png",
        Placement::at(15.0).for_duration(8.0),
        ImageOptions::default(),
    )
    .unwrap();
    assert_eq!(b.duration(), 23.0);
}

#[test]
fn sequential_adds_advance_their_own_cursor() {
    let mut b = TimelineBuilder::default();
    b.add_image("a.png", Some(3.0), ImageOptions::default())
        .unwrap()
        .add_image("b.png", Some(2.0), ImageOptions::default())
        .unwrap()
        .add_text("hello", Some(1.5), TextOptions::default())
        .unwrap()
        .add_voice("v.mp3", Some(4.0), AudioOptions::default())
        .unwrap();

    assert_eq!(b.cursor(TrackKind::Video), 5.0);
    assert_eq!(b.cursor(TrackKind::Text), 1.5);
    assert_eq!(b.cursor(TrackKind::Voice), 4.0);
    assert_eq!(b.cursor(TrackKind::Music), 0.0);

    let video = &b.tracks(TrackKind::Video)[0].clips;
    assert_eq!(video[1].start_time(), 3.0);
    assert_eq!(b.track_count().video, 1);
}

#[test]
fn sequential_add_without_duration_keeps_cursor() {
    let mut b = TimelineBuilder::default();
    b.add_music("bed.mp3", None, AudioOptions::default())
        .unwrap();
    assert_eq!(b.cursor(TrackKind::Music), 0.0);
    b.add_music("sting.wav", Some(2.0), AudioOptions::default())
        .unwrap();
    let starts: Vec<f64> = b
        .tracks(TrackKind::Music)
        .iter()
        .flat_map(|t| t.clips.iter().map(Clip::start_time))
        .collect();
    assert_eq!(starts, [0.0, 0.0]);
    assert_eq!(b.cursor(TrackKind::Music), 2.0);
}

#[test]
fn sticky_duration_applies_until_cleared() {
    let mut b = TimelineBuilder::default();
    b.set_duration(2.5).unwrap();
    b.add_image("a.png", None, ImageOptions::default()).unwrap();
    b.add_image("b.png", Some(1.0), ImageOptions::default())
        .unwrap();
    assert_eq!(b.cursor(TrackKind::Video), 3.5);

    b.clear_duration();
    b.add_image("c.png", None, ImageOptions::default()).unwrap();
    assert_eq!(b.cursor(TrackKind::Video), 3.5);
    assert_eq!(b.tracks(TrackKind::Video)[0].clips[2].duration(), None);

    assert!(matches!(b.set_duration(-1.0), Err(VineError::Range(_))));
}

#[test]
fn explicit_adds_only_move_cursors_forward() {
    let mut b = TimelineBuilder::default();
    b.add_text_at(
        "late",
        Placement::at(10.0).for_duration(2.0),
        TextOptions::default(),
    )
    .unwrap();
    assert_eq!(b.cursor(TrackKind::Text), 12.0);

    b.add_text_at(
        "early",
        Placement::at(1.0).for_duration(1.0),
        TextOptions::default(),
    )
    .unwrap();
    assert_eq!(b.cursor(TrackKind::Text), 12.0);

    b.add_text_at("open", Placement::at(20.0), TextOptions::default())
        .unwrap();
    assert_eq!(b.cursor(TrackKind::Text), 20.0);
}

#[test]
fn mutually_overlapping_clips_get_one_lane_each() {
    for kind in TrackKind::ALL {
        let mut b = TimelineBuilder::default();
        for i in 0..4 {
            let at = Placement::at(i as f64 * 0.5).for_duration(10.0);
            match kind {
                TrackKind::Video => b.add_image_at("x.png", at, ImageOptions::default()),
                TrackKind::Text => b.add_text_at("x", at, TextOptions::default()),
                TrackKind::Voice => b.add_voice_at("x.wav", at, AudioOptions::default()),
                TrackKind::Music => b.add_music_at("x.wav", at, AudioOptions::default()),
                TrackKind::Sfx => b.add_sfx_at("x.wav", at, AudioOptions::default()),
            }
            .unwrap();
        }
        let expected: Vec<String> = (0..4).map(|i| kind.lane_name(i)).collect();
        assert_eq!(lane_names(&b, kind), expected, "{kind}");
        assert!(b.tracks(kind).iter().all(|t| t.clips.len() == 1));
        assert!(b.tracks(kind).iter().all(|t| t.z_order == 0));
    }
}

#[test]
fn freed_lanes_are_reused() {
    let mut b = TimelineBuilder::default();
    let opts = AudioOptions::default;
    b.add_sfx_at("a.wav", Placement::at(0.0).for_duration(2.0), opts())
        .unwrap();
    b.add_sfx_at("b.wav", Placement::at(1.0).for_duration(2.0), opts())
        .unwrap();
    b.add_sfx_at("c.wav", Placement::at(2.0).for_duration(2.0), opts())
        .unwrap();
    assert_eq!(lane_names(&b, TrackKind::Sfx), ["sfx_0", "sfx_1"]);
    assert_eq!(b.tracks(TrackKind::Sfx)[0].clips.len(), 2);
}

#[test]
fn end_time_equal_to_start_gives_zero_duration() {
    let mut b = TimelineBuilder::default();
    b.add_image_at("a.png", Placement::at(3.0).until(3.0), ImageOptions::default())
        .unwrap();
    let clip = &b.tracks(TrackKind::Video)[0].clips[0];
    assert_eq!(clip.duration(), Some(0.0));
    assert_eq!(b.cursor(TrackKind::Video), 3.0);
}

#[test]
fn duration_and_end_time_together_conflict_for_every_kind() {
    let mut b = TimelineBuilder::default();
    let at = Placement::at(1.0).for_duration(2.0).until(3.0);
    let results = [
        b.add_image_at("a.png", at, ImageOptions::default()).map(|_| ()),
        b.add_text_at("t", at, TextOptions::default()).map(|_| ()),
        b.add_voice_at("v.mp3", at, AudioOptions::default()).map(|_| ()),
        b.add_music_at("m.mp3", at, AudioOptions::default()).map(|_| ()),
        b.add_sfx_at("s.mp3", at, AudioOptions::default()).map(|_| ()),
    ];
    for r in results {
        assert!(matches!(r, Err(VineError::Conflict(_))));
    }
    assert_eq!(b.clip_count(), TimelineBuilder::default().clip_count());
}

#[test]
fn timing_violations_are_classified() {
    let mut b = TimelineBuilder::default();
    assert!(matches!(
        b.add_image_at("a.png", Placement::at(-1.0), ImageOptions::default()),
        Err(VineError::Range(_))
    ));
    assert!(matches!(
        b.add_image_at(
            "a.png",
            Placement::at(1.0).for_duration(-0.5),
            ImageOptions::default()
        ),
        Err(VineError::Range(_))
    ));
    assert!(matches!(
        b.add_text_at("t", Placement::at(5.0).until(4.0), TextOptions::default()),
        Err(VineError::Ordering(_))
    ));
    assert!(matches!(
        b.add_image(
            "a.png",
            Some(1.0),
            ImageOptions {
                opacity: 1.5,
                ..ImageOptions::default()
            }
        ),
        Err(VineError::Range(_))
    ));
}

#[test]
fn failed_add_leaves_builder_untouched() {
    let mut b = TimelineBuilder::default();
    b.add_voice("v.mp3", Some(2.0), AudioOptions::default())
        .unwrap();
    let before = format!("{b:?}");

    let err = b
        .add_voice("notes.txt", Some(2.0), AudioOptions::default())
        .unwrap_err();
    assert!(matches!(err, VineError::AssetRejected(_)));

    // Would need a second lane if it were valid.
    let err = b
        .add_voice_at(
            "v.mp3",
            Placement::at(0.5).for_duration(1.0),
            AudioOptions::default().with_volume(3.0),
        )
        .unwrap_err();
    assert!(matches!(err, VineError::Range(_)));

    assert_eq!(format!("{b:?}"), before);
}

#[test]
fn asset_probe_is_consulted_for_unknown_extensions() {
    let mut b = TimelineBuilder::default().with_validator(AcceptAll);
    b.add_sfx("whoosh.opus", Some(1.0), AudioOptions::default())
        .unwrap();
    assert_eq!(b.clip_count().sfx, 1);
}

#[test]
fn omitted_volume_comes_from_defaults() {
    let mut b = TimelineBuilder::default();
    b.add_voice("v.mp3", Some(1.0), AudioOptions::default())
        .unwrap()
        .add_music("m.mp3", Some(1.0), AudioOptions::default())
        .unwrap()
        .add_sfx("s.mp3", Some(1.0), AudioOptions::default())
        .unwrap()
        .add_sfx("t.mp3", Some(1.0), AudioOptions::default().with_volume(0.2))
        .unwrap();

    assert_eq!(audio_volume(&b.tracks(TrackKind::Voice)[0].clips[0]), 1.0);
    assert_eq!(audio_volume(&b.tracks(TrackKind::Music)[0].clips[0]), 0.5);
    let sfx = &b.tracks(TrackKind::Sfx)[0].clips;
    assert_eq!(audio_volume(&sfx[0]), 0.8);
    assert_eq!(audio_volume(&sfx[1]), 0.2);

    let mut defaults = DefaultsManager::new();
    defaults.set("music_volume", 0.25);
    let mut b = TimelineBuilder::default().with_defaults(defaults);
    b.add_music("m.mp3", None, AudioOptions::default()).unwrap();
    assert_eq!(audio_volume(&b.tracks(TrackKind::Music)[0].clips[0]), 0.25);
}

#[test]
fn sequential_transition_overlaps_the_tail() {
    let mut b = TimelineBuilder::default();
    b.add_image("a.png", Some(5.0), ImageOptions::default())
        .unwrap()
        .add_music("m.mp3", Some(7.0), AudioOptions::default())
        .unwrap()
        .add_transition(TransitionType::Crossfade, 1.0)
        .unwrap();
    let t = &b.transitions()[0];
    assert_eq!((t.start_time, t.duration), (6.0, 1.0));
    // Transitions do not move cursors.
    assert_eq!(b.cursor(TrackKind::Music), 7.0);
    assert_eq!(b.duration(), 7.0);
}

#[test]
fn transition_before_zero_is_rejected() {
    let mut b = TimelineBuilder::default();
    b.add_image("a.png", Some(0.5), ImageOptions::default())
        .unwrap();
    assert!(matches!(
        b.add_transition(TransitionType::Fade, 1.0),
        Err(VineError::Range(_))
    ));
    assert!(b.transitions().is_empty());

    b.add_transition_at(TransitionType::Wipe, 0.0, 0.5).unwrap();
    assert_eq!(b.transitions().len(), 1);
}

#[test]
fn build_snapshots_and_agrees_on_duration() {
    let mut b = TimelineBuilder::default();
    b.add_image("a.png", Some(4.0), ImageOptions::default())
        .unwrap()
        .add_text_at(
            "title",
            Placement::at(1.0).for_duration(2.0),
            TextOptions::default(),
        )
        .unwrap()
        .add_transition_at(TransitionType::Fade, 3.5, 1.0)
        .unwrap();

    let spec = b.build().unwrap();
    assert_eq!(spec.title, "Generated Video");
    assert_eq!(spec.total_duration(), b.duration());
    assert_eq!(spec.total_duration(), 4.5);
    assert_eq!(spec.clip_count(), b.clip_count());

    // The builder keeps going after a build.
    b.add_image("b.png", Some(1.0), ImageOptions::default())
        .unwrap();
    assert_eq!(spec.clip_count().video, 1);
    assert_eq!(b.build_titled("Second").unwrap().clip_count().video, 2);
}

#[test]
fn clear_resets_state_but_keeps_canvas() {
    let mut b = TimelineBuilder::new(1280, 720, 24.0);
    b.set_duration(1.0).unwrap();
    for _ in 0..3 {
        b.add_image_at("a.png", Placement::at(0.0).for_duration(1.0), ImageOptions::default())
            .unwrap();
    }
    b.add_transition_at(TransitionType::Slide, 0.0, 1.0).unwrap();
    b.set_fps(25.0).clear();

    assert_eq!((b.width(), b.height(), b.fps()), (1280, 720, 25.0));
    assert_eq!(lane_names(&b, TrackKind::Video), ["video_0"]);
    assert!(b.transitions().is_empty());
    assert_eq!(b.next_duration(), None);
    assert_eq!(b.cursor(TrackKind::Video), 0.0);
}

#[test]
fn canvas_is_checked_at_build_time() {
    let mut b = TimelineBuilder::new(1920, 1080, 30.0);
    b.set_fps(0.0);
    assert!(matches!(b.build(), Err(VineError::Range(_))));
    b.set_fps(60.0);
    assert_eq!(b.build().unwrap().fps(), 60.0);
}

#[test]
fn many_adds_behave_like_few() {
    let mut b = TimelineBuilder::default();
    for i in 0..500 {
        b.add_image(format!("f{i}.png"), Some(0.1), ImageOptions::default())
            .unwrap();
    }
    assert_eq!(b.track_count().video, 1);
    assert_eq!(b.clip_count().video, 500);
    let last = b.tracks(TrackKind::Video)[0].clips.last().unwrap();
    assert_eq!(last.end_time(), Some(b.cursor(TrackKind::Video)));
}

#[test]
fn audio_configs_reach_the_clip() {
    use crate::composition::clip::{MusicConfig, VoiceConfig};

    let mut b = TimelineBuilder::default();
    let slow = AudioOptions {
        voice_config: Some(VoiceConfig {
            speed: 0.75,
            ..VoiceConfig::default()
        }),
        ..AudioOptions::default()
    };
    b.add_voice("v.mp3", Some(2.0), slow).unwrap();
    match &b.tracks(TrackKind::Voice)[0].clips[0] {
        Clip::Audio(a) => {
            assert_eq!(a.props.voice_config.map(|v| v.speed), Some(0.75));
            assert_eq!(a.props.volume, 1.0);
        }
        other => panic!("expected audio, got {other}"),
    }

    let bad = AudioOptions {
        music_config: Some(MusicConfig {
            duck_level: -0.1,
            ..MusicConfig::default()
        }),
        ..AudioOptions::default()
    };
    assert!(matches!(
        b.add_music("m.mp3", Some(2.0), bad),
        Err(VineError::Range(_))
    ));
    assert_eq!(b.cursor(TrackKind::Music), 0.0);
    assert_eq!(b.clip_count().music, 0);
}

#[test]
fn invalid_animation_leaves_the_builder_unchanged() {
    use crate::composition::animation::{Animation, Effect, Slide};

    let mut b = TimelineBuilder::default();
    let before = format!("{b:?}");
    let opts = ImageOptions {
        animations: vec![Animation::new(Effect::Slide(Slide {
            distance: -10.0,
            ..Slide::default()
        }))],
        ..ImageOptions::default()
    };
    assert!(matches!(
        b.add_image("a.png", Some(2.0), opts),
        Err(VineError::Range(_))
    ));
    assert_eq!(format!("{b:?}"), before);
}

#[test]
fn overflowing_placement_is_rejected() {
    let mut b = TimelineBuilder::default();
    let err = b
        .add_image_at(
            "a.png",
            Placement::at(f64::MAX).for_duration(f64::MAX),
            ImageOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, VineError::Range(_)));
    assert_eq!(b.clip_count().video, 0);
}
