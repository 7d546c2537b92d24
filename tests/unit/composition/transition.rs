use super::*;

#[test]
fn types_parse_case_insensitively() {
    assert_eq!(
        " Dissolve ".parse::<TransitionType>().unwrap(),
        TransitionType::Dissolve
    );
    assert!(matches!(
        "spin".parse::<TransitionType>(),
        Err(VineError::UnknownValue(_))
    ));
    assert!(matches!(
        "".parse::<TransitionType>(),
        Err(VineError::UnknownValue(_))
    ));
}

#[test]
fn negative_timing_is_rejected() {
    assert!(matches!(
        Transition::new(TransitionType::Fade, -0.5, 1.0),
        Err(VineError::Range(_))
    ));
    assert!(matches!(
        Transition::new(TransitionType::Fade, 0.0, -1.0),
        Err(VineError::Range(_))
    ));
}

#[test]
fn activity_window_excludes_end() {
    let t = Transition::new(TransitionType::Crossfade, 4.0, 1.0).unwrap();
    assert_eq!(t.end_time(), 5.0);
    assert!(!t.is_active_at(3.99));
    assert!(t.is_active_at(4.0));
    assert!(t.is_active_at(4.5));
    assert!(!t.is_active_at(5.0));
}

#[test]
fn progress_ramps_linearly() {
    let t = Transition::new(TransitionType::Fade, 2.0, 2.0).unwrap();
    assert_eq!(t.progress_at(1.0), 0.0);
    assert_eq!(t.progress_at(3.0), 0.5);
    assert_eq!(t.progress_at(10.0), 1.0);
}

#[test]
fn zero_length_transition_jumps_to_done() {
    let t = Transition::new(TransitionType::Wipe, 2.0, 0.0).unwrap();
    assert_eq!(t.progress_at(1.9), 0.0);
    assert_eq!(t.progress_at(2.0), 1.0);
    assert!(!t.is_active_at(2.0));
}

#[test]
fn easing_shapes_progress() {
    let t = Transition::new(TransitionType::Slide, 0.0, 1.0)
        .unwrap()
        .with_easing(Easing::EaseIn)
        .with_direction(TransitionDirection::Left);
    assert_eq!(t.eased_progress_at(0.5), 0.25);
    assert_eq!(t.direction, TransitionDirection::Left);
}

#[test]
fn json_uses_lowercase_names() {
    let t = Transition::new(TransitionType::Crossfade, 1.0, 0.5)
        .unwrap()
        .between(vec!["video_0".into()], vec!["video_1".into()]);
    let v = serde_json::to_value(&t).unwrap();
    assert_eq!(v["transition_type"], "crossfade");
    assert_eq!(v["easing"], "linear");
    assert_eq!(v["to_tracks"][0], "video_1");
}

#[test]
fn end_time_must_stay_finite() {
    assert!(matches!(
        Transition::new(TransitionType::Fade, f64::MAX, f64::MAX),
        Err(VineError::Range(_))
    ));
}

#[test]
fn edge_transitions_default_and_bound_their_length() {
    let t: EdgeTransition =
        serde_json::from_value(serde_json::json!({ "transition_type": "crossfade" })).unwrap();
    assert_eq!(t.duration, 1.0);
    assert_eq!(t.easing, Easing::EaseInOut);

    assert!(EdgeTransition::new(TransitionType::Wipe, 0.1).is_ok());
    assert!(EdgeTransition::new(TransitionType::Wipe, 10.0).is_ok());
    for bad in [0.05, 10.5, f64::NAN] {
        assert!(matches!(
            EdgeTransition::new(TransitionType::Wipe, bad),
            Err(VineError::Range(_))
        ));
    }
}
