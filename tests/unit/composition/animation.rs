use super::*;
use crate::foundation::error::VineError;

#[test]
fn effects_are_tagged_by_type() {
    let a = Animation::new(Effect::Slide(Slide {
        direction: SlideDirection::Up,
        distance: 40.0,
    }))
    .for_duration(1.5);
    let v = serde_json::to_value(a).unwrap();
    assert_eq!(v["effect"]["type"], "slide");
    assert_eq!(v["effect"]["direction"], "up");
    assert_eq!(v["easing"], "ease_in_out");

    let parsed: Animation = serde_json::from_value(serde_json::json!({
        "effect": { "type": "ken_burns", "pan_x": -0.5 },
        "easing": "ease_out_cubic"
    }))
    .unwrap();
    assert_eq!(parsed.start_time, 0.0);
    assert_eq!(parsed.duration, None);
    assert_eq!(parsed.easing, Easing::EaseOutCubic);
    match parsed.effect {
        Effect::KenBurns(k) => assert_eq!((k.zoom_factor, k.pan_x), (1.2, -0.5)),
        other => panic!("unexpected {}", other.name()),
    }

    let stat: Animation =
        serde_json::from_value(serde_json::json!({ "effect": { "type": "static" } })).unwrap();
    assert_eq!(stat.effect, Effect::Static);
}

#[test]
fn unknown_names_do_not_load() {
    assert!(
        serde_json::from_value::<Animation>(serde_json::json!({
            "effect": { "type": "static" },
            "easing": "ease_in_quart"
        }))
        .is_err()
    );
    assert!(
        serde_json::from_value::<Animation>(serde_json::json!({ "effect": { "type": "spin" } }))
            .is_err()
    );
    assert!(matches!(
        "elastic".parse::<Easing>(),
        Err(VineError::UnknownValue(_))
    ));
}

#[test]
fn effect_parameters_are_range_checked() {
    let pan = Animation::new(Effect::KenBurns(KenBurns {
        pan_y: 1.5,
        ..KenBurns::default()
    }));
    let err = pan.validate().unwrap_err();
    assert!(matches!(err, VineError::Range(_)));
    assert!(err.to_string().contains("ken_burns effect"));

    let backwards = Animation::new(Effect::Slide(Slide {
        distance: -1.0,
        ..Slide::default()
    }));
    assert!(backwards.validate().is_err());

    assert!(
        Animation::new(Effect::Static)
            .starting_at(-0.5)
            .validate()
            .is_err()
    );
    assert!(
        Animation::new(Effect::Static)
            .starting_at(f64::MAX)
            .for_duration(f64::MAX)
            .validate()
            .is_err()
    );
    assert!(
        Animation::new(Effect::KenBurns(KenBurns {
            zoom_factor: 3.0,
            pan_x: -1.0,
            pan_y: 1.0,
        }))
        .validate()
        .is_ok()
    );
}

#[test]
fn overlap_and_progress_follow_half_open_windows() {
    let a = Animation::new(Effect::Static).for_duration(2.0);
    let b = Animation::new(Effect::Static)
        .starting_at(2.0)
        .for_duration(1.0);
    let open = Animation::new(Effect::Static).starting_at(0.5);
    assert!(!a.overlaps(&b));
    assert!(a.overlaps(&a));
    assert!(!a.overlaps(&open));

    let linear = a.with_easing(Easing::Linear);
    assert_eq!(linear.progress_at(-1.0), 0.0);
    assert_eq!(linear.progress_at(1.0), 0.5);
    assert_eq!(linear.progress_at(5.0), 1.0);
    assert_eq!(open.progress_at(0.25), 0.0);
    assert_eq!(open.progress_at(0.5), 1.0);
}
