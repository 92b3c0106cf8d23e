// Tests for steady motion, the glitch blend and the full glitch round trip.

use companion_core::*;
use glam::Vec3;
use proptest::prelude::*;

const DT: f32 = 1.0 / 64.0;

fn sample_entity(index: usize) -> Entity {
    let mut rng = generation_rng(42, 1);
    let set = generate_entities(MoodState::Idle, 5, &mut rng).unwrap();
    set[index].clone()
}

fn assert_close(a: MotionSample, b: MotionSample, tol: f32) {
    assert!((a.offset - b.offset).length() <= tol, "{a:?} vs {b:?}");
    assert!((a.scale_multiplier - b.scale_multiplier).abs() <= tol, "{a:?} vs {b:?}");
    assert!((a.opacity - b.opacity).abs() <= tol, "{a:?} vs {b:?}");
}

#[test]
fn no_glitch_weights_reproduce_steady_formula() {
    let e = sample_entity(3);
    for t in [0.0, 0.7, 13.25, 400.0] {
        for mood in [MoodState::Idle, MoodState::Thinking] {
            let blended = blended_sample(&e, t, mood, GlitchWeights::NONE);
            assert_eq!(blended, steady_sample(e.layer_index, t, mood));
        }
    }
}

#[test]
fn layers_are_desynchronized() {
    let m = MoodState::Idle.motion();
    let a = primary_offset(0, 0.0, m);
    let b = primary_offset(1, 0.0, m);
    assert!((a - b).length() > 0.1);
    assert_ne!(raw_opacity(0, 2.0), raw_opacity(1, 2.0));
}

#[test]
fn rotation_spins_on_axis_ratios() {
    let m = MoodState::Idle.motion();
    assert_eq!(rotation(0.0, m), Vec3::ZERO);
    let r = rotation(1.0, m);
    assert!((r - Vec3::new(0.15, 0.21, 0.09)).length() < 1e-6);
}

#[test]
fn sample_helpers_apply_to_base_values() {
    let e = sample_entity(0);
    let s = steady_sample(e.layer_index, 1.0, MoodState::Idle);
    assert_eq!(s.position(&e), e.base_position + s.offset);
    assert_eq!(s.scale(&e), e.base_scale * s.scale_multiplier);
}

#[test]
fn glitch_entry_scale_starts_at_one_and_never_grows() {
    let e = sample_entity(2);
    let mut c = TransitionController::new(e.speed, MoodState::Idle);
    for _ in 0..10 {
        c.advance(DT, MoodState::Idle);
    }
    let t = c.state().elapsed_time;
    let at_edge = blended_sample(&e, t, MoodState::Idle, GlitchWeights::entering(0.0));
    assert_eq!(at_edge.scale_multiplier, 1.0);

    c.advance(DT, MoodState::Glitch);
    let mut last = sample(&e, c.state()).scale_multiplier;
    assert!(last < 1.0);
    for _ in 0..30 {
        c.advance(DT, MoodState::Glitch);
        let s = sample(&e, c.state()).scale_multiplier;
        assert!(s <= last, "scale grew from {last} to {s}");
        last = s;
    }
    assert!((last - GLITCH_SCALE_FLOOR).abs() < 1e-6);
}

#[test]
fn full_glitch_pulls_toward_center_at_fixed_opacity() {
    let e = sample_entity(1);
    let mut c = TransitionController::new(e.speed, MoodState::Idle);
    c.advance(DT, MoodState::Glitch);
    for _ in 0..64 {
        c.advance(DT, MoodState::Glitch);
    }
    let s = sample(&e, c.state());
    assert!(s.position(&e).length() < e.base_position.length() * 0.6);
    assert!((s.opacity - GLITCH_OPACITY).abs() < 1e-5);
}

#[test]
fn glitch_round_trip_settles_back_to_steady_formula() {
    let e = sample_entity(2);
    let mut c = TransitionController::new(e.speed, MoodState::Idle);
    for _ in 0..64 {
        c.advance(DT, MoodState::Idle);
    }
    for _ in 0..64 {
        c.advance(DT, MoodState::Glitch);
    }
    let before_exit = sample(&e, c.state());

    c.advance(DT, MoodState::Idle);
    let at_exit = sample(&e, c.state());
    assert!((at_exit.position(&e) - before_exit.position(&e)).length() < 0.05);
    assert!((at_exit.opacity - before_exit.opacity).abs() < 0.05);

    for _ in 0..127 {
        c.advance(DT, MoodState::Idle);
    }
    // the exit frame plus 127 more: exactly 2.0 s after the edge
    let t = c.state().elapsed_time;
    assert_close(
        sample(&e, c.state()),
        steady_sample(e.layer_index, t, MoodState::Idle),
        1e-3,
    );

    for _ in 0..64 {
        c.advance(DT, MoodState::Idle);
    }
    assert_eq!(c.state().phase, TransitionPhase::Steady);
    let t = c.state().elapsed_time;
    assert_eq!(
        sample(&e, c.state()),
        steady_sample(e.layer_index, t, MoodState::Idle)
    );
}

#[test]
fn glitch_scenario_snaps_scale_then_returns_to_idle_formula() {
    let e = Entity {
        base_position: Vec3::ZERO,
        layer_index: 0,
        speed: 1.0,
        base_scale: 1.0,
        color: [1.0; 3],
    };
    let dt = 1.0 / 60.0;
    let mut c = TransitionController::new(e.speed, MoodState::Idle);

    // glitch from t = 0 to t = 0.5
    for frame in 1..=30 {
        c.advance(dt, MoodState::Glitch);
        if frame == 3 {
            let s = sample(&e, c.state());
            assert!((s.scale_multiplier - GLITCH_SCALE_FLOOR).abs() < 1e-3, "{s:?}");
        }
    }
    // idle from t = 0.5 to t = 2.5
    for _ in 0..120 {
        c.advance(dt, MoodState::Idle);
    }
    assert!((c.state().elapsed_time - 2.5).abs() < 1e-4);
    assert_close(
        sample(&e, c.state()),
        steady_sample(0, 2.5, MoodState::Idle),
        1e-3,
    );
}

#[test]
fn restore_motion_is_continuous_frame_to_frame() {
    let e = sample_entity(4);
    let mut c = TransitionController::new(e.speed, MoodState::Idle);
    for _ in 0..40 {
        c.advance(DT, MoodState::Glitch);
    }
    let mut prev = sample(&e, c.state()).position(&e);
    for _ in 0..(64 * 3) {
        c.advance(DT, MoodState::Idle);
        let p = sample(&e, c.state()).position(&e);
        assert!((p - prev).length() < 0.1, "jump {prev} -> {p}");
        prev = p;
    }
}

#[test]
#[should_panic]
fn out_of_range_layer_is_rejected() {
    let mut e = sample_entity(0);
    e.layer_index = MAX_ENTITY_COUNT;
    let _ = blended_sample(&e, 0.0, MoodState::Idle, GlitchWeights::NONE);
}

proptest! {
    #[test]
    fn steady_opacity_is_clamped(layer in 0usize..MAX_ENTITY_COUNT, t in 0.0f32..5000.0) {
        let s = steady_sample(layer, t, MoodState::Speaking);
        prop_assert!(s.opacity >= OPACITY_MIN && s.opacity <= OPACITY_MAX);
    }

    #[test]
    fn drift_is_bounded_by_mood_amplitude(layer in 0usize..MAX_ENTITY_COUNT, t in 0.0f32..5000.0) {
        for mood in MoodState::ALL {
            let m = mood.motion();
            let o = primary_offset(layer, t, m);
            prop_assert!(o.x.abs() <= m.drift_amplitude + 1e-6);
            prop_assert!(o.y.abs() <= m.drift_amplitude + 1e-6);
            prop_assert!(o.z.abs() <= m.drift_amplitude * DRIFT_Z_SHARE + 1e-6);
        }
    }

    #[test]
    fn blended_opacity_is_clamped(
        layer in 0usize..MAX_ENTITY_COUNT,
        t in 0.0f32..500.0,
        since in 0.0f32..1.0,
    ) {
        let mut e = sample_entity(0);
        e.layer_index = layer;
        let s = blended_sample(&e, t, MoodState::Idle, GlitchWeights::entering(since));
        prop_assert!(s.opacity >= OPACITY_MIN && s.opacity <= OPACITY_MAX);
        prop_assert!(s.scale_multiplier > 0.0);
    }

    #[test]
    fn any_glitch_converges_within_three_seconds(
        glitch_frames in 1usize..200,
        lead_frames in 0usize..100,
        index in 0usize..5,
    ) {
        let e = sample_entity(index);
        let mut c = TransitionController::new(e.speed, MoodState::Idle);
        for _ in 0..lead_frames {
            c.advance(DT, MoodState::Idle);
        }
        for _ in 0..glitch_frames {
            c.advance(DT, MoodState::Glitch);
        }
        for _ in 0..(64 * 3 + 1) {
            c.advance(DT, MoodState::Idle);
        }
        prop_assert_eq!(c.state().phase, TransitionPhase::Steady);
        let t = c.state().elapsed_time;
        prop_assert_eq!(sample(&e, c.state()), steady_sample(e.layer_index, t, MoodState::Idle));
    }

    #[test]
    fn glitch_entry_scale_is_monotonic_for_any_lead_in(
        lead_frames in 0usize..300,
        index in 0usize..5,
    ) {
        let e = sample_entity(index);
        let mut c = TransitionController::new(e.speed, MoodState::Speaking);
        for _ in 0..lead_frames {
            c.advance(DT, MoodState::Speaking);
        }
        c.advance(DT, MoodState::Glitch);
        let mut last = sample(&e, c.state()).scale_multiplier;
        prop_assert!(last < 1.0);
        for _ in 0..20 {
            c.advance(DT, MoodState::Glitch);
            let s = sample(&e, c.state()).scale_multiplier;
            prop_assert!(s <= last);
            last = s;
        }
    }
}
