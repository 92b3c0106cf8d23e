// Tests for the per-entity glitch transition state machine.

use companion_core::*;
use proptest::prelude::*;

const DT: f32 = 0.25;

fn run(c: &mut TransitionController, mood: MoodState, frames: usize) {
    for _ in 0..frames {
        c.advance(DT, mood);
    }
}

fn fully_glitched(speed: f32) -> TransitionController {
    let mut c = TransitionController::new(speed, MoodState::Idle);
    run(&mut c, MoodState::Idle, 2);
    run(&mut c, MoodState::Glitch, 5);
    c
}

#[test]
fn steady_mood_changes_stay_steady() {
    let mut c = TransitionController::new(1.0, MoodState::Idle);
    c.advance(DT, MoodState::Idle);
    c.advance(DT, MoodState::Listening);
    c.advance(DT, MoodState::Thinking);
    assert_eq!(c.state().phase, TransitionPhase::Steady);
    assert!(c.weights().is_none());
    assert_eq!(c.state().resting_mood, MoodState::Thinking);
    assert_eq!(c.state().phase.eased_progress(), None);
}

#[test]
fn entering_glitch_counts_the_edge_frame() {
    let mut c = TransitionController::new(1.0, MoodState::Idle);
    c.advance(DT, MoodState::Glitch);
    assert_eq!(
        c.state().phase,
        TransitionPhase::EnteringGlitch { since_entered: DT }
    );
    run(&mut c, MoodState::Glitch, 3);
    assert_eq!(c.state().time_since_entered_glitch(), 1.0);
}

#[test]
fn zero_delta_edge_starts_at_zero() {
    let mut c = TransitionController::new(1.0, MoodState::Idle);
    c.advance(0.0, MoodState::Glitch);
    assert_eq!(
        c.state().phase,
        TransitionPhase::EnteringGlitch { since_entered: 0.0 }
    );
}

#[test]
fn elapsed_time_is_speed_scaled_and_never_reset() {
    let mut c = TransitionController::new(2.0, MoodState::Idle);
    run(&mut c, MoodState::Idle, 4);
    run(&mut c, MoodState::Glitch, 4);
    run(&mut c, MoodState::Idle, 4);
    assert_eq!(c.state().elapsed_time, 6.0);
    assert_eq!(c.speed(), 2.0);
}

#[test]
fn glitch_keeps_the_resting_mood() {
    let mut c = TransitionController::new(1.0, MoodState::Listening);
    c.advance(DT, MoodState::Glitch);
    assert_eq!(c.state().resting_mood, MoodState::Listening);
    assert_eq!(c.state().last_observed_mood, MoodState::Glitch);
}

#[test]
fn created_in_glitch_enters_immediately() {
    let c = TransitionController::new(1.0, MoodState::Glitch);
    assert_eq!(
        c.state().phase,
        TransitionPhase::EnteringGlitch { since_entered: 0.0 }
    );
    assert_eq!(c.state().resting_mood, MoodState::Idle);
}

#[test]
fn exit_runs_restore_then_settle_then_steady() {
    let mut c = fully_glitched(1.0);
    c.advance(DT, MoodState::Idle);
    match c.state().phase {
        TransitionPhase::ExitingGlitch(ExitStage::RestoringMotion { since_exited, from }) => {
            assert_eq!(since_exited, DT);
            assert_eq!(from.reduction, GLITCH_OFFSET_REDUCTION);
            assert_eq!(from.pull, GLITCH_CENTER_PULL);
            assert_eq!(from.breakup, 0.0);
        }
        other => panic!("expected restoring, got {other:?}"),
    }
    let w = c.weights().reduction;
    assert!(w < GLITCH_OFFSET_REDUCTION && w > 0.8 * GLITCH_OFFSET_REDUCTION);

    run(&mut c, MoodState::Idle, 6);
    assert_eq!(c.state().phase.name(), "restoring");
    assert_eq!(c.state().time_since_exited_glitch(), 1.75);

    c.advance(DT, MoodState::Idle);
    assert_eq!(c.state().phase.name(), "settling");
    assert_eq!(c.state().time_since_post_glitch_settled(), 0.0);
    assert_eq!(c.state().time_since_exited_glitch(), 0.0);
    assert!(c.weights().is_none());

    run(&mut c, MoodState::Idle, 3);
    assert_eq!(c.state().phase.name(), "settling");
    c.advance(DT, MoodState::Idle);
    assert_eq!(c.state().phase, TransitionPhase::Steady);
}

#[test]
fn restore_halfway_halves_the_weights() {
    let mut c = fully_glitched(1.0);
    c.advance(DT, MoodState::Idle);
    run(&mut c, MoodState::Idle, 3);
    assert_eq!(c.state().time_since_exited_glitch(), 1.0);
    let w = c.weights();
    assert!((w.reduction - GLITCH_OFFSET_REDUCTION * 0.5).abs() < 1e-5);
    assert!((w.pull - GLITCH_CENTER_PULL * 0.5).abs() < 1e-5);
    assert!((w.opacity - 0.5).abs() < 1e-5);
}

#[test]
fn reentry_during_restore_resets_entry_timer() {
    let mut c = fully_glitched(1.0);
    c.advance(DT, MoodState::Idle);
    run(&mut c, MoodState::Idle, 2);
    c.advance(DT, MoodState::Glitch);
    assert_eq!(
        c.state().phase,
        TransitionPhase::EnteringGlitch { since_entered: DT }
    );
    assert_eq!(c.state().time_since_exited_glitch(), 0.0);
}

#[test]
fn reentry_during_settle_resets_entry_timer() {
    let mut c = fully_glitched(1.0);
    c.advance(DT, MoodState::Idle);
    run(&mut c, MoodState::Idle, 9);
    assert_eq!(c.state().phase.name(), "settling");
    c.advance(DT, MoodState::Glitch);
    assert_eq!(
        c.state().phase,
        TransitionPhase::EnteringGlitch { since_entered: DT }
    );
    assert_eq!(c.state().time_since_post_glitch_settled(), 0.0);
}

#[test]
fn entering_weights_follow_the_entry_curve() {
    let start = GlitchWeights::entering(0.0);
    assert_eq!(start.reduction, 0.0);
    assert_eq!(start.shrink, 0.0);
    assert_eq!(start.breakup, 1.0);
    assert_eq!(start.hold, 1.0);

    let snapped = GlitchWeights::entering(GLITCH_SHRINK_WINDOW_SEC);
    assert_eq!(snapped.shrink, 1.0);

    let full = GlitchWeights::entering(GLITCH_ENTER_WINDOW_SEC);
    assert_eq!(full.reduction, GLITCH_OFFSET_REDUCTION);
    assert_eq!(full.pull, GLITCH_CENTER_PULL);
    assert_eq!(full.opacity, 1.0);
    assert_eq!(full.breakup, 0.0);
}

#[test]
#[should_panic]
fn zero_speed_is_rejected() {
    let _ = TransitionController::new(0.0, MoodState::Idle);
}

#[test]
#[should_panic]
fn negative_delta_is_rejected() {
    let mut c = TransitionController::new(1.0, MoodState::Idle);
    c.advance(-0.1, MoodState::Idle);
}

#[test]
#[should_panic]
fn nan_delta_is_rejected() {
    let mut c = TransitionController::new(1.0, MoodState::Idle);
    c.advance(f32::NAN, MoodState::Idle);
}

proptest! {
    #[test]
    fn weights_stay_bounded_and_one_timer_runs(
        steps in prop::collection::vec((0.0f32..0.5, any::<bool>()), 1..80),
        speed in 0.1f32..4.0,
    ) {
        let mut c = TransitionController::new(speed, MoodState::Idle);
        for (dt, glitch) in steps {
            let mood = if glitch { MoodState::Glitch } else { MoodState::Speaking };
            c.advance(dt, mood);
            let w = c.weights();
            for ch in [w.reduction, w.pull, w.shrink, w.hold, w.opacity, w.breakup] {
                prop_assert!((0.0..=1.0).contains(&ch));
            }
            prop_assert!(w.reduction <= GLITCH_OFFSET_REDUCTION + 1e-6);
            prop_assert!(w.pull <= GLITCH_CENTER_PULL + 1e-6);

            let s = c.state();
            let running = [
                s.time_since_entered_glitch(),
                s.time_since_exited_glitch(),
                s.time_since_post_glitch_settled(),
            ]
            .iter()
            .filter(|t| **t > 0.0)
            .count();
            prop_assert!(running <= 1);
        }
    }
}
