//! Per-entity glitch transition state machine.
//!
//! ```text
//! Steady ──glitch──▶ EnteringGlitch ──leave──▶ ExitingGlitch(RestoringMotion)
//!    ▲                    ▲                          │ 2.0 s
//!    │                    └────── glitch again ──────┤
//!    │                                               ▼
//!    └──────────── 1.0 s ─────────── ExitingGlitch(FinalSettle)
//! ```
//!
//! Only the active phase carries a timer, so two transition clocks can never
//! run at once. Every edge into a new phase starts its timer at zero before
//! the edge frame's delta is applied.

use crate::constants::{
    GLITCH_CENTER_PULL, GLITCH_ENTER_WINDOW_SEC, GLITCH_EXIT_WINDOW_SEC, GLITCH_OFFSET_REDUCTION,
    GLITCH_SETTLE_WINDOW_SEC, GLITCH_SHRINK_WINDOW_SEC,
};
use crate::mood::MoodState;
use crate::oscillator::{ease_cubic, progress};

/// How far each motion channel is pulled into the glitch regime.
///
/// All zero means pure steady-state motion.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlitchWeights {
    /// Share of the primary drift removed, 0..=0.85.
    pub reduction: f32,
    /// Share of the base position pulled toward the origin, 0..=0.6.
    pub pull: f32,
    /// Eased progress of the scale snap toward the glitch floor, 0..=1.
    pub shrink: f32,
    /// Suppression of the breathing pulse, 0..=1.
    pub hold: f32,
    /// Blend of opacity toward the fixed glitch opacity, 0..=1.
    pub opacity: f32,
    /// Remaining share of the high-frequency breakup amplitude, 0..=1.
    pub breakup: f32,
}

impl GlitchWeights {
    pub const NONE: GlitchWeights = GlitchWeights {
        reduction: 0.0,
        pull: 0.0,
        shrink: 0.0,
        hold: 0.0,
        opacity: 0.0,
        breakup: 0.0,
    };

    /// Weights along the entry curve, `since_entered` seconds into a glitch.
    pub fn entering(since_entered: f32) -> Self {
        let p = progress(since_entered, GLITCH_ENTER_WINDOW_SEC);
        let eased = ease_cubic(p);
        let shrink = ease_cubic(progress(since_entered, GLITCH_SHRINK_WINDOW_SEC));
        Self {
            reduction: GLITCH_OFFSET_REDUCTION * eased,
            pull: GLITCH_CENTER_PULL * eased,
            shrink,
            hold: 1.0,
            opacity: eased,
            breakup: 1.0 - p,
        }
    }

    /// Every channel multiplied by `k`.
    pub fn scaled(self, k: f32) -> Self {
        Self {
            reduction: self.reduction * k,
            pull: self.pull * k,
            shrink: self.shrink * k,
            hold: self.hold * k,
            opacity: self.opacity * k,
            breakup: self.breakup * k,
        }
    }

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ExitStage {
    /// Un-blending from the weights held when the glitch ended.
    RestoringMotion { since_exited: f32, from: GlitchWeights },
    /// Corrective blend from whatever the restore stage left behind.
    FinalSettle { since_settled: f32, from: GlitchWeights },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransitionPhase {
    Steady,
    EnteringGlitch { since_entered: f32 },
    ExitingGlitch(ExitStage),
}

impl TransitionPhase {
    pub fn name(&self) -> &'static str {
        match self {
            TransitionPhase::Steady => "steady",
            TransitionPhase::EnteringGlitch { .. } => "entering",
            TransitionPhase::ExitingGlitch(ExitStage::RestoringMotion { .. }) => "restoring",
            TransitionPhase::ExitingGlitch(ExitStage::FinalSettle { .. }) => "settling",
        }
    }

    /// Glitch weights implied by this phase.
    pub fn weights(&self) -> GlitchWeights {
        match *self {
            TransitionPhase::Steady => GlitchWeights::NONE,
            TransitionPhase::EnteringGlitch { since_entered } => {
                GlitchWeights::entering(since_entered)
            }
            TransitionPhase::ExitingGlitch(ExitStage::RestoringMotion { since_exited, from }) => {
                from.scaled(1.0 - ease_cubic(progress(since_exited, GLITCH_EXIT_WINDOW_SEC)))
            }
            TransitionPhase::ExitingGlitch(ExitStage::FinalSettle {
                since_settled,
                from,
            }) => from.scaled(1.0 - ease_cubic(progress(since_settled, GLITCH_SETTLE_WINDOW_SEC))),
        }
    }

    /// Eased progress through the active window, if any.
    pub fn eased_progress(&self) -> Option<f32> {
        match *self {
            TransitionPhase::Steady => None,
            TransitionPhase::EnteringGlitch { since_entered } => Some(ease_cubic(progress(
                since_entered,
                GLITCH_ENTER_WINDOW_SEC,
            ))),
            TransitionPhase::ExitingGlitch(ExitStage::RestoringMotion { since_exited, .. }) => {
                Some(ease_cubic(progress(since_exited, GLITCH_EXIT_WINDOW_SEC)))
            }
            TransitionPhase::ExitingGlitch(ExitStage::FinalSettle { since_settled, .. }) => {
                Some(ease_cubic(progress(since_settled, GLITCH_SETTLE_WINDOW_SEC)))
            }
        }
    }
}

/// Mutable per-entity animation state. Only its controller writes to it.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityAnimationState {
    /// Monotonic accumulator, advanced by `delta * speed`. Never reset.
    pub elapsed_time: f32,
    pub last_observed_mood: MoodState,
    /// Last non-glitch mood; its tuning drives the baseline while glitching.
    pub resting_mood: MoodState,
    pub phase: TransitionPhase,
}

impl EntityAnimationState {
    pub fn time_since_entered_glitch(&self) -> f32 {
        match self.phase {
            TransitionPhase::EnteringGlitch { since_entered } => since_entered,
            _ => 0.0,
        }
    }

    pub fn time_since_exited_glitch(&self) -> f32 {
        match self.phase {
            TransitionPhase::ExitingGlitch(ExitStage::RestoringMotion { since_exited, .. }) => {
                since_exited
            }
            _ => 0.0,
        }
    }

    pub fn time_since_post_glitch_settled(&self) -> f32 {
        match self.phase {
            TransitionPhase::ExitingGlitch(ExitStage::FinalSettle { since_settled, .. }) => {
                since_settled
            }
            _ => 0.0,
        }
    }
}

/// Drives one entity's [`EntityAnimationState`] from frame deltas and the host mood.
#[derive(Clone, Debug)]
pub struct TransitionController {
    speed: f32,
    state: EntityAnimationState,
}

impl TransitionController {
    pub fn new(speed: f32, mood: MoodState) -> Self {
        assert!(
            speed.is_finite() && speed > 0.0,
            "entity speed must be finite and > 0, got {speed}"
        );
        let phase = if mood.is_glitch() {
            TransitionPhase::EnteringGlitch { since_entered: 0.0 }
        } else {
            TransitionPhase::Steady
        };
        Self {
            speed,
            state: EntityAnimationState {
                elapsed_time: 0.0,
                last_observed_mood: mood,
                resting_mood: if mood.is_glitch() {
                    MoodState::Idle
                } else {
                    mood
                },
                phase,
            },
        }
    }

    pub fn state(&self) -> &EntityAnimationState {
        &self.state
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn weights(&self) -> GlitchWeights {
        self.state.phase.weights()
    }

    /// Advance by one frame.
    ///
    /// The frame that ends is spent under `mood`, so a mood edge starts the
    /// new phase at zero and then ticks it by this frame's `delta_time`.
    /// Transition timers run on wall seconds, not speed-scaled time.
    pub fn advance(&mut self, delta_time: f32, mood: MoodState) {
        assert!(
            delta_time.is_finite() && delta_time >= 0.0,
            "frame delta must be finite and non-negative, got {delta_time}"
        );
        self.state.elapsed_time += delta_time * self.speed;

        let previous = self.state.last_observed_mood;
        if mood != previous && mood.is_glitch() != previous.is_glitch() {
            self.on_glitch_edge(mood);
        }
        self.tick_phase(delta_time);

        self.state.last_observed_mood = mood;
        if !mood.is_glitch() {
            self.state.resting_mood = mood;
        }
    }

    fn on_glitch_edge(&mut self, mood: MoodState) {
        let next = if mood.is_glitch() {
            TransitionPhase::EnteringGlitch { since_entered: 0.0 }
        } else {
            TransitionPhase::ExitingGlitch(ExitStage::RestoringMotion {
                since_exited: 0.0,
                from: self.state.phase.weights(),
            })
        };
        log::debug!(
            "[glitch] {} -> {} (mood={})",
            self.state.phase.name(),
            next.name(),
            mood
        );
        self.state.phase = next;
    }

    fn tick_phase(&mut self, dt: f32) {
        self.state.phase = match self.state.phase {
            TransitionPhase::Steady => TransitionPhase::Steady,
            TransitionPhase::EnteringGlitch { since_entered } => TransitionPhase::EnteringGlitch {
                since_entered: since_entered + dt,
            },
            TransitionPhase::ExitingGlitch(ExitStage::RestoringMotion { since_exited, from }) => {
                let since_exited = since_exited + dt;
                if since_exited >= GLITCH_EXIT_WINDOW_SEC {
                    let restored = TransitionPhase::ExitingGlitch(ExitStage::RestoringMotion {
                        since_exited: GLITCH_EXIT_WINDOW_SEC,
                        from,
                    });
                    TransitionPhase::ExitingGlitch(ExitStage::FinalSettle {
                        since_settled: since_exited - GLITCH_EXIT_WINDOW_SEC,
                        from: restored.weights(),
                    })
                } else {
                    TransitionPhase::ExitingGlitch(ExitStage::RestoringMotion {
                        since_exited,
                        from,
                    })
                }
            }
            TransitionPhase::ExitingGlitch(ExitStage::FinalSettle {
                since_settled,
                from,
            }) => {
                let since_settled = since_settled + dt;
                if since_settled >= GLITCH_SETTLE_WINDOW_SEC {
                    log::debug!("[glitch] settled");
                    TransitionPhase::Steady
                } else {
                    TransitionPhase::ExitingGlitch(ExitStage::FinalSettle {
                        since_settled,
                        from,
                    })
                }
            }
        };
    }
}
