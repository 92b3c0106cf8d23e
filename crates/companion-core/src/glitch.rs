//! Host-level glitch timeline for the scene backdrop.
//!
//! Runs independently of the per-entity controllers but on the same
//! constants, so the flash, the colour fade and the mood hand-back all land
//! at [`GLITCH_DURATION_SEC`].

use crate::constants::{
    ALARM_RGB, GLITCH_DURATION_SEC, GLITCH_INITIAL_END_SEC, GLITCH_SINE_END_SEC,
};
use crate::mood::{GlitchPhase, MoodState};
use crate::oscillator::{ease_cubic, lerp_rgb, progress};

#[derive(Clone, Copy, Debug, PartialEq)]
struct ActiveGlitch {
    elapsed: f32,
    resume: MoodState,
}

/// Sequences `initial → sine → settling` and hands the previous mood back.
#[derive(Clone, Debug, Default)]
pub struct GlitchSequencer {
    active: Option<ActiveGlitch>,
}

impl GlitchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) a glitch run that will resume `resume` when done.
    ///
    /// Restarting while a run is active keeps the first resume mood.
    pub fn start(&mut self, resume: MoodState) {
        let resume = match self.active {
            Some(active) => active.resume,
            None if resume.is_glitch() => MoodState::Idle,
            None => resume,
        };
        log::info!("[glitch] start (resume={})", resume);
        self.active = Some(ActiveGlitch {
            elapsed: 0.0,
            resume,
        });
    }

    /// Abandon the current run without handing a mood back.
    pub fn cancel(&mut self) {
        if self.active.take().is_some() {
            log::debug!("[glitch] cancelled");
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn elapsed(&self) -> Option<f32> {
        self.active.map(|a| a.elapsed)
    }

    pub fn resume_mood(&self) -> Option<MoodState> {
        self.active.map(|a| a.resume)
    }

    /// Advance the run; returns the mood to restore once the run completes.
    pub fn advance(&mut self, delta_time: f32) -> Option<MoodState> {
        assert!(
            delta_time.is_finite() && delta_time >= 0.0,
            "frame delta must be finite and non-negative, got {delta_time}"
        );
        let active = self.active.as_mut()?;
        active.elapsed += delta_time;
        if active.elapsed >= GLITCH_DURATION_SEC {
            let resume = active.resume;
            self.active = None;
            log::info!("[glitch] done, resuming {}", resume);
            return Some(resume);
        }
        None
    }

    pub fn phase(&self) -> Option<GlitchPhase> {
        self.active.map(|a| phase_at(a.elapsed))
    }

    /// Backdrop colour for this frame given the ambient background colour.
    pub fn backdrop_color(&self, ambient: [f32; 3]) -> [f32; 3] {
        match self.active {
            None => ambient,
            Some(a) => backdrop_at(a.elapsed, ambient),
        }
    }
}

/// Sub-phase at `elapsed` seconds into a glitch run.
pub fn phase_at(elapsed: f32) -> GlitchPhase {
    if elapsed < GLITCH_INITIAL_END_SEC {
        GlitchPhase::Initial
    } else if elapsed < GLITCH_SINE_END_SEC {
        GlitchPhase::Sine
    } else {
        GlitchPhase::Settling
    }
}

/// Alarm colour through `initial` and `sine`, then an eased fade to `ambient`.
pub fn backdrop_at(elapsed: f32, ambient: [f32; 3]) -> [f32; 3] {
    match phase_at(elapsed) {
        GlitchPhase::Initial | GlitchPhase::Sine => ALARM_RGB,
        GlitchPhase::Settling => {
            let t = progress(
                elapsed - GLITCH_SINE_END_SEC,
                GLITCH_DURATION_SEC - GLITCH_SINE_END_SEC,
            );
            lerp_rgb(ALARM_RGB, ambient, ease_cubic(t))
        }
    }
}
