//! Per-entity organic motion: drift, breathing, opacity and the glitch blend.
//!
//! The steady formula is a pure function of `(layer, elapsed, mood)`. Glitch
//! handling never touches the accumulator; it only blends the steady values
//! by the [`GlitchWeights`] the transition controller reports.

use crate::constants::*;
use crate::entity::Entity;
use crate::mood::{MoodMotion, MoodState};
use crate::oscillator::{cosine, layer_phase, lerp, sine};
use crate::transition::{EntityAnimationState, GlitchWeights};
use glam::Vec3;

/// Per-frame output for one entity.
///
/// `offset` is added to the base position, `scale_multiplier` multiplies the
/// base scale, `opacity` is final. `rotation` is an Euler angle triple for
/// hosts that draw oriented primitives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionSample {
    pub offset: Vec3,
    pub scale_multiplier: f32,
    pub opacity: f32,
    pub rotation: Vec3,
}

impl MotionSample {
    pub fn position(&self, entity: &Entity) -> Vec3 {
        entity.base_position + self.offset
    }

    pub fn scale(&self, entity: &Entity) -> f32 {
        entity.base_scale * self.scale_multiplier
    }
}

/// De-synchronized baseline drift for `layer` at accumulator time `t`.
#[inline]
pub fn primary_offset(layer: usize, t: f32, motion: MoodMotion) -> Vec3 {
    let a = motion.drift_amplitude;
    Vec3::new(
        cosine(t, layer_phase(layer, DRIFT_X_LAYER_PHASE), DRIFT_X_FREQ) * a,
        sine(t, layer_phase(layer, DRIFT_Y_LAYER_PHASE), DRIFT_Y_FREQ) * a,
        sine(t, layer_phase(layer, DRIFT_Z_LAYER_PHASE), DRIFT_Z_FREQ) * a * DRIFT_Z_SHARE,
    )
}

/// Breathing term; the steady scale multiplier is `1 + breathe_delta`.
#[inline]
pub fn breathe_delta(layer: usize, t: f32, motion: MoodMotion) -> f32 {
    motion.breathe_amplitude * sine(t, layer_phase(layer, BREATHE_LAYER_PHASE), BREATHE_FREQ)
}

/// Unclamped two-harmonic opacity around [`OPACITY_BASE`].
#[inline]
pub fn raw_opacity(layer: usize, t: f32) -> f32 {
    OPACITY_BASE
        + OPACITY_PRIMARY_AMP
            * sine(
                t,
                layer_phase(layer, OPACITY_PRIMARY_LAYER_PHASE),
                OPACITY_PRIMARY_FREQ,
            )
        + OPACITY_SECONDARY_AMP
            * sine(
                t,
                layer_phase(layer, OPACITY_SECONDARY_LAYER_PHASE),
                OPACITY_SECONDARY_FREQ,
            )
}

#[inline]
pub fn clamp_opacity(value: f32) -> f32 {
    value.clamp(OPACITY_MIN, OPACITY_MAX)
}

/// Unit-amplitude high-frequency shake used while a glitch breaks up the shape.
#[inline]
pub fn breakup_offset(layer: usize, t: f32) -> Vec3 {
    let freq = GLITCH_BREAKUP_BASE_FREQ + layer as f32 * GLITCH_BREAKUP_FREQ_PER_LAYER;
    let phase = layer as f32;
    Vec3::new(
        sine(t, phase, freq),
        cosine(t, phase, freq * 1.3),
        sine(t, phase * 2.0, freq * 0.7),
    )
}

#[inline]
pub fn rotation(t: f32, motion: MoodMotion) -> Vec3 {
    Vec3::from(SPIN_AXIS_RATIOS) * (t * motion.spin_speed)
}

/// Pure steady-state values for `layer` at accumulator time `t` under `mood`.
pub fn steady_sample(layer: usize, t: f32, mood: MoodState) -> MotionSample {
    let motion = mood.motion();
    MotionSample {
        offset: primary_offset(layer, t, motion),
        scale_multiplier: 1.0 + breathe_delta(layer, t, motion),
        opacity: clamp_opacity(raw_opacity(layer, t)),
        rotation: rotation(t, motion),
    }
}

/// Blend the steady values for `entity` by `weights`.
///
/// With [`GlitchWeights::NONE`] this is exactly [`steady_sample`].
pub fn blended_sample(
    entity: &Entity,
    t: f32,
    mood: MoodState,
    weights: GlitchWeights,
) -> MotionSample {
    assert!(
        entity.layer_index < MAX_ENTITY_COUNT,
        "layer index {} out of range 0..{}",
        entity.layer_index,
        MAX_ENTITY_COUNT
    );
    let layer = entity.layer_index;
    if weights.is_none() {
        return steady_sample(layer, t, mood);
    }

    let motion = mood.motion();
    let offset = primary_offset(layer, t, motion) * (1.0 - weights.reduction)
        - entity.base_position * weights.pull
        + breakup_offset(layer, t) * (GLITCH_BREAKUP_AMPLITUDE * weights.breakup);
    let shrink = 1.0 - (1.0 - GLITCH_SCALE_FLOOR) * weights.shrink;
    let breathe = 1.0 + (1.0 - weights.hold) * breathe_delta(layer, t, motion);
    let opacity = lerp(raw_opacity(layer, t), GLITCH_OPACITY, weights.opacity);

    MotionSample {
        offset,
        scale_multiplier: shrink * breathe,
        opacity: clamp_opacity(opacity),
        rotation: rotation(t, motion),
    }
}

/// Sample `entity` from its controller-owned animation state.
pub fn sample(entity: &Entity, state: &EntityAnimationState) -> MotionSample {
    blended_sample(
        entity,
        state.elapsed_time,
        state.resting_mood,
        state.phase.weights(),
    )
}
