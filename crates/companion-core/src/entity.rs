//! Entity-set generation.
//!
//! An entity set is rebuilt wholesale from `(mood, count, seed, generation)`;
//! entities never keep identity across regeneration. Layer indices are the
//! position in the set and are unique within it.

use crate::constants::{
    MAX_ENTITY_COUNT, MIN_ENTITY_COUNT, RING_BASE_RADIUS, RING_DEPTH_JITTER, RING_RADIUS_JITTER,
};
use crate::error::{CompanionError, Result};
use crate::mood::MoodState;
use glam::Vec3;
use rand::prelude::*;
use smallvec::SmallVec;

/// One animated shape instance.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub base_position: Vec3,
    pub layer_index: usize,
    pub speed: f32,
    pub base_scale: f32,
    pub color: [f32; 3],
}

pub type EntitySet = SmallVec<[Entity; MAX_ENTITY_COUNT]>;

pub fn validate_count(count: usize) -> Result<()> {
    if (MIN_ENTITY_COUNT..=MAX_ENTITY_COUNT).contains(&count) {
        Ok(())
    } else {
        Err(CompanionError::EntityCount {
            count,
            min: MIN_ENTITY_COUNT,
            max: MAX_ENTITY_COUNT,
        })
    }
}

/// Derive the RNG for one regeneration from the base seed.
pub fn generation_rng(seed: u64, generation: u64) -> StdRng {
    let mix = seed ^ generation.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    StdRng::seed_from_u64(mix)
}

/// Lay out `count` entities on a ring, styled for `mood`.
///
/// Entities are spaced evenly by angle; radius and depth are jittered from
/// `rng`. Colour comes from the mood palette, base scale and speed from the
/// per-mood formulas below.
pub fn generate_entities(mood: MoodState, count: usize, rng: &mut StdRng) -> Result<EntitySet> {
    validate_count(count)?;
    let mut set = EntitySet::new();
    for i in 0..count {
        let angle = (i as f32 / count as f32) * std::f32::consts::TAU;
        let radius = RING_BASE_RADIUS + rng.gen::<f32>() * RING_RADIUS_JITTER;
        let depth = (rng.gen::<f32>() - 0.5) * RING_DEPTH_JITTER;
        set.push(Entity {
            base_position: Vec3::new(angle.cos() * radius, angle.sin() * radius, depth),
            layer_index: i,
            speed: speed_for(mood, i, rng),
            base_scale: scale_for(mood, i),
            color: mood.color(i),
        });
    }
    log::debug!(
        "[entities] generated {} for mood={} first=({:.2},{:.2},{:.2})",
        set.len(),
        mood,
        set[0].base_position.x,
        set[0].base_position.y,
        set[0].base_position.z
    );
    Ok(set)
}

/// Base scale for entity `index` under `mood`. Always > 0.
pub fn scale_for(mood: MoodState, index: usize) -> f32 {
    let i = index as f32;
    match mood {
        MoodState::Idle | MoodState::Glitch => 0.8 + i * 0.1,
        MoodState::Listening => 1.2 + i.sin() * 0.3,
        MoodState::Thinking => 0.6 + i.cos() * 0.4,
        MoodState::Speaking => 1.0 + i * 0.2,
    }
}

/// Accumulator speed for entity `index` under `mood`. Always > 0.
///
/// Thinking draws from `rng` so its entities drift out of step.
pub fn speed_for(mood: MoodState, index: usize, rng: &mut StdRng) -> f32 {
    let i = index as f32;
    match mood {
        MoodState::Idle | MoodState::Glitch => 0.5 + i * 0.1,
        MoodState::Listening => 1.5 + i * 0.2,
        MoodState::Thinking => 2.0 + rng.gen::<f32>(),
        MoodState::Speaking => 1.8 + i.sin() * 0.5,
    }
}
