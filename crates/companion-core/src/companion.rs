//! The companion as a whole: mood, entity set, per-entity controllers and the
//! glitch timeline behind one handle.

use crate::constants::{AMBIENT_RGB, DEFAULT_ENTITY_COUNT, OVERLAY_HEIGHT, OVERLAY_WIDTH};
use crate::displacement::{compute_displacement, DisplacementMap};
use crate::entity::{generate_entities, generation_rng, validate_count, Entity};
use crate::error::{CompanionError, Result};
use crate::glitch::GlitchSequencer;
use crate::mood::{GlitchPhase, MoodState};
use crate::motion::{sample, MotionSample};
use crate::oscillator::lerp_rgb;
use crate::state::EntityFrame;
use crate::transition::TransitionController;
use glam::Vec2;
use smallvec::SmallVec;

/// Startup parameters. `Default` gives the stock companion.
#[derive(Clone, Debug, PartialEq)]
pub struct CompanionParams {
    pub mood: MoodState,
    pub entity_count: usize,
    /// Base seed for entity layout; each regeneration mixes in its own number.
    pub seed: u64,
    pub overlay_width: u32,
    pub overlay_height: u32,
    pub ambient: [f32; 3],
}

impl Default for CompanionParams {
    fn default() -> Self {
        Self {
            mood: MoodState::Idle,
            entity_count: DEFAULT_ENTITY_COUNT,
            seed: 42,
            overlay_width: OVERLAY_WIDTH,
            overlay_height: OVERLAY_HEIGHT,
            ambient: AMBIENT_RGB,
        }
    }
}

impl CompanionParams {
    pub fn validate(&self) -> Result<()> {
        validate_count(self.entity_count)?;
        if self.overlay_width == 0 || self.overlay_height == 0 {
            return Err(CompanionError::EmptyOverlay {
                width: self.overlay_width,
                height: self.overlay_height,
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
struct Animated {
    entity: Entity,
    controller: TransitionController,
}

pub struct Companion {
    params: CompanionParams,
    mood: MoodState,
    /// Mood the current entity set was generated for. Never `Glitch`.
    resting_mood: MoodState,
    entities: SmallVec<[Animated; 8]>,
    sequencer: GlitchSequencer,
    generation: u64,
}

impl Companion {
    pub fn new(params: CompanionParams) -> Result<Self> {
        params.validate()?;
        let mut companion = Self {
            mood: params.mood,
            resting_mood: if params.mood.is_glitch() {
                MoodState::Idle
            } else {
                params.mood
            },
            params,
            entities: SmallVec::new(),
            sequencer: GlitchSequencer::new(),
            generation: 0,
        };
        companion.regenerate()?;
        if companion.mood.is_glitch() {
            companion.sequencer.start(companion.resting_mood);
        }
        log::info!(
            "[mood] companion ready: mood={} entities={}",
            companion.mood,
            companion.entities.len()
        );
        Ok(companion)
    }

    pub fn params(&self) -> &CompanionParams {
        &self.params
    }

    pub fn mood(&self) -> MoodState {
        self.mood
    }

    pub fn resting_mood(&self) -> MoodState {
        self.resting_mood
    }

    /// Switch mood. `Glitch` starts a glitch run; any other mood cancels one.
    pub fn set_mood(&mut self, mood: MoodState) {
        if mood.is_glitch() {
            self.trigger_glitch();
            return;
        }
        self.sequencer.cancel();
        if mood != self.mood {
            log::info!("[mood] {} -> {}", self.mood, mood);
        }
        self.mood = mood;
        if mood != self.resting_mood {
            self.resting_mood = mood;
            if let Err(e) = self.regenerate() {
                log::warn!("[entities] regeneration failed: {}", e);
            }
        }
    }

    /// Run the glitch timeline and hand the resting mood back afterwards.
    pub fn trigger_glitch(&mut self) {
        self.sequencer.start(self.resting_mood);
        if !self.mood.is_glitch() {
            log::info!("[mood] {} -> glitch", self.mood);
        }
        self.mood = MoodState::Glitch;
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Rebuild the entity set with `count` entities.
    pub fn set_count(&mut self, count: usize) -> Result<()> {
        validate_count(count)?;
        if count == self.params.entity_count {
            return Ok(());
        }
        self.params.entity_count = count;
        self.regenerate()
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter().map(|a| &a.entity)
    }

    pub fn controller(&self, entity_id: usize) -> Option<&TransitionController> {
        self.entities.get(entity_id).map(|a| &a.controller)
    }

    pub fn is_glitching(&self) -> bool {
        self.sequencer.is_active()
    }

    pub fn glitch_phase(&self) -> Option<GlitchPhase> {
        self.sequencer.phase()
    }

    pub fn backdrop_color(&self) -> [f32; 3] {
        self.sequencer.backdrop_color(self.params.ambient)
    }

    /// Advance entity `entity_id` by one frame under `mood` and sample it.
    ///
    /// Panics if `entity_id` is not a live entity or `delta_time` is negative.
    pub fn update(&mut self, entity_id: usize, delta_time: f32, mood: MoodState) -> MotionSample {
        let count = self.entities.len();
        assert!(
            entity_id < count,
            "entity id {entity_id} out of range 0..{count}"
        );
        let animated = &mut self.entities[entity_id];
        // layer index doubles as the id; the oscillator phases depend on it
        assert_eq!(animated.entity.layer_index, entity_id);
        animated.controller.advance(delta_time, mood);
        sample(&animated.entity, animated.controller.state())
    }

    /// Advance the glitch timeline; returns the mood after any hand-back.
    pub fn tick(&mut self, delta_time: f32) -> MoodState {
        if let Some(resume) = self.sequencer.advance(delta_time) {
            log::info!("[mood] glitch -> {}", resume);
            self.mood = resume;
        }
        self.mood
    }

    /// One full frame: tick the timeline, then update and sample every entity.
    pub fn frame(&mut self, delta_time: f32) -> SmallVec<[EntityFrame; 8]> {
        let mood = self.tick(delta_time);
        (0..self.entities.len())
            .map(|id| {
                let s = self.update(id, delta_time, mood);
                let Animated { entity, controller } = &self.entities[id];
                EntityFrame {
                    position: s.position(entity),
                    scale: s.scale(entity),
                    color: glitch_tint(entity, controller.weights().opacity),
                    opacity: s.opacity,
                    rotation: s.rotation,
                }
            })
            .collect()
    }

    /// Synchronous sweep at the configured overlay size.
    pub fn compute_displacement(&self, pointer: Vec2) -> Result<DisplacementMap> {
        compute_displacement(pointer, self.params.overlay_width, self.params.overlay_height)
    }

    /// Colour entity `id` would be drawn with this frame.
    pub fn entity_color(&self, entity_id: usize) -> Option<[f32; 3]> {
        self.entities
            .get(entity_id)
            .map(|a| glitch_tint(&a.entity, a.controller.weights().opacity))
    }

    fn regenerate(&mut self) -> Result<()> {
        self.generation += 1;
        let mut rng = generation_rng(self.params.seed, self.generation);
        let set = generate_entities(self.resting_mood, self.params.entity_count, &mut rng)?;
        self.entities = set
            .into_iter()
            .map(|entity| {
                let mut controller = TransitionController::new(entity.speed, self.resting_mood);
                if self.mood.is_glitch() {
                    controller.advance(0.0, self.mood);
                }
                Animated { entity, controller }
            })
            .collect();
        log::debug!(
            "[entities] generation {} ({} entities, mood={})",
            self.generation,
            self.entities.len(),
            self.resting_mood
        );
        Ok(())
    }
}

/// Entity colour pulled toward its alarm palette entry by `weight`.
fn glitch_tint(entity: &Entity, weight: f32) -> [f32; 3] {
    let alarm = MoodState::Glitch.color(entity.layer_index);
    lerp_rgb(entity.color, alarm, weight)
}
