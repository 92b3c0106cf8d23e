use glam::Vec3;

// Shared motion/overlay tuning constants used by the core and every front-end.

// Entity set
pub const MIN_ENTITY_COUNT: usize = 3;
pub const MAX_ENTITY_COUNT: usize = 8;
pub const DEFAULT_ENTITY_COUNT: usize = 5;
pub const RING_BASE_RADIUS: f32 = 2.0; // inner radius of the entity ring
pub const RING_RADIUS_JITTER: f32 = 1.5; // random extra radius per entity
pub const RING_DEPTH_JITTER: f32 = 2.0; // total z spread around the ring plane

// Steady-state drift (per axis: frequency, phase step per layer)
pub const DRIFT_X_FREQ: f32 = 0.4;
pub const DRIFT_Y_FREQ: f32 = 0.8;
pub const DRIFT_Z_FREQ: f32 = 0.6;
pub const DRIFT_X_LAYER_PHASE: f32 = 1.3;
pub const DRIFT_Y_LAYER_PHASE: f32 = 0.7;
pub const DRIFT_Z_LAYER_PHASE: f32 = 2.1;
pub const DRIFT_Z_SHARE: f32 = 0.75; // depth drift is a little flatter than x/y

// Breathing scale
pub const BREATHE_FREQ: f32 = 2.0;
pub const BREATHE_LAYER_PHASE: f32 = 0.9;

// Opacity (two harmonics around a base so it never reads as a clean sine)
pub const OPACITY_BASE: f32 = 0.8;
pub const OPACITY_PRIMARY_AMP: f32 = 0.2;
pub const OPACITY_PRIMARY_FREQ: f32 = 1.3;
pub const OPACITY_PRIMARY_LAYER_PHASE: f32 = 0.5;
pub const OPACITY_SECONDARY_AMP: f32 = 0.12;
pub const OPACITY_SECONDARY_FREQ: f32 = 0.37;
pub const OPACITY_SECONDARY_LAYER_PHASE: f32 = 1.7;
pub const OPACITY_MIN: f32 = 0.1;
pub const OPACITY_MAX: f32 = 1.0;

// Spin axis ratios (x, y, z) applied to the mood's spin speed
pub const SPIN_AXIS_RATIOS: [f32; 3] = [0.5, 0.7, 0.3];

// Glitch entry
pub const GLITCH_ENTER_WINDOW_SEC: f32 = 0.3; // offset/pull/opacity ease window
pub const GLITCH_SHRINK_WINDOW_SEC: f32 = 0.05; // scale snap window
pub const GLITCH_OFFSET_REDUCTION: f32 = 0.85; // share of drift removed at full glitch
pub const GLITCH_CENTER_PULL: f32 = 0.6; // share of base position pulled to origin
pub const GLITCH_SCALE_FLOOR: f32 = 0.65; // scale multiplier at full glitch
pub const GLITCH_OPACITY: f32 = 0.9;
pub const GLITCH_BREAKUP_BASE_FREQ: f32 = 15.0;
pub const GLITCH_BREAKUP_FREQ_PER_LAYER: f32 = 2.5;
pub const GLITCH_BREAKUP_AMPLITUDE: f32 = 0.4;

// Glitch exit
pub const GLITCH_EXIT_WINDOW_SEC: f32 = 2.0; // restore motion
pub const GLITCH_SETTLE_WINDOW_SEC: f32 = 1.0; // final corrective blend

// Host-level glitch timeline (backdrop flash and fade)
pub const GLITCH_INITIAL_END_SEC: f32 = 0.1;
pub const GLITCH_SINE_END_SEC: f32 = 0.2;
pub const GLITCH_DURATION_SEC: f32 = 2.0;

// Colours
pub const ALARM_RGB: [f32; 3] = [1.0, 0.0, 0.4]; // #FF0066
pub const AMBIENT_RGB: [f32; 3] = [0.949, 0.949, 0.949]; // #F2F2F2

// Liquid glass overlay
pub const OVERLAY_WIDTH: u32 = 300;
pub const OVERLAY_HEIGHT: u32 = 200;
pub const GLASS_HALF_WIDTH: f32 = 0.3;
pub const GLASS_HALF_HEIGHT: f32 = 0.2;
pub const GLASS_CORNER_RADIUS: f32 = 0.6;
pub const GLASS_EDGE_OFFSET: f32 = 0.12; // shifts the SDF before the falloff ramp
pub const GLASS_FALLOFF: f32 = 0.8; // SDF distance at which displacement reaches zero
pub const GLASS_STRENGTH: f32 = 1.2;
pub const DISPLACEMENT_DAMPING: f32 = 0.8; // filter scale = max magnitude * damping

// Camera
pub const CAMERA_Z: f32 = 10.0;
pub const CAMERA_FOVY_DEG: f32 = 75.0;

#[inline]
pub fn camera_eye() -> Vec3 {
    Vec3::new(0.0, 0.0, CAMERA_Z)
}
