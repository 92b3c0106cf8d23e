//! Stateless wave and easing helpers.
//!
//! Everything here is a pure function of its arguments. Motion code composes
//! these per frame; nothing in this module keeps time on its own.

/// `sin(time * frequency + phase)`, always in \[-1, 1\].
#[inline]
pub fn sine(time: f32, phase: f32, frequency: f32) -> f32 {
    (time * frequency + phase).sin()
}

/// `cos(time * frequency + phase)`, always in \[-1, 1\].
#[inline]
pub fn cosine(time: f32, phase: f32, frequency: f32) -> f32 {
    (time * frequency + phase).cos()
}

/// Phase offset for entity `layer` given a per-layer phase step.
#[inline]
pub fn layer_phase(layer: usize, step: f32) -> f32 {
    layer as f32 * step
}

/// Cubic ease `t²(3 − 2t)` on a progress value clamped to \[0, 1\].
#[inline]
pub fn ease_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linear progress of `elapsed` through a window of `window` seconds, clamped to \[0, 1\].
#[inline]
pub fn progress(elapsed: f32, window: f32) -> f32 {
    if window <= 0.0 {
        return 1.0;
    }
    (elapsed / window).clamp(0.0, 1.0)
}

/// Hermite smoothstep between edges `a` and `b`.
///
/// Works with reversed edges (`a > b`), which yields a falling ramp.
#[inline]
pub fn smoothstep(a: f32, b: f32, t: f32) -> f32 {
    if a == b {
        return if t < a { 0.0 } else { 1.0 };
    }
    ease_cubic((t - a) / (b - a))
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_rgb(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [lerp(a[0], b[0], t), lerp(a[1], b[1], t), lerp(a[2], b[2], t)]
}
