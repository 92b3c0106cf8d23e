//! Liquid-glass displacement field.
//!
//! A warp function maps each overlay UV to the UV it should sample from. The
//! generator sweeps the overlay's pixel grid, turns the warp into per-pixel
//! offsets in pixels, tracks the largest component for normalisation, and
//! packs the result into an RGBA8 map for a displacement filter:
//!
//! - R = encoded dx, G = encoded dy, B = 0, A = 255
//! - `channel = round((v / max * 0.5 + 0.5) * 255)`
//! - `scale = max * DISPLACEMENT_DAMPING`
//!
//! Consumers displace by `scale * (channel / 255 - 0.5)` pixels, which is the
//! SVG `feDisplacementMap` convention.

use crate::constants::{
    DISPLACEMENT_DAMPING, GLASS_CORNER_RADIUS, GLASS_EDGE_OFFSET, GLASS_FALLOFF,
    GLASS_HALF_HEIGHT, GLASS_HALF_WIDTH, GLASS_STRENGTH,
};
use crate::error::{CompanionError, Result};
use crate::oscillator::smoothstep;
use glam::Vec2;

/// Maps an overlay UV in \[0,1\]² to the UV it samples from.
///
/// `pointer` is the normalised pointer position inside the overlay. Warps
/// may ignore it.
pub trait WarpFn {
    fn warp(&self, uv: Vec2, pointer: Vec2) -> Vec2;
}

impl<F> WarpFn for F
where
    F: Fn(Vec2, Vec2) -> Vec2,
{
    fn warp(&self, uv: Vec2, pointer: Vec2) -> Vec2 {
        self(uv, pointer)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundedRect {
    pub half_width: f32,
    pub half_height: f32,
    pub corner_radius: f32,
}

impl Default for RoundedRect {
    fn default() -> Self {
        Self {
            half_width: GLASS_HALF_WIDTH,
            half_height: GLASS_HALF_HEIGHT,
            corner_radius: GLASS_CORNER_RADIUS,
        }
    }
}

/// Signed distance from `p` to a rounded rectangle centred on the origin.
#[inline]
pub fn rounded_rect_sdf(p: Vec2, rect: RoundedRect) -> f32 {
    let qx = p.x.abs() - rect.half_width + rect.corner_radius;
    let qy = p.y.abs() - rect.half_height + rect.corner_radius;
    qx.max(qy).min(0.0) + Vec2::new(qx.max(0.0), qy.max(0.0)).length() - rect.corner_radius
}

/// Static lens: magnifies toward the centre of a rounded rectangle.
///
/// The pointer is accepted but not read; the lens stays centred in the
/// overlay wherever the pointer is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LiquidGlassWarp {
    pub rect: RoundedRect,
    pub edge_offset: f32,
    pub falloff: f32,
    pub strength: f32,
}

impl Default for LiquidGlassWarp {
    fn default() -> Self {
        Self {
            rect: RoundedRect::default(),
            edge_offset: GLASS_EDGE_OFFSET,
            falloff: GLASS_FALLOFF,
            strength: GLASS_STRENGTH,
        }
    }
}

impl WarpFn for LiquidGlassWarp {
    fn warp(&self, uv: Vec2, _pointer: Vec2) -> Vec2 {
        let centered = uv - Vec2::splat(0.5);
        let distance = rounded_rect_sdf(centered, self.rect);
        let displacement = smoothstep(self.falloff, 0.0, distance - self.edge_offset);
        let scaled = smoothstep(0.0, 1.0, displacement) * self.strength;
        centered * scaled + Vec2::splat(0.5)
    }
}

/// Dense per-pixel offsets (in pixels) for one pointer position.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplacementField {
    width: u32,
    height: u32,
    pointer: Vec2,
    vectors: Vec<Vec2>,
    max_magnitude: f32,
}

impl DisplacementField {
    /// Sweep the default liquid-glass warp over a `width × height` grid.
    pub fn compute(pointer: Vec2, width: u32, height: u32) -> Result<Self> {
        Self::compute_with(&LiquidGlassWarp::default(), pointer, width, height)
    }

    pub fn compute_with<W: WarpFn + ?Sized>(
        warp: &W,
        pointer: Vec2,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CompanionError::EmptyOverlay { width, height });
        }
        if !pointer.is_finite() {
            return Err(CompanionError::NonFinitePointer {
                x: pointer.x,
                y: pointer.y,
            });
        }

        let (w, h) = (width as f32, height as f32);
        let mut vectors = Vec::with_capacity(width as usize * height as usize);
        let mut max_magnitude = 0.0_f32;
        for y in 0..height {
            for x in 0..width {
                let (fx, fy) = (x as f32, y as f32);
                let sample = warp.warp(Vec2::new(fx / w, fy / h), pointer);
                let d = Vec2::new(sample.x * w - fx, sample.y * h - fy);
                max_magnitude = max_magnitude.max(d.x.abs()).max(d.y.abs());
                vectors.push(d);
            }
        }

        Ok(Self {
            width,
            height,
            pointer,
            vectors,
            max_magnitude,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pointer position the field was requested for.
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn max_magnitude(&self) -> f32 {
        self.max_magnitude
    }

    pub fn vectors(&self) -> &[Vec2] {
        &self.vectors
    }

    pub fn at(&self, x: u32, y: u32) -> Vec2 {
        assert!(x < self.width && y < self.height, "pixel ({x},{y}) outside field");
        self.vectors[(y * self.width + x) as usize]
    }

    /// Pack into an RGBA8 map plus the filter scale.
    pub fn rasterize(&self) -> DisplacementMap {
        let max = self.max_magnitude;
        let mut rgba = Vec::with_capacity(self.vectors.len() * 4);
        for d in &self.vectors {
            rgba.extend_from_slice(&[encode_channel(d.x, max), encode_channel(d.y, max), 0, 255]);
        }
        DisplacementMap {
            width: self.width,
            height: self.height,
            rgba,
            max_magnitude: max,
            scale: max * DISPLACEMENT_DAMPING,
        }
    }
}

/// Encoded displacement texture and the scale that goes with it.
///
/// The two always travel together; a consumer never mixes a texture from one
/// sweep with the scale of another.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplacementMap {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
    max_magnitude: f32,
    scale: f32,
}

impl DisplacementMap {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `width * height * 4` bytes, row-major RGBA.
    pub fn texture_bytes(&self) -> &[u8] {
        &self.rgba
    }

    pub fn pixels(&self) -> &[[u8; 4]] {
        bytemuck::cast_slice(&self.rgba)
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn max_magnitude(&self) -> f32 {
        self.max_magnitude
    }

    /// Reconstruct the offset at `(x, y)` from the encoded channels.
    pub fn decode(&self, x: u32, y: u32) -> Vec2 {
        assert!(x < self.width && y < self.height, "pixel ({x},{y}) outside map");
        let [r, g, _, _] = self.pixels()[(y * self.width + x) as usize];
        Vec2::new(
            decode_channel(r, self.max_magnitude),
            decode_channel(g, self.max_magnitude),
        )
    }
}

/// Encode one offset component; a zero `max` encodes everything as neutral.
#[inline]
pub fn encode_channel(value: f32, max: f32) -> u8 {
    let normalized = if max > 0.0 { value / max } else { 0.0 };
    ((normalized * 0.5 + 0.5) * 255.0).round().clamp(0.0, 255.0) as u8
}

#[inline]
pub fn decode_channel(byte: u8, max: f32) -> f32 {
    (byte as f32 / 255.0 - 0.5) * 2.0 * max
}

/// Full pointer-move pipeline: sweep the default warp and rasterize.
pub fn compute_displacement(pointer: Vec2, width: u32, height: u32) -> Result<DisplacementMap> {
    Ok(DisplacementField::compute(pointer, width, height)?.rasterize())
}
