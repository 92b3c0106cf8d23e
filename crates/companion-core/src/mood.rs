use crate::error::CompanionError;
use std::fmt;
use std::str::FromStr;

/// Discrete mood driving the animation regime.
///
/// Exactly one value is active at a time and the host owns it. `Glitch` is a
/// transient interrupt; the other four are steady moods.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MoodState {
    #[default]
    Idle,
    Listening,
    Thinking,
    Speaking,
    Glitch,
}

/// Host-level sub-phase of a running glitch (backdrop flash, then fade).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlitchPhase {
    Initial,
    Sine,
    Settling,
}

/// Per-mood motion tuning fed into the steady-state formula.
///
/// - `drift_amplitude`: primary offset amplitude per axis (world units)
/// - `breathe_amplitude`: scale pulse amplitude around 1.0
/// - `spin_speed`: radians per second before axis ratios are applied
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoodMotion {
    pub drift_amplitude: f32,
    pub breathe_amplitude: f32,
    pub spin_speed: f32,
}

impl MoodState {
    pub const ALL: [MoodState; 5] = [
        MoodState::Idle,
        MoodState::Listening,
        MoodState::Thinking,
        MoodState::Speaking,
        MoodState::Glitch,
    ];

    pub fn is_glitch(self) -> bool {
        matches!(self, MoodState::Glitch)
    }

    pub fn label(self) -> &'static str {
        match self {
            MoodState::Idle => "idle",
            MoodState::Listening => "listening",
            MoodState::Thinking => "thinking",
            MoodState::Speaking => "speaking",
            MoodState::Glitch => "glitch",
        }
    }

    /// Motion tuning for this mood.
    ///
    /// `Glitch` never drives the steady formula directly (entities keep the
    /// resting mood's baseline while glitching), so it shares the idle table.
    pub fn motion(self) -> MoodMotion {
        match self {
            MoodState::Idle | MoodState::Glitch => MoodMotion {
                drift_amplitude: 0.4,
                breathe_amplitude: 0.12,
                spin_speed: 0.3,
            },
            MoodState::Listening => MoodMotion {
                drift_amplitude: 0.5,
                breathe_amplitude: 0.15,
                spin_speed: 0.8,
            },
            MoodState::Thinking => MoodMotion {
                drift_amplitude: 0.3,
                breathe_amplitude: 0.18,
                spin_speed: 1.2,
            },
            MoodState::Speaking => MoodMotion {
                drift_amplitude: 0.45,
                breathe_amplitude: 0.16,
                spin_speed: 1.0,
            },
        }
    }

    /// Five-entry hex palette used when generating entities for this mood.
    /// Glitch never generates; its palette is the tint target while glitching.
    pub fn palette(self) -> &'static [u32; 5] {
        match self {
            MoodState::Idle => &IDLE_PALETTE,
            MoodState::Listening => &LISTENING_PALETTE,
            MoodState::Thinking => &THINKING_PALETTE,
            MoodState::Speaking => &SPEAKING_PALETTE,
            MoodState::Glitch => &GLITCH_PALETTE,
        }
    }

    /// Palette colour for entity `index`, wrapping around the five entries.
    pub fn color(self, index: usize) -> [f32; 3] {
        let palette = self.palette();
        hex_to_rgb(palette[index % palette.len()])
    }
}

impl fmt::Display for MoodState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MoodState {
    type Err = CompanionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        MoodState::ALL
            .into_iter()
            .find(|m| m.label() == lowered)
            .ok_or_else(|| CompanionError::UnknownMood(s.to_string()))
    }
}

#[inline]
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

pub const IDLE_PALETTE: [u32; 5] = [0x4A90E2, 0x7B68EE, 0x9370DB, 0x6A5ACD, 0x483D8B];
pub const LISTENING_PALETTE: [u32; 5] = [0x50C878, 0x00FF7F, 0x32CD32, 0x7CFC00, 0xADFF2F];
pub const THINKING_PALETTE: [u32; 5] = [0xFFD700, 0xFFA500, 0xFF8C00, 0xFF6347, 0xFF4500];
pub const SPEAKING_PALETTE: [u32; 5] = [0xFF69B4, 0xFF1493, 0xDC143C, 0xB22222, 0x8B0000];
pub const GLITCH_PALETTE: [u32; 5] = [0xFF0066, 0xFF3385, 0xE6005C, 0xFF66A3, 0xB30047];
