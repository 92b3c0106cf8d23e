use thiserror::Error;

/// Recoverable configuration and interaction errors.
///
/// Contract violations by the host (negative frame deltas, unknown entity ids)
/// are not represented here; those panic at the call site.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompanionError {
    #[error("entity count {count} is outside {min}..={max}")]
    EntityCount { count: usize, min: usize, max: usize },

    #[error("overlay size must be non-zero, got {width}x{height}")]
    EmptyOverlay { width: u32, height: u32 },

    #[error("pointer position ({x}, {y}) is not finite")]
    NonFinitePointer { x: f32, y: f32 },

    #[error("unknown mood '{0}'")]
    UnknownMood(String),

    #[error("displacement worker has shut down")]
    WorkerClosed,
}

pub type Result<T> = std::result::Result<T, CompanionError>;
