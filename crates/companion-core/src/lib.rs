pub mod companion;
pub mod constants;
pub mod displacement;
pub mod entity;
pub mod error;
pub mod glitch;
pub mod mood;
pub mod motion;
pub mod oscillator;
pub mod state;
pub mod transition;
pub mod worker;

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static GLASS_WGSL: &str = include_str!("../shaders/glass.wgsl");

pub use companion::*;
pub use constants::*;
pub use displacement::*;
pub use entity::*;
pub use error::CompanionError;
pub use glitch::*;
pub use mood::*;
pub use motion::*;
pub use state::*;
pub use transition::*;
pub use worker::*;
