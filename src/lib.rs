//! Horde Survival - a four-player wave survival arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actor pools, weapons, waves, collisions, progression)
//! - `config`: Data-driven game balance
//! - `audio`: Audio collaborator seam
//! - `renderer`: Draw-submission collaborator seam

pub mod audio;
pub mod config;
pub mod error;
pub mod renderer;
pub mod sim;

pub use config::GameConfig;
pub use error::{ConfigError, SimError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Number of input ports (and therefore players)
    pub const MAX_PLAYERS: usize = 4;

    /// Playing field, world units
    pub const SCREEN_WIDTH: f32 = 320.0;
    pub const SCREEN_HEIGHT: f32 = 240.0;

    /// Hard upper bound for any actor pool
    pub const MAX_POOL_CAPACITY: usize = 100;
    pub const MAX_ENEMIES: usize = 100;
    pub const MAX_PROJECTILES: usize = 100;

    /// Projectiles are drawn as 4x4 quads
    pub const PROJECTILE_RADIUS: f32 = 2.0;
}

/// Unit vector for a facing angle. Rotation 0 faces +Y.
#[inline]
pub fn facing_direction(rotation: f32) -> Vec2 {
    Vec2::new(rotation.sin(), rotation.cos())
}

/// Rotate a vector counter-clockwise by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Normalize `v`, or return `fallback` when `v` has no length
#[inline]
pub fn normalize_or(v: Vec2, fallback: Vec2) -> Vec2 {
    let len = v.length();
    if len > 0.0 && len.is_finite() {
        v / len
    } else {
        fallback
    }
}
