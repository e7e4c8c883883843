//! Per-actor draw instances
//!
//! One [`DrawInstance`] per active actor, laid out for direct upload into an
//! instance buffer with `bytemuck::cast_slice`.

use bytemuck::{Pod, Zeroable};

use crate::sim::GameState;

/// Shape ids understood by the instance shader
pub mod shape {
    /// Filled circle
    pub const CIRCLE: u32 = 0;
    /// Square quad (projectiles)
    pub const QUAD: u32 = 1;
    /// Triangle pointing along rotation (players)
    pub const TRIANGLE: u32 = 2;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct DrawInstance {
    pub position: [f32; 2], // offset 0
    pub rotation: f32,      // offset 8
    pub radius: f32,        // offset 12
    pub color: [f32; 4],    // offset 16
    pub shape: u32,         // offset 32
    pub _pad: [u32; 3],     // pad to 48 bytes
}

impl DrawInstance {
    pub fn new(position: glam::Vec2, rotation: f32, radius: f32, rgba: u32, shape: u32) -> Self {
        Self {
            position: position.to_array(),
            rotation,
            radius,
            color: color_from_rgba(rgba),
            shape,
            _pad: [0; 3],
        }
    }
}

/// Unpack 0xRRGGBBAA into normalized floats
pub fn color_from_rgba(rgba: u32) -> [f32; 4] {
    rgba.to_be_bytes().map(|c| c as f32 / 255.0)
}

/// Fill `out` with one instance per active actor: enemies, then
/// projectiles, then players (drawn on top). Dead players are still drawn.
pub fn build_frame(state: &GameState, out: &mut Vec<DrawInstance>) {
    out.clear();
    out.reserve(
        state.enemies.active_count()
            + state.projectiles.active_count()
            + state.players.active_count(),
    );

    for (_, enemy) in state.enemies.iter() {
        out.push(DrawInstance::new(
            enemy.position,
            0.0,
            enemy.radius,
            enemy.display_color(),
            shape::CIRCLE,
        ));
    }

    for (_, projectile) in state.projectiles.iter() {
        out.push(DrawInstance::new(
            projectile.position,
            0.0,
            crate::consts::PROJECTILE_RADIUS,
            projectile.color,
            shape::QUAD,
        ));
    }

    for (_, player) in state.players.iter() {
        out.push(DrawInstance::new(
            player.position,
            player.rotation,
            player.radius,
            player.color,
            shape::TRIANGLE,
        ));
    }
}
