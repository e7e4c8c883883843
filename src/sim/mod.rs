//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering or audio dependencies

pub mod actors;
pub mod collision;
pub mod pool;
pub mod progression;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod upgrade;
pub mod weapon;

pub use actors::{
    Enemy, EnemyHandle, EnemySize, Player, PlayerHandle, Projectile, ProjectileHandle,
};
pub use collision::{Kill, circles_overlap};
pub use pool::{Actor, ActorPool, Body, Handle};
pub use progression::Progression;
pub use snapshot::{HudSnapshot, PlayerSummary};
pub use spawn::{SpawnDirector, WaveConfig};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{PlayerInput, TickInput, tick};
pub use upgrade::UpgradeOption;
pub use weapon::{Weapon, WeaponKind};
