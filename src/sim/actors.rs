//! Player, enemy and projectile actors

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pool::{Actor, ActorPool, Body, Handle};
use super::spawn::WaveConfig;
use super::weapon::{FireContext, Muzzle, Weapon, WeaponKind};
use crate::config::{ArenaConfig, EnemyTuning, PlayerTuning};
use crate::consts::PROJECTILE_RADIUS;
use crate::error::SimError;
use crate::facing_direction;

pub type PlayerHandle = Handle<Player>;
pub type EnemyHandle = Handle<Enemy>;
pub type ProjectileHandle = Handle<Projectile>;

/// RGBA8 colours (0xRRGGBBAA)
pub mod palette {
    pub const PLAYERS: [u32; 4] = [0xFFFFFFFF, 0x00FF00FF, 0x00FFFFFF, 0xFFFF00FF];
    pub const DEAD_PLAYER: u32 = 0xFF0000FF;
    pub const RED: u32 = 0xFF0000FF;
    pub const YELLOW: u32 = 0xFFFF00FF;
    pub const CYAN: u32 = 0x00FFFFFF;
    pub const HIT_FLASH: u32 = 0xFFFFFFFF;
    pub const PROJECTILE_STANDARD: u32 = 0xFF00FFFF;
    pub const PROJECTILE_HOMING: u32 = 0xFF8040FF;
    pub const PROJECTILE_CIRCULAR: u32 = 0xA040FFFF;
    pub const PROJECTILE_SPIRAL: u32 = 0xFF8000FF;
}

/// Enemy size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemySize {
    Small,
    Medium,
    Large,
}

/// A chasing enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    pub position: Vec2,
    pub velocity: Vec2,
    pub speed: f32,
    pub health: i32,
    pub max_health: i32,
    pub size: EnemySize,
    pub radius: f32,
    pub color: u32,
    pub xp_reward: u32,
    /// Player this enemy chases. Re-validated every tick; may go stale.
    pub target: Option<PlayerHandle>,
    /// Remaining hit-flash time (seconds)
    pub hit_timer: f32,
    pub hit_flash: f32,
}

impl Enemy {
    pub fn new(position: Vec2, speed: f32, size: EnemySize, radius: f32, health: i32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            speed,
            health,
            max_health: health,
            size,
            radius,
            color: palette::RED,
            xp_reward: 1,
            target: None,
            hit_timer: 0.0,
            hit_flash: 0.1,
        }
    }

    /// Build an enemy with the stats of `wave`
    pub fn from_wave(
        wave: &WaveConfig,
        tuning: &EnemyTuning,
        position: Vec2,
        speed: f32,
        target: Option<PlayerHandle>,
    ) -> Self {
        let size = tuning.size(wave.enemy_size);
        let health = size.health.saturating_mul(wave.health_multiplier).max(1);
        Self {
            color: wave.enemy_color,
            xp_reward: wave.xp_reward,
            target,
            hit_flash: tuning.hit_flash,
            ..Self::new(position, speed, wave.enemy_size, size.radius, health)
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Apply damage. Returns true if this hit killed the enemy.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health -= amount;
        self.hit_timer = self.hit_flash;
        !self.is_alive()
    }

    /// Validate the target and aim velocity at it.
    ///
    /// A stale target (freed slot, reused slot or dead player) is replaced by
    /// the nearest living player. With nobody alive the enemy holds position.
    pub fn steer(&mut self, players: &ActorPool<Player>) {
        let target = self
            .target
            .and_then(|handle| players.get(handle).filter(|p| p.alive).map(|p| (handle, p)))
            .or_else(|| {
                players
                    .iter()
                    .filter(|(_, p)| p.alive)
                    .min_by(|(_, a), (_, b)| {
                        let da = a.position.distance_squared(self.position);
                        let db = b.position.distance_squared(self.position);
                        da.total_cmp(&db)
                    })
            });

        match target {
            Some((handle, player)) => {
                self.target = Some(handle);
                let to_player = player.position - self.position;
                self.velocity = crate::normalize_or(to_player, Vec2::ZERO) * self.speed;
            }
            None => {
                self.target = None;
                self.velocity = Vec2::ZERO;
            }
        }
    }

    /// Current tint, flashing white while recently hit
    pub fn display_color(&self) -> u32 {
        if self.hit_timer > 0.0 {
            palette::HIT_FLASH
        } else {
            self.color
        }
    }
}

impl Body for Enemy {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

impl Actor for Enemy {
    fn update(&mut self, dt: f32) -> bool {
        if self.hit_timer > 0.0 {
            self.hit_timer = (self.hit_timer - dt).max(0.0);
        }
        self.position += self.velocity * dt;
        self.is_alive()
    }
}

/// Launch parameters shared by every projectile of one shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ballistics {
    pub speed: f32,
    /// Carried for presentation; does not decelerate the projectile
    pub slowdown: f32,
    /// Seconds before the projectile expires
    pub lifetime: f32,
    pub damage: i32,
    pub color: u32,
}

/// A single-hit projectile
#[derive(Debug, Clone)]
pub struct Projectile {
    pub position: Vec2,
    /// Unit travel direction (zero for orbiting projectiles)
    pub direction: Vec2,
    pub speed: f32,
    pub slowdown: f32,
    pub lifetime: f32,
    pub max_lifetime: f32,
    pub damage: i32,
    pub color: u32,
    /// Field the projectile expires outside of
    pub bounds: ArenaConfig,
}

impl Projectile {
    pub fn launch(position: Vec2, direction: Vec2, shot: &Ballistics, bounds: ArenaConfig) -> Self {
        Self {
            position,
            direction,
            speed: shot.speed,
            slowdown: shot.slowdown,
            lifetime: 0.0,
            max_lifetime: shot.lifetime,
            damage: shot.damage,
            color: shot.color,
            bounds,
        }
    }
}

impl Body for Projectile {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f32 {
        PROJECTILE_RADIUS
    }
}

impl Actor for Projectile {
    fn update(&mut self, dt: f32) -> bool {
        self.lifetime += dt;
        if self.lifetime >= self.max_lifetime {
            return false;
        }
        self.position += self.direction * self.speed * dt;
        self.bounds.contains(self.position)
    }
}

/// A local player bound to one input port
#[derive(Debug, Clone)]
pub struct Player {
    pub port: usize,
    pub position: Vec2,
    pub velocity: Vec2,
    pub speed: f32,
    /// Facing angle (radians, 0 faces +Y)
    pub rotation: f32,
    pub health: i32,
    pub max_health: i32,
    pub radius: f32,
    pub alive: bool,
    pub color: u32,
    weapons: Vec<Weapon>,
}

impl Player {
    pub fn new(port: usize, position: Vec2, tuning: &PlayerTuning) -> Self {
        Self {
            port,
            position,
            velocity: Vec2::ZERO,
            speed: tuning.speed,
            rotation: 0.0,
            health: tuning.max_health,
            max_health: tuning.max_health,
            radius: tuning.radius,
            alive: true,
            color: tuning.colors[port % tuning.colors.len()],
            weapons: Vec::new(),
        }
    }

    pub fn facing(&self) -> Vec2 {
        facing_direction(self.rotation)
    }

    pub fn muzzle(&self) -> Muzzle {
        Muzzle {
            position: self.position,
            rotation: self.rotation,
        }
    }

    /// Owned weapons in the order they were acquired
    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    pub fn weapon_mut(&mut self, index: usize) -> Option<&mut Weapon> {
        self.weapons.get_mut(index)
    }

    pub fn has_weapon(&self, kind: WeaponKind) -> bool {
        self.weapons.iter().any(|w| w.kind() == kind)
    }

    /// Bind `weapon` to `owner` and append it. A second weapon of a kind
    /// the player already owns is rejected.
    pub fn add_weapon(&mut self, mut weapon: Weapon, owner: PlayerHandle) -> Result<(), SimError> {
        if self.has_weapon(weapon.kind()) {
            return Err(SimError::DuplicateWeapon(weapon.kind()));
        }
        weapon.bind(owner);
        self.weapons.push(weapon);
        Ok(())
    }

    /// Apply damage. Returns true if this hit killed the player.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if !self.alive {
            return false;
        }
        self.health -= amount;
        if self.health <= 0 {
            self.kill();
            return true;
        }
        false
    }

    pub fn kill(&mut self) {
        self.alive = false;
        self.velocity = Vec2::ZERO;
        self.color = palette::DEAD_PLAYER;
    }

    /// Move from an analog stick sample (each axis in -1..=1).
    ///
    /// Axes inside the deadzone are zeroed. Each axis only moves if the new
    /// coordinate stays inside the arena. Facing follows the stick while it
    /// is deflected.
    pub fn steer(&mut self, stick: Vec2, dt: f32, deadzone: f32, arena: &ArenaConfig) {
        let mut axis = stick.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
        if axis.x.abs() < deadzone {
            axis.x = 0.0;
        }
        if axis.y.abs() < deadzone {
            axis.y = 0.0;
        }

        let next = self.position + axis * self.speed * dt;
        if (0.0..=arena.width).contains(&next.x) {
            self.position.x = next.x;
        }
        if (0.0..=arena.height).contains(&next.y) {
            self.position.y = next.y;
        }

        self.velocity = axis * self.speed;
        if axis != Vec2::ZERO {
            self.rotation = axis.x.atan2(axis.y);
        }
    }

    /// Tick every weapon (cooldowns, auto-fire, orbits)
    pub fn update_weapons(&mut self, dt: f32, ctx: &mut FireContext) -> usize {
        let muzzle = self.muzzle();
        self.weapons
            .iter_mut()
            .map(|weapon| weapon.update(dt, muzzle, ctx))
            .sum()
    }

    /// Fire every weapon immediately, ignoring cooldowns
    pub fn fire_manual(&mut self, ctx: &mut FireContext) -> usize {
        let muzzle = self.muzzle();
        self.weapons
            .iter_mut()
            .map(|weapon| weapon.fire_manual(muzzle, ctx))
            .sum()
    }
}

impl Body for Player {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}
