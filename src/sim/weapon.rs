//! Player weapons
//!
//! Every weapon runs on its own cooldown and auto-fires when it elapses.
//! The four kinds differ only in how a shot is laid out:
//!
//! - Standard: a fan of projectiles around the aim direction
//! - Homing: one projectile at the nearest enemy in range
//! - Circular: a ring of projectiles in every direction
//! - Spiral: projectiles that orbit the owner until they expire

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actors::{Ballistics, Enemy, PlayerHandle, Projectile, ProjectileHandle, palette};
use super::pool::ActorPool;
use crate::config::{ArenaConfig, WeaponTable};
use crate::{facing_direction, normalize_or, rotate};

const STANDARD_RATE_SCALE: f32 = 0.9;
const HOMING_RATE_SCALE: f32 = 0.9;
const HOMING_SPEED_SCALE: f32 = 1.1;
const HOMING_RANGE_SCALE: f32 = 1.1;
const CIRCULAR_RATE_SCALE: f32 = 0.9;
const SPIRAL_RATE_SCALE: f32 = 0.8;
const SPIRAL_ROTATION_SCALE: f32 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Standard,
    Homing,
    Circular,
    Spiral,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 4] = [
        WeaponKind::Standard,
        WeaponKind::Homing,
        WeaponKind::Circular,
        WeaponKind::Spiral,
    ];

    /// Single-letter HUD tag
    pub fn tag(self) -> char {
        match self {
            WeaponKind::Standard => 'S',
            WeaponKind::Homing => 'H',
            WeaponKind::Circular => 'C',
            WeaponKind::Spiral => 'O',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardParams {
    /// Seconds between auto-fire shots
    pub fire_rate: f32,
    pub projectile_speed: f32,
    pub slowdown: f32,
    pub lifetime: f32,
    pub damage: i32,
    pub max_level: u32,
    /// Radians between neighbouring projectiles of the fan
    pub spread_angle: f32,
    /// Projectiles per shot at level 0 (one more per level)
    pub base_count: u32,
    pub max_count: u32,
}

impl Default for StandardParams {
    fn default() -> Self {
        Self {
            fire_rate: 0.9,
            projectile_speed: 200.0,
            slowdown: 200.0,
            lifetime: 5.0,
            damage: 4,
            max_level: 5,
            spread_angle: 0.15,
            base_count: 3,
            max_count: 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomingParams {
    pub fire_rate: f32,
    pub projectile_speed: f32,
    pub slowdown: f32,
    pub lifetime: f32,
    /// Fixed at every level
    pub damage: i32,
    pub max_level: u32,
    /// Enemies further than this from the muzzle are ignored
    pub detection_range: f32,
}

impl Default for HomingParams {
    fn default() -> Self {
        Self {
            fire_rate: 1.5,
            projectile_speed: 150.0,
            slowdown: 100.0,
            lifetime: 5.0,
            damage: 8,
            max_level: 3,
            detection_range: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircularParams {
    pub fire_rate: f32,
    pub projectile_speed: f32,
    pub slowdown: f32,
    pub lifetime: f32,
    /// Fixed at every level
    pub damage: i32,
    pub max_level: u32,
    /// Ring size at level 0 (one more per level)
    pub base_count: u32,
}

impl Default for CircularParams {
    fn default() -> Self {
        Self {
            fire_rate: 2.0,
            projectile_speed: 100.0,
            slowdown: 50.0,
            lifetime: 5.0,
            damage: 1,
            max_level: 3,
            base_count: 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiralParams {
    pub fire_rate: f32,
    /// Seconds an orbiting projectile lives
    pub lifetime: f32,
    pub damage: i32,
    pub max_level: u32,
    pub base_count: u32,
    pub max_count: u32,
    /// Distance from the owner
    pub orbit_radius: f32,
    /// Radians per second before `tightness`
    pub rotation_speed: f32,
    pub tightness: f32,
    /// Live orbits per weapon
    pub max_orbits: usize,
}

impl Default for SpiralParams {
    fn default() -> Self {
        Self {
            fire_rate: 3.0,
            lifetime: 10.0,
            damage: 4,
            max_level: 3,
            base_count: 1,
            max_count: 4,
            orbit_radius: 25.0,
            rotation_speed: 2.5,
            tightness: 1.5,
            max_orbits: 20,
        }
    }
}

/// Where a weapon fires from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Muzzle {
    pub position: Vec2,
    /// Owner facing (radians, 0 faces +Y)
    pub rotation: f32,
}

/// World access for spawning projectiles
pub struct FireContext<'a> {
    pub projectiles: &'a mut ActorPool<Projectile>,
    pub enemies: &'a ActorPool<Enemy>,
    pub rng: &'a mut Pcg32,
    pub arena: ArenaConfig,
}

/// A projectile held in orbit by a spiral weapon
#[derive(Debug, Clone)]
pub struct Orbit {
    pub projectile: ProjectileHandle,
    pub angle: f32,
    pub radius: f32,
    pub angular_speed: f32,
    pub remaining: f32,
}

#[derive(Debug, Clone)]
enum Pattern {
    Standard(StandardParams),
    Homing(HomingParams),
    Circular(CircularParams),
    Spiral {
        params: SpiralParams,
        orbits: Vec<Orbit>,
    },
}

#[derive(Debug, Clone)]
pub struct Weapon {
    kind: WeaponKind,
    owner: Option<PlayerHandle>,
    /// Seconds until the next auto-fire
    fire_cooldown: f32,
    /// Seconds between auto-fire shots
    fire_rate: f32,
    upgrade_level: u32,
    max_upgrade_level: u32,
    damage: i32,
    spawn_offset: Vec2,
    pattern: Pattern,
}

impl Weapon {
    /// A fresh level-0 weapon. It will not fire until bound to an owner.
    pub fn new(kind: WeaponKind, table: &WeaponTable) -> Self {
        let (fire_rate, max_upgrade_level, damage, pattern) = match kind {
            WeaponKind::Standard => {
                let p = table.standard;
                (p.fire_rate, p.max_level, p.damage, Pattern::Standard(p))
            }
            WeaponKind::Homing => {
                let p = table.homing;
                (p.fire_rate, p.max_level, p.damage, Pattern::Homing(p))
            }
            WeaponKind::Circular => {
                let p = table.circular;
                (p.fire_rate, p.max_level, p.damage, Pattern::Circular(p))
            }
            WeaponKind::Spiral => {
                let p = table.spiral;
                let pattern = Pattern::Spiral {
                    params: p,
                    orbits: Vec::with_capacity(p.max_orbits),
                };
                (p.fire_rate, p.max_level, p.damage, pattern)
            }
        };

        Self {
            kind,
            owner: None,
            fire_cooldown: 0.0,
            fire_rate,
            upgrade_level: 0,
            max_upgrade_level,
            damage,
            spawn_offset: Vec2::ZERO,
            pattern,
        }
    }

    pub fn kind(&self) -> WeaponKind {
        self.kind
    }

    pub fn owner(&self) -> Option<PlayerHandle> {
        self.owner
    }

    pub fn bind(&mut self, owner: PlayerHandle) {
        self.owner = Some(owner);
    }

    pub fn fire_rate(&self) -> f32 {
        self.fire_rate
    }

    pub fn fire_cooldown(&self) -> f32 {
        self.fire_cooldown
    }

    pub fn upgrade_level(&self) -> u32 {
        self.upgrade_level
    }

    pub fn max_upgrade_level(&self) -> u32 {
        self.max_upgrade_level
    }

    pub fn can_upgrade(&self) -> bool {
        self.upgrade_level < self.max_upgrade_level
    }

    pub fn damage(&self) -> i32 {
        self.damage
    }

    pub fn spawn_offset(&self) -> Vec2 {
        self.spawn_offset
    }

    pub fn set_spawn_offset(&mut self, offset: Vec2) {
        self.spawn_offset = offset;
    }

    /// Projectiles laid out by one shot at the current level
    pub fn projectiles_per_shot(&self) -> u32 {
        match &self.pattern {
            Pattern::Standard(p) => (p.base_count + self.upgrade_level).min(p.max_count),
            Pattern::Homing(_) => 1,
            Pattern::Circular(p) => p.base_count + self.upgrade_level,
            Pattern::Spiral { params, .. } => {
                (params.base_count + self.upgrade_level).min(params.max_count)
            }
        }
    }

    /// Live orbits (spiral only)
    pub fn orbits(&self) -> &[Orbit] {
        match &self.pattern {
            Pattern::Spiral { orbits, .. } => orbits,
            _ => &[],
        }
    }

    /// Tick the cooldown, auto-firing along the muzzle facing when it
    /// elapses, then advance any orbits. Returns projectiles spawned.
    pub fn update(&mut self, dt: f32, muzzle: Muzzle, ctx: &mut FireContext) -> usize {
        if self.owner.is_none() {
            return 0;
        }

        if self.fire_cooldown > 0.0 {
            self.fire_cooldown -= dt;
        }

        let mut fired = 0;
        if self.fire_cooldown <= 0.0 && self.has_orbit_room() {
            self.fire_cooldown = self.fire_rate;
            fired = self.fire(muzzle.position, facing_direction(muzzle.rotation), ctx);
        }

        if let Pattern::Spiral { orbits, .. } = &mut self.pattern {
            advance_orbits(orbits, muzzle.position, dt, ctx.projectiles);
        }
        fired
    }

    /// Fire one shot from `origin`. `direction` is the aim for standard
    /// weapons and the fallback for homing ones; the ring patterns ignore it.
    /// Returns projectiles spawned, which is fewer than requested when the
    /// pool runs out of slots.
    pub fn fire(&mut self, origin: Vec2, direction: Vec2, ctx: &mut FireContext) -> usize {
        let origin = origin + self.spawn_offset;
        let damage = self.damage;

        match &mut self.pattern {
            Pattern::Standard(p) => {
                let shot = Ballistics {
                    speed: p.projectile_speed,
                    slowdown: p.slowdown,
                    lifetime: p.lifetime,
                    damage,
                    color: palette::PROJECTILE_STANDARD,
                };
                let aim = normalize_or(direction, Vec2::Y);
                let count = (p.base_count + self.upgrade_level).min(p.max_count);
                let middle = (count as f32 - 1.0) / 2.0;
                (0..count)
                    .filter_map(|i| {
                        let offset = (i as f32 - middle) * p.spread_angle;
                        launch(ctx, origin, rotate(aim, offset), &shot)
                    })
                    .count()
            }
            Pattern::Homing(p) => {
                let shot = Ballistics {
                    speed: p.projectile_speed,
                    slowdown: p.slowdown,
                    lifetime: p.lifetime,
                    damage,
                    color: palette::PROJECTILE_HOMING,
                };
                let fallback = if direction.length_squared() > 0.0 {
                    direction
                } else {
                    Vec2::Y
                };
                let aim = nearest_enemy(ctx.enemies, origin, p.detection_range)
                    .map(|target| normalize_or(target - origin, fallback))
                    .unwrap_or(fallback);
                usize::from(launch(ctx, origin, aim, &shot).is_some())
            }
            Pattern::Circular(p) => {
                let shot = Ballistics {
                    speed: p.projectile_speed,
                    slowdown: p.slowdown,
                    lifetime: p.lifetime,
                    damage,
                    color: palette::PROJECTILE_CIRCULAR,
                };
                let count = p.base_count + self.upgrade_level;
                (0..count)
                    .filter_map(|i| {
                        let angle = TAU * i as f32 / count as f32;
                        launch(ctx, origin, Vec2::from_angle(angle), &shot)
                    })
                    .count()
            }
            Pattern::Spiral { params, orbits } => {
                let shot = Ballistics {
                    speed: 0.0,
                    slowdown: 0.0,
                    lifetime: params.lifetime,
                    damage,
                    color: palette::PROJECTILE_SPIRAL,
                };
                let count = (params.base_count + self.upgrade_level).min(params.max_count);
                let mut fired = 0;
                for i in 0..count {
                    if orbits.len() >= params.max_orbits {
                        break;
                    }
                    let angle = TAU * i as f32 / count as f32;
                    let position = origin + Vec2::from_angle(angle) * params.orbit_radius;
                    let Some(projectile) = launch(ctx, position, Vec2::ZERO, &shot) else {
                        break;
                    };
                    orbits.push(Orbit {
                        projectile,
                        angle,
                        radius: params.orbit_radius,
                        angular_speed: params.rotation_speed * params.tightness,
                        remaining: params.lifetime,
                    });
                    fired += 1;
                }
                fired
            }
        }
    }

    /// Fire immediately, ignoring the cooldown. Standard weapons pick a
    /// random whole-degree direction, homing ones fall back to the facing.
    pub fn fire_manual(&mut self, muzzle: Muzzle, ctx: &mut FireContext) -> usize {
        if self.owner.is_none() {
            return 0;
        }
        let direction = match self.kind {
            WeaponKind::Standard => {
                let degrees = ctx.rng.random_range(0..360u32) as f32;
                facing_direction(degrees.to_radians())
            }
            WeaponKind::Homing => facing_direction(muzzle.rotation),
            WeaponKind::Circular | WeaponKind::Spiral => Vec2::ZERO,
        };
        self.fire(muzzle.position, direction, ctx)
    }

    /// Raise the level by one, improving the kind's stats.
    /// Returns false (and changes nothing) at the level cap.
    pub fn upgrade(&mut self) -> bool {
        if !self.can_upgrade() {
            return false;
        }
        self.upgrade_level += 1;
        match &mut self.pattern {
            Pattern::Standard(_) => self.fire_rate *= STANDARD_RATE_SCALE,
            Pattern::Homing(p) => {
                self.fire_rate *= HOMING_RATE_SCALE;
                p.projectile_speed *= HOMING_SPEED_SCALE;
                p.detection_range *= HOMING_RANGE_SCALE;
            }
            Pattern::Circular(_) => self.fire_rate *= CIRCULAR_RATE_SCALE,
            Pattern::Spiral { params, .. } => {
                self.fire_rate *= SPIRAL_RATE_SCALE;
                params.rotation_speed *= SPIRAL_ROTATION_SCALE;
            }
        }
        true
    }

    fn has_orbit_room(&self) -> bool {
        match &self.pattern {
            Pattern::Spiral { params, orbits } => orbits.len() < params.max_orbits,
            _ => true,
        }
    }
}

fn launch(
    ctx: &mut FireContext,
    position: Vec2,
    direction: Vec2,
    shot: &Ballistics,
) -> Option<ProjectileHandle> {
    let handle = ctx
        .projectiles
        .spawn(Projectile::launch(position, direction, shot, ctx.arena));
    if handle.is_none() {
        log::trace!("Projectile pool full, shot dropped");
    }
    handle
}

/// Position of the closest living enemy strictly within `range` of `origin`
fn nearest_enemy(enemies: &ActorPool<Enemy>, origin: Vec2, range: f32) -> Option<Vec2> {
    let mut best = None;
    let mut best_dist_sq = range * range;
    for (_, enemy) in enemies.iter() {
        if !enemy.is_alive() {
            continue;
        }
        let dist_sq = enemy.position.distance_squared(origin);
        if dist_sq < best_dist_sq {
            best_dist_sq = dist_sq;
            best = Some(enemy.position);
        }
    }
    best
}

/// Carry orbiting projectiles around `center`. Orbits whose projectile is
/// gone are dropped; expired ones free their projectile.
fn advance_orbits(
    orbits: &mut Vec<Orbit>,
    center: Vec2,
    dt: f32,
    projectiles: &mut ActorPool<Projectile>,
) {
    orbits.retain_mut(|orbit| {
        if !projectiles.is_active(orbit.projectile) {
            return false;
        }
        orbit.remaining -= dt;
        if orbit.remaining <= 0.0 {
            projectiles.deactivate(orbit.projectile);
            return false;
        }
        orbit.angle += orbit.angular_speed * dt;
        if let Some(projectile) = projectiles.get_mut(orbit.projectile) {
            projectile.position = center + Vec2::from_angle(orbit.angle) * orbit.radius;
        }
        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerTuning;
    use crate::sim::actors::{EnemySize, Player};
    use rand::SeedableRng;

    struct Rig {
        players: ActorPool<Player>,
        projectiles: ActorPool<Projectile>,
        enemies: ActorPool<Enemy>,
        rng: Pcg32,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                players: ActorPool::new(1),
                projectiles: ActorPool::new(100),
                enemies: ActorPool::new(10),
                rng: Pcg32::seed_from_u64(1),
            }
        }

        fn ctx(&mut self) -> FireContext<'_> {
            FireContext {
                projectiles: &mut self.projectiles,
                enemies: &self.enemies,
                rng: &mut self.rng,
                arena: ArenaConfig::default(),
            }
        }

        fn armed(&mut self, kind: WeaponKind, table: &WeaponTable) -> Weapon {
            let owner = self
                .players
                .spawn(Player::new(0, Vec2::new(160.0, 120.0), &PlayerTuning::default()))
                .unwrap();
            let mut weapon = Weapon::new(kind, table);
            weapon.bind(owner);
            weapon
        }

        fn directions(&self) -> Vec<Vec2> {
            self.projectiles.iter().map(|(_, p)| p.direction).collect()
        }
    }

    const CENTER: Vec2 = Vec2::new(160.0, 120.0);

    #[test]
    fn test_standard_fan_is_symmetric() {
        let mut rig = Rig::new();
        let table = WeaponTable::default();
        let mut weapon = rig.armed(WeaponKind::Standard, &table);

        let fired = weapon.fire(CENTER, Vec2::Y, &mut rig.ctx());
        assert_eq!(fired, 3);

        let theta = table.standard.spread_angle;
        let mut offsets: Vec<f32> = rig
            .directions()
            .iter()
            .map(|d| Vec2::Y.perp_dot(*d).atan2(Vec2::Y.dot(*d)))
            .collect();
        offsets.sort_by(f32::total_cmp);
        for (got, want) in offsets.iter().zip([-theta, 0.0, theta]) {
            assert!((got - want).abs() < 1e-5, "{got} vs {want}");
        }
    }

    #[test]
    fn test_standard_count_is_capped() {
        let mut rig = Rig::new();
        let table = WeaponTable::default();
        let mut weapon = rig.armed(WeaponKind::Standard, &table);
        while weapon.upgrade() {}

        assert_eq!(weapon.upgrade_level(), table.standard.max_level);
        assert_eq!(weapon.fire(CENTER, Vec2::Y, &mut rig.ctx()), 6);
    }

    #[test]
    fn test_homing_without_target_uses_fallback() {
        let mut rig = Rig::new();
        let mut weapon = rig.armed(WeaponKind::Homing, &WeaponTable::default());
        let fallback = Vec2::new(0.6, 0.8);

        assert_eq!(weapon.fire(CENTER, fallback, &mut rig.ctx()), 1);
        assert_eq!(rig.directions(), vec![fallback]);
        assert_eq!(weapon.damage(), 8);
    }

    #[test]
    fn test_homing_aims_at_nearest_in_range() {
        let mut rig = Rig::new();
        let mut weapon = rig.armed(WeaponKind::Homing, &WeaponTable::default());
        let far = CENTER + Vec2::new(-90.0, 0.0);
        let near = CENTER + Vec2::new(30.0, 40.0);
        // Outside the 100 unit range
        let out_of_range = CENTER + Vec2::new(0.0, -101.0);
        for position in [far, near, out_of_range] {
            rig.enemies.spawn(Enemy::new(position, 0.0, EnemySize::Small, 3.0, 4));
        }

        weapon.fire(CENTER, Vec2::Y, &mut rig.ctx());
        let dir = rig.directions()[0];
        assert!((dir - Vec2::new(0.6, 0.8)).length() < 1e-5);
    }

    #[test]
    fn test_homing_ignores_out_of_range_enemy() {
        let mut rig = Rig::new();
        let mut weapon = rig.armed(WeaponKind::Homing, &WeaponTable::default());
        let edge = CENTER + Vec2::new(100.0, 0.0);
        rig.enemies.spawn(Enemy::new(edge, 0.0, EnemySize::Small, 3.0, 4));

        weapon.fire(CENTER, -Vec2::Y, &mut rig.ctx());
        assert_eq!(rig.directions(), vec![-Vec2::Y]);
    }

    #[test]
    fn test_circular_ring_grows_with_level() {
        let mut rig = Rig::new();
        let mut weapon = rig.armed(WeaponKind::Circular, &WeaponTable::default());
        assert_eq!(weapon.fire(CENTER, Vec2::ZERO, &mut rig.ctx()), 8);

        rig.projectiles.clear();
        assert!(weapon.upgrade());
        assert_eq!(weapon.fire(CENTER, Vec2::ZERO, &mut rig.ctx()), 9);
        assert!(rig.projectiles.iter().all(|(_, p)| p.damage == 1));

        let sum: Vec2 = rig.directions().into_iter().sum();
        assert!(sum.length() < 1e-4);
    }

    #[test]
    fn test_shot_truncated_by_full_pool() {
        let mut rig = Rig::new();
        rig.projectiles = ActorPool::new(5);
        let mut weapon = rig.armed(WeaponKind::Circular, &WeaponTable::default());

        assert_eq!(weapon.fire(CENTER, Vec2::ZERO, &mut rig.ctx()), 5);
        assert_eq!(weapon.fire(CENTER, Vec2::ZERO, &mut rig.ctx()), 0);
        assert!(rig.projectiles.is_full());
    }

    #[test]
    fn test_cooldown_cadence() {
        let mut rig = Rig::new();
        let mut table = WeaponTable::default();
        table.homing.fire_rate = 1.0;
        let mut weapon = rig.armed(WeaponKind::Homing, &table);
        let muzzle = Muzzle {
            position: CENTER,
            rotation: 0.0,
        };

        let shots: Vec<usize> = (0..9)
            .map(|_| weapon.update(0.25, muzzle, &mut rig.ctx()))
            .collect();
        assert_eq!(shots, vec![1, 0, 0, 0, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn test_unbound_weapon_never_fires() {
        let mut rig = Rig::new();
        let mut weapon = Weapon::new(WeaponKind::Standard, &WeaponTable::default());
        let muzzle = Muzzle {
            position: CENTER,
            rotation: 0.0,
        };

        assert_eq!(weapon.update(1.0, muzzle, &mut rig.ctx()), 0);
        assert_eq!(weapon.fire_manual(muzzle, &mut rig.ctx()), 0);
        assert_eq!(rig.projectiles.active_count(), 0);
    }

    #[test]
    fn test_upgrade_stops_at_cap() {
        let table = WeaponTable::default();
        let mut weapon = Weapon::new(WeaponKind::Spiral, &table);
        let mut rate = weapon.fire_rate();
        for _ in 0..table.spiral.max_level {
            assert!(weapon.upgrade());
            assert!(weapon.fire_rate() < rate);
            rate = weapon.fire_rate();
        }
        assert!(!weapon.upgrade());
        assert_eq!(weapon.fire_rate(), rate);
        assert_eq!(weapon.upgrade_level(), table.spiral.max_level);
    }

    #[test]
    fn test_spiral_orbits_follow_owner() {
        let mut rig = Rig::new();
        let table = WeaponTable::default();
        let mut weapon = rig.armed(WeaponKind::Spiral, &table);
        let moved = CENTER + Vec2::new(10.0, 0.0);

        weapon.update(0.0, Muzzle { position: CENTER, rotation: 0.0 }, &mut rig.ctx());
        assert_eq!(weapon.orbits().len(), 1);

        weapon.update(0.1, Muzzle { position: moved, rotation: 0.0 }, &mut rig.ctx());
        let orbit = &weapon.orbits()[0];
        let projectile = rig.projectiles.get(orbit.projectile).unwrap();
        assert!((projectile.position.distance(moved) - table.spiral.orbit_radius).abs() < 1e-3);
        assert!(orbit.angle > 0.0);
    }

    #[test]
    fn test_spiral_drops_orbit_of_freed_projectile() {
        let mut rig = Rig::new();
        let mut weapon = rig.armed(WeaponKind::Spiral, &WeaponTable::default());
        let muzzle = Muzzle {
            position: CENTER,
            rotation: 0.0,
        };

        weapon.fire(CENTER, Vec2::ZERO, &mut rig.ctx());
        let handle = weapon.orbits()[0].projectile;
        rig.projectiles.deactivate(handle);

        weapon.update(0.1, muzzle, &mut rig.ctx());
        assert!(weapon.orbits().iter().all(|o| o.projectile != handle));
    }

    #[test]
    fn test_spiral_orbit_expires_and_frees_projectile() {
        let mut rig = Rig::new();
        let mut table = WeaponTable::default();
        table.spiral.lifetime = 0.5;
        let mut weapon = rig.armed(WeaponKind::Spiral, &table);

        weapon.fire(CENTER, Vec2::ZERO, &mut rig.ctx());
        let handle = weapon.orbits()[0].projectile;
        // Cooldown is still zero, so push it out of the way first
        weapon.fire_cooldown = 10.0;

        let muzzle = Muzzle {
            position: CENTER,
            rotation: 0.0,
        };
        weapon.update(0.6, muzzle, &mut rig.ctx());
        assert!(weapon.orbits().is_empty());
        assert!(!rig.projectiles.is_active(handle));
    }

    #[test]
    fn test_spiral_respects_orbit_cap() {
        let mut rig = Rig::new();
        let mut table = WeaponTable::default();
        table.spiral.max_orbits = 2;
        table.spiral.base_count = 3;
        table.spiral.max_count = 3;
        let mut weapon = rig.armed(WeaponKind::Spiral, &table);

        assert_eq!(weapon.fire(CENTER, Vec2::ZERO, &mut rig.ctx()), 2);
        assert_eq!(weapon.fire(CENTER, Vec2::ZERO, &mut rig.ctx()), 0);
        assert_eq!(weapon.orbits().len(), 2);
    }

    #[test]
    fn test_manual_fire_ignores_cooldown() {
        let mut rig = Rig::new();
        let mut weapon = rig.armed(WeaponKind::Standard, &WeaponTable::default());
        weapon.fire_cooldown = 5.0;
        let muzzle = Muzzle {
            position: CENTER,
            rotation: 0.0,
        };

        assert_eq!(weapon.fire_manual(muzzle, &mut rig.ctx()), 3);
        assert_eq!(weapon.fire_cooldown(), 5.0);
    }
}
