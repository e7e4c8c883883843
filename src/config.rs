//! Game balance and tuning
//!
//! Every number the simulation reads lives here so a round can be rebalanced
//! from a JSON file without touching code. Missing fields fall back to the
//! shipped defaults.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::actors::{EnemySize, palette};
use crate::sim::spawn::WaveConfig;
use crate::sim::weapon::{CircularParams, HomingParams, SpiralParams, StandardParams, WeaponKind};

/// Playing field bounds
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
        }
    }
}

impl ArenaConfig {
    /// Inclusive bounds check
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.x <= self.width && pos.y >= 0.0 && pos.y <= self.height
    }
}

/// Pool capacities, fixed for the lifetime of a round
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub enemies: usize,
    pub projectiles: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            enemies: MAX_ENEMIES,
            projectiles: MAX_PROJECTILES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Movement speed (units/s at full stick)
    pub speed: f32,
    pub max_health: i32,
    pub radius: f32,
    /// Per-axis stick deadzone (fraction of full deflection)
    pub deadzone: f32,
    /// Damage taken per overlapping enemy per tick
    pub contact_damage: i32,
    /// Spawn point of port 0; later ports are offset along +X
    pub spawn_origin: Vec2,
    pub spawn_spacing: f32,
    /// RGBA8 colour per port
    pub colors: [u32; MAX_PLAYERS],
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 50.0,
            max_health: 1,
            radius: 3.0,
            deadzone: 0.25,
            contact_damage: 1,
            spawn_origin: Vec2::new(120.0, 100.0),
            spawn_spacing: 20.0,
            colors: palette::PLAYERS,
        }
    }
}

impl PlayerTuning {
    pub fn spawn_position(&self, port: usize) -> Vec2 {
        self.spawn_origin + Vec2::X * self.spawn_spacing * port as f32
    }
}

/// Radius and base health for one enemy size class
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SizeTuning {
    pub radius: f32,
    pub health: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    /// Regular spawn speed before the wave multiplier
    pub base_speed: f32,
    /// Boss spawn speed before the wave multiplier
    pub boss_base_speed: f32,
    pub small: SizeTuning,
    pub medium: SizeTuning,
    pub large: SizeTuning,
    /// Seconds an enemy flashes after taking damage
    pub hit_flash: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            base_speed: 20.0,
            boss_base_speed: 15.0,
            small: SizeTuning {
                radius: 3.0,
                health: 4,
            },
            medium: SizeTuning {
                radius: 5.0,
                health: 8,
            },
            large: SizeTuning {
                radius: 8.0,
                health: 20,
            },
            hit_flash: 0.1,
        }
    }
}

impl EnemyTuning {
    pub fn size(&self, size: EnemySize) -> SizeTuning {
        match size {
            EnemySize::Small => self.small,
            EnemySize::Medium => self.medium,
            EnemySize::Large => self.large,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionTuning {
    /// XP needed for the first level-up
    pub initial_threshold: u32,
    /// Threshold multiplier applied on each level-up
    pub growth_factor: f32,
    /// XP granted by the debug level-up button
    pub debug_xp_grant: u32,
}

impl Default for ProgressionTuning {
    fn default() -> Self {
        Self {
            initial_threshold: 10,
            growth_factor: 1.25,
            debug_xp_grant: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeTuning {
    /// Attempts at rolling a weapon type the player does not own yet
    pub new_weapon_attempts: u32,
}

impl Default for UpgradeTuning {
    fn default() -> Self {
        Self {
            new_weapon_attempts: 10,
        }
    }
}

/// Base parameters for every weapon kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTable {
    pub standard: StandardParams,
    pub homing: HomingParams,
    pub circular: CircularParams,
    pub spiral: SpiralParams,
}

/// Complete game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// RNG seed for a round
    pub seed: u64,
    pub arena: ArenaConfig,
    pub pools: PoolConfig,
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    /// Seconds per wave
    pub wave_duration: f32,
    /// Regular waves in order; the last entry is the boss wave
    pub waves: Vec<WaveConfig>,
    pub progression: ProgressionTuning,
    pub upgrades: UpgradeTuning,
    pub weapons: WeaponTable,
    /// Weapons every player joins with
    pub starting_weapons: Vec<WeaponKind>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed_64,
            arena: ArenaConfig::default(),
            pools: PoolConfig::default(),
            player: PlayerTuning::default(),
            enemy: EnemyTuning::default(),
            wave_duration: 60.0,
            waves: WaveConfig::default_table(),
            progression: ProgressionTuning::default(),
            upgrades: UpgradeTuning::default(),
            weapons: WeaponTable::default(),
            starting_weapons: vec![WeaponKind::Standard],
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Load a config file, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(err) => {
                log::warn!(
                    "Using default config ({}: {})",
                    path.as_ref().display(),
                    err
                );
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Index of the terminal boss wave
    pub fn boss_wave(&self) -> usize {
        self.waves.len().saturating_sub(1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.waves.is_empty() {
            return invalid("wave table is empty".into());
        }
        if let Some(wave) = self
            .waves
            .iter()
            .find(|w| !(w.spawn_interval > 0.0 && w.spawn_interval.is_finite()))
        {
            return invalid(format!(
                "wave {} has spawn interval {}",
                wave.wave_number, wave.spawn_interval
            ));
        }
        if !(self.wave_duration > 0.0) {
            return invalid(format!("wave duration {}", self.wave_duration));
        }
        if !(self.progression.growth_factor >= 1.0 && self.progression.growth_factor.is_finite())
        {
            return invalid(format!(
                "growth factor {} must be >= 1",
                self.progression.growth_factor
            ));
        }
        if self.progression.initial_threshold == 0 {
            return invalid("initial XP threshold must be positive".into());
        }
        for (name, capacity) in [
            ("enemy", self.pools.enemies),
            ("projectile", self.pools.projectiles),
        ] {
            if !(1..=MAX_POOL_CAPACITY).contains(&capacity) {
                return invalid(format!(
                    "{name} pool capacity {capacity} outside 1..={MAX_POOL_CAPACITY}"
                ));
            }
        }
        if !(self.arena.width > 0.0 && self.arena.height > 0.0) {
            return invalid(format!(
                "arena {}x{}",
                self.arena.width, self.arena.height
            ));
        }
        for (i, kind) in self.starting_weapons.iter().enumerate() {
            if self.starting_weapons[..i].contains(kind) {
                return invalid(format!("starting weapon {kind:?} listed twice"));
            }
        }
        Ok(())
    }
}
