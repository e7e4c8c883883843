//! Wave schedule and enemy spawning

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actors::{Enemy, EnemyHandle, EnemySize, Player, PlayerHandle, palette};
use super::pool::ActorPool;
use super::state::GameEvent;
use crate::config::{ArenaConfig, EnemyTuning};

/// One row of the wave table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    /// 1-based display number
    pub wave_number: u32,
    /// Seconds between regular spawns (boss wave: unused)
    pub spawn_interval: f32,
    /// Nominal enemy count shown in the wave table
    pub base_enemy_count: u32,
    pub speed_multiplier: f32,
    pub health_multiplier: i32,
    pub enemy_size: EnemySize,
    pub enemy_color: u32,
    pub xp_reward: u32,
}

impl WaveConfig {
    /// Three regular waves followed by the boss wave
    pub fn default_table() -> Vec<WaveConfig> {
        vec![
            WaveConfig {
                wave_number: 1,
                spawn_interval: 2.0,
                base_enemy_count: 5,
                speed_multiplier: 1.0,
                health_multiplier: 1,
                enemy_size: EnemySize::Small,
                enemy_color: palette::RED,
                xp_reward: 1,
            },
            WaveConfig {
                wave_number: 2,
                spawn_interval: 0.5,
                base_enemy_count: 50,
                speed_multiplier: 2.5,
                health_multiplier: 5,
                enemy_size: EnemySize::Medium,
                enemy_color: palette::YELLOW,
                xp_reward: 2,
            },
            WaveConfig {
                wave_number: 3,
                spawn_interval: 1.0,
                base_enemy_count: 20,
                speed_multiplier: 1.5,
                health_multiplier: 10,
                enemy_size: EnemySize::Medium,
                enemy_color: palette::CYAN,
                xp_reward: 3,
            },
            WaveConfig {
                wave_number: 4,
                spawn_interval: 5.0,
                base_enemy_count: 1,
                speed_multiplier: 1.0,
                health_multiplier: 100,
                enemy_size: EnemySize::Large,
                enemy_color: palette::RED,
                xp_reward: 10,
            },
        ]
    }
}

/// World access for spawning enemies
pub struct SpawnContext<'a> {
    pub enemies: &'a mut ActorPool<Enemy>,
    pub players: &'a ActorPool<Player>,
    pub rng: &'a mut Pcg32,
    pub arena: ArenaConfig,
    pub tuning: &'a EnemyTuning,
}

/// Time-driven wave schedule
#[derive(Debug, Clone)]
pub struct SpawnDirector {
    waves: Vec<WaveConfig>,
    wave_duration: f32,
    current_wave: usize,
    /// Seconds spent in the current wave
    wave_time: f32,
    /// Seconds since the last regular spawn
    spawn_timer: f32,
    boss_spawned: bool,
}

impl SpawnDirector {
    pub fn new(waves: Vec<WaveConfig>, wave_duration: f32) -> Self {
        Self {
            waves,
            wave_duration,
            current_wave: 0,
            wave_time: 0.0,
            spawn_timer: 0.0,
            boss_spawned: false,
        }
    }

    /// 0-based index of the active wave
    pub fn current_wave(&self) -> usize {
        self.current_wave
    }

    pub fn wave(&self) -> Option<&WaveConfig> {
        self.waves.get(self.current_wave)
    }

    pub fn wave_time(&self) -> f32 {
        self.wave_time
    }

    pub fn boss_spawned(&self) -> bool {
        self.boss_spawned
    }

    fn boss_wave(&self) -> usize {
        self.waves.len().saturating_sub(1)
    }

    pub fn is_boss_wave(&self) -> bool {
        self.current_wave == self.boss_wave()
    }

    /// Wave index for a round time, clamped to the boss wave
    pub fn wave_for_time(&self, round_time: f32) -> usize {
        let index = (round_time.max(0.0) / self.wave_duration).floor() as usize;
        index.min(self.boss_wave())
    }

    /// Advance the schedule and spawn at most one enemy.
    pub fn update(
        &mut self,
        dt: f32,
        round_time: f32,
        ctx: &mut SpawnContext,
        events: &mut Vec<GameEvent>,
    ) -> Option<EnemyHandle> {
        self.wave_time += dt;
        self.spawn_timer += dt;

        let wave_index = self.wave_for_time(round_time);
        if wave_index > self.current_wave {
            self.current_wave = wave_index;
            self.wave_time = 0.0;
            self.spawn_timer = 0.0;
            self.boss_spawned = false;
            log::info!("Wave {} started", self.current_wave + 1);
            events.push(GameEvent::WaveStarted {
                wave: self.current_wave,
            });
        }

        let wave = self.waves.get(self.current_wave)?.clone();
        if self.is_boss_wave() {
            if self.boss_spawned {
                return None;
            }
            let handle = spawn_enemy(&wave, ctx.tuning.boss_base_speed, ctx)?;
            self.boss_spawned = true;
            log::info!("Boss spawned");
            events.push(GameEvent::BossSpawned);
            return Some(handle);
        }

        if self.spawn_timer > wave.spawn_interval {
            self.spawn_timer = 0.0;
            return spawn_enemy(&wave, ctx.tuning.base_speed, ctx);
        }
        None
    }
}

/// Spawn one enemy of `wave` on a random arena edge, chasing a random
/// living player. Nothing spawns with nobody alive or a full pool.
fn spawn_enemy(wave: &WaveConfig, base_speed: f32, ctx: &mut SpawnContext) -> Option<EnemyHandle> {
    let target = random_living_player(ctx.players, ctx.rng)?;
    let position = random_edge_point(ctx.rng, &ctx.arena);
    let enemy = Enemy::from_wave(
        wave,
        ctx.tuning,
        position,
        base_speed * wave.speed_multiplier,
        Some(target),
    );
    let handle = ctx.enemies.spawn(enemy);
    if handle.is_none() {
        log::trace!("Enemy pool full, spawn skipped");
    }
    handle
}

fn random_living_player(players: &ActorPool<Player>, rng: &mut Pcg32) -> Option<PlayerHandle> {
    let alive: Vec<PlayerHandle> = players
        .iter()
        .filter(|(_, p)| p.alive)
        .map(|(handle, _)| handle)
        .collect();
    if alive.is_empty() {
        return None;
    }
    Some(alive[rng.random_range(0..alive.len())])
}

/// Uniform point on one of the four arena edges
fn random_edge_point(rng: &mut Pcg32, arena: &ArenaConfig) -> Vec2 {
    let x = rng.random_range(0.0..=arena.width);
    let y = rng.random_range(0.0..=arena.height);
    match rng.random_range(0..4u8) {
        0 => Vec2::new(x, 0.0),
        1 => Vec2::new(arena.width, y),
        2 => Vec2::new(x, arena.height),
        _ => Vec2::new(0.0, y),
    }
}
