//! Game state and round lifecycle

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actors::{Enemy, EnemyHandle, Player, PlayerHandle, Projectile, ProjectileHandle};
use super::pool::ActorPool;
use super::progression::Progression;
use super::spawn::SpawnDirector;
use super::upgrade;
use super::weapon::{Weapon, WeaponKind};
use crate::config::GameConfig;
use crate::consts::MAX_PLAYERS;
use crate::error::SimError;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Nobody has joined yet
    WaitingForPlayers,
    /// Active gameplay
    RoundActive,
    /// Every joined player is dead; a join press requests a restart
    GameOver,
}

/// Notable things that happened during a tick, drained by the host for
/// audio and presentation
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RoundStarted,
    PlayerJoined {
        port: usize,
    },
    /// 0-based wave index
    WaveStarted {
        wave: usize,
    },
    BossSpawned,
    ProjectileHit {
        enemy: EnemyHandle,
        projectile: ProjectileHandle,
        damage: i32,
    },
    EnemyKilled {
        xp: u32,
    },
    PlayerHit {
        port: usize,
        damage: i32,
    },
    PlayerDied {
        port: usize,
    },
    LevelUp {
        level: u32,
    },
    UpgradeApplied {
        port: usize,
        kind: WeaponKind,
        level: u32,
        new_weapon: bool,
    },
    GameOver,
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub phase: GamePhase,
    pub players: ActorPool<Player>,
    /// Player bound to each input port
    pub ports: [Option<PlayerHandle>; MAX_PLAYERS],
    /// Empty until the round starts
    pub enemies: ActorPool<Enemy>,
    /// Empty until the round starts
    pub projectiles: ActorPool<Projectile>,
    pub progression: Progression,
    pub director: SpawnDirector,
    /// Seconds since the round started
    pub round_time: f32,
    /// Ticks simulated while the round is active
    pub round_ticks: u64,
    pub events: Vec<GameEvent>,
    /// Set when a join is pressed after game over. The host rebuilds the state.
    pub restart_requested: bool,
    pub rng: Pcg32,
}

impl GameState {
    pub fn new(config: GameConfig) -> Self {
        let rng = Pcg32::seed_from_u64(config.seed);
        let progression = Progression::new(&config.progression);
        let director = SpawnDirector::new(config.waves.clone(), config.wave_duration);
        Self {
            phase: GamePhase::WaitingForPlayers,
            players: ActorPool::new(MAX_PLAYERS),
            ports: [None; MAX_PLAYERS],
            enemies: ActorPool::new(0),
            projectiles: ActorPool::new(0),
            progression,
            director,
            round_time: 0.0,
            round_ticks: 0,
            events: Vec::new(),
            restart_requested: false,
            rng,
            config,
        }
    }

    /// Bind a new player to `port`. The first join starts the round.
    pub fn join(&mut self, port: usize) -> Result<PlayerHandle, SimError> {
        if port >= MAX_PLAYERS {
            return Err(SimError::PortOutOfRange(port));
        }
        if self.ports[port].is_some() {
            return Err(SimError::PortTaken(port));
        }
        if self.phase == GamePhase::GameOver {
            return Err(SimError::RoundOver);
        }

        let position = self.config.player.spawn_position(port);
        let handle = self
            .players
            .spawn(Player::new(port, position, &self.config.player))
            .ok_or(SimError::PlayerSlotsFull)?;

        if self.phase == GamePhase::WaitingForPlayers {
            self.begin_round();
        }

        if let Some(player) = self.players.get_mut(handle) {
            for &kind in &self.config.starting_weapons {
                player.add_weapon(Weapon::new(kind, &self.config.weapons), handle)?;
            }
        }
        self.ports[port] = Some(handle);
        self.progression.add_player(handle);

        log::info!("Player {} joined", port + 1);
        self.events.push(GameEvent::PlayerJoined { port });
        Ok(handle)
    }

    fn begin_round(&mut self) {
        self.enemies = ActorPool::new(self.config.pools.enemies);
        self.projectiles = ActorPool::new(self.config.pools.projectiles);
        self.progression = Progression::new(&self.config.progression);
        self.director = SpawnDirector::new(self.config.waves.clone(), self.config.wave_duration);
        self.round_time = 0.0;
        self.round_ticks = 0;
        self.phase = GamePhase::RoundActive;
        log::info!("Round started");
        self.events.push(GameEvent::RoundStarted);
    }

    /// Add XP to the shared pool, upgrading every living player on a level-up
    pub fn grant_xp(&mut self, amount: u32) {
        let Some(level) = self.progression.add_xp(amount) else {
            return;
        };
        self.events.push(GameEvent::LevelUp { level });
        upgrade::upgrade_players(
            self.progression.players(),
            &mut self.players,
            &self.config.weapons,
            self.config.upgrades.new_weapon_attempts,
            &mut self.rng,
            &mut self.events,
        );
    }

    pub fn player_on_port(&self, port: usize) -> Option<&Player> {
        self.ports
            .get(port)
            .copied()
            .flatten()
            .and_then(|handle| self.players.get(handle))
    }

    pub fn joined_players(&self) -> usize {
        self.players.active_count()
    }

    pub fn alive_players(&self) -> usize {
        self.players.iter().filter(|(_, p)| p.alive).count()
    }

    /// Take every event recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_waits_with_empty_pools() {
        let state = GameState::new(GameConfig::default());
        assert_eq!(state.phase, GamePhase::WaitingForPlayers);
        assert_eq!(state.enemies.capacity(), 0);
        assert_eq!(state.projectiles.capacity(), 0);
        assert_eq!(state.joined_players(), 0);
    }

    #[test]
    fn test_first_join_starts_round() {
        let mut state = GameState::new(GameConfig::default());
        let handle = state.join(2).unwrap();

        assert_eq!(state.phase, GamePhase::RoundActive);
        assert_eq!(state.enemies.capacity(), 100);
        assert_eq!(state.projectiles.capacity(), 100);
        assert_eq!(state.ports[2], Some(handle));
        assert_eq!(state.progression.players(), &[handle]);

        let player = state.player_on_port(2).unwrap();
        assert_eq!(player.position, state.config.player.spawn_position(2));
        assert_eq!(player.weapons().len(), 1);
        assert_eq!(player.weapons()[0].kind(), WeaponKind::Standard);
        assert_eq!(player.weapons()[0].owner(), Some(handle));

        let events = state.drain_events();
        assert_eq!(
            events,
            vec![GameEvent::RoundStarted, GameEvent::PlayerJoined { port: 2 }]
        );
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_join_rejects_taken_and_invalid_ports() {
        let mut state = GameState::new(GameConfig::default());
        state.join(0).unwrap();
        assert_eq!(state.join(0), Err(SimError::PortTaken(0)));
        assert_eq!(state.join(4), Err(SimError::PortOutOfRange(4)));
        assert_eq!(state.joined_players(), 1);
    }

    #[test]
    fn test_join_after_game_over_is_rejected() {
        let mut state = GameState::new(GameConfig::default());
        state.join(0).unwrap();
        state.phase = GamePhase::GameOver;
        assert_eq!(state.join(1), Err(SimError::RoundOver));
    }

    #[test]
    fn test_grant_xp_upgrades_living_players() {
        let mut state = GameState::new(GameConfig::default());
        state.join(0).unwrap();
        state.drain_events();

        state.grant_xp(100);
        assert_eq!(state.progression.level(), 2);
        let events = state.drain_events();
        assert_eq!(events[0], GameEvent::LevelUp { level: 2 });
        assert!(matches!(
            events[1],
            GameEvent::UpgradeApplied { port: 0, .. }
        ));
    }
}
