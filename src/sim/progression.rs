//! Shared experience pool
//!
//! All players level up together from one XP counter.

use super::actors::PlayerHandle;
use crate::config::ProgressionTuning;
use crate::consts::MAX_PLAYERS;

#[derive(Debug, Clone)]
pub struct Progression {
    current_xp: u32,
    xp_to_next_level: u32,
    level: u32,
    growth_factor: f32,
    /// Players that receive upgrades on level-up
    players: Vec<PlayerHandle>,
}

impl Progression {
    pub fn new(tuning: &ProgressionTuning) -> Self {
        Self {
            current_xp: 0,
            xp_to_next_level: tuning.initial_threshold.max(1),
            level: 1,
            growth_factor: tuning.growth_factor,
            players: Vec::with_capacity(MAX_PLAYERS),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn current_xp(&self) -> u32 {
        self.current_xp
    }

    pub fn xp_to_next_level(&self) -> u32 {
        self.xp_to_next_level
    }

    /// Progress toward the next level in 0..1
    pub fn xp_fraction(&self) -> f32 {
        if self.xp_to_next_level == 0 {
            return 0.0;
        }
        (self.current_xp as f32 / self.xp_to_next_level as f32).min(1.0)
    }

    /// Add XP, leveling up at most once per call. Excess XP carries over,
    /// so a large grant may leave the counter above the new threshold.
    /// Returns the new level on a level-up.
    pub fn add_xp(&mut self, amount: u32) -> Option<u32> {
        self.current_xp = self.current_xp.saturating_add(amount);
        if self.current_xp < self.xp_to_next_level {
            return None;
        }
        self.current_xp -= self.xp_to_next_level;
        self.level += 1;
        self.xp_to_next_level = ((self.xp_to_next_level as f32 * self.growth_factor) as u32).max(1);
        log::info!(
            "Level {} reached, next at {} XP",
            self.level,
            self.xp_to_next_level
        );
        Some(self.level)
    }

    /// Register a player for level-up upgrades. Returns false when the
    /// player is already registered or the roster is full.
    pub fn add_player(&mut self, player: PlayerHandle) -> bool {
        if self.players.len() >= MAX_PLAYERS || self.players.contains(&player) {
            return false;
        }
        self.players.push(player);
        true
    }

    pub fn remove_player(&mut self, player: PlayerHandle) -> bool {
        let before = self.players.len();
        self.players.retain(|p| *p != player);
        self.players.len() != before
    }

    /// Registered players in join order
    pub fn players(&self) -> &[PlayerHandle] {
        &self.players
    }
}
