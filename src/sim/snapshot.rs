//! HUD read model

use std::fmt;

use serde::Serialize;

use super::state::{GamePhase, GameState};

/// Per-port HUD line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub port: usize,
    pub health: i32,
    pub alive: bool,
    /// Weapon tags and levels, e.g. "S2,H0"
    pub weapons: String,
}

/// Everything the HUD draws, captured after a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub phase: GamePhase,
    /// 0-based wave index
    pub wave_index: usize,
    /// 1-based wave number
    pub wave: u32,
    pub boss_wave: bool,
    pub round_time: f32,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub xp_fraction: f32,
    pub enemies: usize,
    pub projectiles: usize,
    pub players: Vec<PlayerSummary>,
}

impl HudSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let players = state
            .ports
            .iter()
            .flatten()
            .filter_map(|handle| state.players.get(*handle))
            .map(|player| PlayerSummary {
                port: player.port,
                health: player.health,
                alive: player.alive,
                weapons: player
                    .weapons()
                    .iter()
                    .map(|w| format!("{}{}", w.kind().tag(), w.upgrade_level()))
                    .collect::<Vec<_>>()
                    .join(","),
            })
            .collect();

        let wave = state
            .director
            .wave()
            .map(|w| w.wave_number)
            .unwrap_or_default();

        Self {
            phase: state.phase,
            wave_index: state.director.current_wave(),
            wave,
            boss_wave: state.director.is_boss_wave(),
            round_time: state.round_time,
            level: state.progression.level(),
            xp: state.progression.current_xp(),
            xp_to_next_level: state.progression.xp_to_next_level(),
            xp_fraction: state.progression.xp_fraction(),
            enemies: state.enemies.active_count(),
            projectiles: state.projectiles.active_count(),
            players,
        }
    }
}

impl fmt::Display for PlayerSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alive {
            write!(f, "P{}:H{} [{}]", self.port + 1, self.health, self.weapons)
        } else {
            write!(f, "P{}:DEAD", self.port + 1)
        }
    }
}

impl fmt::Display for HudSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.phase {
            GamePhase::WaitingForPlayers => return write!(f, "PRESS START"),
            GamePhase::GameOver => write!(f, "GAME OVER ")?,
            GamePhase::RoundActive => {}
        }
        if self.boss_wave {
            write!(f, "BOSS")?;
        } else {
            write!(f, "W{}", self.wave)?;
        }
        write!(
            f,
            " {:.0}s LV{} XP{}/{}",
            self.round_time, self.level, self.xp, self.xp_to_next_level
        )?;
        for player in &self.players {
            write!(f, " {player}")?;
        }
        Ok(())
    }
}
