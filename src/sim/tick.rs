//! Fixed timestep simulation tick

use glam::Vec2;

use super::collision::{resolve_contact_damage, resolve_projectile_hits};
use super::spawn::SpawnContext;
use super::state::{GameEvent, GamePhase, GameState};
use super::weapon::FireContext;
use crate::consts::MAX_PLAYERS;

/// One input port's controls for a tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// Analog stick, each axis in -1..=1
    pub stick: Vec2,
    /// Join press (edge-triggered by the host)
    pub join: bool,
    /// Manual fire press
    pub fire: bool,
    /// Debug button: grant a chunk of XP
    pub level_up: bool,
}

/// Input for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub ports: [PlayerInput; MAX_PLAYERS],
}

impl TickInput {
    /// Input with only `port` pressing join
    pub fn join(port: usize) -> Self {
        let mut input = Self::default();
        if let Some(pad) = input.ports.get_mut(port) {
            pad.join = true;
        }
        input
    }
}

/// Advance the game state by one step
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = dt.max(0.0);

    match state.phase {
        GamePhase::WaitingForPlayers => {
            // The joining tick only joins
            handle_joins(state, input);
        }
        GamePhase::RoundActive => {
            handle_joins(state, input);
            step_round(state, input, dt);
        }
        GamePhase::GameOver => {
            if input.ports.iter().any(|pad| pad.join) && !state.restart_requested {
                log::info!("Restart requested");
                state.restart_requested = true;
            }
        }
    }
}

fn handle_joins(state: &mut GameState, input: &TickInput) {
    for (port, pad) in input.ports.iter().enumerate() {
        if pad.join && state.ports[port].is_none() {
            if let Err(err) = state.join(port) {
                log::warn!("Join on port {} refused: {err}", port + 1);
            }
        }
    }
}

fn step_round(state: &mut GameState, input: &TickInput, dt: f32) {
    state.round_time += dt;
    state.round_ticks += 1;

    if input.ports.iter().any(|pad| pad.level_up) {
        log::debug!("Debug XP grant");
        state.grant_xp(state.config.progression.debug_xp_grant);
    }

    let arena = state.config.arena;

    // Spawning
    let mut spawn_ctx = SpawnContext {
        enemies: &mut state.enemies,
        players: &state.players,
        rng: &mut state.rng,
        arena,
        tuning: &state.config.enemy,
    };
    state
        .director
        .update(dt, state.round_time, &mut spawn_ctx, &mut state.events);

    // Players: movement, auto-fire, manual fire
    let deadzone = state.config.player.deadzone;
    let mut fire_ctx = FireContext {
        projectiles: &mut state.projectiles,
        enemies: &state.enemies,
        rng: &mut state.rng,
        arena,
    };
    for (_, player) in state.players.iter_mut() {
        if !player.alive {
            continue;
        }
        let pad = input.ports[player.port];
        player.steer(pad.stick, dt, deadzone, &arena);
        player.update_weapons(dt, &mut fire_ctx);
        if pad.fire {
            player.fire_manual(&mut fire_ctx);
        }
    }

    // Enemies chase, then everything moves
    for (_, enemy) in state.enemies.iter_mut() {
        enemy.steer(&state.players);
    }
    state.enemies.update_all(dt);
    state.projectiles.update_all(dt);

    let kills =
        resolve_projectile_hits(&mut state.enemies, &mut state.projectiles, &mut state.events);
    resolve_contact_damage(
        &mut state.players,
        &state.enemies,
        state.config.player.contact_damage,
        &mut state.events,
    );

    for kill in kills {
        state.grant_xp(kill.xp_reward);
    }

    if state.joined_players() > 0 && state.alive_players() == 0 {
        state.phase = GamePhase::GameOver;
        log::info!(
            "Game over after {:.1}s at level {}",
            state.round_time,
            state.progression.level()
        );
        state.events.push(GameEvent::GameOver);
    }
}
