//! Collision detection and response
//!
//! Everything collides as a circle. Overlap is strict: circles that exactly
//! touch do not collide.

use glam::Vec2;

use super::actors::{Enemy, EnemyHandle, Player, Projectile};
use super::pool::{ActorPool, Body};
use super::state::GameEvent;

/// Enemy removed by projectile damage this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kill {
    pub enemy: EnemyHandle,
    pub position: Vec2,
    pub xp_reward: u32,
}

/// Strict circle overlap test
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}

#[inline]
pub fn overlaps(a: &impl Body, b: &impl Body) -> bool {
    circles_overlap(a.position(), a.radius(), b.position(), b.radius())
}

/// Apply projectile hits against every enemy.
///
/// Enemies are visited in slot order, and each checks the projectiles in slot
/// order. A hit projectile is freed immediately. Once an enemy dies it stops
/// consuming projectiles and is freed; the kills are returned for XP.
pub fn resolve_projectile_hits(
    enemies: &mut ActorPool<Enemy>,
    projectiles: &mut ActorPool<Projectile>,
    events: &mut Vec<GameEvent>,
) -> Vec<Kill> {
    let mut kills = Vec::new();

    enemies.retain(|enemy_handle, enemy| {
        projectiles.retain(|projectile_handle, projectile| {
            if !enemy.is_alive() || !overlaps(&*enemy, &*projectile) {
                return true;
            }
            enemy.take_damage(projectile.damage);
            events.push(GameEvent::ProjectileHit {
                enemy: enemy_handle,
                projectile: projectile_handle,
                damage: projectile.damage,
            });
            false
        });

        if enemy.is_alive() {
            return true;
        }
        log::debug!("Enemy {enemy_handle:?} killed at {:?}", enemy.position);
        events.push(GameEvent::EnemyKilled {
            xp: enemy.xp_reward,
        });
        kills.push(Kill {
            enemy: enemy_handle,
            position: enemy.position,
            xp_reward: enemy.xp_reward,
        });
        false
    });

    kills
}

/// Apply contact damage from every overlapping enemy to each living player.
/// Returns the number of hits landed.
pub fn resolve_contact_damage(
    players: &mut ActorPool<Player>,
    enemies: &ActorPool<Enemy>,
    damage: i32,
    events: &mut Vec<GameEvent>,
) -> usize {
    let mut hits = 0;
    for (_, player) in players.iter_mut() {
        for (_, enemy) in enemies.iter() {
            if !player.alive {
                break;
            }
            if !overlaps(&*player, enemy) {
                continue;
            }
            hits += 1;
            events.push(GameEvent::PlayerHit {
                port: player.port,
                damage,
            });
            if player.take_damage(damage) {
                log::info!("Player {} died", player.port + 1);
                events.push(GameEvent::PlayerDied { port: player.port });
            }
        }
    }
    hits
}
