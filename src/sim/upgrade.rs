//! Level-up upgrades
//!
//! On every level-up each living registered player gets one random upgrade:
//! either a level on a weapon they own or a weapon kind they lack.

use rand::Rng;
use rand_pcg::Pcg32;

use super::actors::{Player, PlayerHandle};
use super::pool::ActorPool;
use super::state::GameEvent;
use super::weapon::{Weapon, WeaponKind};
use crate::config::WeaponTable;
use crate::error::SimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeOption {
    /// Raise the level of the owned weapon at this index
    Improve { weapon: usize },
    /// Add a weapon of a kind the player does not own
    NewWeapon(WeaponKind),
}

/// What an applied upgrade changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedUpgrade {
    pub kind: WeaponKind,
    /// Weapon level after the upgrade
    pub level: u32,
    pub new_weapon: bool,
}

/// Candidate upgrades for `player`: at most one improvement, picked
/// uniformly among weapons below their level cap, plus at most one new
/// weapon. The new kind is rolled uniformly up to `attempts` times and
/// skipped if every roll lands on an owned kind.
pub fn generate_options(player: &Player, attempts: u32, rng: &mut Pcg32) -> Vec<UpgradeOption> {
    let mut options = Vec::with_capacity(2);

    let upgradable: Vec<usize> = player
        .weapons()
        .iter()
        .enumerate()
        .filter(|(_, w)| w.can_upgrade())
        .map(|(index, _)| index)
        .collect();
    if !upgradable.is_empty() {
        let weapon = upgradable[rng.random_range(0..upgradable.len())];
        options.push(UpgradeOption::Improve { weapon });
    }

    for _ in 0..attempts {
        let kind = WeaponKind::ALL[rng.random_range(0..WeaponKind::ALL.len())];
        if !player.has_weapon(kind) {
            options.push(UpgradeOption::NewWeapon(kind));
            break;
        }
    }
    options
}

pub fn apply_upgrade(
    player: &mut Player,
    owner: PlayerHandle,
    option: UpgradeOption,
    table: &WeaponTable,
) -> Result<AppliedUpgrade, SimError> {
    match option {
        UpgradeOption::Improve { weapon } => {
            let weapon = player
                .weapon_mut(weapon)
                .ok_or(SimError::UpgradeUnavailable)?;
            if !weapon.upgrade() {
                return Err(SimError::UpgradeUnavailable);
            }
            Ok(AppliedUpgrade {
                kind: weapon.kind(),
                level: weapon.upgrade_level(),
                new_weapon: false,
            })
        }
        UpgradeOption::NewWeapon(kind) => {
            player.add_weapon(Weapon::new(kind, table), owner)?;
            Ok(AppliedUpgrade {
                kind,
                level: 0,
                new_weapon: true,
            })
        }
    }
}

/// Give every living player in `roster` one random upgrade.
/// Returns how many players were upgraded.
pub fn upgrade_players(
    roster: &[PlayerHandle],
    players: &mut ActorPool<Player>,
    table: &WeaponTable,
    attempts: u32,
    rng: &mut Pcg32,
    events: &mut Vec<GameEvent>,
) -> usize {
    let mut upgraded = 0;
    for &handle in roster {
        let Some(player) = players.get_mut(handle).filter(|p| p.alive) else {
            continue;
        };
        let options = generate_options(player, attempts, rng);
        if options.is_empty() {
            log::debug!("Player {} has nothing left to upgrade", player.port + 1);
            continue;
        }
        let option = options[rng.random_range(0..options.len())];
        match apply_upgrade(player, handle, option, table) {
            Ok(applied) => {
                log::info!(
                    "Player {} upgrade: {:?} level {}{}",
                    player.port + 1,
                    applied.kind,
                    applied.level,
                    if applied.new_weapon { " (new)" } else { "" }
                );
                events.push(GameEvent::UpgradeApplied {
                    port: player.port,
                    kind: applied.kind,
                    level: applied.level,
                    new_weapon: applied.new_weapon,
                });
                upgraded += 1;
            }
            Err(err) => log::warn!("Upgrade for player {} failed: {err}", player.port + 1),
        }
    }
    upgraded
}
