//! Error types
//!
//! Routine simulation outcomes (full pools, stale handles, nobody to target)
//! are `Option`/`bool` results, not errors. These enums cover the few calls
//! that can be rejected outright.

use thiserror::Error;

use crate::sim::WeaponKind;

/// Failure to load or validate a [`crate::GameConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Rejected simulation requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("player already owns a {0:?} weapon")]
    DuplicateWeapon(WeaponKind),
    #[error("input port {0} already has a player")]
    PortTaken(usize),
    #[error("input port {0} does not exist")]
    PortOutOfRange(usize),
    #[error("no free player slot")]
    PlayerSlotsFull,
    #[error("round is over")]
    RoundOver,
    #[error("upgrade no longer applies")]
    UpgradeUnavailable,
}
