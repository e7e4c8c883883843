//! Audio dispatch
//!
//! The simulation never plays sound itself. The host drains [`GameEvent`]s
//! each frame and hands them to an [`AudioManager`], which maps them to
//! effects, applies volume, and forwards to whatever backend implements
//! [`AudioSink`].

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Round begins
    Start,
    /// Player joins
    Join,
    /// Projectile hits an enemy
    Hit,
    /// Shared level-up
    LevelUp,
    /// Player dies
    Death,
}

impl SoundEffect {
    /// Effect for an event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::RoundStarted => Some(SoundEffect::Start),
            GameEvent::PlayerJoined { .. } => Some(SoundEffect::Join),
            GameEvent::ProjectileHit { .. } => Some(SoundEffect::Hit),
            GameEvent::LevelUp { .. } => Some(SoundEffect::LevelUp),
            GameEvent::PlayerDied { .. } => Some(SoundEffect::Death),
            _ => None,
        }
    }

    /// Per-effect mix level
    fn gain(self) -> f32 {
        match self {
            SoundEffect::Start => 0.8,
            SoundEffect::Join => 0.6,
            SoundEffect::Hit => 0.3,
            SoundEffect::LevelUp => 0.7,
            SoundEffect::Death => 1.0,
        }
    }
}

/// Audio backend
pub trait AudioSink {
    /// Play `effect` at `volume` (0.0 - 1.0)
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Discards everything
#[derive(Debug, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) {}
}

/// Logs effects instead of playing them (headless runs)
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("sfx {effect:?} @ {volume:.2}");
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(NullSink))
    }
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume() * effect.gain();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }

    /// Play the effect for every event that has one.
    /// Returns how many effects were played.
    pub fn dispatch(&mut self, events: &[GameEvent]) -> usize {
        let mut played = 0;
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            if self.effective_volume() > 0.0 {
                played += 1;
            }
            self.play(effect);
        }
        played
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArenaConfig;
    use crate::sim::actors::Ballistics;
    use crate::sim::{ActorPool, Enemy, EnemyHandle, EnemySize, Projectile, ProjectileHandle};
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct Recorder(Rc<RefCell<Vec<(SoundEffect, f32)>>>);

    impl AudioSink for Recorder {
        fn play(&mut self, effect: SoundEffect, volume: f32) {
            self.0.borrow_mut().push((effect, volume));
        }
    }

    fn hit_handles() -> (EnemyHandle, ProjectileHandle) {
        let mut enemies = ActorPool::new(1);
        let mut projectiles = ActorPool::new(1);
        let shot = Ballistics {
            speed: 0.0,
            slowdown: 0.0,
            lifetime: 1.0,
            damage: 4,
            color: 0,
        };
        let enemy = enemies
            .spawn(Enemy::new(Vec2::ZERO, 0.0, EnemySize::Small, 3.0, 4))
            .unwrap();
        let projectile = projectiles
            .spawn(Projectile::launch(Vec2::ZERO, Vec2::Y, &shot, ArenaConfig::default()))
            .unwrap();
        (enemy, projectile)
    }

    #[test]
    fn test_events_map_to_effects() {
        let recorder = Recorder::default();
        let mut audio = AudioManager::new(Box::new(recorder.clone()));
        let (enemy, projectile) = hit_handles();
        let events = [
            GameEvent::RoundStarted,
            GameEvent::PlayerJoined { port: 0 },
            GameEvent::WaveStarted { wave: 1 },
            GameEvent::ProjectileHit {
                enemy,
                projectile,
                damage: 4,
            },
            GameEvent::LevelUp { level: 2 },
            GameEvent::PlayerDied { port: 0 },
        ];

        assert_eq!(audio.dispatch(&events), 5);
        let played: Vec<SoundEffect> = recorder.0.borrow().iter().map(|(e, _)| *e).collect();
        assert_eq!(
            played,
            vec![
                SoundEffect::Start,
                SoundEffect::Join,
                SoundEffect::Hit,
                SoundEffect::LevelUp,
                SoundEffect::Death
            ]
        );
    }

    #[test]
    fn test_volume_and_mute() {
        let recorder = Recorder::default();
        let mut audio = AudioManager::new(Box::new(recorder.clone()));
        audio.set_master_volume(0.5);
        audio.set_sfx_volume(2.0);
        audio.play(SoundEffect::Death);
        assert_eq!(recorder.0.borrow()[0].1, 0.5);

        audio.set_muted(true);
        audio.play(SoundEffect::Death);
        assert_eq!(audio.dispatch(&[GameEvent::RoundStarted]), 0);
        assert_eq!(recorder.0.borrow().len(), 1);
    }
}
