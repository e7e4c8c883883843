use glam::Vec2;
use horde_survival::GameConfig;
use horde_survival::sim::{GameEvent, GamePhase, GameState, HudSnapshot, TickInput, tick};

const DT: f32 = 0.25;

fn config() -> GameConfig {
    let mut config = GameConfig::default();
    config.seed = 42;
    // Stray shots must not kill the first spawn before it is inspected
    config.enemy.small.health = 1000;
    config
}

#[test]
fn test_join_spawn_and_hit() {
    let mut state = GameState::new(config());
    assert_eq!(state.phase, GamePhase::WaitingForPlayers);

    tick(&mut state, &TickInput::join(0), DT);
    assert_eq!(state.phase, GamePhase::RoundActive);
    assert_eq!(state.joined_players(), 1);

    // Wave 1 spawns once its 2 s timer is strictly exceeded
    for _ in 0..8 {
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.enemies.active_count(), 0);
    }
    tick(&mut state, &TickInput::default(), DT);
    assert_eq!(state.enemies.active_count(), 1);

    let player_pos = state.player_on_port(0).unwrap().position;
    let (enemy_handle, enemy) = state.enemies.iter_mut().next().unwrap();
    enemy.position = player_pos + Vec2::new(0.0, 30.0);
    enemy.health = 100;
    enemy.max_health = 100;
    enemy.speed = 0.0;
    state.drain_events();

    let mut hits = Vec::new();
    for _ in 0..200 {
        tick(&mut state, &TickInput::default(), 0.05);
        hits.extend(state.drain_events().into_iter().filter_map(|event| match event {
            GameEvent::ProjectileHit {
                enemy,
                projectile,
                damage,
            } if enemy == enemy_handle => Some((projectile, damage)),
            _ => None,
        }));
        if !hits.is_empty() {
            break;
        }
    }

    assert!(!hits.is_empty(), "the standard fan never reached the enemy");
    let enemy = state.enemies.get(enemy_handle).unwrap();
    assert_eq!(enemy.health, 100 - 4 * hits.len() as i32);
    for (projectile, damage) in hits {
        assert_eq!(damage, 4);
        assert!(!state.projectiles.is_active(projectile));
    }
}

#[test]
fn test_game_over_and_restart_request() {
    let mut state = GameState::new(config());
    tick(&mut state, &TickInput::join(1), DT);

    let player_pos = state.player_on_port(1).unwrap().position;
    state.enemies.spawn(horde_survival::sim::Enemy::new(
        player_pos,
        0.0,
        horde_survival::sim::EnemySize::Large,
        8.0,
        10_000,
    ));
    tick(&mut state, &TickInput::default(), DT);
    assert_eq!(state.phase, GamePhase::GameOver);

    let hud = HudSnapshot::capture(&state);
    assert!(hud.to_string().starts_with("GAME OVER"));
    assert!(!hud.players[0].alive);

    tick(&mut state, &TickInput::join(0), DT);
    assert!(state.restart_requested);
    assert_eq!(state.phase, GamePhase::GameOver);
}

#[test]
fn test_same_seed_same_round() {
    let mut a = GameState::new(config());
    let mut b = GameState::new(config());

    let mut input = TickInput::join(0);
    input.ports[2].join = true;
    for i in 0..600 {
        input.ports[0].stick = Vec2::new((i as f32 * 0.05).cos(), (i as f32 * 0.05).sin());
        input.ports[2].fire = i % 45 == 0;
        tick(&mut a, &input, 1.0 / 60.0);
        tick(&mut b, &input, 1.0 / 60.0);
        input.ports[0].join = false;
        input.ports[2].join = false;
    }

    assert_eq!(HudSnapshot::capture(&a), HudSnapshot::capture(&b));
    let positions = |s: &GameState| -> Vec<Vec2> {
        s.enemies.iter().map(|(_, e)| e.position).collect()
    };
    assert_eq!(positions(&a), positions(&b));
    assert_eq!(a.drain_events(), b.drain_events());
}

#[test]
fn test_round_progresses_through_waves() {
    let mut config = config();
    config.wave_duration = 1.0;
    config.player.max_health = 1000;
    let mut state = GameState::new(config);
    tick(&mut state, &TickInput::join(0), DT);

    let mut waves = Vec::new();
    let mut boss = false;
    for _ in 0..20 {
        tick(&mut state, &TickInput::default(), DT);
        for event in state.drain_events() {
            match event {
                GameEvent::WaveStarted { wave } => waves.push(wave),
                GameEvent::BossSpawned => boss = true,
                _ => {}
            }
        }
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    assert_eq!(waves, vec![1, 2, 3]);
    assert!(boss);
}
