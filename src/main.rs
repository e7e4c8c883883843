//! Horde Survival headless runner
//!
//! Drives the simulation with a scripted bot at a fixed frame rate, playing
//! audio and render submissions into logging sinks.
//!
//! Usage: `horde-survival [config.json] [--seed N] [--seconds S]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::Parser;
    use glam::Vec2;
    use horde_survival::GameConfig;
    use horde_survival::audio::{AudioManager, LogSink};
    use horde_survival::consts::{MAX_PLAYERS, MAX_SUBSTEPS, SIM_DT};
    use horde_survival::renderer::{DrawInstance, LogRenderer, RenderSink, build_frame};
    use horde_survival::sim::{GamePhase, GameState, HudSnapshot, TickInput, tick};

    #[derive(Parser, Debug)]
    #[command(name = "horde-survival")]
    #[command(about = "Headless horde survival run driven by a scripted bot")]
    struct Cli {
        /// JSON config file; built-in defaults when omitted
        config: Option<PathBuf>,

        /// Override the configured RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Simulated seconds to run
        #[arg(long, default_value_t = 120.0)]
        seconds: f32,
    }

    /// Host frame length (a 30 Hz display)
    const FRAME_DT: f32 = 1.0 / 30.0;
    /// Ports the bot plays
    const BOT_PLAYERS: usize = 2;

    /// Game instance holding all state
    struct Game {
        config: GameConfig,
        state: GameState,
        accumulator: f32,
        input: TickInput,
        audio: AudioManager,
        renderer: LogRenderer,
        frame: Vec<DrawInstance>,
        clock: f32,
        rounds: u32,
    }

    impl Game {
        fn new(config: GameConfig) -> Self {
            Self {
                state: GameState::new(config.clone()),
                config,
                accumulator: 0.0,
                input: TickInput::default(),
                audio: AudioManager::new(Box::new(LogSink)),
                renderer: LogRenderer::default(),
                frame: Vec::new(),
                clock: 0.0,
                rounds: 1,
            }
        }

        /// Scripted controls: join, then circle the arena centre
        fn script_input(&mut self) {
            for port in 0..MAX_PLAYERS {
                let pad = &mut self.input.ports[port];
                if port >= BOT_PLAYERS {
                    *pad = Default::default();
                    continue;
                }
                let joined = self.state.ports[port].is_some();
                pad.join = !joined || self.state.phase == GamePhase::GameOver;
                let phase = self.clock * 0.5 + port as f32 * std::f32::consts::PI;
                pad.stick = Vec2::new(phase.cos(), phase.sin());
                pad.fire = (self.clock * 4.0) as u32 % 20 == 0;
            }
        }

        /// Run simulation ticks for one host frame
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.clock += dt;
            self.accumulator += dt;
            self.script_input();

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                for pad in &mut self.input.ports {
                    pad.join = false;
                    pad.fire = false;
                    pad.level_up = false;
                }
            }

            let events = self.state.drain_events();
            self.audio.dispatch(&events);

            if self.state.restart_requested {
                let hud = HudSnapshot::capture(&self.state);
                log::info!("Round {} finished: {hud}", self.rounds);
                self.state = GameState::new(self.config.clone());
                self.rounds += 1;
            }
        }

        fn render(&mut self) {
            build_frame(&self.state, &mut self.frame);
            let hud = HudSnapshot::capture(&self.state);
            self.renderer.submit(&self.frame, &hud);
        }
    }

    pub fn run() {
        let cli = Cli::parse();
        let mut config = match &cli.config {
            Some(path) => GameConfig::load_or_default(path),
            None => GameConfig::default(),
        };
        if let Some(seed) = cli.seed {
            config.seed = seed;
        }
        let seconds = cli.seconds.max(0.0);
        log::info!("Horde Survival (headless) seed={} for {seconds}s", config.seed);

        let mut game = Game::new(config);
        let frames = (seconds / FRAME_DT).ceil() as u64;
        for _ in 0..frames {
            game.update(FRAME_DT);
            game.render();
        }

        let hud = HudSnapshot::capture(&game.state);
        match serde_json::to_string(&hud) {
            Ok(json) => log::info!("Final HUD: {json}"),
            Err(err) => log::error!("Failed to serialize HUD: {err}"),
        }
        log::info!(
            "{} frames rendered over {} round(s)",
            game.renderer.frames,
            game.rounds
        );
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_cli_defaults() {
            let cli = Cli::try_parse_from(["horde-survival"]).unwrap();
            assert!(cli.config.is_none());
            assert!(cli.seed.is_none());
            assert_eq!(cli.seconds, 120.0);
        }

        #[test]
        fn test_cli_overrides() {
            let cli = Cli::try_parse_from([
                "horde-survival",
                "arena.json",
                "--seed",
                "7",
                "--seconds",
                "2.5",
            ])
            .unwrap();
            assert_eq!(cli.config, Some(PathBuf::from("arena.json")));
            assert_eq!(cli.seed, Some(7));
            assert_eq!(cli.seconds, 2.5);
        }

        #[test]
        fn test_cli_rejects_bad_numbers() {
            assert!(Cli::try_parse_from(["horde-survival", "--seconds", "soon"]).is_err());
            assert!(Cli::try_parse_from(["horde-survival", "--seed", "-1"]).is_err());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the wasm surface; there is no standalone binary there
}
