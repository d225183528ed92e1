//! Pixel Flow entry point
//!
//! Native builds run a headless demo: generate a level, solve it and let
//! idle mode deploy the manifest until the board is clear.
//!
//! Usage: `pixel-flow [seed] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use pixel_flow::Settings;
    use pixel_flow::consts::*;
    use pixel_flow::sim::{GameState, SessionPhase, TickInput, tick};

    /// Give up on a run after this much simulated time
    const MAX_RUN_SECONDS: f32 = 600.0;
    /// Settings file used when none is given
    const DEFAULT_SETTINGS: &str = "pixel_flow.json";

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let seed = args.next().and_then(|s| s.parse::<u64>().ok()).unwrap_or(1);
        let settings_path = args
            .next()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS));

        let settings = Settings::load(&settings_path);
        let mut state = match GameState::new(settings, seed) {
            Ok(state) => state,
            Err(e) => {
                log::error!("Could not build level {}: {}", seed, e);
                std::process::exit(1);
            }
        };

        println!("Level (seed {seed}):");
        for row in state.grid.to_pattern() {
            println!("  {row}");
        }
        for (i, lane) in state.inventory.to_vecs().iter().enumerate() {
            let entries: Vec<String> = lane
                .iter()
                .map(|s| format!("{}x{}", s.color.as_str(), s.ammo))
                .collect();
            println!("Lane {}: {}", i, entries.join(", "));
        }

        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let max_frames = (MAX_RUN_SECONDS / (SIM_DT * MAX_SUBSTEPS as f32)) as u64;
        let mut frames = 0u64;

        while state.phase == SessionPhase::Playing && frames < max_frames {
            let mut grid_changed = false;
            for _ in 0..MAX_SUBSTEPS {
                grid_changed |= tick(&mut state, &input, SIM_DT).grid_changed();
            }
            if grid_changed {
                log::debug!(
                    "t={:.2}s score {} pixels left {}",
                    state.time_ticks as f32 * SIM_DT,
                    state.score,
                    state.grid.active_count()
                );
            }
            frames += 1;
        }

        let seconds = state.time_ticks as f32 * SIM_DT;
        match state.phase {
            SessionPhase::Won => println!("Stage clear in {seconds:.1}s, score {}", state.score),
            SessionPhase::Lost => println!("Out of shooters, score {}", state.score),
            _ => println!(
                "Stopped after {seconds:.1}s with {} pixels left",
                state.grid.active_count()
            ),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pixel Flow (headless) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser front end embeds the library directly
}
