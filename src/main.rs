//! Pixel Invaders headless runner
//!
//! Plays one match on autopilot with fixed 60 Hz frames and logs the event
//! stream. Usage: `pixel-invaders [seed]`. Set `PIXEL_INVADERS_TUNING` to a JSON
//! file to override the default balance, and `RUST_LOG` to see the events.

use pixel_invaders::sim::{GameEvent, Simulation, autopilot};
use pixel_invaders::{ScoreBoard, Tuning};

/// Host frame length
const FRAME_MS: f32 = 1000.0 / 60.0;
/// Give up after this many frames (about an hour of play)
const MAX_FRAMES: u64 = 60 * 60 * 60;

fn load_tuning() -> Tuning {
    let Ok(path) = std::env::var("PIXEL_INVADERS_TUNING") else {
        return Tuning::default();
    };
    let json = match std::fs::read_to_string(&path) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Could not read tuning file {}: {}, using defaults", path, e);
            return Tuning::default();
        }
    };
    match Tuning::from_json(&json) {
        Ok(tuning) => {
            log::info!("Loaded tuning from {}", path);
            tuning
        }
        Err(e) => {
            log::warn!("Bad tuning file {}: {}, using defaults", path, e);
            Tuning::default()
        }
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(0x1978);

    let mut sim = match Simulation::with_tuning(seed, load_tuning()) {
        Ok(sim) => sim,
        Err(e) => {
            log::warn!("Invalid tuning: {}, using defaults", e);
            Simulation::new(seed)
        }
    };

    let mut board = ScoreBoard::new();
    while !sim.match_ended() && sim.frame < MAX_FRAMES {
        let input = autopilot(&sim);
        sim.update(&input, FRAME_MS);

        for event in sim.drain_events() {
            match event {
                GameEvent::GameOver(score) => {
                    board.record(score);
                    log::info!("Final score {} on wave {}", score, sim.wave.number);
                }
                GameEvent::BlinkToggled(_) | GameEvent::EnemyStepped => {
                    log::trace!("frame {}: {:?}", sim.frame, event)
                }
                _ => log::debug!("frame {}: {:?}", sim.frame, event),
            }
        }
    }

    if !sim.is_over() {
        log::warn!("Stopped after {} frames without a result", sim.frame);
        board.record(sim.score);
    }

    match board.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Could not serialize scores: {}", e),
    }
}
