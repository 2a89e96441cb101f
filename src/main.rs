//! Chain Chase headless runner
//!
//! Plays a few rounds with a simple autopilot and logs the results.
//!
//! Usage: `chain-chase [settings.json] [seed] [frames]`

use chain_chase::sim::{Direction, FrameInput, RoundController, RoundEvent, RoundPhase};
use chain_chase::{LogAudio, Settings};

const FRAME_DT: f32 = 1.0 / 60.0;
const MAX_ROUNDS: u32 = 3;

/// Steer toward the mover, turning away from walls first
fn autopilot(game: &RoundController<LogAudio>) -> FrameInput {
    let chain = game.chain();
    let head = chain.head();
    let arena = game.arena();
    let stride = chain.stride();
    let heading = head.direction;

    // One more step along the current heading would leave the arena
    let ahead = head.to + heading.vector() * stride + chain.footprint();
    let lookahead = head.to + heading.vector() * stride;
    let blocked = lookahead.x < arena.left
        || lookahead.y < arena.top
        || ahead.x > arena.right
        || ahead.y > arena.bottom;

    let target = game.body().center() - chain.footprint() * 0.5;
    let delta = target - head.to;
    let wanted = if delta.x.abs() > delta.y.abs() {
        if delta.x > 0.0 { Direction::Right } else { Direction::Left }
    } else if delta.y > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };

    let choice = if blocked {
        // Turn toward the roomier side
        match heading {
            Direction::Left | Direction::Right => {
                if head.to.y - arena.top > arena.bottom - head.to.y {
                    Direction::Up
                } else {
                    Direction::Down
                }
            }
            Direction::Up | Direction::Down => {
                if head.to.x - arena.left > arena.right - head.to.x {
                    Direction::Left
                } else {
                    Direction::Right
                }
            }
        }
    } else {
        wanted
    };

    if choice == heading || !chain.input().is_empty() {
        FrameInput::default()
    } else {
        FrameInput::turn(choice)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let frames: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60 * 60);

    log::info!("Chain Chase (headless) starting, seed {}", seed);
    let mut game = match RoundController::new(settings, seed, LogAudio) {
        Ok(game) => game,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    let mut round = 1;

    for _ in 0..frames {
        let input = autopilot(&game);
        for event in game.update(FRAME_DT, &input) {
            if let RoundEvent::Eaten { score } = event {
                log::info!("Round {}: caught the mover, score {}", round, score);
            }
        }

        if game.phase() == RoundPhase::GameOver {
            log::info!(
                "Round {} finished: score {}, length {}",
                round,
                game.score(),
                game.chain().len()
            );
            if round >= MAX_ROUNDS {
                break;
            }
            game.retry();
            round += 1;
        }
    }

    log::info!("Final score {} after {} round(s)", game.score(), round);
}
