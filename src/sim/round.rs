//! Round state machine
//!
//! Owns the chain, the mover and the score for one round, and drives them
//! one frame at a time:
//!
//! 1. apply input (pause toggle, queued turns)
//! 2. advance the movement clock and step the chain
//! 3. advance the mover
//! 4. eat, chain-vs-wall, mover-vs-wall checks, in that order
//! 5. update score and phase
//!
//! Everything that happens comes back from `update` as `RoundEvent`s.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::arena::Arena;
use super::body::BouncingBody;
use super::chain::{Chain, MoveOutcome};
use super::collision::{Circle, detect};
use super::input_buffer::Direction;
use crate::audio::{AudioSink, SoundEffect};
use crate::settings::{Settings, SettingsError};

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Playing,
    Paused,
    GameOver,
}

/// What ended the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverCause {
    /// Chain head ran into its own body
    SelfCollision,
    /// Chain head left the arena
    ReachedWall,
}

/// Something that happened during a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundEvent {
    /// The chain stepped `count` times
    Ticked { count: u32 },
    /// Mover caught; `score` is the new total
    Eaten { score: u64 },
    /// Mover reflected off a wall with this inward normal
    Bounced { normal: Vec2 },
    PauseToggled { paused: bool },
    GameOver { cause: GameOverCause },
}

/// Edge-triggered input for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Pause toggle
    pub pause: bool,
}

impl FrameInput {
    /// Input with a single turn pressed
    pub fn turn(direction: Direction) -> Self {
        let mut input = Self::default();
        input.press(direction);
        input
    }

    pub fn pause() -> Self {
        Self {
            pause: true,
            ..Default::default()
        }
    }

    pub fn press(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.up = true,
            Direction::Down => self.down = true,
            Direction::Left => self.left = true,
            Direction::Right => self.right = true,
        }
    }

    /// Pressed directions in Up, Down, Left, Right order
    pub fn directions(&self) -> impl Iterator<Item = Direction> {
        let pressed = [self.up, self.down, self.left, self.right];
        Direction::ALL
            .into_iter()
            .zip(pressed)
            .filter_map(|(dir, on)| on.then_some(dir))
    }
}

/// Everything rebuilt from scratch when a round starts
#[derive(Debug, Clone)]
struct Round {
    seed: u64,
    rng: Pcg32,
    chain: Chain,
    body: BouncingBody,
    phase: RoundPhase,
    score: u64,
}

impl Round {
    fn new(settings: &Settings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let chain = Chain::new(
            settings.start_position,
            settings.start_direction,
            settings.stride,
            settings.segment_footprint(),
            settings.tick_interval,
        );
        let mut body = BouncingBody::new(
            Vec2::ZERO,
            settings.body_footprint(),
            settings.body_speed,
            settings.bounce_nudge,
        );
        body.position_away_from(chain.bounds().center, &settings.arena, &mut rng);
        body.randomize_velocity(&mut rng);

        Self {
            seed,
            rng,
            chain,
            body,
            phase: RoundPhase::Playing,
            score: 0,
        }
    }
}

/// Sole owner and mutator of round state
pub struct RoundController<A: AudioSink> {
    settings: Settings,
    audio: A,
    round: Round,
}

impl<A: AudioSink> RoundController<A> {
    /// Start the first round, rejecting settings the simulation cannot run with
    pub fn new(settings: Settings, seed: u64, audio: A) -> Result<Self, SettingsError> {
        settings.validate()?;
        let round = Round::new(&settings, seed);
        log::info!("Round started with seed {}", seed);
        Ok(Self {
            settings,
            audio,
            round,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn arena(&self) -> &Arena {
        &self.settings.arena
    }

    pub fn chain(&self) -> &Chain {
        &self.round.chain
    }

    pub fn body(&self) -> &BouncingBody {
        &self.round.body
    }

    pub fn phase(&self) -> RoundPhase {
        self.round.phase
    }

    pub fn score(&self) -> u64 {
        self.round.score
    }

    pub fn seed(&self) -> u64 {
        self.round.seed
    }

    /// Interpolation factor for rendering the chain between steps
    pub fn progress(&self) -> f32 {
        self.round.chain.progress()
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Start a fresh round after a game over
    ///
    /// Returns false (and changes nothing) unless the round is over. The new
    /// seed comes from the finished round's generator, so a session replays
    /// exactly from its first seed.
    pub fn retry(&mut self) -> bool {
        if self.round.phase != RoundPhase::GameOver {
            return false;
        }
        let seed = self.round.rng.random();
        self.round = Round::new(&self.settings, seed);
        log::info!("Retry: round started with seed {}", seed);
        true
    }

    /// Advance the round by one frame of `dt` seconds
    pub fn update(&mut self, dt: f32, input: &FrameInput) -> Vec<RoundEvent> {
        let mut events = Vec::new();

        if self.round.phase == RoundPhase::GameOver {
            return events;
        }

        if input.pause {
            let paused = self.round.phase == RoundPhase::Playing;
            self.round.phase = if paused {
                RoundPhase::Paused
            } else {
                RoundPhase::Playing
            };
            self.audio.play(if paused {
                SoundEffect::Pause
            } else {
                SoundEffect::Resume
            });
            log::debug!("Pause toggled: paused={}", paused);
            events.push(RoundEvent::PauseToggled { paused });
            if paused {
                return events;
            }
        }

        if self.round.phase == RoundPhase::Paused {
            return events;
        }

        for dir in input.directions() {
            self.round.chain.steer(dir);
        }

        // Steps are taken one at a time so every step gets its own checks.
        // Steps before the last are checked with the head on its grid cell;
        // the last one is checked after the mover advances, at the
        // interpolated head position.
        let due = self.round.chain.advance_clock(dt);
        let mut hits = Vec::new();
        let mut ticks = 0;
        for _ in 0..due {
            ticks += 1;
            if self.round.chain.step_next() == MoveOutcome::SelfCollision {
                Self::push_ticks(ticks, &mut events);
                events.append(&mut hits);
                self.end_round(GameOverCause::SelfCollision, &mut events);
                return events;
            }
            if ticks < due {
                let head = self.round.chain.bounds_at(0.0);
                self.resolve_collisions(head, &mut hits);
                if self.round.phase == RoundPhase::GameOver {
                    break;
                }
            }
        }
        Self::push_ticks(ticks, &mut events);
        events.append(&mut hits);
        if self.round.phase == RoundPhase::GameOver {
            return events;
        }

        let scale = self.settings.body_frame_scale(dt);
        self.round.body.update(scale);

        let head = self.round.chain.bounds();
        self.resolve_collisions(head, &mut events);
        events
    }

    fn push_ticks(ticks: u32, events: &mut Vec<RoundEvent>) {
        if ticks > 0 {
            log::trace!("Chain stepped {} time(s)", ticks);
            events.push(RoundEvent::Ticked { count: ticks });
        }
    }

    /// Eat, chain-vs-wall and mover-vs-wall for the head at `head`
    fn resolve_collisions(&mut self, head: Circle, events: &mut Vec<RoundEvent>) {
        let arena = self.settings.arena;
        let round = &mut self.round;
        let report = detect(head, round.body.bounds(), round.body.velocity, &arena);

        if report.eaten {
            round.body.position_away_from(head.center, &arena, &mut round.rng);
            round.body.randomize_velocity(&mut round.rng);
            round.chain.grow();
            round.score += self.settings.eat_reward;
            log::debug!("Eaten: score={} length={}", round.score, round.chain.len());
            self.audio.play(SoundEffect::Eat);
            events.push(RoundEvent::Eaten { score: round.score });
        }

        if report.head_hit_wall {
            self.end_round(GameOverCause::ReachedWall, events);
            return;
        }

        // Skip stale bounces if the mover was just respawned
        if report.eaten {
            return;
        }
        for normal in report.body_bounces {
            round.body.bounce(normal);
            log::debug!("Mover bounced off wall with normal {}", normal);
            self.audio.play(SoundEffect::Bounce);
            events.push(RoundEvent::Bounced { normal });
        }
    }

    fn end_round(&mut self, cause: GameOverCause, events: &mut Vec<RoundEvent>) {
        self.round.phase = RoundPhase::GameOver;
        log::info!(
            "Game over ({:?}): score={} length={}",
            cause,
            self.round.score,
            self.round.chain.len()
        );
        self.audio.play(SoundEffect::GameOver);
        events.push(RoundEvent::GameOver { cause });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentAudio;

    const DT: f32 = 1.0 / 60.0;

    fn controller(settings: Settings) -> RoundController<Vec<SoundEffect>> {
        RoundController::new(settings, 12345, Vec::new()).unwrap()
    }

    /// Park the mover far from the head, motionless
    fn park_body(ctl: &mut RoundController<Vec<SoundEffect>>, pos: Vec2) {
        ctl.round.body.position = pos;
        ctl.round.body.velocity = Vec2::ZERO;
    }

    #[test]
    fn test_new_round() {
        let ctl = controller(Settings::default());
        assert_eq!(ctl.phase(), RoundPhase::Playing);
        assert_eq!(ctl.score(), 0);
        assert_eq!(ctl.chain().len(), 1);
        assert!((ctl.body().velocity.length() - ctl.body().speed()).abs() < 1e-4);
        assert!(!ctl.body().bounds().intersects(&ctl.chain().bounds()));
    }

    #[test]
    fn test_pause_toggle() {
        let mut ctl = controller(Settings::default());
        park_body(&mut ctl, Vec2::new(600.0, 400.0));

        let events = ctl.update(DT, &FrameInput::pause());
        assert_eq!(events, vec![RoundEvent::PauseToggled { paused: true }]);
        assert_eq!(ctl.phase(), RoundPhase::Paused);

        // Time does not pass while paused
        let head = *ctl.chain().head();
        assert!(ctl.update(1.0, &FrameInput::default()).is_empty());
        assert_eq!(*ctl.chain().head(), head);

        // Turns are ignored while paused
        ctl.update(DT, &FrameInput::turn(Direction::Down));
        assert!(ctl.chain().input().is_empty());

        let events = ctl.update(0.2, &FrameInput::pause());
        assert_eq!(
            events,
            vec![
                RoundEvent::PauseToggled { paused: false },
                RoundEvent::Ticked { count: 1 }
            ]
        );
        assert_eq!(ctl.phase(), RoundPhase::Playing);
        assert_eq!(ctl.audio(), &vec![SoundEffect::Pause, SoundEffect::Resume]);
    }

    #[test]
    fn test_straight_run_and_turn() {
        let mut ctl = controller(Settings::default());
        park_body(&mut ctl, Vec2::new(600.0, 400.0));

        for _ in 0..3 {
            ctl.update(0.2, &FrameInput::default());
        }
        assert_eq!(ctl.chain().head().at, Vec2::new(220.0, 100.0));
        assert_eq!(ctl.chain().head().to, Vec2::new(260.0, 100.0));

        // Reversal is dropped, perpendicular turn is queued
        ctl.update(0.0, &FrameInput::turn(Direction::Left));
        assert!(ctl.chain().input().is_empty());
        ctl.update(0.0, &FrameInput::turn(Direction::Down));
        assert_eq!(ctl.chain().input().len(), 1);

        ctl.update(0.2, &FrameInput::default());
        assert_eq!(ctl.chain().head().at, Vec2::new(260.0, 100.0));
        assert_eq!(ctl.chain().head().direction, Direction::Down);
    }

    #[test]
    fn test_eat_grows_and_scores() {
        let mut ctl = controller(Settings::default());
        // Mover right on top of the head
        let head = ctl.chain().bounds().center;
        ctl.round.body.position = head - ctl.body().footprint * 0.5;
        ctl.round.body.velocity = Vec2::ZERO;

        let events = ctl.update(DT, &FrameInput::default());
        assert_eq!(events, vec![RoundEvent::Eaten { score: 100 }]);
        assert_eq!(ctl.score(), 100);
        assert_eq!(ctl.chain().len(), 2);
        assert!(!ctl.body().bounds().intersects(&ctl.chain().bounds()));
        assert!((ctl.body().velocity.length() - ctl.body().speed()).abs() < 1e-4);
        assert_eq!(ctl.audio(), &vec![SoundEffect::Eat]);
    }

    #[test]
    fn test_wall_ends_round() {
        let mut ctl = controller(Settings::default());
        park_body(&mut ctl, Vec2::new(400.0, 500.0));

        // Head starts at x=100 heading right; the 800-wide arena is crossed
        // within 20 steps
        let mut cause = None;
        for _ in 0..40 {
            for event in ctl.update(0.2, &FrameInput::default()) {
                if let RoundEvent::GameOver { cause: c } = event {
                    cause = Some(c);
                }
            }
        }
        assert_eq!(cause, Some(GameOverCause::ReachedWall));
        assert_eq!(ctl.phase(), RoundPhase::GameOver);

        // Frozen until retry
        let head = *ctl.chain().head();
        assert!(ctl.update(0.2, &FrameInput::pause()).is_empty());
        assert_eq!(*ctl.chain().head(), head);
        assert_eq!(ctl.phase(), RoundPhase::GameOver);
    }

    #[test]
    fn test_self_collision_ends_round() {
        let mut settings = Settings::default();
        settings.start_position = Vec2::new(400.0, 300.0);
        let mut ctl = controller(settings);
        park_body(&mut ctl, Vec2::new(40.0, 40.0));
        for _ in 0..4 {
            ctl.round.chain.grow();
        }

        let turns = [Direction::Down, Direction::Left, Direction::Up];
        let mut last = Vec::new();
        for dir in turns {
            last = ctl.update(0.2, &FrameInput::turn(dir));
            assert_eq!(ctl.phase(), RoundPhase::Playing);
        }
        assert_eq!(last, vec![RoundEvent::Ticked { count: 1 }]);

        let events = ctl.update(0.2, &FrameInput::default());
        assert_eq!(
            events,
            vec![
                RoundEvent::Ticked { count: 1 },
                RoundEvent::GameOver {
                    cause: GameOverCause::SelfCollision
                }
            ]
        );
        assert_eq!(ctl.phase(), RoundPhase::GameOver);
        assert_eq!(ctl.audio().last(), Some(&SoundEffect::GameOver));
    }

    #[test]
    fn test_body_bounces_off_wall() {
        let mut ctl = controller(Settings::default());
        ctl.round.body.position = Vec2::new(-10.0, 300.0);
        ctl.round.body.velocity = Vec2::new(-5.0, 0.0);

        let events = ctl.update(DT, &FrameInput::default());
        assert_eq!(events, vec![RoundEvent::Bounced { normal: Vec2::X }]);
        assert!((ctl.body().velocity - Vec2::new(5.0, 0.0)).length() < 1e-5);
        // Moved -5 then nudged +3.2
        assert!((ctl.body().position.x - (-11.8)).abs() < 1e-4);
    }

    #[test]
    fn test_retry_only_after_game_over() {
        let mut ctl = controller(Settings::default());
        assert!(!ctl.retry());

        ctl.round.score = 300;
        ctl.round.phase = RoundPhase::GameOver;
        let old_seed = ctl.seed();
        assert!(ctl.retry());
        assert_eq!(ctl.phase(), RoundPhase::Playing);
        assert_eq!(ctl.score(), 0);
        assert_eq!(ctl.chain().len(), 1);
        assert_ne!(ctl.seed(), old_seed);
    }

    #[test]
    fn test_catch_up_frame_eats_on_intermediate_step() {
        let mut ctl = controller(Settings::default());
        // Head center after its first step is (160, 120)
        ctl.round.body.position = Vec2::new(160.0, 120.0) - ctl.body().footprint * 0.5;
        ctl.round.body.velocity = Vec2::ZERO;

        let events = ctl.update(0.4, &FrameInput::default());
        assert_eq!(ctl.score(), 100);
        assert_eq!(ctl.chain().len(), 2);
        assert_eq!(
            events,
            vec![RoundEvent::Ticked { count: 2 }, RoundEvent::Eaten { score: 100 }]
        );
        assert!(!ctl.body().bounds().intersects(&ctl.chain().bounds()));
    }

    #[test]
    fn test_catch_up_frame_detects_wall_on_intermediate_step() {
        let mut settings = Settings::default();
        // Head sprite touching the right wall, heading right
        settings.start_position = Vec2::new(760.0, 300.0);
        let mut ctl = controller(settings);
        park_body(&mut ctl, Vec2::new(100.0, 100.0));
        // Two steps are due; the first already leaves the arena
        assert!(ctl.round.chain.steer(Direction::Right));
        assert!(ctl.round.chain.steer(Direction::Down));

        let events = ctl.update(0.4, &FrameInput::default());
        assert_eq!(
            events,
            vec![
                RoundEvent::Ticked { count: 1 },
                RoundEvent::GameOver {
                    cause: GameOverCause::ReachedWall
                }
            ]
        );
        assert_eq!(ctl.phase(), RoundPhase::GameOver);
        // The second step was never taken
        assert_eq!(ctl.chain().head().at, Vec2::new(800.0, 300.0));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut settings = Settings::default();
        settings.stride = 0.0;
        let result = RoundController::new(settings, 1, SilentAudio);
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_frame_input_directions() {
        let mut input = FrameInput::turn(Direction::Right);
        input.press(Direction::Up);
        assert_eq!(
            input.directions().collect::<Vec<_>>(),
            vec![Direction::Up, Direction::Right]
        );
        assert_eq!(FrameInput::default().directions().count(), 0);
    }

    #[test]
    fn test_determinism() {
        let mut a = RoundController::new(Settings::default(), 99999, SilentAudio).unwrap();
        let mut b = RoundController::new(Settings::default(), 99999, SilentAudio).unwrap();

        let inputs = [
            FrameInput::default(),
            FrameInput::turn(Direction::Down),
            FrameInput::default(),
            FrameInput::turn(Direction::Right),
        ];
        for _ in 0..50 {
            for input in &inputs {
                let ea = a.update(DT * 3.0, input);
                let eb = b.update(DT * 3.0, input);
                assert_eq!(ea, eb);
            }
        }

        assert_eq!(a.score(), b.score());
        assert_eq!(a.phase(), b.phase());
        assert_eq!(a.body().position, b.body().position);
        assert_eq!(
            a.chain().segments().collect::<Vec<_>>(),
            b.chain().segments().collect::<Vec<_>>()
        );
    }
}
