//! Sound effect sink
//!
//! The simulation only names the effect; playback belongs to whatever sink the
//! host injects.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Chain caught the mover
    Eat,
    /// Mover hit a wall
    Bounce,
    /// Round ended
    GameOver,
    Pause,
    Resume,
}

/// Fire-and-forget playback
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Discards every effect
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Logs effects instead of playing them (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect) {
        log::debug!("sfx: {:?}", effect);
    }
}

/// Records effects in order
impl AudioSink for Vec<SoundEffect> {
    fn play(&mut self, effect: SoundEffect) {
        self.push(effect);
    }
}

impl<S: AudioSink + ?Sized> AudioSink for &mut S {
    fn play(&mut self, effect: SoundEffect) {
        (**self).play(effect);
    }
}
