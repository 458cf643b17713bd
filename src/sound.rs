use std::io::Write;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f64,
    pub duration_secs: f64,
}

impl Tone {
    pub const fn new(frequency_hz: f64, duration_secs: f64) -> Self {
        Self {
            frequency_hz,
            duration_secs,
        }
    }
}

/// Cues the game plays.
pub mod cues {
    use super::Tone;

    pub const START: Tone = Tone::new(523.25, 0.2);
    pub const CORRECT: [Tone; 2] = [Tone::new(659.25, 0.2), Tone::new(783.99, 0.1)];
    pub const MISS: Tone = Tone::new(200.0, 0.3);
    /// Played at 0, 200 and 400 ms.
    pub const FANFARE: [Tone; 3] = [
        Tone::new(523.25, 0.2),
        Tone::new(659.25, 0.2),
        Tone::new(783.99, 0.3),
    ];
    pub const FANFARE_STEP_MS: u64 = 200;
    pub const DEFEAT: Tone = Tone::new(392.0, 0.3);
    pub const REWARD: Tone = Tone::new(1046.5, 0.3);
}

/// Fire-and-forget audio output. Implementations must swallow failures.
pub trait SoundEmitter {
    fn emit(&mut self, frequency_hz: f64, duration_secs: f64);

    fn play(&mut self, tone: Tone) {
        self.emit(tone.frequency_hz, tone.duration_secs);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl SoundEmitter for Silent {
    fn emit(&mut self, _frequency_hz: f64, _duration_secs: f64) {}
}

/// Rings the terminal bell; pitch and length are not representable.
#[derive(Debug)]
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> SoundEmitter for TerminalBell<W> {
    fn emit(&mut self, frequency_hz: f64, duration_secs: f64) {
        if frequency_hz <= 0.0 || duration_secs <= 0.0 {
            return;
        }
        let _ = self.out.write_all(b"\x07").and_then(|_| self.out.flush());
    }
}

/// Keeps every emitted tone; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingEmitter {
    tones: Arc<Mutex<Vec<Tone>>>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tones(&self) -> Vec<Tone> {
        self.tones.lock().map(|t| t.clone()).unwrap_or_default()
    }

    pub fn count(&self, tone: Tone) -> usize {
        self.tones().iter().filter(|t| **t == tone).count()
    }
}

impl SoundEmitter for RecordingEmitter {
    fn emit(&mut self, frequency_hz: f64, duration_secs: f64) {
        if let Ok(mut tones) = self.tones.lock() {
            tones.push(Tone::new(frequency_hz, duration_secs));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }
    }

    #[test]
    fn test_bell_writes_bel() {
        let mut bell = TerminalBell::new(Vec::new());
        bell.play(cues::START);
        bell.emit(-1.0, 0.2);
        assert_eq!(bell.out, b"\x07");
    }

    #[test]
    fn test_bell_swallows_errors() {
        let mut bell = TerminalBell::new(BrokenPipe);
        bell.play(cues::MISS);
    }

    #[test]
    fn test_recording_is_shared() {
        let rec = RecordingEmitter::new();
        let mut handle = rec.clone();
        handle.play(cues::REWARD);
        handle.play(cues::REWARD);
        handle.play(cues::DEFEAT);

        assert_eq!(rec.tones().len(), 3);
        assert_eq!(rec.count(cues::REWARD), 2);
    }
}
