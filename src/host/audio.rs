use std::fs::File;
use std::io::{Cursor, Read};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::core::controller::PlayerEvent;

fn load_bytes(path: &str) -> Option<Vec<u8>> {
    let mut f = File::open(path).ok()?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf).ok()?;
    Some(buf)
}

fn load_bytes_any(paths: &[&str]) -> Option<Arc<Vec<u8>>> {
    paths.iter().find_map(|p| load_bytes(p)).map(Arc::new)
}

/// Footsteps paced and scaled by the player's noise level, plus one-shot cues
/// for controller events. Missing sound files are silently skipped.
pub struct AudioManager {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    foot_sink: Sink,
    step: Option<Arc<Vec<u8>>>,
    key: Option<Arc<Vec<u8>>>,
    locker: Option<Arc<Vec<u8>>>,
    trap: Option<Arc<Vec<u8>>>,
    victory: Option<Arc<Vec<u8>>>,
    defeat: Option<Arc<Vec<u8>>>,
    last_step: Instant,
}

impl AudioManager {
    pub fn new() -> Option<Self> {
        let (_stream, handle) = OutputStream::try_default().ok()?;
        let foot_sink = Sink::try_new(&handle).ok()?;
        Some(Self {
            _stream,
            handle,
            foot_sink,
            step: None,
            key: None,
            locker: None,
            trap: None,
            victory: None,
            defeat: None,
            last_step: Instant::now(),
        })
    }

    pub fn load_sfx_auto(&mut self) {
        self.step = load_bytes_any(&["assets/sfx_step.wav", "assets/sounds/step.wav", "assets/sounds/footstep.wav"]);
        self.key = load_bytes_any(&["assets/sfx_key.wav", "assets/sounds/key.wav"]);
        self.locker = load_bytes_any(&["assets/sfx_locker.wav", "assets/sounds/locker.wav"]);
        self.trap = load_bytes_any(&["assets/sfx_trap.wav", "assets/sounds/spikes.wav"]);
        self.victory = load_bytes_any(&["assets/sfx_victory.wav", "assets/sounds/victory.wav"]);
        self.defeat = load_bytes_any(&["assets/sfx_defeat.wav", "assets/sounds/caught.wav"]);
    }

    /// Louder movement steps faster and plays louder.
    pub fn footsteps(&mut self, noise_level: f64, moving: bool) {
        if !moving {
            return;
        }
        let noise = noise_level.clamp(0.0, 1.0);
        let interval = Duration::from_millis((420.0 - 250.0 * noise) as u64);
        if self.last_step.elapsed() >= interval {
            self.last_step = Instant::now();
            if let Some(dec) = decode(&self.step) {
                self.foot_sink.append(dec.amplify((0.25 + 0.75 * noise) as f32));
            }
        }
    }

    pub fn on_events(&self, events: &[PlayerEvent]) {
        for event in events {
            let clip = match event {
                PlayerEvent::KeyCollected { .. } => &self.key,
                PlayerEvent::LeftLocker | PlayerEvent::EnteredLocker => &self.locker,
                PlayerEvent::EnteredTrap => &self.trap,
                PlayerEvent::Victory => &self.victory,
                PlayerEvent::Defeat => &self.defeat,
                _ => continue,
            };
            self.play_detached(clip);
        }
    }

    /// Own sink per cue so several cues in one frame all start immediately.
    fn play_detached(&self, clip: &Option<Arc<Vec<u8>>>) {
        if let Some(dec) = decode(clip) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                sink.append(dec);
                sink.detach();
            }
        }
    }
}

fn decode(clip: &Option<Arc<Vec<u8>>>) -> Option<Decoder<Cursor<Vec<u8>>>> {
    let bytes = clip.as_ref()?;
    Decoder::new(Cursor::new(bytes.as_ref().clone())).ok()
}
