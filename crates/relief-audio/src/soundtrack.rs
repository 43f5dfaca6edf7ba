//! Soundtrack playback wrapping Kira's AudioManager
//!
//! Degrades gracefully: with no audio device, no soundtrack, or audio
//! disabled in config, every call is a silent no-op.

use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle};
use kira::{AudioManager, AudioManagerSettings, Decibels, DefaultBackend, Tween};
use relief_core::config::AudioSettings;
use relief_core::{ReliefError, Result};
use std::path::Path;

/// Plays one looping soundtrack, started at most once
pub struct SoundtrackPlayer {
    manager: Option<AudioManager<DefaultBackend>>,
    sound: Option<StaticSoundData>,
    handle: Option<StaticSoundHandle>,
    volume: f64,
    started: bool,
}

impl SoundtrackPlayer {
    /// A player that never makes a sound
    pub fn silent() -> Self {
        Self {
            manager: None,
            sound: None,
            handle: None,
            volume: 0.0,
            started: false,
        }
    }

    /// Open the audio device and load `soundtrack`. Failures are logged and
    /// leave the player silent.
    pub fn new(settings: &AudioSettings, soundtrack: &Path) -> Self {
        if !settings.enabled {
            log::info!("Audio disabled in config");
            return Self::silent();
        }

        let manager = match AudioManager::<DefaultBackend>::new(AudioManagerSettings::default()) {
            Ok(manager) => manager,
            Err(e) => {
                log::warn!("Audio: no device available ({}), running silent", e);
                return Self::silent();
            }
        };

        let sound = match load_sound(soundtrack) {
            Ok(sound) => sound,
            Err(e) => {
                log::warn!("{}", e);
                return Self::silent();
            }
        };

        Self {
            manager: Some(manager),
            sound: Some(sound),
            handle: None,
            volume: settings.volume,
            started: false,
        }
    }

    /// Whether a soundtrack is loaded and can be heard
    pub fn is_available(&self) -> bool {
        self.manager.is_some() && self.sound.is_some()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_playing(&self) -> bool {
        self.handle.is_some()
    }

    /// Begin looped playback. Only the first call has any effect.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;

        let (Some(manager), Some(sound)) = (&mut self.manager, &self.sound) else {
            return;
        };

        let data = sound
            .clone()
            .volume(amplitude_to_db(self.volume))
            .loop_region(..);

        match manager.play(data) {
            Ok(handle) => {
                log::debug!("Soundtrack started");
                self.handle = Some(handle);
            }
            Err(e) => log::warn!("Audio: failed to play soundtrack: {}", e),
        }
    }

    /// Stop playback
    pub fn stop(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.stop(Tween::default());
        }
    }
}

fn load_sound(path: &Path) -> Result<StaticSoundData> {
    StaticSoundData::from_file(path).map_err(|e| {
        ReliefError::AudioError(format!("Failed to load '{}': {}", path.display(), e))
    })
}

/// Convert linear amplitude to decibels, floored at -60 dB
pub fn amplitude_to_db(amplitude: f64) -> Decibels {
    if amplitude <= 0.0 {
        Decibels(-60.0)
    } else {
        Decibels((20.0 * (amplitude as f32).log10()).max(-60.0))
    }
}
