use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source, source::Buffered};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::{GameError, Result};

type Sound = Buffered<Decoder<BufReader<File>>>;

const MENU_MUSIC_VOLUME: f32 = 0.5;
const LOADING_SOUND_VOLUME: f32 = 1.0;

/// Sound file locations
#[derive(Debug, Clone)]
pub struct AudioPaths {
    pub menu_music: PathBuf,
    pub loading_sound: PathBuf,
}

impl AudioPaths {
    pub fn in_dir(assets_dir: &Path) -> Self {
        let sounds = assets_dir.join("sounds");
        Self {
            menu_music: sounds.join("GameMusic.mp3"),
            loading_sound: sounds.join("carpassingsound.mp4"),
        }
    }
}

/// An open output device with the sinks playing on it
struct Output {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    menu_music: Option<Sink>,
    loading_sound: Option<Sound>,
    loading_sink: Option<Sink>,
    /// Silent placeholder for in-race music. Never given a source.
    game_music: Option<Sink>,
}

/// Audio manager for background music and the start sound.
///
/// Playback never fails the game. If no output device can be opened at
/// startup, one more attempt is made on the first key press.
pub struct AudioManager {
    paths: AudioPaths,
    output: Option<Output>,
    retry_pending: bool,
    muted: bool,
}

impl AudioManager {
    /// Opens the default output and starts the looping menu music
    pub fn new(paths: AudioPaths, muted: bool) -> Self {
        let mut manager = Self {
            paths,
            output: None,
            retry_pending: false,
            muted,
        };
        if let Err(err) = manager.open() {
            log::warn!("Audio unavailable, retrying on first key press: {err}");
            manager.retry_pending = true;
        }
        manager
    }

    /// A manager that never plays anything
    pub fn disabled(paths: AudioPaths) -> Self {
        Self {
            paths,
            output: None,
            retry_pending: false,
            muted: true,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_available(&self) -> bool {
        self.output.is_some()
    }

    fn open(&mut self) -> Result<()> {
        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|err| GameError::Audio(err.to_string()))?;

        let menu_music = match load_sound(&self.paths.menu_music) {
            Ok(music) => {
                let sink = new_sink(&stream_handle)?;
                sink.set_volume(self.volume(MENU_MUSIC_VOLUME));
                sink.append(music.repeat_infinite());
                Some(sink)
            }
            Err(err) => {
                log::warn!("Menu music disabled: {err}");
                None
            }
        };

        let loading_sound = load_sound(&self.paths.loading_sound)
            .inspect_err(|err| log::warn!("Loading sound disabled: {err}"))
            .ok();

        let game_music = new_sink(&stream_handle).ok();
        if let Some(sink) = &game_music {
            sink.set_volume(0.0);
        }

        self.output = Some(Output {
            _stream: stream,
            stream_handle,
            menu_music,
            loading_sound,
            loading_sink: None,
            game_music,
        });
        log::info!("Audio output opened");
        Ok(())
    }

    /// Called after a key press. Retries opening the output once.
    pub fn on_user_interaction(&mut self) {
        if !self.retry_pending {
            return;
        }
        self.retry_pending = false;
        if let Err(err) = self.open() {
            log::warn!("Audio still unavailable, giving up: {err}");
        }
    }

    /// Restarts the start sound from the beginning
    pub fn play_loading_sound(&mut self) {
        let volume = self.volume(LOADING_SOUND_VOLUME);
        let Some(output) = self.output.as_mut() else {
            return;
        };
        let Some(sound) = output.loading_sound.clone() else {
            return;
        };
        if let Some(previous) = output.loading_sink.take() {
            previous.stop();
        }
        // Ignore errors for sound playback - don't want to crash the game
        if let Ok(sink) = Sink::try_new(&output.stream_handle) {
            sink.set_volume(volume);
            sink.append(sound);
            output.loading_sink = Some(sink);
        }
    }

    /// Kept for parity with the menu/loading tracks; there is no race music
    pub fn play_game_music(&self) {
        if let Some(sink) = self.output.as_ref().and_then(|o| o.game_music.as_ref()) {
            sink.play();
        }
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        let menu_volume = self.volume(MENU_MUSIC_VOLUME);
        let loading_volume = self.volume(LOADING_SOUND_VOLUME);
        if let Some(output) = &self.output {
            if let Some(sink) = &output.menu_music {
                sink.set_volume(menu_volume);
            }
            if let Some(sink) = &output.loading_sink {
                sink.set_volume(loading_volume);
            }
        }
        log::info!("Audio {}", if self.muted { "muted" } else { "unmuted" });
        self.muted
    }

    fn volume(&self, volume: f32) -> f32 {
        if self.muted { 0.0 } else { volume }
    }
}

fn new_sink(handle: &OutputStreamHandle) -> Result<Sink> {
    Sink::try_new(handle).map_err(|err| GameError::Audio(err.to_string()))
}

fn load_sound(path: &Path) -> Result<Sound> {
    let file = File::open(path)?;
    let source = Decoder::new(BufReader::new(file))
        .map_err(|err| GameError::Audio(format!("{}: {err}", path.display())))?;
    Ok(source.buffered())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_in_assets_dir() {
        let paths = AudioPaths::in_dir(Path::new("assets"));
        assert_eq!(
            paths.menu_music,
            Path::new("assets").join("sounds").join("GameMusic.mp3")
        );
        assert_eq!(
            paths.loading_sound,
            Path::new("assets").join("sounds").join("carpassingsound.mp4")
        );
    }

    #[test]
    fn test_disabled_manager_is_silent() {
        let mut audio = AudioManager::disabled(AudioPaths::in_dir(Path::new("assets")));
        assert!(!audio.is_available());
        // none of these may panic without an output device
        audio.play_loading_sound();
        audio.play_game_music();
        audio.on_user_interaction();
        assert!(!audio.is_available());
    }

    #[test]
    fn test_output_retried_only_once() {
        let missing = tempfile::tempdir().unwrap();
        let mut audio = AudioManager {
            paths: AudioPaths::in_dir(missing.path()),
            output: None,
            retry_pending: true,
            muted: true,
        };
        audio.on_user_interaction();
        assert!(!audio.retry_pending);

        // a second key press leaves whatever the retry produced alone
        let available = audio.is_available();
        audio.on_user_interaction();
        assert!(!audio.retry_pending);
        assert_eq!(audio.is_available(), available);
    }

    #[test]
    fn test_toggle_mute() {
        let mut audio = AudioManager::disabled(AudioPaths::in_dir(Path::new("assets")));
        assert!(audio.is_muted());
        assert!(!audio.toggle_mute());
        assert!(audio.toggle_mute());
        assert_eq!(audio.volume(0.5), 0.0);
    }
}
