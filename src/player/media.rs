use std::path::Path;
use std::sync::mpsc::Sender;
use std::time::Duration;

use thiserror::Error;

use crate::player::commands::PlayerCommand;

/// Native events a media element emits while it plays.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    Play,
    Pause,
    Ended,
    /// Current position in seconds.
    TimeUpdate(f64),
    /// `duration` is NaN when the container does not declare one.
    LoadedMetadata { duration: f64 },
    /// Asynchronous failure (decode error, rejected play).
    Error(String),
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media element is gone")]
    Disconnected,
    #[error("no media loaded")]
    NotLoaded,
    #[error("playback rejected: {0}")]
    Rejected(String),
}

/// Host media element. Every call may fail; results of `play`/`pause` also
/// arrive later as [`MediaEvent`]s.
pub trait MediaElement {
    fn load(&mut self, source: &Path) -> Result<(), MediaError>;
    fn play(&mut self) -> Result<(), MediaError>;
    fn pause(&mut self) -> Result<(), MediaError>;
    fn set_current_time(&mut self, seconds: f64) -> Result<(), MediaError>;
    fn set_volume(&mut self, volume: f64) -> Result<(), MediaError>;
    fn set_muted(&mut self, muted: bool) -> Result<(), MediaError>;
    fn unload(&mut self);
}

/// Handle to the decoder thread in [`crate::player::thread`].
#[derive(Debug, Clone)]
pub struct AudioElement {
    tx: Sender<PlayerCommand>,
    generation: u64,
}

impl AudioElement {
    /// `generation` tags this element's source so the app can tell its
    /// events from those of a previously mounted one.
    pub fn new(tx: Sender<PlayerCommand>, generation: u64) -> Self {
        Self { tx, generation }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn send(&self, cmd: PlayerCommand) -> Result<(), MediaError> {
        self.tx.send(cmd).map_err(|_| MediaError::Disconnected)
    }
}

impl MediaElement for AudioElement {
    fn load(&mut self, source: &Path) -> Result<(), MediaError> {
        self.send(PlayerCommand::Load {
            path: source.to_path_buf(),
            generation: self.generation,
        })
    }

    fn play(&mut self) -> Result<(), MediaError> {
        self.send(PlayerCommand::Play)
    }

    fn pause(&mut self) -> Result<(), MediaError> {
        self.send(PlayerCommand::Pause)
    }

    fn set_current_time(&mut self, seconds: f64) -> Result<(), MediaError> {
        self.send(PlayerCommand::Seek(Duration::from_secs_f64(seconds.max(0.0))))
    }

    fn set_volume(&mut self, volume: f64) -> Result<(), MediaError> {
        self.send(PlayerCommand::SetVolume(volume as f32))
    }

    fn set_muted(&mut self, muted: bool) -> Result<(), MediaError> {
        self.send(PlayerCommand::SetMuted(muted))
    }

    fn unload(&mut self) {
        let _ = self.send(PlayerCommand::Unload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn forwards_commands_to_decoder_thread() {
        let (tx, rx) = mpsc::channel();
        let mut element = AudioElement::new(tx, 7);
        element.load(Path::new("demo.mp4")).unwrap();
        element.set_current_time(-2.0).unwrap();
        element.set_volume(0.25).unwrap();

        assert!(matches!(
            rx.recv().unwrap(),
            PlayerCommand::Load { path, generation: 7 } if path == Path::new("demo.mp4")
        ));
        assert!(matches!(rx.recv().unwrap(), PlayerCommand::Seek(d) if d == Duration::ZERO));
        assert!(matches!(rx.recv().unwrap(), PlayerCommand::SetVolume(v) if v == 0.25));
    }

    #[test]
    fn reports_disconnected_thread() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut element = AudioElement::new(tx, 0);
        assert!(matches!(element.play(), Err(MediaError::Disconnected)));
    }
}
