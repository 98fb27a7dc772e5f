use std::path::PathBuf;
use std::time::Duration;

/// Commands accepted by the decoder thread.
#[derive(Debug, Clone)]
pub enum PlayerCommand {
    /// Probe a source and stay paused at 0. Events emitted from then on
    /// carry `generation`.
    Load { path: PathBuf, generation: u64 },
    Play,
    Pause,
    Seek(Duration),
    SetVolume(f32),
    SetMuted(bool),
    Unload,
}
