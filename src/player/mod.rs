pub mod autohide;
pub mod commands;
pub mod controller;
pub mod fullscreen;
pub mod media;
pub mod overlay;
pub mod state;
pub mod thread;

use crate::player::controller::PlayerController;
use crate::player::fullscreen::TerminalFullscreen;
use crate::player::media::AudioElement;

/// The player used by project pages.
pub type DemoPlayer = PlayerController<AudioElement, TerminalFullscreen>;
