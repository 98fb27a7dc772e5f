use std::sync::mpsc::Sender;

use thiserror::Error;

use crate::events::types::AppEvent;

/// Smallest terminal that can host the player on its own.
pub const MIN_FULLSCREEN: (u16, u16) = (40, 12);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FullscreenError {
    #[error("fullscreen denied: {0}")]
    Denied(String),
    #[error("not in fullscreen")]
    NotActive,
}

/// Host side of fullscreen. Successful transitions are announced through a
/// change notification, not through the return value, so changes made
/// outside the player (Escape) are observed the same way.
pub trait FullscreenHost {
    fn is_fullscreen(&self) -> bool;
    fn request(&mut self) -> Result<(), FullscreenError>;
    fn exit(&mut self) -> Result<(), FullscreenError>;
}

/// Fullscreen in a terminal: the player takes over the whole frame.
#[derive(Debug)]
pub struct TerminalFullscreen {
    active: bool,
    viewport: (u16, u16),
    notify: Sender<AppEvent>,
}

impl TerminalFullscreen {
    pub fn new(notify: Sender<AppEvent>, viewport: (u16, u16)) -> Self {
        Self {
            active: false,
            viewport,
            notify,
        }
    }

    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.viewport = (width, height);
    }

    fn announce(&self) {
        let _ = self.notify.send(AppEvent::FullscreenChanged(self.active));
    }
}

impl FullscreenHost for TerminalFullscreen {
    fn is_fullscreen(&self) -> bool {
        self.active
    }

    fn request(&mut self) -> Result<(), FullscreenError> {
        let (width, height) = self.viewport;
        let (min_width, min_height) = MIN_FULLSCREEN;
        if width < min_width || height < min_height {
            return Err(FullscreenError::Denied(format!(
                "terminal is {width}x{height}, need at least {min_width}x{min_height}"
            )));
        }
        self.active = true;
        self.announce();
        Ok(())
    }

    fn exit(&mut self) -> Result<(), FullscreenError> {
        if !self.active {
            return Err(FullscreenError::NotActive);
        }
        self.active = false;
        self.announce();
        Ok(())
    }
}
