use crossterm::event::{KeyEvent, MouseEvent};

use crate::player::media::MediaEvent;

#[derive(Debug, Clone)]
pub enum AppEvent {
    // From input thread
    Input(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),

    // From decoder thread
    /// Tagged with the generation of the `Load` it belongs to.
    Media { generation: u64, event: MediaEvent },

    // From the fullscreen host
    FullscreenChanged(bool),

    // From README loader
    ReadmeLoaded { project_id: String, markdown: String },
    ReadmeUnavailable { project_id: String, reason: String },

    // From contact relay
    ContactSent,
    ContactFailed(String),
}
