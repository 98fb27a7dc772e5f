use crate::events::types::AppEvent;
use crossterm::event::{self, Event, KeyEventKind};
use std::{sync::mpsc, thread::JoinHandle};

/// Forwards terminal input to the app channel. Mouse reporting is owned by
/// [`crate::input::MouseCapture`] in the main thread, since this one stays
/// blocked in `read` until the process exits.
pub fn spawn(event_tx: mpsc::Sender<AppEvent>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        loop {
            let forwarded = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    event_tx.send(AppEvent::Input(key))
                }
                Ok(Event::Mouse(mouse)) => event_tx.send(AppEvent::Mouse(mouse)),
                Ok(Event::Resize(width, height)) => event_tx.send(AppEvent::Resize(width, height)),
                Ok(_) => Ok(()),
                Err(err) => {
                    tracing::warn!(%err, "terminal input closed");
                    break;
                }
            };
            if forwarded.is_err() {
                break;
            }
        }
    })
}
