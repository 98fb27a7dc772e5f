use std::io::{self, Write};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;

pub mod thread;

/// Mouse reporting for the lifetime of the guard. Movement events drive
/// hover effects and the player's auto-hide; dropping the guard hands the
/// terminal back without them.
pub struct MouseCapture<W: Write> {
    out: W,
}

impl<W: Write> MouseCapture<W> {
    pub fn enable(mut out: W) -> io::Result<Self> {
        execute!(out, EnableMouseCapture)?;
        Ok(Self { out })
    }
}

impl<W: Write> Drop for MouseCapture<W> {
    fn drop(&mut self) {
        if let Err(err) = execute!(self.out, DisableMouseCapture) {
            tracing::warn!(%err, "mouse capture left enabled");
        }
    }
}
