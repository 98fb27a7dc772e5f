use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use image::DynamicImage;
use ratatui_image::{picker::Picker, protocol::StatefulProtocol};

pub enum ScreenshotMessage {
    Loaded { path: PathBuf, image: DynamicImage },
    Error { path: PathBuf, error: String },
}

/// Decodes screenshot files off the main thread.
pub struct ScreenshotLoader {
    rx: Receiver<ScreenshotMessage>,
    tx: Sender<ScreenshotMessage>,
}

impl ScreenshotLoader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { rx, tx }
    }

    pub fn request(&self, path: PathBuf) {
        let tx = self.tx.clone();

        thread::spawn(move || {
            let message = match image::open(&path) {
                Ok(image) => ScreenshotMessage::Loaded { path, image },
                Err(e) => ScreenshotMessage::Error {
                    path,
                    error: e.to_string(),
                },
            };
            let _ = tx.send(message);
        });
    }

    /// Non-blocking check for decoded images
    pub fn try_recv(&self) -> Result<ScreenshotMessage, TryRecvError> {
        self.rx.try_recv()
    }
}

impl Default for ScreenshotLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Holds the screenshot currently on screen, encoded for the terminal's
/// graphics protocol.
pub struct ImageCache {
    pub picker: Picker,
    pub current_image: Option<StatefulProtocol>,
    current_path: Option<PathBuf>,
    requested: Option<PathBuf>,
}

impl ImageCache {
    pub fn new(picker: Picker) -> Self {
        Self {
            picker,
            current_image: None,
            current_path: None,
            requested: None,
        }
    }

    /// Returns true when `path` has not been asked for yet, and records it.
    pub fn should_request(&mut self, path: &Path) -> bool {
        if self.requested.as_deref() == Some(path) {
            return false;
        }
        self.current_image = None;
        self.current_path = None;
        self.requested = Some(path.to_path_buf());
        true
    }

    /// Stores a decoded image if it is still the one wanted.
    pub fn show(&mut self, path: &Path, image: DynamicImage) -> bool {
        if self.requested.as_deref() != Some(path) {
            return false;
        }
        self.current_image = Some(self.picker.new_resize_protocol(image));
        self.current_path = Some(path.to_path_buf());
        true
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn clear(&mut self) {
        self.current_image = None;
        self.current_path = None;
        self.requested = None;
    }
}
