#![allow(dead_code)]

use std::fs;
use std::sync::mpsc::{self, Receiver};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tempfile::TempDir;

use folio::app::state::{App, Channels};
use folio::catalog::Catalog;
use folio::contact::thread::ContactCommand;
use folio::events::types::AppEvent;
use folio::player::commands::PlayerCommand;
use folio::readme::thread::ReadmeCommand;

/// An app wired to plain channels instead of worker threads.
pub struct Harness {
    pub app: App,
    pub assets: TempDir,
    pub player_rx: Receiver<PlayerCommand>,
    pub readme_rx: Receiver<ReadmeCommand>,
    pub contact_rx: Receiver<ContactCommand>,
    pub event_rx: Receiver<AppEvent>,
}

impl Harness {
    /// Sample catalog with the Tidewatch demo media present on disk.
    pub fn new(viewport: (u16, u16)) -> Self {
        let assets = tempfile::tempdir().unwrap();
        fs::create_dir_all(assets.path().join("Tidewatch")).unwrap();
        fs::write(assets.path().join("Tidewatch/Tidewatch.mp4"), b"").unwrap();

        let (player_tx, player_rx) = mpsc::channel();
        let (readme_tx, readme_rx) = mpsc::channel();
        let (contact_tx, contact_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let app = App::new(
            Catalog::sample().unwrap(),
            assets.path().to_path_buf(),
            Channels {
                player_tx,
                readme_tx,
                contact_tx,
                event_tx,
            },
            viewport,
        );

        Self {
            app,
            assets,
            player_rx,
            readme_rx,
            contact_rx,
            event_rx,
        }
    }

    pub fn player_commands(&self) -> Vec<PlayerCommand> {
        self.player_rx.try_iter().collect()
    }

    /// Feeds pending host notifications back into the app, as the main loop
    /// does.
    pub fn pump_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            if let AppEvent::FullscreenChanged(active) = event {
                self.app.on_fullscreen_changed(active);
            }
        }
    }

    /// Generation the mounted player's decoder events are tagged with.
    pub fn media_generation(&self) -> u64 {
        self.app.player.as_ref().unwrap().media().generation()
    }

    pub fn project_index(&self, id: &str) -> usize {
        self.app
            .catalog
            .projects
            .iter()
            .position(|p| p.id == id)
            .unwrap()
    }
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub const TIDEWATCH_README: &str = "\
# 🌊 Tidewatch

Tidewatch turns raw tide tables into a harbour dashboard you can read at a glance.

![screenshot](docs/dashboard.png)

## ✨ Features

- 📈 Live tide charts for every configured harbour
- 🔔 Alerts when readings cross a threshold
  - email
  - webhook
- Fast

## 🛠️ Tech Stack

- **Frontend:** React with TypeScript
- Node.js - API server
- PostgreSQL: time series storage

## Getting Started

```bash
npm install
```
";
