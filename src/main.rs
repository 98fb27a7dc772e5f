use std::io::stdout;
use std::{sync::mpsc, time::Duration, time::Instant};

use anyhow::{Context, Result};
use ratatui_image::picker::Picker;
use tracing::{error, info, warn};

use folio::{
    app::state::{App, Channels},
    catalog::Catalog,
    config,
    contact::{self, thread::ContactCommand},
    events::types::AppEvent,
    input::{self, MouseCapture},
    logging,
    player::{self, commands::PlayerCommand},
    readme::{self, thread::ReadmeCommand},
    ui::{
        self,
        screenshot::{ImageCache, ScreenshotLoader, ScreenshotMessage},
    },
};

fn main() -> Result<()> {
    let config = config::load_or_create_config()?;
    let log_path = logging::init(&config)?;
    info!(log = %log_path.display(), "starting folio");

    ui::theme::init_theme(config.theme);

    let catalog = Catalog::load(config.catalog.as_deref()).context("Failed to load catalog")?;
    if !config.contact.is_configured() {
        warn!("contact relay is not configured; messages will fail to send");
    }

    let mut terminal = ratatui::init();
    let mouse_capture = MouseCapture::enable(stdout());
    if let Err(err) = &mouse_capture {
        warn!(%err, "mouse capture unavailable");
    }
    let picker = Picker::from_query_stdio().unwrap_or_else(|err| {
        warn!(%err, "terminal graphics query failed, using half-blocks");
        Picker::from_fontsize((8, 16))
    });
    let mut image_cache = ImageCache::new(picker);
    let screenshot_loader = ScreenshotLoader::new();

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let (player_cmd_tx, player_cmd_rx) = mpsc::channel::<PlayerCommand>();
    let (readme_cmd_tx, readme_cmd_rx) = mpsc::channel::<ReadmeCommand>();
    let (contact_cmd_tx, contact_cmd_rx) = mpsc::channel::<ContactCommand>();

    let _input_handle = input::thread::spawn(event_tx.clone());
    let _player_handle = player::thread::spawn(player_cmd_rx, event_tx.clone());
    let _readme_handle = readme::thread::spawn(readme_cmd_rx, event_tx.clone());
    let _contact_handle =
        contact::thread::spawn(config.contact.clone(), contact_cmd_rx, event_tx.clone());

    let size = terminal.size()?;
    let channels = Channels {
        player_tx: player_cmd_tx,
        readme_tx: readme_cmd_tx,
        contact_tx: contact_cmd_tx,
        event_tx,
    };
    let mut app = App::new(
        catalog,
        config.assets_dir.clone(),
        channels,
        (size.width, size.height),
    );

    let result = run(
        &mut terminal,
        &mut app,
        &mut image_cache,
        &screenshot_loader,
        &event_rx,
    );

    // Dropping the app unmounts the player, which stops the decoder.
    drop(app);
    drop(mouse_capture);
    ratatui::restore();
    info!("exiting");
    result
}

fn run(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    image_cache: &mut ImageCache,
    screenshot_loader: &ScreenshotLoader,
    event_rx: &mpsc::Receiver<AppEvent>,
) -> Result<()> {
    loop {
        while let Ok(msg) = screenshot_loader.try_recv() {
            match msg {
                ScreenshotMessage::Loaded { path, image } => {
                    image_cache.show(&path, image);
                }
                ScreenshotMessage::Error { path, error } => {
                    warn!(path = %path.display(), %error, "screenshot failed to load");
                }
            }
        }

        if let Some(path) = app.project_page().and_then(|page| page.screenshot.clone()) {
            if image_cache.should_request(&path) {
                screenshot_loader.request(path);
            }
        }

        app.tick(Instant::now());
        terminal.draw(|f| ui::render::render(f, app, image_cache))?;

        match event_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(event) => {
                let now = Instant::now();
                match event {
                    AppEvent::Input(key_event) => app.handle_input(key_event, now),
                    AppEvent::Mouse(mouse_event) => app.handle_mouse(mouse_event, now),
                    AppEvent::Resize(width, height) => app.on_resize(width, height),
                    AppEvent::Media { generation, event } => {
                        app.on_media_event(generation, event, now)
                    }
                    AppEvent::FullscreenChanged(active) => app.on_fullscreen_changed(active),
                    AppEvent::ReadmeLoaded {
                        project_id,
                        markdown,
                    } => app.on_readme_loaded(&project_id, &markdown),
                    AppEvent::ReadmeUnavailable { project_id, reason } => {
                        app.on_readme_unavailable(&project_id, reason)
                    }
                    AppEvent::ContactSent => app.on_contact_sent(now),
                    AppEvent::ContactFailed(message) => app.on_contact_failed(message, now),
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                error!("event channel disconnected");
                anyhow::bail!("Event channel disconnected");
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
