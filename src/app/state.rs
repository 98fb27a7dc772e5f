use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use tracing::{debug, info, warn};

use crate::app::{decrement, increment};
use crate::catalog::{Catalog, NavTarget, Project, Section};
use crate::contact::thread::ContactCommand;
use crate::contact::{ContactForm, Field, FormError};
use crate::events::types::AppEvent;
use crate::player::DemoPlayer;
use crate::player::commands::PlayerCommand;
use crate::player::fullscreen::{FullscreenHost, MIN_FULLSCREEN, TerminalFullscreen};
use crate::player::media::{AudioElement, MediaEvent};
use crate::player::overlay::{ControlAction, ControlRegions};
use crate::readme::thread::{ReadmeCommand, readme_path};
use crate::readme::{Document, ProjectDetail, summarize};
use crate::ui::loading::LoadingAnimation;
use crate::ui::notifications::NotificationManager;
use crate::ui::particles::ParticleField;

#[derive(Default, Clone)]
pub struct LayoutRegions {
    pub tabs: Vec<(Rect, usize)>,
    pub hero: Option<Rect>,
    pub project_cards: Vec<(Rect, usize)>,
    pub contact_fields: Vec<(Rect, Field)>,
    pub back: Option<Rect>,
    pub player: ControlRegions,
    /// Last scroll offset that still shows content.
    pub max_scroll: u16,
}

/// Senders to the worker threads.
pub struct Channels {
    pub player_tx: mpsc::Sender<PlayerCommand>,
    pub readme_tx: mpsc::Sender<ReadmeCommand>,
    pub contact_tx: mpsc::Sender<ContactCommand>,
    pub event_tx: mpsc::Sender<AppEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReadmeState {
    Loading,
    Loaded(Document),
    Unavailable(String),
}

pub struct ProjectPage {
    pub project: Project,
    pub detail: ProjectDetail,
    pub readme: ReadmeState,
    pub screenshot: Option<PathBuf>,
}

pub enum Route {
    Home,
    Project(ProjectPage),
}

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum Focus {
    Nav,
    Form,
}

pub struct App {
    // Data
    pub catalog: Catalog,
    pub assets_dir: PathBuf,

    // Navigation
    pub route: Route,
    pub section: Section,
    pub focus: Focus,
    pub selected_project: usize,
    pub hovered_card: Option<usize>,
    pub scroll: u16,

    // Components
    pub player: Option<DemoPlayer>,
    pub contact: ContactForm,
    pub particles: Option<ParticleField>,
    pub loading: LoadingAnimation,
    pub notifications: NotificationManager,

    // Control
    pub should_quit: bool,
    pub viewport: (u16, u16),
    pub layout_regions: LayoutRegions,
    pointer_over_player: bool,
    media_generation: u64,

    // Communication
    channels: Channels,
}

impl App {
    pub fn new(catalog: Catalog, assets_dir: PathBuf, channels: Channels, viewport: (u16, u16)) -> Self {
        Self {
            catalog,
            assets_dir,

            route: Route::Home,
            section: Section::Home,
            focus: Focus::Nav,
            selected_project: 0,
            hovered_card: None,
            scroll: 0,

            player: None,
            contact: ContactForm::new(),
            particles: None,
            loading: LoadingAnimation::default(),
            notifications: NotificationManager::new(),

            should_quit: false,
            viewport,
            layout_regions: LayoutRegions::default(),
            pointer_over_player: false,
            media_generation: 0,

            channels,
        }
    }

    pub fn project_page(&self) -> Option<&ProjectPage> {
        match &self.route {
            Route::Project(page) => Some(page),
            Route::Home => None,
        }
    }

    pub fn is_fullscreen(&self) -> bool {
        self.player.as_ref().is_some_and(|p| p.state().is_fullscreen)
    }

    // Navigation

    pub fn set_section(&mut self, section: Section) {
        self.section = section;
        self.scroll = 0;
        self.focus = Focus::Nav;
        self.hovered_card = None;
    }

    pub fn next_section(&mut self) {
        let index = increment(self.section.index(), Section::ALL.len(), true);
        self.set_section(Section::ALL[index]);
    }

    pub fn previous_section(&mut self) {
        let index = decrement(self.section.index(), Section::ALL.len(), true);
        self.set_section(Section::ALL[index]);
    }

    pub fn next_project(&mut self) {
        self.selected_project =
            increment(self.selected_project, self.catalog.projects.len(), false);
    }

    pub fn previous_project(&mut self) {
        self.selected_project =
            decrement(self.selected_project, self.catalog.projects.len(), false);
    }

    fn activate_nav(&mut self, index: usize) {
        let Some(link) = self.catalog.nav.get(index) else {
            return;
        };
        let (section, external) = match link.target() {
            Some(NavTarget::Section(section)) => (Some(section), None),
            Some(NavTarget::External(url)) => (None, Some(format!("{}: {}", link.name, url))),
            None => (None, None),
        };

        // Outside links can't be opened from here, so show where they go.
        if let Some(text) = external {
            self.notifications.info(text);
        }
        if let Some(section) = section {
            if matches!(self.route, Route::Project(_)) {
                self.leave_project();
            }
            self.set_section(section);
        }
    }

    /// Mounts the project page. The demo player is created only when the
    /// project's media file exists.
    pub fn open_project(&mut self, index: usize) {
        let Some(project) = self.catalog.projects.get(index).cloned() else {
            return;
        };
        // Unmount whatever page was open first.
        self.player = None;
        self.selected_project = index;

        info!(project = %project.id, "opening project");
        let path = readme_path(&self.assets_dir, &project);
        let _ = self.channels.readme_tx.send(ReadmeCommand::Load {
            project_id: project.id.clone(),
            path,
        });

        if let Some(video) = project.video_path(&self.assets_dir) {
            self.media_generation += 1;
            let media = AudioElement::new(self.channels.player_tx.clone(), self.media_generation);
            let host = TerminalFullscreen::new(self.channels.event_tx.clone(), self.viewport);
            self.player = Some(DemoPlayer::mount(
                &video,
                Some(project.title.clone()),
                media,
                host,
            ));
        } else {
            debug!(project = %project.id, "no demo media on disk");
        }

        let screenshot = project
            .screenshot_paths(&self.assets_dir)
            .into_iter()
            .find(|p| p.is_file());
        let detail = ProjectDetail::compose(&project, None);

        self.route = Route::Project(ProjectPage {
            project,
            detail,
            readme: ReadmeState::Loading,
            screenshot,
        });
        self.scroll = 0;
        self.focus = Focus::Nav;
        self.pointer_over_player = false;
        self.layout_regions.player = ControlRegions::default();
    }

    /// Back to the project list. Dropping the player unloads the media and
    /// leaves fullscreen.
    pub fn leave_project(&mut self) {
        self.player = None;
        self.route = Route::Home;
        self.pointer_over_player = false;
        self.layout_regions.player = ControlRegions::default();
        self.set_section(Section::Projects);
    }

    fn scroll_down(&mut self, lines: u16) {
        self.scroll = self
            .scroll
            .saturating_add(lines)
            .min(self.layout_regions.max_scroll);
    }

    fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    fn player_action(&mut self, action: ControlAction, now: Instant) {
        if let Some(player) = self.player.as_mut() {
            player.apply(action, now);
        }
    }

    fn submit_contact(&mut self, now: Instant) {
        match self.contact.begin_submit() {
            Ok(params) => {
                if self
                    .channels
                    .contact_tx
                    .send(ContactCommand::Send(params))
                    .is_err()
                {
                    self.on_contact_failed("Failed to send message. Relay is not running.".into(), now);
                }
            }
            Err(FormError::InFlight) => {}
            Err(err) => self.notifications.warning(err.to_string()),
        }
    }

    // Worker events

    pub fn on_readme_loaded(&mut self, project_id: &str, markdown: &str) {
        let Route::Project(page) = &mut self.route else {
            return;
        };
        if page.project.id != project_id {
            return;
        }
        let document = Document::parse(markdown);
        let summary = summarize(&document);
        page.detail = ProjectDetail::compose(&page.project, Some(&summary));
        page.readme = ReadmeState::Loaded(document);
    }

    pub fn on_readme_unavailable(&mut self, project_id: &str, reason: String) {
        let Route::Project(page) = &mut self.route else {
            return;
        };
        if page.project.id == project_id {
            page.readme = ReadmeState::Unavailable(reason);
        }
    }

    /// Applies a decoder event to the mounted player. Events left over from
    /// an earlier source are dropped.
    pub fn on_media_event(&mut self, generation: u64, event: MediaEvent, now: Instant) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        if player.media().generation() != generation {
            debug!(generation, ?event, "dropping stale media event");
            return;
        }
        if let MediaEvent::Error(reason) = &event {
            self.notifications.warning(format!("Playback error: {reason}"));
        }
        player.on_native_event(event, now);
    }

    pub fn on_fullscreen_changed(&mut self, active: bool) {
        if let Some(player) = self.player.as_mut() {
            player.on_fullscreen_change(active);
        }
    }

    pub fn on_resize(&mut self, width: u16, height: u16) {
        self.viewport = (width, height);
        let Some(player) = self.player.as_mut() else {
            return;
        };
        let host = player.fullscreen_host_mut();
        host.set_viewport(width, height);
        let (min_width, min_height) = MIN_FULLSCREEN;
        if host.is_fullscreen() && (width < min_width || height < min_height) {
            if let Err(err) = host.exit() {
                warn!(%err, "could not leave fullscreen after resize");
            }
        }
    }

    pub fn on_contact_sent(&mut self, now: Instant) {
        self.contact.on_sent(now);
        self.notifications
            .success("Message sent! Thanks for reaching out.");
    }

    pub fn on_contact_failed(&mut self, message: String, now: Instant) {
        self.notifications.error(message.clone());
        self.contact.on_failed(message, now);
    }

    /// Advances timers: notifications, the hide deadline, form banners and
    /// the hero backdrop, which exists only while the hero is on screen.
    pub fn tick(&mut self, now: Instant) {
        self.notifications.tick(now);
        self.loading.tick(now);
        self.contact.tick(now);
        if let Some(player) = self.player.as_mut() {
            player.tick(now);
        }

        let on_hero = matches!(self.route, Route::Home) && self.section == Section::Home;
        if on_hero {
            self.particles
                .get_or_insert_with(|| ParticleField::new(particle_seed(), now))
                .tick(now);
        } else {
            self.particles = None;
        }
    }

    // Input

    pub fn handle_input(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if matches!(self.route, Route::Project(_)) {
            self.handle_project_key(key, now);
        } else if self.focus == Focus::Form {
            self.handle_form_key(key, now);
        } else {
            self.handle_home_key(key);
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::Char('l') | KeyCode::Right => self.next_section(),
            KeyCode::BackTab | KeyCode::Char('h') | KeyCode::Left => self.previous_section(),
            KeyCode::Char(c @ '1'..='6') => {
                let index = c as usize - '1' as usize;
                self.set_section(Section::ALL[index]);
            }
            KeyCode::Char('j') | KeyCode::Down => match self.section {
                Section::Projects => self.next_project(),
                _ => self.scroll_down(1),
            },
            KeyCode::Char('k') | KeyCode::Up => match self.section {
                Section::Projects => self.previous_project(),
                _ => self.scroll_up(1),
            },
            KeyCode::Enter => match self.section {
                Section::Home => self.set_section(Section::Projects),
                Section::Projects => self.open_project(self.selected_project),
                Section::Contact => self.focus = Focus::Form,
                _ => {}
            },
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Esc => self.focus = Focus::Nav,
            KeyCode::Tab | KeyCode::Down => self.contact.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.contact.focus_prev(),
            KeyCode::Enter => match self.contact.focus {
                Field::Send => self.submit_contact(now),
                Field::Message => self.contact.insert_char('\n'),
                Field::Name | Field::Email => self.contact.focus_next(),
            },
            KeyCode::Backspace => self.contact.backspace(),
            KeyCode::Char(c) => self.contact.insert_char(c),
            _ => {}
        }
    }

    fn handle_project_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Esc if self.is_fullscreen() => {
                if let Some(player) = self.player.as_mut() {
                    if let Err(err) = player.fullscreen_host_mut().exit() {
                        warn!(%err, "could not leave fullscreen");
                    }
                }
            }
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => self.leave_project(),
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(' ') | KeyCode::Char('p') => {
                self.player_action(ControlAction::TogglePlay, now)
            }
            KeyCode::Left => self.player_action(ControlAction::SkipBack, now),
            KeyCode::Right => self.player_action(ControlAction::SkipForward, now),
            KeyCode::Char('m') => self.player_action(ControlAction::ToggleMute, now),
            KeyCode::Char('f') => self.player_action(ControlAction::ToggleFullscreen, now),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.player_action(ControlAction::VolumeUp, now)
            }
            KeyCode::Char('-') => self.player_action(ControlAction::VolumeDown, now),
            KeyCode::Char('j') | KeyCode::Down => self.scroll_down(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_up(1),
            KeyCode::PageDown => self.scroll_down(10),
            KeyCode::PageUp => self.scroll_up(10),
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, event: MouseEvent, now: Instant) {
        let (x, y) = (event.column, event.row);
        match event.kind {
            MouseEventKind::Moved => self.pointer_moved(x, y, now),
            MouseEventKind::Down(MouseButton::Left) => self.click(x, y, now),
            MouseEventKind::Drag(MouseButton::Left) => {
                self.pointer_moved(x, y, now);
                // Dragging scrubs the sliders.
                match self.layout_regions.player.hit(x, y) {
                    Some(action @ (ControlAction::Seek(_) | ControlAction::SetVolume(_))) => {
                        self.player_action(action, now)
                    }
                    _ => {}
                }
            }
            MouseEventKind::ScrollDown => self.scroll_down(3),
            MouseEventKind::ScrollUp => self.scroll_up(3),
            _ => {}
        }
    }

    fn pointer_moved(&mut self, x: u16, y: u16, now: Instant) {
        let over_player = self.layout_regions.player.contains_pointer(x, y);
        if let Some(player) = self.player.as_mut() {
            if over_player {
                player.pointer_moved(now);
            } else if self.pointer_over_player {
                player.pointer_left(now);
            }
        }
        self.pointer_over_player = over_player;

        self.hovered_card = self
            .layout_regions
            .project_cards
            .iter()
            .find(|(r, _)| r.contains(Position::new(x, y)))
            .map(|&(_, index)| index);

        if let (Some(field), Some(hero)) = (self.particles.as_mut(), self.layout_regions.hero) {
            field.pointer_moved(hero, x, y);
        }
    }

    fn click(&mut self, x: u16, y: u16, now: Instant) {
        let at = Position::new(x, y);

        if let Some(&(_, index)) = self.layout_regions.tabs.iter().find(|(r, _)| r.contains(at)) {
            self.activate_nav(index);
            return;
        }

        if self.layout_regions.back.is_some_and(|r| r.contains(at)) {
            self.leave_project();
            return;
        }

        if self.player.is_some() && self.layout_regions.player.contains_pointer(x, y) {
            // A click on the media itself toggles playback.
            let action = self
                .layout_regions
                .player
                .hit(x, y)
                .unwrap_or(ControlAction::TogglePlay);
            self.player_action(action, now);
            return;
        }

        if let Some(&(_, index)) = self
            .layout_regions
            .project_cards
            .iter()
            .find(|(r, _)| r.contains(at))
        {
            self.open_project(index);
            return;
        }

        if let Some(&(_, field)) = self
            .layout_regions
            .contact_fields
            .iter()
            .find(|(r, _)| r.contains(at))
        {
            self.focus = Focus::Form;
            self.contact.focus = field;
            if field == Field::Send {
                self.submit_contact(now);
            }
        }
    }
}

fn particle_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
