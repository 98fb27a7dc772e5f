use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::player::autohide::AutoHideTimer;
use crate::player::fullscreen::FullscreenHost;
use crate::player::media::{MediaElement, MediaEvent};
use crate::player::overlay::{ControlAction, ControlsView, SKIP_SECONDS, VOLUME_KEY_STEP};
use crate::player::state::PlaybackState;

/// One mounted player: the playback store bound to a single media element,
/// a fullscreen host and the controls' auto-hide timer.
///
/// Dropping the controller unmounts it: the hide deadline is cleared, the
/// element unloaded and fullscreen left.
pub struct PlayerController<M: MediaElement, F: FullscreenHost> {
    source: PathBuf,
    title: Option<String>,
    state: PlaybackState,
    media: M,
    fullscreen: F,
    auto_hide: AutoHideTimer,
    hovered: bool,
}

impl<M: MediaElement, F: FullscreenHost> PlayerController<M, F> {
    pub fn mount(source: &Path, title: Option<String>, media: M, fullscreen: F) -> Self {
        let mut controller = Self {
            source: source.to_path_buf(),
            title,
            state: PlaybackState::new(),
            media,
            fullscreen,
            auto_hide: AutoHideTimer::default(),
            hovered: false,
        };

        info!(source = %controller.source.display(), "mounting player");
        if let Err(err) = controller.media.load(source) {
            warn!(%err, source = %controller.source.display(), "media element refused source");
        }
        controller.sync_audio();
        controller
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn view(&self) -> ControlsView {
        ControlsView::new(&self.state, self.title.as_deref(), self.hovered)
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn fullscreen_host(&self) -> &F {
        &self.fullscreen
    }

    pub fn fullscreen_host_mut(&mut self) -> &mut F {
        &mut self.fullscreen
    }

    pub fn on_native_event(&mut self, event: MediaEvent, now: Instant) {
        let was_playing = self.state.is_playing;
        if let MediaEvent::Error(reason) = &event {
            warn!(%reason, "media element error");
        }
        self.state.apply(&event);

        if was_playing != self.state.is_playing {
            debug!(playing = self.state.is_playing, "playback changed");
            self.auto_hide
                .playback_changed(now, self.state.is_playing, self.hovered);
            self.sync_visibility();
        }
    }

    /// Mirrors the host's fullscreen flag after a change notification.
    pub fn on_fullscreen_change(&mut self, active: bool) {
        self.state.is_fullscreen = active;
    }

    pub fn toggle_play(&mut self) {
        let result = if self.state.is_playing {
            self.media.pause()
        } else {
            self.media.play()
        };
        // `is_playing` follows the element's play/pause events, so a refused
        // call leaves it where it was.
        if let Err(err) = result {
            warn!(%err, "play/pause rejected");
        }
    }

    pub fn seek(&mut self, target: f64) {
        let Some(landed) = self.state.seek_target(target) else {
            return;
        };
        if let Err(err) = self.media.set_current_time(landed) {
            warn!(%err, "seek not forwarded");
        }
        self.state.current_time = landed;
    }

    pub fn skip(&mut self, delta: f64) {
        if let Some(landed) = self.state.skip_target(delta) {
            self.seek(landed);
        }
    }

    pub fn set_volume(&mut self, volume: f64) {
        if self.state.set_volume(volume) {
            self.sync_audio();
        }
    }

    pub fn toggle_mute(&mut self) {
        self.state.toggle_mute();
        self.sync_audio();
    }

    /// The flag itself only moves when the host announces the change.
    pub fn toggle_fullscreen(&mut self) {
        let result = if self.fullscreen.is_fullscreen() {
            self.fullscreen.exit()
        } else {
            self.fullscreen.request()
        };
        if let Err(err) = result {
            warn!(%err, "fullscreen toggle failed");
        }
    }

    /// Pointer entered or moved over the player.
    pub fn pointer_moved(&mut self, now: Instant) {
        self.hovered = true;
        self.auto_hide.activity(now, self.state.is_playing, true);
        self.sync_visibility();
    }

    pub fn pointer_left(&mut self, now: Instant) {
        self.hovered = false;
        self.auto_hide.pointer_left(now, self.state.is_playing);
        self.sync_visibility();
    }

    /// Fires the hide deadline when due.
    pub fn tick(&mut self, now: Instant) {
        if self.auto_hide.poll(now) {
            debug!("controls hidden");
        }
        self.sync_visibility();
    }

    /// Runs a control intent. Intents count as activity for the auto-hide
    /// timer, like pointer movement.
    pub fn apply(&mut self, action: ControlAction, now: Instant) {
        match action {
            ControlAction::TogglePlay => self.toggle_play(),
            ControlAction::SkipBack => self.skip(-SKIP_SECONDS),
            ControlAction::SkipForward => self.skip(SKIP_SECONDS),
            ControlAction::ToggleMute => self.toggle_mute(),
            ControlAction::ToggleFullscreen => self.toggle_fullscreen(),
            ControlAction::Seek(target) => self.seek(target),
            ControlAction::SetVolume(volume) => self.set_volume(volume),
            ControlAction::VolumeUp => self.set_volume(self.state.volume + VOLUME_KEY_STEP),
            ControlAction::VolumeDown => self.set_volume(self.state.volume - VOLUME_KEY_STEP),
        }
        self.auto_hide
            .activity(now, self.state.is_playing, self.hovered);
        self.sync_visibility();
    }

    fn sync_audio(&mut self) {
        if let Err(err) = self
            .media
            .set_volume(self.state.volume)
            .and_then(|()| self.media.set_muted(self.state.is_muted))
        {
            warn!(%err, "volume not applied");
        }
    }

    fn sync_visibility(&mut self) {
        self.state.controls_visible = self.auto_hide.is_visible();
    }
}

impl<M: MediaElement, F: FullscreenHost> Drop for PlayerController<M, F> {
    fn drop(&mut self) {
        self.auto_hide.cancel();
        if self.fullscreen.is_fullscreen() {
            if let Err(err) = self.fullscreen.exit() {
                warn!(%err, "fullscreen not left on unmount");
            }
        }
        self.media.unload();
        info!(source = %self.source.display(), "player unmounted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::fullscreen::FullscreenError;
    use crate::player::media::MediaError;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Load,
        Play,
        Pause,
        Seek(f64),
        Volume(f64),
        Muted(bool),
        Unload,
    }

    #[derive(Default, Clone)]
    struct FakeElement {
        calls: Rc<RefCell<Vec<Call>>>,
        reject_play: bool,
    }

    impl MediaElement for FakeElement {
        fn load(&mut self, _source: &Path) -> Result<(), MediaError> {
            self.calls.borrow_mut().push(Call::Load);
            Ok(())
        }
        fn play(&mut self) -> Result<(), MediaError> {
            if self.reject_play {
                return Err(MediaError::Rejected("autoplay policy".into()));
            }
            self.calls.borrow_mut().push(Call::Play);
            Ok(())
        }
        fn pause(&mut self) -> Result<(), MediaError> {
            self.calls.borrow_mut().push(Call::Pause);
            Ok(())
        }
        fn set_current_time(&mut self, seconds: f64) -> Result<(), MediaError> {
            self.calls.borrow_mut().push(Call::Seek(seconds));
            Ok(())
        }
        fn set_volume(&mut self, volume: f64) -> Result<(), MediaError> {
            self.calls.borrow_mut().push(Call::Volume(volume));
            Ok(())
        }
        fn set_muted(&mut self, muted: bool) -> Result<(), MediaError> {
            self.calls.borrow_mut().push(Call::Muted(muted));
            Ok(())
        }
        fn unload(&mut self) {
            self.calls.borrow_mut().push(Call::Unload);
        }
    }

    #[derive(Default)]
    struct FakeHost {
        active: bool,
        deny: bool,
        stuck: bool,
    }

    impl FullscreenHost for FakeHost {
        fn is_fullscreen(&self) -> bool {
            self.active
        }
        fn request(&mut self) -> Result<(), FullscreenError> {
            if self.deny {
                return Err(FullscreenError::Denied("not allowed".into()));
            }
            self.active = true;
            Ok(())
        }
        fn exit(&mut self) -> Result<(), FullscreenError> {
            if self.stuck {
                return Err(FullscreenError::Denied("host busy".into()));
            }
            self.active = false;
            Ok(())
        }
    }

    fn mounted(element: FakeElement) -> PlayerController<FakeElement, FakeHost> {
        PlayerController::mount(
            Path::new("demo.mp4"),
            Some("Demo".into()),
            element,
            FakeHost::default(),
        )
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn mount_loads_and_applies_volume() {
        let element = FakeElement::default();
        let calls = element.calls.clone();
        let _player = mounted(element);
        assert_eq!(
            *calls.borrow(),
            vec![Call::Load, Call::Volume(1.0), Call::Muted(false)]
        );
    }

    #[test]
    fn rejected_play_leaves_player_paused() {
        let mut player = mounted(FakeElement {
            reject_play: true,
            ..Default::default()
        });
        player.toggle_play();
        assert!(!player.state().is_playing);
    }

    #[test]
    fn toggle_play_follows_native_events() {
        let element = FakeElement::default();
        let calls = element.calls.clone();
        let mut player = mounted(element);
        let t0 = Instant::now();

        player.toggle_play();
        assert!(!player.state().is_playing, "waits for the play event");
        player.on_native_event(MediaEvent::Play, t0);
        player.toggle_play();

        let calls = calls.borrow();
        assert!(calls.contains(&Call::Play));
        assert_eq!(calls.last(), Some(&Call::Pause));
    }

    #[test]
    fn skip_back_is_clamped_and_forwarded() {
        let element = FakeElement::default();
        let calls = element.calls.clone();
        let mut player = mounted(element);
        let t0 = Instant::now();
        player.on_native_event(MediaEvent::LoadedMetadata { duration: 90.0 }, t0);
        player.on_native_event(MediaEvent::TimeUpdate(5.0), t0);

        player.skip(-10.0);
        assert_eq!(player.state().current_time, 0.0);
        assert_eq!(calls.borrow().last(), Some(&Call::Seek(0.0)));

        player.skip(1000.0);
        assert_eq!(player.state().current_time, 90.0);
    }

    #[test]
    fn mute_round_trip_restores_volume() {
        let element = FakeElement::default();
        let calls = element.calls.clone();
        let mut player = mounted(element);
        player.set_volume(0.62);
        player.toggle_mute();
        assert_eq!(calls.borrow().last(), Some(&Call::Muted(true)));
        player.toggle_mute();
        assert_eq!(player.state().volume, 0.62);
        assert!(!player.state().displays_muted());
    }

    #[test]
    fn controls_hide_after_idle_playback_and_return_on_pointer() {
        let mut player = mounted(FakeElement::default());
        let t0 = Instant::now();
        player.on_native_event(MediaEvent::Play, t0);

        player.tick(t0 + ms(2999));
        assert!(player.state().controls_visible);
        player.tick(t0 + ms(3000));
        assert!(!player.state().controls_visible);

        player.pointer_moved(t0 + ms(3010));
        assert!(player.state().controls_visible);
    }

    #[test]
    fn controls_stay_while_pointer_rests_on_player() {
        let mut player = mounted(FakeElement::default());
        let t0 = Instant::now();
        player.on_native_event(MediaEvent::Play, t0);
        player.pointer_moved(t0);

        player.tick(t0 + ms(3500));
        assert!(player.is_hovered() && player.state().is_playing);
        assert!(player.state().controls_visible);

        player.pointer_left(t0 + ms(4000));
        player.tick(t0 + ms(6999));
        assert!(player.state().controls_visible);
        player.tick(t0 + ms(7000));
        assert!(!player.state().controls_visible);
    }

    #[test]
    fn pause_event_shows_controls() {
        let mut player = mounted(FakeElement::default());
        let t0 = Instant::now();
        player.on_native_event(MediaEvent::Play, t0);
        player.tick(t0 + ms(4000));
        player.on_native_event(MediaEvent::Pause, t0 + ms(4100));
        assert!(player.state().controls_visible);
        player.tick(t0 + ms(60_000));
        assert!(player.state().controls_visible);
    }

    #[test]
    fn denied_fullscreen_leaves_state() {
        let mut player = PlayerController::mount(
            Path::new("demo.mp4"),
            None,
            FakeElement::default(),
            FakeHost {
                deny: true,
                ..Default::default()
            },
        );
        player.toggle_fullscreen();
        assert!(!player.state().is_fullscreen);
        assert!(!player.fullscreen_host().is_fullscreen());
    }

    #[test]
    fn fullscreen_flag_follows_host_notification() {
        let mut player = mounted(FakeElement::default());
        player.toggle_fullscreen();
        assert!(player.fullscreen_host().is_fullscreen());
        assert!(!player.state().is_fullscreen);
        player.on_fullscreen_change(true);
        assert!(player.state().is_fullscreen);
    }

    #[test]
    fn failed_fullscreen_exit_still_unloads_on_drop() {
        let element = FakeElement::default();
        let calls = element.calls.clone();
        let mut player = PlayerController::mount(
            Path::new("demo.mp4"),
            None,
            element,
            FakeHost {
                stuck: true,
                ..Default::default()
            },
        );
        player.toggle_fullscreen();
        assert!(player.fullscreen_host().is_fullscreen());
        drop(player);
        assert_eq!(calls.borrow().last(), Some(&Call::Unload));
    }

    #[test]
    fn drop_unloads_media() {
        let element = FakeElement::default();
        let calls = element.calls.clone();
        drop(mounted(element));
        assert_eq!(calls.borrow().last(), Some(&Call::Unload));
    }
}
