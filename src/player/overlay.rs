//! Presentation math for the controls overlay: labels, fill ratios and the
//! mapping from clicks on the drawn controls back to intents.

use ratatui::layout::Rect;

use crate::player::state::PlaybackState;

pub const SKIP_SECONDS: f64 = 10.0;
/// Volume slider positions per unit (step 0.01).
pub const VOLUME_STEPS: f64 = 100.0;
/// Volume change per key press.
pub const VOLUME_KEY_STEP: f64 = 0.05;

/// `m:ss`, with `0:00` for NaN and other non-finite values.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() {
        return "0:00".to_string();
    }
    let total = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Seek bar fill in percent; 0 while the duration is unknown.
pub fn progress_percent(current: f64, duration: Option<f64>) -> f64 {
    match duration {
        Some(duration) if duration > 0.0 => (current / duration * 100.0).clamp(0.0, 100.0),
        _ => 0.0,
    }
}

pub fn time_label(state: &PlaybackState) -> String {
    format!(
        "{} / {}",
        format_time(state.current_time),
        format_time(state.duration.unwrap_or(f64::NAN))
    )
}

/// Rounds to the slider step and clamps to `[0, 1]`.
pub fn quantize_volume(volume: f64) -> f64 {
    ((volume * VOLUME_STEPS).round() / VOLUME_STEPS).clamp(0.0, 1.0)
}

/// User intents issued by the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlAction {
    TogglePlay,
    SkipBack,
    SkipForward,
    ToggleMute,
    ToggleFullscreen,
    Seek(f64),
    SetVolume(f64),
    VolumeUp,
    VolumeDown,
}

/// Everything the renderer needs, derived from one [`PlaybackState`].
#[derive(Debug, Clone, PartialEq)]
pub struct ControlsView {
    pub visible: bool,
    /// Large play glyph over the media while paused and not hovered.
    pub show_play_glyph: bool,
    pub playing: bool,
    pub play_label: &'static str,
    pub muted: bool,
    pub mute_label: &'static str,
    pub fullscreen: bool,
    pub fullscreen_label: &'static str,
    pub progress: f64,
    pub volume: f64,
    pub time_label: String,
    pub title: Option<String>,
}

impl ControlsView {
    pub fn new(state: &PlaybackState, title: Option<&str>, hovered: bool) -> Self {
        Self {
            visible: state.controls_visible,
            show_play_glyph: !state.is_playing && !hovered,
            playing: state.is_playing,
            play_label: if state.is_playing { "Pause" } else { "Play" },
            muted: state.displays_muted(),
            mute_label: if state.displays_muted() { "Unmute" } else { "Mute" },
            fullscreen: state.is_fullscreen,
            fullscreen_label: if state.is_fullscreen {
                "Exit fullscreen"
            } else {
                "Enter fullscreen"
            },
            progress: progress_percent(state.current_time, state.duration),
            volume: state.volume,
            time_label: time_label(state),
            title: title.map(str::to_string),
        }
    }
}

/// Screen rectangles of the drawn controls, recorded while rendering.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ControlRegions {
    pub surface: Option<Rect>,
    pub seek: Option<Rect>,
    pub play: Option<Rect>,
    pub skip_back: Option<Rect>,
    pub skip_forward: Option<Rect>,
    pub mute: Option<Rect>,
    pub volume: Option<Rect>,
    pub fullscreen: Option<Rect>,
    /// Seek bar upper bound: the duration, or 0 when unknown.
    pub seek_max: f64,
}

impl ControlRegions {
    pub fn contains_pointer(&self, column: u16, row: u16) -> bool {
        self.surface.is_some_and(|r| contains(&r, column, row))
    }

    /// Maps a click to the control under it.
    pub fn hit(&self, column: u16, row: u16) -> Option<ControlAction> {
        let inside = |rect: &Option<Rect>| rect.is_some_and(|r| contains(&r, column, row));

        if let Some(seek) = self.seek.filter(|r| contains(r, column, row)) {
            return Some(ControlAction::Seek(slider_fraction(&seek, column) * self.seek_max));
        }
        if let Some(volume) = self.volume.filter(|r| contains(r, column, row)) {
            return Some(ControlAction::SetVolume(quantize_volume(slider_fraction(
                &volume, column,
            ))));
        }
        if inside(&self.play) {
            Some(ControlAction::TogglePlay)
        } else if inside(&self.skip_back) {
            Some(ControlAction::SkipBack)
        } else if inside(&self.skip_forward) {
            Some(ControlAction::SkipForward)
        } else if inside(&self.mute) {
            Some(ControlAction::ToggleMute)
        } else if inside(&self.fullscreen) {
            Some(ControlAction::ToggleFullscreen)
        } else {
            None
        }
    }
}

fn contains(rect: &Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

/// Position of `column` along a horizontal slider, `0.0` at the left cell and
/// `1.0` at the right one.
pub fn slider_fraction(rect: &Rect, column: u16) -> f64 {
    if rect.width <= 1 {
        return 0.0;
    }
    let offset = column.saturating_sub(rect.x).min(rect.width - 1);
    offset as f64 / (rect.width - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::media::MediaEvent;

    #[test]
    fn unknown_duration_formats_as_zero() {
        let state = PlaybackState::new();
        assert_eq!(time_label(&state), "0:00 / 0:00");
        assert_eq!(progress_percent(state.current_time, state.duration), 0.0);
    }

    #[test]
    fn progress_and_label_mid_playback() {
        let mut state = PlaybackState::new();
        state.apply(&MediaEvent::LoadedMetadata { duration: 125.0 });
        state.apply(&MediaEvent::TimeUpdate(65.0));

        let progress = progress_percent(state.current_time, state.duration);
        assert!((progress - 52.0).abs() < 1e-9, "{progress}");
        assert_eq!(time_label(&state), "1:05 / 2:05");
    }

    #[test]
    fn format_time_pads_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(9.99), "0:09");
        assert_eq!(format_time(600.0), "10:00");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
    }

    #[test]
    fn view_reflects_state() {
        let mut state = PlaybackState::new();
        state.set_volume(0.0);
        let view = ControlsView::new(&state, Some("Demo"), false);
        assert!(view.muted);
        assert!(view.show_play_glyph);
        assert_eq!(view.play_label, "Play");
        assert_eq!(view.fullscreen_label, "Enter fullscreen");

        state.apply(&MediaEvent::Play);
        let view = ControlsView::new(&state, None, true);
        assert_eq!(view.play_label, "Pause");
        assert!(!view.show_play_glyph);
    }

    #[test]
    fn mute_label_follows_displayed_mute() {
        let mut state = PlaybackState::new();
        state.set_volume(0.0);
        state.toggle_mute();
        assert!(!state.is_muted);

        let view = ControlsView::new(&state, None, false);
        assert!(view.muted);
        assert_eq!(view.mute_label, "Unmute");

        state.set_volume(0.4);
        let view = ControlsView::new(&state, None, false);
        assert!(!view.muted);
        assert_eq!(view.mute_label, "Mute");
    }

    #[test]
    fn clicks_map_to_actions() {
        let regions = ControlRegions {
            surface: Some(Rect::new(0, 0, 40, 10)),
            seek: Some(Rect::new(2, 7, 21, 1)),
            play: Some(Rect::new(2, 8, 8, 1)),
            volume: Some(Rect::new(20, 8, 11, 1)),
            fullscreen: Some(Rect::new(34, 8, 4, 1)),
            seek_max: 200.0,
            ..Default::default()
        };

        assert_eq!(regions.hit(3, 8), Some(ControlAction::TogglePlay));
        assert_eq!(regions.hit(35, 8), Some(ControlAction::ToggleFullscreen));
        assert_eq!(regions.hit(12, 7), Some(ControlAction::Seek(100.0)));
        assert_eq!(regions.hit(25, 8), Some(ControlAction::SetVolume(0.5)));
        assert_eq!(regions.hit(0, 0), None);
        assert!(regions.contains_pointer(39, 9));
        assert!(!regions.contains_pointer(40, 9));
    }

    #[test]
    fn quantize_snaps_to_step() {
        assert_eq!(quantize_volume(0.333), 0.33);
        assert_eq!(quantize_volume(1.2), 1.0);
        assert_eq!(quantize_volume(-0.1), 0.0);
    }
}
