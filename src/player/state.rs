use crate::player::media::MediaEvent;

/// Transport state of one mounted player.
///
/// The media element is the source of truth for `is_playing`, `current_time`
/// and `duration`; they only change through [`PlaybackState::apply`]. Volume
/// and mute flow the other way: they are set here and pushed to the element.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub is_muted: bool,
    pub volume: f64,
    pub current_time: f64,
    /// `None` until the element reports metadata.
    pub duration: Option<f64>,
    /// Mirrors the fullscreen host. Never written by user intents.
    pub is_fullscreen: bool,
    pub controls_visible: bool,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self {
            is_playing: false,
            is_muted: false,
            volume: 1.0,
            current_time: 0.0,
            duration: None,
            is_fullscreen: false,
            controls_visible: true,
        }
    }

    /// A zero volume reads as muted whatever `is_muted` says.
    pub fn displays_muted(&self) -> bool {
        self.is_muted || self.volume == 0.0
    }

    /// Clamps a position into `[0, duration]`, or `[0, ∞)` while the
    /// duration is unknown.
    pub fn clamp_time(&self, seconds: f64) -> f64 {
        let lower = seconds.max(0.0);
        match self.duration {
            Some(duration) => lower.min(duration),
            None => lower,
        }
    }

    /// Mirrors a native media event into the store.
    pub fn apply(&mut self, event: &MediaEvent) {
        match event {
            MediaEvent::Play => self.is_playing = true,
            MediaEvent::Pause | MediaEvent::Ended | MediaEvent::Error(_) => {
                self.is_playing = false
            }
            MediaEvent::TimeUpdate(seconds) => {
                if seconds.is_finite() {
                    self.current_time = self.clamp_time(*seconds);
                }
            }
            MediaEvent::LoadedMetadata { duration } => {
                self.duration = (duration.is_finite() && *duration >= 0.0).then_some(*duration);
                self.current_time = self.clamp_time(self.current_time);
            }
        }
    }

    /// Where a seek to `target` lands, or `None` for a non-finite target.
    pub fn seek_target(&self, target: f64) -> Option<f64> {
        target.is_finite().then(|| self.clamp_time(target))
    }

    pub fn skip_target(&self, delta: f64) -> Option<f64> {
        self.seek_target(self.current_time + delta)
    }

    /// Returns `false` when `volume` is not a number and nothing changed.
    pub fn set_volume(&mut self, volume: f64) -> bool {
        if volume.is_nan() {
            return false;
        }
        self.volume = volume.clamp(0.0, 1.0);
        self.is_muted = self.volume == 0.0;
        true
    }

    pub fn toggle_mute(&mut self) {
        self.is_muted = !self.is_muted;
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_duration(duration: f64, current: f64) -> PlaybackState {
        let mut state = PlaybackState::new();
        state.apply(&MediaEvent::LoadedMetadata { duration });
        state.apply(&MediaEvent::TimeUpdate(current));
        state
    }

    #[test]
    fn set_volume_stores_value_and_mutes_only_at_zero() {
        let mut state = PlaybackState::new();
        for step in 0..=100 {
            let v = step as f64 / 100.0;
            assert!(state.set_volume(v));
            assert_eq!(state.volume, v);
            assert_eq!(state.displays_muted(), v == 0.0, "volume {v}");
        }
    }

    #[test]
    fn positive_volume_unmutes() {
        let mut state = PlaybackState::new();
        state.toggle_mute();
        assert!(state.is_muted);
        state.set_volume(0.4);
        assert!(!state.is_muted);
    }

    #[test]
    fn set_volume_clamps_out_of_range() {
        let mut state = PlaybackState::new();
        state.set_volume(3.0);
        assert_eq!(state.volume, 1.0);
        state.set_volume(-1.0);
        assert_eq!(state.volume, 0.0);
        assert!(!state.set_volume(f64::NAN));
        assert_eq!(state.volume, 0.0);
    }

    #[test]
    fn double_toggle_mute_keeps_volume() {
        let mut state = PlaybackState::new();
        state.set_volume(0.37);
        state.toggle_mute();
        assert!(state.displays_muted());
        assert_eq!(state.volume, 0.37);
        state.toggle_mute();
        assert!(!state.displays_muted());
        assert_eq!(state.volume, 0.37);
    }

    #[test]
    fn skip_target_stays_in_bounds() {
        let state = with_duration(60.0, 30.0);
        for delta in [-1000.0, -31.0, -10.0, 0.0, 10.0, 29.0, 31.0, 1e9] {
            let landed = state.skip_target(delta).unwrap();
            assert!((0.0..=60.0).contains(&landed), "delta {delta} → {landed}");
        }
        assert_eq!(state.skip_target(1e9), Some(60.0));
    }

    #[test]
    fn skip_back_from_five_seconds_clamps_to_zero() {
        let state = with_duration(120.0, 5.0);
        assert_eq!(state.skip_target(-10.0), Some(0.0));
    }

    #[test]
    fn unknown_duration_only_clamps_below() {
        let state = PlaybackState::new();
        assert_eq!(state.seek_target(-4.0), Some(0.0));
        assert_eq!(state.seek_target(500.0), Some(500.0));
        assert_eq!(state.seek_target(f64::NAN), None);
    }

    #[test]
    fn metadata_with_nan_duration_stays_unknown() {
        let mut state = PlaybackState::new();
        state.apply(&MediaEvent::LoadedMetadata { duration: f64::NAN });
        assert_eq!(state.duration, None);
    }

    #[test]
    fn time_updates_never_exceed_duration() {
        let mut state = with_duration(10.0, 4.0);
        state.apply(&MediaEvent::TimeUpdate(12.5));
        assert_eq!(state.current_time, 10.0);
        state.apply(&MediaEvent::TimeUpdate(f64::NAN));
        assert_eq!(state.current_time, 10.0);
    }

    #[test]
    fn play_pause_and_ended_drive_is_playing() {
        let mut state = PlaybackState::new();
        state.apply(&MediaEvent::Play);
        assert!(state.is_playing);
        state.apply(&MediaEvent::Ended);
        assert!(!state.is_playing);
        state.apply(&MediaEvent::Play);
        state.apply(&MediaEvent::Error("decoder".into()));
        assert!(!state.is_playing);
    }
}
