use std::time::{Duration, Instant};

/// Inactivity window after which the controls disappear during playback.
pub const HIDE_DELAY: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Debounced single-shot hide timer for the controls overlay.
///
/// The pending hide is a stored deadline rather than a live callback: every
/// qualifying event cancels it and schedules a fresh one, and the event loop
/// calls [`AutoHideTimer::poll`] to fire it. Only one deadline exists at a
/// time.
#[derive(Debug, Clone)]
pub struct AutoHideTimer {
    delay: Duration,
    visibility: Visibility,
    deadline: Option<Instant>,
}

impl AutoHideTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            visibility: Visibility::Visible,
            deadline: None,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Pointer move/enter or a control intent. Shows the controls at once.
    /// The countdown restarts only when playing with the pointer elsewhere;
    /// while hovered there is no pending hide.
    pub fn activity(&mut self, now: Instant, playing: bool, hovered: bool) {
        self.visibility = Visibility::Visible;
        self.reschedule(now, playing && !hovered);
    }

    /// Pointer left the player: the countdown restarts but nothing is shown.
    pub fn pointer_left(&mut self, now: Instant, playing: bool) {
        self.reschedule(now, playing);
    }

    pub fn playback_changed(&mut self, now: Instant, playing: bool, hovered: bool) {
        if !playing {
            self.visibility = Visibility::Visible;
        }
        self.reschedule(now, playing && !hovered);
    }

    /// Fires the pending hide if its deadline has passed. Returns `true` on
    /// the Visible → Hidden transition.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                let was_visible = self.is_visible();
                self.visibility = Visibility::Hidden;
                was_visible
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    fn reschedule(&mut self, now: Instant, armed: bool) {
        self.deadline = armed.then(|| now + self.delay);
    }
}

impl Default for AutoHideTimer {
    fn default() -> Self {
        Self::new(HIDE_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn hides_at_three_seconds_not_before() {
        let t0 = Instant::now();
        let mut timer = AutoHideTimer::default();
        timer.playback_changed(t0, true, false);

        assert!(!timer.poll(t0 + ms(2999)));
        assert!(timer.is_visible());

        assert!(timer.poll(t0 + ms(3000)));
        assert_eq!(timer.visibility(), Visibility::Hidden);
    }

    #[test]
    fn activity_debounces_instead_of_accumulating() {
        let t0 = Instant::now();
        let mut timer = AutoHideTimer::default();
        timer.playback_changed(t0, true, false);
        timer.activity(t0 + ms(2000), true, false);
        timer.activity(t0 + ms(2500), true, false);

        assert!(!timer.poll(t0 + ms(5000)));
        assert!(timer.is_visible());
        assert!(timer.poll(t0 + ms(5500)));
    }

    #[test]
    fn activity_while_hidden_shows_immediately() {
        let t0 = Instant::now();
        let mut timer = AutoHideTimer::default();
        timer.playback_changed(t0, true, false);
        timer.poll(t0 + ms(3000));
        assert!(!timer.is_visible());

        timer.activity(t0 + ms(3100), true, false);
        assert!(timer.is_visible());
        assert_eq!(timer.deadline(), Some(t0 + ms(6100)));
    }

    #[test]
    fn never_hides_while_paused() {
        let t0 = Instant::now();
        let mut timer = AutoHideTimer::default();
        timer.activity(t0, false, false);
        assert_eq!(timer.deadline(), None);
        assert!(!timer.poll(t0 + ms(60_000)));
        assert!(timer.is_visible());
    }

    #[test]
    fn pausing_cancels_pending_hide_and_shows() {
        let t0 = Instant::now();
        let mut timer = AutoHideTimer::default();
        timer.playback_changed(t0, true, false);
        timer.poll(t0 + ms(3000));
        timer.playback_changed(t0 + ms(3200), false, false);

        assert!(timer.is_visible());
        assert_eq!(timer.deadline(), None);
    }

    #[test]
    fn leaving_restarts_countdown_without_showing() {
        let t0 = Instant::now();
        let mut timer = AutoHideTimer::default();
        timer.playback_changed(t0, true, false);
        timer.poll(t0 + ms(3000));
        timer.pointer_left(t0 + ms(3500), true);

        assert!(!timer.is_visible());
        assert_eq!(timer.deadline(), Some(t0 + ms(6500)));
        assert!(!timer.poll(t0 + ms(6500)), "already hidden");
    }

    #[test]
    fn hovering_holds_controls_until_pointer_leaves() {
        let t0 = Instant::now();
        let mut timer = AutoHideTimer::default();
        timer.playback_changed(t0, true, false);
        timer.activity(t0 + ms(100), true, true);

        assert_eq!(timer.deadline(), None);
        assert!(!timer.poll(t0 + ms(10_000)));
        assert!(timer.is_visible());

        timer.pointer_left(t0 + ms(10_000), true);
        assert!(!timer.poll(t0 + ms(12_999)));
        assert!(timer.poll(t0 + ms(13_000)));
    }

    #[test]
    fn playback_starting_under_the_pointer_schedules_nothing() {
        let t0 = Instant::now();
        let mut timer = AutoHideTimer::default();
        timer.playback_changed(t0, true, true);
        assert_eq!(timer.deadline(), None);
        assert!(!timer.poll(t0 + ms(5000)));
    }
}
