use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn prefix(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "ℹ INFO",
            NotificationLevel::Success => "✔ SENT",
            NotificationLevel::Warning => "! WARN",
            NotificationLevel::Error => "✖ ERROR",
        }
    }

    pub fn lifetime(&self) -> Duration {
        match self {
            NotificationLevel::Info => Duration::from_secs(2),
            NotificationLevel::Success => Duration::from_secs(5),
            NotificationLevel::Warning => Duration::from_secs(3),
            NotificationLevel::Error => Duration::from_secs(8),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub text: String,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) >= self.duration
    }
}

#[derive(Debug, Default)]
pub struct NotificationManager {
    notifications: Vec<Notification>,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self {
            notifications: Vec::new(),
        }
    }

    pub fn notify_at(&mut self, level: NotificationLevel, text: impl Into<String>, now: Instant) {
        self.notifications.push(Notification {
            level,
            text: text.into(),
            created_at: now,
            duration: level.lifetime(),
        });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.notify_at(NotificationLevel::Info, text, Instant::now());
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.notify_at(NotificationLevel::Success, text, Instant::now());
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.notify_at(NotificationLevel::Warning, text, Instant::now());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.notify_at(NotificationLevel::Error, text, Instant::now());
    }

    pub fn tick(&mut self, now: Instant) {
        self.notifications.retain(|n| !n.is_expired(now));
    }

    pub fn active_notifications(&self) -> &[Notification] {
        &self.notifications
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_expire_at_their_own_pace() {
        let t0 = Instant::now();
        let mut manager = NotificationManager::new();
        manager.notify_at(NotificationLevel::Info, "hi", t0);
        manager.notify_at(NotificationLevel::Error, "boom", t0);

        manager.tick(t0 + Duration::from_secs(2));
        assert_eq!(manager.active_notifications().len(), 1);
        assert_eq!(manager.active_notifications()[0].text, "boom");

        manager.tick(t0 + Duration::from_secs(8));
        assert!(manager.active_notifications().is_empty());
    }
}
