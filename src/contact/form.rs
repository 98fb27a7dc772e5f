use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;

/// How long the "sent" banner stays up.
pub const SENT_LINGER: Duration = Duration::from_secs(5);
/// Failures linger longer so configuration hints can be read.
pub const FAILED_LINGER: Duration = Duration::from_secs(8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Message,
    Send,
}

impl Field {
    pub fn next(self) -> Self {
        match self {
            Field::Name => Field::Email,
            Field::Email => Field::Message,
            Field::Message => Field::Send,
            Field::Send => Field::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Field::Name => Field::Send,
            Field::Email => Field::Name,
            Field::Message => Field::Email,
            Field::Send => Field::Message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    Idle,
    Sending,
    Sent { since: Instant },
    Failed { message: String, since: Instant },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("A message is already being sent")]
    InFlight,
}

/// Payload handed to the relay's template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateParams {
    pub from_name: String,
    pub from_email: String,
    pub message: String,
    pub reply_to: String,
}

#[derive(Debug, Clone)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    pub focus: Field,
    status: SubmitStatus,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactForm {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            message: String::new(),
            focus: Field::Name,
            status: SubmitStatus::Idle,
        }
    }

    pub fn status(&self) -> &SubmitStatus {
        &self.status
    }

    pub fn is_sending(&self) -> bool {
        self.status == SubmitStatus::Sending
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
            Field::Send => "",
        }
    }

    fn focused_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::Name => Some(&mut self.name),
            Field::Email => Some(&mut self.email),
            Field::Message => Some(&mut self.message),
            Field::Send => None,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if self.is_sending() {
            return;
        }
        // Only the message takes line breaks.
        if c == '\n' && self.focus != Field::Message {
            return;
        }
        if let Some(value) = self.focused_mut() {
            value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.is_sending() {
            return;
        }
        if let Some(value) = self.focused_mut() {
            value.pop();
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn validate(&self) -> Result<TemplateParams, FormError> {
        let name = self.name.trim();
        let email = self.email.trim();
        let message = self.message.trim();

        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Err(FormError::MissingFields);
        }
        if !is_valid_email(email) {
            return Err(FormError::InvalidEmail);
        }

        Ok(TemplateParams {
            from_name: name.to_string(),
            from_email: email.to_string(),
            message: compose_message(name, email, message),
            reply_to: email.to_string(),
        })
    }

    /// Validates and moves to `Sending`. The caller hands the params to the
    /// relay worker.
    pub fn begin_submit(&mut self) -> Result<TemplateParams, FormError> {
        if self.is_sending() {
            return Err(FormError::InFlight);
        }
        let params = self.validate()?;
        self.status = SubmitStatus::Sending;
        Ok(params)
    }

    pub fn on_sent(&mut self, now: Instant) {
        self.name.clear();
        self.email.clear();
        self.message.clear();
        self.focus = Field::Name;
        self.status = SubmitStatus::Sent { since: now };
    }

    pub fn on_failed(&mut self, message: String, now: Instant) {
        self.status = SubmitStatus::Failed {
            message,
            since: now,
        };
    }

    /// Clears an expired result banner.
    pub fn tick(&mut self, now: Instant) {
        let expired = match &self.status {
            SubmitStatus::Sent { since } => now.duration_since(*since) >= SENT_LINGER,
            SubmitStatus::Failed { since, .. } => now.duration_since(*since) >= FAILED_LINGER,
            _ => false,
        };
        if expired {
            self.status = SubmitStatus::Idle;
        }
    }
}

pub fn compose_message(name: &str, email: &str, message: &str) -> String {
    format!("{message}\n\n---\nName: {name}\nEmail: {email}")
}

/// Something before an `@`, and a dot with text on both sides after it.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rfind('.') {
        Some(dot) => domain.find('.').is_some_and(|first| first > 0) && dot + 1 < domain.len(),
        None => false,
    }
}
