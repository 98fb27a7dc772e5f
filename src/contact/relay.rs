use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::form::TemplateParams;

pub const EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub template_id: String,
    #[serde(default)]
    pub public_key: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_endpoint() -> String {
    EMAILJS_ENDPOINT.to_string()
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
            endpoint: default_endpoint(),
        }
    }
}

impl RelayConfig {
    pub fn is_configured(&self) -> bool {
        !self.service_id.trim().is_empty()
            && !self.template_id.trim().is_empty()
            && !self.public_key.trim().is_empty()
    }
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("email relay is not configured")]
    NotConfigured,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("relay rejected the message ({status}): {text}")]
    Rejected { status: u16, text: String },
}

/// The line shown to the user when sending fails.
pub fn failure_message(err: &RelayError) -> String {
    let detail = match err {
        RelayError::NotConfigured => "EmailJS is not configured. Set service_id, template_id and \
             public_key under `contact` in the config file."
            .to_string(),
        RelayError::Network(_) => {
            "Network error. Please check your internet connection and try again.".to_string()
        }
        RelayError::Rejected { text, .. } if text.to_lowercase().contains("invalid") => {
            "Invalid EmailJS configuration. Please verify your Service ID, Template ID, and \
             Public Key are correct."
                .to_string()
        }
        RelayError::Rejected { status, text } if text.trim().is_empty() => {
            format!("Email sending failed with status: {status}")
        }
        RelayError::Rejected { text, .. } => format!("EmailJS Error: {}", text.trim()),
    };
    format!("Failed to send message. {detail}")
}

#[derive(Debug, Serialize)]
pub struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a TemplateParams,
}

pub fn request_body<'a>(config: &'a RelayConfig, params: &'a TemplateParams) -> SendRequest<'a> {
    SendRequest {
        service_id: &config.service_id,
        template_id: &config.template_id,
        user_id: &config.public_key,
        template_params: params,
    }
}

pub struct RelayClient {
    client: Client,
    config: RelayConfig,
}

impl RelayClient {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn send(&self, params: &TemplateParams) -> Result<(), RelayError> {
        if !self.config.is_configured() {
            return Err(RelayError::NotConfigured);
        }

        let resp = self
            .client
            .post(&self.config.endpoint)
            .json(&request_body(&self.config, params))
            .send()?;

        let status = resp.status();
        if status.as_u16() == 200 {
            return Ok(());
        }

        let text = resp.text().unwrap_or_default();
        Err(RelayError::Rejected {
            status: status.as_u16(),
            text,
        })
    }
}
