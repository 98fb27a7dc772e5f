use std::sync::mpsc;
use std::thread::JoinHandle;

use crate::events::types::AppEvent;

use super::form::TemplateParams;
use super::relay::{RelayClient, RelayConfig, failure_message};

pub enum ContactCommand {
    Send(TemplateParams),
}

pub fn spawn(
    config: RelayConfig,
    contact_rx: mpsc::Receiver<ContactCommand>,
    event_tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let client = RelayClient::new(config);

        while let Ok(cmd) = contact_rx.recv() {
            match cmd {
                ContactCommand::Send(params) => {
                    let event = match client.send(&params) {
                        Ok(()) => {
                            tracing::info!("contact message sent");
                            AppEvent::ContactSent
                        }
                        Err(err) => {
                            tracing::error!(%err, "contact message failed");
                            AppEvent::ContactFailed(failure_message(&err))
                        }
                    };
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
            }
        }
    })
}
