//! Outbound actions.
//!
//! Links, mail-to buttons and clipboard copies leave the page. They are
//! fire-and-forget: the page hands them to an [`ActionHandler`] and never
//! looks at a result beyond logging a failure.

use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "target", rename_all = "snake_case")]
pub enum OutboundAction {
    /// Open an external URL.
    OpenLink(String),
    /// Open the mail client with a `mailto:` URL.
    MailTo(String),
    /// Start a call with a `tel:` URL.
    Call(String),
    /// Write text to the system clipboard.
    CopyToClipboard(String),
    /// Scroll to an in-page anchor such as `#projects`.
    ScrollTo(String),
}

pub trait ActionHandler {
    fn dispatch(&mut self, action: &OutboundAction) -> anyhow::Result<()>;
}

/// Logs and records every action.
#[derive(Debug, Default)]
pub struct RecordingActions {
    dispatched: Vec<OutboundAction>,
}

impl RecordingActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatched(&self) -> &[OutboundAction] {
        &self.dispatched
    }
}

impl ActionHandler for RecordingActions {
    fn dispatch(&mut self, action: &OutboundAction) -> anyhow::Result<()> {
        info!(?action, "outbound action");
        self.dispatched.push(action.clone());
        Ok(())
    }
}

/// Build a `mailto:` URL with optional percent-encoded subject and body.
pub fn mailto(address: &str, subject: Option<&str>, body: Option<&str>) -> String {
    let mut url = format!("mailto:{address}");
    let params: Vec<String> = [("subject", subject), ("body", body)]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| format!("{key}={}", urlencoding::encode(v))))
        .collect();
    if !params.is_empty() {
        url.push('?');
        url.push_str(&params.join("&"));
    }
    url
}

/// Mail-to URL for the contact form.
pub fn contact_form_mailto(address: &str, name: &str, message: &str) -> String {
    let subject = format!("Message from {name}");
    mailto(address, Some(&subject), Some(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_mailto() {
        assert_eq!(mailto("a@example.com", None, None), "mailto:a@example.com");
    }

    #[test]
    fn test_contact_form_encoding() {
        let url = contact_form_mailto("a@example.com", "Sam Lee", "Hi & bye?");
        assert_eq!(
            url,
            "mailto:a@example.com?subject=Message%20from%20Sam%20Lee&body=Hi%20%26%20bye%3F"
        );
    }

    #[test]
    fn test_recording_handler() {
        let mut handler = RecordingActions::new();
        handler
            .dispatch(&OutboundAction::CopyToClipboard("a@example.com".into()))
            .unwrap();
        assert_eq!(handler.dispatched().len(), 1);
    }
}
