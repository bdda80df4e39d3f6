//! Alert delivery
//!
//! The [`Mailer`] trait is the seam to whatever transport delivers alerts.
//! [`TerminalMailer`] is the bundled transport and writes to the console.

use super::payload::AlertPayload;
use super::MAX_SUBJECT_LEN;
use crate::error::MailerError;
use std::io::{self, Write};

/// Notification transport
pub trait Mailer: Send + Sync {
    /// Deliver one alert
    fn send(&self, payload: &AlertPayload) -> Result<(), MailerError>;

    /// Transport name for identification
    fn name(&self) -> &str;
}

/// A payload checked and normalised for sending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl Envelope {
    /// Prepare a payload for delivery from `from`
    ///
    /// Rejects a missing sender, recipients or subject. An empty body is
    /// replaced by a placeholder and the subject is cut to the transport
    /// limit.
    pub fn prepare(from: Option<&str>, payload: &AlertPayload) -> Result<Self, MailerError> {
        let from = from
            .filter(|f| !f.trim().is_empty())
            .ok_or_else(|| MailerError::MissingSender(payload.subject.clone()))?;

        let to: Vec<String> = payload
            .recipients
            .iter()
            .filter(|r| !r.trim().is_empty())
            .cloned()
            .collect();
        if to.is_empty() {
            return Err(MailerError::MissingRecipients(payload.subject.clone()));
        }

        if payload.subject.trim().is_empty() {
            return Err(MailerError::MissingSubject);
        }
        let subject: String = payload.subject.chars().take(MAX_SUBJECT_LEN).collect();

        let body = if payload.body.is_empty() {
            "(email body text not specified)\n\n".to_string()
        } else {
            payload.body.clone()
        };

        Ok(Self {
            from: from.to_string(),
            to,
            subject,
            body,
        })
    }
}

/// Console mailer
///
/// Prints each envelope to stdout or stderr instead of sending it.
pub struct TerminalMailer {
    from: Option<String>,
    /// Use stderr instead of stdout
    use_stderr: bool,
}

impl TerminalMailer {
    /// Create a mailer writing to stdout
    pub fn new(from: Option<String>) -> Self {
        Self {
            from,
            use_stderr: false,
        }
    }

    /// Create a mailer writing to stderr
    pub fn stderr(from: Option<String>) -> Self {
        Self {
            from,
            use_stderr: true,
        }
    }

    fn format_envelope(envelope: &Envelope) -> String {
        format!(
            "From: {}\nTo: {}\nSubject: {}\n\n{}\n",
            envelope.from,
            envelope.to.join(", "),
            envelope.subject,
            envelope.body
        )
    }
}

impl Mailer for TerminalMailer {
    fn send(&self, payload: &AlertPayload) -> Result<(), MailerError> {
        let envelope = Envelope::prepare(self.from.as_deref(), payload)?;
        let message = Self::format_envelope(&envelope);

        if self.use_stderr {
            let stderr = io::stderr();
            let mut handle = stderr.lock();
            writeln!(handle, "{}", message)?;
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", message)?;
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "terminal"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> AlertPayload {
        AlertPayload {
            subject: "CW-event: high volume".to_string(),
            body: "600 items".to_string(),
            recipients: vec!["team@example.com".to_string()],
        }
    }

    #[test]
    fn test_prepare_requires_sender() {
        let result = Envelope::prepare(None, &payload());
        assert!(matches!(result, Err(MailerError::MissingSender(_))));
        let result = Envelope::prepare(Some("  "), &payload());
        assert!(matches!(result, Err(MailerError::MissingSender(_))));
    }

    #[test]
    fn test_prepare_requires_recipients() {
        let mut p = payload();
        p.recipients.clear();
        let result = Envelope::prepare(Some("admin@example.com"), &p);
        assert!(matches!(result, Err(MailerError::MissingRecipients(_))));
    }

    #[test]
    fn test_prepare_requires_subject() {
        let mut p = payload();
        p.subject = String::new();
        let result = Envelope::prepare(Some("admin@example.com"), &p);
        assert!(matches!(result, Err(MailerError::MissingSubject)));
    }

    #[test]
    fn test_prepare_truncates_subject_and_fills_body() {
        let mut p = payload();
        p.subject = "s".repeat(100);
        p.body = String::new();
        let envelope = Envelope::prepare(Some("admin@example.com"), &p).unwrap();
        assert_eq!(envelope.subject.chars().count(), MAX_SUBJECT_LEN);
        assert!(envelope.body.contains("not specified"));
    }

    #[test]
    fn test_terminal_mailer_sends() {
        let mailer = TerminalMailer::new(Some("admin@example.com".to_string()));
        assert_eq!(mailer.name(), "terminal");
        assert!(mailer.send(&payload()).is_ok());
    }

    #[test]
    fn test_terminal_mailer_without_sender_fails() {
        let mailer = TerminalMailer::stderr(None);
        assert!(mailer.send(&payload()).is_err());
    }
}
