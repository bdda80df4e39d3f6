//! Alert and notification system
//!
//! Builds threshold, report, staleness and system alerts and delivers them
//! through a mailer.

mod engine;
mod mailer;
mod payload;

pub use engine::AlertEngine;
pub use mailer::{Envelope, Mailer, TerminalMailer};
pub use payload::{build_alert, AlertInput, AlertPayload};

/// Longest subject line the mail transport accepts
pub const MAX_SUBJECT_LEN: usize = 78;
