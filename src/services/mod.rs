//! Service layer for monitoring cycles
//!
//! Services encapsulate the business logic for rule validation, scheduling,
//! and the poll-retry cycle.

pub mod monitor;
pub mod scheduler;
pub mod validator;

pub use monitor::{CycleOutcome, Monitor};
pub use scheduler::{is_due, select_due};
pub use validator::{validate, ErrorReporter, Validation};
