//! countwatch - rule-driven count monitoring library
//!
//! This library provides the core functionality for polling counted views,
//! evaluating monitoring rules against them, and sending threshold, report
//! and staleness alerts.
//!
//! # Modules
//!
//! - [`alerts`]: Alert construction and delivery
//! - [`cli`]: Command-line interface definitions
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration and rule file loading
//! - [`datasource`]: Count source abstraction layer
//! - [`domain`]: Domain models with validation
//! - [`error`]: Error types
//! - [`services`]: Validation, scheduling and the monitoring cycle

pub mod alerts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod datasource;
pub mod domain;
pub mod error;
pub mod services;

#[cfg(test)]
pub mod mock;

pub use error::{AppError, Result};
