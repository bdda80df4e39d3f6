//! Datasource abstraction layer
//!
//! Provides a trait over the count API so the engine can be driven by a
//! file, a network client, or a mock.

pub mod file;
pub mod traits;

pub use file::{CountResponse, FileDatasource};
pub use traits::Datasource;
