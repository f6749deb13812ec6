//! Core types shared across annodiff facilities
//!
//! This crate provides foundational types used by the error, logging and
//! storage layers:
//!
//! - **Correlation types**: RunId (one comparison run), SessionId (one stored report)
//! - **Sensitive data**: Sensitive<T> marker for redacting PII values
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::{RunId, SessionId};
pub use sensitive::Sensitive;
