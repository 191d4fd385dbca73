//! Error types for the Notus SDK
//!
//! Uses `eyre` for ergonomic error handling with context.

pub use eyre::{bail, ensure, eyre, Context, Report, Result};
