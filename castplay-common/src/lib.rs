//! # castplay common library
//!
//! Shared code for castplay binaries:
//! - Error type
//! - Bootstrap configuration loading (CLI > env > TOML > compiled defaults)
//! - Logging initialization
//! - Wire types for the play endpoint

pub mod api;
pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
