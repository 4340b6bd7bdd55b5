//! Shared HTTP API types
//!
//! Contains ONLY serde types with no HTTP framework dependencies. The service
//! crate wraps them with axum extractors and responses.

pub mod types;

pub use types::{PlayRequest, PlayResponse, NO_PLAYER_MESSAGE};
