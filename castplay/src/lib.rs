//! # castplay
//!
//! Local HTTP endpoint that opens a posted media URL in a full-screen
//! external player, replacing whatever player it started before.
//!
//! **Architecture:** axum router in front of a single `PlaybackController`
//! that owns the active player process.

pub mod api;
pub mod error;
pub mod player;

pub use error::{Error, Result};
pub use player::PlaybackController;
