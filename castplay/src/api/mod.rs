//! HTTP API
//!
//! - `POST /`: play a URL
//! - `GET /`: status page
//! - `GET /health`: health and build information
//! - `OPTIONS`: CORS pre-flight, answered by the CORS layer

pub mod handlers;
pub mod server;

pub use server::{create_router, run, AppContext};
