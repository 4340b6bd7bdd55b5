//! HTTP request handlers

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    response::Html,
    Json,
};
use castplay_common::api::PlayResponse;
use serde::Serialize;

use super::server::AppContext;
use crate::error::Result;
use crate::player::PlayerStatus;

const STATUS_PAGE: &str = include_str!("status_page.html");

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    module: String,
    version: String,
    git_hash: String,
    build_timestamp: String,
    build_profile: String,
    player: PlayerStatus,
}

/// POST / - Play a URL, replacing the current player
///
/// The raw body is decoded here rather than through the `Json` extractor so
/// that malformed bodies get the same JSON error shape (HTTP 500) as any
/// other processing failure. A body the server refuses to read (over the
/// default 2 MB limit) keeps its status code but gets the same JSON shape.
pub async fn play(
    State(ctx): State<AppContext>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<PlayResponse>> {
    let response = ctx.controller.handle_play_request(&body?).await?;
    Ok(Json(response))
}

/// GET / - Static status page
pub async fn status_page(State(ctx): State<AppContext>) -> Html<String> {
    Html(STATUS_PAGE.replace("{{LISTEN_ADDR}}", &ctx.listen_addr))
}

/// GET /health - Health check with build identification
pub async fn health(State(ctx): State<AppContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "castplay".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: env!("GIT_HASH").to_string(),
        build_timestamp: env!("BUILD_TIMESTAMP").to_string(),
        build_profile: env!("BUILD_PROFILE").to_string(),
        player: ctx.controller.status(),
    })
}
