//! Process-wide playback control
//!
//! One `PlaybackController` lives for the whole server and is shared by every
//! connection. The session slot sits behind a single async mutex held across
//! supersede + launch, so concurrent play requests are serialized and never
//! both record themselves as current. Other routes don't take the lock for
//! longer than a `try_lock`, so a supersession waiting out its grace period
//! does not stall them.

use std::time::Duration;

use castplay_common::api::{PlayRequest, PlayResponse};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::launcher::PlayerLauncher;
use super::session::{supersede, ActiveSession, SupersedeOutcome};
use crate::Result;

/// Coarse player state for status reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    /// No player running
    Idle,
    /// A launched player is still running
    Playing,
    /// A play request is replacing the player right now
    Switching,
}

/// Owner of the single active playback session
pub struct PlaybackController {
    launcher: PlayerLauncher,
    grace_period: Duration,
    session: Mutex<Option<ActiveSession>>,
}

impl PlaybackController {
    pub fn new(launcher: PlayerLauncher, grace_period: Duration) -> Self {
        Self {
            launcher,
            grace_period,
            session: Mutex::new(None),
        }
    }

    /// Time a replaced player gets between the graceful signal and the kill
    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    /// Decode a raw play request body and act on it
    ///
    /// Decode failures are returned as errors and leave the current player
    /// untouched. Everything after decoding succeeds: an unavailable player
    /// is reported in the response, not as an error.
    pub async fn handle_play_request(&self, body: &[u8]) -> Result<PlayResponse> {
        let request = PlayRequest::from_slice(body)?;
        info!("Play request for URL: {}", request.url());

        let response = match self.play(request.url()).await {
            Some(player) => PlayResponse::success(player),
            None => PlayResponse::no_player(),
        };
        Ok(response)
    }

    /// Replace the current player with a new one playing `url`
    ///
    /// The previous player is always stopped first, even if nothing can be
    /// started afterwards. Returns the name of the started player.
    pub async fn play(&self, url: &str) -> Option<&'static str> {
        let mut slot = self.session.lock().await;

        supersede(&mut slot, self.grace_period).await;

        let launched = self.launcher.launch(url)?;
        *slot = Some(launched.session);
        Some(launched.name)
    }

    /// Current player state without waiting on an in-flight play request
    pub fn status(&self) -> PlayerStatus {
        match self.session.try_lock() {
            Ok(mut slot) => {
                if slot.as_mut().is_some_and(|session| session.is_running()) {
                    PlayerStatus::Playing
                } else {
                    PlayerStatus::Idle
                }
            }
            Err(_) => PlayerStatus::Switching,
        }
    }

    /// Stop the current player, if any
    pub async fn stop(&self) -> SupersedeOutcome {
        let mut slot = self.session.lock().await;
        supersede(&mut slot, self.grace_period).await
    }

    /// Forget the current player without stopping it
    ///
    /// Used at shutdown when the player should outlive the server.
    pub async fn release(&self) {
        let mut slot = self.session.lock().await;
        if let Some(mut session) = slot.take() {
            if session.is_running() {
                warn!(
                    "Leaving player pid {:?} running after shutdown",
                    session.pid()
                );
            }
        }
    }
}
