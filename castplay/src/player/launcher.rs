//! First-available player launch
//!
//! Walks the candidate table in order. A candidate that is found on the host
//! but fails to start (missing shared library, permissions, a race with the
//! availability check) is skipped like an absent one.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::candidates::{PlayerCandidate, CANDIDATES};
use super::probe::{PathProbe, PlayerProbe};
use super::process::{ProcessSpawner, SystemSpawner};
use super::session::ActiveSession;

/// A player that was started
#[derive(Debug)]
pub struct LaunchedPlayer {
    /// Candidate name, e.g. "mpv"
    pub name: &'static str,
    pub session: ActiveSession,
}

/// Finds and starts an external player for a URL
#[derive(Clone)]
pub struct PlayerLauncher {
    candidates: &'static [PlayerCandidate],
    probe: Arc<dyn PlayerProbe>,
    spawner: Arc<dyn ProcessSpawner>,
}

impl PlayerLauncher {
    pub fn new(probe: Arc<dyn PlayerProbe>, spawner: Arc<dyn ProcessSpawner>) -> Self {
        Self {
            candidates: CANDIDATES,
            probe,
            spawner,
        }
    }

    /// Launcher for the real host: `PATH` lookup and OS processes
    pub fn system() -> Self {
        Self::new(Arc::new(PathProbe), Arc::new(SystemSpawner))
    }

    /// Start the first available candidate on `url`
    ///
    /// Returns `None` when nothing could be started; never fails otherwise.
    pub fn launch(&self, url: &str) -> Option<LaunchedPlayer> {
        for candidate in self.candidates {
            if !self.probe.is_available(candidate.name) {
                debug!("Player {} not found", candidate.name);
                continue;
            }

            info!("Opening {} in full screen", candidate.name);
            match self.spawner.spawn(candidate.name, &candidate.command_args(url)) {
                Ok(process) => {
                    let session = ActiveSession::new(process);
                    info!("Playing with {} (pid {:?})", candidate.name, session.pid());
                    return Some(LaunchedPlayer {
                        name: candidate.name,
                        session,
                    });
                }
                Err(e) => {
                    warn!("Failed to start {}: {}", candidate.name, e);
                }
            }
        }

        warn!("No player available");
        None
    }
}
