//! External player management
//!
//! - `candidates`: ordered table of known players and their arguments
//! - `probe`: search-path availability check
//! - `process`: spawning players in their own process group and signalling them
//! - `launcher`: first-available-wins launch over the candidate table
//! - `session`: the active playback session and its supersession policy
//! - `controller`: process-wide session slot shared by all requests

pub mod candidates;
pub mod controller;
pub mod launcher;
pub mod probe;
pub mod process;
pub mod session;

pub use candidates::{PlayerCandidate, CANDIDATES};
pub use controller::{PlaybackController, PlayerStatus};
pub use launcher::{LaunchedPlayer, PlayerLauncher};
pub use probe::{PathProbe, PlayerProbe};
pub use process::{PlayerProcess, ProcessSpawner, SystemProcess, SystemSpawner};
pub use session::{supersede, ActiveSession, SupersedeOutcome};
