//! Active playback session and supersession policy
//!
//! At most one player runs at a time. Before a new one starts, the previous
//! one is asked to exit, given a grace period, then force-killed. Signal
//! failures are logged and swallowed; they never abort a play request.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use super::process::PlayerProcess;

/// How long to wait for a force-killed player to be reaped
pub const KILL_REAP_TIMEOUT: Duration = Duration::from_secs(1);

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The currently running player
///
/// Owns the process handle until superseded. Holds nothing about what is
/// being played.
pub struct ActiveSession {
    process: Box<dyn PlayerProcess>,
}

impl ActiveSession {
    pub fn new(process: Box<dyn PlayerProcess>) -> Self {
        Self { process }
    }

    /// Process id (and process group id on unix)
    pub fn pid(&self) -> Option<u32> {
        self.process.id()
    }

    pub fn is_running(&mut self) -> bool {
        !self.process.has_exited()
    }
}

impl std::fmt::Debug for ActiveSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveSession")
            .field("pid", &self.pid())
            .finish()
    }
}

/// What supersession had to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupersedeOutcome {
    /// No session was tracked
    NoSession,
    /// The tracked player had already exited
    AlreadyExited,
    /// The player exited within the grace period
    Terminated,
    /// The player ignored the graceful signal and was force-killed
    Killed,
}

/// Stop the session in `slot`, if any, and clear the slot
///
/// The slot is empty afterwards whatever happened.
pub async fn supersede(slot: &mut Option<ActiveSession>, grace_period: Duration) -> SupersedeOutcome {
    let Some(mut session) = slot.take() else {
        return SupersedeOutcome::NoSession;
    };
    let pid = session.pid();

    if !session.is_running() {
        debug!("Previous player pid {:?} already exited", pid);
        return SupersedeOutcome::AlreadyExited;
    }

    info!("Stopping previous player pid {:?}", pid);
    if let Err(e) = session.process.terminate() {
        warn!("Failed to signal player pid {:?}: {}", pid, e);
    }

    if wait_for_exit(session.process.as_mut(), grace_period).await {
        info!("Previous player pid {:?} exited", pid);
        return SupersedeOutcome::Terminated;
    }

    warn!(
        "Player pid {:?} still running after {:?}, killing",
        pid, grace_period
    );
    if let Err(e) = session.process.kill() {
        warn!("Failed to kill player pid {:?}: {}", pid, e);
    }
    if !wait_for_exit(session.process.as_mut(), KILL_REAP_TIMEOUT).await {
        warn!("Player pid {:?} not reaped after kill, abandoning handle", pid);
    }

    SupersedeOutcome::Killed
}

/// Poll until the process exits or `timeout` elapses; true if it exited
async fn wait_for_exit(process: &mut dyn PlayerProcess, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if process.has_exited() {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        sleep(EXIT_POLL_INTERVAL.min(deadline - now)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Calls {
        terminate: usize,
        kill: usize,
    }

    /// Scripted process: exits on terminate unless `stubborn`
    struct ScriptedProcess {
        calls: Arc<Mutex<Calls>>,
        exited: bool,
        stubborn: bool,
        signal_error: bool,
    }

    impl ScriptedProcess {
        fn new(calls: Arc<Mutex<Calls>>) -> Self {
            Self {
                calls,
                exited: false,
                stubborn: false,
                signal_error: false,
            }
        }
    }

    impl PlayerProcess for ScriptedProcess {
        fn id(&self) -> Option<u32> {
            Some(4242)
        }

        fn has_exited(&mut self) -> bool {
            self.exited
        }

        fn terminate(&mut self) -> io::Result<()> {
            self.calls.lock().unwrap().terminate += 1;
            if !self.stubborn {
                self.exited = true;
            }
            if self.signal_error {
                return Err(io::Error::from(io::ErrorKind::PermissionDenied));
            }
            Ok(())
        }

        fn kill(&mut self) -> io::Result<()> {
            self.calls.lock().unwrap().kill += 1;
            self.exited = true;
            if self.signal_error {
                return Err(io::Error::from(io::ErrorKind::PermissionDenied));
            }
            Ok(())
        }
    }

    const GRACE: Duration = Duration::from_millis(100);

    #[tokio::test]
    async fn test_empty_slot_is_noop() {
        let mut slot = None;
        assert_eq!(supersede(&mut slot, GRACE).await, SupersedeOutcome::NoSession);
        assert!(slot.is_none());
    }

    #[tokio::test]
    async fn test_exited_process_not_signalled() {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let mut process = ScriptedProcess::new(Arc::clone(&calls));
        process.exited = true;
        let mut slot = Some(ActiveSession::new(Box::new(process)));

        assert_eq!(supersede(&mut slot, GRACE).await, SupersedeOutcome::AlreadyExited);
        assert!(slot.is_none());
        let calls = calls.lock().unwrap();
        assert_eq!(calls.terminate, 0);
        assert_eq!(calls.kill, 0);
    }

    #[tokio::test]
    async fn test_graceful_exit() {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let process = ScriptedProcess::new(Arc::clone(&calls));
        let mut slot = Some(ActiveSession::new(Box::new(process)));

        assert_eq!(supersede(&mut slot, GRACE).await, SupersedeOutcome::Terminated);
        assert!(slot.is_none());
        let calls = calls.lock().unwrap();
        assert_eq!(calls.terminate, 1);
        assert_eq!(calls.kill, 0);
    }

    #[tokio::test]
    async fn test_stubborn_process_killed_after_grace() {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let mut process = ScriptedProcess::new(Arc::clone(&calls));
        process.stubborn = true;
        let mut slot = Some(ActiveSession::new(Box::new(process)));

        let started = Instant::now();
        assert_eq!(supersede(&mut slot, GRACE).await, SupersedeOutcome::Killed);
        assert!(started.elapsed() >= GRACE);
        assert!(slot.is_none());
        let calls = calls.lock().unwrap();
        assert_eq!(calls.terminate, 1);
        assert_eq!(calls.kill, 1);
    }

    #[tokio::test]
    async fn test_signal_errors_swallowed() {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let mut process = ScriptedProcess::new(Arc::clone(&calls));
        process.stubborn = true;
        process.signal_error = true;
        let mut slot = Some(ActiveSession::new(Box::new(process)));

        assert_eq!(supersede(&mut slot, GRACE).await, SupersedeOutcome::Killed);
        assert!(slot.is_none());
    }
}
