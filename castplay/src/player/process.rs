//! Player process handles
//!
//! Players are started detached: null stdio, their own process group on unix,
//! and never killed when the handle is dropped. Termination signals go to the
//! whole group so helper processes spawned by a player go away with it.

use std::io;
use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::debug;

/// Handle to a running player
pub trait PlayerProcess: Send {
    /// OS process id, which is also the process group id on unix
    fn id(&self) -> Option<u32>;

    /// Non-blocking exit check; reaps the process if it has exited
    fn has_exited(&mut self) -> bool;

    /// Ask the player (and its group) to exit
    fn terminate(&mut self) -> io::Result<()>;

    /// Force the player (and its group) to exit
    fn kill(&mut self) -> io::Result<()>;
}

/// Starts player processes
pub trait ProcessSpawner: Send + Sync {
    fn spawn(&self, program: &str, args: &[String]) -> io::Result<Box<dyn PlayerProcess>>;
}

/// Spawns real OS processes through `tokio::process`
///
/// Must be called from within a tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSpawner;

impl ProcessSpawner for SystemSpawner {
    fn spawn(&self, program: &str, args: &[String]) -> io::Result<Box<dyn PlayerProcess>> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(false);

        // New group led by the player itself, so pgid == pid
        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd.spawn()?;
        Ok(Box::new(SystemProcess::new(child)))
    }
}

/// A spawned player process
#[derive(Debug)]
pub struct SystemProcess {
    child: Child,
    // tokio clears Child::id() once the child is reaped; keep our own copy
    pid: Option<u32>,
    exited: bool,
}

impl SystemProcess {
    pub fn new(child: Child) -> Self {
        let pid = child.id();
        Self {
            child,
            pid,
            exited: false,
        }
    }

    #[cfg(unix)]
    fn signal_group(&mut self, signal: libc::c_int) -> io::Result<()> {
        let Some(pid) = self.pid else {
            return Ok(());
        };
        let pgid = libc::pid_t::try_from(pid)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;

        // SAFETY: killpg has no memory-safety preconditions
        let rc = unsafe { libc::killpg(pgid, signal) };
        if rc == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }
}

impl PlayerProcess for SystemProcess {
    fn id(&self) -> Option<u32> {
        self.pid
    }

    fn has_exited(&mut self) -> bool {
        if self.exited {
            return true;
        }
        match self.child.try_wait() {
            Ok(Some(status)) => {
                debug!("Player pid {:?} exited with {}", self.pid, status);
                self.exited = true;
            }
            Ok(None) => {}
            Err(e) => {
                // Nothing left to wait on
                debug!("Player pid {:?} status unavailable: {}", self.pid, e);
                self.exited = true;
            }
        }
        self.exited
    }

    #[cfg(unix)]
    fn terminate(&mut self) -> io::Result<()> {
        self.signal_group(libc::SIGTERM)
    }

    #[cfg(not(unix))]
    fn terminate(&mut self) -> io::Result<()> {
        // No graceful signal on this platform
        self.child.start_kill()
    }

    #[cfg(unix)]
    fn kill(&mut self) -> io::Result<()> {
        self.signal_group(libc::SIGKILL)
    }

    #[cfg(not(unix))]
    fn kill(&mut self) -> io::Result<()> {
        self.child.start_kill()
    }
}
