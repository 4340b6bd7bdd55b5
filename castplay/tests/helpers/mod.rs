//! Test doubles for player discovery and process control
//!
//! `FakeSpawner` hands out `FakeProcess` handles and appends every spawn and
//! signal to a shared event log, so tests can assert on ordering.

#![allow(dead_code)]

use std::collections::HashSet;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use castplay::api::{create_router, AppContext};
use castplay::player::{PlayerLauncher, PlayerProbe, PlayerProcess, ProcessSpawner};
use castplay::PlaybackController;
use tower::ServiceExt;

pub const TEST_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const TEST_GRACE: Duration = Duration::from_millis(150);

/// Probe reporting only the listed programs as installed
pub struct FakeProbe {
    available: HashSet<String>,
}

impl FakeProbe {
    pub fn new(available: &[&str]) -> Self {
        Self {
            available: available.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PlayerProbe for FakeProbe {
    fn is_available(&self, program: &str) -> bool {
        self.available.contains(program)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Spawned { program: String, args: Vec<String>, pid: u32 },
    Terminate { pid: u32 },
    Kill { pid: u32 },
}

pub type EventLog = Arc<Mutex<Vec<Event>>>;

/// Process that exits when signalled, unless it ignores graceful termination
pub struct FakeProcess {
    pid: u32,
    events: EventLog,
    exited: Arc<AtomicBool>,
    ignores_terminate: bool,
}

impl PlayerProcess for FakeProcess {
    fn id(&self) -> Option<u32> {
        Some(self.pid)
    }

    fn has_exited(&mut self) -> bool {
        self.exited.load(Ordering::SeqCst)
    }

    fn terminate(&mut self) -> io::Result<()> {
        self.events.lock().unwrap().push(Event::Terminate { pid: self.pid });
        if !self.ignores_terminate {
            self.exited.store(true, Ordering::SeqCst);
        }
        Ok(())
    }

    fn kill(&mut self) -> io::Result<()> {
        self.events.lock().unwrap().push(Event::Kill { pid: self.pid });
        self.exited.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Spawner producing `FakeProcess` handles
pub struct FakeSpawner {
    events: EventLog,
    next_pid: AtomicU32,
    ignores_terminate: bool,
    /// When set, spawn attempts fail like a broken player install
    failing: AtomicBool,
    /// Exit flags by pid, to simulate a player finishing on its own
    exit_flags: Mutex<Vec<(u32, Arc<AtomicBool>)>>,
}

impl FakeSpawner {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            next_pid: AtomicU32::new(1000),
            ignores_terminate: false,
            failing: AtomicBool::new(false),
            exit_flags: Mutex::new(Vec::new()),
        }
    }

    /// Spawned processes ignore the graceful signal
    pub fn stubborn() -> Self {
        Self {
            ignores_terminate: true,
            ..Self::new()
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn spawned_pids(&self) -> Vec<u32> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Spawned { pid, .. } => Some(pid),
                _ => None,
            })
            .collect()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make a spawned process exit on its own
    pub fn finish(&self, pid: u32) {
        for (p, flag) in self.exit_flags.lock().unwrap().iter() {
            if *p == pid {
                flag.store(true, Ordering::SeqCst);
            }
        }
    }
}

impl ProcessSpawner for FakeSpawner {
    fn spawn(&self, program: &str, args: &[String]) -> io::Result<Box<dyn PlayerProcess>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{}: error while loading shared libraries", program),
            ));
        }
        let pid = self.next_pid.fetch_add(1, Ordering::SeqCst);
        let exited = Arc::new(AtomicBool::new(false));
        self.exit_flags
            .lock()
            .unwrap()
            .push((pid, Arc::clone(&exited)));
        self.events.lock().unwrap().push(Event::Spawned {
            program: program.to_string(),
            args: args.to_vec(),
            pid,
        });
        Ok(Box::new(FakeProcess {
            pid,
            events: Arc::clone(&self.events),
            exited,
            ignores_terminate: self.ignores_terminate,
        }))
    }
}

pub struct TestApp {
    pub router: Router,
    pub controller: Arc<PlaybackController>,
    pub spawner: Arc<FakeSpawner>,
}

pub fn test_app(available: &[&str]) -> TestApp {
    test_app_with(available, FakeSpawner::new())
}

pub fn test_app_with(available: &[&str], spawner: FakeSpawner) -> TestApp {
    let spawner = Arc::new(spawner);
    let launcher = PlayerLauncher::new(
        Arc::new(FakeProbe::new(available)),
        Arc::clone(&spawner) as Arc<dyn ProcessSpawner>,
    );
    let controller = Arc::new(PlaybackController::new(launcher, TEST_GRACE));
    let router = create_router(AppContext {
        controller: Arc::clone(&controller),
        listen_addr: TEST_LISTEN_ADDR.to_string(),
    });
    TestApp {
        router,
        controller,
        spawner,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("Should parse JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub async fn send(router: &Router, method: Method, path: &str, body: &str) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .header("content-type", "application/json")
        .header("origin", "http://phone.local")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body")
        .to_vec();

    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn post_url(router: &Router, url: &str) -> TestResponse {
    let body = serde_json::json!({ "url": url }).to_string();
    send(router, Method::POST, "/", &body).await
}
