//! Known players, in priority order

/// A player the launcher knows how to invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerCandidate {
    /// Executable name, looked up on the search path
    pub name: &'static str,
    /// Arguments placed before the URL: full-screen, exit when done where supported
    pub args: &'static [&'static str],
}

impl PlayerCandidate {
    /// Full argument list for playing `url`
    pub fn command_args(&self, url: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.to_string())
            .chain(std::iter::once(url.to_string()))
            .collect()
    }
}

/// Candidate players; the first available one wins
pub const CANDIDATES: &[PlayerCandidate] = &[
    PlayerCandidate {
        name: "vlc",
        args: &["--fullscreen", "--play-and-exit"],
    },
    PlayerCandidate {
        name: "mpv",
        // force-window keeps a full-screen window for audio-only streams
        args: &["--fullscreen", "--force-window=yes"],
    },
    PlayerCandidate {
        name: "ffplay",
        args: &["-fs", "-autoexit"],
    },
    PlayerCandidate {
        name: "celluloid",
        args: &["--fullscreen"],
    },
];
