//! Player availability check

/// Answers whether a player executable can be found on this host
pub trait PlayerProbe: Send + Sync {
    fn is_available(&self, program: &str) -> bool;
}

/// Looks executables up on `PATH`
#[derive(Debug, Clone, Copy, Default)]
pub struct PathProbe;

impl PlayerProbe for PathProbe {
    fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}
