//! Tracing setup for hosts embedding the engine.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `RUST_LOG`, falling back to `default_level`.
///
/// Returns false if a global subscriber was already installed.
pub fn init_tracing(default_level: Level) -> bool {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        let _ = init_tracing(Level::DEBUG);
        assert!(!init_tracing(Level::INFO));
    }
}
