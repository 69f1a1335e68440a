//! Log output setup.

use tracing::Level;

/// Installs a formatted stdout subscriber at `level`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}
