//! Tracing setup for test binaries

use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

static TRACING: Lazy<()> = Lazy::new(|| {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("infra_db=debug,test_utils=info,warn"));

    // Another harness may already have installed a subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
});

/// Installs a test-writer subscriber, once per test binary
///
/// The filter is taken from `RUST_LOG` when set.
pub fn init_test_tracing() {
    Lazy::force(&TRACING);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_test_tracing();
        init_test_tracing();
        tracing::info!("tracing initialised");
    }
}
