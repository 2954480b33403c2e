// src/telemetry.rs
//! Log subscriber setup.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "smartcollectd=info";

/// Function to install the fmt subscriber, honoring `RUST_LOG`.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // Ignore a subscriber already installed by an embedding process.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
