//! # Tracing Setup
//!
//! Installs the global `tracing` subscriber. `RUST_LOG` wins when set;
//! otherwise engine crates log at debug and sqlx only warns.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,tally=debug,sqlx=warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the fmt subscriber. Returns `false` if one was already set,
/// which is normal in tests and when embedded in a host application.
pub fn init_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .try_init()
        .is_ok()
}
