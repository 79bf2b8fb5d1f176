//! Finds the first country where a movie or series streams by subscription on
//! a chosen set of platforms.
//!
//! A search first confirms the title exists in a reference country, then walks
//! the country list in order and each selected platform in order, stopping at
//! the first subscription match.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod reference;
pub mod services;

/// Installs the `tracing` subscriber used by the binaries (`RUST_LOG`
/// overrides `default_filter`).
pub fn init_tracing(default_filter: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
