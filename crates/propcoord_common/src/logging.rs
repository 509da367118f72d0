//! Logging utilities for the property coordinator.
//!
//! Every binary calls [`init`] once at startup; libraries only emit `tracing`
//! events and never install a subscriber themselves.

use tracing::{info, level_filters::LevelFilter, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber at INFO.
///
/// ```
/// use propcoord_common::logging;
///
/// logging::init();
/// // a second call is harmless
/// logging::init_with_level(tracing::Level::DEBUG);
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific level for the `propcoord` crates.
///
/// A set `RUST_LOG` replaces the default directives entirely.
pub fn init_with_level(level: Level) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default()
            .add_directive(
                format!("propcoord={}", level)
                    .parse()
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            )
            .add_directive(
                "tower_http=info"
                    .parse()
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            )
    });

    // try_init: a global subscriber may already be set (tests, embedding)
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

