//! Log output for hosts that have no subscriber of their own.
//!
//! The runtime only emits `tracing` events; nothing is printed unless a
//! subscriber is installed. `RUST_LOG=pseudo_eval=debug` shows runs,
//! injections and imports; `RUST_LOG=pseudo_parse=trace` shows parser
//! recovery.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INSTALL: Once = Once::new();

/// Install a `fmt` subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset or another global subscriber is
/// already in place. Later calls are no-ops.
pub fn init_tracing() {
    INSTALL.call_once(|| {
        let Some(directives) = std::env::var("RUST_LOG").ok() else {
            return;
        };
        let layer = fmt::layer().with_target(true).with_level(true);
        let installed = tracing_subscriber::registry()
            .with(layer)
            .with(EnvFilter::new(directives))
            .try_init()
            .is_ok();
        if installed {
            tracing::debug!("tracing initialized");
        }
    });
}
