#![forbid(unsafe_code)]

//! Structured logging glue.
//!
//! Every crate in the workspace logs through `tracing` with `tline.*`
//! targets. Hosts install whatever subscriber they like; with the
//! `tracing-json` feature this module offers a ready-made JSON subscriber
//! filtered by `RUST_LOG` (default `tline=info`).

pub use tracing::{debug, debug_span, error, info, trace, trace_span, warn};

/// Install a global JSON subscriber.
///
/// Returns `false` if a global subscriber was already set.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tline=info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
