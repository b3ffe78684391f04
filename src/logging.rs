//! Optional tracing setup for hosts that do not install their own subscriber.
//!
//! ## Log Levels
//! - `RUST_LOG=appforge=debug` - Show request and polling detail
//! - `RUST_LOG=warn` - Only failures
//! - Default: `appforge=info`

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "appforge=info";

/// Install a global fmt subscriber.
///
/// `RUST_LOG` wins over `default_filter`. Returns `false` when a global
/// subscriber was already installed, in which case nothing changes.
pub fn init_logging(default_filter: Option<&str>) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter.unwrap_or(DEFAULT_FILTER)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
