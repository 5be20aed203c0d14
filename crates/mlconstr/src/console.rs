//! Console logging.
//!
//! ## Log Levels
//!
//! - **INFO**: optimize start/end (when `OutputFlag` is non-zero)
//! - **DEBUG**: propagation passes, embedded predictors
//! - **TRACE**: individual variable fixings

use std::sync::OnceLock;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: OnceLock<()> = OnceLock::new();

/// Directives used when `RUST_LOG` is not set.
pub const DEFAULT_DIRECTIVES: &str = "mlconstr_model=info,mlconstr_predictors=info";

/// Initializes console logging.
///
/// Safe to call multiple times - only the first call has effect. `RUST_LOG`
/// overrides [`DEFAULT_DIRECTIVES`].
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init();
    });
}
