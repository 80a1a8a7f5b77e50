//! Tracing setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::GeneralConfig;

/// Install the global subscriber. `RUST_LOG` wins over `config.log_level`.
///
/// Returns `false` when a subscriber was already installed.
pub fn init_tracing(config: &GeneralConfig) -> bool {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("trust_pipeline={},info", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
