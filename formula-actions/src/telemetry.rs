//! Tracing setup for processes embedding the formula actions.
use std::env;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::DependencyError;

const DEFAULT_FILTER: &str = "formula_actions=info,formula_repository=info";

/// Initialize tracing/logging.
///
/// The filter comes from `RUST_LOG`. With `LOG_FORMAT=json` events are emitted as
/// JSON lines for log shipping; otherwise they are pretty-printed to the console.
pub fn init_tracing() -> Result<(), DependencyError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
            .map_err(|e| DependencyError::Tracing(e.to_string()))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init()
            .map_err(|e| DependencyError::Tracing(e.to_string()))?;
    }

    info!(
        service_name = "formula-actions",
        service_version = env!("CARGO_PKG_VERSION"),
        json = json,
        "Tracing initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_reports_error() {
        // The first call may race with other tests installing a subscriber.
        let _ = init_tracing();
        assert!(matches!(init_tracing(), Err(DependencyError::Tracing(_))));
    }
}
