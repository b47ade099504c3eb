use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogFormat;
use crate::errors::ProxyError;

const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber. `RUST_LOG` overrides the default level.
pub fn init_logger(format: LogFormat) -> Result<(), ProxyError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match format {
        LogFormat::Json => fmt::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(false)
            .with_span_list(false)
            .try_init(),
        LogFormat::Text => fmt::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init(),
    }
    .map_err(|err| ProxyError::Logging(err.to_string()))
}
