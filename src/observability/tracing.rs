use thiserror::Error;
use tracing::info;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Build the default filter directive for a service
pub fn default_filter_directive(service_name: &str, log_level: &str) -> String {
    format!(
        "{}={},reqwest=warn,hyper=warn",
        service_name.replace('-', "_"),
        log_level
    )
}

/// Initialize structured logging
///
/// `RUST_LOG` takes precedence over `log_level`. Logs go to stderr so that
/// stdout stays free for command output.
pub fn init_observability(
    service_name: &str,
    log_level: &str,
    enable_json_logging: bool,
) -> Result<(), ObservabilityError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter_directive(service_name, log_level))
            .map_err(|e| ObservabilityError::Config(e.to_string()))?,
    };

    if enable_json_logging {
        // JSON formatter for structured log shipping
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .map_err(|e| ObservabilityError::TracingInit(e.to_string()))?;
    } else {
        // Human-readable formatter for development
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .try_init()
            .map_err(|e| ObservabilityError::TracingInit(e.to_string()))?;
    }

    info!("Observability initialized for service: {}", service_name);
    Ok(())
}
