use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

/// Initialize structured logging based on configuration
///
/// Logs go to stderr (or the configured file) so stdout stays free for
/// topology output.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let config_filter = build_filter(&config.level)?;
    let env_filter = EnvFilter::try_from_default_env().unwrap_or(config_filter);

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.format.as_str() == "json" {
        let json_layer = fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .with_line_number(true)
            .with_file(true);

        if let Some(file_path) = &config.file_path {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)?;
            registry
                .with(json_layer.with_writer(std::sync::Arc::new(file)))
                .try_init()?;
        } else {
            registry
                .with(json_layer.with_writer(std::io::stderr))
                .try_init()?;
        }
    } else {
        let pretty_layer = fmt::layer()
            .pretty()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_line_number(true)
            .with_file(false);

        if let Some(file_path) = &config.file_path {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)?;
            registry
                .with(pretty_layer.with_ansi(false).with_writer(std::sync::Arc::new(file)))
                .try_init()?;
        } else {
            registry
                .with(pretty_layer.with_writer(std::io::stderr))
                .try_init()?;
        }
    }

    Ok(())
}

/// Build a filter from `level`, either a bare level or a comma separated
/// directive list such as `info,clustertopo_pd=debug`.
///
/// Bare words must be log levels; anything else would silently become a
/// target filter.
fn build_filter(level: &str) -> anyhow::Result<EnvFilter> {
    let mut directives = Vec::new();
    for part in level.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if part.contains('=') || part.contains('[') {
            directives.push(part.to_string());
        } else {
            directives.push(parse_log_level(part)?.to_string().to_lowercase());
        }
    }
    if directives.is_empty() {
        return Err(anyhow::anyhow!("Empty log level"));
    }

    EnvFilter::try_new(directives.join(","))
        .map_err(|e| anyhow::anyhow!("Invalid log filter {level:?}: {e}"))
}

/// Parse log level string to tracing Level
fn parse_log_level(level: &str) -> anyhow::Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(anyhow::anyhow!("Invalid log level: {level}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert!(parse_log_level("trace").is_ok());
        assert!(parse_log_level("DEBUG").is_ok());
        assert!(parse_log_level("info").is_ok());
        assert!(parse_log_level("warning").is_ok());
        assert!(parse_log_level("error").is_ok());
        assert!(parse_log_level("verbose").is_err());
    }

    #[test]
    fn test_build_filter_accepts_directives() {
        assert!(build_filter("info").is_ok());
        assert!(build_filter("warning").is_ok());
        assert!(build_filter("info,clustertopo_pd=debug").is_ok());
        assert!(build_filter("clustertopo_core=trace").is_ok());
        assert!(build_filter("loud").is_err());
        assert!(build_filter("info,loud").is_err());
        assert!(build_filter(" , ").is_err());
        assert!(build_filter("clustertopo_pd=loud").is_err());
    }

    #[test]
    fn test_init_rejects_unknown_level() {
        let config = LoggingConfig {
            level: "loud".to_string(),
            ..LoggingConfig::default()
        };
        assert!(init_logging(&config).is_err());
    }
}
