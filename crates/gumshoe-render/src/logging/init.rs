use std::sync::Once;

use crate::config::RendererConfig;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "gumshoe_render=debug"). When unset, `RUST_LOG` is consulted, then `info`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl From<&RendererConfig> for LoggingConfig {
    fn from(config: &RendererConfig) -> Self {
        Self {
            env_filter: config.log_filter.clone(),
            ..Self::default()
        }
    }
}

static INIT: Once = Once::new();

/// Installs `env_logger` as the global logger.
///
/// Idempotent: only the first call has any effect. Call early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.write_style(config.write_style);

        // Another logger may already be installed (test harnesses, embedders).
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_comes_from_renderer_config() {
        let config = RendererConfig {
            log_filter: Some("gumshoe_render=trace".into()),
            ..RendererConfig::default()
        };
        let logging = LoggingConfig::from(&config);
        assert_eq!(logging.env_filter.as_deref(), Some("gumshoe_render=trace"));
    }

    #[test]
    fn repeated_init_is_harmless() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig { env_filter: Some("off".into()), ..LoggingConfig::default() });
    }
}
