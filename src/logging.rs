use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_level: String,
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            with_target: false,
        }
    }
}

/// Installs the global subscriber. Logs go to stderr so command output on
/// stdout stays clean. Calling it twice is harmless.
pub fn init_tracing(config: &LogConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.with_target)
        .with_thread_ids(false);

    if let Err(e) = Registry::default().with(env_filter).with(stderr_layer).try_init() {
        let msg = e.to_string();
        if !msg.contains("already been set") {
            eprintln!("Failed to initialize tracing: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let cfg = LogConfig::default();
        init_tracing(&cfg);
        init_tracing(&cfg);
    }
}
