//! Logging setup for the `dnsdig` binary.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Compute the filter spec: `RUST_LOG` when set and non-empty, otherwise
/// `warn,dnsdig=<level>` so dependencies stay quiet.
pub fn effective_log_spec(cfg: &LoggingConfig, rust_log: Option<&str>) -> String {
    match rust_log {
        Some(spec) if !spec.trim().is_empty() => spec.to_string(),
        _ => format!("warn,dnsdig={}", cfg.level.trim()),
    }
}

/// Install the global subscriber. Logs go to stderr so they never mix with
/// rendered output on stdout.
pub fn init_logging(cfg: &LoggingConfig) -> anyhow::Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let spec = effective_log_spec(cfg, rust_log.as_deref());
    let filter = match EnvFilter::try_new(&spec) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("invalid log spec '{spec}' ({e}); falling back to warn");
            EnvFilter::new("warn")
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_level_scopes_to_crate() {
        let cfg = LoggingConfig {
            level: "debug".to_string(),
        };
        assert_eq!(effective_log_spec(&cfg, None), "warn,dnsdig=debug");
        assert_eq!(effective_log_spec(&cfg, Some("  ")), "warn,dnsdig=debug");
    }

    #[test]
    fn test_rust_log_wins() {
        let cfg = LoggingConfig::default();
        assert_eq!(effective_log_spec(&cfg, Some("trace")), "trace");
    }

    #[test]
    fn test_default_spec_parses() {
        let spec = effective_log_spec(&LoggingConfig::default(), None);
        assert!(EnvFilter::try_new(spec).is_ok());
    }
}
