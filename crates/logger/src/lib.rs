//! Tracing setup shared by the planner binaries.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,revenue_engine=info,forecasting=info,settings_loader=info";

/// Installs a global `fmt` subscriber. `RUST_LOG` wins over `default_filter`.
/// Fails if a subscriber is already installed.
pub fn init(default_filter: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(default_filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing tracing subscriber: {e}"))?;
    tracing::debug!(default_filter, "tracing subscriber installed");
    Ok(())
}

/// `-v` flags on top of the default filter.
pub fn filter_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => DEFAULT_FILTER,
        1 => "info,revenue_engine=debug,forecasting=debug,settings_loader=debug",
        _ => "debug",
    }
}

fn build_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error() {
        // Whichever test installs first wins; the next attempt must not panic.
        let _ = init("warn");
        assert!(init("warn").is_err());
    }

    #[test]
    fn test_events_after_init_do_not_panic() {
        let _ = init("debug");
        tracing::debug!(answer = 42, "event after init");
        assert!(tracing::dispatcher::has_been_set());
    }

    #[test]
    fn test_verbosity_filters_parse() {
        for v in 0..3 {
            assert!(EnvFilter::try_new(filter_for_verbosity(v)).is_ok());
        }
    }
}
