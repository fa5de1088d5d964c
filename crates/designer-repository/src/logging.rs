//! Tracing setup for hosts embedding the repository

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Directive used when `RUST_LOG` is not set.
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Install a global subscriber printing compact log lines to stdout.
///
/// Levels come from `RUST_LOG`, falling back to [`DEFAULT_DIRECTIVE`].
/// Fails when a global subscriber is already installed.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_with(DEFAULT_DIRECTIVE)
}

/// Like [`init`], with a caller-chosen fallback directive such as
/// `"designer_repository=debug"`.
pub fn init_with(fallback: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback))?;

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .compact();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_refused() {
        // Another test may have installed the subscriber first
        let _ = init();
        assert!(init().is_err());
        tracing::debug!(location = "/processes", "listing assets");
    }
}
