use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

/// Installs the global fmt subscriber. `RUST_LOG` directives are honoured;
/// `level` is added on top as the default.
pub fn init_logging(level: &str) -> Result<()> {
    let directive: Directive = level
        .trim()
        .parse()
        .with_context(|| format!("invalid log level '{}'", level))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();
    Ok(())
}
