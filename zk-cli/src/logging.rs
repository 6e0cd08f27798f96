use tracing_subscriber::{fmt, EnvFilter};

/// Install the global fmt subscriber. `RUST_LOG` wins over `level`.
pub fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))
}
