use crate::config::LoggingConfig;
use tracing_subscriber::{fmt, EnvFilter};

pub fn setup_logging(cfg: &LoggingConfig) {
    let level = cfg
        .level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);

    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    // Reports go to stdout, so keep diagnostics on stderr.
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_ansi(cfg.ansi)
        .with_writer(std::io::stderr)
        .try_init();
}
