use std::env::current_dir;
use tracing::info;
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use um_env_base::result::{Context, UmEnvResult};

const LOG_LEVEL_VARIABLE: &str = "UM_ENV_LOG_LEVEL";

pub fn run_cli() -> UmEnvResult<()> {
    if let Err(err) = enable_ansi_support::enable_ansi_support() {
        eprintln!("Failed to enable ANSI support: {err}");
    }

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::ENTER)
        .with_filter(log_level());

    let registry = tracing_subscriber::registry().with(fmt_layer);

    tracing::subscriber::set_global_default(registry)
        .context("Failed to set default logging subscriber")?;
    let base_path = current_dir().context("Failed to get working directory")?;
    info!("Using base path: '{:?}'", base_path);
    let adapter = um_env_real_adapter::RealAdapter::new(base_path);
    let runner = um_env_logic::runner::UmEnvRunner::new(adapter);
    runner.run();
    Ok(())
}

fn log_level() -> LevelFilter {
    std::env::var(LOG_LEVEL_VARIABLE)
        .ok()
        .and_then(|level| parse_log_level(&level))
        .unwrap_or(LevelFilter::INFO)
}

fn parse_log_level(level: &str) -> Option<LevelFilter> {
    level.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_levels() {
        assert_eq!(parse_log_level("debug"), Some(LevelFilter::DEBUG));
        assert_eq!(parse_log_level(" WARN "), Some(LevelFilter::WARN));
        assert_eq!(parse_log_level("off"), Some(LevelFilter::OFF));
        assert_eq!(parse_log_level("loud"), None);
    }
}
