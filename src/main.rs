use clap::Parser;
use color_eyre::Result;
use jvm_telemetry::{
    cli::Cli,
    config::Config,
    jvm::{replay::ReplaySource, source::SampleSource},
    logging::setup_logging,
    metrics::{collector::MetricsCollector, shared::SharedTelemetryStore},
    report,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let mut config = Config::load_or_default(cli.config.as_deref())?;
    if let Some(chunk) = cli.growth_chunk {
        config.growth_chunk = chunk;
    }
    if let Some(interval) = cli.interval {
        config.polling_interval = interval;
    }
    config.validate()?;

    setup_logging(&config.logging);

    let input = cli.input_path();
    let mut source = ReplaySource::open(&input).await?;
    if let Some(bytes) = cli.max_heap {
        source = source.with_max_heap_size(bytes);
    }

    let source: Arc<RwLock<dyn SampleSource>> = Arc::new(RwLock::new(source));
    let store = SharedTelemetryStore::with_growth_chunk(config.growth_chunk);

    // tokio intervals reject a zero period.
    let interval = config.polling_interval.max(Duration::from_nanos(1));
    let collector = MetricsCollector::new(source, store.clone(), interval);

    let collector_handle = tokio::spawn(async move { collector.run().await });
    let recorded = collector_handle.await??;
    info!(recorded, input = %input.display(), "replay finished");

    let output = store.read(|s| report::render(s, cli.format))?;
    println!("{}", output);

    Ok(())
}
