use crate::error::{AppError, Result};
use crate::jvm::source::SampleSource;
use crate::metrics::shared::SharedTelemetryStore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::interval;
use tracing::{info, warn};

pub struct MetricsCollector {
    source: Arc<RwLock<dyn SampleSource>>,
    store: SharedTelemetryStore,
    interval: Duration,
    tick_count: Arc<AtomicU64>,
}

impl MetricsCollector {
    pub fn new(
        source: Arc<RwLock<dyn SampleSource>>,
        store: SharedTelemetryStore,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            store,
            interval,
            tick_count: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    /// Polls the source every interval until it disconnects or runs dry.
    /// Returns the number of samples recorded.
    pub async fn run(&self) -> Result<u64> {
        let mut ticker = interval(self.interval);
        let mut recorded = 0;

        self.record_max_heap_size().await;
        info!(interval = ?self.interval, "telemetry collection started");

        loop {
            ticker.tick().await;
            self.tick_count.fetch_add(1, Ordering::Relaxed);

            let mut source = self.source.write().await;
            if !source.is_connected().await {
                break;
            }

            match source.next_sample().await {
                Ok(Some(sample)) => {
                    self.store.record_sample(sample);
                    recorded += 1;
                }
                Ok(None) => {
                    info!(recorded, "sample source exhausted");
                    break;
                }
                Err(e) if e.is_recoverable() => {
                    warn!(error = %e, "skipped unreadable sample");
                }
                Err(e) => {
                    warn!(error = %e, recorded, "sample source failed");
                    return Err(e);
                }
            }
        }

        Ok(recorded)
    }

    pub async fn collect_once(&self) -> Result<()> {
        let mut source = self.source.write().await;
        if !source.is_connected().await {
            return Err(AppError::Source("Not connected".to_string()));
        }

        match source.next_sample().await? {
            Some(sample) => {
                self.store.record_sample(sample);
                Ok(())
            }
            None => Err(AppError::Source("Source exhausted".to_string())),
        }
    }

    async fn record_max_heap_size(&self) {
        let source = self.source.read().await;
        if let Some(bytes) = source.max_heap_size().await {
            self.store.set_max_heap_size(bytes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jvm::replay::ReplaySource;

    const SAMPLES: &str = r#"{"timestamp":1,"free_memory":10,"total_memory":40,"user_threads":3,"system_threads":2,"surviving_generations":1,"relative_gc_time_per_mil":0,"last_gc_pause_ms":0,"loaded_classes":500,"gc_starts":[10],"gc_finishes":[]}
{"timestamp":2,"free_memory":30,"total_memory":40,"user_threads":3,"system_threads":2,"surviving_generations":1,"relative_gc_time_per_mil":12,"last_gc_pause_ms":10,"loaded_classes":510,"gc_starts":[],"gc_finishes":[20]}
{"timestamp":3,"free_memory":25,"total_memory":40,"user_threads":4,"system_threads":2,"surviving_generations":1,"relative_gc_time_per_mil":6,"last_gc_pause_ms":10,"loaded_classes":512}
"#;

    fn source(contents: &str) -> Arc<RwLock<dyn SampleSource>> {
        Arc::new(RwLock::new(
            ReplaySource::from_string(contents).with_max_heap_size(1 << 20),
        ))
    }

    #[tokio::test]
    async fn test_run_until_exhausted() {
        let store = SharedTelemetryStore::with_growth_chunk(2);
        let collector =
            MetricsCollector::new(source(SAMPLES), store.clone(), Duration::from_millis(1));

        let recorded = collector.run().await.unwrap();
        assert_eq!(recorded, 3);
        assert!(collector.tick_count() >= 4);

        store.read(|s| {
            assert_eq!(s.item_count(), 3);
            assert_eq!(s.capacity(), 4);
            assert_eq!(s.max_heap_size(), 1 << 20);
            assert_eq!(s.gc_finishes_at(0), vec![20]);
            assert_eq!(s.gc_starts_at(1), vec![10]);
            assert!(s.gc_starts_at(2).is_empty());
        });
    }

    #[tokio::test]
    async fn test_run_skips_bad_lines() {
        let contents = format!("{{broken\n{}", SAMPLES);
        let store = SharedTelemetryStore::default();
        let collector =
            MetricsCollector::new(source(&contents), store.clone(), Duration::from_millis(1));

        assert_eq!(collector.run().await.unwrap(), 3);
        assert_eq!(store.item_count(), 3);
    }

    struct FailingSource {
        reads: u32,
    }

    #[async_trait::async_trait]
    impl SampleSource for FailingSource {
        async fn next_sample(&mut self) -> Result<Option<crate::jvm::types::MonitoredSample>> {
            self.reads += 1;
            Err(AppError::Source("transport down".to_string()))
        }

        async fn is_connected(&self) -> bool {
            true
        }

        async fn max_heap_size(&self) -> Option<i64> {
            None
        }
    }

    #[tokio::test]
    async fn test_run_stops_on_failing_source() {
        let failing = Arc::new(RwLock::new(FailingSource { reads: 0 }));
        let store = SharedTelemetryStore::default();
        let collector = MetricsCollector::new(
            failing.clone(),
            store.clone(),
            Duration::from_millis(1),
        );

        let result = tokio::time::timeout(Duration::from_secs(2), collector.run())
            .await
            .expect("collector kept polling a failed source");

        assert!(matches!(result, Err(AppError::Source(_))));
        assert_eq!(failing.read().await.reads, 1);
        assert_eq!(store.item_count(), 0);
    }

    #[tokio::test]
    async fn test_run_stops_on_unreadable_input() {
        let dir = tempfile::tempdir().unwrap();
        let replay = ReplaySource::open(dir.path()).await.unwrap();
        let store = SharedTelemetryStore::default();
        let collector = MetricsCollector::new(
            Arc::new(RwLock::new(replay)),
            store.clone(),
            Duration::from_millis(1),
        );

        let result = tokio::time::timeout(Duration::from_secs(2), collector.run())
            .await
            .expect("collector kept polling an unreadable input");

        assert!(matches!(result, Err(AppError::Io(_))));
        assert!(collector.tick_count() < 5);
    }

    #[tokio::test]
    async fn test_collect_once() {
        let store = SharedTelemetryStore::default();
        let collector =
            MetricsCollector::new(source(SAMPLES), store.clone(), Duration::from_secs(1));

        collector.collect_once().await.unwrap();
        assert_eq!(store.item_count(), 1);
        assert_eq!(store.snapshot(0).used_memory, 30);
    }

    #[tokio::test]
    async fn test_collect_once_exhausted() {
        let store = SharedTelemetryStore::default();
        let collector = MetricsCollector::new(source(""), store.clone(), Duration::from_secs(1));

        assert!(matches!(
            collector.collect_once().await,
            Err(AppError::Source(_))
        ));
        assert!(matches!(
            collector.collect_once().await,
            Err(AppError::Source(_))
        ));
        assert_eq!(store.item_count(), 0);
    }
}
