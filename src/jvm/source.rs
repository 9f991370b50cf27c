use crate::error::Result;
use crate::jvm::types::MonitoredSample;
use async_trait::async_trait;

#[async_trait]
pub trait SampleSource: Send + Sync {
    /// Returns the next sample, or `None` once the source is exhausted.
    async fn next_sample(&mut self) -> Result<Option<MonitoredSample>>;

    async fn is_connected(&self) -> bool;

    async fn max_heap_size(&self) -> Option<i64>;
}
