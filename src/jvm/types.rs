use serde::{Deserialize, Deserializer, Serialize};

/// One poll's worth of raw numbers as delivered by the monitoring transport.
///
/// `gc_starts` and `gc_finishes` hold every collection boundary observed
/// since the previous poll. They need not have equal length: a collection
/// may begin in one interval and end in the next.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoredSample {
    pub timestamp: i64,
    pub free_memory: i64,
    pub total_memory: i64,
    pub user_threads: i64,
    pub system_threads: i64,
    pub surviving_generations: i64,
    pub relative_gc_time_per_mil: i64,
    pub last_gc_pause_ms: i64,
    pub loaded_classes: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub gc_starts: Vec<i64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub gc_finishes: Vec<i64>,
}

/// A stored row, with derived columns and the paired GC slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelemetrySample {
    pub timestamp: i64,
    pub free_memory: i64,
    pub total_memory: i64,
    pub used_memory: i64,
    pub user_threads: i64,
    pub system_threads: i64,
    pub total_threads: i64,
    pub surviving_generations: i64,
    pub relative_gc_time_per_mil: i64,
    pub last_gc_pause_ms: i64,
    pub loaded_classes: i64,
    pub gc_starts: Vec<i64>,
    pub gc_finishes: Vec<i64>,
}

/// A single collection reconstructed from the paired GC columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GcInterval {
    pub start: i64,
    /// `None` while the collection is still running.
    pub finish: Option<i64>,
}

impl GcInterval {
    pub fn duration(&self) -> Option<i64> {
        self.finish.map(|finish| finish.wrapping_sub(self.start))
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<i64>>::deserialize(deserializer)?.unwrap_or_default())
}
