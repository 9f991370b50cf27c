use crate::config::DEFAULT_GROWTH_CHUNK;
use crate::jvm::types::{GcInterval, MonitoredSample, TelemetrySample};
use crate::metrics::column::Column;
use crate::metrics::notifier::{ChangeNotifier, ListenerId, TelemetryListener};
use crate::metrics::pairing::{GcPairingEngine, GC_FINISH_PENDING};
use std::sync::Arc;
use tracing::{debug, trace};

/// Column-oriented history of telemetry samples.
///
/// Every column shares one row index. Rows `[0, item_count)` are valid; the
/// rest of each column up to `capacity` is preallocated space. When full,
/// every column grows by the same fixed `growth_chunk`.
#[derive(Debug)]
pub struct TelemetryStore {
    timestamps: Column<i64>,
    free_memory: Column<i64>,
    total_memory: Column<i64>,
    used_memory: Column<i64>,
    user_threads: Column<i64>,
    system_threads: Column<i64>,
    total_threads: Column<i64>,
    surviving_generations: Column<i64>,
    relative_gc_time_per_mil: Column<i64>,
    last_gc_pause_ms: Column<i64>,
    loaded_classes: Column<i64>,
    gc_starts: Column<Vec<i64>>,
    gc_finishes: Column<Vec<i64>>,

    capacity: usize,
    growth_chunk: usize,
    item_count: usize,
    max_heap_size: i64,
    last_raw: Option<MonitoredSample>,

    pairing: GcPairingEngine,
    notifier: ChangeNotifier,
}

impl Default for TelemetryStore {
    fn default() -> Self {
        Self::new(DEFAULT_GROWTH_CHUNK)
    }
}

impl TelemetryStore {
    /// # Panics
    ///
    /// Panics if `growth_chunk` is zero.
    pub fn new(growth_chunk: usize) -> Self {
        assert!(growth_chunk > 0, "growth_chunk must be greater than zero");

        Self {
            timestamps: Column::new(growth_chunk),
            free_memory: Column::new(growth_chunk),
            total_memory: Column::new(growth_chunk),
            used_memory: Column::new(growth_chunk),
            user_threads: Column::new(growth_chunk),
            system_threads: Column::new(growth_chunk),
            total_threads: Column::new(growth_chunk),
            surviving_generations: Column::new(growth_chunk),
            relative_gc_time_per_mil: Column::new(growth_chunk),
            last_gc_pause_ms: Column::new(growth_chunk),
            loaded_classes: Column::new(growth_chunk),
            gc_starts: Column::new(growth_chunk),
            gc_finishes: Column::new(growth_chunk),
            capacity: growth_chunk,
            growth_chunk,
            item_count: 0,
            max_heap_size: 0,
            last_raw: None,
            pairing: GcPairingEngine::new(),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Discards every row and reallocates the columns at `growth_chunk`.
    /// Listeners and the max heap size survive.
    pub fn reset(&mut self) {
        let notifier = std::mem::take(&mut self.notifier);
        let max_heap_size = self.max_heap_size;

        *self = Self::new(self.growth_chunk);
        self.notifier = notifier;
        self.max_heap_size = max_heap_size;

        debug!(capacity = self.capacity, "telemetry store reset");
        self.notifier.notify_reset();
    }

    pub fn reset_with_chunk(&mut self, growth_chunk: usize) {
        self.set_growth_chunk(growth_chunk);
        self.reset();
    }

    /// Appends one sample, pairing its GC events with any collection left
    /// open by an earlier row.
    pub fn record_sample(&mut self, raw: MonitoredSample) {
        self.ensure_capacity();

        let row = self.item_count;

        self.timestamps.set(row, raw.timestamp);
        self.free_memory.set(row, raw.free_memory);
        self.total_memory.set(row, raw.total_memory);
        self.used_memory.set(row, raw.total_memory.wrapping_sub(raw.free_memory));
        self.user_threads.set(row, raw.user_threads);
        self.system_threads.set(row, raw.system_threads);
        self.total_threads
            .set(row, raw.user_threads.wrapping_add(raw.system_threads));
        self.surviving_generations
            .set(row, raw.surviving_generations);
        self.relative_gc_time_per_mil
            .set(row, raw.relative_gc_time_per_mil);
        self.last_gc_pause_ms.set(row, raw.last_gc_pause_ms);
        self.loaded_classes.set(row, raw.loaded_classes);

        let paired = self.pairing.pair(
            row,
            &raw.gc_starts,
            &raw.gc_finishes,
            &self.gc_starts,
            &mut self.gc_finishes,
        );
        self.gc_starts.set(row, paired.starts);
        self.gc_finishes.set(row, paired.finishes);

        self.item_count += 1;
        self.last_raw = Some(raw);

        trace!(row, "recorded telemetry sample");
        self.notifier.notify_sample_appended();
    }

    fn ensure_capacity(&mut self) {
        if self.item_count < self.capacity {
            return;
        }

        let chunk = self.growth_chunk;
        self.timestamps.grow(chunk);
        self.free_memory.grow(chunk);
        self.total_memory.grow(chunk);
        self.used_memory.grow(chunk);
        self.user_threads.grow(chunk);
        self.system_threads.grow(chunk);
        self.total_threads.grow(chunk);
        self.surviving_generations.grow(chunk);
        self.relative_gc_time_per_mil.grow(chunk);
        self.last_gc_pause_ms.grow(chunk);
        self.loaded_classes.grow(chunk);
        self.gc_starts.grow(chunk);
        self.gc_finishes.grow(chunk);
        self.capacity += chunk;

        debug!(capacity = self.capacity, chunk, "grew telemetry columns");
    }

    /// # Panics
    ///
    /// Panics if `index >= item_count()`.
    pub fn get_sample(&self, index: usize) -> TelemetrySample {
        self.check_row(index);

        TelemetrySample {
            timestamp: *self.timestamps.get(index),
            free_memory: *self.free_memory.get(index),
            total_memory: *self.total_memory.get(index),
            used_memory: *self.used_memory.get(index),
            user_threads: *self.user_threads.get(index),
            system_threads: *self.system_threads.get(index),
            total_threads: *self.total_threads.get(index),
            surviving_generations: *self.surviving_generations.get(index),
            relative_gc_time_per_mil: *self.relative_gc_time_per_mil.get(index),
            last_gc_pause_ms: *self.last_gc_pause_ms.get(index),
            loaded_classes: *self.loaded_classes.get(index),
            gc_starts: self.gc_starts.get(index).clone(),
            gc_finishes: self.gc_finishes.get(index).clone(),
        }
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn growth_chunk(&self) -> usize {
        self.growth_chunk
    }

    /// Affects future growth steps only.
    ///
    /// # Panics
    ///
    /// Panics if `growth_chunk` is zero.
    pub fn set_growth_chunk(&mut self, growth_chunk: usize) {
        assert!(growth_chunk > 0, "growth_chunk must be greater than zero");
        self.growth_chunk = growth_chunk;
    }

    pub fn last_raw(&self) -> Option<&MonitoredSample> {
        self.last_raw.as_ref()
    }

    pub fn max_heap_size(&self) -> i64 {
        self.max_heap_size
    }

    pub fn set_max_heap_size(&mut self, bytes: i64) {
        self.max_heap_size = bytes;
    }

    pub fn pending_unpaired_start(&self) -> Option<usize> {
        self.pairing.pending_unpaired_start()
    }

    pub fn subscribe(&mut self, listener: Arc<dyn TelemetryListener>) -> ListenerId {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.notifier.unsubscribe(id)
    }

    pub fn timestamps(&self) -> Vec<i64> {
        self.timestamps.to_vec(self.item_count)
    }

    pub fn used_memory(&self) -> Vec<i64> {
        self.used_memory.to_vec(self.item_count)
    }

    pub fn total_memory(&self) -> Vec<i64> {
        self.total_memory.to_vec(self.item_count)
    }

    pub fn total_threads(&self) -> Vec<i64> {
        self.total_threads.to_vec(self.item_count)
    }

    pub fn loaded_classes(&self) -> Vec<i64> {
        self.loaded_classes.to_vec(self.item_count)
    }

    pub fn gc_starts_at(&self, index: usize) -> Vec<i64> {
        self.check_row(index);
        self.gc_starts.get(index).clone()
    }

    pub fn gc_finishes_at(&self, index: usize) -> Vec<i64> {
        self.check_row(index);
        self.gc_finishes.get(index).clone()
    }

    /// Every collection in row order, each reported once.
    ///
    /// A collection closed across a row boundary is stored in both rows and
    /// is collapsed here by its start time. Slots with a zero start are
    /// padding for finishes whose start was never observed and are skipped.
    pub fn gc_intervals(&self) -> Vec<GcInterval> {
        let mut intervals: Vec<GcInterval> = Vec::new();

        for row in 0..self.item_count {
            let starts = self.gc_starts.get(row);
            let finishes = self.gc_finishes.get(row);

            for (&start, &finish) in starts.iter().zip(finishes.iter()) {
                if start == 0 {
                    continue;
                }

                // Zero is padding from a row with several unmatched starts.
                let finish = (finish != GC_FINISH_PENDING && finish != 0).then_some(finish);

                if let Some(last) = intervals.last_mut() {
                    if last.start == start {
                        if last.finish.is_none() {
                            last.finish = finish;
                        }
                        continue;
                    }
                }

                intervals.push(GcInterval { start, finish });
            }
        }

        intervals
    }

    fn check_row(&self, index: usize) {
        assert!(
            index < self.item_count,
            "row index {} out of range (item count {})",
            index,
            self.item_count
        );
    }
}
