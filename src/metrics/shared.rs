use crate::jvm::types::{MonitoredSample, TelemetrySample};
use crate::metrics::notifier::{ListenerId, TelemetryListener};
use crate::metrics::store::TelemetryStore;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Clonable handle to a store guarded by a single lock.
///
/// Writers and multi-column readers all go through the same mutex, so a
/// reader never sees a row that is only partially written. Listeners are
/// invoked with the lock held.
#[derive(Debug, Clone, Default)]
pub struct SharedTelemetryStore {
    inner: Arc<Mutex<TelemetryStore>>,
}

impl SharedTelemetryStore {
    pub fn new(store: TelemetryStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    pub fn with_growth_chunk(growth_chunk: usize) -> Self {
        Self::new(TelemetryStore::new(growth_chunk))
    }

    fn lock(&self) -> MutexGuard<'_, TelemetryStore> {
        // A panicking listener must not take the whole history down with it.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record_sample(&self, raw: MonitoredSample) {
        self.lock().record_sample(raw);
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    pub fn set_max_heap_size(&self, bytes: i64) {
        self.lock().set_max_heap_size(bytes);
    }

    pub fn subscribe(&self, listener: Arc<dyn TelemetryListener>) -> ListenerId {
        self.lock().subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.lock().unsubscribe(id)
    }

    pub fn item_count(&self) -> usize {
        self.lock().item_count()
    }

    /// # Panics
    ///
    /// Panics if `index` is not a stored row.
    pub fn snapshot(&self, index: usize) -> TelemetrySample {
        self.lock().get_sample(index)
    }

    /// Runs `f` with the lock held, for reads spanning several columns.
    pub fn read<T>(&self, f: impl FnOnce(&TelemetryStore) -> T) -> T {
        f(&self.lock())
    }
}
