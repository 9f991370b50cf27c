use std::sync::Arc;

/// Receives store change events.
///
/// Handlers run synchronously on the producer's thread while the store lock
/// is held, so they must return quickly and must not call back into the
/// same store.
pub trait TelemetryListener: Send + Sync {
    fn on_reset(&self) {}

    fn on_sample_appended(&self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
pub struct ChangeNotifier {
    listeners: Vec<(ListenerId, Arc<dyn TelemetryListener>)>,
    next_id: u64,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Arc<dyn TelemetryListener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn notify_reset(&self) {
        for (_, listener) in &self.listeners {
            listener.on_reset();
        }
    }

    pub fn notify_sample_appended(&self) {
        for (_, listener) in &self.listeners {
            listener.on_sample_appended();
        }
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
