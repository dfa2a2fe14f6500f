use std::sync::{Arc, Mutex};
use std::time::Duration;

use procpool::events::{EventBus, EventKind, Observer, ServerEvent};

/// Observer that keeps every event it sees, in order.
#[derive(Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<ServerEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bus with this recorder registered for every kind.
    pub fn bus(&self) -> Arc<EventBus> {
        let mut bus = EventBus::new();
        bus.on_all(self.clone());
        Arc::new(bus)
    }

    pub fn events(&self) -> Vec<ServerEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.events().iter().map(ServerEvent::kind).collect()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events().iter().filter(|e| e.kind() == kind).count()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ServerEvent::Error { message } => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    /// Poll until at least `n` events of `kind` were recorded.
    ///
    /// Panics after 5 seconds.
    pub async fn wait_for(&self, kind: EventKind, n: usize) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while self.count(kind) < n {
            if tokio::time::Instant::now() > deadline {
                panic!(
                    "timed out waiting for {n} {kind} events; got {:?}",
                    self.kinds()
                );
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl Observer for EventRecorder {
    fn on_event(&self, event: &ServerEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
