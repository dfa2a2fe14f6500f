#![allow(dead_code)]

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;

use procpool::engine::{CommandRouter, Runtime, RuntimeEvent, RuntimeHandle};
use procpool::events::EventBus;
use procpool_test_utils::{EventRecorder, FakeProcesses};

pub use procpool_test_utils::{init_tracing, with_timeout};

/// Router whose events all land in the returned recorder.
pub fn router_with_recorder() -> (CommandRouter, EventRecorder) {
    let recorder = EventRecorder::new();
    let router = CommandRouter::new(recorder.bus(), Instant::now());
    (router, recorder)
}

/// Runtime actor on a fake launcher, already spawned.
pub fn spawn_fake_runtime(bus: Arc<EventBus>) -> (RuntimeHandle, FakeProcesses) {
    let (tx, rx) = mpsc::channel::<RuntimeEvent>(64);
    let procs = FakeProcesses::new(tx.clone());
    let router = CommandRouter::new(bus, Instant::now());
    tokio::spawn(Runtime::new(router, rx, procs.launcher()).run());
    (RuntimeHandle::new(tx), procs)
}
