// src/events/mod.rs

//! Observable daemon events.
//!
//! - [`event`] defines [`ServerEvent`] (kind + payload) and [`EventKind`].
//! - [`bus`] is the synchronous publish/subscribe registry observers attach to.
//! - [`log`] provides [`LogObserver`], which renders every event through
//!   `tracing`.
//!
//! Observers are registered before the server starts. After that the bus is
//! frozen behind an `Arc` and shared by the router and connection handlers.

pub mod bus;
pub mod event;
pub mod log;

pub use bus::{EventBus, Observer};
pub use event::{EventKind, ServerEvent};
pub use log::LogObserver;
