//! Lifecycle events: types and broadcast bus.
//!
//! Groups the event **data model** and the **bus** used to publish and
//! subscribe to events emitted by the run queue and the photo.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] — classification and payload metadata
//! - [`Bus`] — thin wrapper over `tokio::sync::broadcast`
//!
//! Publishers: the queue worker (run lifecycle, drain) and the photo (status
//! transitions, cycle boundaries). Consumers: the photo's event forwarder,
//! completion waits, and any attached subscribers.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
