//! Subscribers: pluggable consumers of a photo's event stream.
//!
//! ## Contents
//! - [`Subscribe`] — the subscriber contract;
//! - [`SubscriberSet`] — non-blocking fan-out with per-subscriber queues;
//! - [`LogWriter`] — a built-in subscriber writing through the `log` facade.
//!
//! Wire a set to a photo by subscribing to its bus and emitting into the set:
//! the outer registry observes `StatusChanged` this way instead of being
//! called from inside a status setter.

mod log;
mod set;
mod subscribe;

pub use self::log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
