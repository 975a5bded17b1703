//! Scheduler: the single-concurrency run queue.
//!
//! The only public type is [`RunQueue`]; see its module for the event flow
//! and the drain/timeout rules.

mod run_queue;

pub use run_queue::RunQueue;
