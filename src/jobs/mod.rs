//! Asynchronous review jobs.
//!
//! The queue is the worker actor's mailbox: unbounded, strict FIFO, drained
//! by exactly one consumer. `enqueue` is a cast and returns immediately.

mod worker;

pub use worker::{JobQueueHandle, JobWorkerMessage, spawn};
