//! Audio transforms over [`crate::buffer::SampleBuffer`]s.
//!
//! Everything here is a synchronous pure function: no shared state, no
//! locking, no I/O. Callers that need non-blocking behavior dispatch these
//! to a worker thread themselves; a single call is one bounded CPU-bound
//! step.

pub mod align;
pub mod autotune;
pub mod remix;
pub mod resample;
