//! Shared leaf utilities for the ScholarShare client crates: wall-clock
//! abstraction, countdown timer, bounded retry, abortable tasks, and
//! tracing setup. No domain knowledge lives here.

pub mod clock;
pub mod countdown;
pub mod retry;
pub mod task;
pub mod tracing;
