//! Background Tasks Module
//!
//! - TTL Cleanup: purges expired in-memory entries at a fixed interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
