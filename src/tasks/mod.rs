//! Background Tasks Module
//!
//! Tasks that run periodically alongside the cache server.
//!
//! # Tasks
//! - TTL sweeper: drops expired entries at the configured interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
