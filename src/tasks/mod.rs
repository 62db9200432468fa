//! Background Tasks Module
//!
//! Contains the tasks spawned while serving batch lookups.
//!
//! # Tasks
//! - Lookup: Resolves one item code through the cache and reports the outcome

mod lookup;

pub use lookup::spawn_lookup_task;
