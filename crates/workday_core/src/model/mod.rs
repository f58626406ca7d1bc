//! Domain model for processes, buckets and tasks.
//!
//! # Responsibility
//! - Define the persisted record shapes shared by store and storage layers.
//! - Keep serialized field names compatible with existing documents.
//!
//! # Invariants
//! - Tasks are addressed by `(process_id, BucketDate, task id)`.
//! - Deletion is a hard removal; there are no tombstones.

pub mod bucket;
pub mod process;
pub mod seed;
pub mod task;
