//! Pure reconciliation rules for observation export.
//!
//! - [`resolve`]: collapses the concurrent forks of one element to a single
//!   winner (most recent timestamp, then greatest version)
//! - [`merge_observations`]: folds observation tags onto a feature, oldest
//!   observation first, and classifies the result as create or modify
//! - [`Changeset`]: collects merged features and renumbers created ones to
//!   `-1, -2, ...`
//!
//! Every function here is deterministic: given the same resolved records the
//! output never depends on the order in which a store returned them.

mod fork;
mod renumber;
mod tags;

pub use fork::{compare_recency, latest, resolve, sort_oldest_first};
pub use renumber::{renumber_created, Changeset};
pub use tags::merge_observations;
