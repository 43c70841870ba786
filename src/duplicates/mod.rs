//! Exact-duplicate detection: grouping by content fingerprint and safe
//! relocation of duplicate copies.

pub mod grouper;
pub mod mover;

pub use grouper::{
    group_by_fingerprint, hash_candidates, size_candidates, DuplicateGroup, GroupingStats, Role,
    SizePassStats,
};
pub use mover::{move_duplicates, FailedMove, MoveError, MoveRecord, MoveReport};
