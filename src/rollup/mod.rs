//! Annual rollup recomputation.
//!
//! Merges twelve monthly summaries into one annual document while
//! re-deriving participant counts and medians from the raw event archives,
//! so a shaver active in several months is counted exactly once.

pub mod annual;
pub mod attendance;
pub mod categories;
pub mod metadata;
pub mod rank;
pub mod recompute;
pub mod utility;
