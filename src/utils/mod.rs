//! Shared helpers for the index calculators
//!
//! - Key columns: column validation, string casting, null-key row skipping
//! - Group index: encounter-ordered grouping and distinct counting

pub mod key_columns;
pub mod group_index;

pub use key_columns::{require_columns, string_column, KeyColumns};
pub use group_index::{DistinctCounter, GroupIndex};
