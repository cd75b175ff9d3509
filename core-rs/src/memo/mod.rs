/**
 * memo module
 * Persisted port memoization (.fports file format)
 */

pub mod store;

pub use store::{FileMemo, MemoMap, MemoStore};
