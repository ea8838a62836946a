//! Error types for tree operations.

use thiserror::Error;

/// Errors that can occur during forest operations.
///
/// Lookups that can legitimately miss (`get_by_id`, `path_to`, `parent_of`)
/// return empty results instead of erroring — an unmounted or orphaned
/// subject is normal state. Only caller mistakes surface here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Indexed root access outside the forest bounds.
    #[error("index {index} out of range for forest with {len} roots")]
    IndexOutOfRange { index: usize, len: usize },
}
