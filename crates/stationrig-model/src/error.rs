//! Error types for model validation.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::ActionId;

/// Errors that can occur while validating action records.
#[derive(Error, Debug)]
pub enum ModelError {
    /// A mount action whose end instant precedes its begin instant.
    #[error("action {action:?} ends at {end} before it begins at {begin}")]
    EndBeforeBegin {
        action: ActionId,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}
