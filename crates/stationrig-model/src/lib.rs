//! Value entities for stationrig — mount actions, generic actions, typed ids.
//!
//! This crate is the shared vocabulary of the workspace: plain immutable
//! records with named fields, no behavior beyond interval queries, display
//! formatting, and validation. The tree and chronology crates both consume
//! these types behind `Arc`s.

mod error;
mod generic;
mod ids;
mod mount;

pub use error::ModelError;
pub use generic::GenericAction;
pub use ids::{ActionId, ContactId, SubjectId};
pub use mount::{MountAction, Offsets, SubjectKind};

/// Result type for model validation.
pub type Result<T> = std::result::Result<T, ModelError>;
