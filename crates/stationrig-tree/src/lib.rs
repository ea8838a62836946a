//! Configuration hierarchy reconstruction for stationrig.
//!
//! A configuration's mount history is a flat list of interval-stamped
//! actions; this crate replays that history against a probe instant and
//! materializes the physical assembly tree — what was mounted on what at
//! that moment.
//!
//! # Design
//!
//! - The forest is ephemeral, derived state. It is rebuilt from scratch on
//!   every probe-instant change; there is no incremental update path.
//! - Nodes own their children and store no parent back-pointers. Parenthood
//!   is always a derived traversal, which keeps ownership acyclic.
//! - Unresolvable parent references degrade to orphan promotion instead of
//!   erroring: equipment whose parent is no longer active stays visible at
//!   the root so an operator can act on it.

mod error;
mod node;
mod resolver;
mod tree;

pub use error::TreeError;
pub use node::{ConfigurationNode, DeviceNode, NodeId, PlatformNode};
pub use resolver::{active_mounts, build_configuration_tree};
pub use tree::{ConfigurationsTree, ParentQuery, PreOrderIter};

/// Result type for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;
