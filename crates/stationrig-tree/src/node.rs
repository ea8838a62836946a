//! Tree node variants wrapping mount actions.
//!
//! `PlatformNode` and `DeviceNode` share one capability surface and differ
//! only in id prefix and the subject kind they wrap. Both can own children —
//! a device may itself carry child devices — so the children collection is
//! another [`ConfigurationsTree`], and nested lookups reuse the forest's
//! traversals unchanged.
//!
//! Nodes never store a parent back-pointer. Parenthood and ancestry are
//! derived queries on the tree, which keeps the ownership graph acyclic.

use std::fmt;
use std::sync::Arc;

use stationrig_model::{MountAction, SubjectId, SubjectKind};

use crate::ConfigurationsTree;

/// Kind-prefixed node identifier.
///
/// Platforms and devices come from separate upstream id namespaces, so a
/// bare subject id is ambiguous inside one tree. The prefix (`platform-` /
/// `device-`) keeps the namespaces from colliding.
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct NodeId {
    pub kind: SubjectKind,
    pub subject: SubjectId,
}

impl NodeId {
    pub fn platform(subject: impl Into<SubjectId>) -> Self {
        Self { kind: SubjectKind::Platform, subject: subject.into() }
    }

    pub fn device(subject: impl Into<SubjectId>) -> Self {
        Self { kind: SubjectKind::Device, subject: subject.into() }
    }

    /// Parse a prefixed id string (`platform-7`, `device-42`). Returns `None`
    /// for anything without a known prefix.
    pub fn parse(s: &str) -> Option<Self> {
        if let Some(rest) = s.strip_prefix("platform-") {
            Some(Self::platform(rest))
        } else {
            s.strip_prefix("device-").map(Self::device)
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.subject)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}-{})", self.kind, self.subject)
    }
}

/// A platform in the assembly hierarchy.
#[derive(Debug, Clone)]
pub struct PlatformNode {
    action: Arc<MountAction>,
    children: ConfigurationsTree,
}

/// A device in the assembly hierarchy.
#[derive(Debug, Clone)]
pub struct DeviceNode {
    action: Arc<MountAction>,
    children: ConfigurationsTree,
}

/// One node of the configuration forest.
///
/// Node identity is the identity of the wrapped action: clones share the
/// same `Arc`, and [`ConfigurationNode::same_node`] compares by pointer.
/// Structural operations on the tree (`remove`, `parent_of`, `ancestors_of`)
/// all use that identity, while `get_by_id` compares [`NodeId`]s by value.
#[derive(Debug, Clone)]
pub enum ConfigurationNode {
    Platform(PlatformNode),
    Device(DeviceNode),
}

impl ConfigurationNode {
    /// Wrap a platform mount action.
    pub fn platform(action: Arc<MountAction>) -> Self {
        Self::Platform(PlatformNode { action, children: ConfigurationsTree::new() })
    }

    /// Wrap a device mount action.
    pub fn device(action: Arc<MountAction>) -> Self {
        Self::Device(DeviceNode { action, children: ConfigurationsTree::new() })
    }

    /// Pick the variant from the action's own subject kind.
    pub fn from_action(action: Arc<MountAction>) -> Self {
        match action.kind {
            SubjectKind::Platform => Self::platform(action),
            SubjectKind::Device => Self::device(action),
        }
    }

    pub fn kind(&self) -> SubjectKind {
        match self {
            Self::Platform(_) => SubjectKind::Platform,
            Self::Device(_) => SubjectKind::Device,
        }
    }

    /// Kind-prefixed node id.
    pub fn id(&self) -> NodeId {
        NodeId { kind: self.kind(), subject: self.unpack().subject_id.clone() }
    }

    /// Display name: the subject name, with the offsets suffix when any
    /// offset component is non-zero.
    pub fn name(&self) -> String {
        self.unpack().display_name()
    }

    /// Both variants accept children; devices can carry child devices.
    pub fn can_have_children(&self) -> bool {
        true
    }

    pub fn children(&self) -> &ConfigurationsTree {
        match self {
            Self::Platform(n) => &n.children,
            Self::Device(n) => &n.children,
        }
    }

    pub fn children_mut(&mut self) -> &mut ConfigurationsTree {
        match self {
            Self::Platform(n) => &mut n.children,
            Self::Device(n) => &mut n.children,
        }
    }

    /// The wrapped mount action. The `Arc` is shared, never copied, so
    /// callers can hold on to the same allocation they pushed.
    pub fn unpack(&self) -> &Arc<MountAction> {
        match self {
            Self::Platform(n) => &n.action,
            Self::Device(n) => &n.action,
        }
    }

    /// Structural identity: same wrapped action allocation.
    pub fn same_node(&self, other: &ConfigurationNode) -> bool {
        Arc::ptr_eq(self.unpack(), other.unpack())
    }
}

// ============================================================================
// Tests
// ============================================================================
