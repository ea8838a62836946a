//! Typed identifiers for actions, subjects, and contacts.
//!
//! All ids wrap the string identifiers handed over by the upstream inventory
//! service. They're opaque here — no parsing, no structure — the newtypes
//! exist so an action id can never be passed where a subject id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a mount or generic action record.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(String);

/// Identifier of a mount subject (a device or a platform).
///
/// Device and platform ids live in separate upstream namespaces and may
/// collide as raw strings; disambiguation happens at the tree layer via
/// kind-prefixed node ids.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

/// Identifier of a responsible contact (person).
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(String);

macro_rules! impl_string_id {
    ($T:ident, $name:literal) => {
        impl $T {
            /// Wrap an upstream identifier string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The raw identifier string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $T {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $T {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $name, self.0)
            }
        }
    };
}

impl_string_id!(ActionId, "ActionId");
impl_string_id!(SubjectId, "SubjectId");
impl_string_id!(ContactId, "ContactId");

// ============================================================================
// Tests
// ============================================================================
