//! Mount actions — the primitive events of a configuration history.
//!
//! A [`MountAction`] records that one subject (device or platform) was
//! physically attached to a parent for a time interval. `end_date = None`
//! means the subject is still mounted. A subject may be re-mounted many
//! times over a configuration's life; at most one of its actions is active
//! at any given instant.
//!
//! Actions are immutable by convention: build one, hand it around behind an
//! `Arc`, never mutate it in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{ContactId, ModelError, SubjectId};
use crate::ids::ActionId;

/// What kind of subject a mount action attaches.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SubjectKind {
    Platform,
    Device,
}

/// Spatial offsets of a subject relative to its parent, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offsets {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Offsets {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// True when all three components are exactly zero.
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

impl std::fmt::Display for Offsets {
    /// Renders as `(x=1m, y=0m, z=2.5m)` — whole meters without a decimal
    /// point, matching how operators read offset labels in the tree view.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(x={}m, y={}m, z={}m)", self.x, self.y, self.z)
    }
}

/// One mount event in a configuration's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountAction {
    /// Id of the action record itself.
    pub id: ActionId,
    /// Id of the mounted subject, in its kind's upstream namespace.
    pub subject_id: SubjectId,
    /// Human-readable subject name (device short name / platform name).
    pub subject_name: String,
    pub kind: SubjectKind,
    /// Parent platform the subject was mounted on, if any.
    #[serde(default)]
    pub parent_platform_id: Option<SubjectId>,
    /// Parent device the subject was mounted on. Only meaningful for device
    /// subjects, and mutually exclusive with `parent_platform_id`.
    #[serde(default)]
    pub parent_device_id: Option<SubjectId>,
    pub begin_date: DateTime<Utc>,
    /// `None` = still mounted. Must be ≥ `begin_date` when present; see
    /// [`MountAction::validate`].
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub offsets: Offsets,
    /// EPSG code of the coordinate reference system the offsets live in.
    #[serde(default)]
    pub epsg_code: String,
    #[serde(default)]
    pub elevation_datum_name: String,
    #[serde(default)]
    pub elevation_datum_uri: String,
    /// Contact responsible for the mount.
    #[serde(default)]
    pub begin_contact_id: Option<ContactId>,
    /// Contact responsible for the unmount.
    #[serde(default)]
    pub end_contact_id: Option<ContactId>,
    #[serde(default)]
    pub begin_description: String,
    #[serde(default)]
    pub end_description: Option<String>,
    #[serde(default)]
    pub label: String,
}

impl MountAction {
    /// Create a minimal open-ended mount action. Optional fields start empty
    /// and are filled in with the `with_*` builders.
    pub fn new(
        id: impl Into<ActionId>,
        kind: SubjectKind,
        subject_id: impl Into<SubjectId>,
        subject_name: impl Into<String>,
        begin_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            subject_id: subject_id.into(),
            subject_name: subject_name.into(),
            kind,
            parent_platform_id: None,
            parent_device_id: None,
            begin_date,
            end_date: None,
            offsets: Offsets::default(),
            epsg_code: String::new(),
            elevation_datum_name: String::new(),
            elevation_datum_uri: String::new(),
            begin_contact_id: None,
            end_contact_id: None,
            begin_description: String::new(),
            end_description: None,
            label: String::new(),
        }
    }

    pub fn with_end(mut self, end_date: DateTime<Utc>) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_parent_platform(mut self, parent: impl Into<SubjectId>) -> Self {
        self.parent_platform_id = Some(parent.into());
        self
    }

    pub fn with_parent_device(mut self, parent: impl Into<SubjectId>) -> Self {
        self.parent_device_id = Some(parent.into());
        self
    }

    pub fn with_offsets(mut self, x: f64, y: f64, z: f64) -> Self {
        self.offsets = Offsets::new(x, y, z);
        self
    }

    pub fn with_begin_contact(mut self, contact: impl Into<ContactId>) -> Self {
        self.begin_contact_id = Some(contact.into());
        self
    }

    pub fn with_end_contact(mut self, contact: impl Into<ContactId>) -> Self {
        self.end_contact_id = Some(contact.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_descriptions(
        mut self,
        begin: impl Into<String>,
        end: Option<String>,
    ) -> Self {
        self.begin_description = begin.into();
        self.end_description = end;
        self
    }

    pub fn with_reference_system(
        mut self,
        epsg_code: impl Into<String>,
        datum_name: impl Into<String>,
        datum_uri: impl Into<String>,
    ) -> Self {
        self.epsg_code = epsg_code.into();
        self.elevation_datum_name = datum_name.into();
        self.elevation_datum_uri = datum_uri.into();
        self
    }

    /// Whether this action's interval `[begin, end-or-∞]` contains `instant`.
    pub fn is_active_at(&self, instant: DateTime<Utc>) -> bool {
        if self.begin_date > instant {
            return false;
        }
        match self.end_date {
            Some(end) => end >= instant,
            None => true,
        }
    }

    /// Subject name, with the offsets appended when any component is non-zero.
    pub fn display_name(&self) -> String {
        if self.offsets.is_zero() {
            self.subject_name.clone()
        } else {
            format!("{} {}", self.subject_name, self.offsets)
        }
    }

    /// Check interval sanity. The tree resolver deliberately does not call
    /// this — malformed histories degrade, they don't fail (§ orphan
    /// promotion) — but ingest paths can reject bad records up front.
    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(end) = self.end_date
            && end < self.begin_date
        {
            return Err(ModelError::EndBeforeBegin {
                action: self.id.clone(),
                begin: self.begin_date,
                end,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
