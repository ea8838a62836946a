//! Generic configuration actions — maintenance visits, calibrations, notes.
//!
//! Unlike mount actions these carry no hierarchy information; they exist only
//! to be interleaved into the chronology. Both dates are optional: a note
//! without an instant is legal and sorts to the very end of the timeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ActionId, ContactId};

/// A free-form dated (or undated) action on a configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericAction {
    pub id: ActionId,
    /// Free-text action type, e.g. "Maintenance" or "Site visit".
    pub action_type_name: String,
    #[serde(default)]
    pub begin_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub contact_id: Option<ContactId>,
    #[serde(default)]
    pub description: String,
}

impl GenericAction {
    pub fn new(id: impl Into<ActionId>, action_type_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            action_type_name: action_type_name.into(),
            begin_date: None,
            end_date: None,
            contact_id: None,
            description: String::new(),
        }
    }

    pub fn with_begin(mut self, begin: DateTime<Utc>) -> Self {
        self.begin_date = Some(begin);
        self
    }

    pub fn with_end(mut self, end: DateTime<Utc>) -> Self {
        self.end_date = Some(end);
        self
    }

    pub fn with_contact(mut self, contact: impl Into<ContactId>) -> Self {
        self.contact_id = Some(contact.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
