//! Timeline entries — the heterogeneous rows of the chronology.
//!
//! Mount and unmount rows are two views of the same [`MountAction`]: the
//! mount row speaks for the begin instant (begin contact, begin
//! description), the unmount row for the end instant. An unmount row is
//! derived display state only — there is no separate unmount record
//! upstream.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use stationrig_model::{ActionId, ContactId, GenericAction, MountAction, SubjectKind};
use strum::{Display, EnumString};

/// Discriminant of a timeline entry, used for filter selections.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum EntryKind {
    PlatformMount,
    PlatformUnmount,
    DeviceMount,
    DeviceUnmount,
    Generic,
}

/// One row of the configuration chronology.
#[derive(Debug, Clone)]
pub enum TimelineEntry {
    PlatformMount(Arc<MountAction>),
    PlatformUnmount(Arc<MountAction>),
    DeviceMount(Arc<MountAction>),
    DeviceUnmount(Arc<MountAction>),
    Generic(Arc<GenericAction>),
}

impl TimelineEntry {
    /// Build the mount-side row for an action, picking the variant from the
    /// action's subject kind.
    pub fn mount(action: Arc<MountAction>) -> Self {
        match action.kind {
            SubjectKind::Platform => Self::PlatformMount(action),
            SubjectKind::Device => Self::DeviceMount(action),
        }
    }

    /// Build the unmount-side row for an action. Meaningful only for actions
    /// with an end date; an open-ended action yields a row with no instant.
    pub fn unmount(action: Arc<MountAction>) -> Self {
        match action.kind {
            SubjectKind::Platform => Self::PlatformUnmount(action),
            SubjectKind::Device => Self::DeviceUnmount(action),
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Self::PlatformMount(_) => EntryKind::PlatformMount,
            Self::PlatformUnmount(_) => EntryKind::PlatformUnmount,
            Self::DeviceMount(_) => EntryKind::DeviceMount,
            Self::DeviceUnmount(_) => EntryKind::DeviceUnmount,
            Self::Generic(_) => EntryKind::Generic,
        }
    }

    /// The instant this row acts at. Mount rows act at the begin date,
    /// unmount rows at the end date, generic rows at their begin date.
    /// `None` sorts as older than everything.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::PlatformMount(a) | Self::DeviceMount(a) => Some(a.begin_date),
            Self::PlatformUnmount(a) | Self::DeviceUnmount(a) => a.end_date,
            Self::Generic(a) => a.begin_date,
        }
    }

    /// Precedence for same-instant ordering, newest-acting highest:
    /// device-unmount > platform-unmount > device-mount > platform-mount >
    /// generic.
    pub fn logic_order(&self) -> u16 {
        match self {
            Self::DeviceUnmount(_) => 400,
            Self::PlatformUnmount(_) => 300,
            Self::DeviceMount(_) => 200,
            Self::PlatformMount(_) => 100,
            Self::Generic(_) => 0,
        }
    }

    /// Identity of the underlying mount action, shared by a mount row and
    /// its unmount bookend. `None` for generic rows.
    pub fn mount_identity(&self) -> Option<&ActionId> {
        match self {
            Self::PlatformMount(a)
            | Self::PlatformUnmount(a)
            | Self::DeviceMount(a)
            | Self::DeviceUnmount(a) => Some(&a.id),
            Self::Generic(_) => None,
        }
    }

    pub fn is_mount(&self) -> bool {
        matches!(self, Self::PlatformMount(_) | Self::DeviceMount(_))
    }

    pub fn is_unmount(&self) -> bool {
        matches!(self, Self::PlatformUnmount(_) | Self::DeviceUnmount(_))
    }

    /// The responsible contact for this row's side of the action.
    pub fn contact_id(&self) -> Option<&ContactId> {
        match self {
            Self::PlatformMount(a) | Self::DeviceMount(a) => a.begin_contact_id.as_ref(),
            Self::PlatformUnmount(a) | Self::DeviceUnmount(a) => a.end_contact_id.as_ref(),
            Self::Generic(a) => a.contact_id.as_ref(),
        }
    }

    /// The free-text description for this row's side of the action.
    pub fn description(&self) -> &str {
        match self {
            Self::PlatformMount(a) | Self::DeviceMount(a) => &a.begin_description,
            Self::PlatformUnmount(a) | Self::DeviceUnmount(a) => {
                a.end_description.as_deref().unwrap_or("")
            }
            Self::Generic(a) => &a.description,
        }
    }

    /// Operator-facing row headline.
    pub fn headline(&self) -> String {
        match self {
            Self::PlatformMount(a) | Self::DeviceMount(a) => {
                format!("{} mounted", a.subject_name)
            }
            Self::PlatformUnmount(a) | Self::DeviceUnmount(a) => {
                format!("{} unmounted", a.subject_name)
            }
            Self::Generic(a) => a.action_type_name.clone(),
        }
    }

    /// The years this row belongs to for year filtering.
    ///
    /// A generic row with both dates spans every year of its inclusive
    /// range; every other row belongs to the single year of its instant.
    /// A row without an instant belongs to no year at all.
    pub fn years(&self) -> Vec<i32> {
        if let Self::Generic(a) = self
            && let (Some(begin), Some(end)) = (a.begin_date, a.end_date)
            && end.year() >= begin.year()
        {
            return (begin.year()..=end.year()).collect();
        }
        match self.instant() {
            Some(t) => vec![t.year()],
            None => Vec::new(),
        }
    }

    /// Whether this row matches a single selected year.
    pub fn matches_year(&self, year: i32) -> bool {
        self.years().contains(&year)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn device_action() -> Arc<MountAction> {
        Arc::new(
            MountAction::new("m1", SubjectKind::Device, "d1", "Sensor", at(2020, 3, 1))
                .with_end(at(2022, 9, 1))
                .with_begin_contact("alice")
                .with_end_contact("bob")
                .with_descriptions("installed", Some("retired".to_string())),
        )
    }

    #[test]
    fn test_mount_and_unmount_rows_split_the_action() {
        let action = device_action();
        let mount = TimelineEntry::mount(action.clone());
        let unmount = TimelineEntry::unmount(action);

        assert_eq!(mount.kind(), EntryKind::DeviceMount);
        assert_eq!(unmount.kind(), EntryKind::DeviceUnmount);
        assert_eq!(mount.instant(), Some(at(2020, 3, 1)));
        assert_eq!(unmount.instant(), Some(at(2022, 9, 1)));
        assert_eq!(mount.contact_id(), Some(&"alice".into()));
        assert_eq!(unmount.contact_id(), Some(&"bob".into()));
        assert_eq!(mount.description(), "installed");
        assert_eq!(unmount.description(), "retired");
        assert_eq!(mount.mount_identity(), unmount.mount_identity());
    }

    #[test]
    fn test_logic_order_table() {
        let platform = Arc::new(MountAction::new(
            "m2",
            SubjectKind::Platform,
            "p1",
            "Mast",
            at(2020, 1, 1),
        ));
        let device = device_action();
        let generic = Arc::new(GenericAction::new("g1", "Maintenance"));

        let device_unmount = TimelineEntry::unmount(device.clone());
        let platform_unmount = TimelineEntry::unmount(platform.clone());
        let device_mount = TimelineEntry::mount(device);
        let platform_mount = TimelineEntry::mount(platform);
        let generic = TimelineEntry::Generic(generic);

        assert!(device_unmount.logic_order() > platform_unmount.logic_order());
        assert!(platform_unmount.logic_order() > device_mount.logic_order());
        assert!(device_mount.logic_order() > platform_mount.logic_order());
        assert!(platform_mount.logic_order() > generic.logic_order());
    }

    #[test]
    fn test_generic_year_range_is_inclusive() {
        let action = GenericAction::new("g1", "Campaign")
            .with_begin(at(2019, 11, 1))
            .with_end(at(2022, 2, 1));
        let entry = TimelineEntry::Generic(Arc::new(action));
        assert_eq!(entry.years(), vec![2019, 2020, 2021, 2022]);
        assert!(entry.matches_year(2021));
        assert!(!entry.matches_year(2023));
    }

    #[test]
    fn test_mount_rows_match_a_single_year() {
        let action = device_action();
        let mount = TimelineEntry::mount(action.clone());
        let unmount = TimelineEntry::unmount(action);
        assert_eq!(mount.years(), vec![2020]);
        assert_eq!(unmount.years(), vec![2022]);
    }

    #[test]
    fn test_undated_entry_has_no_year_and_no_instant() {
        let entry = TimelineEntry::Generic(Arc::new(GenericAction::new("g1", "Note")));
        assert_eq!(entry.instant(), None);
        assert!(entry.years().is_empty());
        assert!(!entry.matches_year(2020));
    }

    #[test]
    fn test_entry_kind_strings_are_kebab_case() {
        assert_eq!(EntryKind::DeviceUnmount.to_string(), "device-unmount");
        assert_eq!(
            "platform-mount".parse::<EntryKind>().unwrap(),
            EntryKind::PlatformMount
        );
    }
}
