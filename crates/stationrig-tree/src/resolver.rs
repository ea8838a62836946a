//! Reconstruction of the assembly hierarchy at a probe instant.
//!
//! Given the full mount history of one configuration, [`build_configuration_tree`]
//! replays it against a probe instant and returns the forest of what was
//! physically mounted on what at that moment.
//!
//! Failure semantics are deliberately lenient: a parent reference that
//! doesn't resolve to a currently-active subject never errors. The child is
//! promoted to a root instead, so an operator can still see and explicitly
//! unmount orphaned equipment. Malformed histories degrade, they don't fail.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet, map::Entry};
use stationrig_model::{MountAction, SubjectId, SubjectKind};
use tracing::debug;

use crate::{ConfigurationNode, ConfigurationsTree, NodeId};

/// Select the mount action active at `probe` for each subject.
///
/// An action survives when its interval `[begin, end-or-∞]` contains the
/// probe instant. When several actions for the same subject overlap at the
/// probe instant, the one with the latest `begin_date` wins; exact begin
/// ties fall to the later entry in input order. The map keeps input order,
/// so downstream iteration is deterministic for a given history.
pub fn active_mounts(
    actions: &[Arc<MountAction>],
    probe: DateTime<Utc>,
) -> IndexMap<SubjectId, Arc<MountAction>> {
    let mut active: IndexMap<SubjectId, Arc<MountAction>> = IndexMap::new();
    for action in actions {
        if !action.is_active_at(probe) {
            continue;
        }
        match active.entry(action.subject_id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(action.clone());
            }
            Entry::Occupied(mut slot) => {
                if action.begin_date >= slot.get().begin_date {
                    debug!(
                        subject = %action.subject_id,
                        superseded = %slot.get().id,
                        by = %action.id,
                        "overlapping active mounts; keeping the later begin",
                    );
                    slot.insert(action.clone());
                }
            }
        }
    }
    active
}

/// Rebuild the configuration forest valid at `probe`.
///
/// Platforms come first in root order, then devices, each in the input order
/// of their surviving actions. A device's parent is its recorded platform,
/// or — when no parent platform is recorded — its recorded parent device;
/// a platform's parent is always a platform. Any parent that is not itself
/// active at the probe instant triggers orphan promotion.
pub fn build_configuration_tree(
    platform_actions: &[Arc<MountAction>],
    device_actions: &[Arc<MountAction>],
    probe: DateTime<Utc>,
) -> ConfigurationsTree {
    let platforms = active_mounts(platform_actions, probe);
    let devices = active_mounts(device_actions, probe);

    // Actions keyed by node id, platforms first — this fixes root order.
    let mut actions: IndexMap<NodeId, Arc<MountAction>> = IndexMap::new();
    for (subject, action) in &platforms {
        actions.insert(NodeId::platform(subject.clone()), action.clone());
    }
    for (subject, action) in &devices {
        actions.insert(NodeId::device(subject.clone()), action.clone());
    }

    // Resolve each subject's parent among the survivors.
    let mut children: IndexMap<NodeId, Vec<NodeId>> = IndexMap::new();
    let mut roots: Vec<NodeId> = Vec::new();
    for (id, action) in &actions {
        match resolve_parent(action, &platforms, &devices) {
            Some(parent) => children.entry(parent).or_default().push(id.clone()),
            None => roots.push(id.clone()),
        }
    }

    // Assemble root-first. The placed set guarantees every subject appears
    // at most once even if the adjacency data is degenerate.
    let mut placed: IndexSet<NodeId> = IndexSet::new();
    let mut tree = ConfigurationsTree::new();
    for id in &roots {
        if let Some(node) = assemble(id, &actions, &children, &mut placed) {
            tree.push(node);
        }
    }

    // Subjects whose parent chain never reaches a root (cyclic parent
    // records in a corrupt history) still must not be dropped.
    let unplaced: Vec<NodeId> =
        actions.keys().filter(|id| !placed.contains(*id)).cloned().collect();
    for id in unplaced {
        if let Some(node) = assemble(&id, &actions, &children, &mut placed) {
            debug!(node = %id, "parent chain unreachable from any root; promoting");
            tree.push(node);
        }
    }

    tree
}

/// The parent node id of `action`, if that parent is active. `None` means
/// the subject becomes a root — either genuinely unattached or orphaned.
fn resolve_parent(
    action: &MountAction,
    platforms: &IndexMap<SubjectId, Arc<MountAction>>,
    devices: &IndexMap<SubjectId, Arc<MountAction>>,
) -> Option<NodeId> {
    if let Some(platform_id) = &action.parent_platform_id {
        if platforms.contains_key(platform_id) {
            return Some(NodeId::platform(platform_id.clone()));
        }
        debug!(
            subject = %action.subject_id,
            parent = %platform_id,
            "parent platform not active at probe instant; promoting to root",
        );
        return None;
    }
    if action.kind == SubjectKind::Device
        && let Some(device_id) = &action.parent_device_id
    {
        if devices.contains_key(device_id) {
            return Some(NodeId::device(device_id.clone()));
        }
        debug!(
            subject = %action.subject_id,
            parent = %device_id,
            "parent device not active at probe instant; promoting to root",
        );
    }
    None
}

fn assemble(
    id: &NodeId,
    actions: &IndexMap<NodeId, Arc<MountAction>>,
    children: &IndexMap<NodeId, Vec<NodeId>>,
    placed: &mut IndexSet<NodeId>,
) -> Option<ConfigurationNode> {
    if !placed.insert(id.clone()) {
        return None;
    }
    let action = actions.get(id)?;
    let mut node = ConfigurationNode::from_action(action.clone());
    if let Some(kids) = children.get(id) {
        for kid in kids {
            if let Some(child) = assemble(kid, actions, children, placed) {
                node.children_mut().push(child);
            }
        }
    }
    Some(node)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn platform_mount(id: &str, subject: &str, begin: DateTime<Utc>) -> MountAction {
        MountAction::new(
            id,
            SubjectKind::Platform,
            subject,
            format!("Platform {subject}"),
            begin,
        )
    }

    fn device_mount(id: &str, subject: &str, begin: DateTime<Utc>) -> MountAction {
        MountAction::new(
            id,
            SubjectKind::Device,
            subject,
            format!("Device {subject}"),
            begin,
        )
    }

    fn arcs(actions: Vec<MountAction>) -> Vec<Arc<MountAction>> {
        actions.into_iter().map(Arc::new).collect()
    }

    // ── Active-mount selection ──────────────────────────────────────────

    #[test]
    fn test_active_mounts_filters_by_interval() {
        let t0 = at(2020, 6, 1);
        let actions = arcs(vec![
            platform_mount("m1", "1", at(2020, 1, 1)),
            platform_mount("m2", "2", at(2019, 1, 1)).with_end(at(2019, 12, 31)),
        ]);
        let active = active_mounts(&actions, t0);
        assert_eq!(active.len(), 1);
        assert!(active.contains_key(&SubjectId::from("1")));
    }

    #[test]
    fn test_overlapping_mounts_latest_begin_wins_regardless_of_input_order() {
        let probe = at(2021, 1, 1);
        let early = Arc::new(platform_mount("m-early", "1", at(2019, 1, 1)));
        let late = Arc::new(platform_mount("m-late", "1", at(2020, 1, 1)));

        let forward = active_mounts(&[early.clone(), late.clone()], probe);
        let backward = active_mounts(&[late, early], probe);

        assert_eq!(forward[&SubjectId::from("1")].id, "m-late".into());
        assert_eq!(backward[&SubjectId::from("1")].id, "m-late".into());
    }

    #[test]
    fn test_equal_begin_ties_fall_to_later_input_entry() {
        let probe = at(2021, 1, 1);
        let active = active_mounts(
            &arcs(vec![
                platform_mount("m-a", "1", at(2020, 1, 1)),
                platform_mount("m-b", "1", at(2020, 1, 1)),
            ]),
            probe,
        );
        assert_eq!(active[&SubjectId::from("1")].id, "m-b".into());
    }

    // ── Hierarchy reconstruction ────────────────────────────────────────

    #[test]
    fn test_platform_with_child_device_and_empty_before_begin() {
        let t0 = at(2020, 3, 1);
        let platforms = arcs(vec![platform_mount("pm1", "1", t0)]);
        let devices = arcs(vec![device_mount("dm1", "1", t0).with_parent_platform("1")]);

        let tree = build_configuration_tree(&platforms, &devices, t0);
        assert_eq!(tree.root_count(), 1);
        let root = tree.at(0).unwrap();
        assert_eq!(root.id().to_string(), "platform-1");
        assert_eq!(root.children().root_count(), 1);
        assert_eq!(root.children().at(0).unwrap().id().to_string(), "device-1");

        let earlier = build_configuration_tree(&platforms, &devices, t0 - Duration::seconds(1));
        assert!(earlier.is_empty());
    }

    #[test]
    fn test_device_mounted_on_device() {
        let t0 = at(2020, 3, 1);
        let devices = arcs(vec![
            device_mount("dm1", "logger", t0),
            MountAction::new("dm2", SubjectKind::Device, "sensor", "Sensor", t0)
                .with_parent_device("logger"),
        ]);
        let tree = build_configuration_tree(&[], &devices, t0);
        assert_eq!(tree.root_count(), 1);
        assert_eq!(
            tree.path_to(&NodeId::device("sensor")),
            vec!["Device logger", "Sensor"]
        );
    }

    #[test]
    fn test_orphaned_child_is_promoted_to_root() {
        let t0 = at(2020, 3, 1);
        // The parent platform's mount ended before the probe instant.
        let platforms = arcs(vec![
            platform_mount("pm1", "gone", at(2019, 1, 1)).with_end(at(2019, 6, 1)),
        ]);
        let devices = arcs(vec![
            device_mount("dm1", "d1", t0).with_parent_platform("gone"),
        ]);

        let tree = build_configuration_tree(&platforms, &devices, t0);
        assert_eq!(tree.root_count(), 1);
        assert_eq!(tree.at(0).unwrap().id().to_string(), "device-d1");
    }

    #[test]
    fn test_dangling_parent_reference_never_errors() {
        let t0 = at(2020, 3, 1);
        let devices = arcs(vec![
            device_mount("dm1", "d1", t0).with_parent_platform("no-such"),
        ]);
        let tree = build_configuration_tree(&[], &devices, t0);
        assert_eq!(tree.root_count(), 1);
    }

    #[test]
    fn test_no_subject_appears_twice() {
        let t0 = at(2021, 1, 1);
        // Re-mounted platform: two historical actions, both active intervals
        // overlapping the probe instant.
        let platforms = arcs(vec![
            platform_mount("m1", "1", at(2019, 1, 1)),
            platform_mount("m2", "1", at(2020, 1, 1)),
        ]);
        let tree = build_configuration_tree(&platforms, &[], t0);
        let occurrences = tree
            .flatten()
            .iter()
            .filter(|n| n.id() == NodeId::platform("1"))
            .count();
        assert_eq!(occurrences, 1);
    }

    #[test]
    fn test_every_resolved_action_contains_the_probe_instant() {
        let t0 = at(2020, 6, 15);
        let platforms = arcs(vec![
            platform_mount("m1", "1", at(2020, 1, 1)),
            platform_mount("m2", "2", at(2020, 1, 1)).with_end(at(2020, 12, 31)),
            platform_mount("m3", "3", at(2021, 1, 1)),
        ]);
        let tree = build_configuration_tree(&platforms, &[], t0);
        for node in tree.iter() {
            assert!(node.unpack().is_active_at(t0));
        }
        assert!(tree.get_by_id(&NodeId::platform("3")).is_none());
    }

    #[test]
    fn test_cyclic_parent_records_still_place_every_subject() {
        let t0 = at(2020, 3, 1);
        // Corrupt history: a ↔ b reference each other as parents.
        let platforms = arcs(vec![
            platform_mount("m-a", "a", t0).with_parent_platform("b"),
            platform_mount("m-b", "b", t0).with_parent_platform("a"),
        ]);
        let tree = build_configuration_tree(&platforms, &[], t0);
        assert_eq!(tree.len(), 2);
        assert!(tree.get_by_id(&NodeId::platform("a")).is_some());
        assert!(tree.get_by_id(&NodeId::platform("b")).is_some());
    }

    #[test]
    fn test_root_order_is_platforms_then_devices_in_input_order() {
        let t0 = at(2020, 3, 1);
        let platforms = arcs(vec![
            platform_mount("pm1", "p1", t0),
            platform_mount("pm2", "p2", t0),
        ]);
        let devices = arcs(vec![device_mount("dm1", "d1", t0)]);
        let tree = build_configuration_tree(&platforms, &devices, t0);
        let ids: Vec<String> =
            tree.roots().iter().map(|n| n.id().to_string()).collect();
        assert_eq!(ids, vec!["platform-p1", "platform-p2", "device-d1"]);
    }
}
