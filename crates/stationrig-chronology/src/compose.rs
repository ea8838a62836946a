//! Composing the chronology: deterministic ordering and filtering.
//!
//! The sort runs in two phases. A stable sort by (has-instant, instant
//! descending, logic order descending) gives a genuine total preorder, then
//! a bookend pass fixes the one pairwise exception: at equal instants, a
//! mount row must come out newer than the unmount row of the *same* action,
//! while rows of different actions keep the generic precedence table. The
//! whole pipeline is idempotent — re-sorting sorted output changes nothing.

use std::cmp::Reverse;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stationrig_model::{ContactId, MountAction};
use tracing::trace;

use crate::{EntryKind, TimelineEntry};

/// Sort timeline entries newest-first.
///
/// - Primary key: instant, descending. Entries without an instant sort as
///   older than everything and keep their relative input order.
/// - Equal instants: logic order, descending (device-unmount >
///   platform-unmount > device-mount > platform-mount > generic).
/// - Override: a mount row ties with the unmount row of its own action only
///   when the action begins and ends at the same instant; that mount is
///   placed directly before its unmount, newest side.
pub fn sort_actions(mut entries: Vec<TimelineEntry>) -> Vec<TimelineEntry> {
    entries.sort_by_key(sort_key);
    reorder_bookends(&mut entries);
    entries
}

type SortKey = (bool, Reverse<DateTime<Utc>>, Reverse<u16>);

fn sort_key(entry: &TimelineEntry) -> SortKey {
    match entry.instant() {
        Some(t) => (false, Reverse(t), Reverse(entry.logic_order())),
        // One constant key for all undated entries keeps their input order
        // under the stable sort.
        None => (true, Reverse(DateTime::<Utc>::MIN_UTC), Reverse(0)),
    }
}

/// Within each run of equal instants, move every mount row whose own
/// unmount row sits in the same run to directly before that unmount.
fn reorder_bookends(entries: &mut [TimelineEntry]) {
    let mut start = 0;
    while start < entries.len() {
        let Some(instant) = entries[start].instant() else {
            // Undated tail; no ties to fix.
            break;
        };
        let mut end = start + 1;
        while end < entries.len() && entries[end].instant() == Some(instant) {
            end += 1;
        }
        fix_run(&mut entries[start..end]);
        start = end;
    }
}

fn fix_run(run: &mut [TimelineEntry]) {
    let mut pos = 0;
    while pos < run.len() {
        if run[pos].is_unmount()
            && let Some(id) = run[pos].mount_identity().cloned()
            && let Some(mount_pos) = run
                .iter()
                .position(|e| e.is_mount() && e.mount_identity() == Some(&id))
            && mount_pos > pos
        {
            trace!(action = %id, "mount bookend outranks its own unmount");
            run[pos..=mount_pos].rotate_right(1);
            // Skip past the moved mount and its unmount.
            pos += 1;
        }
        pos += 1;
    }
}

/// Filter selections for the chronology. Every empty selection matches all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChronologyFilter {
    pub kinds: Vec<EntryKind>,
    pub years: Vec<i32>,
    pub contacts: Vec<ContactId>,
}

impl ChronologyFilter {
    /// True when no predicate constrains anything.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty() && self.years.is_empty() && self.contacts.is_empty()
    }

    fn matches(&self, entry: &TimelineEntry) -> bool {
        let kind_ok = self.kinds.is_empty() || self.kinds.contains(&entry.kind());
        let year_ok =
            self.years.is_empty() || self.years.iter().any(|&y| entry.matches_year(y));
        let contact_ok = self.contacts.is_empty()
            || entry
                .contact_id()
                .is_some_and(|c| self.contacts.contains(c));
        kind_ok && year_ok && contact_ok
    }
}

/// Apply a filter to an already-sorted entry list, preserving order.
pub fn filter_actions(
    entries: &[TimelineEntry],
    filter: &ChronologyFilter,
) -> Vec<TimelineEntry> {
    entries
        .iter()
        .filter(|e| filter.matches(e))
        .cloned()
        .collect()
}

/// Expand mount actions into their timeline rows: one mount row each, plus
/// an unmount row for every action that has ended.
pub fn mount_bookends(actions: &[Arc<MountAction>]) -> Vec<TimelineEntry> {
    let mut entries = Vec::with_capacity(actions.len() * 2);
    for action in actions {
        entries.push(TimelineEntry::mount(action.clone()));
        if action.end_date.is_some() {
            entries.push(TimelineEntry::unmount(action.clone()));
        }
    }
    entries
}

/// Distinct years present in the entries, ascending — options for the year
/// filter control.
pub fn available_years(entries: &[TimelineEntry]) -> Vec<i32> {
    let mut years: Vec<i32> = entries.iter().flat_map(|e| e.years()).collect();
    years.sort_unstable();
    years.dedup();
    years
}

/// Distinct responsible contacts present in the entries, sorted — options
/// for the contact filter control.
pub fn available_contacts(entries: &[TimelineEntry]) -> Vec<ContactId> {
    let mut contacts: Vec<ContactId> =
        entries.iter().filter_map(|e| e.contact_id().cloned()).collect();
    contacts.sort();
    contacts.dedup();
    contacts
}

// ============================================================================
// Tests
// ============================================================================
