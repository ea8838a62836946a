//! Deterministic action chronology for stationrig.
//!
//! Merges platform mounts, platform unmounts, device mounts, device
//! unmounts, and generic actions into one strictly ordered, filterable
//! timeline for operator review.
//!
//! The whole crate is a pure in-memory transformation: it takes an
//! already-fetched snapshot of actions and produces a derived list. No I/O,
//! no shared state, no incremental updates — callers re-sort on refresh.

mod compose;
mod entry;

pub use compose::{
    ChronologyFilter, available_contacts, available_years, filter_actions,
    mount_bookends, sort_actions,
};
pub use entry::{EntryKind, TimelineEntry};
