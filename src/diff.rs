//! Snapshot comparison and notification phrasing
//!
//! `diff` is a pure function over two snapshots of the same repository.
//! Emission order is fixed (stars, forks, issues, updated) so notification
//! order is deterministic for a given pair of snapshots.

use crate::domain::{Destination, RepoSnapshot};

/// A single observed change between two snapshots of the same repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    Stars { from: u64, to: u64 },
    Forks { from: u64, to: u64 },
    Issues { from: u64, to: u64 },
    Updated { at: String },
}

/// Compare two snapshots of the same repository
///
/// Integer fields report any difference in either direction, with no
/// threshold. `updated_at` is compared as an opaque token: any string
/// inequality counts as an update, with no semantic time ordering.
/// Cosmetic fields (description, language, watchers) are never compared.
pub fn diff(old: &RepoSnapshot, new: &RepoSnapshot) -> Vec<ChangeEvent> {
    let mut events = Vec::new();

    if new.stars != old.stars {
        events.push(ChangeEvent::Stars {
            from: old.stars,
            to: new.stars,
        });
    }

    if new.forks != old.forks {
        events.push(ChangeEvent::Forks {
            from: old.forks,
            to: new.forks,
        });
    }

    if new.open_issues != old.open_issues {
        events.push(ChangeEvent::Issues {
            from: old.open_issues,
            to: new.open_issues,
        });
    }

    if new.updated_at != old.updated_at {
        events.push(ChangeEvent::Updated {
            at: new.updated_at.clone(),
        });
    }

    events
}

impl ChangeEvent {
    /// Render the notification text for this event
    ///
    /// Per-session destinations carry the fixed session marker suffix;
    /// broadcast messages do not. The formats are a wire contract with
    /// existing clients, so the wording is byte-exact.
    pub fn format(&self, full_name: &str, dest: &Destination) -> String {
        let body = match self {
            ChangeEvent::Stars { from, to } => {
                format!("{full_name}: Stars changed from {from} to {to}")
            }
            ChangeEvent::Forks { from, to } => {
                format!("{full_name}: Forks changed from {from} to {to}")
            }
            ChangeEvent::Issues { from, to } => {
                format!("{full_name}: Issues changed from {from} to {to}")
            }
            ChangeEvent::Updated { at } => {
                format!("{full_name}: Repository was updated at {at}")
            }
        };
        format!("{body}{}", dest.update_suffix())
    }
}

/// Confirmation text sent once when a watch is created
pub fn watch_added_message(full_name: &str) -> String {
    format!("Now monitoring: {full_name}")
}
