//! Ordered log of accepted solutions
//!
//! The log is the source of truth for a sandbox's "current" state: replaying
//! it over the base snapshot reproduces every accepted change in order.

use serde::{Deserialize, Serialize};

use crate::{Action, EntryId, Solution};

/// An accepted solution with its log identifier
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: EntryId,
    pub solution: Solution,
}

impl AuditEntry {
    pub fn action(&self) -> Option<&Action> {
        self.solution.action()
    }
}

/// Append-only log; entries leave only through `remove`, `retain` or `clear`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
    next_seq: u64,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log by appending each solution in order
    pub fn from_solutions(solutions: impl IntoIterator<Item = Solution>) -> Self {
        let mut log = Self::new();
        for solution in solutions {
            log.append(solution);
        }
        log
    }

    /// Append a solution and return its entry id (`<solution id>-<seq>`).
    /// Ids are never reused, even after removal.
    pub fn append(&mut self, solution: Solution) -> EntryId {
        self.next_seq += 1;
        let id = format!("{}-{}", solution.id, self.next_seq);
        self.entries.push(AuditEntry {
            id: id.clone(),
            solution,
        });
        id
    }

    /// Remove an entry by id (undo)
    pub fn remove(&mut self, id: &str) -> Option<AuditEntry> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(idx))
    }

    pub fn retain(&mut self, keep: impl FnMut(&AuditEntry) -> bool) {
        self.entries.retain(keep);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &AuditEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, Lever};

    fn pause(id: &str) -> Solution {
        Solution::actionable(
            format!("pause-{id}"),
            Lever::Priority,
            "Pause Project",
            "",
            Action::PauseProject {
                project_id: id.into(),
            },
        )
    }

    #[test]
    fn append_assigns_unique_ids() {
        let mut log = AuditLog::new();
        let a = log.append(pause("p1"));
        let b = log.append(pause("p1"));
        assert_eq!(a, "pause-p1-1");
        assert_eq!(b, "pause-p1-2");
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn remove_by_id_keeps_order() {
        let mut log = AuditLog::from_solutions([pause("p1"), pause("p2"), pause("p3")]);
        let removed = log.remove("pause-p2-2").unwrap();
        assert_eq!(removed.solution.id, "pause-p2");

        let remaining: Vec<_> = log.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(remaining, vec!["pause-p1-1", "pause-p3-3"]);
        assert!(log.remove("pause-p2-2").is_none());
    }

    #[test]
    fn ids_not_reused_after_removal() {
        let mut log = AuditLog::new();
        let first = log.append(pause("p1"));
        log.remove(&first);
        let second = log.append(pause("p1"));
        assert_ne!(first, second);
        assert!(!log.is_empty());
    }
}
