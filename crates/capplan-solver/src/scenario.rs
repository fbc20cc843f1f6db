//! Scenario composition
//!
//! A scenario is derived, never edited: a base snapshot of projects and
//! resources plus an ordered list of accepted actions replays into the
//! "current" state. Previewing one more solution is the same replay with a
//! single extra event, and undo is replay without the removed entry.

use capplan_core::{Action, AuditEntry, AuditLog, Project, Resource, Solution};
use serde::Serialize;

/// Id given to a resource added by a previewed (not yet accepted) solution
pub const PREVIEW_RESOURCE_ID: &str = "preview-res";

/// A project and resource set
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scenario {
    pub projects: Vec<Project>,
    pub resources: Vec<Resource>,
}

impl Scenario {
    pub fn new(projects: Vec<Project>, resources: Vec<Resource>) -> Self {
        Self {
            projects,
            resources,
        }
    }

    /// Apply one action. `resource_id` names a resource the action adds.
    ///
    /// Project actions affect the first project with a matching id and are
    /// ignored when there is none.
    pub fn apply(&mut self, action: &Action, resource_id: &str) {
        match action {
            Action::UpdateProject {
                project_id,
                changes,
            } => match self.projects.iter_mut().find(|p| &p.id == project_id) {
                Some(project) => changes.apply(project),
                None => tracing::debug!(project = %project_id, "update target not in scenario"),
            },
            Action::PauseProject { project_id } => {
                match self.projects.iter_mut().find(|p| &p.id == project_id) {
                    Some(project) => project.status = capplan_core::ProjectStatus::Paused,
                    None => tracing::debug!(project = %project_id, "pause target not in scenario"),
                }
            }
            Action::AddResource { resource } => {
                let mut resource = resource.clone();
                resource.id = resource_id.to_string();
                self.resources.push(resource);
            }
        }
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Projects that still carry demand
    pub fn live_projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter().filter(|p| p.is_live())
    }

    /// Drop paused projects
    pub fn without_paused(mut self) -> Self {
        self.projects.retain(Project::is_live);
        self
    }
}

/// Replay entries over a base scenario, in order
pub fn replay<'a>(mut base: Scenario, entries: impl IntoIterator<Item = &'a AuditEntry>) -> Scenario {
    for entry in entries {
        match entry.action() {
            Some(action) => base.apply(action, &format!("temp-{}", entry.id)),
            None => tracing::debug!(entry = %entry.id, "audit entry has no action; skipped"),
        }
    }
    base
}

/// Copy the base collections and replay the whole audit log over them.
///
/// Later entries win per field; paused projects remain in the result.
pub fn apply_audit_log(
    base_projects: &[Project],
    base_resources: &[Resource],
    audit_log: &AuditLog,
) -> Scenario {
    replay(
        Scenario::new(base_projects.to_vec(), base_resources.to_vec()),
        audit_log.iter(),
    )
}

/// `current` with one more solution applied. Solutions without an action
/// leave the scenario unchanged.
pub fn preview(current: &Scenario, solution: &Solution) -> Scenario {
    let mut scenario = current.clone();
    if let Some(action) = solution.action() {
        scenario.apply(action, PREVIEW_RESOURCE_ID);
    }
    scenario
}

#[cfg(test)]
mod tests {
    use super::*;
    use capplan_core::{Lever, ProjectChanges, ProjectStatus, Scale};

    #[test]
    fn update_missing_project_is_ignored() {
        let mut scenario = Scenario::new(vec![Project::new("a")], vec![]);
        scenario.apply(
            &Action::UpdateProject {
                project_id: "zzz".into(),
                changes: ProjectChanges {
                    scale: Some(Scale::Large),
                    ..Default::default()
                },
            },
            "",
        );
        assert_eq!(scenario.projects, vec![Project::new("a")]);
    }

    #[test]
    fn update_hits_first_match_only() {
        let mut scenario = Scenario::new(vec![Project::new("dup"), Project::new("dup")], vec![]);
        scenario.apply(
            &Action::PauseProject {
                project_id: "dup".into(),
            },
            "",
        );
        assert_eq!(scenario.projects[0].status, ProjectStatus::Paused);
        assert_eq!(scenario.projects[1].status, ProjectStatus::Active);
        assert_eq!(scenario.live_projects().count(), 1);
        assert_eq!(scenario.without_paused().projects.len(), 1);
    }

    #[test]
    fn preview_without_action_is_identity() {
        let current = Scenario::new(vec![Project::new("a")], vec![]);
        let disabled = Solution::disabled("opt_time", Lever::Time, "Shift Timeline", "none");
        assert_eq!(preview(&current, &disabled), current);
    }
}
