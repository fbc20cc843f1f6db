//! Remediation options offered for a conflict

use serde::{Deserialize, Serialize};

use crate::{Money, Project, ProjectChanges, ProjectId, Resource, Scale, SolutionId};

/// Category of remediation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Lever {
    /// Move a project later
    Time,
    /// Add contractor hours
    Capacity,
    /// Shrink or pause a competing project
    Priority,
}

impl std::fmt::Display for Lever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lever::Time => write!(f, "TIME"),
            Lever::Capacity => write!(f, "CAPACITY"),
            Lever::Priority => write!(f, "PRIORITY"),
        }
    }
}

/// A change to the scenario
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    UpdateProject {
        #[serde(rename = "projectId")]
        project_id: ProjectId,
        changes: ProjectChanges,
    },
    AddResource {
        resource: Resource,
    },
    PauseProject {
        #[serde(rename = "projectId")]
        project_id: ProjectId,
    },
}

impl Action {
    /// Project the action modifies, if any
    pub fn target_project(&self) -> Option<&str> {
        match self {
            Action::UpdateProject { project_id, .. } | Action::PauseProject { project_id } => {
                Some(project_id)
            }
            Action::AddResource { .. } => None,
        }
    }
}

/// A project that could be shrunk or paused to free the conflicted role
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityCandidate {
    pub project: Project,
    /// Hours per month this project demands from the conflicted role
    pub role_impact: i64,
}

impl PriorityCandidate {
    /// Solution reducing the project to Small; `None` when it already is
    pub fn resize_solution(&self) -> Option<Solution> {
        if self.project.scale == Scale::Small {
            return None;
        }
        Some(Solution::actionable(
            format!("resize-{}", self.project.id),
            Lever::Priority,
            "Resize Project",
            format!("Reduced scale of \"{}\" to Small.", self.project.name),
            Action::UpdateProject {
                project_id: self.project.id.clone(),
                changes: ProjectChanges {
                    scale: Some(Scale::Small),
                    ..Default::default()
                },
            },
        ))
    }

    /// Solution pausing the project
    pub fn pause_solution(&self) -> Solution {
        Solution::actionable(
            format!("pause-{}", self.project.id),
            Lever::Priority,
            "Pause Project",
            format!("Paused active project \"{}\".", self.project.name),
            Action::PauseProject {
                project_id: self.project.id.clone(),
            },
        )
    }
}

/// What a solution offers
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Remedy {
    /// A single action ready to apply
    Action(Action),
    /// Projects for the caller to choose from; the chosen candidate's
    /// resize or pause solution is what gets applied
    Candidates(Vec<PriorityCandidate>),
    /// No actionable target; the description says why
    Disabled,
}

/// Headcount and cost behind a capacity solution
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CapacityEstimate {
    pub headcount: u32,
    pub cost: Money,
}

/// One remediation option
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub id: SolutionId,
    pub lever: Lever,
    pub label: String,
    pub description: String,
    pub remedy: Remedy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate: Option<CapacityEstimate>,
}

impl Solution {
    pub fn actionable(
        id: impl Into<String>,
        lever: Lever,
        label: impl Into<String>,
        description: impl Into<String>,
        action: Action,
    ) -> Self {
        Self {
            id: id.into(),
            lever,
            label: label.into(),
            description: description.into(),
            remedy: Remedy::Action(action),
            estimate: None,
        }
    }

    pub fn disabled(
        id: impl Into<String>,
        lever: Lever,
        label: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            lever,
            label: label.into(),
            description: reason.into(),
            remedy: Remedy::Disabled,
            estimate: None,
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self.remedy, Remedy::Disabled)
    }

    /// The action to apply, if this solution carries one directly
    pub fn action(&self) -> Option<&Action> {
        match &self.remedy {
            Remedy::Action(action) => Some(action),
            _ => None,
        }
    }

    /// Candidate projects, empty unless this is a selection-style solution
    pub fn candidates(&self) -> &[PriorityCandidate] {
        match &self.remedy {
            Remedy::Candidates(candidates) => candidates,
            _ => &[],
        }
    }
}
