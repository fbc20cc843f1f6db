//! Sandbox session
//!
//! An isolated what-if workspace over a snapshot of the live portfolio. The
//! session owns its draft projects and the audit log of accepted solutions;
//! everything else is recomputed from scratch on request:
//!
//! ```text
//! live + drafts ──replay(audit log)──▶ drop paused ──schedule──▶ current
//! ```

use capplan_core::{
    Action, AuditEntry, AuditLog, Conflict, EntryId, PlanningProfile, Project, ProjectId,
    ProjectStatus, Resource, Solution, SolutionId,
};
use chrono::NaiveDate;
use thiserror::Error;

use crate::conflict::detect_conflicts;
use crate::scenario::{replay, Scenario, PREVIEW_RESOURCE_ID};
use crate::scheduling::{partition_resource_driven, schedule_resource_driven_projects};
use crate::solutions::generate_solutions;

/// Sandbox operation error
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("Solution '{0}' is disabled")]
    SolutionDisabled(SolutionId),

    #[error("Solution '{0}' has no direct action; apply a candidate's resize or pause solution")]
    NoAction(SolutionId),

    #[error("Audit entry not found: {0}")]
    EntryNotFound(EntryId),

    #[error("Draft not found: {0}")]
    DraftNotFound(ProjectId),

    #[error("Unresolved {role} conflict in {period}")]
    UnresolvedConflict { role: String, period: String },
}

/// Conflict analysis of a scenario
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub conflict: Option<Conflict>,
    /// TIME, CAPACITY, PRIORITY when there is a conflict; empty otherwise
    pub solutions: Vec<Solution>,
}

impl Analysis {
    pub fn is_viable(&self) -> bool {
        self.conflict.is_none()
    }

    pub fn solution(&self, id: &str) -> Option<&Solution> {
        self.solutions.iter().find(|s| s.id == id)
    }
}

/// What-if workspace over the live portfolio
#[derive(Debug, Clone)]
pub struct Sandbox<'p> {
    profile: &'p PlanningProfile,
    live_projects: Vec<Project>,
    live_resources: Vec<Resource>,
    drafts: Vec<Project>,
    audit_log: AuditLog,
    next_draft: u64,
}

impl<'p> Sandbox<'p> {
    pub fn new(
        profile: &'p PlanningProfile,
        live_projects: Vec<Project>,
        live_resources: Vec<Resource>,
    ) -> Self {
        Self {
            profile,
            live_projects,
            live_resources,
            drafts: Vec::new(),
            audit_log: AuditLog::new(),
            next_draft: 0,
        }
    }

    /// Replace the live snapshot after a host-side change; drafts and the
    /// audit log are kept and replayed against the new snapshot.
    pub fn refresh_live(&mut self, projects: Vec<Project>, resources: Vec<Resource>) {
        self.live_projects = projects;
        self.live_resources = resources;
    }

    pub fn drafts(&self) -> &[Project] {
        &self.drafts
    }

    pub fn audit_log(&self) -> &AuditLog {
        &self.audit_log
    }

    /// Add a draft project; returns its sandbox id.
    ///
    /// Ids are never reused within a session and never shadow a live project.
    pub fn add_draft(&mut self, mut project: Project) -> ProjectId {
        project.id = self.next_draft_id();
        project.is_draft = true;
        project.status = ProjectStatus::Draft;
        tracing::debug!(draft = %project.id, name = %project.name, "draft added");
        let id = project.id.clone();
        self.drafts.push(project);
        id
    }

    /// Remove a draft and every audit entry that targets it
    pub fn remove_draft(&mut self, id: &str) -> Result<Project, SandboxError> {
        let idx = self
            .drafts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| SandboxError::DraftNotFound(id.to_string()))?;
        let draft = self.drafts.remove(idx);
        self.audit_log
            .retain(|entry| entry.action().and_then(Action::target_project) != Some(id));
        Ok(draft)
    }

    /// Accept a solution into the audit log
    pub fn apply_solution(&mut self, solution: Solution) -> Result<EntryId, SandboxError> {
        if solution.is_disabled() {
            return Err(SandboxError::SolutionDisabled(solution.id));
        }
        if solution.action().is_none() {
            return Err(SandboxError::NoAction(solution.id));
        }
        let id = self.audit_log.append(solution);
        tracing::debug!(entry = %id, "solution applied");
        Ok(id)
    }

    /// Remove an accepted solution
    pub fn undo(&mut self, entry_id: &str) -> Result<AuditEntry, SandboxError> {
        self.audit_log
            .remove(entry_id)
            .ok_or_else(|| SandboxError::EntryNotFound(entry_id.to_string()))
    }

    /// Drop all drafts and accepted solutions
    pub fn reset(&mut self) {
        self.drafts.clear();
        self.audit_log.clear();
    }

    /// Live projects and drafts, with no solutions applied
    pub fn base(&self) -> Scenario {
        let mut projects = self.live_projects.clone();
        projects.extend(self.drafts.iter().cloned());
        Scenario::new(projects, self.live_resources.clone())
    }

    /// Base state with the audit log replayed and schedules computed
    pub fn current(&self) -> Scenario {
        self.derive(None)
    }

    /// Current state with `solution` applied on top
    pub fn preview(&self, solution: &Solution) -> Scenario {
        self.derive(solution.action())
    }

    /// Detect the current conflict and generate its solutions
    pub fn analyze(&self, as_of: NaiveDate) -> Analysis {
        analyze_scenario(&self.current(), as_of, self.profile)
    }

    /// Commit the drafts of the current state as active projects.
    ///
    /// Refused while a conflict remains. On success the session resets and
    /// the committed projects are returned for the host to persist. Their
    /// sandbox ids are cleared; the host assigns the permanent ones.
    pub fn commit(&mut self, as_of: NaiveDate) -> Result<Vec<Project>, SandboxError> {
        let current = self.current();
        if let Some(conflict) = detect_conflicts(
            &current.projects,
            &current.resources,
            as_of,
            self.profile,
        ) {
            return Err(SandboxError::UnresolvedConflict {
                role: conflict.role,
                period: conflict.period,
            });
        }

        let committed: Vec<Project> = current
            .projects
            .into_iter()
            .filter(|p| p.is_draft)
            .map(|mut p| {
                p.id.clear();
                p.is_draft = false;
                p.status = ProjectStatus::Active;
                p
            })
            .collect();

        tracing::info!(count = committed.len(), "drafts committed");
        self.reset();
        Ok(committed)
    }

    fn next_draft_id(&mut self) -> ProjectId {
        loop {
            self.next_draft += 1;
            let id = format!("draft-{}", self.next_draft);
            let taken = self
                .live_projects
                .iter()
                .chain(&self.drafts)
                .any(|p| p.id == id);
            if !taken {
                return id;
            }
        }
    }

    fn derive(&self, extra: Option<&Action>) -> Scenario {
        let mut scenario = replay(self.base(), self.audit_log.iter());
        if let Some(action) = extra {
            scenario.apply(action, PREVIEW_RESOURCE_ID);
        }
        schedule_scenario(scenario.without_paused(), self.profile)
    }
}

/// Fill in end dates of the resource-driven projects of a scenario,
/// keeping project order
pub fn schedule_scenario(mut scenario: Scenario, profile: &PlanningProfile) -> Scenario {
    let (fixed, flexible) = partition_resource_driven(&scenario.projects);
    if flexible.is_empty() {
        return scenario;
    }

    let mut scheduled =
        schedule_resource_driven_projects(&fixed, &flexible, &scenario.resources, profile)
            .into_iter();
    for project in scenario.projects.iter_mut().filter(|p| p.is_resource_driven) {
        if let Some(next) = scheduled.next() {
            *project = next;
        }
    }
    scenario
}

/// Conflict and solutions for an already-derived scenario
pub fn analyze_scenario(
    scenario: &Scenario,
    as_of: NaiveDate,
    profile: &PlanningProfile,
) -> Analysis {
    match detect_conflicts(&scenario.projects, &scenario.resources, as_of, profile) {
        Some(conflict) => {
            let solutions = generate_solutions(&conflict, &scenario.projects, profile).to_vec();
            Analysis {
                conflict: Some(conflict),
                solutions,
            }
        }
        None => Analysis {
            conflict: None,
            solutions: Vec::new(),
        },
    }
}
