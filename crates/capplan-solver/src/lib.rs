//! # capplan-solver
//!
//! Capacity analysis engine: conflict detection, remediation options,
//! resource-driven scheduling and what-if scenarios.
//!
//! This crate provides:
//! - First-overload conflict detection per role and month
//! - TIME / CAPACITY / PRIORITY solution generation
//! - Resource-driven end-date computation against committed demand
//! - Audit-log replay and single-solution preview
//! - A sandbox session holding drafts and accepted solutions
//! - Demand/capacity forecasts and per-role overload reports
//!
//! Every operation is a pure function of its inputs and the
//! [`PlanningProfile`]; the reference date is always passed in.
//!
//! ## Example
//!
//! ```rust
//! use capplan_core::{Project, Resource, Scale};
//! use capplan_solver::ResolutionEngine;
//! use chrono::NaiveDate;
//!
//! let projects = vec![
//!     Project::new("p1").scale(Scale::Large).dates("2025-01-01", "2025-01-31"),
//!     Project::new("p2").scale(Scale::Medium).dates("2025-01-01", "2025-01-31"),
//! ];
//! let resources = vec![Resource::new("r1", "Developer").capacity(260)];
//!
//! let engine = ResolutionEngine::default();
//! let as_of = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
//! let conflict = engine.detect_conflicts(&projects, &resources, as_of).unwrap();
//! assert_eq!(conflict.period, "Jan 2025");
//! assert_eq!(conflict.deficit, 220.0);
//! ```

use capplan_core::{AuditLog, Conflict, PlanningProfile, Project, Resource, Solution};
use chrono::NaiveDate;

pub mod conflict;
pub mod forecast;
pub mod sandbox;
pub mod scenario;
pub mod scheduling;
pub mod solutions;

pub use conflict::{capacity_by_role, demand_in_month, RoleHours};
pub use forecast::{ForecastPoint, MonthLoad, RoleFilter, RoleOverload};
pub use sandbox::{Analysis, Sandbox, SandboxError};
pub use scenario::{apply_audit_log, preview, Scenario, PREVIEW_RESOURCE_ID};
pub use scheduling::{FlexibleSchedule, ScheduleOutcome};
pub use solutions::{CAPACITY_SOLUTION_ID, PRIORITY_SOLUTION_ID, TIME_SOLUTION_ID};

/// Capacity analysis bound to one planning profile
#[derive(Clone, Debug)]
pub struct ResolutionEngine {
    profile: PlanningProfile,
}

impl ResolutionEngine {
    pub fn new(profile: PlanningProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &PlanningProfile {
        &self.profile
    }

    /// First chronological role overload in the horizon from `as_of`
    pub fn detect_conflicts(
        &self,
        projects: &[Project],
        resources: &[Resource],
        as_of: NaiveDate,
    ) -> Option<Conflict> {
        conflict::detect_conflicts(projects, resources, as_of, &self.profile)
    }

    /// TIME, CAPACITY and PRIORITY options for a conflict
    pub fn generate_solutions(&self, conflict: &Conflict, projects: &[Project]) -> [Solution; 3] {
        solutions::generate_solutions(conflict, projects, &self.profile)
    }

    /// Schedules with outcome detail for each resource-driven project
    pub fn schedule_flexible(
        &self,
        fixed: &[Project],
        flexible: &[Project],
        resources: &[Resource],
    ) -> Vec<FlexibleSchedule> {
        scheduling::schedule_flexible(fixed, flexible, resources, &self.profile)
    }

    /// Resource-driven projects with their computed end dates
    pub fn schedule_resource_driven_projects(
        &self,
        fixed: &[Project],
        flexible: &[Project],
        resources: &[Resource],
    ) -> Vec<Project> {
        scheduling::schedule_resource_driven_projects(fixed, flexible, resources, &self.profile)
    }

    /// Replay an audit log over base collections
    pub fn apply_audit_log(
        &self,
        projects: &[Project],
        resources: &[Resource],
        audit_log: &AuditLog,
    ) -> Scenario {
        scenario::apply_audit_log(projects, resources, audit_log)
    }

    /// Conflict plus solutions for a scenario, scheduling resource-driven
    /// projects first
    pub fn analyze(&self, scenario: Scenario, as_of: NaiveDate) -> (Scenario, Analysis) {
        let scheduled = sandbox::schedule_scenario(scenario.without_paused(), &self.profile);
        let analysis = sandbox::analyze_scenario(&scheduled, as_of, &self.profile);
        (scheduled, analysis)
    }

    pub fn forecast(
        &self,
        projects: &[Project],
        resources: &[Resource],
        as_of: NaiveDate,
        filter: &RoleFilter,
    ) -> Vec<MonthLoad> {
        forecast::forecast(projects, resources, as_of, filter, &self.profile)
    }

    pub fn overload_report(
        &self,
        projects: &[Project],
        resources: &[Resource],
        as_of: NaiveDate,
    ) -> Vec<RoleOverload> {
        forecast::overload_report(projects, resources, as_of, &self.profile)
    }

    /// Open a sandbox session over a live snapshot
    pub fn sandbox(&self, projects: Vec<Project>, resources: Vec<Resource>) -> Sandbox<'_> {
        Sandbox::new(&self.profile, projects, resources)
    }
}

impl Default for ResolutionEngine {
    fn default() -> Self {
        Self::new(PlanningProfile::builtin().clone())
    }
}
