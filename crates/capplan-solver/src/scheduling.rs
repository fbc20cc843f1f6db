//! Resource-Driven Scheduling
//!
//! A resource-driven project has no fixed end date. Starting from its start
//! month, each month it consumes whatever key-role capacity the fixed
//! (committed) projects leave over, until its remaining effort is spent.
//! The end date is the last day of the last month that still had work.
//!
//! The loop is capped (`schedule_iteration_cap` months). A project that
//! never gets capacity, because its type has no share of the key role or
//! the fixed projects saturate it, ends with [`ScheduleOutcome::ExceededCap`]
//! and a projected end at the cap. Callers can tell that apart from a
//! genuine completion.

use capplan_core::{Month, PlanningProfile, Project, Resource};
use chrono::NaiveDate;
use serde::Serialize;

use crate::conflict::role_capacity;

/// Why scheduling stopped
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleOutcome {
    /// Effort fully consumed
    Completed { end_date: NaiveDate, months: u32 },
    /// The iteration cap was hit first; `end_date` is a projection only
    ExceededCap {
        last_month: NaiveDate,
        end_date: NaiveDate,
        remaining_effort: f64,
    },
    /// No usable start date; the project is returned unchanged
    Unscheduled,
}

impl ScheduleOutcome {
    /// Computed end date, if any
    pub fn end_date(&self) -> Option<NaiveDate> {
        match self {
            ScheduleOutcome::Completed { end_date, .. }
            | ScheduleOutcome::ExceededCap { end_date, .. } => Some(*end_date),
            ScheduleOutcome::Unscheduled => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ScheduleOutcome::Completed { .. })
    }
}

/// A resource-driven project with its computed schedule
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexibleSchedule {
    /// Copy of the input project with `end_date` filled in
    pub project: Project,
    pub key_role: String,
    /// Monthly key-role capacity across the resource pool
    pub role_capacity: f64,
    pub outcome: ScheduleOutcome,
}

/// Key-role hours the fixed projects commit in `month`
pub fn committed_demand(
    fixed: &[Project],
    role: &str,
    month: Month,
    profile: &PlanningProfile,
) -> f64 {
    fixed
        .iter()
        .filter(|p| p.is_live() && month.overlaps(p.start_date, p.end_date))
        .map(|p| profile.monthly_hours(p.scale) * profile.fraction(&p.project_type, role))
        .sum()
}

/// Schedule a single resource-driven project against the fixed projects
pub fn schedule_project(
    project: &Project,
    fixed: &[Project],
    resources: &[Resource],
    profile: &PlanningProfile,
) -> FlexibleSchedule {
    let key_role = project.project_type.key_role();
    let capacity = role_capacity(resources, key_role, profile);

    let Some(start) = project.start_date else {
        tracing::warn!(project = %project.id, "resource-driven project has no start date");
        return FlexibleSchedule {
            project: project.clone(),
            key_role: key_role.to_string(),
            role_capacity: capacity,
            outcome: ScheduleOutcome::Unscheduled,
        };
    };

    let fraction = profile.fraction(&project.project_type, key_role);
    let cap = profile.schedule_iteration_cap;
    let mut remaining = f64::from(project.total_effort.unwrap_or(profile.default_total_effort));
    let mut month = Month::containing(start);
    let mut iterations = 0;

    loop {
        let committed = committed_demand(fixed, key_role, month, profile);
        let available = (capacity - committed).max(0.0);
        let burn = available * fraction;
        if burn > 0.0 {
            remaining -= burn;
        }
        tracing::trace!(
            project = %project.id,
            month = %month.label(),
            available,
            remaining,
            "schedule step"
        );

        month = month.plus(1);
        iterations += 1;
        if remaining <= 1.0 || iterations >= cap {
            break;
        }
    }

    let last_worked = month.previous();
    let end_date = last_worked.end();
    let outcome = if remaining <= 1.0 {
        ScheduleOutcome::Completed {
            end_date,
            months: iterations,
        }
    } else {
        tracing::warn!(
            project = %project.id,
            key_role,
            remaining,
            cap,
            "resource-driven schedule exceeded iteration cap"
        );
        ScheduleOutcome::ExceededCap {
            last_month: last_worked.start(),
            end_date,
            remaining_effort: remaining,
        }
    };

    let mut scheduled = project.clone();
    if scheduled.original_end_date.is_none() {
        scheduled.original_end_date = project.end_date;
    }
    scheduled.end_date = Some(end_date);

    FlexibleSchedule {
        project: scheduled,
        key_role: key_role.to_string(),
        role_capacity: capacity,
        outcome,
    }
}

/// Schedule every flexible project independently against the fixed set
pub fn schedule_flexible(
    fixed: &[Project],
    flexible: &[Project],
    resources: &[Resource],
    profile: &PlanningProfile,
) -> Vec<FlexibleSchedule> {
    flexible
        .iter()
        .map(|p| schedule_project(p, fixed, resources, profile))
        .collect()
}

/// Flexible projects with their computed end dates
pub fn schedule_resource_driven_projects(
    fixed: &[Project],
    flexible: &[Project],
    resources: &[Resource],
    profile: &PlanningProfile,
) -> Vec<Project> {
    schedule_flexible(fixed, flexible, resources, profile)
        .into_iter()
        .map(|s| s.project)
        .collect()
}

/// Split a project set into (fixed, resource-driven), preserving order
pub fn partition_resource_driven(projects: &[Project]) -> (Vec<Project>, Vec<Project>) {
    projects
        .iter()
        .cloned()
        .partition(|p| !p.is_resource_driven)
}
