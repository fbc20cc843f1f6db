//! Conflict Detection
//!
//! Aggregates resource capacity per canonical role, then walks the planning
//! horizon month by month accumulating project demand per role. The first
//! month in which some role's demand strictly exceeds its capacity is
//! reported; scanning stops there.

use chrono::NaiveDate;
use capplan_core::{Conflict, Month, PlanningProfile, Project, Resource};

/// Hours per role, kept in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleHours {
    entries: Vec<(String, f64)>,
}

impl RoleHours {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add hours to a role, registering it on first use
    pub fn add(&mut self, role: &str, hours: f64) {
        match self.entries.iter_mut().find(|(r, _)| r == role) {
            Some((_, total)) => *total += hours,
            None => self.entries.push((role.to_string(), hours)),
        }
    }

    /// Hours for a role; 0.0 when absent
    pub fn get(&self, role: &str) -> f64 {
        self.entries
            .iter()
            .find(|(r, _)| r == role)
            .map(|(_, h)| *h)
            .unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(r, h)| (r.as_str(), *h))
    }

    /// Sum across all roles
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, h)| h).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Total monthly capacity per normalized role
pub fn capacity_by_role(resources: &[Resource], profile: &PlanningProfile) -> RoleHours {
    let mut capacity = RoleHours::new();
    for resource in resources {
        let role = profile.normalize_role(&resource.role);
        capacity.add(role, f64::from(resource.capacity));
    }
    capacity
}

/// Monthly capacity of a single normalized role
pub fn role_capacity(resources: &[Resource], role: &str, profile: &PlanningProfile) -> f64 {
    resources
        .iter()
        .filter(|r| profile.normalize_role(&r.role) == role)
        .map(|r| f64::from(r.capacity))
        .sum()
}

/// Demand per role placed on `month` by every live project overlapping it
pub fn demand_in_month(projects: &[Project], month: Month, profile: &PlanningProfile) -> RoleHours {
    let mut demand = RoleHours::new();
    for project in projects
        .iter()
        .filter(|p| p.is_live() && month.overlaps(p.start_date, p.end_date))
    {
        let hours = profile.monthly_hours(project.scale);
        for share in profile.role_distribution(&project.project_type).iter() {
            demand.add(&share.role, hours * share.fraction);
        }
    }
    demand
}

/// Whether `project` overlaps `month` and puts demand on `role`
pub(crate) fn competes_for(
    project: &Project,
    role: &str,
    month: Month,
    profile: &PlanningProfile,
) -> bool {
    project.is_live()
        && month.overlaps(project.start_date, project.end_date)
        && profile.role_distribution(&project.project_type).uses(role)
}

/// Find the first chronological overload in the horizon starting at the
/// month containing `as_of`.
///
/// Within a month, roles are checked in the order they first appear in the
/// accumulated demand, so the reported role is deterministic for a given
/// input order.
pub fn detect_conflicts(
    projects: &[Project],
    resources: &[Resource],
    as_of: NaiveDate,
    profile: &PlanningProfile,
) -> Option<Conflict> {
    let capacity = capacity_by_role(resources, profile);

    for month in Month::containing(as_of).horizon(profile.horizon_months) {
        let demand = demand_in_month(projects, month, profile);
        tracing::trace!(month = %month.label(), roles = demand.iter().count(), "month demand");

        for (role, hours) in demand.iter() {
            let available = capacity.get(role);
            if hours > available {
                let conflict = Conflict {
                    role: role.to_string(),
                    period: month.label(),
                    deficit: hours - available,
                    month_date: month.start(),
                };
                tracing::debug!(
                    role = %conflict.role,
                    period = %conflict.period,
                    deficit = conflict.deficit,
                    "capacity conflict detected"
                );
                return Some(conflict);
            }
        }
    }

    None
}
