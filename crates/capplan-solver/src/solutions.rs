//! Solution Generation
//!
//! Turns a conflict into exactly three remediation options, one per lever,
//! always in the order TIME, CAPACITY, PRIORITY. Target selection scans the
//! project list in input order; the first match wins.
//!
//! The time lever is a flat shift. It is not re-checked against conflict
//! detection, so applying it may move the overload rather than remove it.

use capplan_core::calendar::add_months;
use capplan_core::{
    Action, CapacityEstimate, Conflict, Lever, Money, PlanningProfile, PriorityCandidate,
    Project, ProjectChanges, Remedy, Resource, Solution,
};
use rust_decimal::Decimal;

use crate::conflict::competes_for;

pub const TIME_SOLUTION_ID: &str = "opt_time";
pub const CAPACITY_SOLUTION_ID: &str = "opt_cap";
pub const PRIORITY_SOLUTION_ID: &str = "opt_prio";

/// Generate the TIME, CAPACITY and PRIORITY options for `conflict`
pub fn generate_solutions(
    conflict: &Conflict,
    projects: &[Project],
    profile: &PlanningProfile,
) -> [Solution; 3] {
    [
        time_solution(conflict, projects, profile),
        capacity_solution(conflict, profile),
        priority_solution(conflict, projects, profile),
    ]
}

/// Project the time lever would shift: the first dated draft, otherwise
/// the first committed project competing for the conflicted role.
pub fn time_target<'a>(
    conflict: &Conflict,
    projects: &'a [Project],
    profile: &PlanningProfile,
) -> Option<&'a Project> {
    let month = conflict.month();
    projects
        .iter()
        .find(|p| p.is_draft && p.start_date.is_some() && p.end_date.is_some())
        .or_else(|| {
            projects
                .iter()
                .find(|p| !p.is_draft && competes_for(p, &conflict.role, month, profile))
        })
}

fn time_solution(conflict: &Conflict, projects: &[Project], profile: &PlanningProfile) -> Solution {
    const LABEL: &str = "Shift Timeline";

    let Some(target) = time_target(conflict, projects, profile) else {
        return Solution::disabled(
            TIME_SOLUTION_ID,
            Lever::Time,
            LABEL,
            "No relevant projects found to shift.",
        );
    };

    let shift = profile.time_shift_months;
    let changes = ProjectChanges {
        start_date: target.start_date.map(|d| add_months(d, shift)),
        end_date: target.end_date.map(|d| add_months(d, shift)),
        ..Default::default()
    };

    Solution::actionable(
        TIME_SOLUTION_ID,
        Lever::Time,
        LABEL,
        format!(
            "Delay {} project \"{}\" start by {} months to bypass the {} bottleneck.",
            if target.is_draft { "draft" } else { "active" },
            target.name,
            shift,
            conflict.period
        ),
        Action::UpdateProject {
            project_id: target.id.clone(),
            changes,
        },
    )
}

/// Contractors needed to cover a deficit, at the profile's monthly hours each
pub fn required_headcount(deficit: f64, profile: &PlanningProfile) -> u32 {
    if deficit <= 0.0 {
        return 0;
    }
    (deficit / profile.contractor_monthly_hours).ceil() as u32
}

fn capacity_solution(conflict: &Conflict, profile: &PlanningProfile) -> Solution {
    let headcount = required_headcount(conflict.deficit, profile);
    let cost = Money::new(
        profile.contractor_monthly_rate * Decimal::from(headcount),
        profile.currency.clone(),
    );

    let resource = Resource {
        id: String::new(),
        name: format!("Contractor ({})", conflict.role),
        role: conflict.role.clone(),
        capacity: (profile.contractor_monthly_hours * f64::from(headcount)).round() as u32,
        team: None,
        is_contractor: true,
    };

    let mut solution = Solution::actionable(
        CAPACITY_SOLUTION_ID,
        Lever::Capacity,
        "Add Capacity",
        format!(
            "Hire {} {} contractor{} for {}. Est cost: {}.",
            headcount,
            conflict.role,
            if headcount == 1 { "" } else { "s" },
            conflict.period,
            cost
        ),
        Action::AddResource { resource },
    );
    solution.estimate = Some(CapacityEstimate { headcount, cost });
    solution
}

/// Committed projects competing for the conflicted role in the conflict
/// month, each annotated with its monthly demand on that role.
pub fn priority_candidates(
    conflict: &Conflict,
    projects: &[Project],
    profile: &PlanningProfile,
) -> Vec<PriorityCandidate> {
    let month = conflict.month();
    projects
        .iter()
        .filter(|p| !p.is_draft && competes_for(p, &conflict.role, month, profile))
        .map(|p| {
            let hours = profile.monthly_hours(p.scale);
            let fraction = profile.fraction(&p.project_type, &conflict.role);
            PriorityCandidate {
                project: p.clone(),
                role_impact: (hours * fraction).round() as i64,
            }
        })
        .collect()
}

fn priority_solution(
    conflict: &Conflict,
    projects: &[Project],
    profile: &PlanningProfile,
) -> Solution {
    const LABEL: &str = "Adjust Priority";

    let candidates = priority_candidates(conflict, projects, profile);
    if candidates.is_empty() {
        return Solution::disabled(
            PRIORITY_SOLUTION_ID,
            Lever::Priority,
            LABEL,
            "No active projects found to adjust in this period.",
        );
    }

    Solution {
        id: PRIORITY_SOLUTION_ID.into(),
        lever: Lever::Priority,
        label: LABEL.into(),
        description: format!(
            "Select a project to pause or resize to free up {} capacity.",
            conflict.role
        ),
        remedy: Remedy::Candidates(candidates),
        estimate: None,
    }
}
