//! Demand/capacity forecast over the planning horizon

use std::collections::BTreeMap;

use capplan_core::{Month, PlanningProfile, Project, Resource};
use chrono::NaiveDate;
use serde::Serialize;

use crate::conflict::{capacity_by_role, demand_in_month, role_capacity};
use crate::scenario::Scenario;

/// Which roles a forecast covers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RoleFilter {
    #[default]
    All,
    Role(String),
}

impl RoleFilter {
    /// `"All"` (any case) or a role name
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("all") {
            RoleFilter::All
        } else {
            RoleFilter::Role(raw.to_string())
        }
    }
}

/// Demand and capacity for one month
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthLoad {
    pub label: String,
    pub month_start: NaiveDate,
    pub demand: f64,
    pub capacity: f64,
}

impl MonthLoad {
    /// Demand as a percentage of capacity; `None` with zero capacity
    pub fn utilization_percent(&self) -> Option<f64> {
        (self.capacity > 0.0).then(|| self.demand / self.capacity * 100.0)
    }

    pub fn is_overloaded(&self) -> bool {
        self.demand > self.capacity
    }
}

/// Current-vs-preview values for one month
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub label: String,
    pub month_start: NaiveDate,
    pub base_demand: f64,
    pub projected_demand: f64,
    pub base_capacity: f64,
    pub projected_capacity: f64,
}

/// Overload summary for one role across the horizon
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleOverload {
    pub role: String,
    /// Months in which demand exceeded capacity
    pub overload_periods: u32,
    /// Worst month's excess over capacity, in percent; 100 when the role
    /// has no capacity at all
    pub max_overload_percent: i64,
}

fn filtered_capacity(resources: &[Resource], filter: &RoleFilter, profile: &PlanningProfile) -> f64 {
    match filter {
        RoleFilter::All => resources.iter().map(|r| f64::from(r.capacity)).sum(),
        RoleFilter::Role(role) => role_capacity(resources, role, profile),
    }
}

fn filtered_demand(
    projects: &[Project],
    month: Month,
    filter: &RoleFilter,
    profile: &PlanningProfile,
) -> f64 {
    let demand = demand_in_month(projects, month, profile);
    match filter {
        RoleFilter::All => demand.total(),
        RoleFilter::Role(role) => demand.get(role),
    }
}

/// Monthly demand and capacity for the horizon starting at `as_of`'s month
pub fn forecast(
    projects: &[Project],
    resources: &[Resource],
    as_of: NaiveDate,
    filter: &RoleFilter,
    profile: &PlanningProfile,
) -> Vec<MonthLoad> {
    let capacity = filtered_capacity(resources, filter, profile);
    Month::containing(as_of)
        .horizon(profile.horizon_months)
        .map(|month| MonthLoad {
            label: month.label(),
            month_start: month.start(),
            demand: filtered_demand(projects, month, filter, profile),
            capacity,
        })
        .collect()
}

/// Pair the current scenario's forecast with a previewed one
pub fn compare_forecast(
    current: &Scenario,
    preview: &Scenario,
    as_of: NaiveDate,
    filter: &RoleFilter,
    profile: &PlanningProfile,
) -> Vec<ForecastPoint> {
    let base = forecast(&current.projects, &current.resources, as_of, filter, profile);
    let projected = forecast(&preview.projects, &preview.resources, as_of, filter, profile);

    base.into_iter()
        .zip(projected)
        .map(|(b, p)| ForecastPoint {
            label: b.label,
            month_start: b.month_start,
            base_demand: b.demand,
            projected_demand: p.demand,
            base_capacity: b.capacity,
            projected_capacity: p.capacity,
        })
        .collect()
}

/// Every role that is overloaded at least once in the horizon, by name
pub fn overload_report(
    projects: &[Project],
    resources: &[Resource],
    as_of: NaiveDate,
    profile: &PlanningProfile,
) -> Vec<RoleOverload> {
    let capacity = capacity_by_role(resources, profile);
    let mut report: BTreeMap<String, RoleOverload> = BTreeMap::new();

    for month in Month::containing(as_of).horizon(profile.horizon_months) {
        for (role, demand) in demand_in_month(projects, month, profile).iter() {
            let available = capacity.get(role);
            if demand <= 0.0 || (available > 0.0 && demand <= available) {
                continue;
            }
            let percent = if available > 0.0 {
                ((demand - available) / available * 100.0).round() as i64
            } else {
                100
            };

            let entry = report.entry(role.to_string()).or_insert_with(|| RoleOverload {
                role: role.to_string(),
                overload_periods: 0,
                max_overload_percent: 0,
            });
            entry.overload_periods += 1;
            entry.max_overload_percent = entry.max_overload_percent.max(percent);
        }
    }

    report.into_values().collect()
}
