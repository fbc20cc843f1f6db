//! Audit log replay and solution preview

use capplan_core::{
    Action, AuditLog, Lever, Project, ProjectChanges, ProjectStatus, Resource, Scale, Solution,
};
use capplan_solver::{apply_audit_log, preview, Scenario, PREVIEW_RESOURCE_ID};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;

fn resize(project_id: &str, scale: Scale) -> Solution {
    Solution::actionable(
        format!("resize-{project_id}"),
        Lever::Priority,
        "Resize Project",
        "resize",
        Action::UpdateProject {
            project_id: project_id.into(),
            changes: ProjectChanges {
                scale: Some(scale),
                ..Default::default()
            },
        },
    )
}

fn pause(project_id: &str) -> Solution {
    Solution::actionable(
        format!("pause-{project_id}"),
        Lever::Priority,
        "Pause Project",
        "pause",
        Action::PauseProject {
            project_id: project_id.into(),
        },
    )
}

fn hire(role: &str, hours: u32) -> Solution {
    Solution::actionable(
        "opt_cap",
        Lever::Capacity,
        "Add Capacity",
        "hire",
        Action::AddResource {
            resource: Resource::new("", role).capacity(hours).contractor(),
        },
    )
}

fn base() -> (Vec<Project>, Vec<Resource>) {
    (
        vec![
            Project::new("p1").scale(Scale::Large).dates("2025-01-01", "2025-03-31"),
            Project::new("p2").dates("2025-02-01", "2025-04-30"),
        ],
        vec![Resource::new("r1", "Developer").capacity(160)],
    )
}

#[test]
fn resize_then_pause_keeps_both_changes() {
    let (projects, resources) = base();
    let log = AuditLog::from_solutions([resize("p1", Scale::Small), pause("p1")]);

    let current = apply_audit_log(&projects, &resources, &log);

    let p1 = current.project("p1").unwrap();
    assert_eq!(p1.status, ProjectStatus::Paused);
    assert_eq!(p1.scale, Scale::Small);
    assert_eq!(current.projects.len(), 2);
}

#[test]
fn later_entries_win_per_field() {
    let (projects, resources) = base();
    let log = AuditLog::from_solutions([resize("p2", Scale::Large), resize("p2", Scale::Small)]);

    let current = apply_audit_log(&projects, &resources, &log);
    assert_eq!(current.project("p2").unwrap().scale, Scale::Small);
}

#[test]
fn added_resources_get_entry_ids() {
    let (projects, resources) = base();
    let mut log = AuditLog::new();
    let first = log.append(hire("Developer", 160));
    let second = log.append(hire("Designer", 320));

    let current = apply_audit_log(&projects, &resources, &log);

    let ids: Vec<String> = current.resources.iter().map(|r| r.id.clone()).collect();
    assert_eq!(
        ids,
        vec![
            "r1".to_string(),
            format!("temp-{first}"),
            format!("temp-{second}")
        ]
    );
    assert_eq!(first, "opt_cap-1");
    assert!(current.resources[1].is_contractor);
}

#[test]
fn undo_replays_without_removed_entry() {
    let (projects, resources) = base();
    let mut log = AuditLog::new();
    let resized = log.append(resize("p1", Scale::Small));
    log.append(pause("p2"));

    log.remove(&resized).unwrap();
    let current = apply_audit_log(&projects, &resources, &log);

    assert_eq!(current.project("p1").unwrap().scale, Scale::Large);
    assert_eq!(current.project("p2").unwrap().status, ProjectStatus::Paused);
}

#[test]
fn base_collections_are_untouched() {
    let (projects, resources) = base();
    let (projects_before, resources_before) = (projects.clone(), resources.clone());
    let log = AuditLog::from_solutions([resize("p1", Scale::Small), hire("QA", 80)]);

    let _ = apply_audit_log(&projects, &resources, &log);

    assert_eq!(projects, projects_before);
    assert_eq!(resources, resources_before);
}

#[test]
fn entries_for_unknown_projects_are_skipped() {
    let (projects, resources) = base();
    let log = AuditLog::from_solutions([pause("gone")]);

    let current = apply_audit_log(&projects, &resources, &log);
    assert_eq!(current, Scenario::new(projects, resources));
}

#[test]
fn preview_adds_one_solution_on_top() {
    let (projects, resources) = base();
    let current = Scenario::new(projects, resources);

    let previewed = preview(&current, &hire("Developer", 160));
    assert_eq!(previewed.resources.len(), 2);
    assert_eq!(previewed.resources[1].id, PREVIEW_RESOURCE_ID);
    assert_eq!(current.resources.len(), 1);

    let shifted = Solution::actionable(
        "opt_time",
        Lever::Time,
        "Shift Timeline",
        "shift",
        Action::UpdateProject {
            project_id: "p2".into(),
            changes: ProjectChanges {
                start_date: NaiveDate::from_ymd_opt(2025, 4, 1),
                end_date: NaiveDate::from_ymd_opt(2025, 6, 30),
                ..Default::default()
            },
        },
    );
    let previewed = preview(&current, &shifted);
    assert_eq!(
        previewed.project("p2").unwrap().start_date,
        NaiveDate::from_ymd_opt(2025, 4, 1)
    );
}
