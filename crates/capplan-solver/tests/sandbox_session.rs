//! Sandbox session: drafts, accepted solutions, undo and commit

use capplan_core::{
    Action, Lever, PlanningProfile, Project, ProjectChanges, ProjectStatus, Resource, Scale,
    Solution,
};
use capplan_solver::{
    ResolutionEngine, SandboxError, Scenario, CAPACITY_SOLUTION_ID, PRIORITY_SOLUTION_ID,
    TIME_SOLUTION_ID,
};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn as_of() -> NaiveDate {
    date(2025, 1, 1)
}

fn live_projects() -> Vec<Project> {
    vec![Project::new("p1")
        .name("Intranet")
        .scale(Scale::Medium)
        .dates("2025-01-01", "2025-03-31")]
}

fn live_resources() -> Vec<Resource> {
    vec![
        Resource::new("dev", "Developer").capacity(160),
        Resource::new("des", "Designer").capacity(500),
        Resource::new("qa", "QA").capacity(500),
        Resource::new("pm", "Manager").capacity(500),
    ]
}

fn pitch_draft() -> Project {
    Project::new("ignored")
        .name("Pitch Site")
        .scale(Scale::Large)
        .dates("2025-02-01", "2025-03-31")
}

#[test]
fn draft_resolved_with_time_then_capacity_and_committed() {
    let engine = ResolutionEngine::default();
    let mut sandbox = engine.sandbox(live_projects(), live_resources());
    assert!(sandbox.analyze(as_of()).is_viable());

    let draft_id = sandbox.add_draft(pitch_draft());
    assert_eq!(draft_id, "draft-1");

    let analysis = sandbox.analyze(as_of());
    let conflict = analysis.conflict.clone().unwrap();
    assert_eq!(conflict.period, "Feb 2025");
    assert_eq!(conflict.deficit, 320.0);
    assert_eq!(analysis.solutions.len(), 3);

    let time = analysis.solution(TIME_SOLUTION_ID).unwrap().clone();
    let previewed = sandbox.preview(&time);
    assert_eq!(
        previewed.project("draft-1").unwrap().start_date,
        Some(date(2025, 4, 1))
    );
    // preview leaves the session alone
    assert!(sandbox.audit_log().is_empty());

    sandbox.apply_solution(time).unwrap();
    let analysis = sandbox.analyze(as_of());
    let conflict = analysis.conflict.clone().unwrap();
    assert_eq!(conflict.period, "Apr 2025");
    assert_eq!(conflict.deficit, 160.0);

    let capacity = analysis.solution(CAPACITY_SOLUTION_ID).unwrap().clone();
    assert_eq!(capacity.estimate.as_ref().unwrap().headcount, 1);
    sandbox.apply_solution(capacity).unwrap();
    assert!(sandbox.analyze(as_of()).is_viable());
    assert_eq!(sandbox.current().resources.len(), 5);

    let committed = sandbox.commit(as_of()).unwrap();
    assert_eq!(committed.len(), 1);
    assert_eq!(committed[0].id, "");
    assert_eq!(committed[0].name, "Pitch Site");
    assert_eq!(committed[0].status, ProjectStatus::Active);
    assert!(!committed[0].is_draft);
    assert_eq!(committed[0].start_date, Some(date(2025, 4, 1)));
    assert_eq!(committed[0].end_date, Some(date(2025, 5, 31)));

    assert!(sandbox.drafts().is_empty());
    assert!(sandbox.audit_log().is_empty());
}

#[test]
fn commit_is_refused_while_conflicted() {
    let profile = PlanningProfile::default();
    let engine = ResolutionEngine::new(profile);
    let mut sandbox = engine.sandbox(live_projects(), live_resources());
    sandbox.add_draft(pitch_draft());

    let err = sandbox.commit(as_of()).unwrap_err();
    assert!(matches!(
        err,
        SandboxError::UnresolvedConflict { ref role, ref period }
            if role == "Developer" && period == "Feb 2025"
    ));
    assert_eq!(sandbox.drafts().len(), 1);
}

#[test]
fn disabled_and_candidate_solutions_cannot_be_applied() {
    let engine = ResolutionEngine::default();
    // only a draft competes, so PRIORITY has no candidates
    let (_, analysis) = engine.analyze(
        Scenario::new(
            vec![Project::new("p").dates("2025-01-01", "2025-01-31").draft()],
            vec![],
        ),
        as_of(),
    );
    let mut sandbox = engine.sandbox(vec![], vec![]);

    let priority = analysis.solution(PRIORITY_SOLUTION_ID).unwrap().clone();
    assert!(matches!(
        sandbox.apply_solution(priority),
        Err(SandboxError::SolutionDisabled(id)) if id == PRIORITY_SOLUTION_ID
    ));

    let mut sandbox = engine.sandbox(live_projects(), live_resources());
    sandbox.add_draft(pitch_draft());
    let analysis = sandbox.analyze(as_of());
    let priority = analysis.solution(PRIORITY_SOLUTION_ID).unwrap().clone();
    assert!(matches!(
        sandbox.apply_solution(priority),
        Err(SandboxError::NoAction(_))
    ));
    assert!(sandbox.audit_log().is_empty());
}

#[test]
fn pausing_a_candidate_frees_capacity() {
    let engine = ResolutionEngine::default();
    let mut sandbox = engine.sandbox(live_projects(), live_resources());
    sandbox.add_draft(
        Project::new("ignored")
            .name("Small Pitch")
            .scale(Scale::Small)
            .dates("2025-02-01", "2025-03-31"),
    );

    let analysis = sandbox.analyze(as_of());
    assert_eq!(analysis.conflict.as_ref().unwrap().deficit, 80.0);

    let priority = analysis.solution(PRIORITY_SOLUTION_ID).unwrap();
    let candidate = &priority.candidates()[0];
    assert_eq!(candidate.project.id, "p1");
    assert_eq!(candidate.role_impact, 160);

    let entry = sandbox.apply_solution(candidate.pause_solution()).unwrap();
    assert!(sandbox.current().project("p1").is_none());
    assert!(sandbox.analyze(as_of()).is_viable());

    sandbox.undo(&entry).unwrap();
    assert!(sandbox.current().project("p1").is_some());
    assert!(!sandbox.analyze(as_of()).is_viable());
}

#[test]
fn undo_unknown_entry_is_an_error() {
    let engine = ResolutionEngine::default();
    let mut sandbox = engine.sandbox(live_projects(), live_resources());

    assert!(matches!(
        sandbox.undo("opt_time-9"),
        Err(SandboxError::EntryNotFound(id)) if id == "opt_time-9"
    ));
}

#[test]
fn removing_a_draft_drops_its_entries() {
    let engine = ResolutionEngine::default();
    let mut sandbox = engine.sandbox(live_projects(), live_resources());
    sandbox.add_draft(pitch_draft());

    let analysis = sandbox.analyze(as_of());
    let time = analysis.solution(TIME_SOLUTION_ID).unwrap().clone();
    let capacity = analysis.solution(CAPACITY_SOLUTION_ID).unwrap().clone();
    sandbox.apply_solution(time).unwrap();
    let kept = sandbox.apply_solution(capacity).unwrap();

    let removed = sandbox.remove_draft("draft-1").unwrap();
    assert_eq!(removed.name, "Pitch Site");

    let ids: Vec<&str> = sandbox.audit_log().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec![kept.as_str()]);
    assert!(matches!(
        sandbox.remove_draft("draft-1"),
        Err(SandboxError::DraftNotFound(_))
    ));
}

#[test]
fn resource_driven_projects_are_scheduled_in_current() {
    let engine = ResolutionEngine::default();
    let projects = vec![Project::new("flex")
        .starting(date(2025, 1, 1))
        .resource_driven(960)];
    let resources = vec![Resource::new("dev", "Developer").capacity(640)];
    let sandbox = engine.sandbox(projects, resources);

    let current = sandbox.current();
    let flex = current.project("flex").unwrap();
    assert_eq!(flex.end_date, Some(date(2025, 3, 31)));
    assert_eq!(flex.original_end_date, None);
}

#[test]
fn reset_clears_drafts_and_log() {
    let engine = ResolutionEngine::default();
    let mut sandbox = engine.sandbox(live_projects(), live_resources());
    sandbox.add_draft(pitch_draft());
    let time = sandbox
        .analyze(as_of())
        .solution(TIME_SOLUTION_ID)
        .unwrap()
        .clone();
    sandbox.apply_solution(time).unwrap();

    sandbox.reset();

    assert!(sandbox.drafts().is_empty());
    assert!(sandbox.audit_log().is_empty());
    assert_eq!(sandbox.current().projects, live_projects());
    assert_eq!(sandbox.add_draft(pitch_draft()), "draft-2");
}

#[test]
fn draft_ids_never_shadow_committed_projects() {
    let engine = ResolutionEngine::default();
    let mut sandbox = engine.sandbox(live_projects(), live_resources());
    sandbox.add_draft(
        Project::new("ignored")
            .name("First")
            .scale(Scale::Medium)
            .dates("2025-06-01", "2025-07-31"),
    );

    let mut committed = sandbox.commit(as_of()).unwrap();
    assert_eq!(committed.len(), 1);
    // host persists the project under the key it saw in the sandbox
    committed[0].id = "draft-1".into();
    let mut live = live_projects();
    live.extend(committed);
    sandbox.refresh_live(live, live_resources());

    let second = sandbox.add_draft(pitch_draft().name("Second"));
    assert_eq!(second, "draft-2");

    let resize = Solution::actionable(
        format!("resize-{second}"),
        Lever::Priority,
        "Resize Project",
        "resize",
        Action::UpdateProject {
            project_id: second.clone(),
            changes: ProjectChanges {
                scale: Some(Scale::Small),
                ..Default::default()
            },
        },
    );
    sandbox.apply_solution(resize).unwrap();

    let current = sandbox.current();
    assert_eq!(current.project("draft-1").unwrap().name, "First");
    assert_eq!(current.project("draft-1").unwrap().scale, Scale::Medium);
    assert_eq!(current.project(&second).unwrap().scale, Scale::Small);
    assert!(!current.project("draft-1").unwrap().is_draft);
}

#[test]
fn draft_ids_skip_live_project_ids() {
    let engine = ResolutionEngine::default();
    let live = vec![Project::new("draft-1"), Project::new("draft-2")];
    let mut sandbox = engine.sandbox(live, live_resources());

    assert_eq!(sandbox.add_draft(pitch_draft()), "draft-3");
    assert_eq!(sandbox.add_draft(pitch_draft()), "draft-4");
}
