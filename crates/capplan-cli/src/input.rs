//! Scenario and profile loading

use std::path::Path;

use anyhow::{Context, Result};
use capplan_core::{AuditLog, PlanningProfile, Project, Resource, Solution};
use capplan_solver::{ResolutionEngine, Scenario};
use serde::Deserialize;

/// JSON scenario file: the host's live snapshot plus accepted solutions
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioFile {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub resources: Vec<Resource>,
    /// Accepted solutions, in the order they were accepted
    #[serde(default)]
    pub audit_log: Vec<Solution>,
}

impl ScenarioFile {
    pub fn from_json_str(source: &str) -> Result<Self> {
        serde_json::from_str(source).context("invalid scenario JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_json_str(&source).with_context(|| format!("in {}", path.display()))
    }

    /// Replay the audit log over the snapshot
    pub fn current(&self, engine: &ResolutionEngine) -> Scenario {
        let log = AuditLog::from_solutions(self.audit_log.iter().cloned());
        tracing::debug!(
            projects = self.projects.len(),
            resources = self.resources.len(),
            entries = log.len(),
            "scenario loaded"
        );
        engine.apply_audit_log(&self.projects, &self.resources, &log)
    }
}

/// Built-in profile, or the TOML file at `path`
pub fn load_profile(path: Option<&Path>) -> Result<PlanningProfile> {
    match path {
        Some(path) => {
            let profile = PlanningProfile::load(path)
                .with_context(|| format!("failed to load profile {}", path.display()))?;
            tracing::info!(path = %path.display(), "planning profile loaded");
            Ok(profile)
        }
        None => Ok(PlanningProfile::builtin().clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capplan_core::ProjectStatus;

    #[test]
    fn audit_log_is_optional() {
        let file = ScenarioFile::from_json_str(
            r#"{
                "projects": [{"id": "1", "scale": "Large", "startDate": "2025-01-01", "endDate": "2025-03-31"}],
                "resources": [{"id": "r1", "role": "Developer", "capacity": 100}]
            }"#,
        )
        .unwrap();

        assert_eq!(file.projects.len(), 1);
        assert!(file.audit_log.is_empty());
    }

    #[test]
    fn audit_log_is_replayed() {
        let file = ScenarioFile::from_json_str(
            r#"{
                "projects": [{"id": "p1"}],
                "resources": [],
                "auditLog": [{
                    "id": "pause-p1",
                    "lever": "PRIORITY",
                    "label": "Pause Project",
                    "description": "Paused active project \"p1\".",
                    "remedy": {"action": {"type": "PAUSE_PROJECT", "projectId": "p1"}}
                }]
            }"#,
        )
        .unwrap();

        let current = file.current(&ResolutionEngine::default());
        assert_eq!(current.projects[0].status, ProjectStatus::Paused);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = ScenarioFile::from_json_str("{ projects: ").unwrap_err();
        assert!(err.to_string().contains("invalid scenario JSON"));
    }

    #[test]
    fn missing_profile_path_uses_builtin() {
        let profile = load_profile(None).unwrap();
        assert_eq!(profile.horizon_months, 12);
    }
}
