//! # capplan-core
//!
//! Core domain model for the capplan capacity planning engine.
//!
//! This crate provides:
//! - Domain types: `Project`, `Resource`, `Conflict`, `Solution`, `AuditLog`
//! - The `PlanningProfile`: role mapping, role distributions and every
//!   heuristic constant, loaded once and shared immutably
//! - Calendar-month arithmetic used for demand/capacity accounting
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use capplan_core::{PlanningProfile, Project, ProjectType, Resource, Scale};
//!
//! let project = Project::new("web-1")
//!     .name("Storefront")
//!     .project_type(ProjectType::Website)
//!     .scale(Scale::Large)
//!     .dates("2025-01-01", "2025-03-31");
//! let dev = Resource::new("r1", "Frontend Lead").capacity(160);
//!
//! let profile = PlanningProfile::builtin();
//! assert_eq!(profile.normalize_role(&dev.role), "Developer");
//! assert_eq!(profile.monthly_hours(project.scale), 640.0);
//! ```

use std::path::PathBuf;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod calendar;
pub mod lenient;
pub mod profile;
mod audit;
mod solution;

pub use audit::{AuditEntry, AuditLog};
pub use calendar::Month;
pub use profile::{roles, PlanningProfile, RoleDistribution, RoleShare, ScaleHours};
pub use solution::{Action, CapacityEstimate, Lever, PriorityCandidate, Remedy, Solution};

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique identifier for a project
pub type ProjectId = String;

/// Unique identifier for a resource
pub type ResourceId = String;

/// Identifier of a generated solution
pub type SolutionId = String;

/// Identifier of an accepted audit log entry
pub type EntryId = String;

/// Monetary amount with currency
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: Decimal,
    pub currency: String,
}

impl Money {
    pub fn new(amount: impl Into<Decimal>, currency: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            currency: currency.into(),
        }
    }

    fn symbol(&self) -> Option<&'static str> {
        match self.currency.as_str() {
            "GBP" => Some("£"),
            "USD" => Some("$"),
            "EUR" => Some("€"),
            _ => None,
        }
    }
}

impl std::fmt::Display for Money {
    /// `£30,000`, `$1,250.50`, or `CHF 900` for currencies without a symbol
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rounded = self.amount.round_dp(2).normalize();
        let text = rounded.abs().to_string();
        let (int_part, frac_part) = match text.split_once('.') {
            Some((i, frac)) => (i, Some(frac)),
            None => (text.as_str(), None),
        };

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if let Some(frac) = frac_part {
            grouped.push('.');
            grouped.push_str(frac);
            if frac.len() == 1 {
                grouped.push('0');
            }
        }

        let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
        match self.symbol() {
            Some(symbol) => write!(f, "{sign}{symbol}{grouped}"),
            None => write!(f, "{sign}{} {grouped}", self.currency),
        }
    }
}

// ============================================================================
// Project
// ============================================================================

/// Project size tier; selects the monthly hour figure
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scale {
    Small,
    #[default]
    Medium,
    Large,
}

impl Scale {
    /// Parse a scale label (case-insensitive)
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "small" => Some(Scale::Small),
            "medium" => Some(Scale::Medium),
            "large" => Some(Scale::Large),
            _ => None,
        }
    }
}

impl std::fmt::Display for Scale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scale::Small => write!(f, "Small"),
            Scale::Medium => write!(f, "Medium"),
            Scale::Large => write!(f, "Large"),
        }
    }
}

/// Project type; selects the role distribution profile
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProjectType {
    #[default]
    Website,
    Configurator,
    AssetProduction,
    /// Any other label; resolved against the profile by name
    Custom(String),
}

impl ProjectType {
    /// Label used as the key into the role distribution table
    pub fn as_str(&self) -> &str {
        match self {
            ProjectType::Website => "Website",
            ProjectType::Configurator => "Configurator",
            ProjectType::AssetProduction => "Asset Production",
            ProjectType::Custom(label) => label,
        }
    }

    /// Role whose capacity bounds a resource-driven project of this type
    pub fn key_role(&self) -> &'static str {
        match self {
            ProjectType::AssetProduction => roles::DESIGNER,
            _ => roles::DEVELOPER,
        }
    }
}

impl From<String> for ProjectType {
    fn from(label: String) -> Self {
        match label.trim() {
            "" | "Website" => ProjectType::Website,
            "Configurator" => ProjectType::Configurator,
            "Asset Production" | "AssetProduction" => ProjectType::AssetProduction,
            _ => ProjectType::Custom(label),
        }
    }
}

impl From<&str> for ProjectType {
    fn from(label: &str) -> Self {
        ProjectType::from(label.to_string())
    }
}

impl From<ProjectType> for String {
    fn from(project_type: ProjectType) -> Self {
        project_type.as_str().to_string()
    }
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a project
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    Active,
    Draft,
    Paused,
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStatus::Active => write!(f, "Active"),
            ProjectStatus::Draft => write!(f, "Draft"),
            ProjectStatus::Paused => write!(f, "Paused"),
        }
    }
}

/// A project placing monthly demand on roles between its start and end dates
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier; hosts may send a string or an integer
    #[serde(deserialize_with = "lenient::id")]
    pub id: ProjectId,
    /// Human-readable name
    #[serde(default)]
    pub name: String,
    /// Short display code
    #[serde(default)]
    pub code: String,
    #[serde(rename = "type", default)]
    pub project_type: ProjectType,
    #[serde(default, deserialize_with = "lenient::scale")]
    pub scale: Scale,
    /// First day of work (inclusive)
    #[serde(
        default,
        deserialize_with = "lenient::date",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<NaiveDate>,
    /// Last day of work (inclusive); computed for resource-driven projects
    #[serde(
        default,
        deserialize_with = "lenient::date",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: ProjectStatus,
    /// Sandbox-only, not yet committed
    #[serde(default)]
    pub is_draft: bool,
    /// End date is computed from available capacity
    #[serde(default)]
    pub is_resource_driven: bool,
    /// Remaining work in hours (resource-driven only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_effort: Option<u32>,
    /// Previously fixed end date, kept for delta display
    #[serde(
        default,
        deserialize_with = "lenient::date",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_end_date: Option<NaiveDate>,
}

impl Project {
    /// Create an active Medium website project with no dates
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            code: String::new(),
            project_type: ProjectType::Website,
            scale: Scale::Medium,
            start_date: None,
            end_date: None,
            status: ProjectStatus::Active,
            is_draft: false,
            is_resource_driven: false,
            total_effort: None,
            original_end_date: None,
        }
    }

    /// Set the project name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the display code
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn project_type(mut self, project_type: impl Into<ProjectType>) -> Self {
        self.project_type = project_type.into();
        self
    }

    pub fn scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    /// Set start and end from `YYYY-MM-DD` strings; malformed input leaves
    /// the date unset, exactly as deserialization would.
    pub fn dates(mut self, start: &str, end: &str) -> Self {
        self.start_date = lenient::parse_date(start);
        self.end_date = lenient::parse_date(end);
        self
    }

    /// Set only the start date
    pub fn starting(mut self, start: NaiveDate) -> Self {
        self.start_date = Some(start);
        self
    }

    pub fn status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    /// Mark as a sandbox draft
    pub fn draft(mut self) -> Self {
        self.is_draft = true;
        self.status = ProjectStatus::Draft;
        self
    }

    /// Mark as resource-driven with the given remaining effort in hours
    pub fn resource_driven(mut self, total_effort: u32) -> Self {
        self.is_resource_driven = true;
        self.total_effort = Some(total_effort);
        self
    }

    pub fn is_paused(&self) -> bool {
        self.status == ProjectStatus::Paused
    }

    /// Whether the project carries demand: not paused
    pub fn is_live(&self) -> bool {
        !self.is_paused()
    }

    /// Days the end date moved relative to `original_end_date`
    pub fn end_date_delta_days(&self) -> Option<i64> {
        match (self.original_end_date, self.end_date) {
            (Some(original), Some(end)) => Some((end - original).num_days()),
            _ => None,
        }
    }
}

/// Shallow, field-level changes for a project.
///
/// Only present fields are applied; later changes to the same field
/// replace earlier ones.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<ProjectType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_draft: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_resource_driven: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_effort: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_end_date: Option<NaiveDate>,
}

impl ProjectChanges {
    /// Apply every present field to `project`
    pub fn apply(&self, project: &mut Project) {
        if let Some(name) = &self.name {
            project.name = name.clone();
        }
        if let Some(code) = &self.code {
            project.code = code.clone();
        }
        if let Some(project_type) = &self.project_type {
            project.project_type = project_type.clone();
        }
        if let Some(scale) = self.scale {
            project.scale = scale;
        }
        if let Some(start) = self.start_date {
            project.start_date = Some(start);
        }
        if let Some(end) = self.end_date {
            project.end_date = Some(end);
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(flag) = self.is_draft {
            project.is_draft = flag;
        }
        if let Some(flag) = self.is_resource_driven {
            project.is_resource_driven = flag;
        }
        if let Some(effort) = self.total_effort {
            project.total_effort = Some(effort);
        }
        if let Some(original) = self.original_end_date {
            project.original_end_date = Some(original);
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ============================================================================
// Resource
// ============================================================================

/// A person (or contractor block) contributing monthly hours to one role
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Unique identifier; empty until the resource is placed in a scenario
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: ResourceId,
    #[serde(default)]
    pub name: String,
    /// Raw role label; normalized through the planning profile
    #[serde(default)]
    pub role: String,
    /// Hours per month
    #[serde(default, deserialize_with = "lenient::capacity")]
    pub capacity: u32,
    /// Org/team tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default)]
    pub is_contractor: bool,
}

impl Resource {
    /// Create a resource with zero capacity
    pub fn new(id: impl Into<String>, role: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            role: role.into(),
            capacity: 0,
            team: None,
            is_contractor: false,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set hours per month
    pub fn capacity(mut self, hours: u32) -> Self {
        self.capacity = hours;
        self
    }

    pub fn team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    pub fn contractor(mut self) -> Self {
        self.is_contractor = true;
        self
    }
}

// ============================================================================
// Analysis
// ============================================================================

/// The first chronological month where a role's demand exceeds capacity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    /// Canonical role that is overloaded
    pub role: String,
    /// Month label, e.g. "Jan 2025"
    pub period: String,
    /// Demand minus capacity, in hours
    pub deficit: f64,
    /// First day of the offending month
    pub month_date: NaiveDate,
}

impl Conflict {
    pub fn month(&self) -> Month {
        Month::containing(self.month_date)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Planning profile loading error
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Failed to read profile {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid profile TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Default project type '{0}' has no role distribution")]
    MissingDefaultType(String),

    #[error("Fraction {fraction} for role '{role}' in '{project_type}' is outside [0, 1]")]
    FractionOutOfRange {
        project_type: String,
        role: String,
        fraction: f64,
    },

    #[error("Invalid profile: {0}")]
    Invalid(String),
}

// ============================================================================
// Tests
// ============================================================================
