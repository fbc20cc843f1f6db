//! Planning profile
//!
//! The single source of every heuristic constant the engine uses: role
//! label normalization, per-type role distributions, scale hours, contractor
//! assumptions and loop bounds. A profile is built once (the built-in
//! defaults, optionally overridden from TOML) and then shared immutably by
//! reference.
//!
//! ```toml
//! horizon_months = 6
//! currency = "EUR"
//!
//! [role_mapping]
//! "Backend Engineer" = "Developer"
//!
//! [role_distribution]
//! "Data Platform" = [
//!     { role = "Developer", fraction = 0.7 },
//!     { role = "QA", fraction = 0.3 },
//! ]
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ProfileError, ProjectType, Scale};

/// Canonical role names used by the built-in tables
pub mod roles {
    pub const DEVELOPER: &str = "Developer";
    pub const DESIGNER: &str = "Designer";
    pub const MANAGER: &str = "Manager";
    pub const QA: &str = "QA";
    pub const PRODUCT_OWNER: &str = "Product Owner";
}

/// One role's share of a project's monthly hours
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoleShare {
    pub role: String,
    pub fraction: f64,
}

impl RoleShare {
    pub fn new(role: impl Into<String>, fraction: f64) -> Self {
        Self {
            role: role.into(),
            fraction,
        }
    }
}

/// Ordered role fractions for one project type.
///
/// Fractions need not sum to 1; the remainder is unmodeled work. Entry
/// order is the order roles are examined when a month is checked for
/// overload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleDistribution {
    shares: Vec<RoleShare>,
}

impl RoleDistribution {
    pub fn new(shares: Vec<RoleShare>) -> Self {
        Self { shares }
    }

    /// Fraction for `role`, 0.0 when the type does not use it
    pub fn fraction(&self, role: &str) -> f64 {
        self.shares
            .iter()
            .find(|s| s.role == role)
            .map(|s| s.fraction)
            .unwrap_or(0.0)
    }

    /// Whether the type puts any demand on `role`
    pub fn uses(&self, role: &str) -> bool {
        self.fraction(role) > 0.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoleShare> {
        self.shares.iter()
    }

    pub fn total(&self) -> f64 {
        self.shares.iter().map(|s| s.fraction).sum()
    }
}

/// Monthly demand per project scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleHours {
    pub small: f64,
    pub medium: f64,
    pub large: f64,
}

impl Default for ScaleHours {
    fn default() -> Self {
        Self {
            small: 160.0,
            medium: 320.0,
            large: 640.0,
        }
    }
}

/// All planning heuristics in one immutable value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningProfile {
    /// Raw job title -> canonical role
    pub role_mapping: BTreeMap<String, String>,
    /// Project type label -> role distribution
    pub role_distribution: BTreeMap<String, RoleDistribution>,
    /// Type whose distribution is used for unknown project types
    pub default_project_type: String,
    pub scale_hours: ScaleHours,
    /// Hours one contractor adds per month
    pub contractor_monthly_hours: f64,
    /// Flat cost of one contractor-month
    pub contractor_monthly_rate: Decimal,
    pub currency: String,
    /// Months scanned by conflict detection and forecasts
    pub horizon_months: u32,
    /// Months the time lever delays a project by
    pub time_shift_months: u32,
    /// Upper bound on resource-driven scheduling iterations
    pub schedule_iteration_cap: u32,
    /// Effort assumed when a resource-driven project has none
    pub default_total_effort: u32,
}

impl Default for PlanningProfile {
    fn default() -> Self {
        use roles::*;

        let role_mapping = [
            ("Frontend Lead", DEVELOPER),
            ("3D Artist", DESIGNER),
            (PRODUCT_OWNER, PRODUCT_OWNER),
            (DEVELOPER, DEVELOPER),
            (QA, QA),
            (DESIGNER, DESIGNER),
            (MANAGER, MANAGER),
        ]
        .into_iter()
        .map(|(raw, role)| (raw.to_string(), role.to_string()))
        .collect();

        let mut role_distribution = BTreeMap::new();
        role_distribution.insert(
            "Website".to_string(),
            RoleDistribution::new(vec![
                RoleShare::new(DEVELOPER, 0.5),
                RoleShare::new(DESIGNER, 0.3),
                RoleShare::new(QA, 0.1),
                RoleShare::new(MANAGER, 0.1),
            ]),
        );
        role_distribution.insert(
            "Configurator".to_string(),
            RoleDistribution::new(vec![
                RoleShare::new(DEVELOPER, 0.6),
                RoleShare::new(DESIGNER, 0.2),
                RoleShare::new(QA, 0.1),
                RoleShare::new(MANAGER, 0.1),
            ]),
        );
        role_distribution.insert(
            "Asset Production".to_string(),
            RoleDistribution::new(vec![
                RoleShare::new(DESIGNER, 0.8),
                RoleShare::new(MANAGER, 0.2),
            ]),
        );

        Self {
            role_mapping,
            role_distribution,
            default_project_type: "Website".into(),
            scale_hours: ScaleHours::default(),
            contractor_monthly_hours: 160.0,
            contractor_monthly_rate: Decimal::from(15_000),
            currency: "GBP".into(),
            horizon_months: 12,
            time_shift_months: 2,
            schedule_iteration_cap: 60,
            default_total_effort: 960,
        }
    }
}

impl PlanningProfile {
    /// Shared built-in profile
    pub fn builtin() -> &'static PlanningProfile {
        static BUILTIN: OnceLock<PlanningProfile> = OnceLock::new();
        BUILTIN.get_or_init(PlanningProfile::default)
    }

    /// Parse a profile from TOML. Omitted keys keep their built-in values;
    /// a table that is present replaces the built-in table wholesale.
    pub fn from_toml_str(source: &str) -> Result<Self, ProfileError> {
        let profile: PlanningProfile = toml::from_str(source)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Read and parse a TOML profile file
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let source = std::fs::read_to_string(path).map_err(|source| ProfileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<(), ProfileError> {
        if !self.role_distribution.contains_key(&self.default_project_type) {
            return Err(ProfileError::MissingDefaultType(
                self.default_project_type.clone(),
            ));
        }
        for (project_type, distribution) in &self.role_distribution {
            for share in distribution.iter() {
                if !(0.0..=1.0).contains(&share.fraction) {
                    return Err(ProfileError::FractionOutOfRange {
                        project_type: project_type.clone(),
                        role: share.role.clone(),
                        fraction: share.fraction,
                    });
                }
            }
        }
        if self.horizon_months == 0 {
            return Err(ProfileError::Invalid("horizon_months must be positive".into()));
        }
        if self.schedule_iteration_cap == 0 {
            return Err(ProfileError::Invalid(
                "schedule_iteration_cap must be positive".into(),
            ));
        }
        if self.contractor_monthly_hours <= 0.0 {
            return Err(ProfileError::Invalid(
                "contractor_monthly_hours must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Map a raw job title to its canonical role. Unknown titles pass
    /// through unchanged.
    pub fn normalize_role<'a>(&'a self, raw: &'a str) -> &'a str {
        self.role_mapping.get(raw).map(String::as_str).unwrap_or(raw)
    }

    /// Role distribution for a project type, falling back to the default type
    pub fn role_distribution(&self, project_type: &ProjectType) -> &RoleDistribution {
        self.role_distribution
            .get(project_type.as_str())
            .or_else(|| self.role_distribution.get(&self.default_project_type))
            .unwrap_or_else(|| empty_distribution())
    }

    /// Shorthand for `role_distribution(ty).fraction(role)`
    pub fn fraction(&self, project_type: &ProjectType, role: &str) -> f64 {
        self.role_distribution(project_type).fraction(role)
    }

    /// Monthly demand for a scale
    pub fn monthly_hours(&self, scale: Scale) -> f64 {
        match scale {
            Scale::Small => self.scale_hours.small,
            Scale::Medium => self.scale_hours.medium,
            Scale::Large => self.scale_hours.large,
        }
    }
}

fn empty_distribution() -> &'static RoleDistribution {
    static EMPTY: OnceLock<RoleDistribution> = OnceLock::new();
    EMPTY.get_or_init(RoleDistribution::default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalize_known_titles() {
        let profile = PlanningProfile::default();
        assert_eq!(profile.normalize_role("Frontend Lead"), "Developer");
        assert_eq!(profile.normalize_role("3D Artist"), "Designer");
        assert_eq!(profile.normalize_role("QA"), "QA");
        assert_eq!(profile.normalize_role("Product Owner"), "Product Owner");
    }

    #[test]
    fn normalize_unknown_passes_through() {
        let profile = PlanningProfile::default();
        assert_eq!(profile.normalize_role("Devloper"), "Devloper");
        assert_eq!(profile.normalize_role("Data Scientist"), "Data Scientist");
    }

    #[test]
    fn distribution_preserves_declared_order() {
        let profile = PlanningProfile::default();
        let roles: Vec<_> = profile
            .role_distribution(&ProjectType::Website)
            .iter()
            .map(|s| s.role.as_str())
            .collect();
        assert_eq!(roles, vec!["Developer", "Designer", "QA", "Manager"]);
    }

    #[test]
    fn unknown_type_falls_back_to_website() {
        let profile = PlanningProfile::default();
        let custom = ProjectType::Custom("Mobile App".into());
        assert_eq!(
            profile.role_distribution(&custom),
            profile.role_distribution(&ProjectType::Website)
        );
        assert_eq!(profile.fraction(&custom, "Developer"), 0.5);
    }

    #[test]
    fn missing_tables_fall_back_to_empty_distribution() {
        let profile = PlanningProfile {
            role_distribution: BTreeMap::new(),
            ..PlanningProfile::default()
        };
        let dist = profile.role_distribution(&ProjectType::Configurator);
        assert_eq!(dist.iter().count(), 0);
        assert_eq!(profile.fraction(&ProjectType::Website, "Developer"), 0.0);
    }

    #[test]
    fn asset_production_has_no_developers() {
        let profile = PlanningProfile::default();
        let dist = profile.role_distribution(&ProjectType::AssetProduction);
        assert!(!dist.uses("Developer"));
        assert_eq!(dist.fraction("Designer"), 0.8);
        assert!((dist.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn monthly_hours_per_scale() {
        let profile = PlanningProfile::default();
        assert_eq!(profile.monthly_hours(Scale::Small), 160.0);
        assert_eq!(profile.monthly_hours(Scale::Medium), 320.0);
        assert_eq!(profile.monthly_hours(Scale::Large), 640.0);
    }

    #[test]
    fn toml_overrides_subset() {
        let profile = PlanningProfile::from_toml_str(
            r#"
            horizon_months = 6
            currency = "EUR"
            contractor_monthly_rate = "12000"

            [role_mapping]
            "Backend Engineer" = "Developer"
            "#,
        )
        .unwrap();

        assert_eq!(profile.horizon_months, 6);
        assert_eq!(profile.currency, "EUR");
        assert_eq!(profile.contractor_monthly_rate, Decimal::from(12_000));
        assert_eq!(profile.normalize_role("Backend Engineer"), "Developer");
        // Replaced table: built-in titles are gone
        assert_eq!(profile.normalize_role("Frontend Lead"), "Frontend Lead");
        // Untouched keys keep defaults
        assert_eq!(profile.schedule_iteration_cap, 60);
        assert_eq!(profile.role_distribution.len(), 3);
    }

    #[test]
    fn toml_custom_distribution_keeps_order() {
        let profile = PlanningProfile::from_toml_str(
            r#"
            default_project_type = "Data Platform"

            [role_distribution]
            "Data Platform" = [
                { role = "QA", fraction = 0.3 },
                { role = "Developer", fraction = 0.7 },
            ]
            "#,
        )
        .unwrap();

        let roles: Vec<_> = profile
            .role_distribution(&ProjectType::Website)
            .iter()
            .map(|s| s.role.clone())
            .collect();
        assert_eq!(roles, vec!["QA".to_string(), "Developer".to_string()]);
    }

    #[test]
    fn toml_rejects_fraction_out_of_range() {
        let err = PlanningProfile::from_toml_str(
            r#"
            [role_distribution]
            Website = [{ role = "Developer", fraction = 1.5 }]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ProfileError::FractionOutOfRange { .. }));
    }

    #[test]
    fn toml_rejects_missing_default_type() {
        let err = PlanningProfile::from_toml_str(r#"default_project_type = "Nope""#).unwrap_err();
        assert!(matches!(err, ProfileError::MissingDefaultType(t) if t == "Nope"));
    }

    #[test]
    fn toml_syntax_error_is_reported() {
        let err = PlanningProfile::from_toml_str("horizon_months = ").unwrap_err();
        assert!(matches!(err, ProfileError::Parse(_)));
    }
}
