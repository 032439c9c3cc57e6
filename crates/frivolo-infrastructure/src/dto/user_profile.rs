//! UserProfile DTOs and migrations for the local cache.
//!
//! ## Version History
//! - **1.0.0**: name, age, country, salary and schedule
//! - **1.1.0**: added `email` and `job`

use serde::{Deserialize, Serialize};
use version_migrate::{IntoDomain, MigratesTo, Versioned};

use frivolo_core::error::Result;
use frivolo_core::user::{CachedProfile, ProfileDraft, ProfileField, UserProfile};

/// Entity name the migration path is registered under.
pub const USER_PROFILE_ENTITY: &str = "user_profile";

/// User profile V1.0.0 (first release, no email or job).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(rename_all = "camelCase")]
pub struct UserProfileV1_0 {
    pub name: String,
    pub age: u32,
    pub country: String,
    pub monthly_salary: f64,
    pub hours_per_day: f64,
    pub days_per_week: f64,
}

/// User profile V1.1.0 (added email and job).
///
/// `None` marks a field the user has never been asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.1.0")]
#[serde(rename_all = "camelCase")]
pub struct UserProfileV1_1 {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub age: u32,
    pub country: String,
    #[serde(default)]
    pub job: Option<String>,
    pub monthly_salary: f64,
    pub hours_per_day: f64,
    pub days_per_week: f64,
}

/// Type alias for the latest UserProfile version.
pub type UserProfileDTO = UserProfileV1_1;

// ============================================================================
// Migration implementations
// ============================================================================

/// Migration from UserProfileV1_0 to UserProfileV1_1.
impl MigratesTo<UserProfileV1_1> for UserProfileV1_0 {
    fn migrate(self) -> UserProfileV1_1 {
        UserProfileV1_1 {
            name: self.name,
            email: None,
            age: self.age,
            country: self.country,
            job: None,
            monthly_salary: self.monthly_salary,
            hours_per_day: self.hours_per_day,
            days_per_week: self.days_per_week,
        }
    }
}

// ============================================================================
// Domain model conversions
// ============================================================================

/// Convert UserProfileV1_1 DTO to the cached domain value.
///
/// The result is only `Complete` when every field is present and passes
/// validation; otherwise the values are handed back as a draft.
impl IntoDomain<CachedProfile> for UserProfileV1_1 {
    fn into_domain(self) -> CachedProfile {
        let mut draft = ProfileDraft::new();
        draft.set(ProfileField::Name, self.name);
        if let Some(email) = self.email {
            draft.set(ProfileField::Email, email);
        }
        draft.set(ProfileField::Age, self.age.to_string());
        draft.set(ProfileField::Country, self.country);
        if let Some(job) = self.job {
            draft.set(ProfileField::Job, job);
        }
        draft.set_number(ProfileField::MonthlySalary, self.monthly_salary);
        draft.set_number(ProfileField::HoursPerDay, self.hours_per_day);
        draft.set_number(ProfileField::DaysPerWeek, self.days_per_week);

        match draft.complete() {
            Ok(profile) => CachedProfile::Complete(profile),
            Err(_) => CachedProfile::Incomplete(draft),
        }
    }
}

/// Convert domain model to UserProfileV1_1 DTO for persistence.
impl From<&UserProfile> for UserProfileV1_1 {
    fn from(profile: &UserProfile) -> Self {
        UserProfileV1_1 {
            name: profile.name.clone(),
            email: Some(profile.email.clone()),
            age: profile.age,
            country: profile.country.clone(),
            job: Some(profile.job.clone()),
            monthly_salary: profile.monthly_salary,
            hours_per_day: profile.hours_per_day,
            days_per_week: profile.days_per_week,
        }
    }
}

// ============================================================================
// Migrator factory and flat serialization
// ============================================================================

/// Creates a Migrator for cached user profiles.
///
/// # Migration Path
///
/// - V1.0 → V1.1: `email` and `job` become unset
/// - V1.1 → CachedProfile: complete profile, or a draft for the wizard
pub fn create_user_profile_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let user_profile_path = version_migrate::Migrator::define(USER_PROFILE_ENTITY)
        .from::<UserProfileV1_0>()
        .step::<UserProfileV1_1>()
        .into::<CachedProfile>();

    migrator
        .register(user_profile_path)
        .expect("Failed to register user_profile migration path");

    migrator
}

/// Serializes `profile` as a flat JSON object tagged with the latest version.
pub fn to_flat_json(profile: &UserProfile) -> Result<String> {
    let mut value = serde_json::to_value(UserProfileDTO::from(profile))?;
    if let serde_json::Value::Object(fields) = &mut value {
        fields.insert(
            "version".to_string(),
            serde_json::Value::String(UserProfileDTO::VERSION.to_string()),
        );
    }
    Ok(serde_json::to_string(&value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use frivolo_core::user::DEFAULT_COUNTRY;

    fn profile() -> UserProfile {
        UserProfile {
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            age: 30,
            country: DEFAULT_COUNTRY.to_string(),
            job: "Diseñador Gráfico".to_string(),
            monthly_salary: 20000.0,
            hours_per_day: 8.0,
            days_per_week: 5.0,
        }
    }

    fn load(json: serde_json::Value) -> std::result::Result<CachedProfile, version_migrate::MigrationError> {
        create_user_profile_migrator().load_flat_from(USER_PROFILE_ENTITY, json)
    }

    #[test]
    fn test_latest_version_is_tagged() {
        let json: serde_json::Value = serde_json::from_str(&to_flat_json(&profile()).unwrap()).unwrap();
        assert_eq!(json["version"], "1.1.0");
        assert_eq!(json["monthlySalary"], 20000.0);
        assert_eq!(json["job"], "Diseñador Gráfico");
    }

    #[test]
    fn test_current_entry_loads_complete() {
        let json: serde_json::Value = serde_json::from_str(&to_flat_json(&profile()).unwrap()).unwrap();
        assert_eq!(load(json).unwrap(), CachedProfile::Complete(profile()));
    }

    #[test]
    fn test_v1_0_entry_migrates_to_incomplete_draft() {
        let json = serde_json::json!({
            "version": "1.0.0",
            "name": "Luis",
            "age": 41,
            "country": "México",
            "monthlySalary": 12000,
            "hoursPerDay": 6,
            "daysPerWeek": 6
        });

        match load(json).unwrap() {
            CachedProfile::Incomplete(draft) => {
                assert_eq!(draft.get(ProfileField::Name), Some("Luis"));
                assert_eq!(draft.get(ProfileField::MonthlySalary), Some("12000"));
                assert_eq!(
                    draft.missing_fields(),
                    vec![ProfileField::Email, ProfileField::Job]
                );
            }
            other => panic!("expected incomplete draft, got {:?}", other),
        }
    }

    #[test]
    fn test_migrate_step_leaves_new_fields_unset() {
        let v1_0 = UserProfileV1_0 {
            name: "Luis".to_string(),
            age: 41,
            country: DEFAULT_COUNTRY.to_string(),
            monthly_salary: 12000.0,
            hours_per_day: 6.0,
            days_per_week: 6.0,
        };
        let latest: UserProfileV1_1 = v1_0.migrate();
        assert_eq!(latest.email, None);
        assert_eq!(latest.job, None);
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let json = serde_json::json!({"version": "9.9.9", "name": "Ana"});
        assert!(load(json).is_err());
    }
}
