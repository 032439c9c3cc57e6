//! User profile domain models.
//!
//! `UserProfile` is the complete, typed profile the calculator works with.
//! `ProfileDraft` is the form-side representation used while the wizard is
//! collecting input: every field is either explicitly unset or holds the raw
//! text the user typed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// Country stamped on every profile. The product only supports Mexico.
pub const DEFAULT_COUNTRY: &str = "México";

/// Job titles offered as suggestions in the wizard. Free text is also accepted.
pub const JOB_SUGGESTIONS: &[&str] = &[
    "Desarrollador de Software",
    "Diseñador Gráfico",
    "Contador",
    "Maestro",
    "Enfermero",
    "Ingeniero",
    "Abogado",
    "Médico",
    "Vendedor",
    "Administrador",
    "Estudiante",
    "Freelancer",
];

/// Identifies one field of the user profile.
///
/// Display names match the keys used by the form and the local cache.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
    EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ProfileField {
    Name,
    Email,
    Age,
    Country,
    Job,
    MonthlySalary,
    HoursPerDay,
    DaysPerWeek,
}

impl ProfileField {
    /// Human readable label shown next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            ProfileField::Name => "Tu nombre",
            ProfileField::Email => "Tu correo electrónico",
            ProfileField::Age => "Tu edad",
            ProfileField::Country => "País",
            ProfileField::Job => "¿A qué te dedicas?",
            ProfileField::MonthlySalary => "Sueldo mensual (MXN)",
            ProfileField::HoursPerDay => "Horas por día",
            ProfileField::DaysPerWeek => "Días por semana",
        }
    }

    /// Example value shown as a placeholder.
    pub fn placeholder(&self) -> &'static str {
        match self {
            ProfileField::Name => "Ej: María García",
            ProfileField::Email => "maria@ejemplo.com",
            ProfileField::Age => "25",
            ProfileField::Country => DEFAULT_COUNTRY,
            ProfileField::Job => "Diseñador Gráfico",
            ProfileField::MonthlySalary => "15000",
            ProfileField::HoursPerDay => "8",
            ProfileField::DaysPerWeek => "5",
        }
    }

    /// Fields whose value is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ProfileField::Age
                | ProfileField::MonthlySalary
                | ProfileField::HoursPerDay
                | ProfileField::DaysPerWeek
        )
    }
}

/// A complete user profile.
///
/// Every field is present and has passed validation; see
/// [`ProfileDraft::complete`](super::ProfileDraft) for how one is built from
/// raw input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub age: u32,
    pub country: String,
    pub job: String,
    pub monthly_salary: f64,
    pub hours_per_day: f64,
    pub days_per_week: f64,
}

/// A profile as stored by the remote backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProfile {
    /// Backend-assigned row id, if the backend exposes one.
    pub id: Option<String>,
    /// The opaque identity the row is keyed by.
    pub user_id: String,
    pub profile: UserProfile,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Raw wizard input.
///
/// `None` means the field was never set. This is distinct from a value that
/// was set and then erased, which is stored as an empty string and treated
/// as blank by [`ProfileDraft::is_blank`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDraft {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<String>,
    pub country: Option<String>,
    pub job: Option<String>,
    pub monthly_salary: Option<String>,
    pub hours_per_day: Option<String>,
    pub days_per_week: Option<String>,
}

impl ProfileDraft {
    /// Creates an empty draft with the country preset.
    pub fn new() -> Self {
        Self {
            country: Some(DEFAULT_COUNTRY.to_string()),
            ..Self::default()
        }
    }

    /// Pre-fills a draft from an existing profile (used when editing).
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            name: Some(profile.name.clone()),
            email: Some(profile.email.clone()),
            age: Some(profile.age.to_string()),
            country: Some(profile.country.clone()),
            job: Some(profile.job.clone()),
            monthly_salary: Some(format_number(profile.monthly_salary)),
            hours_per_day: Some(format_number(profile.hours_per_day)),
            days_per_week: Some(format_number(profile.days_per_week)),
        }
    }

    /// Returns the raw value of a field.
    pub fn get(&self, field: ProfileField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Sets the raw value of a field.
    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// Sets a numeric field the way a user would have typed it.
    pub fn set_number(&mut self, field: ProfileField, value: f64) {
        self.set(field, format_number(value));
    }

    /// Resets a field to unset.
    pub fn unset(&mut self, field: ProfileField) {
        *self.slot_mut(field) = None;
    }

    /// True when the field is unset or contains only whitespace.
    pub fn is_blank(&self, field: ProfileField) -> bool {
        self.get(field).is_none_or(|v| v.trim().is_empty())
    }

    /// Fields that are unset or blank, in declaration order.
    pub fn missing_fields(&self) -> Vec<ProfileField> {
        ProfileField::iter().filter(|f| self.is_blank(*f)).collect()
    }

    /// True when every field holds a non-blank value.
    pub fn is_filled(&self) -> bool {
        self.missing_fields().is_empty()
    }

    fn slot(&self, field: ProfileField) -> &Option<String> {
        match field {
            ProfileField::Name => &self.name,
            ProfileField::Email => &self.email,
            ProfileField::Age => &self.age,
            ProfileField::Country => &self.country,
            ProfileField::Job => &self.job,
            ProfileField::MonthlySalary => &self.monthly_salary,
            ProfileField::HoursPerDay => &self.hours_per_day,
            ProfileField::DaysPerWeek => &self.days_per_week,
        }
    }

    fn slot_mut(&mut self, field: ProfileField) -> &mut Option<String> {
        match field {
            ProfileField::Name => &mut self.name,
            ProfileField::Email => &mut self.email,
            ProfileField::Age => &mut self.age,
            ProfileField::Country => &mut self.country,
            ProfileField::Job => &mut self.job,
            ProfileField::MonthlySalary => &mut self.monthly_salary,
            ProfileField::HoursPerDay => &mut self.hours_per_day,
            ProfileField::DaysPerWeek => &mut self.days_per_week,
        }
    }
}

/// Renders a number the way a user would type it: no trailing `.0`.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> UserProfile {
        UserProfile {
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            age: 30,
            country: DEFAULT_COUNTRY.to_string(),
            job: "Diseñador Gráfico".to_string(),
            monthly_salary: 20000.0,
            hours_per_day: 7.5,
            days_per_week: 5.0,
        }
    }

    #[test]
    fn test_new_draft_presets_country_only() {
        let draft = ProfileDraft::new();
        assert_eq!(draft.get(ProfileField::Country), Some(DEFAULT_COUNTRY));
        assert_eq!(draft.missing_fields().len(), 7);
        assert!(!draft.missing_fields().contains(&ProfileField::Country));
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let mut draft = ProfileDraft::new();
        draft.set(ProfileField::Name, "   ");
        assert!(draft.is_blank(ProfileField::Name));
        draft.unset(ProfileField::Name);
        assert_eq!(draft.get(ProfileField::Name), None);
    }

    #[test]
    fn test_from_profile_fills_every_field() {
        let draft = ProfileDraft::from_profile(&sample_profile());
        assert!(draft.is_filled());
        assert_eq!(draft.get(ProfileField::MonthlySalary), Some("20000"));
        assert_eq!(draft.get(ProfileField::HoursPerDay), Some("7.5"));
        assert_eq!(draft.get(ProfileField::Age), Some("30"));
    }

    #[test]
    fn test_field_display_uses_form_keys() {
        assert_eq!(ProfileField::MonthlySalary.to_string(), "monthlySalary");
        assert_eq!(ProfileField::DaysPerWeek.to_string(), "daysPerWeek");
        assert!(ProfileField::Age.is_numeric());
        assert!(!ProfileField::Job.is_numeric());
    }

    #[test]
    fn test_profile_serializes_camel_case() {
        let json = serde_json::to_value(sample_profile()).unwrap();
        assert_eq!(json["monthlySalary"], 20000.0);
        assert_eq!(json["hoursPerDay"], 7.5);
    }
}
