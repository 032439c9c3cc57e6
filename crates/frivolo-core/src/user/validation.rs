//! Field validation for profile input.
//!
//! Validation runs before any remote call. A draft only becomes a
//! [`UserProfile`] once every field passes.

use once_cell::sync::Lazy;
use regex::Regex;

use super::model::{ProfileDraft, ProfileField, UserProfile};
use crate::error::ValidationError;

/// `local@domain.tld`, no whitespace anywhere.
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

pub const MAX_HOURS_PER_DAY: f64 = 24.0;
pub const MAX_DAYS_PER_WEEK: f64 = 7.0;

/// Returns true when `email` matches the accepted pattern.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

/// Validates one raw field value.
pub fn validate_field(field: ProfileField, raw: Option<&str>) -> Result<(), ValidationError> {
    let value = match raw.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => return Err(ValidationError::required(field)),
    };

    match field {
        ProfileField::Name | ProfileField::Country | ProfileField::Job => Ok(()),
        ProfileField::Email => {
            if is_valid_email(value) {
                Ok(())
            } else {
                Err(ValidationError::new(field, "must look like name@domain.tld"))
            }
        }
        ProfileField::Age => parse_age(value).map(|_| ()),
        ProfileField::MonthlySalary => parse_positive(field, value, None).map(|_| ()),
        ProfileField::HoursPerDay => {
            parse_positive(field, value, Some(MAX_HOURS_PER_DAY)).map(|_| ())
        }
        ProfileField::DaysPerWeek => {
            parse_positive(field, value, Some(MAX_DAYS_PER_WEEK)).map(|_| ())
        }
    }
}

fn parse_age(value: &str) -> Result<u32, ValidationError> {
    value
        .parse::<u32>()
        .map_err(|_| ValidationError::new(ProfileField::Age, "must be a whole number, 0 or more"))
}

fn parse_positive(
    field: ProfileField,
    value: &str,
    max: Option<f64>,
) -> Result<f64, ValidationError> {
    let parsed: f64 = value
        .parse()
        .map_err(|_| ValidationError::new(field, "must be a number"))?;

    if !parsed.is_finite() || parsed <= 0.0 {
        return Err(ValidationError::new(field, "must be greater than 0"));
    }
    if let Some(max) = max
        && parsed > max
    {
        return Err(ValidationError::new(field, format!("must be at most {}", max)));
    }
    Ok(parsed)
}

fn required<'a>(draft: &'a ProfileDraft, field: ProfileField) -> Result<&'a str, ValidationError> {
    validate_field(field, draft.get(field))?;
    // validate_field guarantees presence
    Ok(draft.get(field).map(str::trim).unwrap_or_default())
}

impl ProfileDraft {
    /// Validates the given subset of fields (one wizard step).
    pub fn validate_fields(&self, fields: &[ProfileField]) -> Result<(), ValidationError> {
        for field in fields {
            validate_field(*field, self.get(*field))?;
        }
        Ok(())
    }

    /// Validates every field and converts the draft into a typed profile.
    pub fn complete(&self) -> Result<UserProfile, ValidationError> {
        let name = required(self, ProfileField::Name)?.to_string();
        let email = required(self, ProfileField::Email)?.to_string();
        let age = parse_age(required(self, ProfileField::Age)?)?;
        let country = required(self, ProfileField::Country)?.to_string();
        let job = required(self, ProfileField::Job)?.to_string();
        let monthly_salary = parse_positive(
            ProfileField::MonthlySalary,
            required(self, ProfileField::MonthlySalary)?,
            None,
        )?;
        let hours_per_day = parse_positive(
            ProfileField::HoursPerDay,
            required(self, ProfileField::HoursPerDay)?,
            Some(MAX_HOURS_PER_DAY),
        )?;
        let days_per_week = parse_positive(
            ProfileField::DaysPerWeek,
            required(self, ProfileField::DaysPerWeek)?,
            Some(MAX_DAYS_PER_WEEK),
        )?;

        Ok(UserProfile {
            name,
            email,
            age,
            country,
            job,
            monthly_salary,
            hours_per_day,
            days_per_week,
        })
    }
}
