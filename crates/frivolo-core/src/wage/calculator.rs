use serde::{Deserialize, Serialize};

use super::format::{WorkDuration, work_insight};
use crate::error::CalculationError;
use crate::user::{ProfileDraft, ProfileField, UserProfile};

/// A month is approximated as this many working weeks.
pub const WEEKS_PER_MONTH: f64 = 4.0;

/// The progress bar measures against one 40-hour week.
pub const REFERENCE_WEEK_HOURS: f64 = 40.0;

/// Length of a working day when durations are rendered in days.
pub const WORKDAY_HOURS: f64 = 8.0;

const SCHEDULE_FIELDS: [ProfileField; 3] = [
    ProfileField::MonthlySalary,
    ProfileField::HoursPerDay,
    ProfileField::DaysPerWeek,
];

/// `monthly_salary / (days_per_week * 4) / hours_per_day`.
///
/// A zero or negative schedule is refused rather than producing an
/// infinite wage.
pub fn hourly_wage(profile: &UserProfile) -> Result<f64, CalculationError> {
    wage_from_schedule(
        profile.monthly_salary,
        profile.hours_per_day,
        profile.days_per_week,
    )
}

/// Same formula as [`hourly_wage`], read from raw wizard input.
///
/// Blank schedule fields yield [`CalculationError::IncompleteProfile`].
pub fn hourly_wage_for_draft(draft: &ProfileDraft) -> Result<f64, CalculationError> {
    let missing: Vec<ProfileField> = SCHEDULE_FIELDS
        .into_iter()
        .filter(|field| draft.is_blank(*field))
        .collect();
    if !missing.is_empty() {
        return Err(CalculationError::IncompleteProfile { missing });
    }

    let parse = |field: ProfileField| -> Result<f64, CalculationError> {
        let raw = draft.get(field).unwrap_or_default().trim();
        raw.parse::<f64>().map_err(|_| {
            CalculationError::InvalidSchedule(format!("{} is not a number: '{}'", field, raw))
        })
    };

    wage_from_schedule(
        parse(ProfileField::MonthlySalary)?,
        parse(ProfileField::HoursPerDay)?,
        parse(ProfileField::DaysPerWeek)?,
    )
}

fn wage_from_schedule(
    monthly_salary: f64,
    hours_per_day: f64,
    days_per_week: f64,
) -> Result<f64, CalculationError> {
    if !hours_per_day.is_finite() || hours_per_day <= 0.0 {
        return Err(CalculationError::InvalidSchedule(format!(
            "hours per day must be greater than 0, got {}",
            hours_per_day
        )));
    }
    if !days_per_week.is_finite() || days_per_week <= 0.0 {
        return Err(CalculationError::InvalidSchedule(format!(
            "days per week must be greater than 0, got {}",
            days_per_week
        )));
    }
    if !monthly_salary.is_finite() || monthly_salary < 0.0 {
        return Err(CalculationError::InvalidSchedule(format!(
            "monthly salary must be 0 or more, got {}",
            monthly_salary
        )));
    }

    Ok(monthly_salary / (days_per_week * WEEKS_PER_MONTH) / hours_per_day)
}

/// `price / wage`, or `0` when the price is absent or not positive.
pub fn hours_needed(price: f64, wage: f64) -> Result<f64, CalculationError> {
    if !price.is_finite() || price <= 0.0 {
        return Ok(0.0);
    }
    if !wage.is_finite() || wage <= 0.0 {
        return Err(CalculationError::NonPositiveWage(wage));
    }
    Ok(price / wage)
}

/// Share of the user's working week, in percent.
pub fn weekly_percentage(hours: f64, profile: &UserProfile) -> Result<f64, CalculationError> {
    let week = profile.hours_per_day * profile.days_per_week;
    if !week.is_finite() || week <= 0.0 {
        return Err(CalculationError::InvalidSchedule(format!(
            "working week must be longer than 0 hours, got {}",
            week
        )));
    }
    Ok(hours / week * 100.0)
}

/// Share of a 40-hour reference week, clamped to `0..=100`.
pub fn progress_ratio(hours: f64) -> f64 {
    if hours.is_nan() || hours <= 0.0 {
        return 0.0;
    }
    (hours / REFERENCE_WEEK_HOURS).min(1.0) * 100.0
}

/// Everything the calculator screen shows for one price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    pub price: f64,
    pub hourly_wage: f64,
    pub hours_needed: f64,
    pub duration: WorkDuration,
    pub weekly_percentage: f64,
    pub progress: f64,
    /// Present only when the price costs some work.
    pub insight: Option<String>,
}

impl Calculation {
    pub fn compute(profile: &UserProfile, price: f64) -> Result<Self, CalculationError> {
        let wage = hourly_wage(profile)?;
        let hours = hours_needed(price, wage)?;
        let duration = WorkDuration::new(hours)?;

        Ok(Self {
            price,
            hourly_wage: wage,
            hours_needed: hours,
            duration,
            weekly_percentage: weekly_percentage(hours, profile)?,
            progress: progress_ratio(hours),
            insight: (hours > 0.0).then(|| work_insight(hours)),
        })
    }

    /// True when there is something worth saving.
    pub fn is_saveable(&self) -> bool {
        self.hours_needed > 0.0
    }
}
