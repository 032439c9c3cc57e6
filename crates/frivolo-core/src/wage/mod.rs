//! Wage calculator.
//!
//! Pure functions turning a profile and a product price into an hourly
//! wage, the hours of work the price represents, and the Spanish text the
//! calculator screen shows for them.

mod calculator;
mod format;

pub use calculator::{
    Calculation, REFERENCE_WEEK_HOURS, WEEKS_PER_MONTH, WORKDAY_HOURS, hourly_wage,
    hourly_wage_for_draft, hours_needed, progress_ratio, weekly_percentage,
};
pub use format::{
    WorkDuration, format_duration, format_duration_compact, format_hourly_wage, format_mxn,
    format_percentage, format_short_date, progress_label, work_insight,
};
