//! Spanish, es-MX flavoured rendering of durations, money and dates.

use std::fmt;

use chrono::{DateTime, Datelike, TimeZone};
use serde::{Deserialize, Serialize};

use super::calculator::WORKDAY_HOURS;
use crate::error::CalculationError;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// A finite, non-negative number of work hours.
///
/// Displays as the long Spanish duration used on the calculator screen.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct WorkDuration(f64);

impl WorkDuration {
    pub const ZERO: WorkDuration = WorkDuration(0.0);

    pub fn new(hours: f64) -> Result<Self, CalculationError> {
        if !hours.is_finite() {
            return Err(CalculationError::NonFiniteHours);
        }
        if hours < 0.0 {
            return Err(CalculationError::NegativeHours(hours));
        }
        Ok(Self(hours))
    }

    pub fn hours(&self) -> f64 {
        self.0
    }

    /// Short form for history rows.
    pub fn compact(&self) -> String {
        let hours = self.0;
        if hours < 1.0 {
            return format!("{} min", (hours * 60.0).round());
        }
        if hours < WORKDAY_HOURS {
            return format!("{}h", fixed1(hours));
        }
        let (days, remainder) = split_days(hours);
        if days == 1 && remainder == 0.0 {
            return "1 día".to_string();
        }
        if remainder == 0.0 {
            return format!("{}d", days);
        }
        format!("{}d {}h", days, fixed1(remainder))
    }
}

impl TryFrom<f64> for WorkDuration {
    type Error = CalculationError;

    fn try_from(hours: f64) -> Result<Self, Self::Error> {
        Self::new(hours)
    }
}

impl From<WorkDuration> for f64 {
    fn from(duration: WorkDuration) -> Self {
        duration.0
    }
}

impl fmt::Display for WorkDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0;
        if hours == 0.0 {
            return f.write_str("0 horas");
        }
        if hours < 1.0 {
            return write!(f, "{} minutos", (hours * 60.0).round());
        }
        if hours < WORKDAY_HOURS {
            return write!(f, "{} horas", fixed1(hours));
        }

        let (days, remainder) = split_days(hours);
        if days == 1 && remainder == 0.0 {
            return f.write_str("1 día");
        }
        if remainder == 0.0 {
            return write!(f, "{} días", days);
        }
        let suffix = if days > 1 { "s" } else { "" };
        write!(f, "{} día{} y {} horas", days, suffix, fixed1(remainder))
    }
}

fn split_days(hours: f64) -> (u64, f64) {
    ((hours / WORKDAY_HOURS).floor() as u64, hours % WORKDAY_HOURS)
}

fn fixed1(value: f64) -> String {
    format!("{:.1}", value)
}

/// Long Spanish duration, e.g. `"1 día y 1.5 horas"`.
pub fn format_duration(hours: f64) -> Result<String, CalculationError> {
    Ok(WorkDuration::new(hours)?.to_string())
}

/// Compact duration for lists, e.g. `"1d 1.5h"`.
pub fn format_duration_compact(hours: f64) -> Result<String, CalculationError> {
    Ok(WorkDuration::new(hours)?.compact())
}

/// One-sentence summary of how much work a purchase takes.
pub fn work_insight(hours: f64) -> String {
    if hours < 1.0 {
        "Este gasto representa menos de 1 hora de tu trabajo.".to_string()
    } else if hours < WORKDAY_HOURS {
        "Trabajarías menos de un día completo para esto.".to_string()
    } else {
        format!(
            "Necesitarías {} días completos de trabajo.",
            (hours / WORKDAY_HOURS).ceil()
        )
    }
}

/// Caption under the progress bar.
pub fn progress_label(progress: f64) -> &'static str {
    if progress > 100.0 {
        "Más de 1 semana de trabajo"
    } else if progress > 50.0 {
        "Más de medio día laboral"
    } else if progress > 12.5 {
        "Algunas horas de trabajo"
    } else {
        "Menos de 1 hora de trabajo"
    }
}

/// Groups thousands with commas and keeps up to two decimals.
///
/// `15000.0` renders as `"$15,000 MXN"`, `1234.5` as `"$1,234.5 MXN"`.
/// The sign goes in front of the currency symbol: `"-$2,500 MXN"`.
pub fn format_mxn(amount: f64) -> String {
    pesos(amount, 2, true)
}

/// Hourly wage with exactly two decimals, e.g. `"$125.00 MXN"`.
pub fn format_hourly_wage(wage: f64) -> String {
    pesos(wage, 2, false)
}

fn pesos(amount: f64, decimals: usize, trim_zeros: bool) -> String {
    let (negative, digits) = group_thousands(amount, decimals, trim_zeros);
    let sign = if negative { "-" } else { "" };
    format!("{}${} MXN", sign, digits)
}

/// One decimal followed by `%`.
pub fn format_percentage(value: f64) -> String {
    format!("{}%", fixed1(value))
}

/// Unsigned grouped digits, plus whether the rounded value is negative.
fn group_thousands(amount: f64, decimals: usize, trim_zeros: bool) -> (bool, String) {
    let rendered = format!("{:.*}", decimals, amount.abs());
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let frac = if trim_zeros {
        frac_part.trim_end_matches('0')
    } else {
        frac_part
    };

    let negative = amount < 0.0 && rendered.chars().any(|c| c != '0' && c != '.');

    if frac.is_empty() {
        (negative, grouped)
    } else {
        (negative, format!("{}.{}", grouped, frac))
    }
}

/// `"5 ene 2025"` in the timezone of `timestamp`.
pub fn format_short_date<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String {
    let month = MONTH_ABBREVIATIONS[timestamp.month0() as usize];
    format!("{} {} {}", timestamp.day(), month, timestamp.year())
}
