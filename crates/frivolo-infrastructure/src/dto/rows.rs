//! Rows of the remote `users` and `saved_searches` tables.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use frivolo_core::error::FrivoloError;
use frivolo_core::identity::Identity;
use frivolo_core::search::{NewSearch, SearchRecord};
use frivolo_core::user::{ProfileField, StoredProfile, UserProfile};

/// A `users` row as returned by the backend.
///
/// `email` and `job` are nullable columns; rows written before they were
/// added come back with `null`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRow {
    #[serde(default)]
    pub id: Option<Value>,
    pub user_id: String,
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
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Only the key column, for existence checks.
#[derive(Debug, Clone, Deserialize)]
pub struct UserKey {
    pub user_id: String,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Rows missing `email` or `job` fail with an incomplete-profile error
/// listing the absent fields.
impl TryFrom<UserRow> for StoredProfile {
    type Error = FrivoloError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let (email, job) = match (present(row.email), present(row.job)) {
            (Some(email), Some(job)) => (email, job),
            (email, job) => {
                let mut missing = Vec::new();
                if email.is_none() {
                    missing.push(ProfileField::Email);
                }
                if job.is_none() {
                    missing.push(ProfileField::Job);
                }
                return Err(FrivoloError::incomplete_profile(missing));
            }
        };

        Ok(StoredProfile {
            id: row.id.map(id_to_string),
            user_id: row.user_id,
            profile: UserProfile {
                name: row.name,
                email,
                age: row.age,
                country: row.country,
                job,
                monthly_salary: row.monthly_salary,
                hours_per_day: row.hours_per_day,
                days_per_week: row.days_per_week,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Insert/update payload for `users`.
#[derive(Debug, Serialize)]
pub struct UserWrite<'a> {
    pub user_id: &'a str,
    pub name: &'a str,
    pub email: &'a str,
    pub age: u32,
    pub country: &'a str,
    pub job: &'a str,
    pub monthly_salary: f64,
    pub hours_per_day: f64,
    pub days_per_week: f64,
    pub updated_at: DateTime<Utc>,
}

impl<'a> UserWrite<'a> {
    pub fn new(identity: &'a Identity, profile: &'a UserProfile, now: DateTime<Utc>) -> Self {
        Self {
            user_id: identity.as_str(),
            name: &profile.name,
            email: &profile.email,
            age: profile.age,
            country: &profile.country,
            job: &profile.job,
            monthly_salary: profile.monthly_salary,
            hours_per_day: profile.hours_per_day,
            days_per_week: profile.days_per_week,
            updated_at: now,
        }
    }
}

/// Insert payload for `saved_searches`. `id` and `created_at` are filled
/// in by the backend.
#[derive(Debug, Serialize)]
pub struct SearchInsert<'a> {
    pub user_id: &'a str,
    pub product_name: &'a str,
    pub product_cost: f64,
    pub hours_needed: f64,
    pub hourly_wage: f64,
}

impl<'a> SearchInsert<'a> {
    pub fn new(identity: &'a Identity, search: &'a NewSearch) -> Self {
        Self {
            user_id: identity.as_str(),
            product_name: search.product_name(),
            product_cost: search.product_cost(),
            hours_needed: search.hours_needed(),
            hourly_wage: search.hourly_wage(),
        }
    }
}

/// A `saved_searches` row as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRow {
    pub id: Value,
    pub user_id: String,
    pub product_name: String,
    pub product_cost: f64,
    pub hours_needed: f64,
    pub hourly_wage: f64,
    #[serde(deserialize_with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl From<SearchRow> for SearchRecord {
    fn from(row: SearchRow) -> Self {
        SearchRecord {
            id: id_to_string(row.id),
            user_id: row.user_id,
            product_name: row.product_name,
            product_cost: row.product_cost,
            hours_needed: row.hours_needed,
            hourly_wage: row.hourly_wage,
            created_at: row.created_at,
        }
    }
}

/// Primary keys may be UUID strings or bigint numbers depending on the table.
fn id_to_string(id: Value) -> String {
    match id {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Accepts RFC 3339 as well as `timestamp without time zone` (read as UTC).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw))),
    }
}
