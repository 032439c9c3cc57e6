use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CalculationError, FrivoloError, Result};

/// A search as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    /// Backend-assigned identifier.
    pub id: String,
    pub user_id: String,
    pub product_name: String,
    pub product_cost: f64,
    /// Hours of work needed, computed when the search was saved.
    pub hours_needed: f64,
    /// Hourly wage in effect when the search was saved.
    pub hourly_wage: f64,
    pub created_at: DateTime<Utc>,
}

/// A search about to be saved.
///
/// Construction rejects a blank name or a non-positive cost, so the
/// repository can insert whatever it receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSearch {
    product_name: String,
    product_cost: f64,
    hours_needed: f64,
    hourly_wage: f64,
}

impl NewSearch {
    pub fn new(
        product_name: &str,
        product_cost: f64,
        hours_needed: f64,
        hourly_wage: f64,
    ) -> Result<Self> {
        let product_name = product_name.trim();
        if product_name.is_empty() {
            return Err(FrivoloError::invalid_state(
                "a saved search needs a product name",
            ));
        }
        if !product_cost.is_finite() || product_cost <= 0.0 {
            return Err(FrivoloError::invalid_state(format!(
                "product cost must be greater than 0, got {}",
                product_cost
            )));
        }
        if !hours_needed.is_finite() || !hourly_wage.is_finite() {
            return Err(CalculationError::NonFiniteHours.into());
        }

        Ok(Self {
            product_name: product_name.to_string(),
            product_cost,
            hours_needed,
            hourly_wage,
        })
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn product_cost(&self) -> f64 {
        self.product_cost
    }

    pub fn hours_needed(&self) -> f64 {
        self.hours_needed
    }

    pub fn hourly_wage(&self) -> f64 {
        self.hourly_wage
    }
}
