//! Monthly contribution patterns

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, EngineError, Result};

/// How the monthly contribution evolves over the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContributionPattern {
    /// Same amount every month
    Fixed { amount: f64 },

    /// Grows by `annual_rate` at the start of each plan year
    Increasing { base: f64, annual_rate: f64 },

    /// Shrinks by `annual_rate` at the start of each plan year, never below zero
    Decreasing { base: f64, annual_rate: f64 },

    /// Cycles through `amounts`, one per month
    Irregular { amounts: Vec<f64> },
}

impl ContributionPattern {
    pub fn fixed(amount: f64) -> Self {
        ContributionPattern::Fixed { amount }
    }

    /// Check amounts and rates before a run
    pub fn validate(&self) -> Result<()> {
        match self {
            ContributionPattern::Fixed { amount } => ensure_non_negative("contribution.amount", *amount),
            ContributionPattern::Increasing { base, annual_rate }
            | ContributionPattern::Decreasing { base, annual_rate } => {
                ensure_non_negative("contribution.base", *base)?;
                ensure_non_negative("contribution.annual_rate", *annual_rate)
            }
            ContributionPattern::Irregular { amounts } => {
                if amounts.is_empty() {
                    return Err(EngineError::invalid(
                        "contribution.amounts",
                        "irregular pattern needs at least one amount",
                    ));
                }
                amounts
                    .iter()
                    .try_for_each(|a| ensure_non_negative("contribution.amounts", *a))
            }
        }
    }

    /// Contribution paid in `month` (1-indexed)
    pub fn contribution_for_month(&self, month: u32) -> f64 {
        let elapsed_years = (month.saturating_sub(1) / 12) as i32;
        match self {
            ContributionPattern::Fixed { amount } => *amount,
            ContributionPattern::Increasing { base, annual_rate } => {
                base * (1.0 + annual_rate).powi(elapsed_years)
            }
            ContributionPattern::Decreasing { base, annual_rate } => {
                base * (1.0 - annual_rate).max(0.0).powi(elapsed_years)
            }
            ContributionPattern::Irregular { amounts } => {
                if amounts.is_empty() {
                    return 0.0;
                }
                let idx = month.saturating_sub(1) as usize % amounts.len();
                amounts[idx]
            }
        }
    }

    /// Representative level amount: the first-year amount, or the mean of an irregular cycle
    pub fn base_amount(&self) -> f64 {
        match self {
            ContributionPattern::Fixed { amount } => *amount,
            ContributionPattern::Increasing { base, .. } | ContributionPattern::Decreasing { base, .. } => *base,
            ContributionPattern::Irregular { amounts } => {
                if amounts.is_empty() {
                    0.0
                } else {
                    amounts.iter().sum::<f64>() / amounts.len() as f64
                }
            }
        }
    }
}

impl Default for ContributionPattern {
    fn default() -> Self {
        ContributionPattern::fixed(0.0)
    }
}
