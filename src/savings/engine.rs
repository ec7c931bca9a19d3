//! Compound growth engine for monthly savings plans

use serde::{Deserialize, Serialize};

use super::contribution::ContributionPattern;
use super::schedule::{MonthlySavingsEntry, SavingsResult};
use super::state::SavingsState;
use crate::error::{ensure_non_negative, EngineError, Result};

/// A savings plan to project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsParameters {
    pub initial_amount: f64,
    pub pattern: ContributionPattern,
    /// Nominal annual return as a decimal, compounded monthly
    pub annual_rate: f64,
    pub years: u32,
    #[serde(default)]
    pub inflation_rate: f64,
}

impl SavingsParameters {
    pub fn new(initial_amount: f64, pattern: ContributionPattern, annual_rate: f64, years: u32) -> Self {
        Self {
            initial_amount,
            pattern,
            annual_rate,
            years,
            inflation_rate: 0.0,
        }
    }

    pub fn with_inflation(mut self, inflation_rate: f64) -> Self {
        self.inflation_rate = inflation_rate;
        self
    }

    /// Same plan at a different return
    pub fn with_rate(&self, annual_rate: f64) -> Self {
        Self {
            annual_rate,
            ..self.clone()
        }
    }

    pub fn grow(&self) -> Result<SavingsResult> {
        grow(
            self.initial_amount,
            &self.pattern,
            self.annual_rate,
            self.years,
            self.inflation_rate,
        )
    }
}

/// Project a savings plan month by month
///
/// Interest accrues on the opening balance, then the month's contribution is
/// added: `balance_t = balance_{t-1} * (1 + r/12) + contribution_t`.
pub fn grow(
    initial: f64,
    pattern: &ContributionPattern,
    annual_rate: f64,
    years: u32,
    inflation_rate: f64,
) -> Result<SavingsResult> {
    ensure_non_negative("initial_amount", initial)?;
    ensure_non_negative("annual_rate", annual_rate)?;
    ensure_non_negative("inflation_rate", inflation_rate)?;
    if years == 0 {
        return Err(EngineError::invalid("years", "must be > 0"));
    }
    pattern.validate()?;

    let monthly_rate = annual_rate / 12.0;
    let monthly_inflation = inflation_rate / 12.0;
    let total_months = years * 12;

    let mut result = SavingsResult::new(initial);
    let mut state = SavingsState::from_initial(initial);

    for _ in 0..total_months {
        state.advance_month();

        let interest = if monthly_rate == 0.0 {
            0.0
        } else {
            state.bop_balance * monthly_rate
        };
        let contribution = pattern.contribution_for_month(state.month);
        state.credit(interest, contribution);

        result.add_entry(MonthlySavingsEntry {
            month: state.month,
            plan_year: state.plan_year,
            month_in_plan_year: state.month_in_plan_year,
            balance: state.eop_balance,
            interest,
            contribution,
            cumulative_contributions: state.total_contributions,
            cumulative_interest: state.total_interest,
            real_value: state.real_value(monthly_inflation),
        });
    }

    log::debug!(
        "grew {:.2} over {} years at {:.4}: final {:.2}, contributions {:.2}, real {:.2}",
        initial,
        years,
        annual_rate,
        result.final_amount,
        result.total_contributions,
        result.final_real_value,
    );

    Ok(result)
}

/// Fixed monthly contribution needed to reach `target` after `years`
///
/// Returns 0 when the initial deposit alone gets there.
pub fn required_monthly_contribution(target: f64, initial: f64, annual_rate: f64, years: u32) -> Result<f64> {
    ensure_non_negative("target", target)?;
    ensure_non_negative("initial_amount", initial)?;
    ensure_non_negative("annual_rate", annual_rate)?;
    if years == 0 {
        return Err(EngineError::invalid("years", "must be > 0"));
    }

    let months = (years * 12) as f64;
    let r = annual_rate / 12.0;

    let contribution = if r == 0.0 {
        (target - initial) / months
    } else {
        let growth = (1.0 + r).powf(months);
        (target - initial * growth) * r / (growth - 1.0)
    };

    Ok(contribution.max(0.0))
}
