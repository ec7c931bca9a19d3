//! Early payoff analysis: recurring extra payments, one-off lump sums and target dates

use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::engine::{amortize, annuity_payment, run_schedule, validate_loan};
use super::schedule::LoanResult;
use crate::error::{ensure_non_negative, EngineError, Result};

/// How often the recurring extra payment is made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFrequency {
    #[default]
    Monthly,
    Quarterly,
    Annually,
}

impl PaymentFrequency {
    /// Number of periods between two extra payments
    pub fn step(self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 1,
            PaymentFrequency::Quarterly => 3,
            PaymentFrequency::Annually => 12,
        }
    }

    /// Whether the extra payment falls on this (1-indexed) period
    pub fn applies_to(self, period: u32) -> bool {
        period % self.step() == 0
    }
}

impl FromStr for PaymentFrequency {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "monthly" | "m" => Ok(PaymentFrequency::Monthly),
            "quarterly" | "q" => Ok(PaymentFrequency::Quarterly),
            "annually" | "yearly" | "a" | "y" => Ok(PaymentFrequency::Annually),
            _ => Err(EngineError::invalid("frequency", format!("unknown payment frequency `{}`", s))),
        }
    }
}

/// Acceleration requested on top of the contractual payment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EarlyPayoffInput {
    #[serde(default)]
    pub extra_monthly: f64,
    #[serde(default)]
    pub lump_sum: f64,
    #[serde(default)]
    pub frequency: PaymentFrequency,
}

/// Savings from paying a loan off early
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarlyPayoffResult {
    pub months_saved: u32,
    pub interest_saved: f64,
    pub new_total_interest: f64,
    pub original_total_interest: f64,

    /// Period of the final payment under the accelerated plan (1-indexed)
    pub payoff_month_index: u32,

    pub lump_sum: f64,

    /// The accelerated schedule itself
    pub schedule: LoanResult,
}

impl EarlyPayoffResult {
    /// Everything paid under the accelerated plan, lump sum included
    pub fn total_paid(&self) -> f64 {
        self.schedule.total_paid + self.lump_sum
    }
}

/// Compare the contractual schedule against an accelerated one
///
/// The lump sum reduces the balance before the first period's interest accrues;
/// the contractual payment stays the one computed on the full principal.
pub fn early_payoff(
    principal: f64,
    monthly_rate: f64,
    total_periods: u32,
    extra_monthly: f64,
    lump_sum: f64,
    frequency: PaymentFrequency,
) -> Result<EarlyPayoffResult> {
    validate_loan(principal, monthly_rate, total_periods)?;
    ensure_non_negative("extra_monthly", extra_monthly)?;
    ensure_non_negative("lump_sum", lump_sum)?;
    if lump_sum >= principal {
        return Err(EngineError::invalid(
            "lump_sum",
            format!("{:.2} repays the whole principal of {:.2}", lump_sum, principal),
        ));
    }

    let original = amortize(principal, monthly_rate, total_periods, 0.0)?;

    let accelerated = run_schedule(
        principal,
        principal - lump_sum,
        original.base_payment,
        monthly_rate,
        total_periods,
        |period| {
            if frequency.applies_to(period) {
                extra_monthly
            } else {
                0.0
            }
        },
    );

    let elapsed = accelerated.payoff_month();
    let result = EarlyPayoffResult {
        months_saved: total_periods.saturating_sub(elapsed),
        interest_saved: original.total_interest - accelerated.total_interest,
        new_total_interest: accelerated.total_interest,
        original_total_interest: original.total_interest,
        payoff_month_index: elapsed,
        lump_sum,
        schedule: accelerated,
    };

    log::debug!(
        "early payoff: {} months and {:.2} interest saved (extra {:.2} {:?}, lump {:.2})",
        result.months_saved,
        result.interest_saved,
        extra_monthly,
        frequency,
        lump_sum,
    );

    Ok(result)
}

/// Run [`early_payoff`] from an [`EarlyPayoffInput`]
pub fn early_payoff_with(
    principal: f64,
    monthly_rate: f64,
    total_periods: u32,
    input: &EarlyPayoffInput,
) -> Result<EarlyPayoffResult> {
    early_payoff(
        principal,
        monthly_rate,
        total_periods,
        input.extra_monthly,
        input.lump_sum,
        input.frequency,
    )
}

/// Extra monthly payment that closes the loan within `target_periods`
pub fn extra_payment_for_target(
    principal: f64,
    monthly_rate: f64,
    total_periods: u32,
    target_periods: u32,
) -> Result<f64> {
    validate_loan(principal, monthly_rate, total_periods)?;
    if target_periods == 0 || target_periods > total_periods {
        return Err(EngineError::invalid(
            "target_periods",
            format!("must be within 1..={}, got {}", total_periods, target_periods),
        ));
    }

    let base = annuity_payment(principal, monthly_rate, total_periods);
    let accelerated = annuity_payment(principal, monthly_rate, target_periods);
    Ok(accelerated - base)
}

/// Number of monthly payments from `first_payment` through `target` inclusive
pub fn periods_until(first_payment: NaiveDate, target: NaiveDate) -> Result<u32> {
    let months = (target.year() - first_payment.year()) * 12 + target.month() as i32
        - first_payment.month() as i32
        + 1;
    if months <= 0 {
        return Err(EngineError::invalid(
            "target",
            format!("{} is before the first payment on {}", target, first_payment),
        ));
    }
    Ok(months as u32)
}
