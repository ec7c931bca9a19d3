//! Fixed-payment amortization engine

use serde::{Deserialize, Serialize};

use super::schedule::{AmortizationEntry, LoanResult};
use crate::error::{ensure_non_negative, ensure_positive, EngineError, Result};

/// Balances below this are treated as fully repaid
pub const BALANCE_EPSILON: f64 = 1e-6;

/// A loan to amortize
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    pub principal: f64,

    /// Nominal annual rate as a decimal (0.035 = 3.5%)
    pub annual_rate: f64,

    pub term_months: u32,

    #[serde(default)]
    pub extra_monthly_payment: f64,
}

impl LoanParameters {
    pub fn new(principal: f64, annual_rate: f64, term_months: u32) -> Self {
        Self {
            principal,
            annual_rate,
            term_months,
            extra_monthly_payment: 0.0,
        }
    }

    pub fn with_extra_payment(mut self, extra: f64) -> Self {
        self.extra_monthly_payment = extra;
        self
    }

    /// Monthly rate from the nominal annual rate
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 12.0
    }

    pub fn amortize(&self) -> Result<LoanResult> {
        amortize(
            self.principal,
            self.monthly_rate(),
            self.term_months,
            self.extra_monthly_payment,
        )
    }
}

/// Level payment that repays `principal` over `periods` at `rate` per period
///
/// Uses the annuity factor `r / (1 - (1+r)^-n)`, which stays finite when
/// `(1+r)^n` would overflow; a zero rate falls back to straight-line repayment.
pub fn annuity_payment(principal: f64, rate: f64, periods: u32) -> f64 {
    if periods == 0 {
        return principal;
    }
    if rate == 0.0 {
        return principal / periods as f64;
    }
    principal * rate / (1.0 - (1.0 + rate).powf(-(periods as f64)))
}

pub(crate) fn validate_loan(principal: f64, monthly_rate: f64, total_periods: u32) -> Result<()> {
    ensure_positive("principal", principal)?;
    ensure_non_negative("monthly_rate", monthly_rate)?;
    if total_periods == 0 {
        return Err(EngineError::invalid("total_periods", "must be > 0"));
    }
    Ok(())
}

/// Amortize a loan with a constant extra principal payment each period
pub fn amortize(
    principal: f64,
    monthly_rate: f64,
    total_periods: u32,
    extra_per_period: f64,
) -> Result<LoanResult> {
    validate_loan(principal, monthly_rate, total_periods)?;
    ensure_non_negative("extra_per_period", extra_per_period)?;

    let payment = annuity_payment(principal, monthly_rate, total_periods);
    let result = run_schedule(principal, principal, payment, monthly_rate, total_periods, |_| {
        extra_per_period
    });

    log::debug!(
        "amortized {:.2} over {} periods at {:.6}: payment {:.2}, interest {:.2}, closed in {}",
        principal,
        total_periods,
        monthly_rate,
        payment,
        result.total_interest,
        result.payoff_month(),
    );

    Ok(result)
}

/// Roll a balance forward period by period until it is repaid or the term ends
///
/// `principal` is the amount the result reports; `opening_balance` may be lower
/// when part of it was repaid up front.
pub(crate) fn run_schedule<F>(
    principal: f64,
    opening_balance: f64,
    payment: f64,
    monthly_rate: f64,
    total_periods: u32,
    extra_for: F,
) -> LoanResult
where
    F: Fn(u32) -> f64,
{
    let mut result = LoanResult::new(principal, payment);
    let mut balance = opening_balance;
    let mut cumulative_interest = 0.0;
    let mut cumulative_principal = 0.0;

    for period in 1..=total_periods {
        let interest = balance * monthly_rate;
        let extra = extra_for(period);

        let mut principal_paid = (payment + extra - interest).max(0.0).min(balance);
        // Last period absorbs float residue so the schedule closes at exactly zero
        if period == total_periods || balance - principal_paid < BALANCE_EPSILON {
            principal_paid = balance;
        }
        balance -= principal_paid;

        cumulative_interest += interest;
        cumulative_principal += principal_paid;

        let mut entry = AmortizationEntry::new(period);
        entry.payment = principal_paid + interest;
        entry.principal_portion = principal_paid;
        entry.interest_portion = interest;
        entry.extra_payment = extra;
        entry.remaining_balance = balance;
        entry.cumulative_interest = cumulative_interest;
        entry.cumulative_principal = cumulative_principal;
        result.add_entry(entry);

        if balance <= BALANCE_EPSILON {
            break;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_annuity_payment_mortgage() {
        // 240k over 25 years at 3.5%
        let payment = annuity_payment(240_000.0, 0.035 / 12.0, 300);
        assert_relative_eq!(payment, 1201.4966, epsilon = 1e-3);
    }

    #[test]
    fn test_zero_rate_is_linear() {
        let result = amortize(240_000.0, 0.0, 300, 0.0).unwrap();
        assert_eq!(result.base_payment, 800.0);
        assert_eq!(result.total_interest, 0.0);
        assert_eq!(result.schedule.len(), 300);
        assert!(result.schedule.iter().all(|e| e.principal_portion == 800.0));
        assert_relative_eq!(result.total_paid, 240_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_schedule_closes() {
        let result = amortize(240_000.0, 0.035 / 12.0, 300, 0.0).unwrap();
        let last = result.schedule.last().unwrap();

        assert_eq!(result.schedule.len(), 300);
        assert_eq!(last.remaining_balance, 0.0);
        assert_relative_eq!(last.cumulative_principal, 240_000.0, epsilon = 1e-6);
        assert_relative_eq!(result.total_interest, 120_448.97, epsilon = 0.01);
        assert_relative_eq!(result.total_paid - 240_000.0, result.total_interest, epsilon = 1e-6);
    }

    #[test]
    fn test_first_period_split() {
        let result = amortize(100_000.0, 0.06 / 12.0, 360, 0.0).unwrap();
        let first = &result.schedule[0];
        assert_relative_eq!(first.interest_portion, 500.0, epsilon = 1e-9);
        assert_relative_eq!(first.principal_portion, result.base_payment - 500.0, epsilon = 1e-9);
        assert_relative_eq!(first.remaining_balance, 100_000.0 - first.principal_portion, epsilon = 1e-9);
    }

    #[test]
    fn test_extra_payment_terminates_early() {
        let base = amortize(240_000.0, 0.035 / 12.0, 300, 0.0).unwrap();
        let fast = amortize(240_000.0, 0.035 / 12.0, 300, 100.0).unwrap();

        assert_eq!(fast.payoff_month(), 266);
        assert!(fast.total_interest < base.total_interest);
        assert_eq!(fast.final_balance(), 0.0);
        // Last period only pays what is left
        let last = fast.schedule.last().unwrap();
        assert!(last.payment < fast.base_payment + 100.0);
    }

    #[test]
    fn test_extra_larger_than_balance() {
        let result = amortize(1_000.0, 0.01, 12, 5_000.0).unwrap();
        assert_eq!(result.schedule.len(), 1);
        assert_eq!(result.schedule[0].principal_portion, 1_000.0);
        assert_eq!(result.final_balance(), 0.0);
    }

    #[test]
    fn test_long_high_rate_payment_stays_finite() {
        // (1 + r)^n overflows f64 here
        let result = amortize(1_000.0, 0.5, 2_000, 0.0).unwrap();
        assert!(result.base_payment.is_finite());
        assert_relative_eq!(result.base_payment, 500.0, epsilon = 1e-9);
        assert_relative_eq!(result.schedule[0].interest_portion, 500.0, epsilon = 1e-9);
        assert_eq!(result.final_balance(), 0.0);
    }

    #[test]
    fn test_tiny_principal_still_gets_one_period() {
        let result = amortize(5e-7, 0.01, 12, 0.0).unwrap();
        assert_eq!(result.schedule.len(), 1);
        assert_eq!(result.final_balance(), 0.0);
        assert_eq!(result.schedule[0].cumulative_principal, 5e-7);
        assert!(result.total_paid > 0.0);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            amortize(0.0, 0.01, 12, 0.0),
            Err(EngineError::InvalidParameters { .. })
        ));
        assert!(amortize(-5.0, 0.01, 12, 0.0).is_err());
        assert!(amortize(1000.0, -0.01, 12, 0.0).is_err());
        assert!(amortize(1000.0, 0.01, 0, 0.0).is_err());
        assert!(amortize(1000.0, 0.01, 12, -1.0).is_err());
        assert!(amortize(1000.0, f64::NAN, 12, 0.0).is_err());
    }

    #[test]
    fn test_parameters_use_monthly_rate() {
        let params = LoanParameters::new(240_000.0, 0.035, 300).with_extra_payment(100.0);
        assert_relative_eq!(params.monthly_rate(), 0.035 / 12.0);
        let result = params.amortize().unwrap();
        assert_eq!(result.payoff_month(), 266);
    }
}
