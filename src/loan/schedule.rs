//! Amortization schedule records

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// One period of an amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationEntry {
    /// Period number (1-indexed)
    pub period: u32,

    /// Amount actually paid this period (interest + principal, extra included)
    pub payment: f64,
    pub principal_portion: f64,
    pub interest_portion: f64,

    /// Extra principal scheduled for this period
    pub extra_payment: f64,

    /// Balance after this period's payment
    pub remaining_balance: f64,

    pub cumulative_interest: f64,
    pub cumulative_principal: f64,
}

impl AmortizationEntry {
    pub fn new(period: u32) -> Self {
        Self {
            period,
            payment: 0.0,
            principal_portion: 0.0,
            interest_portion: 0.0,
            extra_payment: 0.0,
            remaining_balance: 0.0,
            cumulative_interest: 0.0,
            cumulative_principal: 0.0,
        }
    }

    /// Total paid to date (principal + interest)
    pub fn cumulative_paid(&self) -> f64 {
        self.cumulative_principal + self.cumulative_interest
    }
}

/// Complete result of an amortization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanResult {
    /// Amount amortized by the schedule
    pub principal: f64,

    /// Contractual payment from the annuity formula (excludes extras)
    pub base_payment: f64,

    pub total_interest: f64,
    pub total_paid: f64,

    /// Periods in order; shorter than the term when extras close the loan early
    pub schedule: Vec<AmortizationEntry>,
}

impl LoanResult {
    pub fn new(principal: f64, base_payment: f64) -> Self {
        Self {
            principal,
            base_payment,
            total_interest: 0.0,
            total_paid: 0.0,
            schedule: Vec::new(),
        }
    }

    /// Append a period and roll the totals forward
    pub fn add_entry(&mut self, entry: AmortizationEntry) {
        self.total_interest = entry.cumulative_interest;
        self.total_paid = entry.cumulative_paid();
        self.schedule.push(entry);
    }

    /// Number of periods until the balance reached zero
    pub fn payoff_month(&self) -> u32 {
        self.schedule.last().map(|e| e.period).unwrap_or(0)
    }

    /// Balance left after the last recorded period
    pub fn final_balance(&self) -> f64 {
        self.schedule
            .last()
            .map(|e| e.remaining_balance)
            .unwrap_or(self.principal)
    }

    /// Calendar date of the last payment, with the first payment due on `first_payment`
    pub fn payoff_date(&self, first_payment: NaiveDate) -> Option<NaiveDate> {
        let last = self.payoff_month().checked_sub(1)?;
        first_payment.checked_add_months(Months::new(last))
    }

    pub fn summary(&self) -> LoanSummary {
        LoanSummary {
            periods: self.schedule.len() as u32,
            base_payment: self.base_payment,
            total_interest: self.total_interest,
            total_paid: self.total_paid,
            interest_to_principal: if self.principal > 0.0 {
                self.total_interest / self.principal
            } else {
                0.0
            },
        }
    }
}

/// Summary statistics for a loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSummary {
    pub periods: u32,
    pub base_payment: f64,
    pub total_interest: f64,
    pub total_paid: f64,
    /// Interest cost per unit of principal borrowed
    pub interest_to_principal: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(period: u32, principal: f64, interest: f64, cum_p: f64, cum_i: f64) -> AmortizationEntry {
        AmortizationEntry {
            period,
            payment: principal + interest,
            principal_portion: principal,
            interest_portion: interest,
            extra_payment: 0.0,
            remaining_balance: 1000.0 - cum_p,
            cumulative_interest: cum_i,
            cumulative_principal: cum_p,
        }
    }

    #[test]
    fn test_totals_follow_last_entry() {
        let mut result = LoanResult::new(1000.0, 510.0);
        result.add_entry(entry(1, 500.0, 10.0, 500.0, 10.0));
        result.add_entry(entry(2, 500.0, 5.0, 1000.0, 15.0));

        assert_eq!(result.payoff_month(), 2);
        assert_eq!(result.total_interest, 15.0);
        assert_eq!(result.total_paid, 1015.0);
        assert_eq!(result.final_balance(), 0.0);
        assert!((result.summary().interest_to_principal - 0.015).abs() < 1e-12);
    }

    #[test]
    fn test_payoff_date() {
        let mut result = LoanResult::new(1000.0, 510.0);
        for p in 1..=14 {
            result.add_entry(entry(p, 0.0, 0.0, 0.0, 0.0));
        }
        let first = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(result.payoff_date(first), NaiveDate::from_ymd_opt(2026, 2, 5));
    }

    #[test]
    fn test_empty_schedule() {
        let result = LoanResult::new(1000.0, 0.0);
        assert_eq!(result.payoff_month(), 0);
        assert_eq!(result.final_balance(), 1000.0);
        assert!(result.payoff_date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()).is_none());
    }
}
