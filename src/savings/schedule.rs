//! Savings projection output records

use serde::{Deserialize, Serialize};

/// One month of savings growth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySavingsEntry {
    pub month: u32,
    pub plan_year: u32,
    /// Month within the plan year (1-12)
    pub month_in_plan_year: u32,
    /// End-of-month balance
    pub balance: f64,
    pub interest: f64,
    pub contribution: f64,
    /// Contributions to date, initial deposit included
    pub cumulative_contributions: f64,
    pub cumulative_interest: f64,
    /// Balance in today's money
    pub real_value: f64,
}

/// Complete savings projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsResult {
    pub initial_amount: f64,
    pub final_amount: f64,
    pub total_contributions: f64,
    pub total_interest: f64,
    pub final_real_value: f64,
    pub schedule: Vec<MonthlySavingsEntry>,
}

impl SavingsResult {
    pub fn new(initial_amount: f64) -> Self {
        Self {
            initial_amount,
            final_amount: initial_amount,
            total_contributions: initial_amount,
            total_interest: 0.0,
            final_real_value: initial_amount,
            schedule: Vec::new(),
        }
    }

    pub fn add_entry(&mut self, entry: MonthlySavingsEntry) {
        self.final_amount = entry.balance;
        self.total_contributions = entry.cumulative_contributions;
        self.total_interest = entry.cumulative_interest;
        self.final_real_value = entry.real_value;
        self.schedule.push(entry);
    }

    /// Year-end balances, one per completed plan year
    pub fn yearly_balances(&self) -> Vec<(u32, f64)> {
        self.schedule
            .iter()
            .filter(|e| e.month_in_plan_year == 12)
            .map(|e| (e.plan_year, e.balance))
            .collect()
    }

    pub fn summary(&self) -> SavingsSummary {
        let months = self.schedule.len() as u32;
        SavingsSummary {
            months,
            final_amount: self.final_amount,
            total_contributions: self.total_contributions,
            total_interest: self.total_interest,
            final_real_value: self.final_real_value,
            inflation_loss: self.final_amount - self.final_real_value,
            growth_multiple: if self.total_contributions > 0.0 {
                self.final_amount / self.total_contributions
            } else {
                0.0
            },
        }
    }
}

/// Summary statistics for a savings plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsSummary {
    pub months: u32,
    pub final_amount: f64,
    pub total_contributions: f64,
    pub total_interest: f64,
    pub final_real_value: f64,
    /// Purchasing power lost to inflation by the end of the plan
    pub inflation_loss: f64,
    /// Final amount per unit contributed
    pub growth_multiple: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(month: u32, balance: f64, interest: f64, cumulative_interest: f64) -> MonthlySavingsEntry {
        MonthlySavingsEntry {
            month,
            plan_year: (month - 1) / 12 + 1,
            month_in_plan_year: (month - 1) % 12 + 1,
            balance,
            interest,
            contribution: 100.0,
            cumulative_contributions: 100.0 * month as f64,
            cumulative_interest,
            real_value: balance,
        }
    }

    #[test]
    fn test_totals_follow_last_entry() {
        let mut result = SavingsResult::new(0.0);
        result.add_entry(entry(1, 100.0, 0.0, 0.0));
        result.add_entry(entry(2, 201.0, 1.0, 1.0));

        assert_eq!(result.final_amount, 201.0);
        assert_eq!(result.total_contributions, 200.0);
        assert_eq!(result.total_interest, 1.0);
    }

    #[test]
    fn test_yearly_balances_take_plan_year_ends() {
        let mut result = SavingsResult::new(0.0);
        for month in 1..=30 {
            result.add_entry(entry(month, 100.0 * month as f64, 0.0, 0.0));
        }
        assert_eq!(result.yearly_balances(), vec![(1, 1_200.0), (2, 2_400.0)]);
    }
}
