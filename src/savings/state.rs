//! Running state of a savings plan during projection

/// State of a savings plan at a point in time
#[derive(Debug, Clone)]
pub struct SavingsState {
    /// Current plan month (1-indexed, 0 before the first month)
    pub month: u32,

    /// Plan year (1-indexed)
    pub plan_year: u32,

    /// Month within the plan year (1-12)
    pub month_in_plan_year: u32,

    /// Balance at the start of the month
    pub bop_balance: f64,

    /// Balance at the end of the month
    pub eop_balance: f64,

    /// Contributions to date, initial deposit included
    pub total_contributions: f64,

    /// Interest credited to date
    pub total_interest: f64,
}

impl SavingsState {
    /// Initialize state from the opening deposit
    pub fn from_initial(initial_amount: f64) -> Self {
        Self {
            month: 0,
            plan_year: 1,
            month_in_plan_year: 0,
            bop_balance: initial_amount,
            eop_balance: initial_amount,
            total_contributions: initial_amount,
            total_interest: 0.0,
        }
    }

    /// Advance to next month; BOP balance comes from prior EOP
    pub fn advance_month(&mut self) {
        self.month += 1;
        self.plan_year = (self.month - 1) / 12 + 1;
        self.month_in_plan_year = (self.month - 1) % 12 + 1;
        self.bop_balance = self.eop_balance;
    }

    /// Credit interest and a contribution for the current month
    pub fn credit(&mut self, interest: f64, contribution: f64) {
        self.eop_balance = self.bop_balance + interest + contribution;
        self.total_interest += interest;
        self.total_contributions += contribution;
    }

    /// Balance deflated to today's money at `monthly_inflation`
    pub fn real_value(&self, monthly_inflation: f64) -> f64 {
        if monthly_inflation == 0.0 {
            return self.eop_balance;
        }
        self.eop_balance / (1.0 + monthly_inflation).powf(self.month as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing() {
        let mut state = SavingsState::from_initial(100.0);
        for _ in 0..13 {
            state.advance_month();
        }
        assert_eq!(state.month, 13);
        assert_eq!(state.plan_year, 2);
        assert_eq!(state.month_in_plan_year, 1);
    }

    #[test]
    fn test_credit_rolls_forward() {
        let mut state = SavingsState::from_initial(1000.0);
        state.advance_month();
        state.credit(5.0, 100.0);
        assert_eq!(state.eop_balance, 1105.0);
        assert_eq!(state.total_contributions, 1100.0);

        state.advance_month();
        assert_eq!(state.bop_balance, 1105.0);
    }

    #[test]
    fn test_real_value() {
        let mut state = SavingsState::from_initial(1000.0);
        state.advance_month();
        state.credit(0.0, 0.0);
        assert_eq!(state.real_value(0.0), 1000.0);
        assert!((state.real_value(0.01) - 1000.0 / 1.01).abs() < 1e-9);
    }
}
