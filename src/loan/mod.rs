//! Loan amortization and early payoff

mod engine;
mod payoff;
mod schedule;

pub use engine::{amortize, annuity_payment, LoanParameters, BALANCE_EPSILON};
pub use payoff::{
    early_payoff, early_payoff_with, extra_payment_for_target, periods_until, EarlyPayoffInput,
    EarlyPayoffResult, PaymentFrequency,
};
pub use schedule::{AmortizationEntry, LoanResult, LoanSummary};
