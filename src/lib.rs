//! Financial projection engine for personal loans, savings and French taxation
//!
//! This library provides:
//! - Loan amortization schedules and early-payoff analysis
//! - Month-by-month savings growth with contribution patterns and inflation
//! - Progressive income tax with family quotient, and account-level tax on interest
//! - Three-scenario portfolio simulation per risk profile
//! - Side-by-side comparison of loan and savings scenarios

pub mod error;
pub mod catalogs;
pub mod loan;
pub mod savings;
pub mod tax;
pub mod portfolio;
pub mod scenario;

// Re-export commonly used types
pub use error::{EngineError, Result};
pub use catalogs::Catalogs;
pub use loan::{amortize, early_payoff, LoanParameters, LoanResult, EarlyPayoffResult, PaymentFrequency};
pub use savings::{grow, ContributionPattern, SavingsParameters, SavingsResult};
pub use tax::{apply_tax, compute_income_tax, AccountKind, TaxAccountProfile, TaxBracketSchedule};
pub use portfolio::{simulate, PortfolioSimulation, RiskKind, RiskProfile};
pub use scenario::{compare, RankedResults, Scenario, ScenarioRunner};
