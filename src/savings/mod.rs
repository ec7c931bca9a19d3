//! Compound growth of savings plans

mod contribution;
mod engine;
mod schedule;
mod state;

pub use contribution::ContributionPattern;
pub use engine::{grow, required_monthly_contribution, SavingsParameters};
pub use schedule::{MonthlySavingsEntry, SavingsResult, SavingsSummary};
pub use state::SavingsState;
