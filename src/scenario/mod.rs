//! Multi-scenario comparison and batch runs

mod compare;
mod runner;

pub use compare::{
    compare, LoanWinners, OutcomeKind, RankedResults, SavingsWinners, Scenario, ScenarioOutcome,
    ScenarioParams,
};
pub use runner::{ScenarioRunner, TaxedSavings};
