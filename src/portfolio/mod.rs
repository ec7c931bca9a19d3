//! Portfolio risk simulation across optimistic, realistic and pessimistic returns

mod risk;
mod simulator;

pub use risk::{Allocation, RiskCatalog, RiskKind, RiskProfile};
pub use simulator::{
    simulate, PortfolioSimulation, PortfolioSimulator, RiskMetrics, ScenarioRates, SimulationConfig,
};
