//! Three-scenario portfolio projection and risk metrics

use serde::{Deserialize, Serialize};

use super::risk::RiskProfile;
use crate::error::{ensure_non_negative, Result};
use crate::savings::{grow, ContributionPattern, SavingsParameters, SavingsResult};

/// Assumptions shared by every simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Annual return of a riskless placement, for the Sharpe-like ratio
    pub risk_free_rate: f64,
    /// Lowest annual return the pessimistic scenario may assume
    pub min_return_floor: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.03,
            min_return_floor: 0.0,
        }
    }
}

/// Annual returns assumed by each scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRates {
    pub optimistic: f64,
    pub realistic: f64,
    pub pessimistic: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Shortfall of the pessimistic final amount against the realistic one, in percent
    pub max_drawdown: f64,
    pub sharpe_like_ratio: f64,
    /// Dispersion of the three final amounts relative to their mean, in percent
    pub volatility: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSimulation {
    pub rates: ScenarioRates,
    pub optimistic: SavingsResult,
    pub realistic: SavingsResult,
    pub pessimistic: SavingsResult,
    pub risk_metrics: RiskMetrics,
}

impl PortfolioSimulation {
    /// Final amounts as (optimistic, realistic, pessimistic)
    pub fn final_amounts(&self) -> (f64, f64, f64) {
        (
            self.optimistic.final_amount,
            self.realistic.final_amount,
            self.pessimistic.final_amount,
        )
    }
}

pub struct PortfolioSimulator {
    config: SimulationConfig,
}

impl PortfolioSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Scenario returns derived from the profile
    pub fn scenario_rates(&self, profile: &RiskProfile) -> ScenarioRates {
        let half_band = profile.volatility / 2.0;
        ScenarioRates {
            optimistic: profile.expected_return + half_band,
            realistic: profile.expected_return,
            pessimistic: (profile.expected_return - half_band).max(self.config.min_return_floor),
        }
    }

    /// Project the plan under the profile's three scenarios
    ///
    /// The plan's contribution pattern is levelled to its base amount; its own
    /// `annual_rate` is replaced by each scenario's return.
    pub fn simulate(&self, profile: &RiskProfile, params: &SavingsParameters) -> Result<PortfolioSimulation> {
        profile.validate()?;
        ensure_non_negative("risk_free_rate", self.config.risk_free_rate)?;
        ensure_non_negative("min_return_floor", self.config.min_return_floor)?;
        params.pattern.validate()?;

        let rates = self.scenario_rates(profile);
        let pattern = ContributionPattern::fixed(params.pattern.base_amount());
        let run = |rate: f64| grow(params.initial_amount, &pattern, rate, params.years, params.inflation_rate);

        let optimistic = run(rates.optimistic)?;
        let realistic = run(rates.realistic)?;
        let pessimistic = run(rates.pessimistic)?;

        let risk_metrics = self.risk_metrics(profile, &optimistic, &realistic, &pessimistic);

        log::debug!(
            "simulated {} profile: finals {:.2} / {:.2} / {:.2}, drawdown {:.2}%",
            profile.kind,
            optimistic.final_amount,
            realistic.final_amount,
            pessimistic.final_amount,
            risk_metrics.max_drawdown,
        );

        Ok(PortfolioSimulation {
            rates,
            optimistic,
            realistic,
            pessimistic,
            risk_metrics,
        })
    }

    fn risk_metrics(
        &self,
        profile: &RiskProfile,
        optimistic: &SavingsResult,
        realistic: &SavingsResult,
        pessimistic: &SavingsResult,
    ) -> RiskMetrics {
        let finals = [optimistic.final_amount, realistic.final_amount, pessimistic.final_amount];

        let max_drawdown = if realistic.final_amount > 0.0 {
            (realistic.final_amount - pessimistic.final_amount) / realistic.final_amount * 100.0
        } else {
            0.0
        };

        let mean = finals.iter().sum::<f64>() / finals.len() as f64;
        let variance = finals.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / finals.len() as f64;
        let volatility = if mean > 0.0 { variance.sqrt() / mean * 100.0 } else { 0.0 };

        let sharpe_like_ratio = if profile.volatility > 0.0 {
            (profile.expected_return - self.config.risk_free_rate) / profile.volatility
        } else {
            0.0
        };

        RiskMetrics {
            max_drawdown,
            sharpe_like_ratio,
            volatility,
        }
    }
}

impl Default for PortfolioSimulator {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

/// Simulate with the default [`SimulationConfig`]
pub fn simulate(profile: &RiskProfile, params: &SavingsParameters) -> Result<PortfolioSimulation> {
    PortfolioSimulator::default().simulate(profile, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::portfolio::{RiskCatalog, RiskKind};
    use approx::assert_relative_eq;

    fn plan() -> SavingsParameters {
        SavingsParameters::new(1_000.0, ContributionPattern::fixed(200.0), 0.0, 10)
    }

    fn moderate() -> RiskProfile {
        RiskCatalog::default().profile(RiskKind::Moderate).unwrap().clone()
    }

    #[test]
    fn test_scenario_rates() {
        let rates = PortfolioSimulator::default().scenario_rates(&moderate());
        assert_relative_eq!(rates.optimistic, 0.10);
        assert_eq!(rates.realistic, 0.05);
        assert_eq!(rates.pessimistic, 0.0);
    }

    #[test]
    fn test_floor_applies() {
        let simulator = PortfolioSimulator::new(SimulationConfig {
            risk_free_rate: 0.03,
            min_return_floor: 0.01,
        });
        let rates = simulator.scenario_rates(&moderate());
        assert_eq!(rates.pessimistic, 0.01);
    }

    #[test]
    fn test_scenarios_are_ordered() {
        let sim = simulate(&moderate(), &plan()).unwrap();
        let (opt, real, pess) = sim.final_amounts();
        assert!(opt > real && real > pess);
        // Pessimistic return is floored at 0: contributions only
        assert_eq!(pess, 25_000.0);
    }

    #[test]
    fn test_metrics() {
        let sim = simulate(&moderate(), &plan()).unwrap();
        let (opt, real, pess) = sim.final_amounts();

        assert_relative_eq!(sim.risk_metrics.max_drawdown, (real - pess) / real * 100.0, epsilon = 1e-9);
        assert_relative_eq!(sim.risk_metrics.sharpe_like_ratio, 0.2, epsilon = 1e-9);

        let mean = (opt + real + pess) / 3.0;
        let sd = (((opt - mean).powi(2) + (real - mean).powi(2) + (pess - mean).powi(2)) / 3.0).sqrt();
        assert_relative_eq!(sim.risk_metrics.volatility, sd / mean * 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_irregular_plan_is_levelled() {
        let params = SavingsParameters::new(0.0, ContributionPattern::Irregular { amounts: vec![100.0, 300.0] }, 0.0, 1);
        let sim = simulate(&moderate(), &params).unwrap();
        assert!(sim.realistic.schedule.iter().all(|e| e.contribution == 200.0));
    }

    #[test]
    fn test_empty_plan_has_zero_metrics() {
        let params = SavingsParameters::new(0.0, ContributionPattern::fixed(0.0), 0.0, 5);
        let sim = simulate(&moderate(), &params).unwrap();
        assert_eq!(sim.risk_metrics.max_drawdown, 0.0);
        assert_eq!(sim.risk_metrics.volatility, 0.0);
    }

    #[test]
    fn test_negative_return_profile_is_rejected_up_front() {
        let mut bad = moderate();
        bad.expected_return = -0.01;
        let err = simulate(&bad, &plan()).unwrap_err();
        assert!(matches!(err, EngineError::MalformedCatalog(_)), "{:?}", err);
    }

    #[test]
    fn test_negative_floor_is_rejected() {
        let simulator = PortfolioSimulator::new(SimulationConfig {
            risk_free_rate: 0.03,
            min_return_floor: -0.05,
        });
        let err = simulator.simulate(&moderate(), &plan()).unwrap_err();
        assert!(err.to_string().contains("min_return_floor"));
    }

    #[test]
    fn test_zero_volatility_profile() {
        let mut flat = moderate();
        flat.volatility = 0.0;
        let sim = simulate(&flat, &plan()).unwrap();
        assert_eq!(sim.risk_metrics.sharpe_like_ratio, 0.0);
        assert_relative_eq!(sim.risk_metrics.volatility, 0.0, epsilon = 1e-9);
    }
}
