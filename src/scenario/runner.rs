//! Scenario runner for batch projections against one set of catalogs
//!
//! Loads catalogs once, then runs many savings, tax and risk projections
//! without re-reading CSV files.

use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::compare::{compare, RankedResults, Scenario};
use crate::catalogs::Catalogs;
use crate::error::Result;
use crate::portfolio::{PortfolioSimulation, PortfolioSimulator, RiskKind, SimulationConfig};
use crate::savings::{SavingsParameters, SavingsResult};
use crate::tax::{apply_tax_to_savings, compute_income_tax, AccountKind, IncomeTaxResult, TaxCalculationResult};

/// A savings projection together with its tax outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxedSavings {
    pub account: AccountKind,
    pub savings: SavingsResult,
    pub tax: TaxCalculationResult,
}

impl TaxedSavings {
    /// Final amount once gains are taxed
    pub fn net_final_amount(&self) -> f64 {
        self.savings.total_contributions + self.tax.net_interest
    }
}

/// Pre-loaded runner for batch projections
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    catalogs: Catalogs,
    simulation: SimulationConfig,
}

impl ScenarioRunner {
    /// Create runner with the built-in catalogs
    pub fn new() -> Self {
        Self::with_catalogs(Catalogs::default_france())
    }

    /// Create runner by loading catalogs from data/catalogs/
    pub fn from_csv() -> Result<Self> {
        Ok(Self::with_catalogs(Catalogs::from_csv()?))
    }

    pub fn from_csv_path(path: &Path, tax_year: Option<i32>) -> Result<Self> {
        Ok(Self::with_catalogs(Catalogs::from_csv_path(path, tax_year)?))
    }

    pub fn with_catalogs(catalogs: Catalogs) -> Self {
        Self {
            catalogs,
            simulation: SimulationConfig::default(),
        }
    }

    pub fn with_simulation_config(mut self, config: SimulationConfig) -> Self {
        self.simulation = config;
        self
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    pub fn catalogs_mut(&mut self) -> &mut Catalogs {
        &mut self.catalogs
    }

    /// Progressive income tax under the loaded bracket schedule
    pub fn income_tax(&self, taxable_income: f64, family_quotient: f64) -> Result<IncomeTaxResult> {
        compute_income_tax(taxable_income, family_quotient, &self.catalogs.brackets)
    }

    /// Grow a plan inside an account and tax it when withdrawn at the end of the plan
    pub fn run_in_account(&self, params: &SavingsParameters, account: AccountKind) -> Result<TaxedSavings> {
        let profile = self.catalogs.accounts.profile(account)?;
        let savings = params.grow()?;
        let tax = apply_tax_to_savings(&savings, profile, params.years as f64)?;
        Ok(TaxedSavings { account, savings, tax })
    }

    /// Same plan in every catalogued account, in catalog order
    pub fn run_across_accounts(&self, params: &SavingsParameters) -> Result<Vec<TaxedSavings>> {
        self.catalogs
            .accounts
            .profiles()
            .par_iter()
            .map(|profile| self.run_in_account(params, profile.kind))
            .collect()
    }

    /// Project many plans in parallel, keeping input order
    pub fn run_batch(&self, plans: &[SavingsParameters]) -> Result<Vec<SavingsResult>> {
        plans.par_iter().map(|p| p.grow()).collect()
    }

    pub fn simulate(&self, risk: RiskKind, params: &SavingsParameters) -> Result<PortfolioSimulation> {
        let profile = self.catalogs.risk_profiles.profile(risk)?;
        PortfolioSimulator::new(self.simulation.clone()).simulate(profile, params)
    }

    pub fn compare(&self, scenarios: &[Scenario]) -> Result<RankedResults> {
        compare(scenarios)
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}
