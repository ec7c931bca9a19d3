//! CSV-based catalog loader
//!
//! Loads tax brackets, account regimes and risk profiles from CSV files in data/catalogs/

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use serde::Deserialize;

use crate::error::{EngineError, Result};
use crate::portfolio::{Allocation, RiskCatalog, RiskProfile};
use crate::tax::{AccountCatalog, TaxAccountProfile, TaxBracket, TaxBracketSchedule};

/// Default path to catalogs directory
pub const DEFAULT_CATALOG_PATH: &str = "data/catalogs";

pub const TAX_BRACKETS_FILE: &str = "tax_brackets.csv";
pub const ACCOUNT_PROFILES_FILE: &str = "account_profiles.csv";
pub const RISK_PROFILES_FILE: &str = "risk_profiles.csv";

fn open(dir: &Path, file_name: &str) -> Result<csv::Reader<File>> {
    let path = dir.join(file_name);
    csv::Reader::from_path(&path).map_err(|e| EngineError::CatalogLoad {
        path,
        reason: e.to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct BracketRow {
    jurisdiction: String,
    year: i32,
    lower_bound: f64,
    upper_bound: Option<f64>,
    rate: f64,
}

/// Load every bracket schedule in tax_brackets.csv, ordered by jurisdiction then year
pub fn load_tax_brackets(dir: &Path) -> Result<Vec<TaxBracketSchedule>> {
    let mut reader = open(dir, TAX_BRACKETS_FILE)?;
    let mut grouped: BTreeMap<(String, i32), Vec<TaxBracket>> = BTreeMap::new();

    for result in reader.deserialize() {
        let row: BracketRow = result?;
        grouped
            .entry((row.jurisdiction, row.year))
            .or_default()
            .push(TaxBracket::new(row.lower_bound, row.upper_bound, row.rate));
    }

    grouped
        .into_iter()
        .map(|((jurisdiction, year), mut brackets)| {
            brackets.sort_by(|a, b| a.lower_bound.total_cmp(&b.lower_bound));
            TaxBracketSchedule::new(jurisdiction, year, brackets)
        })
        .collect()
}

/// Raw CSV row matching account_profiles.csv columns
#[derive(Debug, Deserialize)]
struct AccountRow {
    year: i32,
    kind: String,
    name: String,
    tax_rate: f64,
    social_charge_rate: f64,
    min_holding_years: f64,
    early_withdrawal_penalty_rate: Option<f64>,
    allowance: f64,
    cap_amount: Option<f64>,
    tax_exempt: bool,
}

impl AccountRow {
    fn to_profile(self) -> Result<TaxAccountProfile> {
        Ok(TaxAccountProfile {
            kind: self.kind.parse()?,
            name: self.name,
            tax_rate: self.tax_rate,
            social_charge_rate: self.social_charge_rate,
            min_holding_years: self.min_holding_years,
            early_withdrawal_penalty_rate: self.early_withdrawal_penalty_rate,
            allowance: self.allowance,
            cap_amount: self.cap_amount,
            tax_exempt: self.tax_exempt,
        })
    }
}

/// Load account regimes; all rows must belong to the same year
pub fn load_account_profiles(dir: &Path) -> Result<AccountCatalog> {
    let mut reader = open(dir, ACCOUNT_PROFILES_FILE)?;
    let mut year = None;
    let mut profiles = Vec::new();

    for result in reader.deserialize() {
        let row: AccountRow = result?;
        match year {
            None => year = Some(row.year),
            Some(y) if y != row.year => {
                return Err(EngineError::MalformedCatalog(format!(
                    "{} mixes years {} and {}",
                    ACCOUNT_PROFILES_FILE, y, row.year
                )))
            }
            Some(_) => {}
        }
        profiles.push(row.to_profile()?);
    }

    let year = year.ok_or_else(|| EngineError::MalformedCatalog(format!("{} is empty", ACCOUNT_PROFILES_FILE)))?;
    AccountCatalog::new(year, profiles)
}

/// Raw CSV row matching risk_profiles.csv columns
#[derive(Debug, Deserialize)]
struct RiskRow {
    kind: String,
    name: String,
    expected_return: f64,
    volatility: f64,
    equities: f64,
    bonds: f64,
    cash: f64,
    real_estate: f64,
}

impl RiskRow {
    fn to_profile(self) -> Result<RiskProfile> {
        Ok(RiskProfile {
            kind: self.kind.parse()?,
            name: self.name,
            expected_return: self.expected_return,
            volatility: self.volatility,
            allocation: Allocation {
                equities: self.equities,
                bonds: self.bonds,
                cash: self.cash,
                real_estate: self.real_estate,
            },
        })
    }
}

pub fn load_risk_profiles(dir: &Path) -> Result<RiskCatalog> {
    let mut reader = open(dir, RISK_PROFILES_FILE)?;
    let mut profiles = Vec::new();

    for result in reader.deserialize() {
        let row: RiskRow = result?;
        profiles.push(row.to_profile()?);
    }

    RiskCatalog::new(profiles)
}

/// All catalogs as read from disk
pub struct LoadedCatalogs {
    pub bracket_schedules: Vec<TaxBracketSchedule>,
    pub accounts: AccountCatalog,
    pub risk_profiles: RiskCatalog,
}

impl LoadedCatalogs {
    /// Load all catalogs from the default path
    pub fn load_default() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CATALOG_PATH))
    }

    /// Load all catalogs from a specific path
    pub fn load_from(dir: &Path) -> Result<Self> {
        Ok(Self {
            bracket_schedules: load_tax_brackets(dir)?,
            accounts: load_account_profiles(dir)?,
            risk_profiles: load_risk_profiles(dir)?,
        })
    }
}
