//! Static reference data: tax brackets, account regimes and risk profiles

pub mod loader;

pub use loader::{LoadedCatalogs, DEFAULT_CATALOG_PATH};

use std::path::Path;

use crate::error::{EngineError, Result};
use crate::portfolio::RiskCatalog;
use crate::tax::{AccountCatalog, TaxBracketSchedule};

/// Container for every catalog a calculation may need
#[derive(Debug, Clone)]
pub struct Catalogs {
    pub brackets: TaxBracketSchedule,
    pub accounts: AccountCatalog,
    pub risk_profiles: RiskCatalog,
}

impl Catalogs {
    /// Built-in French catalogs, most recent tax year
    pub fn default_france() -> Self {
        Self {
            brackets: TaxBracketSchedule::france_2025(),
            accounts: AccountCatalog::france_2024(),
            risk_profiles: RiskCatalog::default(),
        }
    }

    /// Load catalogs from CSV files in the default location (data/catalogs/)
    pub fn from_csv() -> Result<Self> {
        Self::from_csv_path(Path::new(DEFAULT_CATALOG_PATH), None)
    }

    /// Load catalogs from a directory, using the bracket schedule for `tax_year`
    /// or the latest one when `None`
    pub fn from_csv_path(path: &Path, tax_year: Option<i32>) -> Result<Self> {
        let loaded = LoadedCatalogs::load_from(path)?;

        let brackets = match tax_year {
            Some(year) => loaded
                .bracket_schedules
                .into_iter()
                .find(|s| s.year() == year)
                .ok_or_else(|| EngineError::MalformedCatalog(format!("no tax brackets for {}", year)))?,
            None => loaded
                .bracket_schedules
                .into_iter()
                .max_by_key(|s| s.year())
                .ok_or_else(|| EngineError::MalformedCatalog("no tax brackets".to_string()))?,
        };

        log::info!(
            "loaded catalogs from {}: {} {} brackets, {} accounts, {} risk profiles",
            path.display(),
            brackets.jurisdiction(),
            brackets.year(),
            loaded.accounts.profiles().len(),
            loaded.risk_profiles.profiles().len(),
        );

        Ok(Self {
            brackets,
            accounts: loaded.accounts,
            risk_profiles: loaded.risk_profiles,
        })
    }
}

impl Default for Catalogs {
    fn default() -> Self {
        Self::default_france()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_year_by_default() {
        let catalogs = Catalogs::from_csv().unwrap();
        assert_eq!(catalogs.brackets.year(), 2025);
    }

    #[test]
    fn test_pick_year() {
        let catalogs = Catalogs::from_csv_path(Path::new(DEFAULT_CATALOG_PATH), Some(2024)).unwrap();
        assert_eq!(catalogs.brackets, TaxBracketSchedule::france_2024());
        assert!(Catalogs::from_csv_path(Path::new(DEFAULT_CATALOG_PATH), Some(1999)).is_err());
    }
}
