//! Income tax and account-level tax adjustment

mod accounts;
mod adjustment;
mod brackets;
mod income;

pub use accounts::{AccountCatalog, AccountKind, TaxAccountProfile};
pub use adjustment::{apply_tax, apply_tax_to_savings, TaxCalculationResult};
pub use brackets::{TaxBracket, TaxBracketSchedule};
pub use income::{compute_income_tax, family_quotient, IncomeTaxResult};
