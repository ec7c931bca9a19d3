//! Net-of-tax investment returns under an account regime

use serde::{Deserialize, Serialize};

use super::accounts::TaxAccountProfile;
use crate::error::{ensure_non_negative, Result};
use crate::savings::SavingsResult;

/// Outcome of taxing a gain under an account regime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxCalculationResult {
    pub gross_interest: f64,
    pub taxes: f64,
    pub social_charges: f64,
    pub net_interest: f64,
    /// Share of the gross gain kept (net / gross)
    pub effective_rate: f64,
    /// Withdrawn before the regime's minimum holding period
    pub early_withdrawal: bool,
}

impl TaxCalculationResult {
    fn untaxed(gross_interest: f64) -> Self {
        Self {
            gross_interest,
            taxes: 0.0,
            social_charges: 0.0,
            net_interest: gross_interest,
            effective_rate: if gross_interest > 0.0 { 1.0 } else { 0.0 },
            early_withdrawal: false,
        }
    }

    /// Taxes and social charges together
    pub fn total_levies(&self) -> f64 {
        self.taxes + self.social_charges
    }
}

/// Tax a gross gain held for `holding_years` under `profile`
pub fn apply_tax(gross_interest: f64, profile: &TaxAccountProfile, holding_years: f64) -> Result<TaxCalculationResult> {
    ensure_non_negative("gross_interest", gross_interest)?;
    ensure_non_negative("holding_years", holding_years)?;

    if profile.tax_exempt {
        return Ok(TaxCalculationResult::untaxed(gross_interest));
    }

    let early = profile.is_early(holding_years);
    let taxable_base = if early {
        gross_interest
    } else {
        (gross_interest - profile.allowance).max(0.0)
    };

    let taxes = (taxable_base * profile.income_tax_rate(holding_years)).min(gross_interest);
    let social_charges = (gross_interest * profile.social_charge_rate).min(gross_interest - taxes);
    let net_interest = gross_interest - taxes - social_charges;

    Ok(TaxCalculationResult {
        gross_interest,
        taxes,
        social_charges,
        net_interest,
        effective_rate: if gross_interest > 0.0 { net_interest / gross_interest } else { 0.0 },
        early_withdrawal: early,
    })
}

/// Tax the interest earned by a savings projection
pub fn apply_tax_to_savings(
    savings: &SavingsResult,
    profile: &TaxAccountProfile,
    holding_years: f64,
) -> Result<TaxCalculationResult> {
    if let Some(cap) = profile.cap_amount {
        if savings.total_contributions > cap {
            log::warn!(
                "contributions of {:.2} exceed the {} ceiling of {:.2}",
                savings.total_contributions,
                profile.name,
                cap
            );
        }
    }
    apply_tax(savings.total_interest.max(0.0), profile, holding_years)
}
