//! Progressive income tax with a family-quotient divisor

use serde::{Deserialize, Serialize};

use super::brackets::TaxBracketSchedule;
use crate::error::{ensure_non_negative, EngineError, Result};

/// Outcome of a progressive income-tax computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeTaxResult {
    pub taxable_income: f64,
    pub family_quotient: f64,
    pub income_per_part: f64,
    pub tax: f64,
    /// Rate of the bracket containing the per-part income
    pub marginal_rate: f64,
    /// Tax over taxable income (0 when income is 0)
    pub average_rate: f64,
}

impl IncomeTaxResult {
    pub fn net_income(&self) -> f64 {
        self.taxable_income - self.tax
    }
}

/// Compute income tax by integrating the brackets over the per-part income
pub fn compute_income_tax(
    taxable_income: f64,
    family_quotient: f64,
    brackets: &TaxBracketSchedule,
) -> Result<IncomeTaxResult> {
    ensure_non_negative("taxable_income", taxable_income)?;
    if !family_quotient.is_finite() || family_quotient < 1.0 {
        return Err(EngineError::invalid(
            "family_quotient",
            format!("must be >= 1, got {}", family_quotient),
        ));
    }

    let income_per_part = taxable_income / family_quotient;

    let tax_per_part: f64 = brackets
        .brackets()
        .iter()
        .take_while(|b| income_per_part > b.lower_bound)
        .map(|b| b.rate * b.taxable_slice(income_per_part))
        .sum();

    let tax = tax_per_part * family_quotient;
    let marginal_rate = brackets.bracket_for(income_per_part).rate;

    Ok(IncomeTaxResult {
        taxable_income,
        family_quotient,
        income_per_part,
        tax,
        marginal_rate,
        average_rate: if taxable_income > 0.0 { tax / taxable_income } else { 0.0 },
    })
}

/// Number of household parts: 1 single, 2 married, +0.5 for each of the
/// first two children and +1 for each further child
pub fn family_quotient(married: bool, children: u32) -> f64 {
    let adults = if married { 2.0 } else { 1.0 };
    let first_two = children.min(2) as f64 * 0.5;
    let further = children.saturating_sub(2) as f64;
    adults + first_two + further
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_income() {
        let result = compute_income_tax(30_000.0, 1.0, &TaxBracketSchedule::france_2024()).unwrap();
        // (28797 - 11294) * 11% + (30000 - 28797) * 30%
        assert_relative_eq!(result.tax, 1_925.33 + 360.9, epsilon = 1e-6);
        assert_eq!(result.marginal_rate, 0.30);
        assert_relative_eq!(result.average_rate, result.tax / 30_000.0);
    }

    #[test]
    fn test_quotient_splits_and_recombines() {
        let schedule = TaxBracketSchedule::france_2024();
        let single = compute_income_tax(30_000.0, 1.0, &schedule).unwrap();
        let couple = compute_income_tax(60_000.0, 2.0, &schedule).unwrap();

        assert_eq!(couple.income_per_part, 30_000.0);
        assert_relative_eq!(couple.tax, single.tax * 2.0, epsilon = 1e-9);
        assert_eq!(couple.marginal_rate, single.marginal_rate);
    }

    #[test]
    fn test_below_first_threshold() {
        let result = compute_income_tax(10_000.0, 1.0, &TaxBracketSchedule::france_2024()).unwrap();
        assert_eq!(result.tax, 0.0);
        assert_eq!(result.marginal_rate, 0.0);

        let zero = compute_income_tax(0.0, 1.0, &TaxBracketSchedule::france_2024()).unwrap();
        assert_eq!(zero.tax, 0.0);
        assert_eq!(zero.average_rate, 0.0);
    }

    #[test]
    fn test_top_bracket() {
        let result = compute_income_tax(200_000.0, 1.0, &TaxBracketSchedule::france_2024()).unwrap();
        let expected = (28_797.0 - 11_294.0) * 0.11
            + (82_341.0 - 28_797.0) * 0.30
            + (177_106.0 - 82_341.0) * 0.41
            + (200_000.0 - 177_106.0) * 0.45;
        assert_relative_eq!(result.tax, expected, epsilon = 1e-6);
        assert_eq!(result.marginal_rate, 0.45);
    }

    #[test]
    fn test_monotone_in_income() {
        let schedule = TaxBracketSchedule::france_2025();
        let mut previous = 0.0;
        for step in 0..400 {
            let tax = compute_income_tax(step as f64 * 750.0, 2.5, &schedule).unwrap().tax;
            assert!(tax >= previous);
            previous = tax;
        }
    }

    #[test]
    fn test_invalid_inputs() {
        let schedule = TaxBracketSchedule::france_2024();
        assert!(compute_income_tax(-1.0, 1.0, &schedule).is_err());
        assert!(compute_income_tax(1_000.0, 0.5, &schedule).is_err());
        assert!(compute_income_tax(1_000.0, f64::NAN, &schedule).is_err());
    }

    #[test]
    fn test_family_quotient() {
        assert_eq!(family_quotient(false, 0), 1.0);
        assert_eq!(family_quotient(true, 0), 2.0);
        assert_eq!(family_quotient(true, 1), 2.5);
        assert_eq!(family_quotient(true, 2), 3.0);
        assert_eq!(family_quotient(true, 3), 4.0);
        assert_eq!(family_quotient(false, 4), 4.0);
    }
}
