//! Progressive income-tax bracket schedules

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// One marginal slice of a progressive tax
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower_bound: f64,
    /// `None` for the open-ended top bracket
    pub upper_bound: Option<f64>,
    pub rate: f64,
}

impl TaxBracket {
    pub fn new(lower_bound: f64, upper_bound: Option<f64>, rate: f64) -> Self {
        Self { lower_bound, upper_bound, rate }
    }

    /// Whether `income` falls in this bracket (lower inclusive, upper exclusive)
    pub fn contains(&self, income: f64) -> bool {
        income >= self.lower_bound && self.upper_bound.map_or(true, |upper| income < upper)
    }

    /// Portion of `income` that falls in this bracket
    pub fn taxable_slice(&self, income: f64) -> f64 {
        if income <= self.lower_bound {
            return 0.0;
        }
        let top = self.upper_bound.map_or(income, |upper| income.min(upper));
        top - self.lower_bound
    }
}

/// Ordered, contiguous bracket schedule for one jurisdiction and tax year
///
/// Construction checks that brackets start at 0, are sorted, leave no gaps and
/// only the last one is open-ended, so calculators can rely on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTaxBracketSchedule")]
pub struct TaxBracketSchedule {
    jurisdiction: String,
    year: i32,
    brackets: Vec<TaxBracket>,
}

/// Unchecked wire form, validated through [`TaxBracketSchedule::new`]
#[derive(Deserialize)]
struct RawTaxBracketSchedule {
    jurisdiction: String,
    year: i32,
    brackets: Vec<TaxBracket>,
}

impl TryFrom<RawTaxBracketSchedule> for TaxBracketSchedule {
    type Error = EngineError;

    fn try_from(raw: RawTaxBracketSchedule) -> Result<Self> {
        Self::new(raw.jurisdiction, raw.year, raw.brackets)
    }
}

impl TaxBracketSchedule {
    pub fn new(jurisdiction: impl Into<String>, year: i32, brackets: Vec<TaxBracket>) -> Result<Self> {
        let jurisdiction = jurisdiction.into();
        validate_brackets(&brackets)
            .map_err(|reason| EngineError::MalformedCatalog(format!("{} {} brackets: {}", jurisdiction, year, reason)))?;
        Ok(Self { jurisdiction, year, brackets })
    }

    /// French barème for 2024 (2023 income)
    pub fn france_2024() -> Self {
        Self::from_static(
            "FR",
            2024,
            &[
                (0.0, Some(11_294.0), 0.0),
                (11_294.0, Some(28_797.0), 0.11),
                (28_797.0, Some(82_341.0), 0.30),
                (82_341.0, Some(177_106.0), 0.41),
                (177_106.0, None, 0.45),
            ],
        )
    }

    /// French barème for 2025 (2024 income)
    pub fn france_2025() -> Self {
        Self::from_static(
            "FR",
            2025,
            &[
                (0.0, Some(11_497.0), 0.0),
                (11_497.0, Some(29_315.0), 0.11),
                (29_315.0, Some(83_823.0), 0.30),
                (83_823.0, Some(180_294.0), 0.41),
                (180_294.0, None, 0.45),
            ],
        )
    }

    fn from_static(jurisdiction: &str, year: i32, rows: &[(f64, Option<f64>, f64)]) -> Self {
        Self {
            jurisdiction: jurisdiction.to_string(),
            year,
            brackets: rows
                .iter()
                .map(|&(lower, upper, rate)| TaxBracket::new(lower, upper, rate))
                .collect(),
        }
    }

    pub fn jurisdiction(&self) -> &str {
        &self.jurisdiction
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Bracket containing `income`; incomes below 0 map to the first bracket
    pub fn bracket_for(&self, income: f64) -> &TaxBracket {
        self.brackets
            .iter()
            .find(|b| b.contains(income))
            .unwrap_or(&self.brackets[0])
    }
}

fn validate_brackets(brackets: &[TaxBracket]) -> std::result::Result<(), String> {
    let first = brackets.first().ok_or("no brackets")?;
    if first.lower_bound != 0.0 {
        return Err(format!("first bracket starts at {} instead of 0", first.lower_bound));
    }

    for (i, bracket) in brackets.iter().enumerate() {
        if !(0.0..=1.0).contains(&bracket.rate) {
            return Err(format!("bracket {} has rate {} outside [0, 1]", i, bracket.rate));
        }
        let is_last = i + 1 == brackets.len();
        match (bracket.upper_bound, is_last) {
            (None, true) => {}
            (None, false) => return Err(format!("bracket {} is open-ended but not last", i)),
            (Some(_), true) => return Err("top bracket must be open-ended".to_string()),
            (Some(upper), false) => {
                if upper <= bracket.lower_bound {
                    return Err(format!("bracket {} has upper {} <= lower {}", i, upper, bracket.lower_bound));
                }
                let next = brackets[i + 1].lower_bound;
                if next != upper {
                    return Err(format!("gap or overlap between bracket {} (upper {}) and next (lower {})", i, upper, next));
                }
            }
        }
    }

    Ok(())
}
