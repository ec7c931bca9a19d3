//! Risk profiles and their asset allocations

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskKind {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskKind::Conservative => "conservative",
            RiskKind::Moderate => "moderate",
            RiskKind::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for RiskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "conservative" | "prudent" => Ok(RiskKind::Conservative),
            "moderate" | "balanced" => Ok(RiskKind::Moderate),
            "aggressive" | "dynamic" => Ok(RiskKind::Aggressive),
            other => Err(EngineError::invalid("risk_profile", format!("unknown risk profile `{}`", other))),
        }
    }
}

/// Portfolio weights by asset class, summing to 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub equities: f64,
    pub bonds: f64,
    pub cash: f64,
    pub real_estate: f64,
}

impl Allocation {
    pub fn total(&self) -> f64 {
        self.equities + self.bonds + self.cash + self.real_estate
    }
}

/// An investment posture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub kind: RiskKind,
    pub name: String,
    /// Expected annual return as a decimal
    pub expected_return: f64,
    /// Annual volatility as a decimal
    pub volatility: f64,
    pub allocation: Allocation,
}

impl RiskProfile {
    pub fn validate(&self) -> Result<()> {
        if !(self.expected_return >= 0.0) || !self.expected_return.is_finite() {
            return Err(EngineError::MalformedCatalog(format!(
                "{}: expected return {} must be a finite rate >= 0",
                self.kind, self.expected_return
            )));
        }
        if !(self.volatility >= 0.0) || !self.volatility.is_finite() {
            return Err(EngineError::MalformedCatalog(format!(
                "{}: expected return {} / volatility {} invalid",
                self.kind, self.expected_return, self.volatility
            )));
        }
        let weights = [
            self.allocation.equities,
            self.allocation.bonds,
            self.allocation.cash,
            self.allocation.real_estate,
        ];
        if weights.iter().any(|w| !(*w >= 0.0)) || (self.allocation.total() - 1.0).abs() > 1e-6 {
            return Err(EngineError::MalformedCatalog(format!(
                "{}: allocation weights must be >= 0 and sum to 1 (got {})",
                self.kind,
                self.allocation.total()
            )));
        }
        Ok(())
    }
}

/// The set of risk profiles offered to a saver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRiskCatalog")]
pub struct RiskCatalog {
    profiles: Vec<RiskProfile>,
}

#[derive(Deserialize)]
struct RawRiskCatalog {
    profiles: Vec<RiskProfile>,
}

impl TryFrom<RawRiskCatalog> for RiskCatalog {
    type Error = EngineError;

    fn try_from(raw: RawRiskCatalog) -> Result<Self> {
        Self::new(raw.profiles)
    }
}

impl RiskCatalog {
    pub fn new(profiles: Vec<RiskProfile>) -> Result<Self> {
        for profile in &profiles {
            profile.validate()?;
        }
        Ok(Self { profiles })
    }

    pub fn profiles(&self) -> &[RiskProfile] {
        &self.profiles
    }

    pub fn get(&self, kind: RiskKind) -> Option<&RiskProfile> {
        self.profiles.iter().find(|p| p.kind == kind)
    }

    pub fn profile(&self, kind: RiskKind) -> Result<&RiskProfile> {
        self.get(kind)
            .ok_or_else(|| EngineError::invalid("risk_profile", format!("{} not in catalog", kind)))
    }
}

impl Default for RiskCatalog {
    fn default() -> Self {
        Self {
            profiles: vec![
                RiskProfile {
                    kind: RiskKind::Conservative,
                    name: "Prudent".to_string(),
                    expected_return: 0.03,
                    volatility: 0.04,
                    allocation: Allocation { equities: 0.20, bonds: 0.60, cash: 0.20, real_estate: 0.0 },
                },
                RiskProfile {
                    kind: RiskKind::Moderate,
                    name: "Équilibré".to_string(),
                    expected_return: 0.05,
                    volatility: 0.10,
                    allocation: Allocation { equities: 0.50, bonds: 0.35, cash: 0.05, real_estate: 0.10 },
                },
                RiskProfile {
                    kind: RiskKind::Aggressive,
                    name: "Dynamique".to_string(),
                    expected_return: 0.07,
                    volatility: 0.18,
                    allocation: Allocation { equities: 0.80, bonds: 0.10, cash: 0.0, real_estate: 0.10 },
                },
            ],
        }
    }
}
