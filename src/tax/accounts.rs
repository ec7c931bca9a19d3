//! Tax regimes of savings and investment accounts

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Account wrapper determining how gains are taxed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    LivretA,
    Ldds,
    Lep,
    Pea,
    AssuranceVie,
    CompteTitres,
    Pel,
}

impl AccountKind {
    pub const ALL: [AccountKind; 7] = [
        AccountKind::LivretA,
        AccountKind::Ldds,
        AccountKind::Lep,
        AccountKind::Pea,
        AccountKind::AssuranceVie,
        AccountKind::CompteTitres,
        AccountKind::Pel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AccountKind::LivretA => "livret_a",
            AccountKind::Ldds => "ldds",
            AccountKind::Lep => "lep",
            AccountKind::Pea => "pea",
            AccountKind::AssuranceVie => "assurance_vie",
            AccountKind::CompteTitres => "compte_titres",
            AccountKind::Pel => "pel",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = EngineError;

    /// Accepts `livret_a`, `LivretA`, `livret-a`, `PEA`...
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        AccountKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().replace('_', "") == key)
            .ok_or_else(|| EngineError::invalid("account", format!("unknown account kind `{}`", s)))
    }
}

/// Tax treatment of one account type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxAccountProfile {
    pub kind: AccountKind,
    pub name: String,

    /// Income tax rate on gains once the holding period is met
    pub tax_rate: f64,
    pub social_charge_rate: f64,

    pub min_holding_years: f64,

    /// Income tax rate on withdrawals before the holding period; `tax_rate` applies when absent
    pub early_withdrawal_penalty_rate: Option<f64>,

    /// Gains exempt from income tax once the holding period is met
    pub allowance: f64,

    /// Deposit ceiling, if the account has one
    pub cap_amount: Option<f64>,

    /// Gains are entirely tax and charge free
    pub tax_exempt: bool,
}

impl TaxAccountProfile {
    /// Regulated savings book: no tax, no social charges
    pub fn exempt(kind: AccountKind, name: &str, cap_amount: f64) -> Self {
        Self {
            kind,
            name: name.to_string(),
            tax_rate: 0.0,
            social_charge_rate: 0.0,
            min_holding_years: 0.0,
            early_withdrawal_penalty_rate: None,
            allowance: 0.0,
            cap_amount: Some(cap_amount),
            tax_exempt: true,
        }
    }

    /// Income tax rate applicable after `holding_years`
    pub fn income_tax_rate(&self, holding_years: f64) -> f64 {
        if self.is_early(holding_years) {
            self.early_withdrawal_penalty_rate.unwrap_or(self.tax_rate)
        } else {
            self.tax_rate
        }
    }

    pub fn is_early(&self, holding_years: f64) -> bool {
        holding_years < self.min_holding_years
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |reason: String| -> Result<()> {
            Err(EngineError::MalformedCatalog(format!("{}: {}", self.kind, reason)))
        };

        let rates = [
            ("tax_rate", Some(self.tax_rate)),
            ("social_charge_rate", Some(self.social_charge_rate)),
            ("early_withdrawal_penalty_rate", self.early_withdrawal_penalty_rate),
        ];
        for (field, rate) in rates {
            if let Some(rate) = rate {
                if !(0.0..=1.0).contains(&rate) {
                    return fail(format!("{} {} outside [0, 1]", field, rate));
                }
            }
        }
        let worst = self.early_withdrawal_penalty_rate.unwrap_or(0.0).max(self.tax_rate);
        if worst + self.social_charge_rate > 1.0 {
            return fail("tax and social charges exceed 100%".to_string());
        }
        if !(self.allowance >= 0.0) || !(self.min_holding_years >= 0.0) {
            return fail("allowance and holding period must be >= 0".to_string());
        }
        if self.cap_amount.is_some_and(|cap| !(cap > 0.0)) {
            return fail("cap must be > 0".to_string());
        }
        Ok(())
    }
}

/// Versioned set of account profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAccountCatalog")]
pub struct AccountCatalog {
    year: i32,
    profiles: Vec<TaxAccountProfile>,
}

#[derive(Deserialize)]
struct RawAccountCatalog {
    year: i32,
    profiles: Vec<TaxAccountProfile>,
}

impl TryFrom<RawAccountCatalog> for AccountCatalog {
    type Error = EngineError;

    fn try_from(raw: RawAccountCatalog) -> Result<Self> {
        Self::new(raw.year, raw.profiles)
    }
}

impl AccountCatalog {
    pub fn new(year: i32, profiles: Vec<TaxAccountProfile>) -> Result<Self> {
        for profile in &profiles {
            profile.validate()?;
        }
        for (i, profile) in profiles.iter().enumerate() {
            if profiles[..i].iter().any(|p| p.kind == profile.kind) {
                return Err(EngineError::MalformedCatalog(format!("duplicate account kind {}", profile.kind)));
            }
        }
        Ok(Self { year, profiles })
    }

    /// French account regimes in force for 2024
    pub fn france_2024() -> Self {
        let profiles = vec![
            TaxAccountProfile::exempt(AccountKind::LivretA, "Livret A", 22_950.0),
            TaxAccountProfile::exempt(AccountKind::Ldds, "LDDS", 12_000.0),
            TaxAccountProfile::exempt(AccountKind::Lep, "LEP", 10_000.0),
            TaxAccountProfile {
                kind: AccountKind::Pea,
                name: "PEA".to_string(),
                tax_rate: 0.0,
                social_charge_rate: 0.172,
                min_holding_years: 5.0,
                early_withdrawal_penalty_rate: Some(0.128),
                allowance: 0.0,
                cap_amount: Some(150_000.0),
                tax_exempt: false,
            },
            TaxAccountProfile {
                kind: AccountKind::AssuranceVie,
                name: "Assurance vie".to_string(),
                tax_rate: 0.075,
                social_charge_rate: 0.172,
                min_holding_years: 8.0,
                early_withdrawal_penalty_rate: Some(0.128),
                allowance: 4_600.0,
                cap_amount: None,
                tax_exempt: false,
            },
            TaxAccountProfile {
                kind: AccountKind::CompteTitres,
                name: "Compte-titres".to_string(),
                tax_rate: 0.128,
                social_charge_rate: 0.172,
                min_holding_years: 0.0,
                early_withdrawal_penalty_rate: None,
                allowance: 0.0,
                cap_amount: None,
                tax_exempt: false,
            },
            TaxAccountProfile {
                kind: AccountKind::Pel,
                name: "PEL".to_string(),
                tax_rate: 0.128,
                social_charge_rate: 0.172,
                min_holding_years: 0.0,
                early_withdrawal_penalty_rate: None,
                allowance: 0.0,
                cap_amount: Some(61_200.0),
                tax_exempt: false,
            },
        ];
        Self { year: 2024, profiles }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn profiles(&self) -> &[TaxAccountProfile] {
        &self.profiles
    }

    pub fn get(&self, kind: AccountKind) -> Option<&TaxAccountProfile> {
        self.profiles.iter().find(|p| p.kind == kind)
    }

    /// Like [`get`](Self::get) but an error when the kind is missing
    pub fn profile(&self, kind: AccountKind) -> Result<&TaxAccountProfile> {
        self.get(kind)
            .ok_or_else(|| EngineError::invalid("account", format!("{} not in the {} catalog", kind, self.year)))
    }
}
