//! Side-by-side comparison of loan and savings scenarios

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::loan::{LoanParameters, LoanResult};
use crate::savings::{SavingsParameters, SavingsResult};

/// Parameters of one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScenarioParams {
    Loan(LoanParameters),
    Savings(SavingsParameters),
}

/// A labelled parameter set to compare
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub label: String,
    pub params: ScenarioParams,
}

impl Scenario {
    pub fn loan(label: impl Into<String>, params: LoanParameters) -> Self {
        Self { label: label.into(), params: ScenarioParams::Loan(params) }
    }

    pub fn savings(label: impl Into<String>, params: SavingsParameters) -> Self {
        Self { label: label.into(), params: ScenarioParams::Savings(params) }
    }

    fn run(&self) -> Result<OutcomeKind> {
        let outcome = match &self.params {
            ScenarioParams::Loan(params) => {
                let result = params.amortize()?;
                OutcomeKind::Loan {
                    monthly_payment: result.base_payment + params.extra_monthly_payment,
                    result,
                }
            }
            ScenarioParams::Savings(params) => OutcomeKind::Savings(params.grow()?),
        };
        Ok(outcome)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutcomeKind {
    Loan {
        /// Contractual payment plus the scenario's extra payment
        monthly_payment: f64,
        result: LoanResult,
    },
    Savings(SavingsResult),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub label: String,
    pub outcome: OutcomeKind,
}

/// Best loan scenarios, as indices into [`RankedResults::outcomes`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanWinners {
    pub lowest_payment: usize,
    pub lowest_total_interest: usize,
    /// Highest minus lowest total interest across loan scenarios
    pub interest_spread: f64,
}

/// Best savings scenarios, as indices into [`RankedResults::outcomes`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsWinners {
    pub highest_final_amount: usize,
    pub highest_total_interest: usize,
    /// Highest minus lowest final amount across savings scenarios
    pub final_amount_spread: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResults {
    /// One outcome per scenario, in input order
    pub outcomes: Vec<ScenarioOutcome>,
    /// Loan outcomes from cheapest to dearest total interest
    pub loan_ranking: Vec<usize>,
    /// Savings outcomes from largest to smallest final amount
    pub savings_ranking: Vec<usize>,
    pub loan_winners: Option<LoanWinners>,
    pub savings_winners: Option<SavingsWinners>,
}

impl RankedResults {
    /// Whether the outcome at `index` wins at least one criterion
    pub fn is_optimal(&self, index: usize) -> bool {
        let loan = self.loan_winners.as_ref().is_some_and(|w| {
            w.lowest_payment == index || w.lowest_total_interest == index
        });
        let savings = self.savings_winners.as_ref().is_some_and(|w| {
            w.highest_final_amount == index || w.highest_total_interest == index
        });
        loan || savings
    }

    pub fn get(&self, label: &str) -> Option<&ScenarioOutcome> {
        self.outcomes.iter().find(|o| o.label == label)
    }
}

/// Run every scenario and pick the winners per criterion
///
/// Scenarios run in parallel; outcomes keep input order and ties go to the
/// scenario seen first. One invalid scenario fails the whole comparison.
pub fn compare(scenarios: &[Scenario]) -> Result<RankedResults> {
    let outcomes = scenarios
        .par_iter()
        .map(|scenario| {
            scenario
                .run()
                .map(|outcome| ScenarioOutcome {
                    label: scenario.label.clone(),
                    outcome,
                })
                .map_err(|e| EngineError::Scenario {
                    label: scenario.label.clone(),
                    source: Box::new(e),
                })
        })
        .collect::<Result<Vec<_>>>()?;

    let loans: Vec<(usize, f64, f64)> = outcomes
        .iter()
        .enumerate()
        .filter_map(|(i, o)| match &o.outcome {
            OutcomeKind::Loan { monthly_payment, result } => Some((i, *monthly_payment, result.total_interest)),
            OutcomeKind::Savings(_) => None,
        })
        .collect();

    let savings: Vec<(usize, f64, f64)> = outcomes
        .iter()
        .enumerate()
        .filter_map(|(i, o)| match &o.outcome {
            OutcomeKind::Savings(result) => Some((i, result.final_amount, result.total_interest)),
            OutcomeKind::Loan { .. } => None,
        })
        .collect();

    let loan_winners = (!loans.is_empty()).then(|| LoanWinners {
        lowest_payment: first_best(&loans, |e| e.1, |a, b| a < b),
        lowest_total_interest: first_best(&loans, |e| e.2, |a, b| a < b),
        interest_spread: spread(loans.iter().map(|e| e.2)),
    });

    let savings_winners = (!savings.is_empty()).then(|| SavingsWinners {
        highest_final_amount: first_best(&savings, |e| e.1, |a, b| a > b),
        highest_total_interest: first_best(&savings, |e| e.2, |a, b| a > b),
        final_amount_spread: spread(savings.iter().map(|e| e.1)),
    });

    // Stable sorts keep first-seen order on ties
    let mut loan_order = loans.clone();
    loan_order.sort_by(|a, b| a.2.total_cmp(&b.2));
    let mut savings_order = savings.clone();
    savings_order.sort_by(|a, b| b.1.total_cmp(&a.1));

    log::debug!(
        "compared {} scenarios ({} loans, {} savings)",
        outcomes.len(),
        loans.len(),
        savings.len()
    );

    Ok(RankedResults {
        outcomes,
        loan_ranking: loan_order.iter().map(|e| e.0).collect(),
        savings_ranking: savings_order.iter().map(|e| e.0).collect(),
        loan_winners,
        savings_winners,
    })
}

/// Index of the first entry whose key beats every earlier one
fn first_best<K, B>(entries: &[(usize, f64, f64)], key: K, better: B) -> usize
where
    K: Fn(&(usize, f64, f64)) -> f64,
    B: Fn(f64, f64) -> bool,
{
    let mut best = entries[0];
    for entry in &entries[1..] {
        if better(key(entry), key(&best)) {
            best = *entry;
        }
    }
    best.0
}

fn spread(values: impl Iterator<Item = f64>) -> f64 {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min.is_finite() && max.is_finite() {
        max - min
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::savings::ContributionPattern;
    use approx::assert_relative_eq;

    fn mortgage_offers() -> Vec<Scenario> {
        vec![
            Scenario::loan("bank A 25y", LoanParameters::new(240_000.0, 0.035, 300)),
            Scenario::loan("bank B 20y", LoanParameters::new(240_000.0, 0.032, 240)),
            Scenario::loan("bank C 25y + extra", LoanParameters::new(240_000.0, 0.035, 300).with_extra_payment(100.0)),
        ]
    }

    #[test]
    fn test_loan_winners() {
        let ranked = compare(&mortgage_offers()).unwrap();
        let winners = ranked.loan_winners.clone().unwrap();

        // Longest term has the lowest payment; the shorter loan pays the least interest
        assert_eq!(winners.lowest_payment, 0);
        assert_eq!(winners.lowest_total_interest, 1);
        assert_eq!(ranked.loan_ranking, vec![1, 2, 0]);

        let interest: Vec<f64> = ranked
            .outcomes
            .iter()
            .map(|o| match &o.outcome {
                OutcomeKind::Loan { result, .. } => result.total_interest,
                OutcomeKind::Savings(_) => unreachable!(),
            })
            .collect();
        let max = interest.iter().cloned().fold(f64::MIN, f64::max);
        let min = interest.iter().cloned().fold(f64::MAX, f64::min);
        assert_relative_eq!(winners.interest_spread, max - min, epsilon = 1e-9);

        assert!(ranked.is_optimal(0));
        assert!(ranked.is_optimal(1));
        assert!(!ranked.is_optimal(2));
        assert!(ranked.savings_winners.is_none());
    }

    #[test]
    fn test_ties_go_to_first_seen() {
        let same = LoanParameters::new(100_000.0, 0.04, 180);
        let ranked = compare(&[
            Scenario::loan("first", same.clone()),
            Scenario::loan("second", same),
        ])
        .unwrap();
        let winners = ranked.loan_winners.unwrap();
        assert_eq!(winners.lowest_payment, 0);
        assert_eq!(winners.lowest_total_interest, 0);
        assert_eq!(winners.interest_spread, 0.0);
        assert_eq!(ranked.loan_ranking, vec![0, 1]);
    }

    #[test]
    fn test_mixed_scenarios() {
        let plan = SavingsParameters::new(1_000.0, ContributionPattern::fixed(200.0), 0.03, 10);
        let scenarios = vec![
            Scenario::savings("livret", plan.clone()),
            Scenario::loan("car loan", LoanParameters::new(15_000.0, 0.05, 60)),
            Scenario::savings("etf", plan.with_rate(0.06)),
        ];
        let ranked = compare(&scenarios).unwrap();

        assert_eq!(ranked.outcomes.len(), 3);
        assert_eq!(ranked.outcomes[1].label, "car loan");
        let savings = ranked.savings_winners.clone().unwrap();
        assert_eq!(savings.highest_final_amount, 2);
        assert_eq!(savings.highest_total_interest, 2);
        assert_eq!(ranked.savings_ranking, vec![2, 0]);
        assert_eq!(ranked.loan_winners.as_ref().unwrap().lowest_payment, 1);
        assert!(ranked.get("etf").is_some());
    }

    #[test]
    fn test_invalid_scenario_names_label() {
        let err = compare(&[
            Scenario::loan("ok", LoanParameters::new(1_000.0, 0.01, 12)),
            Scenario::loan("broken", LoanParameters::new(1_000.0, 0.01, 0)),
        ])
        .unwrap_err();
        match err {
            EngineError::Scenario { label, .. } => assert_eq!(label, "broken"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_empty_input() {
        let ranked = compare(&[]).unwrap();
        assert!(ranked.outcomes.is_empty());
        assert!(ranked.loan_winners.is_none());
        assert!(!ranked.is_optimal(0));
    }

    #[test]
    fn test_scenarios_from_json() {
        let json = r#"[
            {"label": "A", "params": {"type": "loan", "principal": 200000, "annual_rate": 0.04, "term_months": 240}},
            {"label": "B", "params": {"type": "savings", "initial_amount": 0, "pattern": {"kind": "fixed", "amount": 100},
                                      "annual_rate": 0.02, "years": 5}}
        ]"#;
        let scenarios: Vec<Scenario> = serde_json::from_str(json).unwrap();
        assert_eq!(scenarios.len(), 2);
        assert!(matches!(scenarios[0].params, ScenarioParams::Loan(_)));
        assert!(compare(&scenarios).is_ok());
    }
}
