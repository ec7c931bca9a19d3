//! Reference scenarios checked end to end through the public API

use approx::assert_relative_eq;

use finproj::loan::amortize;
use finproj::savings::grow;
use finproj::tax::{apply_tax, AccountCatalog, AccountKind};
use finproj::{early_payoff, ContributionPattern, PaymentFrequency};

const MORTGAGE_RATE: f64 = 0.035 / 12.0;

#[test]
fn mortgage_25_years_at_3_5_percent() {
    let result = amortize(240_000.0, MORTGAGE_RATE, 300, 0.0).unwrap();

    assert_relative_eq!(result.base_payment, 1_201.4966, epsilon = 1e-4);
    assert_relative_eq!(result.total_interest, 120_448.97, epsilon = 0.05);
    assert_eq!(result.schedule.len(), 300);
    assert!(result.final_balance().abs() < 1e-6);
}

#[test]
fn interest_free_mortgage() {
    let result = amortize(240_000.0, 0.0, 300, 0.0).unwrap();

    assert_eq!(result.base_payment, 800.0);
    assert_eq!(result.total_interest, 0.0);
    assert!(result.schedule.iter().all(|e| e.payment == 800.0));
}

#[test]
fn ten_year_savings_plan_with_inflation() {
    let result = grow(1_000.0, &ContributionPattern::fixed(200.0), 0.035, 10, 0.02).unwrap();

    assert_eq!(result.total_contributions, 25_000.0);
    assert_relative_eq!(result.final_amount, 30_104.85, epsilon = 0.01);
    assert_relative_eq!(result.final_real_value, 24_651.87, epsilon = 0.01);
    assert_relative_eq!(
        result.final_amount,
        result.total_contributions + result.total_interest,
        epsilon = 1e-6
    );
}

#[test]
fn livret_a_interest_is_untaxed() {
    let catalog = AccountCatalog::france_2024();
    let result = apply_tax(1_000.0, catalog.profile(AccountKind::LivretA).unwrap(), 5.0).unwrap();

    assert_eq!(result.taxes, 0.0);
    assert_eq!(result.social_charges, 0.0);
    assert_eq!(result.net_interest, 1_000.0);
}

#[test]
fn pea_closed_before_five_years() {
    let catalog = AccountCatalog::france_2024();
    let result = apply_tax(1_000.0, catalog.profile(AccountKind::Pea).unwrap(), 3.0).unwrap();

    assert!(result.early_withdrawal);
    assert_relative_eq!(result.taxes, 128.0, epsilon = 1e-9);
    assert_relative_eq!(result.social_charges, 172.0, epsilon = 1e-9);
    assert_relative_eq!(result.net_interest, 700.0, epsilon = 1e-9);
    assert!(result.net_interest < 1_000.0);
}

#[test]
fn extra_hundred_a_month_on_the_mortgage() {
    let result = early_payoff(240_000.0, MORTGAGE_RATE, 300, 100.0, 0.0, PaymentFrequency::Monthly).unwrap();

    assert!(result.months_saved > 0);
    assert!(result.interest_saved > 0.0);
    assert!(result.new_total_interest < result.original_total_interest);
    assert_relative_eq!(
        result.interest_saved,
        result.original_total_interest - result.new_total_interest,
        epsilon = 1e-9
    );
}
