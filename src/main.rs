//! finproj CLI
//!
//! Command-line interface for loan, savings, tax and portfolio projections

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use finproj::loan::{extra_payment_for_target, periods_until};
use finproj::savings::required_monthly_contribution;
use finproj::scenario::OutcomeKind;
use finproj::tax::{apply_tax, family_quotient, TaxCalculationResult};
use finproj::{
    early_payoff, AccountKind, Catalogs, ContributionPattern, LoanParameters, PaymentFrequency, RiskKind,
    SavingsParameters, SavingsResult, Scenario, ScenarioRunner, TaxBracketSchedule,
};

/// Loan, savings and tax projections
#[derive(Parser)]
#[command(name = "finproj", version, about = "Loan, savings and tax projections")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding tax_brackets.csv, account_profiles.csv and risk_profiles.csv
    #[arg(long, global = true)]
    catalogs: Option<PathBuf>,

    /// Tax year of the bracket schedule (latest available by default)
    #[arg(long, global = true)]
    tax_year: Option<i32>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Amortization schedule of a fixed-rate loan
    Amortize(AmortizeArgs),
    /// Effect of extra payments or a lump sum on a loan
    Payoff(PayoffArgs),
    /// Month-by-month growth of a savings plan
    Grow(GrowArgs),
    /// Progressive income tax with family quotient
    IncomeTax(IncomeTaxArgs),
    /// Tax and social charges on interest held in an account
    ApplyTax(ApplyTaxArgs),
    /// Optimistic, realistic and pessimistic projections for a risk profile
    Simulate(SimulateArgs),
    /// Rank the scenarios listed in a JSON file
    Compare(CompareArgs),
}

#[derive(Args)]
struct LoanArgs {
    /// Amount borrowed
    #[arg(long)]
    principal: f64,
    /// Annual nominal rate as a decimal (0.035 for 3.5%)
    #[arg(long)]
    rate: f64,
    /// Term in months
    #[arg(long)]
    months: u32,
}

#[derive(Args)]
struct AmortizeArgs {
    #[command(flatten)]
    loan: LoanArgs,
    /// Extra principal paid every month
    #[arg(long, default_value_t = 0.0)]
    extra: f64,
    /// Date of the first payment (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,
    /// Write the full schedule to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Args)]
struct PayoffArgs {
    #[command(flatten)]
    loan: LoanArgs,
    #[arg(long, default_value_t = 0.0)]
    extra: f64,
    /// One-off payment made before the first period
    #[arg(long, default_value_t = 0.0)]
    lump_sum: f64,
    /// monthly, quarterly or annually
    #[arg(long, default_value = "monthly")]
    frequency: PaymentFrequency,
    /// Date of the first payment, needed with --target
    #[arg(long)]
    start: Option<NaiveDate>,
    /// Report the extra monthly payment needed to be done by this date
    #[arg(long, requires = "start")]
    target: Option<NaiveDate>,
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Args)]
struct PlanArgs {
    /// Opening balance
    #[arg(long, default_value_t = 0.0)]
    initial: f64,
    /// Monthly contribution (base amount for increasing and decreasing plans)
    #[arg(long, default_value_t = 0.0)]
    monthly: f64,
    /// Raise the contribution by this rate every plan year
    #[arg(long, conflicts_with_all = ["decrease", "irregular"])]
    increase: Option<f64>,
    /// Cut the contribution by this rate every plan year
    #[arg(long, conflicts_with = "irregular")]
    decrease: Option<f64>,
    /// Comma-separated amounts repeated month after month
    #[arg(long, value_delimiter = ',')]
    irregular: Vec<f64>,
    #[arg(long)]
    years: u32,
    /// Annual inflation as a decimal
    #[arg(long, default_value_t = 0.0)]
    inflation: f64,
}

impl PlanArgs {
    fn pattern(&self) -> ContributionPattern {
        if !self.irregular.is_empty() {
            ContributionPattern::Irregular { amounts: self.irregular.clone() }
        } else if let Some(annual_rate) = self.increase {
            ContributionPattern::Increasing { base: self.monthly, annual_rate }
        } else if let Some(annual_rate) = self.decrease {
            ContributionPattern::Decreasing { base: self.monthly, annual_rate }
        } else {
            ContributionPattern::fixed(self.monthly)
        }
    }

    fn params(&self, annual_rate: f64) -> SavingsParameters {
        SavingsParameters::new(self.initial, self.pattern(), annual_rate, self.years).with_inflation(self.inflation)
    }
}

#[derive(Args)]
struct GrowArgs {
    #[command(flatten)]
    plan: PlanArgs,
    /// Annual return as a decimal
    #[arg(long)]
    rate: f64,
    /// Also report the fixed contribution needed to reach this amount
    #[arg(long)]
    target: Option<f64>,
    /// Tax the interest as if held in this account (livret_a, pea, assurance_vie...)
    #[arg(long)]
    account: Option<AccountKind>,
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Args)]
struct IncomeTaxArgs {
    /// Net taxable income of the household
    #[arg(long)]
    income: f64,
    /// Number of parts; derived from --married and --children when absent
    #[arg(long)]
    parts: Option<f64>,
    #[arg(long)]
    married: bool,
    #[arg(long, default_value_t = 0)]
    children: u32,
}

#[derive(Args)]
struct ApplyTaxArgs {
    /// Gross interest earned
    #[arg(long)]
    interest: f64,
    /// livret_a, ldds, lep, pea, assurance_vie, compte_titres or pel
    #[arg(long)]
    account: AccountKind,
    /// Years the money stayed in the account
    #[arg(long)]
    holding_years: f64,
}

#[derive(Args)]
struct SimulateArgs {
    /// conservative, moderate or aggressive
    #[arg(long)]
    risk: RiskKind,
    #[command(flatten)]
    plan: PlanArgs,
}

#[derive(Args)]
struct CompareArgs {
    /// JSON array of {"label", "params": {"type": "loan" | "savings", ...}}
    file: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let runner = ScenarioRunner::with_catalogs(load_catalogs(cli.catalogs.as_deref(), cli.tax_year)?);

    match cli.command {
        Commands::Amortize(args) => amortize(args, cli.json),
        Commands::Payoff(args) => payoff(args, cli.json),
        Commands::Grow(args) => grow(&runner, args, cli.json),
        Commands::IncomeTax(args) => income_tax(&runner, args, cli.json),
        Commands::ApplyTax(args) => tax(&runner, args, cli.json),
        Commands::Simulate(args) => simulate(&runner, args, cli.json),
        Commands::Compare(args) => compare(&runner, args, cli.json),
    }
}

fn load_catalogs(dir: Option<&Path>, tax_year: Option<i32>) -> Result<Catalogs> {
    if let Some(dir) = dir {
        return Catalogs::from_csv_path(dir, tax_year)
            .with_context(|| format!("loading catalogs from {}", dir.display()));
    }

    let mut catalogs = Catalogs::default_france();
    match tax_year {
        None | Some(2025) => {}
        Some(2024) => catalogs.brackets = TaxBracketSchedule::france_2024(),
        Some(year) => bail!("no built-in tax brackets for {}; pass --catalogs", year),
    }
    Ok(catalogs)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    println!("Full schedule written to: {}", path.display());
    Ok(())
}

fn amortize(args: AmortizeArgs, json: bool) -> Result<()> {
    let params = LoanParameters::new(args.loan.principal, args.loan.rate, args.loan.months)
        .with_extra_payment(args.extra);
    let result = params.amortize().context("amortizing loan")?;

    if let Some(path) = &args.csv {
        write_csv(path, &result.schedule)?;
    }
    if json {
        return print_json(&result);
    }

    let summary = result.summary();
    println!("Monthly payment: {:.2}", summary.base_payment);
    if args.extra > 0.0 {
        println!("  plus extra:    {:.2}", args.extra);
    }
    println!("Payments:        {}", summary.periods);
    println!("Total interest:  {:.2}", summary.total_interest);
    println!("Total paid:      {:.2}", summary.total_paid);
    if let Some(date) = args.start.and_then(|start| result.payoff_date(start)) {
        println!("Paid off on:     {}", date);
    }

    println!("\n{:>6} {:>12} {:>12} {:>12} {:>14}", "Month", "Payment", "Principal", "Interest", "Balance");
    for entry in result.schedule.iter().take(12) {
        println!(
            "{:>6} {:>12.2} {:>12.2} {:>12.2} {:>14.2}",
            entry.period, entry.payment, entry.principal_portion, entry.interest_portion, entry.remaining_balance
        );
    }
    if result.schedule.len() > 12 {
        println!("... ({} more months)", result.schedule.len() - 12);
    }
    Ok(())
}

fn payoff(args: PayoffArgs, json: bool) -> Result<()> {
    let monthly_rate = args.loan.rate / 12.0;
    let result = early_payoff(
        args.loan.principal,
        monthly_rate,
        args.loan.months,
        args.extra,
        args.lump_sum,
        args.frequency,
    )
    .context("analysing early payoff")?;

    let needed_for_target = match (args.start, args.target) {
        (Some(start), Some(target)) => {
            let periods = periods_until(start, target)?;
            Some(extra_payment_for_target(args.loan.principal, monthly_rate, args.loan.months, periods)?)
        }
        _ => None,
    };

    if let Some(path) = &args.csv {
        write_csv(path, &result.schedule.schedule)?;
    }
    if json {
        return print_json(&result);
    }

    println!("Paid off after:    {} months", result.payoff_month_index);
    println!("Months saved:      {}", result.months_saved);
    println!("Interest saved:    {:.2}", result.interest_saved);
    println!("Original interest: {:.2}", result.original_total_interest);
    println!("New interest:      {:.2}", result.new_total_interest);
    if let Some(date) = args.start.and_then(|start| result.schedule.payoff_date(start)) {
        println!("Paid off on:       {}", date);
    }
    if let (Some(extra), Some(target)) = (needed_for_target, args.target) {
        println!("Extra needed to finish by {}: {:.2} per month", target, extra);
    }
    Ok(())
}

fn grow(runner: &ScenarioRunner, args: GrowArgs, json: bool) -> Result<()> {
    let params = args.plan.params(args.rate);

    #[derive(Serialize)]
    struct GrowOutput {
        result: SavingsResult,
        #[serde(skip_serializing_if = "Option::is_none")]
        tax: Option<TaxCalculationResult>,
        #[serde(skip_serializing_if = "Option::is_none")]
        required_monthly_contribution: Option<f64>,
    }

    let (result, tax) = match args.account {
        Some(account) => {
            let taxed = runner.run_in_account(&params, account).context("projecting savings")?;
            (taxed.savings, Some(taxed.tax))
        }
        None => (params.grow().context("projecting savings")?, None),
    };
    let required = args
        .target
        .map(|target| required_monthly_contribution(target, params.initial_amount, params.annual_rate, params.years))
        .transpose()?;

    if let Some(path) = &args.csv {
        write_csv(path, &result.schedule)?;
    }
    if json {
        return print_json(&GrowOutput {
            result,
            tax,
            required_monthly_contribution: required,
        });
    }

    let summary = result.summary();
    println!("Final amount:        {:.2}", summary.final_amount);
    println!("Total contributions: {:.2}", summary.total_contributions);
    println!("Total interest:      {:.2}", summary.total_interest);
    if args.plan.inflation > 0.0 {
        println!("Real value:          {:.2}", summary.final_real_value);
    }

    println!("\n{:>5} {:>14}", "Year", "Balance");
    for (year, balance) in result.yearly_balances() {
        println!("{:>5} {:>14.2}", year, balance);
    }

    if let Some(tax) = tax {
        println!("\nTaxes:          {:.2}", tax.taxes);
        println!("Social charges: {:.2}", tax.social_charges);
        println!("Net interest:   {:.2}", tax.net_interest);
    }
    if let (Some(target), Some(monthly)) = (args.target, required) {
        println!("\nTo reach {:.2}: {:.2} per month", target, monthly);
    }
    Ok(())
}

fn income_tax(runner: &ScenarioRunner, args: IncomeTaxArgs, json: bool) -> Result<()> {
    let parts = args.parts.unwrap_or_else(|| family_quotient(args.married, args.children));
    let result = runner.income_tax(args.income, parts).context("computing income tax")?;

    if json {
        return print_json(&result);
    }

    let brackets = &runner.catalogs().brackets;
    println!("Schedule:      {} {}", brackets.jurisdiction(), brackets.year());
    println!("Parts:         {}", result.family_quotient);
    println!("Tax:           {:.2}", result.tax);
    println!("Net income:    {:.2}", result.net_income());
    println!("Marginal rate: {:.1}%", result.marginal_rate * 100.0);
    println!("Average rate:  {:.2}%", result.average_rate * 100.0);
    Ok(())
}

fn tax(runner: &ScenarioRunner, args: ApplyTaxArgs, json: bool) -> Result<()> {
    let profile = runner.catalogs().accounts.profile(args.account)?;
    let result = apply_tax(args.interest, profile, args.holding_years).context("applying account tax")?;

    if json {
        return print_json(&result);
    }

    println!("Account:        {}", profile.name);
    println!("Taxes:          {:.2}", result.taxes);
    println!("Social charges: {:.2}", result.social_charges);
    println!("Net interest:   {:.2}", result.net_interest);
    println!("Kept:           {:.2}%", result.effective_rate * 100.0);
    if result.early_withdrawal {
        println!("(early withdrawal rate applied)");
    }
    Ok(())
}

fn simulate(runner: &ScenarioRunner, args: SimulateArgs, json: bool) -> Result<()> {
    let params = args.plan.params(0.0);
    let sim = runner.simulate(args.risk, &params).context("simulating portfolio")?;

    if json {
        return print_json(&sim);
    }

    let (optimistic, realistic, pessimistic) = sim.final_amounts();
    println!("{:<12} {:>8} {:>14}", "Scenario", "Return", "Final");
    println!("{:<12} {:>7.2}% {:>14.2}", "optimistic", sim.rates.optimistic * 100.0, optimistic);
    println!("{:<12} {:>7.2}% {:>14.2}", "realistic", sim.rates.realistic * 100.0, realistic);
    println!("{:<12} {:>7.2}% {:>14.2}", "pessimistic", sim.rates.pessimistic * 100.0, pessimistic);
    println!("\nMax drawdown: {:.2}%", sim.risk_metrics.max_drawdown);
    println!("Volatility:   {:.2}%", sim.risk_metrics.volatility);
    println!("Sharpe-like:  {:.3}", sim.risk_metrics.sharpe_like_ratio);
    Ok(())
}

fn compare(runner: &ScenarioRunner, args: CompareArgs, json: bool) -> Result<()> {
    let text = fs::read_to_string(&args.file).with_context(|| format!("reading {}", args.file.display()))?;
    let scenarios: Vec<Scenario> =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", args.file.display()))?;
    let ranked = runner.compare(&scenarios)?;

    if json {
        return print_json(&ranked);
    }

    for (i, outcome) in ranked.outcomes.iter().enumerate() {
        let marker = if ranked.is_optimal(i) { "*" } else { " " };
        println!("{} {:<24} {}", marker, outcome.label, headline(&outcome.outcome));
    }
    if let Some(w) = &ranked.loan_winners {
        println!("\nLowest payment:        {}", ranked.outcomes[w.lowest_payment].label);
        println!("Lowest total interest: {}", ranked.outcomes[w.lowest_total_interest].label);
        println!("Interest spread:       {:.2}", w.interest_spread);
    }
    if let Some(w) = &ranked.savings_winners {
        println!("\nHighest final amount:   {}", ranked.outcomes[w.highest_final_amount].label);
        println!("Highest total interest: {}", ranked.outcomes[w.highest_total_interest].label);
        println!("Final amount spread:    {:.2}", w.final_amount_spread);
    }
    Ok(())
}

fn headline(outcome: &OutcomeKind) -> String {
    match outcome {
        OutcomeKind::Loan { monthly_payment, result } => format!(
            "loan    payment {:>10.2}  interest {:>12.2}  months {:>4}",
            monthly_payment,
            result.total_interest,
            result.payoff_month()
        ),
        OutcomeKind::Savings(result) => format!(
            "savings final {:>12.2}  interest {:>12.2}",
            result.final_amount, result.total_interest
        ),
    }
}
