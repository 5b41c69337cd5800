mod output;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use moto_financing::{
    FinancingRecord, FinancingSettings, LoanTerms, PaymentFrequency, PreviewRequest,
    RecordedPayment, ScheduleSummary, ScheduledInstallment, build_installment_report,
    preview_financing, scheduled_installments, try_scheduled_installments,
};

use crate::OutputFormat;

/// Arguments for schedule generation
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON loan terms (overrides individual flags)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Financed amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, default_value = "0")]
    pub rate: Decimal,

    /// Number of installments
    #[arg(long)]
    pub installments: Option<u32>,

    /// WEEKLY, BIWEEKLY, MONTHLY, QUARTERLY or ANNUALLY
    #[arg(long)]
    pub frequency: Option<PaymentFrequency>,

    /// Due date of the first installment (defaults to today)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

/// Arguments for the financing preview
#[derive(Args)]
pub struct PreviewArgs {
    /// Path to JSON preview request (overrides individual flags)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Sale total price
    #[arg(long)]
    pub total_price: Option<Decimal>,

    /// Amount paid up front
    #[arg(long, default_value = "0")]
    pub down_payment: Decimal,

    /// Number of installments
    #[arg(long)]
    pub installments: Option<u32>,

    /// Annual interest rate in percent
    #[arg(long, default_value = "0")]
    pub rate: Decimal,

    /// WEEKLY, BIWEEKLY, MONTHLY, QUARTERLY or ANNUALLY
    #[arg(long)]
    pub frequency: Option<PaymentFrequency>,
}

/// Arguments for the installment report
#[derive(Args)]
pub struct ReportArgs {
    /// Path to JSON with `financing` record and recorded `payments`
    #[arg(long)]
    pub input: PathBuf,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleInput {
    #[serde(flatten)]
    terms: LoanTerms,
    start_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct ReportInput {
    financing: FinancingRecord,
    #[serde(default)]
    payments: Vec<RecordedPayment>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleOutput {
    terms: LoanTerms,
    start_date: NaiveDate,
    summary: ScheduleSummary,
    installments: Vec<ScheduledInstallment>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse '{}'", path.display()))
}

pub fn run_schedule(
    args: ScheduleArgs,
    settings: &FinancingSettings,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let (terms, start_date) = match &args.input {
        Some(path) => {
            let input: ScheduleInput = read_json(path)?;
            (input.terms, input.start_date.or(args.start_date))
        }
        None => {
            let (Some(principal), Some(installments)) = (args.principal, args.installments) else {
                bail!("--principal and --installments are required without --input");
            };
            let frequency = args.frequency.unwrap_or(settings.default_frequency);
            (LoanTerms::new(principal, args.rate, installments, frequency), args.start_date)
        }
    };
    let start_date = start_date.unwrap_or_else(|| chrono::Local::now().date_naive());

    let installments = if settings.strict_validation {
        try_scheduled_installments(&terms, start_date)?
    } else {
        scheduled_installments(&terms, start_date)?
    };
    let summary = ScheduleSummary::from_entries(installments.iter().map(|s| &s.entry))?;

    match format {
        OutputFormat::Json => output::print_json(&ScheduleOutput {
            terms,
            start_date,
            summary,
            installments,
        })?,
        OutputFormat::Table => {
            output::print_schedule_table(&installments);
            output::print_summary(&summary);
        }
    }
    Ok(())
}

pub fn run_preview(
    args: PreviewArgs,
    settings: &FinancingSettings,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let request = match &args.input {
        Some(path) => read_json::<PreviewRequest>(path)?,
        None => {
            let (Some(total_price), Some(installments)) = (args.total_price, args.installments) else {
                bail!("--total-price and --installments are required without --input");
            };
            PreviewRequest {
                total_price,
                down_payment: args.down_payment,
                number_of_installments: installments,
                annual_interest_rate_percent: args.rate,
                payment_frequency: args.frequency,
            }
        }
    };

    let preview = preview_financing(&request, settings)?;
    match format {
        OutputFormat::Json => output::print_json(&preview)?,
        OutputFormat::Table => output::print_preview(&preview),
    }
    Ok(())
}

pub fn run_report(args: ReportArgs, format: OutputFormat) -> anyhow::Result<()> {
    let input: ReportInput = read_json(&args.input)?;
    let terms = LoanTerms::try_from(&input.financing)
        .with_context(|| format!("Invalid financing record '{}'", input.financing.id))?;
    let report = build_installment_report(&terms, input.financing.start_date, &input.payments)?;

    match format {
        OutputFormat::Json => output::print_json(&report)?,
        OutputFormat::Table => output::print_report(&report),
    }
    Ok(())
}
