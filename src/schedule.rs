use chrono::NaiveDate;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{FinancingError, Result};
use crate::terms::LoanTerms;

/// Periodic rates that vanish at this many decimal places are treated as zero.
const RATE_PRECISION_DP: u32 = 10;

/// Balances below this are snapped to zero.
const RESIDUAL_TOLERANCE: Decimal = dec!(0.01);

/// Upper bound on the rows reserved up front; longer schedules grow as they go.
const MAX_PREALLOCATED_ENTRIES: u32 = 1024;

/// Represents the payment details for a single installment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationScheduleEntry {
    /// 1-based position in the schedule.
    pub installment_number: u32,
    /// Outstanding principal before this installment is applied.
    pub capital_at_period_start: Decimal,
    /// The portion of the payment that covers interest.
    pub interest_for_period: Decimal,
    /// The portion of the payment that goes towards reducing the principal.
    pub amortization: Decimal,
    /// The total payment for the period.
    pub installment_amount: Decimal,
    /// The remaining principal after the payment.
    pub capital_at_period_end: Decimal,
}

/// A schedule entry with its projected due date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledInstallment {
    pub due_date: NaiveDate,
    #[serde(flatten)]
    pub entry: AmortizationScheduleEntry,
}

/// Totals over a generated schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    pub installments: u32,
    pub first_installment: Decimal,
    pub last_installment: Decimal,
    pub total_paid: Decimal,
    pub total_interest: Decimal,
    pub total_amortization: Decimal,
}

impl ScheduleSummary {
    /// Totals the given rows.
    ///
    /// # Errors
    ///
    /// Returns an error if a total overflows `Decimal`.
    pub fn from_entries<'a>(
        entries: impl IntoIterator<Item = &'a AmortizationScheduleEntry>,
    ) -> Result<Self> {
        let too_large = || FinancingError::invalid("principal", "too large");
        let mut summary = ScheduleSummary::default();
        for entry in entries {
            if summary.installments == 0 {
                summary.first_installment = entry.installment_amount;
            }
            summary.installments += 1;
            summary.last_installment = entry.installment_amount;
            summary.total_paid = summary
                .total_paid
                .checked_add(entry.installment_amount)
                .ok_or_else(too_large)?;
            summary.total_interest = summary
                .total_interest
                .checked_add(entry.interest_for_period)
                .ok_or_else(too_large)?;
            summary.total_amortization = summary
                .total_amortization
                .checked_add(entry.amortization)
                .ok_or_else(too_large)?;
        }
        Ok(summary)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PaymentPlan {
    /// Interest free: equal principal slices.
    StraightLine { amortization: Decimal },
    /// French method: constant payment at a periodic rate.
    Annuity { payment: Decimal, rate: Decimal },
}

fn payment_plan(terms: &LoanTerms) -> Option<PaymentPlan> {
    if terms.principal <= Decimal::ZERO
        || terms.number_of_installments == 0
        || terms.annual_interest_rate_percent < Decimal::ZERO
    {
        return None;
    }

    let n = terms.number_of_installments;
    let rate = terms.periodic_rate();
    if rate.round_dp(RATE_PRECISION_DP).is_zero() {
        let amortization = (terms.principal / Decimal::from(n)).ceil();
        return Some(PaymentPlan::StraightLine { amortization });
    }

    // PMT = P * [i(1 + i)^n] / [(1 + i)^n – 1]
    let factor = (Decimal::ONE + rate).checked_powu(n.into())?;
    let payment = terms
        .principal
        .checked_mul(rate.checked_mul(factor)?)?
        .checked_div(factor - Decimal::ONE)?
        .ceil();
    Some(PaymentPlan::Annuity { payment, rate })
}

/// The constant installment amount for the terms, rounded up to a whole
/// currency unit. `None` when the terms are degenerate.
pub fn fixed_installment_amount(terms: &LoanTerms) -> Option<Decimal> {
    payment_plan(terms).map(|plan| match plan {
        PaymentPlan::StraightLine { amortization } => amortization,
        PaymentPlan::Annuity { payment, .. } => payment,
    })
}

/// Builds the French (constant payment) amortization schedule.
///
/// Interest and the fixed payment are rounded up to whole currency units;
/// the last installment settles whatever balance is left so the schedule
/// always closes at zero. Degenerate terms (non-positive principal, no
/// installments, negative rate) yield an empty schedule.
pub fn amortization_schedule(terms: &LoanTerms) -> Vec<AmortizationScheduleEntry> {
    let Some(plan) = payment_plan(terms) else {
        warn!(
            principal = %terms.principal,
            rate = %terms.annual_interest_rate_percent,
            installments = terms.number_of_installments,
            "degenerate loan terms, returning empty schedule"
        );
        return Vec::new();
    };
    debug!(?plan, ?terms, "building amortization schedule");

    match build_entries(terms.number_of_installments, terms.principal, plan) {
        Some(entries) => entries,
        None => {
            warn!(
                principal = %terms.principal,
                rate = %terms.annual_interest_rate_percent,
                "loan terms overflow, returning empty schedule"
            );
            Vec::new()
        }
    }
}

fn build_entries(
    n: u32,
    principal: Decimal,
    plan: PaymentPlan,
) -> Option<Vec<AmortizationScheduleEntry>> {
    let mut entries = Vec::with_capacity(n.min(MAX_PREALLOCATED_ENTRIES) as usize);
    let mut capital = principal;

    for number in 1..=n {
        let capital_start = capital;
        let (interest, mut amortization, mut installment) = match plan {
            PaymentPlan::StraightLine { amortization } => (Decimal::ZERO, amortization, amortization),
            PaymentPlan::Annuity { payment, rate } => {
                let interest = capital_start.checked_mul(rate)?.ceil();
                (interest, payment - interest, payment)
            }
        };

        if number == n {
            amortization = capital_start;
            installment = capital_start.checked_add(interest)?;
        } else if amortization > capital_start {
            amortization = capital_start;
            installment = amortization.checked_add(interest)?;
        } else if amortization <= Decimal::ZERO && capital_start > Decimal::ZERO {
            // Payment no longer covers the interest: spread what is left
            // over the remaining installments.
            let remaining = Decimal::from(n - number + 1);
            amortization = (capital_start / remaining).ceil().min(capital_start);
            installment = amortization.checked_add(interest)?;
        }

        let mut capital_end = (capital_start - amortization).max(Decimal::ZERO);
        if capital_end > Decimal::ZERO && capital_end < RESIDUAL_TOLERANCE {
            amortization += capital_end;
            installment = installment.checked_add(capital_end)?;
            capital_end = Decimal::ZERO;
        }

        entries.push(AmortizationScheduleEntry {
            installment_number: number,
            capital_at_period_start: capital_start,
            interest_for_period: interest,
            amortization,
            installment_amount: installment,
            capital_at_period_end: capital_end,
        });
        capital = capital_end;
    }

    Some(entries)
}

/// Same as [`amortization_schedule`], but degenerate terms are reported
/// instead of producing an empty schedule.
///
/// # Errors
///
/// Returns an error if the principal is not positive, there are no
/// installments or the rate is negative.
pub fn try_amortization_schedule(terms: &LoanTerms) -> Result<Vec<AmortizationScheduleEntry>> {
    terms.validate()?;
    let entries = amortization_schedule(terms);
    if entries.is_empty() {
        return Err(FinancingError::invalid(
            "annualInterestRatePercent",
            "rate too large to compute a payment",
        ));
    }
    Ok(entries)
}

/// Builds the schedule and projects each installment's due date, the first
/// one falling on `start_date`.
///
/// # Errors
///
/// Returns an error if a due date falls outside the supported calendar.
pub fn scheduled_installments(
    terms: &LoanTerms,
    start_date: NaiveDate,
) -> Result<Vec<ScheduledInstallment>> {
    with_due_dates(terms, start_date, amortization_schedule(terms))
}

/// Strict counterpart of [`scheduled_installments`], built on
/// [`try_amortization_schedule`].
///
/// # Errors
///
/// Returns an error for degenerate terms or a due date outside the
/// supported calendar.
pub fn try_scheduled_installments(
    terms: &LoanTerms,
    start_date: NaiveDate,
) -> Result<Vec<ScheduledInstallment>> {
    with_due_dates(terms, start_date, try_amortization_schedule(terms)?)
}

fn with_due_dates(
    terms: &LoanTerms,
    start_date: NaiveDate,
    entries: Vec<AmortizationScheduleEntry>,
) -> Result<Vec<ScheduledInstallment>> {
    entries
        .into_iter()
        .map(|entry| {
            let due_date = terms
                .payment_frequency
                .due_date(start_date, entry.installment_number - 1)
                .ok_or(FinancingError::DateOutOfRange {
                    installment: entry.installment_number,
                })?;
            Ok(ScheduledInstallment { due_date, entry })
        })
        .collect()
}
