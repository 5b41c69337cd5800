use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{FinancingError, Result};
use crate::schedule::scheduled_installments;
use crate::terms::LoanTerms;

/// A payment already recorded against a financing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedPayment {
    pub installment_number: u32,
    pub amount: Decimal,
    pub paid_on: NaiveDate,
    #[serde(default)]
    pub voided: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstallmentStatus {
    Paid,
    Pending,
    Voided,
}

/// One line of the installment report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentReportRow {
    pub installment_number: u32,
    pub due_date: NaiveDate,
    pub capital_at_period_start: Decimal,
    pub amortization: Decimal,
    pub interest_for_period: Decimal,
    pub installment_amount: Decimal,
    pub status: InstallmentStatus,
    pub amount_paid: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTotals {
    pub scheduled_total: Decimal,
    pub total_paid: Decimal,
    pub outstanding_balance: Decimal,
    /// Principal still owed at the start of the first unpaid installment.
    pub outstanding_capital: Decimal,
    pub paid_count: u32,
    pub pending_count: u32,
    pub voided_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due_installment: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentReport {
    pub terms: LoanTerms,
    pub start_date: NaiveDate,
    pub rows: Vec<InstallmentReportRow>,
    pub totals: ReportTotals,
    /// Payments whose installment number is not in the schedule.
    pub unmatched_payments: Vec<RecordedPayment>,
}

#[derive(Default)]
struct PaymentTally {
    amount: Decimal,
    last_paid_on: Option<NaiveDate>,
    has_valid: bool,
    has_voided: bool,
}

/// Joins the dated schedule against recorded payments by installment number.
///
/// An installment with at least one non-voided payment is paid; one with
/// only voided payments is voided; anything else is pending.
///
/// # Errors
///
/// Returns an error if a due date cannot be projected.
pub fn build_installment_report(
    terms: &LoanTerms,
    start_date: NaiveDate,
    payments: &[RecordedPayment],
) -> Result<InstallmentReport> {
    let schedule = scheduled_installments(terms, start_date)?;
    let installments = schedule.len() as u32;

    let mut tallies: BTreeMap<u32, PaymentTally> = BTreeMap::new();
    let mut unmatched_payments = Vec::new();
    for payment in payments {
        if payment.installment_number == 0 || payment.installment_number > installments {
            warn!(
                installment = payment.installment_number,
                installments, "payment does not match any scheduled installment"
            );
            unmatched_payments.push(payment.clone());
            continue;
        }
        let tally = tallies.entry(payment.installment_number).or_default();
        if payment.voided {
            tally.has_voided = true;
        } else {
            tally.has_valid = true;
            tally.amount = tally
                .amount
                .checked_add(payment.amount)
                .ok_or_else(|| FinancingError::invalid("payments", "total too large"))?;
            tally.last_paid_on = tally.last_paid_on.max(Some(payment.paid_on));
        }
    }

    let mut totals = ReportTotals::default();
    let mut rows = Vec::with_capacity(schedule.len());
    for scheduled in schedule {
        let entry = scheduled.entry;
        let tally = tallies.remove(&entry.installment_number).unwrap_or_default();
        let status = match (tally.has_valid, tally.has_voided) {
            (true, _) => InstallmentStatus::Paid,
            (false, true) => InstallmentStatus::Voided,
            (false, false) => InstallmentStatus::Pending,
        };

        totals.scheduled_total = totals
            .scheduled_total
            .checked_add(entry.installment_amount)
            .ok_or_else(|| FinancingError::invalid("principal", "too large"))?;
        totals.total_paid = totals
            .total_paid
            .checked_add(tally.amount)
            .ok_or_else(|| FinancingError::invalid("payments", "total too large"))?;
        match status {
            InstallmentStatus::Paid => totals.paid_count += 1,
            InstallmentStatus::Pending => totals.pending_count += 1,
            InstallmentStatus::Voided => totals.voided_count += 1,
        }
        if status != InstallmentStatus::Paid && totals.next_due_installment.is_none() {
            totals.next_due_installment = Some(entry.installment_number);
            totals.next_due_date = Some(scheduled.due_date);
            totals.outstanding_capital = entry.capital_at_period_start;
        }

        rows.push(InstallmentReportRow {
            installment_number: entry.installment_number,
            due_date: scheduled.due_date,
            capital_at_period_start: entry.capital_at_period_start,
            amortization: entry.amortization,
            interest_for_period: entry.interest_for_period,
            installment_amount: entry.installment_amount,
            status,
            amount_paid: tally.amount,
            paid_on: tally.last_paid_on,
        });
    }
    totals.outstanding_balance = (totals.scheduled_total - totals.total_paid).max(Decimal::ZERO);
    debug!(?totals, "installment report built");

    Ok(InstallmentReport {
        terms: terms.clone(),
        start_date,
        rows,
        totals,
        unmatched_payments,
    })
}
