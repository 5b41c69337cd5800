use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::FinancingSettings;
use crate::error::{FinancingError, Result};
use crate::frequency::PaymentFrequency;
use crate::schedule::{ScheduleSummary, amortization_schedule};
use crate::terms::LoanTerms;

/// Sale inputs as typed into the loan configuration form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub total_price: Decimal,
    #[serde(default)]
    pub down_payment: Decimal,
    pub number_of_installments: u32,
    #[serde(default)]
    pub annual_interest_rate_percent: Decimal,
    #[serde(default)]
    pub payment_frequency: Option<PaymentFrequency>,
}

/// Estimated figures shown while the loan terms are being adjusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancingPreview {
    pub terms: LoanTerms,
    pub installment_amount: Decimal,
    pub last_installment_amount: Decimal,
    pub total_payable: Decimal,
    pub total_interest: Decimal,
    /// Down payment plus everything paid through installments.
    pub total_cost: Decimal,
}

/// Validates the sale inputs and summarizes the resulting schedule.
///
/// Uses the same scheduler as the installment report, so the preview and
/// the printed schedule agree to the unit.
///
/// # Errors
///
/// Returns an error if the down payment is negative or above the total
/// price, nothing is left to finance, or the installment count or rate
/// fall outside the configured limits.
pub fn preview_financing(
    request: &PreviewRequest,
    settings: &FinancingSettings,
) -> Result<FinancingPreview> {
    if request.number_of_installments == 0 {
        return Err(FinancingError::invalid("numberOfInstallments", "must be at least 1"));
    }
    if request.number_of_installments > settings.max_installments {
        return Err(FinancingError::invalid(
            "numberOfInstallments",
            format!("at most {} installments are offered", settings.max_installments),
        ));
    }
    if request.annual_interest_rate_percent < Decimal::ZERO {
        return Err(FinancingError::invalid("annualInterestRatePercent", "must not be negative"));
    }
    if request.annual_interest_rate_percent > settings.max_annual_interest_rate_percent {
        return Err(FinancingError::invalid(
            "annualInterestRatePercent",
            format!("exceeds the maximum of {}%", settings.max_annual_interest_rate_percent),
        ));
    }

    let terms = LoanTerms::from_sale(
        request.total_price,
        request.down_payment,
        request.annual_interest_rate_percent,
        request.number_of_installments,
        request.payment_frequency.unwrap_or(settings.default_frequency),
    )?;
    if terms.principal <= Decimal::ZERO {
        return Err(FinancingError::invalid("downPayment", "leaves nothing to finance"));
    }

    let schedule = amortization_schedule(&terms);
    if schedule.is_empty() {
        return Err(FinancingError::invalid("principal", "too large"));
    }
    let summary = ScheduleSummary::from_entries(&schedule)?;
    debug!(?summary, "financing preview");
    let total_cost = request
        .down_payment
        .checked_add(summary.total_paid)
        .ok_or_else(|| FinancingError::invalid("totalPrice", "too large"))?;

    Ok(FinancingPreview {
        installment_amount: summary.first_installment,
        last_installment_amount: summary.last_installment,
        total_payable: summary.total_paid,
        total_interest: summary.total_interest,
        total_cost,
        terms,
    })
}
