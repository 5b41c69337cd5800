use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FinancingError, Result};
use crate::frequency::PaymentFrequency;

/// Loan terms of a financed sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTerms {
    /// The financed amount (total price minus down payment).
    pub principal: Decimal,
    /// The annual interest rate as a percentage (e.g., 24 for 24%).
    pub annual_interest_rate_percent: Decimal,
    /// The number of installments.
    pub number_of_installments: u32,
    #[serde(default)]
    pub payment_frequency: PaymentFrequency,
}

impl LoanTerms {
    pub fn new(
        principal: Decimal,
        annual_interest_rate_percent: Decimal,
        number_of_installments: u32,
        payment_frequency: PaymentFrequency,
    ) -> Self {
        Self {
            principal,
            annual_interest_rate_percent,
            number_of_installments,
            payment_frequency,
        }
    }

    /// Builds terms from the sale price and the amount paid up front.
    ///
    /// # Errors
    ///
    /// Returns an error if the down payment is negative or exceeds the total price.
    pub fn from_sale(
        total_price: Decimal,
        down_payment: Decimal,
        annual_interest_rate_percent: Decimal,
        number_of_installments: u32,
        payment_frequency: PaymentFrequency,
    ) -> Result<Self> {
        if down_payment < Decimal::ZERO {
            return Err(FinancingError::invalid("downPayment", "must not be negative"));
        }
        if down_payment > total_price {
            return Err(FinancingError::invalid(
                "downPayment",
                format!("{down_payment} exceeds total price {total_price}"),
            ));
        }
        Ok(Self::new(
            total_price - down_payment,
            annual_interest_rate_percent,
            number_of_installments,
            payment_frequency,
        ))
    }

    pub fn periodic_rate(&self) -> Decimal {
        self.payment_frequency
            .periodic_rate(self.annual_interest_rate_percent)
    }

    /// Checks the scheduler preconditions.
    pub fn validate(&self) -> Result<()> {
        if self.principal <= Decimal::ZERO {
            return Err(FinancingError::invalid("principal", "must be positive"));
        }
        if self.number_of_installments == 0 {
            return Err(FinancingError::invalid(
                "numberOfInstallments",
                "must be at least 1",
            ));
        }
        if self.annual_interest_rate_percent < Decimal::ZERO {
            return Err(FinancingError::invalid(
                "annualInterestRatePercent",
                "must not be negative",
            ));
        }
        Ok(())
    }
}

/// A financing row as persisted alongside the sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancingRecord {
    pub id: String,
    pub sale_id: String,
    pub total_price: Decimal,
    pub down_payment: Decimal,
    pub annual_interest_rate: Decimal,
    pub installments: i32,
    pub frequency: String,
    pub start_date: NaiveDate,
}

impl TryFrom<&FinancingRecord> for LoanTerms {
    type Error = FinancingError;

    fn try_from(record: &FinancingRecord) -> Result<Self> {
        let FinancingRecord {
            id: _,
            sale_id: _,
            total_price,
            down_payment,
            annual_interest_rate,
            installments,
            frequency,
            start_date: _,
        } = record;

        let number_of_installments = u32::try_from(*installments).map_err(|_| {
            FinancingError::invalid("installments", format!("{installments} is negative"))
        })?;
        let payment_frequency = frequency.parse::<PaymentFrequency>()?;

        LoanTerms::from_sale(
            *total_price,
            *down_payment,
            *annual_interest_rate,
            number_of_installments,
            payment_frequency,
        )
    }
}

impl TryFrom<FinancingRecord> for LoanTerms {
    type Error = FinancingError;

    fn try_from(record: FinancingRecord) -> Result<Self> {
        LoanTerms::try_from(&record)
    }
}
