use std::fmt;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{FinancingError, Result};

/// How often an installment falls due.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentFrequency {
    Weekly,
    Biweekly,
    #[default]
    Monthly,
    Quarterly,
    Annually,
}

/// Length of one period, either a fixed day count or a calendar month count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodLength {
    Days(u64),
    Months(u32),
}

impl PaymentFrequency {
    pub const ALL: [PaymentFrequency; 5] = [
        PaymentFrequency::Weekly,
        PaymentFrequency::Biweekly,
        PaymentFrequency::Monthly,
        PaymentFrequency::Quarterly,
        PaymentFrequency::Annually,
    ];

    pub fn periods_per_year(self) -> u32 {
        match self {
            PaymentFrequency::Weekly => 52,
            PaymentFrequency::Biweekly => 26,
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::Quarterly => 4,
            PaymentFrequency::Annually => 1,
        }
    }

    pub fn period_length(self) -> PeriodLength {
        match self {
            PaymentFrequency::Weekly => PeriodLength::Days(7),
            PaymentFrequency::Biweekly => PeriodLength::Days(14),
            PaymentFrequency::Monthly => PeriodLength::Months(1),
            PaymentFrequency::Quarterly => PeriodLength::Months(3),
            PaymentFrequency::Annually => PeriodLength::Months(12),
        }
    }

    /// Converts an annual percentage (e.g. 24 for 24%) into the decimal rate
    /// applied once per period. Nominal division, no compounding.
    pub fn periodic_rate(self, annual_interest_rate_percent: Decimal) -> Decimal {
        annual_interest_rate_percent / dec!(100) / Decimal::from(self.periods_per_year())
    }

    /// Date of the period `index` periods after `start` (index 0 is `start`).
    ///
    /// Month based frequencies are offset from `start` itself rather than
    /// from the previous due date, so a schedule anchored on the 31st comes
    /// back to the 31st after a short month.
    pub fn due_date(self, start: NaiveDate, index: u32) -> Option<NaiveDate> {
        match self.period_length() {
            PeriodLength::Days(days) => start.checked_add_days(Days::new(days * u64::from(index))),
            PeriodLength::Months(months) => {
                let offset = months.checked_mul(index)?;
                start.checked_add_months(Months::new(offset))
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentFrequency::Weekly => "WEEKLY",
            PaymentFrequency::Biweekly => "BIWEEKLY",
            PaymentFrequency::Monthly => "MONTHLY",
            PaymentFrequency::Quarterly => "QUARTERLY",
            PaymentFrequency::Annually => "ANNUALLY",
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentFrequency {
    type Err = FinancingError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase();
        PaymentFrequency::ALL
            .into_iter()
            .find(|f| f.as_str() == normalized)
            .ok_or_else(|| FinancingError::UnknownFrequency(s.to_string()))
    }
}
