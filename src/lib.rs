//! `moto_financing` is a Rust library for calculating installment financing
//! of motorcycle sales.
//!
//! It builds the repayment plan of a financed sale using the French
//! amortization system (**Sistema Francês**, constant total payment), and
//! falls back to straight-line amortization for interest-free plans:
//! - **Schedule**: one row per installment with starting capital, interest,
//!   amortization and installment amount. Amounts are rounded up to whole
//!   currency units and the last installment settles the remaining balance.
//! - **Due dates**: weekly, biweekly, monthly, quarterly or annual, with
//!   calendar arithmetic for month based frequencies.
//! - **Preview**: installment amount and totals from the sale price and down
//!   payment, before the sale is submitted.
//! - **Report**: the schedule joined against recorded payments, with paid,
//!   pending and voided installments and the outstanding balance.
//!
//! ## Usage
//!
//! ```rust
//! use moto_financing::{amortization_schedule, LoanTerms, PaymentFrequency};
//! use rust_decimal_macros::dec;
//!
//! fn main() {
//!     let terms = LoanTerms::new(dec!(10_000), dec!(24), 12, PaymentFrequency::Monthly);
//!
//!     let schedule = amortization_schedule(&terms);
//!     assert_eq!(schedule.len(), 12);
//!     assert_eq!(schedule[0].installment_amount, dec!(946));
//!     assert_eq!(schedule[11].capital_at_period_end, dec!(0));
//!
//!     for entry in &schedule {
//!         println!(
//!             "#{:>2} interest {:>6} amortization {:>6} payment {:>6}",
//!             entry.installment_number,
//!             entry.interest_for_period,
//!             entry.amortization,
//!             entry.installment_amount,
//!         );
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod frequency;
pub mod preview;
pub mod report;
pub mod schedule;
pub mod terms;

pub use config::FinancingSettings;
pub use error::{FinancingError, Result};
pub use frequency::PaymentFrequency;
pub use preview::{FinancingPreview, PreviewRequest, preview_financing};
pub use report::{
    InstallmentReport, InstallmentReportRow, InstallmentStatus, RecordedPayment, ReportTotals,
    build_installment_report,
};
pub use schedule::{
    AmortizationScheduleEntry, ScheduleSummary, ScheduledInstallment, amortization_schedule,
    fixed_installment_amount, scheduled_installments, try_amortization_schedule,
    try_scheduled_installments,
};
pub use terms::{FinancingRecord, LoanTerms};
