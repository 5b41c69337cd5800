//! Property tests for the amortization schedule.

use chrono::NaiveDate;
use moto_financing::{
    FinancingSettings, LoanTerms, PaymentFrequency, PreviewRequest, amortization_schedule,
    preview_financing, scheduled_installments,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn arb_frequency() -> impl Strategy<Value = PaymentFrequency> {
    prop::sample::select(PaymentFrequency::ALL.to_vec())
}

/// Principal in cents between 1.00 and 500 000.00.
fn arb_principal() -> impl Strategy<Value = Decimal> {
    (100i64..50_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Annual rate in hundredths of a percent, 0% to 60%.
fn arb_rate() -> impl Strategy<Value = Decimal> {
    prop_oneof![Just(Decimal::ZERO), (1i64..6_000).prop_map(|bp| Decimal::new(bp, 2))]
}

fn arb_terms() -> impl Strategy<Value = LoanTerms> {
    (arb_principal(), arb_rate(), 1u32..=60, arb_frequency())
        .prop_map(|(principal, rate, n, frequency)| LoanTerms::new(principal, rate, n, frequency))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Amortization adds up to the principal and the last row closes at zero.
    #[test]
    fn prop_conservation_of_principal(terms in arb_terms()) {
        let schedule = amortization_schedule(&terms);
        prop_assert_eq!(schedule.len() as u32, terms.number_of_installments);

        let total: Decimal = schedule.iter().map(|e| e.amortization).sum();
        prop_assert_eq!(total, terms.principal);
        prop_assert_eq!(schedule.last().map(|e| e.capital_at_period_end), Some(Decimal::ZERO));
    }

    /// Each row's ending capital is the next row's starting capital, and
    /// capital never grows.
    #[test]
    fn prop_monotonic_decline(terms in arb_terms()) {
        let schedule = amortization_schedule(&terms);
        for pair in schedule.windows(2) {
            prop_assert_eq!(pair[0].capital_at_period_end, pair[1].capital_at_period_start);
            prop_assert!(pair[1].capital_at_period_start <= pair[0].capital_at_period_start);
        }
        for entry in &schedule {
            prop_assert!(entry.capital_at_period_end >= Decimal::ZERO);
            prop_assert_eq!(
                entry.capital_at_period_end,
                (entry.capital_at_period_start - entry.amortization).max(Decimal::ZERO)
            );
            prop_assert_eq!(entry.installment_amount, entry.interest_for_period + entry.amortization);
        }
    }

    /// Interest-free plans never charge interest and split the principal
    /// into equal slices.
    #[test]
    fn prop_zero_interest(
        principal in (1i64..1_000_000).prop_map(Decimal::from),
        n in 1u32..=60,
        frequency in arb_frequency(),
    ) {
        let terms = LoanTerms::new(principal, Decimal::ZERO, n, frequency);
        let schedule = amortization_schedule(&terms);
        prop_assert!(schedule.iter().all(|e| e.interest_for_period.is_zero()));

        let slice = (principal / Decimal::from(n)).ceil();
        for entry in &schedule[..schedule.len() - 1] {
            prop_assert_eq!(entry.amortization, slice.min(entry.capital_at_period_start));
        }
    }

    /// Interest-bearing plans on realistic dealership amounts keep a constant
    /// payment on every installment but the last.
    #[test]
    fn prop_constant_payment(
        principal in (5_000i64..100_000).prop_map(Decimal::from),
        rate in (1i64..100).prop_map(Decimal::from),
        n in 2u32..=36,
    ) {
        let terms = LoanTerms::new(principal, rate, n, PaymentFrequency::Monthly);
        let schedule = amortization_schedule(&terms);
        let first = schedule[0].installment_amount;
        for entry in &schedule[..schedule.len() - 1] {
            prop_assert_eq!(entry.installment_amount, first);
        }
    }

    /// The preview reports exactly what the schedule charges.
    #[test]
    fn prop_preview_agrees_with_schedule(terms in arb_terms()) {
        let request = PreviewRequest {
            total_price: terms.principal,
            down_payment: Decimal::ZERO,
            number_of_installments: terms.number_of_installments,
            annual_interest_rate_percent: terms.annual_interest_rate_percent,
            payment_frequency: Some(terms.payment_frequency),
        };
        let preview = preview_financing(&request, &FinancingSettings::default()).unwrap();
        let schedule = amortization_schedule(&terms);
        let total: Decimal = schedule.iter().map(|e| e.installment_amount).sum();
        prop_assert_eq!(preview.installment_amount, schedule[0].installment_amount);
        prop_assert_eq!(preview.total_payable, total);
    }

    /// Due dates strictly increase.
    #[test]
    fn prop_due_dates_increase(terms in arb_terms(), day in 1u32..=31) {
        let start = NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let dated = scheduled_installments(&terms, start).unwrap();
        prop_assert_eq!(dated[0].due_date, start);
        for pair in dated.windows(2) {
            prop_assert!(pair[1].due_date > pair[0].due_date);
        }
    }
}

#[test]
fn degenerate_inputs_yield_empty_schedules() {
    let cases = [
        LoanTerms::new(Decimal::ZERO, Decimal::TEN, 12, PaymentFrequency::Monthly),
        LoanTerms::new(Decimal::ONE_THOUSAND, Decimal::TEN, 0, PaymentFrequency::Monthly),
        LoanTerms::new(Decimal::ONE_THOUSAND, Decimal::NEGATIVE_ONE, 12, PaymentFrequency::Monthly),
    ];
    for terms in cases {
        assert!(amortization_schedule(&terms).is_empty(), "{terms:?}");
    }
}
