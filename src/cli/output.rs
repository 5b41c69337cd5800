use serde::Serialize;
use tabled::{Table, builder::Builder};

use moto_financing::{FinancingPreview, InstallmentReport, ScheduleSummary, ScheduledInstallment};

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_schedule_table(installments: &[ScheduledInstallment]) {
    if installments.is_empty() {
        println!("(empty schedule)");
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(["#", "Due date", "Capital", "Amortization", "Interest", "Installment"]);
    for scheduled in installments {
        let entry = &scheduled.entry;
        builder.push_record([
            entry.installment_number.to_string(),
            scheduled.due_date.to_string(),
            entry.capital_at_period_start.to_string(),
            entry.amortization.to_string(),
            entry.interest_for_period.to_string(),
            entry.installment_amount.to_string(),
        ]);
    }
    println!("{}", Table::from(builder));
}

pub fn print_summary(summary: &ScheduleSummary) {
    print_fields(&[
        ("Installments", summary.installments.to_string()),
        ("First installment", summary.first_installment.to_string()),
        ("Last installment", summary.last_installment.to_string()),
        ("Total paid", summary.total_paid.to_string()),
        ("Total interest", summary.total_interest.to_string()),
    ]);
}

pub fn print_preview(preview: &FinancingPreview) {
    print_fields(&[
        ("Principal", preview.terms.principal.to_string()),
        ("Frequency", preview.terms.payment_frequency.to_string()),
        ("Installments", preview.terms.number_of_installments.to_string()),
        ("Installment amount", preview.installment_amount.to_string()),
        ("Last installment", preview.last_installment_amount.to_string()),
        ("Total payable", preview.total_payable.to_string()),
        ("Total interest", preview.total_interest.to_string()),
        ("Total cost", preview.total_cost.to_string()),
    ]);
}

pub fn print_report(report: &InstallmentReport) {
    let mut builder = Builder::default();
    builder.push_record([
        "#",
        "Due date",
        "Capital",
        "Amortization",
        "Interest",
        "Installment",
        "Status",
        "Paid",
        "Paid on",
    ]);
    for row in &report.rows {
        builder.push_record([
            row.installment_number.to_string(),
            row.due_date.to_string(),
            row.capital_at_period_start.to_string(),
            row.amortization.to_string(),
            row.interest_for_period.to_string(),
            row.installment_amount.to_string(),
            format!("{:?}", row.status).to_uppercase(),
            row.amount_paid.to_string(),
            row.paid_on.map(|d| d.to_string()).unwrap_or_default(),
        ]);
    }
    println!("{}", Table::from(builder));

    let totals = &report.totals;
    print_fields(&[
        ("Scheduled total", totals.scheduled_total.to_string()),
        ("Total paid", totals.total_paid.to_string()),
        ("Outstanding balance", totals.outstanding_balance.to_string()),
        ("Outstanding capital", totals.outstanding_capital.to_string()),
        (
            "Next due",
            totals
                .next_due_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ),
    ]);

    if !report.unmatched_payments.is_empty() {
        println!("\nUnmatched payments:");
        for payment in &report.unmatched_payments {
            println!(
                "  - installment {} amount {} on {}",
                payment.installment_number, payment.amount, payment.paid_on
            );
        }
    }
}

fn print_fields(fields: &[(&str, String)]) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (name, value) in fields {
        builder.push_record([name.to_string(), value.clone()]);
    }
    println!("{}", Table::from(builder));
}
