use crate::{
    labels,
    text_table::{Alignment, TextTableBuilder},
};
use hogar_ledger_application::{BalanceReport, EmptyMemberDirectory, MemberDirectory};
use hogar_ledger_domain::{CounterpartyPosition, MemberId, Money};
use std::{
    borrow::Cow,
    fmt::{self, Write},
};

pub struct BalancePresenter;

impl BalancePresenter {
    pub fn render_without_names(report: &BalanceReport) -> String {
        Self::render(report, &EmptyMemberDirectory)
    }

    /// Counterparty table, totals, per-member spending and warnings.
    ///
    /// The `Net` column and the global balance are signed from the viewer's
    /// side: positive means the viewer is owed.
    pub fn render(report: &BalanceReport, member_directory: &dyn MemberDirectory) -> String {
        let mut out = String::with_capacity(512);

        if report.counterparties().is_empty() {
            out.push_str(labels::ALL_SETTLED);
            out.push('\n');
        } else {
            out.push_str(&Self::build_positions_table(
                report.counterparties(),
                member_directory,
            ));
        }

        out.push('\n');
        let _ = writeln!(
            out,
            "{}: {}",
            labels::TOTAL_OWED_TO_ME,
            format_money(report.total_owed_to_me())
        );
        let _ = writeln!(out, "{}: {}", labels::TOTAL_I_OWE, format_money(report.total_i_owe()));
        let _ = writeln!(
            out,
            "{}: {}",
            labels::GLOBAL_BALANCE,
            format_signed(report.global_balance())
        );

        out.push('\n');
        let _ = writeln!(
            out,
            "{} ({})",
            labels::SPENDING,
            report.spending.booked_expenses
        );
        out.push_str(&Self::build_spending_table(report, member_directory));
        let _ = writeln!(
            out,
            "{}: {}",
            labels::TOTAL_SHARED,
            format_money(report.spending.total_shared)
        );

        if !report.warnings.is_empty() {
            out.push('\n');
            out.push_str(labels::WARNINGS);
            out.push('\n');
            for warning in &report.warnings {
                let _ = writeln!(out, "- {warning}");
            }
        }

        out
    }

    /// Input rows dropped before the ledger ran; empty when there are none.
    pub fn render_skipped_rows<R: fmt::Display>(rows: &[R]) -> String {
        if rows.is_empty() {
            return String::new();
        }
        let mut out = String::new();
        out.push('\n');
        out.push_str(labels::SKIPPED_ROWS);
        out.push('\n');
        for row in rows {
            let _ = writeln!(out, "- {row}");
        }
        out
    }

    pub fn build_positions_table(
        positions: &[CounterpartyPosition],
        member_directory: &dyn MemberDirectory,
    ) -> String {
        let mut builder = TextTableBuilder::new()
            .alignments(&[
                Alignment::Left,
                Alignment::Right,
                Alignment::Right,
                Alignment::Right,
            ])
            .headers(&[
                Cow::Borrowed(labels::MEMBER),
                Cow::Borrowed(labels::THEY_OWE_ME),
                Cow::Borrowed(labels::I_OWE_THEM),
                Cow::Borrowed(labels::NET),
            ]);

        for position in positions {
            builder = builder.row([
                format_member_label(&position.member, member_directory),
                Cow::Owned(format_money(position.they_owe_me)),
                Cow::Owned(format_money(position.i_owe_them)),
                Cow::Owned(format_signed(-position.net)),
            ]);
        }

        builder.build()
    }

    pub fn build_spending_table(
        report: &BalanceReport,
        member_directory: &dyn MemberDirectory,
    ) -> String {
        let mut builder = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right])
            .headers(&[Cow::Borrowed(labels::MEMBER), Cow::Borrowed(labels::PAID)]);

        for spending in &report.spending.per_member {
            let label = format_member_label(&spending.member, member_directory);
            let label = if spending.member == report.viewer {
                Cow::Owned(format!("{label} ({})", labels::YOU))
            } else {
                label
            };
            builder = builder.row([label, Cow::Owned(format_money(spending.paid))]);
        }

        builder.build()
    }
}

/// Rounds half away from zero to cents and always prints two decimals.
pub fn format_money(amount: Money) -> String {
    let rounded = amount.round_to_cents();
    // Keeps -0.004 from printing as "-0.00".
    let rounded = if rounded.is_zero() { Money::ZERO } else { rounded };
    format!("{:.2}", rounded.as_decimal())
}

fn format_signed(amount: Money) -> String {
    let formatted = format_money(amount);
    if formatted.starts_with('-') || amount.round_to_cents().is_zero() {
        formatted
    } else {
        format!("+{formatted}")
    }
}

fn format_member_label<'a>(
    member_id: &MemberId,
    member_directory: &'a dyn MemberDirectory,
) -> Cow<'a, str> {
    match member_directory.display_name(member_id) {
        Some(name) => Cow::Borrowed(name),
        None => {
            let short: String = member_id.as_str().chars().take(8).collect();
            Cow::Owned(format!("{} ({short})", labels::FALLBACK_MEMBER))
        }
    }
}
