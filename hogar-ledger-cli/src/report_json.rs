use hogar_ledger_application::{BalanceReport, MemberDirectory};
use hogar_ledger_presentation::format_money;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ReportJson<'a> {
    pub viewer: &'a str,
    pub tolerance: String,
    pub counterparties: Vec<CounterpartyJson<'a>>,
    pub total_i_owe: String,
    pub total_owed_to_me: String,
    pub global_balance: String,
    pub spending: Vec<SpendingJson<'a>>,
    pub total_shared: String,
    pub booked_expenses: usize,
    pub warnings: Vec<String>,
    /// Input rows dropped while loading the snapshot.
    pub skipped_rows: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CounterpartyJson<'a> {
    pub member: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<&'a str>,
    pub i_owe_them: String,
    pub they_owe_me: String,
    /// Signed from the viewer's side like the text table: positive when this
    /// member owes the viewer.
    pub net: String,
}

#[derive(Debug, Serialize)]
pub struct SpendingJson<'a> {
    pub member: &'a str,
    pub paid: String,
}

impl<'a> ReportJson<'a> {
    pub fn new(report: &'a BalanceReport, member_directory: &'a dyn MemberDirectory) -> Self {
        Self {
            viewer: report.viewer.as_str(),
            tolerance: report.tolerance.to_string(),
            counterparties: report
                .counterparties()
                .iter()
                .map(|position| CounterpartyJson {
                    member: position.member.as_str(),
                    display_name: member_directory.display_name(&position.member),
                    i_owe_them: format_money(position.i_owe_them),
                    they_owe_me: format_money(position.they_owe_me),
                    net: format_money(-position.net),
                })
                .collect(),
            total_i_owe: format_money(report.total_i_owe()),
            total_owed_to_me: format_money(report.total_owed_to_me()),
            global_balance: format_money(report.global_balance()),
            spending: report
                .spending
                .per_member
                .iter()
                .map(|spending| SpendingJson {
                    member: spending.member.as_str(),
                    paid: format_money(spending.paid),
                })
                .collect(),
            total_shared: format_money(report.spending.total_shared),
            booked_expenses: report.spending.booked_expenses,
            warnings: report.warnings.iter().map(ToString::to_string).collect(),
            skipped_rows: Vec::new(),
        }
    }

    pub fn with_skipped_rows<R: ToString>(mut self, rows: &[R]) -> Self {
        self.skipped_rows = rows.iter().map(ToString::to_string).collect();
        self
    }
}
