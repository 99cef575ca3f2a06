//! JSON export of one household's rows, shaped like the storage tables.
//!
//! ```json
//! {
//!   "home": "...",
//!   "linked_partners": ["..."],
//!   "partners": [{ "user_id_1": "...", "user_id_2": "..." }],
//!   "profiles": [{ "id": "...", "nickname": "Ana" }],
//!   "expenses": [{ "id": "e1", "amount": "12.50", "user_id": "...", "paid_by": "Mi" }],
//!   "settlements": [{ "id": "s1", "payer_id": "...", "receiver_id": "...", "amount": 10 }],
//!   "viewer": "..."
//! }
//! ```

use arcstr::ArcStr;
use hogar_ledger_application::LedgerSnapshot;
use hogar_ledger_domain::{Expense, ExpenseId, Member, MemberId, Money, Settlement, SettlementId};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotLoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{record} has an empty `{field}`")]
    EmptyId {
        record: String,
        field: &'static str,
    },
}

/// A row that was dropped while loading; the rest of the file still loads.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LoadWarning {
    #[error("{record}: missing or invalid `{field}`, row skipped")]
    InvalidField {
        record: String,
        field: &'static str,
    },
    #[error("{record} is not an object, row skipped")]
    MalformedRow { record: String },
}

/// A parsed snapshot and the member whose balances were asked for.
#[derive(Clone, Debug)]
pub struct LoadedSnapshot {
    pub snapshot: LedgerSnapshot,
    /// `viewer` from the file, or `home` when absent.
    pub viewer: MemberId,
    pub warnings: Vec<LoadWarning>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Row<T> {
    Parsed(T),
    Invalid(serde_json::Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawField {
    Text(String),
    Number(serde_json::Number),
    Other(serde_json::Value),
}

impl RawField {
    /// Trimmed text; blank strings and non-scalar values are `None`.
    fn into_text(self) -> Option<String> {
        let text = self.into_raw()?;
        let trimmed = text.trim();
        match trimmed.len() {
            0 => None,
            len if len == text.len() => Some(text),
            _ => Some(trimmed.to_owned()),
        }
    }

    fn into_raw(self) -> Option<String> {
        match self {
            RawField::Text(text) => Some(text),
            RawField::Number(number) => Some(number.to_string()),
            RawField::Other(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Decimal(Decimal),
    Other(serde_json::Value),
}

impl RawAmount {
    fn into_decimal(self) -> Option<Decimal> {
        match self {
            RawAmount::Decimal(amount) => Some(amount),
            RawAmount::Other(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SnapshotRecord {
    home: String,
    #[serde(default)]
    linked_partners: Vec<Option<RawField>>,
    #[serde(default)]
    partners: Vec<Row<PartnerLinkRecord>>,
    #[serde(default)]
    profiles: Vec<Row<ProfileRecord>>,
    #[serde(default)]
    expenses: Vec<Row<ExpenseRecord>>,
    #[serde(default)]
    settlements: Vec<Row<SettlementRecord>>,
    #[serde(default)]
    viewer: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PartnerLinkRecord {
    #[serde(default)]
    user_id_1: Option<RawField>,
    #[serde(default)]
    user_id_2: Option<RawField>,
}

#[derive(Debug, Deserialize)]
struct ProfileRecord {
    #[serde(default)]
    id: Option<RawField>,
    #[serde(default)]
    nickname: Option<RawField>,
}

#[derive(Debug, Deserialize)]
struct ExpenseRecord {
    #[serde(default)]
    id: Option<RawField>,
    #[serde(default)]
    amount: Option<RawAmount>,
    #[serde(default)]
    user_id: Option<RawField>,
    #[serde(default)]
    paid_by: Option<RawField>,
    #[serde(default)]
    date: Option<RawField>,
}

#[derive(Debug, Deserialize)]
struct SettlementRecord {
    #[serde(default)]
    id: Option<RawField>,
    #[serde(default)]
    payer_id: Option<RawField>,
    #[serde(default)]
    receiver_id: Option<RawField>,
    #[serde(default)]
    amount: Option<RawAmount>,
}

pub fn load_snapshot(path: impl AsRef<Path>) -> Result<LoadedSnapshot, SnapshotLoadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| SnapshotLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "Read snapshot file");
    parse_snapshot(&content)
}

/// Parses a snapshot document.
///
/// Only an unreadable document or a blank `home`/`viewer` fails the load.
/// Rows with a missing, null or mistyped required field are dropped and
/// reported in [`LoadedSnapshot::warnings`].
pub fn parse_snapshot(content: &str) -> Result<LoadedSnapshot, SnapshotLoadError> {
    let record: SnapshotRecord = serde_json::from_str(content)?;
    let home = member_id("snapshot", "home", record.home)?;
    let mut warnings = Vec::new();

    let mut linked_partners = Vec::new();
    let listed = collect_rows(record.linked_partners, linked_partner, &mut warnings);
    // Link rows store the pair in either column order.
    let links = collect_rows(
        record.partners,
        |position, row| parsed("partner link", position, row),
        &mut warnings,
    );
    let link_sides = links
        .into_iter()
        .flat_map(|link| [link.user_id_1, link.user_id_2])
        .flatten()
        .filter_map(RawField::into_text)
        .map(MemberId::new);
    for partner in listed.into_iter().chain(link_sides) {
        push_partner(&mut linked_partners, &home, partner);
    }

    let members = collect_rows(record.profiles, member, &mut warnings);
    let expenses = collect_rows(record.expenses, expense, &mut warnings);
    let settlements = collect_rows(record.settlements, settlement, &mut warnings);

    let viewer = match record.viewer {
        Some(viewer) => member_id("snapshot", "viewer", viewer)?,
        None => home.clone(),
    };

    tracing::debug!(
        home = %home,
        partner_count = linked_partners.len(),
        expense_count = expenses.len(),
        settlement_count = settlements.len(),
        skipped_rows = warnings.len(),
        "Parsed snapshot"
    );

    Ok(LoadedSnapshot {
        snapshot: LedgerSnapshot {
            home,
            linked_partners,
            members,
            expenses,
            settlements,
        },
        viewer,
        warnings,
    })
}

/// Keeps the rows that convert; the rest become warnings. `position` is 1-based.
fn collect_rows<R, T>(
    rows: Vec<R>,
    convert: impl Fn(usize, R) -> Result<T, LoadWarning>,
    warnings: &mut Vec<LoadWarning>,
) -> Vec<T> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match convert(index + 1, row) {
            Ok(item) => Some(item),
            Err(warning) => {
                tracing::warn!("Skipping snapshot row: {warning}");
                warnings.push(warning);
                None
            }
        })
        .collect()
}

fn record_name(kind: &str, position: usize, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("{kind} {id}"),
        None => format!("{kind} #{position}"),
    }
}

fn parsed<T>(kind: &str, position: usize, row: Row<T>) -> Result<T, LoadWarning> {
    match row {
        Row::Parsed(record) => Ok(record),
        Row::Invalid(_) => Err(LoadWarning::MalformedRow {
            record: record_name(kind, position, None),
        }),
    }
}

fn required<T>(value: Option<T>, record: &str, field: &'static str) -> Result<T, LoadWarning> {
    value.ok_or_else(|| LoadWarning::InvalidField {
        record: record.to_owned(),
        field,
    })
}

fn linked_partner(position: usize, raw: Option<RawField>) -> Result<MemberId, LoadWarning> {
    let record = record_name("linked partner", position, None);
    required(raw.and_then(RawField::into_text), &record, "linked_partners").map(MemberId::new)
}

fn member(position: usize, row: Row<ProfileRecord>) -> Result<Member, LoadWarning> {
    let profile = parsed("profile", position, row)?;
    let record = record_name("profile", position, None);
    Ok(Member {
        id: MemberId::new(required(profile.id.and_then(RawField::into_text), &record, "id")?),
        display_name: profile.nickname.and_then(RawField::into_text),
    })
}

fn expense(position: usize, row: Row<ExpenseRecord>) -> Result<Expense, LoadWarning> {
    let expense = parsed("expense", position, row)?;
    let id = expense.id.and_then(RawField::into_text);
    let record = record_name("expense", position, id.as_deref());
    Ok(Expense {
        id: ExpenseId::new(required(id, &record, "id")?),
        amount: Money::from_decimal(required(
            expense.amount.and_then(RawAmount::into_decimal),
            &record,
            "amount",
        )?),
        recorded_by: MemberId::new(required(
            expense.user_id.and_then(RawField::into_text),
            &record,
            "user_id",
        )?),
        // Untrimmed; the resolver classifies blank and unknown tokens.
        payer_ref: expense.paid_by.and_then(RawField::into_raw).map(ArcStr::from),
        date: expense.date.and_then(RawField::into_text).map(ArcStr::from),
    })
}

fn settlement(position: usize, row: Row<SettlementRecord>) -> Result<Settlement, LoadWarning> {
    let settlement = parsed("settlement", position, row)?;
    let id = settlement.id.and_then(RawField::into_text);
    let record = record_name("settlement", position, id.as_deref());
    Ok(Settlement {
        id: SettlementId::new(required(id, &record, "id")?),
        payer: MemberId::new(required(
            settlement.payer_id.and_then(RawField::into_text),
            &record,
            "payer_id",
        )?),
        receiver: MemberId::new(required(
            settlement.receiver_id.and_then(RawField::into_text),
            &record,
            "receiver_id",
        )?),
        amount: Money::from_decimal(required(
            settlement.amount.and_then(RawAmount::into_decimal),
            &record,
            "amount",
        )?),
    })
}

fn push_partner(partners: &mut Vec<MemberId>, home: &MemberId, candidate: MemberId) {
    if &candidate != home && !partners.contains(&candidate) {
        partners.push(candidate);
    }
}

fn member_id(
    record: &str,
    field: &'static str,
    raw: String,
) -> Result<MemberId, SnapshotLoadError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SnapshotLoadError::EmptyId {
            record: record.to_owned(),
            field,
        });
    }
    if trimmed.len() == raw.len() {
        Ok(MemberId::new(raw))
    } else {
        Ok(MemberId::new(trimmed))
    }
}
