use hogar_ledger_domain::{ExpenseId, MemberId, Money, SettlementId, UnresolvableReason};
use thiserror::Error;

/// A record the ledger skipped or could only partially trust.
///
/// None of these abort a query; they are collected on the report so callers
/// can surface them next to the balances.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LedgerWarning {
    #[error("expense {expense}: payer reference {raw:?} could not be resolved ({reason:?})")]
    UnresolvablePayer {
        expense: ExpenseId,
        raw: String,
        reason: UnresolvableReason,
    },
    #[error("expense {expense}: legacy payer guessed as {chosen}")]
    LowConfidenceResolution { expense: ExpenseId, chosen: MemberId },
    #[error("expense {expense}: negative amount {amount} ignored")]
    NegativeExpenseAmount { expense: ExpenseId, amount: Money },
    #[error("expense {expense}: amount {amount} overflows the ledger totals, ignored")]
    ExpenseOverflow { expense: ExpenseId, amount: Money },
    #[error("settlement {settlement}: negative amount {amount} ignored")]
    NegativeSettlementAmount {
        settlement: SettlementId,
        amount: Money,
    },
    #[error("settlement {settlement}: amount {amount} overflows the debt edge, ignored")]
    SettlementOverflow {
        settlement: SettlementId,
        amount: Money,
    },
    #[error("settlement {settlement}: payer and receiver are the same member")]
    SelfSettlement { settlement: SettlementId },
    #[error("settlement {settlement}: {member} is not part of the household")]
    UnknownSettlementParty {
        settlement: SettlementId,
        member: MemberId,
    },
    #[error("viewer {viewer} is not part of the household")]
    ViewerNotInRegistry { viewer: MemberId },
}

impl LedgerWarning {
    /// Expense the warning refers to, if any.
    pub fn expense(&self) -> Option<&ExpenseId> {
        match self {
            Self::UnresolvablePayer { expense, .. }
            | Self::LowConfidenceResolution { expense, .. }
            | Self::NegativeExpenseAmount { expense, .. }
            | Self::ExpenseOverflow { expense, .. } => Some(expense),
            _ => None,
        }
    }

    /// Whether the referenced record was left out of the ledger.
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            Self::UnresolvablePayer { .. }
                | Self::NegativeExpenseAmount { .. }
                | Self::ExpenseOverflow { .. }
                | Self::NegativeSettlementAmount { .. }
                | Self::SettlementOverflow { .. }
                | Self::SelfSettlement { .. }
                | Self::UnknownSettlementParty { .. }
        )
    }
}
