use crate::error::LedgerWarning;
use fxhash::FxHashMap;
use hogar_ledger_domain::{
    CounterpartyPosition, Expense, ExpenseId, Member, MemberId, Money, NetPositions, Settlement,
};

/// Everything one balance query reads, already scoped to a single household.
///
/// Record order is irrelevant to the result.
#[derive(Clone, Debug)]
pub struct LedgerSnapshot {
    pub home: MemberId,
    pub linked_partners: Vec<MemberId>,
    /// Profiles used for display names only; they do not widen the split.
    pub members: Vec<Member>,
    pub expenses: Vec<Expense>,
    pub settlements: Vec<Settlement>,
}

impl LedgerSnapshot {
    pub fn new(home: MemberId) -> Self {
        Self {
            home,
            linked_partners: Vec::new(),
            members: Vec::new(),
            expenses: Vec::new(),
            settlements: Vec::new(),
        }
    }

    pub fn display_names(&self) -> FxHashMap<MemberId, String> {
        self.members
            .iter()
            .filter_map(|member| {
                member
                    .display_name
                    .as_ref()
                    .map(|name| (member.id.clone(), name.clone()))
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberSpending {
    pub member: MemberId,
    pub paid: Money,
}

/// How much each member fronted across the expenses that were booked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpendingSummary {
    /// Registry order; members who paid nothing are listed with zero.
    pub per_member: Vec<MemberSpending>,
    pub total_shared: Money,
    pub booked_expenses: usize,
}

impl SpendingSummary {
    pub fn paid_by(&self, member: &MemberId) -> Money {
        self.per_member
            .iter()
            .find(|spending| &spending.member == member)
            .map_or(Money::ZERO, |spending| spending.paid)
    }
}

/// Result of one balance query from the viewer's perspective.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BalanceReport {
    pub viewer: MemberId,
    /// Split denominator members, in registry order.
    pub registry: Vec<MemberId>,
    pub tolerance: Money,
    pub positions: NetPositions,
    pub spending: SpendingSummary,
    pub warnings: Vec<LedgerWarning>,
}

impl BalanceReport {
    pub fn counterparties(&self) -> &[CounterpartyPosition] {
        &self.positions.counterparties
    }

    pub fn counterparty(&self, member: &MemberId) -> Option<&CounterpartyPosition> {
        self.positions
            .counterparties
            .iter()
            .find(|position| &position.member == member)
    }

    pub fn total_i_owe(&self) -> Money {
        self.positions.total_i_owe
    }

    pub fn total_owed_to_me(&self) -> Money {
        self.positions.total_owed_to_me
    }

    pub fn global_balance(&self) -> Money {
        self.positions.global_balance
    }

    /// Expenses left out of the ledger because nobody could be named as payer.
    pub fn unresolvable_expenses(&self) -> impl Iterator<Item = &ExpenseId> + '_ {
        self.warnings.iter().filter_map(|warning| match warning {
            LedgerWarning::UnresolvablePayer { expense, .. } => Some(expense),
            _ => None,
        })
    }

    /// Expenses booked against a guessed payer.
    pub fn low_confidence_expenses(&self) -> impl Iterator<Item = &ExpenseId> + '_ {
        self.warnings.iter().filter_map(|warning| match warning {
            LedgerWarning::LowConfidenceResolution { expense, .. } => Some(expense),
            _ => None,
        })
    }

    pub fn skipped_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|warning| warning.is_skip())
            .count()
    }
}
