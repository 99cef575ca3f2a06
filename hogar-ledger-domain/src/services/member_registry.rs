use crate::{
    model::{Expense, MemberId, PayerReference},
    services::LegacySentinels,
};
use fxhash::FxBuildHasher;
use indexmap::IndexSet;

/// The fixed, deduplicated set of members one balance query splits over.
///
/// Iteration order is stable: the home member first, then linked partners in
/// the order given, then ids first observed in the expense history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberRegistry {
    home: MemberId,
    members: IndexSet<MemberId, FxBuildHasher>,
}

impl MemberRegistry {
    /// Union of the home member, linked partners, every `recorded_by`, and
    /// every explicit member payer reference found in `expenses`.
    ///
    /// Historical payers that were never linked as partners still count
    /// towards the split denominator.
    pub fn build<'e, P, E>(
        home: MemberId,
        linked_partners: P,
        expenses: E,
        sentinels: &LegacySentinels,
    ) -> Self
    where
        P: IntoIterator<Item = MemberId>,
        E: IntoIterator<Item = &'e Expense>,
    {
        let mut registry = Self::new(home);
        for partner in linked_partners {
            registry.insert(partner);
        }
        for expense in expenses {
            registry.insert(expense.recorded_by.clone());
            if let PayerReference::ExplicitMember(id) =
                PayerReference::classify(expense.payer_ref.as_deref(), sentinels)
            {
                registry.insert(id);
            }
        }
        registry
    }

    pub fn new(home: MemberId) -> Self {
        let mut members = IndexSet::with_hasher(FxBuildHasher::default());
        members.insert(home.clone());
        Self { home, members }
    }

    pub fn insert(&mut self, member: MemberId) -> bool {
        self.members.insert(member)
    }

    pub fn home(&self) -> &MemberId {
        &self.home
    }

    pub fn contains(&self, member: &MemberId) -> bool {
        self.members.contains(member)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Denominator for even splits, never below one.
    pub fn split_denominator(&self) -> usize {
        self.members.len().max(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemberId> + '_ {
        self.members.iter()
    }

    /// Registry members except `excluded`, in registry order.
    pub fn others<'a>(
        &'a self,
        excluded: &'a MemberId,
    ) -> impl Iterator<Item = &'a MemberId> + 'a {
        self.members.iter().filter(move |member| *member != excluded)
    }
}
