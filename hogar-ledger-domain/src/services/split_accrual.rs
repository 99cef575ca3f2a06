use crate::{
    model::{DebtMatrix, Expense, MemberId, Money},
    services::MemberRegistry,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccrualRejection {
    NegativeAmount,
    /// A debtor's edge towards the payer would leave the `Money` range.
    Overflow,
}

/// Splits each expense evenly across the registry and books
/// "debtor owes payer" edges.
pub struct SplitAccrual;

impl SplitAccrual {
    /// Adds `amount / |registry|` to `matrix[m][payer]` for every other member `m`.
    ///
    /// Returns the per-member share. The payer never owes themself; their own
    /// share simply stays unbooked.
    pub fn accrue(
        &self,
        matrix: &mut DebtMatrix,
        expense: &Expense,
        payer: &MemberId,
        registry: &MemberRegistry,
    ) -> Result<Money, AccrualRejection> {
        if expense.amount.is_negative() {
            return Err(AccrualRejection::NegativeAmount);
        }

        let share = expense.amount.split_evenly(registry.split_denominator());
        // All or nothing: one overflowing edge rejects the whole expense.
        if let Some(debtor) = registry
            .others(payer)
            .find(|debtor| !matrix.can_add(debtor, payer, share))
        {
            tracing::debug!(
                expense = %expense.id,
                debtor = %debtor,
                payer = %payer,
                share = %share,
                "Share would overflow the debt edge"
            );
            return Err(AccrualRejection::Overflow);
        }
        for debtor in registry.others(payer) {
            matrix.add(debtor, payer, share);
        }
        Ok(share)
    }
}
