use crate::{
    model::{DebtMatrix, MemberId, Settlement},
    services::MemberRegistry,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettlementRejection {
    NegativeAmount,
    SamePayerAndReceiver,
    /// Payer or receiver is not part of the registry.
    UnknownParty(MemberId),
    /// The reduced edge would leave the `Money` range.
    Overflow,
}

/// Applies direct payments to the single `payer -> receiver` edge.
pub struct SettlementReducer;

impl SettlementReducer {
    /// `matrix[payer][receiver] -= amount`.
    ///
    /// The edge is allowed to go negative. Netting against the reverse
    /// direction is left to `NetBalanceCalculator`.
    pub fn apply(
        &self,
        matrix: &mut DebtMatrix,
        settlement: &Settlement,
        registry: &MemberRegistry,
    ) -> Result<(), SettlementRejection> {
        if settlement.amount.is_negative() {
            return Err(SettlementRejection::NegativeAmount);
        }
        if settlement.payer == settlement.receiver {
            return Err(SettlementRejection::SamePayerAndReceiver);
        }
        for party in [&settlement.payer, &settlement.receiver] {
            if !registry.contains(party) {
                return Err(SettlementRejection::UnknownParty(party.clone()));
            }
        }

        let edge = matrix.get(&settlement.payer, &settlement.receiver);
        if edge.checked_sub(settlement.amount).is_none() {
            tracing::debug!(
                settlement = %settlement.id,
                edge = %edge,
                amount = %settlement.amount,
                "Settlement would overflow the debt edge"
            );
            return Err(SettlementRejection::Overflow);
        }

        matrix.subtract(&settlement.payer, &settlement.receiver, settlement.amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Money, SettlementId};
    use rstest::rstest;

    const ALICE: &str = "alice-uuid-0001";
    const BOB: &str = "bob-uuid-000002";
    const CAROL: &str = "carol-uuid-0003";
    const DAVE: &str = "dave-uuid-00004";

    fn registry() -> MemberRegistry {
        let mut registry = MemberRegistry::new(MemberId::from(ALICE));
        registry.insert(MemberId::from(BOB));
        registry.insert(MemberId::from(CAROL));
        registry
    }

    fn settlement(payer: &str, receiver: &str, amount: Money) -> Settlement {
        Settlement {
            id: SettlementId::from("s1"),
            payer: MemberId::from(payer),
            receiver: MemberId::from(receiver),
            amount,
        }
    }

    fn seeded_matrix() -> DebtMatrix {
        let mut matrix = DebtMatrix::new();
        matrix.add(&MemberId::from(BOB), &MemberId::from(ALICE), Money::from_i64(50));
        matrix.add(&MemberId::from(ALICE), &MemberId::from(BOB), Money::from_i64(20));
        matrix.add(&MemberId::from(CAROL), &MemberId::from(ALICE), Money::from_i64(30));
        matrix
    }

    #[rstest]
    #[case::partial(Money::from_i64(20), Money::from_i64(30))]
    #[case::exact(Money::from_i64(50), Money::ZERO)]
    #[case::overpayment(Money::from_i64(80), Money::from_i64(-30))]
    fn reduces_only_the_payer_to_receiver_edge(#[case] paid: Money, #[case] remaining: Money) {
        let registry = registry();
        let mut matrix = seeded_matrix();

        SettlementReducer
            .apply(&mut matrix, &settlement(BOB, ALICE, paid), &registry)
            .expect("valid settlement");

        assert_eq!(
            matrix.get(&MemberId::from(BOB), &MemberId::from(ALICE)),
            remaining
        );
        assert_eq!(
            matrix.get(&MemberId::from(ALICE), &MemberId::from(BOB)),
            Money::from_i64(20)
        );
        assert_eq!(
            matrix.get(&MemberId::from(CAROL), &MemberId::from(ALICE)),
            Money::from_i64(30)
        );
    }

    #[test]
    fn settlement_without_prior_debt_creates_negative_edge() {
        let registry = registry();
        let mut matrix = DebtMatrix::new();

        SettlementReducer
            .apply(&mut matrix, &settlement(CAROL, BOB, Money::from_i64(10)), &registry)
            .expect("valid settlement");

        assert_eq!(
            matrix.get(&MemberId::from(CAROL), &MemberId::from(BOB)),
            Money::from_i64(-10)
        );
        assert_eq!(
            matrix.get(&MemberId::from(BOB), &MemberId::from(CAROL)),
            Money::ZERO
        );
    }

    #[rstest]
    #[case::negative(
        settlement(BOB, ALICE, Money::from_i64(-1)),
        SettlementRejection::NegativeAmount
    )]
    #[case::self_payment(
        settlement(BOB, BOB, Money::from_i64(10)),
        SettlementRejection::SamePayerAndReceiver
    )]
    #[case::unknown_receiver(
        settlement(BOB, DAVE, Money::from_i64(10)),
        SettlementRejection::UnknownParty(MemberId::from(DAVE))
    )]
    #[case::unknown_payer(
        settlement(DAVE, ALICE, Money::from_i64(10)),
        SettlementRejection::UnknownParty(MemberId::from(DAVE))
    )]
    fn rejected_settlements_leave_matrix_untouched(
        #[case] settlement: Settlement,
        #[case] expected: SettlementRejection,
    ) {
        let registry = registry();
        let mut matrix = seeded_matrix();

        let result = SettlementReducer.apply(&mut matrix, &settlement, &registry);

        assert_eq!(result, Err(expected));
        assert_eq!(matrix, seeded_matrix());
    }

    #[test]
    fn overflowing_settlement_is_rejected() {
        let registry = registry();
        let carol = MemberId::from(CAROL);
        let bob = MemberId::from(BOB);
        let mut matrix = DebtMatrix::new();
        matrix.subtract(&carol, &bob, Money::MAX);

        let result = SettlementReducer.apply(
            &mut matrix,
            &settlement(CAROL, BOB, Money::from_i64(1)),
            &registry,
        );

        assert_eq!(result, Err(SettlementRejection::Overflow));
        assert_eq!(matrix.get(&carol, &bob), -Money::MAX);
    }
}
