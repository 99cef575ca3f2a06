use crate::{
    model::{DebtMatrix, MemberId, Money},
    services::MemberRegistry,
};

/// Netted position between the viewer and one counterparty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterpartyPosition {
    pub member: MemberId,
    pub i_owe_them: Money,
    pub they_owe_me: Money,
    /// `i_owe_them - they_owe_me`; positive means the viewer owes.
    pub net: Money,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NetPositions {
    pub counterparties: Vec<CounterpartyPosition>,
    pub total_i_owe: Money,
    pub total_owed_to_me: Money,
    /// `total_owed_to_me - total_i_owe`; positive means the viewer is owed.
    pub global_balance: Money,
}

/// Collapses the directed debt matrix into the viewer's per-counterparty view.
#[derive(Clone, Copy, Debug)]
pub struct NetBalanceCalculator {
    tolerance: Money,
}

impl NetBalanceCalculator {
    /// Nets with `|net| <= tolerance` are treated as settled.
    pub fn new(tolerance: Money) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }

    pub fn tolerance(&self) -> Money {
        self.tolerance
    }

    pub fn is_negligible(&self, net: Money) -> bool {
        net.abs() <= self.tolerance
    }

    /// Raw net between two members, no tolerance applied.
    pub fn pairwise_net(matrix: &DebtMatrix, viewer: &MemberId, other: &MemberId) -> Money {
        matrix.get(viewer, other).saturating_sub(matrix.get(other, viewer))
    }

    pub fn net_positions(
        &self,
        matrix: &DebtMatrix,
        viewer: &MemberId,
        registry: &MemberRegistry,
    ) -> NetPositions {
        let mut positions = NetPositions::default();

        for other in registry.others(viewer) {
            let i_owe_them = matrix.get(viewer, other);
            let they_owe_me = matrix.get(other, viewer);
            let net = i_owe_them.saturating_sub(they_owe_me);
            if self.is_negligible(net) {
                continue;
            }

            positions.total_i_owe = positions.total_i_owe.saturating_add(net.positive_part());
            positions.total_owed_to_me = positions
                .total_owed_to_me
                .saturating_add((-net).positive_part());
            positions.counterparties.push(CounterpartyPosition {
                member: other.clone(),
                i_owe_them,
                they_owe_me,
                net,
            });
        }

        positions.global_balance = positions
            .total_owed_to_me
            .saturating_sub(positions.total_i_owe);
        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    const ALICE: &str = "alice-uuid-0001";
    const BOB: &str = "bob-uuid-000002";
    const CAROL: &str = "carol-uuid-0003";

    #[fixture]
    fn calculator() -> NetBalanceCalculator {
        NetBalanceCalculator::new(Money::new(1, 2))
    }

    fn registry() -> MemberRegistry {
        let mut registry = MemberRegistry::new(MemberId::from(ALICE));
        registry.insert(MemberId::from(BOB));
        registry.insert(MemberId::from(CAROL));
        registry
    }

    fn matrix(edges: &[(&str, &str, Money)]) -> DebtMatrix {
        let mut matrix = DebtMatrix::new();
        for (debtor, creditor, amount) in edges {
            matrix.add(&MemberId::from(*debtor), &MemberId::from(*creditor), *amount);
        }
        matrix
    }

    #[rstest]
    fn nets_both_directions(calculator: NetBalanceCalculator) {
        let matrix = matrix(&[
            (BOB, ALICE, Money::from_i64(50)),
            (ALICE, BOB, Money::from_i64(20)),
            (ALICE, CAROL, Money::from_i64(15)),
        ]);

        let positions = calculator.net_positions(&matrix, &MemberId::from(ALICE), &registry());

        assert_eq!(
            positions.counterparties,
            vec![
                CounterpartyPosition {
                    member: MemberId::from(BOB),
                    i_owe_them: Money::from_i64(20),
                    they_owe_me: Money::from_i64(50),
                    net: Money::from_i64(-30),
                },
                CounterpartyPosition {
                    member: MemberId::from(CAROL),
                    i_owe_them: Money::from_i64(15),
                    they_owe_me: Money::ZERO,
                    net: Money::from_i64(15),
                },
            ]
        );
        assert_eq!(positions.total_owed_to_me, Money::from_i64(30));
        assert_eq!(positions.total_i_owe, Money::from_i64(15));
        assert_eq!(positions.global_balance, Money::from_i64(15));
    }

    #[rstest]
    #[case::exactly_at_tolerance(Money::new(1, 2), false)]
    #[case::one_cent_above(Money::new(2, 2), true)]
    #[case::below(Money::new(5, 3), false)]
    #[case::negative_at_tolerance(Money::new(-1, 2), false)]
    #[case::negative_above(Money::new(-2, 2), true)]
    fn tolerance_boundary(
        calculator: NetBalanceCalculator,
        #[case] bob_owes_alice: Money,
        #[case] visible: bool,
    ) {
        let matrix = matrix(&[(BOB, ALICE, bob_owes_alice)]);

        let positions = calculator.net_positions(&matrix, &MemberId::from(ALICE), &registry());

        assert_eq!(!positions.counterparties.is_empty(), visible);
        if !visible {
            assert_eq!(positions.global_balance, Money::ZERO);
        }
    }

    #[rstest]
    fn overpaid_edge_flips_direction(calculator: NetBalanceCalculator) {
        let matrix = matrix(&[(BOB, ALICE, Money::from_i64(-10))]);

        let positions = calculator.net_positions(&matrix, &MemberId::from(ALICE), &registry());

        assert_eq!(positions.counterparties.len(), 1);
        assert_eq!(positions.counterparties[0].net, Money::from_i64(10));
        assert_eq!(positions.global_balance, Money::from_i64(-10));
    }

    #[rstest]
    fn viewer_perspectives_mirror(calculator: NetBalanceCalculator) {
        let matrix = matrix(&[
            (BOB, ALICE, Money::from_i64(50)),
            (CAROL, BOB, Money::from_i64(7)),
        ]);
        let registry = registry();

        let total: Money = registry
            .iter()
            .map(|viewer| calculator.net_positions(&matrix, viewer, &registry).global_balance)
            .sum();

        assert_eq!(total, Money::ZERO);
        assert_eq!(
            NetBalanceCalculator::pairwise_net(&matrix, &MemberId::from(BOB), &MemberId::from(ALICE)),
            Money::from_i64(50)
        );
    }

    #[rstest]
    fn extreme_edges_saturate(calculator: NetBalanceCalculator) {
        let matrix = matrix(&[
            (ALICE, BOB, Money::MAX),
            (BOB, ALICE, -Money::MAX),
            (ALICE, CAROL, Money::MAX),
        ]);

        let positions = calculator.net_positions(&matrix, &MemberId::from(ALICE), &registry());

        assert_eq!(positions.counterparties[0].net, Money::MAX);
        assert_eq!(positions.total_i_owe, Money::MAX);
        assert_eq!(positions.global_balance, -Money::MAX);
    }

    #[test]
    fn negative_tolerance_is_taken_as_magnitude() {
        let calculator = NetBalanceCalculator::new(Money::new(-1, 1));
        assert_eq!(calculator.tolerance(), Money::new(1, 1));
        assert!(calculator.is_negligible(Money::new(1, 1)));
    }
}
