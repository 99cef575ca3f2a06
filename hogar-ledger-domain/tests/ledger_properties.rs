use hogar_ledger_domain::{
    DebtMatrix, Expense, ExpenseId, LegacySentinels, MemberId, MemberRegistry, Money,
    NetBalanceCalculator, PayerResolver, Settlement, SettlementId, SettlementReducer,
    SplitAccrual,
};
use proptest::prelude::*;

fn member(idx: usize) -> MemberId {
    MemberId::new(format!("member-uuid-{idx:04}"))
}

fn registry_of(member_count: usize) -> MemberRegistry {
    let mut registry = MemberRegistry::new(member(0));
    for idx in 1..member_count {
        registry.insert(member(idx));
    }
    registry
}

fn cents(value: u64) -> Money {
    Money::new(value as i64, 2)
}

fn build_matrix(
    registry: &MemberRegistry,
    expenses: &[Expense],
    settlements: &[Settlement],
) -> DebtMatrix {
    let sentinels = LegacySentinels::default();
    let resolver = PayerResolver::new(registry, &sentinels);
    let mut matrix = DebtMatrix::new();
    for expense in expenses {
        if let Some(payer) = resolver.resolve(expense).payer() {
            let _ = SplitAccrual.accrue(&mut matrix, expense, payer, registry);
        }
    }
    for settlement in settlements {
        let _ = SettlementReducer.apply(&mut matrix, settlement, registry);
    }
    matrix
}

proptest! {
    #[test]
    fn nets_cancel_across_all_viewers(
        member_count in 1usize..=6,
        expenses in prop::collection::vec((0u64..=100_000, 0usize..6, 0usize..6), 0..=25),
        settlements in prop::collection::vec((0u64..=50_000, 0usize..6, 0usize..6), 0..=10),
    ) {
        let registry = registry_of(member_count);
        let expenses: Vec<Expense> = expenses
            .into_iter()
            .enumerate()
            .map(|(idx, (amount, recorder, payer))| Expense {
                id: ExpenseId::new(format!("e{idx}")),
                amount: cents(amount),
                recorded_by: member(recorder % member_count),
                payer_ref: Some(member(payer % member_count).0),
                date: None,
            })
            .collect();
        let settlements: Vec<Settlement> = settlements
            .into_iter()
            .enumerate()
            .map(|(idx, (amount, payer, receiver))| Settlement {
                id: SettlementId::new(format!("s{idx}")),
                payer: member(payer % member_count),
                receiver: member(receiver % member_count),
                amount: cents(amount),
            })
            .collect();

        let matrix = build_matrix(&registry, &expenses, &settlements);
        let calculator = NetBalanceCalculator::new(Money::ZERO);

        let mut total = Money::ZERO;
        for viewer in registry.iter() {
            let positions = calculator.net_positions(&matrix, viewer, &registry);
            let breakdown: Money = positions.counterparties.iter().map(|p| p.net).sum();
            prop_assert_eq!(positions.global_balance.round_to_cents(), (-breakdown).round_to_cents());
            total += breakdown;
        }
        prop_assert_eq!(total.round_to_cents(), Money::ZERO);
    }

    #[test]
    fn single_expense_splits_evenly(
        member_count in 1usize..=8,
        amount in 0u64..=1_000_000,
        payer_idx in 0usize..8,
    ) {
        let registry = registry_of(member_count);
        let payer = member(payer_idx % member_count);
        let expense = Expense {
            id: ExpenseId::from("e1"),
            amount: cents(amount),
            recorded_by: payer.clone(),
            payer_ref: Some(arcstr::literal!("Mi")),
            date: None,
        };

        let matrix = build_matrix(&registry, std::slice::from_ref(&expense), &[]);
        let share = cents(amount).split_evenly(member_count);

        for debtor in registry.iter() {
            for creditor in registry.iter() {
                let expected = if creditor == &payer && debtor != &payer {
                    share
                } else {
                    Money::ZERO
                };
                prop_assert_eq!(matrix.get(debtor, creditor), expected);
            }
        }
    }

    #[test]
    fn settlement_touches_a_single_cell(
        member_count in 2usize..=6,
        seed in prop::collection::vec((0u64..=10_000, 0usize..6), 1..=10),
        amount in 0u64..=20_000,
        from in 0usize..6,
        to_offset in 1usize..6,
    ) {
        let registry = registry_of(member_count);
        let expenses: Vec<Expense> = seed
            .into_iter()
            .enumerate()
            .map(|(idx, (amount, payer))| Expense {
                id: ExpenseId::new(format!("e{idx}")),
                amount: cents(amount),
                recorded_by: member(payer % member_count),
                payer_ref: Some(arcstr::literal!("Mi")),
                date: None,
            })
            .collect();
        let before = build_matrix(&registry, &expenses, &[]);

        let payer = member(from % member_count);
        let receiver = member((from + to_offset % (member_count - 1) + 1) % member_count);
        prop_assume!(payer != receiver);
        let settlement = Settlement {
            id: SettlementId::from("s1"),
            payer: payer.clone(),
            receiver: receiver.clone(),
            amount: cents(amount),
        };
        let after = build_matrix(&registry, &expenses, std::slice::from_ref(&settlement));

        for debtor in registry.iter() {
            for creditor in registry.iter() {
                let expected = if debtor == &payer && creditor == &receiver {
                    before.get(debtor, creditor) + -cents(amount)
                } else {
                    before.get(debtor, creditor)
                };
                prop_assert_eq!(after.get(debtor, creditor), expected);
            }
        }
    }
}
