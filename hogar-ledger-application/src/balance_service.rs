use crate::{
    error::LedgerWarning,
    model::{BalanceReport, LedgerSnapshot, MemberSpending, SpendingSummary},
    settings::LedgerSettings,
};
use fxhash::FxHashMap;
use hogar_ledger_domain::{
    AccrualRejection, Confidence, DebtMatrix, MemberId, MemberRegistry, Money,
    NetBalanceCalculator, NetPositions, PayerReference, PayerResolution, PayerResolver,
    SettlementRejection, SettlementReducer, SplitAccrual,
};

/// Debt matrix plus what happened to each record while building it.
pub struct LedgerBuild {
    pub registry: MemberRegistry,
    pub matrix: DebtMatrix,
    pub spending: SpendingSummary,
    pub warnings: Vec<LedgerWarning>,
}

/// The one place balances are computed. Every screen that shows who owes
/// whom goes through [`BalanceService::compute_balances`].
#[derive(Clone, Debug, Default)]
pub struct BalanceService {
    settings: LedgerSettings,
}

impl BalanceService {
    pub fn new(settings: LedgerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }

    pub fn build_registry(&self, snapshot: &LedgerSnapshot) -> MemberRegistry {
        MemberRegistry::build(
            snapshot.home.clone(),
            snapshot.linked_partners.iter().cloned(),
            &snapshot.expenses,
            &self.settings.sentinels,
        )
    }

    /// Resolves payers, accrues every expense and applies every settlement.
    pub fn build_ledger(&self, snapshot: &LedgerSnapshot) -> LedgerBuild {
        let registry = self.build_registry(snapshot);
        let resolver = PayerResolver::new(&registry, &self.settings.sentinels);
        let mut matrix = DebtMatrix::new();
        let mut warnings = Vec::new();
        let mut paid: FxHashMap<MemberId, Money> = FxHashMap::default();
        let mut total_shared = Money::ZERO;
        let mut booked_expenses = 0usize;

        for expense in &snapshot.expenses {
            let (payer, low_confidence) = match resolver.resolve(expense) {
                PayerResolution::Resolved {
                    payer, confidence, ..
                } => (payer, confidence == Confidence::Low),
                PayerResolution::Unresolvable { reference, reason } => {
                    let raw = match reference {
                        PayerReference::Unresolvable(raw) => raw.to_string(),
                        _ => expense
                            .payer_ref
                            .as_deref()
                            .unwrap_or_default()
                            .to_owned(),
                    };
                    tracing::warn!(
                        expense = %expense.id,
                        raw_payer = %raw,
                        reason = ?reason,
                        "Skipping expense with unresolvable payer"
                    );
                    warnings.push(LedgerWarning::UnresolvablePayer {
                        expense: expense.id.clone(),
                        raw,
                        reason,
                    });
                    continue;
                }
            };

            // Spending totals are checked up front so a rejected share never
            // leaves them half-updated.
            let paid_so_far = paid.get(&payer).copied().unwrap_or(Money::ZERO);
            let totals = paid_so_far
                .checked_add(expense.amount)
                .zip(total_shared.checked_add(expense.amount));
            let accrued = match totals {
                Some(totals) => SplitAccrual
                    .accrue(&mut matrix, expense, &payer, &registry)
                    .map(|_| totals),
                None if expense.amount.is_negative() => Err(AccrualRejection::NegativeAmount),
                None => Err(AccrualRejection::Overflow),
            };
            let (payer_total, shared_total) = match accrued {
                Ok(totals) => totals,
                Err(rejection) => {
                    let warning = match rejection {
                        AccrualRejection::NegativeAmount => LedgerWarning::NegativeExpenseAmount {
                            expense: expense.id.clone(),
                            amount: expense.amount,
                        },
                        AccrualRejection::Overflow => LedgerWarning::ExpenseOverflow {
                            expense: expense.id.clone(),
                            amount: expense.amount,
                        },
                    };
                    tracing::warn!(expense = %expense.id, "Skipping expense: {warning}");
                    warnings.push(warning);
                    continue;
                }
            };

            if low_confidence {
                tracing::warn!(
                    expense = %expense.id,
                    chosen = %payer,
                    registry_size = registry.len(),
                    "Legacy payer sentinel resolved by fallback"
                );
                warnings.push(LedgerWarning::LowConfidenceResolution {
                    expense: expense.id.clone(),
                    chosen: payer.clone(),
                });
            }

            paid.insert(payer, payer_total);
            total_shared = shared_total;
            booked_expenses += 1;
        }

        for settlement in &snapshot.settlements {
            let Err(rejection) = SettlementReducer.apply(&mut matrix, settlement, &registry)
            else {
                continue;
            };
            let warning = match rejection {
                SettlementRejection::NegativeAmount => LedgerWarning::NegativeSettlementAmount {
                    settlement: settlement.id.clone(),
                    amount: settlement.amount,
                },
                SettlementRejection::SamePayerAndReceiver => LedgerWarning::SelfSettlement {
                    settlement: settlement.id.clone(),
                },
                SettlementRejection::UnknownParty(member) => {
                    LedgerWarning::UnknownSettlementParty {
                        settlement: settlement.id.clone(),
                        member,
                    }
                }
                SettlementRejection::Overflow => LedgerWarning::SettlementOverflow {
                    settlement: settlement.id.clone(),
                    amount: settlement.amount,
                },
            };
            tracing::warn!(settlement = %settlement.id, "Skipping settlement: {warning}");
            warnings.push(warning);
        }

        let spending = SpendingSummary {
            per_member: registry
                .iter()
                .map(|member| MemberSpending {
                    member: member.clone(),
                    paid: paid.get(member).copied().unwrap_or(Money::ZERO),
                })
                .collect(),
            total_shared,
            booked_expenses,
        };

        LedgerBuild {
            registry,
            matrix,
            spending,
            warnings,
        }
    }

    /// Who owes `viewer` and whom `viewer` owes, netted per counterparty.
    ///
    /// Pure over `snapshot`: identical inputs give identical reports. Bad
    /// records are skipped and reported, never fatal.
    pub fn compute_balances(&self, snapshot: &LedgerSnapshot, viewer: &MemberId) -> BalanceReport {
        tracing::debug!(
            viewer = %viewer,
            expense_count = snapshot.expenses.len(),
            settlement_count = snapshot.settlements.len(),
            "Computing balances"
        );

        let LedgerBuild {
            registry,
            matrix,
            spending,
            mut warnings,
        } = self.build_ledger(snapshot);

        let calculator = NetBalanceCalculator::new(self.settings.tolerance);
        let positions = if registry.contains(viewer) {
            calculator.net_positions(&matrix, viewer, &registry)
        } else {
            tracing::warn!(viewer = %viewer, "Viewer is not part of the household");
            warnings.push(LedgerWarning::ViewerNotInRegistry {
                viewer: viewer.clone(),
            });
            NetPositions::default()
        };

        tracing::debug!(
            registry_size = registry.len(),
            counterparty_count = positions.counterparties.len(),
            warning_count = warnings.len(),
            global_balance = %positions.global_balance,
            "Balances computed"
        );

        BalanceReport {
            viewer: viewer.clone(),
            registry: registry.iter().cloned().collect(),
            tolerance: calculator.tolerance(),
            positions,
            spending,
            warnings,
        }
    }

    /// Same as [`Self::compute_balances`] for the snapshot's home member.
    pub fn compute_home_balances(&self, snapshot: &LedgerSnapshot) -> BalanceReport {
        self.compute_balances(snapshot, &snapshot.home)
    }
}
