#![warn(clippy::uninlined_format_args)]

pub mod model;
pub mod services;

pub use model::{
    DebtMatrix, Expense, ExpenseId, Member, MemberId, Money, PayerReference, Settlement,
    SettlementId,
};
pub use services::{
    AccrualRejection, Confidence, CounterpartyPosition, LegacySentinels, MemberRegistry,
    NetBalanceCalculator, NetPositions, PayerResolution, PayerResolver, SettlementReducer,
    SettlementRejection, SplitAccrual, UnresolvableReason,
};
