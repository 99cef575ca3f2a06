pub mod member_registry;
pub mod net_balance_calculator;
pub mod payer_resolver;
pub mod settlement_reducer;
pub mod split_accrual;

pub use member_registry::MemberRegistry;
pub use net_balance_calculator::{CounterpartyPosition, NetBalanceCalculator, NetPositions};
pub use payer_resolver::{
    Confidence, LegacySentinels, PayerResolution, PayerResolver, UnresolvableReason,
};
pub use settlement_reducer::{SettlementRejection, SettlementReducer};
pub use split_accrual::{AccrualRejection, SplitAccrual};
