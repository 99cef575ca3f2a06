#![warn(clippy::uninlined_format_args)]

pub mod balance_service;
pub mod cache;
pub mod error;
pub mod model;
pub mod ports;
pub mod settings;

pub use balance_service::BalanceService;
pub use cache::{MemoizedBalanceService, SnapshotFingerprint};
pub use error::LedgerWarning;
pub use model::{BalanceReport, LedgerSnapshot, MemberSpending, SpendingSummary};
pub use ports::{EmptyMemberDirectory, MemberDirectory};
pub use settings::LedgerSettings;
