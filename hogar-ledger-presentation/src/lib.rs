#![warn(clippy::uninlined_format_args)]

pub mod balance_presenter;
pub mod labels;
pub mod text_table;

pub use balance_presenter::{BalancePresenter, format_money};
