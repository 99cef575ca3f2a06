use hogar_ledger_application::LedgerSettings;
use hogar_ledger_domain::{LegacySentinels, Money};
use rust_decimal::Decimal;
use std::{env, str::FromStr};
use thiserror::Error;

pub const TOLERANCE_VAR: &str = "HOGAR_LEDGER_TOLERANCE";
pub const SELF_SENTINEL_VAR: &str = "HOGAR_LEDGER_SELF_SENTINEL";
pub const OTHER_SENTINEL_VAR: &str = "HOGAR_LEDGER_OTHER_SENTINEL";
pub const MIN_ID_LEN_VAR: &str = "HOGAR_LEDGER_MIN_ID_LEN";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} must be a decimal amount (got {value:?})")]
    InvalidDecimal { var: &'static str, value: String },
    #[error("{var} must not be negative (got {value})")]
    NegativeTolerance { var: &'static str, value: String },
    #[error("{var} must be a positive integer (got {value:?})")]
    InvalidLength { var: &'static str, value: String },
    #[error("{var} must not be empty")]
    EmptySentinel { var: &'static str },
    #[error("{SELF_SENTINEL_VAR} and {OTHER_SENTINEL_VAR} must differ (both {value:?})")]
    DuplicateSentinel { value: String },
}

/// Loads `.env` if present, then reads ledger settings from the environment.
/// Unset variables keep their defaults.
pub fn settings_from_env() -> Result<LedgerSettings, ConfigError> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env");
    }
    settings_from_lookup(|var| env::var(var).ok())
}

pub fn settings_from_lookup<F>(lookup: F) -> Result<LedgerSettings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = LedgerSettings::default();
    let mut sentinels = LegacySentinels::default();

    if let Some(value) = lookup(TOLERANCE_VAR) {
        let tolerance =
            Decimal::from_str(value.trim()).map_err(|_| ConfigError::InvalidDecimal {
                var: TOLERANCE_VAR,
                value: value.clone(),
            })?;
        if tolerance.is_sign_negative() && !tolerance.is_zero() {
            return Err(ConfigError::NegativeTolerance {
                var: TOLERANCE_VAR,
                value,
            });
        }
        settings.tolerance = Money::from_decimal(tolerance);
    }

    if let Some(value) = lookup(SELF_SENTINEL_VAR) {
        sentinels.self_token = non_empty(SELF_SENTINEL_VAR, value)?;
    }
    if let Some(value) = lookup(OTHER_SENTINEL_VAR) {
        sentinels.other_token = non_empty(OTHER_SENTINEL_VAR, value)?;
    }
    if sentinels.self_token == sentinels.other_token {
        return Err(ConfigError::DuplicateSentinel {
            value: sentinels.self_token,
        });
    }

    if let Some(value) = lookup(MIN_ID_LEN_VAR) {
        sentinels.min_member_id_len = match value.trim().parse::<usize>() {
            Ok(len) if len > 0 => len,
            _ => {
                return Err(ConfigError::InvalidLength {
                    var: MIN_ID_LEN_VAR,
                    value,
                });
            }
        };
    }

    Ok(settings.with_sentinels(sentinels))
}

fn non_empty(var: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptySentinel { var });
    }
    Ok(trimmed.to_owned())
}
