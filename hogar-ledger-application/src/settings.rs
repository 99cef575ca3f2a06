use hogar_ledger_domain::{LegacySentinels, Money};

/// Tunables shared by every balance query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerSettings {
    /// Nets with an absolute value at or below this are hidden as settled.
    pub tolerance: Money,
    pub sentinels: LegacySentinels,
}

impl LedgerSettings {
    /// One cent.
    pub fn default_tolerance() -> Money {
        Money::new(1, 2)
    }

    pub fn with_tolerance(mut self, tolerance: Money) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_sentinels(mut self, sentinels: LegacySentinels) -> Self {
        self.sentinels = sentinels;
        self
    }
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            tolerance: Self::default_tolerance(),
            sentinels: LegacySentinels::default(),
        }
    }
}
