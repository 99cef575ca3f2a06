//! Memoizes balance reports per snapshot content.

use crate::{
    balance_service::BalanceService,
    model::{BalanceReport, LedgerSnapshot},
};
use dashmap::DashMap;
use hogar_ledger_domain::{MemberId, Money};
use sha2::{Digest, Sha256};
use std::{fmt, sync::Arc};

/// SHA-256 over the balance-relevant content of a snapshot.
///
/// Records are hashed sorted by id, so two snapshots holding the same
/// expenses and settlements in a different order share a fingerprint.
/// Display names are not part of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SnapshotFingerprint([u8; 32]);

impl SnapshotFingerprint {
    pub fn of(snapshot: &LedgerSnapshot) -> Self {
        let mut hasher = Sha256::new();
        write_str(&mut hasher, snapshot.home.as_str());

        let mut partners: Vec<&str> = snapshot
            .linked_partners
            .iter()
            .map(MemberId::as_str)
            .collect();
        partners.sort_unstable();
        partners.dedup();
        write_len(&mut hasher, partners.len());
        for partner in partners {
            write_str(&mut hasher, partner);
        }

        let mut expenses: Vec<_> = snapshot.expenses.iter().collect();
        expenses.sort_by(|a, b| a.id.cmp(&b.id));
        write_len(&mut hasher, expenses.len());
        for expense in expenses {
            write_str(&mut hasher, expense.id.as_str());
            write_money(&mut hasher, expense.amount);
            write_str(&mut hasher, expense.recorded_by.as_str());
            match expense.payer_ref.as_deref() {
                Some(raw) => {
                    hasher.update([1u8]);
                    write_str(&mut hasher, raw);
                }
                None => hasher.update([0u8]),
            }
        }

        let mut settlements: Vec<_> = snapshot.settlements.iter().collect();
        settlements.sort_by(|a, b| a.id.cmp(&b.id));
        write_len(&mut hasher, settlements.len());
        for settlement in settlements {
            write_str(&mut hasher, settlement.id.as_str());
            write_str(&mut hasher, settlement.payer.as_str());
            write_str(&mut hasher, settlement.receiver.as_str());
            write_money(&mut hasher, settlement.amount);
        }

        Self(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for SnapshotFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

fn write_len(hasher: &mut Sha256, len: usize) {
    hasher.update((len as u64).to_be_bytes());
}

fn write_str(hasher: &mut Sha256, value: &str) {
    write_len(hasher, value.len());
    hasher.update(value.as_bytes());
}

fn write_money(hasher: &mut Sha256, amount: Money) {
    // 1.5 and 1.50 must hash alike.
    hasher.update(amount.as_decimal().normalize().serialize());
}

/// [`BalanceService`] with reports cached by `(fingerprint, viewer)`.
///
/// Only the latest snapshot per viewer is kept: a report for a new
/// fingerprint evicts that viewer's previous one, so the cache holds at most
/// one entry per viewer. Safe to share across threads; concurrent misses on
/// the same key may both compute, and the first stored report wins.
pub struct MemoizedBalanceService {
    service: BalanceService,
    reports: DashMap<(SnapshotFingerprint, MemberId), Arc<BalanceReport>>,
    latest: DashMap<MemberId, SnapshotFingerprint>,
}

impl MemoizedBalanceService {
    pub fn new(service: BalanceService) -> Self {
        Self {
            service,
            reports: DashMap::new(),
            latest: DashMap::new(),
        }
    }

    pub fn service(&self) -> &BalanceService {
        &self.service
    }

    pub fn compute_balances(
        &self,
        snapshot: &LedgerSnapshot,
        viewer: &MemberId,
    ) -> Arc<BalanceReport> {
        let fingerprint = SnapshotFingerprint::of(snapshot);
        let key = (fingerprint, viewer.clone());
        if let Some(report) = self.reports.get(&key) {
            tracing::debug!(%fingerprint, viewer = %viewer, "Balance report cache hit");
            return Arc::clone(report.value());
        }

        let report = Arc::new(self.service.compute_balances(snapshot, viewer));
        let previous = self.latest.insert(viewer.clone(), fingerprint);
        if let Some(previous) = previous.filter(|previous| *previous != fingerprint) {
            tracing::debug!(%previous, %fingerprint, viewer = %viewer, "Evicting stale report");
            self.reports.remove(&(previous, viewer.clone()));
        }
        let stored = self.reports.entry(key).or_insert(report);
        Arc::clone(stored.value())
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn clear(&self) {
        self.reports.clear();
        self.latest.clear();
    }
}
