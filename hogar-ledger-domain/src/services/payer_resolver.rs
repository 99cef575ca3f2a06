//! Maps an expense's raw payer encoding onto exactly one registry member.
//!
//! Records carry one of three encodings: a member id, the legacy "self"
//! sentinel (the recorder paid), or the legacy "other" sentinel (someone else
//! paid). The "other" sentinel never named who that was. In households with
//! more than two members the resolver picks the first non-recorder in
//! registry order and marks the result [`Confidence::Low`].

use crate::{
    model::{Expense, MemberId, PayerReference},
    services::MemberRegistry,
};
use arcstr::ArcStr;

/// Raw tokens used by legacy records in place of a member id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegacySentinels {
    pub self_token: String,
    pub other_token: String,
    /// Raw references at least this long are treated as member ids.
    pub min_member_id_len: usize,
}

impl Default for LegacySentinels {
    fn default() -> Self {
        Self {
            self_token: "Mi".to_owned(),
            other_token: "Partner".to_owned(),
            min_member_id_len: 11,
        }
    }
}

impl PayerReference {
    /// Classifies a raw payer reference without consulting any registry.
    pub fn classify(raw: Option<&str>, sentinels: &LegacySentinels) -> Self {
        let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
            return Self::Unresolvable(ArcStr::new());
        };

        if raw == sentinels.self_token {
            Self::LegacySelf
        } else if raw == sentinels.other_token {
            Self::LegacyOther
        } else if raw.len() >= sentinels.min_member_id_len {
            Self::ExplicitMember(MemberId::from(raw))
        } else {
            Self::Unresolvable(ArcStr::from(raw))
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confidence {
    Certain,
    /// Picked by the deterministic fallback among several candidates.
    Low,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnresolvableReason {
    /// Neither a sentinel nor something shaped like a member id.
    UnrecognizedReference,
    /// "Other" sentinel in a registry with nobody besides the recorder.
    NoOtherMember,
    PayerNotInRegistry,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PayerResolution {
    Resolved {
        payer: MemberId,
        reference: PayerReference,
        confidence: Confidence,
    },
    Unresolvable {
        reference: PayerReference,
        reason: UnresolvableReason,
    },
}

impl PayerResolution {
    pub fn payer(&self) -> Option<&MemberId> {
        match self {
            Self::Resolved { payer, .. } => Some(payer),
            Self::Unresolvable { .. } => None,
        }
    }

    pub fn is_low_confidence(&self) -> bool {
        matches!(
            self,
            Self::Resolved {
                confidence: Confidence::Low,
                ..
            }
        )
    }
}

pub struct PayerResolver<'r> {
    registry: &'r MemberRegistry,
    sentinels: &'r LegacySentinels,
}

impl<'r> PayerResolver<'r> {
    pub fn new(registry: &'r MemberRegistry, sentinels: &'r LegacySentinels) -> Self {
        Self {
            registry,
            sentinels,
        }
    }

    pub fn resolve(&self, expense: &Expense) -> PayerResolution {
        let reference = PayerReference::classify(expense.payer_ref.as_deref(), self.sentinels);

        let outcome = match &reference {
            PayerReference::ExplicitMember(id) => Ok((id.clone(), Confidence::Certain)),
            PayerReference::LegacySelf => Ok((expense.recorded_by.clone(), Confidence::Certain)),
            PayerReference::LegacyOther => self.resolve_other(&expense.recorded_by),
            PayerReference::Unresolvable(_) => Err(UnresolvableReason::UnrecognizedReference),
        };

        let (payer, confidence) = match outcome {
            Ok((payer, _)) if !self.registry.contains(&payer) => {
                return PayerResolution::Unresolvable {
                    reference,
                    reason: UnresolvableReason::PayerNotInRegistry,
                };
            }
            Ok(resolved) => resolved,
            Err(reason) => return PayerResolution::Unresolvable { reference, reason },
        };

        PayerResolution::Resolved {
            payer,
            reference,
            confidence,
        }
    }

    fn resolve_other(
        &self,
        recorded_by: &MemberId,
    ) -> Result<(MemberId, Confidence), UnresolvableReason> {
        let mut candidates = self.registry.others(recorded_by);
        let first = candidates
            .next()
            .ok_or(UnresolvableReason::NoOtherMember)?;
        let remaining = candidates.count();
        if remaining == 0 {
            return Ok((first.clone(), Confidence::Certain));
        }
        tracing::debug!(
            recorded_by = %recorded_by,
            chosen = %first,
            candidate_count = remaining + 1,
            "Legacy other-payer sentinel is ambiguous; taking first candidate"
        );
        Ok((first.clone(), Confidence::Low))
    }
}
