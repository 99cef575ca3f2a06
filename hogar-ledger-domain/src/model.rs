use arcstr::ArcStr;
use fxhash::FxHashMap;
use rust_decimal::{Decimal, RoundingStrategy};
use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub ArcStr);

        impl $name {
            pub fn new(id: impl Into<ArcStr>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(ArcStr::from(id))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.0.as_str())
            }
        }
    };
}

opaque_id!(
    /// Opaque member identifier as issued by the profile service (usually a UUID).
    MemberId
);
opaque_id!(ExpenseId);
opaque_id!(SettlementId);

/// Decimal amount in the household's single, implicit currency.
///
/// Accrual keeps full `Decimal` precision. Rounding to cents is a
/// presentation concern, see [`Money::round_to_cents`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);
    pub const MAX: Self = Self(Decimal::MAX);

    pub fn new(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    /// `None` when the sum leaves the representable range.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn signum(self) -> i64 {
        if self.0.is_zero() {
            0
        } else if self.0.is_sign_negative() {
            -1
        } else {
            1
        }
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(self) -> bool {
        self.signum() < 0
    }

    /// Positive part; negative amounts collapse to zero.
    pub fn positive_part(self) -> Self {
        self.max(Self::ZERO)
    }

    /// Even share of `self` over `parts` members. A zero denominator is
    /// treated as a single member so nothing is ever divided by zero.
    pub fn split_evenly(self, parts: usize) -> Self {
        Self(self.0 / Decimal::from(parts.max(1)))
    }

    pub fn round_to_cents(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.normalize(), f)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// A participant in shared expenses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub display_name: Option<String>,
}

/// A shared expense as recorded by one member. Immutable once handed to the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: ExpenseId,
    pub amount: Money,
    pub recorded_by: MemberId,
    /// Raw payer encoding: a member id, a legacy sentinel, or nothing.
    pub payer_ref: Option<ArcStr>,
    pub date: Option<ArcStr>,
}

/// A direct payment from `payer` to `receiver` that reduces what `payer` owes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub id: SettlementId,
    pub payer: MemberId,
    pub receiver: MemberId,
    pub amount: Money,
}

/// Classified form of [`Expense::payer_ref`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PayerReference {
    ExplicitMember(MemberId),
    /// Whoever recorded the expense paid it.
    LegacySelf,
    /// Some member other than the recorder paid it; which one is not encoded.
    LegacyOther,
    Unresolvable(ArcStr),
}

/// `debt[debtor][creditor]`: what `debtor` owes `creditor`.
///
/// Both directions of a pair are independent accumulators. Netting is a
/// read-time projection done by `NetBalanceCalculator`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DebtMatrix {
    edges: FxHashMap<(MemberId, MemberId), Money>,
}

impl DebtMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Amount `debtor` owes `creditor`; absent edges read as zero.
    pub fn get(&self, debtor: &MemberId, creditor: &MemberId) -> Money {
        self.edges
            .get(&(debtor.clone(), creditor.clone()))
            .copied()
            .unwrap_or(Money::ZERO)
    }

    /// Whether [`Self::add`] would keep the edge exact.
    pub fn can_add(&self, debtor: &MemberId, creditor: &MemberId, amount: Money) -> bool {
        debtor == creditor || self.get(debtor, creditor).checked_add(amount).is_some()
    }

    /// Saturates at the `Money` range; check [`Self::can_add`] first to
    /// reject instead.
    pub fn add(&mut self, debtor: &MemberId, creditor: &MemberId, amount: Money) {
        if debtor == creditor {
            return;
        }
        let edge = self
            .edges
            .entry((debtor.clone(), creditor.clone()))
            .or_insert(Money::ZERO);
        *edge = edge.saturating_add(amount);
    }

    /// May drive the edge negative; overpayment is kept, not clamped.
    pub fn subtract(&mut self, debtor: &MemberId, creditor: &MemberId, amount: Money) {
        self.add(debtor, creditor, -amount);
    }

    pub fn edges(&self) -> impl Iterator<Item = (&MemberId, &MemberId, Money)> + '_ {
        self.edges
            .iter()
            .map(|((debtor, creditor), amount)| (debtor, creditor, *amount))
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Sum over every ordered pair.
    pub fn total(&self) -> Money {
        self.edges
            .values()
            .fold(Money::ZERO, |total, amount| total.saturating_add(*amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::even(Money::from_i64(100), 2, Money::from_i64(50))]
    #[case::three_way(Money::from_i64(90), 3, Money::from_i64(30))]
    #[case::zero_denominator(Money::from_i64(40), 0, Money::from_i64(40))]
    #[case::fractional(Money::new(1000, 2), 4, Money::new(250, 2))]
    fn split_evenly_cases(#[case] amount: Money, #[case] parts: usize, #[case] expected: Money) {
        assert_eq!(amount.split_evenly(parts), expected);
    }

    #[test]
    fn split_keeps_precision_beyond_cents() {
        let share = Money::from_i64(100).split_evenly(3);
        assert!(share > Money::new(3333, 2));
        assert_eq!(share.round_to_cents(), Money::new(3333, 2));
    }

    #[rstest]
    #[case::half_up(Money::new(12345, 3), Money::new(1235, 2))]
    #[case::negative_half(Money::new(-12345, 3), Money::new(-1235, 2))]
    #[case::already_cents(Money::new(1000, 2), Money::new(1000, 2))]
    fn round_to_cents_cases(#[case] amount: Money, #[case] expected: Money) {
        assert_eq!(amount.round_to_cents(), expected);
    }

    #[test]
    fn display_normalizes_trailing_zeros() {
        assert_eq!(Money::new(5000, 2).to_string(), "50");
        assert_eq!(Money::new(1250, 2).to_string(), "12.5");
    }

    #[test]
    fn matrix_ignores_self_edges() {
        let alice = MemberId::from("alice-0000-0001");
        let mut matrix = DebtMatrix::new();
        matrix.add(&alice, &alice, Money::from_i64(10));
        assert!(matrix.is_empty());
        assert_eq!(matrix.get(&alice, &alice), Money::ZERO);
    }

    #[test]
    fn matrix_directions_are_independent() {
        let alice = MemberId::from("alice-0000-0001");
        let bob = MemberId::from("bob-00000-0002");
        let mut matrix = DebtMatrix::new();
        matrix.add(&bob, &alice, Money::from_i64(30));
        matrix.add(&alice, &bob, Money::from_i64(10));

        assert_eq!(matrix.get(&bob, &alice), Money::from_i64(30));
        assert_eq!(matrix.get(&alice, &bob), Money::from_i64(10));
        assert_eq!(matrix.total(), Money::from_i64(40));
    }

    #[test]
    fn checked_arithmetic_reports_overflow() {
        assert_eq!(Money::MAX.checked_add(Money::from_i64(1)), None);
        assert_eq!(Money::MAX.checked_sub(Money::MAX), Some(Money::ZERO));
        assert_eq!((-Money::MAX).checked_sub(Money::from_i64(1)), None);
        assert_eq!(Money::MAX.saturating_add(Money::MAX), Money::MAX);
    }

    #[test]
    fn matrix_add_saturates_and_can_add_detects_overflow() {
        let alice = MemberId::from("alice-0000-0001");
        let bob = MemberId::from("bob-00000-0002");
        let mut matrix = DebtMatrix::new();
        matrix.add(&bob, &alice, Money::MAX);

        assert!(!matrix.can_add(&bob, &alice, Money::MAX));
        assert!(matrix.can_add(&alice, &bob, Money::MAX));
        assert!(matrix.can_add(&alice, &alice, Money::MAX));

        matrix.add(&bob, &alice, Money::MAX);
        assert_eq!(matrix.get(&bob, &alice), Money::MAX);
    }

    #[test]
    fn subtract_can_go_negative() {
        let alice = MemberId::from("alice-0000-0001");
        let bob = MemberId::from("bob-00000-0002");
        let mut matrix = DebtMatrix::new();
        matrix.add(&bob, &alice, Money::from_i64(30));
        matrix.subtract(&bob, &alice, Money::from_i64(45));
        assert_eq!(matrix.get(&bob, &alice), Money::from_i64(-15));
    }
}
