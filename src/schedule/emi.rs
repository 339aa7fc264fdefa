use rust_decimal::Decimal;

use crate::decimal::Money;
use crate::events::{Event, EventStore};
use crate::types::LoanId;

/// rounding-drift adjustment for level installment amounts
///
/// a transient computation over a set of related repayment periods: the
/// accumulated `emi_difference` is only redistributed when it is large
/// relative to half the remaining periods, so penny rounding never causes
/// constant EMI churn. `uncountable_period_count` excludes periods that take
/// no redistribution (already fully paid, down-payment periods).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmiAdjustment {
    pub original_emi: Money,
    pub emi_difference: Money,
    pub related_period_count: usize,
    pub uncountable_period_count: usize,
}

impl EmiAdjustment {
    pub fn new(
        original_emi: Money,
        emi_difference: Money,
        related_period_count: usize,
        uncountable_period_count: usize,
    ) -> Self {
        Self {
            original_emi,
            emi_difference,
            related_period_count,
            uncountable_period_count,
        }
    }

    /// threshold policy: adjust only when
    /// `|emi_difference| * 100 > original_emi * floor(related / 2)`
    pub fn should_be_adjusted(&self) -> bool {
        let half = (self.related_period_count / 2) as i64;
        if half == 0 || self.emi_difference.is_zero() {
            return false;
        }
        self.emi_difference.amount().abs() * Decimal::from(100)
            > self.original_emi.amount() * Decimal::from(half)
    }

    /// uniform per-period share of the difference across countable periods
    pub fn adjustment(&self) -> Money {
        let divisor = self
            .related_period_count
            .saturating_sub(self.uncountable_period_count)
            .max(1);
        self.emi_difference / Decimal::from(divisor as u64)
    }

    pub fn adjusted_emi(&self) -> Money {
        self.original_emi + self.adjustment()
    }

    /// convergence comparison: a later candidate wins only with a strictly
    /// smaller absolute difference
    pub fn has_less_emi_difference(&self, other: &EmiAdjustment) -> bool {
        self.emi_difference.abs() < other.emi_difference.abs()
    }

    pub fn emit(&self, loan_id: LoanId, events: &mut EventStore) {
        events.emit(Event::EmiAdjusted {
            loan_id,
            original_emi: self.original_emi,
            adjusted_emi: self.adjusted_emi(),
            adjustment: self.adjustment(),
        });
    }
}

/// pick the best of a candidate series, keeping an earlier candidate on ties
pub fn best_candidate(candidates: &[EmiAdjustment]) -> Option<&EmiAdjustment> {
    let mut best: Option<&EmiAdjustment> = None;
    for candidate in candidates {
        match best {
            None => best = Some(candidate),
            Some(current) if candidate.has_less_emi_difference(current) => {
                best = Some(candidate);
            }
            _ => {}
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Currency;
    use uuid::Uuid;

    fn usd() -> Currency {
        Currency::usd()
    }

    fn money(s: &str) -> Money {
        Money::from_str_exact(s, usd()).unwrap()
    }

    #[test]
    fn test_no_adjustment_for_single_period() {
        let adj = EmiAdjustment::new(money("340.02"), money("10.00"), 1, 0);
        assert!(!adj.should_be_adjusted());
    }

    #[test]
    fn test_no_adjustment_for_zero_difference() {
        let adj = EmiAdjustment::new(money("340.02"), money("0.00"), 6, 0);
        assert!(!adj.should_be_adjusted());
    }

    #[test]
    fn test_threshold_policy() {
        // related 5 -> half 2; threshold is |diff| * 100 > 340.02 * 2
        let below = EmiAdjustment::new(money("340.02"), money("6.80"), 5, 0);
        assert!(!below.should_be_adjusted());

        let above = EmiAdjustment::new(money("340.02"), money("6.81"), 5, 0);
        assert!(above.should_be_adjusted());

        // drift direction does not matter
        let negative = EmiAdjustment::new(money("340.02"), money("-6.81"), 5, 0);
        assert!(negative.should_be_adjusted());
    }

    #[test]
    fn test_redistribution_excludes_uncountable_periods() {
        let adj = EmiAdjustment::new(money("340.02"), money("12.00"), 6, 2);
        assert_eq!(adj.adjustment(), money("3.00"));
        assert_eq!(adj.adjusted_emi(), money("343.02"));
    }

    #[test]
    fn test_redistribution_divisor_floors_at_one() {
        let adj = EmiAdjustment::new(money("340.02"), money("12.00"), 3, 5);
        assert_eq!(adj.adjustment(), money("12.00"));
    }

    #[test]
    fn test_negative_difference_lowers_emi() {
        let adj = EmiAdjustment::new(money("340.02"), money("-9.00"), 3, 0);
        assert_eq!(adj.adjusted_emi(), money("337.02"));
    }

    #[test]
    fn test_best_candidate_requires_strict_improvement() {
        let a = EmiAdjustment::new(money("340.02"), money("9.00"), 6, 0);
        let b = EmiAdjustment::new(money("340.02"), money("-9.00"), 6, 0);
        let c = EmiAdjustment::new(money("340.02"), money("4.00"), 6, 0);

        // b ties a on |difference|, so a is kept; c strictly improves
        let abc = [a, b, c];
        let best = best_candidate(&abc).unwrap();
        assert_eq!(best.emi_difference, money("4.00"));

        let ab = [a, b];
        let best = best_candidate(&ab).unwrap();
        assert_eq!(best.emi_difference, money("9.00"));
    }

    #[test]
    fn test_emit_event() {
        let adj = EmiAdjustment::new(money("340.02"), money("12.00"), 6, 2);
        let mut events = EventStore::new();
        adj.emit(Uuid::new_v4(), &mut events);

        assert!(matches!(
            &events.events()[0],
            Event::EmiAdjusted { adjustment, .. } if *adjustment == money("3.00")
        ));
    }
}
