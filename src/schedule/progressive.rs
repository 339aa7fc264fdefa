use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Currency, Money, Rate};
use crate::errors::{LoanError, Result};
use crate::events::{Event, EventStore};
use crate::types::LoanId;

use super::day_count::DayCountConvention;

/// a rate effective from a given date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterestRate {
    pub effective_from: NaiveDate,
    pub rate: Rate,
}

/// sub-interval of a repayment period with a constant outstanding balance
///
/// `rate_factor_till_period_due_date` spans from this period's `from_date` to
/// the owning repayment period's due date; apportionment divides it by that
/// span's day count so splitting never changes the repayment period's total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestPeriod {
    pub from_date: NaiveDate,
    pub due_date: NaiveDate,
    pub rate_factor: Decimal,
    pub rate_factor_till_period_due_date: Decimal,
    pub disbursement_amount: Money,
    pub balance_correction_amount: Money,
    pub outstanding_loan_balance: Money,
}

impl InterestPeriod {
    /// linear apportionment of the repayment period's rate factor over this
    /// sub-period, as a raw decimal; rounding happens once per repayment
    /// period so split sub-periods always sum back to the undivided interest
    fn due_interest_raw(
        &self,
        convention: DayCountConvention,
        period_due_date: NaiveDate,
    ) -> Decimal {
        let length_till_due = convention.days_between(self.from_date, period_due_date);
        if length_till_due <= 0 {
            return Decimal::ZERO;
        }
        let period_length = convention.days_between(self.from_date, self.due_date);
        self.outstanding_loan_balance.amount() * self.rate_factor_till_period_due_date
            / Decimal::from(length_till_due)
            * Decimal::from(period_length)
    }
}

/// one repayment period of a progressive schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepaymentPeriod {
    pub from_date: NaiveDate,
    pub due_date: NaiveDate,
    pub emi: Money,
    pub due_principal: Money,
    pub paid_principal: Money,
    pub paid_interest: Money,
    pub interest_periods: Vec<InterestPeriod>,
}

impl RepaymentPeriod {
    fn contains(&self, date: NaiveDate, is_first: bool) -> bool {
        if is_first {
            date >= self.from_date && date <= self.due_date
        } else {
            date > self.from_date && date <= self.due_date
        }
    }

    fn due_interest_raw(&self, convention: DayCountConvention) -> Decimal {
        self.interest_periods
            .iter()
            .map(|ip| ip.due_interest_raw(convention, self.due_date))
            .sum()
    }

    /// total due interest for this period, rounded to the currency scale
    pub fn due_interest(&self, convention: DayCountConvention, currency: Currency) -> Money {
        Money::new(self.due_interest_raw(convention), currency)
    }
}

/// progressive (declining-balance, daily rate-factor) interest schedule
///
/// repayment periods live in an owned arena ordered by due date; the previous
/// period is the prior index. balance changes locate or split an interest
/// period, then every balance is re-derived forward from the recurrence:
/// within a repayment period each sub-period carries the prior one's balance
/// plus its disbursement and correction; across a period boundary the prior
/// period's net principal movement is applied as well.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressiveSchedule {
    loan_id: LoanId,
    currency: Currency,
    nominal_rate: Rate,
    day_count: DayCountConvention,
    /// ordered descending by effective_from
    rate_changes: Vec<InterestRate>,
    repayment_periods: Vec<RepaymentPeriod>,
}

impl ProgressiveSchedule {
    /// build a schedule over contiguous period boundaries, one interest
    /// period per repayment period; the first period gets a zero-length seed
    /// interest period so a day-one disbursement lands before interest starts
    /// accruing on it
    pub fn generate(
        loan_id: LoanId,
        currency: Currency,
        nominal_rate: Rate,
        day_count: DayCountConvention,
        periods: &[(NaiveDate, NaiveDate)],
        emi: Money,
    ) -> Result<Self> {
        if periods.is_empty() {
            return Err(LoanError::InvalidDate {
                message: "schedule requires at least one repayment period".to_string(),
            });
        }
        emi.ensure_same_currency(&Money::zero(currency))?;

        let zero = Money::zero(currency);
        let mut repayment_periods = Vec::with_capacity(periods.len());
        for (index, &(from_date, due_date)) in periods.iter().enumerate() {
            let factor = day_count.rate_factor(nominal_rate, from_date, due_date);
            let factor_till = factor;
            let mut interest_periods = Vec::with_capacity(2);
            if index == 0 {
                interest_periods.push(InterestPeriod {
                    from_date,
                    due_date: from_date,
                    rate_factor: Decimal::ZERO,
                    rate_factor_till_period_due_date: factor_till,
                    disbursement_amount: zero,
                    balance_correction_amount: zero,
                    outstanding_loan_balance: zero,
                });
            }
            interest_periods.push(InterestPeriod {
                from_date,
                due_date,
                rate_factor: factor,
                rate_factor_till_period_due_date: factor_till,
                disbursement_amount: zero,
                balance_correction_amount: zero,
                outstanding_loan_balance: zero,
            });
            repayment_periods.push(RepaymentPeriod {
                from_date,
                due_date,
                emi,
                due_principal: zero,
                paid_principal: zero,
                paid_interest: zero,
                interest_periods,
            });
        }

        let schedule = Self {
            loan_id,
            currency,
            nominal_rate,
            day_count,
            rate_changes: Vec::new(),
            repayment_periods,
        };
        schedule.verify_contiguity(&schedule.repayment_periods)?;
        Ok(schedule)
    }

    pub fn loan_id(&self) -> LoanId {
        self.loan_id
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    pub fn periods(&self) -> &[RepaymentPeriod] {
        &self.repayment_periods
    }

    /// register a rate change; the set stays ordered descending by
    /// effective date
    pub fn add_rate_change(&mut self, effective_from: NaiveDate, rate: Rate) {
        self.rate_changes.push(InterestRate {
            effective_from,
            rate,
        });
        self.rate_changes
            .sort_by(|a, b| b.effective_from.cmp(&a.effective_from));
    }

    /// latest rate with `effective_from <= date`, else the nominal rate
    pub fn interest_rate(&self, date: NaiveDate) -> Rate {
        self.rate_changes
            .iter()
            .find(|rc| rc.effective_from <= date)
            .map(|rc| rc.rate)
            .unwrap_or(self.nominal_rate)
    }

    /// apply a disbursement and/or balance correction effective at `date`
    ///
    /// locates the repayment period containing `date`, then the interest
    /// period ending exactly at `date` (amounts are added to it) or the one
    /// strictly containing it (split at `date`). returns the affected
    /// repayment period's index. runs on a working copy and swaps it in only
    /// after the partition invariant re-verifies.
    pub fn change_outstanding_balance(
        &mut self,
        date: NaiveDate,
        disbursement: Money,
        correction: Money,
        events: &mut EventStore,
    ) -> Result<usize> {
        disbursement.ensure_same_currency(&Money::zero(self.currency))?;
        correction.ensure_same_currency(&Money::zero(self.currency))?;
        if disbursement.is_negative() {
            return Err(LoanError::InvalidAmount {
                amount: disbursement.to_string(),
            });
        }

        let index = self
            .locate_period(date)
            .ok_or(LoanError::DateOutsideSchedule { date })?;

        let mut working = self.repayment_periods.clone();
        let mut split = None;
        {
            let period = &mut working[index];
            let target = period
                .interest_periods
                .iter()
                .position(|ip| ip.due_date == date);
            let target = match target {
                Some(pos) => pos,
                None => {
                    let pos = period
                        .interest_periods
                        .iter()
                        .position(|ip| ip.from_date < date && date < ip.due_date)
                        .ok_or_else(|| LoanError::InterestPeriodGapOrOverlap {
                            detail: format!("no interest period contains {date}"),
                        })?;
                    split = Some(Self::split_interest_period(
                        period,
                        pos,
                        date,
                        self.day_count,
                        self.currency,
                    ));
                    pos
                }
            };
            let ip = &mut period.interest_periods[target];
            ip.disbursement_amount += disbursement;
            ip.balance_correction_amount += correction;
        }

        Self::propagate_balances(&mut working);
        self.verify_contiguity(&working)?;
        self.repayment_periods = working;

        if let Some((original_from, original_due)) = split {
            events.emit(Event::InterestPeriodSplit {
                loan_id: self.loan_id,
                split_date: date,
                original_from,
                original_due,
            });
        }
        events.emit(Event::OutstandingBalanceChanged {
            loan_id: self.loan_id,
            date,
            disbursement,
            correction,
        });
        Ok(index)
    }

    /// shorten the interest period at `pos` to end at `date` and insert its
    /// tail, scaling the till-due rate factor by day count so apportionment
    /// stays linear; returns the original date range
    fn split_interest_period(
        period: &mut RepaymentPeriod,
        pos: usize,
        date: NaiveDate,
        convention: DayCountConvention,
        currency: Currency,
    ) -> (NaiveDate, NaiveDate) {
        let period_due = period.due_date;
        let head = &mut period.interest_periods[pos];
        let original_from = head.from_date;
        let original_due = head.due_date;
        let original_factor = head.rate_factor;

        let original_length = convention.days_between(head.from_date, head.due_date);
        let head_length = convention.days_between(head.from_date, date);
        let till_length = convention.days_between(head.from_date, period_due);
        let tail_till_length = convention.days_between(date, period_due);

        head.due_date = date;
        head.rate_factor = if original_length > 0 {
            original_factor * Decimal::from(head_length) / Decimal::from(original_length)
        } else {
            Decimal::ZERO
        };
        let tail_factor = original_factor - head.rate_factor;
        let tail_factor_till = if till_length > 0 {
            head.rate_factor_till_period_due_date * Decimal::from(tail_till_length)
                / Decimal::from(till_length)
        } else {
            Decimal::ZERO
        };

        let zero = Money::zero(currency);
        period.interest_periods.insert(
            pos + 1,
            InterestPeriod {
                from_date: date,
                due_date: original_due,
                rate_factor: tail_factor,
                rate_factor_till_period_due_date: tail_factor_till,
                disbursement_amount: zero,
                balance_correction_amount: zero,
                // re-derived by propagate_balances
                outstanding_loan_balance: zero,
            },
        );
        (original_from, original_due)
    }

    fn locate_period(&self, date: NaiveDate) -> Option<usize> {
        self.repayment_periods
            .iter()
            .enumerate()
            .find(|(i, rp)| rp.contains(date, *i == 0))
            .map(|(i, _)| i)
    }

    /// re-derive every outstanding balance forward from the recurrence; the
    /// very first interest period is the anchor
    fn propagate_balances(periods: &mut [RepaymentPeriod]) {
        for p in 0..periods.len() {
            for k in 0..periods[p].interest_periods.len() {
                if p == 0 && k == 0 {
                    continue;
                }
                let balance = if k == 0 {
                    let prev = &periods[p - 1];
                    let Some(last) = prev.interest_periods.last() else {
                        continue;
                    };
                    last.outstanding_loan_balance
                        + last.disbursement_amount
                        + last.balance_correction_amount
                        - prev.due_principal
                        + prev.paid_principal
                } else {
                    let prev = &periods[p].interest_periods[k - 1];
                    prev.outstanding_loan_balance
                        + prev.disbursement_amount
                        + prev.balance_correction_amount
                };
                periods[p].interest_periods[k].outstanding_loan_balance = balance;
            }
        }
    }

    /// interest periods must partition each repayment period contiguously
    fn verify_contiguity(&self, periods: &[RepaymentPeriod]) -> Result<()> {
        let mut previous_due: Option<NaiveDate> = None;
        for period in periods {
            if let Some(due) = previous_due {
                if period.from_date != due {
                    return Err(LoanError::InterestPeriodGapOrOverlap {
                        detail: format!(
                            "repayment period starting {} does not continue from {}",
                            period.from_date, due
                        ),
                    });
                }
            }
            previous_due = Some(period.due_date);

            let mut cursor = period.from_date;
            if period.interest_periods.is_empty() {
                return Err(LoanError::InterestPeriodGapOrOverlap {
                    detail: format!("repayment period due {} has no interest periods", period.due_date),
                });
            }
            for ip in &period.interest_periods {
                if ip.from_date != cursor || ip.due_date < ip.from_date {
                    return Err(LoanError::InterestPeriodGapOrOverlap {
                        detail: format!(
                            "interest period {}..{} breaks the partition at {}",
                            ip.from_date, ip.due_date, cursor
                        ),
                    });
                }
                cursor = ip.due_date;
            }
            if cursor != period.due_date {
                return Err(LoanError::InterestPeriodGapOrOverlap {
                    detail: format!(
                        "interest periods end at {} instead of {}",
                        cursor, period.due_date
                    ),
                });
            }
        }
        Ok(())
    }

    /// set a period's scheduled principal and re-derive later balances
    pub fn set_due_principal(&mut self, period_index: usize, amount: Money) -> Result<()> {
        amount.ensure_same_currency(&Money::zero(self.currency))?;
        let period = self
            .repayment_periods
            .get_mut(period_index)
            .ok_or(LoanError::PeriodOutOfRange {
                index: period_index,
            })?;
        period.due_principal = amount;
        Self::propagate_balances(&mut self.repayment_periods);
        Ok(())
    }

    /// record principal paid into a period and re-derive later balances
    pub fn record_principal_payment(&mut self, period_index: usize, amount: Money) -> Result<()> {
        amount.ensure_same_currency(&Money::zero(self.currency))?;
        let period = self
            .repayment_periods
            .get_mut(period_index)
            .ok_or(LoanError::PeriodOutOfRange {
                index: period_index,
            })?;
        period.paid_principal += amount;
        Self::propagate_balances(&mut self.repayment_periods);
        Ok(())
    }

    pub fn record_interest_payment(&mut self, period_index: usize, amount: Money) -> Result<()> {
        amount.ensure_same_currency(&Money::zero(self.currency))?;
        let period = self
            .repayment_periods
            .get_mut(period_index)
            .ok_or(LoanError::PeriodOutOfRange {
                index: period_index,
            })?;
        period.paid_interest += amount;
        Ok(())
    }

    /// apportioned due interest for one interest period
    pub fn calculated_due_interest(&self, period_index: usize, interest_index: usize) -> Result<Money> {
        let period = self
            .repayment_periods
            .get(period_index)
            .ok_or(LoanError::PeriodOutOfRange {
                index: period_index,
            })?;
        let ip = period
            .interest_periods
            .get(interest_index)
            .ok_or(LoanError::PeriodOutOfRange {
                index: interest_index,
            })?;
        Ok(Money::new(
            ip.due_interest_raw(self.day_count, period.due_date),
            self.currency,
        ))
    }

    pub fn total_due_interest(&self) -> Money {
        let raw: Decimal = self
            .repayment_periods
            .iter()
            .map(|rp| rp.due_interest_raw(self.day_count))
            .sum();
        Money::new(raw, self.currency)
    }

    /// principal is modeled as disbursements into the interest-bearing balance
    pub fn total_due_principal(&self) -> Money {
        self.repayment_periods
            .iter()
            .flat_map(|rp| rp.interest_periods.iter())
            .map(|ip| ip.disbursement_amount)
            .fold(Money::zero(self.currency), |acc, x| acc + x)
    }

    pub fn total_paid_interest(&self) -> Money {
        self.repayment_periods
            .iter()
            .map(|rp| rp.paid_interest)
            .fold(Money::zero(self.currency), |acc, x| acc + x)
    }

    pub fn total_paid_principal(&self) -> Money {
        self.repayment_periods
            .iter()
            .map(|rp| rp.paid_principal)
            .fold(Money::zero(self.currency), |acc, x| acc + x)
    }

    /// serialize the schedule state for audit read-models
    pub fn snapshot(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn usd() -> Currency {
        Currency::usd()
    }

    fn quarter_schedule() -> ProgressiveSchedule {
        ProgressiveSchedule::generate(
            Uuid::new_v4(),
            usd(),
            Rate::from_percentage(12),
            DayCountConvention::Actual365,
            &[
                (date(2024, 1, 1), date(2024, 2, 1)),
                (date(2024, 2, 1), date(2024, 3, 1)),
                (date(2024, 3, 1), date(2024, 4, 1)),
            ],
            Money::from_str_exact("340.02", usd()).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_generation_rejects_gaps() {
        let result = ProgressiveSchedule::generate(
            Uuid::new_v4(),
            usd(),
            Rate::from_percentage(12),
            DayCountConvention::Actual365,
            &[
                (date(2024, 1, 1), date(2024, 2, 1)),
                (date(2024, 2, 15), date(2024, 3, 1)),
            ],
            Money::from_major(340, usd()),
        );
        assert!(matches!(
            result,
            Err(LoanError::InterestPeriodGapOrOverlap { .. })
        ));
    }

    #[test]
    fn test_day_one_disbursement_reaches_every_balance() {
        let mut schedule = quarter_schedule();
        let mut events = EventStore::new();

        let index = schedule
            .change_outstanding_balance(
                date(2024, 1, 1),
                Money::from_major(1000, usd()),
                Money::zero(usd()),
                &mut events,
            )
            .unwrap();
        assert_eq!(index, 0);

        // the zero-length seed period holds the disbursement
        let first = &schedule.periods()[0];
        assert_eq!(first.interest_periods[0].due_date, date(2024, 1, 1));
        assert_eq!(
            first.interest_periods[0].disbursement_amount,
            Money::from_major(1000, usd())
        );
        // interest accrues on the full amount from day one
        assert_eq!(
            first.interest_periods[1].outstanding_loan_balance,
            Money::from_major(1000, usd())
        );
        // carried across the period boundary (no principal due yet)
        assert_eq!(
            schedule.periods()[1].interest_periods[0].outstanding_loan_balance,
            Money::from_major(1000, usd())
        );
        assert_eq!(schedule.total_due_principal(), Money::from_major(1000, usd()));
    }

    #[test]
    fn test_unsplit_interest_matches_direct_factor() {
        let mut schedule = quarter_schedule();
        let mut events = EventStore::new();
        schedule
            .change_outstanding_balance(
                date(2024, 1, 1),
                Money::from_major(1000, usd()),
                Money::zero(usd()),
                &mut events,
            )
            .unwrap();

        // idempotence: an unsplit period's apportioned interest equals
        // balance x rate factor computed directly
        let factor = DayCountConvention::Actual365.rate_factor(
            Rate::from_percentage(12),
            date(2024, 2, 1),
            date(2024, 3, 1),
        );
        let direct = Money::new(dec!(1000) * factor, usd());
        let period = &schedule.periods()[1];
        assert_eq!(period.due_interest(DayCountConvention::Actual365, usd()), direct);
        assert_eq!(schedule.calculated_due_interest(1, 0).unwrap(), direct);
    }

    #[test]
    fn test_mid_period_split_preserves_partition_and_interest() {
        let mut schedule = quarter_schedule();
        let mut events = EventStore::new();
        schedule
            .change_outstanding_balance(
                date(2024, 1, 1),
                Money::from_major(1000, usd()),
                Money::zero(usd()),
                &mut events,
            )
            .unwrap();

        let before = schedule.periods()[1].due_interest(DayCountConvention::Actual365, usd());

        // a pure split: no amounts, only the period boundary moves
        schedule
            .change_outstanding_balance(
                date(2024, 2, 18),
                Money::zero(usd()),
                Money::zero(usd()),
                &mut events,
            )
            .unwrap();

        let period = &schedule.periods()[1];
        assert_eq!(period.interest_periods.len(), 2);
        assert_eq!(period.interest_periods[0].from_date, date(2024, 2, 1));
        assert_eq!(period.interest_periods[0].due_date, date(2024, 2, 18));
        assert_eq!(period.interest_periods[1].from_date, date(2024, 2, 18));
        assert_eq!(period.interest_periods[1].due_date, date(2024, 3, 1));
        // both halves carry the same balance, so totals are unchanged
        assert_eq!(
            period.interest_periods[1].outstanding_loan_balance,
            period.interest_periods[0].outstanding_loan_balance
        );
        assert_eq!(
            period.due_interest(DayCountConvention::Actual365, usd()),
            before
        );
        assert!(events
            .events()
            .iter()
            .any(|e| matches!(e, Event::InterestPeriodSplit { .. })));
    }

    #[test]
    fn test_mid_period_disbursement_raises_tail_balance() {
        let mut schedule = quarter_schedule();
        let mut events = EventStore::new();
        schedule
            .change_outstanding_balance(
                date(2024, 1, 1),
                Money::from_major(1000, usd()),
                Money::zero(usd()),
                &mut events,
            )
            .unwrap();

        schedule
            .change_outstanding_balance(
                date(2024, 2, 18),
                Money::from_major(500, usd()),
                Money::zero(usd()),
                &mut events,
            )
            .unwrap();

        let period = &schedule.periods()[1];
        // the head holds the disbursement; the tail's balance includes it
        assert_eq!(
            period.interest_periods[0].disbursement_amount,
            Money::from_major(500, usd())
        );
        assert_eq!(
            period.interest_periods[1].outstanding_loan_balance,
            Money::from_major(1500, usd())
        );
        // and it carries into the next repayment period
        assert_eq!(
            schedule.periods()[2].interest_periods[0].outstanding_loan_balance,
            Money::from_major(1500, usd())
        );
    }

    #[test]
    fn test_balance_recurrence_across_period_boundary() {
        let mut schedule = quarter_schedule();
        let mut events = EventStore::new();
        schedule
            .change_outstanding_balance(
                date(2024, 1, 1),
                Money::from_major(1000, usd()),
                Money::zero(usd()),
                &mut events,
            )
            .unwrap();

        schedule
            .set_due_principal(0, Money::from_major(330, usd()))
            .unwrap();
        schedule
            .record_principal_payment(0, Money::from_major(100, usd()))
            .unwrap();

        // balance(p,first) = prev last + disb + corr - due_principal + paid_principal
        assert_eq!(
            schedule.periods()[1].interest_periods[0].outstanding_loan_balance,
            Money::from_major(1000 - 330 + 100, usd())
        );
        // within-period recurrence is unaffected by principal movement
        assert_eq!(
            schedule.periods()[0].interest_periods[1].outstanding_loan_balance,
            Money::from_major(1000, usd())
        );
        assert_eq!(schedule.total_paid_principal(), Money::from_major(100, usd()));
    }

    #[test]
    fn test_change_on_boundary_lands_in_earlier_period() {
        let mut schedule = quarter_schedule();
        let mut events = EventStore::new();

        // 2024-02-01 is period 0's due date and period 1's from date; the
        // half-open rule assigns it to period 0
        let index = schedule
            .change_outstanding_balance(
                date(2024, 2, 1),
                Money::from_major(700, usd()),
                Money::zero(usd()),
                &mut events,
            )
            .unwrap();
        assert_eq!(index, 0);
        assert_eq!(
            schedule.periods()[0]
                .interest_periods
                .last()
                .unwrap()
                .disbursement_amount,
            Money::from_major(700, usd())
        );
        assert_eq!(
            schedule.periods()[1].interest_periods[0].outstanding_loan_balance,
            Money::from_major(700, usd())
        );
    }

    #[test]
    fn test_date_outside_schedule_rejected() {
        let mut schedule = quarter_schedule();
        let mut events = EventStore::new();

        let result = schedule.change_outstanding_balance(
            date(2024, 6, 1),
            Money::from_major(100, usd()),
            Money::zero(usd()),
            &mut events,
        );
        assert!(matches!(result, Err(LoanError::DateOutsideSchedule { .. })));
    }

    #[test]
    fn test_negative_correction_lowers_balance() {
        let mut schedule = quarter_schedule();
        let mut events = EventStore::new();
        schedule
            .change_outstanding_balance(
                date(2024, 1, 1),
                Money::from_major(1000, usd()),
                Money::zero(usd()),
                &mut events,
            )
            .unwrap();

        schedule
            .change_outstanding_balance(
                date(2024, 2, 1),
                Money::zero(usd()),
                Money::from_major(-200, usd()),
                &mut events,
            )
            .unwrap();

        assert_eq!(
            schedule.periods()[1].interest_periods[0].outstanding_loan_balance,
            Money::from_major(800, usd())
        );
    }

    #[test]
    fn test_rate_lookup_prefers_latest_effective() {
        let mut schedule = quarter_schedule();
        schedule.add_rate_change(date(2024, 2, 1), Rate::from_percentage(10));
        schedule.add_rate_change(date(2024, 3, 1), Rate::from_percentage(8));

        assert_eq!(schedule.interest_rate(date(2024, 1, 15)), Rate::from_percentage(12));
        assert_eq!(schedule.interest_rate(date(2024, 2, 1)), Rate::from_percentage(10));
        assert_eq!(schedule.interest_rate(date(2024, 2, 20)), Rate::from_percentage(10));
        assert_eq!(schedule.interest_rate(date(2024, 4, 1)), Rate::from_percentage(8));
    }

    #[test]
    fn test_snapshot_serializes() {
        let schedule = quarter_schedule();
        let value = schedule.snapshot().unwrap();
        assert!(value.get("repayment_periods").is_some());
    }
}
