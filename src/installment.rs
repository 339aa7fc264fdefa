use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Currency, Money};
use crate::types::ChargeComponent;

/// per-component money amounts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentAmounts {
    pub principal: Money,
    pub interest: Money,
    pub fee: Money,
    pub penalty: Money,
}

impl ComponentAmounts {
    pub fn zero(currency: Currency) -> Self {
        let zero = Money::zero(currency);
        Self {
            principal: zero,
            interest: zero,
            fee: zero,
            penalty: zero,
        }
    }

    pub fn new(principal: Money, interest: Money, fee: Money, penalty: Money) -> Self {
        Self {
            principal,
            interest,
            fee,
            penalty,
        }
    }

    pub fn get(&self, component: ChargeComponent) -> Money {
        match component {
            ChargeComponent::Principal => self.principal,
            ChargeComponent::Interest => self.interest,
            ChargeComponent::Fee => self.fee,
            ChargeComponent::Penalty => self.penalty,
        }
    }

    pub fn get_mut(&mut self, component: ChargeComponent) -> &mut Money {
        match component {
            ChargeComponent::Principal => &mut self.principal,
            ChargeComponent::Interest => &mut self.interest,
            ChargeComponent::Fee => &mut self.fee,
            ChargeComponent::Penalty => &mut self.penalty,
        }
    }

    pub fn total(&self) -> Money {
        self.principal + self.interest + self.fee + self.penalty
    }
}

/// one scheduled repayment period's ledger entry
///
/// invariant: `due >= paid + waived + written_off` per component; violated
/// only transiently during chargeback replay, which re-derives from scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub period_number: u32,
    pub from_date: NaiveDate,
    pub due_date: NaiveDate,
    pub due: ComponentAmounts,
    pub paid: ComponentAmounts,
    pub waived: ComponentAmounts,
    pub written_off: ComponentAmounts,
    pub obligations_met: bool,
}

impl Installment {
    pub fn new(
        period_number: u32,
        from_date: NaiveDate,
        due_date: NaiveDate,
        due: ComponentAmounts,
    ) -> Self {
        let currency = due.principal.currency();
        Self {
            period_number,
            from_date,
            due_date,
            due,
            paid: ComponentAmounts::zero(currency),
            waived: ComponentAmounts::zero(currency),
            written_off: ComponentAmounts::zero(currency),
            obligations_met: false,
        }
    }

    pub fn currency(&self) -> Currency {
        self.due.principal.currency()
    }

    /// `due − paid − waived − written_off`, floored at zero
    pub fn outstanding(&self, component: ChargeComponent) -> Money {
        let raw = self.due.get(component)
            - self.paid.get(component)
            - self.waived.get(component)
            - self.written_off.get(component);
        raw.max(Money::zero(self.currency()))
    }

    pub fn total_outstanding(&self) -> Money {
        ChargeComponent::ALL
            .iter()
            .map(|&c| self.outstanding(c))
            .fold(Money::zero(self.currency()), |acc, x| acc + x)
    }

    /// due/advance boundary rule: the first period includes its `from_date`,
    /// subsequent periods exclude it, and every period includes its
    /// `due_date`; anything past `due_date` is overdue and therefore due
    pub fn is_due(&self, on: NaiveDate) -> bool {
        if self.period_number <= 1 {
            on >= self.from_date
        } else {
            on > self.from_date
        }
    }

    pub fn is_advance(&self, on: NaiveDate) -> bool {
        !self.is_due(on)
    }

    pub fn is_overdue(&self, on: NaiveDate) -> bool {
        on > self.due_date
    }

    /// apply a payment to one component, capped at its outstanding amount;
    /// returns the amount that stuck
    pub fn pay(&mut self, component: ChargeComponent, amount: Money) -> Money {
        let applied = amount.min(self.outstanding(component));
        if applied.is_positive() {
            *self.paid.get_mut(component) += applied;
        }
        self.refresh_obligations_met();
        applied
    }

    /// reverse a prior payment on one component, capped at what was paid so
    /// outstanding can never exceed the original due amount
    pub fn unpay(&mut self, component: ChargeComponent, amount: Money) -> Money {
        let restored = amount.min(self.paid.get(component));
        if restored.is_positive() {
            *self.paid.get_mut(component) -= restored;
        }
        self.refresh_obligations_met();
        restored
    }

    /// waive part of one component's outstanding amount
    pub fn waive(&mut self, component: ChargeComponent, amount: Money) -> Money {
        let applied = amount.min(self.outstanding(component));
        if applied.is_positive() {
            *self.waived.get_mut(component) += applied;
        }
        self.refresh_obligations_met();
        applied
    }

    /// write off part of one component's outstanding amount
    pub fn write_off(&mut self, component: ChargeComponent, amount: Money) -> Money {
        let applied = amount.min(self.outstanding(component));
        if applied.is_positive() {
            *self.written_off.get_mut(component) += applied;
        }
        self.refresh_obligations_met();
        applied
    }

    fn refresh_obligations_met(&mut self) {
        self.obligations_met = ChargeComponent::ALL
            .iter()
            .all(|&c| self.outstanding(c).is_zero());
    }
}
