use crate::decimal::Currency;
use crate::errors::{LoanError, Result};
use crate::events::{Event, EventStore};
use crate::installment::Installment;
use crate::types::{
    AllocationMapping, Charge, ChargeComponent, ChargeKind, LoanId, OverpaymentDisposition,
    Transaction, TransactionType,
};

use super::strategy::{AllocationStrategy, AllocationStrategyCode, InstallmentOrder, OverpaymentPolicy};

/// payment allocation engine
///
/// splits one transaction's amount across installments and components per the
/// configured strategy. all mutation happens on a working copy that is only
/// swapped in on success, so a failed allocation leaves the schedule untouched.
pub struct AllocationEngine {
    loan_id: LoanId,
    strategy: AllocationStrategy,
}

impl AllocationEngine {
    pub fn new(loan_id: LoanId, strategy: AllocationStrategy) -> Self {
        Self { loan_id, strategy }
    }

    pub fn with_code(loan_id: LoanId, code: AllocationStrategyCode) -> Self {
        Self::new(loan_id, code.strategy())
    }

    pub fn strategy(&self) -> &AllocationStrategy {
        &self.strategy
    }

    /// allocate a forward transaction (repayment, recovery, merchant refund)
    ///
    /// waivers are routed to the single-component path; chargebacks belong to
    /// `ChargebackHandler` and are rejected here.
    pub fn allocate(
        &self,
        transaction: &Transaction,
        currency: Currency,
        installments: &mut Vec<Installment>,
        charges: &mut [Charge],
        events: &mut EventStore,
    ) -> Result<AllocationMapping> {
        match transaction.kind {
            TransactionType::Waiver => {
                self.allocate_waiver(transaction, currency, installments, ChargeComponent::Interest, events)
            }
            TransactionType::Chargeback => Err(LoanError::UnsupportedTransaction {
                kind: transaction.kind,
            }),
            _ => self.allocate_forward(transaction, currency, installments, charges, events),
        }
    }

    fn allocate_forward(
        &self,
        transaction: &Transaction,
        currency: Currency,
        installments: &mut Vec<Installment>,
        charges: &mut [Charge],
        events: &mut EventStore,
    ) -> Result<AllocationMapping> {
        self.validate(transaction, currency, installments)?;

        let mut working = installments.clone();
        let mut working_charges = charges.to_vec();
        let mut mapping = AllocationMapping::new(transaction.id, currency);
        let mut remaining = transaction.amount;

        match self.strategy.installment_order {
            InstallmentOrder::DueDateAscending => {
                for installment in working.iter_mut() {
                    if remaining.is_zero() {
                        break;
                    }
                    let order = if installment.is_due(transaction.date) {
                        self.strategy.due_order
                    } else {
                        self.strategy.advance_order
                    };
                    for component in order.iter() {
                        if remaining.is_zero() {
                            break;
                        }
                        let applied = installment.pay(component, remaining);
                        if applied.is_positive() {
                            mapping.record(installment.period_number, component, applied);
                            remaining -= applied;
                        }
                    }
                }
            }
            InstallmentOrder::OverdueComponentFirst => {
                // one component across every due installment before the next
                for component in self.strategy.due_order.iter() {
                    if remaining.is_zero() {
                        break;
                    }
                    for installment in working.iter_mut() {
                        if remaining.is_zero() {
                            break;
                        }
                        if !installment.is_due(transaction.date) {
                            continue;
                        }
                        let applied = installment.pay(component, remaining);
                        if applied.is_positive() {
                            mapping.record(installment.period_number, component, applied);
                            remaining -= applied;
                        }
                    }
                }
                // advance installments are walked per-installment
                for installment in working.iter_mut() {
                    if remaining.is_zero() {
                        break;
                    }
                    if installment.is_due(transaction.date) {
                        continue;
                    }
                    for component in self.strategy.advance_order.iter() {
                        if remaining.is_zero() {
                            break;
                        }
                        let applied = installment.pay(component, remaining);
                        if applied.is_positive() {
                            mapping.record(installment.period_number, component, applied);
                            remaining -= applied;
                        }
                    }
                }
            }
        }

        self.distribute_to_charges(&mapping, &mut working_charges);

        if remaining.is_positive() {
            match self.strategy.overpayment {
                OverpaymentPolicy::CreditToAccount => {
                    mapping.unallocated = remaining;
                    mapping.disposition = OverpaymentDisposition::CreditedToAccount;
                }
                OverpaymentPolicy::HoldUnallocated => {
                    mapping.unallocated = remaining;
                    mapping.disposition = OverpaymentDisposition::HeldUnallocated;
                }
                OverpaymentPolicy::Reject => {
                    return Err(LoanError::UnallocatableAmount { remaining });
                }
            }
            events.emit(Event::OverpaymentReceived {
                loan_id: self.loan_id,
                transaction_id: transaction.id,
                amount: remaining,
                disposition: mapping.disposition,
                date: transaction.date,
            });
        }

        for (before, after) in installments.iter().zip(working.iter()) {
            if after.obligations_met && !before.obligations_met {
                events.emit(Event::ObligationsMet {
                    loan_id: self.loan_id,
                    period_number: after.period_number,
                    date: transaction.date,
                });
            }
        }

        events.emit(Event::PaymentAllocated {
            loan_id: self.loan_id,
            transaction_id: transaction.id,
            amount: transaction.amount,
            allocated_to_principal: mapping.allocated_to(ChargeComponent::Principal),
            allocated_to_interest: mapping.allocated_to(ChargeComponent::Interest),
            allocated_to_fees: mapping.allocated_to(ChargeComponent::Fee),
            allocated_to_penalties: mapping.allocated_to(ChargeComponent::Penalty),
            unallocated: mapping.unallocated,
            date: transaction.date,
        });

        *installments = working;
        for (charge, updated) in charges.iter_mut().zip(working_charges) {
            *charge = updated;
        }
        Ok(mapping)
    }

    /// single-component waiver: allocates only against the target component's
    /// outstanding amount, spilling to later installments when one is not
    /// enough; the remainder stays unallocated
    pub fn allocate_waiver(
        &self,
        transaction: &Transaction,
        currency: Currency,
        installments: &mut Vec<Installment>,
        component: ChargeComponent,
        events: &mut EventStore,
    ) -> Result<AllocationMapping> {
        self.validate(transaction, currency, installments)?;

        let mut working = installments.clone();
        let mut mapping = AllocationMapping::new(transaction.id, currency);
        let mut remaining = transaction.amount;

        for installment in working.iter_mut() {
            if remaining.is_zero() {
                break;
            }
            let applied = installment.waive(component, remaining);
            if applied.is_positive() {
                mapping.record(installment.period_number, component, applied);
                remaining -= applied;
            }
        }

        if remaining.is_positive() {
            mapping.unallocated = remaining;
            mapping.disposition = OverpaymentDisposition::HeldUnallocated;
        }

        events.emit(Event::WaiverApplied {
            loan_id: self.loan_id,
            transaction_id: transaction.id,
            component,
            amount_waived: mapping.total_allocated(),
            unallocated: mapping.unallocated,
            date: transaction.date,
        });

        *installments = working;
        Ok(mapping)
    }

    fn validate(
        &self,
        transaction: &Transaction,
        currency: Currency,
        installments: &[Installment],
    ) -> Result<()> {
        transaction.validate(currency)?;
        for installment in installments {
            if installment.currency().code != currency.code {
                return Err(LoanError::CurrencyMismatch {
                    expected: currency.code,
                    actual: installment.currency().code,
                });
            }
        }
        Ok(())
    }

    /// mark fee and penalty charges paid from the mapped component totals,
    /// oldest charge first
    fn distribute_to_charges(&self, mapping: &AllocationMapping, charges: &mut [Charge]) {
        for (component, kind) in [
            (ChargeComponent::Fee, ChargeKind::Fee),
            (ChargeComponent::Penalty, ChargeKind::Penalty),
        ] {
            let mut portion = mapping.allocated_to(component);
            for charge in charges.iter_mut().filter(|c| c.kind == kind) {
                if portion.is_zero() {
                    break;
                }
                let applied = charge.pay(portion);
                portion -= applied;
            }
        }
    }
}
