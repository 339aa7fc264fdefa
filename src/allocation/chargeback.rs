use crate::decimal::Currency;
use crate::errors::{LoanError, Result};
use crate::events::{Event, EventStore};
use crate::installment::Installment;
use crate::types::{
    AllocationMapping, LoanId, OverpaymentDisposition, Transaction, TransactionType,
};

/// chargeback/reversal handler
///
/// the inverse of forward allocation: given the original transaction's
/// mapping, reinstates outstanding amounts up to the chargeback amount,
/// walking the original allocation LIFO. reinstatement is capped per
/// component at what is still marked paid, so outstanding never exceeds the
/// installment's original due amount.
pub struct ChargebackHandler {
    loan_id: LoanId,
}

impl ChargebackHandler {
    pub fn new(loan_id: LoanId) -> Self {
        Self { loan_id }
    }

    pub fn apply(
        &self,
        original: &AllocationMapping,
        chargeback: &Transaction,
        currency: Currency,
        installments: &mut Vec<Installment>,
        events: &mut EventStore,
    ) -> Result<AllocationMapping> {
        if chargeback.kind != TransactionType::Chargeback {
            return Err(LoanError::UnsupportedTransaction {
                kind: chargeback.kind,
            });
        }
        chargeback.validate(currency)?;

        let reversible = original.total_allocated();
        if chargeback.amount > reversible {
            return Err(LoanError::ChargebackExceedsOriginal {
                requested: chargeback.amount,
                reversible,
            });
        }

        let mut working = installments.clone();
        let mut reversal = AllocationMapping::new(chargeback.id, currency);
        let mut remaining = chargeback.amount;

        for entry in original.entries.iter().rev() {
            if remaining.is_zero() {
                break;
            }
            let installment = working
                .iter_mut()
                .find(|i| i.period_number == entry.period_number);
            let Some(installment) = installment else {
                continue;
            };
            let target = remaining.min(entry.amount);
            let restored = installment.unpay(entry.component, target);
            if restored.is_positive() {
                reversal.record(entry.period_number, entry.component, restored);
                remaining -= restored;
            }
        }

        // what could not be reinstated (e.g. already reversed) stays typed
        if remaining.is_positive() {
            reversal.unallocated = remaining;
            reversal.disposition = OverpaymentDisposition::HeldUnallocated;
        }

        events.emit(Event::ChargebackApplied {
            loan_id: self.loan_id,
            transaction_id: chargeback.id,
            original_transaction_id: original.transaction_id,
            amount_reinstated: reversal.total_allocated(),
            date: chargeback.date,
        });

        *installments = working;
        Ok(reversal)
    }
}
