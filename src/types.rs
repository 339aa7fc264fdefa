use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Currency, Money};
use crate::errors::{LoanError, Result};

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for a monetary transaction
pub type TransactionId = Uuid;

/// the four accounting components a payment splits across
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChargeComponent {
    Principal,
    Interest,
    Fee,
    Penalty,
}

impl ChargeComponent {
    pub const ALL: [ChargeComponent; 4] = [
        ChargeComponent::Principal,
        ChargeComponent::Interest,
        ChargeComponent::Fee,
        ChargeComponent::Penalty,
    ];
}

/// transaction types the allocation engine consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    Repayment,
    Waiver,
    Recovery,
    Chargeback,
    MerchantRefund,
}

/// a monetary transaction against a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub amount: Money,
    pub date: NaiveDate,
    pub kind: TransactionType,
    /// original transaction a chargeback reverses
    pub related_transaction: Option<TransactionId>,
}

impl Transaction {
    pub fn repayment(amount: Money, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            date,
            kind: TransactionType::Repayment,
            related_transaction: None,
        }
    }

    pub fn waiver(amount: Money, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            date,
            kind: TransactionType::Waiver,
            related_transaction: None,
        }
    }

    pub fn recovery(amount: Money, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            date,
            kind: TransactionType::Recovery,
            related_transaction: None,
        }
    }

    pub fn chargeback(amount: Money, date: NaiveDate, original: TransactionId) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            date,
            kind: TransactionType::Chargeback,
            related_transaction: Some(original),
        }
    }

    pub fn merchant_refund(amount: Money, date: NaiveDate, original: TransactionId) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            date,
            kind: TransactionType::MerchantRefund,
            related_transaction: Some(original),
        }
    }

    /// rejected before any mutation
    pub fn validate(&self, loan_currency: Currency) -> Result<()> {
        if self.amount.is_negative() {
            return Err(LoanError::InvalidAmount {
                amount: self.amount.to_string(),
            });
        }
        if self.amount.currency().code != loan_currency.code {
            return Err(LoanError::CurrencyMismatch {
                expected: loan_currency.code,
                actual: self.amount.currency().code,
            });
        }
        Ok(())
    }
}

/// fee or penalty charge attached to the loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeKind {
    Fee,
    Penalty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    pub id: Uuid,
    pub name: String,
    pub kind: ChargeKind,
    pub amount: Money,
    pub paid: Money,
}

impl Charge {
    pub fn new(name: impl Into<String>, kind: ChargeKind, amount: Money) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            amount,
            paid: Money::zero(amount.currency()),
        }
    }

    pub fn outstanding(&self) -> Money {
        (self.amount - self.paid).max(Money::zero(self.amount.currency()))
    }

    /// apply a payment, capped at the outstanding amount; returns what stuck
    pub fn pay(&mut self, amount: Money) -> Money {
        let applied = amount.min(self.outstanding());
        self.paid += applied;
        applied
    }
}

/// where an unallocated remainder went
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverpaymentDisposition {
    /// nothing left over
    None,
    /// credited to the loan account as advance credit
    CreditedToAccount,
    /// held for the caller to decide
    HeldUnallocated,
}

/// one (installment, component, amount) allocation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub period_number: u32,
    pub component: ChargeComponent,
    pub amount: Money,
}

/// component-level allocation produced for one transaction
///
/// conservation law: `total_allocated() + unallocated == transaction amount`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationMapping {
    pub transaction_id: TransactionId,
    pub entries: Vec<AllocationEntry>,
    pub unallocated: Money,
    pub disposition: OverpaymentDisposition,
}

impl AllocationMapping {
    pub fn new(transaction_id: TransactionId, currency: Currency) -> Self {
        Self {
            transaction_id,
            entries: Vec::new(),
            unallocated: Money::zero(currency),
            disposition: OverpaymentDisposition::None,
        }
    }

    pub fn record(&mut self, period_number: u32, component: ChargeComponent, amount: Money) {
        self.entries.push(AllocationEntry {
            period_number,
            component,
            amount,
        });
    }

    pub fn total_allocated(&self) -> Money {
        self.entries
            .iter()
            .map(|e| e.amount)
            .fold(Money::zero(self.unallocated.currency()), |acc, x| acc + x)
    }

    pub fn total(&self) -> Money {
        self.total_allocated() + self.unallocated
    }

    pub fn allocated_to(&self, component: ChargeComponent) -> Money {
        self.entries
            .iter()
            .filter(|e| e.component == component)
            .map(|e| e.amount)
            .fold(Money::zero(self.unallocated.currency()), |acc, x| acc + x)
    }
}
