use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{ChargeComponent, LoanId, OverpaymentDisposition, TransactionId};

/// business events emitted during allocation and schedule recalculation,
/// collected for the caller to publish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    PaymentAllocated {
        loan_id: LoanId,
        transaction_id: TransactionId,
        amount: Money,
        allocated_to_principal: Money,
        allocated_to_interest: Money,
        allocated_to_fees: Money,
        allocated_to_penalties: Money,
        unallocated: Money,
        date: NaiveDate,
    },
    WaiverApplied {
        loan_id: LoanId,
        transaction_id: TransactionId,
        component: ChargeComponent,
        amount_waived: Money,
        unallocated: Money,
        date: NaiveDate,
    },
    OverpaymentReceived {
        loan_id: LoanId,
        transaction_id: TransactionId,
        amount: Money,
        disposition: OverpaymentDisposition,
        date: NaiveDate,
    },
    ChargebackApplied {
        loan_id: LoanId,
        transaction_id: TransactionId,
        original_transaction_id: TransactionId,
        amount_reinstated: Money,
        date: NaiveDate,
    },
    ObligationsMet {
        loan_id: LoanId,
        period_number: u32,
        date: NaiveDate,
    },
    OutstandingBalanceChanged {
        loan_id: LoanId,
        date: NaiveDate,
        disbursement: Money,
        correction: Money,
    },
    InterestPeriodSplit {
        loan_id: LoanId,
        split_date: NaiveDate,
        original_from: NaiveDate,
        original_due: NaiveDate,
    },
    EmiAdjusted {
        loan_id: LoanId,
        original_emi: Money,
        adjusted_emi: Money,
        adjustment: Money,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
