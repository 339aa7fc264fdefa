use chrono::NaiveDate;
use thiserror::Error;

use crate::decimal::{CurrencyCode, Money};
use crate::types::TransactionType;

#[derive(Error, Debug)]
pub enum LoanError {
    #[error("currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch {
        expected: CurrencyCode,
        actual: CurrencyCode,
    },

    #[error("invalid amount: {amount}")]
    InvalidAmount { amount: String },

    #[error("invalid currency code: {code}")]
    InvalidCurrencyCode { code: String },

    #[error("unallocatable amount: {remaining} has no eligible installment")]
    UnallocatableAmount { remaining: Money },

    #[error("interest period gap or overlap: {detail}")]
    InterestPeriodGapOrOverlap { detail: String },

    #[error("date {date} is outside the repayment schedule")]
    DateOutsideSchedule { date: NaiveDate },

    #[error("invalid date: {message}")]
    InvalidDate { message: String },

    #[error("chargeback {requested} exceeds reversible amount {reversible}")]
    ChargebackExceedsOriginal {
        requested: Money,
        reversible: Money,
    },

    #[error("transaction type {kind:?} is not handled by this engine")]
    UnsupportedTransaction { kind: TransactionType },

    #[error("repayment period index {index} is out of range")]
    PeriodOutOfRange { index: usize },
}

pub type Result<T> = std::result::Result<T, LoanError>;
