pub mod allocation;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod installment;
pub mod schedule;
pub mod types;

// re-export key types
pub use allocation::{
    AllocationEngine, AllocationStrategy, AllocationStrategyCode, ChargebackHandler,
    ComponentOrder, InstallmentOrder, OverpaymentPolicy,
};
pub use config::{GraceConfig, LoanProductConfig};
pub use decimal::{Currency, CurrencyCode, Money, Rate};
pub use errors::{LoanError, Result};
pub use events::{Event, EventStore};
pub use installment::{ComponentAmounts, Installment};
pub use schedule::{
    DayCountConvention, EmiAdjustment, InterestPeriod, InterestRate, ProgressiveSchedule,
    RepaymentPeriod,
};
pub use types::{
    AllocationEntry, AllocationMapping, Charge, ChargeComponent, ChargeKind, LoanId,
    OverpaymentDisposition, Transaction, TransactionId, TransactionType,
};

// re-export external dependencies that users will need
pub use chrono;
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
