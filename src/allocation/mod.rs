pub mod chargeback;
pub mod engine;
pub mod strategy;

pub use chargeback::ChargebackHandler;
pub use engine::AllocationEngine;
pub use strategy::{
    AllocationStrategy, AllocationStrategyCode, ComponentOrder, InstallmentOrder,
    OverpaymentPolicy,
};
