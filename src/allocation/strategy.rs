use serde::{Deserialize, Serialize};

use crate::types::ChargeComponent;

/// fixed priority order over the four components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentOrder([ChargeComponent; 4]);

impl ComponentOrder {
    pub const fn new(order: [ChargeComponent; 4]) -> Self {
        ComponentOrder(order)
    }

    /// penalty -> fee -> interest -> principal (due-first products)
    pub const PENALTY_FEE_INTEREST_PRINCIPAL: ComponentOrder = ComponentOrder([
        ChargeComponent::Penalty,
        ChargeComponent::Fee,
        ChargeComponent::Interest,
        ChargeComponent::Principal,
    ]);

    /// principal -> interest -> fee -> penalty (principal-first products)
    pub const PRINCIPAL_INTEREST_FEE_PENALTY: ComponentOrder = ComponentOrder([
        ChargeComponent::Principal,
        ChargeComponent::Interest,
        ChargeComponent::Fee,
        ChargeComponent::Penalty,
    ]);

    /// interest -> principal -> penalty -> fee
    pub const INTEREST_PRINCIPAL_PENALTY_FEE: ComponentOrder = ComponentOrder([
        ChargeComponent::Interest,
        ChargeComponent::Principal,
        ChargeComponent::Penalty,
        ChargeComponent::Fee,
    ]);

    /// penalty -> interest -> principal -> fee
    pub const PENALTY_INTEREST_PRINCIPAL_FEE: ComponentOrder = ComponentOrder([
        ChargeComponent::Penalty,
        ChargeComponent::Interest,
        ChargeComponent::Principal,
        ChargeComponent::Fee,
    ]);

    pub fn components(&self) -> [ChargeComponent; 4] {
        self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = ChargeComponent> + '_ {
        self.0.iter().copied()
    }
}

/// how competing installments are walked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallmentOrder {
    /// earliest due date first, all components of one installment before the next
    DueDateAscending,
    /// one component across every due installment before the next component;
    /// advance installments are then walked per-installment
    OverdueComponentFirst,
}

/// what happens to a remainder no installment can absorb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverpaymentPolicy {
    /// credit the remainder to the account as advance credit
    CreditToAccount,
    /// keep the remainder on the mapping for the caller to decide
    HoldUnallocated,
    /// reject the transaction, leaving installments untouched
    Reject,
}

/// one allocation policy: installment order, component order for due and for
/// advance installments, and overpayment handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationStrategy {
    pub installment_order: InstallmentOrder,
    pub due_order: ComponentOrder,
    pub advance_order: ComponentOrder,
    pub overpayment: OverpaymentPolicy,
}

impl AllocationStrategy {
    /// standard due-first policy: penalties, fees, interest, principal
    pub fn standard() -> Self {
        Self {
            installment_order: InstallmentOrder::DueDateAscending,
            due_order: ComponentOrder::PENALTY_FEE_INTEREST_PRINCIPAL,
            advance_order: ComponentOrder::PENALTY_FEE_INTEREST_PRINCIPAL,
            overpayment: OverpaymentPolicy::CreditToAccount,
        }
    }

    /// principal-first policy
    pub fn principal_first() -> Self {
        Self {
            installment_order: InstallmentOrder::DueDateAscending,
            due_order: ComponentOrder::PRINCIPAL_INTEREST_FEE_PENALTY,
            advance_order: ComponentOrder::PRINCIPAL_INTEREST_FEE_PENALTY,
            overpayment: OverpaymentPolicy::CreditToAccount,
        }
    }
}

/// named product codes, each a fixed choice along the four policy axes
///
/// the order tables are product requirements confirmed against each bank's
/// behavior table; a deployment with different tables constructs
/// `AllocationStrategy` directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationStrategyCode {
    PenaltiesFeesInterestPrincipal,
    PrincipalInterestPenaltiesFees,
    InterestPrincipalPenaltiesFees,
    DuePenIntPriFeeInAdvancePenIntPriFee,
    OverdueComponentFirst,
}

impl AllocationStrategyCode {
    pub fn strategy(self) -> AllocationStrategy {
        match self {
            AllocationStrategyCode::PenaltiesFeesInterestPrincipal => AllocationStrategy::standard(),
            AllocationStrategyCode::PrincipalInterestPenaltiesFees => {
                AllocationStrategy::principal_first()
            }
            AllocationStrategyCode::InterestPrincipalPenaltiesFees => AllocationStrategy {
                installment_order: InstallmentOrder::DueDateAscending,
                due_order: ComponentOrder::INTEREST_PRINCIPAL_PENALTY_FEE,
                advance_order: ComponentOrder::INTEREST_PRINCIPAL_PENALTY_FEE,
                overpayment: OverpaymentPolicy::CreditToAccount,
            },
            AllocationStrategyCode::DuePenIntPriFeeInAdvancePenIntPriFee => AllocationStrategy {
                installment_order: InstallmentOrder::DueDateAscending,
                due_order: ComponentOrder::PENALTY_INTEREST_PRINCIPAL_FEE,
                advance_order: ComponentOrder::PENALTY_INTEREST_PRINCIPAL_FEE,
                overpayment: OverpaymentPolicy::CreditToAccount,
            },
            AllocationStrategyCode::OverdueComponentFirst => AllocationStrategy {
                installment_order: InstallmentOrder::OverdueComponentFirst,
                due_order: ComponentOrder::INTEREST_PRINCIPAL_PENALTY_FEE,
                advance_order: ComponentOrder::INTEREST_PRINCIPAL_PENALTY_FEE,
                overpayment: OverpaymentPolicy::CreditToAccount,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_order_iteration() {
        let order: Vec<_> = ComponentOrder::PENALTY_INTEREST_PRINCIPAL_FEE.iter().collect();
        assert_eq!(
            order,
            vec![
                ChargeComponent::Penalty,
                ChargeComponent::Interest,
                ChargeComponent::Principal,
                ChargeComponent::Fee,
            ]
        );
    }

    #[test]
    fn test_code_resolution() {
        let s = AllocationStrategyCode::PenaltiesFeesInterestPrincipal.strategy();
        assert_eq!(s.installment_order, InstallmentOrder::DueDateAscending);
        assert_eq!(s.due_order, ComponentOrder::PENALTY_FEE_INTEREST_PRINCIPAL);

        let s = AllocationStrategyCode::OverdueComponentFirst.strategy();
        assert_eq!(s.installment_order, InstallmentOrder::OverdueComponentFirst);
    }
}
