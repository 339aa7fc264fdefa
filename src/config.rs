use serde::{Deserialize, Serialize};

use crate::allocation::AllocationStrategyCode;
use crate::decimal::{Currency, Rate};
use crate::schedule::DayCountConvention;

/// grace settings the caller applies when generating a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraceConfig {
    /// leading periods with no principal due
    pub principal_grace_periods: u32,
    /// leading periods with no interest charged
    pub interest_free_periods: u32,
}

impl GraceConfig {
    pub const NONE: GraceConfig = GraceConfig {
        principal_grace_periods: 0,
        interest_free_periods: 0,
    };
}

/// product parameters resolved by the caller before invoking the core
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanProductConfig {
    pub currency: Currency,
    pub nominal_rate: Rate,
    pub day_count: DayCountConvention,
    pub allocation_strategy: AllocationStrategyCode,
    /// EMI amounts are rounded to this multiple of the currency's major unit
    pub emi_in_multiples_of: u32,
    pub grace: GraceConfig,
}

impl LoanProductConfig {
    /// declining-balance product with the standard due-first allocation
    pub fn declining_balance(currency: Currency, nominal_rate: Rate) -> Self {
        Self {
            currency,
            nominal_rate,
            day_count: DayCountConvention::Actual365,
            allocation_strategy: AllocationStrategyCode::PenaltiesFeesInterestPrincipal,
            emi_in_multiples_of: 1,
            grace: GraceConfig::NONE,
        }
    }

    /// principal-first product on a 30/360 basis
    pub fn principal_first(currency: Currency, nominal_rate: Rate) -> Self {
        Self {
            currency,
            nominal_rate,
            day_count: DayCountConvention::Thirty360,
            allocation_strategy: AllocationStrategyCode::PrincipalInterestPenaltiesFees,
            emi_in_multiples_of: 1,
            grace: GraceConfig::NONE,
        }
    }
}
