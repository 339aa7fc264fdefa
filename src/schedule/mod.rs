pub mod day_count;
pub mod emi;
pub mod progressive;

pub use day_count::DayCountConvention;
pub use emi::{best_candidate, EmiAdjustment};
pub use progressive::{InterestPeriod, InterestRate, ProgressiveSchedule, RepaymentPeriod};
