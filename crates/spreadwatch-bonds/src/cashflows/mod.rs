//! Coupon schedules and accrued interest.
//!
//! - [`CouponSchedule`]: coupon dates walked back from maturity
//! - [`ScheduleCache`]: explicit cache of schedules keyed by the inputs
//!   that determine them
//! - [`accrued_interest`]: accrued interest for one settlement date

mod accrued;
mod cache;
mod schedule;

pub use accrued::{accrued_interest, accrued_interest_with_schedule, AccrualStatus, AccruedInterest};
pub use cache::{ScheduleCache, ScheduleKey};
pub use schedule::{CouponPeriod, CouponSchedule, DEFAULT_LOOKBACK_MARGIN_DAYS};
