//! Domain types shared across the workspace.
//!
//! - [`Date`]: calendar date with month arithmetic that clamps to month end
//! - [`Frequency`]: coupon payments per year

mod date;
mod frequency;

pub use date::Date;
pub use frequency::Frequency;
