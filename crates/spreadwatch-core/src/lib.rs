//! # Spreadwatch Core
//!
//! Shared building blocks for the Spreadwatch bond analytics engine:
//!
//! - **Types**: [`Date`] and coupon [`Frequency`]
//! - **Day Count Conventions**: how days between coupon dates are counted,
//!   and how a partial coupon period is expressed as a fraction
//!
//! Nothing in this crate performs I/O.
//!
//! ## Example
//!
//! ```rust
//! use spreadwatch_core::prelude::*;
//!
//! let last = Date::from_ymd(2025, 1, 15).unwrap();
//! let next = Date::from_ymd(2025, 7, 15).unwrap();
//! let settle = Date::from_ymd(2025, 4, 15).unwrap();
//!
//! let dc = DayCountConvention::ActActIcma;
//! let fraction = dc.accrual_fraction(last, settle, next, Frequency::SemiAnnual);
//! assert!(fraction > rust_decimal::Decimal::ZERO);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::uninlined_format_args)]

pub mod daycounts;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{Date, Frequency};
}

pub use daycounts::{DayCount, DayCountConvention};
pub use error::{CoreError, CoreResult};
pub use types::{Date, Frequency};
