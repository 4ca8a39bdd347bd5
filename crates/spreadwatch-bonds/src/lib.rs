//! # Spreadwatch Bonds
//!
//! Valuation of fixed-coupon government bonds from a clean price:
//!
//! - **Terms**: [`BondTerms`], built only through named conversions
//!   ([`BondTermsBuilder`], [`BondRecord`])
//! - **Cash Flows**: coupon schedules walked back from maturity, an explicit
//!   [`ScheduleCache`], and accrued interest per settlement date
//! - **Pricing**: yield to maturity, price from yield, durations
//!
//! ## Example
//!
//! ```rust
//! use spreadwatch_bonds::prelude::*;
//! use spreadwatch_core::Date;
//! use rust_decimal_macros::dec;
//!
//! let terms = BondTermsBuilder::new("RU000A0JXFM1")
//!     .maturity(Date::from_ymd(2032, 9, 1).unwrap())
//!     .coupon_rate(dec!(8.0))
//!     .build()
//!     .unwrap();
//!
//! let settlement = Date::from_ymd(2027, 12, 1).unwrap();
//! let result = YieldSolver::new().solve(95.0, &terms, settlement).unwrap();
//! assert!(result.yield_percent > 8.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::similar_names)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::float_cmp)]

pub mod cashflows;
pub mod error;
pub mod pricing;
pub mod sources;
pub mod terms;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::cashflows::{
        accrued_interest, AccrualStatus, AccruedInterest, CouponPeriod, CouponSchedule,
        ScheduleCache,
    };
    pub use crate::error::{BondError, BondResult};
    pub use crate::pricing::{
        approximate_yield, macaulay_duration, modified_duration, price_from_yield, SolveMethod,
        YieldResult, YieldSolver,
    };
    pub use crate::sources::BondRecord;
    pub use crate::terms::{BondTerms, BondTermsBuilder};
}

pub use error::{BondError, BondResult};
pub use terms::{BondTerms, BondTermsBuilder};
