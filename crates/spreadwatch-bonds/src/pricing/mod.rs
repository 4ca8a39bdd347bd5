//! Bond pricing from a clean price or a yield.
//!
//! - [`YieldSolver`]: yield to maturity from a clean price (Newton-Raphson
//!   with a Brent fallback)
//! - [`price_from_yield`]: the inverse, clean price from a yield
//! - [`approximate_yield`]: closed-form yield estimate, also the solver seed
//! - [`macaulay_duration`] / [`modified_duration`]
//!
//! Discounting follows street convention: the cash flow `k` coupons after
//! the next one is discounted by `(1 + y/f)^(w + k)`, where `w` is the
//! share of the current coupon period still to run at settlement.

mod discount;
mod duration;
mod yield_solver;

pub use duration::{macaulay_duration, modified_duration};
pub use yield_solver::{
    approximate_yield, price_from_yield, SolveMethod, YieldResult, YieldSolver,
    DEFAULT_MAX_ITERATIONS, DEFAULT_YIELD_TOLERANCE,
};
