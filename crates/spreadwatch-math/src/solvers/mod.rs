//! Root-finding algorithms.
//!
//! - [`newton_raphson`]: quadratic convergence when the derivative is known
//! - [`newton_raphson_guarded`]: Newton with steps halved to stay inside a
//!   valid domain (e.g. a discount factor base that must stay positive)
//! - [`brent`]: bracketed method, guaranteed to converge on a sign change
//!
//! All solvers converge on the residual: they stop once `|f(x)| < tolerance`,
//! and otherwise report [`MathError::ConvergenceFailed`](crate::MathError)
//! rather than returning the last iterate.
//!
//! # Example
//!
//! ```rust
//! use spreadwatch_math::solvers::{newton_raphson, SolverConfig};
//!
//! let f = |x: f64| x * x - 2.0;
//! let df = |x: f64| 2.0 * x;
//!
//! let result = newton_raphson(f, df, 1.5, &SolverConfig::default()).unwrap();
//! assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
//! ```

mod brent;
mod newton;

pub use brent::brent;
pub use newton::{newton_raphson, newton_raphson_guarded};

/// Default residual tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Residual tolerance: converged once `|f(x)| < tolerance`.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Outcome of a successful root search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Function value at the root.
    pub residual: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Price per 100 face of an annual-pay bond on a coupon date.
    fn bond_price(y: f64, coupon: f64, years: i32) -> f64 {
        let mut pv = 0.0;
        for t in 1..=years {
            pv += coupon / (1.0 + y).powi(t);
        }
        pv + 100.0 / (1.0 + y).powi(years)
    }

    fn bond_price_derivative(y: f64, coupon: f64, years: i32) -> f64 {
        let mut dpv = 0.0;
        for t in 1..=years {
            dpv -= f64::from(t) * coupon / (1.0 + y).powi(t + 1);
        }
        dpv - f64::from(years) * 100.0 / (1.0 + y).powi(years + 1)
    }

    #[test]
    fn test_solver_config_builder() {
        let config = SolverConfig::default()
            .with_tolerance(1e-6)
            .with_max_iterations(50);

        assert_eq!(config, SolverConfig::new(1e-6, 50));
    }

    #[test]
    fn test_newton_and_brent_agree_on_yield() {
        let f = |y: f64| bond_price(y, 6.0, 7) - 98.0;
        let df = |y: f64| bond_price_derivative(y, 6.0, 7);
        let config = SolverConfig::default();

        let newton = newton_raphson(f, df, 0.06, &config).unwrap();
        let bracketed = brent(f, 0.0, 0.2, &config).unwrap();

        assert!(newton.root > 0.06);
        assert_relative_eq!(newton.root, bracketed.root, epsilon = 1e-8);
    }

    #[test]
    fn test_par_bond_yields_coupon() {
        let f = |y: f64| bond_price(y, 5.0, 10) - 100.0;
        let df = |y: f64| bond_price_derivative(y, 5.0, 10);

        let result = newton_raphson(f, df, 0.03, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, 0.05, epsilon = 1e-10);
    }
}
