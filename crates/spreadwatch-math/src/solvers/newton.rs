//! Newton-Raphson root finding.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

const MAX_STEP_HALVINGS: u32 = 60;
const MIN_DERIVATIVE: f64 = 1e-15;

/// Newton-Raphson iteration `x_{n+1} = x_n - f(x_n) / f'(x_n)`.
///
/// # Example
///
/// ```rust
/// use spreadwatch_math::solvers::{newton_raphson, SolverConfig};
///
/// let f = |x: f64| x * x * x - 27.0;
/// let df = |x: f64| 3.0 * x * x;
///
/// let result = newton_raphson(f, df, 2.0, &SolverConfig::default()).unwrap();
/// assert!((result.root - 3.0).abs() < 1e-10);
/// ```
pub fn newton_raphson<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    newton_raphson_guarded(f, df, initial_guess, |_| true, config)
}

/// Newton-Raphson restricted to a domain.
///
/// Whenever a full step would land outside `in_domain`, the step is halved
/// until it does not. The initial guess must itself be inside the domain.
///
/// # Errors
///
/// - `InvalidInput` if the initial guess is outside the domain, or no
///   shortened step stays inside it
/// - `NonFinite` if `f` or `df` evaluates to NaN or infinity
/// - `DivisionByZero` if the derivative vanishes
/// - `ConvergenceFailed` once `max_iterations` steps are spent
pub fn newton_raphson_guarded<F, DF, D>(
    f: F,
    df: DF,
    initial_guess: f64,
    in_domain: D,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
    D: Fn(f64) -> bool,
{
    if !initial_guess.is_finite() || !in_domain(initial_guess) {
        return Err(MathError::invalid_input(format!(
            "initial guess {initial_guess} is outside the solver domain"
        )));
    }

    let mut x = initial_guess;

    for iteration in 0..config.max_iterations {
        let fx = f(x);
        if !fx.is_finite() {
            return Err(MathError::NonFinite { x });
        }

        if fx.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
            });
        }

        let dfx = df(x);
        if !dfx.is_finite() {
            return Err(MathError::NonFinite { x });
        }
        if dfx.abs() < MIN_DERIVATIVE {
            return Err(MathError::DivisionByZero { value: dfx });
        }

        let mut step = fx / dfx;
        let mut halvings = 0;
        while !in_domain(x - step) {
            if halvings == MAX_STEP_HALVINGS {
                return Err(MathError::invalid_input(format!(
                    "no step from {x} stays inside the solver domain"
                )));
            }
            step /= 2.0;
            halvings += 1;
        }

        x -= step;
    }

    let residual = f(x);
    if residual.abs() < config.tolerance {
        return Ok(SolverResult {
            root: x,
            iterations: config.max_iterations,
            residual,
        });
    }

    Err(MathError::convergence_failed(
        config.max_iterations,
        residual.abs(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_2() {
        let f = |x: f64| x * x - 2.0;
        let df = |x: f64| 2.0 * x;

        let result = newton_raphson(f, df, 1.5, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
        assert!(result.iterations < 10);
    }

    #[test]
    fn test_zero_derivative_error() {
        let f = |x: f64| x * x * x - 1.0;
        let df = |x: f64| 3.0 * x * x;

        let result = newton_raphson(f, df, 0.0, &SolverConfig::default());
        assert!(matches!(result, Err(MathError::DivisionByZero { .. })));
    }

    #[test]
    fn test_iteration_bound_reports_failure() {
        // x^2 + 1 has no real root
        let f = |x: f64| x * x + 1.0;
        let df = |x: f64| 2.0 * x;

        let result = newton_raphson(f, df, 0.5, &SolverConfig::new(1e-12, 20));
        assert!(matches!(
            result,
            Err(MathError::ConvergenceFailed { iterations: 20, .. })
        ));
    }

    #[test]
    fn test_guard_keeps_iterates_in_domain() {
        // ln(x) = -5 from x0 = 2: the raw first step lands at x < 0
        let f = |x: f64| x.ln() + 5.0;
        let df = |x: f64| 1.0 / x;

        let unguarded = newton_raphson(f, df, 2.0, &SolverConfig::default());
        assert!(unguarded.is_err());

        let guarded =
            newton_raphson_guarded(f, df, 2.0, |x| x > 0.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(guarded.root, (-5.0f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_initial_guess_outside_domain() {
        let result = newton_raphson_guarded(|x| x, |_| 1.0, -1.0, |x| x > 0.0, &SolverConfig::default());
        assert!(matches!(result, Err(MathError::InvalidInput { .. })));
    }
}
