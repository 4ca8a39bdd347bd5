//! Solver, spread, signal and backtest settings.

use serde::{Deserialize, Serialize};

use spreadwatch_analytics::backtest::BacktestConfig;
use spreadwatch_analytics::signals::{PercentileBands, SignalGenerator, DEFAULT_MIN_CONFIDENCE, Z_THRESHOLD_RANGE};
use spreadwatch_analytics::spreads::JoinKind;
use spreadwatch_analytics::stats::Window;
use spreadwatch_bonds::pricing::{YieldSolver, DEFAULT_MAX_ITERATIONS, DEFAULT_YIELD_TOLERANCE};

use crate::error::{Validate, ValidationError};

/// Largest accepted solver tolerance, in currency units.
pub const MAX_SOLVER_TOLERANCE: f64 = 1e-2;

/// Largest accepted solver iteration bound.
pub const MAX_SOLVER_ITERATIONS: u32 = 10_000;

// =============================================================================
// SOLVER
// =============================================================================

/// Yield solver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Pricing tolerance in currency units.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Iteration bound per solve.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

fn default_tolerance() -> f64 {
    DEFAULT_YIELD_TOLERANCE
}

fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl SolverSettings {
    /// Solver configured with these settings.
    pub fn solver(&self) -> YieldSolver {
        YieldSolver::new()
            .with_tolerance(self.tolerance)
            .with_max_iterations(self.max_iterations)
    }
}

impl Validate for SolverSettings {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(self.tolerance > 0.0 && self.tolerance <= MAX_SOLVER_TOLERANCE) {
            errors.push(ValidationError::with_rule(
                "tolerance",
                format!("Solver tolerance must be in (0, {MAX_SOLVER_TOLERANCE:e}], got {}", self.tolerance),
                "valid_tolerance",
            ));
        }

        if self.max_iterations == 0 || self.max_iterations > MAX_SOLVER_ITERATIONS {
            errors.push(ValidationError::with_rule(
                "max_iterations",
                format!("Max iterations must be between 1 and {MAX_SOLVER_ITERATIONS}"),
                "valid_iterations",
            ));
        }

        errors
    }
}

// =============================================================================
// SPREAD
// =============================================================================

/// Spread alignment and statistics window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpreadSettings {
    /// How the two yield series are matched.
    #[serde(default)]
    pub join: JoinKind,

    /// Rolling statistics window.
    #[serde(default)]
    pub window: Window,
}

impl Validate for SpreadSettings {
    fn validate(&self) -> Vec<ValidationError> {
        validate_window(self.window, "window").into_iter().collect()
    }
}

fn validate_window(window: Window, field: &str) -> Option<ValidationError> {
    let empty = match window {
        Window::CalendarDays(days) => days == 0,
        Window::Observations(n) => n == 0,
        Window::Full => false,
    };
    empty.then(|| ValidationError::with_rule(field, "Window size must be positive", "positive_window"))
}

// =============================================================================
// SIGNAL
// =============================================================================

/// Signal classifier settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSettings {
    /// Z-score threshold in standard deviations.
    #[serde(default = "default_z_threshold")]
    pub z_threshold: f64,

    /// Percentile bands for trading signals.
    #[serde(default)]
    pub bands: PercentileBands,

    /// Spread points required before a trading signal is produced.
    #[serde(default = "default_min_history")]
    pub min_history: usize,

    /// Confidence a signal needs to be listed as actionable.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
}

fn default_z_threshold() -> f64 {
    spreadwatch_analytics::signals::DEFAULT_Z_THRESHOLD
}

fn default_min_history() -> usize {
    spreadwatch_analytics::signals::DEFAULT_MIN_HISTORY
}

fn default_min_confidence() -> f64 {
    DEFAULT_MIN_CONFIDENCE
}

impl Default for SignalSettings {
    fn default() -> Self {
        Self {
            z_threshold: default_z_threshold(),
            bands: PercentileBands::default(),
            min_history: default_min_history(),
            min_confidence: default_min_confidence(),
        }
    }
}

impl SignalSettings {
    /// Trading signal generator over `window`.
    pub fn generator(&self, window: Window) -> SignalGenerator {
        SignalGenerator {
            bands: self.bands,
            z_threshold: self.z_threshold,
            window,
            min_history: self.min_history,
            min_confidence: self.min_confidence,
        }
    }
}

impl Validate for SignalSettings {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if let Some(err) = validate_threshold(self.z_threshold, "z_threshold") {
            errors.push(err);
        }

        if !self.bands.is_ordered() {
            errors.push(ValidationError::with_rule(
                "bands",
                "Bands must satisfy 0 < strong_low < low < high < strong_high < 100",
                "ordered_bands",
            ));
        }

        if !(0.0..=1.0).contains(&self.min_confidence) {
            errors.push(ValidationError::with_rule(
                "min_confidence",
                format!("Confidence must be in [0, 1], got {}", self.min_confidence),
                "unit_interval",
            ));
        }

        errors
    }
}

fn validate_threshold(threshold: f64, field: &str) -> Option<ValidationError> {
    let (low, high) = Z_THRESHOLD_RANGE;
    (!(low..=high).contains(&threshold)).then(|| {
        ValidationError::with_rule(
            field,
            format!("Threshold must be in [{low}, {high}], got {threshold}"),
            "threshold_range",
        )
    })
}

// =============================================================================
// BACKTEST
// =============================================================================

impl Validate for BacktestConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        errors.extend(validate_threshold(self.entry_z, "entry_z"));
        errors.extend(validate_window(self.window, "window"));

        let (low, exit, high) = (self.entry_percentile_low, self.exit_percentile, self.entry_percentile_high);
        if !(0.0 < low && low < exit && exit < high && high < 100.0) {
            errors.push(ValidationError::with_rule(
                "entry_percentile_low",
                "Percentiles must satisfy 0 < entry_percentile_low < exit_percentile < entry_percentile_high < 100",
                "ordered_percentiles",
            ));
        }

        for (field, value) in [("stop_loss_bp", self.stop_loss_bp), ("take_profit_bp", self.take_profit_bp)] {
            if !(value.is_finite() && value > 0.0) {
                errors.push(ValidationError::with_rule(field, "Must be a positive number of bp", "positive"));
            }
        }

        if !(self.spread_cost_bp.is_finite() && self.spread_cost_bp >= 0.0) {
            errors.push(ValidationError::with_rule("spread_cost_bp", "Cost cannot be negative", "non_negative"));
        }

        if self.max_holding_days <= 0 {
            errors.push(ValidationError::with_rule(
                "max_holding_days",
                "Holding period must be at least one day",
                "positive",
            ));
        }

        if !(self.initial_capital.is_finite() && self.initial_capital > 0.0) {
            errors.push(ValidationError::with_rule("initial_capital", "Capital must be positive", "positive"));
        }

        if !(self.position_size_pct > 0.0 && self.position_size_pct <= 1.0) {
            errors.push(ValidationError::with_rule(
                "position_size_pct",
                format!("Position size must be in (0, 1], got {}", self.position_size_pct),
                "unit_interval",
            ));
        }

        if !(0.0..1.0).contains(&self.commission_rate) {
            errors.push(ValidationError::with_rule(
                "commission_rate",
                format!("Commission must be in [0, 1), got {}", self.commission_rate),
                "unit_interval",
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SolverSettings::default().is_valid());
        assert!(SpreadSettings::default().is_valid());
        assert!(SignalSettings::default().is_valid());
        assert!(BacktestConfig::default().is_valid());
    }

    #[test]
    fn test_solver_bounds() {
        let mut s = SolverSettings::default();
        s.tolerance = 0.0;
        assert!(!s.is_valid());
        s.tolerance = 1e-2;
        assert!(s.is_valid());
        s.max_iterations = 10_001;
        assert_eq!(s.validate()[0].field, "max_iterations");
    }

    #[test]
    fn test_threshold_range_is_inclusive() {
        let mut s = SignalSettings::default();
        for t in [1.0, 3.0] {
            s.z_threshold = t;
            assert!(s.is_valid());
        }
        s.z_threshold = 0.5;
        assert!(!s.is_valid());
        s.z_threshold = f64::NAN;
        assert!(!s.is_valid());
    }

    #[test]
    fn test_zero_window_rejected() {
        let s = SpreadSettings {
            window: Window::CalendarDays(0),
            ..SpreadSettings::default()
        };
        assert_eq!(s.validate()[0].rule.as_deref(), Some("positive_window"));
    }

    #[test]
    fn test_backtest_rules() {
        let config = BacktestConfig {
            stop_loss_bp: -1.0,
            spread_cost_bp: -0.1,
            max_holding_days: 0,
            ..BacktestConfig::default()
        };
        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["stop_loss_bp", "spread_cost_bp", "max_holding_days"]);
    }

    #[test]
    fn test_backtest_percentiles_and_sizing() {
        let config = BacktestConfig {
            exit_percentile: 95.0,
            position_size_pct: 1.5,
            commission_rate: -0.001,
            initial_capital: 0.0,
            ..BacktestConfig::default()
        };
        let rules: Vec<String> = config.validate().into_iter().filter_map(|e| e.rule).collect();
        assert_eq!(rules, vec!["ordered_percentiles", "positive", "unit_interval", "unit_interval"]);
    }

    #[test]
    fn test_min_confidence_range() {
        let mut s = SignalSettings::default();
        s.min_confidence = 1.0;
        assert!(s.is_valid());
        s.min_confidence = 1.2;
        assert_eq!(s.validate()[0].field, "min_confidence");
    }

    #[test]
    fn test_generator_carries_settings() {
        let settings = SignalSettings {
            z_threshold: 1.5,
            min_history: 5,
            min_confidence: 0.5,
            ..SignalSettings::default()
        };
        let generator = settings.generator(Window::Observations(60));
        assert_eq!(generator.z_threshold, 1.5);
        assert_eq!(generator.min_confidence, 0.5);
        assert_eq!(generator.min_history, 5);
        assert_eq!(generator.window, Window::Observations(60));
    }
}
