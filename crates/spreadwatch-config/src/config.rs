//! Top-level configuration document.

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use spreadwatch_analytics::backtest::BacktestConfig;
use spreadwatch_analytics::spreads::SpreadPair;
use spreadwatch_bonds::BondTerms;

use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};
use crate::settings::{SignalSettings, SolverSettings, SpreadSettings};
use crate::universe::{BondEntry, PairEntry};

/// Complete Spreadwatch configuration.
///
/// Every section has defaults, so an empty document is valid.
///
/// ```rust
/// use spreadwatch_config::{SpreadwatchConfig, Validate};
///
/// let config: SpreadwatchConfig = r#"
/// [signal]
/// z_threshold = 1.5
///
/// [[bonds]]
/// isin = "SU26238RMFS4"
/// maturity_date = "2041-05-15"
/// coupon_rate = 7.1
///
/// [[bonds]]
/// isin = "SU26243RMFS4"
/// maturity_date = "2038-05-19"
/// coupon_rate = 9.8
///
/// [[pairs]]
/// name = "38-43"
/// isin_a = "SU26238RMFS4"
/// isin_b = "SU26243RMFS4"
/// "#
/// .parse()
/// .unwrap();
///
/// assert!(config.is_valid());
/// assert_eq!(config.signal.z_threshold, 1.5);
/// assert_eq!(config.solver.max_iterations, 100);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpreadwatchConfig {
    /// Yield solver settings.
    #[serde(default)]
    pub solver: SolverSettings,

    /// Spread alignment and statistics window.
    #[serde(default)]
    pub spread: SpreadSettings,

    /// Signal classifier settings.
    #[serde(default)]
    pub signal: SignalSettings,

    /// Backtest settings.
    #[serde(default)]
    pub backtest: BacktestConfig,

    /// Bond universe.
    #[serde(default)]
    pub bonds: Vec<BondEntry>,

    /// Tracked pairs.
    #[serde(default)]
    pub pairs: Vec<PairEntry>,
}

impl SpreadwatchConfig {
    /// Reads and parses a TOML file. Does not validate.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = text.parse()?;
        log::debug!(
            "loaded {} bonds and {} pairs from {}",
            config.bonds.len(),
            config.pairs.len(),
            path.display()
        );
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let config = Self::from_file(path)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Renders the resolved configuration, defaults included.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Bond entry by ISIN.
    pub fn bond(&self, isin: &str) -> Option<&BondEntry> {
        self.bonds.iter().find(|b| b.isin == isin)
    }

    /// Pair by name.
    pub fn pair(&self, name: &str) -> ConfigResult<&PairEntry> {
        self.pairs
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ConfigError::not_found("pair", name))
    }

    /// Every configured pair, in file order.
    pub fn spread_pairs(&self) -> Vec<SpreadPair> {
        self.pairs.iter().map(PairEntry::to_pair).collect()
    }

    /// Validated terms for one ISIN.
    pub fn terms(&self, isin: &str) -> ConfigResult<BondTerms> {
        let entry = self.bond(isin).ok_or_else(|| ConfigError::not_found("bond", isin))?;
        Ok(entry.to_terms()?)
    }

    /// Validated terms for every configured bond, in file order.
    pub fn universe(&self) -> ConfigResult<Vec<BondTerms>> {
        self.bonds
            .iter()
            .map(|b| b.to_terms().map_err(ConfigError::from))
            .collect()
    }
}

impl FromStr for SpreadwatchConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(s)?)
    }
}

impl Validate for SpreadwatchConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        errors.extend(self.solver.validate().into_iter().map(|e| e.nested("solver")));
        errors.extend(self.spread.validate().into_iter().map(|e| e.nested("spread")));
        errors.extend(self.signal.validate().into_iter().map(|e| e.nested("signal")));
        errors.extend(self.backtest.validate().into_iter().map(|e| e.nested("backtest")));

        let mut isins = HashSet::new();
        for (i, bond) in self.bonds.iter().enumerate() {
            let field = format!("bonds[{i}]");
            if !isins.insert(bond.isin.as_str()) {
                errors.push(ValidationError::with_rule(
                    format!("{field}.isin"),
                    format!("Duplicate ISIN {}", bond.isin),
                    "unique_isin",
                ));
            }
            errors.extend(bond.validate().into_iter().map(|e| e.nested(&field)));
        }

        let mut names = HashSet::new();
        for (i, pair) in self.pairs.iter().enumerate() {
            let field = format!("pairs[{i}]");
            if !names.insert(pair.name.as_str()) {
                errors.push(ValidationError::with_rule(
                    format!("{field}.name"),
                    format!("Duplicate pair name {}", pair.name),
                    "unique_pair",
                ));
            }
            for (side, isin) in [("isin_a", &pair.isin_a), ("isin_b", &pair.isin_b)] {
                if !isins.contains(isin.as_str()) {
                    errors.push(ValidationError::with_rule(
                        format!("{field}.{side}"),
                        format!("ISIN {isin} is not a configured bond"),
                        "known_isin",
                    ));
                }
            }
            if pair.isin_a == pair.isin_b {
                errors.push(ValidationError::with_rule(
                    field,
                    "A pair needs two different bonds",
                    "distinct_legs",
                ));
            }
        }

        errors
    }
}
