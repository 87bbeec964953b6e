//! Configuration system for the cache simulator.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** Baseline geometry constants (block size, level sizes, associativity).
//! 2. **Structures:** The user-facing [`Config`] and the validated [`HierarchyGeometry`].
//! 3. **Enums:** Replacement and inclusion policy tags, parsed from the names used by trace front-ends.
//!
//! Configuration is supplied as JSON (`Config::from_json`), assembled by the CLI,
//! or taken from `Config::default()`. The engine only accepts a
//! [`HierarchyGeometry`], which can only be obtained from [`Config::validate`].

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tracing::warn;

use crate::common::{AddressDecoder, ConfigError};

/// Default configuration constants for the simulator.
///
/// These values define the baseline hierarchy when a document or the command
/// line does not override them.
mod defaults {
    /// Default block (line) size in bytes.
    pub const BLOCK_SIZE: u64 = 64;

    /// Default L1 size in bytes (32 KiB).
    pub const L1_SIZE: u64 = 32 * 1024;

    /// Default L1 associativity.
    pub const L1_ASSOC: u64 = 8;

    /// Default L2 size in bytes (256 KiB).
    pub const L2_SIZE: u64 = 256 * 1024;

    /// Default L2 associativity.
    pub const L2_ASSOC: u64 = 8;

    /// Largest set count a level may have. Sets are allocated up front.
    pub const MAX_SETS: u64 = 1 << 24;
}

/// Cache replacement policy algorithms.
///
/// Selected once for the whole hierarchy run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Least Recently Used replacement policy.
    ///
    /// Hits move the block to the most-recently-used end; the other end is evicted.
    #[default]
    #[serde(alias = "Lru", alias = "lru")]
    Lru,
    /// First In First Out replacement policy.
    ///
    /// Hits do not reorder; the oldest insertion is evicted.
    #[serde(alias = "Fifo", alias = "fifo")]
    Fifo,
    /// Belady's optimal replacement policy.
    ///
    /// Evicts the block whose next use lies furthest in the remaining trace.
    /// Requires the whole trace up front.
    #[serde(alias = "Optimal", alias = "optimal", alias = "OPT")]
    Optimal,
}

impl FromStr for ReplacementPolicy {
    type Err = ConfigError;

    /// Parses `LRU`, `FIFO` or `OPTIMAL` (any case) or the menu codes `1`, `2`, `3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" | "1" => Ok(Self::Lru),
            "fifo" | "2" => Ok(Self::Fifo),
            "optimal" | "opt" | "3" => Ok(Self::Optimal),
            _ => Err(ConfigError::UnknownReplacementPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lru => write!(f, "LRU"),
            Self::Fifo => write!(f, "FIFO"),
            Self::Optimal => write!(f, "Optimal"),
        }
    }
}

/// Inter-level inclusion disciplines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InclusionPolicy {
    /// Every block resident at a level is also resident at every deeper level.
    ///
    /// Enforced by back-invalidating upper copies when a deeper level evicts.
    #[serde(alias = "Inclusive", alias = "INCLUSIVE")]
    Inclusive,
    /// A block lives in exactly one level at a time.
    ///
    /// Lower-level hits move the block to L1; L1 victims are demoted downward.
    #[serde(alias = "Exclusive", alias = "EXCLUSIVE")]
    Exclusive,
    /// Levels are filled independently with no consistency obligation.
    #[default]
    #[serde(
        alias = "NonInclusive",
        alias = "non_inclusive",
        alias = "NON_INCLUSIVE",
        alias = "noninclusive"
    )]
    NonInclusive,
}

impl FromStr for InclusionPolicy {
    type Err = ConfigError;

    /// Parses `inclusive`, `exclusive` or `non-inclusive` (any case, `_` accepted
    /// for `-`) or the menu codes `1`, `2`, `3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "inclusive" | "1" => Ok(Self::Inclusive),
            "exclusive" | "2" => Ok(Self::Exclusive),
            "non-inclusive" | "noninclusive" | "3" => Ok(Self::NonInclusive),
            _ => Err(ConfigError::UnknownInclusionPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for InclusionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inclusive => write!(f, "Inclusive"),
            Self::Exclusive => write!(f, "Exclusive"),
            Self::NonInclusive => write!(f, "Non-inclusive"),
        }
    }
}

/// Root configuration structure for the simulator.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::{Config, InclusionPolicy, ReplacementPolicy};
///
/// let json = r#"{
///     "block_size": 16,
///     "levels": [
///         { "size": 1024, "associativity": 1 },
///         { "size": 8192, "associativity": 4 }
///     ],
///     "replacement": "LRU",
///     "inclusion": "inclusive"
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.replacement, ReplacementPolicy::Lru);
/// assert_eq!(config.inclusion, InclusionPolicy::Inclusive);
///
/// let geometry = config.validate().unwrap();
/// assert_eq!(geometry.levels()[0].num_sets, 64);
/// assert_eq!(geometry.levels()[1].num_sets, 128);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Block (line) size in bytes, shared by every level.
    #[serde(default = "Config::default_block_size")]
    pub block_size: u64,

    /// Cache levels, L1 first.
    #[serde(default = "Config::default_levels")]
    pub levels: Vec<LevelConfig>,

    /// Replacement policy for every level.
    #[serde(default)]
    pub replacement: ReplacementPolicy,

    /// Inclusion policy between levels.
    #[serde(default)]
    pub inclusion: InclusionPolicy,
}

impl Config {
    /// Builds a configuration from `(size, associativity)` pairs, L1 first.
    pub fn new(
        block_size: u64,
        levels: &[(u64, u64)],
        replacement: ReplacementPolicy,
        inclusion: InclusionPolicy,
    ) -> Self {
        Self {
            block_size,
            levels: levels
                .iter()
                .map(|&(size, associativity)| LevelConfig {
                    size,
                    associativity,
                })
                .collect(),
            replacement,
            inclusion,
        }
    }

    /// Deserializes a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is not valid JSON or has
    /// unknown policy names. Geometry is not checked here; see [`Config::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks the configuration and derives every level's geometry.
    ///
    /// A level of size 0 is absent: it is dropped (with a warning) and the
    /// remaining levels are renumbered from L1.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::NotPowerOfTwo`] for a block size, level size or
    ///   associativity that is not a positive power of two.
    /// * [`ConfigError::ZeroSets`] for a non-empty level smaller than one set.
    /// * [`ConfigError::TooManySets`] for a level with more than 2^24 sets.
    /// * [`ConfigError::NoLevels`] if no level is present.
    pub fn validate(&self) -> Result<HierarchyGeometry, ConfigError> {
        if !self.block_size.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                field: "block size",
                value: self.block_size,
            });
        }

        let mut levels: Vec<LevelGeometry> = Vec::with_capacity(self.levels.len());
        for (i, level) in self.levels.iter().enumerate() {
            let configured = i + 1;
            if level.size == 0 {
                warn!(level = configured, "cache size is 0; level treated as absent");
                continue;
            }
            if !level.size.is_power_of_two() {
                return Err(ConfigError::NotPowerOfTwo {
                    field: "cache size",
                    value: level.size,
                });
            }
            if !level.associativity.is_power_of_two() {
                return Err(ConfigError::NotPowerOfTwo {
                    field: "associativity",
                    value: level.associativity,
                });
            }

            let zero_sets = || ConfigError::ZeroSets {
                level: configured,
                size: level.size,
                associativity: level.associativity,
                block_size: self.block_size,
            };
            let set_bytes = level
                .associativity
                .checked_mul(self.block_size)
                .ok_or_else(zero_sets)?;
            let num_sets = level.size / set_bytes;
            if num_sets == 0 {
                return Err(zero_sets());
            }
            if num_sets > defaults::MAX_SETS {
                return Err(ConfigError::TooManySets {
                    level: configured,
                    num_sets,
                    max: defaults::MAX_SETS,
                });
            }

            levels.push(LevelGeometry {
                level: levels.len() + 1,
                size: level.size,
                block_size: self.block_size,
                associativity: level.associativity as usize,
                num_sets: num_sets as usize,
                decoder: AddressDecoder::new(self.block_size, num_sets)?,
            });
        }

        if levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }

        Ok(HierarchyGeometry {
            block_size: self.block_size,
            levels,
            replacement: self.replacement,
            inclusion: self.inclusion,
        })
    }

    /// Returns the default block size in bytes.
    fn default_block_size() -> u64 {
        defaults::BLOCK_SIZE
    }

    /// Returns the default two-level hierarchy.
    fn default_levels() -> Vec<LevelConfig> {
        vec![
            LevelConfig {
                size: defaults::L1_SIZE,
                associativity: defaults::L1_ASSOC,
            },
            LevelConfig {
                size: defaults::L2_SIZE,
                associativity: defaults::L2_ASSOC,
            },
        ]
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            block_size: defaults::BLOCK_SIZE,
            levels: Self::default_levels(),
            replacement: ReplacementPolicy::default(),
            inclusion: InclusionPolicy::default(),
        }
    }
}

/// Individual cache level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LevelConfig {
    /// Total level size in bytes; 0 marks the level absent.
    pub size: u64,

    /// Associativity (blocks per set).
    pub associativity: u64,
}

impl FromStr for LevelConfig {
    type Err = ConfigError;

    /// Parses `SIZE:ASSOC`, e.g. `32768:8`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidLevelSpec(s.to_string());
        let (size, associativity) = s.trim().split_once(':').ok_or_else(invalid)?;
        Ok(Self {
            size: size.trim().parse().map_err(|_| invalid())?,
            associativity: associativity.trim().parse().map_err(|_| invalid())?,
        })
    }
}

/// Validated geometry of one present cache level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelGeometry {
    /// 1-based position in the hierarchy after absent levels are dropped.
    pub level: usize,
    /// Level size in bytes.
    pub size: u64,
    /// Block size in bytes.
    pub block_size: u64,
    /// Blocks per set.
    pub associativity: usize,
    /// Number of sets (positive power of two).
    pub num_sets: usize,
    /// Offset/index/tag decoder for this level.
    pub decoder: AddressDecoder,
}

/// A configuration that passed [`Config::validate`].
///
/// The simulator is only constructible from this type, so every engine
/// instance runs on power-of-two geometry with at least one level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyGeometry {
    block_size: u64,
    levels: Vec<LevelGeometry>,
    replacement: ReplacementPolicy,
    inclusion: InclusionPolicy,
}

impl HierarchyGeometry {
    /// Block size shared by all levels.
    pub const fn block_size(&self) -> u64 {
        self.block_size
    }

    /// Present levels, L1 first.
    pub fn levels(&self) -> &[LevelGeometry] {
        &self.levels
    }

    /// Replacement policy for every level.
    pub const fn replacement(&self) -> ReplacementPolicy {
        self.replacement
    }

    /// Inclusion policy between levels.
    pub const fn inclusion(&self) -> InclusionPolicy {
        self.inclusion
    }
}
