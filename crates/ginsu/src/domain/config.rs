//! Slicer and parallel driver configuration
//!
//! # Example
//!
//! ```ignore
//! use ginsu::domain::SlicerConfigBuilder;
//!
//! let config = SlicerConfigBuilder::new()
//!     .offset(1e-6)
//!     .order(Order::YX)
//!     .build()
//!     .expect("Valid config");
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::grid::Order;
use super::knife::{DEFAULT_EXTRUSION, DEFAULT_OFFSET};
use crate::error::{GinsuError, Result};

/// Extrusion applied to the second operand of the parallel driver
pub const DEFAULT_PARALLEL_EXTRUSION: f64 = 0.01;

fn check_tolerance(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(GinsuError::InvalidArgument(format!(
            "{name} must be a finite non-negative number, got {value}"
        )));
    }
    Ok(())
}

/// Knife tolerance, extrusion and slicing order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlicerConfig {
    /// Ordinates closer than this compare equal
    pub offset: f64,
    /// Half-width of the overlap between neighbouring cells
    pub extrusion: f64,
    /// Storage order of produced grids, also the slicing order
    pub order: Order,
}

impl Default for SlicerConfig {
    fn default() -> Self {
        Self {
            offset: DEFAULT_OFFSET,
            extrusion: DEFAULT_EXTRUSION,
            order: Order::Automatic,
        }
    }
}

impl SlicerConfig {
    pub fn validate(&self) -> Result<()> {
        check_tolerance("offset", self.offset)?;
        check_tolerance("extrusion", self.extrusion)
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_extrusion(mut self, extrusion: f64) -> Self {
        self.extrusion = extrusion;
        self
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    /// Parse and validate a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

/// Builder for [`SlicerConfig`] with validation
#[derive(Default)]
pub struct SlicerConfigBuilder {
    offset: Option<f64>,
    extrusion: Option<f64>,
    order: Option<Order>,
}

impl SlicerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn extrusion(mut self, extrusion: f64) -> Self {
        self.extrusion = Some(extrusion);
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    pub fn build(self) -> Result<SlicerConfig> {
        let defaults = SlicerConfig::default();
        let config = SlicerConfig {
            offset: self.offset.unwrap_or(defaults.offset),
            extrusion: self.extrusion.unwrap_or(defaults.extrusion),
            order: self.order.unwrap_or(defaults.order),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Number of knives the parallel driver places on each axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPattern {
    pub x: usize,
    pub y: usize,
}

impl GridPattern {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// `n` evenly spaced values strictly inside `[min, max]`
    pub fn spread(min: f64, max: f64, n: usize) -> Vec<f64> {
        let size = (max - min) / (n + 1) as f64;
        (1..=n).map(|i| min + size * i as f64).collect()
    }
}

impl Default for GridPattern {
    fn default() -> Self {
        Self::new(2, 2)
    }
}

/// Settings of the divide-and-conquer driver
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    pub pattern: GridPattern,
    /// Operands with at most this many points together are handled directly
    pub limit: usize,
    /// Extrusion of the knives used on the second operand
    pub extrusion: f64,
    /// Recursion stops at this depth whatever the operand size
    pub max_depth: usize,
    /// Knife tolerance
    pub offset: f64,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            pattern: GridPattern::default(),
            limit: 1_000,
            extrusion: DEFAULT_PARALLEL_EXTRUSION,
            max_depth: 8,
            offset: DEFAULT_OFFSET,
        }
    }
}

impl ParallelConfig {
    pub fn validate(&self) -> Result<()> {
        if self.pattern.x == 0 && self.pattern.y == 0 {
            return Err(GinsuError::InvalidArgument(
                "grid pattern needs at least one knife".to_string(),
            ));
        }
        check_tolerance("extrusion", self.extrusion)?;
        check_tolerance("offset", self.offset)
    }

    pub fn with_pattern(mut self, x: usize, y: usize) -> Self {
        self.pattern = GridPattern::new(x, y);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_extrusion(mut self, extrusion: f64) -> Self {
        self.extrusion = extrusion;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
