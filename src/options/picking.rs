use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::PrepError;
use crate::picking::{DEFAULT_FALLBACK_TOLERANCE, DEFAULT_TOLERANCE_FRACTION};

/// Node picking tolerances.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Picking", inline)]
#[serde(default)]
pub struct PickingOptions {
    /// Fraction of the mesh's characteristic length within which a click
    /// still selects the nearest node. Denser meshes may want less.
    #[schemars(
        title = "Pick Tolerance",
        range(min = 0.001, max = 1.0),
        extend("step" = 0.005)
    )]
    pub tolerance_fraction: f64,
    /// Absolute tolerance for meshes without a usable length scale.
    #[schemars(skip)]
    pub fallback_tolerance: f64,
}

impl Default for PickingOptions {
    fn default() -> Self {
        Self {
            tolerance_fraction: DEFAULT_TOLERANCE_FRACTION,
            fallback_tolerance: DEFAULT_FALLBACK_TOLERANCE,
        }
    }
}

impl PickingOptions {
    /// Reject tolerances that would make every pick miss.
    pub fn validate(&self) -> Result<(), PrepError> {
        if !(self.tolerance_fraction.is_finite()
            && self.tolerance_fraction > 0.0)
        {
            return Err(PrepError::OptionsParse(format!(
                "picking.tolerance_fraction must be a positive number, got {}",
                self.tolerance_fraction
            )));
        }
        if !(self.fallback_tolerance.is_finite()
            && self.fallback_tolerance >= 0.0)
        {
            return Err(PrepError::OptionsParse(format!(
                "picking.fallback_tolerance must be a non-negative number, \
                 got {}",
                self.fallback_tolerance
            )));
        }
        Ok(())
    }
}
