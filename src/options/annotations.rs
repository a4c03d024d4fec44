use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::annotations::DEFAULT_FORCE_EPSILON;
use crate::error::PrepError;

/// Boundary-condition and load bookkeeping parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Annotations", inline)]
#[serde(default)]
pub struct AnnotationOptions {
    /// Forces with a magnitude below this are treated as "no force" and
    /// removed rather than stored.
    #[schemars(title = "Force Epsilon", range(min = 0.0))]
    pub force_epsilon: f64,
}

impl Default for AnnotationOptions {
    fn default() -> Self {
        Self {
            force_epsilon: DEFAULT_FORCE_EPSILON,
        }
    }
}

impl AnnotationOptions {
    /// A negative or NaN epsilon would let zero forces be stored.
    pub fn validate(&self) -> Result<(), PrepError> {
        if self.force_epsilon.is_finite() && self.force_epsilon >= 0.0 {
            Ok(())
        } else {
            Err(PrepError::OptionsParse(format!(
                "annotations.force_epsilon must be a non-negative number, \
                 got {}",
                self.force_epsilon
            )))
        }
    }
}
