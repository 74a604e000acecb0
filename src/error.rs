//! Error taxonomy for the renderer core.
//!
//! Only two things can go wrong inside the core: a caller hands in a ray whose
//! direction cannot be normalized, or a scene/parameter value is outside its
//! valid domain. Marching misses and intersection no-hits are ordinary results
//! and never surface here.

use glam::Vec3;
use thiserror::Error;

/// Errors raised by scene construction, parameter validation and ray queries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// A ray direction had zero (or non-finite) length.
    #[error("invalid ray: direction {direction} cannot be normalized")]
    InvalidRay {
        /// The offending direction.
        direction: Vec3,
    },

    /// A scene or render parameter is outside its valid domain.
    #[error("degenerate parameter `{name}`: {reason}")]
    DegenerateParameter {
        /// Name of the rejected parameter.
        name: String,
        /// Human readable explanation.
        reason: String,
    },
}

impl RenderError {
    pub(crate) fn degenerate(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DegenerateParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the core.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Reject non-finite scalars.
pub(crate) fn check_finite(name: &str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RenderError::degenerate(name, format!("must be finite, got {value}")))
    }
}

/// Reject scalars outside the closed range `[min, max]`.
pub(crate) fn check_range(name: &str, value: f32, min: f32, max: f32) -> Result<()> {
    check_finite(name, value)?;
    if value < min || value > max {
        return Err(RenderError::degenerate(
            name,
            format!("must lie in [{min}, {max}], got {value}"),
        ));
    }
    Ok(())
}

/// Reject colours with a component outside `[0, 1]`.
pub(crate) fn check_unit_color(name: &str, color: Vec3) -> Result<()> {
    if !color.is_finite() || color.min_element() < 0.0 || color.max_element() > 1.0 {
        return Err(RenderError::degenerate(
            name,
            format!("components must lie in [0, 1], got {color}"),
        ));
    }
    Ok(())
}
