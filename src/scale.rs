//! Mapping solved positions into drawing coordinates.
//!
//! One affine transform covers the whole section, so the relative spacing
//! the solver computed survives untouched. Vertical scale and diameter
//! scale are the caller's business.

use crate::errors::LayoutError;

/// Affine map from along-line positions to drawing coordinates.
///
/// Built with [`ScaleMapper::fit`] so the fitted positions span
/// `[inset, width - inset]`. Holds plain scale and offset; mapping any
/// other value (line endpoints, projection marks) is consistent with the
/// fitted wells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleMapper {
    scale: f64,
    offset: f64,
}

impl ScaleMapper {
    /// Fit `positions` onto a drawing span of `width`, keeping a symmetric
    /// `inset` clear at both edges so the outermost well footprints stay
    /// inside the window.
    ///
    /// A zero-span input (a singleton, or fully pooled coincident wells)
    /// maps to the center of the span at unit scale.
    pub fn fit(positions: &[f64], width: f64, inset: f64) -> Result<ScaleMapper, LayoutError> {
        if !width.is_finite() || width <= 0.0 {
            return Err(LayoutError::InvalidConfig {
                reason: format!("drawing width {width} must be finite and > 0"),
            });
        }
        if !inset.is_finite() || inset < 0.0 || 2.0 * inset >= width {
            return Err(LayoutError::InvalidConfig {
                reason: format!("edge inset {inset} must be in [0, width / 2)"),
            });
        }
        if positions.is_empty() {
            return Err(LayoutError::InsufficientPoints { needed: 1, got: 0 });
        }
        if let Some(p) = positions.iter().find(|p| !p.is_finite()) {
            return Err(LayoutError::non_finite(format!("position {p}")));
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &p in positions {
            min = min.min(p);
            max = max.max(p);
        }
        let span = max - min;
        if span == 0.0 {
            return Ok(ScaleMapper {
                scale: 1.0,
                offset: width / 2.0 - min,
            });
        }
        let scale = (width - 2.0 * inset) / span;
        Ok(ScaleMapper {
            scale,
            offset: inset - min * scale,
        })
    }

    /// Drawing coordinate for an along-line position.
    pub fn map(&self, s: f64) -> f64 {
        self.offset + self.scale * s
    }

    pub fn map_all(&self, positions: &[f64]) -> Vec<f64> {
        positions.iter().map(|&s| self.map(s)).collect()
    }

    /// Drawing units per coordinate unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }
}
