//! Error types for layout requests.
//!
//! Every failure is detected synchronously at the boundary of the component
//! that notices it and surfaced as a typed diagnostic; the engine never
//! returns a partially computed layout.

use miette::Diagnostic;
use thiserror::Error;

use crate::types::WellId;

/// Errors produced while constructing a section line or solving positions.
#[derive(Error, Diagnostic, Debug)]
pub enum LayoutError {
    /// All supplied points coincide and no guide orients the section.
    #[error("degenerate geometry: all {count} points coincide")]
    #[diagnostic(
        code(xsecline::degenerate_geometry),
        help("supply a guide angle, anchor points, or a guide polyline to orient the section")
    )]
    DegenerateGeometry { count: usize },

    /// The guide cannot be used with the requested drawing mode, or the
    /// guide itself is malformed.
    #[error("guide not usable in {mode} mode: {reason}")]
    #[diagnostic(code(xsecline::invalid_guide))]
    InvalidGuideForMode { mode: &'static str, reason: String },

    /// Fewer wells than the requested operation needs.
    #[error("not enough wells: need at least {needed}, got {got}")]
    #[diagnostic(code(xsecline::insufficient_points))]
    InsufficientPoints { needed: usize, got: usize },

    /// A minimum pitch was negative or not a real number.
    #[error("invalid minimum pitch {pitch} before well index {index}")]
    #[diagnostic(code(xsecline::invalid_pitch))]
    InvalidPitch { index: usize, pitch: f64 },

    /// A coordinate, diameter, or other numeric input was NaN or infinite.
    #[error("non-finite input: {what}")]
    #[diagnostic(code(xsecline::non_finite_input))]
    NonFiniteInput { what: String },

    /// A configuration value is out of range.
    #[error("invalid configuration: {reason}")]
    #[diagnostic(code(xsecline::invalid_config))]
    InvalidConfig { reason: String },

    /// A data source was asked for a well it does not hold.
    #[error("unknown well: {id}")]
    #[diagnostic(code(xsecline::unknown_well))]
    UnknownWell { id: WellId },
}

impl LayoutError {
    pub(crate) fn non_finite(what: impl Into<String>) -> Self {
        LayoutError::NonFiniteInput { what: what.into() }
    }

    pub(crate) fn bad_guide(mode: &'static str, reason: impl Into<String>) -> Self {
        LayoutError::InvalidGuideForMode {
            mode,
            reason: reason.into(),
        }
    }
}
