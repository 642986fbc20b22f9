//! Cross-section layout engine for well plots.
//!
//! Given a set of wells in plan view, the engine orders them along a
//! section line, assigns each an along-line position, and pushes
//! overlapping neighbours apart as little as possible while keeping a
//! minimum pitch between them. Two line styles are supported:
//!
//! - **Fence**: a polyline passing exactly through every well
//! - **Projected**: a single straight line; wells attach by normal
//!   projection
//!
//! A request with exactly one well is the singleton case: position 0, no
//! line geometry. The engine is a pure function of its inputs, holds no
//! state between requests, and performs no I/O; rendering, vertical
//! scaling, and data access belong to the caller.
//!
//! ```
//! use xsecline::{layout, Guide, LayoutConfig, LayoutRequest, SectionStyle, WellPoint};
//!
//! let result = layout(LayoutRequest {
//!     wells: vec![
//!         WellPoint::new("w1", 0.0, 0.0).with_diameter(2.0),
//!         WellPoint::new("w2", 1.0, 0.0).with_diameter(2.0),
//!         WellPoint::new("w3", 10.0, 0.0).with_diameter(2.0),
//!     ],
//!     style: SectionStyle::Fence,
//!     guide: Guide::none(),
//!     config: LayoutConfig::default(),
//! })?;
//! assert_eq!(result.placed.len(), 3);
//! # Ok::<(), xsecline::LayoutError>(())
//! ```

pub mod errors;
mod line;
mod log;
pub mod scale;
pub mod solver;
pub mod source;
pub mod types;

pub use errors::LayoutError;
pub use glam::{dvec2, DVec2};
pub use line::SectionGeometry;
pub use scale::ScaleMapper;
pub use source::{layout_from_source, MemorySource, WellSource};
pub use types::{
    Angle, AttrValue, Direction, Guide, LayoutConfig, SectionStyle, WellId, WellPoint,
};

/// Everything the engine needs for one cross-section.
///
/// Well ids must be unique; they break ordering ties, so duplicates would
/// make the section order ambiguous.
#[derive(Debug, Clone)]
pub struct LayoutRequest {
    pub wells: Vec<WellPoint>,
    pub style: SectionStyle,
    pub guide: Guide,
    pub config: LayoutConfig,
}

/// A well with its solved place on the section line.
#[derive(Debug, Clone)]
pub struct OrderedWell {
    pub well: WellPoint,
    /// Along-line position before overlap resolution.
    pub raw_position: f64,
    /// Along-line position after overlap resolution.
    pub final_position: f64,
    /// Signed perpendicular distance to the section line; zero in fence
    /// mode, where the line passes through the well.
    pub perp_offset: f64,
    /// Minimum gap required to the previous well; zero for the first.
    pub min_pitch_before: f64,
}

/// The id-and-position pair a renderer needs for each well.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWell {
    pub id: WellId,
    pub final_position: f64,
}

/// Result of a layout request, in section order.
#[derive(Debug, Clone)]
pub struct LayoutResult {
    pub placed: Vec<PlacedWell>,
    pub wells: Vec<OrderedWell>,
    /// `None` for a singleton section.
    pub geometry: Option<SectionGeometry>,
}

/// Lay out one cross-section.
///
/// Fails without partial output when the configuration, wells, or guide
/// are unusable; see [`LayoutError`] for the kinds.
pub fn layout(request: LayoutRequest) -> Result<LayoutResult, LayoutError> {
    let LayoutRequest {
        mut wells,
        style,
        guide,
        config,
    } = request;
    config.validate()?;
    validate_wells(&wells)?;
    let n = wells.len();
    crate::log::debug!(n, style = %style, "layout request");

    if n == 0 {
        return Err(LayoutError::InsufficientPoints { needed: 1, got: 0 });
    }
    if n == 1 {
        let well = wells.swap_remove(0);
        return Ok(LayoutResult {
            placed: vec![PlacedWell {
                id: well.id.clone(),
                final_position: 0.0,
            }],
            wells: vec![OrderedWell {
                well,
                raw_position: 0.0,
                final_position: 0.0,
                perp_offset: 0.0,
                min_pitch_before: 0.0,
            }],
            geometry: None,
        });
    }

    let plan = match style {
        SectionStyle::Fence => line::fence::build(&wells, &guide, config.smooth_fence)?,
        SectionStyle::Projected => line::projected::build(&wells, &guide)?,
    };

    // Pitch between neighbours: mean of their footprint diameters plus the
    // fixed visual margin.
    let diameters: Vec<f64> = plan
        .order
        .iter()
        .map(|&i| wells[i].effective_diameter(config.default_diameter))
        .collect();
    let pitches: Vec<f64> = diameters
        .windows(2)
        .map(|w| (w[0] + w[1]) / 2.0 + config.margin)
        .collect();

    let final_positions = solver::solve(&plan.raw, &pitches)?;

    let mut ordered = Vec::with_capacity(n);
    for (k, &i) in plan.order.iter().enumerate() {
        ordered.push(OrderedWell {
            well: wells[i].clone(),
            raw_position: plan.raw[k],
            final_position: final_positions[k],
            perp_offset: plan.perp[k],
            min_pitch_before: if k == 0 { 0.0 } else { pitches[k - 1] },
        });
    }
    let placed = ordered
        .iter()
        .map(|o| PlacedWell {
            id: o.well.id.clone(),
            final_position: o.final_position,
        })
        .collect();

    Ok(LayoutResult {
        placed,
        wells: ordered,
        geometry: Some(plan.geometry),
    })
}

fn validate_wells(wells: &[WellPoint]) -> Result<(), LayoutError> {
    for w in wells {
        if !w.xy.is_finite() {
            return Err(LayoutError::non_finite(format!(
                "coordinate of well {}",
                w.id
            )));
        }
        if let Some(d) = w.diameter {
            if !d.is_finite() {
                return Err(LayoutError::non_finite(format!(
                    "diameter of well {}",
                    w.id
                )));
            }
        }
    }
    Ok(())
}
