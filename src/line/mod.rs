//! Section-line construction: fence polylines and projected straight lines.

pub(crate) mod fence;
pub(crate) mod geometry;
pub(crate) mod projected;
pub(crate) mod trend;

use glam::DVec2;

use crate::types::Direction;

/// The constructed plan-view line for a multi-well section.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionGeometry {
    /// Fence polyline passing exactly through every well, vertices in
    /// section order.
    Fence { vertices: Vec<DVec2> },
    /// Straight projected section line.
    Projected {
        /// Zero point of along-line positions: the first anchor point, or
        /// the centroid of the wells.
        origin: DVec2,
        direction: Direction,
        /// Drawn extent: the user's anchors, or the outermost projections.
        start: DVec2,
        end: DVec2,
        /// Normal projection point of each well, in section order.
        projections: Vec<DVec2>,
    },
}

impl SectionGeometry {
    /// Map an along-line position back to a plan-view point.
    ///
    /// Positions share the scale of `raw_position`: arc length from the
    /// first vertex for a fence, signed distance from `origin` for a
    /// projected line. Fence positions are clamped to the polyline;
    /// projected positions may extend beyond the drawn extent. Renderers
    /// use this to place solver-adjusted node positions on the drawn line.
    pub fn point_at(&self, s: f64) -> DVec2 {
        match self {
            SectionGeometry::Fence { vertices } => {
                let cum = geometry::cumulative_lengths(vertices);
                geometry::point_along(vertices, &cum, s)
            }
            SectionGeometry::Projected {
                origin, direction, ..
            } => *origin + direction.as_vec() * s,
        }
    }
}

/// Intermediate result of line construction, before pitch solving.
#[derive(Debug, Clone)]
pub(crate) struct LinePlan {
    /// Section order as indices into the request's well slice.
    pub order: Vec<usize>,
    /// Raw along-line position per ordered well.
    pub raw: Vec<f64>,
    /// Signed perpendicular offset per ordered well; all zero for fences.
    pub perp: Vec<f64>,
    pub geometry: SectionGeometry,
}
