//! Projected section-line construction: one straight line, wells attached
//! by normal projection.
//!
//! The line is fixed by the strongest guide available: two anchor points
//! pin it exactly; an angle orients it through the centroid of the wells;
//! with nothing given the best-fit trend axis is used. A guide polyline
//! has no meaning here and is rejected.

use glam::DVec2;

use super::geometry::line_frame;
use super::{trend, LinePlan, SectionGeometry};
use crate::errors::LayoutError;
use crate::log::debug;
use crate::types::{Direction, Guide, GuideKind, WellPoint};

pub(crate) fn build(wells: &[WellPoint], guide: &Guide) -> Result<LinePlan, LayoutError> {
    let n = wells.len();
    if n == 0 {
        return Err(LayoutError::InsufficientPoints { needed: 1, got: 0 });
    }
    let xys: Vec<DVec2> = wells.iter().map(|w| w.xy).collect();

    // Along-line positions are measured from this origin: the first anchor
    // point when anchors are given, the centroid otherwise.
    let (origin, dir): (DVec2, Direction) = match guide.kind() {
        GuideKind::Anchors(p1, p2) => {
            let dir = Direction::from_points(*p1, *p2).ok_or_else(|| {
                LayoutError::bad_guide("projected", "anchor points coincide")
            })?;
            (*p1, dir)
        }
        GuideKind::Angle {
            angle,
            max_deviation,
        } => {
            let c = trend::centroid(&xys);
            let dir = match max_deviation {
                Some(dev) => trend::estimate_about(&xys, *angle, *dev)?.0,
                None => angle.direction(),
            };
            (c, dir)
        }
        GuideKind::None => {
            let (dir, c) = trend::estimate(&xys)?;
            (c, dir)
        }
        GuideKind::Polyline(_) => {
            return Err(LayoutError::bad_guide(
                "projected",
                "a guide polyline only steers fence ordering; give an angle or two anchor points",
            ));
        }
    };

    let coords: Vec<(f64, f64)> = xys.iter().map(|&p| line_frame(origin, dir, p)).collect();

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        coords[a]
            .0
            .total_cmp(&coords[b].0)
            .then_with(|| wells[a].id.cmp(&wells[b].id))
    });

    let raw: Vec<f64> = order.iter().map(|&i| coords[i].0).collect();
    let perp: Vec<f64> = order.iter().map(|&i| coords[i].1).collect();
    let projections: Vec<DVec2> = raw.iter().map(|&s| origin + dir.as_vec() * s).collect();

    // The drawn segment covers exactly the outermost projections, unless
    // the user pinned it with anchors, in which case the anchors stand
    // even when some projections fall outside them.
    let (start, end) = match guide.kind() {
        GuideKind::Anchors(p1, p2) => (*p1, *p2),
        _ => (projections[0], projections[n - 1]),
    };
    debug!(
        n,
        angle_deg = dir.angle().deg(),
        span = raw[n - 1] - raw[0],
        "projected line built"
    );

    Ok(LinePlan {
        order,
        raw,
        perp,
        geometry: SectionGeometry::Projected {
            origin,
            direction: dir,
            start,
            end,
            projections,
        },
    })
}
