//! Fence-line construction: a polyline through every well.
//!
//! The only real work is choosing the order to visit the wells in. A guide
//! polyline ranks wells by arc length of their nearest point on the guide;
//! an angle ranks by the dot product with its unit vector; with no guide
//! the best-fit trend axis supplies that vector. The fence itself is then
//! just the well coordinates in that order.

use glam::DVec2;

use super::geometry::{cumulative_lengths, PolylineFrame};
use super::{trend, LinePlan, SectionGeometry};
use crate::errors::LayoutError;
use crate::log::debug;
use crate::types::{Guide, GuideKind, WellPoint};

/// Bound on smoothing sweeps; each sweep applies at most one swap.
const MAX_SMOOTH_PASSES: usize = 100;

pub(crate) fn build(
    wells: &[WellPoint],
    guide: &Guide,
    smooth: bool,
) -> Result<LinePlan, LayoutError> {
    let n = wells.len();
    if n == 0 {
        return Err(LayoutError::InsufficientPoints { needed: 1, got: 0 });
    }
    let xys: Vec<DVec2> = wells.iter().map(|w| w.xy).collect();

    // Ordering keys. `guide_nodes` is Some when a user polyline (or anchor
    // pair) drove the ordering, with its vertex count.
    let (keys, guide_nodes): (Vec<f64>, Option<usize>) = match guide.kind() {
        GuideKind::Polyline(pts) => {
            let frame = PolylineFrame::new(pts.clone());
            (xys.iter().map(|&p| frame.order_key(p)).collect(), Some(pts.len()))
        }
        GuideKind::Anchors(p1, p2) => {
            let frame = PolylineFrame::new(vec![*p1, *p2]);
            (xys.iter().map(|&p| frame.order_key(p)).collect(), Some(2))
        }
        GuideKind::Angle {
            angle,
            max_deviation,
        } => {
            let dir = match max_deviation {
                Some(dev) => trend::estimate_about(&xys, *angle, *dev)?.0,
                None => angle.direction(),
            };
            (xys.iter().map(|&p| dir.along(p)).collect(), None)
        }
        GuideKind::None => {
            if n == 1 {
                (vec![0.0], None)
            } else {
                let (dir, _) = trend::estimate(&xys)?;
                (xys.iter().map(|&p| dir.along(p)).collect(), None)
            }
        }
    };

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        keys[a]
            .total_cmp(&keys[b])
            .then_with(|| wells[a].id.cmp(&wells[b].id))
    });

    // A dense guide polyline already dictates the shape; smoothing is for
    // orderings that came from a straight axis, or from a sparse guide
    // with many wells per guide node.
    let sparse_guide = match guide_nodes {
        Some(nodes) => n > 5 && n as f64 / nodes as f64 > 2.0,
        None => true,
    };
    if smooth && sparse_guide {
        smooth_ordering(wells, &mut order);
    }

    let vertices: Vec<DVec2> = order.iter().map(|&i| wells[i].xy).collect();
    let raw = cumulative_lengths(&vertices);
    debug!(n, length = raw.last().copied().unwrap_or(0.0), "fence built");

    Ok(LinePlan {
        perp: vec![0.0; n],
        raw,
        order,
        geometry: SectionGeometry::Fence { vertices },
    })
}

/// Reduce total fence length by adjacent transpositions.
///
/// Sweeps the ordering for the single swap with the largest length
/// reduction, applies it, and repeats until no swap helps. Wells migrate
/// over several sweeps. The ordering is assumed near-optimal on entry;
/// when the result still looks wrong the user's recourse is a guide angle
/// or polyline.
fn smooth_ordering(wells: &[WellPoint], order: &mut [usize]) {
    let n = order.len();
    if n < 3 {
        return;
    }
    for pass in 0..MAX_SMOOTH_PASSES {
        let mut best_delta = -1e-12;
        let mut best_swap = None;
        for i in 0..n - 1 {
            // swapping b, c changes edges (a,b) and (c,d) into (a,c), (b,d)
            let b = wells[order[i]].xy;
            let c = wells[order[i + 1]].xy;
            let mut delta = 0.0;
            if i > 0 {
                let a = wells[order[i - 1]].xy;
                delta += a.distance(c) - a.distance(b);
            }
            if i + 2 < n {
                let d = wells[order[i + 2]].xy;
                delta += b.distance(d) - c.distance(d);
            }
            if delta < best_delta {
                best_delta = delta;
                best_swap = Some(i);
            }
        }
        match best_swap {
            Some(i) => {
                debug!(pass, i, delta = best_delta, "fence smoothing swap");
                order.swap(i, i + 1);
            }
            None => break,
        }
    }
}
