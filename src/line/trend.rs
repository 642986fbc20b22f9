//! Best-fit trend direction through a set of plan-view points.
//!
//! The trend is the total-least-squares line: the principal axis of the
//! 2x2 scatter matrix, which minimizes the sum of squared perpendicular
//! distances. Perpendicular (not vertical) residuals matter here because
//! well coordinates have no preferred axis.

use glam::DVec2;
use std::f64::consts::{FRAC_PI_2, PI};

use crate::errors::LayoutError;
use crate::log::debug;
use crate::types::{Angle, Direction};

/// Arithmetic mean of the points.
pub(crate) fn centroid(points: &[DVec2]) -> DVec2 {
    let mut sum = DVec2::ZERO;
    for p in points {
        sum += *p;
    }
    sum / points.len() as f64
}

/// Best-fit direction and centroid for `points`.
///
/// The returned direction is canonical: west-to-east, or south-to-north
/// when the trend runs exactly north-south. Fails with
/// `DegenerateGeometry` when all points coincide (no axis exists).
pub(crate) fn estimate(points: &[DVec2]) -> Result<(Direction, DVec2), LayoutError> {
    if points.len() < 2 {
        return Err(LayoutError::DegenerateGeometry {
            count: points.len(),
        });
    }
    let c = centroid(points);
    let dir = principal_axis(points, c).ok_or(LayoutError::DegenerateGeometry {
        count: points.len(),
    })?;
    let dir = dir.canonical();
    debug!(
        angle_deg = dir.angle().deg(),
        n = points.len(),
        "trend estimate"
    );
    Ok((dir, c))
}

/// Best-fit direction constrained to within `max_deviation` radians of
/// `angle`, plus the centroid.
///
/// The fitted axis is a half-turn-symmetric object; its deviation from the
/// given angle is folded into [-pi/2, pi/2] before clamping, so the result
/// always points the way the user's angle points. Degenerate scatter falls
/// back to the given angle rather than erroring: the caller supplied a
/// usable direction.
pub(crate) fn estimate_about(
    points: &[DVec2],
    angle: Angle,
    max_deviation: f64,
) -> Result<(Direction, DVec2), LayoutError> {
    if points.is_empty() {
        return Err(LayoutError::DegenerateGeometry { count: 0 });
    }
    let c = centroid(points);
    let base = angle.principal().rad();
    let Some(axis) = principal_axis(points, c) else {
        return Ok((angle.direction(), c));
    };
    let mut delta = Angle::rad_unchecked(axis.angle().rad() - base)
        .principal()
        .rad();
    if delta > FRAC_PI_2 {
        delta -= PI;
    } else if delta < -FRAC_PI_2 {
        delta += PI;
    }
    let clamped = delta.clamp(-max_deviation, max_deviation);
    debug!(
        fit_delta_deg = delta.to_degrees(),
        clamped_deg = clamped.to_degrees(),
        "constrained trend estimate"
    );
    Ok((Angle::rad_unchecked(base + clamped).direction(), c))
}

/// Eigenvector of the larger eigenvalue of the scatter matrix, or None if
/// the scatter is zero (all points coincide).
fn principal_axis(points: &[DVec2], centroid: DVec2) -> Option<Direction> {
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for p in points {
        let d = *p - centroid;
        sxx += d.x * d.x;
        sxy += d.x * d.y;
        syy += d.y * d.y;
    }
    let trace = sxx + syy;
    if trace <= 0.0 {
        return None;
    }
    let half_diff = (sxx - syy) / 2.0;
    let lambda = trace / 2.0 + (half_diff * half_diff + sxy * sxy).sqrt();
    // Each row of (S - lambda I) is orthogonal to the eigenvector; take
    // the better-conditioned of the two candidates.
    let v1 = DVec2::new(sxy, lambda - sxx);
    let v2 = DVec2::new(lambda - syy, sxy);
    let v = if v1.length_squared() >= v2.length_squared() {
        v1
    } else {
        v2
    };
    Direction::new(v.x, v.y).or({
        // isotropic scatter: no unique axis, fall back to the axis with
        // the larger spread, east when equal
        if sxx >= syy {
            Some(Direction::EAST)
        } else {
            Some(Direction::NORTH)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    const EPS: f64 = 1e-9;

    #[test]
    fn horizontal_scatter_fits_east() {
        let pts = vec![
            dvec2(0.0, 0.0),
            dvec2(1.0, 0.1),
            dvec2(2.0, 0.0),
            dvec2(3.0, -0.1),
            dvec2(4.0, 0.0),
        ];
        let (dir, c) = estimate(&pts).unwrap();
        assert!(dir.angle().rad().abs() < 0.1, "angle {}", dir.angle());
        assert!((c.x - 2.0).abs() < EPS);
    }

    #[test]
    fn vertical_scatter_fits_north() {
        let pts = vec![dvec2(5.0, 0.0), dvec2(5.0, 3.0), dvec2(5.0, 9.0)];
        let (dir, _) = estimate(&pts).unwrap();
        assert_eq!(dir, Direction::NORTH);
    }

    #[test]
    fn diagonal_scatter_fits_diagonal() {
        let pts = vec![dvec2(0.0, 0.0), dvec2(1.0, 1.0), dvec2(2.0, 2.0)];
        let (dir, _) = estimate(&pts).unwrap();
        assert!((dir.angle().deg() - 45.0).abs() < 1e-6);
    }

    #[test]
    fn direction_sign_prefers_west_to_east() {
        // same axis, points listed northeast-to-southwest
        let pts = vec![dvec2(2.0, 2.0), dvec2(1.0, 1.0), dvec2(0.0, 0.0)];
        let (dir, _) = estimate(&pts).unwrap();
        assert!(dir.as_vec().x > 0.0);
    }

    #[test]
    fn coincident_points_are_degenerate() {
        let pts = vec![dvec2(3.0, 3.0); 4];
        assert!(matches!(
            estimate(&pts),
            Err(LayoutError::DegenerateGeometry { count: 4 })
        ));
    }

    #[test]
    fn single_point_is_degenerate() {
        assert!(estimate(&[dvec2(0.0, 0.0)]).is_err());
    }

    #[test]
    fn centroid_is_mean() {
        let c = centroid(&[dvec2(0.0, 0.0), dvec2(4.0, 6.0)]);
        assert_eq!(c, dvec2(2.0, 3.0));
    }

    // ==================== constrained fit ====================

    #[test]
    fn unconstrained_deviation_keeps_fit() {
        let pts = vec![dvec2(0.0, 0.0), dvec2(1.0, 1.0), dvec2(2.0, 2.0)];
        let base = Angle::degrees(30.0).unwrap();
        let (dir, _) = estimate_about(&pts, base, FRAC_PI_2).unwrap();
        assert!((dir.angle().deg() - 45.0).abs() < 1e-6);
    }

    #[test]
    fn tight_deviation_clamps_to_limit() {
        let pts = vec![dvec2(0.0, 0.0), dvec2(1.0, 1.0), dvec2(2.0, 2.0)];
        let base = Angle::degrees(30.0).unwrap();
        let (dir, _) = estimate_about(&pts, base, 5.0_f64.to_radians()).unwrap();
        assert!((dir.angle().deg() - 35.0).abs() < 1e-6, "angle {}", dir.angle());
    }

    #[test]
    fn axis_deviation_folds_half_turn() {
        // fit axis is east; a base angle near west should see a small
        // deviation, not half a turn, and keep the user's westward sense
        let pts = vec![dvec2(0.0, 0.0), dvec2(1.0, 0.0), dvec2(2.0, 0.0)];
        let base = Angle::degrees(175.0).unwrap();
        let (dir, _) = estimate_about(&pts, base, FRAC_PI_2).unwrap();
        assert!(
            (dir.angle().principal().deg() - 180.0).abs() < 1e-6
                || (dir.angle().principal().deg() + 180.0).abs() < 1e-6,
            "angle {}",
            dir.angle()
        );
    }

    #[test]
    fn degenerate_scatter_falls_back_to_base_angle() {
        let pts = vec![dvec2(1.0, 1.0); 3];
        let base = Angle::degrees(60.0).unwrap();
        let (dir, c) = estimate_about(&pts, base, 0.1).unwrap();
        assert!((dir.angle().deg() - 60.0).abs() < 1e-9);
        assert_eq!(c, dvec2(1.0, 1.0));
    }
}
