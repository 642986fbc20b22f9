//! Domain primitives for cross-section layout.
//!
//! Design goals:
//! - Validated at construction: guides and angles that reach the layout
//!   pipeline are already known to be well formed
//! - Unit directions are a distinct type from free vectors
//! - Plan-view coordinates are plain `glam::DVec2` in world units

use glam::DVec2;
use std::collections::BTreeMap;
use std::f64::consts::{PI, TAU};
use std::fmt;

use crate::errors::LayoutError;

/// Well identifier. Ordering ties along the section line are broken by id,
/// so layout output is deterministic for any input order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WellId(String);

impl WellId {
    pub fn new(id: impl Into<String>) -> Self {
        WellId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WellId {
    fn from(s: &str) -> Self {
        WellId(s.to_owned())
    }
}

impl From<String> for WellId {
    fn from(s: String) -> Self {
        WellId(s)
    }
}

/// Plan-view angle in radians, counterclockwise from east.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Angle(f64);

impl Angle {
    pub const EAST: Angle = Angle(0.0);

    /// Unchecked constructor for internal math on already-validated values.
    /// Use `radians` for user-provided values.
    pub(crate) const fn rad_unchecked(rad: f64) -> Angle {
        Angle(rad)
    }

    /// Create an angle from radians. Rejects NaN and infinity.
    pub fn radians(rad: f64) -> Result<Angle, LayoutError> {
        if rad.is_finite() {
            Ok(Angle(rad))
        } else {
            Err(LayoutError::non_finite("guide angle"))
        }
    }

    /// Create an angle from degrees. Rejects NaN and infinity.
    pub fn degrees(deg: f64) -> Result<Angle, LayoutError> {
        Angle::radians(deg.to_radians())
    }

    pub fn rad(self) -> f64 {
        self.0
    }

    pub fn deg(self) -> f64 {
        self.0.to_degrees()
    }

    /// Shift into the principal range (-pi, pi].
    pub fn principal(self) -> Angle {
        let mut r = self.0.rem_euclid(TAU);
        if r > PI {
            r -= TAU;
        }
        Angle(r)
    }

    /// Unit vector at this angle.
    pub fn direction(self) -> Direction {
        Direction {
            x: self.0.cos(),
            y: self.0.sin(),
        }
    }
}

/// Prints degrees, the unit users type on the command line of the
/// surrounding tool.
impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}\u{b0}", self.deg())
    }
}

/// A unit direction vector in plan view. Invariant: length is 1.
///
/// Constructed only through [`Direction::new`], [`Direction::from_points`],
/// or [`Angle::direction`], so downstream code never re-normalizes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Direction {
    x: f64,
    y: f64,
}

impl Direction {
    pub const EAST: Direction = Direction { x: 1.0, y: 0.0 };
    pub const NORTH: Direction = Direction { x: 0.0, y: 1.0 };

    /// Normalize the components into a direction.
    /// Returns None for a zero or non-finite input.
    pub fn new(dx: f64, dy: f64) -> Option<Direction> {
        let len = (dx * dx + dy * dy).sqrt();
        if len == 0.0 || !len.is_finite() {
            None
        } else {
            Some(Direction {
                x: dx / len,
                y: dy / len,
            })
        }
    }

    /// Direction from `a` toward `b`. None if the points coincide.
    pub fn from_points(a: DVec2, b: DVec2) -> Option<Direction> {
        Direction::new(b.x - a.x, b.y - a.y)
    }

    pub fn as_vec(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Signed coordinate of `v` along this direction (dot product).
    pub fn along(self, v: DVec2) -> f64 {
        self.x * v.x + self.y * v.y
    }

    /// Perpendicular direction, rotated a quarter turn counterclockwise.
    pub fn perp(self) -> Direction {
        Direction {
            x: -self.y,
            y: self.x,
        }
    }

    pub fn angle(self) -> Angle {
        Angle(self.y.atan2(self.x))
    }

    /// Flip so the direction points west-to-east, or south-to-north when
    /// exactly north-south. Used to break the sign ambiguity of a fitted
    /// trend axis.
    pub fn canonical(self) -> Direction {
        if self.x < 0.0 || (self.x == 0.0 && self.y < 0.0) {
            Direction {
                x: -self.x,
                y: -self.y,
            }
        } else {
            self
        }
    }
}

impl std::ops::Neg for Direction {
    type Output = Direction;
    fn neg(self) -> Direction {
        Direction {
            x: -self.x,
            y: -self.y,
        }
    }
}

/// Typed value for the open well-attribute extension point.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Number(f64),
    Text(String),
    Flag(bool),
}

/// A well as seen by the layout engine: identity, plan-view location, and
/// the diameter it will be drawn with.
///
/// `diameter` is in the same units as the coordinates (the caller applies
/// its own diameter scaling before layout). `None` or a non-positive value
/// means "use the configured default".
#[derive(Clone, Debug, PartialEq)]
pub struct WellPoint {
    pub id: WellId,
    pub xy: DVec2,
    pub diameter: Option<f64>,
    /// Extra attributes carried through untouched for the renderer.
    pub attrs: BTreeMap<String, AttrValue>,
}

impl WellPoint {
    pub fn new(id: impl Into<WellId>, x: f64, y: f64) -> WellPoint {
        WellPoint {
            id: id.into(),
            xy: DVec2::new(x, y),
            diameter: None,
            attrs: BTreeMap::new(),
        }
    }

    pub fn with_diameter(mut self, diameter: f64) -> WellPoint {
        self.diameter = Some(diameter);
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: AttrValue) -> WellPoint {
        self.attrs.insert(key.into(), value);
        self
    }

    /// Drawing diameter with the default substituted for missing or
    /// non-positive values.
    pub(crate) fn effective_diameter(&self, default: f64) -> f64 {
        match self.diameter {
            Some(d) if d > 0.0 => d,
            _ => default,
        }
    }
}

/// User-supplied guide geometry steering how wells are ordered and where
/// the section line runs. Validated on construction; an instance that
/// exists is well formed.
#[derive(Clone, Debug, PartialEq)]
pub struct Guide {
    kind: GuideKind,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum GuideKind {
    None,
    Angle {
        angle: Angle,
        /// Maximum deviation (radians) a fitted trend may take from
        /// `angle`. `None` means the angle is exact.
        max_deviation: Option<f64>,
    },
    Polyline(Vec<DVec2>),
    Anchors(DVec2, DVec2),
}

impl Guide {
    /// No guide: the engine fits a trend line through the wells.
    pub fn none() -> Guide {
        Guide {
            kind: GuideKind::None,
        }
    }

    /// Order and orient along an exact angle.
    pub fn angle(angle: Angle) -> Guide {
        Guide {
            kind: GuideKind::Angle {
                angle,
                max_deviation: None,
            },
        }
    }

    /// Fit a trend line, constrained to within `max_deviation` radians of
    /// `angle`. `max_deviation` must lie in [0, pi/2].
    pub fn angle_about(angle: Angle, max_deviation: f64) -> Result<Guide, LayoutError> {
        if !max_deviation.is_finite() {
            return Err(LayoutError::non_finite("angle deviation limit"));
        }
        if !(0.0..=PI / 2.0).contains(&max_deviation) {
            return Err(LayoutError::bad_guide(
                "any",
                format!("angle deviation limit {max_deviation} outside [0, pi/2]"),
            ));
        }
        Ok(Guide {
            kind: GuideKind::Angle {
                angle,
                max_deviation: Some(max_deviation),
            },
        })
    }

    /// Order along a guide polyline of at least two finite points.
    pub fn polyline(points: Vec<DVec2>) -> Result<Guide, LayoutError> {
        if points.len() < 2 {
            return Err(LayoutError::bad_guide(
                "fence",
                format!("guide polyline needs at least 2 points, got {}", points.len()),
            ));
        }
        if let Some(p) = points.iter().find(|p| !p.is_finite()) {
            return Err(LayoutError::non_finite(format!(
                "guide polyline point ({}, {})",
                p.x, p.y
            )));
        }
        Ok(Guide {
            kind: GuideKind::Polyline(points),
        })
    }

    /// Two anchor points fixing the section line. Must be distinct and finite.
    pub fn anchors(p1: DVec2, p2: DVec2) -> Result<Guide, LayoutError> {
        if !p1.is_finite() || !p2.is_finite() {
            return Err(LayoutError::non_finite("anchor point"));
        }
        if p1 == p2 {
            return Err(LayoutError::bad_guide(
                "any",
                format!("anchor points coincide at ({}, {})", p1.x, p1.y),
            ));
        }
        Ok(Guide {
            kind: GuideKind::Anchors(p1, p2),
        })
    }

    pub(crate) fn kind(&self) -> &GuideKind {
        &self.kind
    }
}

/// The caller's drawing-mode choice for a multi-well section.
///
/// The singleton case (exactly one well) is derived from the request, never
/// chosen here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionStyle {
    /// Polyline through every well in order.
    Fence,
    /// Single straight line; wells attach by normal projection.
    Projected,
}

impl fmt::Display for SectionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionStyle::Fence => write!(f, "fence"),
            SectionStyle::Projected => write!(f, "projected"),
        }
    }
}

/// Per-request layout configuration. Passed explicitly; the engine holds no
/// process-wide settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Fixed visual margin added between adjacent well footprints, in
    /// coordinate units.
    pub margin: f64,
    /// Diameter substituted for wells with a missing or non-positive
    /// diameter, in coordinate units.
    pub default_diameter: f64,
    /// Run a length-reducing ordering pass on fences whose ordering came
    /// from a fitted or angled axis rather than a dense guide polyline.
    pub smooth_fence: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            margin: 0.0,
            default_diameter: 1.0,
            smooth_fence: false,
        }
    }
}

impl LayoutConfig {
    pub(crate) fn validate(&self) -> Result<(), LayoutError> {
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(LayoutError::InvalidConfig {
                reason: format!("margin {} must be finite and >= 0", self.margin),
            });
        }
        if !self.default_diameter.is_finite() || self.default_diameter <= 0.0 {
            return Err(LayoutError::InvalidConfig {
                reason: format!(
                    "default diameter {} must be finite and > 0",
                    self.default_diameter
                ),
            });
        }
        Ok(())
    }
}
