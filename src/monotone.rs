//! Monotone-Y detection over near-vertical runs of sample points

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// A sample point (x, y) as emitted by the upstream sampler
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}
impl Point {
    /// Builds a point from its coordinates
    pub fn new(x: f64, y: f64) -> Self { Self { x, y } }
}
impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self { Self { x, y } }
}

/// Rejected tolerance configuration
#[derive(Debug, Error, PartialEq)]
pub enum ToleranceError {
    /// A tolerance was negative, NaN or infinite
    #[error("{name} must be finite and >= 0 (got {value})")]
    Invalid {
        /// Flag name of the offending tolerance
        name: &'static str,
        /// Value that was supplied
        value: f64,
    },
}

/// The three independent tolerances of a check.
///
/// `x_tol` bounds what counts as vertical, `y_tol` is both the vertical-motion
/// threshold and the direction threshold, `eps` is the slack allowed before a
/// backwards step is reported.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Tolerances {
    /// Max |dx| for a segment to count as vertical
    pub x_tol: f64,
    /// Min |dy| for a segment to count as moving
    pub y_tol: f64,
    /// Allowed backwards motion inside a run
    pub eps: f64,
}

impl Default for Tolerances {
    fn default() -> Self { Self { x_tol: 1e-6, y_tol: 1e-6, eps: 1e-6 } }
}

impl Tolerances {
    /// Validating constructor: every tolerance must be finite and non-negative
    pub fn new(x_tol: f64, y_tol: f64, eps: f64) -> Result<Self, ToleranceError> {
        for (name, value) in [("x-tol", x_tol), ("y-tol", y_tol), ("eps", eps)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ToleranceError::Invalid { name, value });
            }
        }
        Ok(Self { x_tol, y_tol, eps })
    }
}

/// Expected sign of Y motion within a run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Not enough drift from the run start yet
    Undetermined,
    /// Y grows along the run
    Increasing,
    /// Y shrinks along the run
    Decreasing,
}

/// A segment whose Y motion contradicts its run's direction
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Violation {
    /// 0-based index of the segment's end point
    pub index: usize,
    /// Start point x
    pub x0: f64,
    /// Start point y
    pub y0: f64,
    /// End point x
    pub x1: f64,
    /// End point y
    pub y1: f64,
}

/// Returns true when the segment a→b is near-vertical under `tol`
#[inline]
pub fn is_vertical(a: Point, b: Point, tol: &Tolerances) -> bool {
    (b.x - a.x).abs() <= tol.x_tol && (b.y - a.y).abs() > tol.y_tol
}

/// Incremental scanner: feed points in order, get violations back as they occur.
///
/// Holds only the previous point, the current run's reference point and its
/// direction, so memory use is constant in the input length.
#[derive(Clone, Debug)]
pub struct MonotoneScan {
    tol: Tolerances,
    index: usize,
    prev: Option<Point>,
    run_start: Option<Point>,
    run_start_index: usize,
    direction: Direction,
}

impl MonotoneScan {
    /// Creates an empty scanner
    pub fn new(tol: Tolerances) -> Self {
        Self {
            tol,
            index: 0,
            prev: None,
            run_start: None,
            run_start_index: 0,
            direction: Direction::Undetermined,
        }
    }

    /// Number of points seen so far
    pub fn len(&self) -> usize { self.index }

    /// True when no point has been pushed yet
    pub fn is_empty(&self) -> bool { self.index == 0 }

    /// Direction of the run the last point belongs to
    pub fn direction(&self) -> Direction { self.direction }

    /// Feeds the next point; returns the violation of the segment it closes, if any
    pub fn push(&mut self, p: Point) -> Option<Violation> {
        let i = self.index;
        self.index += 1;
        let prev = match self.prev.replace(p) {
            Some(prev) => prev,
            None => {
                self.run_start = Some(p);
                self.run_start_index = i;
                return None;
            }
        };

        if !is_vertical(prev, p, &self.tol) {
            if self.direction != Direction::Undetermined {
                debug!(start = self.run_start_index, end = i - 1, direction = ?self.direction, "run closed");
            }
            self.run_start = Some(p);
            self.run_start_index = i;
            self.direction = Direction::Undetermined;
            return None;
        }

        let start = self.run_start.unwrap_or(prev);
        if self.direction == Direction::Undetermined && (p.y - start.y).abs() > self.tol.y_tol {
            self.direction = if p.y >= start.y { Direction::Increasing } else { Direction::Decreasing };
            debug!(start = self.run_start_index, at = i, direction = ?self.direction, "run direction fixed");
        }

        let reversed = match self.direction {
            Direction::Undetermined => false,
            Direction::Increasing => p.y + self.tol.eps < prev.y,
            Direction::Decreasing => p.y - self.tol.eps > prev.y,
        };
        reversed.then(|| Violation { index: i, x0: prev.x, y0: prev.y, x1: p.x, y1: p.y })
    }
}

/// Scans any ordered stream of points and collects violations in index order
pub fn scan<I>(points: I, tol: Tolerances) -> Vec<Violation>
where
    I: IntoIterator,
    I::Item: Into<Point>,
{
    let mut scanner = MonotoneScan::new(tol);
    points.into_iter().filter_map(|p| scanner.push(p.into())).collect()
}

/// Checks a full sample sequence.
///
/// Total over finite input: fewer than two points yields an empty result.
/// A NaN coordinate fails every comparison, so its segments classify as
/// non-vertical and reset the run.
pub fn check(samples: &[Point], tol: Tolerances) -> Vec<Violation> {
    if samples.len() < 2 {
        return Vec::new();
    }
    scan(samples.iter().copied(), tol)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(v: &[(f64, f64)]) -> Vec<Point> { v.iter().copied().map(Point::from).collect() }

    #[test]
    fn short_input_is_a_noop() {
        assert!(check(&[], Tolerances::default()).is_empty());
        assert!(check(&pts(&[(0.0, 0.0)]), Tolerances::default()).is_empty());
    }

    #[test]
    fn monotone_runs_pass() {
        let up = pts(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0), (0.0, 3.0)]);
        let down = pts(&[(0.0, 3.0), (0.0, 2.0), (0.0, 1.0), (0.0, 0.0)]);
        assert!(check(&up, Tolerances::default()).is_empty());
        assert!(check(&down, Tolerances::default()).is_empty());
    }

    #[test]
    fn reversal_in_increasing_run() {
        let v = check(&pts(&[(0.0, 0.0), (0.0, 5.0), (0.0, 4.0)]), Tolerances::default());
        assert_eq!(v, vec![Violation { index: 2, x0: 0.0, y0: 5.0, x1: 0.0, y1: 4.0 }]);
    }

    #[test]
    fn reversal_in_decreasing_run() {
        let v = check(&pts(&[(1.0, 9.0), (1.0, 6.0), (1.0, 7.0), (1.0, 2.0)]), Tolerances::default());
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].index, 2);
    }

    #[test]
    fn drift_within_y_tol_is_ignored() {
        let s = pts(&[(0.0, 0.0), (0.0, 0.0000001), (0.0, -0.0000001)]);
        assert!(check(&s, Tolerances::default()).is_empty());
    }

    #[test]
    fn non_vertical_segment_resets_run() {
        let s = pts(&[(0.0, 0.0), (5.0, 0.0), (5.0, 0.0), (5.0, -1.0)]);
        assert!(check(&s, Tolerances::default()).is_empty());

        // Increasing run, jump sideways, then a fresh decreasing run.
        let s = pts(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0), (3.0, 2.0), (3.0, 1.0), (3.0, 0.0)]);
        assert!(check(&s, Tolerances::default()).is_empty());
    }

    #[test]
    fn direction_is_never_flipped_within_a_run() {
        let s = pts(&[(0.0, 0.0), (0.0, 1.0), (0.0, 0.5), (0.0, 0.0), (0.0, -1.0)]);
        let v = check(&s, Tolerances::default());
        assert_eq!(v.iter().map(|v| v.index).collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn eps_absorbs_small_reversals() {
        let tol = Tolerances { eps: 0.5, ..Tolerances::default() };
        let s = pts(&[(0.0, 0.0), (0.0, 2.0), (0.0, 1.75), (0.0, 1.0)]);
        let v = check(&s, tol);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].index, 3);
    }

    #[test]
    fn reversal_of_exactly_eps_is_allowed() {
        let tol = Tolerances { eps: 0.5, ..Tolerances::default() };
        assert!(check(&pts(&[(0.0, 0.0), (0.0, 2.0), (0.0, 1.5)]), tol).is_empty());
        assert!(check(&pts(&[(0.0, 2.0), (0.0, 0.0), (0.0, 0.5)]), tol).is_empty());
        assert_eq!(check(&pts(&[(0.0, 0.0), (0.0, 2.0), (0.0, 1.25)]), tol).len(), 1);
    }

    #[test]
    fn x_tol_widens_vertical_band() {
        let s = pts(&[(0.0, 0.0), (0.01, 1.0), (0.02, 0.5)]);
        assert!(check(&s, Tolerances::default()).is_empty());
        let tol = Tolerances { x_tol: 0.05, ..Tolerances::default() };
        assert_eq!(check(&s, tol).len(), 1);
    }

    #[test]
    fn scanner_tracks_direction() {
        let mut sc = MonotoneScan::new(Tolerances::default());
        assert!(sc.is_empty());
        assert_eq!(sc.push(Point::new(0.0, 0.0)), None);
        assert_eq!(sc.direction(), Direction::Undetermined);
        assert_eq!(sc.push(Point::new(0.0, -2.0)), None);
        assert_eq!(sc.direction(), Direction::Decreasing);
        assert!(sc.push(Point::new(0.0, -1.0)).is_some());
        assert_eq!(sc.push(Point::new(4.0, -1.0)), None);
        assert_eq!(sc.direction(), Direction::Undetermined);
        assert_eq!(sc.len(), 4);
    }

    #[test]
    fn nan_resets_instead_of_flagging() {
        let s = pts(&[(0.0, 0.0), (0.0, 1.0), (0.0, f64::NAN), (0.0, 0.5)]);
        assert!(check(&s, Tolerances::default()).is_empty());
    }

    #[test]
    fn tolerances_reject_negative_and_nan() {
        assert!(Tolerances::new(1e-6, 1e-6, 1e-6).is_ok());
        assert_eq!(
            Tolerances::new(-1.0, 0.0, 0.0),
            Err(ToleranceError::Invalid { name: "x-tol", value: -1.0 })
        );
        assert!(Tolerances::new(0.0, f64::NAN, 0.0).is_err());
        assert!(Tolerances::new(0.0, 0.0, f64::INFINITY).is_err());
    }
}
