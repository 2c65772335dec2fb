//! Sweep Enumerator
//!
//! Produces the ordered, finite sequence of parameter points of one sweep.
//! Two modes:
//!
//! - **Direct**: `start, start + 1, ..., end` (problem size, matrix dimension)
//! - **Stepped**: `start + step * n` for `n in 0..=point_count` (image size)
//!
//! Sequences are lazy and restartable: every call to [`SweepRange::points`]
//! starts over from the first point.
//!
//! ```rust
//! use bench_sweep::sweep::SweepRange;
//!
//! let values: Vec<u64> = SweepRange::Stepped { start: 256, step: 256, point_count: 2 }
//!     .points()
//!     .map(|p| p.value())
//!     .collect();
//! assert_eq!(values, vec![256, 512, 768]);
//! ```

use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

/// Bounds and mode of one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SweepRange {
    /// Every integer in `start..=end`; empty when `end < start`.
    Direct {
        /// First value.
        start: u64,
        /// Last value (inclusive).
        end: u64,
    },
    /// `start + step * n` for `n in 0..=point_count`.
    ///
    /// A zero `step` yields the single point `start` (see
    /// [`SweepRange::collapsed_repeats`]). Values that would overflow `u64`
    /// are not produced.
    Stepped {
        /// Value at `n = 0`.
        start: u64,
        /// Distance between consecutive values.
        step: u64,
        /// Last `n` (inclusive).
        point_count: u64,
    },
}

impl SweepRange {
    /// Ordinal of the sweep's last point, or `None` when the sweep is empty.
    #[must_use]
    pub const fn last_ordinal(&self) -> Option<u64> {
        match *self {
            Self::Direct { start, end } => {
                if end < start {
                    None
                } else {
                    Some(end - start)
                }
            }
            Self::Stepped {
                start,
                step,
                point_count,
            } => {
                if step == 0 {
                    return Some(0);
                }
                let reachable = (u64::MAX - start) / step;
                if point_count < reachable {
                    Some(point_count)
                } else {
                    Some(reachable)
                }
            }
        }
    }

    /// Number of points the sweep yields.
    ///
    /// Saturates at `u64::MAX` for `Direct { start: 0, end: u64::MAX }`,
    /// which still yields every value up to and including `u64::MAX`.
    #[must_use]
    pub const fn len(&self) -> u64 {
        match self.last_ordinal() {
            Some(last) => last.saturating_add(1),
            None => 0,
        }
    }

    /// Repeat points a zero-`step` stepped sweep folds into its single point.
    #[must_use]
    pub const fn collapsed_repeats(&self) -> u64 {
        match *self {
            Self::Stepped {
                step: 0,
                point_count,
                ..
            } => point_count,
            _ => 0,
        }
    }

    /// Whether the sweep yields no point at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.last_ordinal().is_none()
    }

    /// Swept value at position `ordinal`.
    const fn value_at(&self, ordinal: u64) -> u64 {
        match *self {
            Self::Direct { start, .. } => start + ordinal,
            Self::Stepped { start, step, .. } => start + step * ordinal,
        }
    }

    /// Fresh iterator over the sweep's points.
    #[must_use]
    pub const fn points(&self) -> Points {
        Points {
            range: *self,
            next: 0,
            last: self.last_ordinal(),
        }
    }
}

impl IntoIterator for SweepRange {
    type Item = ParameterPoint;
    type IntoIter = Points;

    fn into_iter(self) -> Self::IntoIter {
        self.points()
    }
}

/// One point of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterPoint {
    ordinal: u64,
    value: u64,
}

impl ParameterPoint {
    /// Create a point at `ordinal` with swept `value`.
    #[must_use]
    pub const fn new(ordinal: u64, value: u64) -> Self {
        Self { ordinal, value }
    }

    /// Zero-based position in the sweep (`n` for stepped sweeps).
    #[must_use]
    pub const fn ordinal(&self) -> u64 {
        self.ordinal
    }

    /// Swept parameter value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Whether this is the sweep's first point.
    #[must_use]
    pub const fn is_first(&self) -> bool {
        self.ordinal == 0
    }
}

/// Lazy iterator over a [`SweepRange`].
#[derive(Debug, Clone)]
pub struct Points {
    range: SweepRange,
    next: u64,
    // Cleared once the last ordinal has been yielded.
    last: Option<u64>,
}

impl Points {
    /// Points not yet yielded, saturating at `u64::MAX`.
    #[must_use]
    pub const fn remaining(&self) -> u64 {
        match self.last {
            Some(last) => (last - self.next).saturating_add(1),
            None => 0,
        }
    }
}

impl Iterator for Points {
    type Item = ParameterPoint;

    fn next(&mut self) -> Option<Self::Item> {
        let last = self.last?;
        let ordinal = self.next;
        if ordinal == last {
            self.last = None;
        } else {
            self.next += 1;
        }
        Some(ParameterPoint::new(ordinal, self.range.value_at(ordinal)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining()) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for Points {}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(range: SweepRange) -> Vec<u64> {
        range.points().map(|p| p.value()).collect()
    }

    #[test]
    fn test_direct_inclusive() {
        assert_eq!(values(SweepRange::Direct { start: 18, end: 20 }), vec![18, 19, 20]);
    }

    #[test]
    fn test_direct_single_point() {
        assert_eq!(values(SweepRange::Direct { start: 7, end: 7 }), vec![7]);
    }

    #[test]
    fn test_direct_reversed_is_empty() {
        let range = SweepRange::Direct { start: 20, end: 18 };
        assert!(range.is_empty());
        assert_eq!(range.points().next(), None);
    }

    #[test]
    fn test_stepped_includes_point_count() {
        let range = SweepRange::Stepped {
            start: 256,
            step: 256,
            point_count: 2,
        };
        let points: Vec<_> = range.points().collect();
        assert_eq!(points.len(), 3);
        assert_eq!(points[2], ParameterPoint::new(2, 768));
    }

    #[test]
    fn test_stepped_zero_step_single_point() {
        let range = SweepRange::Stepped {
            start: 5,
            step: 0,
            point_count: 10,
        };
        assert_eq!(values(range), vec![5]);
    }

    #[test]
    fn test_stepped_stops_before_overflow() {
        let range = SweepRange::Stepped {
            start: u64::MAX - 10,
            step: 4,
            point_count: 100,
        };
        assert_eq!(values(range), vec![u64::MAX - 10, u64::MAX - 6, u64::MAX - 2]);
    }

    #[test]
    fn test_points_restartable() {
        let range = SweepRange::Direct { start: 1, end: 4 };
        let first: Vec<_> = range.points().collect();
        let second: Vec<_> = range.into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_only_first_point_is_first() {
        let firsts = SweepRange::Direct { start: 4, end: 9 }
            .points()
            .filter(ParameterPoint::is_first)
            .count();
        assert_eq!(firsts, 1);
    }

    #[test]
    fn test_size_hint_tracks_remaining() {
        let mut points = SweepRange::Direct { start: 0, end: 2 }.points();
        assert_eq!(points.size_hint(), (3, Some(3)));
        points.next();
        assert_eq!(points.remaining(), 2);
    }

    #[test]
    fn test_direct_reaches_u64_max() {
        let range = SweepRange::Direct {
            start: u64::MAX - 2,
            end: u64::MAX,
        };
        assert_eq!(values(range), vec![u64::MAX - 2, u64::MAX - 1, u64::MAX]);
        assert_eq!(range.len(), 3);
    }

    #[test]
    fn test_full_domain_saturates_len_only() {
        let range = SweepRange::Direct {
            start: 0,
            end: u64::MAX,
        };
        assert_eq!(range.len(), u64::MAX);
        assert_eq!(range.last_ordinal(), Some(u64::MAX));

        let mut points = range.points();
        assert_eq!(points.next(), Some(ParameterPoint::new(0, 0)));
        assert_eq!(points.remaining(), u64::MAX);
    }

    #[test]
    fn test_points_fused_after_last() {
        let mut points = SweepRange::Direct { start: 3, end: 3 }.points();
        assert!(points.next().is_some());
        assert_eq!(points.next(), None);
        assert_eq!(points.next(), None);
        assert_eq!(points.remaining(), 0);
    }

    #[test]
    fn test_collapsed_repeats() {
        let zero_step = SweepRange::Stepped {
            start: 256,
            step: 0,
            point_count: 10,
        };
        assert_eq!(zero_step.collapsed_repeats(), 10);
        assert_eq!(zero_step.len(), 1);

        let stepped = SweepRange::Stepped {
            start: 256,
            step: 256,
            point_count: 10,
        };
        assert_eq!(stepped.collapsed_repeats(), 0);
        assert_eq!(SweepRange::Direct { start: 1, end: 5 }.collapsed_repeats(), 0);
    }
}
