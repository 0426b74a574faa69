use std::cmp::Ordering;
use std::fmt;

use rayon::prelude::*;
use serde::Serialize;

use super::dominance::dominates_all;
use super::skyline::Skyline;

/// Position of `value` between `min` and `max`, or 0 when the range is
/// degenerate.
pub fn percentage(value: f64, min: f64, max: f64) -> f64 {
    if max > min {
        (value - min) / (max - min)
    } else {
        0.0
    }
}

/// Ascending order for attribute values; equal values keep input order when
/// used with a stable sort.
pub(crate) fn ascending(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

// ---------------------------------------------------------------------------
// Domination scores
// ---------------------------------------------------------------------------

/// How many records each skyline point dominates under the full attribute
/// set. Indexed by skyline position.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DominationScores {
    pub scores: Vec<usize>,
    /// Records dominated by each skyline point, ascending.
    pub dominated: Vec<Vec<usize>>,
    /// Smallest and largest score; both 0 without skyline points.
    pub min: usize,
    pub max: usize,
}

impl DominationScores {
    pub fn compute(
        points: &[Vec<f64>],
        attribute_count: usize,
        skyline: &Skyline,
        parallel: bool,
    ) -> Self {
        let dominated_by = |&p: &usize| -> Vec<usize> {
            let row = &points[p][..attribute_count];
            (0..points.len())
                .filter(|&r| r != p && dominates_all(row, &points[r][..attribute_count]))
                .collect()
        };
        let dominated: Vec<Vec<usize>> = if parallel {
            skyline.skyline.par_iter().map(dominated_by).collect()
        } else {
            skyline.skyline.iter().map(dominated_by).collect()
        };

        let scores: Vec<usize> = dominated.iter().map(Vec::len).collect();
        DominationScores {
            min: scores.iter().copied().min().unwrap_or(0),
            max: scores.iter().copied().max().unwrap_or(0),
            scores,
            dominated,
        }
    }

    /// Normalized score of the skyline point at `position`, in `[0, 1]`;
    /// 0 when every skyline point has the same score.
    pub fn percentage(&self, position: usize) -> f64 {
        percentage(
            self.scores[position] as f64,
            self.min as f64,
            self.max as f64,
        )
    }
}

// ---------------------------------------------------------------------------
// Attribute ranges among skyline points
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttributeRange {
    pub min: f64,
    pub max: f64,
}

impl AttributeRange {
    /// Range of the given values; missing (infinite) values are skipped and an
    /// empty input gives `0 ~ 0`.
    pub fn of(values: impl IntoIterator<Item = f64>) -> Self {
        let mut range: Option<AttributeRange> = None;
        for v in values.into_iter().filter(|v| v.is_finite()) {
            range = Some(match range {
                None => AttributeRange { min: v, max: v },
                Some(r) => AttributeRange {
                    min: r.min.min(v),
                    max: r.max.max(v),
                },
            });
        }
        range.unwrap_or(AttributeRange { min: 0.0, max: 0.0 })
    }

    /// Ranges of every attribute over the skyline points.
    pub fn for_skyline(points: &[Vec<f64>], attribute_count: usize, skyline: &Skyline) -> Vec<Self> {
        (0..attribute_count)
            .map(|attr| AttributeRange::of(skyline.skyline.iter().map(|&r| points[r][attr])))
            .collect()
    }

    pub fn percentage(&self, value: f64) -> f64 {
        percentage(value, self.min, self.max)
    }
}

impl fmt::Display for AttributeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ~ {}", self.min, self.max)
    }
}

// ---------------------------------------------------------------------------
// Relative rankings
// ---------------------------------------------------------------------------

/// Rank of every skyline point on every attribute, as `position / n` in the
/// skyline sorted ascending by that attribute. Ties keep skyline order, so
/// every point gets a distinct rank.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RelativeRankings {
    /// `ranks[position][attr]`
    ranks: Vec<Vec<f64>>,
}

impl RelativeRankings {
    pub fn compute(points: &[Vec<f64>], attribute_count: usize, skyline: &Skyline) -> Self {
        let n = skyline.len();
        let mut ranks = vec![vec![0.0; attribute_count]; n];
        for attr in 0..attribute_count {
            let mut order: Vec<usize> = (0..n).collect();
            order.sort_by(|&a, &b| {
                ascending(
                    points[skyline.skyline[a]][attr],
                    points[skyline.skyline[b]][attr],
                )
            });
            for (rank, position) in order.into_iter().enumerate() {
                ranks[position][attr] = rank as f64 / n as f64;
            }
        }
        RelativeRankings { ranks }
    }

    pub fn get(&self, position: usize, attr: usize) -> f64 {
        self.ranks[position][attr]
    }

    /// All attribute ranks of one skyline point.
    pub fn of_point(&self, position: usize) -> &[f64] {
        &self.ranks[position]
    }
}
