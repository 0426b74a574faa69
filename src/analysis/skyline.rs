use log::info;
use rayon::prelude::*;
use serde::Serialize;

use super::dominance::dominates_all;

/// Candidates that no comparator dominates, where `beats(a, b)` says that
/// row `a` dominates row `b`.
///
/// A record is never compared with itself. Output keeps the order of
/// `candidates`.
pub fn non_dominated<F>(
    points: &[Vec<f64>],
    candidates: &[usize],
    comparators: &[usize],
    beats: F,
    parallel: bool,
) -> Vec<usize>
where
    F: Fn(&[f64], &[f64]) -> bool + Sync,
{
    let survives = |&c: &usize| {
        !comparators
            .iter()
            .any(|&o| o != c && beats(&points[o], &points[c]))
    };
    if parallel {
        candidates.par_iter().copied().filter(|c| survives(c)).collect()
    } else {
        candidates.iter().copied().filter(|c| survives(c)).collect()
    }
}

// ---------------------------------------------------------------------------
// Skyline – partition of the dataset
// ---------------------------------------------------------------------------

/// Skyline / dominated partition of a dataset under the full attribute set.
/// Both lists hold record indices in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Skyline {
    pub skyline: Vec<usize>,
    pub dominated: Vec<usize>,
}

impl Skyline {
    /// Partition `points` (one row of attribute values per record).
    ///
    /// With no attributes nothing dominates anything, so every record is a
    /// skyline point. Any number of attributes is accepted.
    pub fn compute(points: &[Vec<f64>], attribute_count: usize, parallel: bool) -> Self {
        let all: Vec<usize> = (0..points.len()).collect();
        let skyline = non_dominated(
            points,
            &all,
            &all,
            |a, b| dominates_all(&a[..attribute_count], &b[..attribute_count]),
            parallel,
        );

        let mut in_skyline = vec![false; points.len()];
        for &r in &skyline {
            in_skyline[r] = true;
        }
        let dominated: Vec<usize> = all.into_iter().filter(|&r| !in_skyline[r]).collect();

        info!(
            "Calculated {} skyline points and {} dominated points.",
            skyline.len(),
            dominated.len()
        );
        Skyline { skyline, dominated }
    }

    pub fn len(&self) -> usize {
        self.skyline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skyline.is_empty()
    }

    pub fn contains(&self, record: usize) -> bool {
        self.skyline.binary_search(&record).is_ok()
    }

    /// Position of a record among the skyline points.
    pub fn position(&self, record: usize) -> Option<usize> {
        self.skyline.binary_search(&record).ok()
    }

    /// Skyline points that no other skyline point beats on attribute `attr`
    /// alone.
    pub fn attribute_leaders(&self, points: &[Vec<f64>], attr: usize) -> Vec<usize> {
        non_dominated(points, &self.skyline, &self.skyline, |a, b| a[attr] > b[attr], false)
    }
}
