//! Decisive subspaces of skyline points.
//!
//! Based on J. Pei, W. Jin, M. Ester and Y. Tao, "Catching the best views of
//! skyline: a semantic approach based on decisive subspaces", VLDB 2005.
//!
//! The miner walks the attribute lattice downwards from the full attribute
//! set, removing one attribute per step. Whenever a skyline point drops out of
//! the subspace skyline, the subspace one level up (the parent) is recorded as
//! decisive for it. Each point keeps only the minimal recorded subspaces.
//!
//! Subspace skylines use [`strictly_dominates`]: a point leaves the skyline of a
//! subspace only when another skyline point is strictly larger on every one of
//! its attributes. That relation is monotone (a point in the skyline of a
//! subspace is in the skyline of every superspace), so the candidate set
//! reaching a subspace does not depend on the removal order and visited
//! subspaces can be skipped without changing the result.

use std::collections::{BTreeMap, HashMap, HashSet};

use log::{debug, info, warn};
use serde::Serialize;

use super::dominance::strictly_dominates;
use super::skyline::non_dominated;
use super::subspace::{MAX_ATTRIBUTES, Subspace};

// ---------------------------------------------------------------------------
// DecisiveSubspaceMap – the accumulator
// ---------------------------------------------------------------------------

/// Unique key → minimal decisive subspaces of that point. No subspace in an
/// entry is a subset of another subspace in the same entry. Entries are kept
/// in canonical order (fewest attributes first).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecisiveSubspaceMap {
    entries: BTreeMap<String, Vec<Subspace>>,
}

/// Decisive subspaces of one point laid out as rows for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayRows {
    /// One row per decisive subspace, smallest first.
    pub rows: Vec<Subspace>,
    /// For every attribute position, the rows whose subspace contains it.
    pub attribute_rows: Vec<Vec<usize>>,
}

impl DecisiveSubspaceMap {
    /// Record `subspace` for `key` unless an already recorded subspace is
    /// contained in it. Recorded supersets of `subspace` are dropped.
    /// Returns whether the subspace was inserted.
    pub fn insert_minimal(&mut self, key: &str, subspace: Subspace) -> bool {
        let set = self.entries.entry(key.to_string()).or_default();
        if set.iter().any(|s| s.is_subset_of(subspace)) {
            return false;
        }
        set.retain(|s| !subspace.is_subset_of(*s));
        let at = set
            .binary_search_by(|s| s.canonical_cmp(&subspace))
            .unwrap_or_else(|i| i);
        set.insert(at, subspace);
        true
    }

    /// Decisive subspaces of a point; empty when none were found.
    pub fn get(&self, key: &str) -> &[Subspace] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Subspace])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of points with at least one decisive subspace.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest number of decisive subspaces held by any point.
    pub fn max_rows(&self) -> usize {
        self.entries.values().map(Vec::len).max().unwrap_or(0)
    }

    pub fn display_rows(&self, key: &str, attribute_count: usize) -> DisplayRows {
        let rows = self.get(key).to_vec();
        let attribute_rows = (0..attribute_count)
            .map(|attr| {
                rows.iter()
                    .enumerate()
                    .filter(|(_, s)| s.contains(attr))
                    .map(|(row, _)| row)
                    .collect()
            })
            .collect();
        DisplayRows {
            rows,
            attribute_rows,
        }
    }
}

// ---------------------------------------------------------------------------
// SubspaceMiner
// ---------------------------------------------------------------------------

pub struct SubspaceMiner<'a> {
    points: &'a [Vec<f64>],
    keys: Vec<&'a str>,
    skyline: &'a [usize],
    attribute_count: usize,
    memoize: bool,
    expanded: HashSet<Subspace>,
    skyline_cache: HashMap<Subspace, Vec<usize>>,
    visits: usize,
    result: DecisiveSubspaceMap,
}

impl<'a> SubspaceMiner<'a> {
    /// `points` holds one row of attribute values per record, `keys` the
    /// unique key per record and `skyline` the global skyline (ascending
    /// record indices).
    pub fn new(
        points: &'a [Vec<f64>],
        keys: Vec<&'a str>,
        skyline: &'a [usize],
        attribute_count: usize,
    ) -> Self {
        SubspaceMiner {
            points,
            keys,
            skyline,
            attribute_count,
            memoize: true,
            expanded: HashSet::new(),
            skyline_cache: HashMap::new(),
            visits: 0,
            result: DecisiveSubspaceMap::default(),
        }
    }

    /// Skip re-expanding subspaces reached through a different removal order.
    pub fn memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    /// Number of lattice nodes evaluated by the last [`mine`](Self::mine).
    pub fn visits(&self) -> usize {
        self.visits
    }

    /// Walk the lattice and return the decisive subspaces of every skyline
    /// point. `max_attributes` bounds the walk; wider attribute sets yield an
    /// empty map.
    pub fn mine(mut self, max_attributes: usize) -> DecisiveSubspaceMap {
        if self.attribute_count == 0 || self.skyline.is_empty() {
            return DecisiveSubspaceMap::default();
        }
        let limit = max_attributes.min(MAX_ATTRIBUTES);
        if self.attribute_count > limit {
            warn!(
                "Skipping decisive subspaces: {} attributes exceed the limit of {limit}.",
                self.attribute_count
            );
            return DecisiveSubspaceMap::default();
        }

        info!("Determining decisive subspaces...");
        let full = Subspace::full(self.attribute_count);
        let skyline = self.skyline;
        self.descend(skyline, full, full);
        debug!(
            "Visited {} subspaces, {} skyline points have decisive subspaces.",
            self.visits,
            self.result.len()
        );
        info!("Determined decisive subspaces.");
        self.result
    }

    /// Skyline of `subspace` among the global skyline points.
    fn subspace_skyline(&mut self, subspace: Subspace) -> Vec<usize> {
        if let Some(cached) = self.skyline_cache.get(&subspace) {
            return cached.clone();
        }
        let computed = non_dominated(
            self.points,
            self.skyline,
            self.skyline,
            |a, b| strictly_dominates(a, b, subspace),
            false,
        );
        if self.memoize {
            self.skyline_cache.insert(subspace, computed.clone());
        }
        computed
    }

    fn descend(&mut self, candidates: &[usize], subspace: Subspace, parent: Subspace) {
        self.visits += 1;

        // Candidates are ascending record indices, and so is the skyline.
        let subspace_skyline: Vec<usize> = self
            .subspace_skyline(subspace)
            .into_iter()
            .filter(|r| candidates.binary_search(r).is_ok())
            .collect();

        if subspace_skyline.len() != candidates.len() {
            for &r in candidates {
                if subspace_skyline.binary_search(&r).is_err() {
                    let key = self.keys[r];
                    self.result.insert_minimal(key, parent);
                }
            }
        }

        if subspace.is_empty() {
            return;
        }
        if self.memoize && !self.expanded.insert(subspace) {
            return;
        }
        for attr in subspace.attributes() {
            self.descend(&subspace_skyline, subspace.without(attr), subspace);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::skyline::Skyline;

    fn mine(points: &[Vec<f64>], memoize: bool) -> DecisiveSubspaceMap {
        let keys: Vec<String> = (0..points.len()).map(|i| format!("p{i}")).collect();
        let d = points.first().map(Vec::len).unwrap_or(0);
        let sky = Skyline::compute(points, d, false);
        SubspaceMiner::new(points, keys.iter().map(String::as_str).collect(), &sky.skyline, d)
            .memoize(memoize)
            .mine(MAX_ATTRIBUTES)
    }

    fn s(attrs: &[usize]) -> Subspace {
        Subspace::from_attributes(attrs.iter().copied())
    }

    #[test]
    fn insert_keeps_only_minimal_subspaces() {
        let mut map = DecisiveSubspaceMap::default();
        assert!(map.insert_minimal("a", s(&[0, 1, 2])));
        assert!(map.insert_minimal("a", s(&[0, 1])));
        assert_eq!(map.get("a"), &[s(&[0, 1])]);
        // Superset of a recorded subspace.
        assert!(!map.insert_minimal("a", s(&[0, 1, 3])));
        // Same subspace again.
        assert!(!map.insert_minimal("a", s(&[0, 1])));
        assert!(map.insert_minimal("a", s(&[2])));
        assert_eq!(map.get("a"), &[s(&[2]), s(&[0, 1])]);
        assert!(map.get("b").is_empty());
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let subspaces = [s(&[0, 1]), s(&[1]), s(&[0, 2]), s(&[0, 1, 2]), s(&[2, 3])];
        let mut forward = DecisiveSubspaceMap::default();
        let mut backward = DecisiveSubspaceMap::default();
        for sub in subspaces {
            forward.insert_minimal("k", sub);
        }
        for sub in subspaces.iter().rev() {
            backward.insert_minimal("k", *sub);
        }
        assert_eq!(forward, backward);
        assert_eq!(forward.get("k"), &[s(&[1]), s(&[0, 2]), s(&[2, 3])]);
    }

    #[test]
    fn single_attribute_leaders() {
        // p0 is best on attribute 0, p1 on attribute 1.
        let points = vec![vec![9.0, 1.0], vec![1.0, 9.0], vec![5.0, 5.0]];
        let map = mine(&points, true);
        assert_eq!(map.get("p0"), &[s(&[0])]);
        assert_eq!(map.get("p1"), &[s(&[1])]);
        // p2 survives only while both attributes are looked at together.
        assert_eq!(map.get("p2"), &[s(&[0, 1])]);
    }

    #[test]
    fn memoization_preserves_the_result() {
        let points: Vec<Vec<f64>> = (0..25)
            .map(|i| {
                vec![
                    (i * 7 % 13) as f64,
                    (i * 5 % 11) as f64,
                    (i * 3 % 7) as f64,
                    (20 - i) as f64 % 9.0,
                ]
            })
            .collect();
        assert_eq!(mine(&points, true), mine(&points, false));
    }

    #[test]
    fn memoization_visits_fewer_nodes() {
        let points: Vec<Vec<f64>> = (0..6)
            .map(|i| vec![i as f64, (5 - i) as f64, (i % 3) as f64, (i % 2) as f64])
            .collect();
        let sky = Skyline::compute(&points, 4, false);
        let keys: Vec<String> = (0..points.len()).map(|i| i.to_string()).collect();
        let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();

        let mut memo = SubspaceMiner::new(&points, key_refs.clone(), &sky.skyline, 4);
        memo.descend(&sky.skyline, Subspace::full(4), Subspace::full(4));
        let mut plain =
            SubspaceMiner::new(&points, key_refs, &sky.skyline, 4).memoize(false);
        plain.descend(&sky.skyline, Subspace::full(4), Subspace::full(4));
        assert!(memo.visits() < plain.visits());
        assert_eq!(memo.result, plain.result);
    }

    #[test]
    fn no_attributes_or_too_many() {
        let points = vec![vec![], vec![]];
        let keys = vec!["a", "b"];
        let skyline = vec![0, 1];
        assert!(SubspaceMiner::new(&points, keys, &skyline, 0).mine(MAX_ATTRIBUTES).is_empty());

        let points = vec![vec![1.0, 2.0, 3.0], vec![3.0, 2.0, 1.0]];
        let skyline = vec![0, 1];
        assert!(SubspaceMiner::new(&points, vec!["a", "b"], &skyline, 3).mine(2).is_empty());
    }

    #[test]
    fn display_rows_group_attributes() {
        let mut map = DecisiveSubspaceMap::default();
        map.insert_minimal("a", s(&[0, 2]));
        map.insert_minimal("a", s(&[1]));
        map.insert_minimal("b", s(&[0]));
        let rows = map.display_rows("a", 3);
        assert_eq!(rows.rows, vec![s(&[1]), s(&[0, 2])]);
        assert_eq!(rows.attribute_rows, vec![vec![1], vec![0], vec![1]]);
        assert_eq!(map.max_rows(), 2);
    }
}
