use log::debug;
use rayon::prelude::*;
use serde::Serialize;

use super::scoring::ascending;
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Per-attribute statistics
// ---------------------------------------------------------------------------

/// Population standard deviation of the present values; 0 for fewer than one
/// value.
pub fn standard_deviation(values: impl IntoIterator<Item = f64> + Clone) -> f64 {
    let (sum, count) = values
        .clone()
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        return 0.0;
    }
    let mean = sum / count as f64;
    let variance = values
        .into_iter()
        .map(|v| (v - mean).powi(2))
        .sum::<f64>()
        / count as f64;
    variance.sqrt()
}

// ---------------------------------------------------------------------------
// DivergenceTable
// ---------------------------------------------------------------------------

/// Normalized signed deviation between every pair of records, plus the
/// per-attribute orderings the profiles are read in.
///
/// `deviation(r, c)` is `Σ_a (value(c, a) − value(r, a)) / σ_a` over all
/// numeric attributes `a`. An attribute whose σ is zero contributes nothing,
/// and neither does an attribute missing on either record.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DivergenceTable {
    sigma: Vec<f64>,
    len: usize,
    /// Row-major `len × len`: `deviations[r * len + c]`.
    deviations: Vec<f64>,
    /// Per attribute: record indices ascending by that attribute.
    orders: Vec<Vec<usize>>,
    /// Per attribute: position of each record in `orders[attr]`.
    positions: Vec<Vec<usize>>,
}

impl DivergenceTable {
    pub fn compute(dataset: &Dataset, parallel: bool) -> Self {
        let attrs = dataset.attributes();
        let n = dataset.len();
        let d = attrs.len();

        let values: Vec<Vec<Option<f64>>> = dataset
            .records
            .iter()
            .map(|rec| (0..d).map(|a| rec.numeric(attrs.column(a))).collect())
            .collect();

        let sigma: Vec<f64> = (0..d)
            .map(|a| standard_deviation(values.iter().filter_map(move |row| row[a])))
            .collect();

        let row_for = |r: usize| -> Vec<f64> {
            (0..n)
                .map(|c| {
                    (0..d)
                        .map(|a| match (values[r][a], values[c][a]) {
                            (Some(vr), Some(vc)) if sigma[a] > 0.0 => (vc - vr) / sigma[a],
                            _ => 0.0,
                        })
                        .sum()
                })
                .collect()
        };
        let deviations: Vec<f64> = if parallel {
            (0..n).into_par_iter().flat_map_iter(row_for).collect()
        } else {
            (0..n).flat_map(row_for).collect()
        };

        let mut orders = Vec::with_capacity(d);
        let mut positions = Vec::with_capacity(d);
        for a in 0..d {
            let mut order: Vec<usize> = (0..n).collect();
            order.sort_by(|&x, &y| {
                ascending(dataset.attribute_value(x, a), dataset.attribute_value(y, a))
            });
            let mut position = vec![0; n];
            for (i, &r) in order.iter().enumerate() {
                position[r] = i;
            }
            orders.push(order);
            positions.push(position);
        }

        debug!("Calculated diverging data.");
        DivergenceTable {
            sigma,
            len: n,
            deviations,
            orders,
            positions,
        }
    }

    /// Standard deviation of an attribute over the whole dataset.
    pub fn sigma(&self, attr: usize) -> f64 {
        self.sigma[attr]
    }

    /// Deviation of `comparator` as seen from `reference`.
    pub fn deviation(&self, reference: usize, comparator: usize) -> f64 {
        self.deviations[reference * self.len + comparator]
    }

    /// Records in ascending order of `attr`; ties keep dataset order.
    pub fn order(&self, attr: usize) -> &[usize] {
        &self.orders[attr]
    }

    /// Profile of `reference` read in the order of attribute `attr`.
    pub fn profile(&self, attr: usize, reference: usize) -> DivergenceProfile<'_> {
        DivergenceProfile {
            attribute: attr,
            reference,
            reference_position: self.positions[attr][reference],
            order: &self.orders[attr],
            row: &self.deviations[reference * self.len..(reference + 1) * self.len],
        }
    }
}

// ---------------------------------------------------------------------------
// DivergenceProfile – one reference record, one ordering attribute
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DivergenceEntry {
    /// Comparator record index.
    pub record: usize,
    /// Rank of the comparator in the attribute order.
    pub position: usize,
    pub deviation: f64,
}

/// Deviation of every record from a reference record, ordered by one
/// attribute. The reference itself is included with deviation 0.
#[derive(Debug, Clone, Copy)]
pub struct DivergenceProfile<'a> {
    pub attribute: usize,
    pub reference: usize,
    /// Where the reference sits in the order.
    pub reference_position: usize,
    order: &'a [usize],
    row: &'a [f64],
}

impl<'a> DivergenceProfile<'a> {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn entry(&self, position: usize) -> DivergenceEntry {
        let record = self.order[position];
        DivergenceEntry {
            record,
            position,
            deviation: self.row[record],
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = DivergenceEntry> + 'a {
        let (order, row) = (self.order, self.row);
        order
            .iter()
            .enumerate()
            .map(move |(position, &record)| DivergenceEntry {
                record,
                position,
                deviation: row[record],
            })
    }

    /// `(comparator key, deviation)` pairs in profile order.
    pub fn keyed<'d>(&self, dataset: &'d Dataset) -> Vec<(&'d str, f64)> {
        self.entries()
            .map(|e| (dataset.records[e.record].key.as_str(), e.deviation))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::dataset_from_csv_str;

    const EPS: f64 = 1e-9;

    #[test]
    fn population_standard_deviation() {
        assert!((standard_deviation([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]) - 2.0).abs() < EPS);
        assert_eq!(standard_deviation([3.0, 3.0]), 0.0);
        assert_eq!(standard_deviation(Vec::<f64>::new()), 0.0);
    }

    #[test]
    fn deviation_sums_over_all_attributes() {
        // a: values 0, 2 → σ 1; b: values 0, 4 → σ 2
        let ds = dataset_from_csv_str("id,a,b\nx,0,0\ny,2,4\n").unwrap();
        let table = DivergenceTable::compute(&ds, false);
        assert!((table.sigma(0) - 1.0).abs() < EPS);
        assert!((table.sigma(1) - 2.0).abs() < EPS);
        assert!((table.deviation(0, 1) - 4.0).abs() < EPS);
        assert!((table.deviation(1, 0) + 4.0).abs() < EPS);
        assert_eq!(table.deviation(0, 0), 0.0);
    }

    #[test]
    fn constant_and_missing_attributes_contribute_nothing() {
        let ds = dataset_from_csv_str("id,a,flat,gap\nx,0,5,1\ny,2,5,\nz,4,5,3\n").unwrap();
        let table = DivergenceTable::compute(&ds, true);
        assert_eq!(table.sigma(1), 0.0);
        // gap is missing on y: only `a` counts (σ_a = sqrt(8/3)).
        let sigma_a = (8.0f64 / 3.0).sqrt();
        assert!((table.deviation(0, 1) - 2.0 / sigma_a).abs() < EPS);
        // x → z: a and gap (σ_gap = 1).
        assert!((table.deviation(0, 2) - (4.0 / sigma_a + 2.0)).abs() < EPS);
    }

    #[test]
    fn profile_follows_attribute_order() {
        let ds = dataset_from_csv_str("id,a,b\nr0,3,1\nr1,1,3\nr2,2,2\nr3,1,0\n").unwrap();
        let table = DivergenceTable::compute(&ds, false);

        // Ascending by a, ties in dataset order: r1, r3, r2, r0.
        assert_eq!(table.order(0), &[1, 3, 2, 0]);
        let profile = table.profile(0, 2);
        assert_eq!(profile.len(), 4);
        assert_eq!(profile.reference_position, 2);
        assert_eq!(profile.entry(2).record, 2);
        assert_eq!(profile.entry(2).deviation, 0.0);

        let keys: Vec<&str> = profile.keyed(&ds).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["r1", "r3", "r2", "r0"]);
        for entry in profile.entries() {
            assert!((entry.deviation - table.deviation(2, entry.record)).abs() < EPS);
        }

        // Ordering by b changes only the order, not the values.
        let by_b = table.profile(1, 2);
        assert_eq!(table.order(1), &[3, 0, 2, 1]);
        assert_eq!(by_b.reference_position, 2);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let ds = dataset_from_csv_str("id,a,b\nr0,3,1\nr1,1,3\nr2,2,2\nr3,1,0\n").unwrap();
        let seq = DivergenceTable::compute(&ds, false);
        let par = DivergenceTable::compute(&ds, true);
        for r in 0..ds.len() {
            for c in 0..ds.len() {
                assert_eq!(seq.deviation(r, c), par.deviation(r, c));
            }
        }
    }
}
