use super::subspace::Subspace;

/// Record `a` dominates record `b` on every attribute: at least as large
/// everywhere and strictly larger somewhere. Identical records never dominate
/// each other. Not limited by the width of a [`Subspace`].
pub fn dominates_all(a: &[f64], b: &[f64]) -> bool {
    pareto(a.iter().zip(b).map(|(&x, &y)| (x, y)))
}

/// Record `a` dominates record `b` over `subspace`: at least as large on
/// every attribute and strictly larger on one. Identical records never
/// dominate each other, and nothing dominates on the empty subspace.
pub fn dominates(a: &[f64], b: &[f64], subspace: Subspace) -> bool {
    pareto(subspace.attributes().map(|attr| (a[attr], b[attr])))
}

fn pareto(pairs: impl Iterator<Item = (f64, f64)>) -> bool {
    let mut strictly_better = false;
    for (x, y) in pairs {
        if x < y {
            return false;
        }
        if x > y {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Record `a` is strictly larger than `b` on every attribute of `subspace`.
/// Vacuously true on the empty subspace.
pub fn strictly_dominates(a: &[f64], b: &[f64], subspace: Subspace) -> bool {
    subspace.attributes().all(|attr| a[attr] > b[attr])
}
