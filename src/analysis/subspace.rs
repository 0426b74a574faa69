use std::fmt;

use serde::Serialize;

use crate::data::model::AttributeSet;

/// Widest attribute set a [`Subspace`] can address.
pub const MAX_ATTRIBUTES: usize = 64;

// ---------------------------------------------------------------------------
// Subspace – a set of attribute positions
// ---------------------------------------------------------------------------

/// A subset of the numeric attributes, stored as a bitmask over attribute
/// positions. Two subspaces are equal iff they hold the same attributes,
/// whatever order they were built in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Subspace(u64);

impl Subspace {
    pub const EMPTY: Subspace = Subspace(0);

    /// All of the first `count` attributes.
    pub fn full(count: usize) -> Self {
        debug_assert!(count <= MAX_ATTRIBUTES);
        if count >= MAX_ATTRIBUTES {
            Subspace(u64::MAX)
        } else {
            Subspace((1u64 << count) - 1)
        }
    }

    pub fn from_attributes(attrs: impl IntoIterator<Item = usize>) -> Self {
        attrs
            .into_iter()
            .fold(Subspace::EMPTY, |s, a| Subspace(s.0 | (1u64 << a)))
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, attr: usize) -> bool {
        attr < MAX_ATTRIBUTES && self.0 & (1u64 << attr) != 0
    }

    /// This subspace with one attribute removed.
    pub fn without(self, attr: usize) -> Self {
        Subspace(self.0 & !(1u64 << attr))
    }

    /// `self ⊆ other` (equal subspaces included).
    pub fn is_subset_of(self, other: Subspace) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn is_superset_of(self, other: Subspace) -> bool {
        other.is_subset_of(self)
    }

    /// Attribute positions in ascending order.
    pub fn attributes(self) -> impl Iterator<Item = usize> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let attr = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(attr)
        })
    }

    pub fn names(self, attributes: &AttributeSet) -> Vec<String> {
        self.attributes()
            .map(|a| attributes.name(a).to_string())
            .collect()
    }

    /// Canonical ordering: fewer attributes first, then by bitmask.
    pub fn canonical_cmp(&self, other: &Subspace) -> std::cmp::Ordering {
        self.len().cmp(&other.len()).then(self.0.cmp(&other.0))
    }
}

impl fmt::Display for Subspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attrs: Vec<String> = self.attributes().map(|a| a.to_string()).collect();
        write!(f, "{{{}}}", attrs.join(","))
    }
}
