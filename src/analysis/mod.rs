/// Analysis layer: skyline, decisive subspaces, scores and divergence.
///
/// Architecture:
/// ```text
///   Dataset (classified)
///        │
///        ▼
///   ┌──────────┐
///   │  skyline  │  Pareto partition → skyline / dominated
///   └──────────┘
///        │
///        ├──────────────┬────────────────┐
///        ▼              ▼                ▼
///   ┌──────────┐  ┌──────────┐   ┌────────────┐
///   │ decisive  │  │ scoring   │   │ divergence │
///   └──────────┘  └──────────┘   └────────────┘
/// ```
///
/// Every stage consumes the complete output of the one before it. A new
/// dataset means a new [`Analysis`]; nothing is updated in place.

pub mod decisive;
pub mod divergence;
pub mod dominance;
pub mod scoring;
pub mod skyline;
pub mod subspace;

use serde::Serialize;

use crate::data::model::Dataset;
use decisive::{DecisiveSubspaceMap, SubspaceMiner};
use divergence::DivergenceTable;
use scoring::{AttributeRange, DominationScores, RelativeRankings};
use skyline::Skyline;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Run the per-record dominance tests and the divergence matrix on the
    /// rayon thread pool.
    pub parallel: bool,
    /// Expand every subspace of the attribute lattice only once.
    pub memoize_subspaces: bool,
    /// Attribute sets wider than this get no decisive subspaces.
    pub max_mining_attributes: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            memoize_subspaces: true,
            max_mining_attributes: 24,
        }
    }
}

// ---------------------------------------------------------------------------
// Analysis – every derived structure of one dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct Analysis {
    pub skyline: Skyline,
    pub decisive: DecisiveSubspaceMap,
    pub scores: DominationScores,
    /// Per attribute, the value range among skyline points.
    pub ranges: Vec<AttributeRange>,
    pub rankings: RelativeRankings,
    pub divergence: DivergenceTable,
}

impl Analysis {
    pub fn run(dataset: &Dataset) -> Self {
        Self::run_with(dataset, &AnalysisOptions::default())
    }

    pub fn run_with(dataset: &Dataset, options: &AnalysisOptions) -> Self {
        let points = dataset.attribute_matrix();
        let d = dataset.attributes().len();

        let skyline = Skyline::compute(&points, d, options.parallel);

        let keys: Vec<&str> = dataset.records.iter().map(|r| r.key.as_str()).collect();
        let decisive = SubspaceMiner::new(&points, keys, &skyline.skyline, d)
            .memoize(options.memoize_subspaces)
            .mine(options.max_mining_attributes);

        let scores = DominationScores::compute(&points, d, &skyline, options.parallel);
        let ranges = AttributeRange::for_skyline(&points, d, &skyline);
        let rankings = RelativeRankings::compute(&points, d, &skyline);
        let divergence = DivergenceTable::compute(dataset, options.parallel);

        Analysis {
            skyline,
            decisive,
            scores,
            ranges,
            rankings,
            divergence,
        }
    }

    /// Keys of the skyline points, in skyline order.
    pub fn skyline_keys<'d>(&self, dataset: &'d Dataset) -> Vec<&'d str> {
        self.skyline
            .skyline
            .iter()
            .map(|&r| dataset.records[r].key.as_str())
            .collect()
    }

    /// Keys of the dominated records, in dataset order.
    pub fn dominated_keys<'d>(&self, dataset: &'d Dataset) -> Vec<&'d str> {
        self.skyline
            .dominated
            .iter()
            .map(|&r| dataset.records[r].key.as_str())
            .collect()
    }

    /// Domination score of a record, if it is a skyline point.
    pub fn domination_score(&self, record: usize) -> Option<usize> {
        self.skyline
            .position(record)
            .map(|pos| self.scores.scores[pos])
    }

    /// Relative ranking of a skyline record on a named attribute.
    pub fn relative_ranking(&self, dataset: &Dataset, record: usize, attribute: &str) -> Option<f64> {
        let pos = self.skyline.position(record)?;
        let attr = dataset.attributes().position(attribute)?;
        Some(self.rankings.get(pos, attr))
    }
}
