use std::path::Path;

use log::warn;

use crate::analysis::{Analysis, AnalysisOptions};
use crate::data::filter::{RecordFilter, filtered_indices, highlight_indices};
use crate::data::loader::load_file;
use crate::data::model::Dataset;

/// At most this many skyline points can be compared side by side.
pub const MAX_SELECTED_POINTS: usize = 4;

// ---------------------------------------------------------------------------
// Analysis state
// ---------------------------------------------------------------------------

/// The loaded dataset with everything derived from it, independent of any
/// rendering.
pub struct AnalysisState {
    /// Loaded dataset (None until a dataset is set).
    pub dataset: Option<Dataset>,

    /// Derived structures of `dataset`; rebuilt wholesale on every load.
    pub analysis: Option<Analysis>,

    pub options: AnalysisOptions,

    /// Active record filter.
    pub filter: Option<RecordFilter>,

    /// Indices of records passing the current filter (cached).
    pub visible_indices: Vec<usize>,

    /// Records to highlight for the current filter.
    pub highlighted: Vec<usize>,

    /// Skyline positions selected for comparison, in selection order.
    pub selected: Vec<usize>,

    /// Status / error message for the user.
    pub status_message: Option<String>,
}

impl Default for AnalysisState {
    fn default() -> Self {
        Self {
            dataset: None,
            analysis: None,
            options: AnalysisOptions::default(),
            filter: None,
            visible_indices: Vec::new(),
            highlighted: Vec::new(),
            selected: Vec::new(),
            status_message: None,
        }
    }
}

impl AnalysisState {
    pub fn with_options(options: AnalysisOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Load a file and analyse it. On failure the previous dataset stays in
    /// place and the error is kept as the status message.
    pub fn load_path(&mut self, path: &Path) -> bool {
        match load_file(path) {
            Ok(dataset) => {
                self.set_dataset(dataset);
                true
            }
            Err(e) => {
                warn!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Failed to load {}: {e:#}", path.display()));
                false
            }
        }
    }

    /// Ingest a newly loaded dataset: discard every derived structure and
    /// recompute the full pipeline.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.analysis = Some(Analysis::run_with(&dataset, &self.options));
        self.filter = None;
        self.visible_indices = (0..dataset.len()).collect();
        self.highlighted.clear();
        self.selected.clear();

        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Apply a filter query; an empty query clears the filter.
    pub fn set_filter(&mut self, query: &str) {
        if query.trim().is_empty() {
            self.clear_filter();
            return;
        }
        self.filter = Some(RecordFilter::parse(query));
        self.refilter();
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
        self.refilter();
    }

    /// Recompute `visible_indices` and `highlighted` after a filter change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else { return };
        match &self.filter {
            Some(filter) => {
                self.visible_indices = filtered_indices(ds, filter);
                self.highlighted = highlight_indices(ds, filter);
            }
            None => {
                self.visible_indices = (0..ds.len()).collect();
                self.highlighted.clear();
            }
        }
    }

    /// Select or deselect a skyline point for comparison. Selecting beyond
    /// [`MAX_SELECTED_POINTS`] is ignored. Returns whether the point is
    /// selected afterwards.
    pub fn toggle_selection(&mut self, skyline_position: usize) -> bool {
        if let Some(i) = self.selected.iter().position(|&p| p == skyline_position) {
            self.selected.remove(i);
            return false;
        }
        let in_range = self
            .analysis
            .as_ref()
            .is_some_and(|a| skyline_position < a.skyline.len());
        if !in_range || self.selected.len() >= MAX_SELECTED_POINTS {
            return false;
        }
        self.selected.push(skyline_position);
        true
    }
}
