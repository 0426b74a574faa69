//! Skyline analysis of tabular data.
//!
//! Load a table, classify its columns, and derive for the Pareto-optimal
//! ("skyline") records why they are optimal (decisive subspaces), how much
//! they dominate, how they rank per attribute, and how every record deviates
//! from every other one.
//!
//! ```no_run
//! use std::path::Path;
//! use skyline_lens::{Analysis, load_file};
//!
//! let dataset = load_file(Path::new("pokemon.csv"))?;
//! let analysis = Analysis::run(&dataset);
//! for key in analysis.skyline_keys(&dataset) {
//!     println!("{key}: {:?}", analysis.decisive.get(key));
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod analysis;
pub mod data;
pub mod state;

pub use analysis::{Analysis, AnalysisOptions};
pub use data::loader::load_file;
pub use data::model::{Dataset, DatasetError, RawTable, Value};
pub use state::AnalysisState;
