use super::model::{ColumnKind, Dataset, Value, parse_numeric};

// ---------------------------------------------------------------------------
// Filter predicate parsed from a query string
// ---------------------------------------------------------------------------

/// A record filter typed by the user.
///
/// * `column=value` – cell text equals `value` (case-insensitive)
/// * `column>n` / `column<n` – numeric comparison
/// * anything else – substring of a nominal cell (case-insensitive)
///
/// Column names always compare case-insensitively.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordFilter {
    Equals { column: String, value: String },
    Greater { column: String, bound: String },
    Less { column: String, bound: String },
    Contains(String),
}

impl RecordFilter {
    /// Parse a query. An operator only counts when it is not the first
    /// character; `=` wins over `>`, which wins over `<`.
    pub fn parse(text: &str) -> Self {
        let op = ['=', '>', '<']
            .into_iter()
            .find(|op| text.find(*op).is_some_and(|pos| pos > 0));

        let Some(op) = op else {
            return RecordFilter::Contains(text.trim().to_lowercase());
        };
        let (lhs, rhs) = text.split_once(op).unwrap_or((text, ""));
        let column = lhs.trim().to_lowercase();
        let operand = rhs.trim().to_lowercase();
        match op {
            '=' => RecordFilter::Equals {
                column,
                value: operand,
            },
            '>' => RecordFilter::Greater {
                column,
                bound: operand,
            },
            _ => RecordFilter::Less {
                column,
                bound: operand,
            },
        }
    }

    /// Whether a single cell passes the filter.
    pub fn matches_cell(&self, column: &str, kind: ColumnKind, value: &Value) -> bool {
        let text = value.to_string().to_lowercase();
        match self {
            RecordFilter::Equals { column: c, value: v } => {
                column.to_lowercase() == *c && text == *v
            }
            RecordFilter::Greater { column: c, bound } => {
                column.to_lowercase() == *c && compare(&text, bound, |a, b| a > b)
            }
            RecordFilter::Less { column: c, bound } => {
                column.to_lowercase() == *c && compare(&text, bound, |a, b| a < b)
            }
            RecordFilter::Contains(needle) => {
                kind != ColumnKind::Numeric && !value.is_missing() && text.contains(needle.as_str())
            }
        }
    }

    /// A record matches when any of its cells matches.
    pub fn matches(&self, dataset: &Dataset, record: usize) -> bool {
        dataset.records[record]
            .cells
            .iter()
            .enumerate()
            .any(|(col, value)| self.matches_cell(&dataset.columns[col], dataset.kinds[col], value))
    }
}

fn compare(cell: &str, bound: &str, op: impl Fn(f64, f64) -> bool) -> bool {
    match (parse_numeric(cell), parse_numeric(bound)) {
        (Some(a), Some(b)) => op(a, b),
        _ => false,
    }
}

/// Return indices of records that pass the filter.
pub fn filtered_indices(dataset: &Dataset, filter: &RecordFilter) -> Vec<usize> {
    (0..dataset.len())
        .filter(|&r| filter.matches(dataset, r))
        .collect()
}

/// Records to highlight for a filter: nothing when the filter matches either
/// every record or none of them.
pub fn highlight_indices(dataset: &Dataset, filter: &RecordFilter) -> Vec<usize> {
    let hits = filtered_indices(dataset, filter);
    if hits.len() == dataset.len() {
        return Vec::new();
    }
    hits
}
