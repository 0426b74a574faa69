use std::collections::HashMap;
use std::fmt;

use log::debug;
use serde::Serialize;
use thiserror::Error;

/// Value read for a missing cell in a numeric column. Every comparison
/// (dominance, ranking order, divergence order) sees it as the worst value.
pub const MISSING_NUMERIC: f64 = f64::NEG_INFINITY;

// ---------------------------------------------------------------------------
// Value – a single classified cell
// ---------------------------------------------------------------------------

/// A cell after column classification. The variant is decided once per column
/// and carried on every record from then on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Numeric(f64),
    Nominal(String),
    /// Empty or whitespace-only cell.
    Missing,
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Nominal(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Numeric(v) => write!(f, "{v}"),
            Value::Nominal(s) => write!(f, "{s}"),
            Value::Missing => Ok(()),
        }
    }
}

/// Parse a raw cell as a finite number. Surrounding whitespace is ignored;
/// empty cells, "NaN" and infinities are not numbers.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Column classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    /// The unique-key column (always the first one).
    Key,
    Numeric,
    Nominal,
}

/// Classify every column of a raw table.
///
/// Column 0 is the unique key regardless of its content. Any other column is
/// numeric iff it has at least one non-empty value and *every* non-empty value
/// parses as a number: a single non-numeric cell demotes the whole column to
/// nominal.
pub fn classify_columns(columns: &[String], rows: &[Vec<String>]) -> Vec<ColumnKind> {
    columns
        .iter()
        .enumerate()
        .map(|(col, _)| {
            if col == 0 {
                return ColumnKind::Key;
            }
            let mut seen_value = false;
            for row in rows {
                let raw = row.get(col).map(String::as_str).unwrap_or("");
                if raw.trim().is_empty() {
                    continue;
                }
                if parse_numeric(raw).is_none() {
                    return ColumnKind::Nominal;
                }
                seen_value = true;
            }
            if seen_value {
                ColumnKind::Numeric
            } else {
                ColumnKind::Nominal
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// AttributeSet – the ordered numeric columns
// ---------------------------------------------------------------------------

/// The numeric columns of a dataset, in schema order. Attribute positions
/// (0..len) are what subspaces and the analysis engines index by.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttributeSet {
    names: Vec<String>,
    columns: Vec<usize>,
}

impl AttributeSet {
    pub fn from_kinds(columns: &[String], kinds: &[ColumnKind]) -> Self {
        let mut set = AttributeSet::default();
        for (idx, (name, kind)) in columns.iter().zip(kinds).enumerate() {
            if *kind == ColumnKind::Numeric {
                set.names.push(name.clone());
                set.columns.push(idx);
            }
        }
        set
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn name(&self, attr: usize) -> &str {
        &self.names[attr]
    }

    /// Schema column index of an attribute.
    pub fn column(&self, attr: usize) -> usize {
        self.columns[attr]
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

// ---------------------------------------------------------------------------
// Errors raised while building a dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatasetError {
    #[error("table has no columns")]
    EmptyHeader,
    #[error("row {row}: missing value for the unique-key column")]
    MissingKey { row: usize },
    #[error("row {row}: duplicate key '{key}' (first seen in row {first_row})")]
    DuplicateKey {
        key: String,
        first_row: usize,
        row: usize,
    },
    #[error("row {row}: expected {expected} cells, found {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

// ---------------------------------------------------------------------------
// RawTable – header plus string rows, as read by the loader
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        RawTable {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Record {
    /// Value of the unique-key column.
    pub key: String,
    /// One cell per column, in schema order (the key cell included).
    pub cells: Vec<Value>,
}

impl Record {
    pub fn get(&self, column: usize) -> Option<&Value> {
        self.cells.get(column)
    }

    pub fn numeric(&self, column: usize) -> Option<f64> {
        self.cells.get(column).and_then(Value::as_f64)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete classified table
// ---------------------------------------------------------------------------

/// A classified dataset. Built once per load and never mutated by the
/// analysis; every derived structure indexes records by position.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub kinds: Vec<ColumnKind>,
    pub records: Vec<Record>,
    attributes: AttributeSet,
    #[serde(skip)]
    key_index: HashMap<String, usize>,
}

impl Dataset {
    /// Classify the columns of `table` and build the records.
    ///
    /// Rejects tables without columns, rows whose cell count differs from the
    /// header, and rows with an empty or duplicate unique key.
    pub fn from_table(table: RawTable) -> Result<Self, DatasetError> {
        let RawTable { columns, rows } = table;
        if columns.is_empty() {
            return Err(DatasetError::EmptyHeader);
        }

        let mut key_index: HashMap<String, usize> = HashMap::with_capacity(rows.len());
        for (row_no, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(DatasetError::RaggedRow {
                    row: row_no,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
            let key = &row[0];
            if key.trim().is_empty() {
                return Err(DatasetError::MissingKey { row: row_no });
            }
            if let Some(&first_row) = key_index.get(key) {
                return Err(DatasetError::DuplicateKey {
                    key: key.clone(),
                    first_row,
                    row: row_no,
                });
            }
            key_index.insert(key.clone(), row_no);
        }

        let kinds = classify_columns(&columns, &rows);
        let attributes = AttributeSet::from_kinds(&columns, &kinds);
        debug!(
            "Numeric attributes: {:?}; nominal columns: {:?}",
            attributes.names(),
            columns
                .iter()
                .zip(&kinds)
                .filter(|(_, k)| **k == ColumnKind::Nominal)
                .map(|(c, _)| c.as_str())
                .collect::<Vec<_>>()
        );

        let records = rows
            .into_iter()
            .map(|row| {
                let key = row[0].clone();
                let cells = row
                    .into_iter()
                    .zip(&kinds)
                    .map(|(raw, kind)| match kind {
                        ColumnKind::Key => Value::Nominal(raw),
                        ColumnKind::Numeric => {
                            parse_numeric(&raw).map(Value::Numeric).unwrap_or(Value::Missing)
                        }
                        ColumnKind::Nominal if raw.trim().is_empty() => Value::Missing,
                        ColumnKind::Nominal => Value::Nominal(raw),
                    })
                    .collect();
                Record { key, cells }
            })
            .collect();

        Ok(Dataset {
            columns,
            kinds,
            records,
            attributes,
            key_index,
        })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    /// Name of the unique-key column.
    pub fn key_column(&self) -> &str {
        &self.columns[0]
    }

    pub fn index_of_key(&self, key: &str) -> Option<usize> {
        self.key_index.get(key).copied()
    }

    /// Value of attribute `attr` for record `record`, with missing cells read
    /// as [`MISSING_NUMERIC`].
    pub fn attribute_value(&self, record: usize, attr: usize) -> f64 {
        self.records[record]
            .numeric(self.attributes.column(attr))
            .unwrap_or(MISSING_NUMERIC)
    }

    /// Attribute values of every record, one row per record, missing cells
    /// replaced by [`MISSING_NUMERIC`].
    pub fn attribute_matrix(&self) -> Vec<Vec<f64>> {
        (0..self.len())
            .map(|r| {
                (0..self.attributes.len())
                    .map(|a| self.attribute_value(r, a))
                    .collect()
            })
            .collect()
    }

    /// Column used to name records for display: the key column when its first
    /// value is not a number, otherwise the second column.
    pub fn label_column(&self) -> usize {
        match self.records.first() {
            Some(first) if parse_numeric(&first.key).is_some() && self.columns.len() > 1 => 1,
            _ => 0,
        }
    }

    /// Display label of a record.
    pub fn label(&self, record: usize) -> String {
        self.records[record]
            .get(self.label_column())
            .map(|v| v.to_string())
            .unwrap_or_default()
    }
}
