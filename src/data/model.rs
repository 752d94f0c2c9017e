use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the common dataframe dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Lenient numeric coercion: anything that cannot be read as a finite
    /// number becomes `None`.
    ///
    /// Numeric strings are parsed after trimming, booleans count as 1 / 0.
    pub fn to_number(&self) -> Option<f64> {
        let v = match self {
            CellValue::Integer(i) => *i as f64,
            CellValue::Float(v) => *v,
            CellValue::Bool(b) => f64::from(u8::from(*b)),
            CellValue::String(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Null => return None,
        };
        v.is_finite().then_some(v)
    }

    /// Whether the cell would keep a column numeric (ints, floats, nulls).
    pub fn is_numeric_or_null(&self) -> bool {
        matches!(
            self,
            CellValue::Integer(_) | CellValue::Float(_) | CellValue::Null
        )
    }

    /// Text used to identify an entity, `None` for missing cells.
    pub fn as_label(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Float(v) if v.is_nan() => None,
            CellValue::String(s) if s.trim().is_empty() => None,
            other => Some(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table: ordered column names and row-major cells.
///
/// Every row holds exactly one cell per column, in `column_names` order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    column_names: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    /// Build a dataset, padding short rows with `Null` and dropping surplus
    /// cells so every row matches the header.
    pub fn from_rows(column_names: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = column_names.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row
            })
            .collect();
        Dataset { column_names, rows }
    }

    /// Ordered list of column names, as they appear in the source file.
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Position of a column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// All rows, each aligned with [`Dataset::column_names`].
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Iterate the cells of one column. Yields nothing for unknown columns.
    pub fn column(&self, name: &str) -> impl Iterator<Item = &CellValue> + '_ {
        let idx = self.column_index(name);
        self.rows
            .iter()
            .filter_map(move |row| idx.map(|i| &row[i]))
    }

    /// Columns whose every cell is an integer, a float, or null, in table order.
    ///
    /// An empty table has no numeric columns.
    pub fn numeric_columns(&self) -> Vec<String> {
        if self.rows.is_empty() {
            return Vec::new();
        }
        self.column_names
            .iter()
            .enumerate()
            .filter(|(i, _)| self.rows.iter().all(|row| row[*i].is_numeric_or_null()))
            .map(|(_, name)| name.clone())
            .collect()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
