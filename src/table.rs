/// In-memory tabular datasets
///
/// A `Table` is an ordered list of uniquely named columns plus rows that are exactly as
/// wide as the column list. Every loader builds a fresh table and hands it back; nothing
/// here is shared or mutated after a load returns.
use chrono::NaiveDate;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Column not found: {0}")]
    MissingColumn(String),

    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("Expected {expected} columns, found {found}")]
    WidthMismatch { expected: usize, found: usize },
}

/// A single typed cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Integer view: ints, integral floats and digit-only text
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            Value::Text(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Empty => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Date(d) => d.serialize(serializer),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given column names
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Result<Self, TableError> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        check_unique(&columns)?;
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Vec<Value>>,
    ) -> Result<Self, TableError> {
        let mut table = Self::new(columns)?;
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::WidthMismatch {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Result<usize, TableError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &Value> + '_, TableError> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column).ok()?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Keep only the named columns, in the order given
    pub fn select(&self, names: &[&str]) -> Result<Table, TableError> {
        let indices = names
            .iter()
            .map(|name| self.column_index(name))
            .collect::<Result<Vec<_>, _>>()?;
        let columns: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        check_unique(&columns)?;

        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(Table { columns, rows })
    }

    /// Keep the first `n` columns
    pub fn select_first(&self, n: usize) -> Result<Table, TableError> {
        if n > self.columns.len() {
            return Err(TableError::WidthMismatch {
                expected: n,
                found: self.columns.len(),
            });
        }
        Ok(Table {
            columns: self.columns[..n].to_vec(),
            rows: self.rows.iter().map(|row| row[..n].to_vec()).collect(),
        })
    }

    pub fn drop_column(mut self, name: &str) -> Result<Table, TableError> {
        let idx = self.column_index(name)?;
        self.columns.remove(idx);
        for row in &mut self.rows {
            row.remove(idx);
        }
        Ok(self)
    }

    /// Rename columns by `(from, to)` pairs; names not present are ignored
    pub fn rename(&mut self, mapping: &[(&str, &str)]) -> Result<(), TableError> {
        let renamed: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                mapping
                    .iter()
                    .find(|(from, _)| from == c)
                    .map(|(_, to)| to.to_string())
                    .unwrap_or_else(|| c.clone())
            })
            .collect();
        check_unique(&renamed)?;
        self.columns = renamed;
        Ok(())
    }

    /// Replace every column name positionally
    pub fn set_columns(&mut self, names: &[&str]) -> Result<(), TableError> {
        if names.len() != self.columns.len() {
            return Err(TableError::WidthMismatch {
                expected: names.len(),
                found: self.columns.len(),
            });
        }
        let columns: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        check_unique(&columns)?;
        self.columns = columns;
        Ok(())
    }

    /// Keep rows whose `column` equals `target`
    pub fn filter_eq(mut self, column: &str, target: &Value) -> Result<Table, TableError> {
        let idx = self.column_index(column)?;
        self.rows.retain(|row| &row[idx] == target);
        Ok(self)
    }

    /// Stable sort by a key derived from each row
    pub fn sort_rows_by_key<K: Ord>(&mut self, mut key: impl FnMut(&[Value]) -> K) {
        self.rows.sort_by_key(|row| key(row));
    }

    pub fn reverse_rows(&mut self) {
        self.rows.reverse();
    }

    /// Drop the last `n` rows (all of them if fewer exist)
    pub fn drop_last_rows(&mut self, n: usize) {
        let keep = self.rows.len().saturating_sub(n);
        self.rows.truncate(keep);
    }

    /// Rewrite every cell of the column at `idx`; the closure gets the row index and the old value
    pub fn map_column<E>(
        &mut self,
        idx: usize,
        mut f: impl FnMut(usize, &Value) -> Result<Value, E>,
    ) -> Result<(), E> {
        for (row_idx, row) in self.rows.iter_mut().enumerate() {
            row[idx] = f(row_idx, &row[idx])?;
        }
        Ok(())
    }

    /// Stack tables vertically, aligning columns by name
    ///
    /// The result holds the union of all column names in first-seen order; cells a source
    /// table does not have are `Empty`.
    pub fn concat(tables: Vec<Table>) -> Table {
        let mut columns: Vec<String> = Vec::new();
        for table in &tables {
            for c in &table.columns {
                if !columns.contains(c) {
                    columns.push(c.clone());
                }
            }
        }

        let mut rows = Vec::new();
        for table in tables {
            let positions: Vec<usize> = table
                .columns
                .iter()
                .filter_map(|c| columns.iter().position(|x| x == c))
                .collect();
            for row in table.rows {
                let mut out = vec![Value::Empty; columns.len()];
                for (value, &pos) in row.into_iter().zip(&positions) {
                    out[pos] = value;
                }
                rows.push(out);
            }
        }

        Table { columns, rows }
    }

    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    pub fn tail(&self, n: usize) -> Table {
        let skip = self.rows.len().saturating_sub(n);
        Table {
            columns: self.columns.clone(),
            rows: self.rows[skip..].to_vec(),
        }
    }
}

fn check_unique(columns: &[String]) -> Result<(), TableError> {
    let mut seen = HashSet::new();
    for c in columns {
        if !seen.insert(c.as_str()) {
            return Err(TableError::DuplicateColumn(c.clone()));
        }
    }
    Ok(())
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(c.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:>w$}"))
            .collect();
        writeln!(f, "{}", header.join("  "))?;

        for row in &cells {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(v, &w)| format!("{v:>w$}"))
                .collect();
            writeln!(f, "{}", line.join("  "))?;
        }
        write!(f, "[{} rows x {} columns]", self.rows.len(), self.columns.len())
    }
}

/// Serializes as an array of `{column: value}` records
impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&Record {
                columns: &self.columns,
                values: row,
            })?;
        }
        seq.end()
    }
}

struct Record<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (c, v) in self.columns.iter().zip(self.values) {
            map.serialize_entry(c, v)?;
        }
        map.end()
    }
}
