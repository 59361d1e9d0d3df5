use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::{Read, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Keyword '{keyword}' could not be found in containing columns: {available}")]
    ColumnNotFound { keyword: String, available: String },

    #[error("Row has {got} cells but the table has {expected} columns")]
    RowWidth { expected: usize, got: usize },

    #[error("Column '{column}' has {got} values but the table has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        got: usize,
    },

    #[error("Column '{0}' already exists")]
    DuplicateColumn(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Text(String),
    Float(f64),
    Int(i64),
    Null,
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    fn parse(field: &str) -> Self {
        if field.is_empty() {
            return Self::Null;
        }
        if let Ok(v) = field.parse::<i64>() {
            return Self::Int(v);
        }
        if let Ok(v) = field.parse::<f64>() {
            return Self::Float(v);
        }
        Self::Text(field.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Null => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

/// A small row-major table with named columns. Stands in for the dataset
/// and metadata frames consumed and produced by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl DataTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Finds the first column whose name contains the keyword,
    /// case-insensitive. Keeps the schema flexible across input files.
    pub fn find_column(&self, keyword: &str) -> Result<&str, TableError> {
        let needle = keyword.to_lowercase();
        self.columns
            .iter()
            .find(|c| c.to_lowercase().contains(&needle))
            .map(String::as_str)
            .ok_or_else(|| TableError::ColumnNotFound {
                keyword: needle,
                available: self.columns.join(", "),
            })
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// All values of a named column, in row order.
    pub fn column_values(&self, column: &str) -> Result<Vec<&Value>, TableError> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| TableError::ColumnNotFound {
                keyword: column.to_string(),
                available: self.columns.join(", "),
            })?;
        Ok(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Distinct textual values of a column, preserving first-seen order.
    pub fn distinct_text(&self, column: &str) -> Result<Vec<String>, TableError> {
        let mut seen = HashMap::new();
        let mut out = Vec::new();
        for value in self.column_values(column)? {
            let text = value.to_string();
            if seen.insert(text.clone(), ()).is_none() {
                out.push(text);
            }
        }
        Ok(out)
    }

    pub fn add_column(&mut self, name: &str, values: Vec<Value>) -> Result<(), TableError> {
        if self.has_column(name) {
            return Err(TableError::DuplicateColumn(name.to_string()));
        }
        if values.len() != self.rows.len() {
            return Err(TableError::LengthMismatch {
                column: name.to_string(),
                expected: self.rows.len(),
                got: values.len(),
            });
        }
        self.columns.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    /// Keeps only the rows for which the predicate holds.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        Self {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|r| predicate(r))
                .cloned()
                .collect(),
        }
    }

    /// Left join on a shared key column. Every left row is preserved;
    /// unmatched rows carry `Value::Null` in the right-hand columns. When
    /// the right table repeats a key, the first occurrence wins.
    pub fn left_join(&self, right: &Self, key: &str) -> Result<Self, TableError> {
        let left_key = self
            .column_index(key)
            .ok_or_else(|| TableError::ColumnNotFound {
                keyword: key.to_string(),
                available: self.columns.join(", "),
            })?;
        let right_key = right
            .column_index(key)
            .ok_or_else(|| TableError::ColumnNotFound {
                keyword: key.to_string(),
                available: right.columns.join(", "),
            })?;

        let mut lookup: HashMap<String, &Vec<Value>> = HashMap::new();
        for row in &right.rows {
            lookup.entry(row[right_key].to_string()).or_insert(row);
        }

        let extra: Vec<(usize, &String)> = right
            .columns
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != right_key)
            .collect();

        let mut columns = self.columns.clone();
        for (_, name) in &extra {
            columns.push((*name).clone());
        }

        let mut joined = Self::new(columns);
        for row in &self.rows {
            let mut out = row.clone();
            match lookup.get(&row[left_key].to_string()) {
                Some(matched) => {
                    for (i, _) in &extra {
                        out.push(matched[*i].clone());
                    }
                }
                None => out.extend(std::iter::repeat_n(Value::Null, extra.len())),
            }
            joined.rows.push(out);
        }
        Ok(joined)
    }

    /// Reads a table from CSV, inferring Int/Float/Text/Null per field.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let columns = rdr
            .headers()?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        let mut table = Self::new(columns);
        for record in rdr.records() {
            let record = record?;
            table.push_row(record.iter().map(Value::parse).collect())?;
        }
        Ok(table)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), TableError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(ToString::to_string))?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataTable {
        let mut t = DataTable::new(vec![
            "Sample".into(),
            "Peptide Sequence".into(),
            "Intensity".into(),
        ]);
        t.push_row(vec!["s1".into(), "PEPTIDE".into(), Value::Float(1200.0)])
            .unwrap();
        t.push_row(vec!["s2".into(), "PEPTIDE".into(), Value::Float(800.0)])
            .unwrap();
        t.push_row(vec!["s3".into(), "GRAVY".into(), Value::Null])
            .unwrap();
        t
    }

    #[test]
    fn find_column_is_keyword_based_and_case_insensitive() {
        let t = sample();
        assert_eq!(t.find_column("sequence").unwrap(), "Peptide Sequence");
        assert_eq!(t.find_column("INTENSITY").unwrap(), "Intensity");
    }

    #[test]
    fn find_column_error_names_available_columns() {
        let t = sample();
        let err = t.find_column("charge").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("charge"));
        assert!(msg.contains("Peptide Sequence"));
    }

    #[test]
    fn distinct_text_preserves_first_seen_order() {
        let t = sample();
        assert_eq!(
            t.distinct_text("Peptide Sequence").unwrap(),
            vec!["PEPTIDE".to_string(), "GRAVY".to_string()]
        );
    }

    #[test]
    fn left_join_preserves_unmatched_rows_with_nulls() {
        let left = sample();
        let mut meta = DataTable::new(vec!["Sample".into(), "Group".into()]);
        meta.push_row(vec!["s1".into(), "CTR".into()]).unwrap();
        meta.push_row(vec!["s2".into(), "T1D".into()]).unwrap();

        let joined = left.left_join(&meta, "Sample").unwrap();
        assert_eq!(joined.n_rows(), 3);
        assert_eq!(joined.cell(0, "Group"), Some(&Value::Text("CTR".into())));
        assert_eq!(joined.cell(2, "Group"), Some(&Value::Null));
    }

    #[test]
    fn add_column_rejects_length_mismatch_and_duplicates() {
        let mut t = sample();
        assert!(matches!(
            t.add_column("Extra", vec![Value::Int(1)]),
            Err(TableError::LengthMismatch { .. })
        ));
        assert!(matches!(
            t.add_column("Intensity", vec![Value::Null, Value::Null, Value::Null]),
            Err(TableError::DuplicateColumn(_))
        ));
    }

    #[test]
    fn csv_round_trip_infers_cell_types() {
        let csv_data = "Sequence,Intensity,Note\nPEPTIDE,1200.5,first\nSEQ,42,\n";
        let t = DataTable::from_csv(csv_data.as_bytes()).unwrap();
        assert_eq!(t.cell(0, "Intensity"), Some(&Value::Float(1200.5)));
        assert_eq!(t.cell(1, "Intensity"), Some(&Value::Int(42)));
        assert_eq!(t.cell(1, "Note"), Some(&Value::Null));

        let mut buf = Vec::new();
        t.write_csv(&mut buf).unwrap();
        let round = DataTable::from_csv(buf.as_slice()).unwrap();
        assert_eq!(t, round);
    }
}
