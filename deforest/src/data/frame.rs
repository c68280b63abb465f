// BSD 3-Clause License
//
// Copyright (c) 2025, BlackPortal ○
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this
//    list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
//    this list of conditions and the following disclaimer in the documentation
//    and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived from
//    this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

use std::fmt;

use ndarray::Array2;

use crate::errors::FrameError;

/// Cell contents read as "not available".
const NA_MARKERS: [&str; 10] =
    ["NA", "N/A", "n/a", "#N/A", "<NA>", "NULL", "null", "None", "nan", "-nan"];

/// A single cell of a [`Frame`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Missing,
}

impl Value {
    /// Classifies a raw CSV field. Empty cells, NA markers and non-finite
    /// numbers such as `NaN` or `inf` are missing, finite numbers are numbers,
    /// everything else is text.
    pub fn parse(field: &str) -> Self {
        let trimmed = field.trim();
        if trimmed.is_empty() || NA_MARKERS.contains(&trimmed) {
            return Value::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(number) if number.is_finite() => Value::Number(number),
            Ok(_) => Value::Missing,
            Err(_) => Value::Text(trimmed.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
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
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
            Value::Missing => Ok(()),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

/// Strips surrounding whitespace and double quotes from a column name, so
/// `"Protected Area (1=Yes,0=No)"` and `Protected Area (1=Yes,0=No)` name the
/// same column.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().trim_matches('"').trim().to_string()
}

/// A row-major table with ordered, unique column names.
///
/// Every row remembers its 1-based position at the time it was pushed, so
/// filtered or shuffled frames still report errors against the source rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    origins: Vec<usize>,
}

impl Frame {
    pub fn new<I, S>(columns: I) -> Result<Self, FrameError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = Vec::new();
        for column in columns {
            let name = normalize_column_name(column.as_ref());
            if names.contains(&name) {
                return Err(FrameError::DuplicateColumn(name));
            }
            names.push(name);
        }
        Ok(Frame { columns: names, rows: Vec::new(), origins: Vec::new() })
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), FrameError> {
        if row.len() != self.columns.len() {
            return Err(FrameError::RowLength { expected: self.columns.len(), actual: row.len() });
        }
        self.rows.push(row);
        self.origins.push(self.origins.len() + 1);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// The 1-based source row of row `i`.
    pub fn row_number(&self, i: usize) -> usize {
        self.origins.get(i).copied().unwrap_or(i + 1)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Iterates over the values of one column.
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &Value> + '_, FrameError> {
        let idx = self.index_or_err(name)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Removes the named columns. Names that are not present are ignored.
    pub fn drop_columns(&mut self, names: &[&str]) {
        let keep: Vec<bool> = self.columns.iter().map(|c| !names.contains(&c.as_str())).collect();
        if keep.iter().all(|&k| k) {
            return;
        }
        self.columns = retain_mask(std::mem::take(&mut self.columns), &keep);
        for row in self.rows.iter_mut() {
            *row = retain_mask(std::mem::take(row), &keep);
        }
    }

    /// Returns a new frame holding only the rows whose value in `column`
    /// satisfies `predicate`.
    pub fn filter_rows<F>(&self, column: &str, predicate: F) -> Result<Frame, FrameError>
    where
        F: Fn(&Value) -> bool,
    {
        let idx = self.index_or_err(column)?;
        let (rows, origins): (Vec<Vec<Value>>, Vec<usize>) = self
            .rows
            .iter()
            .zip(&self.origins)
            .filter(|(row, _)| predicate(&row[idx]))
            .map(|(row, &origin)| (row.clone(), origin))
            .unzip();
        Ok(Frame { columns: self.columns.clone(), rows, origins })
    }

    /// Returns a new frame holding the rows at `indices`, in that order.
    pub fn take_rows(&self, indices: &[usize]) -> Frame {
        let (rows, origins): (Vec<Vec<Value>>, Vec<usize>) = indices
            .iter()
            .filter_map(|&i| Some((self.rows.get(i)?.clone(), self.row_number(i))))
            .unzip();
        Frame { columns: self.columns.clone(), rows, origins }
    }

    /// Removes `name` from the frame and returns its values.
    pub fn split_off_column(&mut self, name: &str) -> Result<Vec<Value>, FrameError> {
        let idx = self.index_or_err(name)?;
        self.columns.remove(idx);
        Ok(self.rows.iter_mut().map(|row| row.remove(idx)).collect())
    }

    /// Appends a column. `values` must hold one value per row.
    pub fn push_column(&mut self, name: &str, values: Vec<Value>) -> Result<(), FrameError> {
        let name = normalize_column_name(name);
        if self.columns.contains(&name) {
            return Err(FrameError::DuplicateColumn(name));
        }
        if values.len() != self.rows.len() {
            return Err(FrameError::RowLength { expected: self.rows.len(), actual: values.len() });
        }
        self.columns.push(name);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    /// Converts the whole frame into a feature matrix. Every cell must be a
    /// number; the error names the offending column and source row.
    pub fn to_matrix(&self) -> Result<Array2<f64>, FrameError> {
        let mut data = Vec::with_capacity(self.rows.len() * self.columns.len());
        for (i, row) in self.rows.iter().enumerate() {
            for (column, value) in self.columns.iter().zip(row) {
                data.push(numeric_cell(column, self.row_number(i), value)?);
            }
        }
        Ok(Array2::from_shape_vec((self.rows.len(), self.columns.len()), data)?)
    }

    fn index_or_err(&self, name: &str) -> Result<usize, FrameError> {
        self.column_index(name).ok_or_else(|| FrameError::UnknownColumn(name.to_string()))
    }
}

pub(crate) fn numeric_cell(column: &str, row: usize, value: &Value) -> Result<f64, FrameError> {
    match value {
        Value::Number(n) => Ok(*n),
        Value::Missing => Err(FrameError::MissingValue { column: column.to_string(), row }),
        Value::Text(s) => {
            Err(FrameError::NonNumeric { column: column.to_string(), row, value: s.clone() })
        }
    }
}

fn retain_mask<T>(items: Vec<T>, keep: &[bool]) -> Vec<T> {
    items.into_iter().zip(keep).filter_map(|(item, &k)| k.then_some(item)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample() -> Frame {
        let mut frame = Frame::new(["a", "b", "split"]).unwrap();
        frame.push_row(vec![1.0.into(), 2.0.into(), "train".into()]).unwrap();
        frame.push_row(vec![3.0.into(), 4.0.into(), "test".into()]).unwrap();
        frame.push_row(vec![5.0.into(), 6.0.into(), "train".into()]).unwrap();
        frame
    }

    #[test]
    fn value_parse_classifies_fields() {
        assert_eq!(Value::parse("1.5"), Value::Number(1.5));
        assert_eq!(Value::parse(" -2 "), Value::Number(-2.0));
        assert_eq!(Value::parse(""), Value::Missing);
        assert_eq!(Value::parse("Amazon"), Value::Text("Amazon".to_string()));
        assert_eq!(Value::parse("True"), Value::Text("True".to_string()));
    }

    #[test]
    fn value_parse_treats_na_and_non_finite_as_missing() {
        for field in ["NaN", "nan", "NA", "N/A", "null", "inf", "-inf", "infinity", "1e999"] {
            assert_eq!(Value::parse(field), Value::Missing, "{}", field);
        }
        assert_eq!(Value::parse("Nanga"), Value::Text("Nanga".to_string()));
    }

    #[test]
    fn column_names_are_normalized() {
        let frame = Frame::new(["\"Protected Area (1=Yes,0=No)\"", " Latitude "]).unwrap();
        assert_eq!(frame.columns(), &["Protected Area (1=Yes,0=No)", "Latitude"]);
    }

    #[test]
    fn duplicate_columns_rejected() {
        let result = Frame::new(["a", "\"a\""]);
        assert_eq!(result, Err(FrameError::DuplicateColumn("a".to_string())));
    }

    #[test]
    fn push_row_checks_length() {
        let mut frame = Frame::new(["a", "b"]).unwrap();
        let result = frame.push_row(vec![1.0.into()]);
        assert_eq!(result, Err(FrameError::RowLength { expected: 2, actual: 1 }));
    }

    #[test]
    fn drop_columns_ignores_unknown_names() {
        let mut frame = sample();
        frame.drop_columns(&["b", "not-there"]);
        assert_eq!(frame.columns(), &["a", "split"]);
        assert_eq!(frame.rows()[1], vec![Value::Number(3.0), Value::Text("test".to_string())]);
    }

    #[test]
    fn filter_rows_keeps_matching() {
        let frame = sample();
        let train = frame.filter_rows("split", |v| *v == Value::from("train")).unwrap();
        assert_eq!(train.n_rows(), 2);
        assert_eq!(train.rows()[1][0], Value::Number(5.0));
    }

    #[test]
    fn filter_rows_unknown_column() {
        let frame = sample();
        let result = frame.filter_rows("nope", |_| true);
        assert_eq!(result.unwrap_err(), FrameError::UnknownColumn("nope".to_string()));
    }

    #[test]
    fn split_off_column_returns_values() {
        let mut frame = sample();
        let split = frame.split_off_column("split").unwrap();
        assert_eq!(split.len(), 3);
        assert_eq!(frame.columns(), &["a", "b"]);
        assert_eq!(frame.to_matrix().unwrap(), array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
    }

    #[test]
    fn to_matrix_reports_text_cell() {
        let frame = sample();
        let result = frame.to_matrix();
        assert_eq!(
            result.unwrap_err(),
            FrameError::NonNumeric { column: "split".to_string(), row: 1, value: "train".to_string() }
        );
    }

    #[test]
    fn to_matrix_reports_missing_cell() {
        let mut frame = Frame::new(["x"]).unwrap();
        frame.push_row(vec![1.0.into()]).unwrap();
        frame.push_row(vec![Value::Missing]).unwrap();
        assert_eq!(
            frame.to_matrix().unwrap_err(),
            FrameError::MissingValue { column: "x".to_string(), row: 2 }
        );
    }

    #[test]
    fn take_rows_selects_in_order() {
        let frame = sample();
        let picked = frame.take_rows(&[2, 0]);
        assert_eq!(picked.rows()[0][0], Value::Number(5.0));
        assert_eq!(picked.rows()[1][0], Value::Number(1.0));
    }

    #[test]
    fn errors_after_filter_report_source_row() {
        let mut frame = sample();
        frame.push_row(vec![Value::Missing, 8.0.into(), "train".into()]).unwrap();
        let mut train = frame.filter_rows("split", |v| *v == Value::from("train")).unwrap();
        train.drop_columns(&["split"]);

        assert_eq!(train.row_number(2), 4);
        assert_eq!(
            train.to_matrix().unwrap_err(),
            FrameError::MissingValue { column: "a".to_string(), row: 4 }
        );
    }

    #[test]
    fn take_rows_keeps_source_rows() {
        let picked = sample().take_rows(&[2, 0]);
        assert_eq!(picked.row_number(0), 3);
        assert_eq!(picked.row_number(1), 1);
        assert_eq!(picked.take_rows(&[0]).row_number(0), 3);
    }
}
