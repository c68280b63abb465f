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

use std::collections::BTreeSet;

use ndarray::Array2;

use crate::data::frame::{Frame, Value, numeric_cell};
use crate::errors::FrameError;

/// One-hot encodes the named categorical columns.
///
/// Each categorical column is removed and, in the order given, replaced by one
/// `{column}_{category}` indicator column per distinct non-missing category,
/// appended after the remaining columns. Categories are sorted
/// lexicographically. A missing cell produces zeros in every indicator. With
/// `drop_first`, the first sorted category of each column gets no indicator.
pub fn one_hot_encode(
    frame: &Frame,
    columns: &[&str],
    drop_first: bool,
) -> Result<Frame, FrameError> {
    if let Some(unknown) = columns.iter().find(|c| !frame.has_column(c)) {
        return Err(FrameError::UnknownColumn(unknown.to_string()));
    }

    let mut encoded = frame.clone();
    let mut categorical = Vec::with_capacity(columns.len());
    for &column in columns {
        categorical.push((column, encoded.split_off_column(column)?));
    }

    for (column, values) in categorical {
        let categories: BTreeSet<String> =
            values.iter().filter(|v| !v.is_missing()).map(Value::to_string).collect();
        let skip = usize::from(drop_first);
        for category in categories.iter().skip(skip) {
            let indicator = values
                .iter()
                .map(|v| {
                    let hit = !v.is_missing() && v.to_string() == *category;
                    Value::Number(if hit { 1.0 } else { 0.0 })
                })
                .collect();
            encoded.push_column(&format!("{}_{}", column, category), indicator)?;
        }
    }
    Ok(encoded)
}

/// The result of reindexing a frame onto a fixed column layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// Feature matrix with exactly one column per model column, in order.
    pub matrix: Array2<f64>,
    /// Model columns that were absent from the input and filled with zeros.
    pub zero_filled: Vec<String>,
    /// Input columns that the layout does not know and were discarded.
    pub discarded: Vec<String>,
}

/// Reindexes `frame` to exactly `model_columns`: absent columns are filled
/// with 0, extra columns are discarded, and every kept cell must be numeric.
pub fn align(frame: &Frame, model_columns: &[String]) -> Result<Alignment, FrameError> {
    let n_rows = frame.n_rows();
    let mut matrix = Array2::zeros((n_rows, model_columns.len()));
    let mut zero_filled = Vec::new();

    for (j, column) in model_columns.iter().enumerate() {
        match frame.column_index(column) {
            Some(idx) => {
                for (i, row) in frame.rows().iter().enumerate() {
                    matrix[[i, j]] = numeric_cell(column, frame.row_number(i), &row[idx])?;
                }
            }
            None => zero_filled.push(column.clone()),
        }
    }

    let discarded =
        frame.columns().iter().filter(|c| !model_columns.contains(c)).cloned().collect();

    Ok(Alignment { matrix, zero_filled, discarded })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn regions() -> Frame {
        let mut frame = Frame::new(["x", "Region", "Country"]).unwrap();
        frame.push_row(vec![1.0.into(), "SE Asia".into(), "Malaysia".into()]).unwrap();
        frame.push_row(vec![2.0.into(), "Amazon".into(), "Brazil".into()]).unwrap();
        frame.push_row(vec![3.0.into(), "Congo Basin".into(), Value::Missing]).unwrap();
        frame
    }

    #[test]
    fn one_hot_appends_sorted_indicators() {
        let encoded = one_hot_encode(&regions(), &["Region", "Country"], false).unwrap();
        assert_eq!(
            encoded.columns(),
            &[
                "x",
                "Region_Amazon",
                "Region_Congo Basin",
                "Region_SE Asia",
                "Country_Brazil",
                "Country_Malaysia"
            ]
        );
        assert_eq!(
            encoded.to_matrix().unwrap(),
            array![
                [1.0, 0.0, 0.0, 1.0, 0.0, 1.0],
                [2.0, 1.0, 0.0, 0.0, 1.0, 0.0],
                [3.0, 0.0, 1.0, 0.0, 0.0, 0.0]
            ]
        );
    }

    #[test]
    fn one_hot_drop_first_omits_baseline() {
        let encoded = one_hot_encode(&regions(), &["Region", "Country"], true).unwrap();
        assert_eq!(
            encoded.columns(),
            &["x", "Region_Congo Basin", "Region_SE Asia", "Country_Malaysia"]
        );
    }

    #[test]
    fn one_hot_unknown_column() {
        let result = one_hot_encode(&regions(), &["Biome"], false);
        assert_eq!(result.unwrap_err(), FrameError::UnknownColumn("Biome".to_string()));
    }

    #[test]
    fn align_zero_fills_and_discards() {
        let encoded = one_hot_encode(&regions(), &["Region", "Country"], false).unwrap();
        let model_columns: Vec<String> =
            ["Region_SE Asia", "x", "Country_Peru"].iter().map(|s| s.to_string()).collect();

        let alignment = align(&encoded, &model_columns).unwrap();

        assert_eq!(alignment.matrix, array![[1.0, 1.0, 0.0], [0.0, 2.0, 0.0], [0.0, 3.0, 0.0]]);
        assert_eq!(alignment.zero_filled, vec!["Country_Peru".to_string()]);
        assert_eq!(
            alignment.discarded,
            vec!["Region_Amazon", "Region_Congo Basin", "Country_Brazil", "Country_Malaysia"]
        );
    }

    #[test]
    fn align_rejects_text_in_model_column() {
        let model_columns = vec!["Region".to_string()];
        let result = align(&regions(), &model_columns);
        assert_eq!(
            result.unwrap_err(),
            FrameError::NonNumeric {
                column: "Region".to_string(),
                row: 1,
                value: "SE Asia".to_string()
            }
        );
    }

    #[test]
    fn training_and_inference_encodings_agree_after_alignment() {
        let train = one_hot_encode(&regions(), &["Region"], true).unwrap();
        let model_columns: Vec<String> =
            train.columns().iter().filter(|c| *c != "Country").cloned().collect();

        let mut query = Frame::new(["x", "Region"]).unwrap();
        query.push_row(vec![5.0.into(), "Amazon".into()]).unwrap();
        let query = one_hot_encode(&query, &["Region"], false).unwrap();
        let alignment = align(&query, &model_columns).unwrap();

        assert_eq!(alignment.matrix, array![[5.0, 0.0, 0.0]]);
        assert_eq!(alignment.discarded, vec!["Region_Amazon".to_string()]);
    }
}
