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

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info};

use crate::data::FrameLoader;
use crate::data::frame::{Frame, Value};
use crate::errors::{CsvError, FrameError};

/// Loads a CSV file whose first record is the header row.
pub struct CsvFrameLoader;

/// Parses headered CSV from any reader into a [`Frame`].
pub fn read_frame<R: Read>(reader: R) -> Result<Frame, CsvError> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(CsvError::EmptyFile);
    }
    let mut frame = Frame::new(headers.iter()).map_err(|e| match e {
        FrameError::DuplicateColumn(name) => CsvError::DuplicateColumn(name),
        other => CsvError::Frame(other),
    })?;

    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        if record.len() != frame.n_cols() {
            return Err(CsvError::InconsistentColumns {
                row: i + 1,
                actual: record.len(),
                expected: frame.n_cols(),
            });
        }
        frame.push_row(record.iter().map(Value::parse).collect())?;
    }

    if frame.n_rows() == 0 {
        return Err(CsvError::EmptyFile);
    }
    debug!("Parsed CSV with {} rows and {} columns", frame.n_rows(), frame.n_cols());
    Ok(frame)
}

/// Downloads a CSV dataset over HTTP(S) and parses it.
pub fn fetch_frame(url: &str) -> Result<Frame, CsvError> {
    info!("Downloading dataset from {}", url);
    let download = |source| CsvError::Download { url: url.to_string(), source };
    let response = reqwest::blocking::get(url).and_then(|r| r.error_for_status()).map_err(download)?;
    let body = response.bytes().map_err(download)?;
    debug!("Downloaded {} bytes", body.len());
    read_frame(body.as_ref())
}

impl FrameLoader for CsvFrameLoader {
    type Error = CsvError;

    fn load<P: AsRef<Path>>(path: P) -> Result<Frame, CsvError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let frame = read_frame(file)?;
        info!(
            "Loaded {} rows with {} columns from {}",
            frame.n_rows(),
            frame.n_cols(),
            path.display()
        );
        Ok(frame)
    }
}
