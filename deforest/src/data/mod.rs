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

pub mod csv;
pub mod frame;

pub use self::csv::{CsvFrameLoader, fetch_frame, read_frame};
pub use self::frame::{Frame, Value};

use std::fmt;
use std::path::{Path, PathBuf};

use crate::errors::CsvError;

/// A trait for loading tabular data from files into a [`Frame`].
///
/// Implementors read a file from a given path and return its rows with the
/// header names attached. The trait is generic over an associated error type,
/// allowing each implementation to define its own specific errors.
pub trait FrameLoader {
    /// Loads a file into a frame.
    fn load<P: AsRef<Path>>(path: P) -> Result<Frame, Self::Error>;

    /// The error type returned by the `load` method.
    type Error: std::error::Error + 'static;
}

/// Loads a frame from a file using a specified `FrameLoader` implementation.
pub fn load_frame<T: FrameLoader, P: AsRef<Path>>(path: P) -> Result<Frame, T::Error> {
    T::load(path)
}

/// Where a training dataset comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
}

impl DataSource {
    pub fn load(&self) -> Result<Frame, CsvError> {
        match self {
            DataSource::Path(path) => load_frame::<CsvFrameLoader, _>(path),
            DataSource::Url(url) => fetch_frame(url),
        }
    }
}

impl From<&str> for DataSource {
    fn from(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            DataSource::Url(s.to_string())
        } else {
            DataSource::Path(PathBuf::from(s))
        }
    }
}

impl From<PathBuf> for DataSource {
    fn from(path: PathBuf) -> Self {
        DataSource::Path(path)
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_source_detects_urls() {
        assert_eq!(
            DataSource::from("https://example.org/deforestation.csv"),
            DataSource::Url("https://example.org/deforestation.csv".to_string())
        );
        assert_eq!(
            DataSource::from("data/deforestation.csv"),
            DataSource::Path(PathBuf::from("data/deforestation.csv"))
        );
    }
}
