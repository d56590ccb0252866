// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for parsing and byte writing
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the face-list parser and the binary writer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Model is empty: no vertices and no faces")]
    EmptyModel,

    #[error("Numeric writes require a binary representation")]
    NotBinary,
}

impl Error {
    /// Build a parse error for a 1-based line number
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}
