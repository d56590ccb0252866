// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the command line front end.

use std::path::PathBuf;
use thiserror::Error;

/// Usage and configuration errors.
#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Missing value for {0}")]
    MissingValue(String),

    #[error("Invalid value '{value}' for {option}: {reason}")]
    InvalidValue {
        option: String,
        value: String,
        reason: String,
    },

    #[error("Unknown output format '{0}' (expected stl or obj)")]
    UnknownFormat(String),

    #[error("No input file given")]
    MissingInput,

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("Output file '{}' already exists (use --force to overwrite)", .0.display())]
    OutputExists(PathBuf),
}
