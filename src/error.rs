// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use thiserror::Error;

/// The error type.
///
/// These errors are returned directly to the caller. Problems found while
/// reading the usage text or the command line are not errors in this sense:
/// they are recorded as [Diagnostic] values and parsing carries on.
#[derive(Error, Debug)]
pub enum Error {
    //------------------------------
    // Incorrect API usage errors (programmer error)
    //------------------------------
    /// The alias (short option character or long option name) was never
    /// defined by the usage text.
    #[error("unknown option: {0}")]
    UnknownAlias(String),

    //------------------------------
    // Value conversion errors
    //------------------------------
    /// The option was not specified, so there is nothing to convert.
    #[error("null value")]
    NullValue,

    /// The stored text cannot be interpreted as the requested type.
    #[error("invalid conversion of {value:?} to {type_name}")]
    InvalidConversion {
        /// Text that failed to convert.
        value: String,
        /// Name of the requested type.
        type_name: &'static str,
    },

    //------------------------------
    // Reporting
    //------------------------------
    /// Writing a report failed.
    #[error("failed to write report")]
    Io(#[from] std::io::Error),
}

/// Convenience type that allows a function to be defined as returning a
/// [Result], but which only requires the success type to be specified,
/// defaulting the error type to this crates `Error` type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A non-fatal problem found while building the option table or while
/// dispatching the command line.
///
/// Diagnostics accumulate: finding one never stops the remaining usage lines
/// or command-line arguments from being processed. The [Display] form of each
/// value is the message shown to the user.
///
/// [Display]: std::fmt::Display
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum Diagnostic {
    //------------------------------
    // Usage text errors
    //------------------------------
    /// A usage line starting with `-` could not be understood.
    #[error("invalid option at line: {index}\n{line}")]
    InvalidLine {
        /// Zero-based line number.
        index: usize,
        /// The offending line.
        line: String,
    },

    /// A short option character was already defined on an earlier line
    /// (either as a short option or as a long option name).
    #[error("duplicate short option: {0}")]
    DuplicateShort(char),

    /// A long option name was already defined on an earlier line
    /// (either as a long option or as a short option character).
    #[error("duplicate long option: {0}")]
    DuplicateLong(String),

    //------------------------------
    // Command line errors
    //------------------------------
    /// The command line specified an option that is not in the table.
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    /// An option that requires an argument was given none.
    #[error("Missing argument for: {0}")]
    MissingArgument(String),

    /// A long option that takes no argument was given one (`--name=value`).
    #[error("Unexpected argument for: {0}")]
    UnexpectedArgument(String),

    /// An abbreviated long option matches more than one long option.
    #[error("Ambiguous option: {0}")]
    AmbiguousOption(String),

    /// The scanner accepted a short option that the table has no identity
    /// for. Dispatch stops when this happens.
    #[error("unknown short option: {0}")]
    InconsistentShort(char),
}
