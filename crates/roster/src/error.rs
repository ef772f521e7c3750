//! Error types for roster loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that make the whole roster unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// The roster file could not be read.
    #[error("failed to read roster file at '{}': {message}", path.display())]
    Io {
        /// Path to the roster file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The roster is not a JSON array.
    #[error("invalid roster JSON: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
    },
}

/// A roster record that failed validation.
///
/// The rest of the roster is unaffected; the record keeps its position so it
/// can be reported in file order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("roster entry {index} is invalid: {defect}")]
pub struct RejectedEntry {
    /// Zero-based position of the record in the file.
    pub index: usize,
    /// The record's `name`, when it had a string one.
    pub name: Option<String>,
    /// What is wrong with it.
    pub defect: EntryDefect,
}

impl RejectedEntry {
    /// Name to report the record under: its `name`, or its position.
    #[must_use]
    pub fn label(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => format!("entry #{}", self.index),
        }
    }
}

/// Validation failures for a single roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryDefect {
    /// The record is not an object with string `school`, `name` and `birth`.
    #[error("record must be an object with string school, name and birth: {message}")]
    Shape {
        /// Deserializer diagnostic.
        message: String,
    },
    /// `school` is blank.
    #[error("school must not be empty")]
    EmptySchool,
    /// `name` is blank.
    #[error("name must not be empty")]
    EmptyName,
    /// `birth` is not six or eight ASCII digits.
    #[error("birth must be 6 (YYMMDD) or 8 (YYYYMMDD) digits")]
    MalformedBirth,
}
