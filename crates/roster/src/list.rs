//! Roster parsing and file loading.

use std::path::Path;

use cap_std::{ambient_authority, fs::Dir};
use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::Value;

use crate::entry::{RawRosterEntry, RosterEntry};
use crate::error::{EntryDefect, RejectedEntry, RosterError};

/// One roster position: a validated student or the reason it was rejected.
pub type RosterRecord = Result<RosterEntry, RejectedEntry>;

/// An ordered list of roster records.
///
/// A bad record never hides the others: each position is validated on its
/// own and rejected records stay in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    records: Vec<RosterRecord>,
}

impl Roster {
    /// Parse a roster from its JSON text.
    ///
    /// An empty array yields an empty roster.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Parse`] when the text is not a JSON array.
    /// Problems with individual records are kept as [`RejectedEntry`] values.
    pub fn from_json(json: &str) -> Result<Self, RosterError> {
        let raw: Vec<Value> = serde_json::from_str(json).map_err(|error| RosterError::Parse {
            message: error.to_string(),
        })?;

        let records = raw
            .into_iter()
            .enumerate()
            .map(|(index, value)| parse_record(index, value))
            .collect();

        Ok(Self { records })
    }

    /// Read and parse a roster file.
    ///
    /// The file is opened through a capability handle on its parent
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Io`] when the file cannot be opened or read, and
    /// the [`Roster::from_json`] errors otherwise.
    pub fn load(path: &Path) -> Result<Self, RosterError> {
        let io_error = |message: String| RosterError::Io {
            path: path.to_path_buf(),
            message,
        };
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file_name = path
            .file_name()
            .ok_or_else(|| io_error("roster path must name a file".to_owned()))?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|error| io_error(format!("open parent directory: {error}")))?;
        let contents = directory
            .read_to_string(Path::new(file_name))
            .map_err(|error| io_error(error.to_string()))?;

        Self::from_json(&contents)
    }

    /// Every record in file (or shuffled) order.
    #[must_use]
    pub fn records(&self) -> &[RosterRecord] {
        &self.records
    }

    /// Consume the roster, yielding its records.
    #[must_use]
    pub fn into_records(self) -> Vec<RosterRecord> {
        self.records
    }

    /// Valid entries only.
    pub fn entries(&self) -> impl Iterator<Item = &RosterEntry> {
        self.records.iter().filter_map(|record| record.as_ref().ok())
    }

    /// Rejected records only.
    pub fn rejected(&self) -> impl Iterator<Item = &RejectedEntry> {
        self.records.iter().filter_map(|record| record.as_ref().err())
    }

    /// Number of records, valid or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the roster lists no records at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Randomise processing order so the same student is not always first.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.records.shuffle(rng);
    }
}

fn parse_record(index: usize, value: Value) -> RosterRecord {
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_owned);
    let reject = |defect| RejectedEntry {
        index,
        name: name.clone(),
        defect,
    };
    let raw: RawRosterEntry = serde_json::from_value(value).map_err(|error| {
        reject(EntryDefect::Shape {
            message: error.to_string(),
        })
    })?;
    raw.validate().map_err(reject)
}
