//! Student roster loading for the HCS self-check runner.
//!
//! A roster is a JSON array of `{ "school", "name", "birth" }` records. This
//! crate parses that file and validates each record on its own, so one bad
//! record is reported in place instead of discarding the whole list. It stays
//! independent of the runner's domain types.
//!
//! # Example
//!
//! ```
//! use roster::{EntryDefect, Roster};
//!
//! let json = r#"[
//!     {"school": "Test High School", "name": "Hong Gildong", "birth": "20050101"},
//!     {"school": "Test High School", "name": "Kim Cheolsu", "birth": "2005-02-02"}
//! ]"#;
//!
//! let roster = Roster::from_json(json).expect("valid roster");
//! assert_eq!(roster.len(), 2);
//! let valid: Vec<_> = roster.entries().map(|entry| entry.name()).collect();
//! assert_eq!(valid, ["Hong Gildong"]);
//! let rejected: Vec<_> = roster.rejected().collect();
//! assert_eq!(rejected[0].defect, EntryDefect::MalformedBirth);
//! ```

mod entry;
mod error;
mod list;

pub use entry::RosterEntry;
pub use error::{EntryDefect, RejectedEntry, RosterError};
pub use list::{Roster, RosterRecord};
