//! A single student record and its validation rules.

use serde::Deserialize;

use crate::error::EntryDefect;

/// One student listed in a roster.
///
/// Fields are trimmed on construction. `birth` is kept exactly as written
/// (after trimming) because the remote service expects the same digits the
/// student registered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    school: String,
    name: String,
    birth: String,
}

impl RosterEntry {
    /// Build a validated entry.
    ///
    /// # Errors
    ///
    /// Returns an [`EntryDefect`] when a field is blank or the birth date is
    /// not 6 or 8 ASCII digits.
    ///
    /// # Examples
    ///
    /// ```
    /// use roster::{EntryDefect, RosterEntry};
    ///
    /// let entry = RosterEntry::new(" Test High School ", "Hong Gildong", "20050101")
    ///     .expect("valid entry");
    /// assert_eq!(entry.school(), "Test High School");
    ///
    /// let err = RosterEntry::new("Test High School", "Hong Gildong", "2005-01-01")
    ///     .expect_err("dashes are rejected");
    /// assert_eq!(err, EntryDefect::MalformedBirth);
    /// ```
    pub fn new(school: &str, name: &str, birth: &str) -> Result<Self, EntryDefect> {
        let school = school.trim();
        if school.is_empty() {
            return Err(EntryDefect::EmptySchool);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(EntryDefect::EmptyName);
        }
        let birth = birth.trim();
        if !is_valid_birth(birth) {
            return Err(EntryDefect::MalformedBirth);
        }

        Ok(Self {
            school: school.to_owned(),
            name: name.to_owned(),
            birth: birth.to_owned(),
        })
    }

    /// School name as searched for on the remote service.
    #[must_use]
    pub fn school(&self) -> &str {
        &self.school
    }

    /// Student name in plaintext.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Birth date digits in plaintext.
    #[must_use]
    pub fn birth(&self) -> &str {
        &self.birth
    }
}

fn is_valid_birth(birth: &str) -> bool {
    matches!(birth.len(), 6 | 8) && birth.bytes().all(|byte| byte.is_ascii_digit())
}

/// Wire shape of one roster entry before validation.
#[derive(Debug, Deserialize)]
pub(crate) struct RawRosterEntry {
    pub(crate) school: String,
    pub(crate) name: String,
    pub(crate) birth: String,
}

impl RawRosterEntry {
    pub(crate) fn validate(self) -> Result<RosterEntry, EntryDefect> {
        RosterEntry::new(&self.school, &self.name, &self.birth)
    }
}
