//! Student-facing value types that flow through one self-check.
//!
//! Everything here is created per roster record and dropped after the survey
//! is submitted; nothing is cached between students.

use std::fmt;

use roster::{RejectedEntry, RosterEntry, RosterRecord};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::Region;

/// Plaintext identity of one student as listed in the roster.
#[derive(Clone, PartialEq, Eq)]
pub struct StudentIdentity {
    /// School name to search for.
    pub school: String,
    /// Student name.
    pub name: String,
    /// Birth date digits (`YYMMDD` or `YYYYMMDD`).
    pub birth: String,
}

impl StudentIdentity {
    /// Build an identity from raw strings.
    pub fn new(
        school: impl Into<String>,
        name: impl Into<String>,
        birth: impl Into<String>,
    ) -> Self {
        Self {
            school: school.into(),
            name: name.into(),
            birth: birth.into(),
        }
    }
}

impl fmt::Debug for StudentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudentIdentity")
            .field("school", &self.school)
            .field("name", &self.name)
            .field("birth", &"<redacted>")
            .finish()
    }
}

impl From<RosterEntry> for StudentIdentity {
    fn from(entry: RosterEntry) -> Self {
        Self::new(entry.school(), entry.name(), entry.birth())
    }
}

/// A roster record that cannot be checked, kept so its failure is logged in
/// place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct InvalidRecord {
    /// Name the failure line is written under.
    pub label: String,
    /// Why the record was rejected.
    pub reason: String,
}

impl InvalidRecord {
    /// Describe a rejected record.
    pub fn new(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            reason: reason.into(),
        }
    }
}

impl From<RejectedEntry> for InvalidRecord {
    fn from(rejected: RejectedEntry) -> Self {
        Self::new(rejected.label(), rejected.to_string())
    }
}

/// One position of a batch: a student to check or a record to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchRecord {
    /// A valid student.
    Student(StudentIdentity),
    /// A record rejected while loading the roster.
    Invalid(InvalidRecord),
}

impl From<StudentIdentity> for BatchRecord {
    fn from(student: StudentIdentity) -> Self {
        Self::Student(student)
    }
}

impl From<RosterRecord> for BatchRecord {
    fn from(record: RosterRecord) -> Self {
        match record {
            Ok(entry) => Self::Student(entry.into()),
            Err(rejected) => Self::Invalid(rejected.into()),
        }
    }
}

/// Remote identifier of a school, obtained from the school search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrganizationCode(String);

impl OrganizationCode {
    /// Wrap a code returned by the remote service.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrganizationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Base64 ciphertext of an identity field, ready to be sent as-is.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedField(String);

impl EncryptedField {
    /// Wrap base64 ciphertext produced by an identity encoder.
    pub fn new(ciphertext: impl Into<String>) -> Self {
        Self(ciphertext.into())
    }

    /// Borrow the base64 text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the base64 text.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for EncryptedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptedField({} chars)", self.0.len())
    }
}

/// Opaque bearer credential sent in the `Authorization` header.
///
/// The value is wiped from memory on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a token returned by the remote service.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw token for a request header or payload.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Result of a successful negotiation: everything the survey submission needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentSession {
    organization_name: Option<String>,
    user_name_token: String,
    token: SessionToken,
    region: Region,
    birth: String,
}

impl StudentSession {
    /// Assemble a session from the negotiation results.
    pub fn new(
        organization_name: Option<String>,
        user_name_token: impl Into<String>,
        token: SessionToken,
        region: Region,
        birth: impl Into<String>,
    ) -> Self {
        Self {
            organization_name,
            user_name_token: user_name_token.into(),
            token,
            region,
            birth: birth.into(),
        }
    }

    /// School display name reported by the identity lookup, when present.
    pub fn organization_name(&self) -> Option<&str> {
        self.organization_name.as_deref()
    }

    /// Student name as the server wants it echoed back (already encrypted).
    pub fn user_name_token(&self) -> &str {
        &self.user_name_token
    }

    /// Final bearer token.
    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    /// Region whose API host issued the token.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Plaintext birth string, kept for record-keeping only.
    pub fn birth(&self) -> &str {
        &self.birth
    }
}
