//! School course levels accepted by the HCS school search.

use std::fmt;
use std::str::FromStr;

/// Course level sent as `schulCrseScCode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EducationLevel {
    /// Kindergarten (`1`).
    Kindergarten,
    /// Elementary school (`2`).
    Elementary,
    /// Middle school (`3`).
    Middle,
    /// High school (`4`).
    High,
    /// Special-education school (`5`).
    Special,
}

impl EducationLevel {
    /// Every level in code order.
    pub const ALL: [Self; 5] = [
        Self::Kindergarten,
        Self::Elementary,
        Self::Middle,
        Self::High,
        Self::Special,
    ];

    /// Numeric code passed through to the search query unchanged.
    pub const fn code(self) -> u8 {
        match self {
            Self::Kindergarten => 1,
            Self::Elementary => 2,
            Self::Middle => 3,
            Self::High => 4,
            Self::Special => 5,
        }
    }

    /// Lower-case English name, also accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Kindergarten => "kindergarten",
            Self::Elementary => "elementary",
            Self::Middle => "middle",
            Self::High => "high",
            Self::Special => "special",
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string does not name an education level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown education level '{0}': expected kindergarten, elementary, middle, high, special or 1-5")]
pub struct EducationLevelParseError(String);

impl FromStr for EducationLevel {
    type Err = EducationLevelParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|level| level.name() == wanted || level.code().to_string() == wanted)
            .ok_or_else(|| EducationLevelParseError(raw.to_owned()))
    }
}
