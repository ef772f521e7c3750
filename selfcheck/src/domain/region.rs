//! Provincial education offices served by HCS.
//!
//! Each region carries two identifiers: the numeric area code used by the
//! school search (`lctnScCode`) and the subdomain prefix of the region's own
//! API host (`<prefix>hcs.eduro.go.kr`). Both come from one match per variant
//! so the tables cannot drift apart.

use std::fmt;
use std::str::FromStr;

/// Static identifiers attached to a [`Region`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RegionInfo {
    name: &'static str,
    area_code: u8,
    subdomain: &'static str,
}

/// One of the 17 Korean metropolitan/provincial education offices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Seoul Metropolitan City.
    Seoul,
    /// Busan Metropolitan City.
    Busan,
    /// Daegu Metropolitan City.
    Daegu,
    /// Incheon Metropolitan City.
    Incheon,
    /// Gwangju Metropolitan City.
    Gwangju,
    /// Daejeon Metropolitan City.
    Daejeon,
    /// Ulsan Metropolitan City.
    Ulsan,
    /// Sejong Special Self-Governing City.
    Sejong,
    /// Gyeonggi Province.
    Gyeonggi,
    /// Gangwon Province.
    Gangwon,
    /// North Chungcheong Province.
    Chungbuk,
    /// South Chungcheong Province.
    Chungnam,
    /// North Jeolla Province.
    Jeonbuk,
    /// South Jeolla Province.
    Jeonnam,
    /// North Gyeongsang Province.
    Gyeongbuk,
    /// South Gyeongsang Province.
    Gyeongnam,
    /// Jeju Special Self-Governing Province.
    Jeju,
}

impl Region {
    /// Every region in index order (index 1 first).
    pub const ALL: [Self; 17] = [
        Self::Seoul,
        Self::Busan,
        Self::Daegu,
        Self::Incheon,
        Self::Gwangju,
        Self::Daejeon,
        Self::Ulsan,
        Self::Sejong,
        Self::Gyeonggi,
        Self::Gangwon,
        Self::Chungbuk,
        Self::Chungnam,
        Self::Jeonbuk,
        Self::Jeonnam,
        Self::Gyeongbuk,
        Self::Gyeongnam,
        Self::Jeju,
    ];

    const fn info(self) -> RegionInfo {
        let (name, area_code, subdomain) = match self {
            Self::Seoul => ("seoul", 1, "sen"),
            Self::Busan => ("busan", 2, "pen"),
            Self::Daegu => ("daegu", 3, "dge"),
            Self::Incheon => ("incheon", 4, "ice"),
            Self::Gwangju => ("gwangju", 5, "gen"),
            Self::Daejeon => ("daejeon", 6, "dje"),
            Self::Ulsan => ("ulsan", 7, "use"),
            Self::Sejong => ("sejong", 8, "sje"),
            Self::Gyeonggi => ("gyeonggi", 10, "goe"),
            Self::Gangwon => ("gangwon", 11, "kwe"),
            Self::Chungbuk => ("chungbuk", 12, "cbe"),
            Self::Chungnam => ("chungnam", 13, "cne"),
            Self::Jeonbuk => ("jeonbuk", 14, "jbe"),
            Self::Jeonnam => ("jeonnam", 15, "jne"),
            Self::Gyeongbuk => ("gyeongbuk", 16, "gbe"),
            Self::Gyeongnam => ("gyeongnam", 17, "gne"),
            Self::Jeju => ("jeju", 18, "jje"),
        };
        RegionInfo {
            name,
            area_code,
            subdomain,
        }
    }

    /// 1-based position of the region in [`Region::ALL`].
    pub const fn index(self) -> u8 {
        // Discriminants follow declaration order starting at zero.
        self as u8 + 1
    }

    /// Look a region up by its 1-based index.
    ///
    /// # Examples
    /// ```
    /// use selfcheck::domain::Region;
    ///
    /// assert_eq!(Region::from_index(15), Ok(Region::Gyeongbuk));
    /// assert!(Region::from_index(0).is_err());
    /// assert!(Region::from_index(18).is_err());
    /// ```
    pub fn from_index(index: u8) -> Result<Self, RegionParseError> {
        usize::from(index)
            .checked_sub(1)
            .and_then(|position| Self::ALL.get(position).copied())
            .ok_or_else(|| RegionParseError(index.to_string()))
    }

    /// Numeric area code sent as `lctnScCode` when searching schools.
    pub const fn area_code(self) -> u8 {
        self.info().area_code
    }

    /// Area code as the search endpoint expects it: two digits, zero-padded.
    ///
    /// # Examples
    /// ```
    /// use selfcheck::domain::Region;
    ///
    /// assert_eq!(Region::Seoul.area_code_param(), "01");
    /// assert_eq!(Region::Gyeonggi.area_code_param(), "10");
    /// ```
    pub fn area_code_param(self) -> String {
        format!("{:02}", self.area_code())
    }

    /// Subdomain prefix of the region's API host, e.g. `gbe`.
    pub const fn subdomain(self) -> &'static str {
        self.info().subdomain
    }

    /// Lower-case English name, also accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        self.info().name
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string or index does not name a region.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown region '{0}': expected a name such as 'seoul', a subdomain such as 'sen', or an index 1-17")]
pub struct RegionParseError(String);

impl FromStr for Region {
    type Err = RegionParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_ascii_lowercase();
        if let Ok(index) = wanted.parse::<u8>() {
            return Self::from_index(index).map_err(|_| RegionParseError(raw.to_owned()));
        }
        Self::ALL
            .into_iter()
            .find(|region| region.name() == wanted || region.subdomain() == wanted)
            .ok_or_else(|| RegionParseError(raw.to_owned()))
    }
}
