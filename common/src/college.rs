//! Consortium member identifiers.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};


/// One of the five consortium member institutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum College {
    Smith,
    Hampshire,
    MtHolyoke,
    Amherst,
    Umass,
}

impl College {
    pub const ALL: [College; 5] = [
        College::Smith,
        College::Hampshire,
        College::MtHolyoke,
        College::Amherst,
        College::Umass,
    ];

    /// Token used in URLs, JSON payloads and the campus table.
    pub fn as_str(&self) -> &'static str {
        match self {
            College::Smith => "smith",
            College::Hampshire => "hampshire",
            College::MtHolyoke => "mtholyoke",
            College::Amherst => "amherst",
            College::Umass => "umass",
        }
    }

    /// Two-letter code every department name of this college starts with.
    pub fn department_prefix(&self) -> &'static str {
        match self {
            College::Smith => "SC",
            College::Hampshire => "HC",
            College::MtHolyoke => "MH",
            College::Amherst => "AC",
            College::Umass => "UM",
        }
    }
}

impl Display for College {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown college: {0:?}")]
pub struct UnknownCollege(pub String);

impl FromStr for College {
    type Err = UnknownCollege;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        College::ALL
            .into_iter()
            .find(|college| college.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCollege(s.to_string()))
    }
}


/// (De)serializes an `Option<College>` as a plain token where `None` is `"all"`.
///
/// Anything that is not a member token reads back as `None`, so stale or
/// hand-edited URLs fall back to searching every college.
pub mod college_or_all {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::College;

    pub const ALL_TOKEN: &str = "all";

    pub fn serialize<S: Serializer>(value: &Option<College>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(college) => serializer.serialize_str(college.as_str()),
            None => serializer.serialize_str(ALL_TOKEN),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<College>, D::Error> {
        let token = Option::<String>::deserialize(deserializer)?;
        Ok(token.and_then(|t| t.parse().ok()))
    }
}
