//! Maps client IPv4 addresses to consortium members.

use std::{fmt::Display, net::Ipv4Addr, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::college::College;

pub const DEFAULT_CAMPUS_TOKEN: &str = "default";

/// Network blocks registered to each member, in precedence order.
pub const CONSORTIUM_BLOCKS: &[(&str, College)] = &[
    ("148.85.0.0/16", College::Amherst),
    ("192.80.64.0/24", College::Amherst),
    ("131.229.0.0/16", College::Smith),
    ("192.80.65.0/24", College::Smith),
    ("138.110.0.0/16", College::MtHolyoke),
    ("192.80.66.0/24", College::MtHolyoke),
    ("192.33.12.0/24", College::Hampshire),
    ("192.33.13.0/24", College::Hampshire),
    ("192.33.14.0/23", College::Hampshire),
    ("192.80.67.0/24", College::Hampshire),
    ("128.119.0.0/16", College::Umass),
    ("72.19.64.0/18", College::Umass),
    ("192.80.83.0/24", College::Umass),
    ("192.80.84.0/22", College::Umass),
];


#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CampusError {
    #[error("invalid IPv4 address: {0:?}")]
    InvalidAddress(String),
    #[error("invalid CIDR block: {0:?}")]
    InvalidCidr(String),
}


/// The campus a visitor is shown: a member college, or the neutral default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Campus {
    Member(College),
    #[default]
    Default,
}

impl Campus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Campus::Member(college) => college.as_str(),
            Campus::Default => DEFAULT_CAMPUS_TOKEN,
        }
    }

    pub fn college(&self) -> Option<College> {
        match self {
            Campus::Member(college) => Some(*college),
            Campus::Default => None,
        }
    }
}

impl From<Option<College>> for Campus {
    fn from(value: Option<College>) -> Self {
        value.map(Campus::Member).unwrap_or(Campus::Default)
    }
}

impl From<String> for Campus {
    fn from(value: String) -> Self {
        value.parse::<College>().ok().into()
    }
}

impl From<Campus> for String {
    fn from(value: Campus) -> Self {
        value.as_str().to_string()
    }
}

impl Display for Campus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}


/// A `{cidr, college}` entry as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CidrEntry {
    pub cidr: String,
    pub college: College,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampusRange {
    pub start: u32,
    pub end: u32,
    pub college: College,
}

impl CampusRange {
    /// Parses `a.b.c.d/n` into the inclusive address range it covers.
    pub fn parse(cidr: &str, college: College) -> Result<Self, CampusError> {
        let invalid = || CampusError::InvalidCidr(cidr.to_string());
        let (base, prefix_len) = cidr.trim().split_once('/').ok_or_else(invalid)?;
        let start = ip_to_int(base).map_err(|_| invalid())?;
        let prefix_len: u32 = prefix_len.parse().map_err(|_| invalid())?;
        if prefix_len > 32 {
            return Err(invalid());
        }
        let block_size = 1_u64 << (32 - prefix_len);
        let end = u32::try_from(u64::from(start) + block_size - 1).map_err(|_| invalid())?;
        Ok(Self { start, end, college })
    }

    pub fn contains(&self, ip: u32) -> bool {
        self.start <= ip && ip <= self.end
    }
}


/// Big-endian integer form of a dotted-quad address.
pub fn ip_to_int(ip: &str) -> Result<u32, CampusError> {
    let addr = Ipv4Addr::from_str(ip.trim()).map_err(|_| CampusError::InvalidAddress(ip.to_string()))?;
    Ok(u32::from(addr))
}


/// Immutable lookup table from address ranges to colleges.
///
/// Ranges keep their declaration order and the first containing range
/// wins, so an earlier, narrower block can carve an exception out of a
/// later, wider one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampusMap {
    ranges: Vec<CampusRange>,
}

impl CampusMap {
    pub fn from_entries(entries: &[CidrEntry]) -> Result<Self, CampusError> {
        let ranges = entries
            .iter()
            .map(|entry| CampusRange::parse(&entry.cidr, entry.college))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { ranges })
    }

    /// The built-in consortium table.
    pub fn consortium() -> Self {
        let ranges = CONSORTIUM_BLOCKS
            .iter()
            .filter_map(|(cidr, college)| match CampusRange::parse(cidr, *college) {
                Ok(range) => Some(range),
                Err(e) => {
                    tracing::error!("skipping built-in campus block: {e}");
                    None
                }
            })
            .collect();
        Self { ranges }
    }

    pub fn ranges(&self) -> &[CampusRange] {
        &self.ranges
    }

    pub fn resolve(&self, ip: u32) -> Option<College> {
        self.ranges.iter().find(|range| range.contains(ip)).map(|range| range.college)
    }

    /// Campus for a dotted-quad address. Unparsable addresses and addresses
    /// outside every block give [`Campus::Default`].
    pub fn resolve_college(&self, ip: &str) -> Campus {
        match ip_to_int(ip) {
            Ok(ip_int) => self.resolve(ip_int).into(),
            Err(e) => {
                tracing::debug!("cannot resolve campus: {e}");
                Campus::Default
            }
        }
    }
}

impl Default for CampusMap {
    fn default() -> Self {
        Self::consortium()
    }
}
