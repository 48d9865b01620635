use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BreweryError;

/// Brewery categories recognised by the directory's `by_type` filter.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BreweryType {
    Micro,
    Nano,
    Regional,
    Brewpub,
    Planning,
    Contract,
    Proprietor,
    Closed,
}

impl BreweryType {
    pub const ALL: [BreweryType; 8] = [
        BreweryType::Micro,
        BreweryType::Nano,
        BreweryType::Regional,
        BreweryType::Brewpub,
        BreweryType::Planning,
        BreweryType::Contract,
        BreweryType::Proprietor,
        BreweryType::Closed,
    ];

    /// The wire value, e.g. `"micro"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            BreweryType::Micro => "micro",
            BreweryType::Nano => "nano",
            BreweryType::Regional => "regional",
            BreweryType::Brewpub => "brewpub",
            BreweryType::Planning => "planning",
            BreweryType::Contract => "contract",
            BreweryType::Proprietor => "proprietor",
            BreweryType::Closed => "closed",
        }
    }
}

impl fmt::Display for BreweryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Matching is case-sensitive: `"Micro"` is rejected.
impl FromStr for BreweryType {
    type Err = BreweryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BreweryType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = BreweryType::ALL.iter().map(|t| t.as_str()).collect();
                BreweryError::invalid(
                    "type",
                    format!("'{}'. Must be one of {}", s, allowed.join(", ")),
                )
            })
    }
}

/// Result ordering for a search.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = BreweryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(BreweryError::invalid(
                "sort_order",
                format!("'{}'. Must be 'asc' or 'desc'", s),
            )),
        }
    }
}
