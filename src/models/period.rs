//! Ranking time windows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CollageError;

/// Time window Last.fm uses to compute a top list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Period {
    /// Last seven days.
    #[default]
    #[serde(rename = "7day")]
    Week,
    /// Last month.
    #[serde(rename = "1month")]
    Month,
    /// Last three months.
    #[serde(rename = "3month")]
    Quarter,
    /// Last six months.
    #[serde(rename = "6month")]
    HalfYear,
    /// Last twelve months.
    #[serde(rename = "12month")]
    Year,
    /// All time.
    #[serde(rename = "overall")]
    Overall,
}

impl Period {
    /// Value of the `period` request parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Week => "7day",
            Period::Month => "1month",
            Period::Quarter => "3month",
            Period::HalfYear => "6month",
            Period::Year => "12month",
            Period::Overall => "overall",
        }
    }

    /// All periods, shortest first.
    pub fn all() -> &'static [Period] {
        &[
            Period::Week,
            Period::Month,
            Period::Quarter,
            Period::HalfYear,
            Period::Year,
            Period::Overall,
        ]
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = CollageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::all()
            .iter()
            .copied()
            .find(|p| p.as_str() == s.trim())
            .ok_or_else(|| {
                let options: Vec<&str> = Period::all().iter().map(Period::as_str).collect();
                CollageError::InvalidConfiguration(format!(
                    "Invalid period: {}. Options are: {}",
                    s,
                    options.join(", ")
                ))
            })
    }
}
