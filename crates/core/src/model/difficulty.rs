use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which questions a session draws from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifficultyFilter {
    #[default]
    All,
    Only(String),
}

impl DifficultyFilter {
    /// Label accepted (and displayed) for the unfiltered pool.
    pub const ALL_LABEL: &'static str = "ALL";

    /// Label used by older front-ends for the unfiltered pool.
    pub const LEGACY_ALL_LABEL: &'static str = "전체";

    #[must_use]
    pub fn only(tag: impl Into<String>) -> Self {
        Self::Only(tag.into())
    }

    /// Returns true if a question tagged `difficulty` belongs to the pool.
    #[must_use]
    pub fn matches(&self, difficulty: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(tag) => tag == difficulty,
        }
    }
}

impl FromStr for DifficultyFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(Self::ALL_LABEL) || trimmed == Self::LEGACY_ALL_LABEL {
            Ok(Self::All)
        } else {
            Ok(Self::Only(trimmed.to_string()))
        }
    }
}

impl fmt::Display for DifficultyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(Self::ALL_LABEL),
            Self::Only(tag) => f.write_str(tag),
        }
    }
}
