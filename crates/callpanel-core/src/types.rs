use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Office
// ---------------------------------------------------------------------------

/// The office a panel is calling races for. Each office has its own page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Office {
    Senate,
    House,
    Governor,
}

impl Office {
    pub fn all() -> &'static [Office] {
        &[Office::Senate, Office::House, Office::Governor]
    }

    /// URL slug used in the panel path.
    pub fn as_str(self) -> &'static str {
        match self {
            Office::Senate => "senate",
            Office::House => "house",
            Office::Governor => "governor",
        }
    }

    /// Office name as it appears in the results feed.
    pub fn officename(self) -> &'static str {
        match self {
            Office::Senate => "U.S. Senate",
            Office::House => "U.S. House",
            Office::Governor => "Governor",
        }
    }
}

impl fmt::Display for Office {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Office {
    type Err = crate::error::CallsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "senate" => Ok(Office::Senate),
            "house" => Ok(Office::House),
            "governor" => Ok(Office::Governor),
            _ => Err(crate::error::CallsError::UnknownOffice(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Party
// ---------------------------------------------------------------------------

/// Party a chamber can be called for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Party {
    Dem,
    #[serde(rename = "GOP")]
    Gop,
}

impl Party {
    /// Wire value posted in the `call` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Party::Dem => "Dem",
            Party::Gop => "GOP",
        }
    }

    /// Parse an operator-supplied party, where `none` means "uncall".
    pub fn parse_call(s: &str) -> crate::Result<Option<Party>> {
        match s.to_ascii_lowercase().as_str() {
            "dem" => Ok(Some(Party::Dem)),
            "gop" => Ok(Some(Party::Gop)),
            "none" | "" => Ok(None),
            _ => Err(crate::error::CallsError::UnknownParty(s.to_string())),
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
