//! Shared game vocabulary: races, colours and team identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Opaque team identifier, used as the registry key and for tab lookups.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(String);

impl TeamId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeamId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Playable races
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Race {
    Eridani,
    Hydran,
    Planta,
    Descendants,
    Mechanema,
    Orion,
    Human,
}

impl Race {
    pub const ALL: [Race; 7] = [
        Race::Eridani,
        Race::Hydran,
        Race::Planta,
        Race::Descendants,
        Race::Mechanema,
        Race::Orion,
        Race::Human,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Race::Eridani => "eridani",
            Race::Hydran => "hydran",
            Race::Planta => "planta",
            Race::Descendants => "descendants",
            Race::Mechanema => "mechanema",
            Race::Orion => "orion",
            Race::Human => "human",
        }
    }
}

impl FromStr for Race {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Race::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ProtocolError::unknown_value("race", s))
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Team colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colour {
    Red,
    Blue,
    Green,
    Yellow,
    White,
    Black,
}

impl Colour {
    pub const ALL: [Colour; 6] = [
        Colour::Red,
        Colour::Blue,
        Colour::Green,
        Colour::Yellow,
        Colour::White,
        Colour::Black,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Colour::Red => "red",
            Colour::Blue => "blue",
            Colour::Green => "green",
            Colour::Yellow => "yellow",
            Colour::White => "white",
            Colour::Black => "black",
        }
    }

    /// Fill colour used for discs and ships.
    pub fn fill(&self) -> &'static str {
        match self {
            Colour::Red => "#cd171a",
            Colour::Blue => "#283583",
            Colour::Green => "#3fa535",
            Colour::Yellow => "#ffd500",
            Colour::White => "#fff",
            Colour::Black => "#111",
        }
    }

    /// Outline colour that stays readable on top of `fill()`.
    pub fn stroke(&self) -> &'static str {
        match self {
            Colour::Black | Colour::Blue => "#fff",
            _ => "#000",
        }
    }
}

impl FromStr for Colour {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Colour::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ProtocolError::unknown_value("colour", s))
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
