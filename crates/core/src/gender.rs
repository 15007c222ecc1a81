//! Gender classification of a catalog item.

use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DomainError;

/// Target audience of a product.
///
/// The API sends the integer code; the UI filters by the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gender {
    #[default]
    Unisex,
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Female, Gender::Male, Gender::Unisex];

    /// Wire code used by the catalog API.
    pub fn code(self) -> u8 {
        match self {
            Gender::Unisex => 0,
            Gender::Male => 1,
            Gender::Female => 2,
        }
    }

    pub fn from_code(code: u64) -> Result<Self, DomainError> {
        match code {
            0 => Ok(Gender::Unisex),
            1 => Ok(Gender::Male),
            2 => Ok(Gender::Female),
            other => Err(DomainError::unknown("gender code", other.to_string())),
        }
    }

    /// Display label; also the value the gender selector submits.
    pub fn label(self) -> &'static str {
        match self {
            Gender::Unisex => "Unisex",
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl core::fmt::Display for Gender {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses a selector label. Matching is exact: "female" is not "Female".
impl FromStr for Gender {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.label() == s)
            .ok_or_else(|| DomainError::unknown("gender", s))
    }
}

impl Serialize for Gender {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for Gender {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Code(u64),
            Label(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Code(code) => Gender::from_code(code),
            Wire::Label(label) => label.parse(),
        }
        .map_err(serde::de::Error::custom)
    }
}
