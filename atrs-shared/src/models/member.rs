use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Masked, UnknownCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Gender::Male),
            "F" => Ok(Gender::Female),
            other => Err(UnknownCode {
                kind: "gender",
                code: other.to_string(),
            }),
        }
    }
}

/// Card member as seen by the reservation flow. Read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub membership_number: Masked<String>,
    pub kana_family_name: String,
    pub kana_given_name: String,
    pub gender: Gender,
    pub tel: Option<Masked<String>>,
    pub mail: Option<Masked<String>>,
}

impl Member {
    /// True when the stated kana name and gender are exactly the registered ones.
    pub fn matches(&self, family_name: &str, given_name: &str, gender: Gender) -> bool {
        self.kana_family_name == family_name
            && self.kana_given_name == given_name
            && self.gender == gender
    }
}
