// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    Empty(&'static str),
    Trimmed(&'static str),
    TooLong(&'static str, usize),
    NonPositive(&'static str),
    InvalidFormat(&'static str),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(name) => write!(f, "{name} must not be empty"),
            Self::Trimmed(name) => {
                write!(f, "{name} must not contain leading/trailing whitespace")
            }
            Self::TooLong(name, max) => write!(f, "{name} exceeds max length {max}"),
            Self::NonPositive(name) => write!(f, "{name} must be a positive integer"),
            Self::InvalidFormat(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ParseError {}

/// Store-assigned row identifier. Assigned once on insert, immutable after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    pub fn parse(raw: i64) -> Result<Self, ParseError> {
        if raw <= 0 {
            return Err(ParseError::NonPositive("id"));
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Foreign key to `projects.id`. Every dependent row carries one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ProjectId(i64);

impl ProjectId {
    pub fn parse(raw: i64) -> Result<Self, ParseError> {
        if raw <= 0 {
            return Err(ParseError::NonPositive("project_id"));
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl Display for ProjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RecordId> for ProjectId {
    fn from(id: RecordId) -> Self {
        Self(id.as_i64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_rejects_zero_and_negative() {
        assert!(RecordId::parse(0).is_err());
        assert!(RecordId::parse(-3).is_err());
        assert_eq!(RecordId::parse(1).expect("valid id").as_i64(), 1);
    }

    #[test]
    fn project_id_round_trips_through_record_id() {
        let id = RecordId::parse(42).expect("valid id");
        assert_eq!(ProjectId::from(id).as_i64(), 42);
    }
}
