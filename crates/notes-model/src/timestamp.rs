// SPDX-License-Identifier: Apache-2.0

use crate::ids::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

/// UTC instant persisted as RFC3339 text.
///
/// `created_at` is written once on insert; `updated_at` must strictly advance
/// on every successful mutation, even when the wall clock is too coarse to
/// distinguish two consecutive writes — `strictly_after` handles that case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct Timestamp(#[serde(with = "time::serde::rfc3339")] OffsetDateTime);

impl Timestamp {
    #[must_use]
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    /// Current instant, bumped past `prev` when the clock has not moved.
    #[must_use]
    pub fn strictly_after(prev: Self) -> Self {
        let now = Self::now();
        if now > prev {
            now
        } else {
            Self(prev.0 + Duration::microseconds(1))
        }
    }

    pub fn parse_rfc3339(raw: &str) -> Result<Self, ParseError> {
        OffsetDateTime::parse(raw, &Rfc3339)
            .map(Self)
            .map_err(|_| ParseError::InvalidFormat("timestamp must be RFC3339"))
    }

    pub fn to_rfc3339(self) -> Result<String, ParseError> {
        self.0
            .format(&Rfc3339)
            .map_err(|_| ParseError::InvalidFormat("timestamp not representable as RFC3339"))
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.to_rfc3339() {
            Ok(text) => f.write_str(&text),
            Err(_) => f.write_str("<invalid timestamp>"),
        }
    }
}
