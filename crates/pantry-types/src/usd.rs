use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

// Optional leading '$', whole dollars required, one or two cent digits.
// A fractional part with no whole part (".72") is not accepted.
static USD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$?\d+(\.\d{1,2})?$").expect("USD pattern must compile"));

/// US dollar amount held as whole cents.
///
/// Storing cents in an integer keeps arithmetic exact; the textual form
/// (`"$3.25"`, optionally without the dollar sign on input) only exists at
/// the serialization boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Usd(u32);

impl Usd {
    /// Construct from a whole number of cents.
    pub const fn from_cents(cents: u32) -> Self {
        Self(cents)
    }

    /// Total cents.
    pub const fn cents(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Usd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Usd {
    type Err = TypeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if !USD_PATTERN.is_match(raw) {
            return Err(TypeError::InvalidUsd(raw.to_owned()));
        }

        let body = raw.strip_prefix('$').unwrap_or(raw);
        let (dollars, cents) = match body.split_once('.') {
            None => (body, 0),
            Some((dollars, frac)) => {
                let frac_value: u32 = frac
                    .parse()
                    .map_err(|_| TypeError::InvalidUsd(raw.to_owned()))?;
                // "0.1" means ten cents, "0.10" also means ten cents.
                let cents = if frac.len() == 1 {
                    frac_value * 10
                } else {
                    frac_value
                };
                (dollars, cents)
            }
        };

        let dollars: u32 = dollars
            .parse()
            .map_err(|_| TypeError::InvalidUsd(raw.to_owned()))?;
        dollars
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .map(Usd)
            .ok_or_else(|| TypeError::InvalidUsd(raw.to_owned()))
    }
}

impl Serialize for Usd {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Usd {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
