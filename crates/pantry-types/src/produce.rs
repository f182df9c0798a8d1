use serde::{Deserialize, Serialize};

use crate::usd::Usd;

/// A produce record: a unique code, a display name, and a unit price.
///
/// Identity is the code alone; two records with the same code refer to the
/// same inventory entry regardless of name or price. Codes and names are
/// accepted in free case and folded to canonical form by
/// [`validate::validate_and_canonicalize`](crate::validate::validate_and_canonicalize)
/// before a record reaches storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Produce {
    #[serde(rename = "produce_code")]
    pub code: String,
    pub name: String,
    pub unit_price: Usd,
}

impl Produce {
    pub fn new(code: impl Into<String>, name: impl Into<String>, unit_price: Usd) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            unit_price,
        }
    }
}
