//! Validation and canonicalization of incoming produce records.
//!
//! These are pure, deterministic functions with no I/O. The service layer
//! runs every candidate record through [`validate_and_canonicalize`] before
//! it is allowed anywhere near storage, so the store only ever sees
//! canonical codes and names.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::produce::Produce;

// Four dash-separated groups of four Unicode alphanumerics. \p{L} matches
// all letters, \p{N} all numerics.
static CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([\p{L}\p{N}]{4}-){3}[\p{L}\p{N}]{4}$").expect("code pattern"));

// Names start with an alphanumeric and contain only alphanumerics and
// internal whitespace.
static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{N}][\p{L}\p{N}\s]*$").expect("name pattern"));

/// Validate a produce code and return its canonical (uppercase) form, or
/// `None` if the code is not syntactically valid.
pub fn canonicalize_code(raw: &str) -> Option<String> {
    if !CODE_PATTERN.is_match(raw) {
        return None;
    }
    Some(raw.to_uppercase())
}

/// Validate a produce name and return its canonical form, or `None` if the
/// name is not syntactically valid.
///
/// Canonical names capitalize the first letter of each whitespace-separated
/// word and lowercase the rest: `"grEen pePper"` becomes `"Green Pepper"`.
/// Internal whitespace is preserved as written.
pub fn canonicalize_name(raw: &str) -> Option<String> {
    if !NAME_PATTERN.is_match(raw) {
        return None;
    }

    let mut out = String::with_capacity(raw.len());
    let mut word_start = true;
    for ch in raw.chars() {
        if ch.is_whitespace() {
            out.push(ch);
            word_start = true;
        } else if word_start {
            out.extend(ch.to_uppercase());
            word_start = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    Some(out)
}

/// Validate every field of a candidate record and return a canonicalized
/// copy, or a human-readable reason naming the first offending field.
///
/// The unit price needs no check here: it was already parsed into [`Usd`]
/// cents on the way in, so any value it holds is well-formed.
///
/// [`Usd`]: crate::usd::Usd
pub fn validate_and_canonicalize(item: &Produce) -> Result<Produce, String> {
    let code =
        canonicalize_code(&item.code).ok_or_else(|| format!("invalid code: '{}'", item.code))?;
    let name =
        canonicalize_name(&item.name).ok_or_else(|| format!("invalid name: '{}'", item.name))?;
    Ok(Produce {
        code,
        name,
        unit_price: item.unit_price,
    })
}
