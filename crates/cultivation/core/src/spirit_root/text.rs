//! Parsing of spirit root text (`"<attributes><sep><tier>"`).

use crate::error::SpiritRootError;

use super::vocab::{Attribute, MAX_ATTRIBUTES, SEPARATORS, Tier};

/// The two halves of a root text, not yet checked against the vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawRoot<'a> {
    pub attributes: &'a str,
    pub tier: &'a str,
}

/// Splits root text on the first `-` or `_`.
///
/// Only the separator is checked; symbol validation is left to
/// [`is_legal`] and the valuation functions.
pub fn parse(text: &str) -> Result<RawRoot<'_>, SpiritRootError> {
    let Some(pos) = text.find(SEPARATORS) else {
        return Err(SpiritRootError::Format {
            text: text.to_string(),
        });
    };

    // Both separators are single-byte, so `pos + 1` is a char boundary.
    Ok(RawRoot {
        attributes: &text[..pos],
        tier: &text[pos + 1..],
    })
}

/// Returns true when the text parses and every part is in the vocabulary.
pub fn is_legal(text: &str) -> bool {
    resolve(text).is_ok()
}

/// Parses text into the literal attribute sequence (duplicates kept) and tier.
pub(crate) fn resolve(text: &str) -> Result<(Vec<Attribute>, Tier), SpiritRootError> {
    let raw = parse(text)?;

    let attributes = raw
        .attributes
        .chars()
        .map(|symbol| {
            Attribute::from_symbol(symbol).ok_or(SpiritRootError::UnknownAttribute { symbol })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if attributes.is_empty() || attributes.len() > MAX_ATTRIBUTES {
        return Err(SpiritRootError::AttributeCount {
            count: attributes.len(),
            max: MAX_ATTRIBUTES,
        });
    }

    let tier = raw
        .tier
        .parse::<Tier>()
        .map_err(|_| SpiritRootError::UnknownTier {
            tier: raw.tier.to_string(),
        })?;

    Ok((attributes, tier))
}
