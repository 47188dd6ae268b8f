//! Deterministic scoring of spirit roots.
//!
//! All functions here are pure functions of the root text. The probability
//! used for valuation is the joint probability of drawing the literal
//! attribute sequence at that count and tier; it ignores deduplication and
//! symbol order, so it is a rarity score rather than an exact probability.

use crate::error::SpiritRootError;

use super::text::resolve;
use super::vocab::{Attribute, COUNT_WEIGHTS, Rarity, Tier};

/// Value of the root described by `text`.
///
/// `floor(sqrt(1 / probability) * 100 * (1 + 0.5 * advanced_count))`
pub fn value(text: &str) -> Result<u64, SpiritRootError> {
    let (attributes, tier) = resolve(text)?;
    Ok(value_of(&attributes, tier))
}

/// Cultivation speed multiplier, rounded to two decimals.
pub fn coefficient(text: &str) -> Result<f64, SpiritRootError> {
    let (attributes, tier) = resolve(text)?;
    Ok(coefficient_of(&attributes, tier))
}

pub fn rarity(text: &str) -> Result<Rarity, SpiritRootError> {
    value(text).map(Rarity::from_value)
}

/// Human-readable form, e.g. `"金木 天 双灵根"`.
///
/// Attributes are listed once each, base first; the count word reflects the
/// literal attribute count of the text.
pub fn display(text: &str) -> Result<String, SpiritRootError> {
    let (attributes, tier) = resolve(text)?;
    Ok(display_of(&attributes, tier))
}

pub(crate) fn display_of(attributes: &[Attribute], tier: Tier) -> String {
    let sorted: String = Attribute::ALL
        .into_iter()
        .filter(|attr| attributes.contains(attr))
        .map(Attribute::symbol)
        .collect();

    format!("{} {} {}灵根", sorted, tier, count_word(attributes.len()))
}

pub(crate) fn probability_of(attributes: &[Attribute], tier: Tier) -> f64 {
    let attr_prob = attributes
        .iter()
        .fold(1.0_f64, |acc, attr| acc * attr.weight());
    let count_prob = COUNT_WEIGHTS[attributes.len() - 1];
    attr_prob * count_prob * tier.weight()
}

pub(crate) fn value_of(attributes: &[Attribute], tier: Tier) -> u64 {
    let probability = probability_of(attributes, tier);
    let base_value = (1.0 / probability).powf(0.5) * 100.0;

    let advanced_count = attributes.iter().filter(|attr| attr.is_advanced()).count();
    let type_multiplier = 1.0 + advanced_count as f64 * 0.5;

    (base_value * type_multiplier) as u64
}

pub(crate) fn coefficient_of(attributes: &[Attribute], tier: Tier) -> f64 {
    let base: u32 = attributes.iter().map(|attr| attr.cultivation_base()).sum();

    let multi_bonus = match attributes.len() {
        1 => 1.0,
        n => 1.1_f64.powf(n as f64),
    };

    round2(f64::from(base) * multi_bonus * tier.bonus())
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn count_word(count: usize) -> &'static str {
    match count {
        1 => "单",
        2 => "双",
        3 => "三",
        4 => "四",
        _ => "五",
    }
}
