//! Canonical, validated spirit root.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SpiritRootError;

use super::text::resolve;
use super::valuation::{coefficient_of, display_of, value_of};
use super::vocab::{Attribute, MAX_ATTRIBUTES, Rarity, SEPARATOR, Tier};

/// A spirit root: a deduplicated attribute set plus one tier.
///
/// Attributes are kept in display order (base first, then advanced), so the
/// `Display` output is the canonical text encoding. Parsing that text back
/// yields an equal value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpiritRoot {
    attributes: BTreeSet<Attribute>,
    tier: Tier,
}

impl SpiritRoot {
    /// Builds a root from any attribute collection; duplicates collapse.
    pub fn new(
        attributes: impl IntoIterator<Item = Attribute>,
        tier: Tier,
    ) -> Result<Self, SpiritRootError> {
        let attributes: BTreeSet<Attribute> = attributes.into_iter().collect();
        if attributes.is_empty() || attributes.len() > MAX_ATTRIBUTES {
            return Err(SpiritRootError::AttributeCount {
                count: attributes.len(),
                max: MAX_ATTRIBUTES,
            });
        }
        Ok(Self { attributes, tier })
    }

    pub fn attributes(&self) -> impl Iterator<Item = Attribute> + '_ {
        self.attributes.iter().copied()
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Always false; a root has at least one attribute.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn contains(&self, attribute: Attribute) -> bool {
        self.attributes.contains(&attribute)
    }

    pub fn advanced_count(&self) -> usize {
        self.attributes.iter().filter(|a| a.is_advanced()).count()
    }

    pub fn value(&self) -> u64 {
        value_of(&self.attribute_vec(), self.tier)
    }

    pub fn coefficient(&self) -> f64 {
        coefficient_of(&self.attribute_vec(), self.tier)
    }

    pub fn rarity(&self) -> Rarity {
        Rarity::from_value(self.value())
    }

    /// Human-readable form, e.g. `"金木 天 双灵根"`.
    pub fn display_name(&self) -> String {
        display_of(&self.attribute_vec(), self.tier)
    }

    /// Every canonical root, ordered by attribute bitmask then tier.
    ///
    /// The vocabulary is small (218 attribute sets times 4 tiers), which makes
    /// exhaustive searches over it cheap.
    pub fn all() -> impl Iterator<Item = SpiritRoot> {
        (1u16..(1 << Attribute::ALL.len()))
            .filter(|mask| mask.count_ones() as usize <= MAX_ATTRIBUTES)
            .flat_map(|mask| {
                let attributes: BTreeSet<Attribute> = Attribute::ALL
                    .into_iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, attr)| attr)
                    .collect();
                Tier::ALL.into_iter().map(move |tier| SpiritRoot {
                    attributes: attributes.clone(),
                    tier,
                })
            })
    }

    fn attribute_vec(&self) -> Vec<Attribute> {
        self.attributes.iter().copied().collect()
    }
}

impl fmt::Display for SpiritRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for attr in &self.attributes {
            write!(f, "{}", attr.symbol())?;
        }
        write!(f, "{}{}", SEPARATOR, self.tier)
    }
}

impl FromStr for SpiritRoot {
    type Err = SpiritRootError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (attributes, tier) = resolve(s)?;
        Self::new(attributes, tier)
    }
}

impl Serialize for SpiritRoot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SpiritRoot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
