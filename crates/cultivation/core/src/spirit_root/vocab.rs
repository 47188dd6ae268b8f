//! Fixed vocabulary of the spirit root engine.
//!
//! Every symbol carries the sampling weight used by the generator; the same
//! weights feed the valuation formula, so changing one changes both.

use serde::{Deserialize, Serialize};

/// Maximum number of attributes a spirit root may carry.
pub const MAX_ATTRIBUTES: usize = 5;

/// Sampling weights for attribute counts `1..=MAX_ATTRIBUTES`.
///
/// The more attributes a root has, the rarer it is.
pub const COUNT_WEIGHTS: [f64; MAX_ATTRIBUTES] = [0.4, 0.3, 0.2, 0.08, 0.02];

/// Separator written between attributes and tier when serializing.
pub const SEPARATOR: char = '_';

/// Separators accepted when parsing.
pub const SEPARATORS: [char; 2] = ['-', '_'];

/// Vocabulary category of an attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Base,
    Advanced,
}

/// A single elemental attribute.
///
/// Declaration order is display order: base attributes first, then advanced
/// ones. The derived `Ord` relies on this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    /// 金
    Metal,
    /// 木
    Wood,
    /// 水
    Water,
    /// 火
    Fire,
    /// 土
    Earth,
    /// 风
    Wind,
    /// 冰
    Ice,
    /// 空
    Void,
}

impl Attribute {
    pub const BASE: [Attribute; 5] = [
        Attribute::Metal,
        Attribute::Wood,
        Attribute::Water,
        Attribute::Fire,
        Attribute::Earth,
    ];

    pub const ADVANCED: [Attribute; 3] = [Attribute::Wind, Attribute::Ice, Attribute::Void];

    /// Base then advanced, in declaration order.
    pub const ALL: [Attribute; 8] = [
        Attribute::Metal,
        Attribute::Wood,
        Attribute::Water,
        Attribute::Fire,
        Attribute::Earth,
        Attribute::Wind,
        Attribute::Ice,
        Attribute::Void,
    ];

    pub const fn symbol(self) -> char {
        match self {
            Self::Metal => '金',
            Self::Wood => '木',
            Self::Water => '水',
            Self::Fire => '火',
            Self::Earth => '土',
            Self::Wind => '风',
            Self::Ice => '冰',
            Self::Void => '空',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::ALL.into_iter().find(|attr| attr.symbol() == symbol)
    }

    /// Sampling weight of this attribute.
    pub const fn weight(self) -> f64 {
        match self {
            Self::Metal | Self::Wood | Self::Water | Self::Fire | Self::Earth => 0.2,
            Self::Wind | Self::Ice => 0.1,
            Self::Void => 0.05,
        }
    }

    pub const fn category(self) -> Category {
        match self {
            Self::Wind | Self::Ice | Self::Void => Category::Advanced,
            _ => Category::Base,
        }
    }

    pub const fn is_advanced(self) -> bool {
        matches!(self.category(), Category::Advanced)
    }

    /// Contribution to the cultivation coefficient: 1 for base, 2 for advanced.
    pub const fn cultivation_base(self) -> u32 {
        match self.category() {
            Category::Base => 1,
            Category::Advanced => 2,
        }
    }
}

/// Rarity band of a spirit root, ordered from most to least common.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
)]
pub enum Tier {
    #[strum(serialize = "普通")]
    Common,
    #[strum(serialize = "变异")]
    Mutant,
    #[strum(serialize = "地")]
    Earth,
    #[strum(serialize = "天")]
    Heaven,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Common, Tier::Mutant, Tier::Earth, Tier::Heaven];

    /// Sampling weight of this tier.
    pub const fn weight(self) -> f64 {
        match self {
            Self::Common => 0.7,
            Self::Mutant => 0.2,
            Self::Earth => 0.08,
            Self::Heaven => 0.02,
        }
    }

    /// Multiplier applied to the cultivation coefficient.
    pub const fn bonus(self) -> f64 {
        match self {
            Self::Common => 1.0,
            Self::Mutant => 1.5,
            Self::Earth => 2.0,
            Self::Heaven => 3.0,
        }
    }

    /// English name, as opposed to the symbol used in root text.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Mutant => "mutant",
            Self::Earth => "earth",
            Self::Heaven => "heaven",
        }
    }
}

/// Rarity classification derived from a root's value.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Rarity {
    Common,
    Fine,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

impl Rarity {
    /// Lower bound (inclusive) of each band, highest first.
    const THRESHOLDS: [(u64, Rarity); 5] = [
        (1_000_000, Rarity::Mythic),
        (100_000, Rarity::Legendary),
        (10_000, Rarity::Epic),
        (5_000, Rarity::Rare),
        (1_000, Rarity::Fine),
    ];

    pub fn from_value(value: u64) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(floor, _)| value >= *floor)
            .map(|(_, rarity)| *rarity)
            .unwrap_or(Rarity::Common)
    }

    /// Label shown to players.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Common => "普通",
            Self::Fine => "优秀",
            Self::Rare => "稀有",
            Self::Epic => "史诗",
            Self::Legendary => "传说",
            Self::Mythic => "神话",
        }
    }
}
