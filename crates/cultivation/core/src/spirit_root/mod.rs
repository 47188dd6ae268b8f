//! Spirit root engine.
//!
//! A spirit root is a character's innate elemental affinity: a set of one to
//! five attributes plus a tier. This module provides
//!
//! - [`vocab`]: the fixed attribute / tier / rarity vocabulary and its weights
//! - [`text`]: parsing and legality checks for the `"<attrs>_<tier>"` encoding
//! - [`valuation`]: value, cultivation coefficient, rarity and display text
//! - [`SpiritRoot`]: the validated, canonical form
//! - [`SpiritRootGenerator`]: weighted sampling, including generation near a
//!   target value
//!
//! Text-based functions accept any string and report malformed input as a
//! [`SpiritRootError`](crate::SpiritRootError); none of them fall back to a
//! default.

mod descriptor;
mod generator;
pub mod text;
pub mod valuation;
pub mod vocab;

pub use descriptor::SpiritRoot;
pub use generator::{SpiritRootGenerator, generate, generate_near, is_reachable};
pub use text::{RawRoot, is_legal, parse};
pub use valuation::{coefficient, display, rarity, value};
pub use vocab::{
    Attribute, COUNT_WEIGHTS, Category, MAX_ATTRIBUTES, Rarity, SEPARATOR, SEPARATORS, Tier,
};
