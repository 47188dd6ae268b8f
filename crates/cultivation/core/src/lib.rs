//! Domain rules and data types of the sect simulation.
//!
//! `cultivation-core` holds everything that does not touch storage or
//! threads: the spirit root engine, the realm ladder, and the [`Player`]
//! entity together with its [`Record`] row mapping. The runtime crate builds
//! persistence, events and the service layer on top of these types.
pub mod error;
pub mod player;
pub mod realm;
pub mod record;
pub mod spirit_root;

pub use error::{ErrorKind, SpiritRootError, ValidationError};
pub use player::{
    CultivationReport, EXP_PER_YEAR, NONE_SENTINEL, Parent, Player, PlayerId, Sex,
};
pub use realm::{MAX_REALM_LEVEL, REALMS, Realm, next_realm, realm};
pub use record::{Fields, Record};
pub use spirit_root::{
    Attribute, Rarity, SpiritRoot, SpiritRootGenerator, Tier, generate, generate_near,
};
