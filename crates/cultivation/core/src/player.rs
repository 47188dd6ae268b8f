//! Player ("cultivator") entity.
//!
//! A player is a mutable attribute bag. Its persisted form is the flat row
//! produced by [`Record::to_fields`]; column names match the `players` table
//! and the `-1` sentinels used there for "no link" and "unset".

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Value, json};

use crate::error::{SpiritRootError, ValidationError};
use crate::realm::{self, MAX_REALM_LEVEL, Realm};
use crate::record::{
    Fields, Record, expect_f64, expect_flag, expect_link, expect_str, expect_u64,
};
use crate::spirit_root::{self, SpiritRoot};

/// Store-assigned player identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub i64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sentinel written for missing ids and unset probabilities.
pub const NONE_SENTINEL: i64 = -1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Sex {
    #[default]
    Female,
    Male,
}

impl Sex {
    pub const fn code(self) -> u8 {
        match self {
            Self::Female => 0,
            Self::Male => 1,
        }
    }

    pub const fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Self::Female),
            1 => Some(Self::Male),
            _ => None,
        }
    }
}

/// Which parent link to follow when listing children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parent {
    Father,
    Mother,
}

impl Parent {
    pub const fn from_is_father(is_father: bool) -> Self {
        if is_father { Self::Father } else { Self::Mother }
    }

    pub const fn column(self) -> &'static str {
        match self {
            Self::Father => "father_id",
            Self::Mother => "mother_id",
        }
    }
}

/// Experience gained per year per point of cultivation coefficient.
pub const EXP_PER_YEAR: f64 = 10.0;

/// Outcome of one [`Player::cultivate`] step.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CultivationReport {
    pub exp_gained: f64,
    /// New realm level when a breakthrough succeeded.
    pub advanced_to: Option<usize>,
    /// Whether the player outlived the lifespan of their realm.
    pub died: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    /// `None` until the store assigns an id.
    pub id: Option<PlayerId>,
    pub name: String,
    pub age: u32,
    pub sex: Sex,
    pub is_master: bool,
    pub is_dead: bool,
    pub father_id: Option<PlayerId>,
    pub mother_id: Option<PlayerId>,
    pub teacher_id: Option<PlayerId>,
    pub companion_id: Option<PlayerId>,
    /// Serialized spirit root; empty when not yet rolled.
    pub root: String,
    pub attribute: String,
    pub base_breakup_probability: Option<f64>,
    /// Index into [`realm::REALMS`].
    pub realm_level: usize,
    pub current_exp: f64,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            id: None,
            name: Self::DEFAULT_NAME.to_string(),
            age: 0,
            sex: Sex::default(),
            is_master: false,
            is_dead: false,
            father_id: None,
            mother_id: None,
            teacher_id: None,
            companion_id: None,
            root: String::new(),
            attribute: String::new(),
            base_breakup_probability: None,
            realm_level: 1,
            current_exp: 0.0,
        }
    }
}

impl Player {
    pub const DEFAULT_NAME: &'static str = "龙傲天";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The player-controlled leader. Never persisted by the factory itself.
    pub fn master(root: &SpiritRoot) -> Self {
        Self {
            is_master: true,
            root: root.to_string(),
            ..Self::default()
        }
    }

    pub fn with_root(mut self, root: &SpiritRoot) -> Self {
        self.root = root.to_string();
        self
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn has_root(&self) -> bool {
        !self.root.is_empty()
    }

    /// Checks every column against the rules applied when reading a row back.
    pub fn validate(&self) -> Result<(), ValidationError> {
        Player::from_fields(&self.to_fields()).map(|_| ())
    }

    /// Parsed spirit root, or `None` when not yet rolled.
    pub fn spirit_root(&self) -> Result<Option<SpiritRoot>, SpiritRootError> {
        if self.root.is_empty() {
            return Ok(None);
        }
        self.root.parse().map(Some)
    }

    /// Cultivation coefficient of the root; 1.0 without a valid root.
    pub fn coefficient(&self) -> f64 {
        spirit_root::coefficient(&self.root).unwrap_or(1.0)
    }

    pub fn realm(&self) -> Option<&'static Realm> {
        realm::realm(self.realm_level)
    }

    pub fn next_realm(&self) -> Option<&'static Realm> {
        realm::next_realm(self.realm_level)
    }

    /// Chance of a breakthrough attempt succeeding.
    pub fn breakthrough_probability(&self) -> f64 {
        self.base_breakup_probability
            .or_else(|| self.realm().map(|r| r.probability))
            .unwrap_or(0.0)
    }

    /// Advances the player by `years` of cultivation.
    ///
    /// Ages the player, grants `coefficient * years * EXP_PER_YEAR` experience,
    /// makes at most one breakthrough attempt once the next realm's threshold
    /// is met, then checks the lifespan of the (possibly new) realm.
    pub fn cultivate<R: Rng + ?Sized>(&mut self, years: u32, rng: &mut R) -> CultivationReport {
        if self.is_dead {
            return CultivationReport::default();
        }

        self.age = self.age.saturating_add(years);
        let exp_gained = self.coefficient() * f64::from(years) * EXP_PER_YEAR;
        self.current_exp += exp_gained;

        let ready = self.realm_level < MAX_REALM_LEVEL
            && self
                .next_realm()
                .is_some_and(|next| self.current_exp >= next.exp_required as f64);

        let mut advanced_to = None;
        if ready && rng.gen_range(0.0..1.0) < self.breakthrough_probability() {
            self.realm_level += 1;
            advanced_to = Some(self.realm_level);
        }

        let died = self
            .realm()
            .and_then(|r| r.lifespan)
            .is_some_and(|lifespan| self.age > lifespan);
        if died {
            self.is_dead = true;
        }

        CultivationReport {
            exp_gained,
            advanced_to,
            died,
        }
    }
}

fn link_value(link: Option<PlayerId>) -> Value {
    json!(link.map_or(NONE_SENTINEL, |id| id.0))
}

impl Record for Player {
    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("id".into(), link_value(self.id));
        fields.insert("name".into(), json!(self.name));
        fields.insert("age".into(), json!(self.age));
        fields.insert("sex".into(), json!(self.sex.code()));
        fields.insert("is_master".into(), json!(u8::from(self.is_master)));
        fields.insert("is_dead".into(), json!(u8::from(self.is_dead)));
        fields.insert("father_id".into(), link_value(self.father_id));
        fields.insert("mother_id".into(), link_value(self.mother_id));
        fields.insert("teacher_id".into(), link_value(self.teacher_id));
        fields.insert("companion_id".into(), link_value(self.companion_id));
        fields.insert("root".into(), json!(self.root));
        fields.insert("attribute".into(), json!(self.attribute));
        fields.insert(
            "base_breakup_probability".into(),
            json!(self.base_breakup_probability.unwrap_or(NONE_SENTINEL as f64)),
        );
        fields.insert("realm_level".into(), json!(self.realm_level));
        fields.insert("current_exp".into(), json!(self.current_exp));
        fields
    }

    fn from_fields(fields: &Fields) -> Result<Self, ValidationError> {
        let mut player = Player::default();
        player.apply_patch(fields)?;
        if let Some(id) = fields.get(Self::ID_FIELD) {
            player.id = expect_link(Self::ID_FIELD, id)?.map(PlayerId);
        }
        Ok(player)
    }

    fn apply_patch(&mut self, patch: &Fields) -> Result<(), ValidationError> {
        let mut next = self.clone();

        for (key, value) in patch {
            match key.as_str() {
                "id" => {}
                "name" => {
                    let name = expect_str("name", value)?;
                    if name.trim().is_empty() {
                        return Err(ValidationError::OutOfRange {
                            field: "name",
                            reason: "must not be empty".into(),
                        });
                    }
                    next.name = name.to_string();
                }
                "age" => {
                    let age = expect_u64("age", value)?;
                    next.age = u32::try_from(age).map_err(|_| ValidationError::OutOfRange {
                        field: "age",
                        reason: format!("{age} does not fit in 32 bits"),
                    })?;
                }
                "sex" => {
                    let code = expect_u64("sex", value)?;
                    next.sex = Sex::from_code(code).ok_or_else(|| ValidationError::OutOfRange {
                        field: "sex",
                        reason: format!("expected 0 or 1, got {code}"),
                    })?;
                }
                "is_master" => next.is_master = expect_flag("is_master", value)?,
                "is_dead" => next.is_dead = expect_flag("is_dead", value)?,
                "father_id" => next.father_id = expect_link("father_id", value)?.map(PlayerId),
                "mother_id" => next.mother_id = expect_link("mother_id", value)?.map(PlayerId),
                "teacher_id" => next.teacher_id = expect_link("teacher_id", value)?.map(PlayerId),
                "companion_id" => {
                    next.companion_id = expect_link("companion_id", value)?.map(PlayerId)
                }
                "root" => {
                    let root = expect_str("root", value)?;
                    if !root.is_empty() && !spirit_root::is_legal(root) {
                        return Err(ValidationError::IllegalRoot {
                            root: root.to_string(),
                        });
                    }
                    next.root = root.to_string();
                }
                "attribute" => next.attribute = expect_str("attribute", value)?.to_string(),
                "base_breakup_probability" => {
                    next.base_breakup_probability = match value {
                        Value::Null => None,
                        _ => {
                            let p = expect_f64("base_breakup_probability", value)?;
                            if p == NONE_SENTINEL as f64 {
                                None
                            } else if (0.0..=1.0).contains(&p) {
                                Some(p)
                            } else {
                                return Err(ValidationError::OutOfRange {
                                    field: "base_breakup_probability",
                                    reason: format!("expected -1 or a value in [0, 1], got {p}"),
                                });
                            }
                        }
                    };
                }
                "realm_level" => {
                    let level = expect_u64("realm_level", value)?;
                    if level as usize > MAX_REALM_LEVEL {
                        return Err(ValidationError::OutOfRange {
                            field: "realm_level",
                            reason: format!("expected 0..={MAX_REALM_LEVEL}, got {level}"),
                        });
                    }
                    next.realm_level = level as usize;
                }
                "current_exp" => {
                    let exp = expect_f64("current_exp", value)?;
                    if exp < 0.0 {
                        return Err(ValidationError::OutOfRange {
                            field: "current_exp",
                            reason: format!("must not be negative, got {exp}"),
                        });
                    }
                    next.current_exp = exp;
                }
                other => {
                    return Err(ValidationError::UnknownField {
                        field: other.to_string(),
                    });
                }
            }
        }

        *self = next;
        Ok(())
    }
}

impl Serialize for Player {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_fields().serialize(serializer)
    }
}
