//! The realm ladder: cultivation stages a player advances through.

use serde::Serialize;

/// One stage of the realm ladder.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Realm {
    pub name: &'static str,
    /// Base chance of breaking through out of this realm.
    pub probability: f64,
    /// Experience needed to attempt entering this realm.
    pub exp_required: u64,
    pub spirit_power: u64,
    pub spirit_sense: u64,
    /// Maximum age reachable in this realm; `None` is unbounded.
    pub lifespan: Option<u32>,
}

impl Realm {
    const fn new(
        name: &'static str,
        probability: f64,
        exp_required: u64,
        spirit_power: u64,
        spirit_sense: u64,
        lifespan: Option<u32>,
    ) -> Self {
        Self {
            name,
            probability,
            exp_required,
            spirit_power,
            spirit_sense,
            lifespan,
        }
    }
}

pub const REALMS: [Realm; 10] = [
    Realm::new("凡人境", 0.99, 0, 0, 0, Some(100)),
    Realm::new("炼气境", 0.9, 100, 10, 5, Some(150)),
    Realm::new("筑基境", 0.8, 1_000, 50, 20, Some(300)),
    Realm::new("金丹境", 0.7, 10_000, 200, 100, Some(500)),
    Realm::new("元婴境", 0.6, 100_000, 1_000, 500, Some(1_000)),
    Realm::new("化神境", 0.5, 1_000_000, 5_000, 2_000, Some(2_000)),
    Realm::new("合体境", 0.4, 10_000_000, 20_000, 10_000, Some(5_000)),
    Realm::new("大乘境", 0.3, 100_000_000, 100_000, 50_000, Some(10_000)),
    Realm::new("渡劫境", 0.2, 1_000_000_000, 500_000, 200_000, Some(20_000)),
    Realm::new("真仙境", 0.0, 10_000_000_000, 2_000_000, 1_000_000, None),
];

pub const MAX_REALM_LEVEL: usize = REALMS.len() - 1;

/// Realm at `level`, if the level is on the ladder.
pub fn realm(level: usize) -> Option<&'static Realm> {
    REALMS.get(level)
}

/// Realm after `level`; the last realm is its own successor.
pub fn next_realm(level: usize) -> Option<&'static Realm> {
    if level > MAX_REALM_LEVEL {
        return None;
    }
    REALMS.get((level + 1).min(MAX_REALM_LEVEL))
}
