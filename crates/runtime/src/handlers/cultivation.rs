//! Listener that advances every living player when time passes.

use std::sync::{Arc, Mutex, PoisonError};

use cultivation_core::{CultivationReport, PlayerId};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::events::{Event, EventBus, Listener, ListenerError, ListenerResult};
use crate::repository::PlayerRepository;

/// Aggregate outcome of one `TimePass` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CultivationSummary {
    pub years: u32,
    pub cultivated: usize,
    pub advanced: Vec<Advancement>,
    pub deceased: Vec<i64>,
    /// Players whose row could not be advanced; the others are unaffected.
    pub failed: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advancement {
    pub id: i64,
    pub realm_level: usize,
}

/// Reacts to [`Event::TimePass`] by cultivating every living player.
///
/// Each player ages, gains experience, may break through, and is soft-deleted
/// once older than their realm allows. Deaths are announced on the bus as
/// [`Event::PlayerDeleted`].
pub struct CultivationListener {
    repository: Arc<dyn PlayerRepository>,
    events: EventBus,
    rng: Mutex<StdRng>,
}

impl CultivationListener {
    pub fn new(repository: Arc<dyn PlayerRepository>, events: EventBus) -> Self {
        Self::with_rng(repository, events, StdRng::from_entropy())
    }

    /// Seeds the breakthrough rolls, for reproducible simulations.
    pub fn seeded(repository: Arc<dyn PlayerRepository>, events: EventBus, seed: u64) -> Self {
        Self::with_rng(repository, events, StdRng::seed_from_u64(seed))
    }

    fn with_rng(repository: Arc<dyn PlayerRepository>, events: EventBus, rng: StdRng) -> Self {
        Self {
            repository,
            events,
            rng: Mutex::new(rng),
        }
    }

    /// Cultivates every living player by `years` and persists the result.
    ///
    /// Each player is read, advanced and written back in one store step, so
    /// concurrent edits to other columns survive a tick.
    pub fn advance(&self, years: u32) -> Result<CultivationSummary, ListenerError> {
        let ids: Vec<PlayerId> = self
            .repository
            .get_all()?
            .into_iter()
            .filter_map(|player| player.id)
            .collect();
        let mut summary = CultivationSummary {
            years,
            ..CultivationSummary::default()
        };

        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        for id in ids {
            let mut report = CultivationReport::default();
            let changed = self.repository.update_with(id, &mut |player| {
                report = player.cultivate(years, &mut *rng);
            });

            let player = match changed {
                Ok(Some(player)) => player,
                // deleted since the listing
                Ok(None) => continue,
                Err(err) => {
                    warn!(target: "runtime::cultivation", %id, error = %err, "cultivation failed");
                    summary.failed.push(id.0);
                    continue;
                }
            };
            summary.cultivated += 1;

            if let Some(realm_level) = report.advanced_to {
                info!(target: "runtime::cultivation", %id, realm_level, "breakthrough");
                summary.advanced.push(Advancement { id: id.0, realm_level });
            }
            if report.died {
                info!(target: "runtime::cultivation", %id, age = player.age, "died of old age");
                summary.deceased.push(id.0);
            }
        }
        drop(rng);

        for &id in &summary.deceased {
            self.events.publish(&Event::PlayerDeleted { id: PlayerId(id) });
        }

        debug!(
            target: "runtime::cultivation",
            years,
            cultivated = summary.cultivated,
            advanced = summary.advanced.len(),
            deceased = summary.deceased.len(),
            failed = summary.failed.len(),
            "time passed"
        );
        Ok(summary)
    }
}

impl Listener for CultivationListener {
    fn on_event(&self, event: &Event) -> ListenerResult {
        match event {
            Event::TimePass { years } => {
                let summary = self.advance(*years)?;
                serde_json::to_value(summary).map_err(|e| ListenerError::Failed(e.to_string()))
            }
            _ => Ok(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Topic;
    use crate::repository::{RepositoryError, Store, StorePlayerRepository};
    use cultivation_core::Player;
    use serde_json::json;

    fn setup() -> (Arc<dyn PlayerRepository>, EventBus, Arc<CultivationListener>) {
        let repository: Arc<dyn PlayerRepository> =
            Arc::new(StorePlayerRepository::new(Arc::new(Store::in_memory())).unwrap());
        let events = EventBus::new();
        let listener = Arc::new(CultivationListener::seeded(
            Arc::clone(&repository),
            events.clone(),
            5,
        ));
        events.subscribe(Topic::TimePass, listener.clone());
        (repository, events, listener)
    }

    #[test]
    fn time_pass_ages_and_trains_everyone() {
        let (repository, events, _) = setup();
        let mut player = Player::new("韩立");
        player.root = "金_普通".into();
        player.base_breakup_probability = Some(0.0);
        let id = repository.insert(&mut player).unwrap();

        let results = events.publish(&Event::TimePass { years: 3 });
        assert_eq!(results.len(), 1);
        let summary = results[0].clone().unwrap();
        assert_eq!(summary["cultivated"], json!(1));

        let player = repository.get_by_id(id).unwrap().unwrap();
        assert_eq!(player.age, 3);
        assert!((player.current_exp - 30.0).abs() < 1e-9);
    }

    #[test]
    fn old_age_soft_deletes_and_announces() {
        let (repository, events, listener) = setup();
        let mut elder = Player::new("老祖");
        elder.age = 150;
        elder.base_breakup_probability = Some(0.0);
        let id = repository.insert(&mut elder).unwrap();

        let deaths = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&deaths);
        events.subscribe(
            Topic::PlayerDeleted,
            Arc::new(move |event: &Event| -> ListenerResult {
                seen.lock().unwrap().push(event.clone());
                Ok(Value::Null)
            }),
        );

        let summary = listener.advance(1).unwrap();
        assert_eq!(summary.deceased, vec![id.0]);
        assert!(repository.get_by_id(id).unwrap().is_none());
        assert_eq!(*deaths.lock().unwrap(), vec![Event::PlayerDeleted { id }]);

        // nobody left to cultivate
        assert_eq!(listener.advance(1).unwrap().cultivated, 0);
    }

    #[test]
    fn breakthrough_is_persisted() {
        let (repository, _, listener) = setup();
        let mut prodigy = Player::new("天骄");
        prodigy.root = "金木风冰空_天".into();
        prodigy.base_breakup_probability = Some(1.0);
        let id = repository.insert(&mut prodigy).unwrap();

        let summary = listener.advance(10).unwrap();
        assert_eq!(
            summary.advanced,
            vec![Advancement {
                id: id.0,
                realm_level: 2
            }]
        );
        assert_eq!(repository.get_by_id(id).unwrap().unwrap().realm_level, 2);
        assert!(repository.get_by_id(PlayerId(id.0 + 1)).unwrap().is_none());
    }

    /// Renames every player right after the listener has listed them, the way
    /// a foreground request racing a tick would.
    struct RenameAfterListing {
        inner: Arc<dyn PlayerRepository>,
    }

    impl PlayerRepository for RenameAfterListing {
        fn insert(&self, player: &mut Player) -> Result<PlayerId, RepositoryError> {
            self.inner.insert(player)
        }

        fn update(&self, player: &Player) -> Result<bool, RepositoryError> {
            self.inner.update(player)
        }

        fn update_with(
            &self,
            id: PlayerId,
            change: &mut dyn FnMut(&mut Player),
        ) -> Result<Option<Player>, RepositoryError> {
            self.inner.update_with(id, change)
        }

        fn get_by_id(&self, id: PlayerId) -> Result<Option<Player>, RepositoryError> {
            self.inner.get_by_id(id)
        }

        fn get_all(&self) -> Result<Vec<Player>, RepositoryError> {
            let players = self.inner.get_all()?;
            for player in &players {
                let mut renamed = player.clone();
                renamed.name = format!("{}师兄", player.name);
                assert!(self.inner.update(&renamed)?);
            }
            Ok(players)
        }

        fn soft_delete(&self, id: PlayerId) -> Result<bool, RepositoryError> {
            self.inner.soft_delete(id)
        }

        fn get_by_parent_id(
            &self,
            parent_id: PlayerId,
            is_father: bool,
        ) -> Result<Vec<Player>, RepositoryError> {
            self.inner.get_by_parent_id(parent_id, is_father)
        }

        fn get_by_teacher_id(&self, teacher_id: PlayerId) -> Result<Vec<Player>, RepositoryError> {
            self.inner.get_by_teacher_id(teacher_id)
        }

        fn get_all_masters(&self) -> Result<Vec<Player>, RepositoryError> {
            self.inner.get_all_masters()
        }
    }

    #[test]
    fn edits_made_during_a_tick_survive_it() {
        let store: Arc<dyn PlayerRepository> =
            Arc::new(StorePlayerRepository::new(Arc::new(Store::in_memory())).unwrap());
        let repository: Arc<dyn PlayerRepository> = Arc::new(RenameAfterListing {
            inner: Arc::clone(&store),
        });
        let listener = CultivationListener::seeded(Arc::clone(&repository), EventBus::new(), 9);

        let mut player = Player::new("韩");
        player.base_breakup_probability = Some(0.0);
        let id = store.insert(&mut player).unwrap();

        let summary = listener.advance(2).unwrap();
        assert_eq!(summary.cultivated, 1);
        assert!(summary.failed.is_empty());

        let stored = store.get_by_id(id).unwrap().unwrap();
        assert_eq!(stored.name, "韩师兄");
        assert_eq!(stored.age, 2);
        assert!((stored.current_exp - 20.0).abs() < 1e-9);
    }
}
