//! Store-backed PlayerRepository implementation.

use std::sync::Arc;

use cultivation_core::{Fields, Parent, Player, PlayerId, Record};
use serde_json::{Value, json};

use super::error::{RepositoryError, Result};
use super::store::{Store, Table};
use super::traits::PlayerRepository;

/// Implementation of PlayerRepository over the `players` table of a [`Store`].
pub struct StorePlayerRepository {
    store: Arc<Store>,
}

impl StorePlayerRepository {
    pub const TABLE: &'static str = "players";

    /// Binds to `store`, creating the `players` table if needed.
    pub fn new(store: Arc<Store>) -> Result<Self> {
        store.create_table(Self::TABLE)?;
        Ok(Self { store })
    }

    /// Live players matching `filter`, in id order.
    fn select(&self, filter: impl Fn(&Player) -> bool) -> Result<Vec<Player>> {
        let players = self.store.query(Self::TABLE, |table| {
            table
                .rows()
                .filter(|row| is_live(row))
                .map(decode)
                .collect::<Result<Vec<_>>>()
        })??;
        Ok(players.into_iter().filter(|p| filter(p)).collect())
    }
}

fn is_live(row: &Fields) -> bool {
    match row.get("is_dead") {
        Some(Value::Number(flag)) => flag.as_i64() == Some(0),
        Some(Value::Bool(dead)) => !dead,
        _ => true,
    }
}

fn decode(row: &Fields) -> Result<Player> {
    Player::from_fields(row).map_err(|e| RepositoryError::CorruptedData(e.to_string()))
}

fn live_row(table: &mut Table, id: PlayerId) -> Option<&mut Fields> {
    table.get_mut(id.0).filter(|row| is_live(row))
}

impl PlayerRepository for StorePlayerRepository {
    fn insert(&self, player: &mut Player) -> Result<PlayerId> {
        let mut row = player.to_fields();
        row.remove(Player::ID_FIELD);

        let (_, id) = self
            .store
            .execute(Self::TABLE, |table| (1, table.insert(row)))?;
        let id = PlayerId(id);
        player.id = Some(id);

        tracing::debug!(
            target: "runtime::repository",
            %id,
            name = %player.name,
            "inserted player"
        );
        Ok(id)
    }

    fn update(&self, player: &Player) -> Result<bool> {
        let Some(id) = player.id else {
            return Ok(false);
        };
        let row = player.to_fields();

        let (affected, _) = self.store.execute(Self::TABLE, |table| {
            match live_row(table, id) {
                Some(stored) => {
                    *stored = row;
                    (1, ())
                }
                None => (0, ()),
            }
        })?;

        if affected == 0 {
            tracing::warn!(target: "runtime::repository", %id, "update matched no live player");
        } else {
            tracing::debug!(
                target: "runtime::repository",
                %id,
                name = %player.name,
                "updated player"
            );
        }
        Ok(affected > 0)
    }

    fn update_with(
        &self,
        id: PlayerId,
        change: &mut dyn FnMut(&mut Player),
    ) -> Result<Option<Player>> {
        let (_, changed) = self.store.execute(Self::TABLE, |table| {
            let Some(stored) = live_row(table, id) else {
                return (0, Ok(None));
            };
            let mut player = match decode(stored) {
                Ok(player) => player,
                Err(err) => return (0, Err(err)),
            };
            change(&mut player);
            *stored = player.to_fields();
            (1, Ok(Some(player)))
        })?;

        let changed = changed?;
        if changed.is_some() {
            tracing::debug!(target: "runtime::repository", %id, "changed player in place");
        }
        Ok(changed)
    }

    fn get_by_id(&self, id: PlayerId) -> Result<Option<Player>> {
        self.store.query(Self::TABLE, |table| {
            table
                .get(id.0)
                .filter(|row| is_live(row))
                .map(decode)
                .transpose()
        })?
    }

    fn get_all(&self) -> Result<Vec<Player>> {
        let players = self.select(|_| true)?;
        tracing::debug!(
            target: "runtime::repository",
            count = players.len(),
            "loaded all players"
        );
        Ok(players)
    }

    fn soft_delete(&self, id: PlayerId) -> Result<bool> {
        let (affected, _) = self.store.execute(Self::TABLE, |table| {
            match live_row(table, id) {
                Some(row) => {
                    row.insert("is_dead".into(), json!(1));
                    (1, ())
                }
                None => (0, ()),
            }
        })?;

        if affected > 0 {
            tracing::debug!(target: "runtime::repository", %id, "soft-deleted player");
        }
        Ok(affected > 0)
    }

    fn get_by_parent_id(&self, parent_id: PlayerId, is_father: bool) -> Result<Vec<Player>> {
        let parent = Parent::from_is_father(is_father);
        let children = self.select(|p| {
            let link = match parent {
                Parent::Father => p.father_id,
                Parent::Mother => p.mother_id,
            };
            link == Some(parent_id)
        })?;
        tracing::debug!(
            target: "runtime::repository",
            %parent_id,
            link = parent.column(),
            count = children.len(),
            "loaded children"
        );
        Ok(children)
    }

    fn get_by_teacher_id(&self, teacher_id: PlayerId) -> Result<Vec<Player>> {
        self.select(|p| p.teacher_id == Some(teacher_id))
    }

    fn get_all_masters(&self) -> Result<Vec<Player>> {
        self.select(|p| p.is_master)
    }
}
