//! Player business operations.

use std::sync::Arc;

use cultivation_core::{Fields, Player, PlayerId, Realm, Record};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::error::{Result, ServiceError};
use crate::events::{Event, EventBus};
use crate::repository::PlayerRepository;

/// A player's current realm and the one they are working towards.
#[derive(Debug, Clone, Serialize)]
pub struct RealmProgress {
    pub player_id: PlayerId,
    pub realm_level: usize,
    pub current_exp: f64,
    pub current: Option<&'static Realm>,
    pub next: Option<&'static Realm>,
}

/// Orchestrates repository access and announces changes on the event bus.
pub struct PlayerService {
    repository: Arc<dyn PlayerRepository>,
    events: EventBus,
}

impl PlayerService {
    pub fn new(repository: Arc<dyn PlayerRepository>, events: EventBus) -> Self {
        Self { repository, events }
    }

    pub fn repository(&self) -> &Arc<dyn PlayerRepository> {
        &self.repository
    }

    /// Persists `player` as a new row and returns it with its id.
    ///
    /// The row must satisfy the same rules as a patch, so every stored row
    /// can be read back.
    pub fn create_player(&self, mut player: Player) -> Result<Player> {
        player.validate()?;
        let id = self.repository.insert(&mut player)?;
        info!(target: "runtime::service", %id, name = %player.name, "created player");
        self.events.publish(&Event::PlayerCreated { id });
        Ok(player)
    }

    pub fn delete_player(&self, id: PlayerId) -> Result<()> {
        if !self.repository.soft_delete(id)? {
            return Err(ServiceError::NotFound { id });
        }
        info!(target: "runtime::service", %id, "deleted player");
        self.events.publish(&Event::PlayerDeleted { id });
        Ok(())
    }

    pub fn get_player(&self, id: PlayerId) -> Result<Player> {
        self.repository
            .get_by_id(id)?
            .ok_or(ServiceError::NotFound { id })
    }

    pub fn get_all_players(&self) -> Result<Vec<Player>> {
        let players = self.repository.get_all()?;
        debug!(target: "runtime::service", count = players.len(), "listed players");
        Ok(players)
    }

    /// Applies `patch` to the live player `id` and saves the full row.
    ///
    /// Fields absent from the patch keep their stored values; `id` is never
    /// patched. The patch is applied to the stored row in one store step, so
    /// a concurrent time tick is not undone.
    pub fn update_player(&self, id: PlayerId, patch: &Fields) -> Result<Player> {
        let mut patched = Ok(());
        let player = self
            .repository
            .update_with(id, &mut |player| patched = player.apply_patch(patch))?
            .ok_or(ServiceError::NotFound { id })?;
        patched?;

        info!(target: "runtime::service", %id, fields = patch.len(), "updated player");
        self.events.publish(&Event::PlayerUpdated { id });
        Ok(player)
    }

    /// The player's row, with a nested `companion` row when the companion
    /// link points at a live player.
    pub fn get_player_with_companion(&self, id: PlayerId) -> Result<Value> {
        let player = self.get_player(id)?;
        let mut result = player.to_fields();

        if let Some(companion_id) = player.companion_id
            && let Some(companion) = self.repository.get_by_id(companion_id)?
        {
            result.insert("companion".into(), Value::Object(companion.to_fields()));
        }

        Ok(Value::Object(result))
    }

    /// Every live master's row plus its `disciple_count`.
    pub fn get_master_details(&self) -> Result<Vec<Value>> {
        let masters = self.repository.get_all_masters()?;
        let mut details = Vec::with_capacity(masters.len());

        for master in &masters {
            let disciple_count = match master.id {
                Some(id) => self.repository.get_by_teacher_id(id)?.len(),
                None => 0,
            };
            let mut detail = master.to_fields();
            detail.insert("disciple_count".into(), json!(disciple_count));
            details.push(Value::Object(detail));
        }

        debug!(target: "runtime::service", count = details.len(), "loaded master details");
        Ok(details)
    }

    /// Children of a live parent through the father or the mother link.
    pub fn get_children(&self, parent_id: PlayerId, is_father: bool) -> Result<Vec<Player>> {
        self.get_player(parent_id)?;
        Ok(self.repository.get_by_parent_id(parent_id, is_father)?)
    }

    pub fn get_disciples(&self, teacher_id: PlayerId) -> Result<Vec<Player>> {
        self.get_player(teacher_id)?;
        Ok(self.repository.get_by_teacher_id(teacher_id)?)
    }

    pub fn get_realm_progress(&self, id: PlayerId) -> Result<RealmProgress> {
        let player = self.get_player(id)?;
        Ok(RealmProgress {
            player_id: id,
            realm_level: player.realm_level,
            current_exp: player.current_exp,
            current: player.realm(),
            next: player.next_realm(),
        })
    }
}
