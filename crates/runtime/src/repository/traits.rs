//! Repository contracts for persisted players.

use cultivation_core::{Player, PlayerId};

use super::error::Result;

/// Repository for player rows
///
/// Deletion is soft: `soft_delete` sets the dead flag and every read below
/// excludes dead rows. There is no query path that returns the dead.
pub trait PlayerRepository: Send + Sync {
    /// Persists a new player and writes the assigned id back into it.
    fn insert(&self, player: &mut Player) -> Result<PlayerId>;

    /// Overwrites the live row with the player's id.
    ///
    /// Returns `false` when the player has no id or no live row matches it.
    /// Writing values equal to the stored ones still counts as a match.
    fn update(&self, player: &Player) -> Result<bool>;

    /// Reads the live row `id`, applies `change` and writes it back as one
    /// atomic step.
    ///
    /// Returns the changed player, or `None` when no live row matches.
    /// Setting `is_dead` inside `change` retires the row like `soft_delete`.
    fn update_with(
        &self,
        id: PlayerId,
        change: &mut dyn FnMut(&mut Player),
    ) -> Result<Option<Player>>;

    fn get_by_id(&self, id: PlayerId) -> Result<Option<Player>>;

    fn get_all(&self) -> Result<Vec<Player>>;

    /// Marks a live player dead. Returns `false` if missing or already dead.
    fn soft_delete(&self, id: PlayerId) -> Result<bool>;

    /// Children of `parent_id` through the father or the mother link.
    fn get_by_parent_id(&self, parent_id: PlayerId, is_father: bool) -> Result<Vec<Player>>;

    /// Disciples of `teacher_id`.
    fn get_by_teacher_id(&self, teacher_id: PlayerId) -> Result<Vec<Player>>;

    fn get_all_masters(&self) -> Result<Vec<Player>>;
}
