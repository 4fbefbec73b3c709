//! Game-mechanics collaborator contract.

use super::world::{HolderId, ItemId};

/// Gameplay bookkeeping triggered by inventory changes.
pub trait Mechanics: Send + Sync {
    /// Recomputes active magic effects after equipment or stock changed.
    fn update_magic_effects(&mut self, actor: HolderId);

    /// Reports a theft-relevant pickup.
    fn item_taken(&mut self, actor: HolderId, item: ItemId, count: u32);

    /// Asks the spell list to refresh (enchanted items may have appeared or
    /// disappeared).
    fn effects_changed(&mut self);
}
