//! Scripting collaborator contract.

use super::world::ItemId;

/// Runs item scripts and exposes their local variable stores.
///
/// Locals are integer variables scoped to one item instance and one script,
/// addressed by name. The equip path reads and writes two well-known locals
/// ("onequip", "skipequip"); their semantics live entirely in script land.
pub trait ScriptRuntime: Send + Sync {
    /// Runs `script` once, synchronously, in the context of `item`.
    fn run(&mut self, script: &str, item: ItemId);

    /// Reads a local integer variable; unset variables read as 0.
    fn local_int(&self, item: ItemId, script: &str, name: &str) -> i32;

    /// Writes a local integer variable.
    fn set_local_int(&mut self, item: ItemId, script: &str, name: &str, value: i32);
}
