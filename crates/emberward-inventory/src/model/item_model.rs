//! The item model contract and the base world-mirroring model.

use std::collections::HashMap;

use tracing::warn;

use crate::error::{InventoryError, Result};
use crate::interface::{HolderId, ItemId, SharedWorld};

use super::stack::{ItemStack, StackFlags};

/// A refreshable sequence of [`ItemStack`]s.
///
/// Indices are only valid between refreshes: any mutation through the model,
/// or any world change, may renumber the sequence. Callers that need to hold
/// on to a stack across a refresh keep its [`ItemId`] and re-resolve it with
/// [`index_of`](Self::index_of).
pub trait ItemModel: Send + Sync {
    /// Number of stacks currently in the sequence.
    fn item_count(&self) -> usize;

    /// The stack at `index`, as a value snapshot.
    fn item(&self, index: usize) -> Result<ItemStack>;

    /// Rebuilds the sequence from the source of truth.
    fn update(&mut self);

    /// Copies `count` units of `stack` into this model's backing store,
    /// merging with an equal stack when possible. Returns the handle holding
    /// the units at the destination.
    fn copy_item(&mut self, stack: &ItemStack, count: u32) -> Result<ItemId>;

    /// Removes up to `count` units of `stack` from this model's backing
    /// store, spilling into equal stacks of the same definition. Returns the
    /// number of units actually removed.
    fn remove_item(&mut self, stack: &ItemStack, count: u32) -> Result<u32>;

    /// Finds the current index of an item instance, if it is still in the
    /// sequence.
    fn index_of(&self, item: ItemId) -> Option<usize> {
        (0..self.item_count()).find(|&i| matches!(self.item(i), Ok(s) if s.item == item))
    }

    /// Moves `count` units of `stack` from this model into `target`: a copy
    /// into the target followed by a removal here, then both models refresh.
    /// Returns the handle of the moved units in the target's store.
    ///
    /// Counts are conserved: if the source cannot supply `count` units (the
    /// caller's snapshot was stale), the surplus is taken back out of the
    /// target and the move fails with
    /// [`StackExhausted`](InventoryError::StackExhausted).
    fn move_item(
        &mut self,
        stack: &ItemStack,
        count: u32,
        target: &mut dyn ItemModel,
    ) -> Result<ItemId> {
        let moved = target.copy_item(stack, count)?;
        let removed = self.remove_item(stack, count)?;
        if removed != count {
            warn!(
                requested = count,
                removed, "source stack could not supply the move, rolling back"
            );
            let excess = ItemStack::new(moved, count);
            target.remove_item(&excess, count - removed)?;
            self.update();
            target.update();
            return Err(InventoryError::StackExhausted {
                requested: count,
                removed,
            });
        }
        self.update();
        target.update();
        Ok(moved)
    }
}

/// Mirrors one holder's items out of the world.
///
/// Each refresh rebuilds the sequence from scratch: equipped instances get
/// their own row, loose instances of the same definition merge into one row
/// represented by the earliest-created instance. Instances the world reports
/// as empty are skipped.
pub struct InventoryModel {
    world: SharedWorld,
    holder: HolderId,
    items: Vec<ItemStack>,
}

impl InventoryModel {
    /// Creates a model over `holder`'s store and performs the first refresh.
    pub fn new(world: SharedWorld, holder: HolderId) -> Self {
        let mut model = Self {
            world,
            holder,
            items: Vec::new(),
        };
        model.update();
        model
    }

    /// The holder this model mirrors.
    pub fn holder(&self) -> HolderId {
        self.holder
    }
}

impl ItemModel for InventoryModel {
    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn item(&self, index: usize) -> Result<ItemStack> {
        self.items
            .get(index)
            .cloned()
            .ok_or(InventoryError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            })
    }

    fn update(&mut self) {
        let world = self.world.read();
        let equipped: Vec<ItemId> = world
            .equipment(self.holder)
            .into_iter()
            .map(|(_, item)| item)
            .collect();

        self.items.clear();
        // Definition id -> index of the merged loose row for that definition.
        let mut merged: HashMap<String, usize> = HashMap::new();
        for item in world.items_in(self.holder) {
            let count = world.item_count(item);
            if count == 0 {
                continue;
            }
            let mut flags = StackFlags::NORMAL;
            if world.is_bound(item) {
                flags |= StackFlags::BOUND;
            }
            if equipped.contains(&item) {
                flags |= StackFlags::EQUIPPED;
                self.items.push(ItemStack::with_flags(item, count, flags));
                continue;
            }
            match merged.entry(world.def_id(item)) {
                std::collections::hash_map::Entry::Occupied(row) => {
                    self.items[*row.get()].count += count;
                }
                std::collections::hash_map::Entry::Vacant(row) => {
                    row.insert(self.items.len());
                    self.items.push(ItemStack::with_flags(item, count, flags));
                }
            }
        }
    }

    fn copy_item(&mut self, stack: &ItemStack, count: u32) -> Result<ItemId> {
        Ok(self.world.write().add_copy(stack.item, count, self.holder))
    }

    fn remove_item(&mut self, stack: &ItemStack, count: u32) -> Result<u32> {
        let removed = self.world.write().remove(stack.item, count);
        if removed == 0 {
            return Err(InventoryError::lost("stack to remove"));
        }
        Ok(removed)
    }
}
