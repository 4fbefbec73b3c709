//! Barter overlay over an inventory model.

use tracing::{debug, warn};

use crate::error::{InventoryError, Result};
use crate::interface::{HolderId, ItemId, SharedWorld};

use super::item_model::{InventoryModel, ItemModel};
use super::stack::{ItemStack, StackFlags};

/// An inventory model with two virtual barter ledgers on top.
///
/// During barter nothing physical moves until the deal closes. Instead, each
/// side keeps two ledgers: stacks it has lent out (subtracted from its
/// visible rows) and stacks on loan from the other side (shown as extra
/// `BARTER`-flagged rows). Closing the deal moves the lent units through the
/// world in one step; walking away just clears the ledgers.
pub struct TradeModel {
    source: InventoryModel,
    world: SharedWorld,
    /// Stacks on loan from the other barter side, shown as extra rows.
    borrowed_to_us: Vec<ItemStack>,
    /// Our stacks lent to the other side, hidden from our rows.
    borrowed_from_us: Vec<ItemStack>,
    items: Vec<ItemStack>,
}

impl TradeModel {
    /// Creates a trade overlay over `holder`'s store with empty ledgers.
    pub fn new(world: SharedWorld, holder: HolderId) -> Self {
        let mut model = Self {
            source: InventoryModel::new(world.clone(), holder),
            world,
            borrowed_to_us: Vec::new(),
            borrowed_from_us: Vec::new(),
            items: Vec::new(),
        };
        model.refresh_overlay();
        model
    }

    /// The holder this model trades on behalf of.
    pub fn holder(&self) -> HolderId {
        self.source.holder()
    }

    /// The underlying world-mirroring model, for transfers at deal close.
    pub fn source_mut(&mut self) -> &mut InventoryModel {
        &mut self.source
    }

    /// Stacks currently on loan from the other side.
    pub fn items_borrowed_to_us(&self) -> &[ItemStack] {
        &self.borrowed_to_us
    }

    /// Our stacks currently lent to the other side.
    pub fn items_borrowed_from_us(&self) -> &[ItemStack] {
        &self.borrowed_from_us
    }

    /// Lends `count` units of the stack at `index` to the other side. The
    /// count is clamped to `[1, stack.count]`. Returns the lent portion; the
    /// caller hands it to the other model's [`borrow_item_to_us`].
    ///
    /// [`borrow_item_to_us`]: Self::borrow_item_to_us
    pub fn borrow_item_from_us(&mut self, index: usize, count: u32) -> Result<ItemStack> {
        let stack = self.item(index)?;
        if stack.flags.is_barter() {
            return Err(InventoryError::BorrowedStack);
        }
        let count = count.clamp(1, stack.count);
        let lent = ItemStack::new(stack.item, count);
        match self.borrowed_from_us.iter_mut().find(|s| s.item == stack.item) {
            Some(entry) => entry.count += count,
            None => self.borrowed_from_us.push(lent.clone()),
        }
        debug!(count, "lent stack to the other barter side");
        self.refresh_overlay();
        Ok(lent)
    }

    /// Records `count` units of `stack` as on loan from the other side.
    pub fn borrow_item_to_us(&mut self, stack: &ItemStack, count: u32) {
        match self.borrowed_to_us.iter_mut().find(|s| s.item == stack.item) {
            Some(entry) => entry.count += count,
            None => self.borrowed_to_us.push(ItemStack::with_flags(
                stack.item,
                count,
                stack.flags | StackFlags::BARTER,
            )),
        }
        self.refresh_overlay();
    }

    /// Hands `count` units of the `BARTER` row at `index` back to the other
    /// side. Returns the returned portion; the caller hands it to the other
    /// model's [`return_item_borrowed_from_us`].
    ///
    /// [`return_item_borrowed_from_us`]: Self::return_item_borrowed_from_us
    pub fn return_item_borrowed_to_us(&mut self, index: usize, count: u32) -> Result<ItemStack> {
        let stack = self.item(index)?;
        if !stack.flags.is_barter() {
            return Err(InventoryError::BorrowedStack);
        }
        let entry = self
            .borrowed_to_us
            .iter_mut()
            .find(|s| s.item == stack.item)
            .ok_or(InventoryError::lost("borrowed stack"))?;
        if count > entry.count {
            return Err(InventoryError::LedgerUnderflow {
                requested: count,
                available: entry.count,
            });
        }
        entry.count -= count;
        self.borrowed_to_us.retain(|s| s.count > 0);
        self.refresh_overlay();
        Ok(ItemStack::new(stack.item, count))
    }

    /// Takes `count` units of `item` back from our lent ledger.
    pub fn return_item_borrowed_from_us(&mut self, item: ItemId, count: u32) -> Result<()> {
        let entry = self
            .borrowed_from_us
            .iter_mut()
            .find(|s| s.item == item)
            .ok_or(InventoryError::lost("lent stack"))?;
        if count > entry.count {
            return Err(InventoryError::LedgerUnderflow {
                requested: count,
                available: entry.count,
            });
        }
        entry.count -= count;
        self.borrowed_from_us.retain(|s| s.count > 0);
        self.refresh_overlay();
        Ok(())
    }

    /// Corrects a physical encumbrance value for the virtual loans: units on
    /// loan to us weigh us down, units we lent out do not.
    pub fn adjust_encumbrance(&self, encumbrance: f32) -> f32 {
        let world = self.world.read();
        let gained: f32 = self
            .borrowed_to_us
            .iter()
            .map(|s| world.weight(s.item) * s.count as f32)
            .sum();
        let lent: f32 = self
            .borrowed_from_us
            .iter()
            .map(|s| world.weight(s.item) * s.count as f32)
            .sum();
        encumbrance + gained - lent
    }

    /// Closes our side of the deal: physically moves every stack on loan to
    /// us out of `from` (the lender's underlying model) into our store, then
    /// clears the loan ledger.
    pub fn transfer_items(&mut self, from: &mut dyn ItemModel) -> Result<()> {
        let borrowed = std::mem::take(&mut self.borrowed_to_us);
        for stack in &borrowed {
            let index = from
                .index_of(stack.item)
                .ok_or(InventoryError::lost("borrowed item"))?;
            let source_stack = from.item(index)?;
            from.move_item(&source_stack, stack.count, &mut self.source)?;
        }
        self.refresh_overlay();
        Ok(())
    }

    /// Walks away from the table: both ledgers are discarded. Nothing
    /// physical ever moved, so there is nothing to undo.
    pub fn abort(&mut self) {
        self.borrowed_to_us.clear();
        self.borrowed_from_us.clear();
        self.refresh_overlay();
    }

    fn lent_amount(&self, item: ItemId) -> u32 {
        self.borrowed_from_us
            .iter()
            .filter(|s| s.item == item)
            .map(|s| s.count)
            .sum()
    }

    fn refresh_overlay(&mut self) {
        self.items.clear();
        for index in 0..self.source.item_count() {
            let Ok(mut stack) = self.source.item(index) else {
                continue;
            };
            let lent = self.lent_amount(stack.item);
            if lent >= stack.count {
                if lent > stack.count {
                    warn!(lent, held = stack.count, "lent ledger exceeds held units");
                }
                continue;
            }
            stack.count -= lent;
            self.items.push(stack);
        }
        self.items.extend(self.borrowed_to_us.iter().cloned());
    }
}

impl ItemModel for TradeModel {
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
        self.source.update();
        self.refresh_overlay();
    }

    fn copy_item(&mut self, stack: &ItemStack, count: u32) -> Result<ItemId> {
        self.source.copy_item(stack, count)
    }

    fn remove_item(&mut self, stack: &ItemStack, count: u32) -> Result<u32> {
        if stack.flags.is_barter() {
            return Err(InventoryError::BorrowedStack);
        }
        self.source.remove_item(stack, count)
    }
}
