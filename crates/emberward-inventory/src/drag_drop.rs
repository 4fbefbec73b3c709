//! Drag-and-drop of item stacks between panes.

use tracing::debug;

use crate::error::{InventoryError, Result};
use crate::interface::ItemId;
use crate::model::{ItemModel, ItemStack};

/// The pane a dragged stack was picked up from.
///
/// The merchant pane is not a drag source: during barter, stacks change
/// sides through the trade ledgers, never in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    PlayerItems,
    ContainerItems,
}

/// A stack in flight: the grabbed row, how many units travel, and where they
/// came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub stack: ItemStack,
    pub count: u32,
    pub source: Pane,
}

/// Tracks the single stack that can be in flight at a time.
///
/// Picking up does not remove anything from any model; the units only move
/// when the payload is dropped onto a model. Dropping back onto the source
/// pane is a plain [`finish`](Self::finish).
#[derive(Debug, Default)]
pub struct DragAndDrop {
    active: Option<DragPayload>,
}

impl DragAndDrop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a stack is currently in flight.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The payload in flight, if any.
    pub fn active(&self) -> Option<&DragPayload> {
        self.active.as_ref()
    }

    /// Picks up `count` units of `stack` from `source`.
    pub fn start_drag(&mut self, stack: ItemStack, count: u32, source: Pane) -> Result<()> {
        if self.active.is_some() {
            return Err(InventoryError::DragInProgress);
        }
        debug!(count, ?source, "picked up stack");
        self.active = Some(DragPayload {
            stack,
            count,
            source,
        });
        Ok(())
    }

    /// Drops the payload onto `target`: moves the units out of
    /// `source_model` and ends the drag. Returns the handle of the units in
    /// the target's store.
    pub fn drop_onto(
        &mut self,
        source_model: &mut dyn ItemModel,
        target: &mut dyn ItemModel,
    ) -> Result<ItemId> {
        let payload = self.active.take().ok_or(InventoryError::NoSelection)?;
        debug!(count = payload.count, "dropped stack");
        source_model.move_item(&payload.stack, payload.count, target)
    }

    /// Ends the drag without moving anything, returning the payload.
    pub fn finish(&mut self) -> Option<DragPayload> {
        self.active.take()
    }
}
