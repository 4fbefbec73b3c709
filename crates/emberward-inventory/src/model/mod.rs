//! Item models: the sequences of stacks the presentation layer displays.
//!
//! Models form a small pipeline. [`InventoryModel`] is the base layer: it
//! mirrors one holder's items out of the world as a sequence of
//! [`ItemStack`]s. [`TradeModel`] wraps it and overlays the barter ledgers.
//! [`SortFilterModel`] sits on top of any model and reorders and filters the
//! view without touching the rows themselves.
//!
//! All models expose the same [`ItemModel`] contract, so the presentation
//! layer and the drag-and-drop machinery can move stacks between a player
//! model, a container model, and a merchant model without caring which is
//! which.
//!
//! # Example
//!
//! ```no_run
//! use emberward_inventory::interface::{CategoryMask, SharedWorld};
//! use emberward_inventory::model::{InventoryModel, ItemModel, SortFilterModel};
//!
//! # fn demo(world: SharedWorld) -> emberward_inventory::Result<()> {
//! let player = world.read().player();
//! let base = InventoryModel::new(world.clone(), player);
//! let mut view = SortFilterModel::new(base, world);
//! view.set_category(CategoryMask::WEAPON);
//! for i in 0..view.item_count() {
//!     let stack = view.item(i)?;
//!     println!("{} x{}", i, stack.count);
//! }
//! # Ok(())
//! # }
//! ```

mod item_model;
mod sort_filter;
mod stack;
mod trade;

pub use item_model::{InventoryModel, ItemModel};
pub use sort_filter::SortFilterModel;
pub use stack::{ItemStack, StackFlags};
pub use trade::TradeModel;
