//! Inventory and barter core for the Emberward RPG client.
//!
//! This crate provides the gameplay-facing item handling of the client:
//!
//! - **Item models**: refreshable stack sequences mirroring a holder's items,
//!   with merging, equipped-stack splitting, and bound-item marking
//! - **Sort/filter proxy**: category filtering and type/name sorting over any
//!   model, without touching the rows
//! - **Barter overlay**: virtual borrow ledgers on both sides of a trade,
//!   committed or discarded in one step
//! - **Drag and drop**: one stack in flight between the player and container
//!   panes; merchant stacks change sides through the ledgers instead
//! - **Controller**: the selection, quantity-confirmation, equipping,
//!   weapon-cycling, and pickup protocols the window is driven by
//!
//! Rendering, audio, scripting, and the world data model are not part of
//! this crate; they are injected through the traits in [`interface`].
//!
//! # Example
//!
//! ```no_run
//! use emberward_inventory::controller::{ClickModifiers, ClickOutcome, InventoryController};
//! use emberward_inventory::settings::WindowSettings;
//!
//! # fn demo(
//! #     world: emberward_inventory::interface::SharedWorld,
//! #     scripts: Box<dyn emberward_inventory::interface::ScriptRuntime>,
//! #     audio: Box<dyn emberward_inventory::interface::AudioSink>,
//! #     preview: Box<dyn emberward_inventory::interface::CharacterPreview>,
//! #     mechanics: Box<dyn emberward_inventory::interface::Mechanics>,
//! # ) -> emberward_inventory::Result<()> {
//! let settings = WindowSettings::load("windows.toml").unwrap_or_default();
//! let mut inventory = InventoryController::new(world, scripts, audio, preview, mechanics, settings);
//! inventory.open();
//! match inventory.on_item_selected(0, ClickModifiers::default())? {
//!     ClickOutcome::CountRequested { name, max, .. } => {
//!         println!("how many {name}? (1-{max})");
//!     }
//!     outcome => println!("{outcome:?}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod controller;
pub mod drag_drop;
pub mod error;
pub mod interface;
pub mod model;
pub mod settings;

#[cfg(test)]
mod testing;

pub use controller::{
    ClickModifiers, ClickOutcome, CycleDirection, Encumbrance, GuiMode, InventoryController,
};
pub use drag_drop::{DragAndDrop, DragPayload, Pane};
pub use error::{InventoryError, Rejection, Result};
pub use model::{InventoryModel, ItemModel, ItemStack, SortFilterModel, StackFlags, TradeModel};
pub use settings::{SettingsError, WindowRect, WindowSettings};
