//! Contracts consumed from external collaborators.
//!
//! The inventory core never renders, plays audio, runs scripts, or owns item
//! data; it talks to the systems that do through the traits in this module.
//! Collaborators are injected at session start and the core holds them for
//! the lifetime of the controller.
//!
//! # Collaborators
//!
//! - [`WorldModel`]: the item/world data model (item definitions, ownership,
//!   equipment, world placement). Models read through it on every `update`,
//!   mutations go through it so that counts are conserved in one place.
//! - [`ScriptRuntime`]: runs item scripts and exposes their per-item local
//!   variable stores.
//! - [`AudioSink`]: fire-and-forget sound playback.
//! - [`CharacterPreview`]: the 3D character preview; hit-testing and redraw
//!   scheduling only.
//! - [`Mechanics`]: gameplay bookkeeping triggered by inventory changes.

mod audio;
mod mechanics;
mod preview;
mod script;
mod world;

pub use audio::AudioSink;
pub use mechanics::Mechanics;
pub use preview::{CharacterPreview, PREVIEW_HEIGHT, PREVIEW_WIDTH};
pub use script::ScriptRuntime;
pub use world::{
    Category, CategoryMask, EquipSlot, HolderId, ItemId, ServiceMask, SharedWorld, WorldModel,
    shared_world,
};
