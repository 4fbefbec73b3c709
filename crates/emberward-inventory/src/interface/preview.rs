//! Character-preview collaborator contract.

use super::world::EquipSlot;

/// Pixel width of the preview texture the hit-test coordinates address.
pub const PREVIEW_WIDTH: u32 = 512;
/// Pixel height of the preview texture the hit-test coordinates address.
pub const PREVIEW_HEIGHT: u32 = 1024;

/// The 3D character preview.
///
/// The core only drives hit-testing and redraw scheduling; `resize` and
/// `update` are invoked from the per-frame render tick when the preview is
/// marked dirty or resized, never synchronously inside a model mutation.
pub trait CharacterPreview: Send + Sync {
    /// Maps a pixel coordinate on the preview image to the equipment slot
    /// rendered there, if any.
    fn slot_selected(&self, x: i32, y: i32) -> Option<EquipSlot>;

    /// Resizes the preview render target.
    fn resize(&mut self, width: u32, height: u32);

    /// Re-renders the preview.
    fn update(&mut self);
}
