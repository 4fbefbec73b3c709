//! World and actor collaborator contract.
//!
//! The world owns every item instance; the inventory core only ever holds
//! non-owning [`ItemId`] handles. Handles stay valid until the world merges
//! or destroys the instance (restacking), at which point mutating operations
//! return the surviving handle.

use std::sync::Arc;

use parking_lot::RwLock;
use slotmap::new_key_type;

new_key_type! {
    /// Handle to one world item instance.
    ///
    /// Owned by the world collaborator. Two stacks in the same model never
    /// share an `ItemId`.
    pub struct ItemId;
}

new_key_type! {
    /// Handle to anything that can hold items: an actor or a container.
    pub struct HolderId;
}

/// Equipment slots on an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquipSlot {
    RightHand,
    LeftHand,
    Head,
    Cuirass,
    Greaves,
    Boots,
    Ring,
    Amulet,
    Robe,
}

/// Display category of an item. Declaration order is the sort rank:
/// weapons first, uncategorized oddities last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Weapon,
    Apparel,
    Magic,
    Misc,
    Other,
}

impl Category {
    /// Sort rank of this category.
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// The single-category mask for this category.
    pub fn mask(self) -> CategoryMask {
        CategoryMask(1 << self as u8)
    }
}

/// Mask over item categories, used by the sort/filter proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CategoryMask(u8);

impl CategoryMask {
    /// Nothing visible.
    pub const NONE: Self = Self(0);
    /// Weapons only.
    pub const WEAPON: Self = Self(1 << Category::Weapon as u8);
    /// Armor and clothing.
    pub const APPAREL: Self = Self(1 << Category::Apparel as u8);
    /// Enchanted items, potions, scrolls.
    pub const MAGIC: Self = Self(1 << Category::Magic as u8);
    /// Everything mundane.
    pub const MISC: Self = Self(1 << Category::Misc as u8);
    /// Uncategorized items.
    pub const OTHER: Self = Self(1 << Category::Other as u8);
    /// No filtering.
    pub const ALL: Self = Self(
        Self::WEAPON.0 | Self::APPAREL.0 | Self::MAGIC.0 | Self::MISC.0 | Self::OTHER.0,
    );

    /// Returns true if every bit of `other` is set in this mask.
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl std::ops::BitOr for CategoryMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for CategoryMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// The kinds of goods a merchant deals in. Opaque to the core beyond passing
/// it to [`WorldModel::can_sell`]; the named bits exist so sessions and tests
/// can build masks without reaching into game data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ServiceMask(u32);

impl ServiceMask {
    /// Buys nothing.
    pub const NONE: Self = Self(0);
    /// Weapons.
    pub const WEAPONS: Self = Self(1 << 0);
    /// Armor.
    pub const ARMOR: Self = Self(1 << 1);
    /// Clothing.
    pub const CLOTHING: Self = Self(1 << 2);
    /// Enchanted items, potions, scrolls.
    pub const MAGIC_GOODS: Self = Self(1 << 3);
    /// Ingredients, tools, lights, the rest.
    pub const MISC_GOODS: Self = Self(1 << 4);
    /// A pawnbroker: everything.
    pub const ALL_GOODS: Self = Self(
        Self::WEAPONS.0
            | Self::ARMOR.0
            | Self::CLOTHING.0
            | Self::MAGIC_GOODS.0
            | Self::MISC_GOODS.0,
    );

    /// Returns true if every bit of `other` is set in this mask.
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Returns true if the two masks share any bit.
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }
}

impl std::ops::BitOr for ServiceMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for ServiceMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// The item/world data model, as seen by the inventory core.
///
/// Read methods must be cheap; models call them on every rebuild. Mutating
/// methods are the single authority on counts: the core trusts the world to
/// conserve items across `add_copy`/`remove` pairs and across restacking.
pub trait WorldModel: Send + Sync {
    /// The player actor.
    fn player(&self) -> HolderId;

    /// Item instances held by `holder`, in insertion order. Insertion order
    /// defines creation order, which the sort proxy uses to break ties.
    fn items_in(&self, holder: HolderId) -> Vec<ItemId>;

    /// Units held by this instance. Zero means the instance is gone.
    fn item_count(&self, item: ItemId) -> u32;

    /// Display name. Items with an empty name are invisible to the player
    /// and can never be picked up.
    fn name(&self, item: ItemId) -> String;

    /// Weight of a single unit.
    fn weight(&self, item: ItemId) -> f32;

    /// Display category.
    fn category(&self, item: ItemId) -> Category;

    /// Identifier of the underlying item definition. Split stacks of one
    /// item share a definition id.
    fn def_id(&self, item: ItemId) -> String;

    /// Bound (conjured) items cannot be traded or dropped.
    fn is_bound(&self, item: ItemId) -> bool;

    /// Whether the item is of a kind that can sit in an inventory at all.
    fn is_carriable(&self, item: ItemId) -> bool;

    /// The script attached to this item's definition, if any.
    fn script(&self, item: ItemId) -> Option<String>;

    /// Sound played when the item is picked up or put down.
    fn down_sound_id(&self, item: ItemId) -> String;

    /// Slots the item can occupy when equipped; the first entry is the
    /// primary slot. Empty for items that cannot be equipped.
    fn equipment_slots(&self, item: ItemId) -> Vec<EquipSlot>;

    /// Current equipment of an actor. Containers report nothing.
    fn equipment(&self, holder: HolderId) -> Vec<(EquipSlot, ItemId)>;

    /// Performs the item's generic use action (equip, read, drink, ...)
    /// against `actor`.
    fn use_item(&mut self, item: ItemId, actor: HolderId);

    /// Unequips `item` from `actor`. The freed instance may merge back into
    /// an existing equal stack (restacking); the surviving handle is
    /// returned and the old handle must be considered dead if it differs.
    fn unequip(&mut self, item: ItemId, actor: HolderId) -> ItemId;

    /// Copies `count` units of `item` into `holder`, merging with an equal
    /// stack if one exists. Returns the handle holding the units at the
    /// destination.
    fn add_copy(&mut self, item: ItemId, count: u32, holder: HolderId) -> ItemId;

    /// Removes up to `count` units of `item` from its holder, spilling into
    /// equal stacks of the same definition if this instance holds fewer.
    /// Returns the number of units actually removed.
    fn remove(&mut self, item: ItemId, count: u32) -> u32;

    /// Carry capacity of an actor.
    fn capacity(&self, actor: HolderId) -> f32;

    /// Current carried weight of an actor.
    fn encumbrance(&self, actor: HolderId) -> f32;

    /// Total armor rating of an actor, for the preview caption.
    fn armor_rating(&self, actor: HolderId) -> f32;

    /// Whether a merchant offering `services` will buy this item.
    /// A pure predicate over the item's type; never mutates.
    fn can_sell(&self, item: ItemId, services: ServiceMask) -> bool;

    /// Moves a world-placed object into `actor`'s store, removing its world
    /// placement. Returns the handle of the stored (possibly merged) stack.
    fn take_from_world(&mut self, object: ItemId, actor: HolderId) -> ItemId;

    /// Picking things up is a hostile-adjacent act: dispel invisibility.
    fn break_invisibility(&mut self, actor: HolderId);
}

/// A world collaborator shared between the controller and its models.
pub type SharedWorld = Arc<RwLock<Box<dyn WorldModel>>>;

/// Wraps a world collaborator for sharing.
pub fn shared_world(world: impl WorldModel + 'static) -> SharedWorld {
    Arc::new(RwLock::new(Box::new(world)))
}
