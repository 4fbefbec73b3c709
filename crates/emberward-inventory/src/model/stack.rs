//! Item stacks and their contextual flags.

use crate::interface::ItemId;

/// Contextual flags attached to a displayed stack.
///
/// An empty mask means the stack is ordinary. The flags are not mutually
/// exclusive: an equipped enchanted blade conjured by a spell carries both
/// `EQUIPPED` and `BOUND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StackFlags(u8);

impl StackFlags {
    /// No flags: an ordinary stack.
    pub const NORMAL: Self = Self(0);
    /// The instance is currently worn or wielded.
    pub const EQUIPPED: Self = Self(1 << 0);
    /// The stack is on loan across the barter table.
    pub const BARTER: Self = Self(1 << 1);
    /// Magically bound; cannot be traded.
    pub const BOUND: Self = Self(1 << 2);

    /// Returns true if every bit of `other` is set.
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// True when no flag is set.
    pub fn is_normal(self) -> bool {
        self.0 == 0
    }

    /// True when the `EQUIPPED` flag is set.
    pub fn is_equipped(self) -> bool {
        self.contains(Self::EQUIPPED)
    }

    /// True when the `BARTER` flag is set.
    pub fn is_barter(self) -> bool {
        self.contains(Self::BARTER)
    }

    /// True when the `BOUND` flag is set.
    pub fn is_bound(self) -> bool {
        self.contains(Self::BOUND)
    }
}

impl std::ops::BitOr for StackFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for StackFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for StackFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

/// One visible row of an item model: a world item instance, a positive unit
/// count, and contextual flags.
///
/// Stacks are value snapshots; they are rebuilt wholesale by
/// [`ItemModel::update`](super::ItemModel::update), never edited in place by
/// callers. A stack whose count would reach zero is removed from the model,
/// not retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStack {
    /// Non-owning handle to the underlying world item instance.
    pub item: ItemId,
    /// Units displayed by this row. Always at least 1.
    pub count: u32,
    /// Contextual flags.
    pub flags: StackFlags,
}

impl ItemStack {
    /// Creates an ordinary stack.
    pub fn new(item: ItemId, count: u32) -> Self {
        debug_assert!(count > 0, "a stack with count 0 must not exist");
        Self {
            item,
            count,
            flags: StackFlags::NORMAL,
        }
    }

    /// Creates a stack with the given flags.
    pub fn with_flags(item: ItemId, count: u32, flags: StackFlags) -> Self {
        debug_assert!(count > 0, "a stack with count 0 must not exist");
        Self { item, count, flags }
    }

    /// Whether two stacks display the same underlying item instance.
    pub fn same_item(&self, other: &ItemStack) -> bool {
        self.item == other.item
    }
}
