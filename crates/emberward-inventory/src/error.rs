//! Error types for the inventory core.
//!
//! Failures fall into two groups with very different handling policies:
//!
//! - [`Rejection`]: a user-facing refusal (bound item, merchant not
//!   interested). Nothing has been mutated; the presentation layer shows the
//!   message and the matter is closed. Rejections are reported as values, not
//!   propagated as `Err`.
//! - [`InventoryError`]: the models and the world have diverged, or a caller
//!   passed an index that the current sequence does not contain. These abort
//!   the operation in progress and are surfaced loudly.
//!
//! Out-of-range move/trade counts are neither: they are silently clamped to
//! `[1, available]` at the call sites that accept user-chosen counts.

use thiserror::Error;

/// A specialized `Result` type for inventory operations.
pub type Result<T> = std::result::Result<T, InventoryError>;

/// A refusal to act on a user request. Fully recoverable: no model or world
/// state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Bound (conjured) items cannot change hands across the barter table.
    #[error("bound items cannot be traded")]
    BoundItem,
    /// The merchant's services do not cover this kind of item.
    #[error("the merchant is not interested in this item")]
    MerchantNotInterested,
}

/// Hard failures of the inventory core.
///
/// Apart from `IndexOutOfBounds` (a caller bug), every variant here means the
/// models and their source of truth have desynchronized. None of them are
/// expected during normal play; callers should surface them rather than retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// An index outside the model's current sequence.
    #[error("item index {index} out of bounds (model holds {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// An item handle that must be present in a model could not be found
    /// after a refresh. `context` names the operation that lost it
    /// ("restacked item", "added item", "clicked equipment item", ...).
    #[error("{context} not found in model")]
    ItemNotFound { context: &'static str },

    /// A return was requested for more units than the ledger has on loan.
    #[error("tried to return {requested} borrowed unit(s) but only {available} on loan")]
    LedgerUnderflow { requested: u32, available: u32 },

    /// A move requested more units than the source stack could supply. The
    /// surplus copied into the destination has been taken back; only the
    /// `removed` units the source actually held changed hands.
    #[error("move requested {requested} unit(s) but the source held only {removed}")]
    StackExhausted { requested: u32, removed: u32 },

    /// A stack on loan from the other barter side was targeted by an
    /// operation that only applies to physically owned items.
    #[error("operation not permitted on a stack borrowed across the barter table")]
    BorrowedStack,

    /// A drag was started while another drag was already in progress.
    #[error("a drag operation is already active")]
    DragInProgress,

    /// A barter-only operation was invoked outside an active barter session.
    #[error("no barter session is active")]
    NoActiveBarter,

    /// An operation that needs a selected stack ran without one.
    #[error("no stack is selected")]
    NoSelection,
}

impl InventoryError {
    /// Shorthand for the "model lost an item handle" family of failures.
    pub(crate) fn lost(context: &'static str) -> Self {
        Self::ItemNotFound { context }
    }
}
