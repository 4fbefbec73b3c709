//! The inventory window controller.
//!
//! Orchestrates the model pipeline, the drag-and-drop context, and the
//! collaborator seams into the behavior the presentation layer drives:
//! clicking stacks, confirming quantities, selling across the barter table,
//! equipping from the character preview, weapon cycling, and picking objects
//! up out of the world.
//!
//! The controller never blocks. The only suspension point is the pending
//! quantity request: when a click needs a count the user has not given yet,
//! the controller hands back a [`ClickOutcome::CountRequested`] and parks a
//! resumption token. [`confirm_count`](InventoryController::confirm_count)
//! re-validates the token against the refreshed model before resuming, since
//! anything may have happened to the stack in the meantime.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error, warn};

use crate::drag_drop::{DragAndDrop, DragPayload, Pane};
use crate::error::{InventoryError, Rejection, Result};
use crate::interface::{
    AudioSink, Category, CategoryMask, CharacterPreview, EquipSlot, HolderId, ItemId, Mechanics,
    PREVIEW_HEIGHT, PREVIEW_WIDTH, ScriptRuntime, ServiceMask, SharedWorld, WorldModel,
};
use crate::model::{InventoryModel, ItemModel, ItemStack, SortFilterModel, TradeModel};
use crate::settings::{SettingsError, WindowRect, WindowSettings};

/// Definition id of the robe worn during a shapeshift. Clicking it on the
/// preview must never offer to unequip it.
const SHAPESHIFT_ROBE_ID: &str = "shapeshift_robe";

/// The modes the inventory window can be shown in. Each mode persists its
/// window rectangle under its own settings key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuiMode {
    Inventory,
    Container,
    Companion,
    Barter,
}

impl GuiMode {
    /// The settings key this mode's window rectangle is stored under.
    pub fn settings_key(self) -> &'static str {
        match self {
            GuiMode::Inventory => "inventory",
            GuiMode::Container => "inventory container",
            GuiMode::Companion => "inventory companion",
            GuiMode::Barter => "inventory barter",
        }
    }
}

/// Direction for weapon cycling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    Next,
    Previous,
}

/// Modifier keys held during a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickModifiers {
    /// Grab a single unit, skipping the quantity request.
    pub take_one: bool,
    /// Grab the whole stack, skipping the quantity request.
    pub take_all: bool,
}

impl ClickModifiers {
    pub fn take_one() -> Self {
        Self {
            take_one: true,
            take_all: false,
        }
    }

    pub fn take_all() -> Self {
        Self {
            take_one: false,
            take_all: true,
        }
    }
}

/// What a click amounted to. The presentation layer renders from this; the
/// controller has already done everything else.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// Nothing happened.
    Ignored,
    /// A stack was picked up and is now in flight.
    DragStarted,
    /// The in-flight stack was dropped.
    DropCompleted,
    /// Units changed sides of the barter table (virtually).
    Sold,
    /// The item's use action ran.
    Used,
    /// The user must choose a quantity; call `confirm_count` or
    /// `cancel_count`.
    CountRequested {
        name: String,
        max: u32,
        trading: bool,
    },
    /// The request was refused. Nothing changed; a sound already played.
    Rejected(Rejection),
}

#[derive(Debug, Clone, Copy)]
enum PendingAction {
    DragFromPlayer,
    DragFromOther,
    Sell,
}

/// Resumption token for a suspended quantity request. Identity-based: the
/// stack is re-located by `ItemId` when the count arrives.
#[derive(Debug)]
struct PendingCount {
    item: ItemId,
    max: u32,
    action: PendingAction,
}

struct Merchant {
    model: Arc<RwLock<TradeModel>>,
    services: ServiceMask,
}

/// Carried weight against capacity, corrected for pending barter loans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Encumbrance {
    pub current: f32,
    pub capacity: f32,
}

/// Drives one player's inventory window.
pub struct InventoryController {
    world: SharedWorld,
    scripts: Box<dyn ScriptRuntime>,
    audio: Box<dyn AudioSink>,
    preview: Box<dyn CharacterPreview>,
    mechanics: Box<dyn Mechanics>,
    settings: WindowSettings,
    mode: GuiMode,
    rect: WindowRect,
    trade_model: Arc<RwLock<TradeModel>>,
    view: SortFilterModel<TradeModel>,
    merchant: Option<Merchant>,
    other: Option<Arc<RwLock<InventoryModel>>>,
    drag: DragAndDrop,
    pending: Option<PendingCount>,
    skipped_to_equip: Option<ItemId>,
    preview_dirty: bool,
    preview_resize: bool,
    visible: bool,
}

impl InventoryController {
    pub fn new(
        world: SharedWorld,
        scripts: Box<dyn ScriptRuntime>,
        audio: Box<dyn AudioSink>,
        preview: Box<dyn CharacterPreview>,
        mechanics: Box<dyn Mechanics>,
        settings: WindowSettings,
    ) -> Self {
        let player = world.read().player();
        let trade_model = Arc::new(RwLock::new(TradeModel::new(world.clone(), player)));
        let view = SortFilterModel::shared(trade_model.clone(), world.clone());
        let rect = settings.rect(GuiMode::Inventory.settings_key());
        Self {
            world,
            scripts,
            audio,
            preview,
            mechanics,
            settings,
            mode: GuiMode::Inventory,
            rect,
            trade_model,
            view,
            merchant: None,
            other: None,
            drag: DragAndDrop::new(),
            pending: None,
            skipped_to_equip: None,
            preview_dirty: true,
            preview_resize: true,
            visible: false,
        }
    }

    /// The sorted, filtered view over the player's items.
    pub fn view(&self) -> &SortFilterModel<TradeModel> {
        &self.view
    }

    /// The player-side trade model.
    pub fn player_trade(&self) -> Arc<RwLock<TradeModel>> {
        self.trade_model.clone()
    }

    /// The merchant-side trade model during barter.
    pub fn merchant_trade(&self) -> Option<Arc<RwLock<TradeModel>>> {
        self.merchant.as_ref().map(|m| m.model.clone())
    }

    /// The model behind the container or companion pane, if one is open.
    pub fn other_model(&self) -> Option<Arc<RwLock<InventoryModel>>> {
        self.other.clone()
    }

    /// The drag context, for rendering the in-flight stack.
    pub fn drag(&self) -> &DragAndDrop {
        &self.drag
    }

    pub fn mode(&self) -> GuiMode {
        self.mode
    }

    pub fn is_trading(&self) -> bool {
        self.merchant.is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The window rectangle for the current mode, in screen fractions.
    pub fn window_rect(&self) -> WindowRect {
        self.rect
    }

    /// Shows the window, refreshes the view, and notifies collaborators.
    pub fn open(&mut self) {
        self.visible = true;
        self.view.update();
        self.notify_content_changed();
    }

    /// Hides the window. An in-flight drag is abandoned; a pending quantity
    /// request is kept, the dialog outlives the window.
    pub fn hide(&mut self) {
        self.visible = false;
        self.drag.finish();
    }

    /// Switches the window mode: picks up the mode's stored rectangle and
    /// abandons any in-flight drag.
    pub fn set_gui_mode(&mut self, mode: GuiMode) {
        debug!(?mode, "gui mode change");
        self.mode = mode;
        self.rect = self.settings.rect(mode.settings_key());
        self.drag.finish();
        self.preview_resize = true;
    }

    /// Rebuilds the model chain after the player actor changed.
    pub fn update_player(&mut self) {
        let player = self.world.read().player();
        let trade_model = Arc::new(RwLock::new(TradeModel::new(self.world.clone(), player)));
        let category = self.view.category();
        self.view = SortFilterModel::shared(trade_model.clone(), self.world.clone());
        self.view.set_category(category);
        self.trade_model = trade_model;
        self.preview_dirty = true;
        self.preview_resize = true;
    }

    /// Replaces the category filter on the player view.
    pub fn set_filter(&mut self, category: CategoryMask) {
        self.view.set_category(category);
    }

    /// Opens a container pane next to the inventory.
    pub fn open_container(&mut self, holder: HolderId) {
        self.other = Some(Arc::new(RwLock::new(InventoryModel::new(
            self.world.clone(),
            holder,
        ))));
        self.set_gui_mode(GuiMode::Container);
    }

    /// Opens a companion's pane next to the inventory.
    pub fn open_companion(&mut self, holder: HolderId) {
        self.other = Some(Arc::new(RwLock::new(InventoryModel::new(
            self.world.clone(),
            holder,
        ))));
        self.set_gui_mode(GuiMode::Companion);
    }

    /// Closes the container/companion pane.
    pub fn close_other(&mut self) {
        self.other = None;
        self.set_gui_mode(GuiMode::Inventory);
    }

    /// Starts a barter session with `merchant`.
    pub fn begin_barter(&mut self, merchant: HolderId, services: ServiceMask) {
        let model = Arc::new(RwLock::new(TradeModel::new(self.world.clone(), merchant)));
        self.merchant = Some(Merchant { model, services });
        self.set_gui_mode(GuiMode::Barter);
    }

    /// Ends the barter session. On `completed`, everything on loan changes
    /// owner physically; otherwise both ledgers are discarded.
    pub fn end_barter(&mut self, completed: bool) -> Result<()> {
        let Some(merchant) = self.merchant.take() else {
            return Ok(());
        };
        if completed {
            let mut theirs = merchant.model.write();
            let mut ours = self.trade_model.write();
            ours.transfer_items(theirs.source_mut())?;
            theirs.transfer_items(ours.source_mut())?;
        }
        merchant.model.write().abort();
        self.trade_model.write().abort();
        self.view.update();
        self.notify_content_changed();
        self.set_gui_mode(GuiMode::Inventory);
        Ok(())
    }

    /// A click on the window background: drops an in-flight stack into the
    /// player's items.
    pub fn on_background_selected(&mut self) -> Result<ClickOutcome> {
        if !self.drag.is_active() {
            return Ok(ClickOutcome::Ignored);
        }
        self.drop_into_player()
    }

    /// A click on row `index` of the player view.
    pub fn on_item_selected(&mut self, index: usize, mods: ClickModifiers) -> Result<ClickOutcome> {
        let source = self.view.map_to_source(index)?;
        self.on_item_selected_from_source(source, mods)
    }

    /// A click on row `index` of the container/companion pane.
    pub fn on_other_item_selected(
        &mut self,
        index: usize,
        mods: ClickModifiers,
    ) -> Result<ClickOutcome> {
        if self.drag.is_active() {
            return self.drop_into_other();
        }
        let Some(other) = self.other.clone() else {
            return Ok(ClickOutcome::Ignored);
        };
        let stack = other.read().item(index)?;
        let count = if mods.take_one { 1 } else { stack.count };
        if count > 1 && !mods.take_all {
            return Ok(self.request_count(&stack, PendingAction::DragFromOther));
        }
        self.drag_from_other(index, count)
    }

    /// A click on the character preview at normalized coordinates
    /// (`0.0..=1.0` per axis, relative to the avatar image).
    pub fn on_avatar_clicked(
        &mut self,
        x: f32,
        y: f32,
        mods: ClickModifiers,
    ) -> Result<ClickOutcome> {
        if let Some(payload) = self.drag.finish() {
            // Dropping onto the avatar equips: pull the stack into the
            // player's items if it came from elsewhere, then run the use
            // path on it.
            let item = match payload.source {
                Pane::PlayerItems => payload.stack.item,
                Pane::ContainerItems => {
                    let Some(moved) = self.move_payload_into_player(&payload)? else {
                        return Ok(ClickOutcome::Ignored);
                    };
                    self.notify_content_changed();
                    moved
                }
            };
            self.view.update();
            return self.use_item(item);
        }

        let px = (x * PREVIEW_WIDTH as f32) as i32;
        let py = (y * PREVIEW_HEIGHT as f32) as i32;
        let Some(slot) = self.preview.slot_selected(px, py) else {
            return Ok(ClickOutcome::Ignored);
        };
        let Some(item) = self.equipped_in_slot(slot) else {
            return Ok(ClickOutcome::Ignored);
        };
        if self
            .world
            .read()
            .def_id(item)
            .eq_ignore_ascii_case(SHAPESHIFT_ROBE_ID)
        {
            return Ok(ClickOutcome::Ignored);
        }
        self.view.update();
        let Some(index) = self.trade_model.read().index_of(item) else {
            error!("equipped item missing from the player model");
            return Err(InventoryError::lost("clicked equipment item"));
        };
        self.on_item_selected_from_source(index, mods)
    }

    /// Resumes a suspended quantity request with the chosen count. The count
    /// is clamped to `[1, max]`; the stack is re-located by identity against
    /// the refreshed model and the count re-clamped to whatever the stack
    /// holds now. The request is dropped with a warning if the stack
    /// vanished meanwhile.
    pub fn confirm_count(&mut self, count: u32) -> Result<ClickOutcome> {
        let Some(pending) = self.pending.take() else {
            return Err(InventoryError::NoSelection);
        };
        let count = count.clamp(1, pending.max);
        match pending.action {
            PendingAction::Sell | PendingAction::DragFromPlayer => {
                self.view.update();
                let Some(index) = self.trade_model.read().index_of(pending.item) else {
                    warn!("pending stack vanished before count confirmation");
                    return Ok(ClickOutcome::Ignored);
                };
                // The stack may have shrunk while the dialog was open.
                let count = count.min(self.trade_model.read().item(index)?.count);
                if matches!(pending.action, PendingAction::Sell) {
                    self.sell_item(index, count)
                } else {
                    self.drag_item(index, count)
                }
            }
            PendingAction::DragFromOther => {
                let Some(other) = self.other.clone() else {
                    warn!("pending stack vanished before count confirmation");
                    return Ok(ClickOutcome::Ignored);
                };
                other.write().update();
                let Some(index) = other.read().index_of(pending.item) else {
                    warn!("pending stack vanished before count confirmation");
                    return Ok(ClickOutcome::Ignored);
                };
                let count = count.min(other.read().item(index)?.count);
                self.drag_from_other(index, count)
            }
        }
    }

    /// Discards a suspended quantity request.
    pub fn cancel_count(&mut self) {
        self.pending = None;
    }

    /// Runs an item's use action with the legacy equip-flag handshake.
    ///
    /// If the item has a script, its "onequip" local is raised (unless the
    /// item previously skipped equipping and its "skipequip" local is still
    /// 0) and the script runs once. Afterwards, a raised "skipequip" local
    /// suppresses the generic use action and the item is remembered; the
    /// memo clears as soon as a use goes through.
    pub fn use_item(&mut self, item: ItemId) -> Result<ClickOutcome> {
        let script = self.world.read().script(item);
        if let Some(script) = &script {
            let previously_skipped = self.skipped_to_equip == Some(item);
            if !previously_skipped || self.scripts.local_int(item, script, "skipequip") == 1 {
                self.scripts.set_local_int(item, script, "onequip", 1);
            }
            self.scripts.run(script, item);
        }
        let skip = script
            .as_ref()
            .map_or(0, |s| self.scripts.local_int(item, s, "skipequip"));
        if skip == 0 {
            let player = self.world.read().player();
            self.world.write().use_item(item, player);
            self.skipped_to_equip = None;
        } else {
            debug!("script deferred the equip");
            self.skipped_to_equip = Some(item);
        }
        self.view.update();
        self.notify_content_changed();
        Ok(ClickOutcome::Used)
    }

    /// Cycles the equipped right-hand weapon through the inventory in
    /// creation order, skipping consecutive stacks of the same definition.
    /// No change if the inventory holds no other usable weapon.
    pub fn cycle(&mut self, direction: CycleDirection) -> Result<ClickOutcome> {
        let player = self.world.read().player();
        // A throwaway creation-order snapshot; the visible view may be
        // sorted and filtered arbitrarily.
        let mut snapshot = SortFilterModel::new(
            InventoryModel::new(self.world.clone(), player),
            self.world.clone(),
        );
        snapshot.set_sort_by_type(false);
        let len = snapshot.item_count();
        if len == 0 {
            return Ok(ClickOutcome::Ignored);
        }

        let found = {
            let world = self.world.read();
            let mut selected: Option<usize> = None;
            for i in 0..len {
                let stack = snapshot.item(i)?;
                if stack.flags.is_equipped() && Self::is_right_hand_weapon(&**world, stack.item) {
                    selected = Some(i);
                }
            }

            let step: isize = match direction {
                CycleDirection::Next => 1,
                CycleDirection::Previous => -1,
            };
            let mut last_def = match selected {
                Some(i) => world.def_id(snapshot.item(i)?.item),
                None => String::new(),
            };
            let mut cursor = selected.map_or(-1, |i| i as isize);
            let mut found = None;
            for _ in 0..len {
                cursor = (cursor + step).rem_euclid(len as isize);
                let stack = snapshot.item(cursor as usize)?;
                let def = world.def_id(stack.item);
                // Split stacks of one definition restack on equip; stepping
                // onto one would get stuck on the same weapon.
                if def.eq_ignore_ascii_case(&last_def) {
                    continue;
                }
                last_def = def;
                if Self::is_right_hand_weapon(&**world, stack.item) {
                    found = Some(stack.item);
                    break;
                }
            }
            found
        };

        match found {
            Some(item) => self.use_item(item),
            None => Ok(ClickOutcome::Ignored),
        }
    }

    /// Picks a world-placed object up into the player's items and starts
    /// dragging it. Unnamed or uncarriable objects are ignored.
    pub fn pick_up_object(&mut self, object: ItemId) -> Result<ClickOutcome> {
        if self.drag.is_active() {
            return Ok(ClickOutcome::Ignored);
        }
        let (player, count) = {
            let world = self.world.read();
            if !world.is_carriable(object) || world.name(object).is_empty() {
                return Ok(ClickOutcome::Ignored);
            }
            (world.player(), world.item_count(object))
        };
        self.world.write().break_invisibility(player);
        self.mechanics.item_taken(player, object, count);
        let stored = self.world.write().take_from_world(object, player);
        self.view.update();
        let Some(index) = self.trade_model.read().index_of(stored) else {
            error!("picked-up item missing from the player model");
            return Err(InventoryError::lost("added item"));
        };
        let stack = self.trade_model.read().item(index)?;
        self.drag.start_drag(stack, count, Pane::PlayerItems)?;
        self.mechanics.effects_changed();
        Ok(ClickOutcome::DragStarted)
    }

    /// Per-frame tick: reports the loan-corrected encumbrance while the
    /// window is visible. Never mutates the models.
    pub fn on_frame(&self) -> Option<Encumbrance> {
        if !self.visible {
            return None;
        }
        let (raw, capacity) = {
            let world = self.world.read();
            let player = world.player();
            (world.encumbrance(player), world.capacity(player))
        };
        let current = self.trade_model.read().adjust_encumbrance(raw);
        Some(Encumbrance { current, capacity })
    }

    /// Render tick: services pending preview resizes and redraws. Returns
    /// the refreshed armor rating when anything was serviced.
    pub fn render_update(&mut self, avatar_width: u32, avatar_height: u32) -> Option<f32> {
        let resize = std::mem::take(&mut self.preview_resize);
        let dirty = std::mem::take(&mut self.preview_dirty);
        if !resize && !dirty {
            return None;
        }
        if resize {
            self.preview.resize(avatar_width, avatar_height);
        }
        if dirty {
            self.preview.update();
        }
        let world = self.world.read();
        Some(world.armor_rating(world.player()))
    }

    /// Tells the rest of the game the inventory contents changed: spells may
    /// have appeared or vanished, magic effects need recomputing, and the
    /// preview must redraw.
    pub fn notify_content_changed(&mut self) {
        let player = self.world.read().player();
        self.mechanics.effects_changed();
        self.mechanics.update_magic_effects(player);
        self.preview_dirty = true;
    }

    /// The window was moved or resized: persist the rectangle under the
    /// current mode's key.
    pub fn on_window_resize(&mut self, rect: WindowRect) {
        if rect == self.rect {
            return;
        }
        self.rect = rect;
        self.settings.set_rect(self.mode.settings_key(), rect);
        self.preview_resize = true;
    }

    /// Writes the window settings to disk.
    pub fn save_settings(
        &self,
        path: impl AsRef<std::path::Path>,
    ) -> std::result::Result<(), SettingsError> {
        self.settings.save(path)
    }

    fn on_item_selected_from_source(
        &mut self,
        index: usize,
        mods: ClickModifiers,
    ) -> Result<ClickOutcome> {
        if self.drag.is_active() {
            return self.drop_into_player();
        }
        let stack = self.trade_model.read().item(index)?;

        if self.is_trading() {
            if stack.flags.is_bound() {
                self.play_down_sound(stack.item);
                return Ok(ClickOutcome::Rejected(Rejection::BoundItem));
            }
            let services = self
                .merchant
                .as_ref()
                .map_or(ServiceMask::NONE, |m| m.services);
            if !self.world.read().can_sell(stack.item, services) {
                self.play_down_sound(stack.item);
                return Ok(ClickOutcome::Rejected(Rejection::MerchantNotInterested));
            }
        }

        let count = if mods.take_one { 1 } else { stack.count };
        if count > 1 && !mods.take_all {
            let action = if self.is_trading() {
                PendingAction::Sell
            } else {
                PendingAction::DragFromPlayer
            };
            return Ok(self.request_count(&stack, action));
        }
        if self.is_trading() {
            self.sell_item(index, count)
        } else {
            self.drag_item(index, count)
        }
    }

    fn request_count(&mut self, stack: &ItemStack, action: PendingAction) -> ClickOutcome {
        let name = self.world.read().name(stack.item);
        self.pending = Some(PendingCount {
            item: stack.item,
            max: stack.count,
            action,
        });
        ClickOutcome::CountRequested {
            name,
            max: stack.count,
            trading: matches!(action, PendingAction::Sell),
        }
    }

    /// Unequips the stack at `index` if it is worn, then re-locates it by
    /// identity: the freed instance may have merged into another stack.
    fn ensure_item_unequipped(&mut self, index: usize) -> Result<usize> {
        let stack = self.trade_model.read().item(index)?;
        if !stack.flags.is_equipped() {
            return Ok(index);
        }
        let player = self.world.read().player();
        let survivor = self.world.write().unequip(stack.item, player);
        self.trade_model.write().update();
        match self.trade_model.read().index_of(survivor) {
            Some(index) => Ok(index),
            None => {
                error!("unequipped item missing from the player model");
                Err(InventoryError::lost("restacked item"))
            }
        }
    }

    fn drag_item(&mut self, index: usize, count: u32) -> Result<ClickOutcome> {
        let index = self.ensure_item_unequipped(index)?;
        let stack = self.trade_model.read().item(index)?;
        self.drag.start_drag(stack, count, Pane::PlayerItems)?;
        self.view.update();
        self.notify_content_changed();
        Ok(ClickOutcome::DragStarted)
    }

    fn drag_from_other(&mut self, index: usize, count: u32) -> Result<ClickOutcome> {
        let Some(other) = self.other.clone() else {
            return Ok(ClickOutcome::Ignored);
        };
        let stack = other.read().item(index)?;
        self.drag.start_drag(stack, count, Pane::ContainerItems)?;
        Ok(ClickOutcome::DragStarted)
    }

    /// Moves units across the barter table. Selling back a stack the
    /// merchant lent us returns the loan; anything else becomes our loan to
    /// the merchant. Both ledgers stay symmetric.
    fn sell_item(&mut self, index: usize, count: u32) -> Result<ClickOutcome> {
        let merchant = self
            .merchant
            .as_ref()
            .map(|m| m.model.clone())
            .ok_or(InventoryError::NoActiveBarter)?;
        let index = self.ensure_item_unequipped(index)?;
        let stack = self.trade_model.read().item(index)?;
        self.play_down_sound(stack.item);
        if stack.flags.is_barter() {
            let returned = self
                .trade_model
                .write()
                .return_item_borrowed_to_us(index, count)?;
            merchant
                .write()
                .return_item_borrowed_from_us(returned.item, returned.count)?;
        } else {
            let lent = self.trade_model.write().borrow_item_from_us(index, count)?;
            merchant.write().borrow_item_to_us(&lent, lent.count);
        }
        self.view.update();
        self.notify_content_changed();
        Ok(ClickOutcome::Sold)
    }

    fn drop_into_player(&mut self) -> Result<ClickOutcome> {
        let Some(payload) = self.drag.finish() else {
            return Ok(ClickOutcome::Ignored);
        };
        if payload.source == Pane::PlayerItems {
            // Back where it came from; nothing moves.
            self.view.update();
            return Ok(ClickOutcome::DropCompleted);
        }
        match self.move_payload_into_player(&payload)? {
            Some(_) => {
                self.view.update();
                self.notify_content_changed();
                Ok(ClickOutcome::DropCompleted)
            }
            None => Ok(ClickOutcome::Ignored),
        }
    }

    fn drop_into_other(&mut self) -> Result<ClickOutcome> {
        let Some(payload) = self.drag.active() else {
            return Ok(ClickOutcome::Ignored);
        };
        if payload.source == Pane::ContainerItems {
            self.drag.finish();
            return Ok(ClickOutcome::DropCompleted);
        }
        let Some(other) = self.other.clone() else {
            warn!("no container pane to drop into");
            self.drag.finish();
            return Ok(ClickOutcome::Ignored);
        };
        {
            let mut source = self.trade_model.write();
            let mut target = other.write();
            self.drag.drop_onto(&mut *source, &mut *target)?;
        }
        self.view.update();
        self.notify_content_changed();
        Ok(ClickOutcome::DropCompleted)
    }

    /// Physically moves a drag payload from its source pane's store into the
    /// player's items. `None` if the source pane has no model anymore.
    fn move_payload_into_player(&mut self, payload: &DragPayload) -> Result<Option<ItemId>> {
        match payload.source {
            Pane::PlayerItems => Ok(Some(payload.stack.item)),
            Pane::ContainerItems => {
                let Some(other) = self.other.clone() else {
                    warn!("drag source pane has no model");
                    return Ok(None);
                };
                let mut source = other.write();
                let mut target = self.trade_model.write();
                Ok(Some(source.move_item(
                    &payload.stack,
                    payload.count,
                    &mut *target,
                )?))
            }
        }
    }

    fn equipped_in_slot(&self, slot: EquipSlot) -> Option<ItemId> {
        let world = self.world.read();
        world
            .equipment(world.player())
            .into_iter()
            .find(|&(s, _)| s == slot)
            .map(|(_, item)| item)
    }

    fn play_down_sound(&self, item: ItemId) {
        let sound = self.world.read().down_sound_id(item);
        self.audio.play_sound(&sound, 1.0, 1.0);
    }

    fn is_right_hand_weapon(world: &dyn WorldModel, item: ItemId) -> bool {
        world.category(item) == Category::Weapon
            && world.equipment_slots(item).first() == Some(&EquipSlot::RightHand)
    }
}
