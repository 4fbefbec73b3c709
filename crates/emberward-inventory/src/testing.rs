//! In-memory fakes of the collaborator contracts, shared by the unit tests.
//!
//! Every fake is a cheap `Clone` over an `Arc`; tests keep one handle for
//! inspection and hand the other to the code under test.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::SlotMap;

use crate::interface::{
    AudioSink, Category, CharacterPreview, EquipSlot, HolderId, ItemId, Mechanics, ScriptRuntime,
    ServiceMask, WorldModel,
};

/// Blueprint for one item instance inserted into a [`FakeWorld`].
#[derive(Debug, Clone)]
pub struct FakeItem {
    pub def: String,
    pub name: String,
    pub category: Category,
    pub count: u32,
    pub weight: f32,
    pub bound: bool,
    pub carriable: bool,
    pub script: Option<String>,
    pub slots: Vec<EquipSlot>,
}

impl FakeItem {
    pub fn new(def: &str, name: &str, category: Category, count: u32) -> Self {
        Self {
            def: def.to_owned(),
            name: name.to_owned(),
            category,
            count,
            weight: 1.0,
            bound: false,
            carriable: true,
            script: None,
            slots: Vec::new(),
        }
    }

    pub fn weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn bound(mut self) -> Self {
        self.bound = true;
        self
    }

    pub fn not_carriable(mut self) -> Self {
        self.carriable = false;
        self
    }

    pub fn script(mut self, script: &str) -> Self {
        self.script = Some(script.to_owned());
        self
    }

    pub fn slots(mut self, slots: &[EquipSlot]) -> Self {
        self.slots = slots.to_vec();
        self
    }
}

struct Instance {
    spec: FakeItem,
    holder: Option<HolderId>,
}

#[derive(Default)]
struct WorldState {
    items: SlotMap<ItemId, ()>,
    instances: HashMap<ItemId, Instance>,
    holders: SlotMap<HolderId, ()>,
    order: HashMap<HolderId, Vec<ItemId>>,
    equipment: HashMap<HolderId, Vec<(EquipSlot, ItemId)>>,
    capacity: HashMap<HolderId, f32>,
    player: Option<HolderId>,
    used: Vec<(ItemId, HolderId)>,
    invisibility_broken: Vec<HolderId>,
}

impl WorldState {
    fn new_holder(&mut self) -> HolderId {
        let holder = self.holders.insert(());
        self.order.insert(holder, Vec::new());
        self.equipment.insert(holder, Vec::new());
        holder
    }

    fn insert(&mut self, holder: Option<HolderId>, spec: FakeItem) -> ItemId {
        let id = self.items.insert(());
        self.instances.insert(id, Instance { spec, holder });
        if let Some(holder) = holder {
            self.order.get_mut(&holder).unwrap().push(id);
        }
        id
    }

    fn is_equipped(&self, item: ItemId) -> bool {
        self.equipment
            .values()
            .any(|slots| slots.iter().any(|&(_, worn)| worn == item))
    }

    /// The earliest loose stack in `holder` of the same definition, if any.
    fn merge_target(&self, holder: HolderId, def: &str, skip: ItemId) -> Option<ItemId> {
        self.order[&holder]
            .iter()
            .copied()
            .find(|&other| {
                other != skip
                    && !self.is_equipped(other)
                    && self.instances[&other].spec.count > 0
                    && self.instances[&other].spec.def == def
            })
    }

    fn drop_instance(&mut self, item: ItemId) {
        if let Some(holder) = self.instances[&item].holder {
            self.order.get_mut(&holder).unwrap().retain(|&i| i != item);
        }
        self.instances.get_mut(&item).unwrap().spec.count = 0;
    }

    fn store(&mut self, item: ItemId, holder: HolderId) -> ItemId {
        let def = self.instances[&item].spec.def.clone();
        if let Some(target) = self.merge_target(holder, &def, item) {
            let moved = self.instances[&item].spec.count;
            self.drop_instance(item);
            self.instances.get_mut(&target).unwrap().spec.count += moved;
            return target;
        }
        if let Some(old) = self.instances[&item].holder {
            self.order.get_mut(&old).unwrap().retain(|&i| i != item);
        }
        self.instances.get_mut(&item).unwrap().holder = Some(holder);
        self.order.get_mut(&holder).unwrap().push(item);
        item
    }
}

/// An in-memory [`WorldModel`] with stack merging and spilling semantics.
#[derive(Clone, Default)]
pub struct FakeWorld {
    inner: Arc<Mutex<WorldState>>,
}

impl FakeWorld {
    /// Creates a world with a player actor already present.
    pub fn new() -> Self {
        let world = Self::default();
        let player = world.inner.lock().new_holder();
        world.inner.lock().player = Some(player);
        world
    }

    pub fn new_holder(&self) -> HolderId {
        self.inner.lock().new_holder()
    }

    /// Inserts an item into a holder's store. Does not merge; tests control
    /// the exact instance layout.
    pub fn insert(&self, holder: HolderId, spec: FakeItem) -> ItemId {
        self.inner.lock().insert(Some(holder), spec)
    }

    /// Places an item loose in the world, outside any holder.
    pub fn place_in_world(&self, spec: FakeItem) -> ItemId {
        self.inner.lock().insert(None, spec)
    }

    /// Equips an item into a slot, replacing any previous occupant.
    pub fn equip(&self, actor: HolderId, item: ItemId, slot: EquipSlot) {
        let mut state = self.inner.lock();
        let slots = state.equipment.get_mut(&actor).unwrap();
        slots.retain(|&(s, _)| s != slot);
        slots.push((slot, item));
    }

    pub fn set_capacity(&self, actor: HolderId, capacity: f32) {
        self.inner.lock().capacity.insert(actor, capacity);
    }

    /// Items used so far, oldest first.
    pub fn used(&self) -> Vec<(ItemId, HolderId)> {
        self.inner.lock().used.clone()
    }

    pub fn invisibility_broken(&self) -> Vec<HolderId> {
        self.inner.lock().invisibility_broken.clone()
    }
}

impl WorldModel for FakeWorld {
    fn player(&self) -> HolderId {
        self.inner.lock().player.expect("fake world has a player")
    }

    fn items_in(&self, holder: HolderId) -> Vec<ItemId> {
        self.inner.lock().order.get(&holder).cloned().unwrap_or_default()
    }

    fn item_count(&self, item: ItemId) -> u32 {
        self.inner
            .lock()
            .instances
            .get(&item)
            .map_or(0, |i| i.spec.count)
    }

    fn name(&self, item: ItemId) -> String {
        self.inner.lock().instances[&item].spec.name.clone()
    }

    fn weight(&self, item: ItemId) -> f32 {
        self.inner.lock().instances[&item].spec.weight
    }

    fn category(&self, item: ItemId) -> Category {
        self.inner.lock().instances[&item].spec.category
    }

    fn def_id(&self, item: ItemId) -> String {
        self.inner.lock().instances[&item].spec.def.clone()
    }

    fn is_bound(&self, item: ItemId) -> bool {
        self.inner.lock().instances[&item].spec.bound
    }

    fn is_carriable(&self, item: ItemId) -> bool {
        self.inner.lock().instances[&item].spec.carriable
    }

    fn script(&self, item: ItemId) -> Option<String> {
        self.inner.lock().instances[&item].spec.script.clone()
    }

    fn down_sound_id(&self, item: ItemId) -> String {
        format!("down {}", self.inner.lock().instances[&item].spec.def)
    }

    fn equipment_slots(&self, item: ItemId) -> Vec<EquipSlot> {
        self.inner.lock().instances[&item].spec.slots.clone()
    }

    fn equipment(&self, holder: HolderId) -> Vec<(EquipSlot, ItemId)> {
        self.inner
            .lock()
            .equipment
            .get(&holder)
            .cloned()
            .unwrap_or_default()
    }

    fn use_item(&mut self, item: ItemId, actor: HolderId) {
        let mut state = self.inner.lock();
        state.used.push((item, actor));
        let primary = state.instances[&item].spec.slots.first().copied();
        if let Some(slot) = primary {
            let slots = state.equipment.get_mut(&actor).unwrap();
            slots.retain(|&(s, _)| s != slot);
            slots.push((slot, item));
        }
    }

    fn unequip(&mut self, item: ItemId, actor: HolderId) -> ItemId {
        let mut state = self.inner.lock();
        state
            .equipment
            .get_mut(&actor)
            .unwrap()
            .retain(|&(_, worn)| worn != item);
        let def = state.instances[&item].spec.def.clone();
        match state.merge_target(actor, &def, item) {
            Some(target) => {
                let freed = state.instances[&item].spec.count;
                state.drop_instance(item);
                state.instances.get_mut(&target).unwrap().spec.count += freed;
                target
            }
            None => item,
        }
    }

    fn add_copy(&mut self, item: ItemId, count: u32, holder: HolderId) -> ItemId {
        let mut state = self.inner.lock();
        let def = state.instances[&item].spec.def.clone();
        if let Some(target) = state.merge_target(holder, &def, item) {
            state.instances.get_mut(&target).unwrap().spec.count += count;
            return target;
        }
        let mut spec = state.instances[&item].spec.clone();
        spec.count = count;
        state.insert(Some(holder), spec)
    }

    fn remove(&mut self, item: ItemId, count: u32) -> u32 {
        let mut state = self.inner.lock();
        let Some(holder) = state.instances.get(&item).and_then(|i| i.holder) else {
            return 0;
        };
        let def = state.instances[&item].spec.def.clone();
        let mut remaining = count;
        let mut from = item;
        while remaining > 0 {
            let held = state.instances[&from].spec.count;
            let taken = held.min(remaining);
            remaining -= taken;
            if taken == held {
                state.drop_instance(from);
            } else {
                state.instances.get_mut(&from).unwrap().spec.count -= taken;
            }
            match state.merge_target(holder, &def, from) {
                Some(next) if remaining > 0 => from = next,
                _ => break,
            }
        }
        count - remaining
    }

    fn capacity(&self, actor: HolderId) -> f32 {
        self.inner.lock().capacity.get(&actor).copied().unwrap_or(100.0)
    }

    fn encumbrance(&self, actor: HolderId) -> f32 {
        let state = self.inner.lock();
        state.order[&actor]
            .iter()
            .map(|item| {
                let spec = &state.instances[item].spec;
                spec.weight * spec.count as f32
            })
            .sum()
    }

    fn armor_rating(&self, _actor: HolderId) -> f32 {
        12.0
    }

    fn can_sell(&self, item: ItemId, services: ServiceMask) -> bool {
        let wanted = match self.inner.lock().instances[&item].spec.category {
            Category::Weapon => ServiceMask::WEAPONS,
            Category::Apparel => ServiceMask::ARMOR | ServiceMask::CLOTHING,
            Category::Magic => ServiceMask::MAGIC_GOODS,
            Category::Misc | Category::Other => ServiceMask::MISC_GOODS,
        };
        services.intersects(wanted)
    }

    fn take_from_world(&mut self, object: ItemId, actor: HolderId) -> ItemId {
        self.inner.lock().store(object, actor)
    }

    fn break_invisibility(&mut self, actor: HolderId) {
        self.inner.lock().invisibility_broken.push(actor);
    }
}

/// Records every sound played.
#[derive(Clone, Default)]
pub struct RecordingAudio {
    played: Arc<Mutex<Vec<(String, f32, f32)>>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<(String, f32, f32)> {
        self.played.lock().clone()
    }

    pub fn sound_ids(&self) -> Vec<String> {
        self.played.lock().iter().map(|(id, _, _)| id.clone()).collect()
    }
}

impl AudioSink for RecordingAudio {
    fn play_sound(&self, id: &str, volume: f32, pitch: f32) {
        self.played.lock().push((id.to_owned(), volume, pitch));
    }
}

type RunHook = Box<dyn FnMut(&mut HashMap<(ItemId, String, String), i32>, &str, ItemId) + Send>;

#[derive(Default)]
struct ScriptState {
    locals: HashMap<(ItemId, String, String), i32>,
    runs: Vec<(String, ItemId)>,
    on_run: Option<RunHook>,
}

/// A scripting runtime whose scripts are programmable closures over the
/// local variable store.
#[derive(Clone, Default)]
pub struct FakeScripts {
    inner: Arc<Mutex<ScriptState>>,
}

impl FakeScripts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a hook invoked on every `run`, in place of real script
    /// execution.
    pub fn on_run(
        &self,
        hook: impl FnMut(&mut HashMap<(ItemId, String, String), i32>, &str, ItemId) + Send + 'static,
    ) {
        self.inner.lock().on_run = Some(Box::new(hook));
    }

    pub fn runs(&self) -> Vec<(String, ItemId)> {
        self.inner.lock().runs.clone()
    }

    pub fn get_local(&self, item: ItemId, script: &str, name: &str) -> i32 {
        self.local_int(item, script, name)
    }
}

impl ScriptRuntime for FakeScripts {
    fn run(&mut self, script: &str, item: ItemId) {
        let mut state = self.inner.lock();
        state.runs.push((script.to_owned(), item));
        if let Some(mut hook) = state.on_run.take() {
            hook(&mut state.locals, script, item);
            state.on_run = Some(hook);
        }
    }

    fn local_int(&self, item: ItemId, script: &str, name: &str) -> i32 {
        self.inner
            .lock()
            .locals
            .get(&(item, script.to_owned(), name.to_owned()))
            .copied()
            .unwrap_or(0)
    }

    fn set_local_int(&mut self, item: ItemId, script: &str, name: &str, value: i32) {
        self.inner
            .lock()
            .locals
            .insert((item, script.to_owned(), name.to_owned()), value);
    }
}

#[derive(Default)]
struct PreviewState {
    slot_response: Option<EquipSlot>,
    queries: Vec<(i32, i32)>,
    resizes: Vec<(u32, u32)>,
    updates: usize,
}

/// A character preview that answers every hit-test with one configured slot.
#[derive(Clone, Default)]
pub struct FakePreview {
    inner: Arc<Mutex<PreviewState>>,
}

impl FakePreview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_with(&self, slot: Option<EquipSlot>) {
        self.inner.lock().slot_response = slot;
    }

    pub fn queries(&self) -> Vec<(i32, i32)> {
        self.inner.lock().queries.clone()
    }

    pub fn resizes(&self) -> Vec<(u32, u32)> {
        self.inner.lock().resizes.clone()
    }

    pub fn update_count(&self) -> usize {
        self.inner.lock().updates
    }
}

impl CharacterPreview for FakePreview {
    fn slot_selected(&self, x: i32, y: i32) -> Option<EquipSlot> {
        let mut state = self.inner.lock();
        state.queries.push((x, y));
        state.slot_response
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.inner.lock().resizes.push((width, height));
    }

    fn update(&mut self) {
        self.inner.lock().updates += 1;
    }
}

#[derive(Default)]
struct MechanicsState {
    magic_updates: Vec<HolderId>,
    taken: Vec<(HolderId, ItemId, u32)>,
    effects_changed: usize,
}

/// Records every mechanics notification.
#[derive(Clone, Default)]
pub struct FakeMechanics {
    inner: Arc<Mutex<MechanicsState>>,
}

impl FakeMechanics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn magic_updates(&self) -> Vec<HolderId> {
        self.inner.lock().magic_updates.clone()
    }

    pub fn taken(&self) -> Vec<(HolderId, ItemId, u32)> {
        self.inner.lock().taken.clone()
    }

    pub fn effects_changed_count(&self) -> usize {
        self.inner.lock().effects_changed
    }
}

impl Mechanics for FakeMechanics {
    fn update_magic_effects(&mut self, actor: HolderId) {
        self.inner.lock().magic_updates.push(actor);
    }

    fn item_taken(&mut self, actor: HolderId, item: ItemId, count: u32) {
        self.inner.lock().taken.push((actor, item, count));
    }

    fn effects_changed(&mut self) {
        self.inner.lock().effects_changed += 1;
    }
}
