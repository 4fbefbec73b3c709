//! Sorting and filtering proxy over any item model.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{InventoryError, Result};
use crate::interface::{CategoryMask, ItemId, SharedWorld};

use super::item_model::ItemModel;
use super::stack::ItemStack;

/// Reorders and filters the rows of a source model without touching them.
///
/// The proxy owns a mapping from visible indices to source indices. Row data
/// always comes from the source; only the mapping is recomputed when the
/// category filter or the sort mode changes. Mutations are forwarded to the
/// source untranslated, so callers resolve visible indices through
/// [`map_to_source`](Self::map_to_source) first.
pub struct SortFilterModel<M: ItemModel> {
    source: Arc<RwLock<M>>,
    world: SharedWorld,
    category: CategoryMask,
    sort_by_type: bool,
    mapping: Vec<usize>,
}

impl<M: ItemModel> SortFilterModel<M> {
    /// Wraps a source model, showing everything, sorted by type.
    pub fn new(source: M, world: SharedWorld) -> Self {
        Self::shared(Arc::new(RwLock::new(source)), world)
    }

    /// Wraps an already shared source model.
    pub fn shared(source: Arc<RwLock<M>>, world: SharedWorld) -> Self {
        let mut model = Self {
            source,
            world,
            category: CategoryMask::ALL,
            sort_by_type: true,
            mapping: Vec::new(),
        };
        model.rebuild();
        model
    }

    /// The shared source model.
    pub fn source(&self) -> &Arc<RwLock<M>> {
        &self.source
    }

    /// The active category filter.
    pub fn category(&self) -> CategoryMask {
        self.category
    }

    /// Replaces the category filter and recomputes the mapping. The source
    /// is not refreshed; its rows did not change.
    pub fn set_category(&mut self, category: CategoryMask) {
        self.category = category;
        self.rebuild();
    }

    /// Toggles between type-sorted and source-ordered presentation.
    pub fn set_sort_by_type(&mut self, sort_by_type: bool) {
        self.sort_by_type = sort_by_type;
        self.rebuild();
    }

    /// Translates a visible index to the source model's index space.
    pub fn map_to_source(&self, index: usize) -> Result<usize> {
        self.mapping
            .get(index)
            .copied()
            .ok_or(InventoryError::IndexOutOfBounds {
                index,
                len: self.mapping.len(),
            })
    }

    fn rebuild(&mut self) {
        let source = self.source.read();
        let world = self.world.read();
        // (source index, category rank, lowercased name) per visible row.
        let mut rows: Vec<(usize, u8, String)> = Vec::new();
        for index in 0..source.item_count() {
            let Ok(stack) = source.item(index) else {
                continue;
            };
            let category = world.category(stack.item);
            if !self.category.contains(category.mask()) {
                continue;
            }
            rows.push((index, category.rank(), world.name(stack.item).to_lowercase()));
        }
        if self.sort_by_type {
            // Source index is the final tie-breaker, keeping equal rows in
            // creation order.
            rows.sort_by(|a, b| (a.1, &a.2, a.0).cmp(&(b.1, &b.2, b.0)));
        }
        self.mapping = rows.into_iter().map(|(index, _, _)| index).collect();
    }
}

impl<M: ItemModel> ItemModel for SortFilterModel<M> {
    fn item_count(&self) -> usize {
        self.mapping.len()
    }

    fn item(&self, index: usize) -> Result<ItemStack> {
        let source = self.map_to_source(index)?;
        self.source.read().item(source)
    }

    fn update(&mut self) {
        self.source.write().update();
        self.rebuild();
    }

    fn copy_item(&mut self, stack: &ItemStack, count: u32) -> Result<ItemId> {
        self.source.write().copy_item(stack, count)
    }

    fn remove_item(&mut self, stack: &ItemStack, count: u32) -> Result<u32> {
        self.source.write().remove_item(stack, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::{Category, WorldModel, shared_world};
    use crate::model::InventoryModel;
    use crate::testing::{FakeItem, FakeWorld};

    fn sample_world() -> (FakeWorld, Vec<ItemId>) {
        let fake = FakeWorld::new();
        let player = fake.player();
        let ids = vec![
            fake.insert(player, FakeItem::new("pick", "Pick", Category::Misc, 1)),
            fake.insert(player, FakeItem::new("axe", "Axe", Category::Weapon, 1)),
            fake.insert(player, FakeItem::new("robe", "Robe", Category::Apparel, 1)),
            fake.insert(player, FakeItem::new("blade", "blade", Category::Weapon, 1)),
        ];
        (fake, ids)
    }

    fn view_items(view: &SortFilterModel<InventoryModel>) -> Vec<ItemId> {
        (0..view.item_count())
            .map(|i| view.item(i).unwrap().item)
            .collect()
    }

    #[test]
    fn test_sorts_by_rank_then_case_insensitive_name() {
        let (fake, ids) = sample_world();
        let player = fake.player();
        let world = shared_world(fake);
        let view = SortFilterModel::new(InventoryModel::new(world.clone(), player), world);

        // Weapons first ("Axe" before "blade" ignoring case), then apparel,
        // then misc.
        assert_eq!(view_items(&view), vec![ids[1], ids[3], ids[2], ids[0]]);
    }

    #[test]
    fn test_source_order_when_sorting_disabled() {
        let (fake, ids) = sample_world();
        let player = fake.player();
        let world = shared_world(fake);
        let mut view = SortFilterModel::new(InventoryModel::new(world.clone(), player), world);
        view.set_sort_by_type(false);

        assert_eq!(view_items(&view), ids);
    }

    #[test]
    fn test_category_filter_hides_other_rows() {
        let (fake, ids) = sample_world();
        let player = fake.player();
        let world = shared_world(fake);
        let mut view = SortFilterModel::new(InventoryModel::new(world.clone(), player), world);
        view.set_category(CategoryMask::WEAPON);

        assert_eq!(view_items(&view), vec![ids[1], ids[3]]);

        view.set_category(CategoryMask::NONE);
        assert_eq!(view.item_count(), 0);
    }

    #[test]
    fn test_map_to_source_translates_indices() {
        let (fake, _) = sample_world();
        let player = fake.player();
        let world = shared_world(fake);
        let view = SortFilterModel::new(InventoryModel::new(world.clone(), player), world);

        // Visible row 0 is "Axe", which the source holds at index 1.
        assert_eq!(view.map_to_source(0), Ok(1));
        assert_eq!(
            view.map_to_source(9),
            Err(InventoryError::IndexOutOfBounds { index: 9, len: 4 })
        );
    }

    #[test]
    fn test_update_refreshes_source_and_mapping() {
        let (fake, _) = sample_world();
        let player = fake.player();
        let extra = FakeItem::new("amulet", "Amulet", Category::Magic, 1);
        let world = shared_world(fake.clone());
        let mut view =
            SortFilterModel::new(InventoryModel::new(world.clone(), player), world.clone());
        assert_eq!(view.item_count(), 4);

        fake.insert(player, extra);
        view.update();
        assert_eq!(view.item_count(), 5);
    }
}
