//! Physical storage seam.
//!
//! The host world owns chests and barrels; the core only needs to read their
//! slots and ask whether the block is still a container.

use std::sync::{PoisonError, RwLock};

use crate::item::ItemStack;

/// Read-only view of the block a shop container is bound to.
pub trait StorageBlock: Send + Sync {
    /// Every slot in inventory order, `None` for empty slots.
    fn contents(&self) -> Vec<Option<ItemStack>>;

    /// False once the block has been broken or replaced by a non-container.
    fn is_container(&self) -> bool;
}

/// In-process storage block used by the replay driver and tests.
#[derive(Debug)]
pub struct MemoryStorage {
    slots: RwLock<Vec<Option<ItemStack>>>,
    present: RwLock<bool>,
}

impl MemoryStorage {
    /// A single chest has 27 slots.
    pub const CHEST_SLOTS: usize = 27;

    pub fn new(size: usize) -> Self {
        Self {
            slots: RwLock::new(vec![None; size]),
            present: RwLock::new(true),
        }
    }

    pub fn chest() -> Self {
        Self::new(Self::CHEST_SLOTS)
    }

    pub fn with_items<I>(size: usize, items: I) -> Self
    where
        I: IntoIterator<Item = ItemStack>,
    {
        let storage = Self::new(size);
        for item in items {
            storage.insert(item);
        }
        storage
    }

    /// Puts the stack in the first empty slot. Returns false when full.
    pub fn insert(&self, item: ItemStack) -> bool {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        match slots.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(item);
                true
            }
            None => false,
        }
    }

    pub fn set_slot(&self, index: usize, item: Option<ItemStack>) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = slots.get_mut(index) {
            *slot = item;
        }
    }

    pub fn clear(&self) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        slots.iter_mut().for_each(|slot| *slot = None);
    }

    /// Simulates the block being broken.
    pub fn destroy(&self) {
        *self.present.write().unwrap_or_else(PoisonError::into_inner) = false;
    }
}

impl StorageBlock for MemoryStorage {
    fn contents(&self) -> Vec<Option<ItemStack>> {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn is_container(&self) -> bool {
        *self.present.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_fills_first_free_slot_until_full() {
        let storage = MemoryStorage::new(2);
        assert!(storage.insert(ItemStack::stackable("DIRT", 1)));
        assert!(storage.insert(ItemStack::stackable("STONE", 1)));
        assert!(!storage.insert(ItemStack::stackable("SAND", 1)));

        storage.set_slot(0, None);
        assert!(storage.insert(ItemStack::stackable("SAND", 1)));
        let contents = storage.contents();
        assert_eq!(contents[0].as_ref().unwrap().material.as_str(), "SAND");
    }

    #[test]
    fn destroy_marks_block_gone() {
        let storage = MemoryStorage::chest();
        assert!(storage.is_container());
        storage.destroy();
        assert!(!storage.is_container());
    }
}
