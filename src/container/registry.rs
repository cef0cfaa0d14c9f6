use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, info};
use uuid::Uuid;

use super::shop_container::ShopContainer;
use super::validation::{ValidationResult, ValidationRule};
use crate::item::ItemStack;

/// Shop id -> container map shared between the event thread and background sweeps.
#[derive(Clone, Default)]
pub struct ContainerRegistry {
    containers: Arc<RwLock<HashMap<Uuid, ShopContainer>>>,
}

impl ContainerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the container for its shop id.
    pub fn register(&self, container: ShopContainer) {
        debug!(
            "Registered shop container {} with {} validation rules",
            container,
            container.rules().len()
        );
        let mut map = self.containers.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(container.shop_id(), container);
    }

    pub fn unregister(&self, shop_id: &Uuid) -> Option<ShopContainer> {
        let mut map = self.containers.write().unwrap_or_else(PoisonError::into_inner);
        map.remove(shop_id)
    }

    /// Snapshot of the registered container.
    pub fn get(&self, shop_id: &Uuid) -> Option<ShopContainer> {
        let map = self.containers.read().unwrap_or_else(PoisonError::into_inner);
        map.get(shop_id).cloned()
    }

    pub fn contains(&self, shop_id: &Uuid) -> bool {
        let map = self.containers.read().unwrap_or_else(PoisonError::into_inner);
        map.contains_key(shop_id)
    }

    /// Swaps the whole rule set of a registered container. Returns false if unknown.
    pub fn replace_rules(&self, shop_id: &Uuid, rules: Vec<ValidationRule>) -> bool {
        let mut map = self.containers.write().unwrap_or_else(PoisonError::into_inner);
        match map.get_mut(shop_id) {
            Some(container) => {
                debug!("Rebuilt rules for {}: {} rule(s)", container, rules.len());
                container.replace_rules(rules);
                true
            }
            None => false,
        }
    }

    /// Rule-only validation; `None` when the shop has no registered container.
    pub fn validate(&self, shop_id: &Uuid, item: Option<&ItemStack>) -> Option<ValidationResult> {
        let map = self.containers.read().unwrap_or_else(PoisonError::into_inner);
        map.get(shop_id).map(|container| container.validate(item))
    }

    pub fn monitored_count(&self) -> usize {
        self.containers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drops containers whose block no longer exists and returns their shop ids,
    /// so the caller can remove the shops themselves.
    pub fn prune_invalid(&self) -> Vec<Uuid> {
        let mut map = self.containers.write().unwrap_or_else(PoisonError::into_inner);
        let stale: Vec<Uuid> = map
            .iter()
            .filter(|(_, container)| !container.is_valid())
            .map(|(id, _)| *id)
            .collect();
        for id in &stale {
            if let Some(container) = map.remove(id) {
                info!("Pruned stale shop container {}", container);
            }
        }
        stale
    }
}
