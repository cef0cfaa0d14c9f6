//! Rule selection for shop containers.
//!
//! The rules never pick themselves; this module looks at the shop's reference
//! item (or the storage contents) and decides which rule set to install.

use std::collections::BTreeSet;
use std::sync::Arc;

use uuid::Uuid;

use super::shop_container::ShopContainer;
use super::storage::StorageBlock;
use super::validation::ValidationRule;
use crate::item::{occupied, ItemStack, Location, Material};
use crate::shop::ShopDescriptor;

/// Rules for a reference item: none for an empty reference, unstackable-only
/// for unique items, otherwise a type lock on the item's material.
pub fn rules_for_reference(reference: Option<&ItemStack>) -> Vec<ValidationRule> {
    match occupied(reference) {
        None => Vec::new(),
        Some(item) if item.is_unstackable() => vec![ValidationRule::UnstackableOnly],
        Some(item) => vec![ValidationRule::type_lock(item.material.clone())],
    }
}

/// Rules for a configured shop. Multiple payment materials switch to a
/// multi-type rule over payments and offering; otherwise the offering is the
/// reference item. The sign type never changes the rules.
pub fn rules_for(shop: &ShopDescriptor) -> Vec<ValidationRule> {
    if shop.payment_materials().len() > 1 {
        return vec![ValidationRule::multi_type(shop.allowed_materials())];
    }
    rules_for_reference(shop.offering.as_ref())
}

pub fn empty(shop_id: Uuid, location: Location, storage: Arc<dyn StorageBlock>) -> ShopContainer {
    ShopContainer::new(shop_id, location, storage, Vec::new())
}

pub fn stackable_type_locked(
    shop_id: Uuid,
    location: Location,
    storage: Arc<dyn StorageBlock>,
    material: Material,
) -> ShopContainer {
    ShopContainer::new(
        shop_id,
        location,
        storage,
        vec![ValidationRule::type_lock(material)],
    )
}

/// Type lock derived from an item; an empty reference yields a rule-less container.
pub fn stackable_from_reference(
    shop_id: Uuid,
    location: Location,
    storage: Arc<dyn StorageBlock>,
    reference: Option<&ItemStack>,
) -> ShopContainer {
    match occupied(reference) {
        Some(item) => stackable_type_locked(shop_id, location, storage, item.material.clone()),
        None => empty(shop_id, location, storage),
    }
}

pub fn unstackable_only(
    shop_id: Uuid,
    location: Location,
    storage: Arc<dyn StorageBlock>,
) -> ShopContainer {
    ShopContainer::new(
        shop_id,
        location,
        storage,
        vec![ValidationRule::UnstackableOnly],
    )
}

pub fn multi_type(
    shop_id: Uuid,
    location: Location,
    storage: Arc<dyn StorageBlock>,
    materials: BTreeSet<Material>,
) -> ShopContainer {
    ShopContainer::new(
        shop_id,
        location,
        storage,
        vec![ValidationRule::multi_type(materials)],
    )
}

/// Picks rules from the first occupied slot of the storage, if any.
pub fn auto_detected(
    shop_id: Uuid,
    location: Location,
    storage: Arc<dyn StorageBlock>,
) -> ShopContainer {
    let contents = storage.contents();
    let first = contents.iter().find_map(|slot| occupied(slot.as_ref()));
    let rules = rules_for_reference(first);
    ShopContainer::new(shop_id, location, storage, rules)
}

/// Container for a configured shop, using [`rules_for`].
pub fn for_shop(shop: &ShopDescriptor, storage: Arc<dyn StorageBlock>) -> ShopContainer {
    ShopContainer::new(
        shop.id,
        shop.container_location.clone(),
        storage,
        rules_for(shop),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::storage::MemoryStorage;
    use crate::item::ActorId;
    use crate::shop::{ShopType, SignType};

    fn loc() -> Location {
        Location::new("world", 1, 2, 3)
    }

    #[test]
    fn reference_policy() {
        assert!(rules_for_reference(None).is_empty());
        assert_eq!(
            rules_for_reference(Some(&ItemStack::unique("BOW"))),
            vec![ValidationRule::UnstackableOnly]
        );
        assert_eq!(
            rules_for_reference(Some(&ItemStack::stackable("WHEAT", 9))),
            vec![ValidationRule::type_lock(Material::new("WHEAT"))]
        );
    }

    #[test]
    fn multiple_payments_select_multi_type() {
        let mut shop = ShopDescriptor::new(ActorId::new(), loc(), loc(), ShopType::Barter);
        shop.set_offering(ItemStack::stackable("BREAD", 4));
        shop.add_payment(ItemStack::stackable("WHEAT", 3));
        assert_eq!(
            rules_for(&shop),
            vec![ValidationRule::type_lock(Material::new("BREAD"))]
        );

        shop.add_payment(ItemStack::stackable("CARROT", 6));
        let rules = rules_for(&shop);
        assert_eq!(rules.len(), 1);
        let ValidationRule::MultiType { allowed } = &rules[0] else {
            panic!("expected multi-type rule, got {:?}", rules[0]);
        };
        assert_eq!(allowed.len(), 3);
    }

    #[test]
    fn offering_decides_rules_whatever_the_sign() {
        let mut shop = ShopDescriptor::new(ActorId::new(), loc(), loc(), ShopType::Barter);
        assert!(rules_for(&shop).is_empty());

        shop.set_offering(ItemStack::unique("TRIDENT"));
        for sign_type in SignType::ALL {
            shop.sign_type = sign_type;
            assert_eq!(rules_for(&shop), vec![ValidationRule::UnstackableOnly]);
        }

        shop.set_offering(ItemStack::stackable("SAND", 64));
        for sign_type in SignType::ALL {
            shop.sign_type = sign_type;
            assert_eq!(
                rules_for(&shop),
                vec![ValidationRule::type_lock(Material::new("SAND"))]
            );
        }
    }

    #[test]
    fn empty_reference_gives_ruleless_container() {
        let storage = Arc::new(MemoryStorage::chest());
        let container = stackable_from_reference(Uuid::new_v4(), loc(), storage, None);
        assert!(container.rules().is_empty());
    }

    #[test]
    fn auto_detection_uses_first_item() {
        let storage = Arc::new(MemoryStorage::chest());
        let container = auto_detected(Uuid::new_v4(), loc(), storage.clone());
        assert!(container.rules().is_empty());

        storage.set_slot(3, Some(ItemStack::unique("SHIELD")));
        storage.set_slot(5, Some(ItemStack::stackable("DIRT", 1)));
        let container = auto_detected(Uuid::new_v4(), loc(), storage);
        assert_eq!(container.rules(), &[ValidationRule::UnstackableOnly]);
    }
}
