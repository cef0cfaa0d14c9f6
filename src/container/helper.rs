//! Role-aware validation: the same item may be fine for the owner and
//! forbidden for a customer.

use super::shop_container::ShopContainer;
use super::validation::ValidationResult;
use crate::item::{occupied, ActorId, ItemStack};
use crate::shop::ShopDescriptor;

pub const OFFERING_DEPOSIT_REASON: &str =
    "Can't place the offering here - that's what you would receive!";
pub const PAYMENT_ONLY_REASON: &str = "Only payment items are allowed in this shop";

/// Who is putting an item into a shop's storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Owner(ActorId),
    Customer(ActorId),
    /// Hoppers, droppers and other mechanical movers
    Automated,
}

impl Actor {
    /// Classifies an optional acting player against the shop's registered owner.
    pub fn classify(player: Option<ActorId>, shop: &ShopDescriptor) -> Self {
        match player {
            None => Actor::Automated,
            Some(id) if shop.is_owner(&id) => Actor::Owner(id),
            Some(id) => Actor::Customer(id),
        }
    }

    pub fn id(&self) -> Option<ActorId> {
        match self {
            Actor::Owner(id) | Actor::Customer(id) => Some(*id),
            Actor::Automated => None,
        }
    }

    pub fn role(&self) -> &'static str {
        match self {
            Actor::Owner(_) => "owner",
            Actor::Customer(_) => "customer",
            Actor::Automated => "automated",
        }
    }
}

/// Decides whether `item` may enter `container` when `actor` places it.
///
/// Automated movers get the container rules as-is. Owners may always restock
/// the offering or drop in payment items, and otherwise fall back to the
/// container rules. Customers may only deposit payment items.
pub fn validate_for_actor(
    item: Option<&ItemStack>,
    actor: Actor,
    shop: &ShopDescriptor,
    container: &ShopContainer,
) -> ValidationResult {
    let Some(stack) = occupied(item) else {
        return ValidationResult::success();
    };

    match actor {
        Actor::Automated => container.validate(Some(stack)),
        Actor::Owner(_) => {
            if shop.is_offering(stack) || shop.is_payment_accepted(stack) {
                ValidationResult::success()
            } else {
                container.validate(Some(stack))
            }
        }
        Actor::Customer(_) => {
            if shop.is_payment_accepted(stack) {
                ValidationResult::success()
            } else if shop.is_offering(stack) {
                ValidationResult::failure(OFFERING_DEPOSIT_REASON, Some(stack))
            } else {
                ValidationResult::failure(PAYMENT_ONLY_REASON, Some(stack))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::factory;
    use crate::container::storage::MemoryStorage;
    use crate::item::Location;
    use crate::shop::ShopType;
    use std::sync::Arc;

    fn setup() -> (ShopDescriptor, ShopContainer) {
        let mut shop = ShopDescriptor::new(
            ActorId::new(),
            Location::new("world", 0, 70, 0),
            Location::new("world", 0, 69, 0),
            ShopType::Barter,
        );
        shop.set_offering(ItemStack::stackable("COOKED_BEEF", 8));
        shop.add_payment(ItemStack::stackable("IRON_INGOT", 2));
        let container = factory::for_shop(&shop, Arc::new(MemoryStorage::chest()));
        (shop, container)
    }

    #[test]
    fn classify_by_ownership() {
        let (shop, _) = setup();
        assert_eq!(Actor::classify(None, &shop), Actor::Automated);
        assert_eq!(Actor::classify(Some(shop.owner), &shop), Actor::Owner(shop.owner));
        let stranger = ActorId::new();
        assert_eq!(Actor::classify(Some(stranger), &shop), Actor::Customer(stranger));
        assert_eq!(Actor::Automated.id(), None);
    }

    #[test]
    fn owner_and_customer_diverge_on_offering() {
        let (shop, container) = setup();
        let owner = Actor::Owner(shop.owner);
        let customer = Actor::Customer(ActorId::new());
        let beef = ItemStack::stackable("COOKED_BEEF", 8);
        let iron = ItemStack::stackable("IRON_INGOT", 2);
        let dirt = ItemStack::stackable("DIRT", 1);

        assert!(validate_for_actor(Some(&beef), owner, &shop, &container).is_valid());
        let rejected = validate_for_actor(Some(&beef), customer, &shop, &container);
        assert_eq!(rejected.reason(), Some(OFFERING_DEPOSIT_REASON));

        assert!(validate_for_actor(Some(&iron), owner, &shop, &container).is_valid());
        assert!(validate_for_actor(Some(&iron), customer, &shop, &container).is_valid());

        assert!(!validate_for_actor(Some(&dirt), owner, &shop, &container).is_valid());
        let rejected = validate_for_actor(Some(&dirt), customer, &shop, &container);
        assert_eq!(rejected.reason(), Some(PAYMENT_ONLY_REASON));
    }

    #[test]
    fn automated_movers_use_container_rules() {
        let (shop, container) = setup();
        let beef = ItemStack::stackable("COOKED_BEEF", 8);
        let iron = ItemStack::stackable("IRON_INGOT", 2);
        assert!(validate_for_actor(Some(&beef), Actor::Automated, &shop, &container).is_valid());
        // The type lock is on the offering, so a hopper can't feed payments in.
        assert!(!validate_for_actor(Some(&iron), Actor::Automated, &shop, &container).is_valid());
    }

    #[test]
    fn empty_item_is_accepted_for_everyone() {
        let (shop, container) = setup();
        let customer = Actor::Customer(ActorId::new());
        assert!(validate_for_actor(None, customer, &shop, &container).is_valid());
    }
}
