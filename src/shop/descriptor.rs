use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{ShopType, SignType};
use crate::item::{ActorId, ItemStack, Location, Material};

/// Everything the core knows about one shop: who owns it, where it is, and
/// what it trades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopDescriptor {
    pub id: Uuid,
    pub owner: ActorId,
    pub sign_location: Location,
    pub container_location: Location,
    pub shop_type: ShopType,
    pub sign_type: SignType,
    /// What the customer receives
    pub offering: Option<ItemStack>,
    /// What the customer may pay with, at most one entry per material
    pub payments: Vec<ItemStack>,
    /// Set once stackability has been fixed by the first offering/item placed
    pub type_detected: bool,
}

impl ShopDescriptor {
    pub fn new(
        owner: ActorId,
        sign_location: Location,
        container_location: Location,
        shop_type: ShopType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            sign_location,
            container_location,
            shop_type,
            sign_type: SignType::Barter,
            offering: None,
            payments: Vec::new(),
            type_detected: false,
        }
    }

    pub fn is_owner(&self, actor: &ActorId) -> bool {
        &self.owner == actor
    }

    pub fn is_offering(&self, item: &ItemStack) -> bool {
        self.offering
            .as_ref()
            .is_some_and(|offering| offering.is_same_material(item))
    }

    pub fn is_payment_accepted(&self, item: &ItemStack) -> bool {
        self.payments.iter().any(|p| p.is_same_material(item))
    }

    pub fn payment_materials(&self) -> BTreeSet<Material> {
        self.payments.iter().map(|p| p.material.clone()).collect()
    }

    /// Payment materials plus the offering material.
    pub fn allowed_materials(&self) -> BTreeSet<Material> {
        let mut allowed = self.payment_materials();
        if let Some(offering) = &self.offering {
            allowed.insert(offering.material.clone());
        }
        allowed
    }

    pub fn set_offering(&mut self, item: ItemStack) {
        self.offering = Some(item);
    }

    /// Adds a payment option, replacing an existing one of the same material.
    pub fn add_payment(&mut self, item: ItemStack) {
        match self.payments.iter_mut().find(|p| p.is_same_material(&item)) {
            Some(existing) => *existing = item,
            None => self.payments.push(item),
        }
    }

    pub fn remove_payment(&mut self, material: &Material) -> bool {
        let before = self.payments.len();
        self.payments.retain(|p| &p.material != material);
        self.payments.len() != before
    }

    pub fn clear_payments(&mut self) {
        self.payments.clear();
    }

    /// One-line description shown to customers and on the owner's BOARD view.
    pub fn summary(&self) -> String {
        let offering = match &self.offering {
            Some(item) => format!("{}x {}", item.amount, item.material.display_name()),
            None => "nothing yet".to_string(),
        };
        if self.payments.is_empty() {
            return format!("[{}] Offering {} (no price set)", self.sign_type, offering);
        }
        let payments: Vec<String> = self
            .payments
            .iter()
            .map(|p| format!("{}x {}", p.amount, p.material.display_name()))
            .collect();
        format!(
            "[{}] Offering {} for {}",
            self.sign_type,
            offering,
            payments.join(" or ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shop() -> ShopDescriptor {
        ShopDescriptor::new(
            ActorId::new(),
            Location::new("world", 10, 64, 10),
            Location::new("world", 10, 63, 10),
            ShopType::Barter,
        )
    }

    #[test]
    fn payments_are_unique_per_material() {
        let mut shop = shop();
        shop.add_payment(ItemStack::stackable("DIAMOND", 2));
        shop.add_payment(ItemStack::stackable("DIAMOND", 5));
        shop.add_payment(ItemStack::stackable("EMERALD", 1));
        assert_eq!(shop.payments.len(), 2);
        assert_eq!(shop.payments[0].amount, 5);

        assert!(shop.remove_payment(&Material::new("DIAMOND")));
        assert!(!shop.remove_payment(&Material::new("DIAMOND")));
        assert!(!shop.is_payment_accepted(&ItemStack::stackable("DIAMOND", 1)));
    }

    #[test]
    fn allowed_materials_union_offering_and_payments() {
        let mut shop = shop();
        shop.set_offering(ItemStack::unique("TRIDENT"));
        shop.add_payment(ItemStack::stackable("GOLD_INGOT", 8));
        let allowed: Vec<_> = shop
            .allowed_materials()
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(allowed, vec!["GOLD_INGOT", "TRIDENT"]);
        assert!(shop.is_offering(&ItemStack::unique("TRIDENT")));
    }

    #[test]
    fn summary_mentions_offering_and_price() {
        let mut shop = shop();
        assert!(shop.summary().contains("nothing yet"));
        shop.set_offering(ItemStack::stackable("OAK_LOG", 16));
        shop.add_payment(ItemStack::stackable("EMERALD", 1));
        assert_eq!(shop.summary(), "[BARTER] Offering 16x oak log for 1x emerald");
    }
}
