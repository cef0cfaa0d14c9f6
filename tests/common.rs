#![allow(dead_code)]
use std::sync::Arc;

use bartershop::config::TypeSettings;
use bartershop::container::MemoryStorage;
use bartershop::item::{ActorId, ItemStack, Location};
use bartershop::shop::{InteractionEvent, InteractionKind, InteractionRouter, ShopType};
use uuid::Uuid;

/// Router with every type enabled and no economy integration.
pub fn barter_router() -> InteractionRouter {
    InteractionRouter::new(&TypeSettings::all_enabled(false))
}

/// Creates a barter shop at a sign keyed by `n` and returns its id and storage.
pub fn open_shop(router: &InteractionRouter, owner: ActorId, n: i32) -> (Uuid, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::chest());
    let (shop_id, _) = router
        .create_shop(
            owner,
            Location::new("world", n, 65, 0),
            Location::new("world", n, 64, 0),
            ShopType::Barter,
            storage.clone(),
        )
        .expect("create shop");
    (shop_id, storage)
}

pub fn event(
    actor: Option<ActorId>,
    shop: Uuid,
    kind: InteractionKind,
    item: Option<ItemStack>,
) -> InteractionEvent {
    InteractionEvent {
        actor,
        shop,
        kind,
        item,
        sneaking: false,
    }
}

pub fn left_click(actor: ActorId, shop: Uuid, item: Option<ItemStack>) -> InteractionEvent {
    event(Some(actor), shop, InteractionKind::LeftClick, item)
}

pub fn right_click(actor: ActorId, shop: Uuid) -> InteractionEvent {
    event(Some(actor), shop, InteractionKind::RightClick, None)
}

pub fn insert(actor: ActorId, shop: Uuid, item: ItemStack) -> InteractionEvent {
    event(Some(actor), shop, InteractionKind::ItemInsert, Some(item))
}
