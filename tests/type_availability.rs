//! Enabled shop/sign types after configuration and economy constraints.

use bartershop::availability::TypeAvailabilityManager;
use bartershop::config::Config;
use bartershop::errors::ShopError;
use bartershop::item::{ActorId, Location};
use bartershop::shop::{InteractionRouter, ShopType, SignType};
use bartershop::container::MemoryStorage;
use std::sync::Arc;

fn manager(toml: &str) -> TypeAvailabilityManager {
    let config = Config::from_toml_str(toml).expect("config");
    TypeAvailabilityManager::new(&config.type_settings())
}

#[test]
fn everything_disabled_still_leaves_barter() {
    let m = manager(
        r#"
        [shop_types]
        barter = false
        sell = false
        buy = false
        admin = false

        [sign_types]
        stackable = false
        unstackable = false
        barter = false
        "#,
    );
    assert_eq!(m.available_shop_types().len(), 1);
    assert!(m.is_shop_type_available(ShopType::Barter));
    assert_eq!(m.available_sign_types().len(), 1);
    assert!(m.is_sign_type_available(SignType::Barter));
}

#[test]
fn economy_capability_gates_sell_and_buy() {
    let without = manager("");
    assert!(!without.is_shop_type_available(ShopType::Sell));
    assert!(!without.is_shop_type_available(ShopType::Buy));

    let with = manager("[economy]\nenabled = true\n");
    assert!(with.is_shop_type_available(ShopType::Sell));
    assert!(with.is_shop_type_available(ShopType::Buy));
}

#[test]
fn sign_type_cycle_skips_disabled() {
    let m = manager("[sign_types]\nunstackable = false\n");
    assert_eq!(m.next_sign_type(SignType::Stackable), SignType::Barter);
    assert_eq!(m.next_sign_type(SignType::Barter), SignType::Stackable);
    // Disabled current type jumps to the first enabled one
    assert_eq!(m.next_sign_type(SignType::Unstackable), SignType::Stackable);
}

#[test]
fn reload_makes_sell_creatable() {
    let mut router = InteractionRouter::new(&Config::default().type_settings());
    let attempt = |router: &InteractionRouter, x| {
        router.create_shop(
            ActorId::new(),
            Location::new("world", x, 65, 0),
            Location::new("world", x, 64, 0),
            ShopType::Sell,
            Arc::new(MemoryStorage::chest()),
        )
    };
    match attempt(&router, 0) {
        Err(ShopError::TypeUnavailable { reason, .. }) => assert!(reason.contains("economy")),
        other => panic!("expected TypeUnavailable, got {:?}", other.map(|(id, _)| id)),
    }

    let mut config = Config::default();
    config.economy.enabled = true;
    router.reload(&config.type_settings());
    assert!(attempt(&router, 1).is_ok());
}
