//! Scripted event replay.
//!
//! Drives an [`InteractionRouter`] from a JSON script so shop behaviour can be
//! exercised without a game host. Actors and shops are referred to by
//! script-local aliases:
//!
//! ```json
//! [
//!   {"step": "create_shop", "shop": "market", "owner": "alice",
//!    "sign": {"world": "world", "x": 0, "y": 65, "z": 0},
//!    "container": {"world": "world", "x": 0, "y": 64, "z": 0},
//!    "shop_type": "BARTER"},
//!   {"step": "event", "shop": "market", "actor": "alice", "kind": "left_click",
//!    "item": {"material": "DIAMOND_SWORD", "max_stack_size": 1}},
//!   {"step": "event", "shop": "market", "actor": "bob", "kind": "item_insert",
//!    "item": {"material": "DIRT"}}
//! ]
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::config::{Config, TypeSettings};
use crate::container::MemoryStorage;
use crate::errors::ShopError;
use crate::item::{ActorId, ItemStack, Location};
use crate::shop::{InteractionEvent, InteractionKind, InteractionRouter, ShopType};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ReplayStep {
    CreateShop {
        shop: String,
        owner: String,
        sign: Location,
        container: Location,
        shop_type: ShopType,
        #[serde(default)]
        contents: Vec<ItemStack>,
    },
    Event {
        shop: String,
        #[serde(default)]
        actor: Option<String>,
        kind: InteractionKind,
        #[serde(default)]
        item: Option<ItemStack>,
        #[serde(default)]
        sneaking: bool,
    },
    Transfer {
        shop: String,
        owner: String,
    },
    Reload {
        #[serde(default)]
        config: Config,
    },
    Destroy {
        shop: String,
    },
    Prune,
}

pub fn parse_script(text: &str) -> Result<Vec<ReplayStep>, ShopError> {
    Ok(serde_json::from_str(text)?)
}

pub struct Replay {
    router: InteractionRouter,
    actors: HashMap<String, ActorId>,
    shops: HashMap<String, Uuid>,
    storages: HashMap<String, Arc<MemoryStorage>>,
}

impl Replay {
    pub fn new(settings: &TypeSettings) -> Self {
        Self::with_router(InteractionRouter::new(settings))
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_router(InteractionRouter::from_config(config))
    }

    fn with_router(router: InteractionRouter) -> Self {
        Self {
            router,
            actors: HashMap::new(),
            shops: HashMap::new(),
            storages: HashMap::new(),
        }
    }

    pub fn router(&self) -> &InteractionRouter {
        &self.router
    }

    /// Binds `alias` to an actor id, creating one on first use.
    pub fn actor(&mut self, alias: &str) -> ActorId {
        *self.actors.entry(alias.to_string()).or_default()
    }

    pub fn shop_id(&self, alias: &str) -> Option<Uuid> {
        self.shops.get(alias).copied()
    }

    pub fn run(&mut self, steps: Vec<ReplayStep>) -> Vec<Value> {
        steps.into_iter().map(|step| self.run_step(step)).collect()
    }

    pub fn run_step(&mut self, step: ReplayStep) -> Value {
        match self.apply(step) {
            Ok(value) => value,
            Err(e) => json!({ "error": e.to_string() }),
        }
    }

    fn apply(&mut self, step: ReplayStep) -> Result<Value, ShopError> {
        match step {
            ReplayStep::CreateShop {
                shop,
                owner,
                sign,
                container,
                shop_type,
                contents,
            } => {
                let owner_id = self.actor(&owner);
                let storage = Arc::new(MemoryStorage::with_items(MemoryStorage::CHEST_SLOTS, contents));
                let (shop_id, notice) =
                    self.router
                        .create_shop(owner_id, sign, container, shop_type, storage.clone())?;
                debug!("Replay bound shop alias {} to {}", shop, shop_id);
                self.shops.insert(shop.clone(), shop_id);
                self.storages.insert(shop.clone(), storage);
                Ok(json!({ "shop": shop, "created": true, "notice": notice }))
            }
            ReplayStep::Event {
                shop,
                actor,
                kind,
                item,
                sneaking,
            } => {
                let event = InteractionEvent {
                    actor: actor.as_deref().map(|alias| self.actor(alias)),
                    shop: self.shop_id(&shop).unwrap_or_else(Uuid::new_v4),
                    kind,
                    item,
                    sneaking,
                };
                Ok(serde_json::to_value(self.router.handle(&event))?)
            }
            ReplayStep::Transfer { shop, owner } => {
                let shop_id = self.shop_id(&shop).unwrap_or_else(Uuid::nil);
                let owner_id = self.actor(&owner);
                self.router.transfer_ownership(&shop_id, owner_id)?;
                Ok(json!({ "shop": shop, "owner": owner }))
            }
            ReplayStep::Reload { config } => {
                self.router.reload(&config.type_settings());
                let availability = self.router.availability();
                Ok(json!({
                    "shop_types": availability.available_shop_types(),
                    "sign_types": availability.available_sign_types(),
                }))
            }
            ReplayStep::Destroy { shop } => {
                let destroyed = match self.storages.get(&shop) {
                    Some(storage) => {
                        storage.destroy();
                        true
                    }
                    None => false,
                };
                Ok(json!({ "shop": shop, "destroyed": destroyed }))
            }
            ReplayStep::Prune => {
                let removed = self.router.prune_stale();
                let aliases: Vec<String> = self
                    .shops
                    .iter()
                    .filter(|(_, id)| removed.contains(id))
                    .map(|(alias, _)| alias.clone())
                    .collect();
                for alias in &aliases {
                    self.shops.remove(alias);
                    self.storages.remove(alias);
                }
                Ok(json!({ "pruned": aliases }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"[
        {"step": "create_shop", "shop": "forge", "owner": "alice",
         "sign": {"world": "world", "x": 0, "y": 65, "z": 0},
         "container": {"world": "world", "x": 0, "y": 64, "z": 0},
         "shop_type": "BARTER"},
        {"step": "event", "shop": "forge", "actor": "alice", "kind": "left_click",
         "item": {"material": "IRON_PICKAXE", "max_stack_size": 1}},
        {"step": "event", "shop": "forge", "actor": "alice", "kind": "left_click",
         "item": {"material": "EMERALD", "amount": 3}},
        {"step": "event", "shop": "forge", "actor": "bob", "kind": "item_insert",
         "item": {"material": "EMERALD", "amount": 3}},
        {"step": "event", "shop": "forge", "actor": "bob", "kind": "item_insert",
         "item": {"material": "COBBLESTONE"}}
    ]"#;

    #[test]
    fn script_runs_end_to_end() {
        let steps = parse_script(SCRIPT).unwrap();
        let mut replay = Replay::new(&TypeSettings::all_enabled(false));
        let out = replay.run(steps);
        assert_eq!(out.len(), 5);
        assert_eq!(out[0]["created"], true);
        assert_eq!(out[0]["notice"]["mode"], "SETUP");
        assert_eq!(out[3]["decision"], "accept");
        assert_eq!(out[4]["decision"], "reject");
        assert_eq!(out[4]["reason"], crate::container::helper::PAYMENT_ONLY_REASON);
    }

    #[test]
    fn malformed_script_is_a_json_error() {
        let err = parse_script(r#"[{"step": "teleport"}]"#).unwrap_err();
        assert!(matches!(err, ShopError::Json(_)));
        assert!(parse_script("not json").is_err());
    }

    #[test]
    fn failures_are_reported_inline() {
        let steps = parse_script(
            r#"[
            {"step": "create_shop", "shop": "s", "owner": "a",
             "sign": {"world": "w", "x": 1, "y": 1, "z": 1},
             "container": {"world": "w", "x": 1, "y": 0, "z": 1},
             "shop_type": "SELL"},
            {"step": "transfer", "shop": "missing", "owner": "b"}
        ]"#,
        )
        .unwrap();
        let mut replay = Replay::new(&TypeSettings::all_enabled(false));
        let out = replay.run(steps);
        assert!(out[0]["error"].as_str().unwrap().contains("SELL"));
        assert!(out[1]["error"].as_str().unwrap().contains("not found"));
    }

    #[test]
    fn destroyed_storage_is_pruned() {
        let steps = parse_script(
            r#"[
            {"step": "create_shop", "shop": "s", "owner": "a",
             "sign": {"world": "w", "x": 1, "y": 1, "z": 1},
             "container": {"world": "w", "x": 1, "y": 0, "z": 1},
             "shop_type": "BARTER"},
            {"step": "destroy", "shop": "s"},
            {"step": "prune"}
        ]"#,
        )
        .unwrap();
        let mut replay = Replay::new(&TypeSettings::all_enabled(false));
        let out = replay.run(steps);
        assert_eq!(out[2]["pruned"], json!(["s"]));
        assert_eq!(replay.router().shop_count(), 0);
    }

    #[test]
    fn reload_reports_enabled_types() {
        let steps = parse_script(
            r#"[{"step": "reload", "config": {"economy": {"enabled": true}}}]"#,
        )
        .unwrap();
        let mut replay = Replay::new(&TypeSettings::all_enabled(false));
        let out = replay.run(steps);
        assert_eq!(out[0]["shop_types"], json!(["BARTER", "SELL", "BUY", "ADMIN"]));
    }
}
