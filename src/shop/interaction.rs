//! Routes sign clicks and item insertions to the session state machine and the
//! container validation chain.
//!
//! The host calls [`InteractionRouter::handle`] synchronously from its main
//! thread for every event; the returned [`Outcome`] says whether to let the
//! default handling continue and what to tell the acting player.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::descriptor::ShopDescriptor;
use super::manager::{ModeNotice, ShopManager};
use super::mode::ShopMode;
use super::types::{ShopType, SignType};
use crate::availability::TypeAvailabilityManager;
use crate::config::{Config, TypeSettings};
use crate::container::{
    factory, validate_for_actor, Actor, ContainerRegistry, StorageBlock, ValidationResult,
};
use crate::errors::ShopError;
use crate::item::{occupied, ActorId, ItemStack, Location};
use crate::logutil::{actor_label, escape_log};

/// What the host observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    LeftClick,
    RightClick,
    /// Click or shift-click of an item into the shop's storage
    ItemInsert,
    Drag,
    /// Hopper, dropper or other mechanical mover; never has an actor
    AutomatedMove,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionEvent {
    #[serde(default)]
    pub actor: Option<ActorId>,
    pub shop: Uuid,
    pub kind: InteractionKind,
    /// Item in hand (clicks) or the item being moved (inserts)
    #[serde(default)]
    pub item: Option<ItemStack>,
    #[serde(default)]
    pub sneaking: bool,
}

/// Whether the host should let the attempted action proceed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum Decision {
    Accept,
    Reject { reason: Option<String> },
}

impl From<ValidationResult> for Decision {
    fn from(result: ValidationResult) -> Self {
        match result {
            ValidationResult::Valid => Decision::Accept,
            ValidationResult::Invalid { reason, .. } => Decision::Reject {
                reason: Some(reason),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    #[serde(flatten)]
    pub decision: Decision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<ModeNotice>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
    /// True when this interaction removed the shop
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub deleted: bool,
}

impl Outcome {
    pub fn accept() -> Self {
        Self {
            decision: Decision::Accept,
            notice: None,
            messages: Vec::new(),
            deleted: false,
        }
    }

    pub fn from_result(result: ValidationResult) -> Self {
        Self {
            decision: result.into(),
            ..Self::accept()
        }
    }

    fn message(mut self, text: impl Into<String>) -> Self {
        self.messages.push(text.into());
        self
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self.decision, Decision::Accept)
    }

    pub fn reason(&self) -> Option<&str> {
        match &self.decision {
            Decision::Accept => None,
            Decision::Reject { reason } => reason.as_deref(),
        }
    }
}

const HELP_LINES: [&str; 3] = [
    "Right-click cycles SETUP > TYPE > BOARD > HELP > DELETE.",
    "Left-click performs the current mode's action.",
    "Customers deposit payment items into the shop chest.",
];

/// Owns the shop registry, the session registry and the container registry,
/// and applies interaction events to them.
pub struct InteractionRouter {
    sessions: ShopManager,
    containers: ContainerRegistry,
    shops: Arc<RwLock<HashMap<Uuid, ShopDescriptor>>>,
    availability: TypeAvailabilityManager,
    /// Shop id -> when its deletion was armed
    pending_deletions: Arc<RwLock<HashMap<Uuid, DateTime<Utc>>>>,
    delete_confirm_window: Duration,
}

/// How long an armed deletion waits for its confirming click.
pub const DEFAULT_DELETE_CONFIRM_SECONDS: i64 = 5;

impl InteractionRouter {
    pub fn new(settings: &TypeSettings) -> Self {
        Self {
            sessions: ShopManager::new(),
            containers: ContainerRegistry::new(),
            shops: Arc::new(RwLock::new(HashMap::new())),
            availability: TypeAvailabilityManager::new(settings),
            pending_deletions: Arc::new(RwLock::new(HashMap::new())),
            delete_confirm_window: Duration::seconds(DEFAULT_DELETE_CONFIRM_SECONDS),
        }
    }

    /// Router with type availability and the delete confirmation window taken from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.type_settings())
            .with_delete_confirm_window(Duration::seconds(config.sessions.delete_confirm_seconds))
    }

    pub fn with_delete_confirm_window(mut self, window: Duration) -> Self {
        self.delete_confirm_window = window;
        self
    }

    pub fn sessions(&self) -> &ShopManager {
        &self.sessions
    }

    pub fn containers(&self) -> &ContainerRegistry {
        &self.containers
    }

    pub fn availability(&self) -> &TypeAvailabilityManager {
        &self.availability
    }

    /// Recomputes enabled types, e.g. after a config reload or the economy
    /// integration appearing.
    pub fn reload(&mut self, settings: &TypeSettings) {
        self.availability.reload(settings);
    }

    pub fn shop(&self, shop_id: &Uuid) -> Option<ShopDescriptor> {
        self.shops
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(shop_id)
            .cloned()
    }

    pub fn shop_count(&self) -> usize {
        self.shops.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn shop_at_sign(&self, sign: &Location) -> Option<ShopDescriptor> {
        self.shops
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|s| &s.sign_location == sign)
            .cloned()
    }

    fn update_shop<R>(&self, shop_id: &Uuid, f: impl FnOnce(&mut ShopDescriptor) -> R) -> Option<R> {
        let mut shops = self.shops.write().unwrap_or_else(PoisonError::into_inner);
        shops.get_mut(shop_id).map(f)
    }

    /// Registers a new shop and puts its owner's session into SETUP on it.
    ///
    /// Rules are detected from whatever the storage already holds.
    pub fn create_shop(
        &self,
        owner: ActorId,
        sign: Location,
        container_location: Location,
        shop_type: ShopType,
        storage: Arc<dyn StorageBlock>,
    ) -> Result<(Uuid, ModeNotice), ShopError> {
        if let ValidationResult::Invalid { reason, .. } = self.availability.validate_shop_type(shop_type)
        {
            return Err(ShopError::TypeUnavailable { shop_type, reason });
        }
        if self.shop_at_sign(&sign).is_some() {
            return Err(ShopError::DuplicateSign(sign.to_string()));
        }

        let mut shop = ShopDescriptor::new(owner, sign.clone(), container_location.clone(), shop_type);
        let container = factory::auto_detected(shop.id, container_location, storage.clone());
        if !container.rules().is_empty() {
            let contents = storage.contents();
            if let Some(first) = contents.iter().find_map(|slot| occupied(slot.as_ref())) {
                shop.sign_type = detected_sign_type(first);
                shop.type_detected = true;
            }
        }
        let shop_id = shop.id;

        info!(
            "Created {} shop {} at {} for {}",
            shop_type,
            shop_id,
            escape_log(&sign.to_string()),
            actor_label(Some(&owner))
        );
        self.containers.register(container);
        self.shops
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(shop_id, shop);

        self.sessions.update(owner, |session| {
            session.cleanup();
            session.set_active_sign(shop_id, sign);
        });
        let notice = self.sessions.set_session_mode(owner, ShopMode::Setup);
        Ok((shop_id, notice))
    }

    /// Removes a shop, its container, and any session configuring it.
    pub fn remove_shop(&self, shop_id: &Uuid) -> Option<ShopDescriptor> {
        let removed = self
            .shops
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(shop_id);
        self.containers.unregister(shop_id);
        self.clear_pending_deletion(shop_id);
        self.sessions.invalidate_shop(shop_id);
        if removed.is_some() {
            info!("Removed shop {}", shop_id);
        }
        removed
    }

    /// Hands a shop to a new owner and kicks the old owner out of configuration.
    pub fn transfer_ownership(&self, shop_id: &Uuid, new_owner: ActorId) -> Result<(), ShopError> {
        let old_owner = self
            .update_shop(shop_id, |shop| std::mem::replace(&mut shop.owner, new_owner))
            .ok_or(ShopError::ShopNotFound(*shop_id))?;
        let invalidated = self.sessions.invalidate_shop(shop_id);
        self.clear_pending_deletion(shop_id);
        info!(
            "Shop {} transferred from {} to {} ({} session(s) invalidated)",
            shop_id,
            actor_label(Some(&old_owner)),
            actor_label(Some(&new_owner)),
            invalidated.len()
        );
        Ok(())
    }

    /// Drops shops whose storage block is gone. Returns the removed shop ids.
    pub fn prune_stale(&self) -> Vec<Uuid> {
        let stale = self.containers.prune_invalid();
        for shop_id in &stale {
            self.remove_shop(shop_id);
        }
        stale
    }

    /// Drops sessions idle longer than `idle_timeout_minutes` along with any
    /// deletion they had armed.
    pub fn prune_idle_sessions(&self, idle_timeout_minutes: i64) -> Vec<ActorId> {
        let sessions = self.sessions.active_sessions();
        let pruned = self.sessions.prune_inactive(idle_timeout_minutes);
        for actor in &pruned {
            if let Some(shop_id) = sessions.get(actor).and_then(|s| s.active_shop()) {
                self.clear_pending_deletion(&shop_id);
            }
        }
        pruned
    }

    pub fn handle(&self, event: &InteractionEvent) -> Outcome {
        let Some(shop) = self.shop(&event.shop) else {
            debug!("Interaction for unknown shop {} ignored", event.shop);
            return Outcome::accept();
        };

        match event.kind {
            InteractionKind::LeftClick | InteractionKind::RightClick => {
                self.handle_click(event, &shop)
            }
            InteractionKind::ItemInsert | InteractionKind::Drag => {
                self.handle_insert(event.actor, event.item.as_ref(), &shop)
            }
            InteractionKind::AutomatedMove => self.handle_insert(None, event.item.as_ref(), &shop),
        }
    }

    fn handle_click(&self, event: &InteractionEvent, shop: &ShopDescriptor) -> Outcome {
        let Some(actor_id) = event.actor else {
            return Outcome::accept();
        };
        match Actor::classify(Some(actor_id), shop) {
            Actor::Owner(owner) => match event.kind {
                InteractionKind::RightClick => self.advance_mode(owner, shop),
                _ => self.perform_mode_action(owner, shop, event),
            },
            _ => Outcome::accept().message(shop.summary()),
        }
    }

    fn advance_mode(&self, owner: ActorId, shop: &ShopDescriptor) -> Outcome {
        let session = self.sessions.session(owner);
        let mode = if session.is_configuring(&shop.id) {
            session.mode().map(ShopMode::next).unwrap_or(ShopMode::Setup)
        } else {
            self.sessions.update(owner, |s| {
                s.cleanup();
                s.set_active_sign(shop.id, shop.sign_location.clone());
            });
            ShopMode::Setup
        };

        if mode != ShopMode::Delete {
            self.clear_pending_deletion(&shop.id);
        }
        let notice = self.sessions.handle_interaction(owner, mode);
        Outcome {
            notice: Some(notice),
            ..Outcome::accept()
        }
    }

    fn perform_mode_action(
        &self,
        owner: ActorId,
        shop: &ShopDescriptor,
        event: &InteractionEvent,
    ) -> Outcome {
        let session = self.sessions.session(owner);
        let mode = if session.is_configuring(&shop.id) {
            session.mode().unwrap_or(ShopMode::Board)
        } else {
            ShopMode::Board
        };

        match mode {
            ShopMode::Setup => self.setup_action(owner, shop, event),
            ShopMode::Type => self.cycle_sign_type(shop),
            ShopMode::Board => Outcome::accept().message(shop.summary()),
            ShopMode::Help => HELP_LINES
                .iter()
                .fold(Outcome::accept(), |outcome, line| outcome.message(*line)),
            ShopMode::Delete => self.delete_action(owner, shop),
        }
    }

    fn setup_action(&self, owner: ActorId, shop: &ShopDescriptor, event: &InteractionEvent) -> Outcome {
        let Some(item) = occupied(event.item.as_ref()).cloned() else {
            return Outcome::accept().message("Hold an item when clicking");
        };

        if shop.offering.is_none() {
            self.update_shop(&shop.id, |s| {
                if !s.type_detected {
                    s.sign_type = detected_sign_type(&item);
                    s.type_detected = true;
                }
                s.set_offering(item.clone());
            });
            self.sessions.update(owner, |session| {
                session.set_stack_size(item.amount);
                session.set_item_type(item.material.as_str());
            });
            self.rebuild_rules(&shop.id);
            info!(
                "[OFFERING] Shop {} set to {}x {}",
                shop.id,
                item.amount,
                escape_log(item.material.as_str())
            );
            return Outcome::accept()
                .message(format!(
                    "Offering set: {}x {}",
                    item.amount,
                    item.material.display_name()
                ))
                .message("Now set payment/price");
        }

        let outcome = if shop.shop_type.requires_economy() {
            self.update_shop(&shop.id, |s| {
                s.clear_payments();
                s.add_payment(item.clone());
            });
            Outcome::accept().message(format!("Price set: {}", item.material.display_name()))
        } else if event.sneaking {
            let removed = self
                .update_shop(&shop.id, |s| s.remove_payment(&item.material))
                .unwrap_or(false);
            if !removed {
                return Outcome::accept().message("Not in payment list");
            }
            Outcome::accept().message(format!("Removed: {}", item.material.display_name()))
        } else {
            self.update_shop(&shop.id, |s| s.add_payment(item.clone()));
            info!(
                "[PAYMENT] Shop {} accepts {}x {}",
                shop.id,
                item.amount,
                escape_log(item.material.as_str())
            );
            Outcome::accept().message(format!(
                "Payment added: {}x {}",
                item.amount,
                item.material.display_name()
            ))
        };
        self.rebuild_rules(&shop.id);
        outcome
    }

    /// Moves to the next enabled sign type. Once the shop's stackability is
    /// detected, the sign type contradicting the offering is skipped.
    fn cycle_sign_type(&self, shop: &ShopDescriptor) -> Outcome {
        let mut next = self.availability.next_sign_type(shop.sign_type);
        for _ in 0..SignType::ALL.len() {
            if sign_type_fits(shop, next) {
                break;
            }
            next = self.availability.next_sign_type(next);
        }
        if !sign_type_fits(shop, next) {
            return Outcome::accept().message(format!("Sign type locked: {}", shop.sign_type));
        }
        if next != shop.sign_type {
            self.update_shop(&shop.id, |s| {
                s.clear_payments();
                s.sign_type = next;
            });
            self.rebuild_rules(&shop.id);
            debug!("Shop {} sign type {} -> {}", shop.id, shop.sign_type, next);
        }
        Outcome::accept().message(format!("Sign type: {}", next))
    }

    fn delete_action(&self, owner: ActorId, shop: &ShopDescriptor) -> Outcome {
        let now = Utc::now();
        let armed_at = {
            let mut pending = self
                .pending_deletions
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            match pending.remove(&shop.id) {
                Some(armed_at) if now - armed_at <= self.delete_confirm_window => Some(armed_at),
                previous => {
                    pending.insert(shop.id, now);
                    if previous.is_some() {
                        debug!("Deletion confirmation for shop {} expired; re-armed", shop.id);
                    }
                    None
                }
            }
        };

        if armed_at.is_none() {
            return Outcome::accept()
                .message("Click AGAIN to confirm deletion")
                .message("Chest items will be preserved");
        }

        self.remove_shop(&shop.id);
        info!("Shop {} deleted by {}", shop.id, actor_label(Some(&owner)));
        Outcome {
            deleted: true,
            ..Outcome::accept().message("Shop deleted")
        }
    }

    fn handle_insert(
        &self,
        actor_id: Option<ActorId>,
        item: Option<&ItemStack>,
        shop: &ShopDescriptor,
    ) -> Outcome {
        let Some(stack) = occupied(item) else {
            return Outcome::accept();
        };
        let Some(container) = self.containers.get(&shop.id) else {
            debug!("Shop {} has no registered container", shop.id);
            return Outcome::accept();
        };
        let actor = Actor::classify(actor_id, shop);

        if matches!(actor, Actor::Owner(_)) && !shop.type_detected {
            return self.detect_type(shop, stack);
        }

        let result = validate_for_actor(Some(stack), actor, shop, &container);
        match result.reason() {
            Some(reason) => warn!(
                "Rejected {} from {} ({}) into shop {}: {}",
                escape_log(stack.material.as_str()),
                actor_label(actor.id().as_ref()),
                actor.role(),
                shop.id,
                escape_log(reason)
            ),
            None => debug!(
                "Accepted {} from {} ({}) into shop {}",
                escape_log(stack.material.as_str()),
                actor_label(actor.id().as_ref()),
                actor.role(),
                shop.id
            ),
        }
        Outcome::from_result(result)
    }

    /// First item an owner places into an untyped shop fixes its stackability
    /// (and becomes the offering if none is set).
    fn detect_type(&self, shop: &ShopDescriptor, item: &ItemStack) -> Outcome {
        let sign_type = detected_sign_type(item);
        self.update_shop(&shop.id, |s| {
            s.sign_type = sign_type;
            s.type_detected = true;
            if s.offering.is_none() {
                s.set_offering(item.clone());
            }
        });
        self.rebuild_rules(&shop.id);
        info!(
            "Type detection triggered: {} -> {} for shop {}",
            escape_log(item.material.as_str()),
            sign_type,
            shop.id
        );
        Outcome::accept()
            .message(format!("Shop type detected: {}", sign_type))
            .message("Type is now locked. Use DELETE mode to reset.")
    }

    fn rebuild_rules(&self, shop_id: &Uuid) {
        if let Some(shop) = self.shop(shop_id) {
            self.containers.replace_rules(shop_id, factory::rules_for(&shop));
        }
    }

    fn clear_pending_deletion(&self, shop_id: &Uuid) {
        self.pending_deletions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(shop_id);
    }

    /// True while a deletion is armed and its confirmation window is still open.
    pub fn is_deletion_pending(&self, shop_id: &Uuid) -> bool {
        self.pending_deletions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(shop_id)
            .is_some_and(|armed_at| Utc::now() - *armed_at <= self.delete_confirm_window)
    }

    /// Clears sessions and pending confirmations; used at shutdown.
    pub fn shutdown(&self) {
        self.sessions.cleanup_all();
        self.pending_deletions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Barter signs fit any shop; stackable/unstackable signs must agree with a
/// detected offering.
fn sign_type_fits(shop: &ShopDescriptor, sign_type: SignType) -> bool {
    match (sign_type, occupied(shop.offering.as_ref())) {
        (SignType::Barter, _) => true,
        (_, Some(offering)) if shop.type_detected => detected_sign_type(offering) == sign_type,
        _ => true,
    }
}

fn detected_sign_type(item: &ItemStack) -> SignType {
    if item.is_unstackable() {
        SignType::Unstackable
    } else {
        SignType::Stackable
    }
}
