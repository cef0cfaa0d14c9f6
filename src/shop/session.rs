use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::mode::ShopMode;
use crate::item::{ActorId, Location};

/// # Shop Session
///
/// Transient interaction context for one actor. A session is created lazily on
/// the actor's first sign interaction and tracks:
///
/// - `mode` - where the actor is in the [`ShopMode`] cycle (`None` until first interaction)
/// - `active_sign` / `active_shop` - the sign being configured
/// - `stack_size` / `item_type` - setup input captured in SETUP mode
///
/// Sessions are plain values. The [`ShopManager`](super::ShopManager) hands out
/// snapshots and applies mutations under its own lock, so no two handles ever
/// mutate the same session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopSession {
    pub actor: ActorId,
    mode: Option<ShopMode>,
    active_sign: Option<Location>,
    active_shop: Option<Uuid>,
    stack_size: u32,
    item_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl ShopSession {
    pub fn new(actor: ActorId) -> Self {
        let now = Utc::now();
        Self {
            actor,
            mode: None,
            active_sign: None,
            active_shop: None,
            stack_size: 0,
            item_type: None,
            created_at: now,
            last_activity: now,
        }
    }

    pub fn mode(&self) -> Option<ShopMode> {
        self.mode
    }

    /// Sets the mode and nothing else; instructions are the caller's job.
    pub fn set_mode(&mut self, mode: ShopMode) {
        self.mode = Some(mode);
        self.touch();
    }

    pub fn active_sign(&self) -> Option<&Location> {
        self.active_sign.as_ref()
    }

    pub fn active_shop(&self) -> Option<Uuid> {
        self.active_shop
    }

    pub fn set_active_sign(&mut self, shop_id: Uuid, sign: Location) {
        self.active_shop = Some(shop_id);
        self.active_sign = Some(sign);
        self.touch();
    }

    /// Whether this session is currently bound to the given shop.
    pub fn is_configuring(&self, shop_id: &Uuid) -> bool {
        self.active_shop.as_ref() == Some(shop_id)
    }

    pub fn stack_size(&self) -> u32 {
        self.stack_size
    }

    pub fn set_stack_size(&mut self, stack_size: u32) {
        self.stack_size = stack_size;
    }

    pub fn item_type(&self) -> Option<&str> {
        self.item_type.as_deref()
    }

    pub fn set_item_type(&mut self, item_type: impl Into<String>) {
        self.item_type = Some(item_type.into());
    }

    /// Back to the just-created state: no mode, no sign, no pending input.
    pub fn cleanup(&mut self) {
        self.mode = None;
        self.active_sign = None;
        self.active_shop = None;
        self.stack_size = 0;
        self.item_type = None;
    }

    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    pub fn is_inactive(&self, timeout_minutes: i64) -> bool {
        Utc::now() - self.last_activity > chrono::Duration::minutes(timeout_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_has_no_mode() {
        let session = ShopSession::new(ActorId::new());
        assert_eq!(session.mode(), None);
        assert!(session.active_sign().is_none());
        assert_eq!(session.stack_size(), 0);
    }

    #[test]
    fn cleanup_clears_pending_input() {
        let mut session = ShopSession::new(ActorId::new());
        let shop = Uuid::new_v4();
        session.set_mode(ShopMode::Setup);
        session.set_active_sign(shop, Location::new("world", 1, 1, 1));
        session.set_stack_size(16);
        session.set_item_type("OAK_LOG");
        assert!(session.is_configuring(&shop));

        session.cleanup();
        assert_eq!(session.mode(), None);
        assert!(session.active_sign().is_none());
        assert!(!session.is_configuring(&shop));
        assert_eq!(session.stack_size(), 0);
        assert_eq!(session.item_type(), None);
    }

    #[test]
    fn inactivity_uses_last_activity() {
        let mut session = ShopSession::new(ActorId::new());
        assert!(!session.is_inactive(5));
        session.last_activity = Utc::now() - chrono::Duration::minutes(10);
        assert!(session.is_inactive(5));
        session.touch();
        assert!(!session.is_inactive(5));
    }
}
