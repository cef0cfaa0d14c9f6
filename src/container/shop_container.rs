use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::storage::StorageBlock;
use super::validation::{ValidationResult, ValidationRule};
use crate::item::{occupied, ItemStack, Location};

/// A storage block bound to a shop, with the rules that decide what may enter it.
///
/// Rules are evaluated in insertion order and the first rejection wins. With no
/// rules everything is accepted, which is the state of a shop whose offering has
/// not been chosen yet.
#[derive(Clone)]
pub struct ShopContainer {
    shop_id: Uuid,
    location: Location,
    rules: Vec<ValidationRule>,
    created_at: DateTime<Utc>,
    storage: Arc<dyn StorageBlock>,
}

impl ShopContainer {
    pub fn new(
        shop_id: Uuid,
        location: Location,
        storage: Arc<dyn StorageBlock>,
        rules: Vec<ValidationRule>,
    ) -> Self {
        Self {
            shop_id,
            location,
            rules,
            created_at: Utc::now(),
            storage,
        }
    }

    pub fn shop_id(&self) -> Uuid {
        self.shop_id
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.created_at
    }

    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    pub fn storage(&self) -> &Arc<dyn StorageBlock> {
        &self.storage
    }

    pub fn validate(&self, item: Option<&ItemStack>) -> ValidationResult {
        self.rules
            .iter()
            .map(|rule| rule.validate(item))
            .find(|result| !result.is_valid())
            .unwrap_or(ValidationResult::Valid)
    }

    /// Re-checks every occupied slot of the backing storage.
    pub fn validate_all(&self) -> ValidationResult {
        self.storage
            .contents()
            .iter()
            .filter_map(|slot| occupied(slot.as_ref()))
            .map(|item| self.validate(Some(item)))
            .find(|result| !result.is_valid())
            .unwrap_or(ValidationResult::Valid)
    }

    pub fn add_rule(&mut self, rule: ValidationRule) {
        self.rules.push(rule);
    }

    /// Removes every rule equal to `rule`; returns whether anything was removed.
    pub fn remove_rule(&mut self, rule: &ValidationRule) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r != rule);
        self.rules.len() != before
    }

    pub fn clear_rules(&mut self) {
        self.rules.clear();
    }

    /// Installs a whole new rule set, used when the shop's type changes.
    pub fn replace_rules(&mut self, rules: Vec<ValidationRule>) {
        self.rules = rules;
    }

    /// True only while the bound block still exists and is still a container.
    pub fn is_valid(&self) -> bool {
        self.storage.is_container()
    }
}

impl fmt::Debug for ShopContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShopContainer")
            .field("shop_id", &self.shop_id)
            .field("location", &self.location)
            .field("rules", &self.rules)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ShopContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.shop_id.to_string();
        write!(
            f,
            "ShopContainer[shop={}, loc={}, rules={}]",
            &id[..8],
            self.location,
            self.rules.len()
        )
    }
}
