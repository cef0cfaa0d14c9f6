//! Item acceptance rules for shop storage.
//!
//! Rules form a closed set, so they are an enum rather than a trait object:
//! every place that interprets a rule has to handle all three variants.

use std::collections::BTreeSet;

use crate::item::{occupied, ItemStack, Material};

/// Outcome of validating one item (or one shop type).
///
/// A rejection always carries a player-facing reason; an accepted result never does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid {
        reason: String,
        item: Option<ItemStack>,
    },
}

impl ValidationResult {
    pub fn success() -> Self {
        ValidationResult::Valid
    }

    pub fn failure(reason: impl Into<String>, item: Option<&ItemStack>) -> Self {
        ValidationResult::Invalid {
            reason: reason.into(),
            item: item.cloned(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid { reason, .. } => Some(reason),
        }
    }

    /// The item that caused the rejection, when one was involved.
    pub fn invalid_item(&self) -> Option<&ItemStack> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid { item, .. } => item.as_ref(),
        }
    }
}

pub const UNSTACKABLE_ONLY_REASON: &str =
    "This shop only accepts unstackable items (enchanted, tools, armor)";

/// A single acceptance predicate bound to a shop's storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationRule {
    /// Only one material may enter (type lock for stackable offerings).
    StackableTypeLock {
        material: Material,
        display_name: String,
    },
    /// Only items with a max stack size of 1.
    UnstackableOnly,
    /// Any material in the set (payments plus offering).
    MultiType { allowed: BTreeSet<Material> },
}

impl ValidationRule {
    pub fn type_lock(material: Material) -> Self {
        let display_name = material.display_name();
        ValidationRule::StackableTypeLock {
            material,
            display_name,
        }
    }

    pub fn multi_type<I>(materials: I) -> Self
    where
        I: IntoIterator<Item = Material>,
    {
        ValidationRule::MultiType {
            allowed: materials.into_iter().filter(|m| !m.is_air()).collect(),
        }
    }

    /// Empty slots always pass.
    pub fn validate(&self, slot: Option<&ItemStack>) -> ValidationResult {
        let Some(item) = occupied(slot) else {
            return ValidationResult::success();
        };

        match self {
            ValidationRule::StackableTypeLock {
                material,
                display_name,
            } => {
                if &item.material != material {
                    return ValidationResult::failure(
                        format!("Shop only accepts {} ({})", display_name, material),
                        Some(item),
                    );
                }
            }
            ValidationRule::UnstackableOnly => {
                if item.max_stack_size > 1 {
                    return ValidationResult::failure(UNSTACKABLE_ONLY_REASON, Some(item));
                }
            }
            ValidationRule::MultiType { allowed } => {
                if !allowed.contains(&item.material) {
                    let mut names: Vec<String> =
                        allowed.iter().map(Material::display_name).collect();
                    names.sort();
                    return ValidationResult::failure(
                        format!("Shop accepts: {}", names.join(", ")),
                        Some(item),
                    );
                }
            }
        }

        ValidationResult::success()
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValidationRule::StackableTypeLock { .. } => "StackableTypeLock",
            ValidationRule::UnstackableOnly => "UnstackableOnly",
            ValidationRule::MultiType { .. } => "MultiType",
        }
    }

    pub fn description(&self) -> String {
        match self {
            ValidationRule::StackableTypeLock { display_name, .. } => {
                format!("Type locking: only {} items allowed", display_name)
            }
            ValidationRule::UnstackableOnly => {
                "Only unstackable items allowed (enchanted, tools, armor, etc)".to_string()
            }
            ValidationRule::MultiType { allowed } => {
                format!("Multi-type validation: allows {} material types", allowed.len())
            }
        }
    }
}
