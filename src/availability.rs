//! Which shop and sign types are usable right now.
//!
//! The enabled sets come from configuration and are then constrained by runtime
//! capability: without an economy integration, currency-based shop types are
//! switched off no matter what the configuration says. The result is cached and
//! only recomputed by an explicit [`TypeAvailabilityManager::reload`].

use std::collections::BTreeSet;

use log::{info, warn};

use crate::config::TypeSettings;
use crate::container::ValidationResult;
use crate::shop::{ShopType, SignType};

/// Forced on when configuration leaves a set empty.
pub const FALLBACK_SHOP_TYPE: ShopType = ShopType::Barter;
pub const FALLBACK_SIGN_TYPE: SignType = SignType::Barter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAvailabilityManager {
    shop_types: BTreeSet<ShopType>,
    sign_types: BTreeSet<SignType>,
    economy_available: bool,
}

impl TypeAvailabilityManager {
    pub fn new(settings: &TypeSettings) -> Self {
        let mut manager = Self {
            shop_types: BTreeSet::new(),
            sign_types: BTreeSet::new(),
            economy_available: settings.economy_available,
        };
        manager.reload(settings);
        manager
    }

    /// Recomputes both enabled sets from `settings`.
    pub fn reload(&mut self, settings: &TypeSettings) {
        let mut shop_types = settings.shop_types.clone();
        let mut sign_types = settings.sign_types.clone();

        if !settings.economy_available {
            let before = shop_types.len();
            shop_types.retain(|t| !t.requires_economy());
            if shop_types.len() != before {
                info!("Auto-disabled SELL/BUY shop types (economy integration not available)");
            }
        }

        if shop_types.is_empty() {
            warn!("No shop types enabled! Force-enabling {}", FALLBACK_SHOP_TYPE);
            shop_types.insert(FALLBACK_SHOP_TYPE);
        }
        if sign_types.is_empty() {
            warn!("No sign types enabled! Force-enabling {}", FALLBACK_SIGN_TYPE);
            sign_types.insert(FALLBACK_SIGN_TYPE);
        }

        self.shop_types = shop_types;
        self.sign_types = sign_types;
        self.economy_available = settings.economy_available;

        info!("Enabled shop types: {}", join_names(self.shop_types.iter()));
        info!("Enabled sign types: {}", join_names(self.sign_types.iter()));
    }

    pub fn is_shop_type_available(&self, shop_type: ShopType) -> bool {
        self.shop_types.contains(&shop_type)
    }

    pub fn is_sign_type_available(&self, sign_type: SignType) -> bool {
        self.sign_types.contains(&sign_type)
    }

    pub fn available_shop_types(&self) -> &BTreeSet<ShopType> {
        &self.shop_types
    }

    pub fn available_sign_types(&self) -> &BTreeSet<SignType> {
        &self.sign_types
    }

    pub fn economy_available(&self) -> bool {
        self.economy_available
    }

    /// Next enabled sign type after `current`, wrapping around.
    ///
    /// A `current` that is not enabled maps to the first enabled type; an empty
    /// set (not reachable after `reload`) leaves `current` unchanged.
    pub fn next_sign_type(&self, current: SignType) -> SignType {
        let Some(first) = self.sign_types.iter().next().copied() else {
            return current;
        };
        if !self.sign_types.contains(&current) {
            return first;
        }
        self.sign_types
            .range((std::ops::Bound::Excluded(current), std::ops::Bound::Unbounded))
            .next()
            .copied()
            .unwrap_or(first)
    }

    pub fn validate_shop_type(&self, shop_type: ShopType) -> ValidationResult {
        if self.is_shop_type_available(shop_type) {
            return ValidationResult::success();
        }
        ValidationResult::failure(
            format!(
                "Shop type {} is not available. {}",
                shop_type,
                self.disabled_reason(shop_type)
            ),
            None,
        )
    }

    fn disabled_reason(&self, shop_type: ShopType) -> &'static str {
        if shop_type.requires_economy() && !self.economy_available {
            "Requires an economy integration."
        } else {
            "Disabled in configuration."
        }
    }
}

fn join_names<T: std::fmt::Display>(items: impl Iterator<Item = T>) -> String {
    items.map(|t| t.to_string()).collect::<Vec<_>>().join(", ")
}
