//! Shop and sign type categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trading rule category of a shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShopType {
    /// Item for item exchange
    Barter,
    /// Players sell items for currency
    Sell,
    /// Players buy items with currency
    Buy,
    /// Server-managed, unlimited stock
    Admin,
}

impl ShopType {
    pub const ALL: [ShopType; 4] = [
        ShopType::Barter,
        ShopType::Sell,
        ShopType::Buy,
        ShopType::Admin,
    ];

    /// Sell and buy shops move currency and need an economy integration.
    pub fn requires_economy(self) -> bool {
        matches!(self, ShopType::Sell | ShopType::Buy)
    }

    pub fn name(self) -> &'static str {
        match self {
            ShopType::Barter => "BARTER",
            ShopType::Sell => "SELL",
            ShopType::Buy => "BUY",
            ShopType::Admin => "ADMIN",
        }
    }
}

/// Display/interaction variant of a shop's anchor sign.
///
/// Declaration order is the cycling order used in TYPE mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignType {
    Stackable,
    Unstackable,
    Barter,
}

impl SignType {
    pub const ALL: [SignType; 3] = [SignType::Stackable, SignType::Unstackable, SignType::Barter];

    pub fn name(self) -> &'static str {
        match self {
            SignType::Stackable => "STACKABLE",
            SignType::Unstackable => "UNSTACKABLE",
            SignType::Barter => "BARTER",
        }
    }
}

impl fmt::Display for ShopType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for SignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShopType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShopType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown shop type '{}'", s))
    }
}

impl FromStr for SignType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SignType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown sign type '{}'", s))
    }
}
