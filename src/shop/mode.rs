use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating state of a shop sign for the owner configuring it.
///
/// The owner's right-clicks walk a closed five-step cycle:
///
/// ```text
/// SETUP -> TYPE -> BOARD -> HELP -> DELETE -> SETUP ...
/// ```
///
/// [`ShopMode::next`] is a pure mapping. Whatever should happen on entering a
/// mode (instructions, rule rebuilds) is the caller's business; in particular
/// entering DELETE never removes anything by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShopMode {
    /// Owner sets the offering and the payment/price
    Setup,
    /// Owner cycles among the enabled sign types
    Type,
    /// Shop is live for customers
    Board,
    /// Information only
    Help,
    /// Confirmation gate before removal
    Delete,
}

impl ShopMode {
    pub const CYCLE: [ShopMode; 5] = [
        ShopMode::Setup,
        ShopMode::Type,
        ShopMode::Board,
        ShopMode::Help,
        ShopMode::Delete,
    ];

    pub fn next(self) -> ShopMode {
        match self {
            ShopMode::Setup => ShopMode::Type,
            ShopMode::Type => ShopMode::Board,
            ShopMode::Board => ShopMode::Help,
            ShopMode::Help => ShopMode::Delete,
            ShopMode::Delete => ShopMode::Setup,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ShopMode::Setup => "Setup Mode",
            ShopMode::Type => "Type Selection",
            ShopMode::Board => "Active Shop",
            ShopMode::Help => "Help",
            ShopMode::Delete => "Delete Mode",
        }
    }

    /// Short label rendered on the sign itself.
    pub fn sign_text(self) -> &'static str {
        match self {
            ShopMode::Setup => "Setup",
            ShopMode::Type => "Type Mode",
            ShopMode::Board => "Ready",
            ShopMode::Help => "Help",
            ShopMode::Delete => "Delete?",
        }
    }

    /// Instruction line sent to the owner when entering this mode.
    pub fn instructions(self) -> &'static str {
        match self {
            ShopMode::Setup => {
                "Left-click with an item to set the offering, then left-click with payment items to set the price."
            }
            ShopMode::Type => "Left-click to cycle through the enabled sign types.",
            ShopMode::Board => "Shop is active and ready for customers.",
            ShopMode::Help => "Use /shop help for command information.",
            ShopMode::Delete => {
                "Left-click twice to delete this shop, or right-click to leave delete mode."
            }
        }
    }
}

impl fmt::Display for ShopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShopMode::Setup => "SETUP",
            ShopMode::Type => "TYPE",
            ShopMode::Board => "BOARD",
            ShopMode::Help => "HELP",
            ShopMode::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_order_matches_next() {
        for window in ShopMode::CYCLE.windows(2) {
            assert_eq!(window[0].next(), window[1]);
        }
        assert_eq!(ShopMode::Delete.next(), ShopMode::Setup);
    }

    #[test]
    fn every_mode_returns_after_five_steps() {
        for mode in ShopMode::CYCLE {
            let mut m = mode;
            for _ in 0..5 {
                m = m.next();
            }
            assert_eq!(m, mode);
        }
    }

    #[test]
    fn no_mode_is_its_own_successor() {
        for mode in ShopMode::CYCLE {
            assert_ne!(mode.next(), mode);
        }
    }
}
