//! # Shop Interaction State Machine
//!
//! Per-player configuration sessions and the router that turns sign clicks and
//! storage insertions into decisions.
//!
//! ## Modes
//!
//! An owner right-clicking their sign walks a closed cycle of modes:
//!
//! ```text
//! SETUP ─▶ TYPE ─▶ BOARD ─▶ HELP ─▶ DELETE ─┐
//!   ▲                                        │
//!   └────────────────────────────────────────┘
//! ```
//!
//! Left-clicking performs the current mode's action. Customers only ever see
//! the shop summary.

pub mod descriptor;
pub mod interaction;
pub mod manager;
pub mod mode;
pub mod session;
pub mod types;

pub use descriptor::ShopDescriptor;
pub use interaction::{Decision, InteractionEvent, InteractionKind, InteractionRouter, Outcome};
pub use manager::{ModeNotice, ShopManager};
pub use mode::ShopMode;
pub use session::ShopSession;
pub use types::{ShopType, SignType};
