//! # Bartershop - Sign Shop Interaction and Container Validation
//!
//! Bartershop is the engine behind player-run trading posts in a block world:
//! a sign anchors the shop, an adjacent chest holds its stock, and players
//! trade item-for-item (or item-for-currency when an economy is present).
//!
//! ## Features
//!
//! - **Setup State Machine**: Owners cycle SETUP, TYPE, BOARD, HELP and DELETE by right-clicking their sign.
//! - **Container Validation**: Every insertion attempt is checked against type-lock, unstackable-only or multi-type rules.
//! - **Role Awareness**: Owners restock freely; customers may only deposit payment items; hoppers follow the container rules.
//! - **Type Availability**: Configured shop and sign types, constrained by runtime economy capability, never empty.
//! - **Concurrency Safe**: Session and container registries can be shared with background sweeps.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bartershop::config::Config;
//! use bartershop::container::MemoryStorage;
//! use bartershop::item::{ActorId, Location};
//! use bartershop::shop::{InteractionRouter, ShopType};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let router = InteractionRouter::new(&config.type_settings());
//!
//!     let (shop_id, notice) = router.create_shop(
//!         ActorId::new(),
//!         Location::new("world", 0, 65, 0),
//!         Location::new("world", 0, 64, 0),
//!         ShopType::Barter,
//!         Arc::new(MemoryStorage::chest()),
//!     )?;
//!     println!("{} is in {} mode", shop_id, notice.mode);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`shop`] - sessions, modes, shop descriptors and the interaction router
//! - [`container`] - validation rules, containers, rule selection and role dispatch
//! - [`availability`] - enabled shop/sign types after capability constraints
//! - [`config`] - TOML configuration
//! - [`replay`] - scripted event driver
//! - [`item`] - materials, item stacks, locations and actor ids
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │ InteractionRouter   │ ← host events in, decisions out
//! └─────────────────────┘
//!      │            │
//! ┌──────────┐ ┌──────────────────┐
//! │ Sessions │ │ ContainerRegistry│ ← per-actor mode / per-shop rules
//! └──────────┘ └──────────────────┘
//!      │
//! ┌─────────────────────┐
//! │ TypeAvailability    │ ← config + economy capability
//! └─────────────────────┘
//! ```

pub mod availability;
pub mod config;
pub mod container;
pub mod errors;
pub mod item;
pub mod logutil;
pub mod replay;
pub mod shop;
