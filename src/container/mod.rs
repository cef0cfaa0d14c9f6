//! # Shop Container Validation
//!
//! Every shop is anchored to a storage block. This module decides, per
//! insertion attempt, whether an item may enter that block.
//!
//! ## Components
//!
//! - [`validation`] - the closed set of item rules and [`ValidationResult`]
//! - [`shop_container`] - a storage block plus its ordered rule list
//! - [`factory`] - picks rules from a shop's offering, payments, or contents
//! - [`helper`] - owner / customer / automated dispatch in front of the rules
//! - [`registry`] - concurrency-safe shop id -> container map
//! - [`storage`] - the [`StorageBlock`] seam to the host world
//!
//! ```text
//! insert attempt ─▶ helper::validate_for_actor ─▶ ShopContainer::validate ─▶ ValidationRule*
//! ```

pub mod factory;
pub mod helper;
pub mod registry;
pub mod shop_container;
pub mod storage;
pub mod validation;

pub use helper::{validate_for_actor, Actor};
pub use registry::ContainerRegistry;
pub use shop_container::ShopContainer;
pub use storage::{MemoryStorage, StorageBlock};
pub use validation::{ValidationResult, ValidationRule};
