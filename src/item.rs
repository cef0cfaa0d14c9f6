//! Item, location, and actor primitives shared by the shop and container layers.
//!
//! These are deliberately thin: the host world owns the real block and item
//! state, and only hands the core what it needs to make accept/reject
//! decisions (material, amount, max stack size).

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The empty material. Slots holding it are treated as empty.
pub const AIR: &str = "AIR";

/// A world material identifier in upper snake case (e.g. `DIAMOND_SWORD`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Material(String);

impl Material {
    /// Normalize a raw name: trimmed, upper-cased, spaces and dashes become `_`.
    pub fn new(name: &str) -> Self {
        let normalized: String = name
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();
        if normalized.is_empty() {
            Material(AIR.to_string())
        } else {
            Material(normalized)
        }
    }

    pub fn air() -> Self {
        Material(AIR.to_string())
    }

    pub fn is_air(&self) -> bool {
        self.0 == AIR
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable form used in player-facing messages: `DIAMOND_SWORD` -> `diamond sword`.
    pub fn display_name(&self) -> String {
        self.0.to_lowercase().replace('_', " ")
    }
}

impl From<String> for Material {
    fn from(value: String) -> Self {
        Material::new(&value)
    }
}

impl From<&str> for Material {
    fn from(value: &str) -> Self {
        Material::new(value)
    }
}

impl From<Material> for String {
    fn from(value: Material) -> Self {
        value.0
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn default_amount() -> u32 {
    1
}

fn default_max_stack() -> u32 {
    64
}

/// A stack of items as the host reports it for a single slot or cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub material: Material,
    #[serde(default = "default_amount")]
    pub amount: u32,
    /// 1 for unique items (tools, armor, enchanted gear), usually 16 or 64 otherwise.
    #[serde(default = "default_max_stack")]
    pub max_stack_size: u32,
}

impl ItemStack {
    pub fn new(material: impl Into<Material>, amount: u32, max_stack_size: u32) -> Self {
        Self {
            material: material.into(),
            amount,
            max_stack_size,
        }
    }

    /// A regular stackable item (max stack 64).
    pub fn stackable(material: impl Into<Material>, amount: u32) -> Self {
        Self::new(material, amount, 64)
    }

    /// A single unique item (max stack 1).
    pub fn unique(material: impl Into<Material>) -> Self {
        Self::new(material, 1, 1)
    }

    pub fn is_empty(&self) -> bool {
        self.material.is_air() || self.amount == 0
    }

    pub fn is_unstackable(&self) -> bool {
        !self.is_empty() && self.max_stack_size == 1
    }

    pub fn is_stackable(&self) -> bool {
        !self.is_empty() && self.max_stack_size > 1
    }

    pub fn is_same_material(&self, other: &ItemStack) -> bool {
        self.material == other.material
    }
}

/// Returns the stack in a slot if the slot actually holds something.
pub fn occupied(slot: Option<&ItemStack>) -> Option<&ItemStack> {
    slot.filter(|item| !item.is_empty())
}

/// A block position in a named world; identifies signs and storage blocks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub world: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Location {
    pub fn new(world: impl Into<String>, x: i32, y: i32, z: i32) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{},{},{}", self.world, self.x, self.y, self.z)
    }
}

/// Identity of a player acting on a shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub Uuid);

impl ActorId {
    pub fn new() -> Self {
        ActorId(Uuid::new_v4())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
