use thiserror::Error;
use uuid::Uuid;

use crate::shop::ShopType;

/// Failures of explicit shop operations.
///
/// Item rejections are not errors; they are [`ValidationResult`](crate::container::ValidationResult)
/// values carried in a [`Decision`](crate::shop::Decision).
#[derive(Debug, Error)]
pub enum ShopError {
    /// No shop registered under this id.
    #[error("shop not found: {0}")]
    ShopNotFound(Uuid),

    /// A shop is already anchored to this sign.
    #[error("a shop already exists at {0}")]
    DuplicateSign(String),

    /// The requested shop type is disabled or needs a missing capability.
    #[error("shop type {shop_type} unavailable: {reason}")]
    TypeUnavailable { shop_type: ShopType, reason: String },

    /// Malformed replay script or unserializable step output.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
