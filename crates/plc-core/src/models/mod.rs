//! Resource declarations for the PLC JSON:API backend.
//!
//! Each resource is a typed attribute record plus the static facts the
//! resource-mapping layer needs: its JSON:API type name and its
//! relationships. Attributes the server owns are read but never written.
//!
//! - `PlcUser`: donors and their contact details
//! - `PlcTransaction`, `PlcLineItem`: gifts and purchases
//! - `PlcSubscription`: recurring donations
//! - `PlcCampaign`: fundraising campaigns
//! - `PlcProduct`: catalog entries

use serde::{de::DeserializeOwned, Serialize};

pub mod campaign;
pub mod line_item;
pub mod product;
pub mod subscription;
pub mod transaction;
pub mod user;

pub use campaign::PlcCampaign;
pub use line_item::PlcLineItem;
pub use product::PlcProduct;
pub use subscription::PlcSubscription;
pub use transaction::PlcTransaction;
pub use user::PlcUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipKind {
    BelongsTo,
    HasMany,
}

/// A named link from one resource to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relationship {
    pub name: &'static str,
    pub kind: RelationshipKind,
}

impl Relationship {
    pub const fn belongs_to(name: &'static str) -> Self {
        Self {
            name,
            kind: RelationshipKind::BelongsTo,
        }
    }

    pub const fn has_many(name: &'static str) -> Self {
        Self {
            name,
            kind: RelationshipKind::HasMany,
        }
    }
}

pub trait Resource: Serialize + DeserializeOwned {
    /// JSON:API `type` member, also the collection path segment
    const JSONAPI_TYPE: &'static str;

    fn relationships() -> &'static [Relationship] {
        &[]
    }
}
