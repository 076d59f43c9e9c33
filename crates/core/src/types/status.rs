//! Status enums for catalog and sales entities.
//!
//! The platform encodes product status and visibility as small integers and
//! order state as lowercase strings. These wrappers keep the wire values
//! while giving them names.

use serde::{Deserialize, Serialize};

/// Product enabled/disabled flag (`status` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProductStatus {
    #[default]
    Enabled,
    Disabled,
}

impl ProductStatus {
    /// Wire value.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Enabled => 1,
            Self::Disabled => 2,
        }
    }
}

impl Serialize for ProductStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for ProductStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            1 => Ok(Self::Enabled),
            2 => Ok(Self::Disabled),
            other => Err(serde::de::Error::custom(format!(
                "invalid product status: {other}"
            ))),
        }
    }
}

/// Where a product is listed (`visibility` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    NotVisible,
    Catalog,
    Search,
    #[default]
    CatalogAndSearch,
}

impl Visibility {
    /// Wire value.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::NotVisible => 1,
            Self::Catalog => 2,
            Self::Search => 3,
            Self::CatalogAndSearch => 4,
        }
    }
}

impl Serialize for Visibility {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for Visibility {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            1 => Ok(Self::NotVisible),
            2 => Ok(Self::Catalog),
            3 => Ok(Self::Search),
            4 => Ok(Self::CatalogAndSearch),
            other => Err(serde::de::Error::custom(format!(
                "invalid visibility: {other}"
            ))),
        }
    }
}

/// Product type (`type_id` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    #[default]
    Simple,
    Virtual,
    Configurable,
    Bundle,
    Grouped,
    Downloadable,
}

/// Order state.
///
/// Unknown states deserialize into [`OrderState::Other`] so a platform with
/// custom states still yields a readable order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    New,
    PendingPayment,
    Processing,
    Complete,
    Closed,
    Canceled,
    Holded,
    #[serde(untagged)]
    Other(String),
}

impl OrderState {
    /// States a freshly placed order may be in.
    #[must_use]
    pub const fn is_freshly_placed(&self) -> bool {
        matches!(self, Self::New | Self::Processing)
    }
}
