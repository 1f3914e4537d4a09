//! Newtype IDs for type-safe entity references.
//!
//! Catalog entities use integer ids generated by [`define_id!`]. Cart lines
//! use a composite string id, see [`LineItemId`].

use core::fmt;

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe integer ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Display`
/// - Conversion methods: `new()`, `as_i32()`
/// - `From<i32>` and `Into<i32>` implementations
///
/// # Example
///
/// ```rust
/// # use pbs_core::define_id;
/// define_id!(SupplierId);
///
/// let id = SupplierId::new(7);
/// assert_eq!(id.as_i32(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId);

/// Identity of a cart line: `"{product_id}-{size}"`.
///
/// Two selections of the same product and size share an id, which is what
/// makes re-adding a product replace the existing line instead of creating a
/// second one. Unsized products use the `default` size key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(String);

impl LineItemId {
    /// Build the id for a product and an optional size selection.
    ///
    /// A missing or empty size maps to the `default` key.
    ///
    /// ```
    /// use pbs_core::{LineItemId, ProductId};
    ///
    /// assert_eq!(LineItemId::for_selection(ProductId::new(7), Some("12oz")).as_str(), "7-12oz");
    /// assert_eq!(LineItemId::for_selection(ProductId::new(3), None).as_str(), "3-default");
    /// assert_eq!(LineItemId::for_selection(ProductId::new(3), Some("")).as_str(), "3-default");
    /// ```
    #[must_use]
    pub fn for_selection(product_id: ProductId, size: Option<&str>) -> Self {
        let size = size
            .filter(|s| !s.is_empty())
            .unwrap_or(super::line_item::DEFAULT_SIZE_KEY);
        Self(format!("{product_id}-{size}"))
    }

    /// Wrap an id received from a caller (e.g. a remove request).
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LineItemId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl AsRef<str> for LineItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_roundtrip() {
        let id = ProductId::new(42);
        assert_eq!(i32::from(id), 42);
        assert_eq!(ProductId::from(42), id);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
    }

    #[test]
    fn test_line_item_id_sized() {
        let id = LineItemId::for_selection(ProductId::new(7), Some("12oz"));
        assert_eq!(id.as_str(), "7-12oz");
        assert_eq!(id, LineItemId::from("7-12oz"));
    }

    #[test]
    fn test_line_item_id_unsized_uses_default_key() {
        let id = LineItemId::for_selection(ProductId::new(3), None);
        assert_eq!(id.to_string(), "3-default");
    }

    #[test]
    fn test_line_item_id_is_transparent_in_json() {
        let id = LineItemId::new("7-12oz");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7-12oz\"");
    }
}
