//! Read-only product catalog.
//!
//! The catalog is the source of product descriptors for the "add to cart"
//! selector. The cart copies what it needs from a descriptor when a line is
//! created and never comes back here for lines it already holds.
//!
//! A seed catalog is embedded from `content/catalog.json`; deployments can
//! point `PBS_CATALOG_PATH` at their own file with the same layout.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use pbs_core::{
    CartLineItem, LineItemError, NewLineItem, Price, ProductId, QUANTITY_TIERS, QuantityTier,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SEED_CATALOG: &str = include_str!("../content/catalog.json");

/// Errors loading the catalog or building a cart line from it.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product with this id.
    #[error("unknown product {0}")]
    UnknownProduct(ProductId),

    /// The product does not come in this size.
    #[error("product {product_id} has no size {size:?}")]
    UnknownSize {
        /// Product that was selected.
        product_id: ProductId,
        /// Size that was requested.
        size: String,
    },

    /// The selection produced an invalid line.
    #[error("invalid selection: {0}")]
    InvalidLine(#[from] LineItemError),

    /// Catalog file could not be read.
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog file is not valid JSON of the expected shape.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Catalog content breaks a catalog rule.
    #[error("invalid catalog: {0}")]
    Invalid(String),
}

/// A product as the selector sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDescriptor {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    /// Size variants, empty for unsized products.
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Unit price for tiers without an override.
    pub base_price: Decimal,
    /// Unit price overrides keyed by tier quantity.
    #[serde(default)]
    pub tier_prices: BTreeMap<u32, Decimal>,
}

/// What the customer picked on the product page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Chosen size. `None` picks the first size of a sized product.
    pub size: Option<String>,
    pub tier: QuantityTier,
}

impl ProductDescriptor {
    /// Unit price at `tier`.
    #[must_use]
    pub fn unit_price(&self, tier: QuantityTier) -> Decimal {
        self.tier_prices
            .get(&tier.qty)
            .copied()
            .unwrap_or(self.base_price)
    }

    /// Estimated total shown next to the tier selector, or `None` if it does
    /// not fit a `Decimal`.
    #[must_use]
    pub fn estimated_total(&self, tier: QuantityTier) -> Option<Price> {
        self.unit_price(tier)
            .checked_mul(Decimal::from(tier.qty))
            .map(Price::usd)
    }

    /// Whether the product has size variants.
    #[must_use]
    pub fn is_sized(&self) -> bool {
        !self.sizes.is_empty()
    }

    /// Snapshot this product into a cart line for `selection`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownSize`] if the size is not offered (any
    /// size on an unsized product is unknown), or
    /// [`CatalogError::InvalidLine`] if the resulting line is invalid.
    pub fn line_item(&self, selection: &Selection) -> Result<CartLineItem, CatalogError> {
        let requested = selection.size.as_deref().filter(|s| !s.trim().is_empty());
        let size = match requested {
            Some(size) if self.sizes.iter().any(|s| s == size) => Some(size.to_owned()),
            Some(size) => {
                return Err(CatalogError::UnknownSize {
                    product_id: self.id,
                    size: size.to_owned(),
                });
            }
            None => self.sizes.first().cloned(),
        };

        Ok(CartLineItem::try_from(NewLineItem {
            product_id: self.id,
            name: self.name.clone(),
            category: self.category.clone(),
            size,
            qty_label: selection.tier.label.to_owned(),
            qty: selection.tier.qty,
            unit_price: self.unit_price(selection.tier),
        })?)
    }
}

/// The full product list.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<ProductDescriptor>,
}

impl Catalog {
    /// The embedded seed catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded file is invalid.
    pub fn seed() -> Result<Self, CatalogError> {
        Self::from_json(SEED_CATALOG)
    }

    /// Load a catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Parse a JSON product array.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed JSON and
    /// [`CatalogError::Invalid`] for duplicate ids, duplicate sizes, negative
    /// prices, tier overrides for quantities that are not tiers, or prices
    /// whose tier totals overflow.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<ProductDescriptor> = serde_json::from_str(json)?;

        let mut ids = HashSet::new();
        for product in &products {
            if !ids.insert(product.id) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate product id {}",
                    product.id
                )));
            }
            let unique_sizes: HashSet<_> = product.sizes.iter().collect();
            if unique_sizes.len() != product.sizes.len() {
                return Err(CatalogError::Invalid(format!(
                    "product {} lists a size twice",
                    product.id
                )));
            }
            let mut prices = std::iter::once(&product.base_price).chain(product.tier_prices.values());
            if prices.any(Decimal::is_sign_negative) {
                return Err(CatalogError::Invalid(format!(
                    "product {} has a negative price",
                    product.id
                )));
            }
            if let Some(qty) = product
                .tier_prices
                .keys()
                .find(|qty| QuantityTier::from_qty(**qty).is_none())
            {
                return Err(CatalogError::Invalid(format!(
                    "product {} prices unknown tier quantity {qty}",
                    product.id
                )));
            }
            if QUANTITY_TIERS
                .iter()
                .any(|tier| product.estimated_total(*tier).is_none())
            {
                return Err(CatalogError::Invalid(format!(
                    "product {} has a price too large to total",
                    product.id
                )));
            }
        }

        Ok(Self { products })
    }

    /// Look up a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&ProductDescriptor> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Look up a product or fail with [`CatalogError::UnknownProduct`].
    ///
    /// # Errors
    ///
    /// Returns an error if no product has this id.
    pub fn require(&self, id: ProductId) -> Result<&ProductDescriptor, CatalogError> {
        self.get(id).ok_or(CatalogError::UnknownProduct(id))
    }

    /// Products in catalog order, optionally limited to one category.
    /// `None` and `"all"` both mean every product.
    #[must_use]
    pub fn list(&self, category: Option<&str>) -> Vec<&ProductDescriptor> {
        match category.filter(|c| *c != "all") {
            Some(category) => self
                .products
                .iter()
                .filter(|p| p.category == category)
                .collect(),
            None => self.products.iter().collect(),
        }
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|p| p.category.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Up to `limit` other products from the same category.
    #[must_use]
    pub fn related(&self, id: ProductId, limit: usize) -> Vec<&ProductDescriptor> {
        let Some(product) = self.get(id) else {
            return Vec::new();
        };
        self.products
            .iter()
            .filter(|p| p.category == product.category && p.id != id)
            .take(limit)
            .collect()
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Every tier with this product's price, for the selector.
#[must_use]
pub fn tier_prices(product: &ProductDescriptor) -> Vec<(QuantityTier, Decimal)> {
    QUANTITY_TIERS
        .iter()
        .map(|tier| (*tier, product.unit_price(*tier)))
        .collect()
}
