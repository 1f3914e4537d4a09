//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use pbs_core::{Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::catalog::{ProductDescriptor, tier_prices};
use crate::error::Result;
use crate::state::AppState;

/// How many related products the detail view lists.
const RELATED_LIMIT: usize = 3;

/// Product display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub sizes: Vec<String>,
    /// Size preselected by the selector.
    pub default_size: Option<String>,
    pub base_price: Decimal,
    /// e.g. `$0.85`
    pub price_display: String,
    pub tiers: Vec<TierView>,
}

/// Quantity tier option with its estimated total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierView {
    pub label: &'static str,
    pub qty: u32,
    pub unit_price: Decimal,
    /// e.g. `$325.00`; `None` if the total does not fit a `Decimal`
    pub estimated_total: Option<String>,
}

impl From<&ProductDescriptor> for ProductView {
    fn from(product: &ProductDescriptor) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            category: product.category.clone(),
            sizes: product.sizes.clone(),
            default_size: product.sizes.first().cloned(),
            base_price: product.base_price,
            price_display: Price::usd(product.base_price).display(),
            tiers: tier_prices(product)
                .into_iter()
                .map(|(tier, unit_price)| TierView {
                    label: tier.label,
                    qty: tier.qty,
                    unit_price,
                    estimated_total: product.estimated_total(tier).map(|p| p.display()),
                })
                .collect(),
        }
    }
}

/// Product listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
}

/// Product listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListView {
    pub products: Vec<ProductView>,
    pub categories: Vec<String>,
}

/// Product detail response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailView {
    #[serde(flatten)]
    pub product: ProductView,
    pub related: Vec<ProductView>,
}

/// Display the product listing, optionally filtered by category.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Json<ProductListView> {
    let catalog = state.catalog();
    Json(ProductListView {
        products: catalog
            .list(query.category.as_deref())
            .into_iter()
            .map(ProductView::from)
            .collect(),
        categories: catalog.categories().into_iter().map(String::from).collect(),
    })
}

/// Display a single product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductDetailView>> {
    let id = ProductId::new(id);
    let catalog = state.catalog();
    let product = catalog.require(id)?;

    Ok(Json(ProductDetailView {
        product: ProductView::from(product),
        related: catalog
            .related(id, RELATED_LIMIT)
            .into_iter()
            .map(ProductView::from)
            .collect(),
    }))
}
