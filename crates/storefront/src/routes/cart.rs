//! Cart route handlers.
//!
//! Every handler answers with the full cart view so clients can re-render
//! from one response. The store refuses edits while an order is being placed.

use axum::{
    Json,
    extract::{Path, State},
};
use pbs_core::{
    CartLineItem, LineItemId, OrderSummary, Price, ProductId, QuantityTier,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::cart::CartRepository;
use crate::catalog::Selection;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    #[serde(flatten)]
    pub item: CartLineItem,
    /// e.g. `$2.48`
    pub unit_price_display: String,
    /// e.g. `$1,240.00`
    pub line_total_display: String,
}

impl From<CartLineItem> for CartItemView {
    fn from(item: CartLineItem) -> Self {
        Self {
            unit_price_display: Price::usd(item.unit_price).display(),
            line_total_display: Price::usd(item.line_total).display(),
            item,
        }
    }
}

/// Order summary display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub subtotal_display: String,
    pub shipping_display: String,
    pub total_display: String,
    pub item_count: usize,
    pub item_count_label: String,
}

impl From<&OrderSummary> for SummaryView {
    fn from(summary: &OrderSummary) -> Self {
        Self {
            subtotal: summary.subtotal,
            shipping: summary.shipping,
            total: summary.total,
            subtotal_display: Price::usd(summary.subtotal).display(),
            shipping_display: summary.shipping_label(),
            total_display: Price::usd(summary.total).display(),
            item_count: summary.item_count,
            item_count_label: summary.item_count_label(),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub summary: SummaryView,
}

impl CartView {
    /// Build the view for a set of lines.
    #[must_use]
    pub fn new(items: Vec<CartLineItem>) -> Self {
        let summary = pbs_core::summarize(&items);
        Self {
            items: items.into_iter().map(CartItemView::from).collect(),
            summary: SummaryView::from(&summary),
        }
    }

    /// View of the current cart.
    #[must_use]
    pub fn current(state: &AppState) -> Self {
        Self::new(state.cart().list())
    }
}

/// Quantity tier as sent by clients: the tier label or its unit count.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TierInput {
    Qty(u32),
    Label(String),
}

impl TierInput {
    fn resolve(&self) -> Option<QuantityTier> {
        match self {
            Self::Qty(qty) => QuantityTier::from_qty(*qty),
            Self::Label(label) => QuantityTier::parse(label),
        }
    }
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    #[serde(default)]
    pub size: Option<String>,
    pub quantity_tier: TierInput,
}

/// Display the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    Json(CartView::current(&state))
}

/// Add a product selection, replacing any line with the same product and size.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let tier = request
        .quantity_tier
        .resolve()
        .ok_or_else(|| AppError::BadRequest("unknown quantity tier".to_string()))?;
    let product = state.catalog().require(request.product_id)?;
    let item = product.line_item(&Selection {
        size: request.size,
        tier,
    })?;

    let id = item.id.to_string();
    state.cart().add(item)?;
    add_breadcrumb("cart", "Added to cart", Some(&[("line_item_id", id.as_str())]));

    Ok(Json(CartView::current(&state)))
}

/// Remove a line. Removing a line that is not in the cart is not an error.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CartView>> {
    if state.cart().remove(&LineItemId::new(id.as_str()))? {
        add_breadcrumb("cart", "Removed from cart", Some(&[("line_item_id", id.as_str())]));
    }

    Ok(Json(CartView::current(&state)))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Json<CartView>> {
    state.cart().clear()?;
    add_breadcrumb("cart", "Cleared cart", None);

    Ok(Json(CartView::current(&state)))
}
