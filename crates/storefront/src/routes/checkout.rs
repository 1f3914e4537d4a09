//! Checkout route handlers.
//!
//! `POST /checkout` holds the request open for the simulated round trip. If
//! the client disconnects the submission is dropped and the session goes back
//! to editing with the cart intact.

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use pbs_core::{CartLineItem, CheckoutDetails, CheckoutStatus, NextStep, OrderConfirmation};
use serde::Serialize;
use tracing::instrument;

use super::cart::{CartItemView, CartView, SummaryView};
use crate::cart::CartRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Where an empty checkout sends the customer.
pub const BROWSE_PATH: &str = "/products";

/// Checkout page data.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckoutView {
    /// Nothing to check out.
    Empty { browse: &'static str },
    /// The form is open.
    Editing {
        #[serde(rename = "canSubmit")]
        can_submit: bool,
        #[serde(flatten)]
        cart: CartView,
    },
    /// An order is being placed.
    Submitting {
        #[serde(rename = "canSubmit")]
        can_submit: bool,
        #[serde(flatten)]
        cart: CartView,
    },
}

impl CheckoutView {
    /// View of `items` for a session in `status`.
    #[must_use]
    pub fn new(status: CheckoutStatus, items: Vec<CartLineItem>) -> Self {
        let can_submit = status.accepts_submit();
        match status {
            CheckoutStatus::Submitting => Self::Submitting {
                can_submit,
                cart: CartView::new(items),
            },
            _ if items.is_empty() => Self::Empty {
                browse: BROWSE_PATH,
            },
            _ => Self::Editing {
                can_submit,
                cart: CartView::new(items),
            },
        }
    }
}

/// One entry of the "what happens next" list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextStepView {
    pub step: NextStep,
    pub label: &'static str,
    pub description: &'static str,
    pub current: bool,
}

/// Order confirmation data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationView {
    pub reference: String,
    pub items: Vec<CartItemView>,
    pub summary: SummaryView,
    pub email: String,
    pub ship_to: String,
    pub placed_at: DateTime<Utc>,
    pub next_steps: Vec<NextStepView>,
}

impl From<OrderConfirmation> for ConfirmationView {
    fn from(confirmation: OrderConfirmation) -> Self {
        let current = confirmation.current_step();
        Self {
            reference: confirmation.reference.to_string(),
            summary: SummaryView::from(&confirmation.summary),
            email: confirmation.email.to_string(),
            ship_to: confirmation.details.full_name(),
            placed_at: confirmation.placed_at,
            next_steps: NextStep::ALL
                .into_iter()
                .map(|step| NextStepView {
                    step,
                    label: step.label(),
                    description: step.description(),
                    current: step == current,
                })
                .collect(),
            items: confirmation
                .items
                .into_iter()
                .map(CartItemView::from)
                .collect(),
        }
    }
}

/// Display the checkout page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CheckoutView> {
    let status = if state.cart_locked() {
        CheckoutStatus::Submitting
    } else {
        CheckoutStatus::Editing
    };
    Json(CheckoutView::new(status, state.cart().list()))
}

/// Place the order.
#[instrument(skip(state, details))]
pub async fn submit(
    State(state): State<AppState>,
    Json(details): Json<CheckoutDetails>,
) -> Result<(StatusCode, Json<ConfirmationView>)> {
    let session = state.checkout_session();
    let confirmation = session
        .submit(state.cart(), details, std::future::pending())
        .await?;

    tracing::info!(reference = %confirmation.reference, "Checkout complete");
    Ok((StatusCode::CREATED, Json(ConfirmationView::from(confirmation))))
}

/// Display the confirmation of the most recent order.
#[instrument(skip(state))]
pub async fn success(State(state): State<AppState>) -> Result<Json<ConfirmationView>> {
    state
        .current_checkout()
        .confirmation()
        .map(|confirmation| Json(ConfirmationView::from(confirmation)))
        .ok_or_else(|| AppError::NotFound("order".to_string()))
}
