//! Checkout command.
//!
//! # Usage
//!
//! ```bash
//! pbs-cli checkout --first-name Maria --last-name Lopez \
//!     --email maria@example.com --address1 "123 Main Street" \
//!     --city Austin --state TX --zip 78701
//! ```
//!
//! Ctrl+C while the order is being placed cancels it and keeps the cart.

use pbs_core::{CheckoutDetails, NextStep, Price};
use pbs_storefront::cart::CartRepository;
use pbs_storefront::checkout::CheckoutFlow;

use super::{CommandError, Workspace};

/// Place an order for the current cart.
pub async fn place_order(
    workspace: &Workspace,
    details: CheckoutDetails,
) -> Result<(), CommandError> {
    let summary = workspace.cart.summary();
    tracing::info!(
        "Placing order for {} ({})...",
        summary.item_count_label(),
        Price::usd(summary.total)
    );

    let flow = CheckoutFlow::new(workspace.config.checkout);
    let cancel = async {
        // If the handler cannot be installed, never cancel
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    let confirmation = flow.submit(&workspace.cart, details, cancel).await?;

    tracing::info!("Order placed! Reference: {}", confirmation.reference);
    tracing::info!("Confirmation sent to {}", confirmation.email);
    tracing::info!(
        "Total: {} ({}, shipping {})",
        Price::usd(confirmation.summary.total),
        confirmation.summary.item_count_label(),
        confirmation.summary.shipping_label()
    );
    for (n, step) in NextStep::ALL.iter().enumerate() {
        tracing::info!("  {}. {} - {}", n + 1, step.label(), step.description());
    }
    Ok(())
}
