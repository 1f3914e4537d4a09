//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! pbs-cli cart add 7 --size 12oz --tier "251-500 units"
//! pbs-cli cart add 3 --tier 75
//! pbs-cli cart list
//! pbs-cli cart remove 7-12oz
//! pbs-cli cart clear
//! pbs-cli summary
//! ```

use pbs_core::{CartLineItem, LineItemId, Price, ProductId, QuantityTier};
use pbs_storefront::cart::CartRepository;
use pbs_storefront::catalog::Selection;

use super::{CommandError, Workspace};

/// Print every line and the summary.
pub fn list(workspace: &Workspace) {
    let items = workspace.cart.list();
    if items.is_empty() {
        tracing::info!("Your cart is empty");
        return;
    }

    for item in &items {
        tracing::info!("{}", describe(item));
    }
    summary(workspace);
}

/// One listing row. The size is only shown for products sold in sizes.
fn describe(item: &CartLineItem) -> String {
    let name = if item.is_sized() {
        format!("{} ({})", item.name, item.size)
    } else {
        item.name.clone()
    };
    format!(
        "{:<16} {name} - {} x {} = {}",
        item.id.as_str(),
        item.qty_label,
        Price::usd(item.unit_price),
        Price::usd(item.line_total)
    )
}

/// Print the order summary.
pub fn summary(workspace: &Workspace) {
    let summary = workspace.cart.summary();
    tracing::info!("Subtotal ({}): {}", summary.item_count_label(), Price::usd(summary.subtotal));
    tracing::info!("Shipping: {}", summary.shipping_label());
    tracing::info!("Total: {}", Price::usd(summary.total));
}

/// Add a product selection, replacing the line for the same product and size.
pub fn add(
    workspace: &Workspace,
    product_id: i32,
    size: Option<String>,
    tier: &str,
) -> Result<(), CommandError> {
    let tier = QuantityTier::parse(tier).ok_or_else(|| CommandError::UnknownTier(tier.to_owned()))?;
    let product = workspace.catalog.require(ProductId::new(product_id))?;
    let item = product.line_item(&Selection { size, tier })?;

    tracing::info!(
        "Added {} ({}, {}) for {}",
        item.name,
        item.size,
        item.qty_label,
        Price::usd(item.line_total)
    );
    workspace.cart.add(item)?;
    Ok(())
}

/// Remove a line by id.
pub fn remove(workspace: &Workspace, id: &str) -> Result<(), CommandError> {
    if workspace.cart.remove(&LineItemId::new(id))? {
        tracing::info!("Removed {id}");
    } else {
        tracing::info!("{id} is not in the cart");
    }
    Ok(())
}

/// Empty the cart.
pub fn clear(workspace: &Workspace) -> Result<(), CommandError> {
    workspace.cart.clear()?;
    tracing::info!("Cart cleared");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pbs_core::NewLineItem;
    use rust_decimal::Decimal;

    use super::*;

    fn item(product: i32, name: &str, size: Option<&str>) -> CartLineItem {
        CartLineItem::try_from(NewLineItem {
            product_id: ProductId::new(product),
            name: name.to_owned(),
            category: "test".to_owned(),
            size: size.map(str::to_owned),
            qty_label: "251–500 units".to_owned(),
            qty: 375,
            unit_price: Decimal::new(248, 2),
        })
        .unwrap()
    }

    #[test]
    fn test_describe_sized_line() {
        let row = describe(&item(7, "Custom Paper Cups", Some("12oz")));
        assert!(row.starts_with("7-12oz"));
        assert!(row.contains("Custom Paper Cups (12oz) - 251–500 units x $2.48 = $930.00"));
    }

    #[test]
    fn test_describe_unsized_line_omits_size() {
        let row = describe(&item(3, "Branded Tissue Paper", None));
        assert!(row.contains("Branded Tissue Paper - 251–500 units"));
        assert!(!row.contains("Standard"));
    }
}
