//! Catalog browsing.
//!
//! # Usage
//!
//! ```bash
//! pbs-cli products
//! pbs-cli products --category cups
//! ```

use pbs_core::Price;

use super::Workspace;

/// List products, optionally limited to one category.
pub fn list(workspace: &Workspace, category: Option<&str>) {
    let products = workspace.catalog.list(category);
    if products.is_empty() {
        tracing::info!(
            "No products found. Categories: {}",
            workspace.catalog.categories().join(", ")
        );
        return;
    }

    for product in products {
        let sizes = if product.is_sized() {
            product.sizes.join(", ")
        } else {
            "-".to_owned()
        };
        tracing::info!(
            "#{:<3} {:<24} {:<16} from {}/unit  sizes: {}",
            product.id.as_i32(),
            product.name,
            product.category,
            Price::usd(product.base_price),
            sizes
        );
    }
}
