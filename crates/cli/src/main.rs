//! PBS CLI - browse the catalog, edit the cart and check out from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse products
//! pbs-cli products --category cups
//!
//! # Add 251-500 units of 12oz cups, then look at the cart
//! pbs-cli cart add 7 --size 12oz --tier "251-500 units"
//! pbs-cli cart list
//!
//! # Place the order
//! pbs-cli checkout --first-name Maria --last-name Lopez --email maria@example.com \
//!     --address1 "123 Main Street" --city Austin --state TX --zip 78701
//! ```
//!
//! # Commands
//!
//! - `products` - List the catalog
//! - `cart list|add|remove|clear` - Edit the cart
//! - `summary` - Show the order summary
//! - `checkout` - Place the order

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use pbs_core::{CheckoutDetails, DEFAULT_COUNTRY};

mod commands;

use commands::{CommandError, Workspace};

#[derive(Parser)]
#[command(name = "pbs-cli")]
#[command(author, version, about = "PBS storefront cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Only show this category (e.g. cups, boxes, bags)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Show the order summary
    Summary,
    /// Place the order for the current cart
    Checkout(DetailsArgs),
}

#[derive(Subcommand)]
enum CartAction {
    /// List cart lines
    List,
    /// Add a product (replaces the line for the same product and size)
    Add {
        /// Product ID
        product_id: i32,

        /// Size (defaults to the product's first size)
        #[arg(short, long)]
        size: Option<String>,

        /// Quantity tier label ("251-500 units") or quantity (375)
        #[arg(short, long, default_value = "25")]
        tier: String,
    },
    /// Remove a line by ID (e.g. 7-12oz)
    Remove {
        /// Line item ID
        id: String,
    },
    /// Remove every line
    Clear,
}

#[derive(Args)]
struct DetailsArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    address1: String,
    #[arg(long)]
    address2: Option<String>,
    #[arg(long)]
    city: String,
    #[arg(long)]
    state: String,
    #[arg(long)]
    zip: String,
    #[arg(long, default_value = DEFAULT_COUNTRY)]
    country: String,
    /// Print notes, artwork details or other special requests
    #[arg(long)]
    instructions: Option<String>,
}

impl From<DetailsArgs> for CheckoutDetails {
    fn from(args: DetailsArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            phone: args.phone,
            company: args.company,
            address1: args.address1,
            address2: args.address2,
            city: args.city,
            state: args.state,
            zip: args.zip,
            country: args.country,
            instructions: args.instructions,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let workspace = Workspace::open()?;

    match cli.command {
        Commands::Products { category } => {
            commands::products::list(&workspace, category.as_deref());
        }
        Commands::Cart { action } => match action {
            CartAction::List => commands::cart::list(&workspace),
            CartAction::Add {
                product_id,
                size,
                tier,
            } => commands::cart::add(&workspace, product_id, size, &tier)?,
            CartAction::Remove { id } => commands::cart::remove(&workspace, &id)?,
            CartAction::Clear => commands::cart::clear(&workspace)?,
        },
        Commands::Summary => commands::cart::summary(&workspace),
        Commands::Checkout(details) => {
            commands::checkout::place_order(&workspace, details.into()).await?;
        }
    }
    Ok(())
}
