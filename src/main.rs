use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

use shoecart_rs::{
    init_observability,
    models::{AmountUpdate, Cart, CartOperation, ProductId, UpdateProductAmount},
    repositories::{FileKeyValueStore, HttpCatalogRepository, KeyValueCartRepository},
    services::{report_failure, ConsoleNotifier, Notifier, TracingNotifier},
    CartService, Config, Metrics,
};

/// Manage the storefront shopping cart from the terminal
#[derive(Debug, Parser)]
#[command(name = "shoecart", version, about)]
struct Cli {
    /// Print Prometheus metrics to stderr after the command
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the current cart
    Show,
    /// Add one unit of a product
    Add { product_id: ProductId },
    /// Remove a product from the cart
    Remove { product_id: ProductId },
    /// Set the amount of a product in the cart
    Update {
        product_id: ProductId,
        #[arg(allow_negative_numbers = true)]
        amount: i32,
    },
    /// Empty the cart and delete the stored blob
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_environment().context("failed to load configuration")?;

    init_observability(
        &config.observability.service_name,
        &config.observability.log_level,
        config.observability.enable_json_logging,
    )?;

    info!(
        "Catalog: {} (timeout {}s), data dir: {}",
        config.catalog.base_url,
        config.catalog.request_timeout_seconds,
        config.storage.data_dir.display()
    );

    let metrics = Arc::new(Metrics::new()?);

    let store = Arc::new(FileKeyValueStore::new(&config.storage.data_dir));
    let cart_repository = Arc::new(KeyValueCartRepository::new(
        store,
        config.storage.cart_key.clone(),
    ));
    let catalog_repository = Arc::new(HttpCatalogRepository::new(
        &config.catalog.base_url,
        config.catalog.request_timeout(),
    )?);

    let service = CartService::load(cart_repository, catalog_repository)
        .await
        .context("failed to load stored cart")?
        .with_metrics(metrics.clone());

    // Structured logs carry notifications as events; plain runs print them
    let notifier: Box<dyn Notifier> = if config.observability.enable_json_logging {
        Box::new(TracingNotifier)
    } else {
        Box::new(ConsoleNotifier)
    };

    match cli.command {
        Command::Show => {}
        Command::Clear => service.clear_cart().await.context("failed to clear cart")?,
        Command::Add { product_id } => {
            if let Err(e) = service.add_product(product_id).await {
                report_failure(notifier.as_ref(), CartOperation::AddProduct, &e);
            }
        }
        Command::Remove { product_id } => {
            if let Err(e) = service.remove_product(product_id).await {
                report_failure(notifier.as_ref(), CartOperation::RemoveProduct, &e);
            }
        }
        Command::Update { product_id, amount } => {
            let request = UpdateProductAmount { product_id, amount };
            match service.update_product_amount(request).await {
                Ok(AmountUpdate::NotInCart) => info!("Product {} is not in the cart", product_id),
                Ok(_) => {}
                Err(e) => report_failure(notifier.as_ref(), CartOperation::UpdateProductAmount, &e),
            }
        }
    }

    print_cart(&service.cart())?;

    if cli.metrics {
        eprint!("{}", metrics.encode()?);
    }

    Ok(())
}

fn print_cart(cart: &Cart) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(cart)?);
    println!("items: {}  subtotal: {}", cart.total_items(), cart.subtotal());
    Ok(())
}
