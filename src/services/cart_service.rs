use std::sync::Arc;
use tokio::sync::{watch, Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

use crate::models::{
    AmountUpdate, Cart, CartEntry, CartError, CartOperation, CartResult, ProductId,
    UpdateProductAmount,
};
use crate::observability::Metrics;
use crate::repositories::{CartRepository, CatalogRepository};

/// Service managing the shopping cart
///
/// Mutations are serialized: each operation holds the cart lock for its whole
/// read-modify-write, remote calls included, so it always starts from the
/// latest committed cart. The new cart is persisted before it is committed in
/// memory; a failed write leaves both untouched.
pub struct CartService {
    cart_repository: Arc<dyn CartRepository>,
    catalog_repository: Arc<dyn CatalogRepository>,
    cart: Mutex<Cart>,
    updates: watch::Sender<Cart>,
    metrics: Option<Arc<Metrics>>,
}

impl CartService {
    /// Create a CartService around an already loaded cart
    pub fn new(
        cart_repository: Arc<dyn CartRepository>,
        catalog_repository: Arc<dyn CatalogRepository>,
        cart: Cart,
    ) -> Self {
        let (updates, _) = watch::channel(cart.clone());
        Self {
            cart_repository,
            catalog_repository,
            cart: Mutex::new(cart),
            updates,
            metrics: None,
        }
    }

    /// Create a CartService from the persisted cart, or an empty one if none is stored
    #[instrument(skip_all)]
    pub async fn load(
        cart_repository: Arc<dyn CartRepository>,
        catalog_repository: Arc<dyn CatalogRepository>,
    ) -> CartResult<Self> {
        let cart = match cart_repository.load_cart().await? {
            Some(cart) => cart,
            None => {
                info!("No stored cart, starting empty");
                Cart::new()
            }
        };

        info!("Cart loaded with {} entries", cart.len());
        Ok(Self::new(cart_repository, catalog_repository, cart))
    }

    /// Attach a metrics registry
    pub fn with_metrics(self, metrics: Arc<Metrics>) -> Self {
        metrics.observe_cart(&self.updates.borrow());
        Self {
            metrics: Some(metrics),
            ..self
        }
    }

    /// Snapshot of the latest committed cart
    pub fn cart(&self) -> Cart {
        self.updates.borrow().clone()
    }

    /// Subscribe to committed carts; the receiver sees every successful mutation
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.updates.subscribe()
    }

    /// Add one unit of a product, appending it when not yet in the cart
    #[instrument(skip(self), fields(product_id = product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> CartResult<CartEntry> {
        info!("Adding product to cart");

        let result = self.try_add_product(product_id).await;
        self.finish(CartOperation::AddProduct, &result);
        result
    }

    /// Remove a product's entry from the cart
    #[instrument(skip(self), fields(product_id = product_id))]
    pub async fn remove_product(&self, product_id: ProductId) -> CartResult<()> {
        info!("Removing product from cart");

        let result = self.try_remove_product(product_id).await;
        self.finish(CartOperation::RemoveProduct, &result);
        result
    }

    /// Set the amount of a product already in the cart
    ///
    /// Amounts of zero or less are ignored without contacting the stock
    /// service. A product missing from the cart is reported as
    /// [`AmountUpdate::NotInCart`], not as an error.
    #[instrument(skip(self), fields(product_id = request.product_id, amount = request.amount))]
    pub async fn update_product_amount(
        &self,
        request: UpdateProductAmount,
    ) -> CartResult<AmountUpdate> {
        if request.amount <= 0 {
            debug!("Ignoring non-positive amount");
            return Ok(AmountUpdate::Ignored);
        }

        info!("Updating product amount");

        let result = self
            .try_update_product_amount(request.product_id, request.amount.unsigned_abs())
            .await;
        self.finish(CartOperation::UpdateProductAmount, &result);
        result
    }

    /// Empty the cart and drop its stored blob
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> CartResult<()> {
        let mut cart = self.cart.lock().await;

        self.cart_repository.clear_cart().await?;

        let empty = Cart::new();
        if let Some(metrics) = &self.metrics {
            metrics.observe_cart(&empty);
        }
        self.updates.send_replace(empty.clone());
        *cart = empty;

        info!("Cart cleared");
        Ok(())
    }

    async fn try_add_product(&self, product_id: ProductId) -> CartResult<CartEntry> {
        let mut cart = self.cart.lock().await;

        let stock = self.catalog_repository.find_stock(product_id).await?;
        let requested = cart.amount_of(product_id).saturating_add(1);

        if i64::from(requested) > stock.amount {
            return Err(CartError::OutOfStock {
                product_id,
                requested,
                available: stock.amount,
            });
        }

        let mut updated = cart.clone();
        let entry = match updated.entry_mut(product_id) {
            Some(entry) => {
                entry.amount = requested;
                entry.clone()
            }
            None => {
                let product = self.catalog_repository.find_product(product_id).await?;
                let entry = CartEntry::new(product, 1);
                updated.push(entry.clone());
                entry
            }
        };

        self.commit(&mut cart, updated).await?;
        Ok(entry)
    }

    async fn try_remove_product(&self, product_id: ProductId) -> CartResult<()> {
        let mut cart = self.cart.lock().await;

        let mut updated = cart.clone();
        if updated.remove(product_id).is_none() {
            return Err(CartError::ProductNotInCart { product_id });
        }

        self.commit(&mut cart, updated).await
    }

    async fn try_update_product_amount(
        &self,
        product_id: ProductId,
        amount: u32,
    ) -> CartResult<AmountUpdate> {
        let mut cart = self.cart.lock().await;

        let stock = self.catalog_repository.find_stock(product_id).await?;
        if i64::from(amount) > stock.amount {
            return Err(CartError::OutOfStock {
                product_id,
                requested: amount,
                available: stock.amount,
            });
        }

        let mut updated = cart.clone();
        let Some(entry) = updated.entry_mut(product_id) else {
            debug!("Product not in cart, nothing to update");
            return Ok(AmountUpdate::NotInCart);
        };
        entry.amount = amount;
        let entry = entry.clone();

        self.commit(&mut cart, updated).await?;
        Ok(AmountUpdate::Updated(entry))
    }

    /// Persist `updated`, then make it the current cart
    async fn commit(&self, current: &mut MutexGuard<'_, Cart>, updated: Cart) -> CartResult<()> {
        self.cart_repository.save_cart(updated.clone()).await?;

        if let Some(metrics) = &self.metrics {
            metrics.observe_cart(&updated);
        }
        self.updates.send_replace(updated.clone());
        **current = updated;
        Ok(())
    }

    fn finish<T>(&self, operation: CartOperation, result: &CartResult<T>) {
        match result {
            Ok(_) => info!("{} completed", operation),
            Err(e) if e.is_rejection() => info!("{} rejected: {}", operation, e),
            Err(e) => warn!("{} failed: {}", operation, e),
        }

        if let Some(metrics) = &self.metrics {
            metrics.record_cart_operation(operation, result);
        }
    }
}
