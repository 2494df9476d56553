#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;
use shoecart_rs::models::{
    AmountUpdate, Cart, CartError, CartOperation, CartResult, CatalogError, CatalogResult,
    Product, ProductId, Stock, UpdateProductAmount,
};
use shoecart_rs::repositories::{
    CartRepository, CatalogRepository, InMemoryKeyValueStore, KeyValueCartRepository,
};
use shoecart_rs::services::{report_failure, Notifier};
use shoecart_rs::CartService;

/// In-process stand-in for the stock and product services
#[derive(Default)]
pub struct FakeCatalog {
    products: Mutex<HashMap<ProductId, Product>>,
    stock: Mutex<HashMap<ProductId, i64>>,
    failing: AtomicBool,
    stock_calls: AtomicUsize,
    product_calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(self, id: ProductId, stock: impl Into<i64>) -> Self {
        self.with_record(product(id), stock)
    }

    /// Serve an arbitrary product record
    pub fn with_record(self, record: Product, stock: impl Into<i64>) -> Self {
        let id = record.id;
        self.products.lock().unwrap().insert(id, record);
        self.set_stock(id, stock);
        self
    }

    pub fn set_stock(&self, id: ProductId, amount: impl Into<i64>) {
        self.stock.lock().unwrap().insert(id, amount.into());
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn stock_calls(&self) -> usize {
        self.stock_calls.load(Ordering::SeqCst)
    }

    pub fn product_calls(&self) -> usize {
        self.product_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self, path: String) -> CatalogResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CatalogError::UnexpectedStatus {
                endpoint: path,
                status: 503,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogRepository for FakeCatalog {
    async fn find_stock(&self, product_id: ProductId) -> CatalogResult<Stock> {
        self.stock_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available(format!("/stock/{product_id}"))?;

        let amount = self.stock.lock().unwrap().get(&product_id).copied();
        amount
            .map(|amount| Stock {
                id: product_id,
                amount,
            })
            .ok_or(CatalogError::UnexpectedStatus {
                endpoint: format!("/stock/{product_id}"),
                status: 404,
            })
    }

    async fn find_product(&self, product_id: ProductId) -> CatalogResult<Product> {
        self.product_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available(format!("/products/{product_id}"))?;

        let found = self.products.lock().unwrap().get(&product_id).cloned();
        found.ok_or(CatalogError::UnexpectedStatus {
            endpoint: format!("/products/{product_id}"),
            status: 404,
        })
    }
}

/// Collects every notification message
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

pub fn product(id: ProductId) -> Product {
    Product::new(
        id,
        format!("Tênis {id}"),
        Decimal::new(1799, 1) + Decimal::from(id),
        format!("https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis{id}.jpg"),
    )
}

/// Cart service wired to a fake catalog and in-memory storage, with a
/// presentation layer that reports failures like the storefront does
pub struct TestEnvironment {
    pub service: CartService,
    pub catalog: Arc<FakeCatalog>,
    pub store: Arc<InMemoryKeyValueStore>,
    pub notifier: RecordingNotifier,
}

impl TestEnvironment {
    pub async fn new(catalog: FakeCatalog) -> Self {
        Self::with_store(catalog, Arc::new(InMemoryKeyValueStore::new())).await
    }

    pub async fn with_store(catalog: FakeCatalog, store: Arc<InMemoryKeyValueStore>) -> Self {
        let catalog = Arc::new(catalog);
        let repository = Arc::new(KeyValueCartRepository::with_default_key(store.clone()));
        let service = CartService::load(repository, catalog.clone())
            .await
            .expect("Failed to load cart");

        Self {
            service,
            catalog,
            store,
            notifier: RecordingNotifier::default(),
        }
    }

    /// Cart as a fresh session would see it
    pub async fn reload(&self) -> Cart {
        KeyValueCartRepository::with_default_key(self.store.clone())
            .load_cart()
            .await
            .expect("Failed to reload cart")
            .unwrap_or_default()
    }

    pub async fn add(&self, product_id: ProductId) -> CartResult<()> {
        let result = self.service.add_product(product_id).await.map(|_| ());
        self.report(CartOperation::AddProduct, &result);
        result
    }

    pub async fn remove(&self, product_id: ProductId) -> CartResult<()> {
        let result = self.service.remove_product(product_id).await;
        self.report(CartOperation::RemoveProduct, &result);
        result
    }

    pub async fn update(&self, product_id: ProductId, amount: i32) -> CartResult<AmountUpdate> {
        let result = self
            .service
            .update_product_amount(UpdateProductAmount { product_id, amount })
            .await;
        self.report(CartOperation::UpdateProductAmount, &result);
        result
    }

    fn report<T>(&self, operation: CartOperation, result: &Result<T, CartError>) {
        if let Err(e) = result {
            report_failure(&self.notifier, operation, e);
        }
    }

    /// (product id, amount) pairs in cart order
    pub fn summary(&self) -> Vec<(ProductId, u32)> {
        summarize(&self.service.cart())
    }
}

pub fn summarize(cart: &Cart) -> Vec<(ProductId, u32)> {
    cart.entries()
        .iter()
        .map(|entry| (entry.product_id(), entry.amount))
        .collect()
}
