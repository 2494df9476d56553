use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::models::{Cart, StorageResult};

use super::key_value_store::KeyValueStore;

/// Key under which the storefront keeps the cart blob
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Trait defining the interface for cart persistence
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Load the persisted cart, `None` if nothing was stored yet
    async fn load_cart(&self) -> StorageResult<Option<Cart>>;

    /// Persist a cart snapshot, replacing the previous one
    async fn save_cart(&self, cart: Cart) -> StorageResult<()>;

    /// Drop the persisted cart
    async fn clear_cart(&self) -> StorageResult<()>;
}

/// Stores the cart as a JSON list under a single key
pub struct KeyValueCartRepository {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl KeyValueCartRepository {
    /// Create a repository over `store` using `key` for the blob
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Create a repository using the default storefront key
    pub fn with_default_key(store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(store, CART_STORAGE_KEY)
    }

    /// Get the storage key (for testing)
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl CartRepository for KeyValueCartRepository {
    #[instrument(skip(self), fields(key = %self.key))]
    async fn load_cart(&self) -> StorageResult<Option<Cart>> {
        let Some(blob) = self.store.get(&self.key)? else {
            info!("No stored cart found");
            return Ok(None);
        };

        let cart: Cart = serde_json::from_str(&blob).map_err(|e| {
            warn!("Stored cart could not be decoded: {}", e);
            e
        })?;

        info!("Loaded stored cart with {} entries", cart.len());
        Ok(Some(cart))
    }

    #[instrument(skip(self, cart), fields(key = %self.key, entry_count = cart.len()))]
    async fn save_cart(&self, cart: Cart) -> StorageResult<()> {
        let blob = serde_json::to_string(&cart)?;
        self.store.set(&self.key, &blob)?;

        info!("Cart saved successfully");
        Ok(())
    }

    #[instrument(skip(self), fields(key = %self.key))]
    async fn clear_cart(&self) -> StorageResult<()> {
        self.store.remove(&self.key)?;

        info!("Stored cart cleared");
        Ok(())
    }
}
