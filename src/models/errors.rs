use thiserror::Error;

use super::product::ProductId;

/// Errors returned by cart operations
#[derive(Debug, Error)]
pub enum CartError {
    #[error("Insufficient stock for product {product_id}: requested={requested}, available={available}")]
    OutOfStock {
        product_id: ProductId,
        requested: u32,
        available: i64,
    },

    #[error("Product not in cart: {product_id}")]
    ProductNotInCart { product_id: ProductId },

    #[error("Catalog error: {source}")]
    Catalog {
        #[from]
        source: CatalogError,
    },

    #[error("Storage error: {source}")]
    Storage {
        #[from]
        source: StorageError,
    },
}

/// Errors from the remote stock and product lookup services
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP request failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error("Unexpected status from {endpoint}: {status}")]
    UnexpectedStatus { endpoint: String, status: u16 },

    #[error("Malformed response from {endpoint}: {message}")]
    MalformedResponse { endpoint: String, message: String },
}

/// Errors from the key-value persistence layer
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("Storage unavailable: {message}")]
    Unavailable { message: String },
}

impl CartError {
    /// True for failures caused by a business rule rather than infrastructure
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            CartError::OutOfStock { .. } | CartError::ProductNotInCart { .. }
        )
    }
}

/// Result type alias for cart operations
pub type CartResult<T> = Result<T, CartError>;

/// Result type alias for catalog lookups
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
