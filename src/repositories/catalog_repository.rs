use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, instrument, Instrument};

use crate::models::{CatalogError, CatalogResult, Product, ProductId, Stock};

/// Trait defining the interface for the remote stock and product services
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Fetch the current stock level of a product
    async fn find_stock(&self, product_id: ProductId) -> CatalogResult<Stock>;

    /// Fetch the full product record
    async fn find_product(&self, product_id: ProductId) -> CatalogResult<Product>;
}

/// HTTP implementation of the CatalogRepository trait
///
/// Talks to a storefront API exposing `GET /stock/{id}` and `GET /products/{id}`.
#[derive(Debug, Clone)]
pub struct HttpCatalogRepository {
    client: Client,
    base_url: String,
}

impl HttpCatalogRepository {
    /// Create a new catalog repository. `timeout` bounds each request.
    pub fn new(base_url: &str, timeout: Duration) -> CatalogResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a client span for one catalog call
    fn create_catalog_span(&self, operation: &str, url: &str) -> tracing::Span {
        tracing::info_span!(
            "catalog",
            "otel.kind" = "client",
            "otel.name" = format!("catalog.{}", operation),
            "http.method" = "GET",
            "http.url" = %url,
            "http.status_code" = tracing::field::Empty,
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, operation: &str, path: &str) -> CatalogResult<T> {
        let url = format!("{}/{}", self.base_url, path);
        let span = self.create_catalog_span(operation, &url);

        async {
            let response = self.client.get(&url).send().await?;
            let status = response.status();
            tracing::Span::current().record("http.status_code", status.as_u16());

            if !status.is_success() {
                return Err(CatalogError::UnexpectedStatus {
                    endpoint: url.clone(),
                    status: status.as_u16(),
                });
            }

            let body = response.text().await?;
            debug!("Received {} bytes", body.len());

            serde_json::from_str(&body).map_err(|e| CatalogError::MalformedResponse {
                endpoint: url.clone(),
                message: e.to_string(),
            })
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl CatalogRepository for HttpCatalogRepository {
    #[instrument(skip(self), fields(product_id = product_id))]
    async fn find_stock(&self, product_id: ProductId) -> CatalogResult<Stock> {
        let stock: Stock = self
            .get_json("GetStock", &format!("stock/{product_id}"))
            .await?;

        info!("Stock for product: {}", stock.amount);
        Ok(stock)
    }

    #[instrument(skip(self), fields(product_id = product_id))]
    async fn find_product(&self, product_id: ProductId) -> CatalogResult<Product> {
        let product: Product = self
            .get_json("GetProduct", &format!("products/{product_id}"))
            .await?;

        if product.id != product_id {
            return Err(CatalogError::MalformedResponse {
                endpoint: format!("{}/products/{}", self.base_url, product_id),
                message: format!("expected product {}, got {}", product_id, product.id),
            });
        }

        info!("Product found: {}", product.label());
        Ok(product)
    }
}
