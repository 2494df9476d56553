use prometheus::{CounterVec, Encoder, IntGauge, Opts, Registry, TextEncoder};
use thiserror::Error;
use tracing::info;

use crate::models::{Cart, CartError, CartOperation};

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to register metric: {0}")]
    Registration(#[from] prometheus::Error),
    #[error("Failed to encode metrics: {0}")]
    Encoding(String),
}

/// Metrics collected by the cart manager
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,

    pub cart_operations_total: CounterVec,
    pub cart_entries: IntGauge,
    pub cart_items: IntGauge,
}

impl Metrics {
    /// Create a new metrics instance with all required metrics registered
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let cart_operations_total = CounterVec::new(
            Opts::new("cart_operations_total", "Total number of cart operations"),
            &["operation", "status"],
        )?;

        let cart_entries = IntGauge::new("cart_entries", "Number of distinct products in the cart")?;

        let cart_items = IntGauge::new("cart_items", "Sum of amounts over all cart entries")?;

        registry.register(Box::new(cart_operations_total.clone()))?;
        registry.register(Box::new(cart_entries.clone()))?;
        registry.register(Box::new(cart_items.clone()))?;

        info!("Prometheus metrics initialized successfully");

        Ok(Metrics {
            registry,
            cart_operations_total,
            cart_entries,
            cart_items,
        })
    }

    /// Encode all metrics in Prometheus text format
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| MetricsError::Encoding(e.to_string()))?;

        String::from_utf8(buffer).map_err(|e| MetricsError::Encoding(e.to_string()))
    }

    /// Record the outcome of a cart operation
    ///
    /// Status is `success`, `rejected` for business-rule failures, or `error`.
    pub fn record_cart_operation<T>(&self, operation: CartOperation, result: &Result<T, CartError>) {
        let status = match result {
            Ok(_) => "success",
            Err(e) if e.is_rejection() => "rejected",
            Err(_) => "error",
        };

        self.cart_operations_total
            .with_label_values(&[operation.as_str(), status])
            .inc();
    }

    /// Update the cart size gauges
    pub fn observe_cart(&self, cart: &Cart) {
        self.cart_entries.set(cart.len() as i64);
        self.cart_items.set(i64::from(cart.total_items()));
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert!(metrics.is_ok());
    }

    #[test]
    fn test_record_cart_operation_statuses() {
        let metrics = Metrics::new().unwrap();

        metrics.record_cart_operation(CartOperation::AddProduct, &Ok::<(), CartError>(()));
        metrics.record_cart_operation::<()>(
            CartOperation::AddProduct,
            &Err(CartError::OutOfStock {
                product_id: 1,
                requested: 2,
                available: 1,
            }),
        );
        metrics.record_cart_operation::<()>(
            CartOperation::RemoveProduct,
            &Err(CartError::from(crate::models::StorageError::Unavailable {
                message: "down".to_string(),
            })),
        );

        let counter = |op: &str, status: &str| {
            metrics
                .cart_operations_total
                .with_label_values(&[op, status])
                .get()
        };
        assert_eq!(counter("add_product", "success"), 1.0);
        assert_eq!(counter("add_product", "rejected"), 1.0);
        assert_eq!(counter("remove_product", "error"), 1.0);
    }

    #[test]
    fn test_encode_contains_registered_metrics() {
        let metrics = Metrics::new().unwrap();
        metrics.observe_cart(&Cart::new());
        metrics.record_cart_operation(CartOperation::UpdateProductAmount, &Ok::<(), CartError>(()));

        let text = metrics.encode().unwrap();

        assert!(text.contains("cart_operations_total"));
        assert!(text.contains("cart_entries 0"));
        assert!(text.contains("cart_items 0"));
    }
}
