use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a product in the remote catalog
pub type ProductId = u64;

/// Product record as returned by the product lookup service
///
/// Only `id` is required. Display fields are opaque to the cart: the known
/// ones are typed when present and anything else (`name`, `brand`, ...) is
/// kept verbatim in `attributes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Remaining display fields, kept verbatim
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Stock level reported by the inventory service
///
/// Signed: a zero or negative level means nothing can be added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: i64,
}

impl Product {
    /// Create a product with no extra display fields
    pub fn new(id: ProductId, title: impl Into<String>, price: Decimal, image: impl Into<String>) -> Self {
        Self {
            id,
            title: Some(title.into()),
            price: Some(price),
            image: Some(image.into()),
            attributes: Map::new(),
        }
    }

    /// Product carrying only its id; display fields can be attached afterwards
    pub fn bare(id: ProductId) -> Self {
        Self {
            id,
            title: None,
            price: None,
            image: None,
            attributes: Map::new(),
        }
    }

    /// Human-readable label: `title`, else a string `name` attribute, else the id
    pub fn label(&self) -> String {
        self.title
            .clone()
            .or_else(|| {
                self.attributes
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("#{}", self.id))
    }

    /// Attach an extra display field
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}
