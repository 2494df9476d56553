use serde::{Deserialize, Serialize};
use std::fmt;

/// The three mutations a cart supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartOperation {
    AddProduct,
    RemoveProduct,
    UpdateProductAmount,
}

impl CartOperation {
    /// Stable label used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            CartOperation::AddProduct => "add_product",
            CartOperation::RemoveProduct => "remove_product",
            CartOperation::UpdateProductAmount => "update_product_amount",
        }
    }
}

impl fmt::Display for CartOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_operation_display() {
        assert_eq!(CartOperation::AddProduct.to_string(), "add_product");
        assert_eq!(CartOperation::RemoveProduct.to_string(), "remove_product");
        assert_eq!(
            CartOperation::UpdateProductAmount.to_string(),
            "update_product_amount"
        );
    }

    #[test]
    fn test_cart_operation_serde() {
        let json = serde_json::to_string(&CartOperation::UpdateProductAmount).unwrap();
        assert_eq!(json, "\"update_product_amount\"");

        let op: CartOperation = serde_json::from_str("\"add_product\"").unwrap();
        assert_eq!(op, CartOperation::AddProduct);
    }
}
