use tracing::warn;

use crate::models::{CartError, CartOperation};

pub const OUT_OF_STOCK_MESSAGE: &str = "Quantidade solicitada fora de estoque";
pub const ADD_PRODUCT_FAILED_MESSAGE: &str = "Erro na adição do produto";
pub const REMOVE_PRODUCT_FAILED_MESSAGE: &str = "Erro na remoção do produto";
pub const UPDATE_AMOUNT_FAILED_MESSAGE: &str = "Erro na alteração de quantidade do produto";

/// Fire-and-forget channel for user-facing failure messages
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Emits notifications as WARN events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        warn!(target: "shoecart_rs::notification", "{}", message);
    }
}

/// Writes notifications to stderr, for terminal consumers
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn error(&self, message: &str) {
        eprintln!("{message}");
    }
}

impl CartOperation {
    /// User-facing message for a failed operation
    ///
    /// Out-of-stock has its own message; every other failure collapses into
    /// the operation's generic message.
    pub fn failure_message(&self, error: &CartError) -> &'static str {
        match (self, error) {
            (_, CartError::OutOfStock { .. }) => OUT_OF_STOCK_MESSAGE,
            (CartOperation::AddProduct, _) => ADD_PRODUCT_FAILED_MESSAGE,
            (CartOperation::RemoveProduct, _) => REMOVE_PRODUCT_FAILED_MESSAGE,
            (CartOperation::UpdateProductAmount, _) => UPDATE_AMOUNT_FAILED_MESSAGE,
        }
    }
}

/// Report a failed operation through `notifier`
pub fn report_failure(notifier: &dyn Notifier, operation: CartOperation, error: &CartError) {
    notifier.error(operation.failure_message(error));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogError, StorageError};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn error(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    fn out_of_stock() -> CartError {
        CartError::OutOfStock {
            product_id: 1,
            requested: 3,
            available: 2,
        }
    }

    fn catalog_failure() -> CartError {
        CatalogError::UnexpectedStatus {
            endpoint: "http://localhost:3333/stock/1".to_string(),
            status: 500,
        }
        .into()
    }

    #[test]
    fn test_out_of_stock_message_shared_by_add_and_update() {
        assert_eq!(
            CartOperation::AddProduct.failure_message(&out_of_stock()),
            OUT_OF_STOCK_MESSAGE
        );
        assert_eq!(
            CartOperation::UpdateProductAmount.failure_message(&out_of_stock()),
            OUT_OF_STOCK_MESSAGE
        );
    }

    #[test]
    fn test_generic_messages_per_operation() {
        assert_eq!(
            CartOperation::AddProduct.failure_message(&catalog_failure()),
            ADD_PRODUCT_FAILED_MESSAGE
        );
        assert_eq!(
            CartOperation::UpdateProductAmount.failure_message(&catalog_failure()),
            UPDATE_AMOUNT_FAILED_MESSAGE
        );
        assert_eq!(
            CartOperation::RemoveProduct.failure_message(&StorageError::Unavailable {
                message: "down".to_string()
            }
            .into()),
            REMOVE_PRODUCT_FAILED_MESSAGE
        );
    }

    #[test]
    fn test_not_in_cart_uses_remove_message() {
        let error = CartError::ProductNotInCart { product_id: 4 };
        assert_eq!(
            CartOperation::RemoveProduct.failure_message(&error),
            REMOVE_PRODUCT_FAILED_MESSAGE
        );
    }

    #[test]
    fn test_report_failure_notifies_once() {
        let notifier = RecordingNotifier::default();

        report_failure(&notifier, CartOperation::AddProduct, &out_of_stock());

        let messages = notifier.messages.lock().unwrap();
        assert_eq!(messages.as_slice(), [OUT_OF_STOCK_MESSAGE.to_string()]);
    }

    #[test]
    fn test_builtin_notifiers_as_trait_objects() {
        let notifiers: Vec<Box<dyn Notifier>> = vec![Box::new(TracingNotifier), Box::new(ConsoleNotifier)];

        for notifier in &notifiers {
            report_failure(notifier.as_ref(), CartOperation::RemoveProduct, &catalog_failure());
        }
    }
}
