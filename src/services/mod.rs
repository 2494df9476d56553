// Services module - business logic layer

pub mod cart_service;
pub mod notifier;

pub use cart_service::CartService;
pub use notifier::{report_failure, ConsoleNotifier, Notifier, TracingNotifier};
