// Repositories module - data access layer

pub mod cart_repository;
pub mod catalog_repository;
pub mod key_value_store;


pub use cart_repository::{CartRepository, KeyValueCartRepository, CART_STORAGE_KEY};
pub use catalog_repository::{CatalogRepository, HttpCatalogRepository};
pub use key_value_store::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore};
