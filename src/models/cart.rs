use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::product::{Product, ProductId};

/// Shopping cart: ordered product lines, one per product
///
/// Serialized as a bare list of entries, which is also the layout of the
/// persisted blob. Decoding goes through [`Cart::from_entries`], so a blob
/// listing a product twice keeps only its first entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CartEntry>", into = "Vec<CartEntry>")]
pub struct Cart {
    entries: Vec<CartEntry>,
}

/// One product line in the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(flatten)]
    pub product: Product,
    pub amount: u32,
}

/// Request model for setting the amount of a cart entry
///
/// `amount` is signed so that decrement-below-one requests can be expressed
/// and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i32,
}

/// Result of an amount update that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum AmountUpdate {
    /// The entry now holds the requested amount
    Updated(CartEntry),
    /// Requested amount was zero or negative; nothing was checked or changed
    Ignored,
    /// Stock allowed the amount but the product is not in the cart
    NotInCart,
}

impl Cart {
    /// Create a new empty cart
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from entries, keeping the first entry for each product
    pub fn from_entries(entries: impl IntoIterator<Item = CartEntry>) -> Self {
        let mut cart = Self::new();
        for entry in entries {
            if !cart.contains(entry.product_id()) {
                cart.entries.push(entry);
            }
        }
        cart
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn entry(&self, product_id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.product_id() == product_id)
    }

    pub(crate) fn entry_mut(&mut self, product_id: ProductId) -> Option<&mut CartEntry> {
        self.entries
            .iter_mut()
            .find(|entry| entry.product_id() == product_id)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.entries.iter().any(|entry| entry.product_id() == product_id)
    }

    /// Amount of a product in the cart, 0 when absent
    pub fn amount_of(&self, product_id: ProductId) -> u32 {
        self.entry(product_id).map(|entry| entry.amount).unwrap_or(0)
    }

    /// Append an entry. Caller guarantees the product is not already present.
    pub(crate) fn push(&mut self, entry: CartEntry) {
        debug_assert!(!self.contains(entry.product_id()));
        self.entries.push(entry);
    }

    /// Remove the entry for a product, returning it if it was present
    pub(crate) fn remove(&mut self, product_id: ProductId) -> Option<CartEntry> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.product_id() == product_id)?;
        Some(self.entries.remove(index))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entry amounts
    pub fn total_items(&self) -> u32 {
        self.entries.iter().map(|entry| entry.amount).sum()
    }

    /// Sum of price * amount over all entries; entries without a price are skipped
    pub fn subtotal(&self) -> Decimal {
        self.entries.iter().filter_map(CartEntry::subtotal).sum()
    }

    /// Amount per product, as shown next to each product in a listing
    pub fn amounts_by_product(&self) -> BTreeMap<ProductId, u32> {
        self.entries
            .iter()
            .map(|entry| (entry.product_id(), entry.amount))
            .collect()
    }
}

impl CartEntry {
    /// Create a cart entry for a product
    pub fn new(mut product: Product, amount: u32) -> Self {
        // `amount` is owned by the entry; a display field with the same name
        // would produce a duplicate key in the persisted blob
        product.attributes.remove("amount");
        Self { product, amount }
    }

    pub fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Line total (price * amount), `None` when the product has no price
    pub fn subtotal(&self) -> Option<Decimal> {
        self.product
            .price
            .map(|price| price * Decimal::from(self.amount))
    }
}

impl From<Vec<CartEntry>> for Cart {
    fn from(entries: Vec<CartEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<Cart> for Vec<CartEntry> {
    fn from(cart: Cart) -> Self {
        cart.entries
    }
}
