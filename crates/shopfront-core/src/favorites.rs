//! # Favorites
//!
//! A set of products keyed by id. Insertion order is kept for display only.

use crate::types::Product;

/// Favorited products.
///
/// ## Invariants
/// - No two entries share a `product.id`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet {
    items: Vec<Product>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        FavoriteSet { items: Vec::new() }
    }

    /// Builds a set from products of unknown provenance, keeping the first
    /// occurrence of each id.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut set = FavoriteSet::new();
        for product in products {
            set.add(product);
        }
        set
    }

    /// Appends a product. Returns `false` (and changes nothing) if its id is
    /// already present.
    pub fn add(&mut self, product: Product) -> bool {
        if self.contains(&product.id) {
            return false;
        }
        self.items.push(product);
        true
    }

    /// Removes by id. Returns whether anything was removed.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|p| p.id != product_id);
        self.items.len() != initial_len
    }

    /// Adds when absent, removes when present. Returns whether the product is
    /// a favorite afterwards.
    pub fn toggle(&mut self, product: Product) -> bool {
        if self.remove(&product.id) {
            false
        } else {
            self.items.push(product);
            true
        }
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.items.iter().any(|p| p.id == product_id)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn products(&self) -> &[Product] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tests::product;

    #[test]
    fn test_add_twice_keeps_one() {
        let mut favorites = FavoriteSet::new();
        let p = product("1", "1");

        assert!(favorites.add(p.clone()));
        assert!(!favorites.add(p));
        assert_eq!(favorites.len(), 1);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut favorites = FavoriteSet::from_products([product("1", "1")]);
        assert!(!favorites.remove("2"));
        assert_eq!(favorites.len(), 1);
    }

    #[test]
    fn test_toggle() {
        let mut favorites = FavoriteSet::new();
        let p = product("1", "1");

        assert!(favorites.toggle(p.clone()));
        assert!(favorites.contains("1"));
        assert!(!favorites.toggle(p));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_from_products_dedupes_preserving_order() {
        let favorites =
            FavoriteSet::from_products([product("b", "1"), product("a", "1"), product("b", "2")]);

        let ids: Vec<&str> = favorites.products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(favorites.products()[0].price.cents(), 100);
    }
}
