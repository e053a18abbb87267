//! In-memory shopping cart.
//!
//! The cart lives client-side; the server only sees it as the line items of
//! a checkout request. This model exists so checkout maths and the admin
//! preview share one set of explicit mutation methods.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One cart line: a product, optionally narrowed to a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub quantity: u32,
    /// Price snapshot in cents taken when the line was added.
    pub unit_price_cents: i64,
}

impl CartLine {
    fn key(&self) -> (Uuid, Option<Uuid>) {
        (self.product_id, self.variant_id)
    }

    /// Line subtotal in cents.
    pub fn subtotal_cents(&self) -> i64 {
        self.unit_price_cents * i64::from(self.quantity)
    }
}

/// A cart with explicit mutation methods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add a line, merging quantities when product+variant already present.
    /// A merge keeps the existing price snapshot.
    pub fn add(&mut self, line: CartLine) {
        if line.quantity == 0 {
            return;
        }
        if let Some(existing) = self.lines.iter_mut().find(|l| l.key() == line.key()) {
            existing.quantity += line.quantity;
        } else {
            self.lines.push(line);
        }
    }

    /// Set the quantity for a line; zero removes it. Returns whether the
    /// line existed.
    pub fn set_quantity(
        &mut self,
        product_id: Uuid,
        variant_id: Option<Uuid>,
        quantity: u32,
    ) -> bool {
        let key = (product_id, variant_id);
        let Some(index) = self.lines.iter().position(|l| l.key() == key) else {
            return false;
        };
        if quantity == 0 {
            self.lines.remove(index);
        } else {
            self.lines[index].quantity = quantity;
        }
        true
    }

    /// Remove a line outright.
    pub fn remove(&mut self, product_id: Uuid, variant_id: Option<Uuid>) -> bool {
        self.set_quantity(product_id, variant_id, 0)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Total item count across lines.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Cart subtotal in cents.
    pub fn subtotal_cents(&self) -> i64 {
        self.lines.iter().map(CartLine::subtotal_cents).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product: Uuid, variant: Option<Uuid>, quantity: u32, price: i64) -> CartLine {
        CartLine {
            product_id: product,
            variant_id: variant,
            quantity,
            unit_price_cents: price,
        }
    }

    #[test]
    fn add_merges_same_product_and_variant() {
        let product = Uuid::new_v4();
        let variant = Uuid::new_v4();
        let mut cart = Cart::new();
        cart.add(line(product, Some(variant), 1, 1_000));
        cart.add(line(product, Some(variant), 2, 1_200));

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 3);
        // Merge keeps the first snapshot.
        assert_eq!(cart.subtotal_cents(), 3_000);
    }

    #[test]
    fn variants_of_one_product_stay_separate() {
        let product = Uuid::new_v4();
        let mut cart = Cart::new();
        cart.add(line(product, Some(Uuid::new_v4()), 1, 1_000));
        cart.add(line(product, Some(Uuid::new_v4()), 1, 2_000));

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.subtotal_cents(), 3_000);
    }

    #[test]
    fn zero_quantity_add_is_ignored() {
        let mut cart = Cart::new();
        cart.add(line(Uuid::new_v4(), None, 0, 1_000));
        assert!(cart.is_empty());
    }

    #[test]
    fn set_quantity_zero_removes_line() {
        let product = Uuid::new_v4();
        let mut cart = Cart::new();
        cart.add(line(product, None, 2, 1_000));

        assert!(cart.set_quantity(product, None, 0));
        assert!(cart.is_empty());
        assert!(!cart.set_quantity(product, None, 1));
    }

    #[test]
    fn remove_unknown_line_reports_false() {
        let mut cart = Cart::new();
        assert!(!cart.remove(Uuid::new_v4(), None));
    }
}
