//! Cart

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    items::{LineItem, ProductId},
    notify::{Notice, Notifier, NullNotifier},
};

/// Errors raised by cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// A removal was requested with an empty product id.
    #[error("invalid product id: id is empty")]
    InvalidProductId,

    /// The requested product is not in the cart.
    #[error("item {0} not found in cart")]
    ItemNotFound(ProductId),

    /// The product is flagged out of stock and the cart enforces stock.
    #[error("product {0} is out of stock")]
    OutOfStock(ProductId),
}

/// Policy for adding items that are flagged out of stock.
///
/// The storefront deliberately allows out-of-stock items into the cart;
/// [`StockPolicy::Permissive`] preserves that behavior and is the default.
/// [`StockPolicy::Enforced`] rejects such adds instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockPolicy {
    /// Out-of-stock items may be added to the cart.
    #[default]
    Permissive,

    /// Adding an out-of-stock item fails with [`CartError::OutOfStock`].
    Enforced,
}

/// Aggregate cart totals.
///
/// Pure functions of the item list: every mutation recomputes all three
/// from the full list, never sets one independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    /// Sum of all line quantities.
    pub items: u64,

    /// Sum of effective unit price times quantity over all lines.
    pub amount: Decimal,

    /// Sum of per-unit PV times quantity over all lines.
    pub pv: Decimal,
}

impl Totals {
    /// Compute the totals of an item list.
    pub fn of(items: &[LineItem]) -> Self {
        items.iter().fold(Totals::default(), |acc, line| Totals {
            items: acc.items + u64::from(line.quantity),
            amount: acc.amount + line.line_total(),
            pv: acc.pv + line.line_pv(),
        })
    }
}

/// The authoritative in-memory cart.
///
/// An explicit store object: construct one at application start and pass it
/// by reference to consumers, so tests can instantiate isolated instances.
/// New lines append at the end; matching is by [`ProductId`] only, so price
/// or name drift between requests never splits a line.
#[derive(Debug, Default, Clone)]
pub struct Cart<N: Notifier = NullNotifier> {
    items: Vec<LineItem>,
    totals: Totals,
    stock_policy: StockPolicy,
    notifier: N,
}

impl Cart {
    /// Create an empty cart that discards notices.
    #[must_use]
    pub fn new() -> Self {
        Cart::default()
    }
}

impl<N: Notifier> Cart<N> {
    /// Create an empty cart that sends notices to `notifier`.
    pub fn with_notifier(notifier: N) -> Self {
        Cart {
            items: Vec::new(),
            totals: Totals::default(),
            stock_policy: StockPolicy::default(),
            notifier,
        }
    }

    /// Set the stock policy for subsequent adds.
    #[must_use]
    pub fn with_stock_policy(mut self, stock_policy: StockPolicy) -> Self {
        self.stock_policy = stock_policy;
        self
    }

    /// Add an item to the cart, merging with an existing line by product id.
    ///
    /// The requested quantity is the item's `quantity`, coerced up to 1.
    /// When a line with the same id already exists, only its quantity is
    /// incremented; the stored price fields are left untouched. Emits a
    /// confirmation notice naming the item.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfStock`] when the cart enforces stock and
    /// the item is flagged unavailable; the cart is unchanged.
    pub fn add_item(&mut self, item: LineItem) -> Result<(), CartError> {
        if self.stock_policy == StockPolicy::Enforced && !item.in_stock {
            self.notifier
                .notify(Notice::error("Product is out of stock"));
            return Err(CartError::OutOfStock(item.product_id));
        }

        let requested = item.quantity.max(1);
        let name = item.name.clone();

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|line| line.product_id == item.product_id)
        {
            existing.quantity += requested;
        } else {
            self.items.push(LineItem {
                quantity: requested,
                ..item
            });
        }

        self.recompute();
        debug!(item = %name, quantity = requested, "item added to cart");

        self.notifier
            .notify(Notice::success(format!("{name} added to cart")));

        Ok(())
    }

    /// Remove the line matching `id` from the cart.
    ///
    /// On success the removed line is returned and a confirmation notice
    /// names it.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidProductId`]: the id is empty.
    /// - [`CartError::ItemNotFound`]: no line matches the id.
    ///
    /// Both failures emit an error notice and leave the cart unchanged.
    pub fn remove_item(&mut self, id: impl Into<ProductId>) -> Result<LineItem, CartError> {
        let id = id.into();

        if id.is_empty() {
            warn!("item removal requested with an empty product id");
            self.notifier
                .notify(Notice::error("Unable to remove item: invalid product id"));
            return Err(CartError::InvalidProductId);
        }

        let Some(position) = self.items.iter().position(|line| line.product_id == id) else {
            warn!(product_id = %id, "item removal requested for a product not in the cart");
            self.notifier.notify(Notice::error("Item not found in cart"));
            return Err(CartError::ItemNotFound(id));
        };

        let removed = self.items.remove(position);
        self.recompute();

        self.notifier
            .notify(Notice::success(format!("{} removed from cart", removed.name)));

        Ok(removed)
    }

    /// Set the quantity of the line matching `id`.
    ///
    /// A target quantity of zero or below removes the line entirely; a line
    /// is never left at zero. Unknown ids are a no-op.
    pub fn update_quantity(&mut self, id: impl Into<ProductId>, quantity: i64) {
        let id = id.into();

        if quantity <= 0 {
            self.items.retain(|line| line.product_id != id);
        } else if let Some(line) = self.items.iter_mut().find(|line| line.product_id == id) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }

        self.recompute();
    }

    /// Empty the cart and reset every total to zero.
    pub fn clear(&mut self) {
        self.items.clear();
        self.recompute();
        self.notifier.notify(Notice::success("Cart cleared"));
    }

    /// Replace the item list wholesale, as during startup hydration.
    ///
    /// Lines with a non-positive quantity are dropped so the quantity
    /// invariant holds even for hand-edited snapshots. Persistence is not
    /// triggered here; the persistence bridge reacts to item changes on its
    /// own.
    pub fn load(&mut self, items: Vec<LineItem>) {
        let before = items.len();

        self.items = items;
        self.items.retain(|line| line.quantity >= 1);

        let dropped = before - self.items.len();
        if dropped > 0 {
            warn!(dropped, "dropped zero-quantity lines during cart load");
        }

        self.recompute();
    }

    /// The current cart lines, in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The derived totals for the current lines.
    pub fn totals(&self) -> Totals {
        self.totals
    }

    /// Sum of all line quantities.
    pub fn total_items(&self) -> u64 {
        self.totals.items
    }

    /// Sum of effective unit price times quantity over all lines.
    pub fn total_amount(&self) -> Decimal {
        self.totals.amount
    }

    /// Sum of per-unit PV times quantity over all lines.
    pub fn total_pv(&self) -> Decimal {
        self.totals.pv
    }

    /// Number of distinct lines in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The stock policy applied to adds.
    pub fn stock_policy(&self) -> StockPolicy {
        self.stock_policy
    }

    /// The notice sink.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// The notice sink, mutably.
    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    fn recompute(&mut self) {
        self.totals = Totals::of(&self.items);
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::notify::{RecordingNotifier, Severity};

    use super::*;

    fn line(id: &str, price: i64, quantity: u32) -> LineItem {
        LineItem {
            product_id: ProductId::from(id),
            name: format!("Product {id}"),
            image: None,
            price: Decimal::from(price),
            discount_price: None,
            quantity,
            pv: None,
            in_stock: true,
        }
    }

    #[test]
    fn add_distinct_ids_sums_quantities() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(line("p1", 100, 2))?;
        cart.add_item(line("p2", 50, 3))?;

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total_items(), 5);

        Ok(())
    }

    #[test]
    fn add_repeated_id_merges_into_one_line() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(line("p1", 100, 1))?;
        cart.add_item(line("p1", 100, 2))?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_amount(), Decimal::from(300));

        Ok(())
    }

    #[test]
    fn add_repeated_id_keeps_original_price_fields() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(line("p1", 100, 1))?;

        let mut drifted = line("p1", 999, 1);
        drifted.name = "Renamed".to_string();
        cart.add_item(drifted)?;

        let stored = cart.items().first().ok_or("expected one line")?;

        assert_eq!(stored.price, Decimal::from(100));
        assert_eq!(stored.name, "Product p1");
        assert_eq!(stored.quantity, 2);

        Ok(())
    }

    #[test]
    fn add_with_zero_quantity_coerces_to_one() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(line("p1", 100, 0))?;

        assert_eq!(cart.total_items(), 1);

        Ok(())
    }

    #[test]
    fn add_normalizes_numeric_ids_to_strings() -> TestResult {
        let mut cart = Cart::new();

        let mut numeric = line("42", 100, 1);
        numeric.product_id = ProductId::from(42_i64);
        cart.add_item(numeric)?;

        let mut textual = line("42", 100, 1);
        textual.product_id = ProductId::from("42");
        cart.add_item(textual)?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_items(), 2);

        Ok(())
    }

    #[test]
    fn remove_item_returns_removed_line() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(line("p1", 100, 1))?;
        cart.add_item(line("p2", 50, 1))?;

        let removed = cart.remove_item("p1")?;

        assert_eq!(removed.product_id, ProductId::from("p1"));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_amount(), Decimal::from(50));

        Ok(())
    }

    #[test]
    fn remove_with_empty_id_is_a_no_op_error() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(line("p1", 100, 1))?;

        let result = cart.remove_item("");

        assert!(
            matches!(result, Err(CartError::InvalidProductId)),
            "expected InvalidProductId, got {result:?}"
        );
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn remove_unknown_id_leaves_state_unchanged() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(line("p1", 100, 2))?;

        let items_before = cart.items().to_vec();
        let totals_before = cart.totals();

        let result = cart.remove_item("ghost");

        assert!(
            matches!(result, Err(CartError::ItemNotFound(_))),
            "expected ItemNotFound, got {result:?}"
        );
        assert_eq!(cart.items(), items_before);
        assert_eq!(cart.totals(), totals_before);

        Ok(())
    }

    #[test]
    fn update_quantity_to_zero_removes_the_line() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(line("p1", 100, 3))?;
        cart.update_quantity("p1", 0);

        assert!(cart.is_empty());
        assert_eq!(cart.total_amount(), Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn update_quantity_below_zero_removes_the_line() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(line("p1", 100, 3))?;
        cart.update_quantity("p1", -1);

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn update_quantity_sets_positive_quantity() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(line("p1", 100, 1))?;
        cart.update_quantity("p1", 5);

        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.total_amount(), Decimal::from(500));

        Ok(())
    }

    #[test]
    fn update_quantity_unknown_id_is_a_no_op() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(line("p1", 100, 2))?;
        cart.update_quantity("ghost", 7);

        assert_eq!(cart.total_items(), 2);

        Ok(())
    }

    #[test]
    fn clear_resets_all_totals() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(line("p1", 100, 2))?;
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.totals(), Totals::default());

        Ok(())
    }

    #[test]
    fn load_replaces_items_and_recomputes() {
        let mut cart = Cart::new();

        cart.load(vec![line("p1", 100, 2), line("p2", 50, 1)]);

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_amount(), Decimal::from(250));
    }

    #[test]
    fn load_drops_zero_quantity_lines() {
        let mut cart = Cart::new();

        cart.load(vec![line("p1", 100, 0), line("p2", 50, 1)]);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn totals_account_for_discount_and_pv() -> TestResult {
        let mut cart = Cart::new();

        let mut item = line("p2", 200, 1);
        item.discount_price = Some(Decimal::from(150));
        item.pv = Some(Decimal::from(10));
        cart.add_item(item)?;

        assert_eq!(cart.total_amount(), Decimal::from(150));
        assert_eq!(cart.total_pv(), Decimal::from(10));

        Ok(())
    }

    #[test]
    fn permissive_policy_allows_out_of_stock_adds() -> TestResult {
        let mut cart = Cart::new();

        let mut item = line("p1", 100, 1);
        item.in_stock = false;
        cart.add_item(item)?;

        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn enforced_policy_rejects_out_of_stock_adds() {
        let mut cart = Cart::with_notifier(RecordingNotifier::default())
            .with_stock_policy(StockPolicy::Enforced);

        let mut item = line("p1", 100, 1);
        item.in_stock = false;

        let result = cart.add_item(item);

        assert!(
            matches!(result, Err(CartError::OutOfStock(_))),
            "expected OutOfStock, got {result:?}"
        );
        assert!(cart.is_empty());
        assert_eq!(
            cart.notifier().last().map(|notice| notice.severity),
            Some(Severity::Error)
        );
    }

    #[test]
    fn notices_name_the_item_on_add_and_remove() -> TestResult {
        let mut cart = Cart::with_notifier(RecordingNotifier::default());

        cart.add_item(line("p1", 100, 1))?;
        cart.remove_item("p1")?;
        cart.clear();

        let messages: Vec<&str> = cart
            .notifier()
            .notices()
            .iter()
            .map(|notice| notice.message.as_str())
            .collect();

        assert_eq!(
            messages,
            vec![
                "Product p1 added to cart",
                "Product p1 removed from cart",
                "Cart cleared"
            ]
        );

        Ok(())
    }
}
