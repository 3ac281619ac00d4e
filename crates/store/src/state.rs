//! Pure state transitions over catalog, cart and transaction log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pawshop_core::{ItemId, TransactionId};
use pawshop_inventory::{Catalog, CatalogItem, ItemPatch};
use pawshop_sales::{AddToCartOutcome, Cart, CartLine, Transaction, TransactionLog, lines_total};

/// Result of a checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Nothing to check out; state unchanged.
    EmptyCart,
    Committed(Transaction),
}

/// Result of a stock restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Stock was given back and the transaction removed from the log.
    Restored { transaction: Transaction },
    /// Unknown transaction id; state unchanged.
    NotFound,
}

/// New stock level for one catalog item, as checkout would leave it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockUpdate {
    pub item_id: ItemId,
    pub new_stock: u32,
}

/// What a checkout of the current cart would do, computed without mutating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutPlan {
    pub lines: Vec<CartLine>,
    pub total: u64,
    /// One entry per cart line whose item is still in the catalog.
    pub stock_updates: Vec<StockUpdate>,
}

/// Catalog, cart and transaction log of one running client.
///
/// Every method applies its whole effect or none of it; none of them can fail
/// part-way. Silent business rules are reported through the returned outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopState {
    #[serde(default)]
    catalog: Catalog,
    #[serde(default)]
    cart: Cart,
    #[serde(default)]
    transactions: TransactionLog,
}

impl ShopState {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn transactions(&self) -> &TransactionLog {
        &self.transactions
    }

    /// Replace the catalog wholesale (last fetch wins).
    pub fn replace_catalog(&mut self, items: Vec<CatalogItem>) {
        self.catalog.replace_all(items);
    }

    pub fn insert_item(&mut self, item: CatalogItem) {
        self.catalog.insert(item);
    }

    pub fn remove_item(&mut self, id: &ItemId) -> Option<CatalogItem> {
        self.catalog.remove(id)
    }

    /// Merge `patch` into the catalog entry. Returns `false` if absent.
    pub fn edit_item(&mut self, id: &ItemId, patch: &ItemPatch) -> bool {
        self.catalog.apply_patch(id, patch)
    }

    pub fn add_to_cart(&mut self, id: &ItemId) -> AddToCartOutcome {
        self.cart.add(&self.catalog, id)
    }

    pub fn remove_from_cart(&mut self, id: &ItemId) -> bool {
        self.cart.remove(id)
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    pub fn plan_checkout(&self) -> Option<CheckoutPlan> {
        if self.cart.is_empty() {
            return None;
        }

        let lines = self.cart.lines().to_vec();
        let stock_updates = lines
            .iter()
            .filter_map(|line| {
                self.catalog.stock_of(line.item_id()).map(|stock| StockUpdate {
                    item_id: line.item_id().clone(),
                    new_stock: stock.saturating_sub(line.quantity),
                })
            })
            .collect();

        Some(CheckoutPlan {
            total: lines_total(&lines),
            lines,
            stock_updates,
        })
    }

    /// Check out the whole cart at `at`.
    pub fn checkout(&mut self, at: DateTime<Utc>) -> CheckoutOutcome {
        match self.commit_checkout(|_| true, at) {
            Some(transaction) => CheckoutOutcome::Committed(transaction),
            None => CheckoutOutcome::EmptyCart,
        }
    }

    /// Check out the cart lines whose stock change was `confirmed`.
    ///
    /// Lines for items no longer in the catalog need no confirmation. The
    /// committed lines decrement stock (floored at zero), are recorded as one
    /// transaction and leave the cart; unconfirmed lines stay in the cart.
    /// Returns `None`, with state unchanged, when nothing is committed.
    pub fn commit_checkout(
        &mut self,
        confirmed: impl Fn(&ItemId) -> bool,
        at: DateTime<Utc>,
    ) -> Option<Transaction> {
        let (committed, kept): (Vec<CartLine>, Vec<CartLine>) = self
            .cart
            .lines()
            .iter()
            .cloned()
            .partition(|line| !self.catalog.contains(line.item_id()) || confirmed(line.item_id()));

        if committed.is_empty() {
            return None;
        }

        for line in &committed {
            self.catalog.decrement_stock(line.item_id(), line.quantity);
        }
        self.cart
            .retain(|id| kept.iter().any(|line| line.item_id() == id));

        Some(self.transactions.record(committed, at))
    }

    /// Give back the stock consumed by transaction `id` and drop it from the log.
    pub fn restore_stock(&mut self, id: &TransactionId) -> RestoreOutcome {
        let Some(transaction) = self.transactions.remove(id) else {
            return RestoreOutcome::NotFound;
        };

        for line in &transaction.items {
            self.catalog.increment_stock(line.item_id(), line.quantity);
        }

        RestoreOutcome::Restored { transaction }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pawshop_sales::AddRejection;
    use proptest::prelude::*;

    fn id(raw: &str) -> ItemId {
        ItemId::new(raw).unwrap()
    }

    fn item(raw: &str, stock: u32, price: u64) -> CatalogItem {
        CatalogItem {
            id: id(raw),
            name: format!("item {raw}"),
            stock,
            price,
            category: "kucing".to_string(),
        }
    }

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    fn state(items: Vec<CatalogItem>) -> ShopState {
        ShopState::new(Catalog::new(items))
    }

    #[test]
    fn cart_checkout_and_restore_scenario() {
        let mut shop = state(vec![item("a", 2, 100)]);

        assert_eq!(shop.add_to_cart(&id("a")), AddToCartOutcome::Accepted { quantity: 1 });
        assert_eq!(shop.add_to_cart(&id("a")), AddToCartOutcome::Accepted { quantity: 2 });
        assert_eq!(shop.add_to_cart(&id("a")), AddToCartOutcome::Capped { quantity: 2 });
        assert_eq!(shop.cart().quantity_of(&id("a")), 2);

        let CheckoutOutcome::Committed(tx) = shop.checkout(at(1_000)) else {
            panic!("Expected committed checkout");
        };
        assert_eq!(tx.total, 200);
        assert_eq!(tx.items.len(), 1);
        assert_eq!(tx.quantity_of(&id("a")), 2);
        assert_eq!(shop.catalog().stock_of(&id("a")), Some(0));
        assert!(shop.cart().is_empty());
        assert_eq!(shop.transactions().transactions(), &[tx.clone()]);

        match shop.restore_stock(&tx.id) {
            RestoreOutcome::Restored { transaction } => assert_eq!(transaction, tx),
            RestoreOutcome::NotFound => panic!("Expected restored transaction"),
        }
        assert_eq!(shop.catalog().stock_of(&id("a")), Some(2));
        assert!(shop.transactions().is_empty());
    }

    #[test]
    fn zero_stock_add_leaves_state_unchanged() {
        let mut shop = state(vec![item("a", 0, 100)]);
        let before = shop.clone();
        assert_eq!(
            shop.add_to_cart(&id("a")),
            AddToCartOutcome::Rejected {
                reason: AddRejection::OutOfStock
            }
        );
        assert_eq!(shop, before);
    }

    #[test]
    fn checkout_on_empty_cart_is_noop() {
        let mut shop = state(vec![item("a", 2, 100)]);
        let before = shop.clone();
        assert_eq!(shop.checkout(at(1)), CheckoutOutcome::EmptyCart);
        assert!(shop.plan_checkout().is_none());
        assert_eq!(shop, before);
    }

    #[test]
    fn restore_unknown_transaction_is_noop() {
        let mut shop = state(vec![item("a", 2, 100)]);
        let before = shop.clone();
        assert_eq!(
            shop.restore_stock(&TransactionId::from_millis(42)),
            RestoreOutcome::NotFound
        );
        assert_eq!(shop, before);
    }

    #[test]
    fn remove_from_cart_absent_line_is_noop() {
        let mut shop = state(vec![item("a", 2, 100)]);
        shop.add_to_cart(&id("a"));
        assert!(!shop.remove_from_cart(&id("b")));
        assert_eq!(shop.cart().len(), 1);
        assert!(shop.remove_from_cart(&id("a")));
        assert!(shop.cart().is_empty());
    }

    #[test]
    fn checkout_floors_stock_lowered_after_adding() {
        let mut shop = state(vec![item("a", 3, 10)]);
        for _ in 0..3 {
            shop.add_to_cart(&id("a"));
        }
        shop.edit_item(&id("a"), &ItemPatch::stock(1));

        let plan = shop.plan_checkout().unwrap();
        assert_eq!(plan.stock_updates, vec![StockUpdate { item_id: id("a"), new_stock: 0 }]);

        let CheckoutOutcome::Committed(tx) = shop.checkout(at(1)) else {
            panic!("Expected committed checkout");
        };
        assert_eq!(tx.total, 30);
        assert_eq!(shop.catalog().stock_of(&id("a")), Some(0));
    }

    #[test]
    fn lines_for_deleted_items_are_committed_without_stock_change() {
        let mut shop = state(vec![item("a", 3, 10), item("b", 3, 5)]);
        shop.add_to_cart(&id("a"));
        shop.add_to_cart(&id("b"));
        shop.remove_item(&id("b"));

        let plan = shop.plan_checkout().unwrap();
        assert_eq!(plan.stock_updates.len(), 1);
        assert_eq!(plan.total, 15);

        let CheckoutOutcome::Committed(tx) = shop.checkout(at(1)) else {
            panic!("Expected committed checkout");
        };
        assert_eq!(tx.items.len(), 2);
        assert_eq!(shop.catalog().stock_of(&id("a")), Some(2));
    }

    #[test]
    fn partial_commit_keeps_unconfirmed_lines_in_cart() {
        let mut shop = state(vec![item("a", 3, 10), item("b", 3, 5)]);
        shop.add_to_cart(&id("a"));
        shop.add_to_cart(&id("b"));
        shop.add_to_cart(&id("b"));

        let tx = shop.commit_checkout(|item| item == &id("a"), at(7)).unwrap();
        assert_eq!(tx.total, 10);
        assert_eq!(shop.catalog().stock_of(&id("a")), Some(2));
        assert_eq!(shop.catalog().stock_of(&id("b")), Some(3));
        assert_eq!(shop.cart().quantity_of(&id("b")), 2);
        assert!(shop.cart().line(&id("a")).is_none());
    }

    #[test]
    fn nothing_confirmed_changes_nothing() {
        let mut shop = state(vec![item("a", 3, 10)]);
        shop.add_to_cart(&id("a"));
        let before = shop.clone();
        assert!(shop.commit_checkout(|_| false, at(7)).is_none());
        assert_eq!(shop, before);
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut shop = state(vec![item("a", 3, 10)]);
        shop.add_to_cart(&id("a"));
        shop.checkout(at(9));
        shop.add_to_cart(&id("a"));

        let json = serde_json::to_value(&shop).unwrap();
        assert!(json.get("catalog").is_some());
        assert!(json.get("cart").is_some());
        assert!(json.get("transactions").is_some());
        let restored: ShopState = serde_json::from_value(json).unwrap();
        assert_eq!(restored, shop);
    }

    proptest! {
        /// Property: checkout never leaves negative stock, the total equals the
        /// sum of price × quantity, and the cart is empty afterwards.
        #[test]
        fn checkout_keeps_stock_non_negative(
            stocks in prop::collection::vec(0u32..5, 1..6),
            adds in prop::collection::vec(0usize..6, 0..30),
            lowered in prop::collection::vec(0u32..5, 1..6),
        ) {
            let items: Vec<CatalogItem> = stocks
                .iter()
                .enumerate()
                .map(|(i, s)| item(&format!("i{i}"), *s, (i as u64 + 1) * 7))
                .collect();
            let mut shop = state(items);

            for pick in adds {
                let idx = pick % stocks.len();
                shop.add_to_cart(&id(&format!("i{idx}")));
            }
            // Stock may drop below cart quantities before checkout.
            for (i, s) in lowered.iter().enumerate().take(stocks.len()) {
                shop.edit_item(&id(&format!("i{i}")), &ItemPatch::stock(*s));
            }

            let expected_total: u64 = shop.cart().lines().iter().map(|l| l.item.price * u64::from(l.quantity)).sum();
            let expected_stock: Vec<Option<u32>> = (0..stocks.len())
                .map(|i| {
                    let key = id(&format!("i{i}"));
                    shop.catalog().stock_of(&key).map(|s| s.saturating_sub(shop.cart().quantity_of(&key)))
                })
                .collect();
            let was_empty = shop.cart().is_empty();

            match shop.checkout(at(1)) {
                CheckoutOutcome::EmptyCart => prop_assert!(was_empty),
                CheckoutOutcome::Committed(tx) => {
                    prop_assert_eq!(tx.total, expected_total);
                }
            }
            prop_assert!(shop.cart().is_empty());
            for (i, expected) in expected_stock.iter().enumerate() {
                prop_assert_eq!(shop.catalog().stock_of(&id(&format!("i{i}"))), *expected);
            }
        }
    }
}
