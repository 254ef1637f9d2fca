//! # Cart
//!
//! The cart held by the till before a sale is committed, and the reducer that
//! drives it.
//!
//! ## Actions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Reducer                                         │
//! │                                                                         │
//! │  Action               Lines                      total   custom_amount │
//! │  ──────               ─────                      ─────   ───────────── │
//! │  AddItem(item)        +1 or new line (≤ stock)   resync  = total       │
//! │  UpdateQuantity(id,n) clamp n to [0, stock],     resync  = total       │
//! │                       0 removes the line                               │
//! │  RemoveItem(id)       drop the line              resync  = total       │
//! │  SetCustomAmount(x)   -                          -       = x           │
//! │  ClearCart            []                         0       0             │
//! │                                                                         │
//! │  A rejected AddItem (no stock left) leaves everything untouched,       │
//! │  including an amount the cashier already typed in.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - `1 <= line.quantity <= line.item.inventory_count` for every line
//! - `total == Σ line.item.sell_price × line.quantity`
//! - an action whose total would not fit in `i64` cents fails with
//!   [`CoreError::AmountOverflow`] and leaves the cart as it was

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Item, NewSale, NewSaleLine};

// =============================================================================
// Cart Line
// =============================================================================

/// An item snapshot and how many of it are in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    pub item: Item,
    pub quantity: i64,
}

impl CartLine {
    /// Price × quantity, or `None` on overflow.
    #[inline]
    pub fn line_total(&self) -> Option<Money> {
        self.item.sell_price().checked_mul(self.quantity)
    }
}

fn checked_total(lines: &[CartLine]) -> CoreResult<Money> {
    lines
        .iter()
        .try_fold(Money::zero(), |total, line| {
            line.line_total().and_then(|amount| total.checked_add(amount))
        })
        .ok_or(CoreError::AmountOverflow)
}

// =============================================================================
// Actions
// =============================================================================

/// Every way the cart can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    AddItem(Item),
    UpdateQuantity { item_id: i64, quantity: i64 },
    RemoveItem(i64),
    SetCustomAmount(Money),
    ClearCart,
}

// =============================================================================
// Settlement
// =============================================================================

/// How the amount paid compares to the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
#[ts(export)]
pub enum Settlement {
    /// Paid exactly the total.
    Exact,
    /// Paid more than the total; the difference goes back to the customer.
    Change(Money),
    /// Paid less than the total; the difference is still owed.
    Remaining(Money),
}

impl Settlement {
    pub fn between(total: Money, paid: Money) -> Self {
        if paid > total {
            Settlement::Change(paid - total)
        } else if paid < total {
            Settlement::Remaining(total - paid)
        } else {
            Settlement::Exact
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The in-progress sale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    lines: Vec<CartLine>,
    total: Money,
    custom_amount: Money,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn total(&self) -> Money {
        self.total
    }

    /// The amount the customer pays. Follows the total until it is set
    /// explicitly, and is reset to the total by every structural change.
    pub fn custom_amount(&self) -> Money {
        self.custom_amount
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct items.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Number of units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    pub fn quantity_of(&self, item_id: i64) -> Option<i64> {
        self.lines
            .iter()
            .find(|line| line.item.id == item_id)
            .map(|line| line.quantity)
    }

    pub fn settlement(&self) -> Settlement {
        Settlement::between(self.total, self.custom_amount)
    }

    /// Applies one action. Returns whether the cart changed.
    ///
    /// ## Errors
    /// [`CoreError::AmountOverflow`] if the new total does not fit; the cart
    /// is left unchanged.
    pub fn apply(&mut self, action: CartAction) -> CoreResult<bool> {
        match action {
            CartAction::AddItem(item) => self.add_item(item),
            CartAction::UpdateQuantity { item_id, quantity } => {
                self.update_quantity(item_id, quantity)?;
                Ok(true)
            }
            CartAction::RemoveItem(item_id) => {
                self.remove_item(item_id)?;
                Ok(true)
            }
            CartAction::SetCustomAmount(amount) => {
                self.set_custom_amount(amount);
                Ok(true)
            }
            CartAction::ClearCart => {
                self.clear();
                Ok(true)
            }
        }
    }

    /// Adds one unit of `item`.
    ///
    /// The stock check uses the incoming item, which is the freshest view of
    /// inventory. On success the line's snapshot is replaced with it.
    /// Returns `Ok(false)` (and changes nothing) when no more stock is available.
    pub fn add_item(&mut self, item: Item) -> CoreResult<bool> {
        let mut lines = self.lines.clone();

        if let Some(line) = lines.iter_mut().find(|line| line.item.id == item.id) {
            if line.quantity >= item.inventory_count {
                return Ok(false);
            }
            line.quantity += 1;
            line.item = item;
        } else {
            if item.inventory_count <= 0 {
                return Ok(false);
            }
            lines.push(CartLine { item, quantity: 1 });
        }

        self.replace_lines(lines)?;
        Ok(true)
    }

    /// Sets a line's quantity, clamped to `[0, inventory_count]`.
    /// Zero removes the line. Unknown ids leave the lines as they are.
    pub fn update_quantity(&mut self, item_id: i64, quantity: i64) -> CoreResult<()> {
        let mut lines = self.lines.clone();
        if let Some(line) = lines.iter_mut().find(|line| line.item.id == item_id) {
            line.quantity = quantity.min(line.item.inventory_count).max(0);
        }
        lines.retain(|line| line.quantity > 0);
        self.replace_lines(lines)
    }

    pub fn remove_item(&mut self, item_id: i64) -> CoreResult<()> {
        let mut lines = self.lines.clone();
        lines.retain(|line| line.item.id != item_id);
        self.replace_lines(lines)
    }

    /// Sets the amount paid. Never clamped: under- and overpayment are both
    /// legitimate and show up in [`Cart::settlement`].
    pub fn set_custom_amount(&mut self, amount: Money) {
        self.custom_amount = amount;
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.total = Money::zero();
        self.custom_amount = Money::zero();
    }

    /// Builds the sale to persist from the current cart.
    ///
    /// ## Errors
    /// - [`CoreError::EmptyCart`] when there is nothing to sell
    /// - [`CoreError::InvalidAmountPaid`] when the amount paid is not positive
    pub fn to_new_sale(&self) -> CoreResult<NewSale> {
        if self.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        if !self.custom_amount.is_positive() {
            return Err(CoreError::InvalidAmountPaid {
                reason: "amount paid must be greater than zero".to_string(),
            });
        }

        Ok(NewSale {
            total_amount_cents: self.total.cents(),
            amount_paid_cents: self.custom_amount.cents(),
            lines: self
                .lines
                .iter()
                .map(|line| NewSaleLine {
                    item_id: line.item.id,
                    quantity: line.quantity,
                    price_per_item_cents: line.item.sell_price_cents,
                })
                .collect(),
        })
    }

    fn replace_lines(&mut self, lines: Vec<CartLine>) -> CoreResult<()> {
        let total = checked_total(&lines)?;
        self.lines = lines;
        self.total = total;
        self.custom_amount = total;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    fn item(id: i64, sell_price_cents: i64, inventory_count: i64) -> Item {
        Item {
            id,
            name: format!("Item {id}"),
            cost_price_cents: sell_price_cents / 2,
            sell_price_cents,
            inventory_count,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_item_creates_line_and_syncs_amount() {
        let mut cart = Cart::new();
        assert!(cart.add_item(item(1, 450, 3)).unwrap());

        assert_eq!(cart.quantity_of(1), Some(1));
        assert_eq!(cart.total(), Money::from_cents(450));
        assert_eq!(cart.custom_amount(), Money::from_cents(450));
    }

    #[test]
    fn test_add_item_stops_at_inventory() {
        let mut cart = Cart::new();
        let candle = item(1, 450, 2);

        assert!(cart.add_item(candle.clone()).unwrap());
        assert!(cart.add_item(candle.clone()).unwrap());
        assert!(!cart.add_item(candle).unwrap());

        assert_eq!(cart.quantity_of(1), Some(2));
        assert_eq!(cart.total(), Money::from_cents(900));
    }

    #[test]
    fn test_add_out_of_stock_item_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 450, 5)).unwrap();
        cart.set_custom_amount(Money::from_cents(2000));
        let before = cart.clone();

        assert!(!cart.add_item(item(2, 300, 0)).unwrap());
        assert_eq!(cart, before);
    }

    #[test]
    fn test_add_uses_incoming_inventory() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 450, 5)).unwrap();
        cart.add_item(item(1, 450, 5)).unwrap();

        // Stock dropped to 2 elsewhere; a third unit is refused.
        assert!(!cart.add_item(item(1, 450, 2)).unwrap());
        assert_eq!(cart.quantity_of(1), Some(2));
    }

    #[test]
    fn test_update_quantity_clamps_to_inventory() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 100, 4)).unwrap();

        cart.update_quantity(1, 10).unwrap();
        assert_eq!(cart.quantity_of(1), Some(4));
        assert_eq!(cart.total(), Money::from_cents(400));

        cart.update_quantity(1, -3).unwrap();
        assert_eq!(cart.quantity_of(1), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_resets_custom_amount() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 100, 4)).unwrap();
        cart.set_custom_amount(Money::from_cents(5000));

        cart.update_quantity(99, 2).unwrap();
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.custom_amount(), cart.total());
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 100, 4)).unwrap();
        cart.add_item(item(2, 250, 4)).unwrap();

        cart.remove_item(1).unwrap();
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total(), Money::from_cents(250));
        assert_eq!(cart.custom_amount(), Money::from_cents(250));
    }

    #[test]
    fn test_set_custom_amount_is_independent_of_total() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 1250, 4)).unwrap();

        cart.set_custom_amount(Money::from_cents(2000));
        assert_eq!(cart.total(), Money::from_cents(1250));
        assert_eq!(cart.settlement(), Settlement::Change(Money::from_cents(750)));

        cart.set_custom_amount(Money::from_cents(1000));
        assert_eq!(cart.settlement(), Settlement::Remaining(Money::from_cents(250)));

        cart.set_custom_amount(Money::from_cents(1250));
        assert_eq!(cart.settlement(), Settlement::Exact);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 1250, 4)).unwrap();
        cart.set_custom_amount(Money::from_cents(10));

        cart.clear();
        assert_eq!(cart, Cart::new());
    }

    #[test]
    fn test_apply_dispatches() {
        let mut cart = Cart::new();
        let candle = item(1, 300, 3);

        assert!(cart.apply(CartAction::AddItem(candle.clone())).unwrap());
        assert!(cart.apply(CartAction::UpdateQuantity { item_id: 1, quantity: 3 }).unwrap());
        assert!(!cart.apply(CartAction::AddItem(candle)).unwrap());
        assert_eq!(cart.total_quantity(), 3);

        cart.apply(CartAction::SetCustomAmount(Money::from_cents(1000))).unwrap();
        assert_eq!(cart.custom_amount(), Money::from_cents(1000));

        cart.apply(CartAction::RemoveItem(1)).unwrap();
        assert!(cart.is_empty());

        cart.apply(CartAction::ClearCart).unwrap();
        assert_eq!(cart.custom_amount(), Money::zero());
    }

    #[test]
    fn test_to_new_sale() {
        let mut cart = Cart::new();
        assert!(matches!(cart.to_new_sale(), Err(CoreError::EmptyCart)));

        cart.add_item(item(1, 300, 3)).unwrap();
        cart.add_item(item(1, 300, 3)).unwrap();
        cart.add_item(item(2, 125, 1)).unwrap();

        let sale = cart.to_new_sale().unwrap();
        assert_eq!(sale.total_amount_cents, 725);
        assert_eq!(sale.amount_paid_cents, 725);
        assert_eq!(
            sale.lines,
            vec![
                NewSaleLine { item_id: 1, quantity: 2, price_per_item_cents: 300 },
                NewSaleLine { item_id: 2, quantity: 1, price_per_item_cents: 125 },
            ]
        );

        cart.set_custom_amount(Money::zero());
        assert!(matches!(
            cart.to_new_sale(),
            Err(CoreError::InvalidAmountPaid { .. })
        ));
    }

    #[test]
    fn test_total_overflow_is_rejected_without_change() {
        let mut cart = Cart::new();
        let pricey = item(1, 5_000_000_000_000_000_000, 3);

        assert!(cart.add_item(pricey.clone()).unwrap());
        let before = cart.clone();

        assert!(matches!(cart.add_item(pricey), Err(CoreError::AmountOverflow)));
        assert_eq!(cart, before);

        assert!(matches!(
            cart.update_quantity(1, 3),
            Err(CoreError::AmountOverflow)
        ));
        assert_eq!(cart, before);

        cart.remove_item(1).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_settlement_json_shape() {
        let json = serde_json::to_value(Settlement::Change(Money::from_cents(75))).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "change", "amount": 75 }));

        let json = serde_json::to_value(Settlement::Exact).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "exact" }));
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    fn arb_item() -> impl Strategy<Value = Item> {
        (1i64..=4, 1i64..=2_000, 0i64..=6).prop_map(|(id, price, stock)| item(id, price, stock))
    }

    fn arb_action() -> impl Strategy<Value = CartAction> {
        prop_oneof![
            4 => arb_item().prop_map(CartAction::AddItem),
            2 => (1i64..=4, -2i64..=8)
                .prop_map(|(item_id, quantity)| CartAction::UpdateQuantity { item_id, quantity }),
            1 => (1i64..=4).prop_map(CartAction::RemoveItem),
            1 => (0i64..=10_000).prop_map(|c| CartAction::SetCustomAmount(Money::from_cents(c))),
            1 => Just(CartAction::ClearCart),
        ]
    }

    fn expected_total(cart: &Cart) -> Money {
        cart.lines()
            .iter()
            .map(|line| Money::from_cents(line.item.sell_price_cents * line.quantity))
            .sum()
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 256, ..ProptestConfig::default() })]

        #[test]
        fn prop_adds_never_exceed_inventory(items in prop::collection::vec(arb_item(), 0..40)) {
            let mut cart = Cart::new();
            for item in items {
                cart.apply(CartAction::AddItem(item)).unwrap();
                for line in cart.lines() {
                    prop_assert!(line.quantity >= 1);
                    prop_assert!(line.quantity <= line.item.inventory_count);
                }
            }
        }

        #[test]
        fn prop_total_matches_lines(actions in prop::collection::vec(arb_action(), 0..40)) {
            let mut cart = Cart::new();
            for action in actions {
                cart.apply(action).unwrap();
                prop_assert_eq!(cart.total(), expected_total(&cart));
                prop_assert!(cart.lines().iter().all(|line| line.quantity > 0));
            }
        }

        #[test]
        fn prop_remove_then_add_restores_single_unit(
            actions in prop::collection::vec(arb_action(), 0..20),
            item in arb_item().prop_filter("needs stock", |i| i.inventory_count > 0),
        ) {
            let mut cart = Cart::new();
            for action in actions {
                cart.apply(action).unwrap();
            }
            cart.apply(CartAction::RemoveItem(item.id)).unwrap();
            cart.apply(CartAction::AddItem(item.clone())).unwrap();
            prop_assert_eq!(cart.quantity_of(item.id), Some(1));
        }

        #[test]
        fn prop_update_to_zero_removes_line(
            actions in prop::collection::vec(arb_action(), 0..20),
            item_id in 1i64..=4,
        ) {
            let mut cart = Cart::new();
            for action in actions {
                cart.apply(action).unwrap();
            }
            cart.apply(CartAction::UpdateQuantity { item_id, quantity: 0 }).unwrap();
            prop_assert_eq!(cart.quantity_of(item_id), None);
        }

        #[test]
        fn prop_clear_resets_everything(actions in prop::collection::vec(arb_action(), 0..30)) {
            let mut cart = Cart::new();
            for action in actions {
                cart.apply(action).unwrap();
            }
            cart.apply(CartAction::ClearCart).unwrap();
            prop_assert!(cart.lines().is_empty());
            prop_assert_eq!(cart.total(), Money::zero());
            prop_assert_eq!(cart.custom_amount(), Money::zero());
        }
    }
}
