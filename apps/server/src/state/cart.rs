//! # Cart State
//!
//! The till's single cart, shared by every request.
//!
//! ## Thread Safety
//! The cart sits behind `Arc<Mutex<_>>`. Every mutation holds the lock only
//! for one synchronous reducer call, never across an `.await`. Reducer calls
//! are all-or-nothing, so a poisoned lock still guards a consistent cart and
//! is recovered rather than reported.
//!
//! ## Committing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  begin_commit()  ── snapshot cart + revision, mark commit in flight    │
//! │       │             (a second begin_commit gets SALE_IN_PROGRESS)       │
//! │       ▼                                                                 │
//! │  db.sales().commit(..).await        (lock NOT held)                     │
//! │       │                                                                 │
//! │       ├── Ok  → guard.finish(): clear the cart if the revision is      │
//! │       │         unchanged, i.e. nobody touched it meanwhile            │
//! │       └── Err → guard dropped: cart untouched, user can retry          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use kassa_core::{Cart, CartAction};
use tracing::{debug, warn};

use crate::error::{ApiError, ErrorCode};

#[derive(Debug, Default)]
struct TrackedCart {
    cart: Cart,
    /// Bumped on every change.
    revision: u64,
    committing: bool,
}

/// Shared cart state.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    inner: Arc<Mutex<TrackedCart>>,
}

impl CartState {
    pub fn new() -> Self {
        CartState::default()
    }

    fn lock(&self) -> MutexGuard<'_, TrackedCart> {
        lock_tracked(&self.inner)
    }

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        f(&self.lock().cart)
    }

    /// Applies an action and returns whether it changed the cart, along
    /// with the resulting cart.
    ///
    /// ## Errors
    /// `VALIDATION_ERROR` if the resulting total would overflow; the cart is
    /// left unchanged.
    pub fn apply(&self, action: CartAction) -> Result<(bool, Cart), ApiError> {
        let mut tracked = self.lock();
        let changed = tracked.cart.apply(action)?;
        if changed {
            tracked.revision += 1;
        }
        debug!(changed, revision = tracked.revision, "Cart action applied");
        Ok((changed, tracked.cart.clone()))
    }

    /// Takes a snapshot of the cart for committing.
    ///
    /// ## Errors
    /// `SALE_IN_PROGRESS` if another commit has not finished yet.
    pub fn begin_commit(&self) -> Result<CommitGuard, ApiError> {
        let mut tracked = self.lock();
        if tracked.committing {
            return Err(ApiError::new(
                ErrorCode::SaleInProgress,
                "A sale is already being completed",
            ));
        }
        tracked.committing = true;

        Ok(CommitGuard {
            inner: Arc::clone(&self.inner),
            cart: tracked.cart.clone(),
            revision: tracked.revision,
        })
    }
}

/// A commit in flight. Dropping it releases the cart for the next commit.
#[derive(Debug)]
pub struct CommitGuard {
    inner: Arc<Mutex<TrackedCart>>,
    cart: Cart,
    revision: u64,
}

impl CommitGuard {
    /// The cart as it was when the commit started.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Marks the sale as stored. Clears the cart unless it changed after the
    /// snapshot was taken.
    ///
    /// ## Returns
    /// Whether the cart was cleared.
    pub fn finish(self) -> bool {
        let mut tracked = lock_tracked(&self.inner);

        if tracked.revision != self.revision {
            debug!(
                snapshot = self.revision,
                current = tracked.revision,
                "Cart changed during commit, keeping it"
            );
            return false;
        }

        tracked.cart.clear();
        tracked.revision += 1;
        true
    }
}

impl Drop for CommitGuard {
    fn drop(&mut self) {
        lock_tracked(&self.inner).committing = false;
    }
}

fn lock_tracked(inner: &Mutex<TrackedCart>) -> MutexGuard<'_, TrackedCart> {
    inner.lock().unwrap_or_else(|poisoned| {
        warn!("Cart mutex was poisoned, recovering");
        PoisonError::into_inner(poisoned)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kassa_core::{Item, Money};

    fn item(id: i64, stock: i64) -> Item {
        Item {
            id,
            name: format!("Item {id}"),
            cost_price_cents: 100,
            sell_price_cents: 250,
            inventory_count: stock,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_apply_reports_changes() {
        let state = CartState::new();

        let (changed, cart) = state.apply(CartAction::AddItem(item(1, 1))).unwrap();
        assert!(changed);
        assert_eq!(cart.total(), Money::from_cents(250));

        let (changed, cart) = state.apply(CartAction::AddItem(item(1, 1))).unwrap();
        assert!(!changed);
        assert_eq!(cart.quantity_of(1), Some(1));
    }

    #[test]
    fn test_finish_clears_unchanged_cart() {
        let state = CartState::new();
        state.apply(CartAction::AddItem(item(1, 5))).unwrap();

        let guard = state.begin_commit().unwrap();
        assert_eq!(guard.cart().line_count(), 1);
        assert!(guard.finish());

        assert!(state.with_cart(|cart| cart.is_empty()));
    }

    #[test]
    fn test_finish_keeps_cart_modified_during_commit() {
        let state = CartState::new();
        state.apply(CartAction::AddItem(item(1, 5))).unwrap();

        let guard = state.begin_commit().unwrap();
        state.apply(CartAction::AddItem(item(2, 5))).unwrap();
        assert!(!guard.finish());

        assert_eq!(state.with_cart(|cart| cart.line_count()), 2);
    }

    #[test]
    fn test_only_one_commit_at_a_time() {
        let state = CartState::new();
        state.apply(CartAction::AddItem(item(1, 5))).unwrap();

        let guard = state.begin_commit().unwrap();
        let second = state.begin_commit();
        assert!(matches!(second, Err(ApiError { code: ErrorCode::SaleInProgress, .. })));

        drop(guard);
        assert!(state.begin_commit().is_ok());
    }

    #[test]
    fn test_overflowing_action_keeps_cart_usable() {
        let state = CartState::new();
        let pricey = Item {
            sell_price_cents: 5_000_000_000_000_000_000,
            ..item(1, 3)
        };

        state.apply(CartAction::AddItem(pricey.clone())).unwrap();
        let err = state.apply(CartAction::AddItem(pricey)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert_eq!(state.with_cart(|cart| cart.quantity_of(1)), Some(1));
        let (changed, cart) = state.apply(CartAction::RemoveItem(1)).unwrap();
        assert!(changed);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_poisoned_lock_is_recovered() {
        let state = CartState::new();
        state.apply(CartAction::AddItem(item(1, 5))).unwrap();

        let inner = Arc::clone(&state.inner);
        let _ = std::thread::spawn(move || {
            let _guard = inner.lock().unwrap();
            panic!("panic while holding the cart");
        })
        .join();
        assert!(state.inner.is_poisoned());

        assert_eq!(state.with_cart(|cart| cart.line_count()), 1);
        assert!(state.apply(CartAction::ClearCart).is_ok());
    }
}
