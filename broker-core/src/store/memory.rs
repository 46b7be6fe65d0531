//! In-memory arena implementation of the record store.
//!
//! Records live in maps keyed by store-assigned sequence values; symbols key
//! quotes directly. Quote listing order is preserved because the market
//! summary breaks ties by storage order.

use broker_api::{
    Account, AccountId, Holding, HoldingId, Id, Order, OrderId, OrderKind, Quote, StoreError,
    TradeStore,
};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct StoreInner {
    next_id: Id,
    accounts: HashMap<Id, Account>,
    users: HashMap<String, Id>,
    holdings: HashMap<Id, Holding>,
    orders: HashMap<Id, Order>,
    quotes: HashMap<String, Quote>,
    listing_order: Vec<String>,
}

impl StoreInner {
    fn next_id(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreInner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreInner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

impl TradeStore for MemoryStore {
    fn insert_account(
        &self,
        user_id: &str,
        open_balance: f64,
        creation_date: i64,
    ) -> Result<Account, StoreError> {
        let mut inner = self.write()?;
        if inner.users.contains_key(user_id) {
            return Err(StoreError::duplicate("account", user_id));
        }
        let id = inner.next_id();
        let account = Account::new(AccountId::new(id), user_id, open_balance, creation_date);
        inner.users.insert(user_id.to_string(), id);
        inner.accounts.insert(id, account.clone());
        Ok(account)
    }

    fn account(&self, account_id: AccountId) -> Result<Account, StoreError> {
        self.read()?
            .accounts
            .get(&account_id.value())
            .cloned()
            .ok_or_else(|| StoreError::not_found("account", account_id))
    }

    fn account_for_user(&self, user_id: &str) -> Result<Account, StoreError> {
        let inner = self.read()?;
        inner
            .users
            .get(user_id)
            .and_then(|id| inner.accounts.get(id))
            .cloned()
            .ok_or_else(|| StoreError::not_found("account", user_id))
    }

    fn update_account(&self, account: &Account) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let id = account.account_id().value();
        if !inner.accounts.contains_key(&id) {
            return Err(StoreError::not_found("account", account.account_id()));
        }
        inner.accounts.insert(id, account.clone());
        Ok(())
    }

    fn create_quote(&self, quote: Quote) -> Result<Quote, StoreError> {
        let mut inner = self.write()?;
        let symbol = quote.symbol().to_string();
        if inner.quotes.contains_key(&symbol) {
            return Err(StoreError::duplicate("quote", symbol));
        }
        inner.listing_order.push(symbol.clone());
        inner.quotes.insert(symbol, quote.clone());
        Ok(quote)
    }

    fn quote(&self, symbol: &str) -> Result<Quote, StoreError> {
        self.read()?
            .quotes
            .get(symbol)
            .cloned()
            .ok_or_else(|| StoreError::not_found("quote", symbol))
    }

    fn update_quote(&self, quote: &Quote) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        if !inner.quotes.contains_key(quote.symbol()) {
            return Err(StoreError::not_found("quote", quote.symbol()));
        }
        inner
            .quotes
            .insert(quote.symbol().to_string(), quote.clone());
        Ok(())
    }

    fn all_quotes(&self) -> Result<Vec<Quote>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .listing_order
            .iter()
            .filter_map(|symbol| inner.quotes.get(symbol))
            .cloned()
            .collect())
    }

    fn create_holding(
        &self,
        account_id: AccountId,
        symbol: &str,
        quantity: f64,
        purchase_price: f64,
        purchase_date: i64,
    ) -> Result<Holding, StoreError> {
        let mut inner = self.write()?;
        let id = inner.next_id();
        let holding = Holding::new(
            HoldingId::new(id),
            account_id,
            symbol,
            quantity,
            purchase_price,
            purchase_date,
        );
        inner.holdings.insert(id, holding.clone());
        Ok(holding)
    }

    fn holding(&self, holding_id: HoldingId) -> Result<Option<Holding>, StoreError> {
        Ok(self.read()?.holdings.get(&holding_id.value()).cloned())
    }

    fn update_holding(&self, holding: &Holding) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let id = holding.holding_id().value();
        if !inner.holdings.contains_key(&id) {
            return Err(StoreError::not_found("holding", holding.holding_id()));
        }
        inner.holdings.insert(id, holding.clone());
        Ok(())
    }

    fn remove_holding(&self, holding_id: HoldingId) -> Result<Option<Holding>, StoreError> {
        Ok(self.write()?.holdings.remove(&holding_id.value()))
    }

    fn holdings_for_account(&self, account_id: AccountId) -> Result<Vec<Holding>, StoreError> {
        let mut holdings: Vec<Holding> = self
            .read()?
            .holdings
            .values()
            .filter(|h| h.account_id() == account_id)
            .cloned()
            .collect();
        holdings.sort_by_key(|h| h.holding_id().value());
        Ok(holdings)
    }

    fn create_order(
        &self,
        account_id: AccountId,
        symbol: &str,
        kind: OrderKind,
        quantity: f64,
        price: f64,
        fee: f64,
        holding_id: Option<HoldingId>,
        open_date: i64,
    ) -> Result<Order, StoreError> {
        let mut inner = self.write()?;
        let id = inner.next_id();
        let order = Order::new(
            OrderId::new(id),
            kind,
            account_id,
            symbol,
            quantity,
            price,
            fee,
            holding_id,
            open_date,
        );
        inner.orders.insert(id, order.clone());
        Ok(order)
    }

    fn order(&self, order_id: OrderId) -> Result<Order, StoreError> {
        self.read()?
            .orders
            .get(&order_id.value())
            .cloned()
            .ok_or_else(|| StoreError::not_found("order", order_id))
    }

    fn update_order(&self, order: &Order) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let id = order.order_id().value();
        if !inner.orders.contains_key(&id) {
            return Err(StoreError::not_found("order", order.order_id()));
        }
        inner.orders.insert(id, order.clone());
        Ok(())
    }

    fn orders_for_account(&self, account_id: AccountId) -> Result<Vec<Order>, StoreError> {
        let mut orders: Vec<Order> = self
            .read()?
            .orders
            .values()
            .filter(|o| o.account_id() == account_id)
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.order_id().value());
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_registration_and_lookup() {
        let store = MemoryStore::new();
        let account = store.insert_account("uid:0", 10000.0, 0).unwrap();

        assert_eq!(store.account(account.account_id()).unwrap(), account);
        assert_eq!(store.account_for_user("uid:0").unwrap(), account);
        assert!(matches!(
            store.insert_account("uid:0", 500.0, 0),
            Err(StoreError::Duplicate { .. })
        ));
        assert!(matches!(
            store.account_for_user("uid:99"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_quotes_keep_listing_order() {
        let store = MemoryStore::new();
        for i in 0..4 {
            store
                .create_quote(Quote::new(
                    format!("s:{}", i),
                    format!("S{} Incorporated", i),
                    50.0,
                ))
                .unwrap();
        }

        let symbols: Vec<String> = store
            .all_quotes()
            .unwrap()
            .iter()
            .map(|q| q.symbol().to_string())
            .collect();
        assert_eq!(symbols, vec!["s:0", "s:1", "s:2", "s:3"]);
    }

    #[test]
    fn test_remove_holding_is_idempotent() {
        let store = MemoryStore::new();
        let account = store.insert_account("uid:0", 0.0, 0).unwrap();
        let holding = store
            .create_holding(account.account_id(), "s:0", 100.0, 25.0, 1)
            .unwrap();

        let removed = store.remove_holding(holding.holding_id()).unwrap();
        assert_eq!(removed, Some(holding.clone()));

        // Second removal observes it already gone, without erroring.
        assert_eq!(store.remove_holding(holding.holding_id()).unwrap(), None);
        assert_eq!(store.holding(holding.holding_id()).unwrap(), None);
    }

    #[test]
    fn test_order_ids_are_unique_and_stable() {
        let store = MemoryStore::new();
        let account = store.insert_account("uid:0", 0.0, 0).unwrap();

        let first = store
            .create_order(
                account.account_id(),
                "s:0",
                OrderKind::Buy,
                10.0,
                50.0,
                24.95,
                None,
                0,
            )
            .unwrap();
        let second = store
            .create_order(
                account.account_id(),
                "s:0",
                OrderKind::Sell,
                10.0,
                50.0,
                24.95,
                None,
                0,
            )
            .unwrap();

        assert_ne!(first.order_id(), second.order_id());
        let listed = store.orders_for_account(account.account_id()).unwrap();
        assert_eq!(listed, vec![first, second]);
    }
}
