//! Account balance mutation. Every balance move in the system goes through
//! [`AccountLedger::credit`], keeping the adjustment paired with the store
//! update that persists it.

use crate::error::Result;
use broker_api::{Account, AccountId, TradeStore};
use log::debug;
use std::sync::Arc;

#[derive(Clone)]
pub struct AccountLedger {
    store: Arc<dyn TradeStore>,
}

impl AccountLedger {
    pub fn new(store: Arc<dyn TradeStore>) -> Self {
        Self { store }
    }

    /// Credits `amount` to the account balance and persists the account.
    /// Debits are negative credits.
    pub fn credit(&self, account_id: AccountId, amount: f64) -> Result<Account> {
        let mut account = self.store.account(account_id)?;
        account.credit(amount);
        self.store.update_account(&account)?;
        debug!(
            "ledger: account {} adjusted by {:.2}, balance now {:.2}",
            account_id,
            amount,
            account.balance()
        );
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use broker_core::MemoryStore;

    #[test]
    fn test_debit_then_credit_restores_balance() {
        let store = Arc::new(MemoryStore::new());
        let account = store.insert_account("uid:0", 10000.0, 0).unwrap();
        let ledger = AccountLedger::new(store.clone());

        ledger.credit(account.account_id(), -2574.95).unwrap();
        let restored = ledger.credit(account.account_id(), 2574.95).unwrap();

        assert!((restored.balance() - 10000.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_account_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let ledger = AccountLedger::new(store);

        let err = ledger.credit(AccountId::new(404), 1.0).unwrap_err();
        assert!(matches!(err, crate::error::TradeError::NotFound { .. }));
    }
}
