use super::ids::AccountId;
use serde::{Deserialize, Serialize};

/// A trading account. Balance mutation is funneled through the engine's
/// ledger; nothing else should write to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    account_id: AccountId,
    user_id: String,
    balance: f64,
    open_balance: f64,
    login_count: u32,
    logout_count: u32,
    last_login: Option<i64>,
    creation_date: i64,
}

impl Account {
    pub fn new(
        account_id: AccountId,
        user_id: impl Into<String>,
        open_balance: f64,
        creation_date: i64,
    ) -> Self {
        Self {
            account_id,
            user_id: user_id.into(),
            balance: open_balance,
            open_balance,
            login_count: 0,
            logout_count: 0,
            last_login: None,
            creation_date,
        }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn open_balance(&self) -> f64 {
        self.open_balance
    }

    pub fn login_count(&self) -> u32 {
        self.login_count
    }

    pub fn logout_count(&self) -> u32 {
        self.logout_count
    }

    pub fn last_login(&self) -> Option<i64> {
        self.last_login
    }

    pub fn creation_date(&self) -> i64 {
        self.creation_date
    }

    /// Applies a signed adjustment. Debits are negative credits.
    pub fn credit(&mut self, amount: f64) {
        self.balance += amount;
    }

    pub fn login(&mut self, now: i64) {
        self.login_count += 1;
        self.last_login = Some(now);
    }

    pub fn logout(&mut self) {
        self.logout_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_is_signed() {
        let mut account = Account::new(AccountId::new(1), "uid:0", 10000.0, 0);
        account.credit(-250.5);
        account.credit(50.5);

        assert!((account.balance() - 9800.0).abs() < 1e-9);
        assert!((account.open_balance() - 10000.0).abs() < 1e-9);
    }

    #[test]
    fn test_login_logout_counters() {
        let mut account = Account::new(AccountId::new(1), "uid:0", 0.0, 0);
        assert_eq!(account.last_login(), None);

        account.login(1_700_000_000_000);
        account.login(1_700_000_100_000);
        account.logout();

        assert_eq!(account.login_count(), 2);
        assert_eq!(account.logout_count(), 1);
        assert_eq!(account.last_login(), Some(1_700_000_100_000));
    }
}
