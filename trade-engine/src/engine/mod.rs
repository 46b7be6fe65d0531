//! The order processor: creates orders, moves money, and drives orders
//! through their completion state machine.

use crate::dispatch::{CompletionMode, DeferredCompletion, DelayedSpawner};
use crate::error::{Result, TradeError};
use crate::ledger::AccountLedger;
use crate::quote::{random_change_factor, QuotePriceUpdater};
use crate::settings::TradeSettings;
use crate::summary::MarketSummaryCache;
use broker_api::{
    Account, CompletionQueue, Holding, HoldingId, MarketSummary, NotificationPublisher, Order,
    OrderId, OrderKind, OrderMessage, OrderStatus, Quote, TradeStore,
};
use chrono::Utc;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

/// Central order lifecycle service. Cheap to clone; clones share all state,
/// so one engine can serve many concurrent request handlers.
///
/// The engine is the only writer of Order and Holding records. Balances are
/// written through the ledger and quotes through the price updater, never
/// directly.
#[derive(Clone)]
pub struct Engine {
    store: Arc<dyn TradeStore>,
    completion_queue: Arc<dyn CompletionQueue>,
    deferred: Arc<dyn DeferredCompletion>,
    ledger: AccountLedger,
    quotes: QuotePriceUpdater,
    summary: Arc<MarketSummaryCache>,
    settings: Arc<TradeSettings>,
}

impl Engine {
    pub fn new(
        store: Arc<dyn TradeStore>,
        completion_queue: Arc<dyn CompletionQueue>,
        publisher: Arc<dyn NotificationPublisher>,
        settings: TradeSettings,
    ) -> Self {
        let settings = Arc::new(settings);
        let ledger = AccountLedger::new(Arc::clone(&store));
        let quotes = QuotePriceUpdater::new(
            Arc::clone(&store),
            Arc::clone(&publisher),
            Arc::clone(&settings),
        );
        let summary = Arc::new(MarketSummaryCache::new(
            Arc::clone(&store),
            publisher,
            settings.market_summary_interval(),
        ));
        let deferred = Arc::new(DelayedSpawner::new(Duration::from_millis(
            settings.deferred_delay_ms(),
        )));
        Self {
            store,
            completion_queue,
            deferred,
            ledger,
            quotes,
            summary,
            settings,
        }
    }

    /// Replaces the deferred completion backend.
    pub fn with_deferred(mut self, deferred: Arc<dyn DeferredCompletion>) -> Self {
        self.deferred = deferred;
        self
    }

    /// Buys `quantity` shares of `symbol` for the user's account: creates an
    /// open order, debits cost plus fee, then dispatches completion per
    /// `mode`. The holding is created by completion, not here.
    pub async fn buy(
        &self,
        user_id: &str,
        symbol: &str,
        quantity: f64,
        mode: CompletionMode,
    ) -> Result<Order> {
        if quantity <= 0.0 {
            return Err(TradeError::InvalidQuantity);
        }

        let account = self.store.account_for_user(user_id)?;
        let quote = self.store.quote(symbol)?;
        let now = Utc::now().timestamp_millis();

        let order = self.store.create_order(
            account.account_id(),
            symbol,
            OrderKind::Buy,
            quantity,
            quote.price(),
            self.settings.order_fee(),
            None,
            now,
        )?;

        let total = quantity * quote.price() + order.fee();
        if let Err(e) = self.ledger.credit(account.account_id(), -total) {
            self.abort_creation(&order, None);
            return Err(e);
        }

        debug!(
            "buy: user {} order {} for {} x {} (total {:.2})",
            user_id,
            order.order_id(),
            quantity,
            symbol,
            total
        );

        self.dispatch(order, mode, total).await
    }

    /// Sells the identified holding in full: reserves it against concurrent
    /// sells, creates the order, credits proceeds minus fee, dispatches.
    ///
    /// A missing holding means a concurrent sell already won; that returns a
    /// cancelled order rather than an error.
    pub async fn sell(
        &self,
        user_id: &str,
        holding_id: HoldingId,
        mode: CompletionMode,
    ) -> Result<Order> {
        let account = self.store.account_for_user(user_id)?;
        let now = Utc::now().timestamp_millis();

        let Some(holding) = self.store.holding(holding_id)? else {
            debug!(
                "sell: user {} holding {} already sold, cancelling",
                user_id, holding_id
            );
            let mut order = self.store.create_order(
                account.account_id(),
                "",
                OrderKind::Sell,
                0.0,
                0.0,
                0.0,
                None,
                now,
            )?;
            order.cancel(now);
            self.store.update_order(&order)?;
            return Ok(order);
        };

        let quote = self.store.quote(holding.symbol())?;
        let quantity = holding.quantity();

        let order = self.store.create_order(
            account.account_id(),
            holding.symbol(),
            OrderKind::Sell,
            quantity,
            quote.price(),
            self.settings.order_fee(),
            Some(holding_id),
            now,
        )?;

        // Reserve the holding so a concurrent sell cannot spend it twice.
        let mut reserved = holding.clone();
        reserved.reserve();
        if let Err(e) = self.store.update_holding(&reserved) {
            self.abort_creation(&order, None);
            return Err(e.into());
        }

        let total = quantity * quote.price() - order.fee();
        if let Err(e) = self.ledger.credit(account.account_id(), total) {
            self.abort_creation(&order, Some(&holding));
            return Err(e);
        }

        debug!(
            "sell: user {} order {} for holding {} (proceeds {:.2})",
            user_id,
            order.order_id(),
            holding_id,
            total
        );

        self.dispatch(order, mode, total).await
    }

    /// Runs the selected completion strategy and returns the order as the
    /// store sees it afterwards. Dispatch failures compensate: the order is
    /// cancelled and the creation-time balance move reversed, one unit of
    /// work, never half-applied.
    async fn dispatch(&self, order: Order, mode: CompletionMode, total: f64) -> Result<Order> {
        let order_id = order.order_id();

        match mode {
            CompletionMode::Synchronous => {
                if let Err(e) = self.complete_order(order_id, false).await {
                    warn!("synchronous completion of order {} failed: {}", order_id, e);
                    self.compensate(&order, total)?;
                    return Err(e);
                }
            }
            CompletionMode::Deferred => {
                self.deferred.submit(self.clone(), order_id, false);
            }
            CompletionMode::Queued => {
                let message =
                    OrderMessage::new_order(order_id, true, Utc::now().timestamp_millis());
                if let Err(e) = self.completion_queue.enqueue(&message).await {
                    warn!(
                        "enqueue of order {} failed, cancelling as compensation: {}",
                        order_id, e
                    );
                    self.compensate(&order, total)?;
                }
            }
        }

        self.store.order(order_id).map_err(Into::into)
    }

    /// Best-effort cleanup when creation falls apart mid-way: cancel the
    /// order and, for a sell, undo the holding reservation. Secondary
    /// failures are logged rather than surfaced over the primary error.
    fn abort_creation(&self, order: &Order, restore_holding: Option<&Holding>) {
        if let Err(e) = self.cancel_order(order.order_id()) {
            warn!(
                "could not cancel order {} during abort: {}",
                order.order_id(),
                e
            );
        }
        if let Some(holding) = restore_holding {
            if let Err(e) = self.store.update_holding(holding) {
                warn!(
                    "could not restore holding {} during abort: {}",
                    holding.holding_id(),
                    e
                );
            }
        }
    }

    /// Compensating action for a failed dispatch: cancel the order and put
    /// the money back where it was before creation.
    fn compensate(&self, order: &Order, total: f64) -> Result<()> {
        self.cancel_order(order.order_id())?;
        let reversal = match order.kind() {
            OrderKind::Buy => total,
            OrderKind::Sell => -total,
        };
        self.ledger.credit(order.account_id(), reversal)?;
        Ok(())
    }

    /// Drives an open order to its terminal state.
    ///
    /// Buy: creates the holding and closes the order. Sell: removes the
    /// reserved holding and closes; if the holding is already gone the order
    /// resolves to cancelled (benign race). Either close updates the quote
    /// with a random market move sized by the traded quantity.
    ///
    /// Completing a terminal order is a caller defect and fails; it is not
    /// an idempotent retry point.
    pub async fn complete_order(&self, order_id: OrderId, two_phase: bool) -> Result<Order> {
        let mut order = self.store.order(order_id)?;

        if order.status().is_terminal() {
            return Err(TradeError::AlreadyCompleted(order_id));
        }

        debug!("completing order {} (two_phase={})", order_id, two_phase);
        let now = Utc::now().timestamp_millis();

        match order.kind() {
            OrderKind::Buy => {
                let holding = self.store.create_holding(
                    order.account_id(),
                    order.symbol(),
                    order.quantity(),
                    order.price(),
                    now,
                )?;
                order.set_holding(Some(holding.holding_id()));
                order.close(now);
                self.store.update_order(&order)?;
                self.quotes
                    .update_price_volume(order.symbol(), random_change_factor(), order.quantity())
                    .await?;
            }
            OrderKind::Sell => {
                let removed = match order.holding_id() {
                    Some(holding_id) => self.store.remove_holding(holding_id)?,
                    None => None,
                };
                match removed {
                    None => {
                        // The reserved holding vanished under us; resolve to
                        // cancelled instead of corrupting state. The earlier
                        // credit stands (see DESIGN.md).
                        debug!(
                            "complete: holding for sell order {} already sold, cancelling",
                            order_id
                        );
                        order.cancel(now);
                        self.store.update_order(&order)?;
                    }
                    Some(_) => {
                        order.set_holding(None);
                        order.close(now);
                        self.store.update_order(&order)?;
                        self.quotes
                            .update_price_volume(
                                order.symbol(),
                                random_change_factor(),
                                order.quantity(),
                            )
                            .await?;
                    }
                }
            }
        }

        Ok(order)
    }

    /// Unconditionally cancels the order, stamping the completion date. Used
    /// both as an explicit operation and as the compensating half of a
    /// failed dispatch.
    pub fn cancel_order(&self, order_id: OrderId) -> Result<Order> {
        let mut order = self.store.order(order_id)?;
        order.cancel(Utc::now().timestamp_millis());
        self.store.update_order(&order)?;
        Ok(order)
    }

    /// The current market summary snapshot, refreshed at most once per
    /// configured interval.
    pub async fn market_summary(&self) -> Result<Arc<MarketSummary>> {
        self.summary.market_summary().await
    }

    /// Records a login against the user's account.
    pub fn login(&self, user_id: &str) -> Result<Account> {
        let mut account = self.store.account_for_user(user_id)?;
        account.login(Utc::now().timestamp_millis());
        self.store.update_account(&account)?;
        Ok(account)
    }

    /// Records a logout against the user's account.
    pub fn logout(&self, user_id: &str) -> Result<()> {
        let mut account = self.store.account_for_user(user_id)?;
        account.logout();
        self.store.update_account(&account)?;
        Ok(())
    }

    /// Returns the user's closed orders, marking each completed so the
    /// completion alert fires at most once per order.
    pub fn closed_orders(&self, user_id: &str) -> Result<Vec<Order>> {
        let account = self.store.account_for_user(user_id)?;
        let mut swept = Vec::new();
        for mut order in self.store.orders_for_account(account.account_id())? {
            if order.status() == OrderStatus::Closed {
                order.mark_completed();
                self.store.update_order(&order)?;
                swept.push(order);
            }
        }
        Ok(swept)
    }

    /// Lists a new tradeable symbol.
    pub fn create_quote(&self, symbol: &str, company_name: &str, price: f64) -> Result<Quote> {
        self.store
            .create_quote(Quote::new(symbol, company_name, price))
            .map_err(Into::into)
    }

    pub fn quote(&self, symbol: &str) -> Result<Quote> {
        self.store.quote(symbol).map_err(Into::into)
    }

    pub fn account(&self, user_id: &str) -> Result<Account> {
        self.store.account_for_user(user_id).map_err(Into::into)
    }

    pub fn holdings(&self, user_id: &str) -> Result<Vec<Holding>> {
        let account = self.store.account_for_user(user_id)?;
        self.store
            .holdings_for_account(account.account_id())
            .map_err(Into::into)
    }

    pub fn orders(&self, user_id: &str) -> Result<Vec<Order>> {
        let account = self.store.account_for_user(user_id)?;
        self.store
            .orders_for_account(account.account_id())
            .map_err(Into::into)
    }

    /// The bounded list of recently mutated quotes.
    pub fn recent_quote_changes(&self) -> Vec<Quote> {
        self.quotes.recent_changes()
    }
}
