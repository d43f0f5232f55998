pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

use chrono::{DateTime, NaiveDate, Utc};
use models::{
    chart::ChartDataPoint,
    event::StoreEvent,
    money::{normalize_currency_code, Money, DEFAULT_CURRENCY},
    settings::StoreSettings,
    snapshot::PortfolioSnapshot,
    transaction::Transaction,
    view::{Screen, ViewState},
};
use rust_decimal::Decimal;
use services::{
    auth_gate::AuthGate,
    chart_service::ChartService,
    format_service::{self, FormatService},
    ledger_service::LedgerService,
    notifier::{Notifier, Subscription},
};
use storage::{manager::StorageManager, memory::MemoryStorage, traits::KeyValueStorage};
use tracing::{debug, warn};

use errors::CoreError;

/// Main entry point for the rilly-finance core library.
///
/// An explicit state container owned by the application root and passed by
/// reference to presentation code. Holds the financial snapshot and the
/// transient view state, applies mutations synchronously and in call order,
/// and tells subscribers about every successful mutation.
#[must_use]
pub struct PortfolioStore {
    settings: StoreSettings,
    snapshot: PortfolioSnapshot,
    /// Snapshot displaced by demo mode, restored when demo mode ends.
    demo_stash: Option<PortfolioSnapshot>,
    view: ViewState,
    storage: Box<dyn KeyValueStorage>,
    ledger_service: LedgerService,
    format_service: FormatService,
    chart_service: ChartService,
    auth_gate: AuthGate,
    notifier: Notifier,
}

impl std::fmt::Debug for PortfolioStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioStore")
            .field("view", &self.view)
            .field("transactions", &self.snapshot.transactions.len())
            .field("storage", &self.storage.name())
            .field("storage_key", &self.settings.storage_key)
            .field("subscribers", &self.notifier.listener_count())
            .finish()
    }
}

impl PortfolioStore {
    /// Open the store on top of a storage backend.
    ///
    /// Reads the configured key once. Absent, unreadable or unparsable data
    /// yields the empty snapshot; failures are logged, never fatal. A loaded
    /// snapshot means persistence was on when it was written, so it stays on.
    pub fn open(settings: StoreSettings, storage: impl KeyValueStorage + 'static) -> Self {
        let storage: Box<dyn KeyValueStorage> = Box::new(storage);
        let currency = normalize_currency_code(&settings.default_currency)
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        let loaded = match StorageManager::load(storage.as_ref(), &settings.storage_key) {
            Ok(found) => found,
            Err(e) => {
                warn!(
                    storage = storage.name(),
                    key = %settings.storage_key,
                    error = %e,
                    "could not load persisted snapshot, starting empty"
                );
                None
            }
        };

        let persisted = loaded.is_some();
        let snapshot = loaded.unwrap_or_else(|| PortfolioSnapshot::empty(&currency));
        let mut view = ViewState::new(settings.initial_screen, snapshot.currency());
        view.is_persistence_enabled = persisted;

        debug!(
            storage = storage.name(),
            persisted,
            screen = %view.active_screen,
            "portfolio store opened"
        );

        Self {
            format_service: FormatService::new(settings.locale),
            auth_gate: AuthGate::new(settings.auth_delay_ms),
            settings,
            snapshot,
            demo_stash: None,
            view,
            storage,
            ledger_service: LedgerService::new(),
            chart_service: ChartService::new(),
            notifier: Notifier::new(),
        }
    }

    /// Open a store backed by a fresh in-memory storage.
    pub fn in_memory(settings: StoreSettings) -> Self {
        Self::open(settings, MemoryStorage::new())
    }

    // ── Read Access ─────────────────────────────────────────────────

    /// Current financial state.
    #[must_use]
    pub fn snapshot(&self) -> &PortfolioSnapshot {
        &self.snapshot
    }

    /// Current UI state.
    #[must_use]
    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    #[must_use]
    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// Transactions, newest first.
    #[must_use]
    pub fn transactions(&self) -> Vec<&Transaction> {
        self.ledger_service.get_transactions(&self.snapshot)
    }

    /// Sum of all transaction amounts. Not reconciled with net worth.
    #[must_use]
    pub fn transactions_total(&self) -> Decimal {
        self.snapshot.transactions_total()
    }

    /// `(goal name, percent)` pairs for the progress bars.
    #[must_use]
    pub fn goal_progress(&self) -> Vec<(&str, u8)> {
        self.snapshot
            .goals
            .iter()
            .map(|g| (g.name.as_str(), g.progress_pct()))
            .collect()
    }

    // ── Navigation ──────────────────────────────────────────────────

    /// Switch the active screen. Leaving `Auth` cancels a pending auth check.
    pub fn set_active_screen(&mut self, screen: Screen) {
        if screen != Screen::Auth {
            self.auth_gate.disarm();
        }
        if self.view.active_screen == screen {
            return;
        }
        self.view.active_screen = screen;
        self.emit(StoreEvent::ScreenChanged(screen));
    }

    /// Switch screens by name (e.g., from a route). Unknown names are
    /// rejected with `InvalidScreen` and nothing changes.
    pub fn navigate_to(&mut self, name: &str) -> Result<Screen, CoreError> {
        let screen: Screen = name.parse()?;
        self.set_active_screen(screen);
        Ok(screen)
    }

    // ── Cosmetic Auth Splash ────────────────────────────────────────

    /// Show the biometric splash and start its timer.
    pub fn begin_auth_check(&mut self, now: DateTime<Utc>) {
        self.set_active_screen(Screen::Auth);
        self.auth_gate.arm(now);
    }

    /// Advance the splash timer. Once the delay has elapsed and the splash is
    /// still showing, switches to the dashboard. Returns true if it did.
    pub fn poll_auth_check(&mut self, now: DateTime<Utc>) -> bool {
        if !self.auth_gate.is_due(now) {
            return false;
        }
        self.finish_auth()
    }

    /// The splash's "unlock" button: go to the dashboard right away.
    pub fn confirm_auth(&mut self) -> bool {
        self.finish_auth()
    }

    /// Stop the splash timer without changing screens.
    pub fn cancel_auth_check(&mut self) {
        self.auth_gate.disarm();
    }

    #[must_use]
    pub fn is_auth_check_pending(&self) -> bool {
        self.auth_gate.is_armed()
    }

    fn finish_auth(&mut self) -> bool {
        self.auth_gate.disarm();
        if self.view.active_screen != Screen::Auth {
            return false;
        }
        self.view.active_screen = Screen::Dashboard;
        self.emit(StoreEvent::ScreenChanged(Screen::Dashboard));
        true
    }

    // ── Snapshot Mutations ──────────────────────────────────────────

    /// Swap between the demo dataset and the user's own snapshot.
    ///
    /// Entering demo mode stashes the current snapshot; leaving restores it
    /// (or the empty snapshot), so toggling twice changes nothing.
    pub fn toggle_demo_mode(&mut self) -> Result<(), CoreError> {
        if self.view.is_demo_mode {
            let restored = self
                .demo_stash
                .take()
                .unwrap_or_else(|| PortfolioSnapshot::empty(&self.view.currency));
            self.snapshot = restored;
            self.view.is_demo_mode = false;
        } else {
            let own = std::mem::replace(&mut self.snapshot, PortfolioSnapshot::demo());
            self.demo_stash = Some(own);
            self.view.is_demo_mode = true;
        }
        debug!(demo = self.view.is_demo_mode, "demo mode toggled");
        self.commit(StoreEvent::DemoModeChanged(self.view.is_demo_mode))
    }

    /// Book a transaction: newest first, net worth moves by its amount.
    ///
    /// Fails with `DuplicateId` for a reused id and `ValidationError` for an
    /// empty id or a foreign currency; the store is unchanged on failure.
    pub fn add_transaction(&mut self, tx: Transaction) -> Result<(), CoreError> {
        let id = tx.id.clone();
        self.ledger_service.add_transaction(&mut self.snapshot, tx)?;
        debug!(%id, net_worth = %self.snapshot.net_worth.amount, "transaction added");
        self.commit(StoreEvent::TransactionAdded(id))
    }

    /// Restore the starting data: the demo dataset in demo mode, otherwise
    /// the empty snapshot in the display currency.
    pub fn reset_snapshot(&mut self) -> Result<(), CoreError> {
        self.snapshot = if self.view.is_demo_mode {
            PortfolioSnapshot::demo()
        } else {
            PortfolioSnapshot::empty(&self.view.currency)
        };
        debug!(demo = self.view.is_demo_mode, "snapshot reset");
        self.commit(StoreEvent::SnapshotReset)
    }

    // ── Settings ────────────────────────────────────────────────────

    /// Set the display currency (e.g., "EUR", "USD"). Must be exactly
    /// 3 ASCII letters. Existing amounts are not converted.
    pub fn set_currency(&mut self, currency: &str) -> Result<(), CoreError> {
        let code = normalize_currency_code(currency).ok_or_else(|| {
            CoreError::ValidationError(format!(
                "Invalid currency code '{currency}': must be exactly 3 ASCII letters (e.g., EUR, USD)"
            ))
        })?;
        if self.view.currency == code {
            return Ok(());
        }
        self.view.currency = code.clone();
        self.emit(StoreEvent::CurrencyChanged(code));
        Ok(())
    }

    // ── Persistence ─────────────────────────────────────────────────

    /// Turn persistence on (write now and after every mutation) or off
    /// (delete the stored document). In demo mode the user's stashed
    /// snapshot is written, not the demo dataset.
    ///
    /// If the storage cannot be written the store stays in memory-only mode
    /// and `PersistenceUnavailable` is returned.
    pub fn set_persistence_enabled(&mut self, enabled: bool) -> Result<(), CoreError> {
        let key = self.settings.storage_key.clone();
        let was_enabled = self.view.is_persistence_enabled;

        let result = if enabled {
            self.save_user_snapshot()
        } else {
            StorageManager::clear(self.storage.as_mut(), &key)
        };

        match result {
            Ok(()) => {
                self.view.is_persistence_enabled = enabled;
                debug!(enabled, key = %key, "persistence updated");
                if was_enabled != enabled {
                    self.emit(StoreEvent::PersistenceChanged(enabled));
                }
                Ok(())
            }
            Err(e) => {
                warn!(
                    enabled,
                    storage = self.storage.name(),
                    error = %e,
                    "storage unavailable, continuing in memory only"
                );
                self.view.is_persistence_enabled = false;
                if was_enabled {
                    self.emit(StoreEvent::PersistenceChanged(false));
                }
                Err(into_persistence_error(e))
            }
        }
    }

    // ── Subscriptions ───────────────────────────────────────────────

    /// Register a listener called after every successful mutation.
    /// Drop the returned handle (or call `unsubscribe`) to stop receiving events.
    #[must_use = "dropping the Subscription unsubscribes the listener immediately"]
    pub fn subscribe(&self, listener: impl FnMut(&StoreEvent) + 'static) -> Subscription {
        self.notifier.subscribe(listener)
    }

    // ── Formatting ──────────────────────────────────────────────────

    /// Pure money formatting with the German convention (`-4,50 €`).
    /// Malformed currency codes fall back to EUR.
    #[must_use]
    pub fn format_money(amount: Decimal, currency_code: &str) -> String {
        format_service::format_money(amount, currency_code)
    }

    /// Format a money value using the configured locale.
    #[must_use]
    pub fn format(&self, money: &Money) -> String {
        self.format_service.format(money)
    }

    /// Format a bare amount in the display currency and configured locale.
    #[must_use]
    pub fn format_amount(&self, amount: Decimal) -> String {
        format_service::format_money_with(self.format_service.locale(), amount, &self.view.currency)
    }

    // ── Charts ──────────────────────────────────────────────────────

    /// Decorative monthly net-worth series ending in `ending`'s month.
    /// Freshly randomized on every call; never persisted.
    #[must_use]
    pub fn wealth_trajectory(&self, ending: NaiveDate, points: usize) -> Vec<ChartDataPoint> {
        self.chart_service
            .wealth_trajectory(&self.snapshot, ending, points)
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Persist (when enabled) and notify after a snapshot mutation.
    ///
    /// Mutations made in demo mode leave the stored document untouched.
    ///
    /// A failed write keeps the in-memory mutation, drops to memory-only
    /// mode and reports `PersistenceUnavailable`.
    fn commit(&mut self, event: StoreEvent) -> Result<(), CoreError> {
        if !self.view.is_persistence_enabled {
            self.emit(event);
            return Ok(());
        }

        match self.save_user_snapshot() {
            Ok(()) => {
                self.emit(event);
                Ok(())
            }
            Err(e) => {
                warn!(
                    storage = self.storage.name(),
                    key = %self.settings.storage_key,
                    error = %e,
                    "failed to persist snapshot, continuing in memory only"
                );
                self.view.is_persistence_enabled = false;
                self.emit(event);
                self.emit(StoreEvent::PersistenceChanged(false));
                Err(into_persistence_error(e))
            }
        }
    }

    /// Write the user's own snapshot. While demo mode is on that is the
    /// stashed snapshot; the demo dataset is never persisted.
    fn save_user_snapshot(&mut self) -> Result<(), CoreError> {
        let empty;
        let user = if self.view.is_demo_mode {
            match &self.demo_stash {
                Some(stash) => stash,
                None => {
                    empty = PortfolioSnapshot::empty(&self.view.currency);
                    &empty
                }
            }
        } else {
            &self.snapshot
        };
        StorageManager::save(self.storage.as_mut(), &self.settings.storage_key, user)
    }

    fn emit(&self, event: StoreEvent) {
        debug!(%event, "notifying subscribers");
        self.notifier.notify(&event);
    }
}

fn into_persistence_error(e: CoreError) -> CoreError {
    match e {
        CoreError::PersistenceUnavailable(msg) => CoreError::PersistenceUnavailable(msg),
        other => CoreError::PersistenceUnavailable(other.to_string()),
    }
}
