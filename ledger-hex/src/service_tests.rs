//! LedgerService and EntryFeed unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use futures::StreamExt;
use rust_decimal::Decimal;

use ledger_types::{
    Account, AccountId, AppError, CreateAccountRequest, CreateEntryRequest, EntryType, LedgerEntry,
    LedgerStore, StoreError,
};

use crate::feed::FeedConfig;
use crate::LedgerService;

/// One scripted outcome for a feed poll.
enum Poll {
    Batch(Vec<LedgerEntry>),
    Fail(String),
}

/// In-memory store port implementation for testing the service layer.
///
/// `recent_entries` can be scripted per call to drive the feed poller
/// through exact batch sequences; it also counts invocations so tests can
/// assert that cancellation stops polling.
struct MockStore {
    accounts: Mutex<HashMap<AccountId, Account>>,
    entries: Mutex<Vec<LedgerEntry>>,
    script: Mutex<VecDeque<Poll>>,
    recent_calls: AtomicUsize,
}

impl MockStore {
    fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            entries: Mutex::new(Vec::new()),
            script: Mutex::new(VecDeque::new()),
            recent_calls: AtomicUsize::new(0),
        }
    }

    fn add_account(&self, currency_code: &str) -> Account {
        let account = Account::new(
            "Test Account".into(),
            currency_code.into(),
            Decimal::ZERO,
            Utc::now(),
        )
        .unwrap();
        self.accounts
            .lock()
            .unwrap()
            .insert(account.id, account.clone());
        account
    }

    fn script_polls(&self, polls: Vec<Poll>) {
        *self.script.lock().unwrap() = polls.into();
    }

    fn recent_calls(&self) -> usize {
        self.recent_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerStore for MockStore {
    async fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        self.accounts
            .lock()
            .unwrap()
            .insert(account.id, account.clone());
        Ok(())
    }

    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.lock().unwrap().get(&id).cloned())
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.accounts.lock().unwrap().values().cloned().collect())
    }

    async fn account_exists(&self, id: AccountId) -> Result<bool, StoreError> {
        Ok(self.accounts.lock().unwrap().contains_key(&id))
    }

    async fn insert_entry(&self, entry: &LedgerEntry) -> Result<(), StoreError> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn entries_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        let mut entries: Vec<LedgerEntry> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.account_id == account_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        Ok(entries)
    }

    async fn recent_entries(
        &self,
        account_id: AccountId,
        limit: u32,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        self.recent_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.script.lock().unwrap().pop_front();
        match scripted {
            Some(Poll::Batch(batch)) => Ok(batch),
            Some(Poll::Fail(msg)) => Err(StoreError::Database(msg)),
            None => {
                let mut entries = self.entries_for_account(account_id).await?;
                entries.truncate(limit as usize);
                Ok(entries)
            }
        }
    }
}

impl std::fmt::Debug for crate::feed::EntryFeed<MockStore> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EntryFeed<MockStore>")
    }
}

fn entry(account_id: AccountId, hours_ago: i64) -> LedgerEntry {
    let now = Utc::now();
    LedgerEntry::new(
        account_id,
        EntryType::Expense,
        Decimal::new(499, 2),
        "USD".into(),
        Some("Coffee".into()),
        now - ChronoDuration::hours(hours_ago),
        now,
    )
}

fn service(store: &Arc<MockStore>) -> LedgerService<MockStore> {
    LedgerService::new(Arc::clone(store)).with_feed_config(FeedConfig {
        poll_interval: Duration::from_secs(1),
        fetch_limit: 20,
    })
}

fn create_entry_request(amount: Decimal) -> CreateEntryRequest {
    CreateEntryRequest {
        entry_type: EntryType::Income,
        amount,
        currency_code: "USD".into(),
        memo: Some("Salary".into()),
        occurred_at: None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Account / entry operations
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_account_rejects_blank_name() {
    let store = Arc::new(MockStore::new());
    let svc = service(&store);

    let err = svc
        .create_account(CreateAccountRequest {
            name: "  ".into(),
            currency_code: "USD".into(),
            initial_balance: Decimal::ZERO,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn record_entry_fails_fast_for_unknown_account() {
    let store = Arc::new(MockStore::new());
    let svc = service(&store);

    let err = svc
        .record_entry(AccountId::new(), create_entry_request(Decimal::ONE))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert!(store.entries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn record_entry_rejects_non_positive_amount() {
    let store = Arc::new(MockStore::new());
    let account = store.add_account("USD");
    let svc = service(&store);

    for amount in [Decimal::ZERO, Decimal::new(-100, 2)] {
        let err = svc
            .record_entry(account.id, create_entry_request(amount))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}

#[tokio::test]
async fn record_entry_defaults_occurred_at_to_creation_time() {
    let store = Arc::new(MockStore::new());
    let account = store.add_account("USD");
    let svc = service(&store);

    let entry = svc
        .record_entry(account.id, create_entry_request(Decimal::ONE))
        .await
        .unwrap();

    assert_eq!(entry.occurred_at, entry.created_at);
}

#[tokio::test]
async fn entries_for_unknown_account_is_not_found() {
    let store = Arc::new(MockStore::new());
    let svc = service(&store);

    let err = svc.entries_for_account(AccountId::new()).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn generate_entries_rejects_zero_count() {
    let store = Arc::new(MockStore::new());
    let account = store.add_account("EUR");
    let svc = service(&store);

    let err = svc.generate_entries(account.id, 0).await.unwrap_err();

    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn generate_entries_persists_in_account_currency() {
    let store = Arc::new(MockStore::new());
    let account = store.add_account("EUR");
    let svc = service(&store);

    let generated = svc.generate_entries(account.id, 10).await.unwrap();

    assert_eq!(generated.len(), 10);
    assert!(generated.iter().all(|e| e.currency_code == "EUR"));
    assert_eq!(store.entries.lock().unwrap().len(), 10);
}

// ─────────────────────────────────────────────────────────────────────────────
// Entry feed
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn feed_fails_fast_for_unknown_account_without_polling() {
    let store = Arc::new(MockStore::new());
    let svc = service(&store);

    let err = svc.stream_entries(AccountId::new()).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(store.recent_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn feed_suppresses_unchanged_batches() {
    let store = Arc::new(MockStore::new());
    let account = store.add_account("USD");
    let a = entry(account.id, 2);
    let b = entry(account.id, 3);
    let c = entry(account.id, 1);

    // Tick 1 and tick 2 return the same snapshot; tick 3 has a new head.
    store.script_polls(vec![
        Poll::Batch(vec![a.clone(), b.clone()]),
        Poll::Batch(vec![a.clone(), b.clone()]),
        Poll::Batch(vec![c.clone(), a.clone(), b.clone()]),
    ]);

    let svc = service(&store);
    let mut feed = svc.stream_entries(account.id).await.unwrap();

    let mut emitted = Vec::new();
    for _ in 0..5 {
        emitted.push(feed.next().await.unwrap().unwrap().id);
    }

    // Tick 2 is suppressed entirely; tick 3 re-emits A and B after C.
    assert_eq!(emitted, vec![a.id, b.id, c.id, a.id, b.id]);
    assert_eq!(store.recent_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn feed_treats_gap_reappearance_as_novel() {
    let store = Arc::new(MockStore::new());
    let account = store.add_account("USD");
    let a = entry(account.id, 1);
    let b = entry(account.id, 2);

    // A id absent from the immediately prior batch is novel again, even if
    // it was emitted two cycles ago.
    store.script_polls(vec![
        Poll::Batch(vec![a.clone()]),
        Poll::Batch(vec![b.clone()]),
        Poll::Batch(vec![a.clone()]),
    ]);

    let svc = service(&store);
    let mut feed = svc.stream_entries(account.id).await.unwrap();

    let mut emitted = Vec::new();
    for _ in 0..3 {
        emitted.push(feed.next().await.unwrap().unwrap().id);
    }

    assert_eq!(emitted, vec![a.id, b.id, a.id]);
}

#[tokio::test(start_paused = true)]
async fn feed_skips_empty_batches_and_keeps_marker() {
    let store = Arc::new(MockStore::new());
    let account = store.add_account("USD");
    let a = entry(account.id, 1);
    let b = entry(account.id, 2);

    store.script_polls(vec![
        Poll::Batch(vec![a.clone()]),
        Poll::Batch(vec![]),
        Poll::Batch(vec![b.clone()]),
    ]);

    let svc = service(&store);
    let mut feed = svc.stream_entries(account.id).await.unwrap();

    let first = feed.next().await.unwrap().unwrap();
    let second = feed.next().await.unwrap().unwrap();

    assert_eq!(first.id, a.id);
    assert_eq!(second.id, b.id);
    assert_eq!(store.recent_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn feed_stops_polling_after_cancellation() {
    let store = Arc::new(MockStore::new());
    let account = store.add_account("USD");
    let a = entry(account.id, 1);
    let b = entry(account.id, 2);

    store.script_polls(vec![Poll::Batch(vec![a.clone(), b.clone()])]);

    let svc = service(&store);
    let mut feed = svc.stream_entries(account.id).await.unwrap();

    assert_eq!(feed.next().await.unwrap().unwrap().id, a.id);
    assert_eq!(feed.next().await.unwrap().unwrap().id, b.id);
    assert_eq!(store.recent_calls(), 1);

    drop(feed);

    // Plenty of would-be ticks later, the query count is frozen.
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(store.recent_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn feed_terminates_on_store_error() {
    let store = Arc::new(MockStore::new());
    let account = store.add_account("USD");

    store.script_polls(vec![Poll::Fail("connection reset".into())]);

    let svc = service(&store);
    let mut feed = svc.stream_entries(account.id).await.unwrap();

    let err = feed.next().await.unwrap().unwrap_err();
    assert!(matches!(err, StoreError::Database(_)));
    assert!(feed.next().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn feed_preserves_store_order_within_a_tick() {
    let store = Arc::new(MockStore::new());
    let account = store.add_account("USD");
    let svc = service(&store);

    // No script: the feed reads through to the shared entry list.
    let newest = svc
        .record_entry(account.id, create_entry_request(Decimal::ONE))
        .await
        .unwrap();
    let older = {
        let mut req = create_entry_request(Decimal::TWO);
        req.occurred_at = Some(Utc::now() - ChronoDuration::hours(5));
        svc.record_entry(account.id, req).await.unwrap()
    };

    let mut feed = svc.stream_entries(account.id).await.unwrap();
    let first = feed.next().await.unwrap().unwrap();
    let second = feed.next().await.unwrap().unwrap();

    assert_eq!(first.id, newest.id);
    assert_eq!(second.id, older.id);
}
