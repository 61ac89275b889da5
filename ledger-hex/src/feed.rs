//! Polling-based live entry feed.
//!
//! The store has no tailable cursor, so a live feed is approximated by
//! polling the latest entries on a fixed cadence and suppressing repeat
//! batches. Rather than an operator chain (interval / flat-map / distinct),
//! the poller is an explicit state machine implementing
//! [`futures::Stream`]:
//!
//! ```text
//! Idle --tick--> Fetching --batch--> Draining --empty--> Idle
//!                   \--store error--> Failed (terminal)
//! ```
//!
//! Dedup is deliberately shallow: each fetched batch is compared to the
//! previously *emitted* batch by the id of its newest entry only. A matching
//! head suppresses the whole batch; anything else re-emits the whole batch,
//! even entries forwarded in earlier cycles. This is a cheap approximation
//! of a change feed, not a guaranteed-correct one, and is kept as designed.
//!
//! Cancellation is dropping the stream: between awaits no store query is in
//! flight, so no new query is ever issued after the subscriber lets go.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::Stream;
use futures::future::BoxFuture;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use ledger_types::{AccountId, EntryId, LedgerEntry, LedgerStore, StoreError};

/// Cadence and fetch depth of the feed poller.
#[derive(Debug, Clone, Copy)]
pub struct FeedConfig {
    /// Delay between store polls.
    pub poll_interval: Duration,
    /// How many of the newest entries each poll fetches.
    pub fetch_limit: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            fetch_limit: 20,
        }
    }
}

type FetchFuture = BoxFuture<'static, Result<Vec<LedgerEntry>, StoreError>>;

enum FeedState {
    /// Waiting for the next poll tick.
    Idle,
    /// A store query is in flight.
    Fetching(FetchFuture),
    /// Emitting the current batch downstream, newest first.
    Draining(VecDeque<LedgerEntry>),
    /// A store error was emitted; the stream is over.
    Failed,
}

/// Unbounded stream of an account's most recent ledger entries.
///
/// Construct via [`crate::LedgerService::stream_entries`], which verifies the
/// account exists first. The stream never completes on its own; it ends only
/// when the subscriber drops it or the store fails.
pub struct EntryFeed<S> {
    store: Arc<S>,
    account_id: AccountId,
    fetch_limit: u32,
    interval: Interval,
    /// Id of the newest entry of the last batch that was emitted.
    last_head: Option<EntryId>,
    state: FeedState,
}

impl<S: LedgerStore> EntryFeed<S> {
    pub(crate) fn new(store: Arc<S>, account_id: AccountId, config: FeedConfig) -> Self {
        // First poll happens one full period after subscription; a slow
        // consumer delays the next poll instead of bursting to catch up.
        let mut interval =
            tokio::time::interval_at(Instant::now() + config.poll_interval, config.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self {
            store,
            account_id,
            fetch_limit: config.fetch_limit,
            interval,
            last_head: None,
            state: FeedState::Idle,
        }
    }
}

impl<S: LedgerStore> Stream for EntryFeed<S> {
    type Item = Result<LedgerEntry, StoreError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match &mut this.state {
                FeedState::Draining(batch) => {
                    if let Some(entry) = batch.pop_front() {
                        return Poll::Ready(Some(Ok(entry)));
                    }
                    this.state = FeedState::Idle;
                }
                FeedState::Idle => match this.interval.poll_tick(cx) {
                    Poll::Pending => return Poll::Pending,
                    Poll::Ready(_) => {
                        let store = Arc::clone(&this.store);
                        let account_id = this.account_id;
                        let limit = this.fetch_limit;
                        this.state = FeedState::Fetching(Box::pin(async move {
                            store.recent_entries(account_id, limit).await
                        }));
                    }
                },
                FeedState::Fetching(fetch) => match fetch.as_mut().poll(cx) {
                    Poll::Pending => return Poll::Pending,
                    Poll::Ready(Ok(batch)) => {
                        let head = batch.first().map(|entry| entry.id);
                        if head.is_some() && head != this.last_head {
                            this.last_head = head;
                            this.state = FeedState::Draining(batch.into());
                        } else {
                            // Unchanged (or empty) snapshot: suppress the
                            // whole batch and wait for the next tick.
                            this.state = FeedState::Idle;
                        }
                    }
                    Poll::Ready(Err(err)) => {
                        tracing::warn!(account_id = %this.account_id, error = %err, "entry feed store query failed");
                        this.state = FeedState::Failed;
                        return Poll::Ready(Some(Err(err)));
                    }
                },
                FeedState::Failed => return Poll::Ready(None),
            }
        }
    }
}
