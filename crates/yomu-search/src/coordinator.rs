use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use yomu_config::search::SearchConfig;
use yomu_core::LanguageProcessor;

use crate::page::{ResultSet, SearchEvent, SearchPage};

/// Debounces typed queries and delivers only the newest result.
///
/// Every `submit` bumps a generation number. A query waits out the debounce
/// period, runs on a blocking worker, and is delivered only if no newer
/// query was submitted meanwhile. Superseded work is not interrupted; its
/// result is dropped on arrival.
///
/// Must be used from inside a tokio runtime.
pub struct SearchCoordinator {
    shared: Arc<Shared>,
    events: (AsyncSender<SearchEvent>, AsyncReceiver<SearchEvent>),
    tasks: Mutex<JoinSet<()>>,
    cancel_token: CancellationToken,
}

struct Shared {
    processor: Arc<dyn LanguageProcessor>,
    generation: AtomicU64,
    debounce: Duration,
    page_size: usize,
    current: Mutex<Option<ResultSet>>,
}

impl Shared {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}

impl SearchCoordinator {
    pub fn new(processor: Arc<dyn LanguageProcessor>, config: &SearchConfig) -> Self {
        Self::with_settings(processor, config.debounce(), config.page_size)
    }

    pub fn with_settings(
        processor: Arc<dyn LanguageProcessor>,
        debounce: Duration,
        page_size: usize,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                processor,
                generation: AtomicU64::new(0),
                debounce,
                page_size: page_size.max(1),
                current: Mutex::new(None),
            }),
            events: kanal::bounded_async(64),
            tasks: Mutex::new(JoinSet::new()),
            cancel_token: CancellationToken::new(),
        }
    }

    /// Queue a query, superseding any earlier one. Returns its generation.
    pub fn submit(&self, query: impl Into<String>) -> u64 {
        let query = query.into();
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let shared = self.shared.clone();
        let tx = self.events.0.clone();
        let cancel = self.cancel_token.child_token();

        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        // Reap finished queries so the set does not grow with every keystroke
        while tasks.try_join_next().is_some() {}

        tasks.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("Search {} cancelled", generation);
                }
                result = run_query(shared, tx, generation, query) => {
                    if let Err(e) = result {
                        tracing::error!("Search {} failed: {e}", generation);
                    }
                }
            }
        });

        generation
    }

    /// Receiver for delivered results. Clones share one queue.
    pub fn events(&self) -> AsyncReceiver<SearchEvent> {
        self.events.1.clone()
    }

    /// Next page of the latest delivered result set
    pub fn next_page(&self) -> Option<SearchPage> {
        let mut current = self
            .shared
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        current
            .as_mut()
            .and_then(|set| set.take_page(self.shared.page_size))
    }

    pub fn current_generation(&self) -> u64 {
        self.shared.generation.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.shared.is_current(generation)
    }

    /// Stop pending queries. Nothing is delivered after this returns.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .abort_all();
        tracing::info!("Search coordinator shut down");
    }
}

impl Drop for SearchCoordinator {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

async fn run_query(
    shared: Arc<Shared>,
    tx: AsyncSender<SearchEvent>,
    generation: u64,
    query: String,
) -> anyhow::Result<()> {
    tokio::time::sleep(shared.debounce).await;
    if !shared.is_current(generation) {
        tracing::debug!("Search {} superseded during debounce", generation);
        return Ok(());
    }

    let entries = {
        let processor = shared.processor.clone();
        let query = query.clone();
        tokio::task::spawn_blocking(move || processor.search(&query)).await?
    };

    let event = {
        let mut current = shared.current.lock().unwrap_or_else(PoisonError::into_inner);
        // Checked under the lock so an older query can never overwrite a newer one
        if !shared.is_current(generation) {
            tracing::debug!("Discarding stale results for search {}", generation);
            return Ok(());
        }

        tracing::debug!("Search {} ({:?}) -> {} entries", generation, query, entries.len());
        let mut set = ResultSet::new(generation, query.clone(), entries);
        let first = set.take_page(shared.page_size);
        *current = Some(set);

        match first {
            Some(page) => SearchEvent::Results(page),
            None => SearchEvent::NoResults { generation, query },
        }
    };

    tx.send(event).await?;
    Ok(())
}
