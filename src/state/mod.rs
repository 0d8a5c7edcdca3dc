//! Lifecycle of the fetch/search requests issued by one surface.
//!
//! ```text
//! Idle ──request──▶ Idle (loading) ──▶ Success(articles) | Failure(error)
//! ```
//!
//! Every request takes a fresh token; a completion carrying an older token is
//! dropped so a slow response can never overwrite a newer one. Sorting is a
//! projection over the unsorted set the source returned, so changing the
//! policy never touches the network.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

use crate::app::{NewsError, Result};
use crate::domain::{Article, NewsCategory};
use crate::fetcher::ArticleSource;
use crate::sort::{sort, SortPolicy};

#[derive(Debug, Clone, Default)]
pub enum FetchPhase {
    /// Nothing to show yet, or a request is in flight
    #[default]
    Idle,
    Success(Vec<Article>),
    Failure(Arc<NewsError>),
}

impl FetchPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, FetchPhase::Idle)
    }

    pub fn articles(&self) -> &[Article] {
        match self {
            FetchPhase::Success(articles) => articles,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&NewsError> {
        match self {
            FetchPhase::Failure(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

/// The last request issued, kept so [`FetchStateMachine::retry`] can replay it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Category(NewsCategory),
    Search(String),
}

struct Inner {
    token: u64,
    policy: SortPolicy,
    original: Vec<Article>,
    last_request: Option<FetchRequest>,
}

pub struct FetchStateMachine {
    source: Arc<dyn ArticleSource>,
    inner: Mutex<Inner>,
    phase: watch::Sender<FetchPhase>,
}

impl FetchStateMachine {
    pub fn new(source: Arc<dyn ArticleSource>) -> Self {
        let (phase, _) = watch::channel(FetchPhase::Idle);
        Self {
            source,
            inner: Mutex::new(Inner {
                token: 0,
                policy: SortPolicy::default(),
                original: Vec::new(),
                last_request: None,
            }),
            phase,
        }
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase.borrow().clone()
    }

    /// Receiver notified on every phase change.
    pub fn subscribe(&self) -> watch::Receiver<FetchPhase> {
        self.phase.subscribe()
    }

    pub fn sort_policy(&self) -> SortPolicy {
        self.lock().policy
    }

    pub fn last_request(&self) -> Option<FetchRequest> {
        self.lock().last_request.clone()
    }

    pub async fn load_category(&self, category: NewsCategory) {
        let (token, _) = self.begin(FetchRequest::Category(category));
        let result = self.source.fetch_by_category(category).await;
        self.complete(token, result);
    }

    /// Search for `query`. Blank queries are ignored and leave the current
    /// phase untouched.
    pub async fn search(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            tracing::debug!("Ignoring empty search query");
            return;
        }

        let (token, policy) = self.begin(FetchRequest::Search(query.to_string()));
        let result = self.source.search(query, policy).await;
        self.complete(token, result);
    }

    /// Replay the last request, if any.
    pub async fn retry(&self) {
        match self.last_request() {
            Some(FetchRequest::Category(category)) => self.load_category(category).await,
            Some(FetchRequest::Search(query)) => self.search(&query).await,
            None => tracing::debug!("Nothing to retry"),
        }
    }

    pub fn set_sort_policy(&self, policy: SortPolicy) {
        let mut inner = self.lock();
        inner.policy = policy;

        if matches!(*self.phase.borrow(), FetchPhase::Success(_)) {
            let sorted = sort(&inner.original, policy);
            self.phase.send_replace(FetchPhase::Success(sorted));
        }
    }

    fn begin(&self, request: FetchRequest) -> (u64, SortPolicy) {
        let mut inner = self.lock();
        inner.token += 1;
        inner.last_request = Some(request);
        self.phase.send_replace(FetchPhase::Idle);
        (inner.token, inner.policy)
    }

    fn complete(&self, token: u64, result: Result<Vec<Article>>) {
        let mut inner = self.lock();
        if token != inner.token {
            tracing::debug!(
                "Dropping stale response (token {}, latest {})",
                token,
                inner.token
            );
            return;
        }

        match result {
            Ok(articles) => {
                let sorted = sort(&articles, inner.policy);
                inner.original = articles;
                self.phase.send_replace(FetchPhase::Success(sorted));
            }
            Err(e) => {
                tracing::warn!("Fetch failed: {}", e);
                inner.original.clear();
                self.phase.send_replace(FetchPhase::Failure(Arc::new(e)));
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Inner holds no invariants a panicking writer could break halfway.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use tokio::sync::Notify;

    fn article(source: &str, url: &str, secs: i64) -> Article {
        Article::new(source, url, url, Utc.timestamp_opt(secs, 0).unwrap())
    }

    fn urls(phase: &FetchPhase) -> Vec<String> {
        phase.articles().iter().map(|a| a.url.clone()).collect()
    }

    /// Canned responses keyed by category name or query. A gated key blocks
    /// until released so tests can control completion order.
    #[derive(Default)]
    struct ScriptedSource {
        responses: Mutex<HashMap<String, Vec<Article>>>,
        failures: Mutex<HashMap<String, u16>>,
        gated: Mutex<Option<String>>,
        started: Notify,
        release: Notify,
        calls: AtomicUsize,
        policies: Mutex<Vec<SortPolicy>>,
    }

    impl ScriptedSource {
        fn respond(&self, key: &str, articles: Vec<Article>) {
            self.responses.lock().unwrap().insert(key.to_string(), articles);
        }

        fn fail(&self, key: &str, code: u16) {
            self.failures.lock().unwrap().insert(key.to_string(), code);
        }

        fn gate(&self, key: &str) {
            *self.gated.lock().unwrap() = Some(key.to_string());
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        async fn answer(&self, key: &str) -> Result<Vec<Article>> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            let is_gated = self.gated.lock().unwrap().as_deref() == Some(key);
            if is_gated {
                self.started.notify_one();
                self.release.notified().await;
            }

            if let Some(code) = self.failures.lock().unwrap().get(key) {
                return Err(NewsError::Server { code: *code });
            }
            Ok(self
                .responses
                .lock()
                .unwrap()
                .get(key)
                .cloned()
                .unwrap_or_default())
        }
    }

    #[async_trait]
    impl ArticleSource for ScriptedSource {
        async fn fetch_by_category(&self, category: NewsCategory) -> Result<Vec<Article>> {
            self.answer(category.as_str()).await
        }

        async fn search(&self, query: &str, policy: SortPolicy) -> Result<Vec<Article>> {
            self.policies.lock().unwrap().push(policy);
            self.answer(query).await
        }
    }

    fn machine(source: &Arc<ScriptedSource>) -> FetchStateMachine {
        FetchStateMachine::new(source.clone())
    }

    #[tokio::test]
    async fn test_starts_idle() {
        let source = Arc::new(ScriptedSource::default());
        let machine = machine(&source);
        assert!(machine.phase().is_idle());
        assert_eq!(machine.sort_policy(), SortPolicy::Relevance);
    }

    #[tokio::test]
    async fn test_category_sorted_newest_first() {
        let source = Arc::new(ScriptedSource::default());
        source.respond(
            "technology",
            vec![article("Verge", "t1", 1_000), article("Verge", "t2", 2_000)],
        );
        let machine = machine(&source);

        machine.load_category(NewsCategory::Technology).await;
        assert_eq!(urls(&machine.phase()), vec!["t1", "t2"]);

        machine.set_sort_policy(SortPolicy::PublishedAt);
        assert_eq!(urls(&machine.phase()), vec!["t2", "t1"]);
    }

    #[tokio::test]
    async fn test_policy_change_never_refetches() {
        let source = Arc::new(ScriptedSource::default());
        source.respond(
            "business",
            vec![
                article("Axios", "a", 2),
                article("Zdnet", "z", 1),
                article("Bloomberg", "b", 3),
            ],
        );
        let machine = machine(&source);
        machine.load_category(NewsCategory::Business).await;
        assert_eq!(source.calls(), 1);

        machine.set_sort_policy(SortPolicy::Popularity);
        assert_eq!(urls(&machine.phase()), vec!["z", "b", "a"]);

        machine.set_sort_policy(SortPolicy::PublishedAt);
        assert_eq!(urls(&machine.phase()), vec!["b", "a", "z"]);

        // Back to relevance restores the source order, not the last projection
        machine.set_sort_policy(SortPolicy::Relevance);
        assert_eq!(urls(&machine.phase()), vec!["a", "z", "b"]);

        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_policy_applies_to_next_result() {
        let source = Arc::new(ScriptedSource::default());
        source.respond("rust", vec![article("A", "old", 1), article("B", "new", 2)]);
        let machine = machine(&source);

        machine.set_sort_policy(SortPolicy::PublishedAt);
        assert!(machine.phase().is_idle());

        machine.search("rust").await;
        assert_eq!(urls(&machine.phase()), vec!["new", "old"]);
        assert_eq!(
            *source.policies.lock().unwrap(),
            vec![SortPolicy::PublishedAt]
        );
    }

    #[tokio::test]
    async fn test_empty_query_is_ignored() {
        let source = Arc::new(ScriptedSource::default());
        source.respond("rust", vec![article("A", "r", 1)]);
        let machine = machine(&source);

        machine.search("rust").await;
        machine.search("   ").await;
        machine.search("").await;

        assert_eq!(source.calls(), 1);
        assert_eq!(urls(&machine.phase()), vec!["r"]);
    }

    #[tokio::test]
    async fn test_query_is_trimmed() {
        let source = Arc::new(ScriptedSource::default());
        source.respond("rust", vec![article("A", "r", 1)]);
        let machine = machine(&source);

        machine.search("  rust \n").await;
        assert_eq!(urls(&machine.phase()), vec!["r"]);
        assert_eq!(
            machine.last_request(),
            Some(FetchRequest::Search("rust".into()))
        );
    }

    #[tokio::test]
    async fn test_failure_carries_error() {
        let source = Arc::new(ScriptedSource::default());
        source.fail("health", 401);
        let machine = machine(&source);

        machine.load_category(NewsCategory::Health).await;
        let phase = machine.phase();
        assert!(matches!(phase.error(), Some(NewsError::Server { code: 401 })));
        assert!(phase.articles().is_empty());

        // Sorting a failure leaves it a failure
        machine.set_sort_policy(SortPolicy::Popularity);
        assert!(machine.phase().error().is_some());
    }

    #[tokio::test]
    async fn test_empty_result_is_success() {
        let source = Arc::new(ScriptedSource::default());
        let machine = machine(&source);

        machine.search("nothing matches").await;
        assert!(matches!(machine.phase(), FetchPhase::Success(ref a) if a.is_empty()));
    }

    #[tokio::test]
    async fn test_stale_response_is_dropped() {
        let source = Arc::new(ScriptedSource::default());
        source.respond("first", vec![article("A", "stale", 1)]);
        source.respond("second", vec![article("B", "fresh", 2)]);
        source.gate("first");
        let machine = Arc::new(machine(&source));

        let slow = {
            let machine = machine.clone();
            tokio::spawn(async move { machine.search("first").await })
        };
        source.started.notified().await;

        machine.search("second").await;
        assert_eq!(urls(&machine.phase()), vec!["fresh"]);

        source.release.notify_one();
        slow.await.unwrap();

        assert_eq!(urls(&machine.phase()), vec!["fresh"]);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_subscribers_see_loading_then_result() {
        let source = Arc::new(ScriptedSource::default());
        source.respond("sports", vec![article("ESPN", "s", 1)]);
        source.gate("sports");
        let machine = Arc::new(machine(&source));
        let mut rx = machine.subscribe();

        let task = {
            let machine = machine.clone();
            tokio::spawn(async move { machine.load_category(NewsCategory::Sports).await })
        };
        source.started.notified().await;
        assert!(rx.borrow_and_update().is_idle());

        source.release.notify_one();
        rx.changed().await.unwrap();
        assert_eq!(urls(&rx.borrow_and_update()), vec!["s"]);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_retry_replays_last_request() {
        let source = Arc::new(ScriptedSource::default());
        source.fail("science", 500);
        let machine = machine(&source);

        machine.retry().await;
        assert_eq!(source.calls(), 0);

        machine.load_category(NewsCategory::Science).await;
        assert!(machine.phase().error().is_some());

        source.failures.lock().unwrap().clear();
        source.respond("science", vec![article("Nature", "n", 1)]);
        machine.retry().await;

        assert_eq!(source.calls(), 2);
        assert_eq!(urls(&machine.phase()), vec!["n"]);
    }
}
