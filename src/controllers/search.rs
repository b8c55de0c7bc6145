//! Remote filename search.

use std::future::Future;
use std::sync::{Arc, Mutex};

use crate::controllers::observer::{Observer, Subject};
use crate::controllers::warning::WarningSink;
use crate::domain::search::SearchMatch;
use crate::domain::warning::{ErrorCode, Warning};

/// Remote boundary for search, implemented by the REST adapter.
pub trait SearchClient {
    fn search(&self, query: &str)
        -> impl Future<Output = Result<Vec<SearchMatch>, ErrorCode>> + Send;
}

struct Inner<C, W> {
    client: Arc<C>,
    warnings: Arc<W>,
    items: Mutex<Vec<SearchMatch>>,
    subject: Subject,
}

/// Holds the latest search results and replaces them as queries resolve.
pub struct SearchController<C, W> {
    inner: Arc<Inner<C, W>>,
}

impl<C, W> Clone for SearchController<C, W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C, W> SearchController<C, W>
where
    C: SearchClient + Send + Sync + 'static,
    W: WarningSink + 'static,
{
    pub fn new(client: Arc<C>, warnings: Arc<W>) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                warnings,
                items: Mutex::new(Vec::new()),
                subject: Subject::new(),
            }),
        }
    }

    /// Run a search. An empty query clears the current results
    /// synchronously, without touching the remote; otherwise the query is
    /// dispatched and the results replace the current ones on arrival,
    /// ordered by match start.
    pub fn search(&self, query: &str) {
        if query.trim().is_empty() {
            self.inner.items.lock().unwrap().clear();
            self.inner.subject.broadcast();
            return;
        }

        let inner = Arc::clone(&self.inner);
        let query = query.to_string();
        tokio::spawn(async move {
            match inner.client.search(&query).await {
                Ok(mut matches) => {
                    matches.sort_by_key(|item| item.start);
                    *inner.items.lock().unwrap() = matches;
                    inner.subject.broadcast();
                }
                Err(code) => {
                    log::warn!("Search for {:?} failed: {}", query, code);
                    inner.warnings.push(Warning::find(&code));
                }
            }
        });
    }

    /// Current matches, ordered by match start.
    pub fn items(&self) -> Vec<SearchMatch> {
        self.inner.items.lock().unwrap().clone()
    }

    pub fn add_observer(&self, observer: Arc<dyn Observer>) {
        self.inner.subject.add_observer(observer);
    }

    pub fn remove_observer(&self, observer: &Arc<dyn Observer>) {
        self.inner.subject.remove_observer(observer);
    }
}
