//! Simulated paginated backend.
//!
//! Each request runs on a worker thread that sleeps for the configured latency
//! and hands the page back through a oneshot channel. The returned future
//! appends the page to the shared feed when the host polls it.

use super::feed::Feed;
use crate::config::ResolvedConfig;
use crate::model::LoadError;
use crate::sentinel::{LoadFuture, LoadMore};
use futures::channel::oneshot;
use futures::FutureExt;
use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Feed shape and backend behaviour for the demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedConfig {
    /// Items per page.
    pub page_size: usize,
    /// Time each request takes.
    pub latency: Duration,
    /// Fail every Nth request, 0 for never.
    pub fail_every: usize,
    /// Feed size cap.
    pub max_items: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::from(&ResolvedConfig::default())
    }
}

impl From<&ResolvedConfig> for FeedConfig {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            page_size: config.page_size,
            latency: Duration::from_millis(config.latency_ms),
            fail_every: config.fail_every,
            max_items: config.max_items,
        }
    }
}

/// Build the items for the page starting at `start`, served by `request`.
pub fn make_page(start: usize, count: usize, request: usize) -> Vec<String> {
    (start..start + count)
        .map(|n| format!("Item #{} (request {request})", n + 1))
        .collect()
}

/// [`LoadMore`] implementation backed by worker threads.
#[derive(Debug)]
pub struct PageLoader {
    feed: Rc<RefCell<Feed>>,
    config: FeedConfig,
    requests: usize,
}

impl PageLoader {
    /// Loader appending into `feed`.
    pub fn new(feed: Rc<RefCell<Feed>>, config: FeedConfig) -> Self {
        Self {
            feed,
            config,
            requests: 0,
        }
    }

    /// Requests issued so far.
    pub fn requests(&self) -> usize {
        self.requests
    }

    fn should_fail(&self, request: usize) -> bool {
        self.config.fail_every != 0 && request % self.config.fail_every == 0
    }
}

impl LoadMore for PageLoader {
    fn load_more(&mut self) -> LoadFuture {
        self.requests += 1;
        let request = self.requests;
        let fail = self.should_fail(request);
        let start = self.feed.borrow().len();
        let count = self
            .config
            .page_size
            .min(self.config.max_items.saturating_sub(start));
        let latency = self.config.latency;

        debug!(request, start, count, fail, "Requesting page");

        let (tx, rx) = oneshot::channel();
        thread::spawn(move || {
            thread::sleep(latency);
            let page = if fail {
                Err(LoadError::failed(format!("request {request} timed out")))
            } else {
                Ok(make_page(start, count, request))
            };
            // The receiver is gone only if the host dropped the load
            let _ = tx.send(page);
        });

        let feed = Rc::clone(&self.feed);
        async move {
            let outcome = rx
                .await
                .map_err(|_| LoadError::failed("page worker exited without replying"))
                .and_then(|page| page);
            match outcome {
                Ok(page) => {
                    feed.borrow_mut().append(page);
                    Ok(())
                }
                Err(err) => {
                    feed.borrow_mut().record_failure(err.to_string());
                    Err(err)
                }
            }
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    fn instant_config(page_size: usize, fail_every: usize, max_items: usize) -> FeedConfig {
        FeedConfig {
            page_size,
            latency: Duration::ZERO,
            fail_every,
            max_items,
        }
    }

    #[test]
    fn page_is_appended_when_future_completes() {
        let feed = Rc::new(RefCell::new(Feed::new(100)));
        let mut loader = PageLoader::new(Rc::clone(&feed), instant_config(5, 0, 100));

        let pending = loader.load_more();
        assert_eq!(feed.borrow().len(), 0, "nothing lands before the future runs");

        block_on(pending).expect("load succeeds");
        assert_eq!(feed.borrow().len(), 5);
        assert_eq!(loader.requests(), 1);
    }

    #[test]
    fn every_nth_request_fails_and_is_recorded() {
        let feed = Rc::new(RefCell::new(Feed::new(100)));
        let mut loader = PageLoader::new(Rc::clone(&feed), instant_config(5, 2, 100));

        block_on(loader.load_more()).expect("first request succeeds");
        let err = block_on(loader.load_more()).expect_err("second request fails");

        assert_eq!(err, LoadError::Failed("request 2 timed out".to_string()));
        assert_eq!(feed.borrow().len(), 5);
        assert_eq!(feed.borrow().last_failure(), Some(err.to_string().as_str()));
    }

    #[test]
    fn pages_stop_at_max_items() {
        let feed = Rc::new(RefCell::new(Feed::new(7)));
        let mut loader = PageLoader::new(Rc::clone(&feed), instant_config(5, 0, 7));

        block_on(loader.load_more()).expect("load");
        block_on(loader.load_more()).expect("load");
        block_on(loader.load_more()).expect("empty page is still a success");

        assert_eq!(feed.borrow().len(), 7);
        assert!(feed.borrow().is_exhausted());
    }

    #[test]
    fn make_page_numbers_items_from_one() {
        assert_eq!(
            make_page(0, 2, 1),
            vec!["Item #1 (request 1)", "Item #2 (request 1)"]
        );
    }

    #[test]
    fn feed_config_from_resolved_converts_latency() {
        let resolved = ResolvedConfig {
            latency_ms: 250,
            ..ResolvedConfig::default()
        };
        assert_eq!(FeedConfig::from(&resolved).latency, Duration::from_millis(250));
    }
}
