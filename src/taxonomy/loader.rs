use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::{flatten_taxonomy, CategorySource};

/// Progress of the one-time taxonomy fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Pending,
    Ready,
    Failed(String),
}

#[derive(Debug, Default)]
struct OptionsInner {
    state: LoadState,
    names: Vec<String>,
}

/// Known category names shared between the loader (writer) and the form
/// (reader). Cloning yields another handle to the same store.
#[derive(Debug, Clone, Default)]
pub struct CategoryOptions {
    inner: Arc<RwLock<OptionsInner>>,
}

impl CategoryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that is already loaded with `names`.
    #[cfg(test)]
    pub(crate) fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options = Self::new();
        options.install(names.into_iter().map(Into::into).collect());
        options
    }

    pub fn state(&self) -> LoadState {
        self.read(|inner| inner.state.clone())
    }

    pub fn names(&self) -> Vec<String> {
        self.read(|inner| inner.names.clone())
    }

    pub fn with_names<R>(&self, f: impl FnOnce(&[String]) -> R) -> R {
        self.read(|inner| f(&inner.names))
    }

    pub(crate) fn install(&self, names: Vec<String>) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.names = names;
        guard.state = LoadState::Ready;
    }

    pub(crate) fn mark_failed(&self, reason: String) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.names.clear();
        guard.state = LoadState::Failed(reason);
    }

    fn read<R>(&self, f: impl FnOnce(&OptionsInner) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }
}

/// Fetches the taxonomy once and installs it into `options`, unless `token`
/// is cancelled first. Failures are logged and leave the names empty.
pub async fn load_taxonomy(
    source: Arc<dyn CategorySource>,
    options: CategoryOptions,
    token: CancellationToken,
) {
    let origin = source.describe();
    let result = tokio::select! {
        biased;
        _ = token.cancelled() => {
            debug!(source = %origin, "taxonomy fetch cancelled");
            return;
        }
        result = source.fetch() => result,
    };

    // The owner may have gone away while the response was being decoded.
    if token.is_cancelled() {
        debug!(source = %origin, "discarding taxonomy resolved after cancellation");
        return;
    }

    match result {
        Ok(groups) => {
            let names = flatten_taxonomy(&groups);
            info!(source = %origin, count = names.len(), "category taxonomy loaded");
            options.install(names);
        }
        Err(err) => {
            error!(source = %origin, error = %err, "Error fetching categories");
            options.mark_failed(err.to_string());
        }
    }
}

/// Background fetch bound to the lifetime of the form that started it.
/// Dropping the task cancels it.
pub struct TaxonomyTask {
    handle: Option<JoinHandle<()>>,
    token: CancellationToken,
}

impl TaxonomyTask {
    /// Must be called from within a tokio runtime.
    pub fn spawn(source: Arc<dyn CategorySource>, options: CategoryOptions) -> Self {
        let token = CancellationToken::new();
        let handle = tokio::spawn(load_taxonomy(source, options, token.clone()));
        Self {
            handle: Some(handle),
            token,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Waits up to `timeout` for the fetch to finish. Returns `false` when
    /// the deadline passed first; the fetch keeps running in that case.
    pub async fn settle(&mut self, timeout: Duration) -> bool {
        let Some(handle) = self.handle.as_mut() else {
            return true;
        };
        let outcome = tokio::time::timeout(timeout, handle).await;
        match outcome {
            Ok(joined) => {
                if let Err(err) = joined {
                    error!(error = %err, "taxonomy task failed to complete");
                }
                self.handle = None;
                true
            }
            Err(_) => false,
        }
    }
}

impl Drop for TaxonomyTask {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FormError;
    use crate::taxonomy::{StaticCategorySource, TaxonomyGroup};
    use async_trait::async_trait;
    use tokio::sync::Notify;

    struct FailingSource;

    #[async_trait]
    impl CategorySource for FailingSource {
        async fn fetch(&self) -> Result<Vec<TaxonomyGroup>, FormError> {
            Err(FormError::Status(503))
        }

        fn describe(&self) -> String {
            "failing".into()
        }
    }

    struct GatedSource {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl CategorySource for GatedSource {
        async fn fetch(&self) -> Result<Vec<TaxonomyGroup>, FormError> {
            self.gate.notified().await;
            Ok(vec![TaxonomyGroup::of(["Late"])])
        }

        fn describe(&self) -> String {
            "gated".into()
        }
    }

    struct CancelWhileResolving {
        token: CancellationToken,
    }

    #[async_trait]
    impl CategorySource for CancelWhileResolving {
        async fn fetch(&self) -> Result<Vec<TaxonomyGroup>, FormError> {
            self.token.cancel();
            Ok(vec![TaxonomyGroup::of(["Late"])])
        }

        fn describe(&self) -> String {
            "racing".into()
        }
    }

    #[test]
    fn new_store_is_pending_and_empty() {
        let options = CategoryOptions::new();
        assert_eq!(options.state(), LoadState::Pending);
        assert!(options.names().is_empty());
    }

    #[tokio::test]
    async fn successful_fetch_installs_names() {
        let options = CategoryOptions::new();
        let source = StaticCategorySource::new(vec![TaxonomyGroup::of([
            "Plumbing",
            "Plumbing",
            "Electrical",
        ])]);
        let mut task = TaxonomyTask::spawn(Arc::new(source), options.clone());
        assert!(task.settle(Duration::from_secs(1)).await);
        assert_eq!(options.state(), LoadState::Ready);
        assert_eq!(options.names(), vec!["Plumbing", "Electrical"]);
    }

    #[tokio::test]
    async fn failed_fetch_leaves_options_empty() {
        let options = CategoryOptions::new();
        let mut task = TaxonomyTask::spawn(Arc::new(FailingSource), options.clone());
        assert!(task.settle(Duration::from_secs(1)).await);
        assert!(matches!(options.state(), LoadState::Failed(reason) if reason.contains("503")));
        assert!(options.names().is_empty());
    }

    #[tokio::test]
    async fn cancelled_task_never_installs() {
        let options = CategoryOptions::new();
        let gate = Arc::new(Notify::new());
        let mut task = TaxonomyTask::spawn(
            Arc::new(GatedSource { gate: gate.clone() }),
            options.clone(),
        );
        task.cancel();
        assert!(task.settle(Duration::from_secs(1)).await);
        gate.notify_one();
        tokio::task::yield_now().await;
        assert_eq!(options.state(), LoadState::Pending);
        assert!(options.names().is_empty());
    }

    #[tokio::test]
    async fn dropping_the_task_cancels_the_fetch() {
        let options = CategoryOptions::new();
        let gate = Arc::new(Notify::new());
        let task = TaxonomyTask::spawn(
            Arc::new(GatedSource { gate: gate.clone() }),
            options.clone(),
        );
        drop(task);
        tokio::time::sleep(Duration::from_millis(20)).await;
        gate.notify_one();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(options.state(), LoadState::Pending);
    }

    #[tokio::test]
    async fn result_resolved_after_cancellation_is_discarded() {
        let options = CategoryOptions::new();
        let token = CancellationToken::new();
        let source = CancelWhileResolving {
            token: token.clone(),
        };
        load_taxonomy(Arc::new(source), options.clone(), token).await;
        assert_eq!(options.state(), LoadState::Pending);
        assert!(options.names().is_empty());
    }

    #[tokio::test]
    async fn settle_times_out_while_fetch_is_blocked() {
        let options = CategoryOptions::new();
        let gate = Arc::new(Notify::new());
        let mut task = TaxonomyTask::spawn(
            Arc::new(GatedSource { gate: gate.clone() }),
            options.clone(),
        );
        assert!(!task.settle(Duration::from_millis(20)).await);
        gate.notify_one();
        assert!(task.settle(Duration::from_secs(1)).await);
        assert_eq!(options.names(), vec!["Late"]);
    }
}
