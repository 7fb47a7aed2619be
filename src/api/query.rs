//! Cache-backed reads and invalidating writes.
//!
//! [`QueryClient`] drives a [`QueryCache`] with real requests. Reads are keyed
//! by [`QueryKey`]; values of any type share one cache as `Rc<dyn Any>` and
//! are downcast on the way out. Writes invalidate the families they affect
//! only once the server confirms them.

use std::any::Any;
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use tracing::debug;

use super::{ApiClient, Transport};
use crate::core::{
    ApiError, Completion, FetchPlan, QueryCache, QueryKey, QuerySnapshot, SessionStore,
};
use crate::models::{FolderContents, PaginatedResult, ResourceFamily};

type CachedValue = Rc<dyn Any>;

pub struct QueryClient<T, S> {
    api: ApiClient<T, S>,
    cache: RefCell<QueryCache<CachedValue>>,
    listener: RefCell<Option<Rc<dyn Fn()>>>,
}

impl<T: Transport, S: SessionStore> QueryClient<T, S> {
    pub fn new(api: ApiClient<T, S>) -> Self {
        Self {
            api,
            cache: RefCell::new(QueryCache::new()),
            listener: RefCell::new(None),
        }
    }

    pub fn api(&self) -> &ApiClient<T, S> {
        &self.api
    }

    /// Register the callback run whenever cached state changes.
    pub fn set_listener(&self, listener: impl Fn() + 'static) {
        *self.listener.borrow_mut() = Some(Rc::new(listener));
    }

    fn notify(&self) {
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current state of `key`, typed.
    pub fn snapshot<R: 'static>(&self, key: &QueryKey) -> QuerySnapshot<Rc<R>> {
        let snapshot = self.cache.borrow().snapshot(key);
        QuerySnapshot {
            status: snapshot.status,
            data: snapshot.data.and_then(|value| value.downcast::<R>().ok()),
            error: snapshot.error,
            is_stale: snapshot.is_stale,
        }
    }

    pub fn observe(&self, key: &QueryKey) {
        self.cache.borrow_mut().observe(key);
    }

    /// Stop observing `key`; the last observer leaving cancels its fetch.
    pub fn release(&self, key: &QueryKey) {
        self.cache.borrow_mut().release(key);
    }

    /// Load `key` with `load` unless the cache already has it or a request
    /// for it is in flight.
    pub async fn fetch<R, F, Fut>(&self, key: &QueryKey, force: bool, load: F) -> QuerySnapshot<Rc<R>>
    where
        R: 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, ApiError>>,
    {
        let plan = self.cache.borrow_mut().begin(key, force);
        if let FetchPlan::Issue(ticket) = plan {
            self.notify();
            let result = load()
                .await
                .map(|value| Rc::new(value) as CachedValue)
                .map_err(|e| e.message());
            let completion = self.cache.borrow_mut().complete(&ticket, result);
            match completion {
                Completion::Applied => self.notify(),
                Completion::Discarded => {
                    debug!(family = ?key.family, scope = %key.scope, "discarded outdated response")
                }
            }
        }
        self.snapshot(key)
    }

    /// Fetch one page of the family collection named by the key.
    pub async fn fetch_list<R>(&self, key: &QueryKey, force: bool) -> QuerySnapshot<Rc<PaginatedResult<R>>>
    where
        R: DeserializeOwned + 'static,
    {
        self.fetch(key, force, || self.api.list::<R>(key.family.path(), &key.query))
            .await
    }

    /// Fetch a folder with its children, cached under `folder:<id>`.
    pub async fn fetch_folder(&self, id: &str, force: bool) -> QuerySnapshot<Rc<FolderContents>> {
        let key = folder_key(id);
        self.fetch(&key, force, || self.api.folder_contents(id)).await
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Await a mutation; on success, invalidate every family it affects.
    ///
    /// A failed mutation leaves the cache exactly as it was.
    pub async fn mutate<R, Fut>(&self, family: ResourceFamily, mutation: Fut) -> Result<R, ApiError>
    where
        Fut: Future<Output = Result<R, ApiError>>,
    {
        let result = mutation.await;
        if result.is_ok() {
            let refetch = self.cache.borrow_mut().invalidate_after_mutation(family);
            debug!(family = ?family, observed = refetch.len(), "invalidated after mutation");
            self.notify();
        }
        result
    }

    pub fn invalidate(&self, family: ResourceFamily) {
        self.cache.borrow_mut().invalidate(family);
        self.notify();
    }

    /// Forget everything, e.g. when the user signs out.
    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
        self.notify();
    }

    /// Drop unobserved entries that are stale or failed, and the least
    /// recently used ones beyond the cache capacity.
    pub fn prune(&self) {
        self.cache.borrow_mut().prune();
    }
}

/// Cache key of a folder detail view.
pub fn folder_key(id: &str) -> QueryKey {
    QueryKey::scoped(
        ResourceFamily::Folders,
        format!("folder:{}", id),
        Default::default(),
    )
}
