//! List query hook.
//!
//! Binds a [`ResourceQuery`] signal to the query client: the current query
//! is observed and fetched, the previous one released, so a response for a
//! query the view has moved away from is never shown.

use leptos::prelude::*;
use leptos::task::spawn_local;
use serde::de::DeserializeOwned;

use crate::app::AppContext;
use crate::core::{QueryKey, QuerySnapshot, QueryStatus};
use crate::models::{PageMeta, PaginatedResult, ResourceFamily, ResourceQuery};

/// Reactive state of one paginated list.
pub struct ListState<R: Send + Sync + 'static> {
    pub family: ResourceFamily,
    pub query: RwSignal<ResourceQuery>,
    pub snapshot: Signal<QuerySnapshot<PaginatedResult<R>>>,
    ctx: AppContext,
}

impl<R: Send + Sync + 'static> Clone for ListState<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Send + Sync + 'static> Copy for ListState<R> {}

impl<R> ListState<R>
where
    R: Clone + DeserializeOwned + Send + Sync + 'static,
{
    pub fn items(&self) -> Vec<R> {
        self.snapshot
            .with(|s| s.data.as_ref().map(|page| page.items.clone()))
            .unwrap_or_default()
    }

    pub fn meta(&self) -> Option<PageMeta> {
        self.snapshot.with(|s| s.data.as_ref().map(|page| page.meta))
    }

    /// Nothing to show yet.
    pub fn is_initial_load(&self) -> bool {
        self.snapshot.with(QuerySnapshot::is_initial_load)
    }

    /// Refetching while earlier data stays visible.
    pub fn is_refreshing(&self) -> bool {
        self.snapshot.with(|s| s.is_loading() && s.data.is_some())
    }

    pub fn error(&self) -> Option<String> {
        self.snapshot.with(|s| s.error.clone())
    }

    /// Loaded, with no items.
    pub fn is_empty(&self) -> bool {
        self.snapshot.with(|s| {
            s.status == QueryStatus::Success && s.data.as_ref().is_some_and(PaginatedResult::is_empty)
        })
    }

    /// Refetch the current query, even if cached.
    pub fn retry(&self) {
        let client = self.ctx.client();
        let key = QueryKey::list(self.family, self.query.get_untracked());
        spawn_local(async move {
            client.fetch_list::<R>(&key, true).await;
        });
    }

    pub fn set_filter(&self, key: &'static str, value: Option<String>) {
        self.query.update(|q| {
            q.set_filter(key, value);
        });
    }
}

/// Observe and fetch `family` lists for the query in `initial`'s signal.
pub fn use_list<R>(family: ResourceFamily, initial: ResourceQuery) -> ListState<R>
where
    R: Clone + DeserializeOwned + Send + Sync + 'static,
{
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let query = RwSignal::new(initial);
    let key = Memo::new(move |_| QueryKey::list(family, query.get()));

    Effect::new(move |prev: Option<QueryKey>| {
        let key = key.get();
        ctx.revision.track();
        let client = ctx.client();

        let entered = prev.as_ref() != Some(&key);
        if entered {
            client.observe(&key);
            if let Some(prev) = &prev {
                client.release(prev);
                client.prune();
            }
        }
        // Returning to a query that failed retries it.
        let force = entered
            && client.snapshot::<PaginatedResult<R>>(&key).status == QueryStatus::Error;

        let fetch_key = key.clone();
        spawn_local(async move {
            client.fetch_list::<R>(&fetch_key, force).await;
        });
        key
    });

    on_cleanup(move || {
        if let Some(key) = key.try_get_untracked() {
            let client = ctx.client();
            client.release(&key);
            client.prune();
        }
    });

    let snapshot = Signal::derive(move || {
        ctx.revision.track();
        ctx.client()
            .snapshot::<PaginatedResult<R>>(&key.get())
            .map(|page| (*page).clone())
    });

    ListState {
        family,
        query,
        snapshot,
        ctx,
    }
}
