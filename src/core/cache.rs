//! Query cache keyed by full query identity.
//!
//! The cache is a synchronous state machine; the async client drives it.
//! Every fetch is represented by a [`Ticket`] carrying a per-cache sequence
//! number. An entry remembers only the ticket of its current fetch, so:
//!
//! - at most one fetch per key is in flight (later callers join it),
//! - a response whose ticket is no longer current is discarded, whether it
//!   was superseded by invalidation or cancelled because no view observes
//!   the key anymore.
//!
//! Per-key state: `Idle -> Loading -> Success | Error`, and back to
//! `Loading` on refetch while previous data stays readable.
//!
//! Entries no view observes are kept for quick back-navigation, up to a
//! capacity; [`QueryCache::prune`] evicts the least recently used beyond it.

use std::collections::HashMap;

use crate::config::query::CACHE_CAPACITY;
use crate::models::{ResourceFamily, ResourceQuery};

/// Identity of one cached result.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub family: ResourceFamily,
    /// Sub-collection within the family, e.g. `list` or `folder:<id>`.
    pub scope: String,
    pub query: ResourceQuery,
}

impl QueryKey {
    pub fn list(family: ResourceFamily, query: ResourceQuery) -> Self {
        Self {
            family,
            scope: "list".to_string(),
            query,
        }
    }

    pub fn scoped(family: ResourceFamily, scope: impl Into<String>, query: ResourceQuery) -> Self {
        Self {
            family,
            scope: scope.into(),
            query,
        }
    }
}

/// Lifecycle state of a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Read-only view of one entry.
#[derive(Clone, Debug, PartialEq)]
pub struct QuerySnapshot<V> {
    pub status: QueryStatus,
    /// Last successful result, kept while refetching or after a failed refetch.
    pub data: Option<V>,
    pub error: Option<String>,
    pub is_stale: bool,
}

impl<V> QuerySnapshot<V> {
    pub fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            is_stale: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    /// Loading with nothing to show yet.
    pub fn is_initial_load(&self) -> bool {
        self.is_loading() && self.data.is_none()
    }

    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> QuerySnapshot<U> {
        QuerySnapshot {
            status: self.status,
            data: self.data.map(f),
            error: self.error,
            is_stale: self.is_stale,
        }
    }
}

/// Handle for one issued fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub key: QueryKey,
    seq: u64,
}

/// What the caller should do after [`QueryCache::begin`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchPlan {
    /// Send the request and report back with the ticket.
    Issue(Ticket),
    /// A request for this key is already in flight.
    Joined,
    /// Cached data is current; nothing to send.
    Fresh,
}

/// Whether a completed fetch was written to the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Discarded,
}

#[derive(Debug)]
struct Entry<V> {
    data: Option<V>,
    error: Option<String>,
    stale: bool,
    in_flight: Option<u64>,
    observers: usize,
    last_used: u64,
}

impl<V> Default for Entry<V> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            stale: false,
            in_flight: None,
            observers: 0,
            last_used: 0,
        }
    }
}

impl<V> Entry<V> {
    fn is_idle(&self) -> bool {
        self.observers == 0 && self.in_flight.is_none()
    }

    fn status(&self) -> QueryStatus {
        if self.in_flight.is_some() {
            QueryStatus::Loading
        } else if self.error.is_some() {
            QueryStatus::Error
        } else if self.data.is_some() {
            QueryStatus::Success
        } else {
            QueryStatus::Idle
        }
    }
}

/// Cache of query results.
#[derive(Debug)]
pub struct QueryCache<V> {
    entries: HashMap<QueryKey, Entry<V>>,
    next_seq: u64,
    /// Logical clock for recency.
    clock: u64,
    /// Idle entries kept after pruning.
    capacity: usize,
}

impl<V> Default for QueryCache<V> {
    fn default() -> Self {
        Self::with_capacity(CACHE_CAPACITY)
    }
}

impl<V> QueryCache<V> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            next_seq: 0,
            clock: 0,
            capacity,
        }
    }

    fn touch(&mut self, key: &QueryKey) -> &mut Entry<V> {
        self.clock += 1;
        let entry = self.entries.entry(key.clone()).or_default();
        entry.last_used = self.clock;
        entry
    }
}

impl<V: Clone> QueryCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether `key` needs a request.
    ///
    /// A settled entry (success or error) that is not stale is served as is;
    /// failed queries are retried only when asked. `force` refetches anyway
    /// (retry button, manual refresh) but still joins an in-flight request
    /// instead of issuing a second one.
    pub fn begin(&mut self, key: &QueryKey, force: bool) -> FetchPlan {
        let seq = self.next_seq + 1;
        let entry = self.touch(key);
        if entry.in_flight.is_some() {
            return FetchPlan::Joined;
        }
        let settled = entry.data.is_some() || entry.error.is_some();
        if !force && settled && !entry.stale {
            return FetchPlan::Fresh;
        }
        entry.in_flight = Some(seq);
        self.next_seq = seq;
        FetchPlan::Issue(Ticket {
            key: key.clone(),
            seq,
        })
    }

    /// Record the outcome of a fetch. Outdated tickets are discarded.
    pub fn complete(&mut self, ticket: &Ticket, result: Result<V, String>) -> Completion {
        let Some(entry) = self.entries.get_mut(&ticket.key) else {
            return Completion::Discarded;
        };
        if entry.in_flight != Some(ticket.seq) {
            return Completion::Discarded;
        }
        entry.in_flight = None;
        match result {
            Ok(data) => {
                entry.data = Some(data);
                entry.error = None;
                entry.stale = false;
            }
            Err(message) => entry.error = Some(message),
        }
        Completion::Applied
    }

    pub fn snapshot(&self, key: &QueryKey) -> QuerySnapshot<V> {
        match self.entries.get(key) {
            Some(entry) => QuerySnapshot {
                status: entry.status(),
                data: entry.data.clone(),
                error: entry.error.clone(),
                is_stale: entry.stale,
            },
            None => QuerySnapshot::idle(),
        }
    }

    pub fn data(&self, key: &QueryKey) -> Option<&V> {
        self.entries.get(key).and_then(|e| e.data.as_ref())
    }

    /// Register a view displaying `key`.
    pub fn observe(&mut self, key: &QueryKey) {
        self.touch(key).observers += 1;
    }

    /// Unregister a view. The last observer leaving cancels any in-flight
    /// fetch, so its response has no effect.
    pub fn release(&mut self, key: &QueryKey) {
        if self.entries.contains_key(key) {
            let entry = self.touch(key);
            entry.observers = entry.observers.saturating_sub(1);
            if entry.observers == 0 {
                entry.in_flight = None;
            }
        }
    }

    /// Mark every query of `family` stale and cancel its in-flight fetches.
    ///
    /// Returns the observed keys, which the caller should refetch.
    pub fn invalidate(&mut self, family: ResourceFamily) -> Vec<QueryKey> {
        let mut observed = Vec::new();
        for (key, entry) in self.entries.iter_mut().filter(|(k, _)| k.family == family) {
            entry.stale = true;
            entry.in_flight = None;
            if entry.observers > 0 {
                observed.push(key.clone());
            }
        }
        observed
    }

    /// Invalidate every family a successful mutation of `family` affects.
    pub fn invalidate_after_mutation(&mut self, family: ResourceFamily) -> Vec<QueryKey> {
        family
            .affected_by()
            .iter()
            .flat_map(|affected| self.invalidate(*affected))
            .collect()
    }

    /// Drop idle entries that are stale or failed, then evict the least
    /// recently used idle entries beyond the capacity.
    pub fn prune(&mut self) {
        self.entries
            .retain(|_, e| !e.is_idle() || (!e.stale && e.error.is_none()));

        let mut idle: Vec<(u64, QueryKey)> = self
            .entries
            .iter()
            .filter(|(_, e)| e.is_idle())
            .map(|(k, e)| (e.last_used, k.clone()))
            .collect();
        if idle.len() <= self.capacity {
            return;
        }
        idle.sort_unstable_by_key(|(last_used, _)| *last_used);
        let excess = idle.len() - self.capacity;
        for (_, key) in idle.into_iter().take(excess) {
            self.entries.remove(&key);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(search: &str) -> QueryKey {
        let mut query = ResourceQuery::new(10);
        query.set_search(search);
        QueryKey::list(ResourceFamily::Folders, query)
    }

    fn issue(cache: &mut QueryCache<String>, key: &QueryKey) -> Ticket {
        match cache.begin(key, false) {
            FetchPlan::Issue(ticket) => ticket,
            other => panic!("expected Issue, got {:?}", other),
        }
    }

    #[test]
    fn test_first_read_issues() {
        let mut cache = QueryCache::<String>::new();
        let k = key("a");
        assert_eq!(cache.snapshot(&k).status, QueryStatus::Idle);

        let ticket = issue(&mut cache, &k);
        assert_eq!(cache.snapshot(&k).status, QueryStatus::Loading);
        assert!(cache.snapshot(&k).is_initial_load());

        assert_eq!(cache.complete(&ticket, Ok("A".into())), Completion::Applied);
        let snap = cache.snapshot(&k);
        assert_eq!(snap.status, QueryStatus::Success);
        assert_eq!(snap.data.as_deref(), Some("A"));
    }

    #[test]
    fn test_concurrent_reads_are_deduplicated() {
        let mut cache = QueryCache::<String>::new();
        let k = key("a");
        let _ticket = issue(&mut cache, &k);
        assert_eq!(cache.begin(&k, false), FetchPlan::Joined);
        assert_eq!(cache.begin(&k, true), FetchPlan::Joined);
    }

    #[test]
    fn test_fresh_data_is_served_from_cache() {
        let mut cache = QueryCache::<String>::new();
        let k = key("a");
        let ticket = issue(&mut cache, &k);
        cache.complete(&ticket, Ok("A".into()));
        assert_eq!(cache.begin(&k, false), FetchPlan::Fresh);
        assert!(matches!(cache.begin(&k, true), FetchPlan::Issue(_)));
    }

    #[test]
    fn test_superseded_query_is_discarded() {
        let mut cache = QueryCache::<String>::new();
        let a = key("a");
        let b = key("b");

        cache.observe(&a);
        let ticket_a = issue(&mut cache, &a);

        // The view switches to B before A resolves.
        cache.release(&a);
        cache.observe(&b);
        let ticket_b = issue(&mut cache, &b);

        assert_eq!(cache.complete(&ticket_a, Ok("A".into())), Completion::Discarded);
        assert_eq!(cache.data(&a), None);
        assert!(cache.snapshot(&b).is_loading());

        assert_eq!(cache.complete(&ticket_b, Ok("B".into())), Completion::Applied);
        assert_eq!(cache.snapshot(&b).data.as_deref(), Some("B"));
    }

    #[test]
    fn test_shared_key_survives_one_observer_leaving() {
        let mut cache = QueryCache::<String>::new();
        let k = key("a");
        cache.observe(&k);
        cache.observe(&k);
        let ticket = issue(&mut cache, &k);
        cache.release(&k);
        assert_eq!(cache.complete(&ticket, Ok("A".into())), Completion::Applied);
    }

    #[test]
    fn test_invalidation_drops_in_flight_response() {
        let mut cache = QueryCache::<String>::new();
        let k = key("a");
        cache.observe(&k);
        let old = issue(&mut cache, &k);

        assert_eq!(cache.invalidate(ResourceFamily::Folders), vec![k.clone()]);
        let new = issue(&mut cache, &k);

        assert_eq!(cache.complete(&old, Ok("before".into())), Completion::Discarded);
        assert_eq!(cache.complete(&new, Ok("after".into())), Completion::Applied);
        assert_eq!(cache.data(&k).map(String::as_str), Some("after"));
    }

    #[test]
    fn test_stale_data_stays_visible_while_refetching() {
        let mut cache = QueryCache::<String>::new();
        let k = key("a");
        let ticket = issue(&mut cache, &k);
        cache.complete(&ticket, Ok("A".into()));

        cache.invalidate(ResourceFamily::Folders);
        assert!(cache.snapshot(&k).is_stale);
        let _refetch = issue(&mut cache, &k);

        let snap = cache.snapshot(&k);
        assert!(snap.is_loading());
        assert!(!snap.is_initial_load());
        assert_eq!(snap.data.as_deref(), Some("A"));
    }

    #[test]
    fn test_invalidation_is_scoped_to_family() {
        let mut cache = QueryCache::<String>::new();
        let folders = key("a");
        let users = QueryKey::list(ResourceFamily::Users, ResourceQuery::new(10));
        for k in [&folders, &users] {
            let ticket = issue(&mut cache, k);
            cache.complete(&ticket, Ok("x".into()));
        }
        cache.invalidate(ResourceFamily::Folders);
        assert!(cache.snapshot(&folders).is_stale);
        assert!(!cache.snapshot(&users).is_stale);
        assert_eq!(cache.begin(&users, false), FetchPlan::Fresh);
    }

    #[test]
    fn test_mutation_invalidates_affected_families() {
        let mut cache = QueryCache::<String>::new();
        let folders = key("a");
        let activities = QueryKey::list(ResourceFamily::Activities, ResourceQuery::new(10));
        let events = QueryKey::list(ResourceFamily::Events, ResourceQuery::new(10));
        for k in [&folders, &activities, &events] {
            cache.observe(k);
            let ticket = issue(&mut cache, k);
            cache.complete(&ticket, Ok("x".into()));
        }

        let refetch = cache.invalidate_after_mutation(ResourceFamily::Files);
        assert!(refetch.contains(&folders));
        assert!(refetch.contains(&activities));
        assert!(!refetch.contains(&events));
        assert!(!cache.snapshot(&events).is_stale);
    }

    #[test]
    fn test_error_keeps_other_queries() {
        let mut cache = QueryCache::<String>::new();
        let a = key("a");
        let b = key("b");
        let ta = issue(&mut cache, &a);
        cache.complete(&ta, Ok("A".into()));
        let tb = issue(&mut cache, &b);
        cache.complete(&tb, Err("boom".into()));

        assert_eq!(cache.snapshot(&b).status, QueryStatus::Error);
        assert_eq!(cache.snapshot(&b).error.as_deref(), Some("boom"));
        assert_eq!(cache.snapshot(&a).status, QueryStatus::Success);
    }

    #[test]
    fn test_failed_refetch_keeps_previous_data() {
        let mut cache = QueryCache::<String>::new();
        let k = key("a");
        let ticket = issue(&mut cache, &k);
        cache.complete(&ticket, Ok("A".into()));
        let ticket = match cache.begin(&k, true) {
            FetchPlan::Issue(t) => t,
            other => panic!("{:?}", other),
        };
        cache.complete(&ticket, Err("offline".into()));

        let snap = cache.snapshot(&k);
        assert_eq!(snap.status, QueryStatus::Error);
        assert_eq!(snap.data.as_deref(), Some("A"));
        // Errors stay settled until a forced retry.
        assert_eq!(cache.begin(&k, false), FetchPlan::Fresh);
        assert!(matches!(cache.begin(&k, true), FetchPlan::Issue(_)));
    }

    #[test]
    fn test_prune_keeps_observed_and_fresh() {
        let mut cache = QueryCache::<String>::new();
        let fresh = key("fresh");
        let stale = key("stale");
        let watched = key("watched");
        for k in [&fresh, &stale, &watched] {
            let ticket = issue(&mut cache, k);
            cache.complete(&ticket, Ok("x".into()));
        }
        cache.observe(&watched);
        cache.invalidate(ResourceFamily::Folders);
        let ticket = issue(&mut cache, &fresh);
        cache.complete(&ticket, Ok("y".into()));

        cache.prune();
        assert_eq!(cache.len(), 2);
        assert!(cache.data(&stale).is_none());
        assert!(cache.data(&watched).is_some());
    }

    #[test]
    fn test_prune_evicts_least_recently_used_idle_entries() {
        let mut cache = QueryCache::<String>::with_capacity(2);
        let watched = key("watched");
        cache.observe(&watched);
        let terms = ["r", "re", "rep", "repo"];
        for term in terms {
            let k = key(term);
            cache.observe(&k);
            let ticket = issue(&mut cache, &k);
            cache.complete(&ticket, Ok(term.into()));
            cache.release(&k);
        }
        // Revisiting "re" makes it recent again.
        assert_eq!(cache.begin(&key("re"), false), FetchPlan::Fresh);

        cache.prune();
        assert_eq!(cache.len(), 3);
        assert!(cache.data(&key("r")).is_none());
        assert!(cache.data(&key("rep")).is_none());
        assert!(cache.data(&key("re")).is_some());
        assert!(cache.data(&key("repo")).is_some());
        assert_eq!(cache.snapshot(&watched).status, QueryStatus::Idle);
        assert!(cache.snapshot(&watched).data.is_none());
    }
}
