//! The in-process event collection.
//!
//! [`GraphStore`] owns the current sequence of events and is the single
//! source for every derived view. The collection is only ever replaced
//! wholesale, so readers see either the old or the new state.
//!
//! ## Request Sequencing
//!
//! Every `load` and every `add` takes a ticket from a monotonic counter
//! before suspending. When a result comes back, it is applied only if its
//! ticket is newer than the last applied one; older results are discarded.
//! The latest issued request therefore wins regardless of completion order.

pub mod seed;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::canonical::canonical_hash_hex;
use crate::remote::{RemoteStore, TransportError};
use crate::types::{EventId, EventRecord};
use crate::views::GraphStats;

pub use seed::seed_events;

/// Error type for store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The remote store could not be reached or refused the request.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    /// An event with this id is already loaded.
    #[error("Duplicate event id: {0}")]
    DuplicateId(EventId),
    /// No event with this id is loaded.
    #[error("Event not found: {0}")]
    NotFound(EventId),
}

/// What happens to the local collection after a successful submit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    /// Reload the whole collection from the remote store.
    #[default]
    RefetchAfterWrite,
    /// Append the record locally; the next load reconciles.
    Optimistic,
}

/// How `add` treats an id that is already present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Refuse before contacting the remote store.
    #[default]
    Reject,
    /// Submit anyway; lookups keep returning the first occurrence.
    Allow,
}

/// Store configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Post-write behavior.
    pub write_policy: WritePolicy,
    /// Duplicate id handling on `add`.
    pub duplicates: DuplicatePolicy,
}

/// Where the current collection came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Nothing loaded yet.
    #[default]
    Empty,
    /// Fetched from the remote store.
    Remote,
    /// Built-in sample data after a failed fetch.
    Seed,
    /// Remote data plus locally merged writes.
    Optimistic,
}

/// Result of a refresh of the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Refresh {
    /// Replaced with the remote collection.
    Fetched {
        /// Number of events now loaded.
        events: usize,
    },
    /// Fetch failed; replaced with the seed set.
    Seeded {
        /// Why the fetch failed.
        cause: TransportError,
    },
    /// A submitted record was appended locally.
    Merged {
        /// Number of events now loaded.
        events: usize,
    },
    /// A newer request had already been applied; this result was dropped.
    Superseded {
        /// Ticket of the dropped request.
        ticket: u64,
        /// Fetch failure, if the dropped request had failed.
        failure: Option<TransportError>,
    },
}

impl Refresh {
    /// Transport failure to surface to the user, if any.
    pub fn warning(&self) -> Option<&TransportError> {
        match self {
            Self::Seeded { cause } => Some(cause),
            Self::Superseded { failure, .. } => failure.as_ref(),
            Self::Fetched { .. } | Self::Merged { .. } => None,
        }
    }

    /// Whether the store now shows fallback data.
    pub fn is_seeded(&self) -> bool {
        matches!(self, Self::Seeded { .. })
    }
}

/// Immediate parent lineage of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lineage {
    /// The event itself.
    pub event: EventRecord,
    /// Parents in stored order.
    pub parents: Vec<ParentLink>,
}

/// One parent reference, resolved against the current collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentLink {
    /// Referenced id.
    pub id: EventId,
    /// The referenced event, if loaded. `None` for dangling references.
    pub event: Option<EventRecord>,
}

#[derive(Debug)]
struct StoreState {
    events: Arc<[EventRecord]>,
    /// Id -> position of the first occurrence.
    index: HashMap<EventId, usize>,
    source: DataSource,
    applied_ticket: u64,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            events: Arc::from(Vec::new()),
            index: HashMap::new(),
            source: DataSource::Empty,
            applied_ticket: 0,
        }
    }
}

impl StoreState {
    fn replace(&mut self, events: Vec<EventRecord>, source: DataSource, ticket: u64) {
        let mut index = HashMap::with_capacity(events.len());
        let mut duplicates = 0usize;
        for (position, event) in events.iter().enumerate() {
            match index.entry(event.id()) {
                Entry::Occupied(_) => duplicates += 1,
                Entry::Vacant(slot) => {
                    slot.insert(position);
                }
            }
        }
        if duplicates > 0 {
            tracing::warn!(duplicates, "collection contains duplicate event ids");
        }

        self.events = events.into();
        self.index = index;
        self.source = source;
        self.applied_ticket = ticket;
    }
}

/// The authoritative in-process collection of events.
///
/// Shared by reference; all methods take `&self`.
pub struct GraphStore<R: RemoteStore> {
    remote: R,
    config: StoreConfig,
    state: RwLock<StoreState>,
    next_ticket: AtomicU64,
}

impl<R: RemoteStore> GraphStore<R> {
    /// Create an empty store with the default configuration.
    pub fn new(remote: R) -> Self {
        Self::with_config(remote, StoreConfig::default())
    }

    /// Create an empty store with an explicit configuration.
    pub fn with_config(remote: R, config: StoreConfig) -> Self {
        Self {
            remote,
            config,
            state: RwLock::new(StoreState::default()),
            next_ticket: AtomicU64::new(0),
        }
    }

    /// Store configuration.
    pub fn config(&self) -> StoreConfig {
        self.config
    }

    /// The remote store backing this collection.
    pub fn remote(&self) -> &R {
        &self.remote
    }

    fn issue_ticket(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Replace the collection if `ticket` is newer than the applied one.
    fn apply(&self, ticket: u64, events: Vec<EventRecord>, source: DataSource) -> bool {
        let mut state = self.state.write();
        if ticket <= state.applied_ticket {
            tracing::debug!(
                ticket,
                applied_ticket = state.applied_ticket,
                "discarding stale result"
            );
            return false;
        }
        state.replace(events, source, ticket);
        true
    }

    /// Reload the collection from the remote store.
    ///
    /// On transport failure the collection is replaced with the seed set and
    /// the failure is returned inside [`Refresh::Seeded`]. Never fails.
    pub async fn load(&self) -> Refresh {
        let ticket = self.issue_ticket();

        match self.remote.fetch_all().await {
            Ok(events) => {
                let count = events.len();
                if self.apply(ticket, events, DataSource::Remote) {
                    tracing::info!(ticket, events = count, "loaded events");
                    Refresh::Fetched { events: count }
                } else {
                    Refresh::Superseded { ticket, failure: None }
                }
            }
            Err(cause) => {
                tracing::warn!(ticket, error = %cause, "failed to load events; using sample data");
                if self.apply(ticket, seed_events(), DataSource::Seed) {
                    Refresh::Seeded { cause }
                } else {
                    Refresh::Superseded {
                        ticket,
                        failure: Some(cause),
                    }
                }
            }
        }
    }

    /// Submit a record to the remote store, then refresh per the write policy.
    ///
    /// On failure nothing changes locally.
    pub async fn add(&self, record: EventRecord) -> Result<Refresh, StoreError> {
        if self.config.duplicates == DuplicatePolicy::Reject && self.holds_remote_id(record.id()) {
            tracing::warn!(event_id = %record.id(), "rejecting duplicate event id");
            return Err(StoreError::DuplicateId(record.id()));
        }

        if let Err(e) = self.remote.submit(&record).await {
            tracing::warn!(event_id = %record.id(), error = %e, "failed to add event");
            return Err(e.into());
        }
        tracing::info!(event_id = %record.id(), policy = ?self.config.write_policy, "event submitted");

        match self.config.write_policy {
            WritePolicy::RefetchAfterWrite => Ok(self.load().await),
            WritePolicy::Optimistic => match self.merge_local(record) {
                Some(refresh) => Ok(refresh),
                None => Ok(self.load().await),
            },
        }
    }

    /// Whether `id` is present in a collection that came from the remote.
    ///
    /// Seed data never blocks a write.
    fn holds_remote_id(&self, id: EventId) -> bool {
        let state = self.state.read();
        matches!(state.source, DataSource::Remote | DataSource::Optimistic)
            && state.index.contains_key(&id)
    }

    /// Append locally. Returns `None` when the collection is seed data,
    /// which must be reloaded rather than extended.
    fn merge_local(&self, record: EventRecord) -> Option<Refresh> {
        let mut state = self.state.write();
        if state.source == DataSource::Seed {
            tracing::debug!(event_id = %record.id(), "collection is seed data; reloading instead of merging");
            return None;
        }
        let ticket = self.issue_ticket();
        if ticket <= state.applied_ticket {
            return Some(Refresh::Superseded { ticket, failure: None });
        }

        let mut events = state.events.to_vec();
        events.push(record);
        let count = events.len();
        state.replace(events, DataSource::Optimistic, ticket);
        Some(Refresh::Merged { events: count })
    }

    /// Look up an event by id. The first occurrence wins.
    pub fn find_by_id(&self, id: EventId) -> Option<EventRecord> {
        let state = self.state.read();
        state.index.get(&id).map(|&position| state.events[position].clone())
    }

    /// Look up an event by id, treating a miss as [`StoreError::NotFound`].
    pub fn require(&self, id: EventId) -> Result<EventRecord, StoreError> {
        self.find_by_id(id).ok_or(StoreError::NotFound(id))
    }

    /// Resolve an event's immediate parents against the current collection.
    pub fn lineage(&self, id: EventId) -> Result<Lineage, StoreError> {
        let state = self.state.read();
        let position = *state.index.get(&id).ok_or(StoreError::NotFound(id))?;
        let event = state.events[position].clone();
        let parents = event
            .parents()
            .iter()
            .map(|parent| ParentLink {
                id: *parent,
                event: state.index.get(parent).map(|&p| state.events[p].clone()),
            })
            .collect();
        Ok(Lineage { event, parents })
    }

    /// The current collection in display order.
    ///
    /// Returns the same allocation until the next applied refresh.
    pub fn all(&self) -> Arc<[EventRecord]> {
        Arc::clone(&self.state.read().events)
    }

    /// Aggregate statistics over the current collection.
    pub fn stats(&self) -> GraphStats {
        GraphStats::compute(&self.all())
    }

    /// Where the current collection came from.
    pub fn source(&self) -> DataSource {
        self.state.read().source
    }

    /// Canonical hash of the current collection, order included.
    pub fn fingerprint(&self) -> String {
        canonical_hash_hex(&*self.all())
    }

    /// Number of loaded events.
    pub fn len(&self) -> usize {
        self.state.read().events.len()
    }

    /// Whether no events are loaded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
