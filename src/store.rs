use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::domain::{SeatCountPolicy, SeatQuery, SeatStatus, SeatStatusMap};
use crate::render::{render_layout, LayoutView};
use crate::source::SeatStatusSource;
use crate::Result;

/// Latest seat status snapshot per (bus, date), loaded through a [`SeatStatusSource`].
///
/// Snapshots are shared as `Arc`s and replaced wholesale, so a render keeps
/// the map it started with even if a reload lands meanwhile. A load only
/// lands if nothing newer was written for the query since it started.
pub struct SeatStatusStore<S> {
    source: S,
    snapshots: DashMap<SeatQuery, Arc<SeatStatusMap>>,
    /// In-flight loads per query.
    loading: DashMap<SeatQuery, usize>,
    /// Lock order: `generations` before `snapshots`.
    generations: DashMap<SeatQuery, Generation>,
}

#[derive(Debug, Default)]
struct Generation {
    issued: u64,
    applied: u64,
}

struct LoadingGuard<'a> {
    loading: &'a DashMap<SeatQuery, usize>,
    query: SeatQuery,
}

impl<'a> LoadingGuard<'a> {
    fn enter(loading: &'a DashMap<SeatQuery, usize>, query: &SeatQuery) -> Self {
        *loading.entry(query.clone()).or_insert(0) += 1;
        Self {
            loading,
            query: query.clone(),
        }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if let Some(mut count) = self.loading.get_mut(&self.query) {
            *count = count.saturating_sub(1);
        }
        self.loading.remove_if(&self.query, |_, count| *count == 0);
    }
}

impl<S: SeatStatusSource> SeatStatusStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            snapshots: DashMap::new(),
            loading: DashMap::new(),
            generations: DashMap::new(),
        }
    }

    fn issue_ticket(&self, query: &SeatQuery) -> u64 {
        let mut generation = self.generations.entry(query.clone()).or_default();
        generation.issued += 1;
        generation.issued
    }

    /// Fetches the query and installs the result unless a later load or a
    /// local write has landed first; a stale result yields the current snapshot.
    pub async fn load(&self, query: &SeatQuery) -> Result<Arc<SeatStatusMap>> {
        let _guard = LoadingGuard::enter(&self.loading, query);
        let ticket = self.issue_ticket(query);

        match self.source.fetch(query).await {
            Ok(seats) => {
                let snapshot = Arc::new(seats);
                let mut generation = self.generations.entry(query.clone()).or_default();
                if ticket <= generation.applied {
                    debug!(
                        "Discarding stale seat load for {} (load {}, current {})",
                        query.key(),
                        ticket,
                        generation.applied
                    );
                    return Ok(self.snapshot(query).unwrap_or(snapshot));
                }
                generation.applied = ticket;
                self.snapshots.insert(query.clone(), Arc::clone(&snapshot));
                info!("Loaded {} seat entries for {}", snapshot.len(), query.key());
                Ok(snapshot)
            }
            Err(e) => {
                error!("Failed to load seats for {}: {}", query.key(), e);
                Err(e)
            }
        }
    }

    pub fn snapshot(&self, query: &SeatQuery) -> Option<Arc<SeatStatusMap>> {
        self.snapshots.get(query).map(|entry| Arc::clone(entry.value()))
    }

    pub fn is_loading(&self, query: &SeatQuery) -> bool {
        self.loading.contains_key(query)
    }

    /// Renders the current snapshot; a query never loaded renders as empty.
    pub fn view(&self, query: &SeatQuery, policy: SeatCountPolicy) -> LayoutView {
        let snapshot = self.snapshot(query).unwrap_or_default();
        render_layout(&snapshot, self.is_loading(query), policy)
    }

    /// Replaces the snapshot with a copy carrying `status` for `seat`.
    pub fn apply_status(
        &self,
        query: &SeatQuery,
        seat: u32,
        status: SeatStatus,
    ) -> Result<Arc<SeatStatusMap>> {
        let mut generation = self.generations.entry(query.clone()).or_default();
        let mut entry = self.snapshots.entry(query.clone()).or_default();
        let updated = Arc::new(entry.value().with_status(seat, status)?);
        *entry.value_mut() = Arc::clone(&updated);
        generation.issued += 1;
        generation.applied = generation.issued;
        Ok(updated)
    }

    pub fn replace(&self, query: &SeatQuery, seats: SeatStatusMap) -> Arc<SeatStatusMap> {
        let mut generation = self.generations.entry(query.clone()).or_default();
        let snapshot = Arc::new(seats);
        self.snapshots.insert(query.clone(), Arc::clone(&snapshot));
        generation.issued += 1;
        generation.applied = generation.issued;
        snapshot
    }

    /// Drops the snapshot; loads already in flight will not restore it.
    pub fn invalidate(&self, query: &SeatQuery) -> bool {
        let mut generation = self.generations.entry(query.clone()).or_default();
        generation.issued += 1;
        generation.applied = generation.issued;
        self.snapshots.remove(query).is_some()
    }
}
