//! Newest-first, in-memory view of every persisted record.
//!
//! The contents live in an `Arc<[GenerationRecord]>` behind a `RwLock` and
//! are only ever replaced as a whole, so a reader holds either the old list
//! or the new one, never a mix.

use std::cmp::Reverse;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::records::document::PersistenceError;
use crate::records::record::GenerationRecord;
use crate::records::store::RecordStore;

struct Snapshot {
    /// Ticket of the refresh that produced `entries`; 0 = never refreshed.
    ticket: u64,
    entries: Arc<[GenerationRecord]>,
}

pub struct HistoryCache {
    records: RecordStore,
    next_ticket: AtomicU64,
    snapshot: RwLock<Snapshot>,
}

impl HistoryCache {
    pub fn new(records: RecordStore) -> Self {
        Self {
            records,
            next_ticket: AtomicU64::new(1),
            snapshot: RwLock::new(Snapshot {
                ticket: 0,
                entries: Arc::from(Vec::new()),
            }),
        }
    }

    /// Re-read every record, sort by `createdAt` descending and swap the
    /// result in.
    ///
    /// On failure the current contents are left as they were. If two
    /// refreshes overlap, the one started last wins even when it finishes
    /// first.
    pub async fn refresh(&self) -> Result<Arc<[GenerationRecord]>, PersistenceError> {
        let ticket = self.next_ticket.fetch_add(1, AtomicOrdering::Relaxed);

        let mut records = self.records.list_all().await?;
        sort_newest_first(&mut records);
        let entries: Arc<[GenerationRecord]> = Arc::from(records);

        let mut snapshot = self.snapshot.write();
        if ticket > snapshot.ticket {
            snapshot.ticket = ticket;
            snapshot.entries = Arc::clone(&entries);
            log::debug!("records: history now holds {} entries", entries.len());
        } else {
            log::debug!("records: discarding stale history refresh #{ticket}");
        }
        Ok(Arc::clone(&snapshot.entries))
    }

    /// Current contents, newest first.
    pub fn entries(&self) -> Arc<[GenerationRecord]> {
        Arc::clone(&self.snapshot.read().entries)
    }

    pub fn find(&self, id: &str) -> Option<GenerationRecord> {
        self.snapshot
            .read()
            .entries
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.snapshot.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Descending by `createdAt`. Values that do not parse as RFC 3339 sort
/// after every parseable one (`None` orders below `Some`). The sort is
/// stable, so ties keep delivery order.
fn sort_newest_first(records: &mut [GenerationRecord]) {
    records.sort_by_cached_key(|r| Reverse(parse_created_at(&r.created_at)));
}

fn parse_created_at(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
