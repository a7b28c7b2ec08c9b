//! Bounded, process-wide diagnostic log.
//!
//! Created once at startup and cloned into every worker's state. Clones share
//! the same buffer. Appends are serialised by the lock, the relative order of
//! concurrent requests is not guaranteed.

use std::{collections::VecDeque, sync::Arc};
use tokio::sync::RwLock;

use crate::models::event_record::EventRecord;

#[derive(Clone)]
pub struct EventLog {
    records: Arc<RwLock<VecDeque<EventRecord>>>,
    capacity: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends a record, evicting the oldest ones beyond capacity
    pub async fn push(&self, record: EventRecord) {
        let mut records = self.records.write().await;
        records.push_back(record);

        while records.len() > self.capacity {
            records.pop_front();
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// The `limit` most recent records, oldest first
    pub async fn recent(&self, limit: usize) -> Vec<EventRecord> {
        let records = self.records.read().await;
        let skip = records.len().saturating_sub(limit);

        records.iter().skip(skip).cloned().collect()
    }

    /// Every retained record, oldest first
    pub async fn snapshot(&self) -> Vec<EventRecord> {
        self.records.read().await.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event_record::RecordKind;
    use serde_json::json;

    fn record(n: usize) -> EventRecord {
        EventRecord::event_received("POST", json!({ "n": n }), "127.0.0.1")
    }

    #[ntex::test]
    async fn test_push_keeps_insertion_order() {
        let log = EventLog::new(10);
        assert!(log.is_empty().await);

        log.push(record(1)).await;
        log.push(record(2)).await;

        let snapshot = log.snapshot().await;
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].payload["n"], 1);
        assert_eq!(snapshot[1].payload["n"], 2);
        assert!(snapshot.iter().all(|r| r.kind == RecordKind::EventReceived));
    }

    #[ntex::test]
    async fn test_oldest_records_are_evicted_beyond_capacity() {
        let log = EventLog::new(100);

        for n in 0..150 {
            log.push(record(n)).await;
        }

        let snapshot = log.snapshot().await;
        assert_eq!(log.len().await, 100);
        assert_eq!(snapshot.first().unwrap().payload["n"], 50);
        assert_eq!(snapshot.last().unwrap().payload["n"], 149);
    }

    #[ntex::test]
    async fn test_recent_returns_tail_oldest_first() {
        let log = EventLog::new(100);
        for n in 0..8 {
            log.push(record(n)).await;
        }

        let recent = log.recent(5).await;
        let ns = recent
            .iter()
            .map(|r| r.payload["n"].as_u64().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(ns, vec![3, 4, 5, 6, 7]);

        assert_eq!(log.recent(50).await.len(), 8);
        assert!(log.recent(0).await.is_empty());
    }

    #[ntex::test]
    async fn test_clones_share_the_same_buffer() {
        let log = EventLog::new(3);
        let worker_copy = log.clone();

        worker_copy.push(record(1)).await;

        assert_eq!(log.len().await, 1);
        assert_eq!(log.capacity(), 3);
    }

    #[ntex::test]
    async fn test_zero_capacity_retains_nothing() {
        let log = EventLog::new(0);

        log.push(record(1)).await;

        assert!(log.is_empty().await);
    }
}
