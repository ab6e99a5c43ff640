//! Bounded buffer of live feed records
//!
//! Keeps the most recent records oldest-first and evicts from the front once
//! capacity is reached.

use crate::constants::STREAM_CAPACITY;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use threat_hunter_client::Record;

/// A record plus its arrival metadata
#[derive(Debug, Clone, PartialEq)]
pub struct StreamedRecord {
    /// 1-based arrival number, monotonic for the lifetime of the buffer
    pub seq: u64,
    pub received_at: DateTime<Utc>,
    pub record: Record,
}

/// Most-recent-N record buffer
///
/// # Examples
///
/// ```
/// use threat_hunter_core::stream_buffer::StreamBuffer;
/// use threat_hunter_client::Record;
///
/// let mut buffer = StreamBuffer::with_capacity(2);
/// for _ in 0..3 {
///     buffer.push(Record::default());
/// }
///
/// assert_eq!(buffer.len(), 2);
/// assert_eq!(buffer.oldest().map(|r| r.seq), Some(2));
/// assert_eq!(buffer.evicted(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct StreamBuffer {
    records: VecDeque<StreamedRecord>,
    capacity: usize,
    next_seq: u64,
    evicted: u64,
}

impl Default for StreamBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamBuffer {
    /// Create an empty buffer with the standard capacity
    pub fn new() -> Self {
        Self::with_capacity(STREAM_CAPACITY)
    }

    /// Create an empty buffer holding at most `capacity` records (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
            next_seq: 1,
            evicted: 0,
        }
    }

    /// Append a record stamped with the current time
    pub fn push(&mut self, record: Record) -> u64 {
        self.push_at(record, Utc::now())
    }

    /// Append a record with an explicit arrival time
    ///
    /// Returns the sequence number assigned to the record.
    pub fn push_at(&mut self, record: Record, received_at: DateTime<Utc>) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;

        if self.records.len() == self.capacity {
            self.records.pop_front();
            self.evicted += 1;
        }
        self.records.push_back(StreamedRecord {
            seq,
            received_at,
            record,
        });
        seq
    }

    /// Drop every buffered record (used when the feed reconnects)
    ///
    /// Sequence numbers keep counting so identities never repeat.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records appended since creation, including evicted ones
    pub fn total_received(&self) -> u64 {
        self.next_seq - 1
    }

    /// Records dropped because the buffer was full
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Iterate oldest-first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &StreamedRecord> + ExactSizeIterator {
        self.records.iter()
    }

    pub fn oldest(&self) -> Option<&StreamedRecord> {
        self.records.front()
    }

    pub fn latest(&self) -> Option<&StreamedRecord> {
        self.records.back()
    }
}
