//! Caller-owned session bookkeeping.
//!
//! A tracker records a [`SessionMetadata`] marker after each successful
//! recognition. Nothing reads the marker back during recognition; it exists
//! so surfaces can report and reset it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use uuid::Uuid;

use crate::types::SessionMetadata;

/// Issues fresh session markers. Swap in a fixed implementation for tests.
pub trait MetadataSource: Send + Sync {
    fn issue(&self) -> SessionMetadata;
}

/// Wall clock + random v4 ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemMetadataSource;

impl MetadataSource for SystemMetadataSource {
    fn issue(&self) -> SessionMetadata {
        SessionMetadata {
            created_at: Utc::now(),
            session_id: Uuid::new_v4().to_string(),
        }
    }
}

struct Recorded {
    sequence: u64,
    metadata: SessionMetadata,
}

pub struct SessionTracker {
    slot: Mutex<Option<Recorded>>,
    sequence: AtomicU64,
    source: Box<dyn MetadataSource>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::with_source(SystemMetadataSource)
    }

    pub fn with_source(source: impl MetadataSource + 'static) -> Self {
        Self {
            slot: Mutex::new(None),
            sequence: AtomicU64::new(0),
            source: Box::new(source),
        }
    }

    /// Reserve the sequence number for a new request. Starts at 1.
    pub fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Record a completion. A completion older than the one already stored is
    /// dropped and `None` is returned.
    pub fn record(&self, sequence: u64) -> Option<SessionMetadata> {
        let mut slot = self.lock();
        if let Some(existing) = slot.as_ref() {
            if existing.sequence > sequence {
                return None;
            }
        }
        let metadata = self.source.issue();
        *slot = Some(Recorded {
            sequence,
            metadata: metadata.clone(),
        });
        Some(metadata)
    }

    pub fn current(&self) -> Option<SessionMetadata> {
        self.lock().as_ref().map(|r| r.metadata.clone())
    }

    /// Clear the marker; returns whether one was present.
    pub fn reset(&self) -> bool {
        self.lock().take().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Recorded>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new()
    }
}
