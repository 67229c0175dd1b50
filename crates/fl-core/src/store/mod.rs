//! Record repositories.
//!
//! The engine never owns storage: callers hand it a repository, the engine
//! takes a full snapshot with [`FingerprintRepository::load_all`], and
//! recomputes from scratch.

pub mod jsonl;

pub use jsonl::{JsonlLogStore, LoadReport};

use fl_common::{FingerprintRecord, Result};

/// Append-only source of fingerprint records, oldest first.
pub trait FingerprintRepository {
    fn append(&mut self, record: &FingerprintRecord) -> Result<()>;

    /// Every stored record in arrival order.
    fn load_all(&self) -> Result<Vec<FingerprintRecord>>;
}

/// Vec-backed repository for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    records: Vec<FingerprintRecord>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<FingerprintRecord>> for MemoryRepository {
    fn from(records: Vec<FingerprintRecord>) -> Self {
        Self { records }
    }
}

impl FingerprintRepository for MemoryRepository {
    fn append(&mut self, record: &FingerprintRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<FingerprintRecord>> {
        Ok(self.records.clone())
    }
}
