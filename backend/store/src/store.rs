use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use scanflow_core::{BlobStore, DocumentRecord, DocumentStatus, RecordIndex, StoreError};

/// Ordered collection of ready documents, newest first, mirrored to a blob
/// on every mutation.
///
/// Mutations take `&mut self`, so one mutation (including its write) always
/// completes before the next begins. If the write fails the in-memory change
/// is rolled back, so callers never observe memory and blob diverging.
pub struct DocumentStore {
    records: Vec<DocumentRecord>,
    blob: Arc<dyn BlobStore>,
}

impl DocumentStore {
    /// Seed the store from the blob. An absent or malformed blob yields an
    /// empty store; this never fails.
    pub fn open(blob: Arc<dyn BlobStore>) -> Self {
        let records = match blob.load() {
            Ok(Some(raw)) => decode_records(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read document blob; starting empty");
                Vec::new()
            }
        };
        info!(count = records.len(), "Document store opened");
        Self { records, blob }
    }

    /// Insert a ready record at the front.
    pub fn insert(&mut self, record: DocumentRecord) -> Result<(), StoreError> {
        if record.status != DocumentStatus::Ready {
            return Err(StoreError::NotReady {
                id: record.id,
                status: record.status,
            });
        }
        if self.contains(&record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }

        let id = record.id;
        self.records.insert(0, record);
        if let Err(e) = self.persist() {
            self.records.remove(0);
            return Err(e);
        }
        debug!(document_id = %id, "Inserted document");
        Ok(())
    }

    /// Replace the signature of `id`, leaving every other field untouched.
    pub fn update_signature(&mut self, id: &Uuid, signature: String) -> Result<(), StoreError> {
        let index = self.position(id).ok_or(StoreError::NotFound(*id))?;

        let previous = self.records[index].signature.replace(signature);
        if let Err(e) = self.persist() {
            self.records[index].signature = previous;
            return Err(e);
        }
        debug!(document_id = %id, "Updated signature");
        Ok(())
    }

    /// Remove `id`. Returns whether anything was removed; an absent id is a
    /// no-op and writes nothing.
    pub fn delete(&mut self, id: &Uuid) -> Result<bool, StoreError> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let removed = self.records.remove(index);
        if let Err(e) = self.persist() {
            self.records.insert(index, removed);
            return Err(e);
        }
        debug!(document_id = %id, "Deleted document");
        Ok(true)
    }

    /// All records, most recent insertion first.
    pub fn list(&self) -> &[DocumentRecord] {
        &self.records
    }

    pub fn get(&self, id: &Uuid) -> Option<&DocumentRecord> {
        self.records.iter().find(|r| r.id == *id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize the full collection and overwrite the blob.
    pub fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.records)
            .map_err(|e| StoreError::Persist(e.to_string()))?;
        self.blob
            .save(&json)
            .map_err(|e| StoreError::Persist(format!("{e:#}")))
    }

    fn position(&self, id: &Uuid) -> Option<usize> {
        self.records.iter().position(|r| r.id == *id)
    }
}

impl RecordIndex for DocumentStore {
    fn contains(&self, id: &Uuid) -> bool {
        self.position(id).is_some()
    }
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("records", &self.records.len())
            .finish()
    }
}

/// Decode the blob, keeping only ready records with unique ids.
///
/// Entries are decoded one at a time so a single unreadable entry is dropped
/// on its own. Only a blob that is not a JSON array yields nothing.
fn decode_records(raw: &str) -> Vec<DocumentRecord> {
    let entries: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "Document blob is malformed; starting empty");
            return Vec::new();
        }
    };

    let mut records: Vec<DocumentRecord> = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let record: DocumentRecord = match serde_json::from_value(entry) {
            Ok(record) => record,
            Err(e) => {
                warn!(index, error = %e, "Dropping unreadable document from blob");
                continue;
            }
        };
        if record.status != DocumentStatus::Ready {
            warn!(document_id = %record.id, status = %record.status, "Dropping non-ready document from blob");
            continue;
        }
        if records.iter().any(|r| r.id == record.id) {
            warn!(document_id = %record.id, "Dropping duplicate document from blob");
            continue;
        }
        records.push(record);
    }
    records
}
