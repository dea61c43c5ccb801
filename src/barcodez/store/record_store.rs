use super::{StorageBackend, RECORDS_KEY};
use crate::error::Result;
use crate::model::BarcodeRecord;
use log::debug;

/// The ordered record sequence persisted under [`RECORDS_KEY`].
///
/// Append-only: there is no update or delete. Every append rewrites the whole
/// sequence through the backend.
pub struct RecordStore<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> RecordStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Reads the stored sequence. A key that was never written is empty.
    pub fn load(&self) -> Result<Vec<BarcodeRecord>> {
        match self.backend.get(RECORDS_KEY)? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Vec::new()),
        }
    }

    /// Appends one record and returns the sequence as written.
    ///
    /// Takes `&mut self` so the read-modify-write cannot interleave with
    /// another append through the same store.
    pub fn append(&mut self, record: BarcodeRecord) -> Result<Vec<BarcodeRecord>> {
        let mut records = self.load()?;
        records.push(record);
        self.backend
            .set(RECORDS_KEY, &serde_json::to_value(&records)?)?;
        debug!("store: {} records after append", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BarcodezError;
    use crate::model::{BarcodeSize, Symbology};
    use crate::store::mem_backend::MemBackend;
    use serde_json::json;

    fn record(value: &str) -> BarcodeRecord {
        BarcodeRecord::new(
            Symbology::Jan,
            value.to_string(),
            vec![1, 2, 3],
            BarcodeSize::default(),
        )
    }

    #[test]
    fn empty_backend_loads_empty_sequence() {
        let store = RecordStore::new(MemBackend::new());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn append_keeps_insertion_order() {
        let mut store = RecordStore::new(MemBackend::new());
        store.append(record("a")).unwrap();
        store.append(record("b")).unwrap();
        store.append(record("c")).unwrap();

        let values: Vec<_> = store.load().unwrap().into_iter().map(|r| r.value).collect();
        assert_eq!(values, vec!["a", "b", "c"]);
    }

    #[test]
    fn append_writes_the_whole_sequence_once() {
        let mut store = RecordStore::new(MemBackend::new());
        store.append(record("a")).unwrap();
        store.append(record("b")).unwrap();

        assert_eq!(store.backend().write_count(), 2);
        let raw = store.backend().get(RECORDS_KEY).unwrap().unwrap();
        assert_eq!(raw.as_array().unwrap().len(), 2);
    }

    #[test]
    fn failed_write_is_propagated() {
        let mut store = RecordStore::new(MemBackend::new());
        store.backend().set_simulate_write_error(true);

        assert!(matches!(
            store.append(record("a")),
            Err(BarcodezError::Store(_))
        ));
    }

    #[test]
    fn malformed_document_is_an_error() {
        let store = RecordStore::new(MemBackend::new());
        store
            .backend()
            .set(RECORDS_KEY, &json!({"not": "a list"}))
            .unwrap();
        assert!(store.load().is_err());
    }
}
