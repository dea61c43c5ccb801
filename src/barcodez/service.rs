//! # Record Service
//!
//! [`RecordService`] is the only owner of the [`RecordStore`]. Every read and
//! write of barcode records goes through it, and it keeps an in-memory cache
//! that is refreshed from the store after each write.
//!
//! Creation is a fixed sequence: map the symbology to a renderer format token,
//! render with the value printed under the bars, then append the record. A
//! render failure persists nothing.

use crate::error::{BarcodezError, RenderFailure, Result};
use crate::model::{BarcodeRecord, BarcodeSize, Symbology};
use crate::render::{RenderOptions, Renderer};
use crate::store::{RecordStore, StorageBackend};
use log::{debug, info, warn};
use thiserror::Error;

/// Why a creation attempt produced no record.
///
/// Render failures are expected user input problems; everything else is an
/// infrastructure error that aborts the action.
#[derive(Error, Debug)]
pub enum CreateError {
    #[error(transparent)]
    Render(RenderFailure),

    #[error(transparent)]
    Fatal(#[from] BarcodezError),
}

impl From<CreateError> for BarcodezError {
    fn from(err: CreateError) -> Self {
        match err {
            CreateError::Render(failure) => BarcodezError::Render(failure),
            CreateError::Fatal(err) => err,
        }
    }
}

/// Records created by a bulk run, with the lines that failed to render.
#[derive(Debug, Default)]
pub struct BulkOutcome {
    pub created: Vec<BarcodeRecord>,
    pub failures: Vec<RenderFailure>,
}

pub struct RecordService<B: StorageBackend, R: Renderer> {
    store: RecordStore<B>,
    renderer: R,
    cache: Vec<BarcodeRecord>,
}

impl<B: StorageBackend, R: Renderer> RecordService<B, R> {
    /// Opens the service and loads the current sequence into the cache.
    pub fn open(backend: B, renderer: R) -> Result<Self> {
        let store = RecordStore::new(backend);
        let cache = store.load()?;
        debug!("service: loaded {} records", cache.len());
        Ok(Self {
            store,
            renderer,
            cache,
        })
    }

    pub fn store(&self) -> &RecordStore<B> {
        &self.store
    }

    /// The cached sequence, as of the last refresh.
    pub fn records(&self) -> &[BarcodeRecord] {
        &self.cache
    }

    /// Reloads the full sequence from the store, in insertion order.
    pub fn list_records(&mut self) -> Result<&[BarcodeRecord]> {
        self.cache = self.store.load()?;
        Ok(&self.cache)
    }

    pub fn create_record(
        &mut self,
        symbology: &Symbology,
        value: &str,
        size: BarcodeSize,
    ) -> std::result::Result<BarcodeRecord, CreateError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(CreateError::Render(RenderFailure::new(
                value,
                "value cannot be empty",
            )));
        }
        if !symbology.is_recognized() {
            warn!("unknown symbology '{}', rendering as EAN-13", symbology);
        }
        let format = symbology.format_token();
        let options = RenderOptions {
            format,
            width: size.module_width,
            height: size.bar_height,
            display_value: true,
        };

        let image = self
            .renderer
            .render(value, &options)
            .map_err(|e| CreateError::Render(RenderFailure::new(value, e.to_string())))?;

        let record = BarcodeRecord::new(symbology.clone(), value.to_string(), image, size);
        self.cache = self.store.append(record.clone())?;
        info!("created {} barcode {}", symbology, value);
        Ok(record)
    }

    /// Attempts every non-blank line of `input`. Failures are collected and
    /// never stop the batch; store errors do.
    pub fn create_bulk(
        &mut self,
        input: &str,
        symbology: &Symbology,
        size: BarcodeSize,
    ) -> Result<BulkOutcome> {
        let mut outcome = BulkOutcome::default();

        for value in input.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match self.create_record(symbology, value, size) {
                Ok(record) => outcome.created.push(record),
                Err(CreateError::Render(failure)) => {
                    warn!("{}", failure);
                    outcome.failures.push(failure);
                }
                Err(CreateError::Fatal(err)) => return Err(err),
            }
        }

        debug!(
            "bulk: {} created, {} failed",
            outcome.created.len(),
            outcome.failures.len()
        );
        Ok(outcome)
    }

    /// Cached records whose value or symbology label contains `query`,
    /// ignoring case. An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<BarcodeRecord> {
        self.cache
            .iter()
            .filter(|r| r.matches(query))
            .cloned()
            .collect()
    }
}
