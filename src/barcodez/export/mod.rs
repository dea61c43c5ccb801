//! # Export Pipeline
//!
//! Turns records into files. Each invocation walks the same phases:
//!
//! ```text
//! Idle → Composing → AwaitingDestination → Written | Cancelled | Failed
//! ```
//!
//! The artifact is composed first. The destination is asked for second, with
//! a default name of `barcode.<ext>` and a filter for the format. A cancelled
//! choice is an ordinary outcome ([`ExportOutcome::Cancelled`]) and writes
//! nothing. A write error is fatal and returned as
//! [`BarcodezError::ExportWriteFailure`].
//!
//! Formats:
//!
//! - single record: `png` (the stored image bytes, verbatim) or `pdf`
//! - many records: `pdf` (one page each) or `xlsx` (one `Barcodes` sheet)
//!
//! Where the bytes go is decided by two delegates: a [`DestinationChooser`]
//! (preset path, terminal prompt, scripted answers in tests) and a
//! [`FileWriter`].

use crate::error::{BarcodezError, Result};
use crate::model::BarcodeRecord;
use log::{debug, info};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub mod destination;
pub mod pdf;
pub mod xlsx;

pub use destination::{
    DestinationChooser, ExtensionFilter, FileWriter, FixedDestination, FsWriter,
    PromptDestination,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleFormat {
    Png,
    Pdf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkFormat {
    Pdf,
    Xlsx,
}

impl SingleFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SingleFormat::Png => "png",
            SingleFormat::Pdf => "pdf",
        }
    }
}

impl BulkFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            BulkFormat::Pdf => "pdf",
            BulkFormat::Xlsx => "xlsx",
        }
    }
}

impl FromStr for SingleFormat {
    type Err = BarcodezError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "png" => Ok(SingleFormat::Png),
            "pdf" => Ok(SingleFormat::Pdf),
            other => Err(BarcodezError::Api(format!(
                "Unsupported export format '{}' (expected png or pdf)",
                other
            ))),
        }
    }
}

impl FromStr for BulkFormat {
    type Err = BarcodezError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(BulkFormat::Pdf),
            "xlsx" => Ok(BulkFormat::Xlsx),
            other => Err(BarcodezError::Api(format!(
                "Unsupported export format '{}' (expected pdf or xlsx)",
                other
            ))),
        }
    }
}

impl fmt::Display for SingleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl fmt::Display for BulkFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written(PathBuf),
    Cancelled,
}

pub struct ExportPipeline<W: FileWriter> {
    writer: W,
}

impl<W: FileWriter> ExportPipeline<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn export_single(
        &self,
        record: &BarcodeRecord,
        format: SingleFormat,
        chooser: &mut dyn DestinationChooser,
    ) -> Result<ExportOutcome> {
        debug!("export: composing {} for {}", format, record.value);
        let bytes = match format {
            SingleFormat::Png => record.image.clone(),
            SingleFormat::Pdf => pdf::single_page(record)?,
        };
        self.deliver(bytes, format.extension(), chooser)
    }

    /// Exports `records` as given; callers pass the filtered view they show.
    pub fn export_bulk(
        &self,
        records: &[BarcodeRecord],
        format: BulkFormat,
        chooser: &mut dyn DestinationChooser,
    ) -> Result<ExportOutcome> {
        debug!("export: composing {} for {} records", format, records.len());
        let bytes = match format {
            BulkFormat::Pdf => pdf::pages(records)?,
            BulkFormat::Xlsx => xlsx::workbook(records)?,
        };
        self.deliver(bytes, format.extension(), chooser)
    }

    fn deliver(
        &self,
        bytes: Vec<u8>,
        extension: &str,
        chooser: &mut dyn DestinationChooser,
    ) -> Result<ExportOutcome> {
        let default_name = format!("barcode.{}", extension);
        let filter = ExtensionFilter::for_extension(extension);

        debug!("export: awaiting destination");
        let Some(path) = chooser.choose(&default_name, &filter)? else {
            debug!("export: cancelled");
            return Ok(ExportOutcome::Cancelled);
        };

        self.writer.write(&path, &bytes)?;
        info!("exported {} to {}", extension, path.display());
        Ok(ExportOutcome::Written(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BarcodeSize, Symbology};
    use crate::render::raster::rasterize;
    use crate::test_utils::{FailingWriter, ScriptedDestination, TestEnv};
    use std::fs;

    fn record(value: &str) -> BarcodeRecord {
        BarcodeRecord::new(
            Symbology::Jan,
            value.to_string(),
            rasterize(&[1, 0, 1, 1], Some(value), 2, 60).unwrap(),
            BarcodeSize::default(),
        )
    }

    #[test]
    fn png_export_is_the_stored_image() {
        let env = TestEnv::new();
        let target = env.out("one.png");
        let record = record("4901234567894");
        let mut chooser = ScriptedDestination::new(vec![Some(target.clone())]);

        let outcome = ExportPipeline::new(FsWriter)
            .export_single(&record, SingleFormat::Png, &mut chooser)
            .unwrap();

        assert_eq!(outcome, ExportOutcome::Written(target.clone()));
        assert_eq!(fs::read(&target).unwrap(), record.image);
    }

    #[test]
    fn offers_default_name_and_filter() {
        let mut chooser = ScriptedDestination::new(vec![None, None]);
        let pipeline = ExportPipeline::new(FsWriter);

        pipeline
            .export_single(&record("1"), SingleFormat::Pdf, &mut chooser)
            .unwrap();
        pipeline
            .export_bulk(&[record("1")], BulkFormat::Xlsx, &mut chooser)
            .unwrap();

        assert_eq!(
            chooser.asked(),
            &[
                ("barcode.pdf".to_string(), ExtensionFilter::for_extension("pdf")),
                ("barcode.xlsx".to_string(), ExtensionFilter::for_extension("xlsx")),
            ]
        );
    }

    #[test]
    fn cancel_writes_nothing_and_can_be_repeated() {
        let env = TestEnv::new();
        let target = env.out("later.pdf");
        let mut chooser = ScriptedDestination::new(vec![None, Some(target.clone())]);
        let pipeline = ExportPipeline::new(FsWriter);
        let records = vec![record("1"), record("2")];

        let first = pipeline
            .export_bulk(&records, BulkFormat::Pdf, &mut chooser)
            .unwrap();
        assert_eq!(first, ExportOutcome::Cancelled);
        assert_eq!(fs::read_dir(&env.root).unwrap().count(), 0);

        let second = pipeline
            .export_bulk(&records, BulkFormat::Pdf, &mut chooser)
            .unwrap();
        assert_eq!(second, ExportOutcome::Written(target.clone()));
        let doc = lopdf::Document::load(&target).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn write_failure_is_propagated() {
        let mut chooser = ScriptedDestination::new(vec![Some(PathBuf::from("out.png"))]);
        let err = ExportPipeline::new(FailingWriter)
            .export_single(&record("1"), SingleFormat::Png, &mut chooser)
            .unwrap_err();
        assert!(matches!(err, BarcodezError::ExportWriteFailure { .. }));
    }

    #[test]
    fn xlsx_export_writes_workbook() {
        let env = TestEnv::new();
        let target = env.out("all.xlsx");
        let mut chooser = ScriptedDestination::new(vec![Some(target.clone())]);

        ExportPipeline::new(FsWriter)
            .export_bulk(&[record("1"), record("2")], BulkFormat::Xlsx, &mut chooser)
            .unwrap();

        assert!(fs::read(&target).unwrap().starts_with(b"PK"));
    }

    #[test]
    fn parses_format_names() {
        assert_eq!("PNG".parse::<SingleFormat>().unwrap(), SingleFormat::Png);
        assert!("xlsx".parse::<SingleFormat>().is_err());
        assert_eq!("xlsx".parse::<BulkFormat>().unwrap(), BulkFormat::Xlsx);
        assert!("png".parse::<BulkFormat>().is_err());
    }
}
