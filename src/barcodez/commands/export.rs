use crate::commands::{CmdMessage, CmdResult};
use crate::error::{BarcodezError, Result};
use crate::export::{
    BulkFormat, DestinationChooser, ExportOutcome, ExportPipeline, FileWriter, SingleFormat,
};
use crate::index::select;
use crate::render::Renderer;
use crate::service::RecordService;
use crate::store::StorageBackend;

/// Exports the record at one display index.
pub fn one<B: StorageBackend, R: Renderer, W: FileWriter>(
    service: &mut RecordService<B, R>,
    pipeline: &ExportPipeline<W>,
    selector: &str,
    format: SingleFormat,
    chooser: &mut dyn DestinationChooser,
) -> Result<CmdResult> {
    let records = service.list_records()?;
    let mut selected = select(records, &[selector])?;
    if selected.len() != 1 {
        return Err(BarcodezError::Api(format!(
            "'{}' selects {} barcodes; export takes exactly one",
            selector,
            selected.len()
        )));
    }
    let target = selected.remove(0);

    let outcome = pipeline.export_single(&target.record, format, chooser)?;
    Ok(report(outcome, format!("barcode #{}", target.index)))
}

/// Exports every record matching `query` (all of them when `None`).
pub fn many<B: StorageBackend, R: Renderer, W: FileWriter>(
    service: &mut RecordService<B, R>,
    pipeline: &ExportPipeline<W>,
    query: Option<&str>,
    format: BulkFormat,
    chooser: &mut dyn DestinationChooser,
) -> Result<CmdResult> {
    service.list_records()?;
    let records = service.search(query.map(str::trim).unwrap_or(""));

    if records.is_empty() {
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::warning("No barcodes to export"));
        return Ok(result);
    }

    let outcome = pipeline.export_bulk(&records, format, chooser)?;
    let what = format!("{} barcodes", records.len());
    Ok(report(outcome, what).with_affected_records(records))
}

fn report(outcome: ExportOutcome, what: String) -> CmdResult {
    let mut result = CmdResult::default();
    match &outcome {
        ExportOutcome::Written(path) => result.add_message(CmdMessage::success(format!(
            "Exported {} to {}",
            what,
            path.display()
        ))),
        ExportOutcome::Cancelled => result.add_message(CmdMessage::info("Export cancelled")),
    }
    result.with_export(outcome)
}
