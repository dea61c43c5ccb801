use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::index_records;
use crate::render::Renderer;
use crate::service::RecordService;
use crate::store::StorageBackend;

/// Lists stored records, optionally narrowed by a search query.
///
/// Records keep the display index of their stored position when filtered.
pub fn run<B: StorageBackend, R: Renderer>(
    service: &mut RecordService<B, R>,
    query: Option<&str>,
) -> Result<CmdResult> {
    let records = service.list_records()?;
    let query = query.map(str::trim).unwrap_or("");

    let listed: Vec<_> = index_records(records)
        .into_iter()
        .filter(|dr| dr.record.matches(query))
        .collect();

    let mut result = CmdResult::default();
    if listed.is_empty() {
        if query.is_empty() {
            result.add_message(CmdMessage::info("No barcodes yet"));
        } else {
            result.add_message(CmdMessage::info(format!("No barcodes match '{}'", query)));
        }
    }
    Ok(result.with_listed_records(listed))
}
