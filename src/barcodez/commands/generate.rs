use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{BarcodeSize, Symbology};
use crate::render::Renderer;
use crate::service::{CreateError, RecordService};
use crate::store::StorageBackend;

pub fn single<B: StorageBackend, R: Renderer>(
    service: &mut RecordService<B, R>,
    symbology: &Symbology,
    value: &str,
    size: BarcodeSize,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let value = value.trim();
    if value.is_empty() {
        result.add_message(CmdMessage::error("Barcode value cannot be empty"));
        return Ok(result);
    }

    match service.create_record(symbology, value, size) {
        Ok(record) => {
            let index = service.records().len();
            result.add_message(CmdMessage::success(format!(
                "Created {} barcode {} (#{})",
                record.symbology, record.value, index
            )));
            Ok(result.with_affected_records(vec![record]))
        }
        Err(CreateError::Render(failure)) => {
            result.add_message(CmdMessage::error(failure.to_string()));
            Ok(result)
        }
        Err(CreateError::Fatal(err)) => Err(err),
    }
}

/// One attempt per non-blank line of `input`.
pub fn bulk<B: StorageBackend, R: Renderer>(
    service: &mut RecordService<B, R>,
    symbology: &Symbology,
    input: &str,
    size: BarcodeSize,
) -> Result<CmdResult> {
    let outcome = service.create_bulk(input, symbology, size)?;
    let mut result = CmdResult::default();

    for failure in &outcome.failures {
        result.add_message(CmdMessage::warning(failure.to_string()));
    }

    let created = outcome.created.len();
    let attempted = created + outcome.failures.len();
    if attempted == 0 {
        result.add_message(CmdMessage::info("No values given"));
    } else if created == 0 {
        result.add_message(CmdMessage::error(format!(
            "None of the {} values could be generated",
            attempted
        )));
    } else {
        result.add_message(CmdMessage::success(format!(
            "Created {} of {} {} barcodes",
            created, attempted, symbology
        )));
    }

    Ok(result.with_affected_records(outcome.created))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::store::mem_backend::MemBackend;
    use crate::test_utils::StubRenderer;

    fn service() -> RecordService<MemBackend, StubRenderer> {
        RecordService::open(MemBackend::new(), StubRenderer).unwrap()
    }

    #[test]
    fn single_reports_created_record() {
        let mut svc = service();
        let result = single(&mut svc, &Symbology::Jan, " 4901234567894 ", BarcodeSize::default())
            .unwrap();

        assert_eq!(result.affected_records.len(), 1);
        assert_eq!(result.affected_records[0].value, "4901234567894");
        assert_eq!(result.messages[0].level, MessageLevel::Success);
        assert!(result.messages[0].content.contains("(#1)"));
    }

    #[test]
    fn single_render_failure_becomes_error_message() {
        let mut svc = service();
        let result = single(&mut svc, &Symbology::Jan, "abc", BarcodeSize::default()).unwrap();

        assert!(result.affected_records.is_empty());
        assert!(result.has_errors());
        assert!(result.messages[0].content.contains("abc"));
    }

    #[test]
    fn single_rejects_blank_value() {
        let mut svc = service();
        let result = single(&mut svc, &Symbology::Jan, "   ", BarcodeSize::default()).unwrap();
        assert!(result.has_errors());
        assert!(svc.records().is_empty());
    }

    #[test]
    fn bulk_warns_per_failure_and_summarises() {
        let mut svc = service();
        let result = bulk(&mut svc, &Symbology::Itf, "1111\nbadvalue\n", BarcodeSize::default())
            .unwrap();

        assert_eq!(result.affected_records.len(), 1);
        let levels: Vec<_> = result.messages.iter().map(|m| m.level).collect();
        assert_eq!(levels, vec![MessageLevel::Warning, MessageLevel::Success]);
        assert!(result.messages[0].content.contains("badvalue"));
        assert!(result.messages[1].content.contains("1 of 2"));
    }

    #[test]
    fn bulk_with_only_failures_is_an_error() {
        let mut svc = service();
        let result = bulk(&mut svc, &Symbology::Jan, "x\ny", BarcodeSize::default()).unwrap();
        assert!(result.has_errors());
    }
}
