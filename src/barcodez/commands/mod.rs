//! # Commands
//!
//! Business logic for each user action. A command takes the service (and the
//! export pipeline where needed), does its work and returns a [`CmdResult`]:
//! the records it touched or listed, plus leveled messages for the client to
//! show. Commands never print.
//!
//! Expected user-facing problems (a value that does not render, an empty
//! selection, a cancelled export) are reported as messages. Only
//! infrastructure failures come back as `Err`.

use crate::config::BarcodezConfig;
use crate::export::ExportOutcome;
use crate::index::DisplayRecord;
use crate::model::BarcodeRecord;

pub mod config;
pub mod export;
pub mod generate;
pub mod list;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_records: Vec<BarcodeRecord>,
    pub listed_records: Vec<DisplayRecord>,
    pub export: Option<ExportOutcome>,
    pub config: Option<BarcodezConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_records(mut self, records: Vec<BarcodeRecord>) -> Self {
        self.affected_records = records;
        self
    }

    pub fn with_listed_records(mut self, records: Vec<DisplayRecord>) -> Self {
        self.listed_records = records;
        self
    }

    pub fn with_export(mut self, outcome: ExportOutcome) -> Self {
        self.export = Some(outcome);
        self
    }

    pub fn with_config(mut self, config: BarcodezConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }
}
