//! # API Facade
//!
//! The single entry point for every barcodez action, whatever the client.
//! Clients build a [`Request`] and hand it to [`BarcodezApi::dispatch`] (or
//! call the matching method directly) and get a [`CmdResult`] back.
//!
//! The facade:
//! - **Resolves defaults**: symbology and size not given on the request come
//!   from the stored [`BarcodezConfig`], then are validated.
//! - **Dispatches** to the command functions in [`crate::commands`].
//! - **Never prints**. Destination prompts go through the
//!   [`DestinationChooser`] the client supplies.
//!
//! ## Generic Over Delegates
//!
//! `BarcodezApi<B, R, W>` is generic over the storage backend, the renderer
//! and the export writer:
//! - Production: `BarcodezApi<FsBackend, BarcodersRenderer, FsWriter>`
//! - Testing: `BarcodezApi<MemBackend, StubRenderer>`

use crate::commands::{self, config::ConfigAction, CmdResult};
use crate::config::BarcodezConfig;
use crate::error::Result;
use crate::export::{BulkFormat, DestinationChooser, ExportPipeline, FileWriter, FsWriter, SingleFormat};
use crate::model::{BarcodeSize, Symbology};
use crate::render::Renderer;
use crate::service::RecordService;
use crate::store::StorageBackend;
use std::path::PathBuf;

/// Per-invocation overrides for generation. Unset fields fall back to config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    pub symbology: Option<Symbology>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// One user action.
#[derive(Debug, Clone)]
pub enum Request {
    Generate {
        value: String,
        options: GenerateOptions,
    },
    GenerateBulk {
        input: String,
        options: GenerateOptions,
    },
    List {
        query: Option<String>,
    },
    ExportOne {
        selector: String,
        format: SingleFormat,
    },
    ExportMany {
        query: Option<String>,
        format: BulkFormat,
    },
    Config(ConfigAction),
}

pub struct BarcodezApi<B: StorageBackend, R: Renderer, W: FileWriter = FsWriter> {
    service: RecordService<B, R>,
    exporter: ExportPipeline<W>,
    config_dir: PathBuf,
}

impl<B: StorageBackend, R: Renderer, W: FileWriter> BarcodezApi<B, R, W> {
    pub fn new(service: RecordService<B, R>, writer: W, config_dir: PathBuf) -> Self {
        Self {
            service,
            exporter: ExportPipeline::new(writer),
            config_dir,
        }
    }

    pub fn service(&self) -> &RecordService<B, R> {
        &self.service
    }

    pub fn dispatch(
        &mut self,
        request: Request,
        chooser: &mut dyn DestinationChooser,
    ) -> Result<CmdResult> {
        match request {
            Request::Generate { value, options } => self.generate(&value, &options),
            Request::GenerateBulk { input, options } => self.generate_bulk(&input, &options),
            Request::List { query } => self.list(query.as_deref()),
            Request::ExportOne { selector, format } => {
                self.export_one(&selector, format, chooser)
            }
            Request::ExportMany { query, format } => {
                self.export_many(query.as_deref(), format, chooser)
            }
            Request::Config(action) => self.config(action),
        }
    }

    pub fn generate(&mut self, value: &str, options: &GenerateOptions) -> Result<CmdResult> {
        let (symbology, size) = self.resolve(options)?;
        commands::generate::single(&mut self.service, &symbology, value, size)
    }

    pub fn generate_bulk(&mut self, input: &str, options: &GenerateOptions) -> Result<CmdResult> {
        let (symbology, size) = self.resolve(options)?;
        commands::generate::bulk(&mut self.service, &symbology, input, size)
    }

    pub fn list(&mut self, query: Option<&str>) -> Result<CmdResult> {
        commands::list::run(&mut self.service, query)
    }

    pub fn export_one(
        &mut self,
        selector: &str,
        format: SingleFormat,
        chooser: &mut dyn DestinationChooser,
    ) -> Result<CmdResult> {
        commands::export::one(&mut self.service, &self.exporter, selector, format, chooser)
    }

    pub fn export_many(
        &mut self,
        query: Option<&str>,
        format: BulkFormat,
        chooser: &mut dyn DestinationChooser,
    ) -> Result<CmdResult> {
        commands::export::many(&mut self.service, &self.exporter, query, format, chooser)
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.config_dir, action)
    }

    fn resolve(&self, options: &GenerateOptions) -> Result<(Symbology, BarcodeSize)> {
        let mut config = BarcodezConfig::load(&self.config_dir)?;
        if let Some(width) = options.width {
            config.width = width;
        }
        if let Some(height) = options.height {
            config.height = height;
        }
        let size = config.size()?;
        let symbology = options.symbology.clone().unwrap_or(config.symbology);
        Ok((symbology, size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BarcodezError;
    use crate::export::ExportOutcome;
    use crate::store::mem_backend::MemBackend;
    use crate::test_utils::{ScriptedDestination, StubRenderer, TestEnv};

    fn api(env: &TestEnv) -> BarcodezApi<MemBackend, StubRenderer> {
        let service = RecordService::open(MemBackend::new(), StubRenderer).unwrap();
        BarcodezApi::new(service, FsWriter, env.root.clone())
    }

    fn no_prompt() -> ScriptedDestination {
        ScriptedDestination::new(vec![])
    }

    #[test]
    fn generate_uses_config_defaults() {
        let env = TestEnv::new();
        let mut api = api(&env);
        api.config(ConfigAction::Set("symbology".into(), "itf".into()))
            .unwrap();
        api.config(ConfigAction::Set("height".into(), "60".into()))
            .unwrap();

        let result = api
            .dispatch(
                Request::Generate {
                    value: "1111".into(),
                    options: GenerateOptions::default(),
                },
                &mut no_prompt(),
            )
            .unwrap();

        let record = &result.affected_records[0];
        assert_eq!(record.symbology, Symbology::Itf);
        assert_eq!(record.size, BarcodeSize::new(2, 60).unwrap());
    }

    #[test]
    fn request_options_override_config() {
        let env = TestEnv::new();
        let mut api = api(&env);
        let options = GenerateOptions {
            symbology: Some(Symbology::Gs1DataBar),
            width: Some(4),
            height: None,
        };

        let result = api.generate("123", &options).unwrap();

        let record = &result.affected_records[0];
        assert_eq!(record.symbology, Symbology::Gs1DataBar);
        assert_eq!(record.size, BarcodeSize::new(4, 100).unwrap());
    }

    #[test]
    fn out_of_range_size_is_rejected_before_rendering() {
        let env = TestEnv::new();
        let mut api = api(&env);
        let options = GenerateOptions {
            width: Some(20),
            ..Default::default()
        };

        let err = api.generate("123", &options).unwrap_err();
        assert!(matches!(err, BarcodezError::Api(_)));
        assert!(api.service().records().is_empty());
    }

    #[test]
    fn hand_edited_config_size_is_validated() {
        let env = TestEnv::new();
        std::fs::write(
            env.root.join("config.json"),
            r#"{ "symbology": "jan", "width": 50, "height": 100 }"#,
        )
        .unwrap();
        let mut api = api(&env);

        let err = api.generate("123", &GenerateOptions::default()).unwrap_err();
        assert!(matches!(err, BarcodezError::Api(_)));

        let fixed = GenerateOptions {
            width: Some(3),
            ..Default::default()
        };
        let result = api.generate("123", &fixed).unwrap();
        assert_eq!(result.affected_records[0].size, BarcodeSize::new(3, 100).unwrap());
    }

    #[test]
    fn dispatches_bulk_list_and_exports() {
        let env = TestEnv::new();
        let mut api = api(&env);

        api.dispatch(
            Request::GenerateBulk {
                input: "111\n222\n".into(),
                options: GenerateOptions::default(),
            },
            &mut no_prompt(),
        )
        .unwrap();

        let listed = api
            .dispatch(Request::List { query: Some("22".into()) }, &mut no_prompt())
            .unwrap();
        assert_eq!(listed.listed_records.len(), 1);
        assert_eq!(listed.listed_records[0].index, 2);

        let target = env.out("first.pdf");
        let mut chooser = ScriptedDestination::new(vec![Some(target.clone())]);
        let exported = api
            .dispatch(
                Request::ExportOne {
                    selector: "1".into(),
                    format: SingleFormat::Pdf,
                },
                &mut chooser,
            )
            .unwrap();
        assert_eq!(exported.export, Some(ExportOutcome::Written(target)));

        let cancelled = api
            .dispatch(
                Request::ExportMany {
                    query: None,
                    format: BulkFormat::Xlsx,
                },
                &mut no_prompt(),
            )
            .unwrap();
        assert_eq!(cancelled.export, Some(ExportOutcome::Cancelled));
    }
}
