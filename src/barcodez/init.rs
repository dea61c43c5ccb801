use crate::api::BarcodezApi;
use crate::error::{BarcodezError, Result};
use crate::export::FsWriter;
use crate::render::BarcodersRenderer;
use crate::service::RecordService;
use crate::store::fs_backend::FsBackend;
use directories::ProjectDirs;
use log::debug;
use std::ffi::OsString;
use std::path::PathBuf;

/// Overrides the data directory (records and config).
pub const DATA_DIR_ENV: &str = "BARCODEZ_DATA";

pub struct BarcodezContext {
    pub api: BarcodezApi<FsBackend, BarcodersRenderer, FsWriter>,
}

/// `$BARCODEZ_DATA` when set and non-empty, else the platform data directory.
pub fn resolve_data_dir(env_value: Option<OsString>) -> Result<PathBuf> {
    if let Some(dir) = env_value.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "barcodez", "barcodez")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            BarcodezError::Store(format!(
                "Could not determine a data directory; set {}",
                DATA_DIR_ENV
            ))
        })
}

pub fn initialize() -> Result<BarcodezContext> {
    let data_dir = resolve_data_dir(std::env::var_os(DATA_DIR_ENV))?;
    debug!("data dir: {}", data_dir.display());

    let service = RecordService::open(FsBackend::new(data_dir.clone()), BarcodersRenderer::new())?;
    let api = BarcodezApi::new(service, FsWriter, data_dir);

    Ok(BarcodezContext { api })
}
