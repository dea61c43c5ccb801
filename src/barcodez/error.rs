use std::path::PathBuf;
use thiserror::Error;

/// A value the renderer refused for the requested symbology.
///
/// Kept separate from [`BarcodezError`] because bulk generation collects these
/// per line instead of failing the whole batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to generate barcode: {value} ({reason})")]
pub struct RenderFailure {
    pub value: String,
    pub reason: String,
}

impl RenderFailure {
    pub fn new(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum BarcodezError {
    #[error(transparent)]
    Render(#[from] RenderFailure),

    #[error("Failed to write export to {}: {source}", path.display())]
    ExportWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store unavailable: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, BarcodezError>;
