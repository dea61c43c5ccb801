use crate::error::{BarcodezError, Result};
use log::debug;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// The file type offered when choosing a destination, e.g. `PDF` / `pdf`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    pub name: String,
    pub extension: String,
}

impl ExtensionFilter {
    pub fn for_extension(extension: &str) -> Self {
        Self {
            name: extension.to_uppercase(),
            extension: extension.to_string(),
        }
    }

    /// Appends the filter's extension when `path` has none.
    pub fn complete(&self, path: PathBuf) -> PathBuf {
        if path.extension().is_some() {
            path
        } else {
            path.with_extension(&self.extension)
        }
    }
}

/// Picks where an export goes. `Ok(None)` means the user cancelled.
pub trait DestinationChooser {
    fn choose(&mut self, default_name: &str, filter: &ExtensionFilter) -> Result<Option<PathBuf>>;
}

/// Always answers with the same preset path.
#[derive(Debug, Clone)]
pub struct FixedDestination {
    path: PathBuf,
}

impl FixedDestination {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DestinationChooser for FixedDestination {
    fn choose(&mut self, _default_name: &str, _filter: &ExtensionFilter) -> Result<Option<PathBuf>> {
        Ok(Some(self.path.clone()))
    }
}

/// Asks for a path on a line-based terminal.
///
/// An empty answer takes the default name, `q` or end of input cancels.
pub struct PromptDestination<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptDestination<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> DestinationChooser for PromptDestination<R, W> {
    fn choose(&mut self, default_name: &str, filter: &ExtensionFilter) -> Result<Option<PathBuf>> {
        write!(
            self.output,
            "Save {} file as [{}] (q to cancel): ",
            filter.name, default_name
        )?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Ok(None);
        }

        let answer = answer.trim();
        if answer.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        let path = if answer.is_empty() {
            PathBuf::from(default_name)
        } else {
            PathBuf::from(answer)
        };
        Ok(Some(filter.complete(path)))
    }
}

/// Persists export bytes.
pub trait FileWriter {
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()>;
}

/// Writes through a temporary sibling and a rename, so a failed write never
/// leaves a partial file at `path`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsWriter;

impl FileWriter for FsWriter {
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let failure = |source| BarcodezError::ExportWriteFailure {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "export".to_string());
        let tmp_path = dir.join(format!(".{}-{}.tmp", name, Uuid::new_v4()));

        fs::write(&tmp_path, bytes)
            .and_then(|_| fs::rename(&tmp_path, path))
            .map_err(|e| {
                let _ = fs::remove_file(&tmp_path);
                failure(e)
            })?;

        debug!("export: wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn prompt(input: &str) -> PromptDestination<Cursor<Vec<u8>>, Vec<u8>> {
        PromptDestination::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn empty_answer_takes_default_name() {
        let mut chooser = prompt("\n");
        let path = chooser
            .choose("barcode.png", &ExtensionFilter::for_extension("png"))
            .unwrap();
        assert_eq!(path, Some(PathBuf::from("barcode.png")));

        let shown = String::from_utf8(chooser.output).unwrap();
        assert!(shown.contains("PNG"));
        assert!(shown.contains("[barcode.png]"));
    }

    #[test]
    fn missing_extension_is_completed() {
        let mut chooser = prompt("labels\n");
        let path = chooser
            .choose("barcode.pdf", &ExtensionFilter::for_extension("pdf"))
            .unwrap();
        assert_eq!(path, Some(PathBuf::from("labels.pdf")));
    }

    #[test]
    fn q_and_end_of_input_cancel() {
        let filter = ExtensionFilter::for_extension("pdf");
        assert_eq!(prompt("q\n").choose("barcode.pdf", &filter).unwrap(), None);
        assert_eq!(prompt("").choose("barcode.pdf", &filter).unwrap(), None);
    }

    #[test]
    fn fixed_destination_ignores_default() {
        let mut chooser = FixedDestination::new("/tmp/out.xlsx");
        let path = chooser
            .choose("barcode.xlsx", &ExtensionFilter::for_extension("xlsx"))
            .unwrap();
        assert_eq!(path, Some(PathBuf::from("/tmp/out.xlsx")));
    }

    #[test]
    fn fs_writer_replaces_target_without_leftovers() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("barcode.png");
        fs::write(&target, b"old").unwrap();

        FsWriter.write(&target, b"new").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn fs_writer_reports_export_write_failure() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("missing").join("barcode.png");

        let err = FsWriter.write(&target, b"x").unwrap_err();
        match err {
            BarcodezError::ExportWriteFailure { path, .. } => assert_eq!(path, target),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(!target.exists());
    }
}
