use crate::error::{BarcodezError, Result};
use crate::export::{DestinationChooser, ExtensionFilter, FileWriter};
use crate::render::raster::rasterize;
use crate::render::{RenderError, RenderOptions, Renderer};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Accepts any non-empty all-digit value, whatever the format.
///
/// Output is a real PNG so exports can decode it, and it is deterministic for
/// a given value and size.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubRenderer;

impl Renderer for StubRenderer {
    fn render(
        &self,
        value: &str,
        options: &RenderOptions<'_>,
    ) -> std::result::Result<Vec<u8>, RenderError> {
        if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(RenderError::InvalidValue("not digits".to_string()));
        }
        let text = options.display_value.then_some(value);
        rasterize(&[1, 0, 1, 1, 0, 1], text, options.width, options.height)
    }
}

/// Records the format token and display flag of every call. Always succeeds.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    calls: RefCell<Vec<(String, bool)>>,
}

impl RecordingRenderer {
    pub fn formats(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(f, _)| f.clone()).collect()
    }

    pub fn all_display_value(&self) -> bool {
        self.calls.borrow().iter().all(|(_, shown)| *shown)
    }
}

impl Renderer for RecordingRenderer {
    fn render(
        &self,
        _value: &str,
        options: &RenderOptions<'_>,
    ) -> std::result::Result<Vec<u8>, RenderError> {
        self.calls
            .borrow_mut()
            .push((options.format.to_string(), options.display_value));
        Ok(vec![0x89, b'P', b'N', b'G'])
    }
}

/// Answers destination prompts from a script; `None` cancels.
/// Runs out of answers as a cancel.
#[derive(Debug, Default)]
pub struct ScriptedDestination {
    answers: VecDeque<Option<PathBuf>>,
    asked: Vec<(String, ExtensionFilter)>,
}

impl ScriptedDestination {
    pub fn new(answers: Vec<Option<PathBuf>>) -> Self {
        Self {
            answers: answers.into(),
            asked: Vec::new(),
        }
    }

    /// Default names and filters offered so far.
    pub fn asked(&self) -> &[(String, ExtensionFilter)] {
        &self.asked
    }
}

impl DestinationChooser for ScriptedDestination {
    fn choose(&mut self, default_name: &str, filter: &ExtensionFilter) -> Result<Option<PathBuf>> {
        self.asked.push((default_name.to_string(), filter.clone()));
        Ok(self.answers.pop_front().flatten())
    }
}

/// A writer whose every write fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingWriter;

impl FileWriter for FailingWriter {
    fn write(&self, path: &Path, _bytes: &[u8]) -> Result<()> {
        Err(BarcodezError::ExportWriteFailure {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "simulated write failure"),
        })
    }
}

pub struct TestEnv {
    // Keeps the directory alive until the test is done
    pub _temp_dir: TempDir,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// A path inside the temp dir for export output.
    pub fn out(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}
