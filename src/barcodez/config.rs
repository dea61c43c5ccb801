use crate::error::{BarcodezError, Result};
use crate::model::{BarcodeSize, Symbology};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

pub const KEYS: [&str; 3] = ["symbology", "width", "height"];

/// Defaults for new barcodes, stored in `<data-dir>/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BarcodezConfig {
    /// Symbology label used when none is given on the command line
    #[serde(default)]
    pub symbology: Symbology,

    /// Module width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Bar height in pixels
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 {
    BarcodeSize::default().module_width
}

fn default_height() -> u32 {
    BarcodeSize::default().bar_height
}

impl Default for BarcodezConfig {
    fn default() -> Self {
        Self {
            symbology: Symbology::default(),
            width: default_width(),
            height: default_height(),
        }
    }
}

impl BarcodezConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: BarcodezConfig = serde_json::from_str(&content)
            .map_err(|e| BarcodezError::Config(format!("{}: {}", config_path.display(), e)))?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Default size, validated. A hand-edited config may hold out-of-range values.
    pub fn size(&self) -> Result<BarcodeSize> {
        BarcodeSize::new(self.width, self.height)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "symbology" => Some(self.symbology.label().to_string()),
            "width" => Some(self.width.to_string()),
            "height" => Some(self.height.to_string()),
            _ => None,
        }
    }

    /// Sets a key from its string form. Sizes must stay within their ranges.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "symbology" => {
                let value = value.trim();
                if value.is_empty() {
                    return Err("symbology cannot be empty".to_string());
                }
                self.symbology = Symbology::from_label(value);
            }
            "width" => {
                let width = parse_number(key, value)?;
                BarcodeSize::new(width, self.height).map_err(|e| e.to_string())?;
                self.width = width;
            }
            "height" => {
                let height = parse_number(key, value)?;
                BarcodeSize::new(self.width, height).map_err(|e| e.to_string())?;
                self.height = height;
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }

    pub fn list_all(&self) -> Vec<(&'static str, String)> {
        KEYS.iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }
}

fn parse_number(key: &str, value: &str) -> std::result::Result<u32, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("{} must be a number, got '{}'", key, value))
}
