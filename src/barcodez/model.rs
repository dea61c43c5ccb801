use crate::error::{BarcodezError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_MODULE_WIDTH: u32 = 1;
pub const MAX_MODULE_WIDTH: u32 = 10;
pub const MIN_BAR_HEIGHT: u32 = 50;
pub const MAX_BAR_HEIGHT: u32 = 200;

/// The barcode standard a record is encoded with.
///
/// Persisted as its short label (`jan`, `itf`, `gs1`). Labels this build does
/// not know are kept verbatim so that loading and re-saving a store never
/// loses data; they render as EAN-13.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Symbology {
    #[default]
    Jan,
    Itf,
    Gs1DataBar,
    Unrecognized(String),
}

impl Symbology {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "jan" => Symbology::Jan,
            "itf" => Symbology::Itf,
            "gs1" => Symbology::Gs1DataBar,
            _ => Symbology::Unrecognized(label.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Symbology::Jan => "jan",
            Symbology::Itf => "itf",
            Symbology::Gs1DataBar => "gs1",
            Symbology::Unrecognized(label) => label,
        }
    }

    /// Format token handed to the renderer. Unknown symbologies fall back to EAN-13.
    pub fn format_token(&self) -> &'static str {
        match self {
            Symbology::Jan => "ean13",
            Symbology::Itf => "itf14",
            Symbology::Gs1DataBar => "databar",
            Symbology::Unrecognized(_) => "ean13",
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Symbology::Unrecognized(_))
    }
}

impl From<String> for Symbology {
    fn from(label: String) -> Self {
        Symbology::from_label(&label)
    }
}

impl From<Symbology> for String {
    fn from(symbology: Symbology) -> Self {
        symbology.label().to_string()
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rendering dimensions recorded alongside each barcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BarcodeSize {
    #[serde(alias = "width", deserialize_with = "dimension::module_width")]
    pub module_width: u32,
    #[serde(alias = "height", deserialize_with = "dimension::bar_height")]
    pub bar_height: u32,
}

impl Default for BarcodeSize {
    fn default() -> Self {
        Self {
            module_width: 2,
            bar_height: 100,
        }
    }
}

impl BarcodeSize {
    /// Builds a size, rejecting values outside the supported ranges.
    pub fn new(module_width: u32, bar_height: u32) -> Result<Self> {
        let size = Self {
            module_width,
            bar_height,
        };
        size.validate()?;
        Ok(size)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_MODULE_WIDTH..=MAX_MODULE_WIDTH).contains(&self.module_width) {
            return Err(BarcodezError::Api(format!(
                "Width must be between {} and {} (got {})",
                MIN_MODULE_WIDTH, MAX_MODULE_WIDTH, self.module_width
            )));
        }
        if !(MIN_BAR_HEIGHT..=MAX_BAR_HEIGHT).contains(&self.bar_height) {
            return Err(BarcodezError::Api(format!(
                "Height must be between {} and {} (got {})",
                MIN_BAR_HEIGHT, MAX_BAR_HEIGHT, self.bar_height
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeRecord {
    #[serde(alias = "type")]
    pub symbology: Symbology,
    pub value: String,
    #[serde(with = "data_url")]
    pub image: Vec<u8>,
    #[serde(alias = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub size: BarcodeSize,
}

impl BarcodeRecord {
    pub fn new(symbology: Symbology, value: String, image: Vec<u8>, size: BarcodeSize) -> Self {
        Self {
            symbology,
            value,
            image,
            created_at: Utc::now(),
            size,
        }
    }

    /// Case-insensitive substring match against the value or the symbology label.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.value.to_lowercase().contains(&query)
            || self.symbology.label().to_lowercase().contains(&query)
    }
}

/// Size fields as the desktop tool wrote them: any JSON number, or `null`
/// for a field that held no number. Values are rounded and clamped into the
/// supported range; `null` reads as the default.
mod dimension {
    use super::*;
    use serde::{Deserialize, Deserializer};

    fn lenient<'de, D: Deserializer<'de>>(
        deserializer: D,
        min: u32,
        max: u32,
        default: u32,
    ) -> std::result::Result<u32, D::Error> {
        let raw = Option::<f64>::deserialize(deserializer)?;
        Ok(match raw {
            Some(n) if n.is_finite() => n.round().clamp(f64::from(min), f64::from(max)) as u32,
            _ => default,
        })
    }

    pub fn module_width<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<u32, D::Error> {
        let default = BarcodeSize::default().module_width;
        lenient(deserializer, MIN_MODULE_WIDTH, MAX_MODULE_WIDTH, default)
    }

    pub fn bar_height<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<u32, D::Error> {
        let default = BarcodeSize::default().bar_height;
        lenient(deserializer, MIN_BAR_HEIGHT, MAX_BAR_HEIGHT, default)
    }
}

/// Images are persisted as `data:image/png;base64,...` URLs, the layout the
/// desktop tool wrote. Bare base64 is accepted on read.
mod data_url {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    const PREFIX: &str = "data:image/png;base64,";

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{}{}", PREFIX, STANDARD.encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let payload = match raw.split_once(',') {
            Some((header, payload)) if header.starts_with("data:") => payload,
            _ => raw.as_str(),
        };
        STANDARD.decode(payload).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_tokens_follow_the_fixed_table() {
        assert_eq!(Symbology::Jan.format_token(), "ean13");
        assert_eq!(Symbology::Itf.format_token(), "itf14");
        assert_eq!(Symbology::Gs1DataBar.format_token(), "databar");
        assert_eq!(
            Symbology::Unrecognized("upc".into()).format_token(),
            "ean13"
        );
    }

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!(Symbology::from_label("JAN"), Symbology::Jan);
        assert_eq!(Symbology::from_label(" itf "), Symbology::Itf);
        assert_eq!(Symbology::from_label("gs1"), Symbology::Gs1DataBar);
        assert_eq!(
            Symbology::from_label("qr"),
            Symbology::Unrecognized("qr".into())
        );
    }

    #[test]
    fn size_bounds_are_inclusive() {
        assert!(BarcodeSize::new(1, 50).is_ok());
        assert!(BarcodeSize::new(10, 200).is_ok());
        assert!(BarcodeSize::new(0, 100).is_err());
        assert!(BarcodeSize::new(11, 100).is_err());
        assert!(BarcodeSize::new(2, 49).is_err());
        assert!(BarcodeSize::new(2, 201).is_err());
    }

    #[test]
    fn record_serializes_with_camel_case_and_data_url() {
        let record = BarcodeRecord::new(
            Symbology::Itf,
            "14901234567891".into(),
            vec![0x89, b'P', b'N', b'G'],
            BarcodeSize::default(),
        );
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["symbology"], "itf");
        assert_eq!(json["size"]["moduleWidth"], 2);
        assert_eq!(json["size"]["barHeight"], 100);
        assert!(json["createdAt"].is_string());
        assert!(json["image"]
            .as_str()
            .unwrap()
            .starts_with("data:image/png;base64,"));

        let back: BarcodeRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn reads_records_written_by_the_desktop_tool() {
        let legacy = r#"{
            "type": "jan",
            "value": "4901234567894",
            "image": "data:image/png;base64,iVBORw==",
            "timestamp": "2024-03-01T09:30:00.000Z",
            "size": { "width": 3, "height": 80 }
        }"#;
        let record: BarcodeRecord = serde_json::from_str(legacy).unwrap();

        assert_eq!(record.symbology, Symbology::Jan);
        assert_eq!(record.value, "4901234567894");
        assert_eq!(record.image, vec![0x89, b'P', b'N', b'G']);
        assert_eq!(record.size, BarcodeSize::new(3, 80).unwrap());
    }

    #[test]
    fn reads_fractional_and_missing_desktop_sizes() {
        let legacy = r#"[
            { "type": "jan", "value": "1", "image": "iVBORw==",
              "timestamp": "2024-03-01T09:30:00Z", "size": { "width": 2.5, "height": 100 } },
            { "type": "itf", "value": "2", "image": "iVBORw==",
              "timestamp": "2024-03-01T09:30:00Z", "size": { "width": 0, "height": null } },
            { "type": "jan", "value": "3", "image": "iVBORw==",
              "timestamp": "2024-03-01T09:30:00Z" }
        ]"#;
        let records: Vec<BarcodeRecord> = serde_json::from_str(legacy).unwrap();

        assert_eq!(records[0].size, BarcodeSize::new(3, 100).unwrap());
        assert_eq!(records[1].size, BarcodeSize::new(1, 100).unwrap());
        assert_eq!(records[2].size, BarcodeSize::default());
        assert!(records.iter().all(|r| r.size.validate().is_ok()));
    }

    #[test]
    fn size_fields_must_still_be_numbers() {
        let bad = r#"{ "width": "wide", "height": 100 }"#;
        assert!(serde_json::from_str::<BarcodeSize>(bad).is_err());
    }

    #[test]
    fn matches_value_or_label_ignoring_case() {
        let record = BarcodeRecord::new(
            Symbology::Jan,
            "ABC123".into(),
            Vec::new(),
            BarcodeSize::default(),
        );
        assert!(record.matches("abc"));
        assert!(record.matches("JA"));
        assert!(record.matches(""));
        assert!(!record.matches("itf"));
    }
}
