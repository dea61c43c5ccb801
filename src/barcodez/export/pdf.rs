//! A4 PDF composition with `lopdf`.
//!
//! Coordinates are given in millimetres from the top-left corner of the page
//! and converted to PDF points from the bottom-left. Barcode images are
//! embedded as 8-bit grayscale XObjects.

use crate::error::Result;
use crate::model::BarcodeRecord;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;

const IMAGE_LEFT_MM: f32 = 10.0;
const IMAGE_TOP_MM: f32 = 10.0;
const IMAGE_WIDTH_MM: f32 = 190.0;
const IMAGE_HEIGHT_MM: f32 = 50.0;

const TEXT_LEFT_MM: f32 = 10.0;
const TYPE_LINE_MM: f32 = 70.0;
const VALUE_LINE_MM: f32 = 80.0;
const FONT_SIZE: f32 = 16.0;

fn pt(mm: f32) -> f32 {
    mm * 72.0 / 25.4
}

/// One page holding the record's image.
pub fn single_page(record: &BarcodeRecord) -> Result<Vec<u8>> {
    let mut builder = PdfBuilder::new();
    builder.add_page(record, false)?;
    builder.finish()
}

/// One page per record: image, then its type and value underneath.
pub fn pages(records: &[BarcodeRecord]) -> Result<Vec<u8>> {
    let mut builder = PdfBuilder::new();
    for record in records {
        builder.add_page(record, true)?;
    }
    builder.finish()
}

/// Encodes caption text for the WinAnsiEncoding font. Characters the
/// encoding lacks become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '€' => 0x80,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            _ => b'?',
        })
        .collect()
}

struct PdfBuilder {
    doc: Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    kids: Vec<Object>,
}

impl PdfBuilder {
    fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        Self {
            doc,
            pages_id,
            font_id,
            kids: Vec::new(),
        }
    }

    fn add_page(&mut self, record: &BarcodeRecord, with_caption: bool) -> Result<()> {
        let gray = image::load_from_memory(&record.image)?.to_luma8();
        let (width, height) = gray.dimensions();
        let image_id = self.doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            gray.into_raw(),
        ));

        let image_bottom = PAGE_HEIGHT_MM - IMAGE_TOP_MM - IMAGE_HEIGHT_MM;
        let mut operations = vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    pt(IMAGE_WIDTH_MM).into(),
                    0.into(),
                    0.into(),
                    pt(IMAGE_HEIGHT_MM).into(),
                    pt(IMAGE_LEFT_MM).into(),
                    pt(image_bottom).into(),
                ],
            ),
            Operation::new("Do", vec!["Im1".into()]),
            Operation::new("Q", vec![]),
        ];

        if with_caption {
            let lines = [
                (TYPE_LINE_MM, format!("Type: {}", record.symbology.label())),
                (VALUE_LINE_MM, format!("Value: {}", record.value)),
            ];
            for (top, text) in lines {
                operations.extend([
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
                    Operation::new(
                        "Td",
                        vec![pt(TEXT_LEFT_MM).into(), pt(PAGE_HEIGHT_MM - top).into()],
                    ),
                    Operation::new(
                        "Tj",
                        vec![Object::String(win_ansi(&text), StringFormat::Literal)],
                    ),
                    Operation::new("ET", vec![]),
                ]);
            }
        }

        let content = Content { operations };
        let content_id = self
            .doc
            .add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => self.font_id },
                "XObject" => dictionary! { "Im1" => image_id },
            },
        });
        self.kids.push(page_id.into());
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        let count = self.kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => self.kids,
            "Count" => count,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                pt(PAGE_WIDTH_MM).into(),
                pt(PAGE_HEIGHT_MM).into(),
            ],
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.compress();

        let mut bytes = Vec::new();
        self.doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BarcodeSize, Symbology};
    use crate::render::raster::rasterize;

    fn record(value: &str) -> BarcodeRecord {
        BarcodeRecord::new(
            Symbology::Jan,
            value.to_string(),
            rasterize(&[1, 0, 1], Some(value), 2, 50).unwrap(),
            BarcodeSize::default(),
        )
    }

    fn page_text(bytes: &[u8], page: u32) -> String {
        let doc = Document::load_mem(bytes).unwrap();
        doc.extract_text(&[page]).unwrap()
    }

    #[test]
    fn single_export_is_one_page_without_caption() {
        let bytes = single_page(&record("4901234567894")).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();

        assert_eq!(doc.get_pages().len(), 1);
        assert!(!page_text(&bytes, 1).contains("Value:"));
    }

    #[test]
    fn bulk_export_has_one_captioned_page_per_record() {
        let bytes = pages(&[record("111"), record("222"), record("333")]).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();

        assert_eq!(doc.get_pages().len(), 3);
        let second = page_text(&bytes, 2);
        assert!(second.contains("Type: jan"));
        assert!(second.contains("Value: 222"));
    }

    fn image_placement(bytes: &[u8], page: u32) -> Vec<f32> {
        let doc = Document::load_mem(bytes).unwrap();
        let page_id = doc.get_pages()[&page];
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
        let cm = content
            .operations
            .iter()
            .find(|op| op.operator == "cm")
            .unwrap();
        cm.operands.iter().map(|o| o.as_float().unwrap()).collect()
    }

    fn assert_close(actual: &[f32], expected: &[f32]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 0.01, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn image_is_placed_at_10mm_and_sized_190_by_50mm() {
        // 190 x 50 mm from (10 mm, 297 - 10 - 50 mm) in points
        let expected = [538.583, 0.0, 0.0, 141.732, 28.346, 671.811];

        let single = single_page(&record("1")).unwrap();
        assert_close(&image_placement(&single, 1), &expected);

        let bulk = pages(&[record("1"), record("2")]).unwrap();
        assert_close(&image_placement(&bulk, 2), &expected);
    }

    #[test]
    fn mediabox_is_a4() {
        let bytes = single_page(&record("1")).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let pages_id = doc.catalog().unwrap().get(b"Pages").unwrap().as_reference().unwrap();
        let media_box: Vec<f32> = doc
            .get_dictionary(pages_id)
            .unwrap()
            .get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o.as_float().unwrap())
            .collect();
        assert_close(&media_box, &[0.0, 0.0, 595.276, 841.890]);
    }

    #[test]
    fn captions_are_win_ansi_encoded() {
        assert_eq!(win_ansi("Value: 123"), b"Value: 123".to_vec());
        assert_eq!(win_ansi("café"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(win_ansi("Type: コード"), b"Type: ???".to_vec());
    }

    #[test]
    fn non_latin_label_is_written_with_substitutes() {
        let mut r = record("123");
        r.symbology = Symbology::Unrecognized("コード".into());
        let bytes = pages(&[r]).unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        let page_id = doc.get_pages()[&1];
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
        let shown: Vec<Vec<u8>> = content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .map(|op| op.operands[0].as_str().unwrap().to_vec())
            .collect();
        assert_eq!(shown, vec![b"Type: ???".to_vec(), b"Value: 123".to_vec()]);
    }

    #[test]
    fn undecodable_image_is_an_error() {
        let mut broken = record("1");
        broken.image = vec![1, 2, 3];
        assert!(single_page(&broken).is_err());
    }
}
