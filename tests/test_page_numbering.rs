//! Page numbering and stamping through a recording PageWriter.

mod common;

use common::doc_with_markers;
use pdf_splice::{
    Anchor, Document, NumberPagesOptions, ObjId, PageLabel, PageWriter, Result, StampOptions,
    TextBoxOptions,
};

/// Records placement requests instead of touching content streams. Text is
/// measured at half the font size per character, so geometry assertions
/// stay exact.
#[derive(Default)]
struct RecordingWriter {
    calls: Vec<(ObjId, String, TextBoxOptions)>,
}

impl PageWriter for RecordingWriter {
    fn dimensions_of(&self, text: &str, _font: &str, size: f32) -> (f32, f32) {
        (text.len() as f32 * size * 0.5, size)
    }

    fn textbox(
        &mut self,
        _doc: &mut Document,
        page: ObjId,
        text: &str,
        options: &TextBoxOptions,
    ) -> Result<()> {
        self.calls.push((page, text.to_string(), options.clone()));
        Ok(())
    }
}

fn texts(writer: &RecordingWriter) -> Vec<&str> {
    writer.calls.iter().map(|(_, t, _)| t.as_str()).collect()
}

#[test]
fn test_number_pages_with_decorated_format() {
    let mut doc = doc_with_markers(&[1, 2, 3]);
    let mut writer = RecordingWriter::default();
    let options = NumberPagesOptions::new().with_format(" - %s - ");
    doc.number_pages(&mut writer, &options).unwrap();

    assert_eq!(texts(&writer), vec![" - 1 - ", " - 2 - ", " - 3 - "]);
}

#[test]
fn test_number_pages_default_format_is_bare_label() {
    let mut doc = doc_with_markers(&[1, 2]);
    let mut writer = RecordingWriter::default();
    doc.number_pages(&mut writer, &NumberPagesOptions::default())
        .unwrap();

    assert_eq!(texts(&writer), vec!["1", "2"]);
}

#[test]
fn test_number_pages_lettered_labels_carry() {
    let mut doc = doc_with_markers(&[0; 28]);
    let mut writer = RecordingWriter::default();
    let options =
        NumberPagesOptions::new().with_start_at(PageLabel::Lettered("a".to_string()));
    doc.number_pages(&mut writer, &options).unwrap();

    let labels = texts(&writer);
    assert_eq!(labels[0], "a");
    assert_eq!(labels[1], "b");
    assert_eq!(labels[25], "z");
    assert_eq!(labels[26], "aa");
    assert_eq!(labels[27], "ab");
}

#[test]
fn test_number_pages_starts_where_told() {
    let mut doc = doc_with_markers(&[1, 2]);
    let mut writer = RecordingWriter::default();
    let options = NumberPagesOptions::new().with_start_at(PageLabel::Numeric(41));
    doc.number_pages(&mut writer, &options).unwrap();

    assert_eq!(texts(&writer), vec!["41", "42"]);
}

#[test]
fn test_number_pages_targets_pages_in_order() {
    let mut doc = doc_with_markers(&[1, 2]);
    let pages = doc.pages(None);
    let mut writer = RecordingWriter::default();
    doc.number_pages(&mut writer, &NumberPagesOptions::default())
        .unwrap();

    let touched: Vec<ObjId> = writer.calls.iter().map(|(p, _, _)| *p).collect();
    assert_eq!(touched, pages);
}

#[test]
fn test_bottom_anchor_geometry_on_default_page() {
    let mut doc = doc_with_markers(&[1]);
    let mut writer = RecordingWriter::default();
    doc.number_pages(&mut writer, &NumberPagesOptions::default())
        .unwrap();

    // "1" at 12pt measures 6 x 12; the box is 1.2 and 2.0 times that.
    let placed = &writer.calls[0].2;
    assert!((placed.width - 7.2).abs() < 1e-4);
    assert!((placed.height - 24.0).abs() < 1e-4);
    assert!((placed.x - (595.3 - 7.2) / 2.0).abs() < 1e-3);
    assert!((placed.y - 54.0).abs() < 1e-4); // margin 30 + box height 24
    assert_eq!(placed.font, "Helvetica");
    assert_eq!(placed.font_size, 12.0);
}

#[test]
fn test_corner_anchors_respect_side_margin() {
    let mut doc = doc_with_markers(&[1]);
    let mut writer = RecordingWriter::default();
    let options = NumberPagesOptions::new()
        .with_locations(vec![Anchor::BottomLeft, Anchor::BottomRight]);
    doc.number_pages(&mut writer, &options).unwrap();

    let left = &writer.calls[0].2;
    let right = &writer.calls[1].2;
    assert!((left.x - 50.0).abs() < 1e-4);
    assert!((right.x - (595.3 - 50.0 - 7.2)).abs() < 1e-3);
    assert_eq!(left.y, right.y);
}

#[test]
fn test_stamp_defaults_to_second_to_last() {
    let mut doc = doc_with_markers(&[1, 2, 3, 4]);
    let pages = doc.pages(None);
    let mut writer = RecordingWriter::default();
    doc.stamp_pages(&mut writer, &StampOptions::new("CONFIDENTIAL"))
        .unwrap();

    assert_eq!(writer.calls.len(), 1);
    assert_eq!(writer.calls[0].0, pages[2]);
    assert_eq!(writer.calls[0].1, "CONFIDENTIAL");
}

#[test]
fn test_stamp_explicit_range_and_anchors() {
    let mut doc = doc_with_markers(&[1, 2, 3]);
    let mut writer = RecordingWriter::default();
    let options = StampOptions::new("DRAFT")
        .with_range(0..3)
        .with_locations(vec![Anchor::Top, Anchor::Bottom]);
    doc.stamp_pages(&mut writer, &options).unwrap();

    // Three pages, two anchors each.
    assert_eq!(writer.calls.len(), 6);
    assert!(writer.calls.iter().all(|(_, t, _)| t == "DRAFT"));
}

#[test]
fn test_stamp_empty_document_is_a_no_op() {
    let mut doc = Document::new();
    let mut writer = RecordingWriter::default();
    doc.stamp_pages(&mut writer, &StampOptions::new("DRAFT"))
        .unwrap();
    assert!(writer.calls.is_empty());
}

#[test]
fn test_writer_errors_propagate() {
    struct FailingWriter;
    impl PageWriter for FailingWriter {
        fn dimensions_of(&self, _text: &str, _font: &str, _size: f32) -> (f32, f32) {
            (1.0, 1.0)
        }
        fn textbox(
            &mut self,
            _doc: &mut Document,
            _page: ObjId,
            _text: &str,
            _options: &TextBoxOptions,
        ) -> Result<()> {
            Err(pdf_splice::Error::PageWriter("no such font".to_string()))
        }
    }

    let mut doc = doc_with_markers(&[1]);
    let result = doc.number_pages(&mut FailingWriter, &NumberPagesOptions::default());
    assert!(matches!(result, Err(pdf_splice::Error::PageWriter(_))));
}
