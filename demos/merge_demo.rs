//! Build two small documents in memory, merge them, number the pages, and
//! save the result.
//!
//! Run with: cargo run --example merge_demo

use pdf_splice::{
    Dict, Document, NumberPagesOptions, Object, ObjId, PageSource, PageWriter, Result,
    SaveOptions, TextBoxOptions,
};

/// Minimal content-stream writer: fixed-width font metrics and a single
/// `Tj` per text box, appended to the page's `/Contents`.
struct SimpleWriter;

impl PageWriter for SimpleWriter {
    fn dimensions_of(&self, text: &str, _font: &str, size: f32) -> (f32, f32) {
        (text.len() as f32 * size * 0.5, size)
    }

    fn textbox(
        &mut self,
        doc: &mut Document,
        page: ObjId,
        text: &str,
        options: &TextBoxOptions,
    ) -> Result<()> {
        let escaped = text.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)");
        let content = format!(
            "BT /F1 {} Tf {} {} Td ({}) Tj ET\n",
            options.font_size, options.x, options.y, escaped
        );
        let stream = doc.push_object(Object::Stream {
            dict: Dict::new(),
            data: content.into_bytes().into(),
        });

        let Some(dict) = doc.get_mut(page).and_then(|o| o.as_dict_mut()) else {
            return Ok(());
        };
        let contents = match dict.remove("Contents") {
            Some(Object::Array(mut streams)) => {
                streams.push(Object::link(stream));
                Object::Array(streams)
            },
            Some(existing) => Object::Array(vec![existing, Object::link(stream)]),
            None => Object::link(stream),
        };
        dict.insert("Contents".to_string(), contents);
        Ok(())
    }
}

fn document_with_pages(count: usize) -> Document {
    let mut doc = Document::new();
    for _ in 0..count {
        let mut page = Dict::new();
        page.insert("Type".to_string(), Object::Name("Page".to_string()));
        doc.insert(isize::MAX, PageSource::Page(page))
            .expect("a /Type /Page dictionary is always accepted");
    }
    doc
}

fn main() -> Result<()> {
    env_logger::init();

    let mut merged = document_with_pages(2);
    let appendix = document_with_pages(3);
    merged.combine(appendix).expect("combine always appends");
    println!("Merged document has {} pages", merged.page_count());

    let numbering = NumberPagesOptions::new().with_format("- %s -");
    merged.number_pages(&mut SimpleWriter, &numbering)?;

    let options = SaveOptions::new().with_subject("merge demo");
    merged.save("merged.pdf", &options)?;
    println!("Wrote merged.pdf");
    Ok(())
}
