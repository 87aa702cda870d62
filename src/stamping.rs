//! Page numbering and stamping.
//!
//! Text placement is delegated to a [`PageWriter`] collaborator that knows
//! fonts and content streams; this module owns the policy: which pages get
//! text, what the text says, and where its box sits on the page. Geometry
//! works in page space with the origin at the bottom-left.

use std::ops::Range;

use crate::document::Document;
use crate::error::Result;
use crate::geometry::Rect;
use crate::graph::ObjId;
use crate::labels::PageLabel;
use crate::object::Object;

/// Fallback page box (A4 portrait) when a page declares neither
/// `/MediaBox` nor `/CropBox`.
pub const DEFAULT_PAGE_BOX: [f32; 4] = [0.0, 0.0, 595.3, 841.9];

/// Width factor applied to measured text when sizing its box.
const BOX_WIDTH_FACTOR: f32 = 1.2;
/// Height factor applied to measured text when sizing its box.
const BOX_HEIGHT_FACTOR: f32 = 2.0;

/// Where on the page a text box is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Placement request handed to a [`PageWriter`].
#[derive(Debug, Clone, PartialEq)]
pub struct TextBoxOptions {
    /// Left edge of the box
    pub x: f32,
    /// Top edge of the box
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub font: String,
    pub font_size: f32,
}

/// Contract for the content-stream collaborator that measures and draws
/// text. Font metrics and stream syntax are its failure domain.
pub trait PageWriter {
    /// Measured width and height of `text` at `size` in `font`.
    fn dimensions_of(&self, text: &str, font: &str, size: f32) -> (f32, f32);

    /// Draw `text` inside the box described by `options` on `page`.
    fn textbox(
        &mut self,
        doc: &mut Document,
        page: ObjId,
        text: &str,
        options: &TextBoxOptions,
    ) -> Result<()>;
}

/// Options for [`Document::number_pages`].
#[derive(Debug, Clone)]
pub struct NumberPagesOptions {
    /// Label template; every `%s` becomes the page label
    pub number_format: String,
    /// Anchors that each receive the label
    pub number_location: Vec<Anchor>,
    /// Label of the first page; advances once per page
    pub start_at: PageLabel,
    pub font: String,
    pub font_size: f32,
    /// Distance from the horizontal page edge the anchor names
    pub margin_from_height: f32,
    /// Distance from the vertical page edge the anchor names
    pub margin_from_side: f32,
}

impl Default for NumberPagesOptions {
    fn default() -> Self {
        Self {
            number_format: "%s".to_string(),
            number_location: vec![Anchor::Bottom],
            start_at: PageLabel::Numeric(1),
            font: "Helvetica".to_string(),
            font_size: 12.0,
            margin_from_height: 30.0,
            margin_from_side: 50.0,
        }
    }
}

impl NumberPagesOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.number_format = format.into();
        self
    }

    pub fn with_locations(mut self, locations: Vec<Anchor>) -> Self {
        self.number_location = locations;
        self
    }

    pub fn with_start_at(mut self, start: PageLabel) -> Self {
        self.start_at = start;
        self
    }

    pub fn with_font(mut self, font: impl Into<String>, size: f32) -> Self {
        self.font = font.into();
        self.font_size = size;
        self
    }
}

/// Options for [`Document::stamp_pages`].
#[derive(Debug, Clone)]
pub struct StampOptions {
    /// Literal text to stamp
    pub stamp_text: String,
    /// Anchors that each receive the stamp
    pub stamp_location: Vec<Anchor>,
    /// Flattened page indices to stamp; defaults to the second-to-last
    /// page only
    pub stamp_at: Option<Range<usize>>,
    pub font: String,
    pub font_size: f32,
    pub margin_from_height: f32,
    pub margin_from_side: f32,
}

impl Default for StampOptions {
    fn default() -> Self {
        Self {
            stamp_text: String::new(),
            stamp_location: vec![Anchor::Top],
            stamp_at: None,
            font: "Helvetica".to_string(),
            font_size: 12.0,
            margin_from_height: 30.0,
            margin_from_side: 50.0,
        }
    }
}

impl StampOptions {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            stamp_text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_locations(mut self, locations: Vec<Anchor>) -> Self {
        self.stamp_location = locations;
        self
    }

    pub fn with_range(mut self, range: Range<usize>) -> Self {
        self.stamp_at = Some(range);
        self
    }

    pub fn with_font(mut self, font: impl Into<String>, size: f32) -> Self {
        self.font = font.into();
        self.font_size = size;
        self
    }
}

impl Document {
    /// Write a running page label onto every page, in flattened order.
    ///
    /// The label starts at `options.start_at` and advances once per page;
    /// each anchor in `options.number_location` receives the same label.
    pub fn number_pages<W: PageWriter>(
        &mut self,
        writer: &mut W,
        options: &NumberPagesOptions,
    ) -> Result<()> {
        let pages = self.pages(None);
        let mut label = options.start_at.clone();

        for page in pages {
            let text = options.number_format.replace("%s", &label.to_string());
            self.place_text(
                writer,
                page,
                &text,
                &options.number_location,
                &options.font,
                options.font_size,
                options.margin_from_height,
                options.margin_from_side,
            )?;
            label = label.next();
        }
        Ok(())
    }

    /// Stamp fixed text onto a range of pages (flattened order).
    ///
    /// With no explicit range, the second-to-last page is stamped; a
    /// one-page document stamps its only page. Range ends past the last
    /// page clamp to it.
    pub fn stamp_pages<W: PageWriter>(
        &mut self,
        writer: &mut W,
        options: &StampOptions,
    ) -> Result<()> {
        let pages = self.pages(None);
        let n = pages.len();
        let range = match &options.stamp_at {
            Some(r) => r.start.min(n)..r.end.min(n),
            None => {
                let start = n.saturating_sub(2);
                start..(start + 1).min(n)
            },
        };

        for &page in &pages[range] {
            self.place_text(
                writer,
                page,
                &options.stamp_text,
                &options.stamp_location,
                &options.font,
                options.font_size,
                options.margin_from_height,
                options.margin_from_side,
            )?;
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn place_text<W: PageWriter>(
        &mut self,
        writer: &mut W,
        page: ObjId,
        text: &str,
        anchors: &[Anchor],
        font: &str,
        font_size: f32,
        margin_from_height: f32,
        margin_from_side: f32,
    ) -> Result<()> {
        let page_box = self.page_box(page);
        let (text_w, text_h) = writer.dimensions_of(text, font, font_size);
        let box_w = text_w * BOX_WIDTH_FACTOR;
        let box_h = text_h * BOX_HEIGHT_FACTOR;

        for &anchor in anchors {
            let (x, y) = anchor_position(anchor, page_box, box_w, box_h, margin_from_height, margin_from_side);
            let options = TextBoxOptions {
                x,
                y,
                width: box_w,
                height: box_h,
                font: font.to_string(),
                font_size,
            };
            writer.textbox(self, page, text, &options)?;
        }
        Ok(())
    }

    /// The page's box: `/MediaBox`, else `/CropBox`, else A4.
    fn page_box(&self, page: ObjId) -> Rect {
        let dict = match self.resolve_id(page).and_then(|o| o.as_dict()) {
            Some(d) => d,
            None => return rect_from(DEFAULT_PAGE_BOX),
        };
        for key in ["MediaBox", "CropBox"] {
            if let Some(entry) = dict.get(key) {
                match self.rect_entry(entry) {
                    Some(rect) => return rect,
                    None => log::warn!("Malformed /{} on {}; ignoring", key, page),
                }
            }
        }
        rect_from(DEFAULT_PAGE_BOX)
    }

    /// Interpret a `[x0 y0 x1 y1]` array (possibly behind references) as a
    /// rectangle.
    fn rect_entry(&self, entry: &Object) -> Option<Rect> {
        let array = self.resolve(entry)?.as_array()?;
        if array.len() != 4 {
            return None;
        }
        let mut nums = [0f32; 4];
        for (slot, item) in nums.iter_mut().zip(array) {
            *slot = self.resolve(item)?.as_number()? as f32;
        }
        Some(Rect::from_points(nums[0], nums[1], nums[2], nums[3]))
    }
}

fn rect_from(coords: [f32; 4]) -> Rect {
    Rect::from_points(coords[0], coords[1], coords[2], coords[3])
}

/// Top-left corner of a text box anchored on the page.
fn anchor_position(
    anchor: Anchor,
    page: Rect,
    box_w: f32,
    box_h: f32,
    margin_from_height: f32,
    margin_from_side: f32,
) -> (f32, f32) {
    let center_x = page.left() + (page.width - box_w) / 2.0;
    let left_x = page.left() + margin_from_side;
    let right_x = page.right() - margin_from_side - box_w;
    let top_y = page.top() - margin_from_height;
    let bottom_y = page.bottom() + margin_from_height + box_h;

    match anchor {
        Anchor::Top => (center_x, top_y),
        Anchor::Bottom => (center_x, bottom_y),
        Anchor::TopLeft => (left_x, top_y),
        Anchor::TopRight => (right_x, top_y),
        Anchor::BottomLeft => (left_x, bottom_y),
        Anchor::BottomRight => (right_x, bottom_y),
    }
}
