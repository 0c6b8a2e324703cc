//! Page geometry and the cursor that places cells onto pages.
//!
//! All coordinates are millimetres measured from the top left corner of an A4
//! portrait page. Font sizes are in points.

use crate::fonts::Face;

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;

/// Left, top and right margin.
pub const MARGIN: f32 = 10.0;

/// Distance from the bottom edge below which no cell may extend.
pub const BREAK_MARGIN: f32 = 15.0;

/// Horizontal padding between a cell's edge and its text.
pub const CELL_PADDING: f32 = 1.0;

/// Stroke width of cell borders.
pub const LINE_WIDTH: f32 = 0.2;

const MM_PER_POINT: f32 = 25.4 / 72.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Font {
    pub face: Face,
    pub size: f32,
}

impl Font {
    pub fn regular(size: f32) -> Self {
        Self {
            face: Face::Regular,
            size,
        }
    }

    pub fn bold(size: f32) -> Self {
        Self {
            face: Face::Bold,
            size,
        }
    }

    /// Width of `text` set in this font, in millimetres.
    pub fn text_width(&self, text: &str) -> f32 {
        self.face.advance(text) as f32 / 1000.0 * self.size_mm()
    }

    fn size_mm(&self) -> f32 {
        self.size * MM_PER_POINT
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// A single positioned mark on a page.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// A run of text whose baseline starts at (`x`, `baseline`).
    Text {
        x: f32,
        baseline: f32,
        font: Font,
        text: String,
    },

    /// The outline of a cell with its top left corner at (`x`, `y`).
    Border {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Every text run on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Border { .. } => None,
        })
    }
}

/// A laid out report: an ordered sequence of pages.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub pages: Vec<Page>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PageState {
    /// The last page in the document accepts more content.
    OnPage,

    /// The next cell must be drawn on a fresh page.
    NeedsNewPage,
}

/// Tracks the cursor, the active font and the pages produced so far.
///
/// Cells are drawn left to right from the cursor; [`LayoutContext::new_line`]
/// returns the cursor to the left margin. A cell that would cross the page
/// break trigger is moved to a new page first, keeping the cursor's x
/// position and the active font.
pub struct LayoutContext {
    pages: Vec<Page>,
    state: PageState,
    font: Font,
    x: f32,
    y: f32,
}

impl Default for LayoutContext {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutContext {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            state: PageState::NeedsNewPage,
            font: Font::regular(10.0),
            x: MARGIN,
            y: MARGIN,
        }
    }

    pub fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    /// The current cursor position.
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// The lowest point content may reach on a page.
    pub fn break_trigger(&self) -> f32 {
        PAGE_HEIGHT - BREAK_MARGIN
    }

    /// Whether a cell of `height` can be drawn on the current page.
    pub fn fits(&self, height: f32) -> bool {
        self.state == PageState::OnPage && self.y + height <= self.break_trigger()
    }

    /// Ends the current page; the next cell starts a new one.
    pub fn break_page(&mut self) {
        self.state = PageState::NeedsNewPage;
        self.x = MARGIN;
    }

    /// Draws a cell at the cursor and moves the cursor to its right edge.
    ///
    /// A `width` of zero extends the cell to the right margin.
    pub fn cell(&mut self, width: f32, height: f32, text: &str, align: Align, border: bool) {
        if !self.fits(height) {
            self.open_page();
        }

        let width = if width == 0.0 {
            PAGE_WIDTH - MARGIN - self.x
        } else {
            width
        };
        let (x, y, font) = (self.x, self.y, self.font);
        let page = self.current_page();

        if border {
            page.ops.push(DrawOp::Border {
                x,
                y,
                width,
                height,
            });
        }

        if !text.is_empty() {
            let offset = match align {
                Align::Left => CELL_PADDING,
                Align::Center => (width - font.text_width(text)) / 2.0,
                Align::Right => width - CELL_PADDING - font.text_width(text),
            };
            page.ops.push(DrawOp::Text {
                x: x + offset,
                baseline: y + 0.5 * height + 0.3 * font.size_mm(),
                font,
                text: text.to_string(),
            });
        }

        self.x += width;
    }

    /// Draws a full width cell and moves to the start of the next line.
    pub fn text_line(&mut self, height: f32, text: &str, align: Align) {
        self.cell(0.0, height, text, align, false);
        self.new_line(height);
    }

    /// Returns the cursor to the left margin, `height` further down.
    pub fn new_line(&mut self, height: f32) {
        self.x = MARGIN;
        self.y += height;
    }

    /// Consumes the context, returning the finished pages.
    pub fn finish(mut self) -> Document {
        if self.pages.is_empty() {
            self.open_page();
        }

        Document { pages: self.pages }
    }

    fn open_page(&mut self) {
        self.pages.push(Page::default());
        self.state = PageState::OnPage;
        self.y = MARGIN;
    }

    fn current_page(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.open_page();
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}
