//! # Receipt Elements
//!
//! This module defines the intermediate representation between the receipt
//! template and the wire protocols. A [`Program`] is an ordered list of
//! [`Element`]s, each one a single printable unit whose layout is already
//! resolved: text lines are padded to the page width, rows know their width.
//!
//! ## Design Philosophy
//!
//! ```text
//! ReceiptDocument → Template → Program (inspectable) → Codegen → Bytes
//! ```
//!
//! Elements carry no business meaning. An item row and a total row are both
//! a [`Element::JustifiedRow`], so the encoders only ever deal with layout.

/// Horizontal alignment of a printed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

/// Kind of machine-readable code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeKind {
    /// QR code (model 2).
    #[default]
    Qr,
    /// 1D CODE128 barcode.
    Barcode,
}

/// One line of text with its style flags.
///
/// `content` is already laid out; `left_padding` columns of blank space are
/// placed in front of it when printed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextLine {
    pub content: String,
    pub alignment: Alignment,
    pub bold: bool,
    pub underline: bool,
    pub double_height: bool,
    pub left_padding: usize,
}

impl TextLine {
    /// Plain left-aligned line.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Set the alignment.
    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Make the line bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Underline the line.
    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Print the line at double height.
    pub fn double_height(mut self) -> Self {
        self.double_height = true;
        self
    }

    /// Indent the line by `columns` blank columns.
    pub fn padding(mut self, columns: usize) -> Self {
        self.left_padding = columns;
        self
    }
}

/// A QR code or barcode block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Code {
    pub kind: CodeKind,
    /// Encoded verbatim, never transliterated.
    pub payload: String,
    pub position: Alignment,
}

impl Code {
    /// Whether the payload can go into a code command.
    ///
    /// Payloads must be non-empty and free of control characters. CODE128
    /// is printed in code set B, which only covers printable ASCII.
    pub fn is_encodable(&self) -> bool {
        if self.payload.is_empty() || self.payload.chars().any(char::is_control) {
            return false;
        }
        match self.kind {
            CodeKind::Qr => true,
            CodeKind::Barcode => self.payload.bytes().all(|b| (0x20..0x7F).contains(&b)),
        }
    }
}

/// Receipt elements - the printable units of a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// A single laid-out text line.
    Text(TextLine),

    /// Two fragments at opposite ends of a `width`-column line.
    JustifiedRow {
        left: String,
        right: String,
        width: usize,
        bold: bool,
    },

    /// A horizontal rule `width` columns wide.
    Rule { width: usize },

    /// QR code or barcode.
    Code(Code),

    /// Feed `lines` blank lines, then cut the paper if `cut` is set.
    FeedCut { lines: usize, cut: bool },
}

impl Element {
    /// Shorthand for a left-aligned plain text line.
    pub fn text(content: impl Into<String>) -> Self {
        Element::Text(TextLine::new(content))
    }

    /// Shorthand for a non-bold justified row.
    pub fn row(left: impl Into<String>, right: impl Into<String>, width: usize) -> Self {
        Element::JustifiedRow {
            left: left.into(),
            right: right.into(),
            width,
            bold: false,
        }
    }
}

impl From<TextLine> for Element {
    fn from(line: TextLine) -> Self {
        Element::Text(line)
    }
}

/// An ordered element sequence ready for encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub elements: Vec<Element>,
}

impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Add an element to the program.
    pub fn push(&mut self, element: impl Into<Element>) {
        self.elements.push(element.into());
    }

    /// Add multiple elements to the program.
    pub fn extend(&mut self, elements: impl IntoIterator<Item = Element>) {
        self.elements.extend(elements);
    }

    /// Get the number of elements in the program.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the program is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate over elements.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    /// Text of every printed line, in order, as it would appear on paper.
    ///
    /// Rules render as dashes, justified rows are joined, codes show their
    /// payload in brackets, and feed/cut elements are skipped. Useful for
    /// previews and assertions.
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        for element in &self.elements {
            match element {
                Element::Text(line) => {
                    out.push(format!("{}{}", " ".repeat(line.left_padding), line.content));
                }
                Element::JustifiedRow {
                    left, right, width, ..
                } => out.push(crate::layout::justify(left, right, *width)),
                Element::Rule { width } => out.push("-".repeat(*width)),
                Element::Code(code) => out.push(format!("[{}]", code.payload)),
                Element::FeedCut { .. } => {}
            }
        }
        out
    }
}

impl FromIterator<Element> for Program {
    fn from_iter<T: IntoIterator<Item = Element>>(iter: T) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Program {
    type Item = Element;
    type IntoIter = std::vec::IntoIter<Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
