//! # Code Generation
//!
//! Converts element streams to protocol bytes.
//!
//! Codegen is the only place that knows about opcodes. It never looks at
//! what an element *means*, only at how it is laid out, so adding a third
//! protocol is one more function here.

use tracing::{debug, warn};

use super::ops::{Alignment, Code, CodeKind, Element, Program, TextLine};
use crate::layout::justify;
use crate::printer::{DOTS_PER_MM, LabelSetup, Profile};
use crate::protocol::{encoding, escpos, tspl};

impl Program {
    /// Compile the program to bytes for `profile`.
    pub fn to_bytes(&self, profile: &Profile) -> Vec<u8> {
        encode(&self.elements, profile)
    }
}

/// Encode an element sequence for the given profile.
pub fn encode(elements: &[Element], profile: &Profile) -> Vec<u8> {
    let out = match profile {
        Profile::Character => encode_character(elements),
        Profile::Label(setup) => encode_label(elements, setup),
    };
    debug!(
        profile = profile.name(),
        elements = elements.len(),
        bytes = out.len(),
        "encoded program"
    );
    out
}

// ============================================================================
// CHARACTER PROTOCOL (ESC/POS)
// ============================================================================

fn encode_character(elements: &[Element]) -> Vec<u8> {
    let mut out = Vec::with_capacity(elements.len() * 40 + 8);
    out.extend(escpos::init());
    out.extend(escpos::character_table(escpos::CHARACTER_TABLE));

    for element in elements {
        match element {
            Element::Text(line) => character_text(&mut out, line),
            Element::JustifiedRow {
                left,
                right,
                width,
                bold,
            } => {
                out.extend(escpos::align(Alignment::Left));
                if *bold {
                    out.extend(escpos::bold(true));
                }
                out.extend(encoding::encode(&justify(left, right, *width)));
                out.push(escpos::LF);
                if *bold {
                    out.extend(escpos::bold(false));
                }
            }
            Element::Rule { width } => {
                out.extend(escpos::align(Alignment::Left));
                out.extend(escpos::bold(true));
                out.extend(std::iter::repeat_n(b'-', *width));
                out.push(escpos::LF);
                out.extend(escpos::bold(false));
            }
            Element::Code(code) => {
                if !code.is_encodable() {
                    warn!(payload = %code.payload.escape_debug(), "code payload cannot be encoded, skipped");
                    continue;
                }
                out.extend(escpos::align(code.position));
                match code.kind {
                    CodeKind::Qr => {
                        out.extend(escpos::qr(code.payload.as_bytes(), escpos::QR_MODULE_SIZE))
                    }
                    CodeKind::Barcode => out.extend(escpos::code128(
                        code.payload.as_bytes(),
                        escpos::BARCODE_HEIGHT,
                    )),
                }
                out.push(escpos::LF);
            }
            Element::FeedCut { lines, cut } => {
                out.extend(escpos::align(Alignment::Left));
                out.extend(escpos::feed_lines(*lines));
                if *cut {
                    out.extend(escpos::cut_partial());
                }
            }
        }
    }

    out
}

fn character_text(out: &mut Vec<u8>, line: &TextLine) {
    out.extend(escpos::align(line.alignment));
    if line.double_height {
        out.extend(escpos::double_height(true));
    }
    if line.bold {
        out.extend(escpos::bold(true));
    }
    if line.underline {
        out.extend(escpos::underline(true));
    }

    out.extend(std::iter::repeat_n(b' ', line.left_padding));
    out.extend(encoding::encode(&line.content));
    out.push(escpos::LF);

    if line.underline {
        out.extend(escpos::underline(false));
    }
    if line.bold {
        out.extend(escpos::bold(false));
    }
    if line.double_height {
        out.extend(escpos::double_height(false));
    }
}

// ============================================================================
// LABEL PROTOCOL (TSPL)
// ============================================================================

/// Thickness of rules and underlines in dots.
const LINE_THICKNESS: u32 = 2;

/// Column or row count as a dot multiplier. Positions saturate instead of
/// wrapping, so oversized input yields an oversized label, not a panic.
fn dots(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Running cursor over the label body.
struct LabelCursor<'a> {
    setup: &'a LabelSetup,
    body: Vec<u8>,
    y: u32,
}

impl<'a> LabelCursor<'a> {
    fn new(setup: &'a LabelSetup) -> Self {
        Self {
            setup,
            body: Vec::new(),
            y: setup.origin_y,
        }
    }

    fn column_x(&self, column: usize) -> u32 {
        self.setup
            .origin_x
            .saturating_add(dots(column).saturating_mul(self.setup.char_width))
    }

    fn advance(&mut self, by: u32) {
        self.y = self.y.saturating_add(by);
    }

    /// Emit one text row. Bold is drawn by overprinting one dot to the
    /// right; underline is a thin bar under the row.
    fn text(&mut self, column: usize, content: &str, bold: bool, underline: bool, tall: bool) {
        let x = self.column_x(column);
        let y_scale: u8 = if tall { 2 } else { 1 };
        let row_height = self.setup.row_pitch.saturating_mul(u32::from(y_scale));
        let content = encoding::printable(content);
        let font = self.setup.font;

        self.body.extend(encoding::to_code_page(&tspl::text(
            x, self.y, font, 1, y_scale, &content,
        )));
        if bold {
            self.body.extend(encoding::to_code_page(&tspl::text(
                x.saturating_add(1),
                self.y,
                font,
                1,
                y_scale,
                &content,
            )));
        }
        if underline {
            let width = dots(content.chars().count()).saturating_mul(self.setup.char_width);
            let bar_y = self
                .y
                .saturating_add(row_height)
                .saturating_sub(LINE_THICKNESS);
            self.body
                .extend(tspl::bar(x, bar_y, width, LINE_THICKNESS).into_bytes());
        }
        self.advance(row_height);
    }

    fn rule(&mut self, width: usize) {
        let x = self.column_x(0);
        let bar_y = self
            .y
            .saturating_add(self.setup.row_pitch / 2)
            .saturating_sub(LINE_THICKNESS / 2);
        let width = dots(width).saturating_mul(self.setup.char_width);
        self.body
            .extend(tspl::bar(x, bar_y, width, LINE_THICKNESS).into_bytes());
        self.advance(self.setup.row_pitch);
    }

    fn code(&mut self, code: &Code) {
        if !code.is_encodable() {
            warn!(payload = %code.payload.escape_debug(), "code payload cannot be encoded, skipped");
            return;
        }
        let label_width = self.setup.width_mm.saturating_mul(DOTS_PER_MM);
        let size = self.setup.code_height;
        let x = match code.position {
            Alignment::Left => self.setup.origin_x,
            Alignment::Center => label_width.saturating_sub(size) / 2,
            Alignment::Right => label_width
                .saturating_sub(size)
                .saturating_sub(self.setup.origin_x),
        };

        let directive = match code.kind {
            CodeKind::Qr => tspl::qrcode(x, self.y, 'M', self.setup.qr_cell, &code.payload),
            // Leave one text row under the bars for the readable line.
            CodeKind::Barcode => tspl::barcode128(
                x,
                self.y,
                size.saturating_sub(self.setup.row_pitch).max(1),
                &code.payload,
            ),
        };
        self.body.extend(directive.into_bytes());
        self.advance(size);
    }

    fn feed(&mut self, lines: usize) {
        self.advance(dots(lines).saturating_mul(self.setup.row_pitch));
    }

    /// Label height: explicit, or derived from the last row plus a bottom
    /// margin equal to the top one.
    fn height_mm(&self) -> u32 {
        self.setup.height_mm.unwrap_or_else(|| {
            self.y
                .saturating_add(self.setup.origin_y)
                .div_ceil(DOTS_PER_MM)
        })
    }
}

fn encode_label(elements: &[Element], setup: &LabelSetup) -> Vec<u8> {
    let mut cursor = LabelCursor::new(setup);

    for element in elements {
        match element {
            Element::Text(line) => cursor.text(
                line.left_padding,
                &line.content,
                line.bold,
                line.underline,
                line.double_height,
            ),
            Element::JustifiedRow {
                left,
                right,
                width,
                bold,
            } => cursor.text(0, &justify(left, right, *width), *bold, false, false),
            Element::Rule { width } => cursor.rule(*width),
            Element::Code(code) => cursor.code(code),
            Element::FeedCut { lines, .. } => cursor.feed(*lines),
        }
    }

    let mut out = Vec::with_capacity(cursor.body.len() + 80);
    out.extend(tspl::size(setup.width_mm, cursor.height_mm()).into_bytes());
    out.extend(tspl::gap(setup.gap_mm).into_bytes());
    out.extend(tspl::codepage(tspl::CODE_PAGE).into_bytes());
    out.extend(tspl::cls().into_bytes());
    out.extend(cursor.body);
    out.extend(tspl::print(1).into_bytes());
    out
}
