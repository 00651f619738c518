//! # Element Overrides
//!
//! Renders caller-supplied [`TemplateElement`]s literally, one after the
//! other. Unknown element types and empty or unencodable code payloads
//! are skipped; unknown alignment tags fall back to left.

use tracing::warn;

use super::{aligned, wrapped_lines};
use crate::document::{
    AlignTag, CodeElement, MAX_FEED_LINES, PageLayout, TemplateElement, TextElement,
};
use crate::ir::{Alignment, Code, CodeKind, Element, Program, TextLine};
use crate::layout::{justify, pad_right, wrap};
use crate::protocol::encoding::printable;

/// Lay out override elements. Feed/cut is appended by the caller.
pub fn render(elements: &[TemplateElement], layout: &PageLayout) -> Program {
    let width = layout.page_width;
    let mut program = Program::new();

    for (i, element) in elements.iter().enumerate() {
        match element {
            TemplateElement::Text(text) => {
                program.extend(text_lines(text, width).into_iter().map(Element::Text))
            }
            TemplateElement::Rule(rule) => program.push(Element::Rule {
                width: rule.width.unwrap_or(width).clamp(1, width),
            }),
            TemplateElement::Qr(code) => push_code(&mut program, i, code, CodeKind::Qr),
            TemplateElement::Barcode(code) => push_code(&mut program, i, code, CodeKind::Barcode),
            TemplateElement::Feed(feed) => program.push(Element::FeedCut {
                lines: feed.lines.min(MAX_FEED_LINES),
                cut: feed.cut,
            }),
            TemplateElement::Unknown => warn!("template element {} has unknown type, skipped", i),
        }
    }
    program
}

fn alignment(tag: AlignTag) -> Alignment {
    match tag {
        AlignTag::Left | AlignTag::Justified => Alignment::Left,
        AlignTag::Center => Alignment::Center,
        AlignTag::Right => Alignment::Right,
        AlignTag::Unknown => {
            warn!("unknown alignment tag, using left");
            Alignment::Left
        }
    }
}

/// Wrap a text element to the width left after padding and apply its style.
fn text_lines(text: &TextElement, width: usize) -> Vec<TextLine> {
    let padding = text.padding.min(width.saturating_sub(1));
    let available = width - padding;
    let content = printable(text.content.as_deref().unwrap_or(""));

    let lines = if text.alignment == AlignTag::Justified {
        justified_lines(&content, &printable(text.value.as_deref().unwrap_or("")), available)
    } else {
        wrapped_lines(&content, alignment(text.alignment), available)
    };

    lines
        .into_iter()
        .map(|mut line| {
            line.bold = text.bold;
            line.underline = text.underline;
            line.double_height = text.double_height;
            line.left_padding = padding;
            line
        })
        .collect()
}

/// Content wrapped to leave room for the value; the value is justified
/// against the last line.
fn justified_lines(content: &str, value: &str, width: usize) -> Vec<TextLine> {
    let mut chunks = wrap(content, width);
    let last = chunks.pop().unwrap_or_default();
    let mut lines: Vec<TextLine> = chunks
        .iter()
        .map(|chunk| TextLine::new(pad_right(chunk, width)))
        .collect();
    let row = if value.is_empty() {
        aligned(&last, Alignment::Left, width)
    } else {
        justify(&last, value, width)
    };
    lines.push(TextLine::new(row));
    lines
}

fn push_code(program: &mut Program, index: usize, code: &CodeElement, kind: CodeKind) {
    let payload = code.payload.as_deref().map(str::trim).unwrap_or("");
    if payload.is_empty() {
        warn!("template element {} has no payload, skipped", index);
        return;
    }
    let code = Code {
        kind,
        payload: payload.to_string(),
        position: alignment(code.position),
    };
    if code.is_encodable() {
        program.push(Element::Code(code));
    } else {
        warn!("template element {} has a payload the printer cannot encode, skipped", index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{FeedElement, RuleElement};
    use crate::layout::char_len;
    use pretty_assertions::assert_eq;

    fn layout() -> PageLayout {
        PageLayout::default()
    }

    #[test]
    fn test_long_centered_text_wraps() {
        let name = "Toshkent shahar markaziy savdo kompleksi";
        assert_eq!(char_len(name), 40);
        let elements = vec![TemplateElement::Text(
            TextElement::new(name).align(AlignTag::Center),
        )];
        let program = render(&elements, &layout());
        assert_eq!(
            program.lines(),
            vec![
                " Toshkent shahar markaziy savdo ".to_string(),
                "           kompleksi            ".to_string(),
            ]
        );
    }

    #[test]
    fn test_style_flags_carried() {
        let text = TextElement {
            content: Some("Aksiya".into()),
            bold: true,
            underline: true,
            double_height: true,
            ..Default::default()
        };
        let program = render(&[TemplateElement::Text(text)], &layout());
        match &program.elements[0] {
            Element::Text(line) => {
                assert!(line.bold && line.underline && line.double_height);
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_padding_narrows_wrap_width() {
        let text = TextElement {
            content: Some("aaaa bbbb".into()),
            padding: 26,
            ..Default::default()
        };
        let program = render(&[TemplateElement::Text(text)], &layout());
        assert_eq!(program.len(), 2);
        for element in program.iter() {
            match element {
                Element::Text(line) => {
                    assert_eq!(line.left_padding, 26);
                    assert_eq!(char_len(&line.content), 6);
                }
                other => panic!("expected text, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_justified_text() {
        let text = TextElement {
            content: Some("Bonus:".into()),
            value: Some("500".into()),
            alignment: AlignTag::Justified,
            ..Default::default()
        };
        let program = render(&[TemplateElement::Text(text)], &layout());
        assert_eq!(program.lines(), vec![justify("Bonus:", "500", 32)]);
    }

    #[test]
    fn test_unknown_alignment_is_left() {
        let text = TextElement::new("x").align(AlignTag::Unknown);
        let program = render(&[TemplateElement::Text(text)], &layout());
        assert_eq!(program.lines(), vec![pad_right("x", 32)]);
    }

    #[test]
    fn test_unknown_and_empty_elements_skipped() {
        let elements = vec![
            TemplateElement::Unknown,
            TemplateElement::Qr(CodeElement::default()),
            TemplateElement::Rule(RuleElement { width: None }),
        ];
        let program = render(&elements, &layout());
        assert_eq!(program.elements, vec![Element::Rule { width: 32 }]);
    }

    #[test]
    fn test_codes_and_feed() {
        let elements = vec![
            TemplateElement::Qr(CodeElement {
                payload: Some("https://example.uz".into()),
                position: AlignTag::Center,
            }),
            TemplateElement::Barcode(CodeElement {
                payload: Some("4780000000011".into()),
                position: AlignTag::Left,
            }),
            TemplateElement::Feed(FeedElement { lines: 1, cut: false }),
        ];
        let program = render(&elements, &layout());
        assert_eq!(
            program.elements,
            vec![
                Element::Code(Code {
                    kind: CodeKind::Qr,
                    payload: "https://example.uz".into(),
                    position: Alignment::Center,
                }),
                Element::Code(Code {
                    kind: CodeKind::Barcode,
                    payload: "4780000000011".into(),
                    position: Alignment::Left,
                }),
                Element::FeedCut { lines: 1, cut: false },
            ]
        );
    }
}
