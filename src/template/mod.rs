//! # Template Renderer
//!
//! Turns a [`ReceiptDocument`] into a [`Program`]: the ordered, fully laid
//! out element sequence the encoders consume.
//!
//! Two modes:
//!
//! - **Default**: the fixed business template ([`default`]): header,
//!   personnel rows, items, totals, payments, footer.
//! - **Explicit**: when the document carries `template_elements`, each one
//!   is rendered literally ([`explicit`]).
//!
//! Both end with the document's feed/cut settings.
//!
//! ```
//! use chekprint::document::{LineItem, ReceiptDocument};
//! use chekprint::template;
//!
//! let doc = ReceiptDocument {
//!     products: vec![LineItem::new("Non", 1.0, 3000.0)],
//!     final_amount: 3000.0,
//!     ..Default::default()
//! };
//! let program = template::render(&doc).unwrap();
//! assert!(program.lines().iter().any(|l| l.starts_with("Jami:")));
//! ```

pub mod default;
pub mod explicit;
mod test_receipt;

pub use test_receipt::test_receipt;

use tracing::debug;

use crate::document::ReceiptDocument;
use crate::error::StructuralError;
use crate::ir::{Alignment, Element, Program, TextLine};
use crate::layout::{center, char_len, pad_left, pad_right, wrap};
use crate::protocol::encoding::printable;

/// Fixed width of the label column in labeled rows.
pub const LABEL_COLUMN: usize = 13;

/// Value-added tax rate applied to the amount due.
pub const TAX_RATE: f64 = 0.15;

/// Fixed strings printed by the business template.
///
/// Defaults are Uzbek. Callers printing in another language replace the
/// fields they need and pass the result to [`render_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub date: String,
    pub time: String,
    pub transaction_id: String,
    pub seller: String,
    pub supplier: String,
    pub receiver: String,
    pub status: String,
    /// Appended to the name of a returned item.
    pub returned_suffix: String,
    pub subtotal: String,
    pub total: String,
    pub tax: String,
    pub cash: String,
    pub card: String,
    pub other_payment: String,
    pub change: String,
    pub thanks: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            date: "Sana: ".into(),
            time: "Vaqt: ".into(),
            transaction_id: "Chek raqami: ".into(),
            seller: "Sotuvchi: ".into(),
            supplier: "Yetkazuvchi: ".into(),
            receiver: "Qabul qildi: ".into(),
            status: "Holati: ".into(),
            returned_suffix: " (Qaytarilgan)".into(),
            subtotal: "Umumiy summa:".into(),
            total: "Jami:".into(),
            tax: "QQS 15%:".into(),
            cash: "Naqd:".into(),
            card: "Plastik karta:".into(),
            other_payment: "Boshqa:".into(),
            change: "Qaytim:".into(),
            thanks: "Xaridingiz uchun rahmat!".into(),
        }
    }
}

impl Labels {
    /// The same labels reduced to characters the printer can print.
    pub fn printable(&self) -> Labels {
        Labels {
            date: printable(&self.date),
            time: printable(&self.time),
            transaction_id: printable(&self.transaction_id),
            seller: printable(&self.seller),
            supplier: printable(&self.supplier),
            receiver: printable(&self.receiver),
            status: printable(&self.status),
            returned_suffix: printable(&self.returned_suffix),
            subtotal: printable(&self.subtotal),
            total: printable(&self.total),
            tax: printable(&self.tax),
            cash: printable(&self.cash),
            card: printable(&self.card),
            other_payment: printable(&self.other_payment),
            change: printable(&self.change),
            thanks: printable(&self.thanks),
        }
    }
}

/// Render a document with the default [`Labels`].
pub fn render(doc: &ReceiptDocument) -> Result<Program, StructuralError> {
    render_with(doc, &Labels::default())
}

/// Render a document with caller-supplied labels.
///
/// Settings are validated before anything is laid out; a structural error
/// produces no output at all.
pub fn render_with(doc: &ReceiptDocument, labels: &Labels) -> Result<Program, StructuralError> {
    let layout = doc.settings.validate()?;

    let mut program = if doc.has_override() {
        explicit::render(&doc.template_elements, &layout)
    } else {
        default::render(doc, &layout, &labels.printable())
    };
    program.push(Element::FeedCut {
        lines: layout.feed_lines,
        cut: layout.auto_cut,
    });

    debug!(
        mode = if doc.has_override() { "explicit" } else { "default" },
        page_width = layout.page_width,
        elements = program.len(),
        "rendered receipt"
    );
    Ok(program)
}

// ============================================================================
// LAYOUT HELPERS
// ============================================================================

/// Lay out one line at `width` columns for an alignment.
pub(crate) fn aligned(text: &str, alignment: Alignment, width: usize) -> String {
    match alignment {
        Alignment::Left => pad_right(text, width),
        Alignment::Center => center(text, width),
        Alignment::Right => pad_left(text, width),
    }
}

/// Wrap `text` to `width` and lay out each line with `alignment`.
pub(crate) fn wrapped_lines(text: &str, alignment: Alignment, width: usize) -> Vec<TextLine> {
    wrap(text, width)
        .iter()
        .map(|line| TextLine::new(aligned(line, alignment, width)).align(alignment))
        .collect()
}

/// A `label value` row under the label-column policy.
///
/// Fits inline when `label + value` is within the page. Otherwise the value
/// wraps into the space right of a [`LABEL_COLUMN`]-wide label, with
/// continuation lines indented to the same column. Labels wider than the
/// column, or pages too narrow for one, put the label on its own line.
pub(crate) fn labeled_row(label: &str, value: &str, width: usize) -> Vec<TextLine> {
    let label_text = printable(label);
    let label = label_text.as_str();
    let value = printable(value);
    let inline = format!("{}{}", label, value);
    if char_len(&inline) <= width {
        return vec![TextLine::new(pad_right(&inline, width))];
    }

    if char_len(label) > LABEL_COLUMN || width < LABEL_COLUMN + 2 {
        let mut lines = vec![TextLine::new(pad_right(label.trim_end(), width))];
        lines.extend(
            wrap(&value, width)
                .iter()
                .map(|chunk| TextLine::new(pad_right(chunk, width))),
        );
        return lines;
    }

    let gutter = " ".repeat(LABEL_COLUMN);
    wrap(&value, width - LABEL_COLUMN)
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            let lead = if i == 0 {
                pad_right(label, LABEL_COLUMN)
            } else {
                gutter.clone()
            };
            TextLine::new(pad_right(&format!("{}{}", lead, chunk), width))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TemplateSettings;

    #[test]
    fn test_labeled_row_inline() {
        let lines = labeled_row("Chek raqami: ", "123", 32);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].content, pad_right("Chek raqami: 123", 32));
        assert_eq!(char_len(&lines[0].content), 32);
    }

    #[test]
    fn test_labeled_row_wraps_into_value_column() {
        let lines = labeled_row("Sotuvchi: ", "Abdurahmonov Abdulaziz Abdullayevich", 32);
        let texts: Vec<&str> = lines.iter().map(|l| l.content.trim_end()).collect();
        assert_eq!(
            texts,
            vec![
                "Sotuvchi:    Abdurahmonov",
                "             Abdulaziz",
                "             Abdullayevich",
            ]
        );
        assert!(lines.iter().all(|l| char_len(&l.content) == 32));
    }

    #[test]
    fn test_labeled_row_narrow_page() {
        let lines = labeled_row("Holati: ", "Yakunlangan", 12);
        let texts: Vec<&str> = lines.iter().map(|l| l.content.trim_end()).collect();
        assert_eq!(texts, vec!["Holati:", "Yakunlangan"]);
    }

    #[test]
    fn test_labeled_row_long_label() {
        let lines = labeled_row("Mas'ul shaxs ismi: ", "Karimov Jasur Botirovich", 32);
        assert_eq!(lines[0].content.trim_end(), "Mas'ul shaxs ismi:");
        assert_eq!(lines[1].content.trim_end(), "Karimov Jasur Botirovich");
    }

    #[test]
    fn test_wrapped_lines_center() {
        let lines = wrapped_lines("ab", Alignment::Center, 6);
        assert_eq!(lines[0].content, "  ab  ");
        assert_eq!(lines[0].alignment, Alignment::Center);
    }

    #[test]
    fn test_structural_error_produces_nothing() {
        let doc = ReceiptDocument {
            settings: TemplateSettings::new(0, true, 4),
            ..Default::default()
        };
        assert_eq!(render(&doc), Err(StructuralError::PageWidth(0)));
    }

    #[test]
    fn test_program_ends_with_feed_cut() {
        let doc = ReceiptDocument {
            settings: TemplateSettings::new(32, false, 2),
            ..Default::default()
        };
        let program = render(&doc).unwrap();
        assert_eq!(
            program.elements.last(),
            Some(&Element::FeedCut {
                lines: 2,
                cut: false
            })
        );
    }
}
