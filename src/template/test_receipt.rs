//! Diagnostic receipt for checking a freshly connected printer.

use chrono::NaiveDateTime;

use super::wrapped_lines;
use crate::currency::format_amount;
use crate::document::PageLayout;
use crate::ir::{Alignment, Element, Program, TextLine};
use crate::layout::center;
use crate::protocol::encoding::printable;

const SAMPLE_ITEMS: &[(&str, f64)] = &[("Item 1", 10000.0), ("Item 2", 15000.0)];

/// Build the fixed test receipt.
///
/// `printed_at` is printed under the title; the library never reads the
/// clock itself.
pub fn test_receipt(store_name: &str, printed_at: NaiveDateTime, layout: &PageLayout) -> Program {
    let width = layout.page_width;
    let mut program = Program::new();

    for line in wrapped_lines(&printable(store_name), Alignment::Center, width) {
        program.push(line.bold());
    }
    for text in [
        "TEST RECEIPT".to_string(),
        printed_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    ] {
        program.push(TextLine::new(center(&text, width)).align(Alignment::Center));
    }
    program.push(Element::Rule { width });

    for (name, price) in SAMPLE_ITEMS {
        program.push(Element::row(*name, format_amount(*price), width));
    }
    program.push(Element::Rule { width });

    let total: f64 = SAMPLE_ITEMS.iter().map(|(_, price)| price).sum();
    program.push(Element::JustifiedRow {
        left: "TOTAL".into(),
        right: format_amount(total),
        width,
        bold: true,
    });
    program.push(TextLine::new(center("Thank you!", width)).align(Alignment::Center));
    program.push(Element::FeedCut {
        lines: layout.feed_lines,
        cut: layout.auto_cut,
    });
    program
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_receipt_lines() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|d| d.and_hms_opt(9, 30, 15))
            .unwrap();
        let program = test_receipt("STORE NAME", at, &PageLayout::default());
        let lines: Vec<String> = program
            .lines()
            .into_iter()
            .map(|l| l.trim_end().to_string())
            .collect();
        assert_eq!(
            lines,
            vec![
                "           STORE NAME",
                "          TEST RECEIPT",
                "      2024-03-05 09:30:15",
                "--------------------------------",
                "Item 1               10 000 so'm",
                "Item 2               15 000 so'm",
                "--------------------------------",
                "TOTAL                25 000 so'm",
                "           Thank you!",
            ]
        );
        assert_eq!(
            program.elements.last(),
            Some(&Element::FeedCut { lines: 4, cut: true })
        );
    }
}
