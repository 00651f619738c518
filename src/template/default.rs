//! # Business Template
//!
//! The fixed receipt layout used when a document has no element override.
//!
//! ```text
//!            BARAKA SAVDO           <- bold, double height, centered
//! Sana: 05.03.2024     Vaqt: 14:07
//! Chek raqami: 1042
//! Sotuvchi: Karimov Jasur
//! --------------------------------
//! Non                               <- bold
//! (2 dona)              6 000 so'm
//! --------------------------------
//! Jami:                 6 000 so'm  <- bold
//! QQS 15%:                900 so'm
//! Naqd:                 6 000 so'm
//! Qaytim:                   0 so'm
//! --------------------------------
//!     Xaridingiz uchun rahmat!
//! ```

use super::{Labels, TAX_RATE, labeled_row, wrapped_lines};
use crate::currency::{format_amount, format_quantity};
use crate::document::{
    ItemStatus, LineItem, PageLayout, PaymentKind, ReceiptDocument, ReceiptKind,
};
use crate::ir::{Alignment, Element, Program, TextLine};
use crate::protocol::encoding::printable;

/// Lay out the business template. Feed/cut is appended by the caller.
pub fn render(doc: &ReceiptDocument, layout: &PageLayout, labels: &Labels) -> Program {
    let width = layout.page_width;
    let kind = doc.kind();
    let mut program = Program::new();

    header(&mut program, doc, width, labels);
    personnel(&mut program, doc, kind, width, labels);
    program.push(Element::Rule { width });

    for item in &doc.products {
        line_item(&mut program, item, width, labels);
    }
    program.push(Element::Rule { width });

    totals(&mut program, doc, width, labels);
    if kind == ReceiptKind::Sale {
        payments(&mut program, doc, width, labels);
    }
    program.push(Element::row(&labels.change, format_amount(0.0), width));
    program.push(Element::Rule { width });

    if kind == ReceiptKind::Sale {
        push_lines(&mut program, wrapped_lines(&labels.thanks, Alignment::Center, width));
    }
    program
}

/// Company name, date/time row, transaction id.
fn header(program: &mut Program, doc: &ReceiptDocument, width: usize, labels: &Labels) {
    for line in wrapped_lines(&printable(doc.company_name()), Alignment::Center, width) {
        program.push(line.bold().double_height());
    }

    if let Some(created_at) = doc.created_at {
        program.push(Element::row(
            format!("{}{}", labels.date, created_at.format("%d.%m.%Y")),
            format!("{}{}", labels.time, created_at.format("%H:%M")),
            width,
        ));
    }

    push_lines(
        program,
        labeled_row(&labels.transaction_id, doc.transaction_id(), width),
    );
}

/// Supplier/seller/receiver rows and the status line.
fn personnel(
    program: &mut Program,
    doc: &ReceiptDocument,
    kind: ReceiptKind,
    width: usize,
    labels: &Labels,
) {
    let rows: Vec<(&str, Option<&str>)> = match kind {
        ReceiptKind::Purchase => vec![
            (labels.supplier.as_str(), doc.supplier_name.as_deref()),
            (labels.receiver.as_str(), doc.receiver_name.as_deref()),
        ],
        ReceiptKind::Sale => vec![(labels.seller.as_str(), doc.seller_name.as_deref())],
    };

    for (label, value) in rows {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            push_lines(program, labeled_row(label, value, width));
        }
    }

    if let Some(status) = doc.status_name.as_deref() {
        push_lines(program, labeled_row(&labels.status, status, width));
    }
}

/// Bold wrapped name, then `(quantity unit)` against the line total.
fn line_item(program: &mut Program, item: &LineItem, width: usize, labels: &Labels) {
    let mut name = printable(item.name());
    if item.status == ItemStatus::Returned {
        name.push_str(&labels.returned_suffix);
    }
    for line in wrapped_lines(&name, Alignment::Left, width) {
        program.push(line.bold());
    }

    let quantity = format!(
        "({} {})",
        format_quantity(item.quantity),
        printable(item.unit_label())
    );
    program.push(Element::row(quantity, format_amount(item.line_total()), width));
}

fn totals(program: &mut Program, doc: &ReceiptDocument, width: usize, labels: &Labels) {
    if format_amount(doc.total_amount) != format_amount(doc.final_amount) {
        program.push(Element::row(
            &labels.subtotal,
            format_amount(doc.total_amount),
            width,
        ));
    }
    program.push(Element::JustifiedRow {
        left: labels.total.clone(),
        right: format_amount(doc.final_amount),
        width,
        bold: true,
    });
    program.push(Element::row(
        &labels.tax,
        format_amount(doc.final_amount * TAX_RATE),
        width,
    ));
}

fn payments(program: &mut Program, doc: &ReceiptDocument, width: usize, labels: &Labels) {
    for payment in &doc.payment_methods {
        let label = match payment.method {
            PaymentKind::Cash => &labels.cash,
            PaymentKind::Card => &labels.card,
            PaymentKind::Other => &labels.other_payment,
        };
        program.push(Element::row(label, format_amount(payment.amount), width));
    }
}

fn push_lines(program: &mut Program, lines: Vec<TextLine>) {
    program.extend(lines.into_iter().map(Element::Text));
}
