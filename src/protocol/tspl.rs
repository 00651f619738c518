//! # TSPL Directives
//!
//! Builders for the textual label-description command set used by label
//! printers. Every directive is one line terminated with CRLF; coordinates
//! are in printer dots (8 dots/mm at 203 DPI).
//!
//! ```
//! use chekprint::protocol::tspl;
//!
//! assert_eq!(tspl::cls(), "CLS\r\n");
//! assert_eq!(tspl::print(1), "PRINT 1\r\n");
//! ```

/// Directive line terminator.
pub const CRLF: &str = "\r\n";

/// `SIZE w mm, h mm`: label width and height.
pub fn size(width_mm: u32, height_mm: u32) -> String {
    format!("SIZE {} mm, {} mm{}", width_mm, height_mm, CRLF)
}

/// `GAP g mm, 0 mm`: gap between labels.
pub fn gap(gap_mm: u32) -> String {
    format!("GAP {} mm, 0 mm{}", gap_mm, CRLF)
}

/// Code page announced to the printer, matching
/// [`crate::protocol::encoding::CODE_PAGE`].
pub const CODE_PAGE: u32 = 866;

/// `CODEPAGE n`: character set for TEXT content.
pub fn codepage(page: u32) -> String {
    format!("CODEPAGE {}{}", page, CRLF)
}

/// `CLS`: clear the image buffer.
pub fn cls() -> String {
    format!("CLS{}", CRLF)
}

/// `TEXT x,y,"font",rotation,xscale,yscale,"content"`.
///
/// Double quotes inside `content` are escaped as `\["]`.
pub fn text(x: u32, y: u32, font: &str, x_scale: u8, y_scale: u8, content: &str) -> String {
    format!(
        "TEXT {},{},\"{}\",0,{},{},\"{}\"{}",
        x,
        y,
        font,
        x_scale,
        y_scale,
        escape(content),
        CRLF
    )
}

/// `BAR x,y,width,height`: a filled rectangle, used for rules.
pub fn bar(x: u32, y: u32, width: u32, height: u32) -> String {
    format!("BAR {},{},{},{}{}", x, y, width, height, CRLF)
}

/// `QRCODE x,y,ecc,cellwidth,mode,rotation,"payload"` in auto mode.
pub fn qrcode(x: u32, y: u32, ecc: char, cell_width: u8, payload: &str) -> String {
    format!(
        "QRCODE {},{},{},{},A,0,\"{}\"{}",
        x,
        y,
        ecc,
        cell_width,
        escape(payload),
        CRLF
    )
}

/// `BARCODE x,y,"128",height,readable,rotation,narrow,wide,"payload"`.
pub fn barcode128(x: u32, y: u32, height: u32, payload: &str) -> String {
    format!(
        "BARCODE {},{},\"128\",{},1,0,2,2,\"{}\"{}",
        x,
        y,
        height,
        escape(payload),
        CRLF
    )
}

/// `PRINT n`: print `copies` labels.
pub fn print(copies: u32) -> String {
    format!("PRINT {}{}", copies, CRLF)
}

/// Escape embedded double quotes for a TSPL string literal.
fn escape(s: &str) -> String {
    s.replace('"', "\\[\"]")
}
