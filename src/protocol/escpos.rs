//! # ESC/POS Commands
//!
//! Opcode builders for the character-oriented command set spoken by common
//! 58mm Bluetooth receipt printers (Xprinter, Goojprt and friends).
//!
//! ## Escape Sequence Structure
//!
//! - Single byte: `LF`
//! - Prefixed with parameter: `ESC a n`, `ESC E n`, `GS ! n`
//! - Length-prefixed data: `GS ( k pL pH cn fn ...`, `GS k m n data`
//!
//! Multi-byte lengths are **little-endian**.

use crate::ir::Alignment;

// ============================================================================
// CONTROL BYTES
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
pub const GS: u8 = 0x1D;

/// LF (Line Feed) - Print the line buffer and advance one line
pub const LF: u8 = 0x0A;

/// Character table selected after initialization: PC866 Cyrillic (`ESC t 17`).
pub const CHARACTER_TABLE: u8 = 0x11;

// ============================================================================
// PRINTER CONTROL
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Clears the print buffer and resets text formatting, alignment and size
/// to power-on defaults.
///
/// | Format | Bytes |
/// |--------|-------|
/// | ASCII  | ESC @ |
/// | Hex    | 1B 40 |
///
/// ```
/// use chekprint::protocol::escpos;
///
/// assert_eq!(escpos::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

/// # Select Character Code Table (ESC t n)
///
/// | Format | Bytes    |
/// |--------|----------|
/// | ASCII  | ESC t n  |
/// | Hex    | 1B 74 n  |
#[inline]
pub fn character_table(table: u8) -> Vec<u8> {
    vec![ESC, b't', table]
}

/// # Partial Cut (GS V 1)
///
/// Cuts the paper leaving a small hinge so the receipt does not drop.
///
/// | Format | Bytes    |
/// |--------|----------|
/// | ASCII  | GS V 1   |
/// | Hex    | 1D 56 01 |
#[inline]
pub fn cut_partial() -> Vec<u8> {
    vec![GS, b'V', 0x01]
}

/// Feed `lines` blank lines using plain `LF` bytes.
#[inline]
pub fn feed_lines(lines: usize) -> Vec<u8> {
    vec![LF; lines]
}

// ============================================================================
// TEXT STYLE
// ============================================================================

/// # Set Justification (ESC a n)
///
/// | n  | Alignment |
/// |----|-----------|
/// | 00 | Left      |
/// | 01 | Center    |
/// | 02 | Right     |
///
/// Takes effect at the start of the next line.
#[inline]
pub fn align(alignment: Alignment) -> Vec<u8> {
    vec![ESC, b'a', alignment as u8]
}

/// # Emphasized Mode (ESC E n)
#[inline]
pub fn bold(enabled: bool) -> Vec<u8> {
    vec![ESC, b'E', enabled as u8]
}

/// # Underline Mode (ESC - n)
#[inline]
pub fn underline(enabled: bool) -> Vec<u8> {
    vec![ESC, b'-', enabled as u8]
}

/// # Character Size (GS ! n)
///
/// Only the double-height bit is used; the column grid stays intact because
/// width is unchanged.
#[inline]
pub fn double_height(enabled: bool) -> Vec<u8> {
    vec![GS, b'!', enabled as u8]
}

// ============================================================================
// CODES
// ============================================================================

/// QR module size in dots.
pub const QR_MODULE_SIZE: u8 = 6;

/// CODE128 bar height in dots.
pub const BARCODE_HEIGHT: u8 = 80;

/// # QR Code (GS ( k)
///
/// Emits the four-function sequence:
///
/// 1. Function 165: select model 2
/// 2. Function 167: module size
/// 3. Function 169: error correction level M
/// 4. Function 180: store `data` in the symbol area
/// 5. Function 181: print the stored symbol
///
/// Payloads longer than 65532 bytes are truncated to the protocol limit.
pub fn qr(data: &[u8], module_size: u8) -> Vec<u8> {
    let data = &data[..data.len().min(u16::MAX as usize - 3)];
    let mut out = Vec::with_capacity(data.len() + 34);

    out.extend([GS, b'(', b'k', 0x04, 0x00, 0x31, 0x41, 0x32, 0x00]);
    out.extend([GS, b'(', b'k', 0x03, 0x00, 0x31, 0x43, module_size.clamp(1, 16)]);
    out.extend([GS, b'(', b'k', 0x03, 0x00, 0x31, 0x45, 0x31]);

    let len = (data.len() + 3) as u16;
    let [p_l, p_h] = len.to_le_bytes();
    out.extend([GS, b'(', b'k', p_l, p_h, 0x31, 0x50, 0x30]);
    out.extend(data);

    out.extend([GS, b'(', b'k', 0x03, 0x00, 0x31, 0x51, 0x30]);
    out
}

/// # CODE128 Barcode (GS k 73 n)
///
/// Sets the bar height (`GS h`) and module width (`GS w`), prints the human
/// readable text below the bars (`GS H 2`), then sends the data in code set
/// B (`{B` prefix). Set B only covers printable ASCII: other bytes are left
/// out, and a literal `{` is sent as `{{`. Data longer than 253 bytes is
/// truncated.
pub fn code128(data: &[u8], height: u8) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len().min(253));
    for &b in data.iter().filter(|b| (0x20..0x7F).contains(*b)) {
        let width = if b == b'{' { 2 } else { 1 };
        if body.len() + width > 253 {
            break;
        }
        if b == b'{' {
            body.push(b'{');
        }
        body.push(b);
    }

    let mut out = Vec::with_capacity(body.len() + 14);
    out.extend([GS, b'h', height.max(1)]);
    out.extend([GS, b'w', 0x02]);
    out.extend([GS, b'H', 0x02]);
    out.extend([GS, b'k', 73, (body.len() + 2) as u8, b'{', b'B']);
    out.extend(body);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcodes() {
        assert_eq!(init(), vec![0x1B, 0x40]);
        assert_eq!(character_table(CHARACTER_TABLE), vec![0x1B, 0x74, 0x11]);
        assert_eq!(cut_partial(), vec![0x1D, 0x56, 0x01]);
        assert_eq!(bold(true), vec![0x1B, 0x45, 0x01]);
        assert_eq!(bold(false), vec![0x1B, 0x45, 0x00]);
        assert_eq!(underline(true), vec![0x1B, 0x2D, 0x01]);
        assert_eq!(double_height(true), vec![0x1D, 0x21, 0x01]);
        assert_eq!(double_height(false), vec![0x1D, 0x21, 0x00]);
    }

    #[test]
    fn test_align() {
        assert_eq!(align(Alignment::Left), vec![0x1B, 0x61, 0x00]);
        assert_eq!(align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
        assert_eq!(align(Alignment::Right), vec![0x1B, 0x61, 0x02]);
    }

    #[test]
    fn test_feed_lines() {
        assert_eq!(feed_lines(3), vec![LF, LF, LF]);
        assert!(feed_lines(0).is_empty());
    }

    #[test]
    fn test_qr_store_length() {
        let cmd = qr(b"12345", 6);
        // store header: GS ( k pL pH 31 50 30
        let store = [GS, b'(', b'k', 8, 0, 0x31, 0x50, 0x30];
        let pos = cmd
            .windows(store.len())
            .position(|w| w == store)
            .expect("store function present");
        assert_eq!(&cmd[pos + store.len()..pos + store.len() + 5], b"12345");
        // print function closes the sequence
        assert!(cmd.ends_with(&[GS, b'(', b'k', 0x03, 0x00, 0x31, 0x51, 0x30]));
    }

    #[test]
    fn test_code128() {
        let cmd = code128(b"ABC", BARCODE_HEIGHT);
        assert!(cmd.ends_with(&[GS, b'k', 73, 5, b'{', b'B', b'A', b'B', b'C']));
    }

    #[test]
    fn test_code128_set_b_only() {
        let cmd = code128("A\nБ{".as_bytes(), BARCODE_HEIGHT);
        assert!(cmd.ends_with(&[GS, b'k', 73, 5, b'{', b'B', b'A', b'{', b'{']));
    }
}
