//! The `format` module renders a single dump line: a fixed-width address, a hex field
//! grouped into words of the configured width, and an ASCII field.
//!
//! Layout of one line (offsets in characters):
//! ```text
//! 0x0000000000001000  00 11 22 33 44 55 66 77 88 99 aa bb cc dd ee ff  ..\"3DUfw........
//! ^0                  ^20 (HEX_FIELD_START)                            ^69 (ASCII_FIELD_START)
//! ```
//! The hex field is always padded to the width of the 8-bit rendering, so the ASCII
//! column starts at the same offset for every word width.

use crate::config::{RenderConfig, WordWidth};

/// Number of bytes rendered on one line, regardless of the word width.
pub const BYTES_PER_LINE: usize = 16;

const ADDRESS_PREFIX: &str = "0x";
const ADDRESS_DIGITS: usize = 16;

/// Separator between the address, hex and ASCII fields.
pub const FIELD_SEPARATOR: &str = "  ";

/// Width of the `0x`-prefixed, zero-padded address.
pub const ADDRESS_FIELD_WIDTH: usize = ADDRESS_PREFIX.len() + ADDRESS_DIGITS;

/// Offset of the first hex digit of a line.
pub const HEX_FIELD_START: usize = ADDRESS_FIELD_WIDTH + FIELD_SEPARATOR.len();

/// Width of the hex field of a full line, taken from the byte-granular layout.
pub const HEX_FIELD_WIDTH: usize = grouped_hex_width(WordWidth::Bits8);

/// Offset of the first ASCII character of a line.
pub const ASCII_FIELD_START: usize = HEX_FIELD_START + HEX_FIELD_WIDTH + FIELD_SEPARATOR.len();

/// Width of a full line's hex digits when grouped into words of `width`.
#[must_use]
pub const fn grouped_hex_width(width: WordWidth) -> usize {
    let words = BYTES_PER_LINE.div_ceil(width.bytes());
    BYTES_PER_LINE * 2 + (words - 1)
}

/// Renders up to 16 bytes as hex words separated by single spaces, without padding.
/// Bytes past the 16th are ignored.
///
/// # Example
/// ```
/// use hexviewlib::{RenderConfig, WordWidth, format_hex};
///
/// let data = [0x00, 0x11, 0x22, 0x33];
/// let config = RenderConfig::new(WordWidth::Bits16, true);
///
/// assert_eq!(format_hex(&data, config), "1100 3322");
/// ```
#[must_use]
pub fn format_hex(bytes: &[u8], config: RenderConfig) -> String {
    let bytes = &bytes[..bytes.len().min(BYTES_PER_LINE)];
    let mut out = String::with_capacity(HEX_FIELD_WIDTH);

    for (i, word) in bytes.chunks(config.word_width.bytes()).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        push_word(&mut out, word, config);
    }

    out
}

/// Renders up to 16 bytes as printable ASCII, replacing everything outside `0x20..=0x7e`
/// with a `.`. Always in address order.
///
/// # Example
/// ```
/// use hexviewlib::format_ascii;
///
/// assert_eq!(format_ascii(b"Hi!\x00\xff"), "Hi!..");
/// ```
#[must_use]
pub fn format_ascii(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take(BYTES_PER_LINE)
        .map(|&b| {
            if b == b' ' || b.is_ascii_graphic() {
                char::from(b)
            } else {
                '.'
            }
        })
        .collect()
}

/// Formats one line of up to 16 bytes into its hex field (padded to [`HEX_FIELD_WIDTH`])
/// and its ASCII field.
///
/// `address` is the address of the first byte. It does not influence either field and is
/// accepted so callers can pass a line exactly as it is stored.
#[must_use]
pub fn format_line(bytes: &[u8], _address: u64, config: RenderConfig) -> (String, String) {
    let hex = format!(
        "{:<width$}",
        format_hex(bytes, config),
        width = HEX_FIELD_WIDTH
    );
    (hex, format_ascii(bytes))
}

/// Renders a complete dump line including the trailing newline.
///
/// # Example
/// ```
/// use hexviewlib::{RenderConfig, render_line};
///
/// let line = render_line(b"AB", 0x10, RenderConfig::default());
/// assert_eq!(line.len(), 72);
/// assert!(line.starts_with("0x0000000000000010  41 42 "));
/// assert!(line.ends_with("  AB\n"));
/// ```
#[must_use]
pub fn render_line(bytes: &[u8], address: u64, config: RenderConfig) -> String {
    let mut out = String::with_capacity(ASCII_FIELD_START + BYTES_PER_LINE + 1);
    push_line(&mut out, bytes, address, config);
    out
}

/// Appends a complete dump line to `out`.
pub(crate) fn push_line(out: &mut String, bytes: &[u8], address: u64, config: RenderConfig) {
    let (hex, ascii) = format_line(bytes, address, config);

    out.push_str(ADDRESS_PREFIX);
    out.push_str(&format!("{address:0width$x}", width = ADDRESS_DIGITS));
    out.push_str(FIELD_SEPARATOR);
    out.push_str(&hex);
    out.push_str(FIELD_SEPARATOR);
    out.push_str(&ascii);
    out.push('\n');
}

/// Appends one word. Full words go through the integer type of their width,
/// so little-endian simply means reading the word as a little-endian integer.
fn push_word(out: &mut String, word: &[u8], config: RenderConfig) {
    let le = config.little_endian;

    let rendered = match config.word_width {
        WordWidth::Bits8 => word.first().map(|b| format!("{b:02x}")),
        WordWidth::Bits16 => <[u8; 2]>::try_from(word).ok().map(|w| {
            let v = if le {
                u16::from_le_bytes(w)
            } else {
                u16::from_be_bytes(w)
            };
            format!("{v:04x}")
        }),
        WordWidth::Bits32 => <[u8; 4]>::try_from(word).ok().map(|w| {
            let v = if le {
                u32::from_le_bytes(w)
            } else {
                u32::from_be_bytes(w)
            };
            format!("{v:08x}")
        }),
        WordWidth::Bits64 => <[u8; 8]>::try_from(word).ok().map(|w| {
            let v = if le {
                u64::from_le_bytes(w)
            } else {
                u64::from_be_bytes(w)
            };
            format!("{v:016x}")
        }),
    };

    match rendered {
        Some(s) => out.push_str(&s),
        None => push_partial_word(out, word, config),
    }
}

/// Appends a word cut short by the end of a block.
///
/// Every present byte stays in the slot it would occupy in a full word; in
/// little-endian order the missing high-order slots come first and are left blank.
fn push_partial_word(out: &mut String, word: &[u8], config: RenderConfig) {
    let bpw = config.word_width.bytes();

    if config.little_endian {
        for slot in 0..bpw {
            match word.get(bpw - 1 - slot) {
                Some(b) => out.push_str(&format!("{b:02x}")),
                None => out.push_str("  "),
            }
        }
    } else {
        for b in word {
            out.push_str(&format!("{b:02x}"));
        }
    }
}
