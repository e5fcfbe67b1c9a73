//! # `hexviewlib`
//!
//! `hexviewlib` is the rendering and selection-mapping engine of a hex viewer.
//!
//! The library provides:
//! - A block store for byte buffers loaded at arbitrary addresses (via [`HexView`] struct).
//! - Fixed-layout hex/ASCII dumps at 8, 16, 32 and 64-bit word widths, in either byte order.
//! - Translation of an address range into the character spans of the dump that show it.
//! - Byte, ASCII and regex search over the loaded data.
//! - Error handling with [`HexViewError`].
//!
//! ## Example
//!
//! ```
//! use hexviewlib::{HexView, LineOffset, RenderConfig, WordWidth};
//!
//! let mut view = HexView::new();
//! view.add_data((0u8..32).collect::<Vec<_>>(), 0x1000).unwrap();
//!
//! let config = RenderConfig::new(WordWidth::Bits32, true);
//! let dump = view.render_all(config);
//! assert!(dump.starts_with("0x0000000000001000  03020100 07060504"));
//!
//! let spans = view.mark_regions(0x1004, 4, config).unwrap();
//! assert_eq!(spans, vec![LineOffset { line: 0, char_offset: 29, char_count: 8 }]);
//! ```

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]

mod config;
mod dump;
mod error;
mod format;
mod hexview;
mod mark;
mod search;

// Public APIs
pub use config::{RenderConfig, WordWidth};
pub use error::{HexViewError, HexViewErrorKind};
pub use format::{
    ADDRESS_FIELD_WIDTH, ASCII_FIELD_START, BYTES_PER_LINE, HEX_FIELD_START, HEX_FIELD_WIDTH,
    format_ascii, format_hex, format_line, grouped_hex_width, render_line,
};
pub use hexview::{DataBlock, HexView};
pub use mark::{LineOffset, LineOffsetList, hex_pair_offset};
pub use search::SearchType;
