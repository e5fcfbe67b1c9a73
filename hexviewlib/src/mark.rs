//! The `mark` module maps a selected address range onto the characters of the rendered
//! dump that display those bytes, so a UI can highlight them without knowing how lines
//! are formatted.

use crate::config::RenderConfig;
use crate::error::{HexViewError, HexViewErrorKind};
use crate::format::{BYTES_PER_LINE, HEX_FIELD_START};
use crate::hexview::HexView;

/// Characters used by one byte in the hex field.
const CHARS_PER_BYTE: usize = 2;

/// Contiguous run of highlighted characters on one rendered line.
///
/// `char_offset` counts from the first character of the line (the `0` of `0x`).
/// Ordering is by line, then offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineOffset {
    pub line: usize,
    pub char_offset: usize,
    pub char_count: usize,
}

pub type LineOffsetList = Vec<LineOffset>;

/// Offset (from the start of a rendered line) of the hex digit pair that shows the byte
/// at `intra_line_byte` (0..16) under `config`.
///
/// # Example
/// ```
/// use hexviewlib::{RenderConfig, WordWidth, hex_pair_offset};
///
/// // 9th byte of a line, byte-granular: after the address and eight "xx " groups
/// assert_eq!(hex_pair_offset(8, RenderConfig::default()), 44);
///
/// // 1st byte of a little-endian 32-bit word is shown last
/// let config = RenderConfig::new(WordWidth::Bits32, true);
/// assert_eq!(hex_pair_offset(0, config), 26);
/// ```
#[must_use]
pub const fn hex_pair_offset(intra_line_byte: usize, config: RenderConfig) -> usize {
    let bytes_per_word = config.word_width.bytes();
    let word_index = intra_line_byte / bytes_per_word;
    let byte_in_word = intra_line_byte % bytes_per_word;

    let display_byte_in_word = if config.little_endian {
        bytes_per_word - 1 - byte_in_word
    } else {
        byte_in_word
    };

    // Every full word before this one takes its digits plus one separator
    HEX_FIELD_START
        + word_index * (bytes_per_word * CHARS_PER_BYTE + 1)
        + display_byte_in_word * CHARS_PER_BYTE
}

impl HexView {
    /// Computes the highlight spans for `byte_count` bytes starting at `start_address`,
    /// to be applied to a dump rendered with the same `config`.
    ///
    /// Spans are sorted by line and offset. Spans that touch on the same line are merged;
    /// the single space between two words is never highlighted, so a selection covering
    /// several words yields one span per word.
    ///
    /// # Errors
    /// - Returns an error if any selected address is not held by a loaded block.
    ///   A selection may run from one block into another only if the blocks are adjacent
    ///   in the address space.
    /// - Returns an error if the selection runs past the end of the 64-bit address space.
    ///
    /// # Example
    /// ```
    /// use hexviewlib::{HexView, LineOffset, RenderConfig};
    ///
    /// let mut view = HexView::new();
    /// view.add_data((0u8..16).collect::<Vec<_>>(), 0x1000).unwrap();
    ///
    /// let spans = view.mark_regions(0x1008, 2, RenderConfig::default()).unwrap();
    /// assert_eq!(
    ///     spans,
    ///     vec![
    ///         LineOffset { line: 0, char_offset: 44, char_count: 2 },
    ///         LineOffset { line: 0, char_offset: 47, char_count: 2 },
    ///     ]
    /// );
    /// ```
    pub fn mark_regions(
        &self,
        start_address: u64,
        byte_count: usize,
        config: RenderConfig,
    ) -> Result<LineOffsetList, HexViewError> {
        let spans = self.byte_spans(start_address, byte_count, config)?;
        let merged = coalesce(spans);

        tracing::trace!(
            start_address,
            byte_count,
            word_width = config.word_width.bits(),
            little_endian = config.little_endian,
            spans = merged.len(),
            "computed mark regions"
        );

        Ok(merged)
    }

    /// One two-character span per selected byte, sorted. Fails before producing
    /// anything if any address of the range is unknown.
    fn byte_spans(
        &self,
        start_address: u64,
        byte_count: usize,
        config: RenderConfig,
    ) -> Result<LineOffsetList, HexViewError> {
        if byte_count == 0 {
            return Ok(Vec::new());
        }

        let range_fits = u64::try_from(byte_count - 1)
            .ok()
            .and_then(|span| start_address.checked_add(span))
            .is_some();
        if !range_fits {
            return Err(HexViewError::AddressNotFound(
                HexViewErrorKind::RangeOverflow(start_address),
            ));
        }

        // Grown per block: byte_count is unchecked until every address is located
        let mut spans = Vec::new();
        let mut address = start_address;
        let mut remaining = byte_count;

        while remaining > 0 {
            let (block, offset) =
                self.locate(address)
                    .ok_or(HexViewError::AddressNotFound(HexViewErrorKind::NoBlockAt(
                        address,
                    )))?;

            let take = remaining.min(block.len() - offset);
            spans.extend((offset..offset + take).map(|byte_offset| LineOffset {
                line: block.first_line() + byte_offset / BYTES_PER_LINE,
                char_offset: hex_pair_offset(byte_offset % BYTES_PER_LINE, config),
                char_count: CHARS_PER_BYTE,
            }));

            remaining -= take;
            if remaining > 0 {
                // Range end was checked above, so the next address exists
                address = block.last_address() + 1;
            }
        }

        spans.sort_unstable();
        Ok(spans)
    }
}

/// Merge spans that are character-contiguous on the same line. Expects sorted input.
fn coalesce(spans: LineOffsetList) -> LineOffsetList {
    let mut merged: LineOffsetList = Vec::with_capacity(spans.len());

    for span in spans {
        match merged.last_mut() {
            Some(prev)
                if prev.line == span.line
                    && prev.char_offset + prev.char_count == span.char_offset =>
            {
                prev.char_count += span.char_count;
            }
            _ => merged.push(span),
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WordWidth;
    use crate::format::HEX_FIELD_WIDTH;

    const fn span(line: usize, char_offset: usize, char_count: usize) -> LineOffset {
        LineOffset {
            line,
            char_offset,
            char_count,
        }
    }

    fn cfg(width: WordWidth, little_endian: bool) -> RenderConfig {
        RenderConfig::new(width, little_endian)
    }

    /// Two zero-filled lines at address 0.
    fn zero_view() -> HexView {
        let mut view = HexView::new();
        assert!(view.add_data(vec![0u8; 32], 0).is_ok());
        view
    }

    /// Reads a selection out of a picture of the dump: `X` marks highlighted characters.
    /// Returns the selection start (taken from the first line), its size, and the spans
    /// the picture shows.
    fn read_mask(mask: &str) -> (u64, usize, LineOffsetList) {
        let mut spans = Vec::new();

        for (line, text) in mask.lines().enumerate() {
            let chars = text.as_bytes();
            let mut i = 0;
            while i < chars.len() {
                if chars[i] == b'X' {
                    let start = i;
                    while i < chars.len() && chars[i] == b'X' {
                        i += 1;
                    }
                    spans.push(span(line, start, i - start));
                } else {
                    i += 1;
                }
            }
        }

        let first_line = mask.lines().next().unwrap_or_default();
        let zeros = first_line[HEX_FIELD_START..HEX_FIELD_START + HEX_FIELD_WIDTH]
            .chars()
            .take_while(|&c| c != 'X')
            .filter(|&c| c == '0')
            .count();
        let size = mask.matches('X').count() / 2;

        ((zeros / 2) as u64, size, spans)
    }

    #[test]
    fn test_hex_pair_offset_byte_granular() {
        for i in 0..BYTES_PER_LINE {
            assert_eq!(hex_pair_offset(i, cfg(WordWidth::Bits8, false)), 20 + i * 3);
            assert_eq!(hex_pair_offset(i, cfg(WordWidth::Bits8, true)), 20 + i * 3);
        }
    }

    #[test]
    fn test_hex_pair_offset_little_endian_mirrors_word() {
        // 16-bit: "1100 3322 ..."
        assert_eq!(hex_pair_offset(0, cfg(WordWidth::Bits16, true)), 22);
        assert_eq!(hex_pair_offset(1, cfg(WordWidth::Bits16, true)), 20);
        assert_eq!(hex_pair_offset(2, cfg(WordWidth::Bits16, true)), 27);

        // 64-bit: "7766554433221100 ffeeddccbbaa9988"
        assert_eq!(hex_pair_offset(0, cfg(WordWidth::Bits64, true)), 34);
        assert_eq!(hex_pair_offset(7, cfg(WordWidth::Bits64, true)), 20);
        assert_eq!(hex_pair_offset(8, cfg(WordWidth::Bits64, true)), 51);
        assert_eq!(hex_pair_offset(15, cfg(WordWidth::Bits64, true)), 37);
    }

    #[test]
    fn test_mark_masks() {
        let masks = [
            (
                WordWidth::Bits8,
                "0x0000000000000000  00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00  ................\n",
            ),
            (
                WordWidth::Bits8,
                "0x0000000000000000  00 00 00 00 00 00 00 00 XX XX 00 00 00 00 00 00  ........xx......\n",
            ),
            (
                WordWidth::Bits16,
                "0x0000000000000000  0000 0000 0000 0000 0000 0000 0000 00XX          ...............x\n\
                 0x0000000000000010  XXXX 0000 0000 0000 0000 0000 0000 0000          xx..............\n",
            ),
            (
                WordWidth::Bits32,
                "0x0000000000000000  00000000 00000000 000000XX XXXXXXXX              ...........xxxxx\n\
                 0x0000000000000010  XXXXXXXX XXXXXXXX XXXXXXXX XX000000              xxxxxxxxxxxxx...\n",
            ),
        ];
        let view = zero_view();

        for (width, mask) in masks {
            // Arrange
            let (start, size, expected) = read_mask(mask);

            // Act
            let res = view.mark_regions(start, size, cfg(width, false));

            // Assert
            assert_eq!(res, Ok(expected), "mask:\n{mask}");
        }
    }

    #[test]
    fn test_mark_little_endian_word_is_one_span() {
        // Arrange
        let view = zero_view();

        // Act - second 32-bit word: "77665544" at offset 29
        let res = view.mark_regions(4, 4, cfg(WordWidth::Bits32, true));

        // Assert
        assert_eq!(res, Ok(vec![span(0, 29, 8)]));
    }

    #[test]
    fn test_mark_little_endian_straddling_words() {
        // Arrange
        let view = zero_view();

        // Act - high byte of word 0 is shown first, low byte of word 1 last
        let res = view.mark_regions(1, 2, cfg(WordWidth::Bits16, true));

        // Assert
        assert_eq!(res, Ok(vec![span(0, 20, 2), span(0, 27, 2)]));
    }

    #[test]
    fn test_mark_full_line_per_width() {
        // Arrange
        let view = zero_view();

        for width in WordWidth::ALL {
            for le in [false, true] {
                // Act
                let res = view.mark_regions(0x10, 16, cfg(width, le));

                // Assert - one span per word, separators excluded
                let bpw = width.bytes();
                let expected: LineOffsetList = (0..BYTES_PER_LINE / bpw)
                    .map(|w| span(1, 20 + w * (bpw * 2 + 1), bpw * 2))
                    .collect();
                assert_eq!(res, Ok(expected));
            }
        }
    }

    #[test]
    fn test_mark_zero_length() {
        // Arrange
        let view = HexView::new();

        // Act & Assert - no lookups happen for an empty selection
        assert_eq!(
            view.mark_regions(0xDEAD, 0, RenderConfig::default()),
            Ok(vec![])
        );
    }

    #[test]
    fn test_mark_unknown_address() {
        // Arrange
        let view = zero_view();

        // Act
        let before = view.mark_regions(0x1000, 1, RenderConfig::default());
        let running_off = view.mark_regions(0x1E, 4, RenderConfig::default());

        // Assert
        assert_eq!(
            before,
            Err(HexViewError::AddressNotFound(HexViewErrorKind::NoBlockAt(
                0x1000
            )))
        );
        assert_eq!(
            running_off,
            Err(HexViewError::AddressNotFound(HexViewErrorKind::NoBlockAt(
                0x20
            )))
        );
    }

    #[test]
    fn test_mark_range_overflow() {
        // Arrange
        let mut view = HexView::new();
        assert!(view.add_data(vec![0u8; 16], u64::MAX - 15).is_ok());

        // Act
        let last = view.mark_regions(u64::MAX, 1, RenderConfig::default());
        let past_end = view.mark_regions(u64::MAX, 2, RenderConfig::default());

        // Assert
        assert_eq!(last, Ok(vec![span(0, 65, 2)]));
        assert_eq!(
            past_end,
            Err(HexViewError::AddressNotFound(
                HexViewErrorKind::RangeOverflow(u64::MAX)
            ))
        );
    }

    #[test]
    fn test_mark_count_past_loaded_data() {
        // Arrange
        let mut view = HexView::new();
        assert!(view.add_data(vec![0u8; 16], 0).is_ok());

        // Act
        let huge = view.mark_regions(0, 1 << 40, RenderConfig::default());
        let max = view.mark_regions(0, usize::MAX, RenderConfig::default());

        // Assert
        let missing = Err(HexViewError::AddressNotFound(HexViewErrorKind::NoBlockAt(0x10)));
        assert_eq!(huge, missing);
        assert_eq!(max, missing);
    }

    #[test]
    fn test_mark_across_adjacent_blocks() {
        // Arrange - second block continues the first in memory, but is rendered first
        let mut view = HexView::new();
        assert!(view.add_data(vec![0u8; 8], 0x1008).is_ok());
        assert!(view.add_data(vec![0u8; 8], 0x1000).is_ok());

        // Act
        let res = view.mark_regions(0x1006, 4, RenderConfig::default());

        // Assert - block at 0x1000 is line 1, its bytes 6..8; block at 0x1008 is line 0
        assert_eq!(
            res,
            Ok(vec![
                span(0, 20, 2),
                span(0, 23, 2),
                span(1, 38, 2),
                span(1, 41, 2),
            ])
        );
    }

    #[test]
    fn test_mark_across_gap_fails() {
        // Arrange
        let mut view = HexView::new();
        assert!(view.add_data(vec![0u8; 16], 0x1000).is_ok());
        assert!(view.add_data(vec![0u8; 16], 0x1020).is_ok());

        // Act
        let res = view.mark_regions(0x100F, 0x12, RenderConfig::default());

        // Assert
        assert_eq!(
            res,
            Err(HexViewError::AddressNotFound(HexViewErrorKind::NoBlockAt(
                0x1010
            )))
        );
    }

    #[test]
    fn test_mark_is_idempotent() {
        // Arrange
        let view = zero_view();
        let config = cfg(WordWidth::Bits32, true);

        // Act
        let first = view.mark_regions(3, 20, config);
        let second = view.mark_regions(3, 20, config);

        // Assert
        assert!(first.is_ok());
        assert_eq!(first, second);
    }

    #[test]
    fn test_coalesced_spans_cover_byte_spans() {
        // Arrange
        let view = zero_view();

        for width in WordWidth::ALL {
            for le in [false, true] {
                let config = cfg(width, le);

                // Act
                let bytes = view.byte_spans(5, 22, config);
                let merged = view.mark_regions(5, 22, config);

                // Assert - same highlighted characters, fewer spans
                assert!(bytes.is_ok() && merged.is_ok());
                let (bytes, merged) = (bytes.unwrap_or_default(), merged.unwrap_or_default());
                let expand = |spans: &LineOffsetList| -> Vec<(usize, usize)> {
                    spans
                        .iter()
                        .flat_map(|s| {
                            (s.char_offset..s.char_offset + s.char_count).map(|c| (s.line, c))
                        })
                        .collect()
                };
                assert_eq!(expand(&bytes), expand(&merged));
                assert!(merged.len() <= bytes.len());
            }
        }
    }
}
