use crate::config::RenderConfig;
use crate::format::{ASCII_FIELD_START, BYTES_PER_LINE, push_line};
use crate::hexview::HexView;
use std::ops::Range;

/// Length of a full rendered line, newline included.
const LINE_CAPACITY: usize = ASCII_FIELD_START + BYTES_PER_LINE + 1;

impl HexView {
    /// Renders every loaded block, in insertion order, as one multi-line dump.
    ///
    /// # Example
    /// ```
    /// use hexviewlib::{HexView, RenderConfig, WordWidth};
    ///
    /// let mut view = HexView::new();
    /// view.add_data(*b"Hello", 0x1000).unwrap();
    ///
    /// let dump = view.render_all(RenderConfig::new(WordWidth::Bits16, false));
    /// assert_eq!(
    ///     dump,
    ///     "0x0000000000001000  4865 6c6c 6f                                     Hello\n"
    /// );
    /// ```
    #[must_use]
    pub fn render_all(&self, config: RenderConfig) -> String {
        self.render_lines(0..self.line_count(), config)
    }

    /// Renders only the given line numbers. The range is clamped to the loaded lines,
    /// and the result equals the matching lines of [`HexView::render_all`].
    ///
    /// # Example
    /// ```
    /// use hexviewlib::{HexView, RenderConfig};
    ///
    /// let mut view = HexView::new();
    /// view.add_data(vec![0u8; 64], 0x0).unwrap();
    ///
    /// let visible = view.render_lines(1..3, RenderConfig::default());
    /// assert_eq!(visible.lines().count(), 2);
    /// assert!(visible.starts_with("0x0000000000000010"));
    /// ```
    #[must_use]
    pub fn render_lines(&self, lines: Range<usize>, config: RenderConfig) -> String {
        let end = lines.end.min(self.line_count());
        let start = lines.start.min(end);
        let mut out = String::with_capacity((end - start) * LINE_CAPACITY);

        for block in self {
            let block_lines = block.first_line()..block.first_line() + block.line_count();
            if block_lines.end <= start {
                continue;
            }
            if block_lines.start >= end {
                break;
            }

            let skip = start.saturating_sub(block_lines.start);
            let take = end.min(block_lines.end) - block_lines.start - skip;

            for (address, bytes) in block.lines().skip(skip).take(take) {
                push_line(&mut out, bytes, address, config);
            }
        }

        out
    }
}
