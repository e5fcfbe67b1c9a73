use crate::hexview::{DataBlock, HexView};
use regex::bytes::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchType {
    Hex(Vec<u8>),
    Ascii(String),
    Regex(String),
}

impl HexView {
    /// Searches all loaded blocks for a pattern.
    /// Returns the starting addresses of all matches, block by block in insertion order.
    /// Matches never span two blocks.
    ///
    /// # Example
    /// ```
    /// use hexviewlib::{HexView, RenderConfig, SearchType};
    ///
    /// let mut view = HexView::new();
    /// view.add_data(*b"..needle..", 0x400).unwrap();
    ///
    /// let hits = view.search(&SearchType::Ascii("needle".to_string()));
    /// assert_eq!(hits, vec![0x402]);
    ///
    /// // Feed a hit into the mark engine to highlight it
    /// let spans = view.mark_regions(hits[0], 6, RenderConfig::default()).unwrap();
    /// assert_eq!(spans.len(), 6);
    /// ```
    #[must_use]
    pub fn search(&self, search_type: &SearchType) -> Vec<u64> {
        let matches = match search_type {
            SearchType::Hex(p) => search_bytes(self.blocks(), p),
            SearchType::Ascii(s) => search_bytes(self.blocks(), s.as_bytes()),
            SearchType::Regex(p) => search_regex(self.blocks(), p),
        };

        tracing::trace!(?search_type, matches = matches.len(), "searched hex view");
        matches
    }
}

/// Slide window search over every block.
/// Returns the starting addresses of all matches.
fn search_bytes<'a>(blocks: impl Iterator<Item = &'a DataBlock>, pattern: &[u8]) -> Vec<u64> {
    let size = pattern.len();
    if size == 0 {
        return vec![];
    }

    let mut matches = Vec::new();

    for block in blocks {
        for (offset, window) in block.bytes().windows(size).enumerate() {
            if window == pattern {
                matches.push(block.base_address() + offset as u64);
            }
        }
    }

    matches
}

/// Regex search over every block.
/// Returns the starting addresses of all matches.
fn search_regex<'a>(blocks: impl Iterator<Item = &'a DataBlock>, pattern: &str) -> Vec<u64> {
    let Ok(re) = Regex::new(pattern) else {
        tracing::debug!(pattern, "ignoring invalid search regex");
        return vec![];
    };
    let mut matches = Vec::new();

    for block in blocks {
        for mtch in re.find_iter(block.bytes()) {
            matches.push(block.base_address() + mtch.start() as u64);
        }
    }

    matches
}
