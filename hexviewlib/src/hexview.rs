//! The `hexview` module provides the [`HexView`] struct, the block store behind a hex dump.
//!
//! A view holds any number of non-contiguous [`DataBlock`]s, each anchored at its own base
//! address. Every block is assigned a run of rendered line numbers (16 bytes per line) in
//! the order it was added, which is also the order in which blocks are rendered. The
//! address → line mapping kept here is what rendering, marking and searching are built on.
//!
//! Rendering, marking and searching are implemented in the `dump`, `mark` and `search`
//! modules as further `impl HexView` blocks.

use crate::error::{HexViewError, HexViewErrorKind};
use crate::format::BYTES_PER_LINE;
use std::collections::BTreeMap;

/// Contiguous, immutable run of bytes anchored at a base address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataBlock {
    base_address: u64,
    first_line: usize,
    bytes: Vec<u8>,
}

impl DataBlock {
    /// Address of the first byte.
    #[must_use]
    pub const fn base_address(&self) -> u64 {
        self.base_address
    }

    /// Address of the last byte (inclusive).
    #[must_use]
    pub fn last_address(&self) -> u64 {
        // Cannot overflow: checked when the block was added
        self.base_address + (self.bytes.len() as u64 - 1)
    }

    /// Rendered line number of the block's first line.
    #[must_use]
    pub const fn first_line(&self) -> usize {
        self.first_line
    }

    /// Number of rendered lines occupied by this block.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.bytes.len().div_ceil(BYTES_PER_LINE)
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false`: empty blocks are rejected by [`HexView::add_data`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Check if the provided address holds a byte of this block.
    #[must_use]
    pub fn contains(&self, address: u64) -> bool {
        address >= self.base_address && address <= self.last_address()
    }

    /// Iterate over the block's lines as `(line address, bytes)` pairs.
    pub fn lines(&self) -> impl Iterator<Item = (u64, &[u8])> {
        let base = self.base_address;
        self.bytes
            .chunks(BYTES_PER_LINE)
            .enumerate()
            .map(move |(i, chunk)| (base + (i * BYTES_PER_LINE) as u64, chunk))
    }
}

#[derive(Debug, Clone, Default)]
pub struct HexView {
    /// Blocks in insertion order
    blocks: Vec<DataBlock>,
    /// Base address -> index into `blocks`
    index: BTreeMap<u64, usize>,
    /// Lines assigned so far
    total_lines: usize,
}

impl<'a> IntoIterator for &'a HexView {
    type Item = &'a DataBlock;
    type IntoIter = std::slice::Iter<'a, DataBlock>;
    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

impl HexView {
    /// Creates an empty `HexView`.
    ///
    /// # Examples
    /// ```
    /// use hexviewlib::HexView;
    ///
    /// let view = HexView::new();
    /// assert_eq!(view.line_count(), 0);
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self {
            blocks: Vec::new(),
            index: BTreeMap::new(),
            total_lines: 0,
        }
    }

    /// Drops all loaded blocks and resets line numbering.
    pub fn clear(&mut self) {
        tracing::debug!(blocks = self.blocks.len(), "clearing hex view");
        self.blocks.clear();
        self.index.clear();
        self.total_lines = 0;
    }

    /// Adds a block of bytes anchored at `base_address`.
    ///
    /// The block gets the next free run of line numbers, `ceil(len / 16)` lines long,
    /// independent of where its address falls relative to blocks added earlier.
    /// Returns the number of the block's first line.
    ///
    /// # Errors
    /// - Returns an error if `bytes` is empty
    /// - Returns an error if the block overlaps an already loaded block
    /// - Returns an error if the block runs past the end of the 64-bit address space
    ///
    /// # Example
    /// ```
    /// use hexviewlib::HexView;
    ///
    /// let mut view = HexView::new();
    /// assert_eq!(view.add_data(vec![0u8; 40], 0x2000).unwrap(), 0);
    /// assert_eq!(view.add_data(vec![0u8; 16], 0x1000).unwrap(), 3);
    /// assert_eq!(view.line_count(), 4);
    /// ```
    pub fn add_data<B: Into<Vec<u8>>>(
        &mut self,
        bytes: B,
        base_address: u64,
    ) -> Result<usize, HexViewError> {
        let bytes = bytes.into();

        let result = self.validate_block(&bytes, base_address);
        if let Err(err) = &result {
            tracing::warn!(base_address, len = bytes.len(), %err, "rejected data block");
        }
        result?;

        let first_line = self.total_lines;
        let block = DataBlock {
            base_address,
            first_line,
            bytes,
        };

        self.total_lines += block.line_count();
        self.index.insert(base_address, self.blocks.len());

        tracing::debug!(
            base_address,
            len = block.len(),
            first_line,
            lines = block.line_count(),
            "added data block"
        );
        self.blocks.push(block);

        Ok(first_line)
    }

    fn validate_block(&self, bytes: &[u8], base_address: u64) -> Result<(), HexViewError> {
        if bytes.is_empty() {
            return Err(HexViewError::InvalidInput(HexViewErrorKind::EmptyBuffer));
        }

        let last_address = u64::try_from(bytes.len() - 1)
            .ok()
            .and_then(|span| base_address.checked_add(span))
            .ok_or(HexViewError::InvalidInput(
                HexViewErrorKind::AddressOverflow(base_address),
            ))?;

        // Blocks never overlap, so the closest block starting at or below our last
        // address is the only candidate for an overlap.
        if let Some((_, &idx)) = self.index.range(..=last_address).next_back() {
            let other = &self.blocks[idx];
            if other.last_address() >= base_address {
                return Err(HexViewError::InvalidInput(HexViewErrorKind::BlockOverlap(
                    other.base_address.max(base_address),
                )));
            }
        }

        Ok(())
    }

    /// Find the block holding `address` and the byte offset of `address` inside it.
    pub(crate) fn locate(&self, address: u64) -> Option<(&DataBlock, usize)> {
        let (_, &idx) = self.index.range(..=address).next_back()?;
        let block = &self.blocks[idx];
        let offset = usize::try_from(address - block.base_address).ok()?;
        (offset < block.len()).then_some((block, offset))
    }

    /// Get the rendered line number that holds `address`.
    ///
    /// # Errors
    /// Returns an error if no loaded block contains `address`.
    ///
    /// # Example
    /// ```
    /// use hexviewlib::HexView;
    ///
    /// let mut view = HexView::new();
    /// view.add_data(vec![0u8; 64], 0x1000).unwrap();
    ///
    /// assert_eq!(view.line_of(0x1025).unwrap(), 2);
    /// assert!(view.line_of(0x1040).is_err());
    /// ```
    pub fn line_of(&self, address: u64) -> Result<usize, HexViewError> {
        self.locate(address)
            .map(|(block, offset)| block.first_line + offset / BYTES_PER_LINE)
            .ok_or(HexViewError::AddressNotFound(HexViewErrorKind::NoBlockAt(
                address,
            )))
    }

    /// Get the address of the first byte rendered on `line`.
    ///
    /// # Example
    /// ```
    /// use hexviewlib::HexView;
    ///
    /// let mut view = HexView::new();
    /// view.add_data(vec![0u8; 20], 0x1000).unwrap();
    /// view.add_data(vec![0u8; 4], 0x8000).unwrap();
    ///
    /// assert_eq!(view.address_of_line(1), Some(0x1010));
    /// assert_eq!(view.address_of_line(2), Some(0x8000));
    /// assert_eq!(view.address_of_line(3), None);
    /// ```
    #[must_use]
    pub fn address_of_line(&self, line: usize) -> Option<u64> {
        let idx = self
            .blocks
            .partition_point(|b| b.first_line <= line)
            .checked_sub(1)?;
        let block = &self.blocks[idx];
        let line_in_block = line - block.first_line;

        (line_in_block < block.line_count()).then(|| {
            block.base_address + (line_in_block * BYTES_PER_LINE) as u64
        })
    }

    /// Get the block holding `address`, if any.
    #[must_use]
    pub fn block_at(&self, address: u64) -> Option<&DataBlock> {
        self.locate(address).map(|(block, _)| block)
    }

    /// Check if any loaded block holds `address`.
    #[must_use]
    pub fn contains(&self, address: u64) -> bool {
        self.locate(address).is_some()
    }

    /// Get byte at the provided address.
    ///
    /// # Example
    /// ```
    /// use hexviewlib::HexView;
    ///
    /// let mut view = HexView::new();
    /// view.add_data(vec![0xAA, 0xBB], 0x10).unwrap();
    ///
    /// assert_eq!(view.get_byte(0x11), Some(0xBB));
    /// assert_eq!(view.get_byte(0x12), None);
    /// ```
    #[must_use]
    pub fn get_byte(&self, address: u64) -> Option<u8> {
        self.locate(address)
            .map(|(block, offset)| block.bytes[offset])
    }

    /// Iterate over loaded blocks in insertion (= rendering) order.
    pub fn blocks(&self) -> std::slice::Iter<'_, DataBlock> {
        self.into_iter()
    }

    /// Total number of rendered lines.
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.total_lines
    }

    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
