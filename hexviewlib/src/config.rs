//! Render configuration passed to every render and mark call.

use crate::error::{HexViewError, HexViewErrorKind};
use std::fmt;

/// Size of one display word: a group of bytes rendered (and byte-swapped) as a unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WordWidth {
    #[default]
    Bits8,
    Bits16,
    Bits32,
    Bits64,
}

impl WordWidth {
    /// All supported word widths, narrowest first.
    pub const ALL: [Self; 4] = [Self::Bits8, Self::Bits16, Self::Bits32, Self::Bits64];

    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::Bits8 => 8,
            Self::Bits16 => 16,
            Self::Bits32 => 32,
            Self::Bits64 => 64,
        }
    }

    /// Number of bytes in one word.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::Bits8 => 1,
            Self::Bits16 => 2,
            Self::Bits32 => 4,
            Self::Bits64 => 8,
        }
    }
}

impl TryFrom<u32> for WordWidth {
    type Error = HexViewError;

    /// Converts a raw bit count into a [`WordWidth`].
    ///
    /// # Errors
    /// Returns an error if `bits` is not one of 8, 16, 32 or 64.
    ///
    /// # Example
    /// ```
    /// use hexviewlib::WordWidth;
    ///
    /// assert_eq!(WordWidth::try_from(32).unwrap(), WordWidth::Bits32);
    /// assert!(WordWidth::try_from(24).is_err());
    /// ```
    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(Self::Bits8),
            16 => Ok(Self::Bits16),
            32 => Ok(Self::Bits32),
            64 => Ok(Self::Bits64),
            _ => Err(HexViewError::InvalidConfig(
                HexViewErrorKind::UnsupportedWordWidth(bits),
            )),
        }
    }
}

impl fmt::Display for WordWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// Word width and byte order of a rendered dump.
///
/// Mark regions are only meaningful against a dump rendered with the same config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RenderConfig {
    pub word_width: WordWidth,
    /// Reverse byte order inside each word of the hex field
    pub little_endian: bool,
}

impl RenderConfig {
    #[must_use]
    pub const fn new(word_width: WordWidth, little_endian: bool) -> Self {
        Self {
            word_width,
            little_endian,
        }
    }

    /// Creates a config from a raw word width in bits.
    ///
    /// # Errors
    /// Returns an error if `word_width_bits` is not one of 8, 16, 32 or 64.
    ///
    /// # Example
    /// ```
    /// use hexviewlib::{RenderConfig, WordWidth};
    ///
    /// let config = RenderConfig::from_bits(16, true).unwrap();
    /// assert_eq!(config.word_width, WordWidth::Bits16);
    /// ```
    pub fn from_bits(word_width_bits: u32, little_endian: bool) -> Result<Self, HexViewError> {
        Ok(Self::new(WordWidth::try_from(word_width_bits)?, little_endian))
    }
}
