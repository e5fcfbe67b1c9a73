//! The `error` module defines the [`HexViewError`] enum that describes the errors that
//! can occur when loading data into a [`HexView`](crate::HexView), resolving addresses,
//! or configuring a render. It carries two pieces of information:
//! 1. At which stage the error occurs, e.g., while adding data or looking up an address.
//! 2. What kind of error was encountered (via [`HexViewErrorKind`] enum).

use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HexViewError {
    /// Data supplied to the view was rejected
    InvalidInput(HexViewErrorKind),
    /// Address (or address range) is not covered by any loaded block
    AddressNotFound(HexViewErrorKind),
    /// Render configuration is not supported
    InvalidConfig(HexViewErrorKind),
}

impl HexViewError {
    /// Get the underlying error kind.
    #[must_use]
    pub const fn kind(&self) -> &HexViewErrorKind {
        match self {
            Self::InvalidInput(kind) | Self::AddressNotFound(kind) | Self::InvalidConfig(kind) => {
                kind
            }
        }
    }
}

impl fmt::Display for HexViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(base_err) => {
                write!(f, "Invalid data supplied to the hex view:\n{base_err}")
            }
            Self::AddressNotFound(base_err) => {
                write!(f, "Address lookup failed:\n{base_err}")
            }
            Self::InvalidConfig(base_err) => {
                write!(f, "Invalid render configuration:\n{base_err}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HexViewErrorKind {
    /// Supplied byte buffer is empty
    EmptyBuffer,
    /// Supplied block overlaps an already loaded block at the given address
    BlockOverlap(u64),
    /// Supplied block does not fit into the 64-bit address space
    AddressOverflow(u64),
    /// No loaded block contains the given address
    NoBlockAt(u64),
    /// Selection starting at the given address runs past the end of the address space
    RangeOverflow(u64),
    /// Word width (in bits) is not one of 8, 16, 32 or 64
    UnsupportedWordWidth(u32),
}

impl fmt::Display for HexViewErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBuffer => {
                write!(f, "Byte buffer is empty")
            }
            Self::BlockOverlap(address) => {
                write!(
                    f,
                    "Block overlaps already loaded data at address: 0x{address:X}"
                )
            }
            Self::AddressOverflow(address) => {
                write!(
                    f,
                    "Block starting at 0x{address:X} exceeds the 64-bit address space"
                )
            }
            Self::NoBlockAt(address) => {
                write!(f, "No data found at address: 0x{address:X}")
            }
            Self::RangeOverflow(address) => {
                write!(
                    f,
                    "Selection starting at 0x{address:X} exceeds the 64-bit address space"
                )
            }
            Self::UnsupportedWordWidth(bits) => {
                write!(
                    f,
                    "Unsupported word width: {bits} bits (expected 8, 16, 32 or 64)"
                )
            }
        }
    }
}

impl Error for HexViewError {}
impl Error for HexViewErrorKind {}
