use std::error::Error;
use std::fmt;

/// Which bank of the cache a geometry belongs to
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Bank {
    Data,
    Instruction,
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bank::Data => write!(f, "data"),
            Bank::Instruction => write!(f, "instruction"),
        }
    }
}

/// Raised when a cache can't be built from a configuration. Never recovered internally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    BlockSizeNotPowerOfTwo(u64),
    BlockSmallerThanWord(u64),
    ZeroAssociativity,
    NoSets { bank: Bank, size: u64 },
    SetCountNotPowerOfTwo { bank: Bank, sets: u64 },
    AddressTooNarrow { offset_bits: u32, index_bits: u32, address_width: u32 },
    AddressTooWide(u32),
    MissingInstructionSize,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::BlockSizeNotPowerOfTwo(size) => {
                write!(f, "block size {size} is not a power of two")
            }
            ConfigurationError::BlockSmallerThanWord(size) => {
                write!(f, "block size {size} is smaller than a word ({} bytes)", crate::WORD_SIZE)
            }
            ConfigurationError::ZeroAssociativity => write!(f, "associativity must be at least 1"),
            ConfigurationError::NoSets { bank, size } => {
                write!(f, "{bank} cache of {size} bytes can't hold a single set")
            }
            ConfigurationError::SetCountNotPowerOfTwo { bank, sets } => {
                write!(f, "{bank} cache has {sets} sets, which is not a power of two")
            }
            ConfigurationError::AddressTooNarrow { offset_bits, index_bits, address_width } => write!(
                f,
                "{offset_bits} offset bits and {index_bits} index bits don't fit in a {address_width} bit address"
            ),
            ConfigurationError::AddressTooWide(width) => {
                write!(f, "address width {width} is wider than 64 bits")
            }
            ConfigurationError::MissingInstructionSize => {
                write!(f, "a split cache needs an instruction cache size")
            }
        }
    }
}

impl Error for ConfigurationError {}

/// Why an address failed to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeFailure {
    Empty,
    InvalidDigit(char),
    /// More hex digits than fit in 64 bits
    Overflow,
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeFailure::Empty => write!(f, "no hex digits"),
            DecodeFailure::InvalidDigit(c) => write!(f, "'{c}' is not a hex digit"),
            DecodeFailure::Overflow => write!(f, "too large for a 64 bit address"),
        }
    }
}

/// Raised when an address isn't valid hexadecimal. The reference carrying it is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressDecodeError {
    pub text: String,
    pub reason: DecodeFailure,
}

impl fmt::Display for AddressDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse address {}: {}", self.text, self.reason)
    }
}

impl Error for AddressDecodeError {}
