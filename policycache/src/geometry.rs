use log::trace;
use crate::error::{AddressDecodeError, Bank, ConfigurationError, DecodeFailure};
use crate::WORD_SIZE;

/// The shape of one bank of sets, and the bit layout it imposes on addresses
///
/// Immutable once built. All sizes are validated on construction, so decoding can never fail
/// for an integer address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    block_size: u64,
    num_sets: u64,
    associativity: u64,
    address_width: u32,
    offset_bits: u32,
    index_bits: u32,
    offset_mask: u64,
    index_mask: u64,
}

/// An address split into its three fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedAddress {
    pub offset: u64,
    pub set_index: u64,
    pub tag: u64,
}

impl Geometry {
    /// Derives the geometry of a cache of `size` bytes
    ///
    /// The number of sets is `size / (associativity * block_size)`, and must come out as a
    /// non-zero power of two
    ///
    /// # Arguments
    ///
    /// * `bank`: Which bank this is for, only used in error messages
    /// * `size`: Capacity in bytes
    /// * `block_size`: Block size in bytes, a power of two no smaller than a word
    /// * `associativity`: Blocks per set
    /// * `address_width`: Width of an address in bits, at most 64
    ///
    /// returns: Result<Geometry, ConfigurationError>
    ///
    /// # Examples
    ///
    /// ```
    /// use policycache::error::Bank;
    /// use policycache::geometry::Geometry;
    /// let geometry = Geometry::new(Bank::Data, 1024, 16, 2, 32).unwrap();
    /// assert_eq!(geometry.num_sets(), 32);
    /// assert_eq!((geometry.offset_bits(), geometry.index_bits(), geometry.tag_bits()), (4, 5, 23));
    /// ```
    pub fn new(bank: Bank, size: u64, block_size: u64, associativity: u64, address_width: u32) -> Result<Self, ConfigurationError> {
        if !block_size.is_power_of_two() {
            return Err(ConfigurationError::BlockSizeNotPowerOfTwo(block_size));
        }
        if block_size < WORD_SIZE {
            return Err(ConfigurationError::BlockSmallerThanWord(block_size));
        }
        if associativity == 0 {
            return Err(ConfigurationError::ZeroAssociativity);
        }
        if address_width > u64::BITS {
            return Err(ConfigurationError::AddressTooWide(address_width));
        }
        let num_sets = size / associativity.saturating_mul(block_size);
        if num_sets == 0 {
            return Err(ConfigurationError::NoSets { bank, size });
        }
        if !num_sets.is_power_of_two() {
            return Err(ConfigurationError::SetCountNotPowerOfTwo { bank, sets: num_sets });
        }
        let offset_bits = block_size.trailing_zeros();
        let index_bits = num_sets.trailing_zeros();
        if offset_bits + index_bits > address_width {
            return Err(ConfigurationError::AddressTooNarrow { offset_bits, index_bits, address_width });
        }
        Ok(Self {
            block_size,
            num_sets,
            associativity,
            address_width,
            offset_bits,
            index_bits,
            offset_mask: block_size - 1,
            index_mask: num_sets - 1,
        })
    }

    /// Splits an integer address into offset, set index and tag
    pub fn decode(&self, address: u64) -> DecodedAddress {
        let offset = address & self.offset_mask;
        let remaining = address >> self.offset_bits;
        let set_index = remaining & self.index_mask;
        let tag = remaining >> self.index_bits;
        DecodedAddress { offset, set_index, tag }
    }

    /// Parses a base-16 address and decodes it. An optional `0x` prefix is accepted
    ///
    /// # Examples
    ///
    /// ```
    /// use policycache::error::Bank;
    /// use policycache::geometry::Geometry;
    /// let geometry = Geometry::new(Bank::Data, 64, 4, 1, 32).unwrap();
    /// let decoded = geometry.decode_hex("1a6").unwrap();
    /// assert_eq!((decoded.offset, decoded.set_index, decoded.tag), (2, 9, 6));
    /// assert!(geometry.decode_hex("xyz").is_err());
    /// assert!(geometry.decode_hex("+1a").is_err());
    /// ```
    pub fn decode_hex(&self, text: &str) -> Result<DecodedAddress, AddressDecodeError> {
        let trimmed = text.trim();
        let digits = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")).unwrap_or(trimmed);
        let failure = |reason| AddressDecodeError { text: text.to_string(), reason };
        // from_str_radix alone would let a leading sign through
        if digits.is_empty() {
            return Err(failure(DecodeFailure::Empty));
        }
        if let Some(c) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(failure(DecodeFailure::InvalidDigit(c)));
        }
        let address = u64::from_str_radix(digits, 16).map_err(|_| failure(DecodeFailure::Overflow))?;
        let decoded = self.decode(address);
        trace!("processing {text}: offset #{}, set #{}, tag #{}", decoded.offset, decoded.set_index, decoded.tag);
        Ok(decoded)
    }

    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    /// Words moved over the bus when a whole block is fetched or copied back
    pub fn words_per_block(&self) -> u64 {
        self.block_size / WORD_SIZE
    }

    pub fn num_sets(&self) -> u64 {
        self.num_sets
    }

    pub fn associativity(&self) -> u64 {
        self.associativity
    }

    pub fn address_width(&self) -> u32 {
        self.address_width
    }

    pub fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    pub fn index_bits(&self) -> u32 {
        self.index_bits
    }

    pub fn tag_bits(&self) -> u32 {
        self.address_width - self.offset_bits - self.index_bits
    }
}
