//! Address decomposition for set-associative lookup.
//!
//! This module splits raw addresses into the three fields a cache level uses:
//! 1. **Offset:** Byte position inside a block (`log2(block_size)` low bits).
//! 2. **Index:** Set selector (`log2(num_sets)` bits above the offset).
//! 3. **Tag:** Every remaining high bit, compared against resident blocks.
//!
//! Each cache level owns its own decoder because the index width depends on the
//! level's set count. The same address therefore decodes to different
//! `(index, tag)` pairs at different levels, and cross-level operations
//! (writebacks, back-invalidation, exclusive demotion) must rebuild the block
//! address with [`AddressDecoder::compose`] before decoding it again elsewhere.

use super::error::ConfigError;

/// The fields of an address as seen by one cache level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedAddr {
    /// Byte offset within the block.
    pub offset: u64,
    /// Set index.
    pub index: usize,
    /// Tag compared against resident blocks in the indexed set.
    pub tag: u64,
}

/// Bit-field geometry of one cache level.
///
/// Construction is the only fallible step; decoding and composing are pure
/// shifts and masks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressDecoder {
    offset_bits: u32,
    index_bits: u32,
}

impl AddressDecoder {
    /// Creates a decoder for a level with the given block size and set count.
    ///
    /// # Arguments
    ///
    /// * `block_size` - Block (line) size in bytes.
    /// * `num_sets` - Number of sets in the level.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotPowerOfTwo`] if either argument is zero or not
    /// a power of two.
    pub fn new(block_size: u64, num_sets: u64) -> Result<Self, ConfigError> {
        if !block_size.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                field: "block size",
                value: block_size,
            });
        }
        if !num_sets.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                field: "number of sets",
                value: num_sets,
            });
        }
        Ok(Self {
            offset_bits: block_size.trailing_zeros(),
            index_bits: num_sets.trailing_zeros(),
        })
    }

    /// Number of offset bits.
    #[inline]
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Number of index bits.
    #[inline]
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Number of tag bits in a 64-bit address.
    #[inline]
    pub const fn tag_bits(&self) -> u32 {
        u64::BITS.saturating_sub(self.offset_bits + self.index_bits)
    }

    /// Splits `addr` into offset, index and tag.
    #[inline]
    pub fn decode(&self, addr: u64) -> DecodedAddr {
        let offset = addr & low_mask(self.offset_bits);
        let index = shr(addr, self.offset_bits) & low_mask(self.index_bits);
        let tag = shr(addr, self.offset_bits + self.index_bits);
        DecodedAddr {
            offset,
            index: index as usize,
            tag,
        }
    }

    /// Reassembles an address from its fields.
    ///
    /// `compose(d.tag, d.index, d.offset)` reproduces the decoded address.
    #[inline]
    pub fn compose(&self, tag: u64, index: usize, offset: u64) -> u64 {
        shl(self.block_number(tag, index), self.offset_bits) | (offset & low_mask(self.offset_bits))
    }

    /// Block number (address with the offset stripped) of a resident block.
    ///
    /// Block numbers are level-independent as long as every level shares the
    /// block size, which makes them usable as look-ahead keys.
    #[inline]
    pub fn block_number(&self, tag: u64, index: usize) -> u64 {
        shl(tag, self.index_bits) | (index as u64 & low_mask(self.index_bits))
    }

    /// Block number of a raw address.
    #[inline]
    pub fn block_number_of(&self, addr: u64) -> u64 {
        shr(addr, self.offset_bits)
    }
}

/// Mask with the low `bits` bits set.
#[inline]
const fn low_mask(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Right shift that yields 0 once every bit has been shifted out.
#[inline]
fn shr(value: u64, bits: u32) -> u64 {
    value.checked_shr(bits).unwrap_or(0)
}

/// Left shift that yields 0 once every bit has been shifted out.
#[inline]
fn shl(value: u64, bits: u32) -> u64 {
    value.checked_shl(bits).unwrap_or(0)
}
