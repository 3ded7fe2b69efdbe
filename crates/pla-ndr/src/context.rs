//! NDR encoding/decoding context
//!
//! The context carries the data representation (byte order) and the sanity
//! limits applied to length fields read off the wire. It is `Copy` and is
//! handed to every writer and reader for the duration of one pass.

use bytes::{Buf, BufMut};

/// Default upper bound on a single variable-size allocation, in bytes
pub const MAX_NDR_ALLOCATION_SIZE: usize = 16 * 1024 * 1024;

/// Default upper bound on the element count of a conformant array
pub const MAX_NDR_ARRAY_ELEMENTS: usize = 1024 * 1024;

/// Sanity bounds for length fields
///
/// Counts read from the wire are checked against these before anything is
/// allocated, so a malformed frame cannot force a huge allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NdrLimits {
    /// Maximum string length in code units (bytes for ANSI, `u16` for wide)
    pub max_string_len: usize,
    /// Maximum element count of any array
    pub max_array_elements: usize,
}

impl NdrLimits {
    /// Limits used when nothing else is configured
    pub const DEFAULT: Self = Self {
        max_string_len: MAX_NDR_ALLOCATION_SIZE / 2,
        max_array_elements: MAX_NDR_ARRAY_ELEMENTS,
    };

    /// Set the string length limit
    pub fn with_max_string_len(mut self, max: usize) -> Self {
        self.max_string_len = max;
        self
    }

    /// Set the array element limit
    pub fn with_max_array_elements(mut self, max: usize) -> Self {
        self.max_array_elements = max;
        self
    }
}

impl Default for NdrLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// NDR encoding/decoding context
///
/// Tracks the byte order and the configured limits, and provides methods for
/// encoding/decoding primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NdrContext {
    /// Whether to use little-endian byte order
    pub little_endian: bool,
    /// Length field limits
    pub limits: NdrLimits,
}

impl NdrContext {
    /// Create a new NDR context with little-endian byte order (default)
    pub fn new() -> Self {
        Self {
            little_endian: true,
            limits: NdrLimits::DEFAULT,
        }
    }

    /// Create a context with big-endian byte order
    pub fn big_endian() -> Self {
        Self {
            little_endian: false,
            ..Self::new()
        }
    }

    /// Replace the limits
    pub fn with_limits(mut self, limits: NdrLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Calculate padding needed to align to the given boundary
    #[inline]
    pub fn align_padding(position: usize, alignment: usize) -> usize {
        if alignment <= 1 {
            return 0;
        }
        let remainder = position % alignment;
        if remainder == 0 {
            0
        } else {
            alignment - remainder
        }
    }

    // Primitive encoding methods

    /// Put a u16
    #[inline]
    pub fn put_u16<B: BufMut>(&self, buf: &mut B, value: u16) {
        if self.little_endian {
            buf.put_u16_le(value);
        } else {
            buf.put_u16(value);
        }
    }

    /// Put an i16
    #[inline]
    pub fn put_i16<B: BufMut>(&self, buf: &mut B, value: i16) {
        if self.little_endian {
            buf.put_i16_le(value);
        } else {
            buf.put_i16(value);
        }
    }

    /// Put a u32
    #[inline]
    pub fn put_u32<B: BufMut>(&self, buf: &mut B, value: u32) {
        if self.little_endian {
            buf.put_u32_le(value);
        } else {
            buf.put_u32(value);
        }
    }

    /// Put an i32
    #[inline]
    pub fn put_i32<B: BufMut>(&self, buf: &mut B, value: i32) {
        if self.little_endian {
            buf.put_i32_le(value);
        } else {
            buf.put_i32(value);
        }
    }

    /// Put a u64
    #[inline]
    pub fn put_u64<B: BufMut>(&self, buf: &mut B, value: u64) {
        if self.little_endian {
            buf.put_u64_le(value);
        } else {
            buf.put_u64(value);
        }
    }

    /// Put an i64
    #[inline]
    pub fn put_i64<B: BufMut>(&self, buf: &mut B, value: i64) {
        if self.little_endian {
            buf.put_i64_le(value);
        } else {
            buf.put_i64(value);
        }
    }

    /// Put an f32
    #[inline]
    pub fn put_f32<B: BufMut>(&self, buf: &mut B, value: f32) {
        if self.little_endian {
            buf.put_f32_le(value);
        } else {
            buf.put_f32(value);
        }
    }

    /// Put an f64
    #[inline]
    pub fn put_f64<B: BufMut>(&self, buf: &mut B, value: f64) {
        if self.little_endian {
            buf.put_f64_le(value);
        } else {
            buf.put_f64(value);
        }
    }

    // Primitive decoding methods. Callers check `remaining()` first.

    /// Get a u16
    #[inline]
    pub fn get_u16<B: Buf>(&self, buf: &mut B) -> u16 {
        if self.little_endian {
            buf.get_u16_le()
        } else {
            buf.get_u16()
        }
    }

    /// Get an i16
    #[inline]
    pub fn get_i16<B: Buf>(&self, buf: &mut B) -> i16 {
        if self.little_endian {
            buf.get_i16_le()
        } else {
            buf.get_i16()
        }
    }

    /// Get a u32
    #[inline]
    pub fn get_u32<B: Buf>(&self, buf: &mut B) -> u32 {
        if self.little_endian {
            buf.get_u32_le()
        } else {
            buf.get_u32()
        }
    }

    /// Get an i32
    #[inline]
    pub fn get_i32<B: Buf>(&self, buf: &mut B) -> i32 {
        if self.little_endian {
            buf.get_i32_le()
        } else {
            buf.get_i32()
        }
    }

    /// Get a u64
    #[inline]
    pub fn get_u64<B: Buf>(&self, buf: &mut B) -> u64 {
        if self.little_endian {
            buf.get_u64_le()
        } else {
            buf.get_u64()
        }
    }

    /// Get an i64
    #[inline]
    pub fn get_i64<B: Buf>(&self, buf: &mut B) -> i64 {
        if self.little_endian {
            buf.get_i64_le()
        } else {
            buf.get_i64()
        }
    }

    /// Get an f32
    #[inline]
    pub fn get_f32<B: Buf>(&self, buf: &mut B) -> f32 {
        if self.little_endian {
            buf.get_f32_le()
        } else {
            buf.get_f32()
        }
    }

    /// Get an f64
    #[inline]
    pub fn get_f64<B: Buf>(&self, buf: &mut B) -> f64 {
        if self.little_endian {
            buf.get_f64_le()
        } else {
            buf.get_f64()
        }
    }
}

impl Default for NdrContext {
    fn default() -> Self {
        Self::new()
    }
}
