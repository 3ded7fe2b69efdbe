//! NDR primitive type implementations
//!
//! NDR primitive types and their encodings:
//!
//! | MIDL Type     | Rust Type | Size | Alignment |
//! |---------------|-----------|------|-----------|
//! | boolean       | bool      | 1    | 1         |
//! | byte/char     | u8        | 1    | 1         |
//! | small         | i8        | 1    | 1         |
//! | short         | i16       | 2    | 2         |
//! | long/int      | i32       | 4    | 4         |
//! | hyper         | i64       | 8    | 8         |
//! | unsigned short| u16       | 2    | 2         |
//! | unsigned long | u32       | 4    | 4         |
//! | unsigned hyper| u64       | 8    | 8         |
//! | float         | f32       | 4    | 4         |
//! | double        | f64       | 8    | 8         |
//! | wchar_t       | u16       | 2    | 2         |
//! | HRESULT       | i32       | 4    | 4         |

use crate::{NdrContext, NdrDecode, NdrEncode, NdrReader, NdrWriter, Result};
use bytes::{Buf, BufMut};

/// A fixed-width scalar with natural alignment equal to its size
///
/// This is what `NdrWriter::write_data` and `NdrReader::read_data` accept.
pub trait NdrPrimitive: Copy + Default {
    /// Wire size in bytes, which is also the alignment
    const SIZE: usize;

    /// Write the value in the context's byte order
    fn put<B: BufMut>(self, ctx: &NdrContext, buf: &mut B);

    /// Read a value in the context's byte order
    fn get<B: Buf>(ctx: &NdrContext, buf: &mut B) -> Self;
}

macro_rules! impl_ndr_primitive {
    ($ty:ty, $size:expr, $put:ident, $get:ident) => {
        impl NdrPrimitive for $ty {
            const SIZE: usize = $size;

            #[inline]
            fn put<B: BufMut>(self, ctx: &NdrContext, buf: &mut B) {
                ctx.$put(buf, self);
            }

            #[inline]
            fn get<B: Buf>(ctx: &NdrContext, buf: &mut B) -> Self {
                ctx.$get(buf)
            }
        }

        impl NdrEncode for $ty {
            fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
                w.write_data(*self);
                Ok(())
            }

            fn ndr_align() -> usize {
                $size
            }
        }

        impl NdrDecode for $ty {
            fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
                *self = r.read_data()?;
                Ok(())
            }

            fn ndr_align() -> usize {
                $size
            }
        }
    };
}

impl_ndr_primitive!(u16, 2, put_u16, get_u16);
impl_ndr_primitive!(i16, 2, put_i16, get_i16);
impl_ndr_primitive!(u32, 4, put_u32, get_u32);
impl_ndr_primitive!(i32, 4, put_i32, get_i32);
impl_ndr_primitive!(u64, 8, put_u64, get_u64);
impl_ndr_primitive!(i64, 8, put_i64, get_i64);
impl_ndr_primitive!(f32, 4, put_f32, get_f32);
impl_ndr_primitive!(f64, 8, put_f64, get_f64);

// Single-byte types have no byte order and no alignment.

impl NdrPrimitive for u8 {
    const SIZE: usize = 1;

    fn put<B: BufMut>(self, _ctx: &NdrContext, buf: &mut B) {
        buf.put_u8(self);
    }

    fn get<B: Buf>(_ctx: &NdrContext, buf: &mut B) -> Self {
        buf.get_u8()
    }
}

impl NdrPrimitive for i8 {
    const SIZE: usize = 1;

    fn put<B: BufMut>(self, _ctx: &NdrContext, buf: &mut B) {
        buf.put_i8(self);
    }

    fn get<B: Buf>(_ctx: &NdrContext, buf: &mut B) -> Self {
        buf.get_i8()
    }
}

/// NDR boolean - encoded as a single byte (0x00 = false, 0x01 = true)
impl NdrPrimitive for bool {
    const SIZE: usize = 1;

    fn put<B: BufMut>(self, _ctx: &NdrContext, buf: &mut B) {
        buf.put_u8(if self { 1 } else { 0 });
    }

    fn get<B: Buf>(_ctx: &NdrContext, buf: &mut B) -> Self {
        buf.get_u8() != 0
    }
}

macro_rules! impl_ndr_byte {
    ($ty:ty) => {
        impl NdrEncode for $ty {
            fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
                w.write_data(*self);
                Ok(())
            }
        }

        impl NdrDecode for $ty {
            fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
                *self = r.read_data()?;
                Ok(())
            }
        }
    };
}

impl_ndr_byte!(u8);
impl_ndr_byte!(i8);
impl_ndr_byte!(bool);

/// GUID/UUID type for NDR encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NdrUuid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl NdrUuid {
    /// Wire size in bytes
    pub const SIZE: usize = 16;

    /// Nil UUID
    pub const NIL: Self = Self {
        data1: 0,
        data2: 0,
        data3: 0,
        data4: [0; 8],
    };

    /// Build from the big-endian (RFC 4122) byte form
    pub const fn from_bytes(b: [u8; 16]) -> Self {
        Self {
            data1: u32::from_be_bytes([b[0], b[1], b[2], b[3]]),
            data2: u16::from_be_bytes([b[4], b[5]]),
            data3: u16::from_be_bytes([b[6], b[7]]),
            data4: [b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15]],
        }
    }

    /// Whether this is the nil UUID
    pub fn is_nil(&self) -> bool {
        *self == Self::NIL
    }

    /// Parse from string "xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx"
    pub fn parse(s: &str) -> Option<Self> {
        const GROUP_LENS: [usize; 5] = [8, 4, 4, 4, 12];

        let parts: Vec<&str> = s.trim().split('-').collect();
        if parts.len() != GROUP_LENS.len() {
            return None;
        }
        for (part, len) in parts.iter().zip(GROUP_LENS) {
            if part.len() != len || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return None;
            }
        }

        let data1 = u32::from_str_radix(parts[0], 16).ok()?;
        let data2 = u16::from_str_radix(parts[1], 16).ok()?;
        let data3 = u16::from_str_radix(parts[2], 16).ok()?;
        let tail = [parts[3], parts[4]].concat();
        let mut data4 = [0u8; 8];
        for (i, byte) in data4.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&tail[i * 2..i * 2 + 2], 16).ok()?;
        }

        Some(Self { data1, data2, data3, data4 })
    }
}

impl std::fmt::Display for NdrUuid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            self.data1,
            self.data2,
            self.data3,
            self.data4[0],
            self.data4[1],
            self.data4[2],
            self.data4[3],
            self.data4[4],
            self.data4[5],
            self.data4[6],
            self.data4[7],
        )
    }
}

impl NdrEncode for NdrUuid {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        // UUID aligns to 4 bytes (same as first field)
        w.write_align(4);
        w.write_data(self.data1);
        w.write_data(self.data2);
        w.write_data(self.data3);
        w.write_bytes(&self.data4);
        Ok(())
    }

    fn ndr_align() -> usize {
        4
    }
}

impl NdrDecode for NdrUuid {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        r.read_align(4)?;
        r.ensure(Self::SIZE)?;
        self.data1 = r.read_data()?;
        self.data2 = r.read_data()?;
        self.data3 = r.read_data()?;
        let data4 = r.read_bytes(8)?;
        self.data4.copy_from_slice(&data4);
        Ok(())
    }

    fn ndr_align() -> usize {
        4
    }
}
