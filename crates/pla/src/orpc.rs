//! ORPC (Object RPC) header types (MS-DCOM 2.2.13, 2.2.14)
//!
//! ORPCTHIS leads every request stub and ORPCTHAT every response stub. Both
//! carry an optional extension array behind a unique pointer, which is why
//! the operation frames flush the deferral queue right after the header.

use pla_ndr::{NdrDecode, NdrEncode, NdrError, NdrReader, NdrUuid, NdrWriter, Result};

use crate::identifiers::generate_uuid;
use crate::DCOM_VERSION;

/// COM version structure (MS-DCOM 2.2.11)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ComVersion {
    /// Major version number
    pub major: u16,
    /// Minor version number
    pub minor: u16,
}

impl ComVersion {
    /// DCOM version 5.1 (Windows 2000)
    pub const DCOM_5_1: Self = Self { major: 5, minor: 1 };
    /// DCOM version 5.4 (Windows XP/2003)
    pub const DCOM_5_4: Self = Self { major: 5, minor: 4 };
    /// DCOM version 5.6 (Windows Vista)
    pub const DCOM_5_6: Self = Self { major: 5, minor: 6 };
    /// DCOM version 5.7 (Windows 7)
    pub const DCOM_5_7: Self = Self { major: 5, minor: 7 };

    /// Create a new COM version
    pub fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }
}

impl NdrEncode for ComVersion {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        w.write_data(self.major);
        w.write_data(self.minor);
        Ok(())
    }

    fn ndr_align() -> usize {
        2
    }
}

impl NdrDecode for ComVersion {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        self.major = r.read_data()?;
        self.minor = r.read_data()?;
        Ok(())
    }

    fn ndr_align() -> usize {
        2
    }
}

/// One ORPC extension (ORPC_EXTENT)
///
/// A conformant structure: the data array is sized `(size + 7) & !7` on the
/// wire and zero padded. `data` holds the `size` meaningful bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrpcExtent {
    /// Extension identifier
    pub id: NdrUuid,
    /// Extension payload
    pub data: Vec<u8>,
}

impl OrpcExtent {
    /// Create an extension
    pub fn new(id: NdrUuid, data: Vec<u8>) -> Self {
        Self { id, data }
    }

    fn padded_len(size: usize) -> Result<usize> {
        Ok(size.checked_add(7).ok_or(NdrError::IntegerOverflow)? & !7)
    }
}

impl NdrEncode for OrpcExtent {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        let padded = Self::padded_len(self.data.len())?;
        w.write_size(padded)?;
        self.id.ndr_encode(w)?;
        w.write_size(self.data.len())?;
        w.write_bytes(&self.data);
        w.write_bytes(&[0u8; 8][..padded - self.data.len()]);
        Ok(())
    }

    fn ndr_align() -> usize {
        4
    }
}

impl NdrDecode for OrpcExtent {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        let max_count = r.read_size()?;
        self.id.ndr_decode(r)?;
        let size = r.read_size()?;
        let padded = Self::padded_len(size)?;
        if max_count != padded {
            return Err(NdrError::ConformanceMismatch {
                max_count: max_count as u32,
                actual_count: size as u32,
            });
        }
        r.check_array_len(max_count)?;
        let mut data = r.read_bytes(max_count)?;
        data.truncate(size);
        self.data = data.to_vec();
        Ok(())
    }

    fn ndr_align() -> usize {
        4
    }
}

/// ORPC extension array (ORPC_EXTENT_ARRAY)
///
/// `extent` mirrors the wire: `(size + 1) & !1` unique pointers, the
/// trailing one null when `size` is odd.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrpcExtentArray {
    /// Number of extensions in use
    pub size: u32,
    /// Reserved (must be 0)
    pub reserved: u32,
    /// Extension slots
    pub extent: Vec<Option<OrpcExtent>>,
}

impl OrpcExtentArray {
    /// Build an array holding the given extensions
    pub fn new(extents: Vec<OrpcExtent>) -> Self {
        let size = extents.len();
        let mut extent: Vec<Option<OrpcExtent>> = extents.into_iter().map(Some).collect();
        if size % 2 == 1 {
            extent.push(None);
        }
        Self {
            size: size as u32,
            reserved: 0,
            extent,
        }
    }

    /// Iterate the non-null extensions
    pub fn extents(&self) -> impl Iterator<Item = &OrpcExtent> {
        self.extent.iter().flatten()
    }

    fn slot_count(size: u32) -> usize {
        (size as usize + 1) & !1
    }
}

impl NdrEncode for OrpcExtentArray {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        let expected = Self::slot_count(self.size);
        if self.extent.len() != expected {
            return Err(NdrError::ArraySizeMismatch {
                expected,
                got: self.extent.len(),
            });
        }
        w.write_data(self.size);
        w.write_data(self.reserved);

        let extent = &self.extent;
        w.write_referent(true);
        w.defer(move |w| {
            w.write_size(extent.len())?;
            for slot in extent {
                w.write_pointer(slot.as_ref());
            }
            Ok(())
        });
        Ok(())
    }

    fn ndr_align() -> usize {
        4
    }
}

impl NdrDecode for OrpcExtentArray {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        self.size = r.read_data()?;
        self.reserved = r.read_data()?;
        let expected = Self::slot_count(self.size);

        self.extent.clear();
        let extent = &mut self.extent;
        if r.read_referent()? == 0 {
            return Ok(());
        }
        r.defer(move |r| {
            let count = r.read_size()?;
            if count != expected {
                return Err(NdrError::ArraySizeMismatch { expected, got: count });
            }
            r.check_array_len(count)?;
            r.ensure(count.saturating_mul(4))?;
            extent.resize_with(count, || None);
            for slot in extent.iter_mut() {
                r.read_pointer(slot)?;
            }
            Ok(())
        });
        Ok(())
    }

    fn ndr_align() -> usize {
        4
    }
}

/// ORPCTHIS structure (MS-DCOM 2.2.13)
///
/// Sent with every ORPC request from client to server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrpcThis {
    /// COM version
    pub version: ComVersion,
    /// Flags (must be 0)
    pub flags: u32,
    /// Reserved (must be 0)
    pub reserved1: u32,
    /// Causality ID (UUID identifying the call chain)
    pub cid: NdrUuid,
    /// Optional extension array
    pub extensions: Option<OrpcExtentArray>,
}

/// Header marshalled for requests that do not carry one
pub(crate) static DEFAULT_ORPC_THIS: OrpcThis = OrpcThis::EMPTY;

impl OrpcThis {
    /// Header with DCOM 5.7, nil causality and no extensions
    pub const EMPTY: Self = Self {
        version: DCOM_VERSION,
        flags: 0,
        reserved1: 0,
        cid: NdrUuid::NIL,
        extensions: None,
    };

    /// Create a header with a fresh causality ID
    pub fn new(version: ComVersion) -> Self {
        Self::with_causality(version, generate_uuid())
    }

    /// Create with a specific causality ID
    pub fn with_causality(version: ComVersion, cid: NdrUuid) -> Self {
        Self {
            version,
            cid,
            ..Self::EMPTY
        }
    }
}

impl Default for OrpcThis {
    fn default() -> Self {
        Self::new(DCOM_VERSION)
    }
}

impl NdrEncode for OrpcThis {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        w.write_align(4);
        self.version.ndr_encode(w)?;
        w.write_data(self.flags);
        w.write_data(self.reserved1);
        self.cid.ndr_encode(w)?;
        w.write_pointer(self.extensions.as_ref());
        Ok(())
    }

    fn ndr_align() -> usize {
        4
    }
}

impl NdrDecode for OrpcThis {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        r.read_align(4)?;
        self.version.ndr_decode(r)?;
        self.flags = r.read_data()?;
        self.reserved1 = r.read_data()?;
        self.cid.ndr_decode(r)?;
        r.read_pointer(&mut self.extensions)
    }

    fn ndr_align() -> usize {
        4
    }
}

/// ORPCTHAT structure (MS-DCOM 2.2.14)
///
/// Sent with every ORPC response from server to client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrpcThat {
    /// Flags (must be 0)
    pub flags: u32,
    /// Optional extension array
    pub extensions: Option<OrpcExtentArray>,
}

/// Header marshalled for responses that do not carry one
pub(crate) static DEFAULT_ORPC_THAT: OrpcThat = OrpcThat {
    flags: 0,
    extensions: None,
};

impl OrpcThat {
    /// Create a new empty ORPCTHAT
    pub fn new() -> Self {
        Self::default()
    }
}

impl NdrEncode for OrpcThat {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        w.write_data(self.flags);
        w.write_pointer(self.extensions.as_ref());
        Ok(())
    }

    fn ndr_align() -> usize {
        4
    }
}

impl NdrDecode for OrpcThat {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        self.flags = r.read_data()?;
        r.read_pointer(&mut self.extensions)
    }

    fn ndr_align() -> usize {
        4
    }
}

/// Well-known extension UUIDs
pub mod extent_ids {
    use pla_ndr::NdrUuid;

    /// Error info extension (00000000-0000-0000-c000-000000000046)
    pub const ERROR_INFO: NdrUuid = NdrUuid {
        data1: 0,
        data2: 0,
        data3: 0,
        data4: [0xc0, 0, 0, 0, 0, 0, 0, 0x46],
    };
}
