//! NDR string types
//!
//! `[string]` pointers are conformant varying arrays with a null terminator:
//!
//! ```text
//! max_count: u32    # elements including null
//! offset: u32       # always 0
//! actual_count: u32 # elements including null
//! chars[actual_count]
//! ```
//!
//! A wire `BSTR` is different: it is a unique pointer to a
//! `FLAGGED_WORD_BLOB`, a conformant structure without a terminator:
//!
//! ```text
//! max_count: u32    # conformance, equals clSize
//! cBytes: u32       # payload length in bytes
//! clSize: u32       # payload length in UTF-16 code units
//! asData[clSize]
//! ```

use crate::{NdrDecode, NdrEncode, NdrError, NdrReader, NdrWriter, Result};

/// Write the max_count/offset/actual_count triple of a string
fn write_varying_header(w: &mut NdrWriter<'_>, len_with_null: usize) -> Result<()> {
    w.write_size(len_with_null)?;
    w.write_size(0)?;
    w.write_size(len_with_null)
}

/// Read and validate the string header, returning actual_count
fn read_varying_header(r: &mut NdrReader<'_>) -> Result<usize> {
    let max_count = r.read_size()?;
    let offset = r.read_size()?;
    let actual_count = r.read_size()?;

    if offset != 0 {
        return Err(NdrError::InvalidString(format!("non-zero offset {offset}")));
    }
    if actual_count > max_count {
        return Err(NdrError::ConformanceMismatch {
            max_count: max_count as u32,
            actual_count: actual_count as u32,
        });
    }
    r.check_string_len(actual_count)?;
    Ok(actual_count)
}

/// Read `count` UTF-16 code units after checking the buffer holds them
fn read_utf16_units(r: &mut NdrReader<'_>, count: usize) -> Result<Vec<u16>> {
    let byte_count = count.checked_mul(2).ok_or(NdrError::IntegerOverflow)?;
    r.read_align(2)?;
    r.ensure(byte_count)?;
    let mut units = Vec::with_capacity(count);
    for _ in 0..count {
        units.push(r.read_data()?);
    }
    Ok(units)
}

fn utf16_to_string(units: Vec<u16>) -> Result<String> {
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(NdrError::from)
}

/// ANSI string type (null-terminated char*)
///
/// Used for [string] annotated char* parameters in MIDL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NdrString(pub String);

impl NdrString {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for NdrString {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl NdrEncode for NdrString {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        let bytes = self.0.as_bytes();
        write_varying_header(w, bytes.len() + 1)?;
        w.write_bytes(bytes);
        w.write_data(0u8);
        Ok(())
    }

    fn ndr_align() -> usize {
        4
    }
}

impl NdrDecode for NdrString {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        let actual_count = read_varying_header(r)?;
        let mut bytes = r.read_bytes(actual_count)?.to_vec();
        if bytes.last() == Some(&0) {
            bytes.pop();
        }
        self.0 = String::from_utf8(bytes)?;
        Ok(())
    }

    fn ndr_align() -> usize {
        4
    }
}

/// Unicode string type (null-terminated wchar_t*)
///
/// Encoded as UTF-16 on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NdrWString(pub String);

impl NdrWString {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for NdrWString {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl NdrEncode for NdrWString {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        let units: Vec<u16> = self.0.encode_utf16().collect();
        write_varying_header(w, units.len() + 1)?;
        for unit in units {
            w.write_data(unit);
        }
        w.write_data(0u16);
        Ok(())
    }

    fn ndr_align() -> usize {
        4
    }
}

impl NdrDecode for NdrWString {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        let actual_count = read_varying_header(r)?;
        let mut units = read_utf16_units(r, actual_count)?;
        if units.last() == Some(&0) {
            units.pop();
        }
        self.0 = utf16_to_string(units)?;
        Ok(())
    }

    fn ndr_align() -> usize {
        4
    }
}

/// Body of a wire BSTR
///
/// Appears behind a unique pointer, so a null BSTR is `None` and an empty
/// one is `Some(Bstr::default())`; the two stay distinct on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct Bstr(pub String);

impl Bstr {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Bstr {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Bstr {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for Bstr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl NdrEncode for Bstr {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        let units: Vec<u16> = self.0.encode_utf16().collect();
        let byte_len = units.len().checked_mul(2).ok_or(NdrError::IntegerOverflow)?;
        w.write_size(units.len())?;
        w.write_size(byte_len)?;
        w.write_size(units.len())?;
        for unit in units {
            w.write_data(unit);
        }
        Ok(())
    }

    fn ndr_align() -> usize {
        4
    }
}

impl NdrDecode for Bstr {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        let max_count = r.read_size()?;
        let byte_len = r.read_size()?;
        let unit_len = r.read_size()?;

        if unit_len > max_count {
            return Err(NdrError::ConformanceMismatch {
                max_count: max_count as u32,
                actual_count: unit_len as u32,
            });
        }
        if unit_len.checked_mul(2) != Some(byte_len) {
            return Err(NdrError::InvalidString(format!(
                "BSTR byte length {byte_len} does not match {unit_len} code units"
            )));
        }
        r.check_string_len(unit_len)?;

        let units = read_utf16_units(r, unit_len)?;
        self.0 = utf16_to_string(units)?;
        Ok(())
    }

    fn ndr_align() -> usize {
        4
    }
}
