//! NDR array types
//!
//! NDR supports several array types:
//!
//! - Fixed arrays: size known at compile time
//! - Conformant arrays: size determined at runtime, transmitted as prefix
//! - Varying arrays: subset of elements transmitted
//! - Conformant varying arrays: both conformant and varying
//!
//! Every count read from the wire is checked against the context's element
//! limit and against the bytes left in the stream before the element vector
//! is allocated.

use std::marker::PhantomData;

use crate::{NdrDecode, NdrEncode, NdrError, NdrReader, NdrWriter, Result};

fn encode_elements<'a, T: NdrEncode>(elements: &'a [T], w: &mut NdrWriter<'a>) -> Result<()> {
    if !elements.is_empty() {
        w.write_align(T::ndr_align());
    }
    for elem in elements {
        elem.ndr_encode(w)?;
    }
    Ok(())
}

/// Size `elements` to `count` defaults and decode each in place
pub(crate) fn decode_elements<'a, T>(
    elements: &'a mut Vec<T>,
    count: usize,
    r: &mut NdrReader<'a>,
) -> Result<()>
where
    T: NdrDecode + Default,
{
    r.check_array_len(count)?;
    // Every element occupies at least one byte
    r.ensure(count)?;
    elements.clear();
    if count > 0 {
        r.read_align(T::ndr_align())?;
    }
    elements.resize_with(count, T::default);
    for elem in elements.iter_mut() {
        elem.ndr_decode(r)?;
    }
    Ok(())
}

fn read_variance(r: &mut NdrReader<'_>) -> Result<(usize, usize)> {
    let offset = r.read_size()?;
    let actual_count = r.read_size()?;
    Ok((offset, actual_count))
}

/// Fixed-size array
///
/// Wire format: just the elements (no size prefix)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedArray<T, const N: usize> {
    pub elements: [T; N],
}

impl<T: Default, const N: usize> Default for FixedArray<T, N> {
    fn default() -> Self {
        Self {
            elements: std::array::from_fn(|_| T::default()),
        }
    }
}

impl<T, const N: usize> FixedArray<T, N> {
    pub fn new(elements: [T; N]) -> Self {
        Self { elements }
    }
}

impl<T: NdrEncode, const N: usize> NdrEncode for FixedArray<T, N> {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        encode_elements(&self.elements, w)
    }

    fn ndr_align() -> usize {
        T::ndr_align()
    }
}

impl<T: NdrDecode, const N: usize> NdrDecode for FixedArray<T, N> {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        if N > 0 {
            r.read_align(T::ndr_align())?;
        }
        for elem in self.elements.iter_mut() {
            elem.ndr_decode(r)?;
        }
        Ok(())
    }

    fn ndr_align() -> usize {
        T::ndr_align()
    }
}

/// Conformant array - size determined at runtime
///
/// Wire format:
/// ```text
/// max_count: u32      # Maximum elements
/// elements[max_count] # Element data
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConformantArray<T> {
    pub elements: Vec<T>,
}

impl<T> ConformantArray<T> {
    pub fn new(elements: Vec<T>) -> Self {
        Self { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl<T> From<Vec<T>> for ConformantArray<T> {
    fn from(elements: Vec<T>) -> Self {
        Self { elements }
    }
}

impl<T: NdrEncode> NdrEncode for ConformantArray<T> {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        w.write_size(self.elements.len())?;
        encode_elements(&self.elements, w)
    }

    fn ndr_align() -> usize {
        4
    }
}

impl<T: NdrDecode + Default> NdrDecode for ConformantArray<T> {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        let max_count = r.read_size()?;
        decode_elements(&mut self.elements, max_count, r)
    }

    fn ndr_align() -> usize {
        4
    }
}

/// Varying array - fixed capacity, transmitted subset
///
/// Wire format:
/// ```text
/// offset: u32       # First transmitted element (always 0 in practice)
/// actual_count: u32 # Number of transmitted elements
/// elements[actual_count]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaryingArray<T, const N: usize> {
    pub offset: usize,
    pub elements: Vec<T>,
    _marker: PhantomData<[T; N]>,
}

impl<T, const N: usize> Default for VaryingArray<T, N> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T, const N: usize> VaryingArray<T, N> {
    pub fn new(elements: Vec<T>) -> Self {
        Self::with_offset(0, elements)
    }

    pub fn with_offset(offset: usize, elements: Vec<T>) -> Self {
        Self {
            offset,
            elements,
            _marker: PhantomData,
        }
    }
}

impl<T: NdrEncode, const N: usize> NdrEncode for VaryingArray<T, N> {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        let end = self.offset.checked_add(self.elements.len()).ok_or(NdrError::IntegerOverflow)?;
        if end > N {
            return Err(NdrError::ArraySizeMismatch { expected: N, got: end });
        }
        w.write_size(self.offset)?;
        w.write_size(self.elements.len())?;
        encode_elements(&self.elements, w)
    }

    fn ndr_align() -> usize {
        4
    }
}

impl<T: NdrDecode + Default, const N: usize> NdrDecode for VaryingArray<T, N> {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        let (offset, actual_count) = read_variance(r)?;
        let end = offset.checked_add(actual_count).ok_or(NdrError::IntegerOverflow)?;
        if end > N {
            return Err(NdrError::ArraySizeMismatch { expected: N, got: end });
        }
        self.offset = offset;
        decode_elements(&mut self.elements, actual_count, r)
    }

    fn ndr_align() -> usize {
        4
    }
}

/// Conformant varying array - size and subset determined at runtime
///
/// Wire format:
/// ```text
/// max_count: u32    # Maximum elements (conformance)
/// offset: u32       # First transmitted element
/// actual_count: u32 # Number of transmitted elements
/// elements[actual_count]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConformantVaryingArray<T> {
    pub max_count: usize,
    pub offset: usize,
    pub elements: Vec<T>,
}

impl<T> ConformantVaryingArray<T> {
    pub fn new(elements: Vec<T>) -> Self {
        Self {
            max_count: elements.len(),
            offset: 0,
            elements,
        }
    }

    pub fn with_max(max_count: usize, elements: Vec<T>) -> Self {
        Self {
            max_count: max_count.max(elements.len()),
            offset: 0,
            elements,
        }
    }
}

impl<T: NdrEncode> NdrEncode for ConformantVaryingArray<T> {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        let end = self.offset.checked_add(self.elements.len()).ok_or(NdrError::IntegerOverflow)?;
        if end > self.max_count {
            return Err(NdrError::ArraySizeMismatch { expected: self.max_count, got: end });
        }
        w.write_size(self.max_count)?;
        w.write_size(self.offset)?;
        w.write_size(self.elements.len())?;
        encode_elements(&self.elements, w)
    }

    fn ndr_align() -> usize {
        4
    }
}

impl<T: NdrDecode + Default> NdrDecode for ConformantVaryingArray<T> {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        let max_count = r.read_size()?;
        let (offset, actual_count) = read_variance(r)?;
        r.check_array_len(max_count)?;
        let end = offset.checked_add(actual_count).ok_or(NdrError::IntegerOverflow)?;
        if end > max_count {
            return Err(NdrError::ConformanceMismatch {
                max_count: max_count as u32,
                actual_count: actual_count as u32,
            });
        }
        self.max_count = max_count;
        self.offset = offset;
        decode_elements(&mut self.elements, actual_count, r)
    }

    fn ndr_align() -> usize {
        4
    }
}
