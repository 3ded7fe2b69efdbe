//! NDR decoding trait

use crate::{NdrReader, Result};

/// Trait for types that can be decoded from NDR format
///
/// Decoding happens in place. Pointer bodies are decoded later, when the
/// reader's deferral queue is flushed, directly into the field that was
/// registered with `read_pointer`; the target therefore stays borrowed for
/// the reader's lifetime.
pub trait NdrDecode {
    /// Decode into `self` from the reader's current position.
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()>;

    /// Get the NDR alignment requirement for this type
    fn ndr_align() -> usize
    where
        Self: Sized,
    {
        1
    }
}

impl<T: NdrDecode> NdrDecode for Box<T> {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        (**self).ndr_decode(r)
    }

    fn ndr_align() -> usize {
        T::ndr_align()
    }
}
