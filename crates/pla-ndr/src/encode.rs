//! NDR encoding trait

use crate::{NdrWriter, Result};

/// Trait for types that can be encoded to NDR format
///
/// Implementations write their immediate (flat) representation through the
/// writer. Pointer bodies are handed to the writer's deferral queue and are
/// emitted at the next `write_deferred` call, which is why the value must be
/// borrowed for the writer's lifetime.
pub trait NdrEncode {
    /// Encode this value at the writer's current position.
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()>;

    /// Get the NDR alignment requirement for this type
    fn ndr_align() -> usize
    where
        Self: Sized,
    {
        1
    }
}

impl<T: NdrEncode> NdrEncode for Box<T> {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        (**self).ndr_encode(w)
    }

    fn ndr_align() -> usize {
        T::ndr_align()
    }
}
