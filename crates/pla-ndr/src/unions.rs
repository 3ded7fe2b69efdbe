//! Encapsulated unions
//!
//! Wire format:
//! ```text
//! discriminant        # scalar, natural alignment
//! <pad to arm_align>
//! arm                 # the arm selected by the discriminant
//! ```

use crate::{NdrDecode, NdrEncode, NdrPrimitive, NdrReader, NdrWriter, Result};

/// A discriminated union whose arms are chosen by a scalar tag
pub trait NdrUnion {
    /// Wire type of the tag
    type Discriminant: NdrPrimitive;

    /// Tag of the arm currently held
    fn discriminant(&self) -> Self::Discriminant;

    /// Alignment of the union body, i.e. the largest arm alignment
    fn arm_align() -> usize {
        1
    }

    /// Encode the held arm
    fn encode_arm<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()>;

    /// Switch to the arm named by `discriminant` and decode it in place
    ///
    /// Unknown tags should fail with [`NdrError::InvalidEnumValue`](crate::NdrError::InvalidEnumValue).
    fn decode_arm<'a>(&'a mut self, discriminant: Self::Discriminant, r: &mut NdrReader<'a>) -> Result<()>;
}

/// Union carried together with its discriminant
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncapsulatedUnion<U>(pub U);

impl<U: NdrUnion> NdrEncode for EncapsulatedUnion<U> {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        w.write_data(self.0.discriminant());
        w.write_align(U::arm_align());
        self.0.encode_arm(w)
    }

    fn ndr_align() -> usize {
        U::Discriminant::SIZE.max(U::arm_align())
    }
}

impl<U: NdrUnion> NdrDecode for EncapsulatedUnion<U> {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        let discriminant = r.read_data()?;
        r.read_align(U::arm_align())?;
        self.0.decode_arm(discriminant, r)
    }

    fn ndr_align() -> usize {
        U::Discriminant::SIZE.max(U::arm_align())
    }
}
