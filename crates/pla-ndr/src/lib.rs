//! NDR (Network Data Representation) codec core
//!
//! Implements the NDR20 transfer syntax used by DCE RPC and DCOM stubs.
//!
//! # NDR Wire Format
//!
//! - Primitives align to their natural size (1, 2, 4, or 8 bytes) relative
//!   to the start of the stream
//! - Structures are their fields in declaration order
//! - Unique and full pointers are a 4-byte referent ID; the pointee body
//!   follows later, after all sibling fields at the same level
//! - Strings are conformant varying arrays with a null terminator; BSTR
//!   bodies carry a byte count and no terminator
//! - Encapsulated unions are a scalar discriminant followed by the selected arm
//!
//! # Deferral
//!
//! [`NdrWriter`] and [`NdrReader`] each own a queue of pointer-body closures.
//! Encoders call [`NdrWriter::write_pointer`] and later
//! [`NdrWriter::write_deferred`]; decoders do the same with the reader. The
//! [`encode`] and [`decode`] entry points flush once at the end of the value.

mod arrays;
mod codec;
mod context;
mod decode;
mod encode;
mod enums;
mod error;
mod pointers;
mod primitives;
mod reader;
mod strings;
mod unions;
mod writer;

pub use arrays::{ConformantArray, ConformantVaryingArray, FixedArray, VaryingArray};
pub use codec::{decode, decode_into, decode_with_hook, encode, encode_with_hook, DecodeHook, EncodeHook};
pub use context::{NdrContext, NdrLimits, MAX_NDR_ALLOCATION_SIZE, MAX_NDR_ARRAY_ELEMENTS};
pub use decode::NdrDecode;
pub use encode::NdrEncode;
pub use enums::NdrEnum;
pub use error::{NdrError, Result};
pub use pointers::{FullPtr, NdrPtr, RefPtr, UniquePtr};
pub use primitives::{NdrPrimitive, NdrUuid};
pub use reader::NdrReader;
pub use strings::{Bstr, NdrString, NdrWString};
pub use unions::{EncapsulatedUnion, NdrUnion};
pub use writer::{NdrWriter, FIRST_REFERENT_ID};

/// Re-export bytes for convenience
pub use bytes::{Buf, BufMut, Bytes, BytesMut};
