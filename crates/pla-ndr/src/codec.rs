//! Whole-stream entry points
//!
//! Each call owns one writer or reader, so the deferral queue lives exactly
//! as long as the pass that created it.

use bytes::Bytes;
use tracing::trace;

use crate::{NdrContext, NdrDecode, NdrEncode, NdrReader, NdrWriter, Result};

/// Inspects a value before it is marshalled; an error vetoes the encode
pub type EncodeHook<'h, T> = &'h dyn Fn(&T) -> Result<()>;

/// Prepares the target before it is unmarshalled
pub type DecodeHook<'h, T> = &'h dyn Fn(&mut T) -> Result<()>;

/// Encode a value and every pointer body it references
pub fn encode<T: NdrEncode>(value: &T, ctx: NdrContext) -> Result<Bytes> {
    encode_with_hook(value, ctx, None)
}

/// Encode a value after letting `hook` inspect it
pub fn encode_with_hook<T: NdrEncode>(
    value: &T,
    ctx: NdrContext,
    hook: Option<EncodeHook<'_, T>>,
) -> Result<Bytes> {
    if let Some(hook) = hook {
        hook(value)?;
    }
    let mut w = NdrWriter::new(ctx);
    value.ndr_encode(&mut w)?;
    w.write_deferred()?;
    let bytes = w.finish()?;
    trace!(len = bytes.len(), "encoded NDR stream");
    Ok(bytes)
}

/// Decode a complete stream into a fresh value
pub fn decode<T: NdrDecode + Default>(data: Bytes, ctx: NdrContext) -> Result<T> {
    decode_with_hook(data, ctx, None)
}

/// Decode a complete stream into a fresh value after `hook` has prepared it
pub fn decode_with_hook<T: NdrDecode + Default>(
    data: Bytes,
    ctx: NdrContext,
    hook: Option<DecodeHook<'_, T>>,
) -> Result<T> {
    let mut value = T::default();
    if let Some(hook) = hook {
        hook(&mut value)?;
    }
    decode_into(&mut value, data, ctx)?;
    Ok(value)
}

/// Decode a complete stream into an existing value
///
/// Pointer bodies are decoded before returning and the stream must be
/// consumed exactly. On error `target` may be partially written.
pub fn decode_into<T: NdrDecode + ?Sized>(target: &mut T, data: Bytes, ctx: NdrContext) -> Result<()> {
    let len = data.len();
    let mut r = NdrReader::new(data, ctx);
    target.ndr_decode(&mut r)?;
    r.read_deferred()?;
    r.finish()?;
    trace!(len, "decoded NDR stream");
    Ok(())
}
