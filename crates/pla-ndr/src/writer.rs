//! NDR stream writer with pointer deferral
//!
//! NDR emits every pointer in two places: the referent ID where the pointer
//! is declared, and the pointee body later in the stream. The writer keeps a
//! FIFO of body encoders; `write_deferred` drains it level by level, so a
//! body that itself contains pointers queues its own bodies behind everything
//! enqueued at the current level.

use std::collections::VecDeque;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::{NdrContext, NdrEncode, NdrEnum, NdrError, NdrPrimitive, Result};

/// First referent ID handed out, matching what Windows stubs emit
pub const FIRST_REFERENT_ID: u32 = 0x0002_0000;

type DeferredWrite<'a> = Box<dyn FnOnce(&mut NdrWriter<'a>) -> Result<()> + 'a>;

/// Writes one NDR stream
///
/// `'a` is the lifetime of the values whose pointer bodies are still queued.
pub struct NdrWriter<'a> {
    buf: BytesMut,
    position: usize,
    ctx: NdrContext,
    deferred: VecDeque<DeferredWrite<'a>>,
    next_referent: u32,
}

impl<'a> NdrWriter<'a> {
    /// Create an empty writer
    pub fn new(ctx: NdrContext) -> Self {
        Self::with_capacity(ctx, 0)
    }

    /// Create a writer with a preallocated buffer
    pub fn with_capacity(ctx: NdrContext, capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            position: 0,
            ctx,
            deferred: VecDeque::new(),
            next_referent: FIRST_REFERENT_ID,
        }
    }

    /// Encoding context
    pub fn context(&self) -> &NdrContext {
        &self.ctx
    }

    /// Byte offset from the start of the stream
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of pointer bodies waiting for `write_deferred`
    pub fn pending(&self) -> usize {
        self.deferred.len()
    }

    /// Write zero padding up to the given boundary
    pub fn write_align(&mut self, alignment: usize) {
        let padding = NdrContext::align_padding(self.position, alignment);
        self.buf.put_bytes(0, padding);
        self.position += padding;
    }

    /// Write a fixed-width scalar at its natural alignment
    pub fn write_data<T: NdrPrimitive>(&mut self, value: T) {
        self.write_align(T::SIZE);
        value.put(&self.ctx, &mut self.buf);
        self.position += T::SIZE;
    }

    /// Write raw bytes with no alignment
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
        self.position += bytes.len();
    }

    /// Write a 32-bit count (conformance, offset or actual count)
    pub fn write_size(&mut self, count: usize) -> Result<()> {
        let count = u32::try_from(count).map_err(|_| NdrError::IntegerOverflow)?;
        self.write_data(count);
        Ok(())
    }

    /// Write an enumeration as its 16-bit wire value
    pub fn write_enum<E: NdrEnum>(&mut self, value: E) {
        self.write_data(value.to_wire());
    }

    /// Write a pointer discriminant: zero for null, otherwise a fresh referent ID
    pub fn write_referent(&mut self, present: bool) -> u32 {
        let referent = if present {
            let id = self.next_referent;
            self.next_referent = self.next_referent.wrapping_add(4).max(FIRST_REFERENT_ID);
            id
        } else {
            0
        };
        self.write_data(referent);
        referent
    }

    /// Queue a body encoder for the next `write_deferred`
    pub fn defer<F>(&mut self, body: F)
    where
        F: FnOnce(&mut NdrWriter<'a>) -> Result<()> + 'a,
    {
        self.deferred.push_back(Box::new(body));
    }

    /// Write a unique pointer
    ///
    /// A null pointer is a single zero discriminant. A non-null pointer gets
    /// a referent ID here and its body, aligned to `T::ndr_align()`, at the
    /// next deferral flush.
    pub fn write_pointer<T>(&mut self, value: Option<&'a T>)
    where
        T: NdrEncode + 'a,
    {
        let referent = self.write_referent(value.is_some());
        if let Some(value) = value {
            trace!(referent, position = self.position, "deferring pointer body");
            self.defer(move |w| {
                w.write_align(T::ndr_align());
                value.ndr_encode(w)
            });
        }
    }

    /// Flush every queued pointer body, level by level
    pub fn write_deferred(&mut self) -> Result<()> {
        let mut level = 0usize;
        while !self.deferred.is_empty() {
            let mut current = std::mem::take(&mut self.deferred);
            trace!(level, bodies = current.len(), "writing deferred pointer bodies");
            while let Some(body) = current.pop_front() {
                body(self)?;
            }
            level += 1;
        }
        Ok(())
    }

    /// Finish the stream and return its bytes
    ///
    /// Every queued body must have been flushed. Leaving bodies behind is a
    /// bug in the calling encoder, so debug builds panic on it.
    pub fn finish(self) -> Result<Bytes> {
        let pending = self.deferred.len();
        debug_assert!(pending == 0, "NdrWriter finished with {pending} unflushed deferred bodies");
        if pending != 0 {
            return Err(NdrError::UnflushedDeferrals(pending));
        }
        Ok(self.buf.freeze())
    }
}

impl std::fmt::Debug for NdrWriter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NdrWriter")
            .field("position", &self.position)
            .field("pending", &self.deferred.len())
            .field("next_referent", &self.next_referent)
            .finish()
    }
}
